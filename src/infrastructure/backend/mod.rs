//! REST backend adapter.

mod client;
mod dto;

pub use client::{BackendClient, DEFAULT_API_URL};
