//! Data transfer objects for the application layer.

mod auth_dto;
mod manager_dto;

pub use auth_dto::{LoginRequest, LoginResponse};
pub use manager_dto::{CreatedManager, NewManager, PasswordReset};
