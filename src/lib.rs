//! estate-admin - back-office client for a real-estate sales backend.
//!
//! Provides the session guard that owns the bearer token, a generic
//! paginated list controller, and typed access to projects, houses,
//! packages, clients, applications and manager accounts.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Application layer containing use cases, services and DTOs.
pub mod application;
/// Domain layer containing entities, errors, and port definitions.
pub mod domain;
/// Infrastructure layer containing adapters for external services.
pub mod infrastructure;
/// Presentation layer containing CLI commands and rendering.
pub mod presentation;

/// Current version of the application.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name.
pub const NAME: &str = "estate-admin";
