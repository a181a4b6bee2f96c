//! Application layer with use cases, services and DTOs.

/// Data transfer objects.
pub mod dto;
/// Session, pagination and entity services.
pub mod services;
/// Use case implementations.
pub mod use_cases;

pub use dto::{CreatedManager, LoginRequest, LoginResponse, NewManager, PasswordReset};
pub use services::{EntityClient, HouseCatalog, PaginatedList, SessionGuard};
pub use use_cases::{LoginUseCase, RestoreSessionUseCase};
