//! Domain layer with core business entities and port definitions.

/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;
/// Port definitions.
pub mod ports;
/// Serde utilities.
pub mod serde_utils;

pub use entities::{AuthToken, Session, SessionStatus, User};
pub use errors::{ApiError, AuthError};
pub use ports::{AuthPort, NavigationPort, PageSource, TokenStoragePort, TransportPort};
