//! Domain error types.

mod api_error;
mod auth_error;

pub use api_error::{ApiError, FieldError, GENERIC_REQUEST_FAILURE};
pub use auth_error::{AuthError, GENERIC_LOGIN_FAILURE};
