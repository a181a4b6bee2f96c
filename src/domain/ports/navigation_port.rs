//! Navigation port: how the session guard asks the front end to show login.

/// Receiver of the redirect-to-login signal.
///
/// Registered once by the top-level front end. The session guard calls it
/// when the backend invalidates the session mid-flight.
#[cfg_attr(test, mockall::automock)]
pub trait NavigationPort: Send + Sync {
    /// Requests that the user be taken to the login screen.
    fn redirect_to_login(&self);
}
