//! Redirect-to-login latch consumed by the top-level command loop.

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::info;

use crate::domain::ports::NavigationPort;

/// Remembers that the session guard asked for the login screen.
#[derive(Debug, Default)]
pub struct LoginRedirect {
    pending: AtomicBool,
}

impl LoginRedirect {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pending: AtomicBool::new(false),
        }
    }

    /// Consumes the pending redirect; `true` at most once per request.
    pub fn take(&self) -> bool {
        self.pending.swap(false, Ordering::SeqCst)
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::SeqCst)
    }
}

impl NavigationPort for LoginRedirect {
    fn redirect_to_login(&self) {
        if !self.pending.swap(true, Ordering::SeqCst) {
            info!("Redirecting to login");
        }
    }
}
