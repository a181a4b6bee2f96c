//! Process-wide session and the authorized request path.
//!
//! [`SessionGuard`] is the only owner of the bearer token. Every component
//! that talks to the backend goes through [`SessionGuard::authorized_request`],
//! which attaches the token and turns a 401 into a one-time teardown of the
//! session plus a redirect-to-login signal.
//!
//! Each login, logout, verification outcome and teardown starts a new session
//! generation. Requests remember the generation they were issued under, so a
//! late 401 that belongs to a session which no longer exists cannot tear down
//! its successor, and N simultaneous 401s of one session fire the signal once.
//!
//! Generation changes that touch the token store are serialized by an async
//! lock held across the store call, so the persisted token always matches the
//! newest generation.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, info, warn};

use crate::application::dto::LoginRequest;
use crate::application::use_cases::{LoginUseCase, RestoreSessionUseCase};
use crate::domain::entities::{Session, SessionStatus, User};
use crate::domain::errors::{ApiError, AuthError};
use crate::domain::ports::{
    ApiRequest, ApiResponse, AuthPort, NavigationPort, TokenStoragePort, TransportPort,
};

const UNAUTHORIZED: u16 = 401;

#[derive(Default)]
struct SessionState {
    session: Session,
    generation: u64,
}

impl SessionState {
    fn begin(&mut self, session: Session) {
        self.generation = self.generation.wrapping_add(1);
        self.session = session;
    }
}

/// Owns the session and gates every authorized backend call on it.
pub struct SessionGuard {
    login: LoginUseCase,
    restore: RestoreSessionUseCase,
    transport: Arc<dyn TransportPort>,
    navigation: Arc<dyn NavigationPort>,
    state: Mutex<SessionState>,
    persistence: AsyncMutex<()>,
}

impl SessionGuard {
    /// Creates a guard with an empty, unauthenticated session.
    #[must_use]
    pub fn new(
        auth: Arc<dyn AuthPort>,
        storage: Arc<dyn TokenStoragePort>,
        transport: Arc<dyn TransportPort>,
        navigation: Arc<dyn NavigationPort>,
    ) -> Self {
        Self {
            login: LoginUseCase::new(Arc::clone(&auth), Arc::clone(&storage)),
            restore: RestoreSessionUseCase::new(auth, storage),
            transport,
            navigation,
            state: Mutex::new(SessionState::default()),
            persistence: AsyncMutex::new(()),
        }
    }

    /// Snapshot of the current session.
    #[must_use]
    pub fn session(&self) -> Session {
        self.state.lock().session.clone()
    }

    /// Current authentication state.
    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.state.lock().session.status
    }

    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        self.state.lock().session.user.clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state.lock().session.is_authenticated()
    }

    /// Logs in and makes the issued token the session credential.
    ///
    /// # Errors
    /// Returns [`AuthError::InvalidCredentials`] when the backend rejects the
    /// credentials, or the network/backend failure otherwise. The session and
    /// any persisted token are left untouched on failure. A token that cannot
    /// be persisted still authenticates this process.
    pub async fn login(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let response = self
            .login
            .execute(LoginRequest::new(username, password))
            .await?;

        let _persistence = self.persistence.lock().await;
        if let Err(e) = self.login.store_token(&response.token).await {
            warn!(error = %e, "Session will not survive a restart");
        }

        let user = response.user.clone();
        self.state.lock().begin(Session {
            token: Some(response.token),
            user: Some(response.user),
            status: SessionStatus::Authenticated,
        });

        info!(username = %user.username(), "Session authenticated");
        Ok(user)
    }

    /// Boot-time check of the persisted token.
    ///
    /// Never fails: any problem leaves the session unauthenticated and the
    /// persisted token removed. Without a persisted token no request is made.
    /// An already authenticated session is returned as-is.
    pub async fn verify(&self) -> Option<User> {
        let generation = {
            let state = self.state.lock();
            if state.session.is_authenticated() {
                return state.session.user.clone();
            }
            state.generation
        };

        let Some(token) = self.restore.load_token().await else {
            let mut state = self.state.lock();
            if state.generation == generation {
                state.begin(Session::default());
            }
            return state.session.user.clone();
        };

        {
            let mut state = self.state.lock();
            if state.generation != generation {
                debug!("Session changed before verification started");
                return state.session.user.clone();
            }
            state.session.status = SessionStatus::Verifying;
        }

        match self.restore.verify(&token).await {
            Ok(user) => {
                let mut state = self.state.lock();
                if state.generation == generation {
                    state.begin(Session {
                        token: Some(token),
                        user: Some(user),
                        status: SessionStatus::Authenticated,
                    });
                }
                state.session.user.clone()
            }
            Err(e) => {
                let _persistence = self.persistence.lock().await;
                let discard = {
                    let mut state = self.state.lock();
                    let current = state.generation == generation;
                    if current {
                        state.begin(Session::default());
                    }
                    current
                };

                if discard {
                    info!(error = %e, "Stored session is no longer valid, signed out");
                    self.restore.discard().await;
                }
                self.current_user()
            }
        }
    }

    /// Sends `request` with the session's bearer token attached.
    ///
    /// Non-401 statuses come back untouched for the caller to interpret.
    ///
    /// # Errors
    /// Returns [`ApiError::Unauthorized`] on 401, after the session has been
    /// torn down and the redirect requested, and transport failures as-is.
    pub async fn authorized_request(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let (token, generation) = {
            let state = self.state.lock();
            (state.session.token.clone(), state.generation)
        };

        let request = match token {
            Some(token) => request.with_bearer(token),
            None => request,
        };

        debug!(method = %request.method, path = %request.path, "Authorized request");
        let response = self.transport.send(request).await?;

        if response.status() == UNAUTHORIZED {
            self.handle_unauthorized(generation).await;
            return Err(ApiError::Unauthorized);
        }

        Ok(response)
    }

    /// Signs out; navigation is left to the caller.
    pub async fn logout(&self) {
        let _persistence = self.persistence.lock().await;
        self.state.lock().begin(Session::default());
        info!("Signed out");

        if let Err(e) = self.login.delete_token().await {
            warn!(error = %e, "Persisted token could not be removed on logout");
        }
    }

    async fn handle_unauthorized(&self, generation: u64) {
        let persistence = self.persistence.lock().await;
        let torn_down = {
            let mut state = self.state.lock();
            if state.generation == generation {
                state.begin(Session::default());
                true
            } else {
                false
            }
        };

        if !torn_down {
            debug!("Ignoring 401 from a superseded session");
            return;
        }

        warn!("Backend rejected the session token, signing out");
        if let Err(e) = self.login.delete_token().await {
            warn!(error = %e, "Persisted token could not be removed after 401");
        }
        drop(persistence);
        self.navigation.redirect_to_login();
    }
}
