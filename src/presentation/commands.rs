//! Runs one CLI command against the session and the entity lists.

use std::io::Write;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use super::navigation::LoginRedirect;
use super::render::{footer, summarize};
use crate::application::dto::NewManager;
use crate::application::services::{
    CatalogTab, EntityClient, EntitySource, HouseCatalog, ListSnapshot, LoadOutcome,
    PaginatedList, SessionGuard,
};
use crate::domain::entities::{EntityId, EntityKind, ListFilter, NoFilter, Record, Role, User};
use crate::domain::errors::{ApiError, AuthError};
use crate::infrastructure::config::{CatalogTabArg, Command, ListArgs, RoleArg};

const REDIRECT_NOTICE: &str =
    "Session expired. Sign in again with `estate-admin login <username>`.";

/// Failure of a CLI command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// No session, or the persisted one did not verify.
    #[error("not signed in, run `estate-admin login <username>` first")]
    NotSignedIn,
    /// Signed in, but the action is reserved for super managers.
    #[error("{action} requires a super manager account")]
    Forbidden {
        /// What was attempted.
        action: &'static str,
    },
    /// Login failure.
    #[error(transparent)]
    Auth(#[from] AuthError),
    /// Backend call failure.
    #[error(transparent)]
    Api(#[from] ApiError),
    /// Output could not be written.
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

/// How a command ended when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Command finished.
    Done,
    /// The backend ended the session; the user must sign in again.
    RedirectedToLogin,
}

/// Executes commands, writing human-readable output to `out`.
pub struct CommandRunner<W> {
    guard: Arc<SessionGuard>,
    client: EntityClient,
    redirect: Arc<LoginRedirect>,
    page_size: u64,
    out: W,
}

impl<W: Write> CommandRunner<W> {
    /// Creates a runner over `guard`, reporting redirects consumed from `redirect`.
    #[must_use]
    pub fn new(
        guard: Arc<SessionGuard>,
        redirect: Arc<LoginRedirect>,
        page_size: u64,
        out: W,
    ) -> Self {
        Self {
            client: EntityClient::new(Arc::clone(&guard)),
            guard,
            redirect,
            page_size: page_size.max(1),
            out,
        }
    }

    /// Returns the output sink.
    pub fn into_output(self) -> W {
        self.out
    }

    /// Runs `command`, restoring the persisted session first when it needs one.
    ///
    /// # Errors
    /// Returns the failure of the command; an ended session is reported as
    /// [`Completion::RedirectedToLogin`] instead.
    pub async fn run(&mut self, command: Command) -> Result<Completion, CommandError> {
        if !matches!(command, Command::Login { .. } | Command::Logout) {
            let user = self.guard.verify().await;
            debug!(signed_in = user.is_some(), "Session restored at startup");
        }

        match self.dispatch(command).await {
            Ok(()) => Ok(Completion::Done),
            Err(CommandError::Api(e)) if e.is_unauthorized() => {
                if self.redirect.take() {
                    writeln!(self.out, "{REDIRECT_NOTICE}")?;
                }
                Ok(Completion::RedirectedToLogin)
            }
            Err(CommandError::Api(e)) if e.is_retryable() => {
                warn!(error = %e, "Backend unavailable, the command can be retried");
                Err(CommandError::Api(e))
            }
            Err(e) => Err(e),
        }
    }

    async fn dispatch(&mut self, command: Command) -> Result<(), CommandError> {
        match command {
            Command::Login { username, password } => {
                let password = Zeroizing::new(password.unwrap_or_default());
                self.login(&username, &password).await
            }
            Command::Logout => {
                self.guard.logout().await;
                writeln!(self.out, "Signed out")?;
                Ok(())
            }
            Command::Whoami => {
                let user = self.require_user()?;
                writeln!(
                    self.out,
                    "{} (id {}, {})",
                    user.username(),
                    user.id(),
                    user.role()
                )?;
                Ok(())
            }
            Command::List(args) => self.list(&args).await,
            Command::Catalog { tab, pages } => self.catalog(tab, pages).await,
            Command::Show { kind, id } => {
                self.require_kind_access(kind, "viewing managers")?;
                let record = self.client.get(kind, &id).await?;
                let rendered =
                    serde_json::to_string_pretty(&record).map_err(std::io::Error::from)?;
                writeln!(self.out, "{rendered}")?;
                Ok(())
            }
            Command::Delete { kind, id } => {
                self.require_kind_access(kind, "deleting managers")?;
                self.client.delete(kind, &id).await?;
                writeln!(self.out, "Deleted {} {id}", kind.label())?;
                Ok(())
            }
            Command::ResetPassword { id } => self.reset_password(&id).await,
            Command::CreateManager { username, role } => self.create_manager(username, role).await,
        }
    }

    async fn login(&mut self, username: &str, password: &str) -> Result<(), CommandError> {
        let user = self.guard.login(username, password).await?;
        info!(username = %user.username(), "Signed in from CLI");
        writeln!(self.out, "Signed in as {} ({})", user.username(), user.role())?;
        Ok(())
    }

    fn require_user(&self) -> Result<User, CommandError> {
        self.guard.current_user().ok_or(CommandError::NotSignedIn)
    }

    fn require_super_manager(&self, action: &'static str) -> Result<User, CommandError> {
        let user = self.require_user()?;
        if user.is_super_manager() {
            Ok(user)
        } else {
            Err(CommandError::Forbidden { action })
        }
    }

    fn require_kind_access(
        &self,
        kind: EntityKind,
        action: &'static str,
    ) -> Result<User, CommandError> {
        if kind == EntityKind::Users {
            self.require_super_manager(action)
        } else {
            self.require_user()
        }
    }

    async fn list(&mut self, args: &ListArgs) -> Result<(), CommandError> {
        self.require_kind_access(args.kind, "listing managers")?;
        let limit = args.page_limit();

        let snapshot = match args.kind {
            EntityKind::Houses => self.fetch_pages(args.kind, args.house_filter(), limit).await?,
            EntityKind::Clients => self.fetch_pages(args.kind, args.client_filter(), limit).await?,
            EntityKind::Applications => {
                self.fetch_pages(args.kind, args.application_filter(), limit)
                    .await?
            }
            EntityKind::Projects | EntityKind::Packages | EntityKind::Users => {
                self.fetch_pages(args.kind, NoFilter, limit).await?
            }
        };

        self.print_rows(args.kind, &snapshot)
    }

    /// Loads page 0 and continues until `max_pages` or the end of the data.
    async fn fetch_pages<F: ListFilter>(
        &self,
        kind: EntityKind,
        filter: F,
        max_pages: Option<u32>,
    ) -> Result<ListSnapshot<Record>, CommandError> {
        let source = Arc::new(EntitySource::<F>::new(self.client.clone(), kind));
        let list = PaginatedList::new(source, self.page_size);

        list.reset(filter).await?;
        let mut pages = 1;
        while list.has_next() && max_pages.is_none_or(|max| pages < max) {
            if !matches!(list.load_more().await?, LoadOutcome::Applied { .. }) {
                break;
            }
            pages += 1;
        }

        Ok(list.snapshot())
    }

    async fn catalog(&mut self, tab: CatalogTabArg, pages: u32) -> Result<(), CommandError> {
        self.require_user()?;
        let catalog = HouseCatalog::new(&self.client, self.page_size);
        let tab = match tab {
            CatalogTabArg::Houses => CatalogTab::Houses,
            CatalogTabArg::Packages => CatalogTab::Packages,
        };

        catalog.select(tab).await?;
        for _ in 1..pages.max(1) {
            // Each simulated scroll hides and then reveals the end marker.
            catalog.on_scroll_end(false).await?;
            if !matches!(catalog.on_scroll_end(true).await?, LoadOutcome::Applied { .. }) {
                break;
            }
        }

        match tab {
            CatalogTab::Houses => self.print_rows(EntityKind::Houses, &catalog.houses().snapshot()),
            CatalogTab::Packages => {
                self.print_rows(EntityKind::Packages, &catalog.packages().snapshot())
            }
        }
    }

    async fn reset_password(&mut self, id: &EntityId) -> Result<(), CommandError> {
        self.require_super_manager("resetting passwords")?;
        let reset = self.client.reset_password(id).await?;
        writeln!(self.out, "New password for manager {id}: {}", reset.password.as_str())?;
        Ok(())
    }

    async fn create_manager(
        &mut self,
        username: String,
        role: RoleArg,
    ) -> Result<(), CommandError> {
        self.require_super_manager("creating managers")?;
        let created = self
            .client
            .create_manager(&NewManager::new(username, Role::from(role)))
            .await?;
        writeln!(
            self.out,
            "Created manager {} ({}), initial password: {}",
            created.user.username(),
            created.user.role(),
            created.password.as_str()
        )?;
        Ok(())
    }

    fn print_rows(
        &mut self,
        kind: EntityKind,
        snapshot: &ListSnapshot<Record>,
    ) -> Result<(), CommandError> {
        if snapshot.items.is_empty() {
            writeln!(self.out, "No {} rows", kind.label())?;
            return Ok(());
        }

        for record in &snapshot.items {
            writeln!(self.out, "{}", summarize(record))?;
        }
        writeln!(self.out, "{}", footer(snapshot.items.len(), &snapshot.cursor))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::AuthToken;
    use crate::domain::ports::ApiResponse;
    use crate::domain::ports::mocks::{MockAuthPort, MockTokenStorage, MockTransport};
    use crate::infrastructure::config::CliArgs;
    use clap::Parser;
    use serde_json::json;

    struct Fixture {
        auth: Arc<MockAuthPort>,
        storage: Arc<MockTokenStorage>,
        transport: Arc<MockTransport>,
        runner: CommandRunner<Vec<u8>>,
    }

    impl Fixture {
        fn new(stored: Option<&str>) -> Self {
            let auth = Arc::new(MockAuthPort::new());
            let storage = Arc::new(match stored {
                Some(token) => MockTokenStorage::with_token(AuthToken::new_unchecked(token)),
                None => MockTokenStorage::new(),
            });
            let transport = Arc::new(MockTransport::new());
            let redirect = Arc::new(LoginRedirect::new());
            let guard = Arc::new(SessionGuard::new(
                auth.clone(),
                storage.clone(),
                transport.clone(),
                redirect.clone(),
            ));
            Self {
                auth,
                storage,
                transport,
                runner: CommandRunner::new(guard, redirect, 10, Vec::new()),
            }
        }

        async fn run(&mut self, argv: &[&str]) -> Result<Completion, CommandError> {
            let argv = std::iter::once("estate-admin").chain(argv.iter().copied());
            let args = CliArgs::parse_from(argv);
            self.runner.run(args.command).await
        }

        fn output(self) -> String {
            String::from_utf8(self.runner.into_output()).unwrap()
        }
    }

    fn page(ids: std::ops::RangeInclusive<u64>, offset: u64, total: u64) -> ApiResponse {
        let rows: Vec<_> = ids.map(|id| json!({"id": id, "name": format!("House {id}")})).collect();
        ApiResponse::json_value(
            200,
            &json!({"data": rows, "pagination": {"offset": offset, "limit": 10, "total": total}}),
        )
    }

    #[tokio::test]
    async fn test_list_fetches_requested_pages() {
        let mut fx = Fixture::new(Some("mock_token_2_0"));
        fx.transport.push(Ok(page(1..=10, 0, 25)));
        fx.transport.push(Ok(page(11..=20, 10, 25)));

        let done = fx
            .run(&["list", "houses", "--pages", "2", "--status", "available"])
            .await
            .unwrap();

        assert_eq!(done, Completion::Done);
        let offsets: Vec<String> = fx
            .transport
            .requests()
            .iter()
            .filter_map(|r| r.query.iter().find(|(k, _)| k == "offset").map(|(_, v)| v.clone()))
            .collect();
        assert_eq!(offsets, vec!["0", "10"]);

        let output = fx.output();
        assert!(output.contains("#1  name=House 1"));
        assert!(output.contains("#20  name=House 20"));
        assert!(output.ends_with("20 of 25 shown, more available\n"));
    }

    #[tokio::test]
    async fn test_list_all_stops_at_end() {
        let mut fx = Fixture::new(Some("mock_token_2_0"));
        fx.transport.push(Ok(page(1..=10, 0, 15)));
        fx.transport.push(Ok(page(11..=15, 10, 15)));

        fx.run(&["list", "houses", "--all"]).await.unwrap();

        assert_eq!(fx.transport.requests().len(), 2);
        assert!(fx.output().ends_with("15 of 15 shown\n"));
    }

    #[tokio::test]
    async fn test_unauthorized_redirects_once() {
        let mut fx = Fixture::new(Some("mock_token_1_0"));
        fx.transport
            .respond_with(ApiResponse::json_value(401, &json!({"error": "expired"})));

        let done = fx.run(&["catalog", "--pages", "3"]).await.unwrap();

        assert_eq!(done, Completion::RedirectedToLogin);
        assert!(fx.storage.stored().await.is_none());
        let output = fx.output();
        assert_eq!(output.matches("Session expired").count(), 1);
    }

    #[tokio::test]
    async fn test_manager_cannot_reset_passwords() {
        let mut fx = Fixture::new(Some("mock_token_2_0"));

        let err = fx.run(&["reset-password", "3"]).await.unwrap_err();

        assert!(matches!(err, CommandError::Forbidden { .. }));
        assert!(fx.transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_super_manager_resets_password() {
        let mut fx = Fixture::new(Some("mock_token_1_0"));
        fx.transport
            .respond_with(ApiResponse::json_value(200, &json!({"password": "n3w-Pass"})));

        fx.run(&["reset-password", "3"]).await.unwrap();

        assert_eq!(fx.output(), "New password for manager 3: n3w-Pass\n");
    }

    #[tokio::test]
    async fn test_whoami_without_session() {
        let mut fx = Fixture::new(None);

        let err = fx.run(&["whoami"]).await.unwrap_err();

        assert!(matches!(err, CommandError::NotSignedIn));
        assert_eq!(fx.auth.verify_calls(), 0);
    }

    #[tokio::test]
    async fn test_login_persists_and_skips_verify() {
        let mut fx = Fixture::new(None);

        fx.run(&["login", "manager", "--password", "password"])
            .await
            .unwrap();

        assert_eq!(fx.auth.verify_calls(), 0);
        assert!(fx.storage.stored().await.is_some());
        assert_eq!(fx.output(), "Signed in as manager (manager)\n");
    }

    #[tokio::test]
    async fn test_rejected_login_is_an_error() {
        let mut fx = Fixture::new(None);

        let err = fx
            .run(&["login", "manager", "--password", "nope"])
            .await
            .unwrap_err();

        assert!(matches!(err, CommandError::Auth(AuthError::InvalidCredentials { .. })));
    }

    #[tokio::test]
    async fn test_not_found_propagates() {
        let mut fx = Fixture::new(Some("mock_token_2_0"));
        fx.transport
            .respond_with(ApiResponse::json_value(404, &json!({"error": "Client not found"})));

        let err = fx.run(&["show", "clients", "77"]).await.unwrap_err();

        assert_eq!(err.to_string(), "not found: Client not found");
    }
}
