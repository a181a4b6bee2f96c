use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use super::app_config::{LogLevel, TokenStoreKind};
use crate::domain::entities::{
    ApplicationFilter, ClientFilter, EntityId, EntityKind, HouseFilter, Role,
};

#[derive(Debug, Parser)]
#[command(
    name = "estate-admin",
    version,
    about = "Back-office client for the real-estate sales backend",
    long_about = None
)]
/// Command-line arguments.
pub struct CliArgs {
    /// Configuration file path.
    #[arg(short, long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Backend base URL, including the `/api` prefix.
    #[arg(long, env = "ESTATE_ADMIN_API_URL", value_name = "URL", global = true)]
    pub api_url: Option<String>,

    /// Rows per page.
    #[arg(long, global = true)]
    pub page_size: Option<u64>,

    /// HTTP request timeout in seconds.
    #[arg(long, global = true)]
    pub request_timeout_secs: Option<u64>,

    /// Where to keep the session token.
    #[arg(long, value_enum, global = true)]
    pub token_store: Option<TokenStoreKind>,

    /// Log file path.
    #[arg(long, value_name = "PATH", global = true)]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum, global = true)]
    pub log_level: Option<LogLevel>,

    /// Command to run.
    #[command(subcommand)]
    pub command: Command,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in and remember the session.
    Login {
        username: String,
        /// Read from stdin when omitted.
        #[arg(long, env = "ESTATE_ADMIN_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Forget the stored session.
    Logout,
    /// Show the signed-in user.
    Whoami,
    /// List rows of an entity kind.
    List(ListArgs),
    /// Browse the house catalog tabs with infinite scroll.
    Catalog {
        #[arg(long, value_enum, default_value_t = CatalogTabArg::Houses)]
        tab: CatalogTabArg,
        /// Pages to scroll through.
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
    /// Show a single row as JSON.
    Show {
        #[arg(value_parser = parse_kind)]
        kind: EntityKind,
        #[arg(value_parser = parse_id)]
        id: EntityId,
    },
    /// Delete a row.
    Delete {
        #[arg(value_parser = parse_kind)]
        kind: EntityKind,
        #[arg(value_parser = parse_id)]
        id: EntityId,
    },
    /// Generate a new password for a manager.
    ResetPassword {
        #[arg(value_parser = parse_id)]
        id: EntityId,
    },
    /// Create a manager account with a generated password.
    CreateManager {
        username: String,
        #[arg(long, value_enum, default_value_t = RoleArg::Manager)]
        role: RoleArg,
    },
}

/// Arguments of `list`.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Entity kind: projects, houses, packages, clients, applications or managers.
    #[arg(value_parser = parse_kind)]
    pub kind: EntityKind,

    /// Pages to fetch.
    #[arg(long, default_value_t = 1)]
    pub pages: u32,

    /// Fetch until the backend reports no further rows.
    #[arg(long, conflicts_with = "pages")]
    pub all: bool,

    /// Status filter (houses, applications).
    #[arg(long)]
    pub status: Option<String>,
    /// Free-text search (houses, clients).
    #[arg(long)]
    pub search: Option<String>,
    /// Project filter (houses, applications).
    #[arg(long)]
    pub project_id: Option<String>,
    /// Client filter (applications).
    #[arg(long)]
    pub client_id: Option<String>,
    /// House filter (applications).
    #[arg(long)]
    pub house_id: Option<String>,
    /// Manager filter (applications).
    #[arg(long)]
    pub manager_id: Option<String>,
}

impl ListArgs {
    #[must_use]
    pub fn house_filter(&self) -> HouseFilter {
        HouseFilter {
            project_id: self.project_id.clone().unwrap_or_default(),
            status: self.status.clone().unwrap_or_default(),
            search: self.search.clone().unwrap_or_default(),
        }
    }

    #[must_use]
    pub fn client_filter(&self) -> ClientFilter {
        ClientFilter {
            search: self.search.clone().unwrap_or_default(),
        }
    }

    #[must_use]
    pub fn application_filter(&self) -> ApplicationFilter {
        ApplicationFilter {
            status: self.status.clone().unwrap_or_default(),
            client_id: self.client_id.clone().unwrap_or_default(),
            house_id: self.house_id.clone().unwrap_or_default(),
            project_id: self.project_id.clone().unwrap_or_default(),
            manager_id: self.manager_id.clone().unwrap_or_default(),
        }
    }

    /// Page count to fetch; `None` means everything.
    #[must_use]
    pub fn page_limit(&self) -> Option<u32> {
        (!self.all).then_some(self.pages.max(1))
    }
}

/// Catalog tab selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CatalogTabArg {
    Houses,
    Packages,
}

/// Role of a new manager account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RoleArg {
    Manager,
    SuperManager,
}

impl From<RoleArg> for Role {
    fn from(value: RoleArg) -> Self {
        match value {
            RoleArg::Manager => Self::Manager,
            RoleArg::SuperManager => Self::SuperManager,
        }
    }
}

fn parse_kind(s: &str) -> Result<EntityKind, String> {
    s.parse()
}

fn parse_id(s: &str) -> Result<EntityId, String> {
    s.parse()
}
