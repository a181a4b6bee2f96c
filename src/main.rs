use std::io::{BufRead, Write};
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use estate_admin::application::services::SessionGuard;
use estate_admin::infrastructure::{
    AppConfig, BackendClient, CliArgs, Command, StorageManager, build_token_storage,
};
use estate_admin::presentation::{CommandRunner, Completion, LoginRedirect};

/// Exit status when the backend ended the session mid-command.
const EXIT_SIGNED_OUT: u8 = 2;

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    if let Some(log_path) = &config.log_path {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)
            .wrap_err_with(|| format!("cannot open log file {}", log_path.display()))?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        info!(path = %log_path.display(), "Logging initialized");
    } else {
        let stderr_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .compact();

        tracing_subscriber::registry()
            .with(filter)
            .with(stderr_layer)
            .init();
    }

    Ok(())
}

async fn prompt_password() -> Result<String> {
    let password = tokio::task::spawn_blocking(|| -> std::io::Result<String> {
        let mut stderr = std::io::stderr();
        write!(stderr, "Password: ")?;
        stderr.flush()?;

        let mut line = String::new();
        std::io::stdin().lock().read_line(&mut line)?;
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    })
    .await??;

    Ok(password)
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();

    let mut args = CliArgs::parse();

    let storage_manager = StorageManager::new()?;
    let mut config = storage_manager.load_config(args.config.as_deref())?;
    config.merge_with_args(&args);

    init_logging(&config)?;
    info!(version = estate_admin::VERSION, api_url = %config.api_url, "Starting estate-admin");

    if let Command::Login { password, .. } = &mut args.command {
        if password.is_none() {
            *password = Some(prompt_password().await?);
        }
    }

    let backend = Arc::new(BackendClient::with_base_url(
        config.api_url.as_str(),
        config.request_timeout(),
    )?);
    let token_storage = build_token_storage(config.token_store, storage_manager.data_dir());
    let redirect = Arc::new(LoginRedirect::new());
    let guard = Arc::new(SessionGuard::new(
        backend.clone(),
        token_storage,
        backend,
        redirect.clone(),
    ));

    let mut runner = CommandRunner::new(
        guard,
        redirect,
        config.effective_page_size(),
        std::io::stdout().lock(),
    );

    match runner.run(args.command).await? {
        Completion::Done => Ok(ExitCode::SUCCESS),
        Completion::RedirectedToLogin => Ok(ExitCode::from(EXIT_SIGNED_OUT)),
    }
}
