//! newtab CLI - drive the newtab client from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Sign in (password may also come from NEWTAB_PASSWORD)
//! newtab login -e me@example.com
//!
//! # Run the staging gate and route guard for a page
//! newtab navigate /settings
//!
//! # Unlock a staging deployment
//! newtab staging-login
//!
//! # Build a search URL with the configured engine
//! newtab search "rust async traits"
//! ```
//!
//! # Commands
//!
//! - `login` / `register` / `logout` - Manage the persisted session
//! - `whoami` - Show the signed-in user's profile
//! - `links` - List the signed-in user's quick-links
//! - `navigate` - Resolve a navigation through the staging gate and route guard
//! - `staging-login` - Unlock a staging deployment
//! - `engines` / `search` / `suggest` - Search helpers

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use newtab_client::ClientConfig;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "newtab")]
#[command(author, version, about = "newtab client tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in with email and password
    Login {
        #[arg(short, long)]
        email: String,

        #[arg(short, long, env = "NEWTAB_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account and sign in
    Register {
        #[arg(short, long)]
        email: String,

        #[arg(short, long, env = "NEWTAB_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Sign out and forget the persisted session
    Logout,
    /// Show the signed-in user's profile
    Whoami,
    /// List the signed-in user's quick-links
    Links,
    /// Resolve a navigation to a page path (e.g. `/settings`)
    Navigate { path: String },
    /// Unlock a staging deployment
    StagingLogin {
        #[arg(short, long, env = "NEWTAB_STAGING_PASSWORD_INPUT", hide_env_values = true)]
        password: String,
    },
    /// List the built-in search engines
    Engines,
    /// Build the search URL for a query
    Search {
        query: String,

        /// Engine name; defaults to the user's preference when signed in
        #[arg(short, long)]
        engine: Option<String>,
    },
    /// Fetch search suggestions for a partial query
    Suggest { query: String },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ClientConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    Some(sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    )))
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "newtab=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Sentry must be initialized before the subscriber
    let config = ClientConfig::from_env();
    let _sentry_guard = config.as_ref().ok().and_then(init_sentry);
    init_tracing();

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    match run(cli, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Command failed: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, config: &ClientConfig) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Login { email, password } => {
            commands::session::login(config, &email, password).await?;
        }
        Commands::Register { email, password } => {
            commands::session::register(config, &email, password).await?;
        }
        Commands::Logout => commands::session::logout(config)?,
        Commands::Whoami => commands::session::whoami(config).await?,
        Commands::Links => commands::session::links(config).await?,
        Commands::Navigate { path } => commands::navigate::navigate(config, &path).await?,
        Commands::StagingLogin { password } => {
            commands::navigate::staging_login(config, &password)?;
        }
        Commands::Engines => commands::search::engines(),
        Commands::Search { query, engine } => {
            commands::search::search(config, &query, engine.as_deref()).await?;
        }
        Commands::Suggest { query } => commands::search::suggest(config, &query).await?,
    }
    Ok(())
}
