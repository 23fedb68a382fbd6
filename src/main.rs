mod commands;
mod render;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use datebook_core::config::DatebookConfig;
use datebook_core::{
    AppointmentKind, DateKey, LocalStore, RemoteStore, StoreBackend, SyncController, YearMonth,
};

#[derive(Parser)]
#[command(name = "datebook")]
#[command(about = "Browse a month calendar and manage appointments")]
struct Cli {
    /// Use this datebook-server instead of the configured one
    #[arg(long, global = true, conflicts_with = "local")]
    server: Option<String>,

    /// Keep appointments in memory, ignoring any configured server
    #[arg(long, global = true)]
    local: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a month with its appointments
    Show {
        /// Month to show (YYYY-MM), defaults to the configured start month
        month: Option<YearMonth>,
    },
    /// Add an appointment
    Add {
        /// Date (YYYY-MM-DD)
        date: DateKey,

        #[arg(short, long)]
        title: Option<String>,

        /// 24-hour time (HH:MM)
        #[arg(long)]
        time: Option<String>,

        /// medical, class, personal or general
        #[arg(short = 'k', long = "type")]
        kind: Option<AppointmentKind>,
    },
    /// Delete an appointment by id
    Delete { id: String },
    /// Show configuration, optionally changing the server
    Config {
        /// Save this server URL to the config file
        #[arg(long, conflicts_with = "clear_server")]
        set_server: Option<String>,

        /// Remove the server URL from the config file
        #[arg(long)]
        clear_server: bool,
    },
    /// Navigate months interactively
    Browse,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = DatebookConfig::load().context("Failed to load configuration")?;

    let server = cli.server.as_deref();

    match cli.command {
        Commands::Show { month } => {
            let controller = open(&config, server, cli.local)?;
            commands::show::run(&controller, month).await
        }
        Commands::Add {
            date,
            title,
            time,
            kind,
        } => {
            let controller = open(&config, server, cli.local)?;
            commands::add::run(&controller, date, title, time, kind).await
        }
        Commands::Delete { id } => {
            let controller = open(&config, server, cli.local)?;
            commands::delete::run(&controller, id).await
        }
        Commands::Config {
            set_server,
            clear_server,
        } => commands::config::run(config, set_server, clear_server),
        Commands::Browse => {
            let controller = open(&config, server, cli.local)?;
            commands::browse::run(&controller).await
        }
    }
}

/// Log to stderr so rendered output stays clean; `RUST_LOG` overrides.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn open(
    config: &DatebookConfig,
    server: Option<&str>,
    local: bool,
) -> Result<SyncController<StoreBackend>> {
    let store = if local {
        StoreBackend::Local(LocalStore::new())
    } else if let Some(url) = server {
        StoreBackend::Remote(RemoteStore::new(url, config.request_timeout())?)
    } else {
        config.store()?
    };
    tracing::debug!(store = %store.describe(), "using store");

    Ok(SyncController::new(store, config.bootstrap_month))
}
