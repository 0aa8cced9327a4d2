use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use reqwest::Client;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use beget_ddns::config::Settings;
use beget_ddns::dns::{BegetProvider, Credentials};
use beget_ddns::ip::ExternalIpResolver;
use beget_ddns::reconcile;

#[derive(Parser)]
#[command(name = "beget-ddns")]
#[command(about = "Dynamic DNS updater - keeps Beget A records in sync with the public IPv4 address")]
#[command(version)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Update every stale A record (default)
    Run,

    /// Show the public IP and current A records without changing anything
    Check,

    /// Show configuration file location and contents
    Config,
}

fn init_logging(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let config_path = cli.config.unwrap_or_else(Settings::config_path);

    let settings = Settings::load(&config_path);

    let log_level = settings
        .as_ref()
        .map(|s| s.log_level.as_str())
        .unwrap_or("info");
    init_logging(log_level);

    let outcome = match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => match settings {
            Ok(settings) => update_records(&settings).await,
            Err(e) => Err(e.into()),
        },
        Commands::Check => match settings {
            Ok(settings) => check_status(&settings).await,
            Err(e) => Err(e.into()),
        },
        Commands::Config => {
            if let Some(problem) = load_warning(&config_path, &settings) {
                warn!("{}", problem);
            }
            show_config(&config_path, settings.ok().as_ref())
        }
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn build_client(settings: &Settings) -> Result<Client> {
    Client::builder()
        .timeout(settings.network.timeout())
        .build()
        .context("Failed to create HTTP client")
}

fn build_provider(client: Client, settings: &Settings) -> BegetProvider {
    let credentials = Credentials {
        login: settings.login.clone(),
        password: settings.password.clone(),
    };

    BegetProvider::with_api_base(client, credentials, &settings.network.api_url)
}

async fn update_records(settings: &Settings) -> Result<()> {
    let client = build_client(settings)?;
    let resolver = ExternalIpResolver::new(client.clone(), &settings.network.ip_echo_url);
    let provider = build_provider(client, settings);

    let summary = reconcile::run(&resolver, &provider, &settings.domains).await?;

    info!(
        "all records updated successfully ({} updated, {} unchanged)",
        summary.updated.len(),
        summary.unchanged.len()
    );

    Ok(())
}

async fn check_status(settings: &Settings) -> Result<()> {
    let client = build_client(settings)?;
    let resolver = ExternalIpResolver::new(client.clone(), &settings.network.ip_echo_url);
    let provider = build_provider(client, settings);

    println!("Checking {} ...\n", resolver.url());

    let (address, statuses) =
        reconcile::check(&resolver, &provider, &settings.domains).await?;

    println!("Outside IP: {}\n", address);

    for status in statuses {
        let state = if status.in_sync { "in sync" } else { "stale" };
        println!("{}: {} ({})", status.domain, status.current, state);
    }

    Ok(())
}

/// Reason an existing config file could not be used.
fn load_warning(
    config_path: &Path,
    settings: &beget_ddns::Result<Settings>,
) -> Option<String> {
    match settings {
        Err(e) if config_path.exists() => Some(e.to_string()),
        _ => None,
    }
}

fn show_config(config_path: &Path, settings: Option<&Settings>) -> Result<()> {
    println!("Configuration file location: {}\n", config_path.display());

    match settings {
        Some(s) => {
            println!("Current configuration:\n");
            println!("{}", toml::to_string_pretty(&s.redacted())?);
        }
        None => {
            println!("Configuration file not found or invalid.");
            println!("\nCreate a configuration file at the location above.");
            println!("Example configuration:\n");
            println!(
                r#"login = "beget-login"
password = "beget-api-password"
domains = ["example.com", "www.example.com"]
log_level = "info"

[network]
ip_echo_url = "http://ident.me"
api_url = "https://api.beget.com/api"
timeout_seconds = 30
"#
            );
        }
    }

    Ok(())
}
