//! Token Scout - DexScreener new-listing scanner for Solana
//!
//! Scans newly listed Solana pairs and shows high-scoring tokens on a live
//! terminal dashboard.

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::{fmt, EnvFilter};

use token_scout::adapters::cli::{self, CheckConfigCmd, Command, RunCmd};
use token_scout::adapters::dashboard::{DashboardConfig, TerminalDashboard};
use token_scout::adapters::dexscreener::{DexScreenerClient, DexScreenerConfig};
use token_scout::application::{ScanLoopConfig, ScanOrchestrator, ShutdownSignal};
use token_scout::config::{load_config, Config, LoggingSection};
use token_scout::domain::ScoringConfig;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load .env file if it exists (DEXSCREENER_API_URL override goes here)
    dotenvy::dotenv().ok();

    let app = cli::init();

    match app.command {
        Command::Run(cmd) => run_command(cmd, app.verbose, app.debug).await,
        Command::CheckConfig(cmd) => check_config_command(cmd, app.verbose, app.debug),
    }
}

fn init_logging(logging: &LoggingSection, verbose: bool, debug: bool) -> Result<()> {
    let level = if debug {
        "debug"
    } else if verbose {
        "info"
    } else {
        logging.level.as_str()
    };

    // RUST_LOG wins over flags and config
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match &logging.log_file {
        Some(path) => {
            let path = PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned());
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create log directory {}", parent.display())
                })?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;

            fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

fn load(path: &std::path::Path) -> Result<Config> {
    load_config(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))
}

async fn run_command(cmd: RunCmd, verbose: bool, debug: bool) -> Result<()> {
    let config = load(&cmd.config)?;
    init_logging(&config.logging, verbose, debug)?;

    tracing::info!("Starting token scout...");

    // Build components
    let client = DexScreenerClient::new(DexScreenerConfig::from(&config))
        .context("Failed to create DexScreener client")?;
    let dashboard = TerminalDashboard::new(DashboardConfig::from(&config))
        .with_clear_screen(!cmd.no_clear);

    let mut scanner = ScanOrchestrator::new(
        client,
        dashboard,
        ScoringConfig::from(&config),
        ScanLoopConfig::from(&config),
    );

    // Ctrl+C only flips the flag; the loop stops at its next boundary
    let shutdown = ShutdownSignal::new();
    let signal = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("Received Ctrl+C, shutting down...");
                signal.request();
            }
            Err(e) => tracing::error!("Failed to listen for Ctrl+C: {}", e),
        }
    });

    let stats = scanner.run(&shutdown).await;

    tracing::info!(
        "Token scout stopped - scanned: {}, matches: {}, duplicates: {}",
        stats.total_scanned,
        stats.total_matches,
        stats.total_duplicates
    );
    Ok(())
}

fn check_config_command(cmd: CheckConfigCmd, verbose: bool, debug: bool) -> Result<()> {
    let config = load(&cmd.config)?;
    init_logging(&config.logging, verbose, debug)?;

    let rendered = toml::to_string_pretty(&config).context("Failed to render configuration")?;

    println!("Configuration OK: {}", cmd.config.display());
    println!();
    println!("{}", rendered);
    println!("Effective API URL: {}", DexScreenerConfig::from(&config).listings_url());
    Ok(())
}
