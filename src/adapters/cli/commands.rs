//! CLI Commands
//!
//! Argument definitions for the token-scout binary.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Default configuration file location
pub const DEFAULT_CONFIG_PATH: &str = "config/scout.toml";

/// Token Scout - new-listing scanner for Solana tokens on DexScreener
#[derive(Parser, Debug)]
#[command(
    name = "token-scout",
    version = env!("CARGO_PKG_VERSION"),
    author = env!("CARGO_PKG_AUTHORS"),
    about = "New-listing scanner for Solana tokens on DexScreener",
    long_about = "Token Scout polls DexScreener for newly listed Solana pairs, drops unsafe \
                  listings with hard liquidity and trader filters, scores the rest on age, \
                  volume and momentum, and shows each match once on a live terminal dashboard."
)]
pub struct CliApp {
    /// The command to execute
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the scan loop with the live dashboard
    Run(RunCmd),

    /// Validate a configuration file and print the effective settings
    CheckConfig(CheckConfigCmd),
}

/// Start scan loop
#[derive(Parser, Debug)]
pub struct RunCmd {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Print matches without clearing the screen between redraws
    #[arg(long)]
    pub no_clear: bool,
}

/// Validate configuration
#[derive(Parser, Debug)]
pub struct CheckConfigCmd {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,
}
