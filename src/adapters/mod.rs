//! Adapters Layer
//!
//! Concrete implementations of the ports:
//! - DexScreener: listings source over HTTP
//! - Dashboard: terminal reporter
//! - CLI: command-line argument parsing

pub mod cli;
pub mod dashboard;
pub mod dexscreener;
