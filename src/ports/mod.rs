//! Ports Layer - Trait definitions for external dependencies
//!
//! This module defines the interfaces (ports) that adapters must implement.
//! Following hexagonal architecture, these traits abstract:
//! - Listing feeds (DexScreener new pairs)
//! - Reporting sinks (terminal dashboard)

pub mod market_data;
pub mod reporter;
pub mod mocks;

pub use market_data::ListingSource;
pub use reporter::{ReportError, ScanEvent, ScanReporter};
