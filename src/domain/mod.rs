//! Domain Layer - Core scanning logic
//!
//! Pure types and rules with no I/O:
//! - `token`: normalized listing record
//! - `scoring`: hard filters and weighted composite score
//! - `dedup`: session-scoped set of already reported addresses
//! - `stats`: per-cycle and running counters

pub mod token;
pub mod scoring;
pub mod dedup;
pub mod stats;

pub use token::Token;
pub use scoring::{Evaluation, RejectReason, Score, ScoringConfig, ScoringEngine};
pub use dedup::DedupCache;
pub use stats::{CycleReport, ScanStats};
