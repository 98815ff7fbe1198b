//! Reporting port
//!
//! Sink for everything the scan loop surfaces: matches, per-cycle statistics,
//! the countdown to the next cycle, and the end-of-session summary.

use thiserror::Error;

use crate::domain::{Score, ScanStats, Token};

/// Reporting sink errors
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Terminal I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Sink closed")]
    Closed,
}

/// Events emitted by the scan loop, in cycle order
#[derive(Debug, Clone, PartialEq)]
pub enum ScanEvent {
    /// A token passed scoring and had not been reported before
    Match { token: Token, score: Score },
    /// End-of-cycle deltas
    Stats { scanned: usize, duplicates: usize },
    /// One tick of the wait between cycles
    Countdown { remaining_secs: u64 },
}

/// Receiver for scan loop output
///
/// Called synchronously from the loop; a returned error fails the current
/// cycle (or is logged, for countdown ticks) but never stops the loop.
pub trait ScanReporter: Send {
    fn report(&mut self, event: &ScanEvent) -> Result<(), ReportError>;

    /// Final session summary, called once after the loop stops
    fn finish(&mut self, stats: &ScanStats) -> Result<(), ReportError>;
}
