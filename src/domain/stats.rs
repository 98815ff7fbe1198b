//! Running scan statistics

use serde::Serialize;

/// Tally for a single scan cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CycleReport {
    /// Tokens returned by the fetch
    pub scanned: usize,
    /// Tokens skipped because their address was already reported
    pub duplicates: usize,
    /// Tokens reported as matches
    pub matches: usize,
    /// Tokens that failed a hard filter
    pub rejected: usize,
    /// Tokens scored but below `min_score`
    pub below_threshold: usize,
}

/// Monotonic counters for the whole session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanStats {
    pub total_scanned: u64,
    pub total_matches: u64,
    pub total_duplicates: u64,
    pub cycles_completed: u64,
    /// Cycles that errored or panicked and were treated as empty
    pub cycles_failed: u64,
}

impl ScanStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a completed cycle into the session totals
    pub fn record_cycle(&mut self, report: &CycleReport) {
        self.total_scanned += report.scanned as u64;
        self.total_matches += report.matches as u64;
        self.total_duplicates += report.duplicates as u64;
        self.cycles_completed += 1;
    }

    pub fn record_failed_cycle(&mut self) {
        self.cycles_failed += 1;
    }
}
