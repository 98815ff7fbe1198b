//! Scan Orchestrator
//!
//! Drives the Scanning → Waiting → Scanning cycle until shutdown:
//! fetch a batch, skip already-reported tokens, score the rest, report
//! matches, then count down to the next cycle one second at a time.
//!
//! A cycle that errors or panics is logged, counted as failed and treated
//! as empty. Nothing inside a cycle terminates the loop.

use std::panic::AssertUnwindSafe;
use std::time::Duration;
use futures_util::FutureExt;
use thiserror::Error;
use tracing::{debug, error, info};

use super::shutdown::ShutdownSignal;
use crate::domain::{CycleReport, DedupCache, Evaluation, ScanStats, ScoringConfig, ScoringEngine};
use crate::ports::{ListingSource, ReportError, ScanEvent, ScanReporter};

/// Loop configuration
#[derive(Debug, Clone)]
pub struct ScanLoopConfig {
    /// Time between the end of one cycle and the start of the next
    pub scan_interval: Duration,
}

impl Default for ScanLoopConfig {
    fn default() -> Self {
        Self {
            scan_interval: Duration::from_secs(30),
        }
    }
}

/// Failure inside a single scan cycle
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Reporter error: {0}")]
    Report(#[from] ReportError),

    #[error("Scan cycle panicked: {0}")]
    Panicked(String),
}

/// Loop state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Scanning,
    Waiting,
    Stopped,
}

/// Owns the scoring engine, dedup cache and running statistics for one
/// process lifetime
pub struct ScanOrchestrator<S, R> {
    source: S,
    reporter: R,
    engine: ScoringEngine,
    dedup: DedupCache,
    stats: ScanStats,
    config: ScanLoopConfig,
}

impl<S: ListingSource, R: ScanReporter> ScanOrchestrator<S, R> {
    pub fn new(source: S, reporter: R, scoring: ScoringConfig, config: ScanLoopConfig) -> Self {
        Self {
            source,
            reporter,
            engine: ScoringEngine::new(scoring),
            dedup: DedupCache::new(),
            stats: ScanStats::new(),
            config,
        }
    }

    pub fn stats(&self) -> &ScanStats {
        &self.stats
    }

    pub fn dedup(&self) -> &DedupCache {
        &self.dedup
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    /// Run until `shutdown` is observed, then hand the final statistics to
    /// the reporter and return them
    pub async fn run(&mut self, shutdown: &ShutdownSignal) -> ScanStats {
        info!(
            "Starting scan loop - source: {}, interval: {:?}, min score: {}",
            self.source.name(),
            self.config.scan_interval,
            self.engine.config().min_score
        );

        let mut state = LoopState::Scanning;
        loop {
            state = match state {
                LoopState::Scanning => {
                    if shutdown.is_requested() {
                        LoopState::Stopped
                    } else {
                        self.run_cycle().await;
                        LoopState::Waiting
                    }
                }
                LoopState::Waiting => self.wait_for_next_cycle(shutdown).await,
                LoopState::Stopped => break,
            };
        }

        info!(
            "Scan loop stopped after {} cycles ({} failed)",
            self.stats.cycles_completed, self.stats.cycles_failed
        );

        if let Err(e) = self.reporter.finish(&self.stats) {
            error!("Failed to write session summary: {}", e);
        }
        self.stats.clone()
    }

    /// Run one cycle, containing any error or panic
    pub async fn run_cycle(&mut self) -> Option<CycleReport> {
        let outcome = AssertUnwindSafe(self.scan_once()).catch_unwind().await;

        let result = match outcome {
            Ok(result) => result,
            Err(panic) => Err(ScanError::Panicked(panic_message(panic.as_ref()))),
        };

        match result {
            Ok(report) => Some(report),
            Err(e) => {
                error!("Scan cycle failed: {}", e);
                self.stats.record_failed_cycle();
                None
            }
        }
    }

    /// One fetch-score-report pass
    ///
    /// Statistics are only committed once the whole batch has been reported.
    pub async fn scan_once(&mut self) -> Result<CycleReport, ScanError> {
        let tokens = self.source.fetch().await;
        let mut report = CycleReport {
            scanned: tokens.len(),
            ..CycleReport::default()
        };

        for token in tokens {
            if self.dedup.has_seen(&token.address) {
                report.duplicates += 1;
                continue;
            }

            match self.engine.evaluate(&token) {
                Evaluation::Rejected(reason) => {
                    debug!("Rejected {} ({}): {}", token.symbol, token.address, reason);
                    report.rejected += 1;
                }
                Evaluation::Scored(score) if score.passed => {
                    info!(
                        "Match: {} ({}) score {}",
                        token.symbol, token.address, score.total
                    );
                    self.dedup.mark_seen(token.address.clone());
                    report.matches += 1;
                    self.reporter.report(&ScanEvent::Match { token, score })?;
                }
                Evaluation::Scored(score) => {
                    debug!(
                        "Below threshold {} ({}): score {}",
                        token.symbol, token.address, score.total
                    );
                    report.below_threshold += 1;
                }
            }
        }

        self.reporter.report(&ScanEvent::Stats {
            scanned: report.scanned,
            duplicates: report.duplicates,
        })?;

        self.stats.record_cycle(&report);
        info!(
            "Cycle complete - scanned: {}, matches: {}, duplicates: {}, rejected: {}, below threshold: {}",
            report.scanned, report.matches, report.duplicates, report.rejected, report.below_threshold
        );
        Ok(report)
    }

    /// Count down the scan interval, one tick per second
    pub async fn wait_for_next_cycle(&mut self, shutdown: &ShutdownSignal) -> LoopState {
        for remaining_secs in (1..=self.config.scan_interval.as_secs()).rev() {
            if shutdown.is_requested() {
                return LoopState::Stopped;
            }
            if let Err(e) = self.reporter.report(&ScanEvent::Countdown { remaining_secs }) {
                error!("Failed to report countdown: {}", e);
            }
            tokio::time::sleep(Duration::from_secs(1)).await;
        }

        if shutdown.is_requested() {
            LoopState::Stopped
        } else {
            LoopState::Scanning
        }
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
