use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use async_trait::async_trait;

use super::market_data::ListingSource;
use super::reporter::{ReportError, ScanEvent, ScanReporter};
use crate::domain::{ScanStats, Token};

/// Listing source that replays scripted batches and counts fetches
///
/// Once the script is exhausted every fetch returns an empty batch.
#[derive(Debug, Default, Clone)]
pub struct MockListingSource {
    batches: Arc<Mutex<VecDeque<Vec<Token>>>>,
    fetch_count: Arc<Mutex<usize>>,
}

impl MockListingSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to queue a batch for the next fetch
    pub fn with_batch(self, batch: Vec<Token>) -> Self {
        self.batches.lock().unwrap_or_else(PoisonError::into_inner).push_back(batch);
        self
    }

    /// Number of fetches made so far
    pub fn fetch_count(&self) -> usize {
        *self.fetch_count.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl ListingSource for MockListingSource {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch(&self) -> Vec<Token> {
        *self.fetch_count.lock().unwrap_or_else(PoisonError::into_inner) += 1;
        self.batches.lock().unwrap_or_else(PoisonError::into_inner).pop_front().unwrap_or_default()
    }
}

type CountdownHook = Box<dyn FnMut(u64) + Send>;

/// Reporter that records every event it receives
///
/// Clones share the same event log, so a test can keep a handle while the
/// scan loop owns another.
#[derive(Clone, Default)]
pub struct RecordingReporter {
    events: Arc<Mutex<Vec<ScanEvent>>>,
    summary: Arc<Mutex<Option<ScanStats>>>,
    fail_matches: bool,
    countdown_hook: Arc<Mutex<Option<CountdownHook>>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to make every `Match` report fail
    pub fn failing_matches(mut self) -> Self {
        self.fail_matches = true;
        self
    }

    /// Builder method to run a callback on each countdown tick
    pub fn with_countdown_hook(self, hook: impl FnMut(u64) + Send + 'static) -> Self {
        *self.countdown_hook.lock().unwrap_or_else(PoisonError::into_inner) = Some(Box::new(hook));
        self
    }

    /// All recorded events
    pub fn events(&self) -> Vec<ScanEvent> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Addresses of recorded matches, in order
    pub fn matched_addresses(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter_map(|e| match e {
                ScanEvent::Match { token, .. } => Some(token.address.clone()),
                _ => None,
            })
            .collect()
    }

    /// Recorded countdown values, in order
    pub fn countdowns(&self) -> Vec<u64> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter_map(|e| match e {
                ScanEvent::Countdown { remaining_secs } => Some(*remaining_secs),
                _ => None,
            })
            .collect()
    }

    /// Summary passed to `finish`, if the loop has stopped
    pub fn summary(&self) -> Option<ScanStats> {
        self.summary.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl ScanReporter for RecordingReporter {
    fn report(&mut self, event: &ScanEvent) -> Result<(), ReportError> {
        if self.fail_matches && matches!(event, ScanEvent::Match { .. }) {
            return Err(ReportError::Closed);
        }

        self.events.lock().unwrap_or_else(PoisonError::into_inner).push(event.clone());

        if let ScanEvent::Countdown { remaining_secs } = event {
            if let Some(hook) = self.countdown_hook.lock().unwrap_or_else(PoisonError::into_inner).as_mut() {
                hook(*remaining_secs);
            }
        }
        Ok(())
    }

    fn finish(&mut self, stats: &ScanStats) -> Result<(), ReportError> {
        *self.summary.lock().unwrap_or_else(PoisonError::into_inner) = Some(stats.clone());
        Ok(())
    }
}
