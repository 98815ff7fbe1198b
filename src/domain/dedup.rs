//! Session dedup cache
//!
//! Remembers which token addresses already produced a reported match in this
//! process. Membership only: no values, no TTL, no eviction, nothing persisted.
//! The set grows for the lifetime of the process until `clear` is called.

use std::collections::HashSet;

/// Set of token addresses already reported this session
#[derive(Debug, Default, Clone)]
pub struct DedupCache {
    seen: HashSet<String>,
}

impl DedupCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the address has already been reported
    pub fn has_seen(&self, address: &str) -> bool {
        self.seen.contains(address)
    }

    /// Record the address as reported. Marking twice is a no-op.
    pub fn mark_seen(&mut self, address: impl Into<String>) {
        self.seen.insert(address.into());
    }

    /// Number of distinct addresses recorded
    pub fn size(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// Forget every recorded address
    pub fn clear(&mut self) {
        self.seen.clear();
    }
}
