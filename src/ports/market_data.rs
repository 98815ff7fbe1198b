//! Market data port
//!
//! Source of new token listings for the scan loop.

use async_trait::async_trait;

use crate::domain::Token;

/// A listings feed polled once per scan cycle
///
/// Implementations absorb their own failures: rate limits, HTTP errors and
/// exhausted retries all come back as an empty batch so a bad fetch never
/// stops the loop.
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Name of the source (for logging)
    fn name(&self) -> &str;

    /// Fetch the current page of listings, in source order
    async fn fetch(&self) -> Vec<Token>;
}
