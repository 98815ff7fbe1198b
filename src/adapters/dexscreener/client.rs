//! DexScreener Listings Client
//!
//! Polls `GET {base_url}/tokens/{chain_id}` and normalizes the pairs into
//! [`Token`] records. All failures degrade to an empty batch:
//!
//! - 429: logged, empty, no retry (retrying inside a rate-limit window only
//!   extends it)
//! - other non-2xx: logged, empty, no retry
//! - transport failure or undecodable body: retried up to `max_retries`
//!   attempts with a fixed delay, then empty

use std::time::Duration;
use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use super::transport::{HttpResponse, HttpTransport, ReqwestTransport, TransportError};
use super::types::{parse_pairs, ListingsResponse};
use crate::domain::Token;
use crate::ports::ListingSource;

/// Default DexScreener REST base URL
pub const DEFAULT_BASE_URL: &str = "https://api.dexscreener.com/latest/dex";
/// Chain to scan
pub const DEFAULT_CHAIN_ID: &str = "solana";

/// Outcome of a single failed attempt
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FetchError {
    #[error("Rate limited by DexScreener API")]
    RateLimited,

    #[error("DexScreener API error: HTTP {0}")]
    HttpStatus(u16),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Malformed response: {0}")]
    Decode(String),
}

impl FetchError {
    /// Transport and decode failures are worth another attempt; status
    /// failures end the fetch immediately
    pub fn is_retryable(&self) -> bool {
        matches!(self, FetchError::Transport(_) | FetchError::Decode(_))
    }
}

/// Client configuration
#[derive(Debug, Clone)]
pub struct DexScreenerConfig {
    pub base_url: String,
    pub chain_id: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Total attempts for transport failures (minimum 1)
    pub max_retries: u32,
    /// Fixed delay between attempts
    pub retry_delay: Duration,
}

impl Default for DexScreenerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            chain_id: DEFAULT_CHAIN_ID.to_string(),
            timeout: Duration::from_secs(10),
            max_retries: 3,
            retry_delay: Duration::from_secs(5),
        }
    }
}

impl DexScreenerConfig {
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Full listings URL for the configured chain
    pub fn listings_url(&self) -> String {
        format!("{}/tokens/{}", self.base_url.trim_end_matches('/'), self.chain_id)
    }
}

/// DexScreener listings client
#[derive(Debug, Clone)]
pub struct DexScreenerClient<T = ReqwestTransport> {
    config: DexScreenerConfig,
    transport: T,
}

impl DexScreenerClient<ReqwestTransport> {
    /// Create a client backed by `reqwest`
    pub fn new(config: DexScreenerConfig) -> Result<Self, TransportError> {
        let transport = ReqwestTransport::new(config.timeout)?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: HttpTransport> DexScreenerClient<T> {
    pub fn with_transport(config: DexScreenerConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &DexScreenerConfig {
        &self.config
    }

    /// Fetch the current listings page, retrying transport failures
    pub async fn fetch_tokens(&self) -> Vec<Token> {
        let url = self.config.listings_url();
        let max_attempts = self.config.max_retries.max(1);

        for attempt in 1..=max_attempts {
            match self.fetch_once(&url).await {
                Ok(tokens) => {
                    debug!("Fetched {} tokens on attempt {}", tokens.len(), attempt);
                    return tokens;
                }
                Err(e) if e.is_retryable() => {
                    error!(
                        "DexScreener call failed (attempt {}/{}): {}",
                        attempt, max_attempts, e
                    );
                    if attempt < max_attempts {
                        tokio::time::sleep(self.config.retry_delay).await;
                    }
                }
                Err(FetchError::RateLimited) => {
                    warn!("Rate limited by DexScreener API, skipping this cycle");
                    return Vec::new();
                }
                Err(e) => {
                    error!("{}", e);
                    return Vec::new();
                }
            }
        }

        warn!("Giving up after {} attempts", max_attempts);
        Vec::new()
    }

    /// One request, classified
    async fn fetch_once(&self, url: &str) -> Result<Vec<Token>, FetchError> {
        let response = self.transport.get(url).await?;
        self.handle_response(response)
    }

    fn handle_response(&self, response: HttpResponse) -> Result<Vec<Token>, FetchError> {
        if response.status == 429 {
            return Err(FetchError::RateLimited);
        }
        if !response.is_success() {
            return Err(FetchError::HttpStatus(response.status));
        }

        let listings: ListingsResponse = serde_json::from_str(&response.body)
            .map_err(|e| FetchError::Decode(e.to_string()))?;

        Ok(parse_pairs(listings.pairs.unwrap_or_default(), &self.config.chain_id))
    }
}

#[async_trait]
impl<T: HttpTransport> ListingSource for DexScreenerClient<T> {
    fn name(&self) -> &str {
        "dexscreener"
    }

    async fn fetch(&self) -> Vec<Token> {
        let tokens = self.fetch_tokens().await;
        info!("DexScreener returned {} {} tokens", tokens.len(), self.config.chain_id);
        tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::transport::MockHttpTransport;
    use mockall::Sequence;

    const PAGE: &str = r#"{
        "pairs": [
            {
                "chainId": "solana",
                "pairAddress": "ABC123",
                "baseToken": {"address": "TOKEN_ABC", "name": "TestToken", "symbol": "TEST"},
                "priceUsd": "0.00123",
                "liquidity": {"usd": 15000},
                "volume": {"h24": 50000},
                "txns": {"h24": {"buys": 45, "sells": 22}},
                "priceChange": {"m5": 12.5, "h1": 45.2},
                "pairCreatedAt": 1705850000000
            },
            {
                "chainId": "bsc",
                "baseToken": {"address": "0xabc", "name": "Other", "symbol": "OTH"},
                "priceUsd": "1.0"
            }
        ]
    }"#;

    fn fast_config() -> DexScreenerConfig {
        DexScreenerConfig::default().with_retry_delay(Duration::ZERO)
    }

    #[tokio::test]
    async fn test_fetch_success_parses_tokens() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_get()
            .withf(|url| url.starts_with("https://api.dexscreener.com/") && url.ends_with("/latest/dex/tokens/solana"))
            .times(1)
            .returning(|_| Ok(HttpResponse::new(200, PAGE)));

        let client = DexScreenerClient::with_transport(fast_config(), transport);
        let tokens = client.fetch_tokens().await;

        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].address, "TOKEN_ABC");
        assert_eq!(tokens[0].liquidity_usd, 15_000.0);
        assert_eq!(tokens[0].trader_count, 67);
    }

    #[tokio::test]
    async fn test_rate_limit_returns_empty_without_retry() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_get()
            .times(1)
            .returning(|_| Ok(HttpResponse::new(429, "Too Many Requests")));

        let client = DexScreenerClient::with_transport(fast_config(), transport);
        assert!(client.fetch_tokens().await.is_empty());
    }

    #[tokio::test]
    async fn test_server_error_returns_empty_without_retry() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_get()
            .times(1)
            .returning(|_| Ok(HttpResponse::new(503, "")));

        let client = DexScreenerClient::with_transport(fast_config(), transport);
        assert!(client.fetch_tokens().await.is_empty());
    }

    #[tokio::test]
    async fn test_transport_error_then_success_retries() {
        let mut seq = Sequence::new();
        let mut transport = MockHttpTransport::new();
        transport
            .expect_get()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(TransportError::Connect("Network error".into())));
        transport
            .expect_get()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(HttpResponse::new(200, r#"{"pairs": []}"#)));

        let client = DexScreenerClient::with_transport(fast_config().with_max_retries(2), transport);
        assert!(client.fetch_tokens().await.is_empty());
    }

    #[tokio::test]
    async fn test_retries_exhausted_returns_empty() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_get()
            .times(3)
            .returning(|_| Err(TransportError::Timeout("10s".into())));

        let client = DexScreenerClient::with_transport(fast_config(), transport);
        assert!(client.fetch_tokens().await.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_body_is_retried() {
        let mut seq = Sequence::new();
        let mut transport = MockHttpTransport::new();
        transport
            .expect_get()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(HttpResponse::new(200, "<html>gateway</html>")));
        transport
            .expect_get()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(HttpResponse::new(200, PAGE)));

        let client = DexScreenerClient::with_transport(fast_config(), transport);
        assert_eq!(client.fetch_tokens().await.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fixed_delay_between_attempts() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_get()
            .times(3)
            .returning(|_| Err(TransportError::Connect("refused".into())));

        let config = DexScreenerConfig::default().with_retry_delay(Duration::from_secs(5));
        let client = DexScreenerClient::with_transport(config, transport);

        let start = tokio::time::Instant::now();
        assert!(client.fetch_tokens().await.is_empty());

        // two sleeps between three attempts, none after the last
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(10));
        assert!(elapsed < Duration::from_secs(11));
    }

    #[tokio::test]
    async fn test_zero_max_retries_still_attempts_once() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_get()
            .times(1)
            .returning(|_| Ok(HttpResponse::new(200, r#"{"pairs": null}"#)));

        let client = DexScreenerClient::with_transport(fast_config().with_max_retries(0), transport);
        assert!(client.fetch_tokens().await.is_empty());
    }

    #[test]
    fn test_listings_url() {
        let config = DexScreenerConfig::default().with_base_url("http://localhost:8080/dex/");
        assert_eq!(config.listings_url(), "http://localhost:8080/dex/tokens/solana");
    }

    #[test]
    fn test_fetch_error_retryable() {
        assert!(!FetchError::RateLimited.is_retryable());
        assert!(!FetchError::HttpStatus(500).is_retryable());
        assert!(FetchError::Decode("eof".into()).is_retryable());
        assert!(FetchError::Transport(TransportError::Timeout("t".into())).is_retryable());
    }
}
