//! Token listing record
//!
//! One normalized DexScreener pair, produced by the market data adapter and
//! consumed by the scoring engine within a single scan cycle.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A newly listed token as seen in one scan cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// Base token mint address (dedup key)
    pub address: String,
    /// Display name
    pub name: String,
    /// Ticker symbol
    pub symbol: String,
    /// Current price in USD
    pub price_usd: f64,
    /// Pool liquidity in USD
    pub liquidity_usd: f64,
    /// 24-hour trading volume in USD
    pub volume_24h: f64,
    /// Buys + sells over the trailing 24h window
    pub trader_count: u64,
    /// 5-minute price change percentage (None = no data, not zero)
    pub price_change_5m: Option<f64>,
    /// 1-hour price change percentage (None = no data, not zero)
    pub price_change_1h: Option<f64>,
    /// Pair creation time
    pub created_at: DateTime<Utc>,
}

impl Token {
    /// Elapsed time since creation, clamped at zero for timestamps in the future
    pub fn age_at(&self, now: DateTime<Utc>) -> Duration {
        let age = now - self.created_at;
        if age < Duration::zero() {
            Duration::zero()
        } else {
            age
        }
    }

    /// 24h volume divided by liquidity, `None` when liquidity is zero
    pub fn volume_to_liquidity(&self) -> Option<f64> {
        if self.liquidity_usd == 0.0 {
            None
        } else {
            Some(self.volume_24h / self.liquidity_usd)
        }
    }
}
