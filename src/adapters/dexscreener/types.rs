//! DexScreener wire types and pair parsing
//!
//! The listings endpoint returns `{"pairs": [...]}`. Each pair is decoded on
//! its own so a single malformed record is dropped without losing the page.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::Token;

/// Why a single pair was dropped
#[derive(Debug, Error, PartialEq)]
pub enum PairParseError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Field {field} is not numeric: {value}")]
    NotNumeric { field: &'static str, value: String },

    #[error("Invalid pair shape: {0}")]
    InvalidShape(String),
}

/// Top-level listings response
///
/// Pairs stay as raw JSON values until [`parse_pairs`] decodes them one by one.
#[derive(Debug, Deserialize)]
pub struct ListingsResponse {
    #[serde(default)]
    pub pairs: Option<Vec<Value>>,
}

/// A trading pair record
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPair {
    pub chain_id: Option<String>,
    pub base_token: Option<RawBaseToken>,
    pub price_usd: Option<FlexNumber>,
    pub liquidity: Option<RawLiquidity>,
    pub volume: Option<RawVolume>,
    pub txns: Option<RawTxns>,
    pub price_change: Option<RawPriceChange>,
    /// Pair creation time in epoch milliseconds
    pub pair_created_at: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawBaseToken {
    pub address: Option<String>,
    pub name: Option<String>,
    pub symbol: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawLiquidity {
    pub usd: Option<FlexNumber>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawVolume {
    pub h24: Option<FlexNumber>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawTxns {
    pub h24: Option<RawTxnCounts>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawTxnCounts {
    pub buys: Option<u64>,
    pub sells: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawPriceChange {
    pub m5: Option<FlexNumber>,
    pub h1: Option<FlexNumber>,
}

/// Number that may arrive as a JSON number or a numeric string
/// (DexScreener sends `priceUsd` as a string)
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FlexNumber {
    Number(f64),
    Text(String),
}

impl FlexNumber {
    fn coerce(&self, field: &'static str) -> Result<f64, PairParseError> {
        let value = match self {
            FlexNumber::Number(n) => *n,
            FlexNumber::Text(s) => s.trim().parse::<f64>().map_err(|_| PairParseError::NotNumeric {
                field,
                value: s.clone(),
            })?,
        };
        if value.is_finite() {
            Ok(value)
        } else {
            Err(PairParseError::NotNumeric { field, value: value.to_string() })
        }
    }
}

fn coerce_or_zero(value: Option<&FlexNumber>, field: &'static str) -> Result<f64, PairParseError> {
    value.map(|v| v.coerce(field)).transpose().map(|v| v.unwrap_or(0.0))
}

fn coerce_optional(value: Option<&FlexNumber>, field: &'static str) -> Result<Option<f64>, PairParseError> {
    value.map(|v| v.coerce(field)).transpose()
}

impl RawPair {
    /// Normalize into a [`Token`]
    pub fn into_token(self) -> Result<Token, PairParseError> {
        let base = self.base_token.ok_or(PairParseError::MissingField("baseToken"))?;
        let address = base
            .address
            .filter(|a| !a.is_empty())
            .ok_or(PairParseError::MissingField("baseToken.address"))?;

        let price_usd = coerce_or_zero(self.price_usd.as_ref(), "priceUsd")?;
        let liquidity_usd = coerce_or_zero(
            self.liquidity.as_ref().and_then(|l| l.usd.as_ref()),
            "liquidity.usd",
        )?;
        let volume_24h = coerce_or_zero(
            self.volume.as_ref().and_then(|v| v.h24.as_ref()),
            "volume.h24",
        )?;

        let counts = self.txns.as_ref().and_then(|t| t.h24.as_ref());
        let buys = counts.and_then(|c| c.buys).unwrap_or(0);
        let sells = counts.and_then(|c| c.sells).unwrap_or(0);

        let change = self.price_change.as_ref();
        let price_change_5m = coerce_optional(change.and_then(|c| c.m5.as_ref()), "priceChange.m5")?;
        let price_change_1h = coerce_optional(change.and_then(|c| c.h1.as_ref()), "priceChange.h1")?;

        let created_at = self
            .pair_created_at
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .unwrap_or_default();

        Ok(Token {
            address,
            name: base.name.unwrap_or_else(|| "Unknown".to_string()),
            symbol: base.symbol.unwrap_or_else(|| "???".to_string()),
            price_usd,
            liquidity_usd,
            volume_24h,
            trader_count: buys.saturating_add(sells),
            price_change_5m,
            price_change_1h,
            created_at,
        })
    }
}

/// Decode the pairs of one response, keeping only `chain_id` records
///
/// Non-matching chains are skipped silently; malformed records are logged at
/// warn level and skipped.
pub fn parse_pairs(pairs: Vec<Value>, chain_id: &str) -> Vec<Token> {
    let total = pairs.len();
    let mut tokens = Vec::with_capacity(total);

    for pair in pairs {
        if pair.get("chainId").and_then(Value::as_str) != Some(chain_id) {
            continue;
        }

        let parsed = serde_json::from_value::<RawPair>(pair)
            .map_err(|e| PairParseError::InvalidShape(e.to_string()))
            .and_then(RawPair::into_token);

        match parsed {
            Ok(token) => tokens.push(token),
            Err(e) => warn!("Failed to parse pair: {}", e),
        }
    }

    debug!("Parsed {}/{} pairs for chain {}", tokens.len(), total, chain_id);
    tokens
}
