//! Scoring Engine
//!
//! Two-stage evaluation of a freshly listed token:
//!
//! 1. Hard filters (liquidity, trader count, price). The first failing gate
//!    rejects the token and no score is computed.
//! 2. Component scores (age, volume/liquidity, momentum), each multiplied by
//!    its weight and truncated toward zero, summed into a total that must
//!    reach `min_score` to pass.
//!
//! Tier thresholds use strict comparisons: a volume ratio of exactly 5.0
//! lands in the `> 2` tier, an age of exactly 30 minutes in the `< 1h` tier.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::token::Token;

/// Hard-filter thresholds and scoring weights
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Minimum pool liquidity in USD
    pub min_liquidity_usd: f64,
    /// Minimum buys + sells over 24h
    pub min_trader_count: u64,
    /// Minimum weighted total to pass
    pub min_score: i64,
    pub age_weight: f64,
    pub volume_weight: f64,
    pub momentum_weight: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            min_liquidity_usd: 5_000.0,
            min_trader_count: 20,
            min_score: 5,
            age_weight: 1.0,
            volume_weight: 1.0,
            momentum_weight: 0.5,
        }
    }
}

/// Hard filter that rejected a token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    InsufficientLiquidity,
    TooFewTraders,
    NonPositivePrice,
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectReason::InsufficientLiquidity => write!(f, "liquidity below minimum"),
            RejectReason::TooFewTraders => write!(f, "trader count below minimum"),
            RejectReason::NonPositivePrice => write!(f, "price is not positive"),
        }
    }
}

/// Score breakdown for a token that passed the hard filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub age_score: u32,
    pub volume_score: u32,
    pub momentum_score: u32,
    /// Weighted sum of the components
    pub total: i64,
    pub passed: bool,
}

/// Outcome of evaluating one token
#[derive(Debug, Clone, PartialEq)]
pub enum Evaluation {
    /// Failed a hard filter; no score was computed
    Rejected(RejectReason),
    Scored(Score),
}

impl Evaluation {
    pub fn score(&self) -> Option<&Score> {
        match self {
            Evaluation::Scored(score) => Some(score),
            Evaluation::Rejected(_) => None,
        }
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Evaluation::Rejected(_))
    }
}

/// Stateless evaluator over a fixed configuration
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    config: ScoringConfig,
}

impl ScoringEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Evaluate against the current wall clock
    pub fn evaluate(&self, token: &Token) -> Evaluation {
        self.evaluate_at(token, Utc::now())
    }

    /// Evaluate with an explicit "now" for the age component
    pub fn evaluate_at(&self, token: &Token, now: DateTime<Utc>) -> Evaluation {
        if let Err(reason) = self.check_hard_filters(token) {
            return Evaluation::Rejected(reason);
        }

        let age_score = age_score(token.age_at(now));
        let volume_score = volume_score(token);
        let momentum_score = momentum_score(token);

        let total = weighted(age_score, self.config.age_weight)
            + weighted(volume_score, self.config.volume_weight)
            + weighted(momentum_score, self.config.momentum_weight);

        Evaluation::Scored(Score {
            age_score,
            volume_score,
            momentum_score,
            total,
            passed: total >= self.config.min_score,
        })
    }

    /// Safety gates, evaluated in order
    fn check_hard_filters(&self, token: &Token) -> Result<(), RejectReason> {
        if token.liquidity_usd < self.config.min_liquidity_usd {
            return Err(RejectReason::InsufficientLiquidity);
        }
        if token.trader_count < self.config.min_trader_count {
            return Err(RejectReason::TooFewTraders);
        }
        if token.price_usd <= 0.0 {
            return Err(RejectReason::NonPositivePrice);
        }
        Ok(())
    }
}

/// Younger tokens score higher: <30m = 3, <1h = 2, <2h = 1
pub fn age_score(age: Duration) -> u32 {
    if age < Duration::minutes(30) {
        3
    } else if age < Duration::hours(1) {
        2
    } else if age < Duration::hours(2) {
        1
    } else {
        0
    }
}

/// Volume/liquidity ratio tiers: >5 = 3, >2 = 2, >1 = 1
pub fn volume_score(token: &Token) -> u32 {
    let Some(ratio) = token.volume_to_liquidity() else {
        return 0;
    };

    if ratio > 5.0 {
        3
    } else if ratio > 2.0 {
        2
    } else if ratio > 1.0 {
        1
    } else {
        0
    }
}

/// One point per positive short-horizon price change; missing data scores 0
pub fn momentum_score(token: &Token) -> u32 {
    [token.price_change_5m, token.price_change_1h]
        .iter()
        .filter(|change| matches!(change, Some(pct) if *pct > 0.0))
        .count() as u32
}

fn weighted(component: u32, weight: f64) -> i64 {
    (component as f64 * weight).trunc() as i64
}
