//! Scan Pipeline Integration Tests
//!
//! End-to-end flows through the public API:
//! 1. DexScreener page -> parsing -> scoring -> reporter
//! 2. Dedup across cycles
//! 3. Failure degradation (rate limit, transport errors)
//! 4. Config file -> component configs
//!
//! All tests are deterministic (no real network calls) and use scripted responses.

use std::collections::VecDeque;
use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use serde_json::json;
use tempfile::NamedTempFile;

use token_scout::adapters::dexscreener::{
    DexScreenerClient, DexScreenerConfig, HttpResponse, HttpTransport, TransportError,
};
use token_scout::application::{ScanLoopConfig, ScanOrchestrator, ShutdownSignal};
use token_scout::config::load_config;
use token_scout::domain::{Evaluation, RejectReason, ScoringConfig, ScoringEngine, Token};
use token_scout::ports::mocks::RecordingReporter;
use token_scout::ports::ScanEvent;

// ============================================================================
// Test Fixtures
// ============================================================================

type Scripted = Result<HttpResponse, TransportError>;

/// Transport that replays scripted responses and counts requests
#[derive(Clone, Default)]
struct ScriptedTransport {
    responses: Arc<Mutex<VecDeque<Scripted>>>,
    requests: Arc<Mutex<usize>>,
}

impl ScriptedTransport {
    fn new(responses: Vec<Scripted>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses.into())),
            requests: Arc::new(Mutex::new(0)),
        }
    }

    fn requests(&self) -> usize {
        *self.requests.lock().unwrap()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn get(&self, _url: &str) -> Result<HttpResponse, TransportError> {
        *self.requests.lock().unwrap() += 1;
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(HttpResponse::new(200, r#"{"pairs": []}"#)))
    }
}

fn minutes_ago_ms(minutes: i64) -> i64 {
    (Utc::now() - ChronoDuration::minutes(minutes)).timestamp_millis()
}

/// A pair that clears every filter and scores 6 with default weights
fn hot_pair(address: &str) -> serde_json::Value {
    json!({
        "chainId": "solana",
        "pairAddress": format!("PAIR_{}", address),
        "baseToken": {"address": address, "name": "Hot Token", "symbol": "HOT"},
        "priceUsd": "0.001",
        "liquidity": {"usd": 10000},
        "volume": {"h24": 50000},
        "txns": {"h24": {"buys": 50, "sells": 30}},
        "priceChange": {"m5": 15.0, "h1": 50.0},
        "pairCreatedAt": minutes_ago_ms(20)
    })
}

fn page(pairs: Vec<serde_json::Value>) -> HttpResponse {
    HttpResponse::new(200, json!({ "pairs": pairs }).to_string())
}

fn client(transport: ScriptedTransport, max_retries: u32) -> DexScreenerClient<ScriptedTransport> {
    let config = DexScreenerConfig::default()
        .with_max_retries(max_retries)
        .with_retry_delay(Duration::ZERO);
    DexScreenerClient::with_transport(config, transport)
}

fn scanner(
    transport: ScriptedTransport,
    reporter: RecordingReporter,
) -> ScanOrchestrator<DexScreenerClient<ScriptedTransport>, RecordingReporter> {
    ScanOrchestrator::new(
        client(transport, 3),
        reporter,
        ScoringConfig::default(),
        ScanLoopConfig {
            scan_interval: Duration::from_secs(10),
        },
    )
}

fn token(liquidity_usd: f64, trader_count: u64, price_usd: f64) -> Token {
    Token {
        address: "SCENARIO".to_string(),
        name: "Scenario".to_string(),
        symbol: "SCN".to_string(),
        price_usd,
        liquidity_usd,
        volume_24h: 50_000.0,
        trader_count,
        price_change_5m: Some(15.0),
        price_change_1h: Some(50.0),
        created_at: Utc::now() - ChronoDuration::minutes(20),
    }
}

// ============================================================================
// Scoring Scenarios
// ============================================================================

#[test]
fn test_scenario_strong_listing_scores_six() {
    let engine = ScoringEngine::new(ScoringConfig::default());
    let evaluation = engine.evaluate(&token(10_000.0, 80, 0.001));

    let score = evaluation.score().copied().unwrap();
    assert_eq!(score.age_score, 3);
    assert_eq!(score.volume_score, 2);
    assert_eq!(score.momentum_score, 2);
    assert_eq!(score.total, 6);
    assert!(score.passed);
}

#[test]
fn test_scenario_thin_liquidity_rejected() {
    let engine = ScoringEngine::new(ScoringConfig::default());
    assert_eq!(
        engine.evaluate(&token(1_000.0, 80, 0.001)),
        Evaluation::Rejected(RejectReason::InsufficientLiquidity)
    );
}

#[test]
fn test_hard_filters_ignore_strong_metrics() {
    let engine = ScoringEngine::new(ScoringConfig::default());
    assert!(engine.evaluate(&token(10_000.0, 5, 0.001)).is_rejected());
    assert!(engine.evaluate(&token(10_000.0, 80, 0.0)).is_rejected());
}

// ============================================================================
// Pipeline Flows
// ============================================================================

#[tokio::test]
async fn test_page_to_match_event() {
    let mut weak = hot_pair("WEAK");
    weak["liquidity"] = json!({"usd": 1000});
    let foreign = json!({
        "chainId": "ethereum",
        "baseToken": {"address": "0xdead", "name": "Eth", "symbol": "ETH"},
        "priceUsd": "1.0"
    });

    let transport = ScriptedTransport::new(vec![Ok(page(vec![hot_pair("HOT1"), weak, foreign]))]);
    let reporter = RecordingReporter::new();
    let mut scan = scanner(transport, reporter.clone());

    let report = scan.scan_once().await.unwrap();

    // the foreign-chain record never reaches the scanner
    assert_eq!(report.scanned, 2);
    assert_eq!(report.matches, 1);
    assert_eq!(report.rejected, 1);

    match &reporter.events()[0] {
        ScanEvent::Match { token, score } => {
            assert_eq!(token.address, "HOT1");
            assert_eq!(token.trader_count, 80);
            assert_eq!(score.total, 6);
        }
        other => panic!("expected a match, got {:?}", other),
    }
}

#[tokio::test]
async fn test_duplicate_listing_reported_once_across_cycles() {
    let mut changed = hot_pair("HOT1");
    changed["priceUsd"] = json!("0.002");
    changed["volume"] = json!({"h24": 80000});

    let transport = ScriptedTransport::new(vec![
        Ok(page(vec![hot_pair("HOT1")])),
        Ok(page(vec![changed])),
    ]);
    let reporter = RecordingReporter::new();
    let mut scan = scanner(transport, reporter.clone());

    scan.run_cycle().await.unwrap();
    scan.run_cycle().await.unwrap();

    assert_eq!(reporter.matched_addresses(), vec!["HOT1".to_string()]);
    assert_eq!(scan.stats().total_matches, 1);
    assert_eq!(scan.stats().total_duplicates, 1);
    assert_eq!(scan.stats().cycles_completed, 2);
}

#[tokio::test]
async fn test_malformed_record_does_not_discard_page() {
    let broken = json!({
        "chainId": "solana",
        "baseToken": {"name": "No Address", "symbol": "NOA"},
        "priceUsd": "0.5"
    });
    let transport = ScriptedTransport::new(vec![Ok(page(vec![broken, hot_pair("HOT2")]))]);
    let reporter = RecordingReporter::new();
    let mut scan = scanner(transport, reporter.clone());

    let report = scan.scan_once().await.unwrap();

    assert_eq!(report.scanned, 1);
    assert_eq!(reporter.matched_addresses(), vec!["HOT2".to_string()]);
}

#[tokio::test]
async fn test_rate_limit_yields_empty_cycle_with_single_request() {
    let transport = ScriptedTransport::new(vec![Ok(HttpResponse::new(429, "slow down"))]);
    let reporter = RecordingReporter::new();
    let mut scan = scanner(transport.clone(), reporter.clone());

    let report = scan.run_cycle().await.unwrap();

    assert_eq!(transport.requests(), 1);
    assert_eq!(report.scanned, 0);
    assert_eq!(
        reporter.events(),
        vec![ScanEvent::Stats { scanned: 0, duplicates: 0 }]
    );
}

#[tokio::test]
async fn test_transport_error_then_empty_page_uses_two_requests() {
    let transport = ScriptedTransport::new(vec![
        Err(TransportError::Connect("Network error".to_string())),
        Ok(HttpResponse::new(200, r#"{"pairs": []}"#)),
    ]);

    let tokens = client(transport.clone(), 2).fetch_tokens().await;

    assert!(tokens.is_empty());
    assert_eq!(transport.requests(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_run_until_shutdown_produces_summary() {
    let shutdown = ShutdownSignal::new();
    let trigger = shutdown.clone();
    let reporter = RecordingReporter::new().with_countdown_hook(move |remaining| {
        if remaining == 5 {
            trigger.request();
        }
    });
    let transport = ScriptedTransport::new(vec![Ok(page(vec![hot_pair("HOT1"), hot_pair("HOT2")]))]);
    let mut scan = scanner(transport.clone(), reporter.clone());

    let stats = scan.run(&shutdown).await;

    assert_eq!(transport.requests(), 1);
    assert_eq!(stats.total_scanned, 2);
    assert_eq!(stats.total_matches, 2);
    assert_eq!(reporter.countdowns(), vec![10, 9, 8, 7, 6, 5]);
    assert_eq!(reporter.summary(), Some(stats));
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_config_file_drives_components() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(
        br#"
scan_interval_seconds = 60

[hard_filters]
min_liquidity_usd = 20000.0

[scoring]
min_score = 8
"#,
    )
    .unwrap();

    let config = load_config(file.path()).unwrap();
    let scoring = ScoringConfig::from(&config);
    let loop_config = ScanLoopConfig::from(&config);

    assert_eq!(loop_config.scan_interval, Duration::from_secs(60));
    assert_eq!(scoring.min_trader_count, 20);

    let engine = ScoringEngine::new(scoring);
    // 10k liquidity no longer clears the raised floor
    assert!(engine.evaluate(&token(10_000.0, 80, 0.001)).is_rejected());

    let score = engine.evaluate(&token(25_000.0, 80, 0.001));
    assert!(!score.score().unwrap().passed);
}
