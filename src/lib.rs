//! Token Scout - DexScreener new-listing scanner for Solana
//!
//! Polls the latest Solana pairs, applies hard safety filters, scores the
//! survivors on age, volume and momentum, and reports each match once.
//!
//! # Modules
//!
//! - `domain`: Core scanning logic (Token, ScoringEngine, DedupCache, ScanStats)
//! - `ports`: Trait abstractions (ListingSource, ScanReporter)
//! - `adapters`: External implementations (DexScreener, terminal dashboard, CLI)
//! - `config`: Configuration loading and validation
//! - `application`: Scan loop orchestration and shutdown

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod config;
pub mod application;
