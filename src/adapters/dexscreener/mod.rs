//! DexScreener Market Data Adapter
//!
//! New-listing feed for the scan loop:
//! - `DexScreenerClient`: bounded-retry listings client, implements `ListingSource`
//! - `HttpTransport`: GET seam (`ReqwestTransport` in production)
//! - `parse_pairs`: per-record decoding with chain filtering

mod client;
mod transport;
mod types;

pub use client::{DexScreenerClient, DexScreenerConfig, FetchError, DEFAULT_BASE_URL, DEFAULT_CHAIN_ID};
pub use transport::{HttpResponse, HttpTransport, ReqwestTransport, TransportError};
pub use types::{parse_pairs, FlexNumber, ListingsResponse, PairParseError, RawPair};
