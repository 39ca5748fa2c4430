//! Finds the most favorable currency exchange spread between the two legs of
//! a marketplace currency pair.
//!
//! - `rate_limit` - interprets rate limiting descriptors of responses.
//! - `listing_normalizer` - free text listing notes into price rows.
//! - `listing_source` - marketplace seam and its trade API client.
//! - `price_fetcher` - paged, rate limited fetch of one leg.
//! - `spread_analyzer` - best row within a profit ceiling.
//! - `pair_runner` - one currency through fetch and analysis.
//! - `orchestrator` - whole job with retries and cache checkpoints.
//! - `storage` - price cache stores.

pub mod args;
pub mod config;
pub mod currency;
pub mod error;
pub mod listing_normalizer;
pub mod listing_source;
pub mod orchestrator;
pub mod pair_runner;
pub mod price_fetcher;
pub mod price_series;
pub mod rate_limit;
pub mod spread_analyzer;
pub mod storage;

pub use error::{
    PricingError,
    Result,
};
