pub mod json_file;
pub mod memory;

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::{
    error::Result,
    price_series::QuotePair,
};



/// Last successfully fetched quotes, keyed by currency name.
pub type PriceCache = BTreeMap<String, QuotePair>;



/// Storage of the price cache.
///
/// Cache is loaded once when a job starts and overwritten in full on every
/// checkpoint, so implementations do not need partial updates.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn load(&self) -> Result<PriceCache>;

    async fn persist(&self, cache: &PriceCache) -> Result<()>;
}
