use std::sync::{
    Mutex,
    MutexGuard,
};

use async_trait::async_trait;
use log::warn;

use crate::{
    error::Result,
    storage::{
        CacheStore,
        PriceCache,
    },
};



/// Cache that lives only as long as the process.
///
/// Used when the operator opts out of the cache file.
#[derive(Default)]
pub struct Memory {
    cache: Mutex<PriceCache>,
}



impl Memory {
    pub fn new(cache: PriceCache) -> Self {
        Self {
            cache: Mutex::new(cache),
        }
    }



    /// Copy of the last persisted cache.
    pub fn snapshot(&self) -> PriceCache {
        self.lock().clone()
    }



    // Cache is overwritten in full on every persist, so a poisoned lock holds
    // nothing half written.
    fn lock(&self) -> MutexGuard<'_, PriceCache> {
        self.cache.lock().unwrap_or_else(|poisoned| {
            warn!("memory cache mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }
}



#[async_trait]
impl CacheStore for Memory {
    async fn load(&self) -> Result<PriceCache> {
        Ok(self.snapshot())
    }



    async fn persist(&self, cache: &PriceCache) -> Result<()> {
        *self.lock() = cache.clone();
        Ok(())
    }
}
