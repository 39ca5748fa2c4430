use std::{
    io::ErrorKind,
    path::{
        Path,
        PathBuf,
    },
};

use async_trait::async_trait;
use log::debug;
use tokio::fs;

use crate::{
    error::Result,
    storage::{
        CacheStore,
        PriceCache,
    },
};



/// Cache stored as a single pretty printed JSON document.
pub struct JsonFile {
    path: PathBuf,
}



impl JsonFile {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }



    // Sibling file the document is written to before it replaces the cache.
    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}



#[async_trait]
impl CacheStore for JsonFile {
    /// Missing file is an empty cache, that is how every first run starts.
    async fn load(&self) -> Result<PriceCache> {
        let raw = match fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("cache {} does not exist yet", self.path.display());
                return Ok(PriceCache::new())
            }
            Err(e) => return Err(e.into()),
        };

        Ok(serde_json::from_str(&raw)?)
    }



    /// Write to a temporary file and rename it over the cache, so that a
    /// process killed mid-write leaves the previous checkpoint intact.
    async fn persist(&self, cache: &PriceCache) -> Result<()> {
        let raw = serde_json::to_string_pretty(cache)?;
        let tmp = self.tmp_path();

        fs::write(&tmp, raw).await?;
        fs::rename(&tmp, &self.path).await?;

        debug!("cache {} persisted, {} pairs", self.path.display(), cache.len());
        Ok(())
    }
}



#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        error::PricingError,
        price_series::{
            PriceRow,
            QuotePair,
        },
    };

    fn pair(sell: u32, buy: u32) -> QuotePair {
        let rows = vec![PriceRow::new(sell, buy).unwrap()];
        QuotePair {
            want_to_base: rows.clone().into_iter().collect(),
            base_to_want: rows.into_iter().collect(),
        }
    }

    #[tokio::test]
    async fn test_checkpoint_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFile::new(dir.path().join("cache.json"));

        assert!(store.load().await.unwrap().is_empty());

        let mut cache = PriceCache::new();
        cache.insert("vaal".to_string(), pair(3, 1));
        store.persist(&cache).await.unwrap();

        cache.insert("divine".to_string(), pair(1, 150));
        store.persist(&cache).await.unwrap();

        let loaded = JsonFile::new(dir.path().join("cache.json")).load().await.unwrap();
        assert_eq!(loaded, cache);
        assert!(!dir.path().join("cache.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_corrupt_cache_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        std::fs::write(&path, "{ not json").unwrap();

        let res = JsonFile::new(&path).load().await;
        assert!(matches!(res, Err(PricingError::Json(..))));
    }
}
