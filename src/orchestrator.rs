//! Runs a pricing job over many currencies.
//!
//! Currencies are priced strictly one after another in the order given, they
//! all share one marketplace rate budget. The price cache is checkpointed
//! after every currency, so a killed process loses at most the currency that
//! was in flight.



use log::{
    error,
    info,
    warn,
};
use tokio::time::sleep;

use crate::{
    config::JobConfig,
    currency,
    error::{
        Disposition,
        Result,
    },
    listing_source::ListingSource,
    pair_runner::PairRunner,
    price_fetcher::PriceSeriesFetcher,
    storage::{
        CacheStore,
        PriceCache,
    },
};



pub struct JobOrchestrator<S, C> {
    config: JobConfig,
    fetcher: PriceSeriesFetcher<S>,
    store: C,
}



impl<S: ListingSource, C: CacheStore> JobOrchestrator<S, C> {
    pub fn new(config: JobConfig, fetcher: PriceSeriesFetcher<S>, store: C) -> Self {
        Self {
            config,
            fetcher,
            store,
        }
    }



    pub fn fetcher(&self) -> &PriceSeriesFetcher<S> {
        &self.fetcher
    }



    pub fn store(&self) -> &C {
        &self.store
    }



    /// Price all `symbols` and return their concatenated reports.
    ///
    /// Rate limited pairs are retried with a fixed delay; the retry counter is
    /// shared by the whole job and reset by every successful pair. Pairs
    /// without listings are skipped. Any other error aborts the job, already
    /// checkpointed pairs stay in the cache.
    pub async fn run(&self, symbols: &[String]) -> Result<String> {
        let mut cache = match self.store.load().await {
            Ok(cache) => cache,
            Err(e) => {
                warn!("could not load price cache, starting empty: {}", e);
                PriceCache::new()
            }
        };

        let runners: Vec<PairRunner> = symbols.iter()
            .filter_map(|symbol| {
                let runner = currency::lookup(symbol).map(PairRunner::new);
                if runner.is_none() {
                    error!("Currency \"{}\" is not supported, skipping.", symbol);
                }
                runner
            })
            .collect();

        let mut reports = Vec::with_capacity(runners.len());
        let mut retries = 0;
        let mut index = 0;

        while let Some(runner) = runners.get(index) {
            let name = runner.currency().name;
            let is_last_in_batch = index + 1 == runners.len();

            let res = runner
                .run(&self.fetcher, &self.config, cache.get(name), is_last_in_batch)
                .await;

            match res {
                Ok(outcome) => {
                    retries = 0;
                    cache.insert(name.to_string(), outcome.quote_pair);
                    reports.push(outcome.report);
                }

                Err(e) => match e.disposition() {
                    Disposition::Retry => {
                        retries += 1;

                        if retries < self.config.retry_limit {
                            warn!("{}: {}, retrying in {:?} (attempt {} of {})", name,
                                e, self.config.retry_delay, retries + 1,
                                self.config.retry_limit
                            );
                            sleep(self.config.retry_delay).await;
                            continue
                        }

                        error!("{}: giving up after {} failed attempts, last error: {}",
                            name, retries, e
                        );
                    }

                    Disposition::Skip => {
                        warn!("{}: {}, skipping", name, e);
                    }

                    Disposition::Abort => {
                        error!("{}: {}, aborting job", name, e);
                        return Err(e)
                    }
                },
            }

            self.checkpoint(&cache).await;
            index += 1;
        }

        self.checkpoint(&cache).await;
        info!("Priced {} of {} currencies", reports.len(), symbols.len());

        Ok(reports.join("\n\n"))
    }



    // Checkpoint failure costs only resumability, the report is still valid.
    async fn checkpoint(&self, cache: &PriceCache) {
        if let Err(e) = self.store.persist(cache).await {
            error!("could not persist price cache: {}", e);
        }
    }
}
