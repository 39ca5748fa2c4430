pub mod trade_api;

use async_trait::async_trait;

use crate::error::Result;



/// Response body together with the rate limiting descriptor that came with it.
#[derive(Debug, Clone)]
pub struct SourceResponse<T> {
    pub body: T,
    pub rate_limit: Option<String>,
}



/// Result of listing discovery.
///
/// `query_id` - cursor that page fetches must reference.
/// `listing_ids` - ranked listing identifiers, best offers first.
/// `total` - number of listings upstream claims to have, may exceed ids.
#[derive(Debug, Clone, Default)]
pub struct Discovery {
    pub query_id: String,
    pub listing_ids: Vec<String>,
    pub total: u64,
}



/// Marketplace that lists exchange offers.
///
/// Every call spends one request of the shared rate budget, callers must not
/// issue calls concurrently.
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Discover ranked listings of people selling `base` for `want`.
    async fn discover(&self, want: &str, base: &str)
        -> Result<SourceResponse<Discovery>>;

    /// Fetch price notes of given listings, in the same order as ids. Listings
    /// without a note yield an empty string.
    async fn fetch_page(&self, query_id: &str, listing_ids: &[String])
        -> Result<SourceResponse<Vec<String>>>;
}



#[cfg(test)]
pub mod fake {
    //! Scripted in-memory marketplace used by tests.

    use std::{
        collections::HashMap,
        sync::Mutex,
    };

    use super::*;
    use crate::{
        error::PricingError,
        price_fetcher::PAGE_SIZE,
    };

    type Failure = fn() -> PricingError;

    pub struct FakeSource {
        notes: HashMap<(String, String), Vec<String>>,
        rate_limit: Option<String>,
        failure: Option<Failure>,
        // want -> (discoveries left to fail, error they fail with)
        scripted: Mutex<HashMap<String, (usize, Failure)>>,
        empty_page: Option<usize>,
        calls: Mutex<Vec<String>>,
    }

    impl FakeSource {
        pub fn new() -> Self {
            Self {
                notes: HashMap::new(),
                rate_limit: Some("8:10:60".to_string()),
                failure: None,
                scripted: Mutex::new(HashMap::new()),
                empty_page: None,
                calls: Mutex::new(Vec::new()),
            }
        }

        /// Notes returned for the `want -> base` leg.
        pub fn with_notes(mut self, want: &str, base: &str, notes: &[&str]) -> Self {
            self.notes.insert(
                (want.to_string(), base.to_string()),
                notes.iter().map(|n| n.to_string()).collect(),
            );
            self
        }

        pub fn with_rate_limit(mut self, descriptor: Option<&str>) -> Self {
            self.rate_limit = descriptor.map(str::to_string);
            self
        }

        /// Every discovery fails with the produced error.
        pub fn failing(mut self, failure: Failure) -> Self {
            self.failure = Some(failure);
            self
        }

        /// First `times` discoveries with `want` fail, later ones succeed.
        pub fn failing_first(self, want: &str, times: usize, failure: Failure) -> Self {
            self.scripted.lock().unwrap().insert(want.to_string(), (times, failure));
            self
        }

        /// Page with given 0-based index comes back without notes.
        pub fn with_empty_page(mut self, page: usize) -> Self {
            self.empty_page = Some(page);
            self
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }

        fn scripted_failure(&self, want: &str) -> Option<PricingError> {
            let mut scripted = self.scripted.lock().unwrap();
            let (left, failure) = scripted.get_mut(want)?;

            if *left == 0 {
                return None
            }

            *left -= 1;
            Some((*failure)())
        }
    }

    #[async_trait]
    impl ListingSource for FakeSource {
        async fn discover(&self, want: &str, base: &str)
            -> Result<SourceResponse<Discovery>>
        {
            self.record(format!("discover {} {}", want, base));

            if let Some(failure) = self.failure {
                return Err(failure())
            }

            if let Some(e) = self.scripted_failure(want) {
                return Err(e)
            }

            let count = self.notes
                .get(&(want.to_string(), base.to_string()))
                .map_or(0, Vec::len);

            Ok(SourceResponse {
                body: Discovery {
                    query_id: format!("{}:{}", want, base),
                    listing_ids: (0..count).map(|i| i.to_string()).collect(),
                    total: count as u64,
                },
                rate_limit: self.rate_limit.clone(),
            })
        }

        async fn fetch_page(&self, query_id: &str, listing_ids: &[String])
            -> Result<SourceResponse<Vec<String>>>
        {
            self.record(format!("fetch {} {}", query_id, listing_ids.len()));

            let (want, base) = query_id.split_once(':').unwrap();
            let notes = &self.notes[&(want.to_string(), base.to_string())];
            let indexes: Vec<usize> = listing_ids.iter()
                .map(|id| id.parse().unwrap())
                .collect();

            let page = indexes.first().map(|first| first / PAGE_SIZE);
            let body = if page.is_some() && page == self.empty_page {
                Vec::new()
            }
            else {
                indexes.iter().map(|&i| notes[i].clone()).collect()
            };

            Ok(SourceResponse {
                body,
                rate_limit: self.rate_limit.clone(),
            })
        }
    }
}
