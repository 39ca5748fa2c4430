//! Fetches one leg of a currency pair under the marketplace rate budget.
//!
//! A fetch is one discovery request followed by up to [`MAX_PAGES`] page
//! requests of [`PAGE_SIZE`] listings. Requests are strictly sequential, every
//! one of them spends the shared budget, so after each response we sleep as
//! long as its rate limiting descriptor requires.



use std::time::Duration;

use log::debug;
use tokio::time::sleep;

use crate::{
    error::{
        PricingError,
        Result,
    },
    listing_normalizer::ListingNormalizer,
    listing_source::{
        Discovery,
        ListingSource,
    },
    price_series::PriceSeries,
    rate_limit::RateLimitState,
};



/// Listings per page, upstream does not return more per fetch.
pub const PAGE_SIZE: usize = 20;

/// Pages upstream lets us fetch for a single discovery.
pub const MAX_PAGES: usize = 3;



/// Series of one leg and rate limiting state of the final request.
///
/// Caller can use `rate_limit` to decide how long to wait before next pair.
#[derive(Debug, Clone)]
pub struct FetchedSeries {
    pub series: PriceSeries,
    pub rate_limit: RateLimitState,
}



pub struct PriceSeriesFetcher<S> {
    source: S,
    normalizer: ListingNormalizer,
}



impl<S: ListingSource> PriceSeriesFetcher<S> {
    pub fn new(source: S, normalizer: ListingNormalizer) -> Self {
        Self {
            source,
            normalizer,
        }
    }



    pub fn source(&self) -> &S {
        &self.source
    }



    /// Fetch `want -> base` listings covering rows
    /// `[start_row, start_row + max_rows)`.
    ///
    /// `is_last_in_batch` - when false, we sleep out the remaining budget
    /// before returning so that next fetch never bursts past the limit.
    pub async fn fetch(&self, want: &str, base: &str, start_row: usize,
        max_rows: usize, is_last_in_batch: bool
    )
        -> Result<FetchedSeries>
    {
        let discovery = self.source.discover(want, base).await?;
        let discovery_limit = RateLimitState::parse(discovery.rate_limit.as_deref())?;

        let Discovery { query_id, listing_ids, total } = discovery.body;
        if listing_ids.is_empty() {
            return Err(PricingError::NoListingsFound {
                want: want.to_string(),
                base: base.to_string(),
            })
        }

        let pages = pages_needed(start_row, max_rows, listing_ids.len());
        debug!("{} -> {}: {} listings ({} total), fetching {} pages", want, base,
            listing_ids.len(), total, pages
        );

        // Discovery request spent the budget just like any page does.
        pace(discovery_limit.wait()).await;

        let mut notes = Vec::with_capacity(pages * PAGE_SIZE);
        let mut last_limit = discovery_limit;

        for (page, ids) in listing_ids.chunks(PAGE_SIZE).take(pages).enumerate() {
            let response = self.source.fetch_page(&query_id, ids).await?;
            last_limit = RateLimitState::parse(response.rate_limit.as_deref())?;

            // Upstream has nothing more for us, this is a normal end.
            if response.body.is_empty() {
                debug!("{} -> {}: page {} came back empty, stop paging", want,
                    base, page + 1
                );
                break
            }

            notes.extend(response.body);

            if page + 1 < pages {
                pace(last_limit.wait()).await;
            }
        }

        let series = self.normalizer.normalize(&notes, want, base);

        if !is_last_in_batch {
            pace(last_limit.wait().max(discovery_limit.wait())).await;
        }

        Ok(FetchedSeries {
            series,
            rate_limit: last_limit,
        })
    }
}



/// Pages required to cover `[start_row, start_row + max_rows)`, limited by the
/// upstream page ceiling and by the listings discovery returned.
pub fn pages_needed(start_row: usize, max_rows: usize, listings: usize) -> usize {
    let wanted = start_row.saturating_add(max_rows).div_ceil(PAGE_SIZE);
    let available = listings.div_ceil(PAGE_SIZE);

    wanted.min(MAX_PAGES).min(available)
}



async fn pace(wait: Duration) {
    if wait.is_zero() {
        return
    }

    debug!("rate limit reached, sleeping {:?}", wait);
    sleep(wait).await;
}
