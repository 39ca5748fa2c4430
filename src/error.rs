//! Error taxonomy for the pricing job.
//!
//! Every failure of the fetch, cache and configuration layers ends up in
//! [`PricingError`]. The orchestrator does not inspect variants directly, it
//! asks [`PricingError::disposition`] whether a failed pair should be retried,
//! skipped, or whether the whole job has to stop.



use thiserror::Error;



/// Unified error type of the crate.
#[derive(Error, Debug)]
pub enum PricingError {
    /// Rate-limit descriptor was absent or could not be parsed. Signals an
    /// upstream API contract change.
    #[error("malformed rate limit header: {0:?}")]
    MalformedRateLimitHeader(String),

    /// Upstream returned an empty result set for the requested leg.
    #[error("no listings found for {want} -> {base}")]
    NoListingsFound {
        want: String,
        base: String,
    },

    /// Upstream rate limited (429) or did not know (404) the request.
    #[error("request error: status {status} for {url}")]
    Request {
        status: u16,
        url: String,
    },

    /// Offline replay was requested but the cache has no quotes for the pair.
    #[error("no cached quotes for {0}")]
    CacheMiss(String),

    #[error("cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    /// Anything else the fetch layer produced.
    #[error("unexpected error: {0}")]
    Unknown(String),
}



/// What the job should do with a pair whose run failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Wait and run the same pair again, bounded by the job retry budget.
    Retry,
    /// Log and continue with the next pair.
    Skip,
    /// Stop the whole job.
    Abort,
}



impl PricingError {
    pub fn disposition(&self) -> Disposition {
        match self {
            Self::Request { .. } => Disposition::Retry,

            Self::NoListingsFound { .. } | Self::CacheMiss(..) => Disposition::Skip,

            Self::MalformedRateLimitHeader(..)
            | Self::Io(..)
            | Self::Json(..)
            | Self::Config(..)
            | Self::Unknown(..) => Disposition::Abort,
        }
    }
}



impl From<reqwest::Error> for PricingError {
    fn from(err: reqwest::Error) -> Self {
        let url = err.url().map(|u| u.to_string()).unwrap_or_default();

        match err.status() {
            Some(status) if status == reqwest::StatusCode::TOO_MANY_REQUESTS
                || status == reqwest::StatusCode::NOT_FOUND =>
            {
                PricingError::Request { status: status.as_u16(), url }
            }
            _ => PricingError::Unknown(err.to_string()),
        }
    }
}



/// Crate-wide `Result` alias with [`PricingError`] as the default error.
pub type Result<T, E = PricingError> = std::result::Result<T, E>;



#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_disposition() {
        let err = PricingError::Request { status: 429, url: "x".to_string() };
        assert_eq!(err.disposition(), Disposition::Retry);

        let err = PricingError::NoListingsFound {
            want: "chrom".to_string(),
            base: "chaos".to_string(),
        };
        assert_eq!(err.disposition(), Disposition::Skip);
        assert_eq!(PricingError::CacheMiss("vaal".to_string()).disposition(),
            Disposition::Skip
        );

        let err = PricingError::MalformedRateLimitHeader(String::new());
        assert_eq!(err.disposition(), Disposition::Abort);
        assert_eq!(PricingError::Unknown("boom".to_string()).disposition(),
            Disposition::Abort
        );
    }
}
