//! Job and marketplace configuration.
//!
//! [`JobConfig`] is what the operator asks for on the command line,
//! [`ApiConfig`] describes the marketplace endpoint and comes from environment
//! (optionally loaded from `.env`). Both are passed down explicitly, there is
//! no process wide configuration state.



use std::{
    env,
    time::Duration,
};

use log::warn;

use crate::{
    error::{
        PricingError,
        Result,
    },
    price_fetcher::{
        MAX_PAGES,
        PAGE_SIZE,
    },
};



pub const DEFAULT_PROFIT_CEILING: i64 = 10;

/// Highest row the marketplace lets us page to.
pub const MAX_ROW_SPAN: usize = PAGE_SIZE * MAX_PAGES;

pub const RETRY_LIMIT: u32 = 3;
pub const RETRY_DELAY: Duration = Duration::from_secs(20);

const DEFAULT_TIMEOUT_SECS: u64 = 10;



/// Parameters of a single pricing job.
///
/// `start_row` - 0-based first row taken into analysis.
/// `max_rows` - how many rows from `start_row` are analyzed.
/// `offline` - replay cached quotes instead of fetching.
/// `retry_limit` - attempts per job before a rate limited pair is given up.
/// `retry_delay` - pause before a rate limited pair is attempted again.
#[derive(Debug, Clone)]
pub struct JobConfig {
    pub profit_ceiling: i64,
    pub start_row: usize,
    pub max_rows: usize,
    pub offline: bool,
    pub retry_limit: u32,
    pub retry_delay: Duration,
}



impl Default for JobConfig {
    fn default() -> Self {
        Self {
            profit_ceiling: DEFAULT_PROFIT_CEILING,
            start_row: 0,
            max_rows: MAX_ROW_SPAN,
            offline: false,
            retry_limit: RETRY_LIMIT,
            retry_delay: RETRY_DELAY,
        }
    }
}



impl JobConfig {
    /// Build job configuration from operator input.
    ///
    /// `start_row` is 1-based as the operator counts rows. Without `max_rows`
    /// everything up to the paging ceiling is analyzed.
    pub fn new(profit_ceiling: i64, start_row: Option<usize>, max_rows: Option<usize>,
        offline: bool
    )
        -> Result<Self>
    {
        let start_row = start_row.unwrap_or(1).saturating_sub(1);

        if start_row >= MAX_ROW_SPAN {
            return Err(PricingError::Config(
                format!("start row cannot be higher than {}", MAX_ROW_SPAN)
            ))
        }

        let max_rows = max_rows.unwrap_or(MAX_ROW_SPAN - start_row);

        if max_rows == 0 {
            return Err(PricingError::Config("max row must be at least 1".to_string()))
        }

        if start_row + max_rows > MAX_ROW_SPAN {
            return Err(PricingError::Config(
                format!("start row + max row cannot be higher than {}", MAX_ROW_SPAN)
            ))
        }

        Ok(Self {
            profit_ceiling,
            start_row,
            max_rows,
            offline,
            ..Self::default()
        })
    }
}



/// Marketplace endpoint settings.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub league: String,
    pub rate_limit_header: String,
    pub user_agent: String,
    pub timeout: Duration,
}



macro_rules! env_load_or_default {
    ($name:expr, $default:expr) => {{
        match env::var($name) {
            Ok(val) => val,
            Err(..) => $default.to_string(),
        }
    }}
}



impl ApiConfig {
    /// Load configuration from ENV.
    pub fn from_env() -> Self {
        let timeout = timeout_secs(&env_load_or_default!("TRADE_TIMEOUT_SECS", "10"));

        Self {
            base_url: env_load_or_default!("TRADE_API_URL",
                "https://www.pathofexile.com/api/trade"
            ),
            league: env_load_or_default!("TRADE_LEAGUE", "Standard"),
            rate_limit_header: env_load_or_default!("RATE_LIMIT_HEADER",
                "x-rate-limit-ip"
            ),
            user_agent: env_load_or_default!("TRADE_USER_AGENT",
                concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"))
            ),
            timeout: Duration::from_secs(timeout),
        }
    }
}



fn timeout_secs(raw: &str) -> u64 {
    match raw.trim().parse() {
        Ok(secs) => secs,
        Err(..) => {
            warn!("TRADE_TIMEOUT_SECS={:?} is not a number of seconds, using {}",
                raw, DEFAULT_TIMEOUT_SECS
            );
            DEFAULT_TIMEOUT_SECS
        }
    }
}
