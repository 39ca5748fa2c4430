//! Module that interprets marketplace rate limiting descriptors.
//!
//! Every marketplace response carries a descriptor like `8:10:60,15:60:120`,
//! a comma separated list of `count:windowSeconds:throttleSeconds` rules. Only
//! the first (base) rule is used to pace requests.
//!
//! # Possible future improvements
//! 1. Honor every rule of the descriptor instead of only the first one, and
//! combine it with the `*-State` header that reports current usage.
//! 2. Respect `Retry-After` on status 429 instead of the fixed job backoff.



use std::time::Duration;

use crate::error::{
    PricingError,
    Result,
};



/// Rate limiting information of a single response.
///
/// This is re-derived from every response and never outlives the fetch call
/// that received it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitState {
    pub requests_allowed: u64,
    pub window_seconds: u64,
    pub throttle_seconds: u64,
}



impl RateLimitState {
    /// Parse rate limiting descriptor attached to a response.
    ///
    /// Missing or unparsable descriptor is an error, since that means the
    /// endpoint changed its contract and we can not pace requests safely.
    pub fn parse(descriptor: Option<&str>) -> Result<Self> {
        let Some(raw) = descriptor else {
            return Err(PricingError::MalformedRateLimitHeader(String::new()))
        };

        let malformed = || PricingError::MalformedRateLimitHeader(raw.to_string());

        let rule = raw.split(',').next().unwrap_or_default();
        let fields: Vec<&str> = rule.trim().split(':').collect();
        let &[count, window, throttle] = fields.as_slice() else {
            return Err(malformed())
        };

        let parse_field = |field: &str| field.trim().parse::<u64>().map_err(|_| malformed());

        Ok(Self {
            requests_allowed: parse_field(count)?,
            window_seconds: parse_field(window)?,
            throttle_seconds: parse_field(throttle)?,
        })
    }



    /// Milliseconds to wait before next request is safe.
    ///
    /// When the rule allows a single request per window, that request was just
    /// spent, so we must sit out the whole window.
    pub fn wait_millis(&self) -> u64 {
        if self.requests_allowed == 1 {
            self.window_seconds.saturating_mul(1000)
        }
        else {
            0
        }
    }



    #[inline]
    pub fn wait(&self) -> Duration {
        Duration::from_millis(self.wait_millis())
    }
}



#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_wait_depends_on_allowed_requests() {
        let state = RateLimitState::parse(Some("8:10:60")).unwrap();
        assert_eq!(state, RateLimitState {
            requests_allowed: 8,
            window_seconds: 10,
            throttle_seconds: 60,
        });
        assert_eq!(state.wait_millis(), 0);

        let state = RateLimitState::parse(Some("1:10:60")).unwrap();
        assert_eq!(state.wait_millis(), 10000);
        assert_eq!(state.wait(), Duration::from_secs(10));
    }

    #[test]
    fn test_huge_window_saturates() {
        let state = RateLimitState::parse(Some("1:18446744073709551615:60")).unwrap();
        assert_eq!(state.wait_millis(), u64::MAX);
        assert_eq!(state.wait(), Duration::from_millis(u64::MAX));
    }

    #[test]
    fn test_only_first_rule_is_honored() {
        let state = RateLimitState::parse(Some("1:4:60,15:60:120,60:300:1800"))
            .unwrap();
        assert_eq!(state.requests_allowed, 1);
        assert_eq!(state.window_seconds, 4);
        assert_eq!(state.wait_millis(), 4000);
    }

    #[test]
    fn test_malformed_descriptors() {
        for raw in ["", "8:10", "8:10:60:5", "a:10:60", "8:-1:60", ",1:10:60"] {
            let res = RateLimitState::parse(Some(raw));
            assert!(
                matches!(res, Err(PricingError::MalformedRateLimitHeader(..))),
                "descriptor {:?} should be rejected", raw
            );
        }

        assert!(matches!(RateLimitState::parse(None),
            Err(PricingError::MalformedRateLimitHeader(..))
        ));
    }
}
