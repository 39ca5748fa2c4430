use log::info;

use crate::{
    config::JobConfig,
    currency::{
        Currency,
        REFERENCE,
    },
    error::{
        PricingError,
        Result,
    },
    listing_source::ListingSource,
    price_fetcher::PriceSeriesFetcher,
    price_series::QuotePair,
    spread_analyzer::{
        analyze,
        SpreadResult,
    },
};



/// Report of one pair and the quotes it was computed from. Quotes are what
/// goes into the cache, untrimmed.
#[derive(Debug, Clone)]
pub struct PairOutcome {
    pub report: String,
    pub quote_pair: QuotePair,
}



/// Prices a single currency against the reference unit.
#[derive(Debug, Clone)]
pub struct PairRunner {
    currency: Currency,
}



impl PairRunner {
    pub fn new(currency: Currency) -> Self {
        Self { currency }
    }



    pub fn currency(&self) -> Currency {
        self.currency
    }



    /// Fetch (or replay from `cached` when offline) both legs, analyze them
    /// and format the report.
    ///
    /// Legs are fetched one after the other, want -> base first.
    pub async fn run<S: ListingSource>(&self, fetcher: &PriceSeriesFetcher<S>,
        config: &JobConfig, cached: Option<&QuotePair>, is_last_in_batch: bool
    )
        -> Result<PairOutcome>
    {
        let quote_pair = if config.offline {
            let Some(cached) = cached else {
                return Err(PricingError::CacheMiss(self.currency.name.to_string()))
            };

            info!("Replaying cached ratios for {}...", self.currency.name);
            cached.clone()
        }
        else {
            info!("Fetching ratios for {}...", self.currency.name);
            self.fetch(fetcher, config, is_last_in_batch).await?
        };

        let window = quote_pair.window(config.start_row, config.max_rows);
        let result = analyze(&window.want_to_base, &window.base_to_want,
            config.profit_ceiling
        );

        Ok(PairOutcome {
            report: self.report(&result, config),
            quote_pair,
        })
    }



    async fn fetch<S: ListingSource>(&self, fetcher: &PriceSeriesFetcher<S>,
        config: &JobConfig, is_last_in_batch: bool
    )
        -> Result<QuotePair>
    {
        let want = self.currency.trade_id;
        let base = REFERENCE.trade_id;

        // Second leg always follows, first one is never last in batch.
        let want_to_base = fetcher
            .fetch(want, base, config.start_row, config.max_rows, false)
            .await?;

        let base_to_want = fetcher
            .fetch(base, want, config.start_row, config.max_rows, is_last_in_batch)
            .await?;

        Ok(QuotePair {
            want_to_base: want_to_base.series,
            base_to_want: base_to_want.series,
        })
    }



    fn report(&self, result: &SpreadResult, config: &JobConfig) -> String {
        let name = self.currency.name;
        let base = REFERENCE.name;

        let (Some(sell), Some(buy)) = (&result.sell_ratio, &result.buy_ratio) else {
            return format!(
                "{} > {}\nUnresolved: no listings on both legs within the requested rows",
                name, base
            )
        };

        let profit = result.profit_percent;
        let profit_line = match profit {
            0 => "No profit: 0%".to_string(),
            p if p < 1 => format!("Negative profit: {}%", p),
            p => format!("Profit: {}% (~row {})", p, config.start_row + result.row_index),
        };

        let mut lines = vec![
            format!("{} > {}", name, base),
            sell.to_string(),
            format!("{} > {}", base, name),
            buy.to_string(),
            profit_line,
        ];

        if !result.below_ceiling_found {
            lines.push(format!(
                "No match below the {}% profit ceiling, showing the top row",
                config.profit_ceiling
            ));
        }

        lines.join("\n")
    }
}



#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        currency,
        listing_normalizer::ListingNormalizer,
        listing_source::fake::FakeSource,
        price_series::PriceRow,
    };

    fn fetcher(source: FakeSource) -> PriceSeriesFetcher<FakeSource> {
        PriceSeriesFetcher::new(source, ListingNormalizer::new(REFERENCE.trade_id))
    }

    fn runner(name: &str) -> PairRunner {
        PairRunner::new(currency::lookup(name).unwrap())
    }

    fn pair(wtb: &[(u32, u32)], btw: &[(u32, u32)]) -> QuotePair {
        let series = |rows: &[(u32, u32)]| rows.iter()
            .filter_map(|&(s, b)| PriceRow::new(s, b))
            .collect();

        QuotePair {
            want_to_base: series(wtb),
            base_to_want: series(btw),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetches_want_leg_first() {
        let source = FakeSource::new()
            .with_notes("exalted", "chaos", &["68/10", "136/20"])
            .with_notes("chaos", "exalted", &["650/93"]);
        let f = fetcher(source);

        let outcome = runner("exalted")
            .run(&f, &JobConfig::default(), None, true)
            .await
            .unwrap();

        let calls = f.source().calls();
        assert_eq!(calls[0], "discover exalted chaos");
        assert_eq!(calls[2], "discover chaos exalted");
        assert_eq!(outcome.quote_pair, pair(&[(68, 10), (136, 20)], &[(650, 93)]));

        assert_eq!(outcome.report, [
            "exalted > chaos",
            "10/68 (5/34)",
            "chaos > exalted",
            "93/650 (93/650)",
            "Negative profit: -98%",
        ].join("\n"));
    }

    #[tokio::test]
    async fn test_offline_replays_cache() {
        let f = fetcher(FakeSource::new());
        let config = JobConfig { offline: true, ..JobConfig::default() };
        let cached = pair(&[(68, 10)], &[(650, 93)]);

        let outcome = runner("exalted")
            .run(&f, &config, Some(&cached), false)
            .await
            .unwrap();

        assert!(f.source().calls().is_empty());
        assert_eq!(outcome.quote_pair, cached);
        assert!(outcome.report.contains("Negative profit: -98%"));

        let res = runner("exalted").run(&f, &config, None, false).await;
        assert!(matches!(res, Err(PricingError::CacheMiss(..))));
    }

    #[tokio::test]
    async fn test_rows_are_windowed_and_reported() {
        let f = fetcher(FakeSource::new());
        let config = JobConfig {
            offline: true,
            start_row: 2,
            max_rows: 3,
            ..JobConfig::default()
        };

        // Window rows give 5%, 8%, 20%; rows before the window would be -50%.
        let cached = pair(
            &[(10, 1), (10, 1), (10, 1), (10, 1), (10, 1), (10, 1)],
            &[(10, 50), (10, 50), (20, 210), (25, 270), (10, 120), (10, 130)],
        );

        let outcome = runner("vaal").run(&f, &config, Some(&cached), true).await.unwrap();
        let lines: Vec<&str> = outcome.report.lines().collect();

        assert_eq!(lines[0], "vaal > chaos");
        assert_eq!(lines[1], "1/10 (1/10)");
        assert_eq!(lines[3], "270/25 (54/5)");
        assert_eq!(lines[4], "Profit: 8% (~row 4)");
        assert_eq!(lines.len(), 5);
    }

    #[tokio::test]
    async fn test_no_match_and_unresolved_reports() {
        let f = fetcher(FakeSource::new());
        let config = JobConfig { offline: true, ..JobConfig::default() };

        let cached = pair(&[(10, 1), (10, 1)], &[(10, 150), (10, 150)]);
        let outcome = runner("divine").run(&f, &config, Some(&cached), true).await.unwrap();
        assert!(outcome.report.contains("Profit: 50% (~row 1)"));
        assert!(outcome.report.ends_with(
            "No match below the 10% profit ceiling, showing the top row"
        ));

        let cached = pair(&[(10, 1)], &[]);
        let outcome = runner("divine").run(&f, &config, Some(&cached), true).await.unwrap();
        assert!(outcome.report.starts_with("divine > chaos\nUnresolved"));
    }
}
