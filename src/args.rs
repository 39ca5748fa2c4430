//! Command-line arguments of the pricing job.
use std::path::PathBuf;

use clap::Parser;

use crate::config::DEFAULT_PROFIT_CEILING;



/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about = "Find the best currency exchange spread within a profit ceiling")]
pub struct Args {
    /// Currencies to price, separated by commas, i.e. `chromatic,fusing`.
    #[arg(long, value_delimiter = ',')]
    pub currencies: Vec<String>,

    /// Highest acceptable round trip profit in percent.
    #[arg(long, default_value_t = DEFAULT_PROFIT_CEILING, allow_negative_numbers = true)]
    pub max_profit: i64,

    /// First listing row to analyze, counting from 1.
    #[arg(long)]
    pub start_row: Option<usize>,

    /// Number of rows to analyze from the start row.
    #[arg(long)]
    pub max_row: Option<usize>,

    /// Replay quotes from the cache instead of fetching them.
    #[arg(long)]
    pub offline: bool,

    /// Log debug information.
    #[arg(long, short)]
    pub verbose: bool,

    /// Price cache file.
    #[arg(long, default_value = "currency-cache.json")]
    pub cache: PathBuf,

    /// Keep the price cache in memory only.
    #[arg(long, conflicts_with = "offline")]
    pub no_cache: bool,
}



#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_defaults_and_currency_list() {
        let args = Args::try_parse_from(["currency_spread", "--currencies", "chromatic,vaal"])
            .unwrap();

        assert_eq!(args.currencies, vec!["chromatic", "vaal"]);
        assert_eq!(args.max_profit, 10);
        assert_eq!(args.start_row, None);
        assert!(!args.offline);
        assert_eq!(args.cache, PathBuf::from("currency-cache.json"));
    }

    #[test]
    fn test_negative_ceiling_and_rows() {
        let args = Args::try_parse_from([
            "currency_spread", "--currencies", "divine", "--max-profit", "-5",
            "--start-row", "3", "--max-row", "10", "--offline", "-v",
        ]).unwrap();

        assert_eq!(args.max_profit, -5);
        assert_eq!(args.start_row, Some(3));
        assert_eq!(args.max_row, Some(10));
        assert!(args.offline && args.verbose);

        assert!(Args::try_parse_from(["currency_spread", "--offline", "--no-cache"]).is_err());
    }
}
