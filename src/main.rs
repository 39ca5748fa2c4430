use std::process::ExitCode;

use clap::Parser;
use log::{
    debug,
    error,
};

use currency_spread::{
    args::Args,
    config::{
        ApiConfig,
        JobConfig,
    },
    currency::REFERENCE,
    listing_normalizer::ListingNormalizer,
    listing_source::trade_api::TradeApiClient,
    orchestrator::JobOrchestrator,
    price_fetcher::PriceSeriesFetcher,
    storage::{
        json_file::JsonFile,
        memory::Memory,
    },
};



#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_logger(args.verbose);

    // Endpoint settings may come from the environment alone, .env is optional.
    if let Err(e) = dotenv::from_path(".env") {
        debug!("no .env loaded: {}", e);
    }

    if args.currencies.is_empty() {
        error!("No currencies defined");
        return ExitCode::FAILURE
    }

    let config = match JobConfig::new(args.max_profit, args.start_row, args.max_row,
        args.offline
    ) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE
        }
    };

    let api = ApiConfig::from_env();
    let source = match TradeApiClient::new(&api) {
        Ok(source) => source,
        Err(e) => {
            error!("could not build trade API client: {}", e);
            return ExitCode::FAILURE
        }
    };

    let fetcher = PriceSeriesFetcher::new(source, ListingNormalizer::new(REFERENCE.trade_id));

    let res = if args.no_cache {
        JobOrchestrator::new(config, fetcher, Memory::default())
            .run(&args.currencies)
            .await
    }
    else {
        JobOrchestrator::new(config, fetcher, JsonFile::new(&args.cache))
            .run(&args.currencies)
            .await
    };

    match res {
        Ok(report) => {
            println!("{}", report);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Pricing job aborted: {}", e);
            ExitCode::FAILURE
        }
    }
}



fn init_logger(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    }
    else {
        log::LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}
