//! Currency Tracker CLI
//!
//! Fetches FX quotes from the price feed, keeps the latest set per target
//! currency in a local JSON store, and converts amounts with cached quotes.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::anyhow;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use currency_tracker_quotes::{
    CurrencyConverter, JsonFileQuoteStore, LocalQuoteCache, QuoteLoadUseCase, QuoteRefresher,
    QuoteStore, RemoteQuoteLoader, ReqwestHttpClient, TrackerConfig,
};

mod catalog;
mod report;

/// Currency Tracker CLI
#[derive(Parser, Debug)]
#[command(name = "tracker")]
#[command(about = "Fetch, cache and convert foreign-exchange quotes")]
struct Args {
    /// Feed base URL (overrides TRACKER_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Quote store file (overrides TRACKER_STORE_PATH)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load the latest quotes from the feed and replace the cached set
    Fetch {
        /// Currency the quotes are denominated in
        #[arg(short, long, default_value = "BRL")]
        target: String,

        /// Comma separated source currencies
        #[arg(short, long, value_delimiter = ',', default_value = "USD,EUR,BTC")]
        sources: Vec<String>,
    },

    /// Print the cached quotes for a target currency
    Show {
        /// Currency the quotes are denominated in
        #[arg(short, long, default_value = "BRL")]
        target: String,
    },

    /// Convert an amount using cached quotes
    Convert {
        #[arg(long)]
        from: String,

        #[arg(long)]
        to: String,

        #[arg(long, default_value = "1")]
        amount: Decimal,
    },
}

impl Args {
    fn apply(&self, config: &mut TrackerConfig) {
        if let Some(url) = &self.base_url {
            config.base_url = url.clone();
        }
        if let Some(path) = &self.store {
            config.store_path = path.clone();
        }
        if self.json_logs {
            config.log_json = true;
        }
    }
}

fn init_logging(config: &TrackerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str()));
    let registry = tracing_subscriber::registry().with(filter);

    if config.log_json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = TrackerConfig::from_env();
    args.apply(&mut config);
    init_logging(&config);

    if let Err(e) = config.validate() {
        error!(error = %e, "Invalid configuration");
        return Err(anyhow!("Configuration error: {}", e));
    }

    let store: Arc<dyn QuoteStore> = Arc::new(JsonFileQuoteStore::new(&config.store_path));
    let cache = LocalQuoteCache::new(store);

    match args.command {
        Command::Fetch { target, sources } => {
            let target = catalog::lookup(&target)?;
            let sources = catalog::resolve(&sources)?;

            let client = Arc::new(ReqwestHttpClient::with_timeout(config.request_timeout));
            let loader = Arc::new(RemoteQuoteLoader::new(client));
            let base_url = config.parsed_base_url().map_err(|e| anyhow!(e))?;
            let refresher = QuoteRefresher::new(QuoteLoadUseCase::new(base_url, loader)?, cache);

            info!(
                code_in = %target,
                sources = sources.len(),
                store = %config.store_path.display(),
                "Fetching quotes"
            );

            let quotes = refresher.refresh(target.code(), &sources).await?;
            if quotes.is_empty() {
                println!("Feed returned no quotes for {}", target.code());
            }
            for quote in &quotes {
                println!("{}", report::quote_line(quote));
            }
        }
        Command::Show { target } => {
            let target = catalog::lookup(&target)?;
            let quotes = cache.load(target.code()).await?;

            if quotes.is_empty() {
                println!("No cached quotes for {}", target.code());
            }
            for quote in &quotes {
                println!("{}", report::cached_quote_line(quote));
            }
        }
        Command::Convert { from, to, amount } => {
            let from = catalog::lookup(&from)?;
            let to = catalog::lookup(&to)?;

            let conversion = CurrencyConverter::new(cache).convert(&from, &to, amount).await?;
            println!("{}", report::conversion_line(&conversion));
        }
    }

    Ok(())
}
