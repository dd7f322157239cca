//! # HN Archive
//!
//! Archives the Hacker News daily front page into SQLite and serves paginated
//! reads over what has been collected.
//!
//! ## Usage
//!
//! ```sh
//! hn_archive ingest --day 2024-06-15
//! hn_archive list --days 7 --sort-by title --order ASC
//! ```
//!
//! ## Architecture
//!
//! Ingestion is a sequential pipeline:
//! 1. **Date resolution**: the requested day, or today when it is missing, invalid or in the future
//! 2. **Fetching**: listing pages `p=1, 2, …` until one yields no articles
//! 3. **Extraction**: article rows pulled out of each page's HTML
//! 4. **Persistence**: one bulk insert that silently skips already-archived URLs
//!
//! Reads validate the sort column against a fixed allow-list, clamp paging
//! parameters, and run a single count-and-fetch.
//!
//! Results are printed to stdout as JSON; logs go to stderr.

use clap::Parser;
use serde::Serialize;
use std::error::Error;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod dates;
mod error;
mod ingest;
mod models;
mod query;
mod scrapers;
mod store;

use cli::{Cli, Command};
use config::AppConfig;
use ingest::Ingestor;
use query::{ArticleQueryService, ListParams};
use scrapers::hackernews::HttpFetcher;
use store::sqlite::SqliteStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let mut config = AppConfig::load(args.config.as_deref())?;
    if let Some(database_url) = args.database_url {
        config.database_url = database_url;
    }

    let store = SqliteStore::connect(&config.database_url).await?;

    match &args.command {
        Command::Ingest { day } => {
            let fetcher = HttpFetcher::new(&config.scraper)?;
            let ingestor = Ingestor::new(fetcher, store, &config.scraper)?;
            match ingestor.run(day.as_deref()).await {
                Ok(saved) => print_json(&saved)?,
                Err(e) => {
                    error!(error = %e, "Ingestion failed");
                    return Err(e.into());
                }
            }
        }
        Command::List(list) => {
            let service = ArticleQueryService::new(store);
            match service.list(ListParams::from(list)).await {
                Ok(page) => print_json(&page)?,
                Err(e) => {
                    error!(error = %e, "Listing articles failed");
                    return Err(e.into());
                }
            }
        }
    }

    let elapsed = start_time.elapsed();
    info!(?elapsed, "Execution complete");
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
