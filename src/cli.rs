//! Command-line interface definitions for the archive.
//!
//! This module defines the CLI arguments and subcommands using the `clap` crate.
//! Global options can also be provided via environment variables.

use clap::{Args, Parser, Subcommand};

use crate::models::SortOrder;
use crate::query::{DEFAULT_PAGE, DEFAULT_PAGE_SIZE, ListParams};

/// Command-line arguments for the archive.
///
/// # Examples
///
/// ```sh
/// # Archive today's front page
/// hn_archive ingest
///
/// # Archive a specific day into a specific database
/// hn_archive --database-url sqlite://hn.db ingest --day 2024-06-15
///
/// # Newest articles from the last week, 20 per page
/// hn_archive list --days 7 --page-size 20
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML config file
    #[arg(short, long, env = "HN_ARCHIVE_CONFIG", global = true)]
    pub config: Option<String>,

    /// SQLite database URL (overrides the config file)
    #[arg(long, env = "DATABASE_URL", global = true)]
    pub database_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Scrape one day's front page and archive any new articles
    Ingest {
        /// Day to scrape as YYYY-MM-DD; invalid or future days fall back to today
        #[arg(short, long)]
        day: Option<String>,
    },

    /// Print one page of archived articles as JSON
    List(ListArgs),
}

/// Read parameters for `list`, passed to the query service unvalidated.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct ListArgs {
    #[arg(long, default_value_t = DEFAULT_PAGE, allow_negative_numbers = true)]
    pub page: i64,

    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE, allow_negative_numbers = true)]
    pub page_size: i64,

    /// Only articles published within this many days
    #[arg(long)]
    pub days: Option<i64>,

    /// Column to sort by (id, title, url, publication_date, source, created_at, updated_at)
    #[arg(long)]
    pub sort_by: Option<String>,

    #[arg(long, value_enum, default_value_t = SortOrder::Desc)]
    pub order: SortOrder,
}

impl From<&ListArgs> for ListParams {
    fn from(args: &ListArgs) -> Self {
        Self {
            page: args.page,
            page_size: args.page_size,
            days: args.days,
            sort_by: args.sort_by.clone(),
            order: args.order,
        }
    }
}
