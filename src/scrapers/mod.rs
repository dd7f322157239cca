//! Front-page scraping: fetching listing pages and extracting article rows.
//!
//! Scraping is split in two so each half can be exercised on its own:
//!
//! 1. **Fetching**: a [`PageFetcher`] retrieves the raw HTML of one listing page
//!    for a given day and 1-based page number.
//! 2. **Extraction**: a pure function turns that HTML into
//!    [`ExtractedArticle`](crate::models::ExtractedArticle) rows. It performs no
//!    network or storage calls.
//!
//! # Supported Sources
//!
//! | Source | Module | Method | Notes |
//! |--------|--------|--------|-------|
//! | Hacker News | [`hackernews`] | HTML scraping | `/front?day=YYYY-MM-DD&p=N` listings |

pub mod hackernews;

use chrono::NaiveDate;
use std::future::Future;

use crate::error::FetchError;

/// Source of listing-page HTML.
///
/// The HTTP implementation is [`hackernews::HttpFetcher`]; tests substitute
/// scripted pages.
pub trait PageFetcher: Send + Sync {
    /// Human-readable name of the site, used when reporting failures.
    fn site_name(&self) -> &str;

    /// Fetch the raw HTML of listing page `page` (1-based) for `day`.
    ///
    /// An empty body is reported as [`FetchError::EmptyBody`].
    fn fetch_page(
        &self,
        day: NaiveDate,
        page: u32,
    ) -> impl Future<Output = Result<String, FetchError>> + Send;
}
