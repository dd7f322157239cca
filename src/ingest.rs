//! The ingestion run: resolve the day, walk its listing pages until one comes
//! back empty, then persist everything in one duplicate-ignoring insert.
//!
//! # Termination
//!
//! The listing format has no last-page marker. A page yielding zero
//! extractable rows ends the run; `max_pages` caps the walk in case the
//! upstream markup changes and every page starts looking non-empty.
//!
//! # Failure
//!
//! Pages are fetched strictly one at a time. The first fetch failure aborts
//! the run and nothing gathered so far is written.

use chrono::NaiveDate;
use std::time::Instant;
use tracing::{info, instrument, warn};
use url::Url;

use crate::config::ScraperConfig;
use crate::dates;
use crate::error::{ConfigError, IngestError};
use crate::models::{Article, NewArticle};
use crate::scrapers::PageFetcher;
use crate::scrapers::hackernews::extract_articles;
use crate::store::ArticleStore;

/// Drives one ingestion run against a fetcher and a store.
#[derive(Debug)]
pub struct Ingestor<F, S> {
    fetcher: F,
    store: S,
    origin: Url,
    fallback_source: String,
    max_pages: u32,
}

impl<F, S> Ingestor<F, S>
where
    F: PageFetcher,
    S: ArticleStore,
{
    pub fn new(fetcher: F, store: S, config: &ScraperConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            fetcher,
            store,
            origin: config.origin()?,
            fallback_source: config.site_name.clone(),
            max_pages: config.max_pages.max(1),
        })
    }

    #[cfg(test)]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Ingest the front page for `day` (today when absent, invalid or in the future).
    ///
    /// Returns the rows the store reports as newly persisted, which excludes
    /// any `url` already archived.
    #[instrument(level = "info", skip(self))]
    pub async fn run(&self, day: Option<&str>) -> Result<Vec<Article>, IngestError> {
        let t0 = Instant::now();
        let date = dates::resolve_date(day);
        info!(%date, "Scraping articles for date");

        let candidates = self.collect(date).await?;
        let saved = self.store.insert_ignoring_duplicates(candidates).await?;

        info!(
            %date,
            saved = saved.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Ingestion run complete"
        );
        Ok(saved)
    }

    /// Fetch and extract pages for `date` until one yields no rows.
    async fn collect(&self, date: NaiveDate) -> Result<Vec<NewArticle>, IngestError> {
        let mut candidates = Vec::new();

        for page in 1..=self.max_pages {
            let html = self
                .fetcher
                .fetch_page(date, page)
                .await
                .map_err(|source| IngestError::Scrape {
                    site: self.fetcher.site_name().to_string(),
                    source,
                })?;

            let rows = extract_articles(&html, &self.origin, &self.fallback_source);
            if rows.is_empty() {
                info!(%date, page, "No more articles found");
                return Ok(candidates);
            }

            info!(page, count = rows.len(), "Extracted articles");
            candidates.extend(rows.into_iter().map(|row| row.dated(date)));
        }

        warn!(
            %date,
            max_pages = self.max_pages,
            collected = candidates.len(),
            "Reached page limit before an empty page; stopping"
        );
        Ok(candidates)
    }
}
