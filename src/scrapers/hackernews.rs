//! Hacker News front-page scraper.
//!
//! This module scrapes the daily front page archive at
//! `https://news.ycombinator.com/front?day=YYYY-MM-DD&p=N`. Each listing row is
//! a `tr.athing` element whose `.titleline` holds the title link and, for
//! external stories, a `.sitestr` domain label.
//!
//! # URL Pattern
//!
//! External stories link to absolute URLs. Self posts (Ask HN, Show HN without
//! a link) use relative links like `item?id=42428950`, which are resolved
//! against the site origin to `https://news.ycombinator.com/item?id=42428950`.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue, USER_AGENT};
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use tracing::{debug, info, instrument};
use url::Url;

use super::PageFetcher;
use crate::config::ScraperConfig;
use crate::error::{ConfigError, FetchError};
use crate::models::ExtractedArticle;

static ROW_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("tr.athing").expect("static selector"));
static TITLE_LINK_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".titleline a").expect("static selector"));
static SITE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".sitestr").expect("static selector"));

/// Fetches listing pages over HTTP with a fixed set of browser-like headers.
///
/// The underlying [`reqwest::Client`] is built once from a [`ScraperConfig`]
/// and reused for every page.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    front: Url,
    site_name: String,
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new(config: &ScraperConfig) -> Result<Self, ConfigError> {
        Self::with_builder(config, reqwest::Client::builder())
    }

    /// Like [`HttpFetcher::new`], starting from a caller-supplied client builder.
    pub fn with_builder(
        config: &ScraperConfig,
        builder: reqwest::ClientBuilder,
    ) -> Result<Self, ConfigError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, header_value(&config.user_agent, "User-Agent")?);
        headers.insert(ACCEPT, header_value(&config.accept, "Accept")?);
        headers.insert(
            ACCEPT_LANGUAGE,
            header_value(&config.accept_language, "Accept-Language")?,
        );

        let client = builder
            .default_headers(headers)
            .timeout(config.timeout())
            .build()?;

        let front = config
            .origin()?
            .join("front")
            .map_err(|source| ConfigError::BaseUrl {
                url: config.base_url.clone(),
                source,
            })?;

        Ok(Self {
            client,
            front,
            site_name: config.site_name.clone(),
            timeout: config.timeout(),
        })
    }

    fn classify(&self, e: reqwest::Error) -> FetchError {
        if e.is_timeout() {
            FetchError::Timeout(self.timeout)
        } else {
            FetchError::Request(e)
        }
    }
}

impl PageFetcher for HttpFetcher {
    fn site_name(&self) -> &str {
        &self.site_name
    }

    #[instrument(level = "info", skip(self))]
    async fn fetch_page(&self, day: NaiveDate, page: u32) -> Result<String, FetchError> {
        let url = page_url(&self.front, day, page);
        info!(%url, "Scraping page");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body = response.text().await.map_err(|e| self.classify(e))?;
        if body.trim().is_empty() {
            return Err(FetchError::EmptyBody);
        }

        debug!(bytes = body.len(), "Fetched page");
        Ok(body)
    }
}

fn header_value(value: &str, name: &'static str) -> Result<HeaderValue, ConfigError> {
    HeaderValue::from_str(value).map_err(|_| ConfigError::Header(name))
}

/// Build the listing URL for one page: `<front>?day=YYYY-MM-DD&p=N`.
pub fn page_url(front: &Url, day: NaiveDate, page: u32) -> Url {
    let mut url = front.clone();
    url.query_pairs_mut()
        .clear()
        .append_pair("day", &day.format("%Y-%m-%d").to_string())
        .append_pair("p", &page.to_string());
    url
}

/// Extract every listing row from one page of HTML.
///
/// Rows without a usable link or with an empty title are skipped. Rows that
/// carry no `.sitestr` label get `fallback_source` as their source.
pub fn extract_articles(html: &str, origin: &Url, fallback_source: &str) -> Vec<ExtractedArticle> {
    let document = Html::parse_document(html);

    let mut articles = Vec::new();
    for row in document.select(&ROW_SELECTOR) {
        match extract_row(row, origin, fallback_source) {
            Some(article) => articles.push(article),
            None => debug!(id = ?row.value().attr("id"), "Skipping row without usable title link"),
        }
    }

    debug!(count = articles.len(), "Extracted articles from page");
    articles
}

fn extract_row(row: ElementRef<'_>, origin: &Url, fallback_source: &str) -> Option<ExtractedArticle> {
    let link = row.select(&TITLE_LINK_SELECTOR).next()?;

    let title = trimmed_text(link);
    if title.is_empty() {
        return None;
    }

    let url = normalize_url(link.value().attr("href")?, origin)?;

    let source = row
        .select(&SITE_SELECTOR)
        .next()
        .map(trimmed_text)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| fallback_source.to_string());

    Some(ExtractedArticle { title, url, source })
}

fn trimmed_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Keep absolute links as-is; resolve anything else against the site origin.
pub fn normalize_url(href: &str, origin: &Url) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    if href.starts_with("http") {
        return Some(href.to_string());
    }
    origin.join(href).ok().map(|u| u.to_string())
}
