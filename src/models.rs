//! Data models for archived front-page articles and paginated reads.
//!
//! This module defines the core data structures used throughout the application:
//! - [`ExtractedArticle`]: A row pulled out of one listing page, before dating
//! - [`NewArticle`]: A dated candidate record ready for insertion
//! - [`Article`]: A persisted record with its storage-assigned identity
//! - [`SortField`] / [`SortOrder`]: The closed set of orderings a read may request
//! - [`Paginated`]: The envelope returned by paginated reads

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One listing row as extracted from a front-page HTML document.
///
/// The listing format does not expose a per-article timestamp, so the
/// ingestion run attaches its resolved date afterwards via [`ExtractedArticle::dated`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedArticle {
    /// Visible text of the title link, trimmed.
    pub title: String,
    /// Absolute URL of the title link.
    pub url: String,
    /// The `.sitestr` domain label, or the aggregator's own name.
    pub source: String,
}

impl ExtractedArticle {
    /// Stamp this row with the date of the listing page it came from.
    pub fn dated(self, publication_date: NaiveDate) -> NewArticle {
        NewArticle {
            title: self.title,
            url: self.url,
            source: self.source,
            publication_date: Some(publication_date),
        }
    }
}

/// A candidate record that has not been persisted yet (no identity).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewArticle {
    pub title: String,
    pub url: String,
    pub source: String,
    pub publication_date: Option<NaiveDate>,
}

/// A persisted article row.
///
/// `url` is unique across the table and acts as the natural key. Rows are
/// never updated after insertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Article {
    /// Surrogate identity assigned by storage.
    pub id: i64,
    pub title: String,
    pub url: String,
    pub source: String,
    /// The calendar date of the front page the article was listed on.
    pub publication_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Columns a paginated read may be ordered by.
///
/// Each variant maps to a fixed column identifier, so no caller-supplied text
/// ever reaches the `ORDER BY` clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    Id,
    Title,
    Url,
    #[default]
    PublicationDate,
    Source,
    CreatedAt,
    UpdatedAt,
}

impl SortField {
    pub const ALL: [SortField; 7] = [
        SortField::Id,
        SortField::Title,
        SortField::Url,
        SortField::PublicationDate,
        SortField::Source,
        SortField::CreatedAt,
        SortField::UpdatedAt,
    ];

    /// The column identifier used in SQL.
    pub fn column(self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::Title => "title",
            SortField::Url => "url",
            SortField::PublicationDate => "publication_date",
            SortField::Source => "source",
            SortField::CreatedAt => "created_at",
            SortField::UpdatedAt => "updated_at",
        }
    }

    /// Comma-separated allow-list, used in error messages.
    pub fn allowed() -> String {
        SortField::ALL
            .iter()
            .map(|f| f.column())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromStr for SortField {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortField::ALL
            .into_iter()
            .find(|f| f.column() == s)
            .ok_or(())
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// Direction of a paginated read. Descending unless asked otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum SortOrder {
    #[value(name = "ASC", alias = "asc")]
    Asc,
    #[default]
    #[value(name = "DESC", alias = "desc")]
    Desc,
}

impl SortOrder {
    pub fn keyword(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// One page of results plus the bookkeeping a client needs to fetch the next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    pub has_next_page: bool,
}
