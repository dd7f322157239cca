//! Article persistence.
//!
//! [`ArticleStore`] is the whole contract the ingestion and query paths rely
//! on: a duplicate-ignoring bulk insert and a combined count-and-fetch. The
//! default implementation is [`sqlite::SqliteStore`].
//!
//! Uniqueness of `url` is the store's job. Callers never check for existing
//! rows before inserting.

pub mod sqlite;

use chrono::NaiveDate;
use std::future::Future;

use crate::models::{Article, NewArticle, SortField, SortOrder};

/// A validated read request: every field is already clamped and typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleQuery {
    /// Only rows with `publication_date >= published_since` when set.
    pub published_since: Option<NaiveDate>,
    pub sort: SortField,
    pub order: SortOrder,
    pub limit: u32,
    pub offset: u64,
}

pub trait ArticleStore: Send + Sync {
    /// Insert `articles`, silently dropping any whose `url` already exists.
    ///
    /// Returns only the rows that were actually written.
    fn insert_ignoring_duplicates(
        &self,
        articles: Vec<NewArticle>,
    ) -> impl Future<Output = Result<Vec<Article>, sqlx::Error>> + Send;

    /// Count every row matching `query`'s filter and fetch one page of them.
    fn count_and_fetch(
        &self,
        query: &ArticleQuery,
    ) -> impl Future<Output = Result<(u64, Vec<Article>), sqlx::Error>> + Send;
}
