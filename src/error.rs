//! Error types for fetching, ingestion, querying and configuration.
//!
//! The split mirrors how callers react:
//! - [`IngestError::Scrape`] means the upstream site failed and the whole run
//!   was abandoned without persisting anything.
//! - [`QueryError::InvalidSortField`] is a bad request and is never wrapped,
//!   so it stays distinguishable from storage failures.

use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;

use crate::models::SortField;

/// Failure to retrieve one listing page.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("{0}")]
    Request(#[source] reqwest::Error),

    #[error("unexpected HTTP status {0}")]
    Status(StatusCode),

    #[error("no data received")]
    EmptyBody,
}

/// Failure of an ingestion run.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Failed to scrape {site}: {source}")]
    Scrape {
        site: String,
        #[source]
        source: FetchError,
    },

    #[error("database error: {0}")]
    Storage(#[from] sqlx::Error),
}

/// Failure of a paginated read.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("Invalid sort field `{0}`. Must be one of: {allowed}", allowed = SortField::allowed())]
    InvalidSortField(String),

    #[error("database error: {0}")]
    Storage(#[from] sqlx::Error),
}

/// Failure to assemble the runtime configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid base URL `{url}`: {source}")]
    BaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("invalid header value for {0}")]
    Header(&'static str),

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}
