//! SQLite implementation of [`ArticleStore`].
//!
//! Uses [`sqlx`] with the `sqlite` feature. Migrations under `./migrations`
//! are embedded at compile time and run on [`SqliteStore::connect`].
//!
//! # Queries
//!
//! The runtime-checked `sqlx::query*` forms are used so no `DATABASE_URL` is
//! needed at compile time. The only dynamic SQL fragments are the `ORDER BY`
//! column and direction, which come from [`SortField::column`] and
//! [`SortOrder::keyword`] and are therefore static strings.
//!
//! [`SortField::column`]: crate::models::SortField::column
//! [`SortOrder::keyword`]: crate::models::SortOrder::keyword

use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use std::str::FromStr;
use tracing::{debug, info, instrument};

use super::{ArticleQuery, ArticleStore};
use crate::models::{Article, NewArticle};

const ARTICLE_COLUMNS: &str = "id, title, url, source, publication_date, created_at, updated_at";

/// Rows per `INSERT` statement. Six binds per row keeps each statement well
/// under SQLite's 32766 bound-parameter limit.
const INSERT_CHUNK_ROWS: usize = 1000;

/// SQLite-backed article store.
#[derive(Clone, Debug)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (or create) the SQLite database at `url` and run pending migrations.
    ///
    /// `url` should be a sqlx-compatible SQLite URL, e.g. `"sqlite://hn_archive.db"`
    /// or `"sqlite::memory:"`. In-memory databases are pinned to a single
    /// connection so every query sees the same data.
    #[instrument(level = "info")]
    pub async fn connect(url: &str) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);

        let mut pool_options = SqlitePoolOptions::new();
        if url.contains(":memory:") {
            pool_options = pool_options
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        }

        let pool = pool_options.connect_with(options).await?;
        // Path is resolved relative to CARGO_MANIFEST_DIR at compile time.
        sqlx::migrate!("./migrations").run(&pool).await?;
        info!("Database ready");
        Ok(Self { pool })
    }

    #[cfg(test)]
    pub async fn in_memory() -> Result<Self, sqlx::Error> {
        Self::connect("sqlite::memory:").await
    }
}

impl ArticleStore for SqliteStore {
    #[instrument(level = "info", skip_all, fields(candidates = articles.len()))]
    async fn insert_ignoring_duplicates(
        &self,
        articles: Vec<NewArticle>,
    ) -> Result<Vec<Article>, sqlx::Error> {
        if articles.is_empty() {
            return Ok(Vec::new());
        }

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;
        let mut inserted = Vec::with_capacity(articles.len());
        for chunk in articles.chunks(INSERT_CHUNK_ROWS) {
            let mut builder = QueryBuilder::<Sqlite>::new(
                "INSERT INTO articles (title, url, publication_date, source, created_at, updated_at) ",
            );
            builder.push_values(chunk, |mut row, article| {
                row.push_bind(article.title.clone())
                    .push_bind(article.url.clone())
                    .push_bind(article.publication_date)
                    .push_bind(article.source.clone())
                    .push_bind(now)
                    .push_bind(now);
            });
            builder.push(" ON CONFLICT (url) DO NOTHING RETURNING ");
            builder.push(ARTICLE_COLUMNS);

            let rows: Vec<Article> = builder.build_query_as().fetch_all(&mut *tx).await?;
            debug!(
                chunk = chunk.len(),
                inserted = rows.len(),
                "Inserted chunk"
            );
            inserted.extend(rows);
        }
        tx.commit().await?;

        // RETURNING order is unspecified; ids follow insertion order.
        inserted.sort_by_key(|article| article.id);

        info!(
            inserted = inserted.len(),
            skipped = articles.len() - inserted.len(),
            "Bulk insert complete"
        );
        Ok(inserted)
    }

    #[instrument(level = "debug", skip(self))]
    async fn count_and_fetch(&self, query: &ArticleQuery) -> Result<(u64, Vec<Article>), sqlx::Error> {
        let filter = if query.published_since.is_some() {
            "WHERE publication_date >= ?"
        } else {
            ""
        };
        let count_sql = format!("SELECT COUNT(*) FROM articles {filter}");
        let page_sql = format!(
            "SELECT {ARTICLE_COLUMNS} FROM articles {filter} ORDER BY {column} {order}, id {order} LIMIT ? OFFSET ?",
            column = query.sort.column(),
            order = query.order.keyword(),
        );

        // Both statements run in one transaction so the total matches the page.
        let mut tx = self.pool.begin().await?;

        let mut count = sqlx::query_scalar::<_, i64>(&count_sql);
        if let Some(since) = query.published_since {
            count = count.bind(since);
        }
        let total = count.fetch_one(&mut *tx).await?;

        let mut page = sqlx::query_as::<_, Article>(&page_sql);
        if let Some(since) = query.published_since {
            page = page.bind(since);
        }
        let rows = page
            .bind(i64::from(query.limit))
            .bind(i64::try_from(query.offset).unwrap_or(i64::MAX))
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await?;

        debug!(total, returned = rows.len(), "Fetched page of articles");
        Ok((u64::try_from(total).unwrap_or_default(), rows))
    }
}
