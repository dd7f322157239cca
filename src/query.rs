//! Paginated, sortable, date-filtered reads over archived articles.
//!
//! This is the single place where caller-supplied read parameters are
//! validated. The sort field arrives as free text and is checked against the
//! allow-list in [`SortField`]; anything else is rejected before storage is
//! touched.

use chrono::{Duration, NaiveDate};
use tracing::{debug, instrument, warn};

use crate::dates;
use crate::error::QueryError;
use crate::models::{Article, Paginated, SortField, SortOrder};
use crate::store::{ArticleQuery, ArticleStore};

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Raw read parameters, as a caller would hand them over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListParams {
    pub page: i64,
    pub page_size: i64,
    /// Restrict to articles published within the last `days` days.
    pub days: Option<i64>,
    pub sort_by: Option<String>,
    pub order: SortOrder,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
            days: None,
            sort_by: None,
            order: SortOrder::default(),
        }
    }
}

/// Read side of the archive.
#[derive(Debug, Clone)]
pub struct ArticleQueryService<S> {
    store: S,
}

impl<S: ArticleStore> ArticleQueryService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    #[instrument(level = "info", skip(self))]
    pub async fn list(&self, params: ListParams) -> Result<Paginated<Article>, QueryError> {
        let sort = match params.sort_by.as_deref() {
            None => SortField::default(),
            Some(raw) => raw.parse::<SortField>().map_err(|_| {
                warn!(sort_by = raw, "Rejecting unsupported sort field");
                QueryError::InvalidSortField(raw.to_string())
            })?,
        };

        let page = clamp_page(params.page);
        let page_size = clamp_page_size(params.page_size);

        let published_since = params.days.and_then(|days| window_start(days, dates::today()));

        let query = ArticleQuery {
            published_since,
            sort,
            order: params.order,
            limit: page_size,
            offset: u64::from(page - 1) * u64::from(page_size),
        };
        debug!(?query, "Running paginated article query");

        let (total, data) = self.store.count_and_fetch(&query).await?;

        Ok(Paginated {
            data,
            total,
            page,
            page_size,
            has_next_page: has_next_page(page, page_size, total),
        })
    }
}

/// Pages are 1-based; anything lower becomes the first page.
pub fn clamp_page(page: i64) -> u32 {
    page.clamp(1, i64::from(u32::MAX)) as u32
}

pub fn clamp_page_size(page_size: i64) -> u32 {
    page_size.clamp(1, i64::from(MAX_PAGE_SIZE)) as u32
}

/// First calendar day inside a window of the last `days` days ending `today`.
///
/// The cutoff is `now - days` at the current time of day, so the day exactly
/// `days` back is already outside the window. `days <= 0` means no window.
pub fn window_start(days: i64, today: NaiveDate) -> Option<NaiveDate> {
    if days <= 0 {
        return None;
    }
    Duration::try_days(days - 1).and_then(|span| today.checked_sub_signed(span))
}

/// `page < ceil(total / page_size)`.
pub fn has_next_page(page: u32, page_size: u32, total: u64) -> bool {
    let total_pages = total.div_ceil(u64::from(page_size));
    u64::from(page) < total_pages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewArticle;
    use crate::store::sqlite::SqliteStore;
    use chrono::Utc;
    use std::sync::Mutex;

    /// Records every query and answers with a fixed total and no rows.
    #[derive(Default)]
    struct RecordingStore {
        total: u64,
        queries: Mutex<Vec<ArticleQuery>>,
    }

    impl RecordingStore {
        fn with_total(total: u64) -> Self {
            Self {
                total,
                ..Self::default()
            }
        }

        fn queries(&self) -> Vec<ArticleQuery> {
            self.queries.lock().unwrap().clone()
        }
    }

    impl ArticleStore for &RecordingStore {
        async fn insert_ignoring_duplicates(
            &self,
            _articles: Vec<NewArticle>,
        ) -> Result<Vec<Article>, sqlx::Error> {
            Ok(Vec::new())
        }

        async fn count_and_fetch(
            &self,
            query: &ArticleQuery,
        ) -> Result<(u64, Vec<Article>), sqlx::Error> {
            self.queries.lock().unwrap().push(query.clone());
            Ok((self.total, Vec::new()))
        }
    }

    #[tokio::test]
    async fn test_invalid_sort_field_is_rejected_without_storage_access() {
        let store = RecordingStore::default();
        let service = ArticleQueryService::new(&store);

        let err = service
            .list(ListParams {
                sort_by: Some("invalidField".to_string()),
                order: SortOrder::Asc,
                ..ListParams::default()
            })
            .await
            .unwrap_err();

        assert!(matches!(err, QueryError::InvalidSortField(ref f) if f == "invalidField"));
        assert!(store.queries().is_empty());
    }

    #[tokio::test]
    async fn test_defaults() {
        let store = RecordingStore::with_total(2);
        let service = ArticleQueryService::new(&store);

        let result = service.list(ListParams::default()).await.unwrap();

        assert_eq!(
            store.queries(),
            vec![ArticleQuery {
                published_since: None,
                sort: SortField::PublicationDate,
                order: SortOrder::Desc,
                limit: 10,
                offset: 0,
            }]
        );
        assert_eq!(result.total, 2);
        assert_eq!(result.page, 1);
        assert_eq!(result.page_size, 10);
        assert!(!result.has_next_page);
    }

    #[tokio::test]
    async fn test_custom_page_sort_and_order() {
        let store = RecordingStore::with_total(1);
        let service = ArticleQueryService::new(&store);

        let result = service
            .list(ListParams {
                page: 2,
                page_size: 5,
                sort_by: Some("id".to_string()),
                order: SortOrder::Asc,
                ..ListParams::default()
            })
            .await
            .unwrap();

        let query = &store.queries()[0];
        assert_eq!(query.sort, SortField::Id);
        assert_eq!(query.order, SortOrder::Asc);
        assert_eq!(query.limit, 5);
        assert_eq!(query.offset, 5);
        assert_eq!(result.page, 2);
        assert_eq!(result.page_size, 5);
        assert!(!result.has_next_page);
    }

    #[tokio::test]
    async fn test_page_and_page_size_are_clamped() {
        let store = RecordingStore::with_total(1000);
        let service = ArticleQueryService::new(&store);

        let result = service
            .list(ListParams {
                page: 0,
                page_size: 1000,
                ..ListParams::default()
            })
            .await
            .unwrap();

        assert_eq!(result.page, 1);
        assert_eq!(result.page_size, 100);
        assert_eq!(store.queries()[0].offset, 0);
        assert!(result.has_next_page);

        let result = service
            .list(ListParams {
                page: -3,
                page_size: 0,
                ..ListParams::default()
            })
            .await
            .unwrap();
        assert_eq!(result.page, 1);
        assert_eq!(result.page_size, 1);
    }

    #[tokio::test]
    async fn test_days_window_sets_threshold() {
        let store = RecordingStore::default();
        let service = ArticleQueryService::new(&store);

        service
            .list(ListParams {
                days: Some(7),
                ..ListParams::default()
            })
            .await
            .unwrap();
        service
            .list(ListParams {
                days: Some(0),
                ..ListParams::default()
            })
            .await
            .unwrap();

        let queries = store.queries();
        assert_eq!(
            queries[0].published_since,
            Some(dates::today() - Duration::days(6))
        );
        assert_eq!(queries[1].published_since, None);
    }

    #[test]
    fn test_window_start_excludes_the_day_exactly_days_back() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        assert_eq!(window_start(1, today), Some(today));
        assert_eq!(window_start(7, today), NaiveDate::from_ymd_opt(2024, 6, 9));
        assert_eq!(window_start(0, today), None);
        assert_eq!(window_start(-5, today), None);
        assert_eq!(window_start(i64::MAX, today), None);
    }

    #[tokio::test]
    async fn test_days_window_boundary_against_sqlite() {
        let store = SqliteStore::in_memory().await.unwrap();
        let today = Utc::now().date_naive();
        let dated = |title: &str, days_back: i64| NewArticle {
            title: title.to_string(),
            url: format!("https://example.com/{days_back}"),
            source: "example.com".to_string(),
            publication_date: Some(today - Duration::days(days_back)),
        };
        store
            .insert_ignoring_duplicates(vec![dated("Seven days back", 7), dated("Six days back", 6)])
            .await
            .unwrap();

        let service = ArticleQueryService::new(store);
        let result = service
            .list(ListParams {
                days: Some(7),
                ..ListParams::default()
            })
            .await
            .unwrap();

        assert_eq!(result.total, 1);
        assert_eq!(result.data[0].title, "Six days back");
    }

    #[test]
    fn test_has_next_page_boundaries() {
        for (page, size, total) in [(1, 10, 0), (1, 10, 10), (2, 5, 10), (3, 5, 11), (1, 100, 100)] {
            let expected = u64::from(page) * u64::from(size) < total;
            assert_eq!(has_next_page(page, size, total), expected, "{page} {size} {total}");
        }
        assert!(has_next_page(1, 10, 11));
        assert!(!has_next_page(2, 10, 11));
    }

    #[tokio::test]
    async fn test_list_against_sqlite() {
        let store = SqliteStore::in_memory().await.unwrap();
        let today = Utc::now().date_naive();
        let old = NaiveDate::from_ymd_opt(2001, 1, 1).unwrap();
        store
            .insert_ignoring_duplicates(vec![
                NewArticle {
                    title: "Fresh".to_string(),
                    url: "https://example.com/fresh".to_string(),
                    source: "example.com".to_string(),
                    publication_date: Some(today),
                },
                NewArticle {
                    title: "Stale".to_string(),
                    url: "https://example.com/stale".to_string(),
                    source: "example.com".to_string(),
                    publication_date: Some(old),
                },
            ])
            .await
            .unwrap();

        let service = ArticleQueryService::new(store);
        let recent = service
            .list(ListParams {
                days: Some(7),
                ..ListParams::default()
            })
            .await
            .unwrap();
        assert_eq!(recent.total, 1);
        assert_eq!(recent.data[0].title, "Fresh");

        let all = service
            .list(ListParams {
                page_size: 1,
                sort_by: Some("title".to_string()),
                order: SortOrder::Asc,
                ..ListParams::default()
            })
            .await
            .unwrap();
        assert_eq!(all.total, 2);
        assert_eq!(all.data[0].title, "Fresh");
        assert!(all.has_next_page);
    }
}
