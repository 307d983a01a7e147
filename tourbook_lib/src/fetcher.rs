//! Generic paginated resource: one implementation of the fetch / append /
//! reset cycle shared by every listing (activities, vendor tours, blogs).
//!
//! A [`PaginatedResource`] owns the list state for a single list instance.
//! Query changes reset it and fetch page 1; `load_more` appends the next
//! page. State lives behind a `std::sync::Mutex` that is never held across an
//! `.await`, so the in-flight guard is checked and claimed atomically and at
//! most one request runs per resource.

use std::sync::{Mutex, MutexGuard};

use tourbook_api::types::{Blog, ListPage, Tour};
use tourbook_api::{BlogQuery, Client, Query, TourQuery};

use crate::error::TourbookError;

/// Something that can fetch one page of records for a query.
#[allow(async_fn_in_trait)]
pub trait PageSource {
    type Query: Query + Clone;
    type Item: Clone;

    async fn fetch(&self, query: &Self::Query) -> Result<ListPage<Self::Item>, tourbook_api::Error>;
}

/// Public tour/activity listing.
pub struct TourSource<'a>(pub &'a Client);

impl PageSource for TourSource<'_> {
    type Query = TourQuery;
    type Item = Tour;

    async fn fetch(&self, query: &TourQuery) -> Result<ListPage<Tour>, tourbook_api::Error> {
        self.0.list_tours(query).await
    }
}

/// The signed-in vendor's own tours.
pub struct VendorTourSource<'a>(pub &'a Client);

impl PageSource for VendorTourSource<'_> {
    type Query = TourQuery;
    type Item = Tour;

    async fn fetch(&self, query: &TourQuery) -> Result<ListPage<Tour>, tourbook_api::Error> {
        self.0.list_my_tours(query).await
    }
}

/// Blog post listing.
pub struct BlogSource<'a>(pub &'a Client);

impl PageSource for BlogSource<'_> {
    type Query = BlogQuery;
    type Item = Blog;

    async fn fetch(&self, query: &BlogQuery) -> Result<ListPage<Blog>, tourbook_api::Error> {
        self.0.list_blogs(query).await
    }
}

/// Where a list is in its fetch cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Nothing in flight; more pages may be available.
    Idle,
    /// First page of the current query is in flight.
    Loading,
    /// A follow-up page is in flight.
    LoadingMore,
    /// The current query returned no records.
    Empty,
    /// The last page has been reached for the current query.
    Exhausted,
    /// The last request failed; `retry` re-issues it.
    Failed,
}

/// What a load call did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A page was applied to the list.
    Loaded { count: usize, has_more: bool },
    /// The guard refused the request (already loading, or no more pages).
    Skipped,
    /// The response arrived after the query changed and was dropped.
    Stale,
}

#[derive(Clone, Copy, Debug)]
struct PageRequest {
    page: i64,
    append: bool,
    generation: u64,
}

struct ListState<Q, T> {
    page: i64,
    query: Q,
    items: Vec<T>,
    total: i64,
    phase: Phase,
    has_more: bool,
    error: Option<String>,
    generation: u64,
    failed: Option<PageRequest>,
}

/// Point-in-time copy of a list's state, for rendering.
#[derive(Clone, Debug)]
pub struct ListSnapshot<T> {
    pub page: i64,
    pub items: Vec<T>,
    pub total: i64,
    pub phase: Phase,
    pub has_more: bool,
    pub error: Option<String>,
}

impl<T> ListSnapshot<T> {
    /// True when the list should show its "no results" state.
    pub fn is_empty_state(&self) -> bool {
        self.phase == Phase::Empty
    }
}

/// List state plus the fetch/append/reset logic for one list instance.
pub struct PaginatedResource<S: PageSource> {
    source: S,
    page_size: i64,
    state: Mutex<ListState<S::Query, S::Item>>,
}

impl<S: PageSource> PaginatedResource<S> {
    /// Creates an idle resource. Call [`reload`](Self::reload) to fetch the first page.
    pub fn new(source: S, query: S::Query, page_size: i64) -> Self {
        let page_size = page_size.max(1);
        Self {
            source,
            page_size,
            state: Mutex::new(ListState {
                page: 1,
                query: query.with_limit(page_size).with_page(1),
                items: Vec::new(),
                total: 0,
                phase: Phase::Idle,
                has_more: false,
                error: None,
                generation: 0,
                failed: None,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ListState<S::Query, S::Item>> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn page_size(&self) -> i64 {
        self.page_size
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Resets the list and fetches page 1 of the current query.
    pub async fn reload(&self) -> Result<LoadOutcome, TourbookError> {
        let (query, req) = self.reset(None);
        self.execute(query, req).await
    }

    /// Replaces the query, resets the list and fetches page 1.
    ///
    /// The page size of the resource always wins over the query's own limit.
    pub async fn set_query(&self, query: S::Query) -> Result<LoadOutcome, TourbookError> {
        let (query, req) = self.reset(Some(query));
        self.execute(query, req).await
    }

    /// Derives a new query from the current one, then behaves like [`set_query`](Self::set_query).
    pub async fn update_query<F>(&self, f: F) -> Result<LoadOutcome, TourbookError>
    where
        F: FnOnce(S::Query) -> S::Query,
    {
        let current = self.lock().query.clone();
        self.set_query(f(current)).await
    }

    /// Fetches the next page and appends it.
    ///
    /// Refused with [`LoadOutcome::Skipped`] while a request is in flight or
    /// once the last page has been reached.
    pub async fn load_more(&self) -> Result<LoadOutcome, TourbookError> {
        let (query, req) = {
            let mut state = self.lock();
            if matches!(state.phase, Phase::Loading | Phase::LoadingMore) || !state.has_more {
                return Ok(LoadOutcome::Skipped);
            }
            let next = state.page + 1;
            state.phase = Phase::LoadingMore;
            state.error = None;
            let req = PageRequest {
                page: next,
                append: true,
                generation: state.generation,
            };
            (state.query.clone().with_page(next), req)
        };
        self.execute(query, req).await
    }

    /// Re-issues the request that failed last (same page, same append mode).
    pub async fn retry(&self) -> Result<LoadOutcome, TourbookError> {
        let (query, req) = {
            let mut state = self.lock();
            let req = match state.failed {
                Some(req) if state.phase == Phase::Failed && req.generation == state.generation => req,
                _ => return Ok(LoadOutcome::Skipped),
            };
            state.phase = if req.append {
                Phase::LoadingMore
            } else {
                Phase::Loading
            };
            state.error = None;
            (state.query.clone().with_page(req.page), req)
        };
        self.execute(query, req).await
    }

    fn reset(&self, query: Option<S::Query>) -> (S::Query, PageRequest) {
        let mut state = self.lock();
        if let Some(query) = query {
            state.query = query;
        }
        state.query = state.query.clone().with_limit(self.page_size).with_page(1);
        state.generation += 1;
        state.page = 1;
        state.items.clear();
        state.total = 0;
        state.has_more = false;
        state.error = None;
        state.failed = None;
        state.phase = Phase::Loading;
        let req = PageRequest {
            page: 1,
            append: false,
            generation: state.generation,
        };
        (state.query.clone(), req)
    }

    async fn execute(&self, query: S::Query, req: PageRequest) -> Result<LoadOutcome, TourbookError> {
        tracing::debug!(
            "fetching page {} (limit {}, append {})",
            req.page,
            self.page_size,
            req.append
        );
        let result = self.source.fetch(&query).await;

        let mut state = self.lock();
        if state.generation != req.generation {
            tracing::warn!("discarding stale response for page {}", req.page);
            return Ok(LoadOutcome::Stale);
        }

        match result {
            Ok(page) => {
                let count = page.returned_count();
                let has_more = count as i64 == self.page_size;
                if req.append {
                    state.items.extend(page.items);
                } else {
                    state.items = page.items;
                }
                state.page = req.page;
                state.total = page.total;
                state.has_more = has_more;
                state.failed = None;
                state.error = None;
                state.phase = if state.items.is_empty() {
                    Phase::Empty
                } else if has_more {
                    Phase::Idle
                } else {
                    Phase::Exhausted
                };
                Ok(LoadOutcome::Loaded { count, has_more })
            }
            Err(e) => {
                tracing::error!("failed to load page {}: {}", req.page, e);
                state.error = Some(e.to_string());
                state.failed = Some(req);
                state.phase = Phase::Failed;
                Err(e.into())
            }
        }
    }

    pub fn snapshot(&self) -> ListSnapshot<S::Item> {
        let state = self.lock();
        ListSnapshot {
            page: state.page,
            items: state.items.clone(),
            total: state.total,
            phase: state.phase,
            has_more: state.has_more,
            error: state.error.clone(),
        }
    }

    pub fn query(&self) -> S::Query {
        self.lock().query.clone()
    }

    pub fn page(&self) -> i64 {
        self.lock().page
    }

    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().items.is_empty()
    }

    pub fn phase(&self) -> Phase {
        self.lock().phase
    }

    pub fn has_more(&self) -> bool {
        self.lock().has_more
    }

    pub fn is_loading(&self) -> bool {
        self.lock().phase == Phase::Loading
    }

    pub fn is_loading_more(&self) -> bool {
        self.lock().phase == Phase::LoadingMore
    }

    pub fn error(&self) -> Option<String> {
        self.lock().error.clone()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory page source used by the unit tests of this crate.

    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    use tourbook_api::types::ListPage;
    use tourbook_api::{Query, TourQuery};

    use super::PageSource;

    pub(crate) type Reply = Result<Vec<i64>, u16>;

    /// Replies are consumed in order; each reply can be delayed.
    #[derive(Default)]
    pub(crate) struct ScriptedSource {
        replies: Mutex<VecDeque<(Duration, Reply)>>,
        pub(crate) seen: Mutex<Vec<TourQuery>>,
    }

    impl ScriptedSource {
        pub(crate) fn new() -> Self {
            Self::default()
        }

        pub(crate) fn reply(self, items: Vec<i64>) -> Self {
            self.reply_after(Duration::ZERO, Ok(items))
        }

        pub(crate) fn fail(self, status: u16) -> Self {
            self.reply_after(Duration::ZERO, Err(status))
        }

        pub(crate) fn reply_after(self, delay: Duration, reply: Reply) -> Self {
            self.replies
                .lock()
                .unwrap()
                .push_back((delay, reply));
            self
        }

        pub(crate) fn calls(&self) -> usize {
            self.seen.lock().unwrap().len()
        }

        pub(crate) fn offsets(&self) -> Vec<i64> {
            self.seen
                .lock()
                .unwrap()
                .iter()
                .map(|q| q.common().offset)
                .collect()
        }
    }

    impl PageSource for ScriptedSource {
        type Query = TourQuery;
        type Item = i64;

        async fn fetch(&self, query: &TourQuery) -> Result<ListPage<i64>, tourbook_api::Error> {
            self.seen.lock().unwrap().push(query.clone());
            let (delay, reply) = self
                .replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or((Duration::ZERO, Ok(Vec::new())));
            // Always suspend once so concurrent callers interleave.
            tokio::task::yield_now().await;
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            match reply {
                Ok(items) => Ok(ListPage {
                    total: items.len() as i64,
                    items,
                }),
                Err(status) => Err(tourbook_api::Error::HttpStatus {
                    status,
                    message: "scripted failure".to_string(),
                }),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tourbook_api::{Query, TourQuery};

    use super::testing::ScriptedSource;
    use super::*;

    fn resource(source: ScriptedSource, page_size: i64) -> PaginatedResource<ScriptedSource> {
        PaginatedResource::new(source, TourQuery::default(), page_size)
    }

    #[tokio::test]
    async fn first_load_replaces_and_sets_has_more() {
        let res = resource(ScriptedSource::new().reply((1..=10).collect()), 10);
        let outcome = res.reload().await.unwrap();
        assert_eq!(
            outcome,
            LoadOutcome::Loaded {
                count: 10,
                has_more: true
            }
        );
        assert_eq!(res.phase(), Phase::Idle);
        assert_eq!(res.page(), 1);
        assert_eq!(res.len(), 10);
    }

    #[tokio::test]
    async fn short_page_clears_has_more() {
        let res = resource(ScriptedSource::new().reply((1..=7).collect()), 10);
        res.reload().await.unwrap();
        assert!(!res.has_more());
        assert_eq!(res.phase(), Phase::Exhausted);

        assert_eq!(res.load_more().await.unwrap(), LoadOutcome::Skipped);
        assert_eq!(res.source.calls(), 1);
    }

    #[tokio::test]
    async fn append_preserves_order_of_earlier_pages() {
        let source = ScriptedSource::new()
            .reply(vec![1, 2, 3])
            .reply(vec![4, 5, 6])
            .reply(vec![7]);
        let res = resource(source, 3);
        res.reload().await.unwrap();
        res.load_more().await.unwrap();
        res.load_more().await.unwrap();

        let snap = res.snapshot();
        assert_eq!(snap.items, vec![1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(snap.page, 3);
        assert_eq!(snap.phase, Phase::Exhausted);
        assert_eq!(res.source.offsets(), vec![0, 3, 6]);
    }

    #[tokio::test]
    async fn exactly_full_last_page_costs_one_empty_fetch() {
        let source = ScriptedSource::new().reply(vec![1, 2]).reply(vec![]);
        let res = resource(source, 2);
        res.reload().await.unwrap();
        assert!(res.has_more());

        let outcome = res.load_more().await.unwrap();
        assert_eq!(
            outcome,
            LoadOutcome::Loaded {
                count: 0,
                has_more: false
            }
        );
        assert_eq!(res.phase(), Phase::Exhausted);
        assert_eq!(res.snapshot().items, vec![1, 2]);
    }

    #[tokio::test]
    async fn empty_response_is_no_results_state() {
        let res = resource(ScriptedSource::new().reply(vec![]), 10);
        res.reload().await.unwrap();
        let snap = res.snapshot();
        assert!(snap.is_empty_state());
        assert!(!snap.has_more);
    }

    #[tokio::test]
    async fn query_change_resets_before_fetching() {
        let source = ScriptedSource::new()
            .reply(vec![1, 2])
            .reply(vec![3, 4])
            .reply(vec![9]);
        let res = resource(source, 2);
        res.reload().await.unwrap();
        res.load_more().await.unwrap();
        assert_eq!(res.page(), 2);

        res.update_query(|q| q.with_search("bukhara")).await.unwrap();
        let snap = res.snapshot();
        assert_eq!(snap.items, vec![9]);
        assert_eq!(snap.page, 1);

        let last = res.source.seen.lock().unwrap().last().cloned().unwrap();
        assert_eq!(last.common.offset, 0);
        assert_eq!(last.common.limit, 2);
        assert_eq!(last.common.search.as_deref(), Some("bukhara"));
    }

    #[tokio::test]
    async fn page_size_overrides_query_limit() {
        let res = resource(ScriptedSource::new().reply(vec![1]), 8);
        res.set_query(TourQuery::default().with_limit(50).with_page(3))
            .await
            .unwrap();
        let seen = res.source.seen.lock().unwrap()[0].clone();
        assert_eq!(seen.common.limit, 8);
        assert_eq!(seen.common.offset, 0);
    }

    #[tokio::test]
    async fn failed_load_more_keeps_items_and_retries_same_page() {
        let source = ScriptedSource::new()
            .reply(vec![1, 2])
            .fail(502)
            .reply(vec![3]);
        let res = resource(source, 2);
        res.reload().await.unwrap();

        let err = res.load_more().await.unwrap_err();
        assert!(matches!(err, TourbookError::Api(_)));
        let snap = res.snapshot();
        assert_eq!(snap.items, vec![1, 2]);
        assert_eq!(snap.phase, Phase::Failed);
        assert!(snap.error.is_some());

        res.retry().await.unwrap();
        let snap = res.snapshot();
        assert_eq!(snap.items, vec![1, 2, 3]);
        assert_eq!(snap.error, None);
        assert_eq!(res.source.offsets(), vec![0, 2, 2]);
    }

    #[tokio::test]
    async fn failed_initial_load_is_empty_error_state() {
        let source = ScriptedSource::new().fail(500).reply(vec![1]);
        let res = resource(source, 5);
        assert!(res.reload().await.is_err());
        assert!(res.is_empty());
        assert_eq!(res.phase(), Phase::Failed);

        res.retry().await.unwrap();
        assert_eq!(res.len(), 1);
        assert_eq!(res.retry().await.unwrap(), LoadOutcome::Skipped);
    }

    #[tokio::test]
    async fn concurrent_load_more_issues_one_request() {
        let source = ScriptedSource::new().reply(vec![1, 2]).reply(vec![3, 4]);
        let res = resource(source, 2);
        res.reload().await.unwrap();

        let (first, second) = tokio::join!(res.load_more(), res.load_more());
        assert!(matches!(first.unwrap(), LoadOutcome::Loaded { count: 2, .. }));
        assert_eq!(second.unwrap(), LoadOutcome::Skipped);
        assert_eq!(res.source.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn stale_response_does_not_overwrite_newer_query() {
        let source = ScriptedSource::new()
            .reply_after(Duration::from_millis(300), Ok(vec![100]))
            .reply_after(Duration::from_millis(10), Ok(vec![200]));
        let res = resource(source, 5);

        let (slow, fast) = tokio::join!(
            res.set_query(TourQuery::default().with_search("a")),
            res.set_query(TourQuery::default().with_search("ab")),
        );
        assert_eq!(slow.unwrap(), LoadOutcome::Stale);
        assert!(matches!(fast.unwrap(), LoadOutcome::Loaded { .. }));
        assert_eq!(res.snapshot().items, vec![200]);
        assert_eq!(res.query().common.search.as_deref(), Some("ab"));
    }
}
