//! Debouncing for search input.
//!
//! [`debounce`] forwards a value only after the input has been quiet for the
//! configured delay, so a burst of keystrokes collapses into one value (the
//! last). [`drive_search`] connects such a stream to a paginated resource.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::sleep;

use tourbook_api::Query;

use crate::fetcher::{PageSource, PaginatedResource};

/// Default quiet period before a search term is applied.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Spawns a task that reads `input` and emits on the returned receiver once
/// no new value has arrived for `delay`. Each new value restarts the timer.
/// When `input` closes, a pending value is flushed immediately.
pub fn debounce<T>(mut input: mpsc::Receiver<T>, delay: Duration) -> (mpsc::Receiver<T>, JoinHandle<()>)
where
    T: Send + 'static,
{
    let (tx, rx) = mpsc::channel(16);
    let handle = tokio::spawn(async move {
        let mut pending: Option<T> = None;
        loop {
            if pending.is_none() {
                match input.recv().await {
                    Some(value) => pending = Some(value),
                    None => break,
                }
                continue;
            }
            tokio::select! {
                next = input.recv() => match next {
                    Some(value) => pending = Some(value),
                    None => {
                        if let Some(value) = pending.take() {
                            let _ = tx.send(value).await;
                        }
                        break;
                    }
                },
                _ = sleep(delay) => {
                    if let Some(value) = pending.take() {
                        if tx.send(value).await.is_err() {
                            break;
                        }
                    }
                }
            }
        }
    });
    (rx, handle)
}

/// Applies every debounced search term to `resource` (reset + page 1) and
/// calls `on_applied` once the fetch for that term has settled.
/// Returns when the term stream ends. Fetch errors are logged and left in the
/// resource's error state; they do not stop the loop.
pub async fn drive_search<S, F>(
    resource: &PaginatedResource<S>,
    mut terms: mpsc::Receiver<String>,
    mut on_applied: F,
) -> usize
where
    S: PageSource,
    F: FnMut(&str),
{
    let mut applied = 0;
    while let Some(term) = terms.recv().await {
        applied += 1;
        if let Err(e) = resource.update_query(|q| q.with_search(&term)).await {
            tracing::error!("search for {:?} failed: {}", term, e);
        }
        on_applied(&term);
    }
    applied
}

#[cfg(test)]
mod tests {
    use tokio::time::Instant;
    use tourbook_api::TourQuery;

    use super::*;
    use crate::fetcher::testing::ScriptedSource;

    #[tokio::test(start_paused = true)]
    async fn burst_collapses_to_last_value() {
        let (tx, input) = mpsc::channel(8);
        let (mut out, _handle) = debounce(input, DEFAULT_DEBOUNCE);

        tx.send("a".to_string()).await.unwrap();
        sleep(Duration::from_millis(100)).await;
        tx.send("ab".to_string()).await.unwrap();
        sleep(Duration::from_millis(100)).await;
        tx.send("abc".to_string()).await.unwrap();
        let last_keystroke = Instant::now();

        assert_eq!(out.recv().await.as_deref(), Some("abc"));
        assert!(last_keystroke.elapsed() >= DEFAULT_DEBOUNCE);

        drop(tx);
        assert_eq!(out.recv().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn separated_bursts_emit_separately() {
        let (tx, input) = mpsc::channel(8);
        let (mut out, _handle) = debounce(input, Duration::from_millis(500));

        tx.send(1).await.unwrap();
        sleep(Duration::from_millis(700)).await;
        tx.send(2).await.unwrap();
        tx.send(3).await.unwrap();
        drop(tx);

        assert_eq!(out.recv().await, Some(1));
        assert_eq!(out.recv().await, Some(3));
        assert_eq!(out.recv().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn typing_fast_yields_one_fetch() {
        let source = ScriptedSource::new().reply(vec![1]);
        let res = PaginatedResource::new(source, TourQuery::default(), 10);

        let (tx, input) = mpsc::channel(8);
        let (terms, _handle) = debounce(input, DEFAULT_DEBOUNCE);

        let typing = async move {
            for term in ["a", "ab", "abc"] {
                tx.send(term.to_string()).await.unwrap();
                sleep(Duration::from_millis(120)).await;
            }
        };
        let (applied, ()) = tokio::join!(drive_search(&res, terms, |_| {}), typing);

        assert_eq!(applied, 1);
        assert_eq!(res.source().calls(), 1);
        assert_eq!(res.query().common.search.as_deref(), Some("abc"));
    }
}
