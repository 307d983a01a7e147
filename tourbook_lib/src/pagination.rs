//! Triggers that decide when the next page is requested.
//!
//! Two policies exist: an explicit "Load More" button and a sentinel placed
//! at the end of the list that fires when it scrolls close to the viewport.
//! Both funnel into [`PaginatedResource::load_more`], whose guard keeps a
//! single request in flight.

use crate::error::TourbookError;
use crate::fetcher::{LoadOutcome, PageSource, PaginatedResource, Phase};

/// Explicit "Load More" control.
pub struct LoadMoreButton;

impl LoadMoreButton {
    /// The button is shown only while another page may exist and nothing is loading.
    pub fn is_visible<S: PageSource>(resource: &PaginatedResource<S>) -> bool {
        resource.has_more()
            && !matches!(resource.phase(), Phase::Loading | Phase::LoadingMore)
    }

    pub async fn press<S: PageSource>(
        resource: &PaginatedResource<S>,
    ) -> Result<LoadOutcome, TourbookError> {
        resource.load_more().await
    }
}

/// Scroll geometry in pixels, measured from the top of the document.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub scroll_top: f64,
    pub height: f64,
    /// Top edge of the sentinel element.
    pub sentinel_top: f64,
}

impl Viewport {
    /// Distance between the viewport's bottom edge and the sentinel.
    /// Negative once the sentinel is inside the viewport.
    pub fn distance_to_sentinel(&self) -> f64 {
        self.sentinel_top - (self.scroll_top + self.height)
    }
}

/// Invisible marker at the end of a list that auto-loads the next page.
#[derive(Clone, Copy, Debug)]
pub struct Sentinel {
    threshold_px: f64,
}

impl Default for Sentinel {
    fn default() -> Self {
        Self::new(Self::DEFAULT_THRESHOLD_PX)
    }
}

impl Sentinel {
    /// The sentinel fires this many pixels before it enters the viewport.
    pub const DEFAULT_THRESHOLD_PX: f64 = 100.0;

    pub fn new(threshold_px: f64) -> Self {
        Self {
            threshold_px: threshold_px.max(0.0),
        }
    }

    pub fn threshold_px(&self) -> f64 {
        self.threshold_px
    }

    /// True when the sentinel is within the threshold of the viewport.
    pub fn is_triggered(&self, viewport: &Viewport) -> bool {
        viewport.distance_to_sentinel() <= self.threshold_px
    }

    /// Handles a scroll event: requests the next page when the sentinel is
    /// close enough. Out-of-range events return [`LoadOutcome::Skipped`].
    pub async fn on_scroll<S: PageSource>(
        &self,
        viewport: &Viewport,
        resource: &PaginatedResource<S>,
    ) -> Result<LoadOutcome, TourbookError> {
        if !self.is_triggered(viewport) {
            return Ok(LoadOutcome::Skipped);
        }
        resource.load_more().await
    }
}

#[cfg(test)]
mod tests {
    use tourbook_api::TourQuery;

    use super::*;
    use crate::fetcher::testing::ScriptedSource;

    fn at(scroll_top: f64) -> Viewport {
        Viewport {
            scroll_top,
            height: 800.0,
            sentinel_top: 2000.0,
        }
    }

    #[test]
    fn sentinel_fires_within_threshold() {
        let sentinel = Sentinel::default();
        assert!(!sentinel.is_triggered(&at(1000.0)));
        assert!(!sentinel.is_triggered(&at(1099.0)));
        assert!(sentinel.is_triggered(&at(1100.0)));
        assert!(sentinel.is_triggered(&at(1500.0)));
    }

    #[test]
    fn negative_threshold_is_clamped() {
        let sentinel = Sentinel::new(-50.0);
        assert_eq!(sentinel.threshold_px(), 0.0);
        assert!(sentinel.is_triggered(&at(1200.0)));
    }

    #[tokio::test]
    async fn sentinel_triggers_exactly_one_fetch() {
        let source = ScriptedSource::new()
            .reply(vec![1, 2, 3])
            .reply(vec![4, 5, 6]);
        let res = PaginatedResource::new(source, TourQuery::default(), 3);
        res.reload().await.unwrap();

        let sentinel = Sentinel::default();
        let viewport = at(1150.0);
        let (first, second) = tokio::join!(
            sentinel.on_scroll(&viewport, &res),
            sentinel.on_scroll(&viewport, &res),
        );
        assert!(matches!(first.unwrap(), LoadOutcome::Loaded { count: 3, .. }));
        assert_eq!(second.unwrap(), LoadOutcome::Skipped);
        assert_eq!(res.len(), 6);
    }

    #[tokio::test]
    async fn sentinel_out_of_range_does_nothing() {
        let source = ScriptedSource::new().reply(vec![1, 2, 3]);
        let res = PaginatedResource::new(source, TourQuery::default(), 3);
        res.reload().await.unwrap();

        let outcome = Sentinel::default().on_scroll(&at(0.0), &res).await.unwrap();
        assert_eq!(outcome, LoadOutcome::Skipped);
        assert_eq!(res.len(), 3);
    }

    #[tokio::test]
    async fn button_hidden_once_exhausted() {
        let source = ScriptedSource::new().reply(vec![1, 2]).reply(vec![3]);
        let res = PaginatedResource::new(source, TourQuery::default(), 2);
        assert!(!LoadMoreButton::is_visible(&res));

        res.reload().await.unwrap();
        assert!(LoadMoreButton::is_visible(&res));

        LoadMoreButton::press(&res).await.unwrap();
        assert!(!LoadMoreButton::is_visible(&res));
        assert_eq!(
            LoadMoreButton::press(&res).await.unwrap(),
            LoadOutcome::Skipped
        );
    }
}
