//! Progressive gallery loader.
//!
//! ```text
//!             listing ok                    probe resolves (any order)
//!   Loading ────────────▶ Ready [None; N] ─────────────────────────────▶ slot i = Some(item)
//!      │
//!      │ listing fails (status, transport, bad JSON)
//!      ▼
//!   Error [placeholder]
//! ```
//!
//! The view enters `Ready` as soon as the listing arrives. Every slot exists
//! from that moment on, so `slots.len()` always equals the listing length.
//! Videos are resolved immediately to the default size; each image gets one
//! probe task, all launched at once. A probe that fails resolves its slot to
//! the default size and is logged; only the listing fetch can produce
//! `Error`.
//!
//! The probes live in a [`JoinSet`] owned by the [`LoadSession`]; dropping or
//! cancelling the session aborts whatever is still in flight.

use super::probe::DimensionProbe;
use super::source::ListingSource;
use crate::config::LoaderConfig;
use crate::types::{Dimensions, DisplayItem, GalleryEntry, MediaKind};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, error, warn};

/// Listing status of a gallery view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Loading,
    /// The listing could not be fetched; the message is user-facing.
    Error(String),
    Ready,
}

/// The only ways a [`GalleryView`] changes.
#[derive(Debug, Clone)]
pub enum Transition {
    /// Listing fetched with `n` entries: enter `Ready` with `n` empty slots.
    ListingLoaded(usize),
    /// Listing fetch failed: enter `Error` with the placeholder as sole slot.
    ListingFailed {
        message: String,
        placeholder: DisplayItem,
    },
    /// One slot's probe finished. Identified by the entry's listing index.
    SlotResolved { index: usize, item: DisplayItem },
    /// Open the viewer on a slot.
    Open(usize),
    Close,
    Next,
    Prev,
}

/// State container of one gallery view: status, slots, and the viewer's
/// active slide.
#[derive(Debug, Clone)]
pub struct GalleryView {
    status: LoadStatus,
    slots: Vec<Option<DisplayItem>>,
    active: Option<usize>,
}

impl Default for GalleryView {
    fn default() -> Self {
        Self::new()
    }
}

impl GalleryView {
    pub fn new() -> Self {
        Self {
            status: LoadStatus::Loading,
            slots: Vec::new(),
            active: None,
        }
    }

    /// Apply a transition. Returns `false` when it was ignored (stale or
    /// out-of-range index, viewer command with nothing open).
    pub fn apply(&mut self, transition: Transition) -> bool {
        match transition {
            Transition::ListingLoaded(n) => {
                self.status = LoadStatus::Ready;
                self.slots = vec![None; n];
                self.active = None;
            }
            Transition::ListingFailed {
                message,
                placeholder,
            } => {
                self.status = LoadStatus::Error(message);
                self.slots = vec![Some(placeholder)];
                self.active = None;
            }
            Transition::SlotResolved { index, item } => match self.slots.get_mut(index) {
                Some(slot) => *slot = Some(item),
                None => return false,
            },
            Transition::Open(index) => {
                if index >= self.slots.len() {
                    return false;
                }
                self.active = Some(index);
            }
            Transition::Close => {
                if self.active.take().is_none() {
                    return false;
                }
            }
            Transition::Next | Transition::Prev => {
                let Some(current) = self.active else {
                    return false;
                };
                let len = self.slots.len();
                self.active = Some(match transition {
                    Transition::Next => (current + 1) % len,
                    _ => (current + len - 1) % len,
                });
            }
        }
        true
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    /// All slots, index-aligned with the listing. `None` = probe outstanding.
    pub fn slots(&self) -> &[Option<DisplayItem>] {
        &self.slots
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    pub fn resolved_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// True once every slot holds an item.
    pub fn is_complete(&self) -> bool {
        self.status != LoadStatus::Loading && self.slots.iter().all(Option::is_some)
    }

    /// Resolved items in slot order, skipping empty slots.
    pub fn items(&self) -> impl Iterator<Item = &DisplayItem> {
        self.slots.iter().flatten()
    }
}

/// Drives a [`GalleryView`] from a listing source and a dimension probe.
pub struct GalleryLoader<S> {
    source: S,
    probe: Arc<dyn DimensionProbe>,
    fallback: Dimensions,
    placeholder: String,
}

impl<S: ListingSource> GalleryLoader<S> {
    pub fn new(source: S, probe: Arc<dyn DimensionProbe>, config: &LoaderConfig) -> Self {
        Self {
            source,
            probe,
            fallback: config.default_dimensions(),
            placeholder: config.placeholder.clone(),
        }
    }

    /// Fetch the listing and launch all probes. Returns as soon as the view
    /// is `Ready` (or `Error`); probes keep running inside the session.
    pub async fn begin(&self) -> LoadSession {
        let mut view = GalleryView::new();
        let mut probes = JoinSet::new();

        let entries = match self.source.fetch().await {
            Ok(entries) => entries,
            Err(e) => {
                error!(error = %e, "gallery listing failed");
                view.apply(Transition::ListingFailed {
                    message: e.to_string(),
                    placeholder: DisplayItem::new(
                        self.placeholder.clone(),
                        self.fallback,
                        MediaKind::Image,
                    ),
                });
                return LoadSession {
                    view,
                    entries: Vec::new(),
                    probes,
                    fallback: self.fallback,
                };
            }
        };

        view.apply(Transition::ListingLoaded(entries.len()));
        for (index, entry) in entries.iter().enumerate() {
            match entry.kind {
                MediaKind::Video => {
                    view.apply(Transition::SlotResolved {
                        index,
                        item: DisplayItem::new(&entry.path, self.fallback, MediaKind::Video),
                    });
                }
                MediaKind::Image => {
                    let probe = Arc::clone(&self.probe);
                    let src = entry.path.clone();
                    let fallback = self.fallback;
                    probes.spawn(async move {
                        let dims = match probe.probe(&src).await {
                            Ok(dims) => dims,
                            Err(e) => {
                                warn!(src = %src, error = %e, "dimension probe failed, using default size");
                                fallback
                            }
                        };
                        (index, DisplayItem::new(src, dims, MediaKind::Image))
                    });
                }
            }
        }
        debug!(
            entries = entries.len(),
            probes = probes.len(),
            "gallery listing loaded"
        );

        LoadSession {
            view,
            entries,
            probes,
            fallback: self.fallback,
        }
    }

    /// Run a whole load to completion and return the final view.
    pub async fn load(&self) -> GalleryView {
        self.begin().await.finish().await
    }
}

/// An in-progress load. Owns the outstanding probe tasks.
pub struct LoadSession {
    view: GalleryView,
    entries: Vec<GalleryEntry>,
    probes: JoinSet<(usize, DisplayItem)>,
    fallback: Dimensions,
}

impl LoadSession {
    pub fn view(&self) -> &GalleryView {
        &self.view
    }

    /// Apply a viewer transition (`Open`, `Close`, `Next`, `Prev`) while
    /// probes are still running.
    pub fn apply(&mut self, transition: Transition) -> bool {
        self.view.apply(transition)
    }

    /// Listing entries behind the slots, index-aligned.
    pub fn entries(&self) -> &[GalleryEntry] {
        &self.entries
    }

    /// Probe tasks not yet joined.
    pub fn pending(&self) -> usize {
        self.probes.len()
    }

    /// Wait for the next probe to finish and apply it. Returns the resolved
    /// slot index, or `None` when nothing is outstanding.
    pub async fn next_update(&mut self) -> Option<usize> {
        loop {
            match self.probes.join_next().await? {
                Ok((index, item)) => {
                    self.view.apply(Transition::SlotResolved { index, item });
                    return Some(index);
                }
                Err(e) if e.is_cancelled() => continue,
                Err(e) => {
                    warn!(error = %e, "probe task failed");
                    continue;
                }
            }
        }
    }

    /// Drain every probe and return the final view. Slots whose task died
    /// without reporting are filled with the default size, so the result has
    /// one item per listing entry.
    pub async fn finish(mut self) -> GalleryView {
        while self.next_update().await.is_some() {}
        for (index, entry) in self.entries.iter().enumerate() {
            if self.view.slots[index].is_none() {
                self.view.apply(Transition::SlotResolved {
                    index,
                    item: DisplayItem::new(&entry.path, self.fallback, entry.kind),
                });
            }
        }
        self.view
    }

    /// Abort all outstanding probes. Their slots stay empty.
    pub fn cancel(&mut self) {
        self.probes.abort_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gallery::source::LoadError;
    use crate::test_helpers::{GatedProbe, StaticListing, StaticProbe, entry};

    fn loader<S: ListingSource>(source: S, probe: Arc<dyn DimensionProbe>) -> GalleryLoader<S> {
        GalleryLoader::new(source, probe, &LoaderConfig::default())
    }

    fn dims(width: u32, height: u32) -> Dimensions {
        Dimensions { width, height }
    }

    fn item(src: &str, w: u32, h: u32, kind: MediaKind) -> DisplayItem {
        DisplayItem::new(src, dims(w, h), kind)
    }

    // =========================================================================
    // GalleryView transitions
    // =========================================================================

    #[test]
    fn new_view_is_loading_and_empty() {
        let view = GalleryView::new();
        assert_eq!(view.status(), &LoadStatus::Loading);
        assert!(view.slots().is_empty());
        assert!(!view.is_complete());
    }

    #[test]
    fn listing_loaded_reserves_slots() {
        let mut view = GalleryView::new();
        view.apply(Transition::ListingLoaded(3));
        assert_eq!(view.status(), &LoadStatus::Ready);
        assert_eq!(view.slots(), &[None, None, None]);
    }

    #[test]
    fn slot_resolved_out_of_range_is_ignored() {
        let mut view = GalleryView::new();
        view.apply(Transition::ListingLoaded(1));
        let applied = view.apply(Transition::SlotResolved {
            index: 5,
            item: item("/x.jpg", 1, 1, MediaKind::Image),
        });
        assert!(!applied);
        assert_eq!(view.slots().len(), 1);
    }

    #[test]
    fn viewer_navigation_wraps() {
        let mut view = GalleryView::new();
        view.apply(Transition::ListingLoaded(3));
        assert!(!view.apply(Transition::Next));
        assert!(view.apply(Transition::Open(2)));
        view.apply(Transition::Next);
        assert_eq!(view.active(), Some(0));
        view.apply(Transition::Prev);
        assert_eq!(view.active(), Some(2));
        assert!(view.apply(Transition::Close));
        assert_eq!(view.active(), None);
        assert!(!view.apply(Transition::Close));
    }

    #[test]
    fn open_out_of_range_is_ignored() {
        let mut view = GalleryView::new();
        view.apply(Transition::ListingLoaded(2));
        assert!(!view.apply(Transition::Open(2)));
        assert_eq!(view.active(), None);
    }

    // =========================================================================
    // Loader behaviour
    // =========================================================================

    #[tokio::test]
    async fn final_view_has_one_item_per_entry() {
        let source = StaticListing::ok(vec![
            entry("/gallery/images/a.jpg", MediaKind::Image),
            entry("/gallery/videos/v.mp4", MediaKind::Video),
            entry("/gallery/images/b.jpg", MediaKind::Image),
        ]);
        let probe = StaticProbe::new(&[
            ("/gallery/images/a.jpg", dims(1200, 900)),
            ("/gallery/images/b.jpg", dims(600, 900)),
        ]);

        let view = loader(source, Arc::new(probe)).load().await;

        assert_eq!(view.status(), &LoadStatus::Ready);
        assert!(view.is_complete());
        let items: Vec<&DisplayItem> = view.items().collect();
        assert_eq!(items.len(), 3);
        assert_eq!(
            items[0],
            &item("/gallery/images/a.jpg", 1200, 900, MediaKind::Image)
        );
        assert_eq!(
            items[1],
            &item("/gallery/videos/v.mp4", 800, 600, MediaKind::Video)
        );
        assert_eq!(
            items[2],
            &item("/gallery/images/b.jpg", 600, 900, MediaKind::Image)
        );
    }

    #[tokio::test]
    async fn every_probe_failing_still_yields_all_items() {
        let source = StaticListing::ok(vec![
            entry("/gallery/images/a.jpg", MediaKind::Image),
            entry("/gallery/images/b.jpg", MediaKind::Image),
        ]);
        let view = loader(source, Arc::new(StaticProbe::new(&[])))
            .load()
            .await;

        assert_eq!(view.status(), &LoadStatus::Ready);
        let items: Vec<&DisplayItem> = view.items().collect();
        assert_eq!(items.len(), 2);
        for it in items {
            assert_eq!((it.width, it.height), (800, 600));
            assert_eq!(it.kind, MediaKind::Image);
        }
    }

    #[tokio::test]
    async fn videos_are_never_probed() {
        let probe = Arc::new(StaticProbe::new(&[("/gallery/videos/v.mp4", dims(1920, 1080))]));
        let source = StaticListing::ok(vec![entry("/gallery/videos/v.mp4", MediaKind::Video)]);

        let view = loader(source, probe.clone()).load().await;

        assert!(probe.calls().is_empty());
        let only = view.items().next().unwrap();
        assert_eq!((only.width, only.height), (800, 600));
    }

    #[tokio::test]
    async fn listing_failure_yields_single_placeholder() {
        let source = StaticListing::err(LoadError::Status(500));
        let view = loader(source, Arc::new(StaticProbe::new(&[])))
            .load()
            .await;

        assert_eq!(
            view.status(),
            &LoadStatus::Error("Failed to fetch images: 500".to_string())
        );
        let items: Vec<&DisplayItem> = view.items().collect();
        assert_eq!(
            items,
            vec![&item("/placeholder-image.png", 800, 600, MediaKind::Image)]
        );
    }

    #[tokio::test]
    async fn parse_failure_is_treated_like_bad_status() {
        let source = StaticListing::err(LoadError::Parse("expected array".into()));
        let view = loader(source, Arc::new(StaticProbe::new(&[])))
            .load()
            .await;
        assert!(matches!(view.status(), LoadStatus::Error(_)));
        assert_eq!(view.slots().len(), 1);
    }

    #[tokio::test]
    async fn empty_listing_is_ready_and_complete() {
        let view = loader(StaticListing::ok(vec![]), Arc::new(StaticProbe::new(&[])))
            .load()
            .await;
        assert_eq!(view.status(), &LoadStatus::Ready);
        assert!(view.slots().is_empty());
        assert!(view.is_complete());
    }

    #[tokio::test]
    async fn slots_fill_in_completion_order_with_length_fixed() {
        let srcs = [
            "/gallery/images/0.jpg",
            "/gallery/images/1.jpg",
            "/gallery/images/2.jpg",
        ];
        let source = StaticListing::ok(srcs.iter().map(|s| entry(s, MediaKind::Image)).collect());
        let probe = Arc::new(GatedProbe::new(&srcs, dims(10, 20)));

        let mut session = loader(source, probe.clone()).begin().await;
        assert_eq!(session.view().status(), &LoadStatus::Ready);
        assert_eq!(session.view().slots(), &[None, None, None]);
        assert_eq!(session.pending(), 3);

        probe.release(srcs[2]);
        assert_eq!(session.next_update().await, Some(2));
        assert_eq!(session.view().slots().len(), 3);
        assert!(session.view().slots()[0].is_none());
        assert!(session.view().slots()[1].is_none());
        assert!(session.view().slots()[2].is_some());

        probe.release(srcs[0]);
        assert_eq!(session.next_update().await, Some(0));
        assert_eq!(session.view().resolved_count(), 2);

        probe.release(srcs[1]);
        let view = session.finish().await;
        assert!(view.is_complete());
        assert_eq!(view.slots().len(), 3);
    }

    #[tokio::test]
    async fn viewer_can_open_null_slot_while_loading() {
        let srcs = ["/gallery/images/0.jpg", "/gallery/images/1.jpg"];
        let source = StaticListing::ok(srcs.iter().map(|s| entry(s, MediaKind::Image)).collect());
        let probe = Arc::new(GatedProbe::new(&srcs, dims(10, 20)));

        let mut session = loader(source, probe.clone()).begin().await;
        assert!(session.apply(Transition::Open(1)));
        assert_eq!(session.view().active(), Some(1));
        assert!(session.view().slots()[1].is_none());

        probe.release(srcs[1]);
        session.next_update().await;
        assert_eq!(session.view().active(), Some(1));
        assert!(session.view().slots()[1].is_some());
        session.cancel();
    }

    #[tokio::test]
    async fn cancel_aborts_outstanding_probes() {
        let srcs = ["/gallery/images/0.jpg", "/gallery/images/1.jpg"];
        let source = StaticListing::ok(srcs.iter().map(|s| entry(s, MediaKind::Image)).collect());
        let probe = Arc::new(GatedProbe::new(&srcs, dims(10, 20)));

        let mut session = loader(source, probe.clone()).begin().await;
        probe.release(srcs[0]);
        assert_eq!(session.next_update().await, Some(0));

        session.cancel();
        assert_eq!(session.next_update().await, None);
        assert!(session.view().slots()[1].is_none());
        assert_eq!(session.pending(), 0);
    }
}
