//! The windowed list engine.
//!
//! [`VirtualList`] owns the item collection and the render cache, applies
//! structural edits, and keeps a [`ViewportPort`] populated with nodes for the
//! current window only. Every edit and every scroll or resize notification
//! ends in a throttled recompute:
//!
//! 1. compute the window from the scroll offset
//! 2. resolve a node for each present index in it (cache hit or render)
//! 3. attach new nodes, detach everything outside the window
//! 4. evict cache entries outside the window
//!
//! The host drives time: it calls [`VirtualList::poll`] from its event loop
//! (or when [`VirtualList::next_deadline`] passes) and the recompute runs
//! synchronously inside that call.

use lazyview_core::{Clock, Instant, SystemClock};

use super::config::VirtualListConfig;
use super::error::VirtualListError;
use super::geometry::{compute_window, VisibleWindow, WindowGeometry};
use super::render::{ItemRenderer, RenderRequest};
use super::render_cache::{RenderCache, Resolved};
use super::scroll::ScrollState;
use super::stats::VirtualListStats;
use super::throttle::{ScheduleOutcome, Throttler};
use super::viewport::{Viewport, ViewportPort};

/// Notifications from the host environment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ListEvent {
    /// The host scrolled to an absolute offset. Stored as reported.
    Scrolled { offset: f32 },
    /// Relative scroll, clamped to the content bounds.
    ScrolledBy { delta: f32 },
    /// The host display changed height.
    Resized { display_height: f32 },
}

/// Where the list is in its recompute cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecomputePhase {
    Idle,
    /// A recompute is armed and waiting for its deadline.
    Scheduled,
    Computing,
}

/// Virtualized list over a uniform-height item collection.
///
/// # Example
///
/// ```rust,ignore
/// let renderer = render_fn(String::new(), |req: RenderRequest<'_, Task, String>| {
///     Ok(format!("{}: {}", req.index, req.item.title))
/// });
/// let config = VirtualListConfig::new().item_height(50.0).gap(5.0).display_height(600.0);
/// let mut list = VirtualList::new(tasks, renderer, RetainedViewport::new(), config)?;
///
/// list.handle_event(ListEvent::Scrolled { offset: 1_200.0 });
/// list.poll()?;
/// ```
pub struct VirtualList<T, R, P, C = SystemClock>
where
    R: ItemRenderer<T>,
    P: ViewportPort<Node = R::Node>,
    C: Clock,
{
    items: Vec<T>,
    cache: RenderCache<R::Node>,
    renderer: R,
    viewport: Viewport<P>,
    scroll: ScrollState,
    throttler: Throttler,
    clock: C,
    window: VisibleWindow,
    stats: VirtualListStats,
}

impl<T, R, P> VirtualList<T, R, P, SystemClock>
where
    R: ItemRenderer<T>,
    P: ViewportPort<Node = R::Node>,
{
    /// Creates a list on the system clock and arms the initial recompute.
    pub fn new(
        items: impl IntoIterator<Item = T>,
        renderer: R,
        port: P,
        config: VirtualListConfig,
    ) -> Result<Self, VirtualListError> {
        Self::with_clock(items, renderer, port, config, SystemClock)
    }
}

impl<T, R, P, C> VirtualList<T, R, P, C>
where
    R: ItemRenderer<T>,
    P: ViewportPort<Node = R::Node>,
    C: Clock,
{
    pub fn with_clock(
        items: impl IntoIterator<Item = T>,
        renderer: R,
        port: P,
        config: VirtualListConfig,
        clock: C,
    ) -> Result<Self, VirtualListError> {
        config.validate()?;
        let items: Vec<T> = items.into_iter().collect();
        let geometry = config.geometry();
        let throttler = Throttler::new(config.throttle_interval)
            .with_policy(config.throttle_policy)
            .with_retrigger_dropped(config.retrigger_dropped);

        let mut list = Self {
            cache: RenderCache::with_len(items.len()),
            items,
            renderer,
            viewport: Viewport::new(port, geometry),
            scroll: ScrollState::new(config.display_height),
            throttler,
            clock,
            window: VisibleWindow::default(),
            stats: VirtualListStats::default(),
        };
        list.sync_extent();
        log::debug!(
            "virtual list created: {} items, {} visible rows, buffer {}",
            list.items.len(),
            geometry.max_visible_count,
            geometry.offset_buffer
        );
        list.request_recompute();
        Ok(list)
    }

    // ---------------------------------------------------------------------
    // Read access
    // ---------------------------------------------------------------------

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn item(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Consumes the list and returns the collection, e.g. for persistence.
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Cached node for `index`, if one is materialized.
    pub fn cached_node(&self, index: usize) -> Option<&R::Node> {
        self.cache.get(index)
    }

    /// Indices with a cached node, ascending.
    pub fn cached_indices(&self) -> Vec<usize> {
        self.cache.cached_indices().collect()
    }

    pub fn geometry(&self) -> &WindowGeometry {
        self.viewport.geometry()
    }

    pub fn viewport(&self) -> &Viewport<P> {
        &self.viewport
    }

    pub fn port(&self) -> &P {
        self.viewport.port()
    }

    /// Total scrollable extent for the current collection.
    pub fn extent(&self) -> f32 {
        self.viewport.extent()
    }

    pub fn scroll_offset(&self) -> f32 {
        self.scroll.offset()
    }

    /// Window used by the last completed recompute.
    pub fn window(&self) -> VisibleWindow {
        self.window
    }

    pub fn phase(&self) -> RecomputePhase {
        if self.throttler.is_running() {
            RecomputePhase::Computing
        } else if self.throttler.is_pending() {
            RecomputePhase::Scheduled
        } else {
            RecomputePhase::Idle
        }
    }

    pub fn stats(&self) -> VirtualListStats {
        VirtualListStats {
            items_in_use: self.viewport.port().attached_indices().len(),
            cached_entries: self.cache.cached_count(),
            dropped_requests: self.throttler.dropped_count(),
            ..self.stats.clone()
        }
    }

    // ---------------------------------------------------------------------
    // Mutations
    // ---------------------------------------------------------------------

    /// Replaces the whole collection. The cache and the viewport are cleared.
    pub fn set_items(&mut self, items: impl IntoIterator<Item = T>) {
        self.items = items.into_iter().collect();
        self.cache.reset(self.items.len());
        self.viewport.detach_all();
        self.sync_extent();
        log::debug!("set_items: {} items", self.items.len());
        self.request_recompute();
    }

    /// Appends or prepends one item.
    pub fn add_item(&mut self, item: T, to_front: bool) {
        self.add_items(std::iter::once(item), to_front);
    }

    /// Appends or prepends several items, keeping their order.
    ///
    /// Prepending shifts every existing index, so the whole cache is dropped
    /// and every attached node is detached. Appending only grows the cache.
    pub fn add_items(&mut self, items: impl IntoIterator<Item = T>, to_front: bool) {
        let before = self.items.len();
        if to_front {
            let added: Vec<T> = items.into_iter().collect();
            if added.is_empty() {
                return;
            }
            self.items.splice(0..0, added);
            self.cache.reset(self.items.len());
            self.viewport.detach_all();
        } else {
            self.items.extend(items);
            if self.items.len() == before {
                return;
            }
            self.cache.resize(self.items.len());
        }
        log::debug!(
            "add_items: {} added to the {}",
            self.items.len() - before,
            if to_front { "front" } else { "back" }
        );
        self.sync_extent();
        self.request_recompute();
    }

    /// Replaces the item at `index` in place. Only that cache entry and its
    /// attached node are dropped.
    pub fn update_item(&mut self, index: usize, item: T) -> Result<(), VirtualListError> {
        self.check_index(index)?;
        self.items[index] = item;
        self.cache.invalidate(index);
        self.viewport.detach_index(index);
        log::debug!("update_item: {index}");
        self.request_recompute();
        Ok(())
    }

    /// Removes the item at `index`. Later items shift down by one, so every
    /// cache entry and attached node from `index` on is dropped.
    pub fn remove_item(&mut self, index: usize) -> Result<T, VirtualListError> {
        self.check_index(index)?;
        let removed = self.items.remove(index);
        self.invalidate_tail(index);
        log::debug!("remove_item: {index}, {} left", self.items.len());
        self.request_recompute();
        Ok(removed)
    }

    /// Removes several items. Indices refer to positions before the call;
    /// duplicates are ignored. Fails without changes if any index is out of
    /// range. Returns the removed items in ascending index order.
    pub fn remove_items(&mut self, indexes: &[usize]) -> Result<Vec<T>, VirtualListError> {
        if let Some(&index) = indexes.iter().find(|&&i| i >= self.items.len()) {
            return Err(VirtualListError::IndexOutOfRange {
                index,
                len: self.items.len(),
            });
        }
        let mut sorted = indexes.to_vec();
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        sorted.dedup();
        let Some(&min_index) = sorted.last() else {
            return Ok(Vec::new());
        };

        // Descending order keeps the remaining indices valid while removing.
        let mut removed: Vec<T> = sorted.iter().map(|&i| self.items.remove(i)).collect();
        removed.reverse();

        self.invalidate_tail(min_index);
        log::debug!(
            "remove_items: {} removed from {min_index}, {} left",
            removed.len(),
            self.items.len()
        );
        self.request_recompute();
        Ok(removed)
    }

    fn check_index(&self, index: usize) -> Result<(), VirtualListError> {
        if index < self.items.len() {
            Ok(())
        } else {
            Err(VirtualListError::IndexOutOfRange {
                index,
                len: self.items.len(),
            })
        }
    }

    fn invalidate_tail(&mut self, index: usize) {
        self.cache.invalidate_from(index);
        self.cache.resize(self.items.len());
        self.viewport.detach_from(index);
        self.sync_extent();
    }

    fn sync_extent(&mut self) {
        self.viewport.set_item_count(self.items.len());
        let display_height = self.scroll.display_height();
        self.scroll.set_bounds(self.viewport.extent(), display_height);
    }

    // ---------------------------------------------------------------------
    // Events and scheduling
    // ---------------------------------------------------------------------

    /// Applies a host notification and requests a recompute.
    pub fn handle_event(&mut self, event: ListEvent) -> ScheduleOutcome {
        match event {
            ListEvent::Scrolled { offset } => {
                self.scroll.set_host_offset(offset);
            }
            ListEvent::ScrolledBy { delta } => {
                self.scroll.scroll_by(delta);
            }
            ListEvent::Resized { display_height } => self.resize(display_height),
        }
        self.request_recompute()
    }

    /// Scrolls so that `index` sits at the top of the display, clamped so
    /// the last page stays full.
    pub fn scroll_to_index(&mut self, index: usize) -> ScheduleOutcome {
        let offset = self.viewport.geometry().item_offset(index);
        self.scroll.scroll_to(offset);
        self.request_recompute()
    }

    fn resize(&mut self, display_height: f32) {
        if !display_height.is_finite() || display_height < 0.0 {
            log::warn!("ignoring resize to invalid display height {display_height}");
            return;
        }
        let mut geometry = *self.viewport.geometry();
        geometry.resize(display_height);
        self.viewport.set_geometry(geometry);
        self.scroll
            .set_bounds(self.viewport.extent(), display_height);
        log::debug!(
            "resize: display {display_height}, {} visible rows",
            geometry.max_visible_count
        );
    }

    /// Requests a throttled recompute.
    pub fn request_recompute(&mut self) -> ScheduleOutcome {
        let outcome = self.throttler.schedule(self.clock.now());
        if outcome == ScheduleOutcome::Dropped {
            log::trace!("recompute request dropped, one already in flight");
        }
        outcome
    }

    /// Deadline of the pending recompute, if any.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.throttler.next_deadline()
    }

    /// Runs the pending recompute if it is due. Returns whether one ran.
    pub fn poll(&mut self) -> Result<bool, VirtualListError> {
        if !self.throttler.take_due(self.clock.now()) {
            return Ok(false);
        }
        let result = self.recompute_now();
        if self.throttler.complete(self.clock.now()) {
            log::debug!("requests dropped during recompute, follow-up scheduled");
        }
        result.map(|_| true)
    }

    /// Recomputes the window immediately, bypassing the throttle.
    ///
    /// Render failures do not abort the pass: the failing index is left
    /// unmaterialized and the first failure is returned after the viewport has
    /// been reconciled.
    pub fn recompute_now(&mut self) -> Result<VisibleWindow, VirtualListError> {
        let geometry = *self.viewport.geometry();
        let window = compute_window(self.scroll.offset(), &geometry);
        let mut first_error = None;

        for index in window.clamped_to(self.items.len()) {
            let slot = self.viewport.placement(index);
            let renderer = &mut self.renderer;
            let resolved = self.cache.resolve(index, self.items.get(index), |index, item| {
                let template = renderer.template().clone();
                renderer.render(RenderRequest {
                    index,
                    item,
                    template,
                    slot,
                })
            });

            match resolved {
                Ok(Resolved::Rendered(node)) => {
                    log::trace!("materialized item {index}");
                    self.stats.total_rendered += 1;
                    self.viewport.attach(index, node.clone());
                }
                Ok(Resolved::Cached(node)) => {
                    self.stats.cache_hits += 1;
                    if !self.viewport.is_attached(index) {
                        self.viewport.attach(index, node.clone());
                    }
                }
                Ok(Resolved::Absent) => {}
                Err(source) => {
                    log::warn!("render failed for item {index}: {source}");
                    self.stats.render_failures += 1;
                    self.viewport.detach_index(index);
                    if first_error.is_none() {
                        first_error = Some(VirtualListError::RenderFailure { index, source });
                    }
                }
            }
        }

        let detached = self.viewport.detach_outside(window);
        let evicted = self.cache.retain_window(window);
        self.window = window;
        self.stats.recompute_count += 1;
        log::debug!(
            "recompute: window {}..{}, {} detached, {} evicted",
            window.start,
            window.end,
            detached.len(),
            evicted
        );

        match first_error {
            Some(error) => Err(error),
            None => Ok(window),
        }
    }

    /// Tears the list down: cancels the pending recompute and detaches every
    /// node. The collection is kept.
    pub fn dispose(&mut self) {
        self.throttler.cancel();
        self.viewport.detach_all();
        self.cache.reset(self.items.len());
        log::debug!("virtual list disposed");
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;
    use std::time::Duration;

    use lazyview_core::ManualClock;

    use super::*;
    use crate::lazy::render::{render_fn, RenderError};
    use crate::lazy::viewport::RetainedViewport;

    type Node = Rc<String>;

    fn label_renderer(
    ) -> impl ItemRenderer<&'static str, Node = Node, Template = &'static str> {
        render_fn(
            "row",
            |req: RenderRequest<'_, &'static str, &'static str>| -> Result<Node, RenderError> {
                Ok(Rc::new(format!("{}:{}:{}", req.template, req.index, req.item)))
            },
        )
    }

    fn list(
        items: &[&'static str],
        config: VirtualListConfig,
    ) -> (
        VirtualList<
            &'static str,
            impl ItemRenderer<&'static str, Node = Node, Template = &'static str>,
            RetainedViewport<Node>,
            ManualClock,
        >,
        ManualClock,
    ) {
        let clock = ManualClock::new();
        let list = VirtualList::with_clock(
            items.iter().copied(),
            label_renderer(),
            RetainedViewport::new(),
            config,
            clock.clone(),
        )
        .unwrap();
        (list, clock)
    }

    fn small_config() -> VirtualListConfig {
        VirtualListConfig::new()
            .item_height(50.0)
            .gap(5.0)
            .offset_buffer(1)
            .display_height(110.0)
    }

    #[test]
    fn initial_recompute_waits_for_interval() {
        let (mut list, clock) = list(&["a", "b", "c"], small_config());
        assert_eq!(list.phase(), RecomputePhase::Scheduled);
        assert!(!list.poll().unwrap());

        clock.advance(Duration::from_millis(50));
        assert!(list.poll().unwrap());

        assert_eq!(list.viewport().attached(), vec![0, 1, 2]);
        assert_eq!(list.phase(), RecomputePhase::Idle);
    }

    #[test]
    fn update_item_out_of_range_is_reported() {
        let (mut list, _) = list(&["a"], small_config());
        let err = list.update_item(3, "z").unwrap_err();
        assert!(matches!(
            err,
            VirtualListError::IndexOutOfRange { index: 3, len: 1 }
        ));
        assert_eq!(list.items(), &["a"]);
    }

    #[test]
    fn remove_items_is_atomic_on_bad_index() {
        let (mut list, _) = list(&["a", "b", "c"], small_config());
        assert!(list.remove_items(&[0, 7]).is_err());
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn remove_items_returns_removed_in_order() {
        let (mut list, _) = list(&["a", "b", "c", "d"], small_config());
        let removed = list.remove_items(&[2, 0, 2]).unwrap();
        assert_eq!(removed, vec!["a", "c"]);
        assert_eq!(list.items(), &["b", "d"]);
    }

    #[test]
    fn append_keeps_cached_nodes() {
        let (mut list, _) = list(&["a", "b"], small_config());
        list.recompute_now().unwrap();
        let before = list.cached_node(0).cloned().unwrap();

        list.add_item("c", false);
        list.recompute_now().unwrap();

        assert!(Rc::ptr_eq(&before, list.cached_node(0).unwrap()));
        assert_eq!(list.viewport().attached(), vec![0, 1, 2]);
    }

    #[test]
    fn resize_rederives_visible_count() {
        let (mut list, _) = list(&["a"; 20], small_config());
        assert_eq!(list.geometry().max_visible_count, 2);

        list.handle_event(ListEvent::Resized {
            display_height: 330.0,
        });

        assert_eq!(list.geometry().max_visible_count, 6);
        assert_eq!(list.recompute_now().unwrap(), VisibleWindow::new(0, 7));
    }

    #[test]
    fn dispose_detaches_everything() {
        let (mut list, clock) = list(&["a", "b", "c"], small_config());
        list.recompute_now().unwrap();

        list.dispose();
        clock.advance(Duration::from_secs(1));

        assert!(list.port().is_empty());
        assert!(!list.poll().unwrap());
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let result = VirtualList::new(
            Vec::<&'static str>::new(),
            label_renderer(),
            RetainedViewport::new(),
            VirtualListConfig::new().item_height(-5.0).gap(0.0),
        );
        assert!(matches!(result, Err(VirtualListError::InvalidConfig(_))));
    }
}
