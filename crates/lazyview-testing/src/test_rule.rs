use std::fmt::Display;
use std::time::Duration;

use lazyview_core::ManualClock;
use lazyview_foundation::{
    ListEvent, RetainedViewport, VirtualList, VirtualListConfig, VirtualListError, VisibleWindow,
};

use crate::test_renderer::{RenderTracker, TestNode, TestRenderer};

/// List type driven by [`ListTestRule`].
pub type TestList<T> = VirtualList<T, TestRenderer, RetainedViewport<TestNode>, ManualClock>;

/// Maximum number of recompute passes [`ListTestRule::await_idle`] waits for.
const MAX_SETTLE_PASSES: usize = 100;

pub struct NodeMatcher {
    description: String,
    matcher: Box<dyn Fn(&TestNode) -> bool>,
}

impl NodeMatcher {
    pub fn new(description: impl Into<String>, matcher: impl Fn(&TestNode) -> bool + 'static) -> Self {
        Self {
            description: description.into(),
            matcher: Box::new(matcher),
        }
    }

    pub fn matches(&self, node: &TestNode) -> bool {
        (self.matcher)(node)
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

/// Matches nodes whose label ends with `:item`.
pub fn has_item(item: impl Display) -> NodeMatcher {
    let suffix = format!(":{item}");
    NodeMatcher::new(format!("has_item({suffix:?})"), move |node| {
        node.label().ends_with(&suffix)
    })
}

/// Drives a [`TestList`] on a manual clock.
///
/// Every change goes through the real throttled path; [`await_idle`]
/// advances the clock deadline by deadline until no recompute is pending.
///
/// [`await_idle`]: ListTestRule::await_idle
pub struct ListTestRule<T: Display> {
    list: TestList<T>,
    clock: ManualClock,
    tracker: RenderTracker,
}

impl<T: Display> ListTestRule<T> {
    pub fn new(items: impl IntoIterator<Item = T>, config: VirtualListConfig) -> Self {
        Self::try_new(items, config).unwrap_or_else(|err| panic!("invalid test list: {err}"))
    }

    pub fn try_new(
        items: impl IntoIterator<Item = T>,
        config: VirtualListConfig,
    ) -> Result<Self, VirtualListError> {
        let clock = ManualClock::new();
        let renderer = TestRenderer::new("row");
        let tracker = renderer.tracker();
        let list = VirtualList::with_clock(
            items,
            renderer,
            RetainedViewport::new(),
            config,
            clock.clone(),
        )?;
        Ok(Self { list, clock, tracker })
    }

    pub fn list(&self) -> &TestList<T> {
        &self.list
    }

    pub fn list_mut(&mut self) -> &mut TestList<T> {
        &mut self.list
    }

    pub fn clock(&self) -> &ManualClock {
        &self.clock
    }

    pub fn tracker(&self) -> &RenderTracker {
        &self.tracker
    }

    /// Advances the clock to each pending deadline and polls until the list
    /// is idle. Returns the first recompute error, if any.
    pub fn try_await_idle(&mut self) -> Result<(), VirtualListError> {
        let mut first_error = None;
        for pass in 0..MAX_SETTLE_PASSES {
            let Some(deadline) = self.list.next_deadline() else {
                log::trace!("list idle after {pass} passes");
                return first_error.map_or(Ok(()), Err);
            };
            self.clock.advance_to(deadline);
            if let Err(err) = self.list.poll() {
                first_error.get_or_insert(err);
            }
        }
        panic!("list failed to settle after {MAX_SETTLE_PASSES} recompute passes");
    }

    pub fn await_idle(&mut self) {
        if let Err(err) = self.try_await_idle() {
            panic!("recompute failed: {err}");
        }
    }

    pub fn advance(&mut self, delta: Duration) -> Result<bool, VirtualListError> {
        self.clock.advance(delta);
        self.list.poll()
    }

    pub fn scroll_to(&mut self, offset: f32) {
        self.list.handle_event(ListEvent::Scrolled { offset });
        self.await_idle();
    }

    pub fn scroll_to_index(&mut self, index: usize) {
        self.list.scroll_to_index(index);
        self.await_idle();
    }

    pub fn resize(&mut self, display_height: f32) {
        self.list.handle_event(ListEvent::Resized { display_height });
        self.await_idle();
    }

    pub fn window(&self) -> VisibleWindow {
        self.list.window()
    }

    /// Attached indices in ascending order.
    pub fn attached_indices(&self) -> Vec<usize> {
        self.list.viewport().attached()
    }

    pub fn attached_labels(&self) -> Vec<String> {
        self.list
            .port()
            .attached()
            .into_iter()
            .map(|(_, attached)| attached.node.label().to_string())
            .collect()
    }

    pub fn node_at(&self, index: usize) -> Option<TestNode> {
        self.list.port().get(index).map(|attached| attached.node.clone())
    }

    pub fn find_node(&self, matcher: &NodeMatcher) -> Option<(usize, TestNode)> {
        self.list
            .port()
            .attached()
            .into_iter()
            .find(|(_, attached)| matcher.matches(&attached.node))
            .map(|(index, attached)| (index, attached.node.clone()))
    }

    pub fn assert_materialized(&self, expected: &[usize]) {
        let attached = self.attached_indices();
        assert_eq!(
            attached, expected,
            "attached indices differ (window {:?}, {} items)",
            self.list.window(),
            self.list.len()
        );
        assert_eq!(
            self.list.cached_indices(),
            expected,
            "cached indices differ from attached ones"
        );
    }

    pub fn assert_exists(&self, matcher: &NodeMatcher) {
        assert!(
            self.find_node(matcher).is_some(),
            "no attached node matches {}",
            matcher.description()
        );
    }

    pub fn render_count(&self) -> usize {
        self.tracker.render_count()
    }
}
