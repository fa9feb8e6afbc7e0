use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;
use std::fmt;
use std::rc::Rc;

use lazyview_foundation::{ItemRenderer, Placement, RenderError, RenderRequest};

/// Node produced by [`TestRenderer`]. Cloning shares the same node, so
/// [`TestNode::same_node`] tells a reused node from a re-rendered one.
#[derive(Clone)]
pub struct TestNode(Rc<TestNodeData>);

#[derive(Debug)]
pub struct TestNodeData {
    /// Index the item had when it was rendered.
    pub index: usize,
    pub label: String,
    /// Position in render order, starting at 1.
    pub serial: usize,
    pub slot: Placement,
}

impl TestNode {
    pub fn index(&self) -> usize {
        self.0.index
    }

    pub fn label(&self) -> &str {
        &self.0.label
    }

    pub fn serial(&self) -> usize {
        self.0.serial
    }

    pub fn slot(&self) -> Placement {
        self.0.slot
    }

    pub fn same_node(&self, other: &TestNode) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for TestNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TestNode(#{} {:?} @{})", self.0.serial, self.0.label, self.0.index)
    }
}

#[derive(Debug)]
struct InjectedFailure(usize);

impl fmt::Display for InjectedFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "injected render failure at index {}", self.0)
    }
}

impl std::error::Error for InjectedFailure {}

/// Handle for inspecting and steering a [`TestRenderer`] after it has been
/// moved into a list.
#[derive(Clone, Default)]
pub struct RenderTracker {
    renders: Rc<Cell<usize>>,
    failing: Rc<RefCell<BTreeSet<usize>>>,
}

impl RenderTracker {
    /// Number of nodes rendered so far.
    pub fn render_count(&self) -> usize {
        self.renders.get()
    }

    /// Makes every render at `index` fail until cleared.
    pub fn fail_at(&self, index: usize) {
        self.failing.borrow_mut().insert(index);
    }

    pub fn clear_failures(&self) {
        self.failing.borrow_mut().clear();
    }
}

/// Renders any `Display` item into a [`TestNode`] labelled `template:item`.
pub struct TestRenderer {
    template: String,
    tracker: RenderTracker,
}

impl TestRenderer {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            tracker: RenderTracker::default(),
        }
    }

    pub fn tracker(&self) -> RenderTracker {
        self.tracker.clone()
    }
}

impl<T: fmt::Display> ItemRenderer<T> for TestRenderer {
    type Node = TestNode;
    type Template = String;

    fn template(&self) -> &String {
        &self.template
    }

    fn render(&mut self, request: RenderRequest<'_, T, String>) -> Result<TestNode, RenderError> {
        if self.tracker.failing.borrow().contains(&request.index) {
            return Err(Box::new(InjectedFailure(request.index)));
        }
        let serial = self.tracker.renders.get() + 1;
        self.tracker.renders.set(serial);
        Ok(TestNode(Rc::new(TestNodeData {
            index: request.index,
            label: format!("{}:{}", request.template, request.item),
            serial,
            slot: request.slot,
        })))
    }
}
