//! Viewport adapter.
//!
//! The engine never touches a concrete UI toolkit. Hosts implement
//! [`ViewportPort`] for whatever holds their nodes (a DOM container, a
//! terminal buffer, a retained scene); [`Viewport`] layers the uniform-height
//! positioning contract on top of it.

use lazyview_core::collections::IndexKeyedMap;
use smallvec::SmallVec;

use super::geometry::{VisibleWindow, WindowGeometry};

/// Indices removed by a detach operation.
pub type DetachedIndices = SmallVec<[usize; 8]>;

/// Absolute position of one item slot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    pub index: usize,
    /// Offset from the top of the scrollable content: `index * (item_height + gap)`.
    pub offset: f32,
    pub height: f32,
}

impl Placement {
    pub fn for_index(index: usize, geometry: &WindowGeometry) -> Self {
        Self {
            index,
            offset: geometry.item_offset(index),
            height: geometry.item_height,
        }
    }
}

/// Capability the host provides to receive and drop rendered nodes.
pub trait ViewportPort {
    /// Rendered node type the port stores.
    type Node;

    /// Sets the total scrollable length of the content.
    fn set_extent(&mut self, extent: f32);

    /// Inserts `node` at `placement`. An existing node at the same index is
    /// replaced.
    fn attach(&mut self, placement: Placement, node: Self::Node);

    /// Removes the node at `index` and hands it back, if one is attached.
    fn detach(&mut self, index: usize) -> Option<Self::Node>;

    /// Indices of every attached node, in any order.
    fn attached_indices(&self) -> Vec<usize>;

    fn is_attached(&self, index: usize) -> bool {
        self.attached_indices().contains(&index)
    }

    /// Detaches every node whose index satisfies `predicate`.
    fn detach_where(&mut self, predicate: &mut dyn FnMut(usize) -> bool) -> DetachedIndices {
        let mut removed: DetachedIndices = self
            .attached_indices()
            .into_iter()
            .filter(|&index| predicate(index))
            .collect();
        removed.retain(|index| self.detach(*index).is_some());
        removed.sort_unstable();
        removed
    }
}

/// Positions nodes on a [`ViewportPort`] using the list geometry.
#[derive(Debug)]
pub struct Viewport<P> {
    port: P,
    geometry: WindowGeometry,
    item_count: usize,
}

impl<P: ViewportPort> Viewport<P> {
    pub fn new(port: P, geometry: WindowGeometry) -> Self {
        Self {
            port,
            geometry,
            item_count: 0,
        }
    }

    pub fn port(&self) -> &P {
        &self.port
    }

    pub fn geometry(&self) -> &WindowGeometry {
        &self.geometry
    }

    pub(crate) fn set_geometry(&mut self, geometry: WindowGeometry) {
        self.geometry = geometry;
    }

    pub fn item_count(&self) -> usize {
        self.item_count
    }

    /// Total scrollable extent: `(item_height + gap) * item_count`.
    pub fn extent(&self) -> f32 {
        self.geometry.total_extent(self.item_count)
    }

    pub fn placement(&self, index: usize) -> Placement {
        Placement::for_index(index, &self.geometry)
    }

    /// Records a new item count and pushes the matching extent to the port.
    pub fn set_item_count(&mut self, count: usize) {
        self.item_count = count;
        let extent = self.extent();
        self.port.set_extent(extent);
    }

    pub fn attach(&mut self, index: usize, node: P::Node) {
        let placement = self.placement(index);
        self.port.attach(placement, node);
    }

    pub fn is_attached(&self, index: usize) -> bool {
        self.port.is_attached(index)
    }

    pub fn detach_where(&mut self, mut predicate: impl FnMut(usize) -> bool) -> DetachedIndices {
        self.port.detach_where(&mut predicate)
    }

    pub fn detach_index(&mut self, index: usize) -> bool {
        self.port.detach(index).is_some()
    }

    /// Detaches nodes at `index` and after.
    pub fn detach_from(&mut self, index: usize) -> DetachedIndices {
        self.detach_where(|i| i >= index)
    }

    pub fn detach_outside(&mut self, window: VisibleWindow) -> DetachedIndices {
        self.detach_where(|i| !window.contains(i))
    }

    pub fn detach_all(&mut self) -> DetachedIndices {
        self.detach_where(|_| true)
    }

    /// Attached indices in ascending order.
    pub fn attached(&self) -> Vec<usize> {
        let mut indices = self.port.attached_indices();
        indices.sort_unstable();
        indices
    }
}

/// A node held by a [`RetainedViewport`].
#[derive(Clone, Debug, PartialEq)]
pub struct AttachedNode<N> {
    pub placement: Placement,
    pub node: N,
}

/// In-memory [`ViewportPort`] for headless hosts and tests.
#[derive(Clone, Debug)]
pub struct RetainedViewport<N> {
    nodes: IndexKeyedMap<AttachedNode<N>>,
    extent: f32,
    attach_count: usize,
    detach_count: usize,
}

impl<N> Default for RetainedViewport<N> {
    fn default() -> Self {
        Self {
            nodes: IndexKeyedMap::default(),
            extent: 0.0,
            attach_count: 0,
            detach_count: 0,
        }
    }
}

impl<N> RetainedViewport<N> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extent(&self) -> f32 {
        self.extent
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&AttachedNode<N>> {
        self.nodes.get(&index)
    }

    /// Attached nodes sorted by index.
    pub fn attached(&self) -> Vec<(usize, &AttachedNode<N>)> {
        let mut entries: Vec<_> = self.nodes.iter().map(|(i, n)| (*i, n)).collect();
        entries.sort_unstable_by_key(|(index, _)| *index);
        entries
    }

    /// Number of attach calls received so far.
    pub fn attach_count(&self) -> usize {
        self.attach_count
    }

    /// Number of nodes removed so far.
    pub fn detach_count(&self) -> usize {
        self.detach_count
    }
}

impl<N> ViewportPort for RetainedViewport<N> {
    type Node = N;

    fn set_extent(&mut self, extent: f32) {
        self.extent = extent;
    }

    fn attach(&mut self, placement: Placement, node: N) {
        self.attach_count += 1;
        self.nodes
            .insert(placement.index, AttachedNode { placement, node });
    }

    fn detach(&mut self, index: usize) -> Option<N> {
        let removed = self.nodes.remove(&index).map(|attached| attached.node);
        if removed.is_some() {
            self.detach_count += 1;
        }
        removed
    }

    fn attached_indices(&self) -> Vec<usize> {
        self.nodes.keys().copied().collect()
    }

    fn is_attached(&self, index: usize) -> bool {
        self.nodes.contains_key(&index)
    }
}
