/// Statistics about rendered-node lifecycle.
///
/// Used for testing and debugging virtualization behavior.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VirtualListStats {
    /// Number of nodes currently attached to the viewport.
    pub items_in_use: usize,

    /// Number of populated cache slots.
    pub cached_entries: usize,

    /// Total number of render callback invocations that produced a node.
    pub total_rendered: usize,

    /// Number of window slots served from the cache.
    pub cache_hits: usize,

    /// Number of completed recompute passes.
    pub recompute_count: usize,

    /// Requests dropped because a recompute was already in flight.
    pub dropped_requests: usize,

    /// Render callback invocations that returned an error.
    pub render_failures: usize,
}
