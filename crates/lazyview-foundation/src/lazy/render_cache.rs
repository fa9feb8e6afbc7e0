//! Sparse, index-addressed cache of rendered nodes.
//!
//! Slots line up with the item collection: slot `i` holds the node rendered
//! for the item currently at index `i`, or nothing. Only indices inside the
//! visible window stay populated. Because indices shift on structural edits,
//! every edit invalidates the slots whose index no longer names the same
//! item.

use super::geometry::VisibleWindow;

/// Outcome of [`RenderCache::resolve`].
#[derive(Debug, PartialEq)]
pub enum Resolved<'a, N> {
    /// The slot was already populated.
    Cached(&'a N),
    /// The render callback ran and its node was stored.
    Rendered(&'a N),
    /// No item at this index; nothing was rendered or stored.
    Absent,
}

impl<N> Resolved<'_, N> {
    pub fn is_fresh(&self) -> bool {
        matches!(self, Resolved::Rendered(_))
    }
}

#[derive(Clone, Debug)]
pub struct RenderCache<N> {
    slots: Vec<Option<N>>,
}

impl<N> Default for RenderCache<N> {
    fn default() -> Self {
        Self { slots: Vec::new() }
    }
}

impl<N> RenderCache<N> {
    /// Creates an empty cache sized for `len` items.
    pub fn with_len(len: usize) -> Self {
        let mut cache = Self::default();
        cache.resize(len);
        cache
    }

    /// Number of slots (equals the collection length).
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of populated slots.
    pub fn cached_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn get(&self, index: usize) -> Option<&N> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    pub fn contains(&self, index: usize) -> bool {
        self.get(index).is_some()
    }

    /// Returns the node for `index`, rendering and storing it on a miss.
    ///
    /// `item` is `None` for holes; those are skipped. When `render` fails the
    /// slot stays empty and the error is returned.
    pub fn resolve<T, E>(
        &mut self,
        index: usize,
        item: Option<&T>,
        render: impl FnOnce(usize, &T) -> Result<N, E>,
    ) -> Result<Resolved<'_, N>, E> {
        let Some(item) = item else {
            return Ok(Resolved::Absent);
        };
        if index >= self.slots.len() {
            self.slots.resize_with(index + 1, || None);
        }
        match &mut self.slots[index] {
            Some(node) => Ok(Resolved::Cached(node)),
            slot @ None => {
                let node = render(index, item)?;
                Ok(Resolved::Rendered(slot.insert(node)))
            }
        }
    }

    /// Drops the entry at `index`.
    pub fn invalidate(&mut self, index: usize) -> Option<N> {
        self.slots.get_mut(index).and_then(Option::take)
    }

    /// Drops every entry at or after `index`.
    pub fn invalidate_from(&mut self, index: usize) {
        for slot in self.slots.iter_mut().skip(index) {
            *slot = None;
        }
    }

    /// Drops everything and resizes to `len` empty slots.
    pub fn reset(&mut self, len: usize) {
        self.slots.clear();
        self.resize(len);
    }

    /// Grows or shrinks to `len` slots. New slots start empty.
    pub fn resize(&mut self, len: usize) {
        self.slots.resize_with(len, || None);
    }

    /// Evicts entries outside `window`.
    pub fn retain_window(&mut self, window: VisibleWindow) -> usize {
        let mut evicted = 0;
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.is_some() && !window.contains(index) {
                *slot = None;
                evicted += 1;
            }
        }
        evicted
    }

    /// Populated indices in ascending order.
    pub fn cached_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|_| index))
    }
}
