//! Maps keyed by item index.
//!
//! Keys are dense small integers, so the Fx hasher is used unless the
//! `std-hash` feature selects the standard SipHash maps.

#[cfg(not(feature = "std-hash"))]
pub type IndexKeyedMap<V> = rustc_hash::FxHashMap<usize, V>;

#[cfg(feature = "std-hash")]
pub type IndexKeyedMap<V> = std::collections::HashMap<usize, V>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_map_is_empty_and_keyed_by_index() {
        let mut map: IndexKeyedMap<&str> = IndexKeyedMap::default();
        assert!(map.is_empty());

        map.insert(3, "d");
        map.insert(3, "d2");

        assert_eq!(map.len(), 1);
        assert_eq!(map.get(&3), Some(&"d2"));
    }
}
