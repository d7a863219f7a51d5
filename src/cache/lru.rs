use crate::Probability;
use std::collections::HashMap;
use std::hash::Hash;

/// A bounded cache evicting the least-recently-used entry on overflow.
///
/// Recency is a monotonic clock stamped on every access; eviction scans
/// for the stale minimum. Linear, but capacities are small and the
/// simulations this cache fronts dwarf the scan.
#[derive(Debug)]
pub struct Lru<K, V> {
    capacity: usize,
    clock: u64,
    hits: usize,
    misses: usize,
    entries: HashMap<K, (u64, V)>,
}

impl<K: Eq + Hash + Clone, V> Lru<K, V> {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0);
        Self {
            capacity,
            clock: 0,
            hits: 0,
            misses: 0,
            entries: HashMap::with_capacity(capacity),
        }
    }

    /// lookup, promoting the entry to most-recently-used
    pub fn get(&mut self, key: &K) -> Option<&V> {
        self.clock += 1;
        match self.entries.get_mut(key) {
            Some(entry) => entry.0 = self.clock,
            None => {
                self.misses += 1;
                return None;
            }
        }
        self.hits += 1;
        self.entries.get(key).map(|entry| &entry.1)
    }

    /// insert or refresh, evicting the least-recently-used on overflow
    pub fn put(&mut self, key: K, value: V) {
        self.clock += 1;
        self.entries.insert(key, (self.clock, value));
        if self.entries.len() > self.capacity {
            let eldest = self
                .entries
                .iter()
                .min_by_key(|(_, (stamp, _))| *stamp)
                .map(|(key, _)| key.clone())
                .expect("overflow implies nonempty");
            self.entries.remove(&eldest);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
    pub fn hits(&self) -> usize {
        self.hits
    }
    pub fn misses(&self) -> usize {
        self.misses
    }
    /// fraction of lookups served, 0.0 before any lookup
    pub fn hit_rate(&self) -> Probability {
        match self.hits + self.misses {
            0 => 0.,
            n => self.hits as Probability / n as Probability,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evicts_least_recently_accessed() {
        let mut lru = Lru::new(2);
        lru.put("a", 1);
        lru.put("b", 2);
        lru.get(&"a");
        lru.put("c", 3); // "b" is now the stale one
        assert!(lru.get(&"a").is_some());
        assert!(lru.get(&"b").is_none());
        assert!(lru.get(&"c").is_some());
        assert_eq!(lru.len(), 2);
    }

    #[test]
    fn overflow_evicts_exactly_one() {
        let mut lru = Lru::new(3);
        for i in 0..4 {
            lru.put(i, i);
        }
        assert_eq!(lru.len(), 3);
        assert!(lru.get(&0).is_none());
    }

    #[test]
    fn hit_rate_counts_lookups() {
        let mut lru = Lru::new(4);
        assert_eq!(lru.hit_rate(), 0.);
        lru.put("k", 42);
        for _ in 0..10 {
            assert!(lru.get(&"k").is_some());
        }
        assert_eq!(lru.hit_rate(), 1.0);
        lru.get(&"absent");
        assert!((lru.hit_rate() - 10. / 11.).abs() < 1e-6);
    }

    #[test]
    fn refresh_keeps_single_entry() {
        let mut lru = Lru::new(2);
        lru.put("a", 1);
        lru.put("a", 2);
        assert_eq!(lru.len(), 1);
        assert_eq!(lru.get(&"a"), Some(&2));
    }
}
