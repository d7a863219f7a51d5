use super::key::Key;
use super::lru::Lru;
use super::store::Store;
use crate::Probability;
use anyhow::Result;
use std::path::PathBuf;
use std::sync::Mutex;

/// Two-tier cache of Monte Carlo equity results.
///
/// Bounded LRU in front of an unbounded disk store. The memory tier is
/// the instance's only shared mutable state and is guarded by one coarse
/// lock; simulation cost dwarfs contention.
#[derive(Debug)]
pub struct EquityCache {
    memory: Mutex<Lru<Key, Vec<Probability>>>,
    disk: Store,
}

impl EquityCache {
    /// opens the store and eagerly warms the memory tier from the
    /// most-recently-modified files on disk
    pub fn new(root: impl Into<PathBuf>, capacity: usize) -> Result<Self> {
        let disk = Store::new(root)?;
        let mut memory = Lru::new(capacity);
        for key in disk.recent(crate::CACHE_WARM_LIMIT.min(capacity)) {
            if let Some(equities) = disk.load::<Vec<Probability>>(&key) {
                memory.put(key, equities);
            }
        }
        Ok(Self {
            memory: Mutex::new(memory),
            disk,
        })
    }

    /// memory first, then disk (promoting into memory)
    pub fn get(&self, key: &Key) -> Option<Vec<Probability>> {
        if let Some(hit) = self.memory.lock().unwrap().get(key) {
            return Some(hit.clone());
        }
        let equities = self.disk.load::<Vec<Probability>>(key)?;
        self.memory.lock().unwrap().put(*key, equities.clone());
        Some(equities)
    }

    /// write-through both tiers
    pub fn put(&self, key: Key, equities: &[Probability]) {
        self.memory.lock().unwrap().put(key, equities.to_vec());
        self.disk.save(&key, &equities.to_vec());
    }

    pub fn hit_rate(&self) -> Probability {
        self.memory.lock().unwrap().hit_rate()
    }

    /// retention: keep only the newest-n disk entries
    pub fn trim(&self, keep: usize) -> usize {
        self.disk.trim(keep)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir()
            .join("gtocore")
            .join(format!("{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn disk_hits_warm_the_memory_tier() {
        let root = scratch("equity-warm");
        let key = Key::of(["h:AsAh", "h:KdKc", "n=100"]);
        {
            let cache = EquityCache::new(&root, 8).unwrap();
            cache.put(key, &[0.8, 0.2]);
        }
        // fresh instance starts warm from disk
        let cache = EquityCache::new(&root, 8).unwrap();
        assert_eq!(cache.get(&key), Some(vec![0.8, 0.2]));
        assert_eq!(cache.hit_rate(), 1.0);
    }

    #[test]
    fn misses_are_none() {
        let cache = EquityCache::new(scratch("equity-miss"), 8).unwrap();
        assert_eq!(cache.get(&Key::of(["nothing"])), None);
    }
}
