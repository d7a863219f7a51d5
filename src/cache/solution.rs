use super::key::Key;
use super::lru::Lru;
use super::store::Store;
use crate::solver::solution::Solution;
use crate::Probability;
use anyhow::Result;
use std::path::PathBuf;
use std::sync::Mutex;

/// Two-tier cache of full solve results, keyed by canonicalized
/// (spot, ranges) inputs.
#[derive(Debug)]
pub struct SolutionCache {
    memory: Mutex<Lru<Key, Solution>>,
    disk: Store,
}

impl SolutionCache {
    pub fn new(root: impl Into<PathBuf>, capacity: usize) -> Result<Self> {
        let disk = Store::new(root)?;
        let mut memory = Lru::new(capacity);
        for key in disk.recent(crate::CACHE_WARM_LIMIT.min(capacity)) {
            if let Some(solution) = disk.load::<Solution>(&key) {
                memory.put(key, solution);
            }
        }
        Ok(Self {
            memory: Mutex::new(memory),
            disk,
        })
    }

    pub fn get(&self, key: &Key) -> Option<Solution> {
        if let Some(hit) = self.memory.lock().unwrap().get(key) {
            return Some(hit.clone());
        }
        let solution = self.disk.load::<Solution>(key)?;
        self.memory.lock().unwrap().put(*key, solution.clone());
        Some(solution)
    }

    pub fn put(&self, key: Key, solution: &Solution) {
        self.memory.lock().unwrap().put(key, solution.clone());
        self.disk.save(&key, solution);
    }

    pub fn hit_rate(&self) -> Probability {
        self.memory.lock().unwrap().hit_rate()
    }

    pub fn trim(&self, keep: usize) -> usize {
        self.disk.trim(keep)
    }
}
