use super::key::Key;
use anyhow::Context;
use anyhow::Result;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde::Serialize;
use std::path::Path;
use std::path::PathBuf;

/// Versioned envelope around every persisted payload.
#[derive(Serialize, Deserialize)]
struct Sealed<T> {
    version: u32,
    key: String,
    data: T,
}

/// A content-addressed directory of JSON files, one per key.
///
/// Reads treat anything unreadable, unparsable, or version-mismatched
/// as a miss. Writes are best-effort: failures are logged and swallowed
/// so the memory tier keeps serving. Concurrent writers to one key are
/// harmless, since all valid computations for a key agree.
#[derive(Debug)]
pub struct Store {
    root: PathBuf,
}

impl Store {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)
            .with_context(|| format!("create cache directory {}", root.display()))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path(&self, key: &Key) -> PathBuf {
        self.root.join(format!("{}.json", key))
    }

    /// a miss, never an error
    pub fn load<T: DeserializeOwned>(&self, key: &Key) -> Option<T> {
        let bytes = std::fs::read(self.path(key)).ok()?;
        let sealed = serde_json::from_slice::<Sealed<T>>(&bytes).ok()?;
        (sealed.version == crate::FORMAT_VERSION).then_some(sealed.data)
    }

    /// best-effort write-through
    pub fn save<T: Serialize>(&self, key: &Key, data: &T) {
        let path = self.path(key);
        let sealed = Sealed {
            version: crate::FORMAT_VERSION,
            key: key.to_string(),
            data,
        };
        let result = serde_json::to_vec(&sealed)
            .map_err(anyhow::Error::from)
            .and_then(|bytes| std::fs::write(&path, bytes).map_err(anyhow::Error::from));
        if let Err(e) = result {
            log::warn!("cache write failed ({}): {}", path.display(), e);
        }
    }

    /// keys of the n most-recently-modified entries, for warming
    pub fn recent(&self, n: usize) -> Vec<Key> {
        let mut entries = self.survey();
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries.into_iter().take(n).map(|(key, _)| key).collect()
    }

    /// delete all but the newest-n entries; returns how many were removed
    pub fn trim(&self, keep: usize) -> usize {
        let mut entries = self.survey();
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries
            .into_iter()
            .skip(keep)
            .filter(|(key, _)| std::fs::remove_file(self.path(key)).is_ok())
            .count()
    }

    fn survey(&self) -> Vec<(Key, std::time::SystemTime)> {
        let Ok(dir) = std::fs::read_dir(&self.root) else {
            return vec![];
        };
        dir.flatten()
            .filter_map(|entry| {
                let modified = entry.metadata().ok()?.modified().ok()?;
                let stem = entry.path().file_stem()?.to_str()?.to_string();
                let key = Key::try_from(stem.as_str()).ok()?;
                Some((key, modified))
            })
            .collect()
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
    fn round_trips_through_envelope() {
        let store = Store::new(scratch("roundtrip")).unwrap();
        let key = Key::of(["some", "parts"]);
        store.save(&key, &vec![0.25f32, 0.75f32]);
        assert_eq!(
            store.load::<Vec<f32>>(&key),
            Some(vec![0.25f32, 0.75f32])
        );
    }

    #[test]
    fn absent_and_corrupt_files_are_misses() {
        let store = Store::new(scratch("corrupt")).unwrap();
        let key = Key::of(["missing"]);
        assert_eq!(store.load::<Vec<f32>>(&key), None);
        std::fs::write(store.root().join(format!("{}.json", key)), b"not json").unwrap();
        assert_eq!(store.load::<Vec<f32>>(&key), None);
    }

    #[test]
    fn version_mismatch_is_a_miss() {
        let store = Store::new(scratch("version")).unwrap();
        let key = Key::of(["stale"]);
        let sealed = serde_json::json!({ "version": 0, "key": key.to_string(), "data": [1.0] });
        std::fs::write(
            store.root().join(format!("{}.json", key)),
            serde_json::to_vec(&sealed).unwrap(),
        )
        .unwrap();
        assert_eq!(store.load::<Vec<f32>>(&key), None);
    }

    #[test]
    fn trim_keeps_newest() {
        let store = Store::new(scratch("trim")).unwrap();
        for i in 0..5 {
            store.save(&Key::from(i), &i);
        }
        let removed = store.trim(2);
        assert_eq!(removed, 3);
        assert_eq!(store.recent(10).len(), 2);
    }
}
