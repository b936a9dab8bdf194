use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

pub const PREAMBLE_CHUNK: &str = "preamble";
pub const INSTRUCTIONS_CHUNK: &str = "instructions";
pub const POSTAMBLE_CHUNK: &str = "postamble";
pub const CHARTS_CHUNK: &str = "charts";
pub const PATTERN_CHUNK: &str = "pattern";

/// Every chunk name a renderer owns a key for. Section inputs may not use these as their kind.
pub const CHUNK_NAMES: [&str; 5] = [
    PREAMBLE_CHUNK,
    INSTRUCTIONS_CHUNK,
    POSTAMBLE_CHUNK,
    CHARTS_CHUNK,
    PATTERN_CHUNK,
];

/// Build a cache key of the form `prefix:owner:name:[id, id]`, with spaces replaced by `_`.
pub fn make_cache_key(prefix: &str, owner: &str, name: &str, ids: &[u64]) -> String {
    let ids = ids
        .iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    format!("{prefix}:{owner}:{name}:[{ids}]").replace(' ', "_")
}

/// Key/value store for rendered HTML fragments.
///
/// Implementations must be safe to share between renderers; a failed or missing lookup is simply
/// a miss.
pub trait RenderCache: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: &str);

    fn delete_many(&self, keys: &[String]);
}

/// Process-local cache.
#[derive(Debug, Default)]
pub struct InMemoryCache {
    entries: Mutex<HashMap<String, String>>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, String>> {
        // Entries are written whole, so a poisoned map is still consistent.
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.lock().contains_key(key)
    }

    /// All keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.lock().keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl RenderCache for InMemoryCache {
    fn get(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.lock().insert(key.to_string(), value.to_string());
    }

    fn delete_many(&self, keys: &[String]) {
        let mut entries = self.lock();
        for key in keys {
            entries.remove(key);
        }
    }
}

/// Cache that never stores anything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullCache;

impl RenderCache for NullCache {
    fn get(&self, _key: &str) -> Option<String> {
        None
    }

    fn set(&self, _key: &str, _value: &str) {}

    fn delete_many(&self, _keys: &[String]) {}
}

#[cfg(test)]
#[path = "../../tests/unit/render/cache.rs"]
mod tests;
