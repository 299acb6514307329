//! In-memory run cache.
//!
//! Entries live until the cache is dropped or [`RunCache::clear`] is called.
//! There is no eviction. The map sits behind one `RwLock`; lock poisoning only
//! happens after a panic while holding it, which is treated as unrecoverable.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use crate::models::{Coordinate, FetchResult, RawFeature};

/// Composite lookup key: endpoint, rounded center, rounded radius, timeout
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(endpoint: &str, center: Coordinate, radius_m: f64, timeout_secs: u64) -> Self {
        Self(format!(
            "{}|{}|{}|{}|{}",
            endpoint,
            round_to(center.lat(), 6),
            round_to(center.lon(), 6),
            round_to(radius_m, 2),
            timeout_secs
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Round through the decimal text of `value`, so ties follow the exact binary
/// value (1000.005 is stored just below the tie and rounds to 1000.0)
fn round_to(value: f64, decimals: usize) -> f64 {
    let rounded = format!("{:.*}", decimals, value).parse::<f64>().unwrap_or(value);
    // Avoid "-0" and "0" producing different keys
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    features: Vec<RawFeature>,
    retrieved_at: DateTime<Utc>,
}

/// Session-lifetime store of fetch results
#[derive(Debug, Clone, Default)]
pub struct RunCache {
    entries: Arc<RwLock<HashMap<CacheKey, CacheEntry>>>,
}

impl RunCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a key; a hit comes back with `cache_hit` set and zero attempts
    pub fn get(&self, key: &CacheKey) -> Option<FetchResult> {
        let entries = self.entries.read().unwrap();
        entries.get(key).map(|entry| FetchResult {
            features: entry.features.clone(),
            retrieved_at: entry.retrieved_at,
            cache_hit: true,
            attempts: 0,
        })
    }

    /// Store a result, replacing any previous entry for the key
    pub fn put(&self, key: CacheKey, result: &FetchResult) {
        let mut entries = self.entries.write().unwrap();
        entries.insert(
            key,
            CacheEntry { features: result.features.clone(), retrieved_at: result.retrieved_at },
        );
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.read().unwrap().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Explicit reset; the only way entries are removed
    pub fn clear(&self) {
        self.entries.write().unwrap().clear();
    }
}
