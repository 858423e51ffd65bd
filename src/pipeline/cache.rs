//! Extraction cache with fast hashing

use crate::extract::{extract_conditions, RawCondition};
use ahash::AHashMap;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use crate::vocabulary::Vocabulary;

/// Global extraction cache keyed by vocabulary version and request text
static EXTRACTION_CACHE: Lazy<RwLock<AHashMap<String, Vec<RawCondition>>>> = Lazy::new(|| {
    let map = AHashMap::with_capacity(1024);
    RwLock::new(map)
});

fn cache_key(vocabulary: &Vocabulary, text: &str) -> String {
    // Instance id in the key so a vocabulary reload invalidates old entries
    // even when the declared version number stays the same
    format!("{}\u{1}{}", vocabulary.instance_id(), text.to_lowercase())
}

/// Get or extract conditions for a request, using the cache for repeated
/// requests
#[inline]
pub fn get_or_extract(vocabulary: &Vocabulary, text: &str) -> Vec<RawCondition> {
    let key = cache_key(vocabulary, text);

    // Fast path: check read lock first
    {
        let cache = EXTRACTION_CACHE.read();
        if let Some(conditions) = cache.get(&key) {
            return conditions.clone();
        }
    }

    // Slow path: extract and cache
    let conditions = extract_conditions(vocabulary, text);

    {
        let mut cache = EXTRACTION_CACHE.write();
        cache.insert(key, conditions.clone());
    }

    conditions
}

/// Clear the extraction cache (useful for testing)
#[allow(dead_code)]
pub fn clear_cache() {
    let mut cache = EXTRACTION_CACHE.write();
    cache.clear();
}

/// Get cache statistics
#[allow(dead_code)]
pub fn cache_size() -> usize {
    let cache = EXTRACTION_CACHE.read();
    cache.len()
}
