//! Single-slot cache for the most recently fetched rate table.

use tracing::debug;

use crate::rates::RateTable;

/// Holds at most one base currency's rate table in memory.
///
/// Owned and mutated by the interaction controller alone, so no
/// locking is needed. Nothing survives process exit.
#[derive(Debug, Default)]
pub struct RateCache {
    cached: Option<(String, RateTable)>,
}

impl RateCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// True exactly when no table is cached yet or the cached base
    /// differs from `requested_base`.
    pub fn should_refetch(&self, requested_base: &str) -> bool {
        match &self.cached {
            Some((base, _)) => base != requested_base,
            None => true,
        }
    }

    /// Replaces the cache contents in full.
    pub fn store(&mut self, base: String, table: RateTable) {
        debug!(base = %base, rates = table.len(), "Caching rate table");
        self.cached = Some((base, table));
    }

    pub fn table(&self) -> Option<&RateTable> {
        self.cached.as_ref().map(|(_, table)| table)
    }

    pub fn base(&self) -> Option<&str> {
        self.cached.as_ref().map(|(base, _)| base.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_cache_forces_refetch() {
        let cache = RateCache::new();
        assert!(cache.should_refetch("USD"));
        assert!(cache.table().is_none());
        assert!(cache.base().is_none());
    }

    #[test]
    fn test_cached_base_is_not_refetched() {
        let mut cache = RateCache::new();
        cache.store("USD".to_string(), RateTable::from([("EUR", 0.92)]));

        assert!(!cache.should_refetch("USD"));
        assert!(cache.should_refetch("EUR"));
        assert_eq!(cache.base(), Some("USD"));
    }

    #[test]
    fn test_store_replaces_previous_table_in_full() {
        let mut cache = RateCache::new();
        cache.store(
            "USD".to_string(),
            RateTable::from([("EUR", 0.92), ("GBP", 0.79)]),
        );
        cache.store("EUR".to_string(), RateTable::from([("USD", 1.09)]));

        assert_eq!(cache.base(), Some("EUR"));
        let table = cache.table().unwrap();
        assert_eq!(table.rate("USD"), Some(1.09));
        // Entries from the old table are gone, not merged.
        assert_eq!(table.rate("GBP"), None);
    }
}
