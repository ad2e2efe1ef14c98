//! # LRU (Least Recently Used) Paging Engine
//!
//! Evicts the page whose last request is furthest in the past.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────┐
//!   │                     LruCache<K, V>                           │
//!   │                                                              │
//!   │   entries: KeyedList<K, V>                                   │
//!   │     index: FxHashMap<K, SlotId>                              │
//!   │     list:  head (MRU) ◄──► ... ◄──► tail (LRU)               │
//!   │                                                              │
//!   │   capacity: usize                                            │
//!   └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Lookup Flow
//!
//! ```text
//!   lookup_update(key, loader)
//!        │
//!        ├── capacity 0 ──► loader(&key), drop ──► false
//!        ├── resident ────► move_to_front ───────► true
//!        └── absent ──────► pop tail if full ──► push_front(loader(&key)) ──► false
//! ```
//!
//! Capacity 2, trace `[1, 2, 1, 3, 2]`:
//!
//! ```text
//!   1 miss  [1]
//!   2 miss  [2, 1]
//!   1 hit   [1, 2]
//!   3 miss  [3, 1]   evict 2
//!   2 miss  [2, 3]   evict 1
//! ```
//!
//! ## Performance
//!
//! | Operation       | Time |
//! |-----------------|------|
//! | `lookup_update` | O(1) |
//! | `contains`      | O(1) |
//! | `resident_keys` | O(n) |

use std::fmt;
use std::hash::Hash;

use crate::ds::KeyedList;
use crate::error::InvariantError;
#[cfg(feature = "metrics")]
use crate::metrics::metrics_impl::LruMetrics;
#[cfg(feature = "metrics")]
use crate::metrics::snapshot::LruMetricsSnapshot;
#[cfg(feature = "metrics")]
use crate::metrics::traits::{CoreMetricsRecorder, MetricsSnapshotProvider};
use crate::traits::PagingCache;

/// Recency-ordered paging cache.
///
/// # Example
///
/// ```
/// use pagesim::policy::lru::LruCache;
/// use pagesim::traits::PagingCache;
///
/// let mut cache = LruCache::new(2);
/// for key in [1, 2, 1, 3] {
///     cache.lookup_update(key, |k| k * 10);
/// }
/// assert_eq!(cache.resident_keys(), vec![3, 1]);
/// assert_eq!(cache.peek(&1), Some(&10));
/// assert!(!cache.contains(&2));
/// ```
#[derive(Debug)]
pub struct LruCache<K, V> {
    entries: KeyedList<K, V>,
    capacity: usize,
    #[cfg(feature = "metrics")]
    metrics: LruMetrics,
}

impl<K, V> LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: KeyedList::with_capacity(capacity),
            capacity,
            #[cfg(feature = "metrics")]
            metrics: LruMetrics::default(),
        }
    }

    /// Key that the next admission would evict, if the cache is full.
    pub fn peek_victim(&self) -> Option<&K> {
        if self.entries.len() < self.capacity {
            return None;
        }
        self.entries.back_key()
    }

    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.entries.check_invariants()?;
        if self.entries.len() > self.capacity {
            return Err(InvariantError::new(format!(
                "lru holds {} entries over capacity {}",
                self.entries.len(),
                self.capacity
            )));
        }
        Ok(())
    }
}

impl<K, V> PagingCache<K, V> for LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn lookup_update<F>(&mut self, key: K, loader: F) -> bool
    where
        F: FnOnce(&K) -> V,
    {
        if self.entries.touch(&key) {
            #[cfg(feature = "metrics")]
            self.metrics.record_hit();
            return true;
        }

        #[cfg(feature = "metrics")]
        {
            self.metrics.record_miss();
            self.metrics.record_load();
        }

        if self.capacity == 0 {
            let _ = loader(&key);
            return false;
        }

        if self.entries.len() >= self.capacity && self.entries.pop_back().is_some() {
            #[cfg(feature = "metrics")]
            self.metrics.record_evicted_entry();
        }

        let value = loader(&key);
        self.entries.insert_front(key, value);
        false
    }

    fn contains(&self, key: &K) -> bool {
        self.entries.contains(key)
    }

    fn peek(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn resident_keys(&self) -> Vec<K> {
        self.entries.keys().cloned().collect()
    }

    fn clear(&mut self) {
        self.entries.clear();
        #[cfg(feature = "metrics")]
        self.metrics.record_clear();
    }
}

#[cfg(feature = "metrics")]
impl<K, V> LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    pub fn metrics_snapshot(&self) -> LruMetricsSnapshot {
        LruMetricsSnapshot {
            lookups: self.metrics.lookups,
            hits: self.metrics.hits,
            misses: self.metrics.misses,
            loads: self.metrics.loads,
            evicted_entries: self.metrics.evicted_entries,
            clears: self.metrics.clears,
            cache_len: self.entries.len(),
            capacity: self.capacity,
        }
    }
}

#[cfg(feature = "metrics")]
impl<K, V> MetricsSnapshotProvider<LruMetricsSnapshot> for LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn snapshot(&self) -> LruMetricsSnapshot {
        self.metrics_snapshot()
    }
}

/// Framed dump, one `[rank][key: k]` line per resident key, MRU first.
impl<K, V> fmt::Display for LruCache<K, V>
where
    K: Eq + Hash + Clone + fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "########")?;
        for (rank, key) in self.entries.keys().enumerate() {
            writeln!(f, "[{}][key: {}]", rank, key)?;
        }
        writeln!(f, "########")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn replay(cache: &mut LruCache<u32, u32>, trace: &[u32]) -> usize {
        trace
            .iter()
            .filter(|&&key| cache.lookup_update(key, |k| *k))
            .count()
    }

    #[test]
    fn evicts_least_recently_used() {
        let mut cache = LruCache::new(2);
        assert_eq!(replay(&mut cache, &[1, 2, 1, 3, 2]), 1);
        assert_eq!(cache.resident_keys(), vec![2, 3]);
        cache.check_invariants().unwrap();
    }

    #[test]
    fn hit_does_not_call_loader() {
        let mut cache = LruCache::new(1);
        let mut calls = 0;
        cache.lookup_update(7, |_| {
            calls += 1;
            "seven"
        });
        let hit = cache.lookup_update(7, |_| {
            calls += 1;
            "other"
        });
        assert!(hit);
        assert_eq!(calls, 1);
        assert_eq!(cache.peek(&7), Some(&"seven"));
    }

    #[test]
    fn zero_capacity_is_pass_through() {
        let mut cache = LruCache::new(0);
        let mut calls = 0;
        for _ in 0..3 {
            assert!(!cache.lookup_update(1, |_| {
                calls += 1;
            }));
        }
        assert_eq!(calls, 3);
        assert!(cache.is_empty());
        assert_eq!(cache.to_string(), "########\n########\n");
    }

    #[test]
    fn peek_and_contains_leave_order_alone() {
        let mut cache = LruCache::new(2);
        replay(&mut cache, &[1, 2]);
        assert!(cache.contains(&1));
        assert_eq!(cache.peek(&1), Some(&1));
        assert_eq!(cache.peek_victim(), Some(&1));
        replay(&mut cache, &[3]);
        assert!(!cache.contains(&1));
        assert_eq!(cache.resident_keys(), vec![3, 2]);
    }

    #[test]
    fn dump_lists_mru_first_and_is_idempotent() {
        let mut cache = LruCache::new(3);
        replay(&mut cache, &[4, 5, 6, 4]);
        let first = cache.to_string();
        assert_eq!(
            first,
            "########\n[0][key: 4]\n[1][key: 6]\n[2][key: 5]\n########\n"
        );
        assert_eq!(cache.to_string(), first);
        assert_eq!(replay(&mut cache, &[5]), 1);
    }

    #[test]
    fn clear_drops_everything() {
        let mut cache = LruCache::new(2);
        replay(&mut cache, &[1, 2]);
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(replay(&mut cache, &[1]), 0);
        cache.check_invariants().unwrap();
    }

    #[cfg(feature = "metrics")]
    #[test]
    fn metrics_count_hits_misses_and_evictions() {
        let mut cache = LruCache::new(2);
        replay(&mut cache, &[1, 2, 1, 3, 2]);
        let snapshot = cache.metrics_snapshot();
        assert_eq!(snapshot.lookups, 5);
        assert_eq!(snapshot.hits, 1);
        assert_eq!(snapshot.misses, 4);
        assert_eq!(snapshot.loads, 4);
        assert_eq!(snapshot.evicted_entries, 2);
        assert_eq!(snapshot.cache_len, 2);
        assert_eq!(snapshot.capacity, 2);
    }
}
