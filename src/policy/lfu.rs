//! # LFU (Least Frequently Used) Paging Engine
//!
//! Evicts the page with the fewest requests since it was admitted; ties go to
//! the least recently used page at that frequency.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────┐
//!   │                        LfuCache<K, V>                            │
//!   │                                                                  │
//!   │   buckets: FrequencyBuckets<K, V>                                │
//!   │                                                                  │
//!   │     min_freq = 1                                                 │
//!   │        │                                                         │
//!   │        ▼                                                         │
//!   │     ┌──────┐     ┌──────┐     ┌──────┐                           │
//!   │     │ f=1  │ ──► │ f=2  │ ──► │ f=5  │     ascending order;      │
//!   │     │ C  D │     │  B   │     │  A   │     no empty buckets      │
//!   │     └──────┘     └──────┘     └──────┘                           │
//!   │      MRU LRU                                                     │
//!   │                                                                  │
//!   │   capacity: usize                                                │
//!   └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Lookup Flow
//!
//! ```text
//!   lookup_update(key, loader)
//!        │
//!        ├── capacity 0 ──► loader(&key), drop ──► false
//!        ├── resident ────► freq += 1, MRU of bucket freq ──► true
//!        └── absent ──────► pop LRU of min bucket if full
//!                           insert at freq 1 ────────────────► false
//! ```
//!
//! Frequencies start at 1, never decay, and saturate at `u64::MAX`.
//!
//! Because a newcomer always enters at frequency 1, in-cache LFU is not a
//! stack algorithm: a larger capacity can produce fewer hits on some traces.

use std::fmt;
use std::hash::Hash;

use crate::ds::FrequencyBuckets;
use crate::error::InvariantError;
#[cfg(feature = "metrics")]
use crate::metrics::metrics_impl::LfuMetrics;
#[cfg(feature = "metrics")]
use crate::metrics::snapshot::LfuMetricsSnapshot;
#[cfg(feature = "metrics")]
use crate::metrics::traits::{CoreMetricsRecorder, LfuMetricsRecorder, MetricsSnapshotProvider};
use crate::traits::PagingCache;

/// Frequency-ordered paging cache with O(1) lookup and eviction.
///
/// # Example
///
/// ```
/// use pagesim::policy::lfu::LfuCache;
/// use pagesim::traits::PagingCache;
///
/// let mut cache = LfuCache::new(2);
/// let hits = [1, 1, 2, 2, 2, 3]
///     .into_iter()
///     .filter(|&key| cache.lookup_update(key, |_| ()))
///     .count();
/// assert_eq!(hits, 3);
/// assert_eq!(cache.frequency(&2), Some(3));
/// assert_eq!(cache.frequency(&3), Some(1));
/// assert!(!cache.contains(&1));
/// ```
#[derive(Debug)]
pub struct LfuCache<K, V> {
    buckets: FrequencyBuckets<K, V>,
    capacity: usize,
    #[cfg(feature = "metrics")]
    metrics: LfuMetrics,
}

impl<K, V> LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    pub fn new(capacity: usize) -> Self {
        Self {
            buckets: FrequencyBuckets::with_capacity(capacity),
            capacity,
            #[cfg(feature = "metrics")]
            metrics: LfuMetrics::default(),
        }
    }

    /// Current request count of a resident key.
    pub fn frequency(&self, key: &K) -> Option<u64> {
        self.buckets.frequency(key)
    }

    /// Lowest frequency among resident keys, `None` when empty.
    pub fn min_frequency(&self) -> Option<u64> {
        self.buckets.min_freq()
    }

    /// Key that the next admission would evict, if the cache is full.
    pub fn peek_victim(&self) -> Option<&K> {
        if self.buckets.len() < self.capacity {
            return None;
        }
        self.buckets.peek_min_key()
    }

    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.buckets.check_invariants()?;
        if self.buckets.len() > self.capacity {
            return Err(InvariantError::new(format!(
                "lfu holds {} entries over capacity {}",
                self.buckets.len(),
                self.capacity
            )));
        }
        Ok(())
    }
}

impl<K, V> PagingCache<K, V> for LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn lookup_update<F>(&mut self, key: K, loader: F) -> bool
    where
        F: FnOnce(&K) -> V,
    {
        if self.buckets.touch(&key).is_some() {
            #[cfg(feature = "metrics")]
            {
                self.metrics.record_hit();
                self.metrics.record_frequency_bump();
            }
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

        if self.buckets.len() >= self.capacity && self.buckets.pop_min().is_some() {
            #[cfg(feature = "metrics")]
            self.metrics.record_evicted_entry();
        }

        let value = loader(&key);
        self.buckets.insert(key, value);
        false
    }

    fn contains(&self, key: &K) -> bool {
        self.buckets.contains(key)
    }

    fn peek(&self, key: &K) -> Option<&V> {
        self.buckets.get(key)
    }

    fn len(&self) -> usize {
        self.buckets.len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn resident_keys(&self) -> Vec<K> {
        self.buckets.iter().map(|(_, key, _)| key.clone()).collect()
    }

    fn clear(&mut self) {
        self.buckets.clear();
        #[cfg(feature = "metrics")]
        self.metrics.record_clear();
    }
}

#[cfg(feature = "metrics")]
impl<K, V> LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    pub fn metrics_snapshot(&self) -> LfuMetricsSnapshot {
        LfuMetricsSnapshot {
            lookups: self.metrics.lookups,
            hits: self.metrics.hits,
            misses: self.metrics.misses,
            loads: self.metrics.loads,
            evicted_entries: self.metrics.evicted_entries,
            clears: self.metrics.clears,
            frequency_bumps: self.metrics.frequency_bumps,
            cache_len: self.buckets.len(),
            capacity: self.capacity,
            bucket_count: self.buckets.bucket_count(),
        }
    }
}

#[cfg(feature = "metrics")]
impl<K, V> MetricsSnapshotProvider<LfuMetricsSnapshot> for LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn snapshot(&self) -> LfuMetricsSnapshot {
        self.metrics_snapshot()
    }
}

/// Framed dump, one `[freq] k k ...` line per bucket in ascending frequency,
/// keys MRU first.
impl<K, V> fmt::Display for LfuCache<K, V>
where
    K: Eq + Hash + Clone + fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "########")?;
        let mut current = None;
        for (freq, key, _) in self.buckets.iter() {
            if current != Some(freq) {
                if current.is_some() {
                    writeln!(f)?;
                }
                write!(f, "[{}]", freq)?;
                current = Some(freq);
            }
            write!(f, " {}", key)?;
        }
        if current.is_some() {
            writeln!(f)?;
        }
        writeln!(f, "########")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn replay(cache: &mut LfuCache<u32, u32>, trace: &[u32]) -> usize {
        trace
            .iter()
            .filter(|&&key| cache.lookup_update(key, |k| *k))
            .count()
    }

    #[test]
    fn evicts_lowest_frequency() {
        let mut cache = LfuCache::new(2);
        assert_eq!(replay(&mut cache, &[1, 1, 2, 2, 2, 3]), 3);
        assert_eq!(cache.resident_keys(), vec![3, 2]);
        assert_eq!(cache.frequency(&2), Some(3));
        assert_eq!(cache.min_frequency(), Some(1));
        cache.check_invariants().unwrap();
    }

    #[test]
    fn ties_break_toward_least_recent() {
        let mut cache = LfuCache::new(3);
        replay(&mut cache, &[1, 2, 3]);
        assert_eq!(cache.peek_victim(), Some(&1));
        replay(&mut cache, &[4]);
        assert!(!cache.contains(&1));
        assert_eq!(cache.resident_keys(), vec![4, 3, 2]);
    }

    #[test]
    fn hit_bumps_frequency_and_moves_bucket() {
        let mut cache = LfuCache::new(2);
        replay(&mut cache, &[5, 6, 5, 5]);
        assert_eq!(cache.frequency(&5), Some(3));
        assert_eq!(cache.frequency(&6), Some(1));
        assert_eq!(cache.to_string(), "########\n[1] 6\n[3] 5\n########\n");
        cache.check_invariants().unwrap();
    }

    #[test]
    fn newcomers_churn_at_frequency_one() {
        let mut cache = LfuCache::new(2);
        replay(&mut cache, &[1, 1, 2, 2]);
        // 1 is the older of the two frequency-2 keys, so it goes first.
        assert_eq!(replay(&mut cache, &[3, 4, 3]), 0);
        assert!(!cache.contains(&1));
        assert!(!cache.contains(&4));
        assert_eq!(cache.resident_keys(), vec![3, 2]);
    }

    #[test]
    fn larger_capacity_can_lose_hits() {
        let trace = [3, 0, 0, 1, 3, 1, 2, 0, 2, 0];
        let mut small = LfuCache::new(2);
        let mut large = LfuCache::new(3);
        assert_eq!(replay(&mut small, &trace), 4);
        assert_eq!(replay(&mut large, &trace), 3);
    }

    #[test]
    fn zero_capacity_is_pass_through() {
        let mut cache: LfuCache<u32, u32> = LfuCache::new(0);
        let mut calls = 0;
        for key in [1, 1, 1] {
            assert!(!cache.lookup_update(key, |k| {
                calls += 1;
                *k
            }));
        }
        assert_eq!(calls, 3);
        assert!(cache.is_empty());
        assert_eq!(cache.min_frequency(), None);
    }

    #[test]
    fn clear_resets_buckets() {
        let mut cache = LfuCache::new(2);
        replay(&mut cache, &[1, 1, 2]);
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.to_string(), "########\n########\n");
        assert_eq!(replay(&mut cache, &[1]), 0);
        assert_eq!(cache.frequency(&1), Some(1));
        cache.check_invariants().unwrap();
    }

    #[cfg(feature = "metrics")]
    #[test]
    fn metrics_track_frequency_bumps() {
        let mut cache = LfuCache::new(2);
        replay(&mut cache, &[1, 1, 2, 2, 2, 3]);
        let snapshot = cache.metrics_snapshot();
        assert_eq!(snapshot.hits, 3);
        assert_eq!(snapshot.frequency_bumps, 3);
        assert_eq!(snapshot.misses, 3);
        assert_eq!(snapshot.evicted_entries, 1);
        assert_eq!(snapshot.bucket_count, 2);
    }
}
