//! # Ideal (Belady / OPT) Paging Engine
//!
//! Offline-optimal replacement: with the whole request trace known up front,
//! evict the resident page whose next request lies furthest in the future.
//! No online policy can score fewer misses on the same trace and capacity,
//! which makes this engine the yardstick the others are measured against.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────┐
//!   │                       IdealCache<K, V>                           │
//!   │                                                                  │
//!   │   entries:  KeyedList<K, V>       (MRU ... LRU, scan order)      │
//!   │   schedule: FutureSchedule<K>     key → [next, next, ...]        │
//!   │   capacity: usize                                                │
//!   └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Lookup Flow
//!
//! ```text
//!   lookup_update(key, loader)
//!        │
//!        ├── schedule.consume(key)          (this request is "now")
//!        │
//!        ├── capacity 0 ───────────► loader(&key), drop ──► false
//!        ├── resident ─────────────► move_to_front ───────► true
//!        ├── key never recurs ─────► loader(&key), drop ──► false   (bypass)
//!        └── otherwise ────────────► evict furthest next use if full
//!                                    push_front(loader(&key)) ─────► false
//! ```
//!
//! ## Victim Selection
//!
//! Residents are scanned from MRU to LRU. The first one that never recurs is
//! taken immediately; otherwise the one with the strictly largest next-use
//! position wins, so earlier-scanned keys win ties.
//!
//! Capacity 1, trace `[1, 2, 1, 2, 1]`:
//!
//! ```text
//!   pos key  outcome          resident
//!   0   1    miss             [1]
//!   1   2    miss, evict 1    [2]      1 next at 2, 2 next at 3
//!   2   1    miss, evict 2    [1]
//!   3   2    miss, bypass     [1]      2 never recurs
//!   4   1    hit              [1]
//! ```
//!
//! Keys that were never announced are treated as never recurring.
//!
//! ## Performance
//!
//! | Operation            | Time        |
//! |----------------------|-------------|
//! | hit / bypass         | O(1)        |
//! | miss with eviction   | O(capacity) |
//! | `set_future_trace`   | O(n)        |

use std::fmt;
use std::hash::Hash;

use log::{debug, trace};

use crate::ds::{FutureSchedule, KeyedList};
use crate::error::InvariantError;
#[cfg(feature = "metrics")]
use crate::metrics::metrics_impl::IdealMetrics;
#[cfg(feature = "metrics")]
use crate::metrics::snapshot::IdealMetricsSnapshot;
#[cfg(feature = "metrics")]
use crate::metrics::traits::{CoreMetricsRecorder, IdealMetricsRecorder, MetricsSnapshotProvider};
use crate::traits::{FutureAware, PagingCache};

/// Belady's optimal replacement over a known future.
///
/// # Example
///
/// ```
/// use pagesim::policy::ideal::IdealCache;
/// use pagesim::traits::PagingCache;
///
/// let trace = [1, 2, 1, 2, 1];
/// let mut cache = IdealCache::with_future(1, trace);
/// let hits = trace
///     .into_iter()
///     .filter(|&key| cache.lookup_update(key, |_| ()))
///     .count();
/// assert_eq!(hits, 1);
/// assert_eq!(cache.resident_keys(), vec![1]);
/// ```
#[derive(Debug)]
pub struct IdealCache<K, V> {
    entries: KeyedList<K, V>,
    schedule: FutureSchedule<K>,
    capacity: usize,
    #[cfg(feature = "metrics")]
    metrics: IdealMetrics,
}

struct Victim<K> {
    key: K,
    next_use: Option<usize>,
    scanned: usize,
}

impl<K, V> IdealCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates an engine with an empty future; feed it with
    /// [`FutureAware::set_future_trace`] or [`FutureAware::announce`].
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: KeyedList::with_capacity(capacity),
            schedule: FutureSchedule::new(),
            capacity,
            #[cfg(feature = "metrics")]
            metrics: IdealMetrics::default(),
        }
    }

    /// Creates an engine and installs `trace` as its future in one step.
    pub fn with_future<I>(capacity: usize, trace: I) -> Self
    where
        I: IntoIterator<Item = K>,
    {
        let mut cache = Self::new(capacity);
        cache.set_future_trace(trace);
        cache
    }

    /// Next pending trace position of `key`, `None` if it never recurs.
    pub fn next_use(&self, key: &K) -> Option<usize> {
        self.schedule.next_use(key)
    }

    /// Number of lookups replayed since the future was installed.
    pub fn position(&self) -> usize {
        self.schedule.position()
    }

    /// Also checks the schedule, which only holds while lookups follow the
    /// announced trace.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.entries.check_invariants()?;
        self.schedule.check_invariants()?;
        if self.entries.len() > self.capacity {
            return Err(InvariantError::new(format!(
                "ideal holds {} entries over capacity {}",
                self.entries.len(),
                self.capacity
            )));
        }
        Ok(())
    }

    fn choose_victim(&self) -> Option<Victim<K>> {
        let mut best: Option<(&K, usize)> = None;
        let mut scanned = 0;
        for key in self.entries.keys() {
            scanned += 1;
            match self.schedule.next_use(key) {
                None => {
                    return Some(Victim {
                        key: key.clone(),
                        next_use: None,
                        scanned,
                    });
                }
                Some(next) => {
                    if best.is_none_or(|(_, furthest)| next > furthest) {
                        best = Some((key, next));
                    }
                }
            }
        }
        best.map(|(key, next)| Victim {
            key: key.clone(),
            next_use: Some(next),
            scanned,
        })
    }

    fn evict_one(&mut self) {
        let Some(victim) = self.choose_victim() else {
            return;
        };
        match victim.next_use {
            Some(next) => trace!(
                "ideal evicts resident next used at {} after scanning {}",
                next, victim.scanned
            ),
            None => trace!(
                "ideal evicts never-recurring resident after scanning {}",
                victim.scanned
            ),
        }

        #[cfg(feature = "metrics")]
        {
            for _ in 0..victim.scanned {
                self.metrics.record_victim_scan_step();
            }
            if victim.next_use.is_none() {
                self.metrics.record_never_recurs_victim();
            }
        }

        if self.entries.remove(&victim.key).is_some() {
            #[cfg(feature = "metrics")]
            self.metrics.record_evicted_entry();
        }
    }
}

impl<K, V> PagingCache<K, V> for IdealCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn lookup_update<F>(&mut self, key: K, loader: F) -> bool
    where
        F: FnOnce(&K) -> V,
    {
        self.schedule.consume(&key);

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

        if !self.schedule.recurs(&key) {
            trace!(
                "ideal bypass at position {}: key never recurs",
                self.schedule.position().saturating_sub(1)
            );
            #[cfg(feature = "metrics")]
            self.metrics.record_bypass();
            let _ = loader(&key);
            return false;
        }

        if self.entries.len() >= self.capacity {
            self.evict_one();
        }

        let value = loader(&key);
        self.entries.insert_front(key, value);
        false
    }

    fn prime(&mut self, trace: &[K]) {
        self.set_future_trace(trace.iter().cloned());
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

impl<K, V> FutureAware<K> for IdealCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn set_future_trace<I>(&mut self, trace: I)
    where
        I: IntoIterator<Item = K>,
    {
        self.schedule = FutureSchedule::from_trace(trace);
        debug!(
            "ideal future installed: {} positions over {} keys",
            self.schedule.announced(),
            self.schedule.pending_keys()
        );
    }

    fn announce(&mut self, key: K) {
        self.schedule.announce(key);
    }
}

#[cfg(feature = "metrics")]
impl<K, V> IdealCache<K, V>
where
    K: Eq + Hash + Clone,
{
    pub fn metrics_snapshot(&self) -> IdealMetricsSnapshot {
        IdealMetricsSnapshot {
            lookups: self.metrics.lookups,
            hits: self.metrics.hits,
            misses: self.metrics.misses,
            loads: self.metrics.loads,
            evicted_entries: self.metrics.evicted_entries,
            clears: self.metrics.clears,
            bypasses: self.metrics.bypasses,
            victim_scan_steps: self.metrics.victim_scan_steps,
            never_recurs_victims: self.metrics.never_recurs_victims,
            cache_len: self.entries.len(),
            capacity: self.capacity,
            announced: self.schedule.announced(),
            position: self.schedule.position(),
        }
    }
}

#[cfg(feature = "metrics")]
impl<K, V> MetricsSnapshotProvider<IdealMetricsSnapshot> for IdealCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn snapshot(&self) -> IdealMetricsSnapshot {
        self.metrics_snapshot()
    }
}

impl<K, V> fmt::Display for IdealCache<K, V>
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

    fn replay(cache: &mut IdealCache<u32, u32>, trace: &[u32]) -> usize {
        trace
            .iter()
            .filter(|&&key| cache.lookup_update(key, |k| *k))
            .count()
    }

    #[test]
    fn alternating_keys_keep_the_one_that_recurs() {
        let trace = [1, 2, 1, 2, 1];
        let mut cache = IdealCache::with_future(1, trace);
        assert_eq!(replay(&mut cache, &trace), 1);
        assert_eq!(cache.resident_keys(), vec![1]);
        assert_eq!(cache.position(), 5);
        cache.check_invariants().unwrap();
    }

    #[test]
    fn evicts_furthest_next_use() {
        let trace = [1, 2, 3, 2, 1, 3];
        let mut cache = IdealCache::with_future(2, trace);
        replay(&mut cache, &trace[..2]);
        assert_eq!(cache.next_use(&1), Some(4));
        assert_eq!(cache.next_use(&2), Some(3));
        replay(&mut cache, &trace[2..3]);
        assert!(!cache.contains(&1));
        assert_eq!(cache.resident_keys(), vec![3, 2]);
        assert_eq!(replay(&mut cache, &trace[3..]), 2);
    }

    #[test]
    fn never_recurring_resident_is_evicted_first() {
        let trace = [1, 2, 2, 3, 3, 1];
        let mut cache = IdealCache::with_future(2, trace);
        assert_eq!(replay(&mut cache, &trace), 3);
        cache.check_invariants().unwrap();
    }

    #[test]
    fn first_never_recurring_in_mru_order_wins() {
        let trace = [1, 2, 1, 2, 3, 3];
        let mut cache = IdealCache::with_future(2, trace);
        replay(&mut cache, &trace[..4]);
        assert_eq!(cache.resident_keys(), vec![2, 1]);
        replay(&mut cache, &trace[4..5]);
        assert_eq!(cache.resident_keys(), vec![3, 1]);
    }

    #[test]
    fn single_use_key_is_bypassed_but_loaded() {
        let trace = [1, 9, 1];
        let mut cache: IdealCache<u32, &str> = IdealCache::with_future(2, trace);
        let mut loads = 0;
        for key in trace {
            cache.lookup_update(key, |_| {
                loads += 1;
                "page"
            });
            if key == 9 {
                assert!(!cache.contains(&9));
            }
        }
        assert_eq!(loads, 2);
        assert_eq!(cache.resident_keys(), vec![1]);
    }

    #[test]
    fn unannounced_key_never_recurs() {
        let mut cache: IdealCache<u32, u32> = IdealCache::new(2);
        assert!(!cache.lookup_update(5, |k| *k));
        assert!(!cache.contains(&5));
        assert_eq!(cache.position(), 1);
    }

    #[test]
    fn announce_matches_full_trace() {
        let trace = [4, 1, 4, 2, 1, 4, 3, 2, 4];
        let mut upfront = IdealCache::with_future(2, trace);
        let mut incremental: IdealCache<u32, u32> = IdealCache::new(2);
        for key in trace {
            incremental.announce(key);
        }
        assert_eq!(replay(&mut upfront, &trace), replay(&mut incremental, &trace));
        assert_eq!(upfront.resident_keys(), incremental.resident_keys());
    }

    #[test]
    fn prime_installs_the_trace() {
        let trace = [7, 8, 7];
        let mut cache: IdealCache<u32, u32> = IdealCache::new(1);
        cache.prime(&trace);
        assert_eq!(cache.next_use(&8), Some(1));
        assert_eq!(replay(&mut cache, &trace), 1);
    }

    #[test]
    fn zero_capacity_consumes_schedule() {
        let trace = [3, 3];
        let mut cache: IdealCache<u32, u32> = IdealCache::with_future(0, trace);
        let mut loads = 0;
        for key in trace {
            assert!(!cache.lookup_update(key, |k| {
                loads += 1;
                *k
            }));
        }
        assert_eq!(loads, 2);
        assert_eq!(cache.next_use(&3), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn dump_is_idempotent() {
        let trace = [1, 2, 1, 2];
        let mut cache = IdealCache::with_future(2, trace);
        replay(&mut cache, &trace[..2]);
        let first = cache.to_string();
        assert_eq!(first, "########\n[0][key: 2]\n[1][key: 1]\n########\n");
        assert_eq!(cache.to_string(), first);
        assert_eq!(replay(&mut cache, &trace[2..]), 2);
    }

    #[cfg(feature = "metrics")]
    #[test]
    fn metrics_record_bypass_and_scan() {
        let trace = [1, 2, 2, 3, 3, 1, 4];
        let mut cache = IdealCache::with_future(2, trace);
        replay(&mut cache, &trace);
        let snapshot = cache.metrics_snapshot();
        assert_eq!(snapshot.hits, 3);
        assert_eq!(snapshot.misses, 4);
        assert_eq!(snapshot.loads, 4);
        assert_eq!(snapshot.bypasses, 1);
        assert_eq!(snapshot.evicted_entries, 1);
        assert_eq!(snapshot.never_recurs_victims, 1);
        assert_eq!(snapshot.victim_scan_steps, 1);
        assert_eq!(snapshot.position, 7);
        assert_eq!(snapshot.announced, 7);
    }

    #[cfg(feature = "metrics")]
    #[test]
    fn announced_gauge_agrees_across_feeding_paths() {
        let trace = [1, 2, 1, 2];
        let upfront: IdealCache<u32, u32> = IdealCache::with_future(2, trace);
        let mut primed: IdealCache<u32, u32> = IdealCache::new(2);
        primed.prime(&trace);
        let mut incremental: IdealCache<u32, u32> = IdealCache::new(2);
        for key in trace {
            incremental.announce(key);
        }
        assert_eq!(upfront.metrics_snapshot().announced, 4);
        assert_eq!(primed.metrics_snapshot().announced, 4);
        assert_eq!(incremental.metrics_snapshot().announced, 4);
    }
}
