//! Trace replay and policy comparison.
//!
//! ```text
//!   trace ──► prime(trace) ──► for key in trace: lookup_update(key, loader)
//!                                                       │
//!                                                       ▼
//!                                           SimReport { hits, misses, loads }
//! ```
//!
//! [`replay`] drives any [`PagingCache`]; [`compare`] runs every
//! [`CachePolicy`] over the same trace and capacity.
//!
//! ## Example
//!
//! ```
//! use pagesim::builder::CachePolicy;
//! use pagesim::sim::compare;
//!
//! let trace = [1, 2, 3, 1, 2, 4, 1, 2, 3, 4];
//! let reports = compare(3, &trace, |k| *k);
//! let ideal = reports.iter().find(|r| r.policy == CachePolicy::Ideal).unwrap();
//! assert!(reports.iter().all(|r| r.report.hits <= ideal.report.hits));
//! ```

use std::fmt;
use std::hash::Hash;

use log::{debug, trace};

use crate::builder::{CacheBuilder, CachePolicy};
use crate::traits::PagingCache;

/// Outcome counts of one replay.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SimReport {
    pub hits: u64,
    pub misses: u64,
    /// Loader invocations. Every miss loads, including bypasses and
    /// zero-capacity pass-through, so this equals `misses`.
    pub loads: u64,
}

impl SimReport {
    pub fn accesses(&self) -> u64 {
        self.hits + self.misses
    }

    /// Fraction of accesses that hit, `0.0` for an empty trace.
    pub fn hit_rate(&self) -> f64 {
        let accesses = self.accesses();
        if accesses == 0 {
            0.0
        } else {
            self.hits as f64 / accesses as f64
        }
    }
}

impl fmt::Display for SimReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} hits / {} accesses ({:.2}%)",
            self.hits,
            self.accesses(),
            self.hit_rate() * 100.0
        )
    }
}

/// One row of [`compare`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolicyReport {
    pub policy: CachePolicy,
    pub capacity: usize,
    pub report: SimReport,
}

/// Replays `trace` through `cache`, priming it with the whole trace first.
///
/// The loader is called once per miss, never on a hit.
pub fn replay<C, K, V, L>(cache: &mut C, trace: &[K], mut loader: L) -> SimReport
where
    C: PagingCache<K, V>,
    K: Clone,
    L: FnMut(&K) -> V,
{
    trace!(
        "replaying {} accesses at capacity {}",
        trace.len(),
        cache.capacity()
    );
    cache.prime(trace);

    let mut report = SimReport::default();
    for key in trace {
        let mut loaded = false;
        let hit = cache.lookup_update(key.clone(), |k| {
            loaded = true;
            loader(k)
        });
        if hit {
            report.hits += 1;
        } else {
            report.misses += 1;
        }
        if loaded {
            report.loads += 1;
        }
    }

    debug!(
        "replay finished at capacity {}: {}",
        cache.capacity(),
        report
    );
    report
}

/// Replays `trace` once per policy in [`CachePolicy::ALL`] order.
pub fn compare<K, V, L>(capacity: usize, trace: &[K], mut loader: L) -> Vec<PolicyReport>
where
    K: Eq + Hash + Clone,
    L: FnMut(&K) -> V,
{
    CachePolicy::ALL
        .into_iter()
        .map(|policy| {
            let mut cache = CacheBuilder::new(capacity).build::<K, V>(policy);
            let report = replay(&mut cache, trace, &mut loader);
            debug!("{} at capacity {}: {}", policy, capacity, report);
            PolicyReport {
                policy,
                capacity,
                report,
            }
        })
        .collect()
}
