//! # Paging Cache Traits
//!
//! Shared contract for every replacement engine in the crate, so a replay
//! driver can run LRU, LFU, and the Ideal oracle over the same trace without
//! knowing which one it holds.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────┐
//!   │             PagingCache<K, V>                │
//!   │                                              │
//!   │  lookup_update(&mut, K, loader) → bool       │
//!   │  prime(&mut, &[K])            (default no-op)│
//!   │  contains(&, &K) → bool                      │
//!   │  peek(&, &K) → Option<&V>                    │
//!   │  len / is_empty / capacity                   │
//!   │  resident_keys(&) → Vec<K>                   │
//!   │  clear(&mut)                                 │
//!   └──────────────────────┬───────────────────────┘
//!                          │
//!        ┌─────────────────┼─────────────────┐
//!        ▼                 ▼                 ▼
//!   ┌──────────┐     ┌──────────┐     ┌──────────────┐      ┌────────────────────┐
//!   │ LruCache │     │ LfuCache │     │  IdealCache  │◄─────│  FutureAware<K>    │
//!   └──────────┘     └──────────┘     └──────────────┘      │  set_future_trace  │
//!                                                           │  announce          │
//!                                                           └────────────────────┘
//! ```
//!
//! ## Lookup Contract
//!
//! ```text
//!   lookup_update(key, loader)
//!        │
//!        ├── resident ───────────► reposition per policy ──► true   (loader not called)
//!        │
//!        └── absent ──┬─ capacity 0 / bypass ─► loader(&key), drop value ─► false
//!                     │
//!                     └─ admit ─► evict victim if full ─► loader(&key) stored ─► false
//! ```
//!
//! The loader is a pure `&K -> V` capability owned by the caller. It runs at
//! most once per lookup and never on a hit.
//!
//! ## Thread Safety
//!
//! Engines are not thread-safe. Serialize access externally, e.g. with
//! [`ConcurrentCache`](crate::concurrent::ConcurrentCache).

/// Operations every replacement engine supports.
///
/// # Example
///
/// ```
/// use pagesim::policy::lru::LruCache;
/// use pagesim::traits::PagingCache;
///
/// fn count_hits<C: PagingCache<u32, String>>(cache: &mut C, trace: &[u32]) -> usize {
///     cache.prime(trace);
///     trace
///         .iter()
///         .filter(|&&key| cache.lookup_update(key, |k| format!("page {k}")))
///         .count()
/// }
///
/// let mut cache = LruCache::new(2);
/// assert_eq!(count_hits(&mut cache, &[1, 2, 1, 3, 2]), 1);
/// ```
pub trait PagingCache<K, V> {
    /// Looks up `key`; on a miss, materializes it with `loader` and admits it
    /// according to policy. Returns `true` on a hit.
    fn lookup_update<F>(&mut self, key: K, loader: F) -> bool
    where
        F: FnOnce(&K) -> V;

    /// Hands the engine the full trace before replay starts.
    ///
    /// Only engines that need lookahead use it; the default does nothing.
    fn prime(&mut self, trace: &[K]) {
        let _ = trace;
    }

    /// Checks residency without changing any policy state.
    fn contains(&self, key: &K) -> bool;

    /// Returns the resident value without changing any policy state.
    fn peek(&self, key: &K) -> Option<&V>;

    /// Number of resident keys.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of resident keys.
    fn capacity(&self) -> usize;

    /// Resident keys in policy order.
    ///
    /// LRU and Ideal list most-recent first; LFU lists ascending frequency,
    /// most-recent first within a frequency. Diagnostic only: calling it does
    /// not change later hit/miss outcomes.
    fn resident_keys(&self) -> Vec<K>;

    /// Drops every resident entry.
    fn clear(&mut self);
}

/// Engines whose eviction decision depends on future requests.
///
/// The future must be fed before the lookup for the same position, either
/// all at once or one key at a time.
///
/// # Example
///
/// ```
/// use pagesim::policy::ideal::IdealCache;
/// use pagesim::traits::{FutureAware, PagingCache};
///
/// let mut cache: IdealCache<u32, ()> = IdealCache::new(1);
/// cache.announce(4);
/// cache.announce(4);
/// assert!(!cache.lookup_update(4, |_| ()));
/// assert!(cache.lookup_update(4, |_| ()));
/// ```
pub trait FutureAware<K> {
    /// Replaces the whole future with `trace`, positions numbered from 0.
    fn set_future_trace<I>(&mut self, trace: I)
    where
        I: IntoIterator<Item = K>;

    /// Appends one key to the announced future.
    fn announce(&mut self, key: K);
}
