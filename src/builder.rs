//! Unified cache builder for every replacement engine.
//!
//! Lets a simulator pick the policy at runtime (from an enum or a string)
//! while keeping static dispatch inside each engine.
//!
//! ## Example
//!
//! ```rust
//! use pagesim::builder::{CacheBuilder, CachePolicy};
//! use pagesim::traits::PagingCache;
//!
//! let policy: CachePolicy = "lru".parse().unwrap();
//! let mut cache = CacheBuilder::new(2).build::<u64, String>(policy);
//! assert!(!cache.lookup_update(1, |k| format!("page {k}")));
//! assert!(cache.lookup_update(1, |k| format!("page {k}")));
//! assert_eq!(cache.peek(&1), Some(&"page 1".to_string()));
//! ```

use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use log::debug;

use crate::error::ConfigError;
use crate::policy::ideal::IdealCache;
use crate::policy::lfu::LfuCache;
use crate::policy::lru::LruCache;
use crate::traits::{FutureAware, PagingCache};

/// Available replacement policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CachePolicy {
    /// Least Recently Used eviction.
    Lru,
    /// Least Frequently Used eviction (bucket-based, LRU tie-break).
    Lfu,
    /// Belady's optimal eviction; needs the future trace.
    Ideal,
}

impl CachePolicy {
    /// Every policy, in report order.
    pub const ALL: [CachePolicy; 3] = [CachePolicy::Lru, CachePolicy::Lfu, CachePolicy::Ideal];

    pub fn name(&self) -> &'static str {
        match self {
            CachePolicy::Lru => "lru",
            CachePolicy::Lfu => "lfu",
            CachePolicy::Ideal => "ideal",
        }
    }
}

impl fmt::Display for CachePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Parses a policy name, ignoring case and surrounding whitespace.
/// `belady` and `opt` are accepted as aliases for `ideal`.
impl FromStr for CachePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lru" => Ok(CachePolicy::Lru),
            "lfu" => Ok(CachePolicy::Lfu),
            "ideal" | "belady" | "opt" => Ok(CachePolicy::Ideal),
            _ => Err(ConfigError::new(format!(
                "unknown cache policy `{}` (expected lru, lfu or ideal)",
                s.trim()
            ))),
        }
    }
}

/// Unified cache wrapper that provides a consistent API regardless of policy.
#[derive(Debug)]
pub struct Cache<K, V> {
    inner: CacheInner<K, V>,
}

#[derive(Debug)]
enum CacheInner<K, V> {
    Lru(LruCache<K, V>),
    Lfu(LfuCache<K, V>),
    Ideal(IdealCache<K, V>),
}

impl<K, V> Cache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// The policy this cache was built with.
    pub fn policy(&self) -> CachePolicy {
        match &self.inner {
            CacheInner::Lru(_) => CachePolicy::Lru,
            CacheInner::Lfu(_) => CachePolicy::Lfu,
            CacheInner::Ideal(_) => CachePolicy::Ideal,
        }
    }

    pub fn check_invariants(&self) -> Result<(), crate::error::InvariantError> {
        match &self.inner {
            CacheInner::Lru(lru) => lru.check_invariants(),
            CacheInner::Lfu(lfu) => lfu.check_invariants(),
            CacheInner::Ideal(ideal) => ideal.check_invariants(),
        }
    }
}

impl<K, V> PagingCache<K, V> for Cache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn lookup_update<F>(&mut self, key: K, loader: F) -> bool
    where
        F: FnOnce(&K) -> V,
    {
        match &mut self.inner {
            CacheInner::Lru(lru) => lru.lookup_update(key, loader),
            CacheInner::Lfu(lfu) => lfu.lookup_update(key, loader),
            CacheInner::Ideal(ideal) => ideal.lookup_update(key, loader),
        }
    }

    fn prime(&mut self, trace: &[K]) {
        if let CacheInner::Ideal(ideal) = &mut self.inner {
            ideal.prime(trace);
        }
    }

    fn contains(&self, key: &K) -> bool {
        match &self.inner {
            CacheInner::Lru(lru) => lru.contains(key),
            CacheInner::Lfu(lfu) => lfu.contains(key),
            CacheInner::Ideal(ideal) => ideal.contains(key),
        }
    }

    fn peek(&self, key: &K) -> Option<&V> {
        match &self.inner {
            CacheInner::Lru(lru) => lru.peek(key),
            CacheInner::Lfu(lfu) => lfu.peek(key),
            CacheInner::Ideal(ideal) => ideal.peek(key),
        }
    }

    fn len(&self) -> usize {
        match &self.inner {
            CacheInner::Lru(lru) => lru.len(),
            CacheInner::Lfu(lfu) => lfu.len(),
            CacheInner::Ideal(ideal) => ideal.len(),
        }
    }

    fn capacity(&self) -> usize {
        match &self.inner {
            CacheInner::Lru(lru) => lru.capacity(),
            CacheInner::Lfu(lfu) => lfu.capacity(),
            CacheInner::Ideal(ideal) => ideal.capacity(),
        }
    }

    fn resident_keys(&self) -> Vec<K> {
        match &self.inner {
            CacheInner::Lru(lru) => lru.resident_keys(),
            CacheInner::Lfu(lfu) => lfu.resident_keys(),
            CacheInner::Ideal(ideal) => ideal.resident_keys(),
        }
    }

    fn clear(&mut self) {
        match &mut self.inner {
            CacheInner::Lru(lru) => lru.clear(),
            CacheInner::Lfu(lfu) => lfu.clear(),
            CacheInner::Ideal(ideal) => ideal.clear(),
        }
    }
}

/// Forwards the future to the Ideal engine; LRU and LFU ignore it.
impl<K, V> FutureAware<K> for Cache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn set_future_trace<I>(&mut self, trace: I)
    where
        I: IntoIterator<Item = K>,
    {
        if let CacheInner::Ideal(ideal) = &mut self.inner {
            ideal.set_future_trace(trace);
        }
    }

    fn announce(&mut self, key: K) {
        if let CacheInner::Ideal(ideal) = &mut self.inner {
            ideal.announce(key);
        }
    }
}

impl<K, V> fmt::Display for Cache<K, V>
where
    K: Eq + Hash + Clone + fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner {
            CacheInner::Lru(lru) => fmt::Display::fmt(lru, f),
            CacheInner::Lfu(lfu) => fmt::Display::fmt(lfu, f),
            CacheInner::Ideal(ideal) => fmt::Display::fmt(ideal, f),
        }
    }
}

/// Builder for creating cache instances.
#[derive(Debug, Clone, Copy)]
pub struct CacheBuilder {
    capacity: usize,
}

impl CacheBuilder {
    /// Create a new cache builder with the specified capacity.
    pub fn new(capacity: usize) -> Self {
        Self { capacity }
    }

    /// Build a cache with the specified policy.
    ///
    /// An Ideal cache starts with an empty future; prime it with
    /// [`PagingCache::prime`] or feed it through [`FutureAware`].
    ///
    /// # Example
    ///
    /// ```rust
    /// use pagesim::builder::{CacheBuilder, CachePolicy};
    /// use pagesim::traits::PagingCache;
    ///
    /// let lru = CacheBuilder::new(100).build::<u64, String>(CachePolicy::Lru);
    /// let ideal = CacheBuilder::new(100).build::<u64, String>(CachePolicy::Ideal);
    /// assert_eq!(lru.capacity(), ideal.capacity());
    /// ```
    pub fn build<K, V>(self, policy: CachePolicy) -> Cache<K, V>
    where
        K: Eq + Hash + Clone,
    {
        debug!("building {} cache with capacity {}", policy, self.capacity);
        let inner = match policy {
            CachePolicy::Lru => CacheInner::Lru(LruCache::new(self.capacity)),
            CachePolicy::Lfu => CacheInner::Lfu(LfuCache::new(self.capacity)),
            CachePolicy::Ideal => CacheInner::Ideal(IdealCache::new(self.capacity)),
        };

        Cache { inner }
    }
}
