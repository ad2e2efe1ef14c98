//! Thread-safe wrapper around any engine.
//!
//! ```text
//!   ConcurrentCache<C, K, V> ── Arc<RwLock<C>> ── C: PagingCache<K, V>
//!
//!   write lock: lookup_update, prime, clear, set_future_trace, announce
//!   read lock:  contains, peek_cloned, len, capacity, resident_keys, with_read
//! ```
//!
//! Every lookup reorders the engine, so lookups serialize on the write lock
//! and the loader runs while it is held. Clones share the same engine.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::traits::{FutureAware, PagingCache};

/// Shared handle to one engine behind a `parking_lot::RwLock`.
///
/// `K` and `V` are the engine's key and value types; they are inferred from
/// the engine passed to [`ConcurrentCache::new`].
///
/// # Example
///
/// ```
/// use pagesim::concurrent::ConcurrentCache;
/// use pagesim::policy::lru::LruCache;
///
/// let cache = ConcurrentCache::new(LruCache::<u32, String>::new(8));
/// let handle = cache.clone();
/// std::thread::spawn(move || {
///     handle.lookup_update(1, |k| k.to_string());
/// })
/// .join()
/// .unwrap();
/// assert!(cache.contains(&1));
/// assert_eq!(cache.len(), 1);
/// assert_eq!(cache.peek_cloned(&1), Some("1".to_string()));
/// ```
pub struct ConcurrentCache<C, K, V> {
    inner: Arc<RwLock<C>>,
    _entry: PhantomData<fn() -> (K, V)>,
}

impl<C, K, V> Clone for ConcurrentCache<C, K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            _entry: PhantomData,
        }
    }
}

impl<C, K, V> ConcurrentCache<C, K, V>
where
    C: PagingCache<K, V>,
{
    pub fn new(cache: C) -> Self {
        Self {
            inner: Arc::new(RwLock::new(cache)),
            _entry: PhantomData,
        }
    }

    /// Runs `f` with shared access, e.g. to read a metrics snapshot.
    pub fn with_read<R>(&self, f: impl FnOnce(&C) -> R) -> R {
        f(&self.inner.read())
    }

    /// Runs `f` with exclusive access.
    pub fn with_write<R>(&self, f: impl FnOnce(&mut C) -> R) -> R {
        f(&mut self.inner.write())
    }

    pub fn lookup_update<F>(&self, key: K, loader: F) -> bool
    where
        F: FnOnce(&K) -> V,
    {
        self.inner.write().lookup_update(key, loader)
    }

    pub fn prime(&self, trace: &[K]) {
        self.inner.write().prime(trace);
    }

    pub fn contains(&self, key: &K) -> bool {
        self.inner.read().contains(key)
    }

    /// Clones the resident value out from under the read lock.
    pub fn peek_cloned(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.inner.read().peek(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.inner.read().capacity()
    }

    pub fn resident_keys(&self) -> Vec<K> {
        self.inner.read().resident_keys()
    }

    pub fn clear(&self) {
        self.inner.write().clear();
    }

    pub fn set_future_trace<I>(&self, trace: I)
    where
        C: FutureAware<K>,
        I: IntoIterator<Item = K>,
    {
        self.inner.write().set_future_trace(trace);
    }

    pub fn announce(&self, key: K)
    where
        C: FutureAware<K>,
    {
        self.inner.write().announce(key);
    }
}

impl<C, K, V> fmt::Debug for ConcurrentCache<C, K, V>
where
    C: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConcurrentCache")
            .field("inner", &*self.inner.read())
            .finish()
    }
}
