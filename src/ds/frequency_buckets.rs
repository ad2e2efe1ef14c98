//! Frequency buckets for O(1) LFU tracking.
//!
//! Owns LFU entries (key, value, frequency) and keeps them in per-frequency
//! recency lists. Insert, touch, remove, and eviction are all O(1).
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────────┐
//! │                       FrequencyBuckets<K, V> Layout                         │
//! │                                                                             │
//! │   ┌─────────────────────────────┐   ┌─────────────────────────────────┐     │
//! │   │  index: FxHashMap<K, SlotId>│   │  entries: SlotArena<Entry<K,V>> │     │
//! │   │                             │   │                                 │     │
//! │   │  ┌───────────┬──────────┐   │   │  ┌──────┬───────────────────┐   │     │
//! │   │  │    Key    │  SlotId  │   │   │  │ Slot │ Entry             │   │     │
//! │   │  ├───────────┼──────────┤   │   │  ├──────┼───────────────────┤   │     │
//! │   │  │  page_a   │   id_0   │───┼───┼─►│ id_0 │ freq:2, prev/next │   │     │
//! │   │  │  page_b   │   id_1   │───┼───┼─►│ id_1 │ freq:1, prev/next │   │     │
//! │   │  │  page_c   │   id_2   │───┼───┼─►│ id_2 │ freq:1, prev/next │   │     │
//! │   │  └───────────┴──────────┘   │   │  └──────┴───────────────────┘   │     │
//! │   └─────────────────────────────┘   └─────────────────────────────────┘     │
//! │                                                                             │
//! │   buckets: FxHashMap<u64, Bucket>  (frequency → doubly-linked list)         │
//! │                                                                             │
//! │   min_freq = 1                                                              │
//! │   freq=1: head ──► [id_2] ◄──► [id_1] ◄── tail                              │
//! │                      MRU         LRU (evict first)                          │
//! │   freq=2: head ──► [id_0] ◄── tail                                          │
//! │                                                                             │
//! │   Bucket links: freq=1 ──next──► freq=2, freq=2 ──prev──► freq=1            │
//! └─────────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Operations
//!
//! | Operation   | Time | Notes                                    |
//! |-------------|------|------------------------------------------|
//! | `insert`    | O(1) | New key starts at freq=1, MRU of bucket  |
//! | `touch`     | O(1) | Increment frequency, move to MRU         |
//! | `remove`    | O(1) | Remove from tracking                     |
//! | `pop_min`   | O(1) | Evict LRU entry of the min-freq bucket   |
//! | `iter`      | O(n) | Ascending frequency, MRU-first per bucket|
//!
//! Empty buckets are removed as soon as their last entry leaves, so every
//! bucket present in `buckets` has at least one entry.

use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::ds::slot_arena::{SlotArena, SlotId};
use crate::error::InvariantError;

/// Link pointers come first; they are touched on every list operation.
#[derive(Debug)]
#[repr(C)]
struct Entry<K, V> {
    prev: Option<SlotId>,
    next: Option<SlotId>,
    freq: u64,
    key: K,
    value: V,
}

#[derive(Debug, Default)]
struct Bucket {
    head: Option<SlotId>,
    tail: Option<SlotId>,
    prev: Option<u64>,
    next: Option<u64>,
}

/// O(1) LFU entry store with LRU tie-breaking within a frequency.
///
/// # Example
///
/// ```
/// use pagesim::ds::FrequencyBuckets;
///
/// let mut freq = FrequencyBuckets::new();
/// freq.insert("a", 1);
/// freq.insert("b", 2);
/// freq.touch(&"a");
///
/// assert_eq!(freq.frequency(&"a"), Some(2));
/// assert_eq!(freq.min_freq(), Some(1));
/// assert_eq!(freq.pop_min(), Some(("b", 2, 1)));
/// ```
#[derive(Debug)]
pub struct FrequencyBuckets<K, V> {
    entries: SlotArena<Entry<K, V>>,
    index: FxHashMap<K, SlotId>,
    buckets: FxHashMap<u64, Bucket>,
    min_freq: u64,
}

/// Most resident keys sit at low frequencies.
pub const DEFAULT_BUCKET_PREALLOC: usize = 32;

impl<K, V> FrequencyBuckets<K, V>
where
    K: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self {
            entries: SlotArena::new(),
            index: FxHashMap::default(),
            buckets: FxHashMap::default(),
            min_freq: 0,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: SlotArena::with_capacity(capacity),
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            buckets: FxHashMap::with_capacity_and_hasher(
                DEFAULT_BUCKET_PREALLOC,
                Default::default(),
            ),
            min_freq: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        let id = *self.index.get(key)?;
        self.entries.get(id).map(|entry| &entry.value)
    }

    pub fn frequency(&self, key: &K) -> Option<u64> {
        let id = *self.index.get(key)?;
        self.entries.get(id).map(|entry| entry.freq)
    }

    /// Lowest frequency with at least one entry, `None` when empty.
    pub fn min_freq(&self) -> Option<u64> {
        if self.min_freq == 0 {
            None
        } else {
            Some(self.min_freq)
        }
    }

    /// Number of non-empty buckets.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Inserts `key` at frequency 1 as the MRU entry of bucket 1.
    ///
    /// Returns `false` and leaves the entry untouched if `key` is present.
    pub fn insert(&mut self, key: K, value: V) -> bool {
        if self.index.contains_key(&key) {
            return false;
        }

        let id = self.entries.insert(Entry {
            prev: None,
            next: None,
            freq: 1,
            key: key.clone(),
            value,
        });
        self.index.insert(key, id);

        if !self.buckets.contains_key(&1) {
            let next = self.min_freq();
            self.insert_bucket(1, None, next);
        }

        self.list_push_front(1, id);
        self.min_freq = 1;
        true
    }

    /// Increments frequency for `key` and returns the new frequency.
    ///
    /// The entry becomes MRU of its new bucket. At `u64::MAX` the frequency
    /// saturates and the entry is only repositioned.
    pub fn touch(&mut self, key: &K) -> Option<u64> {
        let id = *self.index.get(key)?;
        let current_freq = self.entries.get(id)?.freq;
        if current_freq == u64::MAX {
            self.list_remove(current_freq, id)?;
            self.list_push_front(current_freq, id);
            return Some(current_freq);
        }
        let next_freq = current_freq + 1;

        let (prev_freq, next_existing) = {
            let bucket = self.buckets.get(&current_freq)?;
            (bucket.prev, bucket.next)
        };

        self.list_remove(current_freq, id)?;
        let bucket_empty = self.bucket_is_empty(current_freq);

        if bucket_empty {
            self.remove_bucket(current_freq, prev_freq, next_existing);
            if self.min_freq == current_freq {
                self.min_freq = next_existing.unwrap_or(0);
            }
        }

        if !self.buckets.contains_key(&next_freq) {
            let prev = if bucket_empty {
                prev_freq
            } else {
                Some(current_freq)
            };
            self.insert_bucket(next_freq, prev, next_existing);
        }

        if let Some(entry) = self.entries.get_mut(id) {
            entry.freq = next_freq;
        }
        self.list_push_front(next_freq, id);
        if self.min_freq == 0 || next_freq < self.min_freq {
            self.min_freq = next_freq;
        }

        Some(next_freq)
    }

    /// Removes `key` and returns its value.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let id = *self.index.get(key)?;
        let freq = self.entries.get(id)?.freq;
        self.unlink(freq, id)?;
        self.index.remove(key);
        self.entries.remove(id).map(|entry| entry.value)
    }

    /// Removes and returns `(key, value, freq)` of the eviction candidate:
    /// the LRU entry of the lowest-frequency bucket.
    pub fn pop_min(&mut self) -> Option<(K, V, u64)> {
        let freq = self.min_freq;
        if freq == 0 {
            return None;
        }

        let id = self.buckets.get(&freq)?.tail?;
        self.unlink(freq, id)?;
        let entry = self.entries.remove(id)?;
        self.index.remove(&entry.key);
        Some((entry.key, entry.value, entry.freq))
    }

    /// Returns the key `pop_min` would evict.
    pub fn peek_min_key(&self) -> Option<&K> {
        let id = self.buckets.get(&self.min_freq)?.tail?;
        self.entries.get(id).map(|entry| &entry.key)
    }

    /// Iterates `(freq, key, value)` in ascending frequency, MRU-first inside
    /// each frequency.
    pub fn iter(&self) -> FrequencyBucketsIter<'_, K, V> {
        let current = self
            .buckets
            .get(&self.min_freq)
            .and_then(|bucket| bucket.head);
        FrequencyBucketsIter {
            owner: self,
            freq: self.min_freq,
            current,
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
        self.buckets.clear();
        self.min_freq = 0;
    }

    /// Checks index/arena agreement, bucket chain links, and that no bucket
    /// is empty.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        if self.entries.len() != self.index.len() {
            return Err(InvariantError::new(format!(
                "entries {} != index {}",
                self.entries.len(),
                self.index.len()
            )));
        }

        if self.is_empty() {
            if !self.buckets.is_empty() || self.min_freq != 0 {
                return Err(InvariantError::new(format!(
                    "empty tracker still has {} buckets, min_freq {}",
                    self.buckets.len(),
                    self.min_freq
                )));
            }
            return Ok(());
        }

        if !self.buckets.contains_key(&self.min_freq) {
            return Err(InvariantError::new(format!(
                "min_freq {} has no bucket",
                self.min_freq
            )));
        }

        let mut seen = 0usize;
        for (&freq, bucket) in &self.buckets {
            if bucket.head.is_none() || bucket.tail.is_none() {
                return Err(InvariantError::new(format!("bucket {} is empty", freq)));
            }
            match bucket.prev {
                Some(prev) => {
                    if prev >= freq || self.buckets.get(&prev).and_then(|b| b.next) != Some(freq)
                    {
                        return Err(InvariantError::new(format!(
                            "bucket {} prev link {} is broken",
                            freq, prev
                        )));
                    }
                },
                None => {
                    if self.min_freq != freq {
                        return Err(InvariantError::new(format!(
                            "bucket {} has no prev but min_freq is {}",
                            freq, self.min_freq
                        )));
                    }
                },
            }
            if let Some(next) = bucket.next
                && (next <= freq || self.buckets.get(&next).and_then(|b| b.prev) != Some(freq))
            {
                return Err(InvariantError::new(format!(
                    "bucket {} next link {} is broken",
                    freq, next
                )));
            }

            let mut current = bucket.head;
            let mut last = None;
            while let Some(id) = current {
                let entry = self.entries.get(id).ok_or_else(|| {
                    InvariantError::new(format!("bucket {}: stale SlotId {:?}", freq, id))
                })?;
                if entry.freq != freq {
                    return Err(InvariantError::new(format!(
                        "entry {:?} has freq {} inside bucket {}",
                        id, entry.freq, freq
                    )));
                }
                if entry.prev != last {
                    return Err(InvariantError::new(format!(
                        "entry {:?} in bucket {} has a broken prev link",
                        id, freq
                    )));
                }
                if self.index.get(&entry.key) != Some(&id) {
                    return Err(InvariantError::new(format!(
                        "entry {:?} is not the indexed locator for its key",
                        id
                    )));
                }
                last = Some(id);
                current = entry.next;
                seen += 1;
                if seen > self.entries.len() {
                    return Err(InvariantError::new("bucket cycle detected"));
                }
            }
            if bucket.tail != last {
                return Err(InvariantError::new(format!(
                    "bucket {} tail does not match its last entry",
                    freq
                )));
            }
        }

        if seen != self.entries.len() {
            return Err(InvariantError::new(format!(
                "buckets hold {} entries, arena holds {}",
                seen,
                self.entries.len()
            )));
        }
        Ok(())
    }

    /// Unlinks `id` from bucket `freq`, dropping the bucket if it empties.
    fn unlink(&mut self, freq: u64, id: SlotId) -> Option<()> {
        self.list_remove(freq, id)?;
        if self.bucket_is_empty(freq) {
            let (prev, next) = {
                let bucket = self.buckets.get(&freq)?;
                (bucket.prev, bucket.next)
            };
            self.remove_bucket(freq, prev, next);
            if self.min_freq == freq {
                self.min_freq = next.unwrap_or(0);
            }
        }
        Some(())
    }

    fn bucket_is_empty(&self, freq: u64) -> bool {
        self.buckets
            .get(&freq)
            .map(|bucket| bucket.head.is_none())
            .unwrap_or(true)
    }

    fn insert_bucket(&mut self, freq: u64, prev: Option<u64>, next: Option<u64>) {
        self.buckets.insert(
            freq,
            Bucket {
                head: None,
                tail: None,
                prev,
                next,
            },
        );

        if let Some(prev) = prev
            && let Some(prev_bucket) = self.buckets.get_mut(&prev)
        {
            prev_bucket.next = Some(freq);
        }
        if let Some(next) = next
            && let Some(next_bucket) = self.buckets.get_mut(&next)
        {
            next_bucket.prev = Some(freq);
        }
    }

    fn remove_bucket(&mut self, freq: u64, prev: Option<u64>, next: Option<u64>) {
        if let Some(prev) = prev
            && let Some(prev_bucket) = self.buckets.get_mut(&prev)
        {
            prev_bucket.next = next;
        }
        if let Some(next) = next
            && let Some(next_bucket) = self.buckets.get_mut(&next)
        {
            next_bucket.prev = prev;
        }
        self.buckets.remove(&freq);
    }

    fn list_push_front(&mut self, freq: u64, id: SlotId) {
        let Some(bucket) = self.buckets.get_mut(&freq) else {
            return;
        };

        let old_head = bucket.head;
        if let Some(entry) = self.entries.get_mut(id) {
            entry.prev = None;
            entry.next = old_head;
        }
        if let Some(old_head) = old_head {
            if let Some(entry) = self.entries.get_mut(old_head) {
                entry.prev = Some(id);
            }
        } else {
            bucket.tail = Some(id);
        }
        bucket.head = Some(id);
    }

    fn list_remove(&mut self, freq: u64, id: SlotId) -> Option<()> {
        let (prev, next) = {
            let entry = self.entries.get(id)?;
            (entry.prev, entry.next)
        };

        let bucket = self.buckets.get_mut(&freq)?;
        if let Some(prev) = prev {
            if let Some(entry) = self.entries.get_mut(prev) {
                entry.next = next;
            }
        } else {
            bucket.head = next;
        }
        if let Some(next) = next {
            if let Some(entry) = self.entries.get_mut(next) {
                entry.prev = prev;
            }
        } else {
            bucket.tail = prev;
        }

        if let Some(entry) = self.entries.get_mut(id) {
            entry.prev = None;
            entry.next = None;
        }

        Some(())
    }
}

impl<K, V> Default for FrequencyBuckets<K, V>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over `(freq, &key, &value)`; see [`FrequencyBuckets::iter`].
pub struct FrequencyBucketsIter<'a, K, V> {
    owner: &'a FrequencyBuckets<K, V>,
    freq: u64,
    current: Option<SlotId>,
}

impl<'a, K, V> Iterator for FrequencyBucketsIter<'a, K, V> {
    type Item = (u64, &'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(id) = self.current {
                let entry = self.owner.entries.get(id)?;
                self.current = entry.next;
                return Some((self.freq, &entry.key, &entry.value));
            }
            let next_freq = self.owner.buckets.get(&self.freq)?.next?;
            self.freq = next_freq;
            self.current = self.owner.buckets.get(&next_freq)?.head;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(freq: &FrequencyBuckets<&'static str, u32>) -> Vec<(u64, &'static str)> {
        freq.iter().map(|(f, k, _)| (f, *k)).collect()
    }

    #[test]
    fn insert_starts_at_frequency_one() {
        let mut freq = FrequencyBuckets::with_capacity(4);
        assert!(freq.insert("a", 1));
        assert!(!freq.insert("a", 99));
        assert_eq!(freq.frequency(&"a"), Some(1));
        assert_eq!(freq.get(&"a"), Some(&1));
        assert_eq!(freq.min_freq(), Some(1));
        freq.check_invariants().unwrap();
    }

    #[test]
    fn touch_moves_between_buckets_and_drops_empty_ones() {
        let mut freq = FrequencyBuckets::new();
        freq.insert("a", 1);
        freq.insert("b", 2);

        assert_eq!(freq.touch(&"a"), Some(2));
        assert_eq!(freq.bucket_count(), 2);
        assert_eq!(freq.touch(&"b"), Some(2));
        // Bucket 1 emptied and is gone.
        assert_eq!(freq.bucket_count(), 1);
        assert_eq!(freq.min_freq(), Some(2));
        assert_eq!(freq.touch(&"missing"), None);
        freq.check_invariants().unwrap();
    }

    #[test]
    fn touch_skips_over_gap_in_bucket_chain() {
        let mut freq = FrequencyBuckets::new();
        freq.insert("hot", 0);
        for _ in 0..3 {
            freq.touch(&"hot");
        }
        freq.insert("cold", 0);
        freq.touch(&"cold");
        // Chain is now 2 -> 4.
        assert_eq!(order(&freq), vec![(2, "cold"), (4, "hot")]);
        freq.touch(&"cold");
        assert_eq!(order(&freq), vec![(3, "cold"), (4, "hot")]);
        freq.check_invariants().unwrap();
    }

    #[test]
    fn pop_min_takes_lru_of_lowest_bucket() {
        let mut freq = FrequencyBuckets::new();
        freq.insert("a", 1);
        freq.insert("b", 2);
        freq.insert("c", 3);
        freq.touch(&"c");

        assert_eq!(freq.peek_min_key(), Some(&"a"));
        assert_eq!(freq.pop_min(), Some(("a", 1, 1)));
        assert_eq!(freq.pop_min(), Some(("b", 2, 1)));
        assert_eq!(freq.min_freq(), Some(2));
        assert_eq!(freq.pop_min(), Some(("c", 3, 2)));
        assert_eq!(freq.pop_min(), None);
        assert_eq!(freq.min_freq(), None);
        freq.check_invariants().unwrap();
    }

    #[test]
    fn iter_is_frequency_then_recency() {
        let mut freq = FrequencyBuckets::new();
        freq.insert("a", 1);
        freq.insert("b", 2);
        freq.insert("c", 3);
        freq.touch(&"a");
        freq.touch(&"b");

        assert_eq!(order(&freq), vec![(1, "c"), (2, "b"), (2, "a")]);
    }

    #[test]
    fn touch_at_max_frequency_only_repositions() {
        let mut freq = FrequencyBuckets::new();
        freq.insert("a", 1);
        freq.insert("b", 2);

        // Rebase the single bucket to the ceiling.
        let bucket = freq.buckets.remove(&1).unwrap();
        freq.buckets.insert(u64::MAX, bucket);
        for key in ["a", "b"] {
            let id = freq.index[&key];
            freq.entries.get_mut(id).unwrap().freq = u64::MAX;
        }
        freq.min_freq = u64::MAX;
        freq.check_invariants().unwrap();

        freq.insert("c", 3);
        assert_eq!(order(&freq), vec![(1, "c"), (u64::MAX, "b"), (u64::MAX, "a")]);

        assert_eq!(freq.touch(&"a"), Some(u64::MAX));
        assert_eq!(order(&freq), vec![(1, "c"), (u64::MAX, "a"), (u64::MAX, "b")]);
        assert_eq!(freq.bucket_count(), 2);
        assert_eq!(freq.min_freq(), Some(1));
        freq.check_invariants().unwrap();

        assert_eq!(freq.pop_min(), Some(("c", 3, 1)));
        assert_eq!(freq.pop_min(), Some(("b", 2, u64::MAX)));
        freq.check_invariants().unwrap();
    }

    #[test]
    fn remove_updates_min_freq() {
        let mut freq = FrequencyBuckets::new();
        freq.insert("a", 1);
        freq.insert("b", 2);
        freq.touch(&"b");

        assert_eq!(freq.remove(&"a"), Some(1));
        assert_eq!(freq.min_freq(), Some(2));
        assert_eq!(freq.remove(&"a"), None);
        freq.check_invariants().unwrap();

        freq.clear();
        assert!(freq.is_empty());
        assert_eq!(freq.min_freq(), None);
        freq.check_invariants().unwrap();
    }
}
