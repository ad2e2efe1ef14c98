//! Recency-ordered list with a key index, owned as one structure.
//!
//! `KeyedList` pairs an [`IntrusiveList`] of `(key, value)` entries with an
//! `FxHashMap<K, SlotId>` locator index. Both views are private fields, so the
//! only way to change either is through methods that update them together:
//! every key in the list has exactly one index entry and vice versa.
//!
//! ```text
//!   index: FxHashMap<K, SlotId>         list: IntrusiveList<Entry<K, V>>
//!   ┌──────┬────────┐
//!   │ 7    │ id_2   │──────┐           head (MRU)               tail (LRU)
//!   │ 3    │ id_0   │────┐ └──────────► [id_2: 7] ◄──► [id_0: 3] ◄──► [id_1: 9]
//!   │ 9    │ id_1   │──┐ └─────────────────────────────────┘              ▲
//!   └──────┴────────┘  └────────────────────────────────────────────────────┘
//! ```
//!
//! Used by the LRU and Ideal engines.

use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::ds::intrusive_list::IntrusiveList;
use crate::ds::slot_arena::SlotId;
use crate::error::InvariantError;

#[derive(Debug)]
struct Entry<K, V> {
    key: K,
    value: V,
}

/// Key-indexed recency list. Front is most recently used.
#[derive(Debug)]
pub struct KeyedList<K, V> {
    list: IntrusiveList<Entry<K, V>>,
    index: FxHashMap<K, SlotId>,
}

impl<K, V> KeyedList<K, V>
where
    K: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self {
            list: IntrusiveList::new(),
            index: FxHashMap::default(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            list: IntrusiveList::with_capacity(capacity),
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Returns the value for `key` without touching recency.
    pub fn get(&self, key: &K) -> Option<&V> {
        let id = *self.index.get(key)?;
        self.list.get(id).map(|entry| &entry.value)
    }

    /// Moves `key` to the MRU position; returns `false` if absent.
    pub fn touch(&mut self, key: &K) -> bool {
        match self.index.get(key) {
            Some(&id) => self.list.move_to_front(id),
            None => false,
        }
    }

    /// Inserts `key` at the MRU position.
    ///
    /// If `key` is already present its value is replaced, it moves to the
    /// front, and the old value is returned.
    pub fn insert_front(&mut self, key: K, value: V) -> Option<V> {
        if let Some(&id) = self.index.get(&key) {
            self.list.move_to_front(id);
            return self
                .list
                .get_mut(id)
                .map(|entry| std::mem::replace(&mut entry.value, value));
        }
        let id = self.list.push_front(Entry {
            key: key.clone(),
            value,
        });
        self.index.insert(key, id);
        None
    }

    /// Removes and returns the LRU entry.
    pub fn pop_back(&mut self) -> Option<(K, V)> {
        let entry = self.list.pop_back()?;
        self.index.remove(&entry.key);
        Some((entry.key, entry.value))
    }

    /// Returns the LRU key without removing it.
    pub fn back_key(&self) -> Option<&K> {
        self.list.back().map(|entry| &entry.key)
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        let id = self.index.remove(key)?;
        self.list.remove(id).map(|entry| entry.value)
    }

    /// Iterates `(key, value)` from MRU to LRU.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.list.iter().map(|entry| (&entry.key, &entry.value))
    }

    /// Iterates keys from MRU to LRU.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.list.iter().map(|entry| &entry.key)
    }

    pub fn clear(&mut self) {
        self.list.clear();
        self.index.clear();
    }

    /// Verifies list links and that the index and list agree entry for entry.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.list.check_links()?;
        if self.index.len() != self.list.len() {
            return Err(InvariantError::new(format!(
                "index size {} != list length {}",
                self.index.len(),
                self.list.len()
            )));
        }
        for (id, entry) in self.list.iter_entries() {
            if self.index.get(&entry.key) != Some(&id) {
                return Err(InvariantError::new(format!(
                    "list node {:?} is not the indexed locator for its key",
                    id
                )));
            }
        }
        Ok(())
    }
}

impl<K, V> Default for KeyedList<K, V>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(list: &KeyedList<u32, &'static str>) -> Vec<u32> {
        list.keys().copied().collect()
    }

    #[test]
    fn insert_touch_pop_keep_index_in_sync() {
        let mut list = KeyedList::with_capacity(4);
        assert_eq!(list.insert_front(1, "one"), None);
        assert_eq!(list.insert_front(2, "two"), None);
        assert_eq!(list.insert_front(3, "three"), None);
        assert_eq!(keys(&list), vec![3, 2, 1]);

        assert!(list.touch(&1));
        assert!(!list.touch(&99));
        assert_eq!(keys(&list), vec![1, 3, 2]);
        assert_eq!(list.back_key(), Some(&2));

        assert_eq!(list.pop_back(), Some((2, "two")));
        assert!(!list.contains(&2));
        assert_eq!(list.len(), 2);
        list.check_invariants().unwrap();
    }

    #[test]
    fn insert_existing_replaces_and_promotes() {
        let mut list = KeyedList::new();
        list.insert_front(1, "a");
        list.insert_front(2, "b");
        assert_eq!(list.insert_front(1, "A"), Some("a"));
        assert_eq!(keys(&list), vec![1, 2]);
        assert_eq!(list.get(&1), Some(&"A"));
        assert_eq!(list.len(), 2);
        list.check_invariants().unwrap();
    }

    #[test]
    fn remove_and_clear() {
        let mut list = KeyedList::new();
        list.insert_front(5, "five");
        list.insert_front(6, "six");
        assert_eq!(list.remove(&5), Some("five"));
        assert_eq!(list.remove(&5), None);
        assert_eq!(list.iter().collect::<Vec<_>>(), vec![(&6, &"six")]);

        list.clear();
        assert!(list.is_empty());
        assert_eq!(list.pop_back(), None);
        list.check_invariants().unwrap();
    }
}
