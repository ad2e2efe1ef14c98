//! Per-key queues of upcoming trace positions.
//!
//! `FutureSchedule` is the lookahead the Ideal (Belady) engine needs: for each
//! key, the ascending positions at which the trace will request it. Replaying
//! the trace pops the head of the requested key's queue, so the head of every
//! queue is always that key's next unconsumed occurrence. Exhausted queues are
//! dropped; a key with no queue never recurs.
//!
//! ```text
//!   trace:   pos 0  1  2  3  4
//!            key 1  2  1  3  1
//!
//!   queues:  1 → [0, 2, 4]
//!            2 → [1]
//!            3 → [3]
//!
//!   after consume(1) at pos 0:  1 → [2, 4]   cursor = 1
//! ```

use std::collections::VecDeque;
use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::error::InvariantError;

#[derive(Debug)]
pub struct FutureSchedule<K> {
    queues: FxHashMap<K, VecDeque<usize>>,
    announced: usize,
    cursor: usize,
}

impl<K> FutureSchedule<K>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self {
            queues: FxHashMap::default(),
            announced: 0,
            cursor: 0,
        }
    }

    /// Builds a schedule for `trace`, positions numbered from 0.
    pub fn from_trace<I>(trace: I) -> Self
    where
        I: IntoIterator<Item = K>,
    {
        let mut schedule = Self::new();
        schedule.extend(trace);
        schedule
    }

    /// Appends `key` as the next trace position and returns that position.
    pub fn announce(&mut self, key: K) -> usize {
        let position = self.announced;
        self.queues.entry(key).or_default().push_back(position);
        self.announced += 1;
        position
    }

    /// Consumes the current occurrence of `key` and advances the cursor.
    ///
    /// Returns the consumed position, or `None` if `key` had no pending
    /// occurrence (it was never announced, or already exhausted).
    pub fn consume(&mut self, key: &K) -> Option<usize> {
        self.cursor += 1;
        let queue = self.queues.get_mut(key)?;
        let position = queue.pop_front();
        if queue.is_empty() {
            self.queues.remove(key);
        }
        position
    }

    /// Next pending position of `key`, `None` if it never recurs.
    pub fn next_use(&self, key: &K) -> Option<usize> {
        self.queues.get(key).and_then(|queue| queue.front().copied())
    }

    pub fn recurs(&self, key: &K) -> bool {
        self.queues.contains_key(key)
    }

    /// Number of lookups consumed so far.
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Number of positions announced so far.
    pub fn announced(&self) -> usize {
        self.announced
    }

    /// Number of distinct keys that still recur.
    pub fn pending_keys(&self) -> usize {
        self.queues.len()
    }

    pub fn clear(&mut self) {
        self.queues.clear();
        self.announced = 0;
        self.cursor = 0;
    }

    /// Checks that every queue is non-empty, strictly ascending, inside the
    /// announced range, and not behind the replay cursor.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        for queue in self.queues.values() {
            let Some(&head) = queue.front() else {
                return Err(InvariantError::new("schedule kept an exhausted queue"));
            };
            if head < self.cursor {
                return Err(InvariantError::new(format!(
                    "schedule head {} is behind cursor {}",
                    head, self.cursor
                )));
            }
            let mut last = None;
            for &position in queue {
                if position >= self.announced || last.is_some_and(|l| l >= position) {
                    return Err(InvariantError::new(format!(
                        "schedule position {} out of order (announced {})",
                        position, self.announced
                    )));
                }
                last = Some(position);
            }
        }
        Ok(())
    }
}

impl<K> Extend<K> for FutureSchedule<K>
where
    K: Eq + Hash,
{
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.announce(key);
        }
    }
}

impl<K> Default for FutureSchedule<K>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}
