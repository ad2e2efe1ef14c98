//! Replacement engines.
//!
//! | Engine                      | Evicts                              | Per-lookup cost      |
//! |-----------------------------|-------------------------------------|----------------------|
//! | [`lru::LruCache`]           | least recently used                 | O(1)                 |
//! | [`lfu::LfuCache`]           | lowest frequency, LRU within ties   | O(1)                 |
//! | [`ideal::IdealCache`]       | furthest next use (needs the trace) | O(capacity) on evict |

pub mod ideal;
pub mod lfu;
pub mod lru;
