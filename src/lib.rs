//! pagesim: page-cache replacement engines and a trace replay simulator.
//!
//! Three engines share one lookup contract ([`traits::PagingCache`]):
//!
//! - [`policy::lru::LruCache`]: evicts the least recently used page.
//! - [`policy::lfu::LfuCache`]: evicts the least frequently used page.
//! - [`policy::ideal::IdealCache`]: Belady's optimal policy over a known
//!   future trace, the upper bound on hits for any trace and capacity.
//!
//! [`sim::replay`] and [`sim::compare`] drive them over a trace.
//!
//! ```
//! use pagesim::prelude::*;
//!
//! let trace = [1, 2, 3, 4, 1, 2, 5, 1, 2, 3, 4, 5];
//! for row in compare(3, &trace, |_| ()) {
//!     println!("{:>5} {}", row.policy, row.report);
//! }
//! ```

pub mod builder;
#[cfg(feature = "concurrency")]
pub mod concurrent;
pub mod ds;
pub mod error;
#[cfg(feature = "metrics")]
pub mod metrics;
pub mod policy;
pub mod prelude;
pub mod sim;
pub mod traits;

pub use crate::ds::{FrequencyBuckets, FutureSchedule, IntrusiveList, KeyedList, SlotArena, SlotId};
pub use crate::policy::ideal::IdealCache;
pub use crate::policy::lfu::LfuCache;
pub use crate::policy::lru::LruCache;
