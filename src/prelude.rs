pub use crate::builder::{Cache, CacheBuilder, CachePolicy};
#[cfg(feature = "concurrency")]
pub use crate::concurrent::ConcurrentCache;
pub use crate::error::{ConfigError, InvariantError};
pub use crate::policy::ideal::IdealCache;
pub use crate::policy::lfu::LfuCache;
pub use crate::policy::lru::LruCache;
pub use crate::sim::{PolicyReport, SimReport, compare, replay};
pub use crate::traits::{FutureAware, PagingCache};
