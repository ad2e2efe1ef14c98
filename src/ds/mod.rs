pub mod frequency_buckets;
pub mod future_schedule;
pub mod intrusive_list;
pub mod keyed_list;
pub mod slot_arena;

pub use frequency_buckets::{DEFAULT_BUCKET_PREALLOC, FrequencyBuckets, FrequencyBucketsIter};
pub use future_schedule::FutureSchedule;
pub use intrusive_list::IntrusiveList;
pub use keyed_list::KeyedList;
pub use slot_arena::{SlotArena, SlotId};
