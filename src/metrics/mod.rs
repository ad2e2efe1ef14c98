//! Per-engine counters, enabled with the `metrics` feature.

pub mod metrics_impl;
pub mod snapshot;
pub mod traits;
