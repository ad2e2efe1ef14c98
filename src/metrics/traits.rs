//! # Metrics Trait Hierarchy
//!
//! Recording and snapshotting are split into small traits so engines only
//! write counters and callers only read snapshots.
//!
//! ```text
//!                 ┌─────────────────────────────┐
//!                 │     CoreMetricsRecorder     │
//!                 │  hit/miss/load/evict/clear  │
//!                 └──────────────┬──────────────┘
//!                                │
//!            ┌───────────────────┴───────────────────┐
//!            ▼                                       ▼
//!   ┌──────────────────┐                   ┌──────────────────────┐
//!   │ LfuMetrics       │                   │ IdealMetrics         │
//!   │ Recorder         │                   │ Recorder             │
//!   │ frequency_bump   │                   │ bypass / scan_step / │
//!   └──────────────────┘                   │ never_recurs / ...   │
//!                                          └──────────────────────┘
//!
//!   Consumption: MetricsSnapshotProvider<S> (tests, benches, reports)
//! ```

/// Counters shared by every engine.
pub trait CoreMetricsRecorder {
    fn record_hit(&mut self);
    fn record_miss(&mut self);
    /// The loader ran (admitted miss, bypass, or zero-capacity pass-through).
    fn record_load(&mut self);
    fn record_evicted_entry(&mut self);
    fn record_clear(&mut self);
}

/// LFU-specific counters.
pub trait LfuMetricsRecorder: CoreMetricsRecorder {
    fn record_frequency_bump(&mut self);
}

/// Ideal (Belady) specific counters.
pub trait IdealMetricsRecorder: CoreMetricsRecorder {
    /// A miss on a key that never recurs was served without admission.
    fn record_bypass(&mut self);
    /// One resident key inspected during victim selection.
    fn record_victim_scan_step(&mut self);
    /// The chosen victim never recurs.
    fn record_never_recurs_victim(&mut self);
}

/// Snapshot provider for tests and reports.
pub trait MetricsSnapshotProvider<S> {
    fn snapshot(&self) -> S;
}
