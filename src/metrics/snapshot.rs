#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LruMetricsSnapshot {
    pub lookups: u64,
    pub hits: u64,
    pub misses: u64,
    pub loads: u64,
    pub evicted_entries: u64,
    pub clears: u64,

    // gauges captured at snapshot time
    pub cache_len: usize,
    pub capacity: usize,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LfuMetricsSnapshot {
    pub lookups: u64,
    pub hits: u64,
    pub misses: u64,
    pub loads: u64,
    pub evicted_entries: u64,
    pub clears: u64,
    pub frequency_bumps: u64,

    pub cache_len: usize,
    pub capacity: usize,
    pub bucket_count: usize,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IdealMetricsSnapshot {
    pub lookups: u64,
    pub hits: u64,
    pub misses: u64,
    pub loads: u64,
    pub evicted_entries: u64,
    pub clears: u64,
    pub bypasses: u64,
    pub victim_scan_steps: u64,
    pub never_recurs_victims: u64,

    pub cache_len: usize,
    pub capacity: usize,
    /// Trace positions installed so far, however the future was fed.
    pub announced: usize,
    pub position: usize,
}

impl LruMetricsSnapshot {
    pub fn hit_rate(&self) -> f64 {
        ratio(self.hits, self.lookups)
    }
}

impl LfuMetricsSnapshot {
    pub fn hit_rate(&self) -> f64 {
        ratio(self.hits, self.lookups)
    }
}

impl IdealMetricsSnapshot {
    pub fn hit_rate(&self) -> f64 {
        ratio(self.hits, self.lookups)
    }
}

fn ratio(num: u64, den: u64) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}
