use crate::metrics::traits::{CoreMetricsRecorder, IdealMetricsRecorder, LfuMetricsRecorder};

#[derive(Debug, Default, Clone)]
pub struct LruMetrics {
    pub lookups: u64,
    pub hits: u64,
    pub misses: u64,
    pub loads: u64,
    pub evicted_entries: u64,
    pub clears: u64,
}

#[derive(Debug, Default, Clone)]
pub struct LfuMetrics {
    pub lookups: u64,
    pub hits: u64,
    pub misses: u64,
    pub loads: u64,
    pub evicted_entries: u64,
    pub clears: u64,
    pub frequency_bumps: u64,
}

#[derive(Debug, Default, Clone)]
pub struct IdealMetrics {
    pub lookups: u64,
    pub hits: u64,
    pub misses: u64,
    pub loads: u64,
    pub evicted_entries: u64,
    pub clears: u64,
    pub bypasses: u64,
    pub victim_scan_steps: u64,
    pub never_recurs_victims: u64,
}

impl CoreMetricsRecorder for LruMetrics {
    fn record_hit(&mut self) {
        self.lookups += 1;
        self.hits += 1;
    }

    fn record_miss(&mut self) {
        self.lookups += 1;
        self.misses += 1;
    }

    fn record_load(&mut self) {
        self.loads += 1;
    }

    fn record_evicted_entry(&mut self) {
        self.evicted_entries += 1;
    }

    fn record_clear(&mut self) {
        self.clears += 1;
    }
}

impl CoreMetricsRecorder for LfuMetrics {
    fn record_hit(&mut self) {
        self.lookups += 1;
        self.hits += 1;
    }

    fn record_miss(&mut self) {
        self.lookups += 1;
        self.misses += 1;
    }

    fn record_load(&mut self) {
        self.loads += 1;
    }

    fn record_evicted_entry(&mut self) {
        self.evicted_entries += 1;
    }

    fn record_clear(&mut self) {
        self.clears += 1;
    }
}

impl LfuMetricsRecorder for LfuMetrics {
    fn record_frequency_bump(&mut self) {
        self.frequency_bumps += 1;
    }
}

impl CoreMetricsRecorder for IdealMetrics {
    fn record_hit(&mut self) {
        self.lookups += 1;
        self.hits += 1;
    }

    fn record_miss(&mut self) {
        self.lookups += 1;
        self.misses += 1;
    }

    fn record_load(&mut self) {
        self.loads += 1;
    }

    fn record_evicted_entry(&mut self) {
        self.evicted_entries += 1;
    }

    fn record_clear(&mut self) {
        self.clears += 1;
    }
}

impl IdealMetricsRecorder for IdealMetrics {
    fn record_bypass(&mut self) {
        self.bypasses += 1;
    }

    fn record_victim_scan_step(&mut self) {
        self.victim_scan_steps += 1;
    }

    fn record_never_recurs_victim(&mut self) {
        self.never_recurs_victims += 1;
    }
}
