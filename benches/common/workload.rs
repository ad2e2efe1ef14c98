//! Deterministic trace generators for replay benchmarks.
//!
//! Produces key streams without pulling in external RNG crates, so every run
//! replays the same trace.

#[derive(Debug, Clone, Copy)]
pub enum Workload {
    /// Uniform random keys in `[0, universe)`.
    Uniform,
    /// Hot/cold split with a configurable hot fraction and hot access probability.
    Hotset { hot_fraction: f64, hot_prob: f64 },
    /// Sequential loop over `[0, universe)`.
    Scan,
    /// Zipfian distribution. `theta` controls skew: 0.0 = uniform,
    /// 0.99 = highly skewed (YCSB default).
    Zipfian { theta: f64 },
}

impl Workload {
    pub fn name(&self) -> &'static str {
        match self {
            Workload::Uniform => "uniform",
            Workload::Hotset { .. } => "hotset",
            Workload::Scan => "scan",
            Workload::Zipfian { .. } => "zipfian",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct WorkloadSpec {
    pub universe: u64,
    pub workload: Workload,
    pub seed: u64,
}

impl WorkloadSpec {
    /// Materializes `len` keys.
    pub fn trace(self, len: usize) -> Vec<u64> {
        let mut generator = WorkloadGenerator::new(self.universe, self.workload, self.seed);
        (0..len).map(|_| generator.next_key()).collect()
    }
}

#[derive(Debug, Clone)]
struct WorkloadGenerator {
    universe: u64,
    sampler: Sampler,
    rng: XorShift64,
    scan_pos: u64,
}

#[derive(Debug, Clone)]
enum Sampler {
    Uniform,
    Hotset { hot_size: u64, hot_prob: f64 },
    Scan,
    Zipfian(ZipfianState),
}

impl WorkloadGenerator {
    fn new(universe: u64, workload: Workload, seed: u64) -> Self {
        let universe = universe.max(1);
        let sampler = match workload {
            Workload::Uniform => Sampler::Uniform,
            Workload::Hotset {
                hot_fraction,
                hot_prob,
            } => {
                let hot_fraction = hot_fraction.clamp(0.0, 1.0);
                let hot_size = ((universe as f64) * hot_fraction).round() as u64;
                Sampler::Hotset {
                    hot_size: hot_size.clamp(1, universe),
                    hot_prob: hot_prob.clamp(0.0, 1.0),
                }
            },
            Workload::Scan => Sampler::Scan,
            Workload::Zipfian { theta } => Sampler::Zipfian(ZipfianState::new(universe, theta)),
        };
        Self {
            universe,
            sampler,
            rng: XorShift64::new(seed),
            scan_pos: 0,
        }
    }

    fn next_key(&mut self) -> u64 {
        match &self.sampler {
            Sampler::Uniform => self.rng.next_u64() % self.universe,
            Sampler::Hotset { hot_size, hot_prob } => {
                if self.rng.next_f64() < *hot_prob {
                    self.rng.next_u64() % hot_size
                } else if *hot_size == self.universe {
                    self.rng.next_u64() % self.universe
                } else {
                    hot_size + (self.rng.next_u64() % (self.universe - hot_size))
                }
            },
            Sampler::Scan => {
                let key = self.scan_pos;
                self.scan_pos = (self.scan_pos + 1) % self.universe;
                key
            },
            Sampler::Zipfian(zipf) => zipf.sample(self.rng.next_f64()),
        }
    }
}

/// Zipfian distribution state for inverse CDF sampling (YCSB algorithm).
#[derive(Debug, Clone)]
struct ZipfianState {
    n: u64,
    theta: f64,
    zeta_n: f64,
    alpha: f64,
    eta: f64,
}

impl ZipfianState {
    fn new(n: u64, theta: f64) -> Self {
        let theta = theta.clamp(0.0, 0.9999);
        let zeta_2 = Self::zeta(2, theta);
        let zeta_n = Self::zeta(n, theta);
        let alpha = 1.0 / (1.0 - theta);
        let eta = (1.0 - (2.0 / n as f64).powf(1.0 - theta)) / (1.0 - zeta_2 / zeta_n);

        Self {
            n,
            theta,
            zeta_n,
            alpha,
            eta,
        }
    }

    /// zeta(n, theta) = sum(1/i^theta for i in 1..=n)
    fn zeta(n: u64, theta: f64) -> f64 {
        (1..=n).map(|i| 1.0 / (i as f64).powf(theta)).sum()
    }

    /// Sample given uniform `u` in [0, 1).
    fn sample(&self, u: f64) -> u64 {
        let uz = u * self.zeta_n;
        if uz < 1.0 {
            return 0;
        }
        if uz < 1.0 + 0.5_f64.powf(self.theta) {
            return 1;
        }
        let spread = (self.n as f64) * (self.eta * u - self.eta + 1.0).powf(self.alpha);
        (spread as u64).min(self.n - 1)
    }
}

#[derive(Debug, Clone, Copy)]
struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    fn new(seed: u64) -> Self {
        Self { state: seed.max(1) }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    fn next_f64(&mut self) -> f64 {
        const SCALE: f64 = 1.0 / (u64::MAX as f64);
        (self.next_u64() as f64) * SCALE
    }
}
