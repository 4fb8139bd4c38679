//! Trading loop metrics collection

use serde::{Deserialize, Serialize};

/// Trading loop metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metrics {
    /// Cycles that ran every step
    cycles_completed: usize,

    /// Cycles abandoned on an error
    cycles_skipped: usize,

    /// Orders acknowledged by the exchange
    orders_submitted: usize,

    /// Underlying units traded by delta hedges
    hedge_volume: u64,

    /// Contracts traded to flatten CLEAR positions
    clear_volume: u64,

    /// Contracts traded on ranked signals
    signal_volume: u64,

    /// Sum of cycle latencies (for average)
    total_cycle_latency_us: u64,

    /// Minimum cycle latency
    min_cycle_latency_us: u64,

    /// Maximum cycle latency
    max_cycle_latency_us: u64,

    /// Latency histogram (microseconds)
    latency_histogram: LatencyHistogram,
}

impl Metrics {
    /// Create new metrics
    pub fn new() -> Self {
        Self {
            cycles_completed: 0,
            cycles_skipped: 0,
            orders_submitted: 0,
            hedge_volume: 0,
            clear_volume: 0,
            signal_volume: 0,
            total_cycle_latency_us: 0,
            min_cycle_latency_us: u64::MAX,
            max_cycle_latency_us: 0,
            latency_histogram: LatencyHistogram::new(),
        }
    }

    /// Record a completed cycle and its latency
    pub fn record_cycle(&mut self, latency_us: u64) {
        self.cycles_completed += 1;
        self.total_cycle_latency_us += latency_us;
        self.min_cycle_latency_us = self.min_cycle_latency_us.min(latency_us);
        self.max_cycle_latency_us = self.max_cycle_latency_us.max(latency_us);
        self.latency_histogram.record(latency_us);
    }

    /// Record an abandoned cycle
    pub fn record_skipped_cycle(&mut self) {
        self.cycles_skipped += 1;
    }

    /// Record delta-hedge orders
    pub fn record_hedge(&mut self, orders: usize, volume: u64) {
        self.orders_submitted += orders;
        self.hedge_volume += volume;
    }

    /// Record position-clearing orders
    pub fn record_clear(&mut self, orders: usize, volume: u64) {
        self.orders_submitted += orders;
        self.clear_volume += volume;
    }

    /// Record ranked signal orders
    pub fn record_signal_orders(&mut self, orders: usize, volume: u64) {
        self.orders_submitted += orders;
        self.signal_volume += volume;
    }

    /// Get average cycle latency (microseconds)
    pub fn avg_cycle_latency_us(&self) -> u64 {
        if self.cycles_completed == 0 {
            0
        } else {
            self.total_cycle_latency_us / self.cycles_completed as u64
        }
    }

    /// Get minimum cycle latency (microseconds)
    pub fn min_cycle_latency_us(&self) -> u64 {
        if self.min_cycle_latency_us == u64::MAX {
            // No data recorded yet
            0
        } else {
            self.min_cycle_latency_us
        }
    }

    /// Get maximum cycle latency
    pub fn max_cycle_latency_us(&self) -> u64 {
        self.max_cycle_latency_us
    }

    pub fn cycles_completed(&self) -> usize {
        self.cycles_completed
    }

    pub fn cycles_skipped(&self) -> usize {
        self.cycles_skipped
    }

    pub fn orders_submitted(&self) -> usize {
        self.orders_submitted
    }

    pub fn hedge_volume(&self) -> u64 {
        self.hedge_volume
    }

    pub fn clear_volume(&self) -> u64 {
        self.clear_volume
    }

    pub fn signal_volume(&self) -> u64 {
        self.signal_volume
    }

    /// Get latency percentile
    pub fn latency_percentile(&self, percentile: f64) -> u64 {
        self.latency_histogram.percentile(percentile)
    }

    /// Get summary statistics
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            cycles_completed: self.cycles_completed,
            cycles_skipped: self.cycles_skipped,
            orders_submitted: self.orders_submitted,
            hedge_volume: self.hedge_volume,
            clear_volume: self.clear_volume,
            signal_volume: self.signal_volume,
            avg_latency_us: self.avg_cycle_latency_us(),
            min_latency_us: self.min_cycle_latency_us(),
            max_latency_us: self.max_cycle_latency_us(),
            p50_latency_us: self.latency_percentile(0.50),
            p95_latency_us: self.latency_percentile(0.95),
            p99_latency_us: self.latency_percentile(0.99),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Metrics summary for display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub cycles_completed: usize,
    pub cycles_skipped: usize,
    pub orders_submitted: usize,
    pub hedge_volume: u64,
    pub clear_volume: u64,
    pub signal_volume: u64,
    pub avg_latency_us: u64,
    pub min_latency_us: u64,
    pub max_latency_us: u64,
    pub p50_latency_us: u64,
    pub p95_latency_us: u64,
    pub p99_latency_us: u64,
}

impl std::fmt::Display for MetricsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Trading Metrics:")?;
        writeln!(f, "  Cycles Completed:   {}", self.cycles_completed)?;
        writeln!(f, "  Cycles Skipped:     {}", self.cycles_skipped)?;
        writeln!(f, "  Orders Submitted:   {}", self.orders_submitted)?;
        writeln!(f, "  Hedge Volume:       {} units", self.hedge_volume)?;
        writeln!(f, "  Clear Volume:       {} contracts", self.clear_volume)?;
        writeln!(f, "  Signal Volume:      {} contracts", self.signal_volume)?;
        writeln!(f, "\nCycle Latency:")?;
        for (label, us) in [
            ("Average", self.avg_latency_us),
            ("Minimum", self.min_latency_us),
            ("P50", self.p50_latency_us),
            ("P95", self.p95_latency_us),
            ("P99", self.p99_latency_us),
            ("Maximum", self.max_latency_us),
        ] {
            writeln!(
                f,
                "  {:<8} {} μs ({:.3} ms)",
                format!("{}:", label),
                us,
                us as f64 / 1000.0
            )?;
        }
        Ok(())
    }
}

/// Latency histogram for percentile calculation
#[derive(Debug, Clone, Serialize, Deserialize)]
struct LatencyHistogram {
    /// Buckets: [0-100μs, ..., 900μs-1ms, 1-2ms, ..., 90-100ms, 100-200ms, ..., >1s]
    buckets: Vec<usize>,
    bucket_boundaries: Vec<u64>,
}

impl LatencyHistogram {
    fn new() -> Self {
        let mut boundaries = vec![];

        // 0-1ms in 100μs increments
        for i in 1..=10 {
            boundaries.push(i * 100);
        }

        // 1-10ms in 1ms increments
        for i in 2..=10 {
            boundaries.push(i * 1_000);
        }

        // 10-100ms in 10ms increments
        for i in 2..=10 {
            boundaries.push(i * 10_000);
        }

        // 100ms-1s in 100ms increments
        for i in 2..=10 {
            boundaries.push(i * 100_000);
        }

        Self {
            buckets: vec![0; boundaries.len() + 1],
            bucket_boundaries: boundaries,
        }
    }

    fn record(&mut self, latency_us: u64) {
        let bucket = self
            .bucket_boundaries
            .iter()
            .position(|&b| latency_us < b)
            .unwrap_or(self.bucket_boundaries.len());

        self.buckets[bucket] += 1;
    }

    fn percentile(&self, p: f64) -> u64 {
        let total: usize = self.buckets.iter().sum();
        if total == 0 {
            return 0;
        }

        let target = ((total as f64 * p).ceil() as usize).max(1);
        let mut cumsum = 0;

        for (i, &count) in self.buckets.iter().enumerate() {
            cumsum += count;
            if cumsum >= target {
                return if i < self.bucket_boundaries.len() {
                    self.bucket_boundaries[i]
                } else {
                    self.bucket_boundaries[self.bucket_boundaries.len() - 1]
                };
            }
        }

        0
    }
}
