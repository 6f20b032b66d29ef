use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{LatencyError, Result};

/// Percentile ranks reported when none are configured.
pub const DEFAULT_RANKS: [f64; 4] = [50.0, 95.0, 99.0, 99.9];

/// How a percentile rank maps onto a fractional index into the sorted
/// series. Both variants clamp to `[0, n - 1]` and interpolate linearly
/// between the two bracketing order statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PercentileMethod {
    /// `index = n * p / 100`. High ranks saturate at the maximum.
    #[default]
    Rank,
    /// `index = (n - 1) * p / 100`. The median of an odd-length series is
    /// its middle element.
    Linear,
}

impl PercentileMethod {
    fn index(self, n: usize, rank: f64) -> f64 {
        match self {
            Self::Rank => n as f64 * rank / 100.0,
            Self::Linear => (n - 1) as f64 * rank / 100.0,
        }
    }
}

/// One reported percentile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PercentileValue {
    pub rank: f64,
    pub value_us: f64,
}

/// Point estimates over a complete series. All values in microseconds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statistics {
    pub count: usize,
    pub min_us: f64,
    pub max_us: f64,
    pub mean_us: f64,
    /// Sample standard deviation (denominator `count - 1`).
    pub stddev_us: f64,
    pub percentiles: Vec<PercentileValue>,
}

impl Statistics {
    /// Sort `samples` ascending in place and compute every statistic.
    ///
    /// Fails with `InsufficientSamples` for fewer than two samples, where
    /// the standard deviation is undefined.
    pub fn compute(
        samples: &mut [Duration],
        ranks: &[f64],
        method: PercentileMethod,
    ) -> Result<Self> {
        let n = samples.len();
        if n < 2 {
            return Err(LatencyError::InsufficientSamples {
                count: n,
                required: 2,
            });
        }

        samples.sort_unstable();
        let sorted: &[Duration] = samples;

        // Sum in nanoseconds, convert once.
        let total_ns: u128 = sorted.iter().map(Duration::as_nanos).sum();
        let mean_us = ns_to_us(total_ns) / n as f64;

        let sum_sq: f64 = sorted
            .iter()
            .map(|d| {
                let delta = as_us(*d) - mean_us;
                delta * delta
            })
            .sum();
        let stddev_us = (sum_sq / (n - 1) as f64).sqrt();

        let percentiles = ranks
            .iter()
            .map(|&rank| PercentileValue {
                rank,
                value_us: percentile(sorted, rank, method),
            })
            .collect();

        Ok(Self {
            count: n,
            min_us: as_us(sorted[0]),
            max_us: as_us(sorted[n - 1]),
            mean_us,
            stddev_us,
            percentiles,
        })
    }

    /// Look up a computed percentile by rank.
    pub fn percentile(&self, rank: f64) -> Option<f64> {
        self.percentiles
            .iter()
            .find(|p| p.rank == rank)
            .map(|p| p.value_us)
    }
}

/// Interpolated percentile of an ascending, non-empty slice, in µs.
pub fn percentile(sorted: &[Duration], rank: f64, method: PercentileMethod) -> f64 {
    let last = sorted.len() - 1;
    let index = method.index(sorted.len(), rank);

    let low = (index.floor() as usize).min(last);
    let high = (index.ceil() as usize).min(last);

    let lo = as_us(sorted[low]);
    if low == high {
        return lo;
    }

    // lo·(high − index) + hi·(index − low), with high = low + 1.
    let hi = as_us(sorted[high]);
    lo + (hi - lo) * (index - low as f64)
}

fn as_us(d: Duration) -> f64 {
    ns_to_us(d.as_nanos())
}

fn ns_to_us(ns: u128) -> f64 {
    ns as f64 / 1_000.0
}
