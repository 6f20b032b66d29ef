use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{LatencyError, Result};

/// How the series reserves room for samples.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CapacityMode {
    /// Storage for exactly `target` samples is allocated up front and
    /// appending past it fails.
    #[default]
    Bounded,
    /// Storage grows on demand; the sampler stops appending at `target`.
    Growing,
}

/// Interval durations in the order they were measured.
///
/// Index 0 is the earliest interval. The only reordering ever applied is
/// the ascending sort done at report time.
#[derive(Debug, Clone)]
pub struct SampleSeries {
    samples: Vec<Duration>,
    capacity: Option<usize>,
}

impl SampleSeries {
    /// Fixed-capacity series with room for exactly `capacity` samples.
    pub fn bounded(capacity: usize) -> Self {
        Self {
            samples: Vec::with_capacity(capacity),
            capacity: Some(capacity),
        }
    }

    /// Series that accepts any number of samples.
    pub fn growing() -> Self {
        Self {
            samples: Vec::new(),
            capacity: None,
        }
    }

    pub fn with_mode(mode: CapacityMode, target: usize) -> Self {
        match mode {
            CapacityMode::Bounded => Self::bounded(target),
            CapacityMode::Growing => Self::growing(),
        }
    }

    /// Append one interval. Fails with `CapacityExceeded` when a bounded
    /// series is already full; nothing is written in that case.
    pub fn push(&mut self, interval: Duration) -> Result<()> {
        if let Some(capacity) = self.capacity {
            if self.samples.len() >= capacity {
                return Err(LatencyError::CapacityExceeded { capacity });
            }
        }
        self.samples.push(interval);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// `None` for a growing series.
    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.capacity.is_some_and(|c| self.samples.len() >= c)
    }

    pub fn get(&self, index: usize) -> Option<Duration> {
        self.samples.get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Duration> {
        self.samples.iter()
    }

    pub fn as_slice(&self) -> &[Duration] {
        &self.samples
    }

    pub fn as_mut_slice(&mut self) -> &mut [Duration] {
        &mut self.samples
    }

    /// Sort ascending in place. Chronological order is lost.
    pub fn sort(&mut self) {
        self.samples.sort_unstable();
    }

    /// Drop every sample, keeping the capacity mode.
    pub fn clear(&mut self) {
        self.samples.clear();
    }
}
