use std::io::Write;
use std::time::Duration;

use serde::Serialize;

use super::report::{Report, Reporter};
use super::series::{CapacityMode, SampleSeries};
use crate::clock::Clock;
use crate::error::{LatencyError, Result};

/// Where a sampler is in its one-shot lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SamplerState {
    Idle,
    Collecting,
    /// Terminal. A sampler is never restarted.
    Reported,
}

/// Result of a successful `sample()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    Collecting { remaining: usize },
    /// This sample brought the series to its target length.
    TargetReached,
}

/// Measures the interval between successive wake-ups of a periodic task.
///
/// Every `sample()` records `now - previous` and moves `previous` to
/// `now`, so the series holds per-activation intervals rather than the
/// time elapsed since `start()`.
pub struct Sampler<C: Clock> {
    clock: C,
    series: SampleSeries,
    target: usize,
    previous: Option<Duration>,
    state: SamplerState,
    progress_step: usize,
}

impl<C: Clock> Sampler<C> {
    pub fn new(clock: C, target: usize, mode: CapacityMode) -> Self {
        Self {
            clock,
            series: SampleSeries::with_mode(mode, target),
            target,
            previous: None,
            state: SamplerState::Idle,
            progress_step: (target / 10).max(1),
        }
    }

    /// Take the baseline timestamp. Must be called exactly once.
    pub fn start(&mut self) -> Result<()> {
        if self.state != SamplerState::Idle {
            return Err(LatencyError::AlreadyStarted);
        }
        self.series.clear();
        self.previous = Some(self.clock.now());
        self.state = SamplerState::Collecting;

        tracing::debug!(target_samples = self.target, "sampling started");
        Ok(())
    }

    /// Record the interval since the previous sample (or since `start()`).
    pub fn sample(&mut self) -> Result<Progress> {
        let previous = match (self.state, self.previous) {
            (SamplerState::Collecting, Some(previous)) => previous,
            (SamplerState::Reported, _) => return Err(LatencyError::AlreadyReported),
            _ => return Err(LatencyError::NotStarted),
        };
        if self.series.len() >= self.target {
            return Err(LatencyError::CapacityExceeded {
                capacity: self.target,
            });
        }

        let now = self.clock.now();
        self.series.push(now.saturating_sub(previous))?;
        self.previous = Some(now);

        let len = self.series.len();
        if len == self.target {
            tracing::info!(samples = len, "target sample count reached");
            return Ok(Progress::TargetReached);
        }
        if len % self.progress_step == 0 {
            tracing::debug!(samples = len, target_samples = self.target, "sampling progress");
        }
        Ok(Progress::Collecting {
            remaining: self.target - len,
        })
    }

    /// Current series length.
    pub fn size(&self) -> usize {
        self.series.len()
    }

    pub fn target(&self) -> usize {
        self.target
    }

    pub fn state(&self) -> SamplerState {
        self.state
    }

    pub fn is_complete(&self) -> bool {
        self.series.len() >= self.target
    }

    /// The recorded intervals. Chronological until the run is reported.
    pub fn series(&self) -> &SampleSeries {
        &self.series
    }

    /// Hand the completed series to `reporter` and write the result to
    /// `sink`. Moves the sampler to `Reported` only if the write
    /// succeeded; on failure the series can be reported again.
    pub fn report<W: Write>(&mut self, reporter: &Reporter, sink: &mut W) -> Result<Report> {
        match self.state {
            SamplerState::Idle => return Err(LatencyError::NotStarted),
            SamplerState::Reported => return Err(LatencyError::AlreadyReported),
            SamplerState::Collecting => {}
        }
        if !self.is_complete() {
            return Err(LatencyError::InsufficientSamples {
                count: self.series.len(),
                required: self.target,
            });
        }

        let report = reporter.report(self.series.as_mut_slice(), sink)?;
        self.state = SamplerState::Reported;
        Ok(report)
    }
}
