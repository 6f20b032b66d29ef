use std::fmt::Write as _;
use std::io::Write;
use std::time::Duration;

use chrono::{DateTime, Utc};
use hdrhistogram::Histogram;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::percentiles::{PercentileMethod, Statistics, DEFAULT_RANKS};
use crate::error::{LatencyError, Result};

// ─── Configuration ───────────────────────────────────────────────

/// HdrHistogram range: 1 μs → 1 s. Five significant figures keep every
/// value up to 262 143 μs exact, which covers all of `DIST_BOUNDARIES`;
/// slower intervals saturate into the overflow bucket.
const HIST_LOW: u64 = 1;
const HIST_HIGH: u64 = 1_000_000;
const HIST_SIGFIG: u8 = 5;

/// Distribution bucket boundaries (μs). Dense around typical control
/// loop periods (1–10 ms), coarse at the tails.
const DIST_BOUNDARIES: &[u64] = &[
    10, 50, 100, 250, 500, 1_000, 2_000, 3_000, 3_500, 3_900, 4_100,
    4_500, 5_000, 7_500, 10_000, 20_000, 50_000, 100_000,
];

// ─── Public types ────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Two summary lines in microseconds.
    #[default]
    Text,
    /// The whole `Report` as pretty-printed JSON.
    Json,
}

/// A bucket in the interval distribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DistBucket {
    pub range_start_us: u64,
    pub range_end_us: u64,
    pub count: u64,
}

/// Everything emitted at the end of a run.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub run_id: Uuid,
    pub finished_at: DateTime<Utc>,
    #[serde(flatten)]
    pub stats: Statistics,
    pub distribution: Vec<DistBucket>,
}

/// Turns a completed series into a rendered report.
#[derive(Debug, Clone)]
pub struct Reporter {
    ranks: Vec<f64>,
    method: PercentileMethod,
    format: OutputFormat,
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new(DEFAULT_RANKS.to_vec(), PercentileMethod::default(), OutputFormat::default())
    }
}

// ─── Reporter impl ───────────────────────────────────────────────

impl Reporter {
    pub fn new(ranks: Vec<f64>, method: PercentileMethod, format: OutputFormat) -> Self {
        Self {
            ranks,
            method,
            format,
        }
    }

    /// Sort `samples` and compute the report without writing it anywhere.
    pub fn build(&self, samples: &mut [Duration]) -> Result<Report> {
        let stats = Statistics::compute(samples, &self.ranks, self.method)?;
        Ok(Report {
            run_id: Uuid::new_v4(),
            finished_at: Utc::now(),
            distribution: compute_distribution(samples),
            stats,
        })
    }

    /// Render a report in the configured format, newline-terminated.
    pub fn render(&self, report: &Report) -> Result<String> {
        match self.format {
            OutputFormat::Text => Ok(render_text(report)),
            OutputFormat::Json => {
                let mut json = serde_json::to_string_pretty(report)?;
                json.push('\n');
                Ok(json)
            }
        }
    }

    /// Build, render and write a report in one go.
    ///
    /// The report is rendered in full before anything reaches `sink`, so
    /// a computation error never leaves a partial report behind.
    pub fn report<W: Write>(&self, samples: &mut [Duration], sink: &mut W) -> Result<Report> {
        let report = self.build(samples)?;
        let rendered = self.render(&report)?;

        sink.write_all(rendered.as_bytes())
            .and_then(|_| sink.flush())
            .map_err(|e| {
                tracing::warn!(error = %e, "report sink rejected write");
                LatencyError::SinkUnavailable(e)
            })?;

        tracing::info!(
            run_id = %report.run_id,
            count = report.stats.count,
            mean_us = report.stats.mean_us,
            max_us = report.stats.max_us,
            "report written"
        );
        Ok(report)
    }
}

// ─── Rendering ───────────────────────────────────────────────────

/// ```text
/// avg/stddev = 4000.2/1.3 us
/// count/min/50%/95%/99%/99.9%/100% = 100000/3987.5/4000/4002.1/4010/4031.7/4077.9 us
/// ```
pub fn render_text(report: &Report) -> String {
    let s = &report.stats;
    let mut out = String::new();

    let _ = writeln!(out, "avg/stddev = {}/{} us", s.mean_us, s.stddev_us);

    let mut header = String::from("count/min");
    let mut values = format!("{}/{}", s.count, s.min_us);
    for p in &s.percentiles {
        let _ = write!(header, "/{}%", p.rank);
        let _ = write!(values, "/{}", p.value_us);
    }
    let _ = writeln!(out, "{header}/100% = {values}/{} us", s.max_us);

    out
}

// ─── Distribution ────────────────────────────────────────────────

/// Bucket `(prev, boundary]` for every boundary, plus an overflow bucket
/// ending at the slowest interval. Empty buckets are skipped.
fn compute_distribution(samples: &[Duration]) -> Vec<DistBucket> {
    let Some(slowest_us) = samples.iter().max().map(|d| clamped_us(*d)) else {
        return Vec::new();
    };
    let Ok(mut hist) = Histogram::<u64>::new_with_bounds(HIST_LOW, HIST_HIGH, HIST_SIGFIG) else {
        return Vec::new();
    };
    for d in samples {
        hist.saturating_record(clamped_us(*d));
    }

    let mut counts = vec![0u64; DIST_BOUNDARIES.len() + 1];
    for iv in hist.iter_recorded() {
        // value_iterated_to() is the top of the equivalence range.
        let value = hist.lowest_equivalent(iv.value_iterated_to());
        let slot = DIST_BOUNDARIES.partition_point(|&b| b < value);
        counts[slot] += iv.count_at_value();
    }

    let starts = std::iter::once(0).chain(DIST_BOUNDARIES.iter().copied());
    let ends = DIST_BOUNDARIES
        .iter()
        .copied()
        .chain(std::iter::once(slowest_us));

    starts
        .zip(ends)
        .zip(counts)
        .filter(|&(_, count)| count > 0)
        .map(|((range_start_us, range_end_us), count)| DistBucket {
            range_start_us,
            range_end_us,
            count,
        })
        .collect()
}

/// Whole microseconds, at least 1 so sub-microsecond intervals still count.
fn clamped_us(d: Duration) -> u64 {
    u64::try_from(d.as_micros()).unwrap_or(u64::MAX).max(HIST_LOW)
}
