use std::io::Write;
use std::time::Duration;

use tokio::time::{interval, sleep, MissedTickBehavior};
use tokio_stream::wrappers::IntervalStream;
use tokio_stream::StreamExt;

use crate::clock::Clock;
use crate::config::{DriverConfig, DriverKind};
use crate::error::Result;
use crate::metrics::{Progress, Report, Reporter, Sampler};

/// The periodic task that wakes the sampler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Driver {
    /// Wake on a fixed-rate tick. A late wake-up does not shift the
    /// schedule; missed ticks fire back to back.
    Cyclic { period: Duration },
    /// Sleep `wait` after each sample, so lateness accumulates.
    Delay { wait: Duration },
}

impl Driver {
    pub fn from_config(config: &DriverConfig) -> Self {
        match config.kind {
            DriverKind::Cyclic => Self::Cyclic {
                period: config.period(),
            },
            DriverKind::Delay => Self::Delay {
                wait: config.period(),
            },
        }
    }

    /// Start `sampler` and feed it one sample per wake-up until it
    /// reaches its target.
    pub async fn drive<C: Clock>(&self, sampler: &mut Sampler<C>) -> Result<()> {
        match *self {
            Self::Cyclic { period } => {
                let mut timer = interval(period);
                timer.set_missed_tick_behavior(MissedTickBehavior::Burst);
                let mut ticks = IntervalStream::new(timer);

                // The first tick completes immediately
                ticks.next().await;
                sampler.start()?;

                while ticks.next().await.is_some() {
                    if sampler.sample()? == Progress::TargetReached {
                        break;
                    }
                }
            }
            Self::Delay { wait } => {
                sampler.start()?;
                loop {
                    sleep(wait).await;
                    if sampler.sample()? == Progress::TargetReached {
                        break;
                    }
                }
            }
        }
        Ok(())
    }
}

// ─── Public entry point ──────────────────────────────────────────

/// Run a full measurement: drive the sampler to its target, then write
/// the report to `sink`.
pub async fn run<C: Clock, W: Write>(
    driver: Driver,
    sampler: &mut Sampler<C>,
    reporter: &Reporter,
    sink: &mut W,
) -> Result<Report> {
    tracing::info!(?driver, target_samples = sampler.target(), "measurement started");
    driver.drive(sampler).await?;
    sampler.report(reporter, sink)
}
