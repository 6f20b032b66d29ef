//! Wake-up latency sampling for periodic control tasks.
//!
//! A [`Sampler`] records the interval between successive activations of a
//! periodic task. Once it holds the target number of intervals, a
//! [`Reporter`] sorts them and writes min, max, mean, standard deviation
//! and interpolated percentiles to a byte sink. A [`Driver`] supplies the
//! activations.

pub mod clock;
pub mod config;
pub mod driver;
pub mod error;
pub mod metrics;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use config::{Config, DriverConfig, DriverKind, OutputConfig, SamplerConfig};
pub use driver::{run, Driver};
pub use error::{LatencyError, Result};
pub use metrics::{
    CapacityMode, OutputFormat, PercentileMethod, Progress, Report, Reporter, SampleSeries,
    Sampler, SamplerState, Statistics,
};
