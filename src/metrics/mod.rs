pub mod percentiles;
pub mod report;
pub mod sampler;
pub mod series;

pub use percentiles::{PercentileMethod, PercentileValue, Statistics, DEFAULT_RANKS};
pub use report::{DistBucket, OutputFormat, Report, Reporter};
pub use sampler::{Progress, Sampler, SamplerState};
pub use series::{CapacityMode, SampleSeries};
