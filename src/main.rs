use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use tick_latency::{
    CapacityMode, Config, Driver, DriverKind, MonotonicClock, OutputFormat, PercentileMethod,
    Sampler,
};

#[derive(Parser)]
#[command(name = "tick-latency", about = "Periodic wake-up latency sampler")]
struct Args {
    /// JSON config file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of intervals to collect before reporting
    #[arg(long)]
    target: Option<usize>,

    /// Comma-separated percentile ranks, e.g. 50,95,99,99.9
    #[arg(long, value_delimiter = ',')]
    percentiles: Option<Vec<f64>>,

    /// Series storage: bounded | growing
    #[arg(long, value_enum)]
    mode: Option<CapacityMode>,

    /// Wake-up source: cyclic | delay
    #[arg(long, value_enum)]
    driver: Option<DriverKind>,

    /// Tick period / sleep length in milliseconds
    #[arg(long)]
    period_ms: Option<u64>,

    /// Percentile index convention: rank | linear
    #[arg(long, value_enum)]
    method: Option<PercentileMethod>,

    /// Report format: text | json
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Write the report to this file instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

impl Args {
    fn into_config(self) -> tick_latency::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_json_file(path)?,
            None => Config::default(),
        };

        if let Some(target) = self.target {
            config.sampler.target_sample_count = target;
        }
        if let Some(ranks) = self.percentiles {
            config.sampler.percentile_ranks = ranks;
        }
        if let Some(mode) = self.mode {
            config.sampler.capacity_mode = mode;
        }
        if let Some(method) = self.method {
            config.sampler.percentile_method = method;
        }
        if let Some(kind) = self.driver {
            config.driver.kind = kind;
        }
        if let Some(period_ms) = self.period_ms {
            config.driver.period_ms = period_ms;
        }
        if let Some(format) = self.format {
            config.output.format = format;
        }
        if self.output.is_some() {
            config.output.path = self.output;
        }

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    // ── 1. Resolve configuration ─────────────────────────────────
    let config = Args::parse().into_config().unwrap_or_else(|e| {
        eprintln!("❌ {e}");
        process::exit(2);
    });

    eprintln!();
    eprintln!("╔══════════════════════════════════════════════════╗");
    eprintln!("║   ⏱   TICK WAKE-UP LATENCY SAMPLER               ║");
    eprintln!("╚══════════════════════════════════════════════════╝");
    eprintln!();
    eprintln!(
        "   {} samples · {:?} driver every {} ms · {:?} series",
        config.sampler.target_sample_count,
        config.driver.kind,
        config.driver.period_ms,
        config.sampler.capacity_mode,
    );
    eprintln!();

    // ── 2. Open the report sink ──────────────────────────────────
    let mut sink: Box<dyn Write> = match &config.output.path {
        Some(path) => match File::create(path) {
            Ok(file) => Box::new(BufWriter::new(file)),
            Err(e) => {
                eprintln!("❌ Cannot open {}: {e}", path.display());
                process::exit(1);
            }
        },
        None => Box::new(io::stdout().lock()),
    };

    // ── 3. Sample until the target, then report ──────────────────
    let mut sampler = Sampler::new(
        MonotonicClock::new(),
        config.sampler.target_sample_count,
        config.sampler.capacity_mode,
    );
    let driver = Driver::from_config(&config.driver);
    let reporter = config.reporter();

    if let Err(e) = tick_latency::run(driver, &mut sampler, &reporter, &mut sink).await {
        eprintln!("❌ Measurement failed: {e}");
        process::exit(1);
    }
}
