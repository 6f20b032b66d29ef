use thiserror::Error;

// ─── Unified error type ──────────────────────────────────────────

/// Everything that can go wrong while sampling or reporting a run.
/// All of these are raised synchronously by the call that hit them.
#[derive(Debug, Error)]
pub enum LatencyError {
    #[error("Sampler has not been started")]
    NotStarted,

    #[error("Sampler was already started")]
    AlreadyStarted,

    #[error("Sample series is full ({capacity} samples)")]
    CapacityExceeded { capacity: usize },

    #[error("Need at least {required} samples to report, have {count}")]
    InsufficientSamples { count: usize, required: usize },

    #[error("Run has already been reported")]
    AlreadyReported,

    #[error("Report sink unavailable: {0}")]
    SinkUnavailable(#[source] std::io::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to encode report: {0}")]
    Encode(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LatencyError>;
