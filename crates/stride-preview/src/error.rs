use stride_rbd::RbdError;
use thiserror::Error;

/// Top-level error type for the preview controller.
#[derive(Debug, Error)]
pub enum PreviewError {
    #[error("Model error: {0}")]
    Model(#[from] RbdError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("No robot model loaded")]
    ModelNotLoaded,

    #[error("Preview plan has no phases")]
    EmptyPlan,

    #[error("Invalid duration {duration} for phase {phase} (must be > 0)")]
    InvalidDuration { phase: usize, duration: f64 },

    #[error("Phase {phase} of {duration} s needs too many samples at {sample_time} s")]
    TooManySamples {
        phase: usize,
        duration: f64,
        sample_time: f64,
    },

    #[error("Unknown foot: {0}")]
    UnknownFoot(String),
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid sample_time: {0} (must be > 0)")]
    InvalidSampleTime(f64),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}
