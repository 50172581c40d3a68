use thiserror::Error;

/// Configuration errors, rejected at construction/load time.
///
/// This is the only error type in the stack. Solver non-convergence is
/// deliberately not an error (a failed convex solve is "no update" for
/// that batch element), and actuator saturation is silently clamped.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("domain {domain_index} has {actual} dimensions, state has {expected}")]
    DimensionMismatch {
        domain_index: usize,
        expected: usize,
        actual: usize,
    },

    #[error("domain has no dimensions")]
    EmptyDomain,

    #[error("invalid bounds in dimension {dim}: min ({min}) > max ({max})")]
    InvalidBounds { dim: usize, min: f64, max: f64 },

    #[error("bound is not finite in dimension {dim}")]
    NonFiniteBounds { dim: usize },

    #[error("invalid split fraction: {0} (must be in [0, 1])")]
    InvalidSplit(f64),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}
