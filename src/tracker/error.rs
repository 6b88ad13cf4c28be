//! Error types for the tracking core.

use thiserror::Error;

/// Failure of the assignment solver on malformed input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolverError {
    #[error("cost matrix is degenerate: {rows}x{cols}")]
    EmptyMatrix { rows: usize, cols: usize },
    #[error("cost matrix entry ({row}, {col}) is not finite")]
    NonFiniteCost { row: usize, col: usize },
    #[error("assignment backend failed: {0}")]
    Backend(String),
}

/// Failure of the Kalman correction step.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FilterError {
    #[error("innovation covariance is singular")]
    SingularInnovation,
}

/// Invalid tracker construction parameters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("max_age must be non-negative, got {0}")]
    NegativeMaxAge(i64),
    #[error("min_hits must be non-negative, got {0}")]
    NegativeMinHits(i64),
    #[error("iou_threshold must be a finite value in [0, 1], got {0}")]
    InvalidIouThreshold(f32),
    #[error("{field} does not fit in 32 bits: {value}")]
    OutOfRange { field: &'static str, value: i64 },
}
