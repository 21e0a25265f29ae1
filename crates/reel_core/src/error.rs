//! Core error types

use thiserror::Error;

/// Errors raised while building core values
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// A color string could not be parsed
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    /// Frame rate must be finite and positive
    #[error("Invalid frame rate: {0}")]
    InvalidFrameRate(f64),
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
