//! Error types for Disha

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, DishaError>;

/// Disha error type
///
/// Matching failures are not errors: a step that cannot be placed on the map
/// is reported through [`StepOutput`](crate::StepOutput) with the sentinel
/// position. These variants cover inputs the tracker refuses to consume.
#[derive(Error, Debug)]
pub enum DishaError {
    /// Configuration file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration could not be parsed or is out of range
    #[error("Configuration error: {0}")]
    Config(String),

    /// Occupancy grid data is malformed
    #[error("Invalid grid: {0}")]
    InvalidGrid(String),

    /// Step input rejected before touching tracker state
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<serde_yaml::Error> for DishaError {
    fn from(e: serde_yaml::Error) -> Self {
        DishaError::Config(e.to_string())
    }
}
