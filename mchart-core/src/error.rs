use thiserror::Error;

/// Errors raised by the measurement and rendering engine.
///
/// Every variant is local to a single computation; none of them leaves the
/// trial log in a partially updated state.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MChartError {
    /// An angle outside the configured range, a negative length, or a
    /// non-finite value reached the core.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A session or geometry parameter that can never produce a valid chart.
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("{operation} is not available in {mode} mode")]
    ModeMismatch {
        operation: &'static str,
        mode: &'static str,
    },

    /// A malformed header or row in an exported trial log.
    #[error("malformed export at line {line}: {reason}")]
    Export { line: usize, reason: String },
}

impl MChartError {
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, MChartError::InvalidInput(_))
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, MChartError::Configuration(_))
    }
}

pub type Result<T> = std::result::Result<T, MChartError>;
