//! Error types for the sleepridge_core library.

use plotters::drawing::DrawingAreaErrorKind;
use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for sleepridge_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A timestamp on a sleep row could not be parsed
    #[error("Invalid timestamp {value:?} in column {column:?} on line {line}")]
    Timestamp {
        line: u64,
        column: &'static str,
        value: String,
    },

    /// Sampler or renderer parameter out of range
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Drawing or image encoding failed
    #[error("Render error: {0}")]
    Render(String),

    /// Nothing to plot
    #[error("No sleep samples to plot")]
    NoSamples,
}

impl<E> From<DrawingAreaErrorKind<E>> for Error
where
    E: std::error::Error + Send + Sync,
{
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        Error::Render(err.to_string())
    }
}
