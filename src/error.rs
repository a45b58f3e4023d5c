use std::io;
use thiserror::Error;

/// Custom error type for the presswatch application
#[derive(Error, Debug)]
pub enum PressError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("History store error: {0}")]
    History(#[from] rusqlite::Error),

    #[error("Counter source unavailable: {0}")]
    CounterSource(String),

    #[error("Metric collection failed: {0}")]
    MetricCollection(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for the presswatch application
pub type Result<T> = std::result::Result<T, PressError>;

impl PressError {
    /// Create a config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        PressError::Config(msg.into())
    }

    /// Create a counter source error
    pub fn counter_source<S: Into<String>>(msg: S) -> Self {
        PressError::CounterSource(msg.into())
    }

    /// Create a metric collection error
    pub fn metric_collection<S: Into<String>>(msg: S) -> Self {
        PressError::MetricCollection(msg.into())
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        PressError::Other(msg.into())
    }
}
