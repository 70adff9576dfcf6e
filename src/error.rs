//! Error types for the smartcab crate

use thiserror::Error;

/// Main error type for the smartcab crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("percept is missing expected channel '{channel}'")]
    MissingPercept { channel: String },

    #[error("percept channel '{channel}' holds a reading of the wrong kind")]
    MismatchedPercept { channel: String },

    #[error("no valid actions available")]
    NoValidActions,

    #[error("route planner produced no waypoint; the cab is already at its destination")]
    NoWaypoint,

    #[error("invalid grid dimensions {width}x{height} (both must be at least 1)")]
    InvalidGrid { width: u32, height: u32 },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}
