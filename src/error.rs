use std::path::PathBuf;

use thiserror::Error;

/// Errors raised at the input boundary of the scheduler.
///
/// Numeric input is clamped rather than rejected, so everything here is
/// either an unparseable label or a broken configuration.
#[derive(Debug, Error)]
pub enum AlgoError {
    #[error("unknown cognitive level: {0}")]
    UnknownCognitiveLevel(String),
    #[error("unknown usage type: {0}")]
    UnknownUsageType(String),
    #[error("unknown response type: {0}")]
    UnknownResponseType(String),
    #[error("unknown item status: {0}")]
    UnknownItemStatus(String),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("failed to read config {}: {}", .path.display(), .source)]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    ConfigParse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AlgoError>;
