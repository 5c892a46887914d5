//! Error types for loading scenarios and writing reports
//!
//! The projection engines themselves are total and never return these.

use thiserror::Error;

/// Result alias used by loaders and report writers
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed scenario JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV failure: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid row at line {line}: {reason}")]
    InvalidRow { line: u64, reason: String },
}
