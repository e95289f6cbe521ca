//! Base error type.
//!
//! Sub-crates define their own error enums and wrap `EpError` as one variant
//! via `#[from]`, so configuration and parse failures raised here surface
//! unchanged at the engine boundary.

use thiserror::Error;

use crate::PersonId;

#[derive(Debug, Error)]
pub enum EpError {
    #[error("person {0} not found")]
    PersonNotFound(PersonId),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("unknown intervention {0:?}")]
    UnknownIntervention(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for all `ep-*` crates.
pub type EpResult<T> = Result<T, EpError>;
