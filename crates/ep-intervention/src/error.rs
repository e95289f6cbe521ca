use ep_core::EpError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InterventionError {
    #[error(transparent)]
    Core(#[from] EpError),

    #[error("{intervention}: {what} must be in [0, 1], got {value}")]
    OutOfUnitRange {
        intervention: &'static str,
        what:         &'static str,
        value:        f64,
    },

    #[error("unknown scenario '{0}'")]
    UnknownScenario(String),

    #[error("intervention parameters are not an object: {0}")]
    BadParams(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type InterventionResult<T> = Result<T, InterventionError>;
