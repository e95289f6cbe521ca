use thiserror::Error;

/// Rejected disease configurations.  Raised at construction, never mid-run.
#[derive(Debug, Error)]
pub enum DiseaseError {
    #[error("R0 {0} must be in [0, 20]")]
    R0OutOfRange(f64),

    #[error("{what} = {value} must be in [0, 1]")]
    ProbabilityOutOfRange { what: String, value: f64 },

    #[error("severity probabilities sum to {0}, expected 1 (±0.01)")]
    SeverityNotNormalised(f64),

    #[error("{what} period has invalid mean {mean} / std {std}")]
    InvalidPeriod { what: &'static str, mean: f64, std: f64 },

    #[error("seasonality peak day {0} must be below 365")]
    SeasonalityPeak(u32),

    #[error("unknown disease preset {0:?}")]
    UnknownPreset(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type DiseaseResult<T> = Result<T, DiseaseError>;
