use ep_core::PersonId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("contact references unknown person {0}")]
    UnknownPerson(PersonId),

    #[error("self-contact on {0}")]
    SelfContact(PersonId),

    #[error("{what} = {value} is outside [0, 1]")]
    OutOfUnitRange { what: &'static str, value: f64 },

    #[error("contact weight {0} must be finite and non-negative")]
    InvalidWeight(f64),

    #[error("active-flag vector has length {got}, graph has {expected} contacts")]
    ContactCountMismatch { expected: usize, got: usize },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type GraphResult<T> = Result<T, GraphError>;
