use ep_core::{Compartment, PersonId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("{person} is recorded as {recorded} but registered under {registered}")]
    PartitionViolation {
        person:     PersonId,
        recorded:   Compartment,
        registered: Compartment,
    },

    #[error("{0} is missing from the registry")]
    Unregistered(PersonId),

    #[error("registry holds {registered} people, population has {population}")]
    CountMismatch { population: usize, registered: usize },

    #[error("{what} length {got} does not match population size {expected}")]
    LengthMismatch {
        expected: usize,
        got:      usize,
        what:     &'static str,
    },
}

pub type AgentResult<T> = Result<T, AgentError>;
