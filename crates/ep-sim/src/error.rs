use ep_agent::AgentError;
use ep_core::{Day, EpError};
use ep_disease::DiseaseError;
use ep_graph::GraphError;
use ep_intervention::InterventionError;
use ep_schedule::ScheduleError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("no checkpoint for {0}")]
    UnknownCheckpoint(Day),

    #[error("snapshot {what} has length {got}, graph needs {expected}")]
    SnapshotMismatch {
        expected: usize,
        got:      usize,
        what:     &'static str,
    },

    #[error("snapshot format version {found} is not supported (expected {expected})")]
    SnapshotVersion { found: u32, expected: u32 },

    #[error(transparent)]
    Core(#[from] EpError),

    #[error(transparent)]
    Disease(#[from] DiseaseError),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Agent(#[from] AgentError),

    #[error(transparent)]
    Intervention(#[from] InterventionError),

    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SimResult<T> = Result<T, SimError>;
