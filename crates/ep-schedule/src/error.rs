use ep_core::{Day, PersonId};
use thiserror::Error;

use crate::ScheduledEvent;

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("{person} already has a terminal event pending on {pending}")]
    TerminalConflict { person: PersonId, pending: Day },

    #[error("event already queued: {0:?}")]
    Duplicate(ScheduledEvent),

    #[error("{0:?} needs a target person")]
    MissingTarget(ScheduledEvent),
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;
