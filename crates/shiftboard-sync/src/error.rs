//! Sync errors

use std::time::Duration;

use shiftboard_core::{AssignmentId, WorkerId};
use thiserror::Error;

/// Why a removal was refused before any request went out
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PreconditionError {
    #[error("breaks cannot be removed")]
    IsBreak,

    #[error("assignment has no persisted id")]
    MissingId,

    #[error("assignment {0} has no task id")]
    MissingTaskId(AssignmentId),

    #[error("unknown worker '{0}'")]
    UnknownWorker(WorkerId),

    #[error("assignment {id} is not on the schedule of worker '{worker}'")]
    NotInSchedule { worker: WorkerId, id: AssignmentId },
}

/// Solver communication error
#[derive(Clone, Debug, Error)]
pub enum SyncError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Server returned {status}: {body}")]
    Server { status: u16, body: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Cannot remove assignment: {0}")]
    Precondition(#[from] PreconditionError),
}

impl SyncError {
    /// The request never left the process
    pub fn is_precondition(&self) -> bool {
        matches!(self, SyncError::Precondition(_))
    }
}
