//! Solver service interface

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shiftboard_core::{Assignment, AssignmentId, OptimizationResult, TaskId};

use crate::error::{PreconditionError, SyncError};

/// Body of `POST /assignments/optimize/remove`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveAssignmentRequest {
    pub assignment_id: AssignmentId,
    pub task_id: TaskId,
    pub units_assigned: u32,
    pub task_name: String,
}

impl RemoveAssignmentRequest {
    /// Build the request, refusing breaks and unpersisted assignments
    pub fn for_assignment(assignment: &Assignment) -> Result<Self, PreconditionError> {
        if assignment.counts_as_break() {
            return Err(PreconditionError::IsBreak);
        }
        let assignment_id = assignment.id.ok_or(PreconditionError::MissingId)?;
        let task_id = assignment
            .task_id
            .clone()
            .ok_or(PreconditionError::MissingTaskId(assignment_id))?;

        Ok(Self {
            assignment_id,
            task_id,
            units_assigned: assignment.units_assigned,
            task_name: assignment.task_name.clone(),
        })
    }
}

/// The remote optimizer
#[async_trait]
pub trait SolverApi: Send + Sync {
    /// Current optimization result
    async fn fetch_current(&self) -> Result<OptimizationResult, SyncError>;

    /// Run the optimizer again and return its result
    async fn re_optimize(&self) -> Result<OptimizationResult, SyncError>;

    /// Ask the server to drop one assignment; the response body is ignored
    async fn remove_assignment(&self, request: &RemoveAssignmentRequest) -> Result<(), SyncError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn assignment() -> Assignment {
        let day = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        Assignment::task(
            "8000",
            "Pick Paperless",
            day.and_hms_opt(9, 0, 0).unwrap(),
            day.and_hms_opt(11, 0, 0).unwrap(),
            120,
        )
    }

    #[test]
    fn request_uses_camel_case() {
        let request = RemoveAssignmentRequest::for_assignment(&assignment().with_id(42)).unwrap();
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "assignmentId": 42,
                "taskId": "8000",
                "unitsAssigned": 120,
                "taskName": "Pick Paperless"
            })
        );
    }

    #[test]
    fn refuses_breaks_and_missing_ids() {
        let day = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let rest = Assignment::rest(day.and_hms_opt(12, 0, 0).unwrap(), day.and_hms_opt(13, 0, 0).unwrap())
            .with_id(9);
        assert_eq!(
            RemoveAssignmentRequest::for_assignment(&rest),
            Err(PreconditionError::IsBreak)
        );
        assert_eq!(
            RemoveAssignmentRequest::for_assignment(&assignment()),
            Err(PreconditionError::MissingId)
        );

        let mut no_task = assignment().with_id(3);
        no_task.task_id = None;
        assert_eq!(
            RemoveAssignmentRequest::for_assignment(&no_task),
            Err(PreconditionError::MissingTaskId(3))
        );
    }
}
