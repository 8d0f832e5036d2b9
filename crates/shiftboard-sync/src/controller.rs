//! Sync controller
//!
//! Owns the view state of one board and reconciles it with the solver.
//!
//! ## Lifecycle
//!
//! ```text
//! Idle ──fetch──▶ Fetching ──ok──▶ Ready ──remove──▶ Mutating ──▶ Ready
//!                    │                                   │
//!                    └──────────err──▶ Error ◀────err────┘
//! ```
//!
//! Mutating operations are serialized through an async operation lock. The
//! state itself sits behind a short-held `RwLock` that is never held across
//! an `.await`; readers take an `Arc` snapshot.
//!
//! Every local mutation bumps a version counter. A fetch that completes
//! after the version moved is discarded instead of overwriting newer local
//! state.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use shiftboard_core::{Assignment, AssignmentId, ClassificationRules, OptimizationResult};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::api::{RemoveAssignmentRequest, SolverApi};
use crate::error::{PreconditionError, SyncError};

/// Where the controller is in its request cycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncState {
    Idle,
    Fetching,
    Ready,
    Mutating,
    Error,
}

/// What happened to a response
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The response replaced the view state
    Applied,
    /// The view moved on while the request was in flight
    Discarded,
}

/// The controller's view of the board
#[derive(Clone, Debug)]
pub struct ViewState {
    pub result: Arc<OptimizationResult>,
    pub state: SyncState,
    pub last_error: Option<SyncError>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            result: Arc::new(OptimizationResult::default()),
            state: SyncState::Idle,
            last_error: None,
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum Load {
    Current,
    Optimize,
}

/// Versioned view state with optimistic removal
pub struct SyncController<C> {
    client: C,
    rules: &'static ClassificationRules,
    view: RwLock<ViewState>,
    op_lock: Mutex<()>,
    version: AtomicU64,
}

impl<C: SolverApi> SyncController<C> {
    pub fn new(client: C) -> Self {
        Self::with_rules(client, ClassificationRules::standard())
    }

    /// Use a custom classification table for fetched results
    pub fn with_rules(client: C, rules: &'static ClassificationRules) -> Self {
        Self {
            client,
            rules,
            view: RwLock::new(ViewState::default()),
            op_lock: Mutex::new(()),
            version: AtomicU64::new(0),
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    // ========================================================================
    // Readers
    // ========================================================================

    /// Current result; later updates never mutate a handed-out snapshot
    pub fn snapshot(&self) -> Arc<OptimizationResult> {
        Arc::clone(&self.read_view().result)
    }

    pub fn state(&self) -> SyncState {
        self.read_view().state
    }

    pub fn last_error(&self) -> Option<SyncError> {
        self.read_view().last_error.clone()
    }

    pub fn version(&self) -> u64 {
        self.version.load(Ordering::SeqCst)
    }

    /// An operation holds the operation lock
    pub fn is_busy(&self) -> bool {
        self.op_lock.try_lock().is_err()
    }

    /// Ignore any response to a request already in flight
    pub fn invalidate(&self) {
        let version = self.bump_version();
        debug!(version, "view invalidated");
    }

    // ========================================================================
    // Operations
    // ========================================================================

    /// Load the current result, replacing the view state on success
    pub async fn fetch_current(&self) -> Result<Outcome, SyncError> {
        let _op = self.op_lock.lock().await;
        self.load(Load::Current).await
    }

    /// Run the optimizer again and adopt its result
    pub async fn re_optimize(&self) -> Result<Outcome, SyncError> {
        let _op = self.op_lock.lock().await;
        self.load(Load::Optimize).await
    }

    /// Remove an assignment from a worker's schedule.
    ///
    /// The assignment disappears locally before the request is sent. On
    /// success exactly one fetch reconciles with the server, which also
    /// supplies the new unassigned tasks. On failure the assignment is put
    /// back where it was and the error is returned.
    pub async fn remove_assignment(
        &self,
        worker_id: &str,
        assignment: &Assignment,
    ) -> Result<Outcome, SyncError> {
        let request = RemoveAssignmentRequest::for_assignment(assignment)?;
        let _op = self.op_lock.lock().await;

        let (index, removed) = self.detach(worker_id, request.assignment_id)?;
        info!(
            worker = worker_id,
            assignment_id = request.assignment_id,
            task = %request.task_name,
            "removing assignment"
        );

        if let Err(err) = self.client.remove_assignment(&request).await {
            warn!(assignment_id = request.assignment_id, error = %err, "remove failed, reverting");
            self.reattach(worker_id, index, removed, err.clone());
            return Err(err);
        }

        self.load(Load::Current).await
    }

    // ========================================================================
    // Internals
    // ========================================================================

    async fn load(&self, kind: Load) -> Result<Outcome, SyncError> {
        let started = self.version();
        let previous = self.transition(SyncState::Fetching);
        debug!(?kind, version = started, "loading");

        let response = match kind {
            Load::Current => self.client.fetch_current().await,
            Load::Optimize => self.client.re_optimize().await,
        };

        let mut view = self.write_view();
        if self.version() != started {
            debug!(started, current = self.version(), "discarding stale response");
            view.state = match previous {
                // Nothing is in flight once this returns
                SyncState::Mutating | SyncState::Fetching if view.last_error.is_some() => {
                    SyncState::Error
                }
                SyncState::Mutating | SyncState::Fetching => SyncState::Ready,
                settled => settled,
            };
            return Ok(Outcome::Discarded);
        }

        match response {
            Ok(mut result) => {
                result.classify(self.rules);
                info!(
                    workers = result.schedules.len(),
                    assignments = result.assignment_count(),
                    unassigned = result.unassigned_tasks.len(),
                    "view updated"
                );
                view.result = Arc::new(result);
                view.state = SyncState::Ready;
                view.last_error = None;
                Ok(Outcome::Applied)
            }
            Err(err) => {
                warn!(error = %err, "load failed, keeping last result");
                view.state = SyncState::Error;
                view.last_error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Check membership and take the assignment out of the local schedule
    fn detach(
        &self,
        worker_id: &str,
        id: AssignmentId,
    ) -> Result<(usize, Assignment), PreconditionError> {
        let mut view = self.write_view();

        let schedule = view
            .result
            .schedule(worker_id)
            .ok_or_else(|| PreconditionError::UnknownWorker(worker_id.to_string()))?;
        if !schedule.assignments.iter().any(|a| a.id == Some(id)) {
            return Err(PreconditionError::NotInSchedule {
                worker: worker_id.to_string(),
                id,
            });
        }

        let detached = Arc::make_mut(&mut view.result)
            .schedule_mut(worker_id)
            .and_then(|schedule| schedule.take_assignment(id))
            .ok_or_else(|| PreconditionError::NotInSchedule {
                worker: worker_id.to_string(),
                id,
            })?;

        view.state = SyncState::Mutating;
        self.bump_version();
        Ok(detached)
    }

    fn reattach(&self, worker_id: &str, index: usize, assignment: Assignment, err: SyncError) {
        let mut view = self.write_view();
        if let Some(schedule) = Arc::make_mut(&mut view.result).schedule_mut(worker_id) {
            schedule.restore_assignment(index, assignment);
        }
        view.state = SyncState::Error;
        view.last_error = Some(err);
        self.bump_version();
    }

    fn transition(&self, next: SyncState) -> SyncState {
        let mut view = self.write_view();
        std::mem::replace(&mut view.state, next)
    }

    fn bump_version(&self) -> u64 {
        self.version.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn read_view(&self) -> RwLockReadGuard<'_, ViewState> {
        self.view.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_view(&self) -> RwLockWriteGuard<'_, ViewState> {
        self.view.write().unwrap_or_else(PoisonError::into_inner)
    }
}
