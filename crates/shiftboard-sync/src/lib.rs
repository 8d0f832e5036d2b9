//! # shiftboard-sync
//!
//! Solver communication and view-state reconciliation for shiftboard.
//!
//! This crate provides:
//! - The [`SolverApi`] seam and its reqwest implementation ([`HttpSolverClient`])
//! - [`SyncController`]: fetch, re-optimize and optimistic remove-and-resync
//!   with versioned discard of stale responses
//!
//! ## Example
//!
//! ```rust,ignore
//! use shiftboard_sync::{HttpSolverClient, SyncController, DEFAULT_BASE_URL};
//!
//! let controller = SyncController::new(HttpSolverClient::new(DEFAULT_BASE_URL)?);
//! controller.fetch_current().await?;
//!
//! let snapshot = controller.snapshot();
//! let schedule = snapshot.schedule("W001").unwrap();
//! controller.remove_assignment("W001", &schedule.assignments[0]).await?;
//! ```

pub mod api;
pub mod controller;
pub mod error;
pub mod http;

pub use api::{RemoveAssignmentRequest, SolverApi};
pub use controller::{Outcome, SyncController, SyncState, ViewState};
pub use error::{PreconditionError, SyncError};
pub use http::{HttpSolverClient, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
