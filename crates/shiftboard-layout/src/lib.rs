//! # shiftboard-layout
//!
//! Interval layout for shiftboard.
//!
//! This crate provides:
//! - Greedy lane assignment with a minimal lane count ([`lanes`])
//! - Board geometry: worker rows, lanes of positioned bars, axis ticks,
//!   shift markers and the now line ([`board`])
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use shiftboard_core::{Assignment, OperationalWindow, OptimizationResult, Schedule, Worker};
//! use shiftboard_layout::{Board, BoardOptions};
//!
//! let day = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
//! let at = |h: u32| day.and_hms_opt(h, 0, 0).unwrap();
//!
//! let result = OptimizationResult {
//!     schedules: vec![Schedule::new(Worker::new("W1"))
//!         .assignment(Assignment::task("8000", "Pick", at(9), at(11), 40))
//!         .assignment(Assignment::task("8002", "Pack", at(10), at(12), 30))],
//!     unassigned_tasks: vec![],
//! };
//!
//! let window = OperationalWindow::starting_on(day, 8).unwrap();
//! let board = Board::layout(&result, window, &BoardOptions::new(day));
//! assert_eq!(board.rows[0].lanes.len(), 2);
//! ```

pub mod board;
pub mod lanes;

pub use board::{Bar, Board, BoardOptions, ShiftOverlay, WorkerRow};
pub use lanes::{assign_lanes, max_overlap, Interval, Lane};
