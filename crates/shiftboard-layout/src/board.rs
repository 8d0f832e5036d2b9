//! Board geometry
//!
//! Combines the operational window, shift resolution, lane assignment and
//! skill matching into renderer-neutral geometry: one row per worker, one
//! track per lane, bars positioned in percent of the window.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use shiftboard_core::shift::{self, ResolvedShift};
use shiftboard_core::{
    Assignment, AssignmentId, AxisTick, OperationalWindow, OptimizationResult, Placement, Schedule,
    Skill, SkillMatch, TaskCategory, TaskId, UnassignedTask, WorkerId,
};

use crate::lanes::{assign_lanes, max_overlap};

/// Layout options
#[derive(Clone, Debug)]
pub struct BoardOptions {
    /// Label every N hours on the axis
    pub label_every_hours: u32,
    /// Current time for the now line; `None` hides it
    pub now: Option<NaiveDateTime>,
    /// Anchor date for shifts of workers without assignments
    pub fallback_date: NaiveDate,
}

impl BoardOptions {
    pub fn new(fallback_date: NaiveDate) -> Self {
        Self {
            label_every_hours: 4,
            now: None,
            fallback_date,
        }
    }

    pub fn now(mut self, now: NaiveDateTime) -> Self {
        self.now = Some(now);
        self
    }

    pub fn label_every_hours(mut self, hours: u32) -> Self {
        self.label_every_hours = hours;
        self
    }
}

/// A positioned assignment
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Bar {
    pub assignment_id: Option<AssignmentId>,
    pub task_id: Option<TaskId>,
    /// Task name, or "Break"
    pub name: String,
    /// "Pick Paperless (120)" or "Break"
    pub label: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub start_label: String,
    pub end_label: String,
    pub placement: Placement,
    pub category: TaskCategory,
    pub skill_match: SkillMatch,
    pub is_break: bool,
    pub units: u32,
    /// Next bar in the lane starts exactly when this one ends
    pub abuts_next: bool,
    pub crosses_midnight: bool,
    pub tooltip: String,
}

impl Bar {
    fn build(assignment: &Assignment, skills: &[Skill], window: &OperationalWindow) -> Self {
        let is_break = assignment.counts_as_break();
        let class = assignment.task_class();
        let skill_match = SkillMatch::evaluate(skills, assignment);
        let start_label = window.day_label(assignment.start_time);
        let end_label = window.day_label(assignment.end_time);

        let (label, tooltip) = if is_break {
            ("Break".to_string(), format!("Break\n{start_label} - {end_label}"))
        } else {
            let name = assignment.display_name();
            (
                format!("{} ({})", name, assignment.units_assigned),
                format!(
                    "{}\nUnits: {}\n{} - {}\n{}",
                    name,
                    assignment.units_assigned,
                    start_label,
                    end_label,
                    skill_match.tooltip()
                ),
            )
        };

        Self {
            assignment_id: assignment.id,
            task_id: assignment.task_id.clone(),
            name: assignment.display_name().to_string(),
            label,
            start: assignment.start_time,
            end: assignment.end_time,
            start_label,
            end_label,
            placement: window.place(assignment.start_time, assignment.end_time),
            category: class.category,
            skill_match,
            is_break,
            units: assignment.units_assigned,
            abuts_next: false,
            crosses_midnight: shift::crosses_midnight(assignment.start_time, assignment.end_time),
            tooltip,
        }
    }
}

/// Shift start/end markers of one worker
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ShiftOverlay {
    pub label: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub start_offset: Option<f64>,
    pub end_offset: Option<f64>,
    pub crosses_midnight: bool,
}

impl ShiftOverlay {
    fn build(resolved: &ResolvedShift, window: &OperationalWindow) -> Self {
        Self {
            label: resolved.label(window),
            start: resolved.start,
            end: resolved.end,
            start_offset: window.marker(resolved.start),
            end_offset: window.marker(resolved.end),
            crosses_midnight: resolved.crosses_midnight(),
        }
    }
}

/// One worker's row
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WorkerRow {
    pub worker_id: WorkerId,
    pub worker_name: String,
    /// "Name (ID)"
    pub label: String,
    pub skills: Vec<Skill>,
    pub shift: Option<ShiftOverlay>,
    pub lanes: Vec<Vec<Bar>>,
    /// Assignments running at the same time at peak
    pub peak_overlap: usize,
}

impl WorkerRow {
    pub fn layout(schedule: &Schedule, window: &OperationalWindow, fallback_date: NaiveDate) -> Self {
        let skills = &schedule.worker.skills;

        let lanes = assign_lanes(&schedule.assignments)
            .into_iter()
            .map(|lane| {
                let mut bars: Vec<Bar> = lane.iter().map(|a| Bar::build(a, skills, window)).collect();
                for i in 1..bars.len() {
                    if bars[i - 1].end == bars[i].start {
                        bars[i - 1].abuts_next = true;
                    }
                }
                bars
            })
            .collect();

        let shift = shift::resolve_for_schedule(schedule, fallback_date)
            .map(|resolved| ShiftOverlay::build(&resolved, window));

        Self {
            worker_id: schedule.worker.id.clone(),
            worker_name: schedule.worker.name.clone(),
            label: schedule.worker.display_label(),
            skills: skills.clone(),
            shift,
            lanes,
            peak_overlap: max_overlap(&schedule.assignments),
        }
    }

    pub fn bar_count(&self) -> usize {
        self.lanes.iter().map(Vec::len).sum()
    }
}

/// Everything a renderer needs for one operational day
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Board {
    pub window: OperationalWindow,
    pub ticks: Vec<AxisTick>,
    pub midnight_offset: Option<f64>,
    pub now_offset: Option<f64>,
    pub rows: Vec<WorkerRow>,
    pub unassigned: Vec<UnassignedTask>,
}

impl Board {
    pub fn layout(
        result: &OptimizationResult,
        window: OperationalWindow,
        options: &BoardOptions,
    ) -> Self {
        let rows = result
            .schedules
            .iter()
            .map(|schedule| WorkerRow::layout(schedule, &window, options.fallback_date))
            .collect();

        Self {
            ticks: window.ticks(options.label_every_hours),
            midnight_offset: window.midnight_offset(),
            now_offset: options.now.and_then(|now| window.marker(now)),
            rows,
            unassigned: result.unassigned_tasks.clone(),
            window,
        }
    }

    pub fn bar_count(&self) -> usize {
        self.rows.iter().map(WorkerRow::bar_count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.bar_count() == 0
    }

    pub fn row(&self, worker_id: &str) -> Option<&WorkerRow> {
        self.rows.iter().find(|r| r.worker_id == worker_id)
    }
}
