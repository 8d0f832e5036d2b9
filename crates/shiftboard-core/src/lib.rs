//! # shiftboard-core
//!
//! Core domain model for the shiftboard workforce schedule board.
//!
//! This crate provides:
//! - Domain types: `Worker`, `Skill`, `ShiftTemplate`, `Assignment`, `Schedule`,
//!   `UnassignedTask`, `OptimizationResult`
//! - The 24h operational window and its time-axis mapping ([`window`])
//! - Shift resolution across midnight ([`shift`])
//! - Task classification and skill matching ([`skill`])
//! - Error types
//!
//! Wire names follow the solver's JSON: camelCase for schedules and
//! assignments, snake_case for unassigned tasks.
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use shiftboard_core::{Assignment, Schedule, Worker};
//!
//! let day = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
//! let at = |h: u32| day.and_hms_opt(h, 0, 0).unwrap();
//!
//! let schedule = Schedule::new(Worker::new("W1").name("Aiko"))
//!     .assignment(Assignment::task("8000", "Pick Paperless", at(9), at(11), 120).with_id(1))
//!     .assignment(Assignment::rest(at(12), at(13)));
//!
//! assert_eq!(schedule.assignments.len(), 2);
//! assert!(schedule.assignments[1].counts_as_break());
//! ```

pub mod shift;
pub mod skill;
pub mod window;

pub use shift::ResolvedShift;
pub use skill::{ClassificationRules, SkillMatch, TaskCategory, TaskClass};
pub use window::{AxisTick, OperationalWindow, Placement};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Type Aliases
// ============================================================================

/// Unique identifier for a worker
pub type WorkerId = String;

/// Identifier of a task in the solver's task catalogue
pub type TaskId = String;

/// Numeric skill identifier (e.g. 200 = pick paperless)
pub type SkillId = u32;

/// Persisted assignment identifier
pub type AssignmentId = i64;

// ============================================================================
// Worker
// ============================================================================

/// A declared proficiency of a worker
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    pub skill_id: SkillId,
    #[serde(default, alias = "name")]
    pub skill_name: String,
    /// Proficiency level, 1 (novice) to 4 (expert)
    #[serde(alias = "level")]
    pub skill_level: u8,
    /// Productivity in percent of the nominal rate
    #[serde(default)]
    pub productivity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub process_skill_sub_category_cd: Option<i64>,
}

impl Skill {
    pub fn new(skill_id: SkillId, name: impl Into<String>, level: u8) -> Self {
        Self {
            skill_id,
            skill_name: name.into(),
            skill_level: level,
            productivity: 100.0,
            process_skill_sub_category_cd: None,
        }
    }

    pub fn productivity(mut self, percent: f64) -> Self {
        self.productivity = percent;
        self
    }
}

/// A recurring shift expressed in time of day
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftTemplate {
    #[serde(default)]
    pub shift_id: i64,
    #[serde(default, alias = "name")]
    pub shift_name: String,
    #[serde(with = "wire::time_of_day")]
    pub start_time: NaiveTime,
    #[serde(with = "wire::time_of_day")]
    pub end_time: NaiveTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_of_week: Option<String>,
}

impl ShiftTemplate {
    pub fn new(name: impl Into<String>, start_time: NaiveTime, end_time: NaiveTime) -> Self {
        Self {
            shift_id: 0,
            shift_name: name.into(),
            start_time,
            end_time,
            day_of_week: None,
        }
    }

    /// End time of day is earlier than start time of day
    pub fn wraps_midnight(&self) -> bool {
        self.end_time < self.start_time
    }
}

/// A worker with skills and shift templates
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Worker {
    #[serde(rename = "workerId", deserialize_with = "wire::string_or_number")]
    pub id: WorkerId,
    #[serde(rename = "workerName", default)]
    pub name: String,
    #[serde(default)]
    pub skills: Vec<Skill>,
    #[serde(default)]
    pub shifts: Vec<ShiftTemplate>,
}

impl Worker {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            skills: Vec::new(),
            shifts: Vec::new(),
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn skill(mut self, skill: Skill) -> Self {
        self.skills.push(skill);
        self
    }

    pub fn shift(mut self, shift: ShiftTemplate) -> Self {
        self.shifts.push(shift);
        self
    }

    /// Look up a declared skill
    pub fn get_skill(&self, skill_id: SkillId) -> Option<&Skill> {
        self.skills.iter().find(|s| s.skill_id == skill_id)
    }

    /// "Name (ID)" as shown in row headers
    pub fn display_label(&self) -> String {
        format!("{} ({})", self.name, self.id)
    }
}

// ============================================================================
// Assignment
// ============================================================================

/// A time-bounded piece of work (or a rest break) on a worker's schedule
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    /// Persisted id; absent for breaks that were never stored
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<AssignmentId>,
    /// Task reference; `None` marks a break
    #[serde(default, deserialize_with = "wire::option_string_or_number")]
    pub task_id: Option<TaskId>,
    #[serde(default)]
    pub task_name: String,
    #[serde(with = "wire::instant")]
    pub start_time: NaiveDateTime,
    #[serde(with = "wire::instant")]
    pub end_time: NaiveDateTime,
    #[serde(default)]
    pub units_assigned: u32,
    #[serde(default, alias = "break")]
    pub is_break: bool,
    /// Cached classification, filled by [`OptimizationResult::classify`]
    #[serde(skip)]
    pub class: Option<TaskClass>,
}

impl Assignment {
    /// Create a task assignment
    pub fn task(
        task_id: impl Into<String>,
        task_name: impl Into<String>,
        start: NaiveDateTime,
        end: NaiveDateTime,
        units: u32,
    ) -> Self {
        Self {
            id: None,
            task_id: Some(task_id.into()),
            task_name: task_name.into(),
            start_time: start,
            end_time: end,
            units_assigned: units,
            is_break: false,
            class: None,
        }
    }

    /// Create a rest break
    pub fn rest(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            id: None,
            task_id: None,
            task_name: "Break".into(),
            start_time: start,
            end_time: end,
            units_assigned: 0,
            is_break: true,
            class: None,
        }
    }

    pub fn with_id(mut self, id: AssignmentId) -> Self {
        self.id = Some(id);
        self
    }

    /// Break flag, a `BREAK` task id, or a task literally named "break"
    pub fn counts_as_break(&self) -> bool {
        self.is_break
            || self
                .task_id
                .as_deref()
                .is_some_and(|id| id.eq_ignore_ascii_case("break"))
            || self.task_name.trim().eq_ignore_ascii_case("break")
    }

    pub fn duration(&self) -> chrono::Duration {
        self.end_time - self.start_time
    }

    /// Check the `end > start` invariant
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.end_time <= self.start_time {
            return Err(ModelError::InvalidInterval {
                task: self.display_name().to_string(),
                start: self.start_time,
                end: self.end_time,
            });
        }
        Ok(())
    }

    /// Classification, cached when available
    pub fn task_class(&self) -> TaskClass {
        self.class
            .unwrap_or_else(|| ClassificationRules::standard().classify(self))
    }

    /// Name shown on bars and in tables
    pub fn display_name(&self) -> &str {
        if self.counts_as_break() {
            "Break"
        } else if self.task_name.is_empty() {
            self.task_id.as_deref().unwrap_or("-")
        } else {
            &self.task_name
        }
    }
}

// ============================================================================
// Schedule
// ============================================================================

/// One worker's assignments for an operational day
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    #[serde(flatten)]
    pub worker: Worker,
    #[serde(default)]
    pub assignments: Vec<Assignment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shift_name: Option<String>,
    #[serde(default, with = "wire::optional_instant", skip_serializing_if = "Option::is_none")]
    pub shift_start: Option<NaiveDateTime>,
    #[serde(default, with = "wire::optional_instant", skip_serializing_if = "Option::is_none")]
    pub shift_end: Option<NaiveDateTime>,
}

impl Schedule {
    pub fn new(worker: Worker) -> Self {
        Self {
            worker,
            assignments: Vec::new(),
            shift_name: None,
            shift_start: None,
            shift_end: None,
        }
    }

    pub fn assignment(mut self, assignment: Assignment) -> Self {
        self.assignments.push(assignment);
        self
    }

    pub fn worker_id(&self) -> &str {
        &self.worker.id
    }

    /// Calendar date of the first listed assignment
    pub fn first_assignment_date(&self) -> Option<NaiveDate> {
        self.assignments.first().map(|a| a.start_time.date())
    }

    /// Detach an assignment by id, returning its former position
    pub fn take_assignment(&mut self, id: AssignmentId) -> Option<(usize, Assignment)> {
        let index = self.assignments.iter().position(|a| a.id == Some(id))?;
        Some((index, self.assignments.remove(index)))
    }

    /// Put a detached assignment back where it was
    pub fn restore_assignment(&mut self, index: usize, assignment: Assignment) {
        let index = index.min(self.assignments.len());
        self.assignments.insert(index, assignment);
    }
}

// ============================================================================
// Solver result
// ============================================================================

/// A task the solver could not fully place
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnassignedTask {
    #[serde(deserialize_with = "wire::string_or_number")]
    pub id: TaskId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_name: Option<String>,
    #[serde(default)]
    pub remaining_units: u32,
}

/// Everything the solver returns in one response
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationResult {
    #[serde(default)]
    pub schedules: Vec<Schedule>,
    #[serde(default)]
    pub unassigned_tasks: Vec<UnassignedTask>,
}

impl OptimizationResult {
    pub fn schedule(&self, worker_id: &str) -> Option<&Schedule> {
        self.schedules.iter().find(|s| s.worker.id == worker_id)
    }

    pub fn schedule_mut(&mut self, worker_id: &str) -> Option<&mut Schedule> {
        self.schedules.iter_mut().find(|s| s.worker.id == worker_id)
    }

    pub fn assignment_count(&self) -> usize {
        self.schedules.iter().map(|s| s.assignments.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.assignment_count() == 0
    }

    /// Earliest assignment start across all workers
    pub fn earliest_start(&self) -> Option<NaiveDateTime> {
        self.schedules
            .iter()
            .flat_map(|s| s.assignments.iter())
            .map(|a| a.start_time)
            .min()
    }

    /// Classify every assignment once and cache the result on it
    pub fn classify(&mut self, rules: &ClassificationRules) {
        for assignment in self.schedules.iter_mut().flat_map(|s| s.assignments.iter_mut()) {
            assignment.class = Some(rules.classify(assignment));
        }
    }

    /// Same result with classifications cached
    pub fn classified(mut self, rules: &ClassificationRules) -> Self {
        self.classify(rules);
        self
    }

    /// Total units the solver left unplaced
    pub fn unassigned_units(&self) -> u32 {
        self.unassigned_tasks.iter().map(|t| t.remaining_units).sum()
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Domain model error
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Invalid interval for '{task}': end {end} is not after start {start}")]
    InvalidInterval {
        task: String,
        start: NaiveDateTime,
        end: NaiveDateTime,
    },

    #[error("Invalid window start hour: {0} (expected 0-23)")]
    InvalidStartHour(u32),

    #[error("Invalid time value: {0}")]
    InvalidTime(String),

    #[error("Invalid classification pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

// ============================================================================
// Wire helpers
// ============================================================================

/// Serde adapters for the solver's JSON
pub mod wire {
    use chrono::{DateTime, NaiveDateTime, NaiveTime};
    use serde::de::{self, Deserializer};
    use serde::Deserialize;

    const INSTANT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

    /// Parse a local date-time; an RFC 3339 offset is reduced to local wall time
    pub fn parse_instant(s: &str) -> Option<NaiveDateTime> {
        let s = s.trim();
        for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
                return Some(dt);
            }
        }
        DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.naive_local())
    }

    /// Parse "HH:MM" or "HH:MM:SS"
    pub fn parse_time_of_day(s: &str) -> Option<NaiveTime> {
        let s = s.trim();
        NaiveTime::parse_from_str(s, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
            .ok()
    }

    pub mod instant {
        use super::*;
        use serde::Serializer;

        pub fn serialize<S: Serializer>(value: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
            s.collect_str(&value.format(INSTANT_FORMAT))
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
            let raw = String::deserialize(d)?;
            parse_instant(&raw)
                .ok_or_else(|| de::Error::custom(format!("invalid date-time: {raw}")))
        }
    }

    pub mod optional_instant {
        use super::*;
        use serde::Serializer;

        pub fn serialize<S: Serializer>(
            value: &Option<NaiveDateTime>,
            s: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(v) => s.collect_str(&v.format(INSTANT_FORMAT)),
                None => s.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            d: D,
        ) -> Result<Option<NaiveDateTime>, D::Error> {
            match Option::<String>::deserialize(d)? {
                None => Ok(None),
                Some(raw) if raw.trim().is_empty() => Ok(None),
                Some(raw) => parse_instant(&raw)
                    .map(Some)
                    .ok_or_else(|| de::Error::custom(format!("invalid date-time: {raw}"))),
            }
        }
    }

    pub mod time_of_day {
        use super::*;
        use serde::Serializer;

        pub fn serialize<S: Serializer>(value: &NaiveTime, s: S) -> Result<S::Ok, S::Error> {
            s.collect_str(&value.format("%H:%M"))
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveTime, D::Error> {
            let raw = String::deserialize(d)?;
            parse_time_of_day(&raw)
                .ok_or_else(|| de::Error::custom(format!("invalid time of day: {raw}")))
        }
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        String(String),
        Int(i64),
        Float(f64),
    }

    impl From<StringOrNumber> for String {
        fn from(value: StringOrNumber) -> Self {
            match value {
                StringOrNumber::String(s) => s,
                StringOrNumber::Int(n) => n.to_string(),
                StringOrNumber::Float(f) => f.to_string(),
            }
        }
    }

    /// Identifier that the solver may send as a string or a number
    pub fn string_or_number<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        StringOrNumber::deserialize(d).map(String::from)
    }

    pub fn option_string_or_number<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<Option<String>, D::Error> {
        Ok(Option::<StringOrNumber>::deserialize(d)?.map(String::from))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, day)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    #[test]
    fn break_detection_variants() {
        let mut a = Assignment::task("BREAK", "Lunch", at(10, 12, 0), at(10, 13, 0), 0);
        assert!(a.counts_as_break());

        a.task_id = Some("8000".into());
        a.task_name = "  break ".into();
        assert!(a.counts_as_break());

        a.task_name = "Pick".into();
        assert!(!a.counts_as_break());

        assert!(Assignment::rest(at(10, 12, 0), at(10, 13, 0)).counts_as_break());
    }

    #[test]
    fn validate_rejects_inverted_interval() {
        let ok = Assignment::task("1", "Pack", at(10, 9, 0), at(10, 10, 0), 5);
        assert!(ok.validate().is_ok());

        let bad = Assignment::task("1", "Pack", at(10, 10, 0), at(10, 9, 0), 5);
        assert!(matches!(
            bad.validate(),
            Err(ModelError::InvalidInterval { .. })
        ));

        let zero = Assignment::task("1", "Pack", at(10, 9, 0), at(10, 9, 0), 5);
        assert!(zero.validate().is_err());
    }

    #[test]
    fn deserialize_solver_payload() {
        let json = r#"{
            "schedules": [{
                "workerId": "W001",
                "workerName": "Aiko Tanaka",
                "assignments": [
                    {"id": 41, "taskId": "8000", "taskName": "Pick Paperless",
                     "startTime": "2025-03-10T09:00:00", "endTime": "2025-03-10T11:30:00",
                     "unitsAssigned": 240, "isBreak": false},
                    {"taskId": null, "taskName": "Break",
                     "startTime": "2025-03-10T12:00", "endTime": "2025-03-10T12:45",
                     "unitsAssigned": 0, "isBreak": true}
                ],
                "skills": [{"skillId": 200, "skillName": "Pick Paperless", "skillLevel": 4, "productivity": 110}],
                "shifts": [{"shiftId": 3, "shiftName": "Day", "startTime": "08:00:00", "endTime": "17:00:00", "dayOfWeek": "MONDAY"}]
            }],
            "unassignedTasks": [{"id": 7002, "remaining_units": 35, "task_name": "Sort"}]
        }"#;

        let result: OptimizationResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.schedules.len(), 1);

        let schedule = &result.schedules[0];
        assert_eq!(schedule.worker_id(), "W001");
        assert_eq!(schedule.worker.name, "Aiko Tanaka");
        assert_eq!(schedule.assignments[0].id, Some(41));
        assert_eq!(schedule.assignments[0].end_time, at(10, 11, 30));
        assert!(schedule.assignments[1].is_break);
        assert_eq!(schedule.assignments[1].task_id, None);
        assert_eq!(schedule.worker.skills[0].skill_level, 4);
        assert_eq!(
            schedule.worker.shifts[0].start_time,
            NaiveTime::from_hms_opt(8, 0, 0).unwrap()
        );

        assert_eq!(result.unassigned_tasks[0].id, "7002");
        assert_eq!(result.unassigned_tasks[0].remaining_units, 35);
        assert_eq!(result.unassigned_tasks[0].task_name.as_deref(), Some("Sort"));
    }

    #[test]
    fn serialize_keeps_mixed_wire_casing() {
        let result = OptimizationResult {
            schedules: vec![Schedule::new(Worker::new("W1")).assignment(
                Assignment::task("7000", "Receive", at(10, 8, 0), at(10, 9, 0), 10).with_id(5),
            )],
            unassigned_tasks: vec![UnassignedTask {
                id: "7001".into(),
                task_name: None,
                remaining_units: 3,
            }],
        };

        let value = serde_json::to_value(&result).unwrap();
        let assignment = &value["schedules"][0]["assignments"][0];
        assert_eq!(value["schedules"][0]["workerId"], "W1");
        assert_eq!(assignment["taskId"], "7000");
        assert_eq!(assignment["startTime"], "2025-03-10T08:00:00");
        assert_eq!(assignment["unitsAssigned"], 10);
        assert_eq!(assignment["isBreak"], false);
        assert_eq!(value["unassignedTasks"][0]["remaining_units"], 3);
        assert!(value["unassignedTasks"][0].get("task_name").is_none());
    }

    #[test]
    fn missing_lists_default_to_empty() {
        let result: OptimizationResult = serde_json::from_str("{}").unwrap();
        assert!(result.schedules.is_empty());
        assert!(result.unassigned_tasks.is_empty());
        assert!(result.is_empty());
    }

    #[test]
    fn offset_timestamps_keep_wall_time() {
        assert_eq!(
            wire::parse_instant("2025-03-10T22:15:00+09:00"),
            Some(at(10, 22, 15))
        );
        assert_eq!(wire::parse_instant("not a time"), None);
    }

    #[test]
    fn take_and_restore_assignment() {
        let mut schedule = Schedule::new(Worker::new("W1"))
            .assignment(Assignment::task("a", "A", at(10, 9, 0), at(10, 10, 0), 1).with_id(1))
            .assignment(Assignment::task("b", "B", at(10, 10, 0), at(10, 11, 0), 1).with_id(2))
            .assignment(Assignment::task("c", "C", at(10, 11, 0), at(10, 12, 0), 1).with_id(3));

        let (index, taken) = schedule.take_assignment(2).unwrap();
        assert_eq!(index, 1);
        assert_eq!(taken.task_name, "B");
        assert_eq!(schedule.assignments.len(), 2);
        assert!(schedule.take_assignment(2).is_none());

        schedule.restore_assignment(index, taken);
        let names: Vec<_> = schedule.assignments.iter().map(|a| a.task_name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[test]
    fn classify_caches_on_every_assignment() {
        let mut result = OptimizationResult {
            schedules: vec![Schedule::new(Worker::new("W1"))
                .assignment(Assignment::task("8000", "Pick Paperless", at(10, 9, 0), at(10, 10, 0), 1))
                .assignment(Assignment::rest(at(10, 10, 0), at(10, 10, 30)))],
            unassigned_tasks: vec![],
        };
        result.classify(ClassificationRules::standard());

        let assignments = &result.schedules[0].assignments;
        assert!(assignments.iter().all(|a| a.class.is_some()));
        assert_eq!(assignments[0].task_class().category, TaskCategory::Pick);
        assert_eq!(assignments[0].task_class().required_skill, Some(200));
        assert_eq!(assignments[1].task_class().category, TaskCategory::Break);
    }
}
