//! Shift resolution
//!
//! Turns a recurring [`ShiftTemplate`] (time of day only) into absolute
//! start/end instants anchored on the date of the worker's first assignment.
//! A template whose end time of day is earlier than its start crosses
//! midnight and ends on the following day.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::window::OperationalWindow;
use crate::{Schedule, ShiftTemplate};

/// A shift pinned to absolute instants
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedShift {
    pub name: Option<String>,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl ResolvedShift {
    /// Anchor a template on `date`; the template itself is left untouched
    pub fn resolve(template: &ShiftTemplate, date: NaiveDate) -> Self {
        let name = Some(template.shift_name.trim())
            .filter(|n| !n.is_empty())
            .map(str::to_string);
        Self::from_times(name, template.start_time, template.end_time, date)
    }

    pub fn from_times(
        name: Option<String>,
        start_time: NaiveTime,
        end_time: NaiveTime,
        date: NaiveDate,
    ) -> Self {
        let start = date.and_time(start_time);
        let end_date = if end_time < start_time {
            date + Duration::days(1)
        } else {
            date
        };
        Self {
            name,
            start,
            end: end_date.and_time(end_time),
        }
    }

    pub fn crosses_midnight(&self) -> bool {
        crosses_midnight(self.start, self.end)
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// "Night: 22:00–06:00+1", day offsets relative to the window start
    pub fn label(&self, window: &OperationalWindow) -> String {
        let range = format!("{}–{}", window.day_label(self.start), window.day_label(self.end));
        match &self.name {
            Some(name) => format!("{name}: {range}"),
            None => range,
        }
    }
}

/// Calendar date the interval ends on is later than the one it starts on
pub fn crosses_midnight(start: NaiveDateTime, end: NaiveDateTime) -> bool {
    end.date() > start.date()
}

/// Date shifts are anchored on: the first assignment's date, else `fallback`
pub fn anchor_date(schedule: &Schedule, fallback: NaiveDate) -> NaiveDate {
    schedule.first_assignment_date().unwrap_or(fallback)
}

/// Effective shift of a worker.
///
/// The first shift template wins. Without templates, precomputed
/// `shiftStart`/`shiftEnd` instants from the solver are used as-is.
pub fn resolve_for_schedule(schedule: &Schedule, fallback: NaiveDate) -> Option<ResolvedShift> {
    if let Some(template) = schedule.worker.shifts.first() {
        return Some(ResolvedShift::resolve(template, anchor_date(schedule, fallback)));
    }

    match (schedule.shift_start, schedule.shift_end) {
        (Some(start), Some(end)) => Some(ResolvedShift {
            name: schedule.shift_name.clone().filter(|n| !n.is_empty()),
            start,
            end,
        }),
        _ => None,
    }
}
