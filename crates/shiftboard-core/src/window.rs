//! Operational Window
//!
//! The display axis is a rolling 24 hour window that may start at any hour
//! (08:00 → 08:00 next day in most warehouses) and therefore crosses a
//! calendar-day boundary. All placement here is pure: the current time is
//! only ever passed in by the caller.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::ModelError;

/// Length of every operational window
pub const WINDOW_HOURS: i64 = 24;

/// Default first hour of the operational day
pub const DEFAULT_START_HOUR: u32 = 8;

/// Horizontal placement of an interval, in percent of the window
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub offset_percent: f64,
    pub width_percent: f64,
}

impl Placement {
    pub fn is_visible(&self) -> bool {
        self.width_percent > 0.0
    }

    pub fn end_percent(&self) -> f64 {
        self.offset_percent + self.width_percent
    }
}

/// An hourly tick on the time axis
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AxisTick {
    /// Hours since the window start (0..=24)
    pub index: u32,
    pub offset_percent: f64,
    /// Hour of the wall clock at this tick
    pub hour_of_day: u32,
    /// Tick falls on a later calendar day than the window start
    pub next_day: bool,
    /// Labelled tick
    pub major: bool,
    /// e.g. "04:00+1"
    pub label: Option<String>,
}

/// The rolling 24h display axis
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationalWindow {
    start: NaiveDateTime,
}

impl OperationalWindow {
    pub fn new(start: NaiveDateTime) -> Self {
        Self { start }
    }

    /// Window beginning at `start_hour` on `date`
    pub fn starting_on(date: NaiveDate, start_hour: u32) -> Result<Self, ModelError> {
        let time = NaiveTime::from_hms_opt(start_hour, 0, 0)
            .ok_or(ModelError::InvalidStartHour(start_hour))?;
        Ok(Self::new(date.and_time(time)))
    }

    /// Window whose span contains `instant`; an instant before `start_hour`
    /// belongs to the previous day's window
    pub fn containing(instant: NaiveDateTime, start_hour: u32) -> Result<Self, ModelError> {
        let window = Self::starting_on(instant.date(), start_hour)?;
        if instant < window.start {
            Ok(Self::new(window.start - Duration::hours(WINDOW_HOURS)))
        } else {
            Ok(window)
        }
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.start + Duration::hours(WINDOW_HOURS)
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start.date()
    }

    pub fn span(&self) -> Duration {
        Duration::hours(WINDOW_HOURS)
    }

    /// Inclusive at both ends
    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        instant >= self.start && instant <= self.end()
    }

    /// Same window shifted by whole days
    pub fn shifted_days(&self, days: i64) -> Self {
        Self::new(self.start + Duration::days(days))
    }

    fn clamp(&self, instant: NaiveDateTime) -> NaiveDateTime {
        instant.clamp(self.start, self.end())
    }

    fn percent_of_span(&self, d: Duration) -> f64 {
        let span = self.span().num_milliseconds() as f64;
        d.num_milliseconds() as f64 / span * 100.0
    }

    /// Map `[start, end)` onto the window, clamping to its bounds
    pub fn place(&self, start: NaiveDateTime, end: NaiveDateTime) -> Placement {
        let clamped_start = self.clamp(start);
        let clamped_end = self.clamp(end);

        let offset = self.percent_of_span(clamped_start - self.start);
        let width = self.percent_of_span(clamped_end - clamped_start);

        Placement {
            offset_percent: offset.max(0.0),
            width_percent: width.max(0.0),
        }
    }

    /// Position of a point marker (now line, shift edge) or `None` when the
    /// instant is outside the window
    pub fn marker(&self, instant: NaiveDateTime) -> Option<f64> {
        self.contains(instant)
            .then(|| self.percent_of_span(instant - self.start))
    }

    /// Position of the first midnight strictly inside the window
    pub fn midnight_offset(&self) -> Option<f64> {
        let next_midnight = self.start_date().succ_opt()?.and_hms_opt(0, 0, 0)?;
        (next_midnight < self.end()).then(|| self.percent_of_span(next_midnight - self.start))
    }

    /// "HH:MM" with a day offset suffix ("+1", "-1") relative to the window's
    /// start date
    pub fn day_label(&self, instant: NaiveDateTime) -> String {
        let days = (instant.date() - self.start_date()).num_days();
        let time = instant.format("%H:%M");
        match days {
            0 => time.to_string(),
            d if d > 0 => format!("{time}+{d}"),
            d => format!("{time}{d}"),
        }
    }

    /// Hourly ticks from the window start to its end, labelled every
    /// `label_every` hours
    pub fn ticks(&self, label_every: u32) -> Vec<AxisTick> {
        let label_every = label_every.max(1);
        (0..=WINDOW_HOURS as u32)
            .map(|index| {
                let at = self.start + Duration::hours(index as i64);
                let major = index % label_every == 0;
                AxisTick {
                    index,
                    offset_percent: index as f64 / WINDOW_HOURS as f64 * 100.0,
                    hour_of_day: at.hour(),
                    next_day: at.date() > self.start_date(),
                    major,
                    label: major.then(|| self.day_label(at)),
                }
            })
            .collect()
    }
}
