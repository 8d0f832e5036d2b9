//! Lane Assignment
//!
//! Greedy interval partitioning: intervals are taken in start order and each
//! one goes into the first lane whose last interval has already ended.
//! Touching endpoints share a lane, so back-to-back tasks stay on one track.
//! Taking intervals by earliest start makes the lane count equal to the peak
//! number of simultaneously running intervals, which is the minimum possible.

use chrono::NaiveDateTime;
use shiftboard_core::Assignment;

/// Anything with a half-open `[start, end)` extent
pub trait Interval {
    fn start(&self) -> NaiveDateTime;
    fn end(&self) -> NaiveDateTime;
}

impl Interval for Assignment {
    fn start(&self) -> NaiveDateTime {
        self.start_time
    }

    fn end(&self) -> NaiveDateTime {
        self.end_time
    }
}

impl<T: Interval + ?Sized> Interval for &T {
    fn start(&self) -> NaiveDateTime {
        (**self).start()
    }

    fn end(&self) -> NaiveDateTime {
        (**self).end()
    }
}

/// A track of non-overlapping intervals, in start order
#[derive(Debug)]
pub struct Lane<'a, T> {
    pub items: Vec<&'a T>,
}

impl<'a, T: Interval> Lane<'a, T> {
    fn open(first: &'a T) -> Self {
        Self { items: vec![first] }
    }

    /// End of the last placed interval
    pub fn available_from(&self) -> Option<NaiveDateTime> {
        self.items.last().map(|item| item.end())
    }

    fn accepts(&self, item: &T) -> bool {
        self.available_from().map_or(true, |free| free <= item.start())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a T> + '_ {
        self.items.iter().copied()
    }
}

/// Partition `items` into the fewest lanes such that no two intervals in a
/// lane overlap. Ties on start go shortest first; identical intervals keep
/// input order.
pub fn assign_lanes<T: Interval>(items: &[T]) -> Vec<Lane<'_, T>> {
    let mut sorted: Vec<&T> = items.iter().collect();
    // a zero-length item must be placed before anything starting at its instant
    sorted.sort_by_key(|item| (item.start(), item.end()));

    let mut lanes: Vec<Lane<'_, T>> = Vec::new();
    for item in sorted {
        match lanes.iter_mut().find(|lane| lane.accepts(item)) {
            Some(lane) => lane.items.push(item),
            None => lanes.push(Lane::open(item)),
        }
    }
    lanes
}

/// Peak number of intervals running at the same instant.
///
/// Ends are processed before starts at the same instant, matching the
/// touching-endpoints rule of [`assign_lanes`]. A zero-length interval
/// overlaps only the intervals running strictly across its instant.
pub fn max_overlap<T: Interval>(items: &[T]) -> usize {
    const END: u8 = 0;
    const POINT: u8 = 1;
    const START: u8 = 2;

    let mut events: Vec<(NaiveDateTime, u8)> = Vec::with_capacity(items.len() * 2);
    for item in items {
        if item.end() <= item.start() {
            events.push((item.start(), POINT));
        } else {
            events.push((item.start(), START));
            events.push((item.end(), END));
        }
    }
    events.sort_unstable();

    let mut running = 0usize;
    let mut peak = 0usize;
    for (_, kind) in events {
        match kind {
            START => {
                running += 1;
                peak = peak.max(running);
            }
            POINT => peak = peak.max(running + 1),
            _ => running -= 1,
        }
    }
    peak
}
