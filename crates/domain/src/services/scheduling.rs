//! Schedule overlap rules.
//!
//! A schedule occupies its guard for the half-open window
//! `[date + shift.start, date + shift.end)`. When the shift ends at or before it
//! starts, the window runs into the next day. Two non-cancelled schedules of the
//! same guard must never have overlapping windows.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

/// Absolute time window of one scheduled shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl ShiftWindow {
    pub fn new(date: NaiveDate, start_time: NaiveTime, end_time: NaiveTime) -> Self {
        let start = date.and_time(start_time);
        let mut end = date.and_time(end_time);
        if end_time <= start_time {
            end += Duration::days(1);
        }
        Self { start, end }
    }

    /// Half-open overlap: windows that merely touch do not overlap.
    pub fn overlaps(&self, other: &ShiftWindow) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// An existing schedule's window, as loaded for an overlap check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledWindow {
    pub schedule_id: i64,
    pub window: ShiftWindow,
}

impl ScheduledWindow {
    pub fn new(
        schedule_id: i64,
        date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> Self {
        Self {
            schedule_id,
            window: ShiftWindow::new(date, start_time, end_time),
        }
    }
}

/// Dates whose schedules can overlap a schedule on `date`: the day before
/// (overnight shifts reaching into `date`), the day itself, and the day after.
pub fn neighbouring_dates(date: NaiveDate) -> Vec<NaiveDate> {
    [date.pred_opt(), Some(date), date.succ_opt()]
        .into_iter()
        .flatten()
        .collect()
}

/// Returns the id of the first existing schedule whose window overlaps `candidate`.
pub fn find_conflict<I>(candidate: &ShiftWindow, existing: I) -> Option<i64>
where
    I: IntoIterator<Item = ScheduledWindow>,
{
    existing
        .into_iter()
        .find(|scheduled| scheduled.window.overlaps(candidate))
        .map(|scheduled| scheduled.schedule_id)
}

/// A committed schedule together with the template times it currently uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookedShift {
    pub schedule_id: i64,
    pub guard_id: i64,
    pub shift_id: i64,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

/// Checks the guards' committed schedules as if shift `shift_id` ran from
/// `start_time` to `end_time`.
///
/// Returns the id of a schedule that would collide with one booked on the
/// retimed shift. `booked` must hold every committed schedule of each guard
/// that uses the shift.
pub fn retimed_shift_conflict(
    shift_id: i64,
    start_time: NaiveTime,
    end_time: NaiveTime,
    booked: &[BookedShift],
) -> Option<i64> {
    let mut by_guard: BTreeMap<i64, Vec<(ScheduledWindow, bool)>> = BTreeMap::new();
    for entry in booked {
        let retimed = entry.shift_id == shift_id;
        let (start, end) = if retimed {
            (start_time, end_time)
        } else {
            (entry.start_time, entry.end_time)
        };
        by_guard
            .entry(entry.guard_id)
            .or_default()
            .push((ScheduledWindow::new(entry.schedule_id, entry.date, start, end), retimed));
    }

    for mut windows in by_guard.into_values() {
        windows.sort_by_key(|(w, _)| (w.window.start, w.schedule_id));
        let mut reach: Option<(ScheduledWindow, bool)> = None;
        for (current, retimed) in windows {
            if let Some((earlier, earlier_retimed)) = reach {
                if current.window.start < earlier.window.end {
                    // Name the schedule that was not moved when there is one.
                    let id = if retimed && !earlier_retimed {
                        earlier.schedule_id
                    } else {
                        current.schedule_id
                    };
                    return Some(id);
                }
                if current.window.end <= earlier.window.end {
                    continue;
                }
            }
            reach = Some((current, retimed));
        }
    }
    None
}
