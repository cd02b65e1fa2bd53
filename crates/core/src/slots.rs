//! Appointment availability computation.
//!
//! Open slots for a professional on a given date are computed by subtracting
//! busy intervals (existing appointments and blocked hours) from the
//! professional's working window, then walking the remainder on a fixed
//! step. Everything here is pure; the binaries load the inputs from the
//! database and serialize the output.

use chrono::{Duration, NaiveTime};
use serde::Serialize;

/// A half-open interval of wall-clock time, `[start, end)`.
///
/// Intervals where `end <= start` are empty and never conflict with
/// anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeSlot {
    /// Inclusive start.
    pub start: NaiveTime,
    /// Exclusive end.
    pub end: NaiveTime,
}

impl TimeSlot {
    /// Create a slot.
    #[must_use]
    pub const fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    /// Whether the interval contains no time at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Whether two half-open intervals share any time.
    ///
    /// Touching endpoints do not overlap: a busy interval ending at 10:00
    /// leaves a 10:00 slot free.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.start < other.end && other.start < self.end
    }
}

/// Compute the open start times within a working window.
///
/// Candidates are generated from `window.start` on a `step_minutes` grid;
/// a candidate survives if its `[start, start + duration)` interval fits
/// inside the window and overlaps no busy interval. Busy intervals may be
/// unsorted, overlapping, or lie (partially) outside the window.
///
/// A `duration_minutes` or `step_minutes` of zero yields no slots, as does
/// a window the service cannot fit into. Candidates never cross midnight:
/// a window is a same-day interval by construction.
#[must_use]
pub fn available_starts(
    window: TimeSlot,
    duration_minutes: u32,
    step_minutes: u32,
    busy: &[TimeSlot],
) -> Vec<NaiveTime> {
    if duration_minutes == 0 || step_minutes == 0 || window.is_empty() {
        return Vec::new();
    }

    let duration = Duration::minutes(i64::from(duration_minutes));
    let step = Duration::minutes(i64::from(step_minutes));

    let mut open = Vec::new();
    let mut start = window.start;

    loop {
        // overflowing_add_signed wraps past midnight and reports the carry;
        // a wrapped candidate no longer lies inside a same-day window.
        let (end, wrapped_days) = start.overflowing_add_signed(duration);
        if wrapped_days != 0 || end > window.end {
            break;
        }

        let candidate = TimeSlot::new(start, end);
        if !busy.iter().any(|b| candidate.overlaps(b)) {
            open.push(start);
        }

        let (next, wrapped_days) = start.overflowing_add_signed(step);
        if wrapped_days != 0 {
            break;
        }
        start = next;
    }

    open
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn slot(sh: u32, sm: u32, eh: u32, em: u32) -> TimeSlot {
        TimeSlot::new(t(sh, sm), t(eh, em))
    }

    #[test]
    fn test_overlap_touching_endpoints_do_not_conflict() {
        let a = slot(9, 0, 10, 0);
        let b = slot(10, 0, 11, 0);
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn test_overlap_partial_and_contained() {
        let a = slot(9, 0, 10, 0);
        assert!(a.overlaps(&slot(9, 30, 10, 30)));
        assert!(a.overlaps(&slot(8, 0, 9, 1)));
        assert!(a.overlaps(&slot(9, 15, 9, 45)));
        assert!(slot(8, 0, 12, 0).overlaps(&a));
    }

    #[test]
    fn test_overlap_empty_interval_never_conflicts() {
        let zero = slot(9, 30, 9, 30);
        let inverted = slot(11, 0, 10, 0);
        let a = slot(9, 0, 10, 0);
        assert!(!a.overlaps(&zero));
        assert!(!zero.overlaps(&a));
        assert!(!a.overlaps(&inverted));
    }

    #[test]
    fn test_free_day_yields_full_grid() {
        let starts = available_starts(slot(9, 0, 12, 0), 60, 60, &[]);
        assert_eq!(starts, vec![t(9, 0), t(10, 0), t(11, 0)]);
    }

    #[test]
    fn test_step_finer_than_duration() {
        let starts = available_starts(slot(9, 0, 10, 30), 60, 30, &[]);
        // 9:00 and 9:30 fit; 10:00 would end past the window.
        assert_eq!(starts, vec![t(9, 0), t(9, 30)]);
    }

    #[test]
    fn test_busy_interval_removes_overlapping_candidates() {
        let busy = [slot(10, 0, 11, 0)];
        let starts = available_starts(slot(9, 0, 13, 0), 60, 30, &busy);
        // Anything starting in (9:00..=9:30] would run into 10:00; the slot
        // starting exactly at 11:00 is free again.
        assert_eq!(
            starts,
            vec![t(9, 0), t(11, 0), t(11, 30), t(12, 0)],
        );
    }

    #[test]
    fn test_busy_intervals_unsorted_and_overlapping() {
        let busy = [slot(11, 0, 12, 0), slot(9, 30, 10, 30), slot(10, 0, 11, 30)];
        let starts = available_starts(slot(9, 0, 13, 0), 30, 30, &busy);
        assert_eq!(starts, vec![t(9, 0), t(12, 0), t(12, 30)]);
    }

    #[test]
    fn test_busy_swallows_whole_window() {
        let busy = [slot(8, 0, 18, 0)];
        assert!(available_starts(slot(9, 0, 12, 0), 30, 30, &busy).is_empty());
    }

    #[test]
    fn test_busy_outside_window_is_ignored() {
        let busy = [slot(7, 0, 8, 0), slot(14, 0, 15, 0)];
        let starts = available_starts(slot(9, 0, 11, 0), 60, 60, &busy);
        assert_eq!(starts, vec![t(9, 0), t(10, 0)]);
    }

    #[test]
    fn test_zero_length_busy_is_ignored() {
        let busy = [slot(9, 30, 9, 30)];
        let starts = available_starts(slot(9, 0, 11, 0), 60, 60, &busy);
        assert_eq!(starts, vec![t(9, 0), t(10, 0)]);
    }

    #[test]
    fn test_duration_longer_than_window() {
        assert!(available_starts(slot(9, 0, 10, 0), 90, 15, &[]).is_empty());
    }

    #[test]
    fn test_duration_exactly_fills_window() {
        let starts = available_starts(slot(9, 0, 10, 0), 60, 15, &[]);
        assert_eq!(starts, vec![t(9, 0)]);
    }

    #[test]
    fn test_empty_window() {
        assert!(available_starts(slot(9, 0, 9, 0), 30, 15, &[]).is_empty());
        assert!(available_starts(slot(10, 0, 9, 0), 30, 15, &[]).is_empty());
    }

    #[test]
    fn test_zero_duration_or_step() {
        assert!(available_starts(slot(9, 0, 12, 0), 0, 15, &[]).is_empty());
        assert!(available_starts(slot(9, 0, 12, 0), 30, 0, &[]).is_empty());
    }

    #[test]
    fn test_window_ending_at_midnight_does_not_wrap() {
        let window = TimeSlot::new(t(23, 0), NaiveTime::from_hms_opt(23, 59, 59).unwrap());
        let starts = available_starts(window, 30, 15, &[]);
        assert_eq!(starts, vec![t(23, 0), t(23, 15)]);
    }
}
