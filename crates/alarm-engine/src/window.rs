//! Active windows and the sufficient-gap test between two of them.
//!
//! This is deliberately not an interval-overlap check. Two windows are fine
//! together only when one ends, plus the buffer, no later than the other
//! begins. Touching exactly at the buffer boundary is allowed.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// The half-open span `[wake - ramp, wake)` during which a light alarm ramps
/// up to its audible wake instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveWindow {
    pub ramp_start: NaiveDateTime,
    pub wake: NaiveDateTime,
}

impl ActiveWindow {
    /// Window for an occurrence waking at `wake` with a ramp of `ramp`.
    ///
    /// A zero ramp gives an empty window at `wake`.
    pub fn for_occurrence(wake: NaiveDateTime, ramp: Duration) -> Self {
        let ramp_start = wake
            .checked_sub_signed(ramp)
            .unwrap_or(NaiveDateTime::MIN);
        Self { ramp_start, wake }
    }

    pub fn ramp(&self) -> Duration {
        self.wake - self.ramp_start
    }
}

/// Whether `x` and `y` leave at least `buffer` between them, in either order.
///
/// ```text
/// (x.wake + buffer <= y.ramp_start) || (y.wake + buffer <= x.ramp_start)
/// ```
pub fn gap_is_sufficient(x: &ActiveWindow, y: &ActiveWindow, buffer: Duration) -> bool {
    fits_before(x, y, buffer) || fits_before(y, x, buffer)
}

fn fits_before(first: &ActiveWindow, second: &ActiveWindow, buffer: Duration) -> bool {
    match first.wake.checked_add_signed(buffer) {
        Some(earliest_next) => earliest_next <= second.ramp_start,
        // Nothing can start after the end of the calendar.
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn hm(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn window(wake: NaiveDateTime, ramp_minutes: i64) -> ActiveWindow {
        ActiveWindow::for_occurrence(wake, Duration::minutes(ramp_minutes))
    }

    #[test]
    fn window_spans_ramp_before_wake() {
        let w = window(hm(5, 0), 30);
        assert_eq!(w.ramp_start, hm(4, 30));
        assert_eq!(w.wake, hm(5, 0));
        assert_eq!(w.ramp(), Duration::minutes(30));
    }

    #[test]
    fn exact_buffer_is_sufficient() {
        let a = window(hm(5, 0), 30);
        let b = window(hm(5, 35), 30);
        assert!(gap_is_sufficient(&a, &b, Duration::minutes(5)));
        assert!(gap_is_sufficient(&b, &a, Duration::minutes(5)));
    }

    #[test]
    fn one_minute_short_is_not() {
        let a = window(hm(5, 0), 30);
        let b = window(hm(5, 34), 30);
        assert!(!gap_is_sufficient(&a, &b, Duration::minutes(5)));
        assert!(!gap_is_sufficient(&b, &a, Duration::minutes(5)));
    }

    #[test]
    fn containment_and_overlap_interfere() {
        let outer = window(hm(6, 0), 60);
        let inner = window(hm(5, 30), 10);
        assert!(!gap_is_sufficient(&outer, &inner, Duration::zero()));

        let partial = window(hm(6, 15), 30);
        assert!(!gap_is_sufficient(&outer, &partial, Duration::zero()));
    }

    #[test]
    fn identical_zero_ramp_alarms_need_a_zero_buffer() {
        let a = window(hm(7, 0), 0);
        assert!(gap_is_sufficient(&a, &a, Duration::zero()));
        assert!(!gap_is_sufficient(&a, &a, Duration::minutes(1)));
    }
}
