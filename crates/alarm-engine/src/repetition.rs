//! Repetition kinds and their period arithmetic.
//!
//! Every occurrence is computed from the alarm's anchor `start` as
//! `start + k * period`, never by stepping from the previous occurrence. For
//! `Monthly` this matters: calendar months clamp to the last valid day of the
//! target month, and anchoring keeps a 31st-of-the-month alarm on the 31st in
//! every month that has one instead of drifting to the 28th after February.

use std::fmt;

use chrono::{Datelike, Duration, Months, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// How an alarm repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Repetition {
    /// One-shot alarm; exactly one occurrence.
    #[default]
    None,
    /// Every day at the same wall-clock time.
    Daily,
    /// Every seven days at the same wall-clock time.
    Weekly,
    /// Every calendar month on the same day, clamped to short months.
    Monthly,
}

impl Repetition {
    pub fn is_repeating(self) -> bool {
        !matches!(self, Repetition::None)
    }

    /// The `k`-th occurrence of a schedule anchored at `start` (`k = 0` is
    /// `start` itself).
    ///
    /// Returns `None` for `k > 0` on a one-shot alarm, and when the result
    /// falls outside the representable calendar range.
    pub fn nth_occurrence(self, start: NaiveDateTime, k: u32) -> Option<NaiveDateTime> {
        if k == 0 {
            return Some(start);
        }
        match self {
            Repetition::None => None,
            Repetition::Daily => start.checked_add_signed(Duration::try_days(i64::from(k))?),
            Repetition::Weekly => start.checked_add_signed(Duration::try_weeks(i64::from(k))?),
            Repetition::Monthly => start.checked_add_months(Months::new(k)),
        }
    }

    /// Index of the first occurrence of the schedule anchored at `anchor` that
    /// falls at or after `target`.
    ///
    /// Returns `None` when there is no such occurrence: a one-shot alarm whose
    /// anchor is before `target`, or a calendar overflow.
    pub fn first_index_at_or_after(self, anchor: NaiveDateTime, target: NaiveDateTime) -> Option<u32> {
        if target <= anchor {
            return Some(0);
        }
        if !self.is_repeating() {
            return None;
        }

        let mut k = self.index_lower_bound(anchor, target);
        loop {
            if self.nth_occurrence(anchor, k)? >= target {
                return Some(k);
            }
            k = k.checked_add(1)?;
        }
    }

    /// An index whose occurrence is strictly before `target` (or zero), so the
    /// forward scan in `first_index_at_or_after` never starts past the answer.
    fn index_lower_bound(self, anchor: NaiveDateTime, target: NaiveDateTime) -> u32 {
        let elapsed = target - anchor;
        let whole_periods = match self {
            Repetition::None => 0,
            Repetition::Daily => elapsed.num_days(),
            Repetition::Weekly => elapsed.num_weeks(),
            Repetition::Monthly => {
                i64::from(target.year() - anchor.year()) * 12 + i64::from(target.month())
                    - i64::from(anchor.month())
            }
        };
        u32::try_from((whole_periods - 1).max(0)).unwrap_or(u32::MAX)
    }
}

impl fmt::Display for Repetition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Repetition::None => "none",
            Repetition::Daily => "daily",
            Repetition::Weekly => "weekly",
            Repetition::Monthly => "monthly",
        };
        f.write_str(name)
    }
}
