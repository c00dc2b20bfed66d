//! Expand an alarm into its concrete occurrences within a look-ahead horizon.
//!
//! Occurrences follow the alarm's anchored schedule (see [`Alarm::anchor`]),
//! beginning with the first one at or after `start`. The projection is a lazy
//! iterator. Cloning it, or calling [`project`] again,
//! restarts from the alarm's `start`.

use chrono::{Months, NaiveDateTime};

use crate::alarm::Alarm;
use crate::repetition::Repetition;

/// Occurrences of one alarm, from `start` up to and including `start + horizon`.
#[derive(Debug, Clone)]
pub struct Occurrences {
    anchor: NaiveDateTime,
    repetition: Repetition,
    limit: NaiveDateTime,
    next_index: Option<u32>,
}

impl Occurrences {
    /// The last instant an occurrence may fall on.
    pub fn limit(&self) -> NaiveDateTime {
        self.limit
    }
}

impl Iterator for Occurrences {
    type Item = NaiveDateTime;

    fn next(&mut self) -> Option<NaiveDateTime> {
        let k = self.next_index?;
        match self.repetition.nth_occurrence(self.anchor, k) {
            Some(occurrence) if occurrence <= self.limit => {
                self.next_index = if self.repetition.is_repeating() {
                    k.checked_add(1)
                } else {
                    None
                };
                Some(occurrence)
            }
            _ => {
                self.next_index = None;
                None
            }
        }
    }
}

/// Project `alarm` over `horizon`.
///
/// A one-shot alarm yields exactly its `start`. A horizon that runs past the
/// end of the calendar is treated as unbounded.
pub fn project(alarm: &Alarm, horizon: Months) -> Occurrences {
    let limit = alarm
        .start
        .checked_add_months(horizon)
        .unwrap_or(NaiveDateTime::MAX);
    let (anchor, next_index) = if alarm.repetition.is_repeating() {
        let anchor = alarm.anchor();
        (anchor, alarm.repetition.first_index_at_or_after(anchor, alarm.start))
    } else {
        (alarm.start, Some(0))
    };
    Occurrences {
        anchor,
        repetition: alarm.repetition,
        limit,
        next_index,
    }
}
