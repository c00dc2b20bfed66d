//! Resolve alarms that were missed while the device was off or the app closed.
//!
//! A missed one-shot alarm is discarded rather than fired late. A missed
//! repeating alarm moves to the first occurrence of its original schedule at
//! or after `now`. An occurrence exactly at `now` is kept, not skipped.
//!
//! The original schedule is the one anchored at [`Alarm::anchor`]. Applying a
//! reschedule records that anchor, so a monthly alarm on the 31st that was
//! clamped to the 28th in February returns to the 31st in March.

use chrono::NaiveDateTime;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::alarm::{Alarm, AlarmId};

/// What the caller should do with one stored alarm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "start", rename_all = "lowercase")]
pub enum Action {
    /// Still pending; leave it alone.
    Keep,
    /// Remove from storage and cancel with the OS scheduler.
    Discard,
    /// Replace `start` with the given occurrence and reschedule.
    Reschedule(NaiveDateTime),
}

/// Resolve a single alarm against `now`.
///
/// Total: a repeating alarm whose next occurrence is not representable in the
/// calendar is discarded.
pub fn resolve(alarm: &Alarm, now: NaiveDateTime) -> Action {
    if alarm.start >= now {
        return Action::Keep;
    }

    if !alarm.repetition.is_repeating() {
        debug!("discarding missed one-shot alarm {} ({})", alarm.id, alarm.start);
        return Action::Discard;
    }

    let anchor = alarm.anchor();
    let next = alarm
        .repetition
        .first_index_at_or_after(anchor, now)
        .and_then(|k| alarm.repetition.nth_occurrence(anchor, k));

    match next {
        Some(candidate) => {
            debug!(
                "rescheduling {} alarm {} from {} to {}",
                alarm.repetition, alarm.id, alarm.start, candidate
            );
            Action::Reschedule(candidate)
        }
        None => {
            debug!(
                "discarding {} alarm {}: no occurrence after {} is representable",
                alarm.repetition, alarm.id, alarm.start
            );
            Action::Discard
        }
    }
}

/// Resolve every alarm in `alarms`, in order.
pub fn resolve_outdated(alarms: &[Alarm], now: NaiveDateTime) -> Vec<(AlarmId, Action)> {
    alarms
        .iter()
        .map(|alarm| (alarm.id, resolve(alarm, now)))
        .collect()
}

/// Apply resolver output to the alarm list it was computed from.
///
/// `actions[i]` applies to `alarms[i]`, as returned by [`resolve_outdated`], so
/// records sharing an id are still handled one by one. Discarded alarms are
/// dropped; rescheduled ones get their new `start` and keep their schedule
/// anchor. Alarms without a matching action are kept unchanged.
pub fn apply_actions(alarms: Vec<Alarm>, actions: &[(AlarmId, Action)]) -> Vec<Alarm> {
    alarms
        .into_iter()
        .enumerate()
        .filter_map(|(i, mut alarm)| {
            let action = match actions.get(i) {
                Some((id, action)) if *id == alarm.id => *action,
                Some((id, _)) => {
                    warn!("action for alarm {} does not match alarm {} at position {}", id, alarm.id, i);
                    Action::Keep
                }
                None => Action::Keep,
            };
            match action {
                Action::Discard => None,
                Action::Reschedule(start) => {
                    alarm.anchor = Some(alarm.anchor());
                    alarm.start = start;
                    Some(alarm)
                }
                Action::Keep => Some(alarm),
            }
        })
        .collect()
}
