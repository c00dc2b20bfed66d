//! Decide whether a candidate alarm would collide with the existing schedule.
//!
//! Every scheduled alarm (except the one being edited) is projected over the
//! horizon and each occurrence's active window is tested against the
//! candidate's window with [`gap_is_sufficient`]. Projections are recomputed on
//! every call; there is no index to keep in sync.

use chrono::{Duration, NaiveDateTime};
use log::debug;

use crate::alarm::{Alarm, AlarmId};
use crate::config::EngineConfig;
use crate::projector::project;
use crate::window::{gap_is_sufficient, ActiveWindow};

/// The first scheduled occurrence found too close to a candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interference {
    pub alarm_id: AlarmId,
    /// Wake instant of the colliding occurrence.
    pub occurrence: NaiveDateTime,
    pub window: ActiveWindow,
}

/// Find the first occurrence of any scheduled alarm whose active window leaves
/// less than `config.buffer()` between itself and the candidate's window.
///
/// Alarms whose id equals `exclude` are ignored entirely, so an alarm being
/// edited is not compared against its own previous record.
pub fn find_interference(
    candidate_wake: NaiveDateTime,
    candidate_ramp: Duration,
    scheduled: &[Alarm],
    exclude: Option<AlarmId>,
    config: &EngineConfig,
) -> Option<Interference> {
    let candidate = ActiveWindow::for_occurrence(candidate_wake, candidate_ramp);
    let buffer = config.buffer();
    let horizon = config.horizon();

    scheduled
        .iter()
        .filter(|alarm| Some(alarm.id) != exclude)
        .find_map(|alarm| {
            project(alarm, horizon).find_map(|occurrence| {
                let window = alarm.window_at(occurrence);
                if gap_is_sufficient(&candidate, &window, buffer) {
                    return None;
                }
                debug!(
                    "candidate at {} interferes with alarm {} occurring at {}",
                    candidate_wake, alarm.id, occurrence
                );
                Some(Interference {
                    alarm_id: alarm.id,
                    occurrence,
                    window,
                })
            })
        })
}

/// [`find_interference`] reduced to a yes/no answer.
pub fn check_interference(
    candidate_wake: NaiveDateTime,
    candidate_ramp: Duration,
    scheduled: &[Alarm],
    exclude: Option<AlarmId>,
    config: &EngineConfig,
) -> bool {
    find_interference(candidate_wake, candidate_ramp, scheduled, exclude, config).is_some()
}

/// [`check_interference`] with the reference buffer and horizon.
pub fn interferes(
    candidate_wake: NaiveDateTime,
    candidate_ramp: Duration,
    scheduled: &[Alarm],
    exclude: Option<AlarmId>,
) -> bool {
    check_interference(
        candidate_wake,
        candidate_ramp,
        scheduled,
        exclude,
        &EngineConfig::default(),
    )
}
