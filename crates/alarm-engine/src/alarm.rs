//! The scheduling-relevant subset of an alarm record.

use std::fmt;

use chrono::{Duration, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::repetition::Repetition;
use crate::window::ActiveWindow;

/// Opaque identity of an alarm, stable across edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlarmId(pub u64);

impl fmt::Display for AlarmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A stored alarm.
///
/// For repeating alarms `start` is the next pending occurrence, not the
/// creation time. The resolver keeps it that way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alarm {
    pub id: AlarmId,
    /// Wall-clock wake instant, minute resolution.
    pub start: NaiveDateTime,
    #[serde(default)]
    pub is_light_alarm: bool,
    /// Length of the light ramp that precedes `start`.
    #[serde(
        rename = "light_alarm_minutes",
        with = "minutes",
        default = "Duration::zero"
    )]
    pub light_alarm_duration: Duration,
    #[serde(default)]
    pub repetition: Repetition,
    /// Original occurrence the repeating schedule is computed from, once the
    /// resolver has moved `start` away from it. `None` means `start` is the
    /// anchor. Callers clear it when the user edits the alarm.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor: Option<NaiveDateTime>,
}

impl Alarm {
    /// A one-shot alarm without a light ramp.
    pub fn new(id: u64, start: NaiveDateTime) -> Self {
        Self {
            id: AlarmId(id),
            start,
            is_light_alarm: false,
            light_alarm_duration: Duration::zero(),
            repetition: Repetition::None,
            anchor: None,
        }
    }

    pub fn with_light_alarm(mut self, duration: Duration) -> Self {
        self.is_light_alarm = true;
        self.light_alarm_duration = duration;
        self
    }

    pub fn with_repetition(mut self, repetition: Repetition) -> Self {
        self.repetition = repetition;
        self
    }

    /// The instant occurrence `k = 0` of the schedule falls on.
    pub fn anchor(&self) -> NaiveDateTime {
        self.anchor.unwrap_or(self.start)
    }

    /// Effective ramp duration; zero unless this is a light alarm.
    pub fn ramp(&self) -> Duration {
        if self.is_light_alarm {
            self.light_alarm_duration
        } else {
            Duration::zero()
        }
    }

    /// The active window of one occurrence of this alarm.
    pub fn window_at(&self, occurrence: NaiveDateTime) -> ActiveWindow {
        ActiveWindow::for_occurrence(occurrence, self.ramp())
    }

    /// Check the preconditions the engine relies on.
    ///
    /// # Errors
    /// Returns `EngineError::InvalidAlarm` when `start` or `anchor` carries
    /// seconds, when the anchor lies after `start`, when the light-alarm duration
    /// is negative or not a whole number of minutes, or when a light alarm has a
    /// zero-length ramp.
    pub fn validate(&self) -> Result<()> {
        if has_seconds(self.start) {
            return Err(self.invalid(format!(
                "start {} has sub-minute precision",
                self.start
            )));
        }
        if let Some(anchor) = self.anchor {
            if has_seconds(anchor) {
                return Err(self.invalid(format!("anchor {anchor} has sub-minute precision")));
            }
            if anchor > self.start {
                return Err(self.invalid(format!(
                    "anchor {anchor} is after start {}",
                    self.start
                )));
            }
        }

        let duration = self.light_alarm_duration;
        if duration < Duration::zero() {
            return Err(self.invalid("negative light alarm duration".to_string()));
        }
        if duration != Duration::minutes(duration.num_minutes()) {
            return Err(self.invalid(
                "light alarm duration is not a whole number of minutes".to_string(),
            ));
        }
        if self.is_light_alarm && duration.is_zero() {
            return Err(self.invalid("light alarm with a zero-length ramp".to_string()));
        }

        Ok(())
    }

    fn invalid(&self, reason: String) -> EngineError {
        EngineError::InvalidAlarm {
            id: self.id.0,
            reason,
        }
    }
}

fn has_seconds(ts: NaiveDateTime) -> bool {
    ts.second() != 0 || ts.nanosecond() != 0
}

/// Serde adapter storing a `Duration` as whole minutes.
mod minutes {
    use chrono::Duration;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(duration.num_minutes())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let minutes = i64::deserialize(deserializer)?;
        Duration::try_minutes(minutes)
            .ok_or_else(|| D::Error::custom(format!("duration of {minutes} minutes is out of range")))
    }
}
