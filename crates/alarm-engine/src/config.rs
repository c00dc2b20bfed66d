//! Engine constants and optional JSON configuration.

use std::fs;
use std::path::Path;

use chrono::{Duration, Months};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::clock;
use crate::error::{EngineError, Result};

/// Minimum quiet gap between two alarms' active windows.
pub const ALARM_START_BUFFER_MINUTES: i64 = 5;

/// How far past a repeating alarm's `start` the interference check looks.
pub const PROJECTION_HORIZON_MONTHS: u32 = 12;

/// Ramp length offered to the user for a new light alarm. Not used by the
/// engine itself.
pub const DEFAULT_LIGHT_ALARM_DURATION_MINUTES: i64 = 30;

/// Engine settings. Every field falls back to the reference constant when
/// absent from the JSON file.
///
/// This is deployment configuration read by the host application, never a
/// user preference: the buffer and horizon stay fixed for the end user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Minimum gap between active windows; [`ALARM_START_BUFFER_MINUTES`] unless
    /// the operator's config file overrides it.
    pub buffer_minutes: i64,
    pub horizon_months: u32,
    pub default_light_alarm_minutes: i64,
    /// IANA zone used to turn wall-clock alarms into absolute instants.
    pub timezone: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            buffer_minutes: ALARM_START_BUFFER_MINUTES,
            horizon_months: PROJECTION_HORIZON_MONTHS,
            default_light_alarm_minutes: DEFAULT_LIGHT_ALARM_DURATION_MINUTES,
            timezone: "UTC".to_string(),
        }
    }
}

impl EngineConfig {
    /// Read and validate a JSON config file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    /// Returns `EngineError::Config` for negative durations and
    /// `EngineError::InvalidTimezone` for an unknown zone.
    pub fn validate(&self) -> Result<()> {
        if self.buffer_minutes < 0 {
            return Err(EngineError::Config(format!(
                "buffer_minutes must not be negative, got {}",
                self.buffer_minutes
            )));
        }
        if self.default_light_alarm_minutes < 0 {
            return Err(EngineError::Config(format!(
                "default_light_alarm_minutes must not be negative, got {}",
                self.default_light_alarm_minutes
            )));
        }
        if Duration::try_minutes(self.buffer_minutes).is_none() {
            return Err(EngineError::Config(format!(
                "buffer_minutes {} is out of range",
                self.buffer_minutes
            )));
        }
        self.tz().map(|_| ())
    }

    pub fn buffer(&self) -> Duration {
        Duration::try_minutes(self.buffer_minutes).unwrap_or(Duration::MAX)
    }

    pub fn horizon(&self) -> Months {
        Months::new(self.horizon_months)
    }

    pub fn default_light_alarm_duration(&self) -> Duration {
        Duration::try_minutes(self.default_light_alarm_minutes).unwrap_or(Duration::zero())
    }

    pub fn tz(&self) -> Result<Tz> {
        clock::parse_timezone(&self.timezone)
    }
}
