//! Wall clock ↔ absolute instant conversion.
//!
//! Alarms live on the wall clock so a daily 05:00 alarm stays at 05:00 across
//! DST changes. The OS-level scheduler wants absolute instants, so each
//! occurrence is resolved through an IANA zone right before hand-off.

use chrono::{DateTime, Duration, LocalResult, NaiveDateTime, Offset, TimeZone, Timelike, Utc};
use chrono_tz::Tz;

use crate::error::{EngineError, Result};

/// Longest local-time gap searched when resolving a nonexistent wall time.
const MAX_GAP_MINUTES: i64 = 24 * 60;

/// Policy for wall-clock alarm times that fall in a DST gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DstPolicy {
    /// Drop the occurrence (e.g., 02:30 on spring-forward night).
    Skip,
    /// Fire at the first valid minute after the gap.
    #[default]
    ShiftForward,
    /// Keep the UTC offset in effect before the transition.
    WallClock,
}

pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse()
        .map_err(|_| EngineError::InvalidTimezone(name.to_string()))
}

/// Parse `YYYY-MM-DDTHH:MM` or `YYYY-MM-DDTHH:MM:SS` (a space may replace `T`).
pub fn parse_wall_clock(s: &str) -> Result<NaiveDateTime> {
    const FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ];
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .ok_or_else(|| EngineError::InvalidTimestamp(s.to_string()))
}

pub fn truncate_to_minute(ts: NaiveDateTime) -> NaiveDateTime {
    ts.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(ts)
}

/// The wall-clock minute in `tz` at `instant`.
pub fn wall_clock_now(tz: Tz, instant: DateTime<Utc>) -> NaiveDateTime {
    truncate_to_minute(instant.with_timezone(&tz).naive_local())
}

/// Resolve a wall-clock time in `tz` to an absolute instant.
///
/// Ambiguous times (the repeated hour when clocks fall back) resolve to the
/// earlier instant. Nonexistent times follow `policy`; `None` only comes back
/// for [`DstPolicy::Skip`].
pub fn to_instant(wall: NaiveDateTime, tz: Tz, policy: DstPolicy) -> Option<DateTime<Utc>> {
    match tz.from_local_datetime(&wall) {
        LocalResult::Single(dt) => Some(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Some(earliest.with_timezone(&Utc)),
        LocalResult::None => match policy {
            DstPolicy::Skip => None,
            DstPolicy::ShiftForward => (1..=MAX_GAP_MINUTES).find_map(|m| {
                let shifted = wall.checked_add_signed(Duration::minutes(m))?;
                tz.from_local_datetime(&shifted)
                    .earliest()
                    .map(|dt| dt.with_timezone(&Utc))
            }),
            DstPolicy::WallClock => {
                let before = (1..=MAX_GAP_MINUTES).find_map(|m| {
                    let earlier = wall.checked_sub_signed(Duration::minutes(m))?;
                    tz.from_local_datetime(&earlier).latest()
                })?;
                let offset = Duration::seconds(i64::from(before.offset().fix().local_minus_utc()));
                wall.checked_sub_signed(offset).map(|utc| utc.and_utc())
            }
        },
    }
}
