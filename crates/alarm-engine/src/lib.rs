//! # alarm-engine
//!
//! Temporal-consistency core for an alarm clock.
//!
//! Two pure components sit on top of a few small time helpers:
//!
//! - the **outdated alarm resolver**, run once per session, which discards
//!   missed one-shot alarms and moves missed repeating alarms to their first
//!   occurrence at or after "now";
//! - the **interference detector**, run before every create/edit, which decides
//!   whether a candidate alarm's active window comes too close to any projected
//!   occurrence of the already scheduled alarms.
//!
//! Neither component owns the alarm list. Callers pass it in and apply the
//! results to their own storage and OS-level scheduler.
//!
//! ## Modules
//!
//! - [`alarm`] — `Alarm`, `AlarmId` and pre-engine validation
//! - [`repetition`] — the closed `Repetition` enum and its period arithmetic
//! - [`projector`] — lazy, horizon-bounded occurrence iterator
//! - [`window`] — active windows and the sufficient-gap test
//! - [`interference`] — candidate-vs-schedule collision detection
//! - [`resolver`] — outdated alarm resolution
//! - [`clock`] — wall clock ↔ UTC instant conversion with DST policies
//! - [`config`] — engine constants and JSON config loading
//! - [`error`] — Error types

pub mod alarm;
pub mod clock;
pub mod config;
pub mod error;
pub mod interference;
pub mod projector;
pub mod repetition;
pub mod resolver;
pub mod window;

pub use alarm::{Alarm, AlarmId};
pub use clock::DstPolicy;
pub use config::{
    EngineConfig, ALARM_START_BUFFER_MINUTES, DEFAULT_LIGHT_ALARM_DURATION_MINUTES,
    PROJECTION_HORIZON_MONTHS,
};
pub use error::EngineError;
pub use interference::{check_interference, find_interference, interferes, Interference};
pub use projector::{project, Occurrences};
pub use repetition::Repetition;
pub use resolver::{apply_actions, resolve, resolve_outdated, Action};
pub use window::{gap_is_sufficient, ActiveWindow};
