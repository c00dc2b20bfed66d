//! Tests for interference detection between a candidate and the schedule.

use alarm_engine::{
    check_interference, find_interference, interferes, Alarm, AlarmId, EngineConfig, Repetition,
};
use chrono::{Duration, NaiveDate, NaiveDateTime};

/// Helper to build a wall-clock minute.
fn at(year: i32, month: u32, day: u32, hour: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(hour, min, 0)
        .unwrap()
}

fn minutes(m: i64) -> Duration {
    Duration::minutes(m)
}

/// Alarm A: 05:00 with a 30-minute ramp (window 04:30-05:00).
fn alarm_a() -> Alarm {
    Alarm::new(1, at(2026, 3, 1, 5, 0)).with_light_alarm(minutes(30))
}

#[test]
fn candidate_exactly_one_buffer_after_is_allowed() {
    // Candidate window 05:05-05:35, gap to A is exactly 5 minutes.
    assert!(!interferes(at(2026, 3, 1, 5, 35), minutes(30), &[alarm_a()], None));
}

#[test]
fn candidate_one_minute_inside_buffer_interferes() {
    // Candidate window 05:04-05:34, gap to A is 4 minutes.
    assert!(interferes(at(2026, 3, 1, 5, 34), minutes(30), &[alarm_a()], None));
}

#[test]
fn candidate_before_needs_buffer_too() {
    // Candidate wakes 04:25, A's ramp starts 04:30.
    assert!(!interferes(at(2026, 3, 1, 4, 25), minutes(10), &[alarm_a()], None));
    assert!(interferes(at(2026, 3, 1, 4, 26), minutes(10), &[alarm_a()], None));
}

#[test]
fn candidate_inside_ramp_interferes() {
    assert!(interferes(at(2026, 3, 1, 4, 45), Duration::zero(), &[alarm_a()], None));
}

#[test]
fn non_light_alarm_has_no_ramp() {
    // Ramp duration is recorded but not active, so the window is just 05:00.
    let mut plain = alarm_a();
    plain.is_light_alarm = false;
    assert!(!interferes(at(2026, 3, 1, 4, 55), Duration::zero(), &[plain.clone()], None));
    assert!(interferes(at(2026, 3, 1, 4, 56), Duration::zero(), &[plain], None));
}

#[test]
fn empty_schedule_never_interferes() {
    assert!(!interferes(at(2026, 3, 1, 5, 0), minutes(30), &[], None));
}

#[test]
fn editing_alarm_excludes_its_own_record() {
    let scheduled = vec![alarm_a()];
    // Moving A by one minute would collide with its old self if not excluded.
    assert!(interferes(at(2026, 3, 1, 5, 1), minutes(30), &scheduled, None));
    assert!(!interferes(
        at(2026, 3, 1, 5, 1),
        minutes(30),
        &scheduled,
        Some(AlarmId(1))
    ));
}

#[test]
fn exclusion_does_not_hide_other_alarms() {
    let b = Alarm::new(2, at(2026, 3, 1, 6, 0));
    let scheduled = vec![alarm_a(), b];
    assert!(interferes(
        at(2026, 3, 1, 6, 2),
        Duration::zero(),
        &scheduled,
        Some(AlarmId(1))
    ));
}

#[test]
fn daily_alarm_collides_on_a_later_day() {
    let daily = alarm_a().with_repetition(Repetition::Daily);
    // Ten days later at the same time of day.
    let found = find_interference(
        at(2026, 3, 11, 5, 2),
        Duration::zero(),
        &[daily],
        None,
        &EngineConfig::default(),
    )
    .expect("should collide with the 11th occurrence");
    assert_eq!(found.alarm_id, AlarmId(1));
    assert_eq!(found.occurrence, at(2026, 3, 11, 5, 0));
    assert_eq!(found.window.ramp_start, at(2026, 3, 11, 4, 30));
}

#[test]
fn weekly_alarm_only_collides_on_its_weekday() {
    let weekly = alarm_a().with_repetition(Repetition::Weekly);
    assert!(interferes(at(2026, 3, 8, 5, 0), minutes(5), &[weekly.clone()], None));
    assert!(!interferes(at(2026, 3, 9, 5, 0), minutes(5), &[weekly], None));
}

#[test]
fn monthly_alarm_collides_on_clamped_day() {
    let monthly = Alarm::new(3, at(2026, 1, 31, 7, 0)).with_repetition(Repetition::Monthly);
    assert!(interferes(at(2026, 2, 28, 7, 0), Duration::zero(), &[monthly.clone()], None));
    assert!(interferes(at(2026, 4, 30, 7, 3), Duration::zero(), &[monthly], None));
}

#[test]
fn occurrences_beyond_horizon_are_ignored() {
    let daily = alarm_a().with_repetition(Repetition::Daily);
    // Exactly one year out is still inside the horizon.
    assert!(interferes(at(2027, 3, 1, 5, 0), Duration::zero(), &[daily.clone()], None));
    // The day after is not.
    assert!(!interferes(at(2027, 3, 2, 5, 0), Duration::zero(), &[daily], None));
}

#[test]
fn custom_buffer_and_horizon() {
    let daily = alarm_a().with_repetition(Repetition::Daily);
    let config = EngineConfig {
        buffer_minutes: 0,
        horizon_months: 1,
        ..EngineConfig::default()
    };
    // Zero buffer: touching windows are fine.
    assert!(!check_interference(
        at(2026, 3, 1, 5, 30),
        minutes(30),
        &[daily.clone()],
        None,
        &config
    ));
    // One-month horizon: mid-April occurrences are out of range.
    assert!(!check_interference(
        at(2026, 4, 15, 5, 0),
        Duration::zero(),
        &[daily],
        None,
        &config
    ));
}

#[test]
fn first_colliding_alarm_is_reported() {
    let scheduled = vec![
        Alarm::new(5, at(2026, 3, 1, 9, 0)),
        Alarm::new(6, at(2026, 3, 1, 5, 3)),
        alarm_a(),
    ];
    let found = find_interference(
        at(2026, 3, 1, 5, 0),
        Duration::zero(),
        &scheduled,
        None,
        &EngineConfig::default(),
    )
    .unwrap();
    assert_eq!(found.alarm_id, AlarmId(6));
}

#[test]
fn rescheduled_monthly_alarm_collides_on_anchored_day() {
    let mut monthly = Alarm::new(3, at(2026, 2, 28, 7, 0)).with_repetition(Repetition::Monthly);
    monthly.anchor = Some(at(2026, 1, 31, 7, 0));

    assert!(interferes(at(2026, 3, 31, 7, 0), Duration::zero(), &[monthly.clone()], None));
    assert!(!interferes(at(2026, 3, 28, 7, 0), Duration::zero(), &[monthly], None));
}
