//! `alarmctl` — run the alarm temporal-consistency engine from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Resolve outdated alarms (prints one action per alarm)
//! alarmctl resolve -i alarms.json --now 2026-03-05T06:00
//!
//! # Resolve and write the corrected alarm list
//! alarmctl resolve -i alarms.json --apply -o alarms.json
//!
//! # Would a 05:35 light alarm collide with anything? (exit code 1 if so)
//! alarmctl check -i alarms.json --wake 2026-03-01T05:35 --ramp 30
//!
//! # Re-check alarm 3 after an edit, ignoring its previous record
//! alarmctl check -i alarms.json --wake 2026-03-01T06:10 --exclude 3
//!
//! # UTC trigger instants for the OS alarm manager
//! alarmctl --config engine.json next -i alarms.json
//! ```

use std::io::{self, Read};
use std::path::Path;
use std::process;

use alarm_engine::clock::{self, DstPolicy};
use alarm_engine::{Action, Alarm, AlarmId, EngineConfig};
use anyhow::{Context, Result};
use chrono::{Duration, NaiveDateTime, Utc};
use clap::{Parser, Subcommand};
use log::{debug, warn};
use serde::Serialize;

#[derive(Parser)]
#[command(
    name = "alarmctl",
    version,
    about = "Resolve outdated alarms and check alarm interference"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Engine config JSON (buffer, horizon, timezone)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Log engine decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve alarms missed while the device was off
    Resolve {
        /// Alarm list JSON (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Current wall-clock time (defaults to now in the configured timezone)
        #[arg(long)]
        now: Option<String>,
        /// Print the corrected alarm list instead of the actions
        #[arg(long)]
        apply: bool,
    },
    /// Check whether a candidate alarm collides with the scheduled ones
    Check {
        /// Alarm list JSON (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Candidate wake time
        #[arg(long)]
        wake: String,
        /// Candidate light-alarm ramp in minutes
        #[arg(long, conflicts_with = "light")]
        ramp: Option<i64>,
        /// Use the configured default light-alarm ramp
        #[arg(long)]
        light: bool,
        /// Id of the alarm being edited
        #[arg(long)]
        exclude: Option<u64>,
    },
    /// Print UTC trigger instants for the resolved schedule
    Next {
        /// Alarm list JSON (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Current wall-clock time (defaults to now in the configured timezone)
        #[arg(long)]
        now: Option<String>,
    },
}

/// One resolver decision as printed by `alarmctl resolve`.
#[derive(Serialize)]
struct ResolvedDto {
    id: AlarmId,
    action: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    start: Option<NaiveDateTime>,
}

impl ResolvedDto {
    fn new(id: AlarmId, action: Action) -> Self {
        let (name, start) = match action {
            Action::Keep => ("keep", None),
            Action::Discard => ("discard", None),
            Action::Reschedule(ts) => ("reschedule", Some(ts)),
        };
        Self {
            id,
            action: name,
            start,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Resolve {
            input,
            output,
            now,
            apply,
        } => {
            let alarms = read_alarms(input.as_deref())?;
            let now = current_time(now.as_deref(), &config)?;
            let actions = alarm_engine::resolve_outdated(&alarms, now);

            let json = if apply {
                let resolved = alarm_engine::apply_actions(alarms, &actions);
                serde_json::to_string_pretty(&resolved)?
            } else {
                let dtos: Vec<ResolvedDto> = actions
                    .into_iter()
                    .map(|(id, action)| ResolvedDto::new(id, action))
                    .collect();
                serde_json::to_string_pretty(&dtos)?
            };

            write_output(output.as_deref(), &json)?;
        }
        Commands::Check {
            input,
            wake,
            ramp,
            light,
            exclude,
        } => {
            let alarms = read_alarms(input.as_deref())?;
            let wake = clock::parse_wall_clock(&wake).context("Invalid --wake")?;
            if clock::truncate_to_minute(wake) != wake {
                anyhow::bail!("--wake must be a whole minute, got {}", wake);
            }
            let ramp = match ramp {
                Some(minutes) if minutes < 0 => anyhow::bail!("--ramp must not be negative"),
                Some(minutes) => Duration::try_minutes(minutes).context("--ramp is out of range")?,
                None if light => config.default_light_alarm_duration(),
                None => Duration::zero(),
            };

            let found = alarm_engine::find_interference(
                wake,
                ramp,
                &alarms,
                exclude.map(AlarmId),
                &config,
            );

            match found {
                Some(interference) => {
                    let window = interference.window;
                    println!(
                        "conflict: alarm {} at {} (window {} - {}, {} min ramp)",
                        interference.alarm_id,
                        interference.occurrence,
                        window.ramp_start,
                        window.wake,
                        window.ramp().num_minutes()
                    );
                    process::exit(1);
                }
                None => println!("ok"),
            }
        }
        Commands::Next { input, now } => {
            let alarms = read_alarms(input.as_deref())?;
            let now = current_time(now.as_deref(), &config)?;
            let tz = config.tz()?;

            let actions = alarm_engine::resolve_outdated(&alarms, now);
            let resolved = alarm_engine::apply_actions(alarms, &actions);

            for alarm in &resolved {
                match clock::to_instant(alarm.start, tz, DstPolicy::ShiftForward) {
                    Some(instant) => {
                        println!("{} {} -> {}", alarm.id, alarm.start, instant.to_rfc3339())
                    }
                    None => warn!("alarm {} at {} has no instant in {}", alarm.id, alarm.start, tz),
                }
            }
        }
    }

    Ok(())
}

fn load_config(path: Option<&str>) -> Result<EngineConfig> {
    match path {
        Some(path) => EngineConfig::load(Path::new(path))
            .with_context(|| format!("Failed to load config: {}", path)),
        None => Ok(EngineConfig::default()),
    }
}

/// Parse `--now`, or take the current minute in the configured timezone.
fn current_time(now: Option<&str>, config: &EngineConfig) -> Result<NaiveDateTime> {
    match now {
        Some(raw) => {
            let parsed = clock::parse_wall_clock(raw).context("Invalid --now")?;
            Ok(clock::truncate_to_minute(parsed))
        }
        None => {
            let tz = config.tz()?;
            let now = clock::wall_clock_now(tz, Utc::now());
            debug!("using current wall clock {} in {}", now, tz);
            Ok(now)
        }
    }
}

/// Read an alarm list and reject records the engine cannot handle.
fn read_alarms(path: Option<&str>) -> Result<Vec<Alarm>> {
    let raw = read_input(path)?;
    let alarms: Vec<Alarm> = serde_json::from_str(&raw).context("Invalid alarm list JSON")?;
    for alarm in &alarms {
        alarm.validate()?;
    }
    debug!("loaded {} alarms", alarms.len());
    Ok(alarms)
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
