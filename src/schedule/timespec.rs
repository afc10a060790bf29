// src/schedule/timespec.rs

//! Time-spec parsing and evaluation.
//!
//! Grammar:
//!
//! ```text
//! "HH:MM"                      daily at that time (shorthand)
//! "hourly(MM)"                 minute MM of every hour
//! "daily(HH:MM)"               one or more |-separated times per day
//! "weekly(monday@HH:MM)"       chrono weekday names, full or 3-letter
//! "monthly(DD@HH:MM)"          day-of-month 1-31
//! ```
//!
//! A spec is due for the whole calendar minute it names; that window is wider
//! than the poll cadence, so a firing is never missed. Suppressing repeat
//! fires inside one window is the supervisor's job (see [`firing_window`]),
//! keeping `is_due` a pure function of (spec, now).

use std::str::FromStr;

use chrono::{Datelike, NaiveDateTime, NaiveTime, Timelike, Weekday};

use crate::errors::TimeSpecError;

/// A parsed recurrence rule for one schedule entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeSpec {
    Hourly { minute: u32 },
    Daily { times: Vec<NaiveTime> },
    Weekly { weekday: Weekday, time: NaiveTime },
    Monthly { day: u32, time: NaiveTime },
}

impl TimeSpec {
    /// Whether `now` falls inside one of this spec's firing windows.
    ///
    /// Deterministic and side-effect-free; safe to call for every entry on
    /// every poll cycle. A `monthly(31@..)` spec simply never fires in
    /// shorter months.
    pub fn is_due(&self, now: NaiveDateTime) -> bool {
        match self {
            TimeSpec::Hourly { minute } => now.minute() == *minute,
            TimeSpec::Daily { times } => times.iter().any(|t| same_minute(*t, now.time())),
            TimeSpec::Weekly { weekday, time } => {
                now.weekday() == *weekday && same_minute(*time, now.time())
            }
            TimeSpec::Monthly { day, time } => {
                now.day() == *day && same_minute(*time, now.time())
            }
        }
    }
}

fn same_minute(spec: NaiveTime, now: NaiveTime) -> bool {
    spec.hour() == now.hour() && spec.minute() == now.minute()
}

/// Truncate `now` to the start of the firing window containing it.
///
/// Used by the supervisor as the key of its fired-this-window map.
pub fn firing_window(now: NaiveDateTime) -> NaiveDateTime {
    now.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(now)
}

impl FromStr for TimeSpec {
    type Err = TimeSpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(TimeSpecError::Empty);
        }

        // Bare "HH:MM" is shorthand for a once-a-day spec.
        let Some((kind, rest)) = s.split_once('(') else {
            return Ok(TimeSpec::Daily {
                times: vec![parse_clock(s)?],
            });
        };

        let Some(args) = rest.strip_suffix(')') else {
            return Err(TimeSpecError::Malformed(s.to_string()));
        };

        match kind.trim().to_lowercase().as_str() {
            "hourly" => {
                let minute: u32 = args
                    .trim()
                    .parse()
                    .map_err(|_| TimeSpecError::BadMinute(args.trim().to_string()))?;
                if minute > 59 {
                    return Err(TimeSpecError::BadMinute(args.trim().to_string()));
                }
                Ok(TimeSpec::Hourly { minute })
            }
            "daily" => {
                let times = args
                    .split('|')
                    .map(parse_clock)
                    .collect::<Result<Vec<_>, _>>()?;
                if times.is_empty() {
                    return Err(TimeSpecError::Malformed(s.to_string()));
                }
                Ok(TimeSpec::Daily { times })
            }
            "weekly" => {
                let (day, time) = split_at_sign(args, s)?;
                let weekday = day
                    .parse::<Weekday>()
                    .map_err(|_| TimeSpecError::BadWeekday(day.to_string()))?;
                Ok(TimeSpec::Weekly {
                    weekday,
                    time: parse_clock(time)?,
                })
            }
            "monthly" => {
                let (day, time) = split_at_sign(args, s)?;
                let day: u32 = day
                    .parse()
                    .map_err(|_| TimeSpecError::BadDayOfMonth(day.to_string()))?;
                if !(1..=31).contains(&day) {
                    return Err(TimeSpecError::BadDayOfMonth(day.to_string()));
                }
                Ok(TimeSpec::Monthly {
                    day,
                    time: parse_clock(time)?,
                })
            }
            other => Err(TimeSpecError::UnknownKind(other.to_string())),
        }
    }
}

fn split_at_sign<'a>(args: &'a str, full: &str) -> Result<(&'a str, &'a str), TimeSpecError> {
    args.split_once('@')
        .map(|(a, b)| (a.trim(), b.trim()))
        .ok_or_else(|| TimeSpecError::Malformed(full.to_string()))
}

fn parse_clock(s: &str) -> Result<NaiveTime, TimeSpecError> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M").map_err(|_| TimeSpecError::BadClockTime(s.to_string()))
}
