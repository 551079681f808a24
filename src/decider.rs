//! Day/night decision — the primary public API for sunswitch.
//!
//! Compares the local clock against today's sunrise and sunset and hands back
//! one of two caller-supplied identifiers.

use crate::error::{Result, SwitchError};
use crate::location::{Coordinates, ResolvedLocation};
use crate::solar::{self, SolarTimes};
use chrono::{Duration, FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Timelike};
use chrono_tz::Tz;
use serde::Serialize;
use std::fmt;

/// Whether the sun is up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    Day,
    Night,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Day => write!(f, "Day"),
            Phase::Night => write!(f, "Night"),
        }
    }
}

/// The two identifiers to choose between.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThemeChoices {
    pub light: String,
    pub dark: String,
}

impl ThemeChoices {
    pub fn new(light: impl Into<String>, dark: impl Into<String>) -> Self {
        Self { light: light.into(), dark: dark.into() }
    }

    pub fn pick(&self, phase: Phase) -> &str {
        match phase {
            Phase::Day => &self.light,
            Phase::Night => &self.dark,
        }
    }
}

/// `hour + minute / 60`; seconds are ignored.
pub fn fractional_hour(time: NaiveTime) -> f64 {
    time.hour() as f64 + time.minute() as f64 / 60.0
}

/// Night strictly before sunrise or strictly after sunset.
pub fn phase_at(hour: f64, times: &SolarTimes) -> Phase {
    if hour < times.sunrise || hour > times.sunset {
        Phase::Night
    } else {
        Phase::Day
    }
}

/// Pick the light or dark identifier for a local date and time.
pub fn decide<'a>(
    coords: Coordinates,
    date: NaiveDate,
    local_time: NaiveTime,
    utc_offset_secs: i32,
    choices: &'a ThemeChoices,
) -> Result<&'a str> {
    let times = solar::solar_times(coords, date, utc_offset_secs)?;
    Ok(choices.pick(phase_at(fractional_hour(local_time), &times)))
}

/// UTC offset in seconds at noon of `date`, for an IANA zone or the system zone.
pub fn utc_offset_seconds(tz: Option<&str>, date: NaiveDate) -> Result<i32> {
    let noon = date
        .and_hms_opt(12, 0, 0)
        .ok_or_else(|| SwitchError::SolarComputation(format!("invalid date {}", date)))?;

    let offset = match tz {
        Some(name) => {
            let tz: Tz = name.parse().map_err(|_| {
                SwitchError::SolarComputation(format!(
                    "unknown timezone '{}'. Use IANA format (e.g. Europe/Oslo)",
                    name
                ))
            })?;
            tz.from_local_datetime(&noon).earliest().map(|dt| dt.offset().fix())
        }
        None => Local.from_local_datetime(&noon).earliest().map(|dt| dt.offset().fix()),
    };

    offset
        .map(|o| o.local_minus_utc())
        .ok_or_else(|| SwitchError::SolarComputation(format!("no local noon on {}", date)))
}

/// Full decision report.
#[derive(Debug, Clone, Serialize)]
pub struct Decision {
    pub theme: String,
    pub phase: Phase,
    pub date: String,
    pub local_time: String,
    pub utc_offset: String,
    pub hour: f64,
    pub solar: SolarTimes,
    pub sunrise_local: String,
    pub sunset_local: String,
    pub next_phase: Phase,
    pub next_switch: String,
    pub minutes_until_switch: i64,
    /// Sun altitude above the horizon at `local_time`, degrees.
    pub sun_altitude: f64,
    pub location: ResolvedLocation,
}

/// Decide for `now` (local civil time) and describe when the next switch happens.
pub fn evaluate(
    location: &ResolvedLocation,
    now: NaiveDateTime,
    utc_offset_secs: i32,
    choices: &ThemeChoices,
) -> Result<Decision> {
    let date = now.date();
    let hour = fractional_hour(now.time());
    let times = solar::solar_times(location.coords, date, utc_offset_secs)?;
    let phase = phase_at(hour, &times);

    let (next_phase, switch_at) = if hour < times.sunrise {
        (Phase::Day, times.sunrise)
    } else if hour <= times.sunset {
        (Phase::Night, times.sunset)
    } else {
        let tomorrow = date.succ_opt().ok_or_else(|| {
            SwitchError::SolarComputation(format!("no day after {}", date))
        })?;
        let next = solar::solar_times(location.coords, tomorrow, utc_offset_secs)?;
        (Phase::Day, next.sunrise + 24.0)
    };

    let offset = FixedOffset::east_opt(utc_offset_secs).ok_or_else(|| {
        SwitchError::SolarComputation(format!("UTC offset out of range: {}s", utc_offset_secs))
    })?;
    let now_utc = now - Duration::seconds(utc_offset_secs as i64);
    let altitude = solar::sun_altitude(&now_utc, location.coords.lat, location.coords.lon);

    Ok(Decision {
        theme: choices.pick(phase).to_string(),
        phase,
        date: date.to_string(),
        local_time: now.time().format("%H:%M").to_string(),
        utc_offset: offset.to_string(),
        hour,
        solar: times,
        sunrise_local: solar::hours_to_hms(times.sunrise),
        sunset_local: solar::hours_to_hms(times.sunset),
        next_phase,
        next_switch: solar::hours_to_hms(switch_at),
        minutes_until_switch: ((switch_at - hour) * 60.0).round() as i64,
        sun_altitude: altitude,
        location: location.clone(),
    })
}
