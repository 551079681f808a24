//! Solar position and sunrise/sunset calculator (NOAA formulation).
//!
//! Accuracy: about a minute for sunrise/sunset at mid latitudes within
//! ±50 years of J2000. Polar day maps to the whole day (00:00 to 23:59:59);
//! polar night collapses sunrise and sunset onto solar noon.

use crate::error::{Result, SwitchError};
use crate::location::Coordinates;
use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use serde::Serialize;
use std::f64::consts::PI;

const DEG: f64 = PI / 180.0;
const ATMOSPHERIC_REFRACTION: f64 = 0.833;

/// Last representable second of the day, used as sunset when the sun never sets.
const END_OF_DAY: f64 = 24.0 - 1.0 / 3600.0;

/// Sunrise and sunset as fractional hours of local civil time, in [0, 24).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SolarTimes {
    pub sunrise: f64,
    pub sunset: f64,
}

/// Julian Date at 00:00 UTC of `date`.
pub fn julian_day(date: NaiveDate) -> f64 {
    let y = date.year() as f64;
    let m = date.month() as f64;
    let d = date.day() as f64;

    let (y2, m2) = if m <= 2.0 {
        (y - 1.0, m + 12.0)
    } else {
        (y, m)
    };

    let a = (y2 / 100.0_f64).floor();
    let b = 2.0 - a + (a / 4.0_f64).floor();

    (365.25_f64 * (y2 + 4716.0)).floor()
        + (30.6001_f64 * (m2 + 1.0)).floor()
        + d
        + b
        - 1524.5
}

/// Convert a NaiveDateTime (assumed UTC) to Julian Date.
pub fn julian_date(dt: &NaiveDateTime) -> f64 {
    let h = dt.hour() as f64 + dt.minute() as f64 / 60.0 + dt.second() as f64 / 3600.0;
    julian_day(dt.date()) + h / 24.0
}

fn julian_century(jd: f64) -> f64 {
    (jd - 2451545.0) / 36525.0
}

fn normalize_degrees(deg: f64) -> f64 {
    let mut d = deg % 360.0;
    if d < 0.0 {
        d += 360.0;
    }
    d
}

fn sun_mean_longitude(t: f64) -> f64 {
    normalize_degrees(280.46646 + t * (36000.76983 + t * 0.0003032))
}

fn sun_mean_anomaly(t: f64) -> f64 {
    normalize_degrees(357.52911 + t * (35999.05029 - t * 0.0001537))
}

fn earth_eccentricity(t: f64) -> f64 {
    0.016708634 - t * (0.000042037 + t * 0.0000001267)
}

fn sun_equation_of_center(t: f64) -> f64 {
    let m = sun_mean_anomaly(t) * DEG;
    m.sin() * (1.914602 - t * (0.004817 + t * 0.000014))
        + (2.0 * m).sin() * (0.019993 - t * 0.000101)
        + (3.0 * m).sin() * 0.000289
}

fn sun_apparent_longitude(t: f64) -> f64 {
    let omega = 125.04 - 1934.136 * t;
    sun_mean_longitude(t) + sun_equation_of_center(t) - 0.00569 - 0.00478 * (omega * DEG).sin()
}

fn obliquity_corrected(t: f64) -> f64 {
    let omega = 125.04 - 1934.136 * t;
    let mean = 23.0 + (26.0 + (21.448 - t * (46.815 + t * (0.00059 - t * 0.001813))) / 60.0) / 60.0;
    mean + 0.00256 * (omega * DEG).cos()
}

fn solar_declination(t: f64) -> f64 {
    let e = obliquity_corrected(t) * DEG;
    let lambda = sun_apparent_longitude(t) * DEG;
    (e.sin() * lambda.sin()).asin() / DEG
}

/// Equation of time in minutes.
fn equation_of_time(t: f64) -> f64 {
    let e = obliquity_corrected(t) * DEG;
    let l0 = sun_mean_longitude(t) * DEG;
    let ecc = earth_eccentricity(t);
    let m = sun_mean_anomaly(t) * DEG;

    let y = (e / 2.0).tan().powi(2);

    let eq = y * (2.0 * l0).sin() - 2.0 * ecc * m.sin()
        + 4.0 * ecc * y * m.sin() * (2.0 * l0).cos()
        - 0.5 * y * y * (4.0 * l0).sin()
        - 1.25 * ecc * ecc * (2.0 * m).sin();

    4.0 * eq / DEG
}

/// Sun altitude in degrees for a given UTC datetime, latitude, and longitude.
pub fn sun_altitude(dt: &NaiveDateTime, lat: f64, lon: f64) -> f64 {
    let t = julian_century(julian_date(dt));

    let decl = solar_declination(t) * DEG;
    let eqt = equation_of_time(t);

    let hour = dt.hour() as f64 + dt.minute() as f64 / 60.0 + dt.second() as f64 / 3600.0;
    let solar_time = hour * 60.0 + eqt + 4.0 * lon;
    let hour_angle = (solar_time / 4.0 - 180.0) * DEG;

    let lat_r = lat * DEG;
    let sin_alt = lat_r.sin() * decl.sin() + lat_r.cos() * decl.cos() * hour_angle.cos();
    sin_alt.asin() / DEG
}

/// Cosine of the hour angle at which the sun sits on the refracted horizon.
/// Below -1 the sun never sets; above 1 it never rises.
fn horizon_hour_angle_cos(t: f64, lat: f64) -> f64 {
    let decl = solar_declination(t) * DEG;
    let lat_r = lat * DEG;
    ((90.0 + ATMOSPHERIC_REFRACTION) * DEG).cos() / (lat_r.cos() * decl.cos())
        - lat_r.tan() * decl.tan()
}

/// Minutes after 00:00 UTC of the day whose Julian Day is `jd0` at which the
/// sun crosses the horizon, evaluated with the ephemeris at `minutes`.
fn horizon_crossing(jd0: f64, minutes: f64, lat: f64, lon: f64, rising: bool) -> f64 {
    let t = julian_century(jd0 + minutes / 1440.0);
    let eqt = equation_of_time(t);
    // Polar night → 0°.
    let ha = horizon_hour_angle_cos(t, lat).clamp(-1.0, 1.0).acos() / DEG;

    if rising {
        720.0 - 4.0 * (lon + ha) - eqt
    } else {
        720.0 - 4.0 * (lon - ha) - eqt
    }
}

fn event_utc_minutes(date: NaiveDate, lat: f64, lon: f64, rising: bool) -> f64 {
    let jd0 = julian_day(date);
    let first = horizon_crossing(jd0, 720.0 - 4.0 * lon, lat, lon, rising);
    horizon_crossing(jd0, first, lat, lon, rising)
}

/// Sunrise and sunset for `date` at `coords`, shifted by `utc_offset_secs`
/// into local civil time.
pub fn solar_times(coords: Coordinates, date: NaiveDate, utc_offset_secs: i32) -> Result<SolarTimes> {
    let coords = Coordinates::new(coords.lat, coords.lon)?;
    let offset_min = utc_offset_secs as f64 / 60.0;

    let noon = julian_century(julian_day(date) + (720.0 - 4.0 * coords.lon) / 1440.0);
    if horizon_hour_angle_cos(noon, coords.lat) < -1.0 {
        return Ok(SolarTimes { sunrise: 0.0, sunset: END_OF_DAY });
    }

    let to_local_hours = |utc_min: f64| -> Result<f64> {
        let h = ((utc_min + offset_min) / 60.0).rem_euclid(24.0);
        if h.is_finite() {
            Ok(h)
        } else {
            Err(SwitchError::SolarComputation(format!(
                "no finite solution for {} on {}",
                coords.display(),
                date
            )))
        }
    };

    Ok(SolarTimes {
        sunrise: to_local_hours(event_utc_minutes(date, coords.lat, coords.lon, true))?,
        sunset: to_local_hours(event_utc_minutes(date, coords.lat, coords.lon, false))?,
    })
}

/// Convert seconds from midnight to HH:MM:SS string.
pub fn seconds_to_hms(secs: f64) -> String {
    let total = secs.round() as i64;
    let total = ((total % 86400) + 86400) % 86400;
    let h = total / 3600;
    let m = (total % 3600) / 60;
    let s = total % 60;
    format!("{:02}:{:02}:{:02}", h, m, s)
}

/// Fractional hours to HH:MM:SS.
pub fn hours_to_hms(hours: f64) -> String {
    seconds_to_hms(hours * 3600.0)
}
