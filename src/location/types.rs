//! Core types for the location subsystem.

use crate::error::{Result, SwitchError};
use serde::Serialize;
use std::fmt;

/// How a coordinate pair was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LocationSource {
    Configured,
    Geolocated,
}

impl fmt::Display for LocationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configured => write!(f, "Configured"),
            Self::Geolocated => write!(f, "IP"),
        }
    }
}

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    /// Build from untrusted values, rejecting anything off the globe.
    pub fn new(lat: f64, lon: f64) -> Result<Self> {
        if !lat.is_finite() || !lon.is_finite() {
            return Err(SwitchError::SolarComputation(format!(
                "non-finite coordinates ({}, {})",
                lat, lon
            )));
        }
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return Err(SwitchError::SolarComputation(format!(
                "coordinates out of range ({}, {}). Lat: -90..90, Lon: -180..180",
                lat, lon
            )));
        }
        Ok(Self { lat, lon })
    }

    /// "40.7000°N, 74.0000°W"
    pub fn display(&self) -> String {
        let ns = if self.lat >= 0.0 { 'N' } else { 'S' };
        let ew = if self.lon >= 0.0 { 'E' } else { 'W' };
        format!("{:.4}\u{00B0}{}, {:.4}\u{00B0}{}", self.lat.abs(), ns, self.lon.abs(), ew)
    }
}

/// The caller's externally visible network address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicAddress(String);

impl PublicAddress {
    pub fn new(addr: impl Into<String>) -> Self {
        Self(addr.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PublicAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Coordinates together with their provenance.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedLocation {
    #[serde(flatten)]
    pub coords: Coordinates,
    pub source: LocationSource,
    /// Address used for the geolocation lookup, if one happened.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}
