//! Location resolver — orchestrates the fallback chain.
//!
//! Flow: configured lat/lon → configured IP or public-IP lookup → IP geolocation → error

use super::providers::Lookup;
use super::types::{Coordinates, LocationSource, PublicAddress, ResolvedLocation};
use crate::error::{Result, SwitchError};
use tracing::{debug, info};

/// The location resolver with its fallback pipeline.
pub struct LocationResolver<'a> {
    lookup: &'a dyn Lookup,
    offline: bool,
}

impl<'a> LocationResolver<'a> {
    pub fn new(lookup: &'a dyn Lookup) -> Self {
        Self { lookup, offline: false }
    }

    /// Set offline mode — never touch the network.
    pub fn set_offline(&mut self, offline: bool) {
        self.offline = offline;
    }

    /// Resolve coordinates from whatever the caller already knows.
    ///
    /// Both coordinates configured: returned unchanged, no network access.
    /// Otherwise the configured IP (or a freshly discovered one) is geolocated.
    pub fn resolve(
        &self,
        configured_lat: Option<f64>,
        configured_lon: Option<f64>,
        configured_ip: Option<&str>,
    ) -> Result<ResolvedLocation> {
        // 1. Configured coordinates
        if let (Some(lat), Some(lon)) = (configured_lat, configured_lon) {
            debug!(lat, lon, "using configured coordinates");
            return Ok(ResolvedLocation {
                coords: Coordinates { lat, lon },
                source: LocationSource::Configured,
                address: None,
            });
        }

        if self.offline {
            return Err(SwitchError::Network(
                "offline mode and no latitude/longitude configured".into(),
            ));
        }

        // 2. Public address
        let addr = match configured_ip {
            Some(ip) => {
                debug!(ip, "using configured public address");
                PublicAddress::new(ip)
            }
            None => {
                let addr = self.lookup.public_address()?;
                info!(address = %addr, "discovered public address");
                addr
            }
        };

        // 3. Geolocation
        let coords = self.lookup.geolocate(&addr)?;
        info!(lat = coords.lat, lon = coords.lon, address = %addr, "geolocated public address");

        Ok(ResolvedLocation {
            coords,
            source: LocationSource::Geolocated,
            address: Some(addr.to_string()),
        })
    }
}

/// One-shot form of [`LocationResolver::resolve`].
pub fn resolve_location(
    lookup: &dyn Lookup,
    configured_lat: Option<f64>,
    configured_lon: Option<f64>,
    configured_ip: Option<&str>,
) -> Result<ResolvedLocation> {
    LocationResolver::new(lookup).resolve(configured_lat, configured_lon, configured_ip)
}
