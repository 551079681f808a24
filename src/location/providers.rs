//! Location providers: public-IP discovery and IP geolocation over HTTP.

use super::types::{Coordinates, PublicAddress};
use crate::error::{Result, SwitchError};
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_IP_SERVICE: &str = "https://api.ipify.org";
pub const DEFAULT_GEO_SERVICE: &str = "http://ip-api.com/json";
pub const DEFAULT_TIMEOUT_SECS: u64 = 8;

const USER_AGENT: &str = concat!("sunswitch/", env!("CARGO_PKG_VERSION"));

/// The two network collaborators the resolver depends on.
pub trait Lookup {
    /// Discover the caller's public address.
    fn public_address(&self) -> Result<PublicAddress>;

    /// Map an address to coordinates.
    fn geolocate(&self, addr: &PublicAddress) -> Result<Coordinates>;
}

// ─── HTTP implementation ────────────────────────────────────────

/// `Lookup` backed by blocking `ureq` calls.
pub struct HttpLookup {
    agent: ureq::Agent,
    ip_service: String,
    geo_service: String,
}

impl HttpLookup {
    pub fn new(ip_service: &str, geo_service: &str, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build();
        Self {
            agent,
            ip_service: ip_service.to_string(),
            geo_service: geo_service.trim_end_matches('/').to_string(),
        }
    }
}

impl Default for HttpLookup {
    fn default() -> Self {
        Self::new(
            DEFAULT_IP_SERVICE,
            DEFAULT_GEO_SERVICE,
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        )
    }
}

impl Lookup for HttpLookup {
    fn public_address(&self) -> Result<PublicAddress> {
        let response = self
            .agent
            .get(&self.ip_service)
            .call()
            .map_err(|e| SwitchError::Network(format!("{}: {}", self.ip_service, e)))?;

        let body = response
            .into_string()
            .map_err(|e| SwitchError::Network(format!("{}: {}", self.ip_service, e)))?;

        parse_address(&body)
    }

    fn geolocate(&self, addr: &PublicAddress) -> Result<Coordinates> {
        let url = format!("{}/{}", self.geo_service, addr);

        let response = match self.agent.get(&url).call() {
            Ok(r) => r,
            Err(ureq::Error::Status(code, _)) => {
                return Err(SwitchError::Geolocation(format!("{} returned HTTP {}", url, code)));
            }
            Err(e) => return Err(SwitchError::Network(format!("{}: {}", url, e))),
        };

        let body = response
            .into_string()
            .map_err(|e| SwitchError::Network(format!("{}: {}", url, e)))?;

        parse_geolocation(&body)
    }
}

// ─── Response parsing ───────────────────────────────────────────

/// The IP service answers with the bare address, possibly newline-terminated.
pub fn parse_address(body: &str) -> Result<PublicAddress> {
    let addr = body.trim();
    if addr.is_empty() || addr.contains(char::is_whitespace) {
        return Err(SwitchError::Network(format!(
            "public IP service returned an unusable body: {:?}",
            body
        )));
    }
    Ok(PublicAddress::new(addr))
}

#[derive(Deserialize)]
struct GeoApiResult {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
}

/// Pull `lat`/`lon` out of a geolocation document.
pub fn parse_geolocation(body: &str) -> Result<Coordinates> {
    let r: GeoApiResult = serde_json::from_str(body)
        .map_err(|e| SwitchError::Geolocation(format!("malformed response: {}", e)))?;

    if let Some(status) = r.status.as_deref() {
        if !status.eq_ignore_ascii_case("success") {
            let reason = r.message.unwrap_or_else(|| status.to_string());
            return Err(SwitchError::Geolocation(format!("lookup failed: {}", reason)));
        }
    }

    let lat = r.lat.ok_or_else(|| SwitchError::Geolocation("no latitude".into()))?;
    let lon = r.lon.ok_or_else(|| SwitchError::Geolocation("no longitude".into()))?;

    Coordinates::new(lat, lon).map_err(|e| SwitchError::Geolocation(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_address_trims() {
        let addr = parse_address("203.0.113.7\n").unwrap();
        assert_eq!(addr.as_str(), "203.0.113.7");
    }

    #[test]
    fn test_parse_address_empty() {
        assert!(matches!(parse_address("  \n"), Err(SwitchError::Network(_))));
    }

    #[test]
    fn test_parse_address_rejects_html() {
        assert!(parse_address("<html> error page </html>").is_err());
    }

    #[test]
    fn test_parse_geolocation_success() {
        let body = r#"{"status":"success","country":"United States","lat":40.7128,"lon":-74.006,"query":"203.0.113.7"}"#;
        let c = parse_geolocation(body).unwrap();
        assert!((c.lat - 40.7128).abs() < 1e-9);
        assert!((c.lon + 74.006).abs() < 1e-9);
    }

    #[test]
    fn test_parse_geolocation_without_status() {
        let c = parse_geolocation(r#"{"lat": 59.33, "lon": 18.07}"#).unwrap();
        assert!((c.lat - 59.33).abs() < 1e-9);
    }

    #[test]
    fn test_parse_geolocation_fail_status() {
        let body = r#"{"status":"fail","message":"reserved range","query":"10.0.0.1"}"#;
        match parse_geolocation(body) {
            Err(SwitchError::Geolocation(msg)) => assert!(msg.contains("reserved range")),
            other => panic!("expected geolocation error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_geolocation_missing_lon() {
        assert!(matches!(
            parse_geolocation(r#"{"lat": 10.0}"#),
            Err(SwitchError::Geolocation(_))
        ));
    }

    #[test]
    fn test_parse_geolocation_not_json() {
        assert!(matches!(
            parse_geolocation("Too Many Requests"),
            Err(SwitchError::Geolocation(_))
        ));
    }

    #[test]
    fn test_parse_geolocation_out_of_range() {
        assert!(matches!(
            parse_geolocation(r#"{"lat": 123.0, "lon": 0.0}"#),
            Err(SwitchError::Geolocation(_))
        ));
    }
}
