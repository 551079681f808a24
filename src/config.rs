//! Configuration: TOML file at <config_dir>/sunswitch/config.toml plus CLI overrides.
//!
//! Every field is optional on disk. The light/dark identifiers are only
//! required when a selection actually runs.

use crate::decider::ThemeChoices;
use crate::error::{Result, SwitchError};
use crate::location::providers::{DEFAULT_GEO_SERVICE, DEFAULT_IP_SERVICE, DEFAULT_TIMEOUT_SECS};
use crate::location::{HttpLookup, ResolvedLocation};
use serde::Deserialize;
use std::fs;
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    pub light: Option<String>,
    pub dark: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub public_ip: Option<String>,
    /// IANA timezone; the system zone when absent.
    pub timezone: Option<String>,
    #[serde(default)]
    pub offline: bool,
    #[serde(default)]
    pub network: NetworkConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NetworkConfig {
    #[serde(default = "default_ip_service")]
    pub ip_service: String,
    #[serde(default = "default_geo_service")]
    pub geo_service: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_ip_service() -> String {
    DEFAULT_IP_SERVICE.to_string()
}

fn default_geo_service() -> String {
    DEFAULT_GEO_SERVICE.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            ip_service: default_ip_service(),
            geo_service: default_geo_service(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Config {
    /// Default location (~/.config/sunswitch/config.toml on Linux).
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("sunswitch").join("config.toml"))
    }

    /// Load from an explicit path (must exist) or the default one (may be absent).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load_from(p),
            None => match Self::default_path() {
                Some(p) if p.exists() => Self::load_from(&p),
                _ => {
                    debug!("no configuration file, using defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .map_err(|e| SwitchError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        let config = Self::from_toml_str(&data)
            .map_err(|e| SwitchError::Config(format!("{}: {}", path.display(), e)))?;
        debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    pub fn from_toml_str(data: &str) -> Result<Self> {
        let config: Self = toml::from_str(data).map_err(|e| SwitchError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks values that would otherwise reach the network unchecked.
    /// Run again after CLI overrides are applied.
    pub fn validate(&self) -> Result<()> {
        if self.network.timeout_secs == 0 {
            return Err(SwitchError::Config("network.timeout_secs must be positive".into()));
        }
        if let Some(ip) = &self.public_ip {
            ip.parse::<IpAddr>().map_err(|_| {
                SwitchError::Config(format!("public_ip '{}' is not an IPv4 or IPv6 address", ip))
            })?;
        }
        Ok(())
    }

    /// The two identifiers, or `ConfigurationIncomplete` naming the missing one.
    pub fn choices(&self) -> Result<ThemeChoices> {
        let light = non_empty(&self.light).ok_or(SwitchError::ConfigurationIncomplete("light"))?;
        let dark = non_empty(&self.dark).ok_or(SwitchError::ConfigurationIncomplete("dark"))?;
        Ok(ThemeChoices::new(light, dark))
    }

    /// Keep resolved values for the rest of this run so later selections skip the network.
    pub fn remember_location(&mut self, resolved: &ResolvedLocation) {
        self.latitude = Some(resolved.coords.lat);
        self.longitude = Some(resolved.coords.lon);
        if let Some(addr) = &resolved.address {
            self.public_ip = Some(addr.clone());
        }
    }

    /// HTTP collaborators built from the `[network]` table.
    pub fn http_lookup(&self) -> HttpLookup {
        HttpLookup::new(
            &self.network.ip_service,
            &self.network.geo_service,
            Duration::from_secs(self.network.timeout_secs),
        )
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}
