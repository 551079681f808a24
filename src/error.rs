//! Error kinds surfaced by location resolution and the day/night decision.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SwitchError {
    /// The light or dark identifier was never configured.
    #[error("Configuration incomplete: {0} theme is not set")]
    ConfigurationIncomplete(&'static str),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Geolocation error: {0}")]
    Geolocation(String),

    #[error("Solar computation error: {0}")]
    SolarComputation(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, SwitchError>;
