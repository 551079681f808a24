//! Pick a light or dark theme identifier from whether the sun is up.

pub mod app;
pub mod config;
pub mod decider;
pub mod error;
pub mod location;
pub mod logger;
pub mod solar;

pub use app::select_theme;
pub use config::Config;
pub use decider::{decide, Decision, Phase, ThemeChoices};
pub use error::{Result, SwitchError};
pub use location::{resolve_location, Coordinates, HttpLookup, Lookup};
pub use solar::{solar_times, SolarTimes};
