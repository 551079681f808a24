//! Location subsystem for sunswitch.
//!
//! Provides the configured-or-geolocated fallback chain and the HTTP
//! collaborators it relies on.

pub mod providers;
pub mod resolver;
pub mod types;

pub use providers::{HttpLookup, Lookup};
pub use resolver::{resolve_location, LocationResolver};
pub use types::{Coordinates, LocationSource, PublicAddress, ResolvedLocation};
