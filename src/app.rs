//! One selection run: resolve the location, decide, cache what was learned.

use crate::config::Config;
use crate::decider::{self, Decision};
use crate::error::{Result, SwitchError};
use crate::location::{LocationResolver, Lookup};
use chrono::{Local, NaiveDateTime, Utc};
use chrono_tz::Tz;
use tracing::info;

/// Current local time in the configured zone (or the system zone).
pub fn local_now(tz: Option<&str>) -> Result<NaiveDateTime> {
    match tz {
        Some(name) => {
            let tz: Tz = name.parse().map_err(|_| {
                SwitchError::SolarComputation(format!(
                    "unknown timezone '{}'. Use IANA format (e.g. Europe/Oslo)",
                    name
                ))
            })?;
            Ok(Utc::now().with_timezone(&tz).naive_local())
        }
        None => Ok(Local::now().naive_local()),
    }
}

/// Pick a theme for `now` (local civil time, defaults to the clock).
///
/// Choices are checked before any network access. Resolved coordinates are
/// written back into `config` so a second call in the same run stays offline.
pub fn select_theme(
    config: &mut Config,
    lookup: &dyn Lookup,
    now: Option<NaiveDateTime>,
) -> Result<Decision> {
    let choices = config.choices()?;

    let mut resolver = LocationResolver::new(lookup);
    resolver.set_offline(config.offline);
    let location = resolver.resolve(config.latitude, config.longitude, config.public_ip.as_deref())?;
    config.remember_location(&location);

    let now = match now {
        Some(n) => n,
        None => local_now(config.timezone.as_deref())?,
    };
    let offset = decider::utc_offset_seconds(config.timezone.as_deref(), now.date())?;

    let decision = decider::evaluate(&location, now, offset, &choices)?;
    info!(
        theme = %decision.theme,
        phase = %decision.phase,
        sunrise = %decision.sunrise_local,
        sunset = %decision.sunset_local,
        "selected theme"
    );
    Ok(decision)
}
