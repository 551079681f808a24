use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use clap::Parser;
use std::path::PathBuf;
use sunswitch::app::{local_now, select_theme};
use sunswitch::decider::Phase;
use sunswitch::logger::init_cli_logger;
use sunswitch::{Config, SwitchError};

/// sunswitch — light theme while the sun is up, dark theme after sunset.
///
/// Prints the chosen identifier on stdout. Location comes from --lat/--lon
/// (or the config file); otherwise it is looked up from your public IP.
///
/// Examples:
///   sunswitch --light solarized-light --dark solarized-dark
///   sunswitch --lat 40.7 --lon -74.0 --tz America/New_York
///   sunswitch --date 2021-08-17 --time 22:00 --json
#[derive(Parser)]
#[command(name = "sunswitch", version, about, long_about = None)]
struct Cli {
    /// Config file. Defaults to <config_dir>/sunswitch/config.toml.
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Identifier to print while the sun is up.
    #[arg(long)]
    light: Option<String>,

    /// Identifier to print while the sun is down.
    #[arg(long)]
    dark: Option<String>,

    /// Latitude (-90 to 90).
    #[arg(long, allow_hyphen_values = true)]
    lat: Option<f64>,

    /// Longitude (-180 to 180).
    #[arg(long, allow_hyphen_values = true)]
    lon: Option<f64>,

    /// Public IP to geolocate instead of discovering it.
    #[arg(long)]
    ip: Option<String>,

    /// IANA timezone (e.g. Europe/Oslo). Defaults to the system zone.
    #[arg(long)]
    tz: Option<String>,

    /// Date (YYYY-MM-DD). Defaults to today.
    #[arg(long, short = 'd')]
    date: Option<String>,

    /// Local time (HH:MM). Defaults to now.
    #[arg(long, short = 't')]
    time: Option<String>,

    /// Never touch the network; requires a configured latitude/longitude.
    #[arg(long)]
    offline: bool,

    /// Print the full decision as JSON instead of the bare identifier.
    #[arg(long)]
    json: bool,

    /// Debug logging on stderr.
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    init_cli_logger(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), SwitchError> {
    // ── Configuration ───────────────────────────────────────────

    let mut config = Config::load(cli.config.as_deref())?;
    apply_overrides(&mut config, cli);
    config.validate()?;

    // ── Clock ───────────────────────────────────────────────────

    let now = parse_now(cli, config.timezone.as_deref())?;

    // ── Select ──────────────────────────────────────────────────

    let lookup = config.http_lookup();
    let decision = select_theme(&mut config, &lookup, now)?;

    let icon = match decision.phase {
        Phase::Day => "\u{2600}\u{FE0F}",
        Phase::Night => "\u{1F319}",
    };
    eprintln!(
        "  {} {} at {} (UTC{}) \u{2014} sunrise {}, sunset {}, next switch {} ({} min)",
        icon,
        decision.phase,
        decision.local_time,
        decision.utc_offset,
        decision.sunrise_local,
        decision.sunset_local,
        decision.next_switch,
        decision.minutes_until_switch,
    );
    eprintln!(
        "  \u{1F4CD} {} [{}]",
        decision.location.coords.display(),
        decision.location.source
    );

    if cli.json {
        let json = serde_json::to_string_pretty(&decision)
            .map_err(|e| SwitchError::Config(format!("cannot serialize report: {}", e)))?;
        println!("{}", json);
    } else {
        println!("{}", decision.theme);
    }
    Ok(())
}

fn apply_overrides(config: &mut Config, cli: &Cli) {
    if cli.light.is_some() {
        config.light = cli.light.clone();
    }
    if cli.dark.is_some() {
        config.dark = cli.dark.clone();
    }
    if cli.lat.is_some() {
        config.latitude = cli.lat;
    }
    if cli.lon.is_some() {
        config.longitude = cli.lon;
    }
    if cli.ip.is_some() {
        config.public_ip = cli.ip.clone();
    }
    if cli.tz.is_some() {
        config.timezone = cli.tz.clone();
    }
    if cli.offline {
        config.offline = true;
    }
}

/// `None` when neither --date nor --time was given, so the clock is read late.
fn parse_now(cli: &Cli, tz: Option<&str>) -> Result<Option<NaiveDateTime>, SwitchError> {
    if cli.date.is_none() && cli.time.is_none() {
        return Ok(None);
    }
    let current = local_now(tz)?;

    let date = match &cli.date {
        Some(d) => NaiveDate::parse_from_str(d, "%Y-%m-%d")
            .map_err(|e| SwitchError::Config(format!("invalid date '{}': {}", d, e)))?,
        None => current.date(),
    };
    let time = match &cli.time {
        Some(t) => NaiveTime::parse_from_str(t, "%H:%M")
            .map_err(|e| SwitchError::Config(format!("invalid time '{}': {}", t, e)))?,
        None => current.time(),
    };
    Ok(Some(NaiveDateTime::new(date, time)))
}
