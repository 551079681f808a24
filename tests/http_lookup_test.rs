use chrono::NaiveDate;
use httpmock::prelude::*;
use std::time::Duration;
use sunswitch::location::{HttpLookup, LocationSource};
use sunswitch::{resolve_location, select_theme, Config, Phase, SwitchError};

fn lookup_for(server: &MockServer, timeout: Duration) -> HttpLookup {
    HttpLookup::new(&server.url("/ip"), &server.url("/json"), timeout)
}

#[test]
fn test_full_chain_over_http() {
    let server = MockServer::start();

    let ip_mock = server.mock(|when, then| {
        when.method(GET).path("/ip");
        then.status(200).body("203.0.113.7\n");
    });

    let geo_mock = server.mock(|when, then| {
        when.method(GET).path("/json/203.0.113.7");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({
                "status": "success",
                "country": "United States",
                "city": "New York",
                "lat": 40.7128,
                "lon": -74.006,
                "timezone": "America/New_York",
                "query": "203.0.113.7"
            }));
    });

    let lookup = lookup_for(&server, Duration::from_secs(5));
    let loc = resolve_location(&lookup, None, None, None).unwrap();

    ip_mock.assert();
    geo_mock.assert();
    assert_eq!(loc.source, LocationSource::Geolocated);
    assert_eq!(loc.address.as_deref(), Some("203.0.113.7"));
    assert!((loc.coords.lat - 40.7128).abs() < 1e-9);
    assert!((loc.coords.lon + 74.006).abs() < 1e-9);
}

#[test]
fn test_configured_coordinates_make_no_requests() {
    let server = MockServer::start();
    let ip_mock = server.mock(|when, then| {
        when.method(GET).path("/ip");
        then.status(200).body("203.0.113.7");
    });
    let geo_mock = server.mock(|when, then| {
        when.method(GET).path_contains("/json");
        then.status(200).json_body(serde_json::json!({"lat": 1.0, "lon": 2.0}));
    });

    let lookup = lookup_for(&server, Duration::from_secs(5));
    let loc = resolve_location(&lookup, Some(40.7), Some(-74.0), None).unwrap();

    assert_eq!(loc.source, LocationSource::Configured);
    ip_mock.assert_hits(0);
    geo_mock.assert_hits(0);
}

#[test]
fn test_configured_ip_skips_discovery() {
    let server = MockServer::start();
    let ip_mock = server.mock(|when, then| {
        when.method(GET).path("/ip");
        then.status(200).body("203.0.113.7");
    });
    let geo_mock = server.mock(|when, then| {
        when.method(GET).path("/json/198.51.100.20");
        then.status(200).json_body(serde_json::json!({"status": "success", "lat": 48.8566, "lon": 2.3522}));
    });

    let lookup = lookup_for(&server, Duration::from_secs(5));
    let loc = resolve_location(&lookup, None, None, Some("198.51.100.20")).unwrap();

    ip_mock.assert_hits(0);
    geo_mock.assert();
    assert!((loc.coords.lat - 48.8566).abs() < 1e-9);
}

#[test]
fn test_ip_service_error_is_network_error() {
    let server = MockServer::start();
    let ip_mock = server.mock(|when, then| {
        when.method(GET).path("/ip");
        then.status(503).body("Service Unavailable");
    });
    let geo_mock = server.mock(|when, then| {
        when.method(GET).path_contains("/json");
        then.status(200).json_body(serde_json::json!({"lat": 1.0, "lon": 2.0}));
    });

    let lookup = lookup_for(&server, Duration::from_secs(5));
    let result = resolve_location(&lookup, None, None, None);

    assert!(matches!(result, Err(SwitchError::Network(_))), "got {:?}", result);
    ip_mock.assert();
    geo_mock.assert_hits(0);
}

#[test]
fn test_ip_service_unreachable() {
    let server = MockServer::start();
    let geo_mock = server.mock(|when, then| {
        when.method(GET).path_contains("/json");
        then.status(200).json_body(serde_json::json!({"lat": 1.0, "lon": 2.0}));
    });

    // Nothing listens on port 1.
    let lookup = HttpLookup::new("http://127.0.0.1:1/ip", &server.url("/json"), Duration::from_secs(2));
    let result = resolve_location(&lookup, None, None, None);

    assert!(matches!(result, Err(SwitchError::Network(_))));
    geo_mock.assert_hits(0);
}

#[test]
fn test_ip_service_timeout() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/ip");
        then.status(200).body("203.0.113.7").delay(Duration::from_secs(3));
    });

    let lookup = lookup_for(&server, Duration::from_millis(500));
    let result = resolve_location(&lookup, None, None, None);

    assert!(matches!(result, Err(SwitchError::Network(_))));
}

#[test]
fn test_geolocation_fail_document() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/ip");
        then.status(200).body("10.0.0.1");
    });
    server.mock(|when, then| {
        when.method(GET).path("/json/10.0.0.1");
        then.status(200).json_body(serde_json::json!({
            "status": "fail",
            "message": "private range",
            "query": "10.0.0.1"
        }));
    });

    let lookup = lookup_for(&server, Duration::from_secs(5));
    match resolve_location(&lookup, None, None, None) {
        Err(SwitchError::Geolocation(msg)) => assert!(msg.contains("private range")),
        other => panic!("expected geolocation error, got {:?}", other),
    }
}

#[test]
fn test_geolocation_http_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/json/203.0.113.7");
        then.status(429).body("Too Many Requests");
    });

    let lookup = lookup_for(&server, Duration::from_secs(5));
    let result = resolve_location(&lookup, None, None, Some("203.0.113.7"));
    assert!(matches!(result, Err(SwitchError::Geolocation(_))), "got {:?}", result);
}

#[test]
fn test_geolocation_malformed_body() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/json/203.0.113.7");
        then.status(200).body("<html>oops</html>");
    });

    let lookup = lookup_for(&server, Duration::from_secs(5));
    let result = resolve_location(&lookup, None, None, Some("203.0.113.7"));
    assert!(matches!(result, Err(SwitchError::Geolocation(_))));
}

#[test]
fn test_select_theme_end_to_end() {
    let server = MockServer::start();
    let ip_mock = server.mock(|when, then| {
        when.method(GET).path("/ip");
        then.status(200).body("203.0.113.7");
    });
    let geo_mock = server.mock(|when, then| {
        when.method(GET).path("/json/203.0.113.7");
        then.status(200).json_body(serde_json::json!({"status": "success", "lat": 40.7, "lon": -74.0}));
    });

    let mut config = Config::from_toml_str(&format!(
        r#"
        light = "github-light"
        dark = "github-dark"
        timezone = "America/New_York"

        [network]
        ip_service = "{}"
        geo_service = "{}"
        timeout_secs = 5
        "#,
        server.url("/ip"),
        server.url("/json"),
    ))
    .unwrap();
    let lookup = config.http_lookup();

    let date = NaiveDate::from_ymd_opt(2021, 8, 17).unwrap();

    let day = select_theme(&mut config, &lookup, Some(date.and_hms_opt(12, 0, 0).unwrap())).unwrap();
    assert_eq!(day.theme, "github-light");
    assert_eq!(day.phase, Phase::Day);

    let night = select_theme(&mut config, &lookup, Some(date.and_hms_opt(22, 0, 0).unwrap())).unwrap();
    assert_eq!(night.theme, "github-dark");
    assert_eq!(night.phase, Phase::Night);

    // Second selection reused the coordinates cached in the config.
    ip_mock.assert_hits(1);
    geo_mock.assert_hits(1);
}
