//! Integration tests for the gbp-badge binary
//!
//! Runs the compiled binary with isolated config and cache directories.

use std::fs;
use std::process::Command;

use tempfile::TempDir;
use wiremock::matchers::{method, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Helper to run the CLI with given args and capture output
fn run_cli(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_gbp-badge"))
        .args(args)
        .output()
        .expect("Failed to execute gbp-badge")
}

#[test]
fn test_help_flag_exits_successfully() {
    let output = run_cli(&["--help"]);
    assert!(output.status.success(), "Expected --help to exit successfully");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("gbp-badge"), "Help should mention gbp-badge");
    assert!(stdout.contains("--place-id"), "Help should mention --place-id");
    assert!(stdout.contains("configure"), "Help should list configure");
}

#[test]
fn test_style_prints_stylesheet() {
    let output = run_cli(&["style"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(".gbp-badge{"));
}

#[test]
fn test_render_without_credentials_prints_unavailable_badge() {
    let config_dir = TempDir::new().unwrap();
    let cache_dir = TempDir::new().unwrap();

    let output = run_cli(&[
        "--config-dir",
        config_dir.path().to_str().unwrap(),
        "--cache-dir",
        cache_dir.path().to_str().unwrap(),
    ]);

    assert!(output.status.success(), "A failed lookup must not fail the command");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Reviews unavailable"));
    assert!(stdout.contains(r#"role="img""#));
    assert!(!stdout.contains("<style"));
}

#[test]
fn test_render_with_style_prepends_stylesheet() {
    let config_dir = TempDir::new().unwrap();
    let cache_dir = TempDir::new().unwrap();

    let output = run_cli(&[
        "render",
        "--with-style",
        "--stars",
        "3",
        "--config-dir",
        config_dir.path().to_str().unwrap(),
        "--cache-dir",
        cache_dir.path().to_str().unwrap(),
    ]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("<style id=\"gbp-badge-css\">"));
    assert_eq!(stdout.matches(r#"class="gbp-badge-star""#).count(), 3);
}

#[test]
fn test_configure_writes_sanitized_settings() {
    let config_dir = TempDir::new().unwrap();

    let output = run_cli(&[
        "configure",
        "--place-id",
        " place ",
        "--stars",
        "0",
        "--star-color",
        "orange",
        "--config-dir",
        config_dir.path().to_str().unwrap(),
    ]);

    assert!(output.status.success());
    let saved = fs::read_to_string(config_dir.path().join("settings.json")).unwrap();
    let saved: serde_json::Value = serde_json::from_str(&saved).unwrap();
    assert_eq!(saved["place_id"], "place");
    assert_eq!(saved["stars"], 1);
    assert_eq!(saved["star_color"], "#E9966F");
    assert_eq!(saved["cache_minutes"], 720);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_render_uses_saved_settings_and_endpoint() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("place_id", "saved-place"))
        .and(query_param("key", "saved-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "OK",
            "result": { "rating": 4.7, "user_ratings_total": 2380 }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config_dir = TempDir::new().unwrap();
    let cache_dir = TempDir::new().unwrap();
    // Only a legacy settings file exists
    fs::write(
        config_dir.path().join("stoke-gbp-rating.json"),
        r#"{"place_id":"saved-place","api_key":"saved-key","stars":5}"#,
    )
    .unwrap();

    let endpoint = format!("{}/details", mock_server.uri());
    let args = [
        "render".to_string(),
        "--endpoint".to_string(),
        endpoint,
        "--config-dir".to_string(),
        config_dir.path().display().to_string(),
        "--cache-dir".to_string(),
        cache_dir.path().display().to_string(),
    ];

    let first = Command::new(env!("CARGO_BIN_EXE_gbp-badge"))
        .args(&args)
        .output()
        .expect("Failed to execute gbp-badge");
    let stdout = String::from_utf8_lossy(&first.stdout);
    assert!(first.status.success());
    assert!(stdout.contains("Google rating: 4.7 out of 5 from 2,380 reviews"));

    // Second run is answered from the on-disk cache
    let second = Command::new(env!("CARGO_BIN_EXE_gbp-badge"))
        .args(&args)
        .output()
        .expect("Failed to execute gbp-badge");
    assert!(String::from_utf8_lossy(&second.stdout).contains("2,380 Google reviews"));
}
