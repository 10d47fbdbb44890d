//! CLI startup and command tests
//!
//! Runs the `portal` binary with temporary configuration files. Startup
//! failures (missing or malformed configuration, missing session) must
//! abort with a clear message.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;

const PORTAL_VARS: &[&str] = &[
    "PORTAL_API_URL",
    "PORTAL_API_TIMEOUT_SECONDS",
    "PORTAL_PUBLISHABLE_KEY",
    "PORTAL_APP_ORIGIN",
    "PORTAL_DISCORD_REDIRECT_URI",
    "PORTAL_REDIRECT_DELAY_MS",
    "PORTAL_LOG_LEVEL",
    "PORTAL_JSON_LOGS",
    "PORTAL_SESSION_TOKEN",
    "RUST_LOG",
];

/// `portal` with no inherited portal environment.
fn portal_cmd() -> Command {
    let mut cmd = Command::cargo_bin("portal").unwrap();
    for var in PORTAL_VARS {
        cmd.env_remove(var);
    }
    cmd.env("NO_COLOR", "1");
    cmd
}

fn valid_config(base_url: &str) -> String {
    format!(
        "api:\n  base_url: \"{}\"\nidentity:\n  publishable_key: \"pk_test_cli\"\n",
        base_url
    )
}

#[test]
fn test_help_lists_commands() {
    portal_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("new-project"))
        .stdout(predicate::str::contains("projects"));
}

#[test]
fn test_missing_publishable_key_is_fatal() {
    let (_temp_dir, config_path) =
        common::temp_config_file("api:\n  base_url: \"https://api.example.com\"\n");

    portal_cmd()
        .arg("--config")
        .arg(config_path)
        .arg("projects")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Missing identity publishable key"));
}

#[test]
fn test_missing_api_url_is_fatal() {
    let (_temp_dir, config_path) =
        common::temp_config_file("identity:\n  publishable_key: \"pk_test_cli\"\n");

    portal_cmd()
        .arg("--config")
        .arg(config_path)
        .arg("open")
        .arg("/")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Missing API base URL"));
}

#[test]
fn test_malformed_config_is_fatal() {
    let (_temp_dir, config_path) = common::temp_config_file("api: [not, a, mapping");

    portal_cmd()
        .arg("--config")
        .arg(config_path)
        .arg("projects")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse config"));
}

#[test]
fn test_env_supplies_required_settings() {
    portal_cmd()
        .arg("--config")
        .arg("/nonexistent/portal.yaml")
        .env("PORTAL_API_URL", "http://127.0.0.1:9")
        .env("PORTAL_PUBLISHABLE_KEY", "pk_env")
        .arg("open")
        .arg("/")
        .assert()
        .success()
        .stdout(predicate::str::contains("Please sign in to continue."))
        .stdout(predicate::str::contains("Sign In / Sign Up"));
}

#[test]
fn test_config_load_warnings_are_logged() {
    portal_cmd()
        .arg("--config")
        .arg("/nonexistent/portal.yaml")
        .env("PORTAL_API_URL", "http://127.0.0.1:9")
        .env("PORTAL_PUBLISHABLE_KEY", "pk_env")
        .env("PORTAL_REDIRECT_DELAY_MS", "soon")
        .arg("open")
        .arg("/")
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "Config file not found at /nonexistent/portal.yaml",
        ))
        .stderr(predicate::str::contains("Invalid PORTAL_REDIRECT_DELAY_MS: soon"));
}

#[test]
fn test_projects_without_token_fails() {
    let (_temp_dir, config_path) = common::temp_config_file(&valid_config("http://127.0.0.1:9"));

    portal_cmd()
        .arg("--config")
        .arg(config_path)
        .arg("projects")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No session token"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_projects_json_output() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/projects"))
        .and(header("authorization", "Bearer tok_cli"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "P1", "name": "Acme", "status": "Active" }
        ])))
        .expect(1)
        .mount(&server)
        .await;
    let (_temp_dir, config_path) = common::temp_config_file(&valid_config(&server.uri()));

    let output = portal_cmd()
        .arg("--config")
        .arg(config_path)
        .arg("--token")
        .arg("tok_cli")
        .arg("projects")
        .arg("--json")
        .output()
        .unwrap();

    assert!(output.status.success());
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed[0]["id"], "P1");
    assert_eq!(parsed[0]["name"], "Acme");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_open_renders_detail_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/discord-link-status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "isLinked": true })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/project/P7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "P7",
            "name": "Seven",
            "masterplan": { "requiredAssets": [] }
        })))
        .mount(&server)
        .await;
    let (_temp_dir, config_path) = common::temp_config_file(&valid_config(&server.uri()));

    portal_cmd()
        .arg("--config")
        .arg(config_path)
        .arg("--token")
        .arg("tok_cli")
        .arg("open")
        .arg("/?project=P7")
        .assert()
        .success()
        .stdout(predicate::str::contains("Location: /project/P7"))
        .stdout(predicate::str::contains("Seven"))
        .stdout(predicate::str::contains("No assets defined in masterplan."));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_new_project_reports_created_location() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/discord-link-status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "isLinked": true })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/projects"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "projectId": "P99" })))
        .expect(1)
        .mount(&server)
        .await;
    let (_temp_dir, config_path) = common::temp_config_file(&valid_config(&server.uri()));

    portal_cmd()
        .arg("--config")
        .arg(config_path)
        .arg("--token")
        .arg("tok_cli")
        .args(["new-project", "--name", "Nine", "--audience", "Makers", "--values", "Care"])
        .assert()
        .success()
        .stdout(predicate::str::contains("/project/P99"));
}
