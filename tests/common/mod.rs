use std::fs;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use parel_portal::config::Config;
use parel_portal::identity::{FakeIdentity, User};
use parel_portal::Portal;

#[allow(dead_code)]
pub const TOKEN: &str = "tok_test_123";

/// Configuration pointing at `base_url` with short timings.
#[allow(dead_code)]
pub fn test_config(base_url: &str) -> Config {
    let mut config = Config::default();
    config.api.base_url = base_url.to_string();
    config.api.timeout_seconds = 5;
    config.identity.publishable_key = "pk_test_portal".to_string();
    config.navigation.redirect_delay_ms = 50;
    config
}

#[allow(dead_code)]
pub fn ada() -> User {
    User::new("user_ada")
        .with_name("Ada Lovelace")
        .with_image("https://img.example.com/ada.png")
}

#[allow(dead_code)]
pub async fn mount_discord_status(server: &MockServer, linked: bool) {
    mount_slow_discord_status(server, linked, Duration::ZERO).await;
}

/// Discord link status that answers only after `delay`.
#[allow(dead_code)]
pub async fn mount_slow_discord_status(server: &MockServer, linked: bool, delay: Duration) {
    Mock::given(method("GET"))
        .and(path("/auth/discord-link-status"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "isLinked": linked }))
                .set_delay(delay),
        )
        .mount(server)
        .await;
}

/// Starts a portal at `href` with Ada signed in and waits for the first
/// render and the Discord link status.
#[allow(dead_code)]
pub async fn signed_in_portal(server: &MockServer, href: &str) -> (Portal, FakeIdentity) {
    signed_in_portal_with(test_config(&server.uri()), href).await
}

#[allow(dead_code)]
pub async fn signed_in_portal_with(config: Config, href: &str) -> (Portal, FakeIdentity) {
    let identity = FakeIdentity::signed_in(ada(), TOKEN);
    let portal = Portal::new(&config, Arc::new(identity.clone()), href).expect("portal builds");
    let render = portal
        .start()
        .await
        .expect("portal starts")
        .expect("signed-in start renders");
    render.finished().await;
    portal.bridge().link_status_settled().await;
    (portal, identity)
}

/// Polls `condition` until it holds or two seconds pass.
#[allow(dead_code)]
pub async fn wait_until<F, Fut>(mut condition: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    while tokio::time::Instant::now() < deadline {
        if condition().await {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("portal.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}
