/*!
Command handlers for the CLI

Each handler builds the pieces of the portal it needs from the loaded
configuration and the session token:

- `open`: run the full portal for one location and print the page
- `projects`: list projects or show one project
- `new_project`: submit the new project form
- `discord`: Discord link status
*/

use std::sync::Arc;

use colored::Colorize;

use crate::api::ApiClient;
use crate::config::Config;
use crate::error::{PortalError, Result};
use crate::identity::{EnvIdentity, IdentityProvider};
use crate::notifier::{NotificationKind, Notifier};

pub mod discord;
pub mod new_project;
pub mod projects;

// Open command handler
pub mod open {
    //! Runs the portal for one location and prints what the browser would
    //! show: the auth region, the content slot and any notifications.

    use super::*;
    use crate::portal::Portal;

    /// Render the page at `path`
    ///
    /// # Arguments
    ///
    /// * `config` - Validated configuration
    /// * `token` - Session token, if any
    /// * `path` - Location to open (path with optional query)
    ///
    /// # Errors
    ///
    /// Returns an error if the identity session cannot be loaded
    pub async fn run_open(config: &Config, token: Option<String>, path: &str) -> Result<()> {
        let identity = identity(config, token);
        let portal = Portal::new(config, identity, path)?;

        if let Some(render) = portal.start().await? {
            let outcome = render.finished().await;
            tracing::debug!(?outcome, "initial render finished");
            portal.bridge().link_status_settled().await;
        }

        println!("{}", format!("Location: {}", portal.navigator().current_href()).dimmed());
        println!("{}", portal.auth_markup());
        println!("{}", portal.content_markup());
        print_notifications(portal.notifier());
        Ok(())
    }
}

/// Identity session for the configured publishable key and `token`.
pub(crate) fn identity(config: &Config, token: Option<String>) -> Arc<dyn IdentityProvider> {
    Arc::new(EnvIdentity::new(
        config.identity.publishable_key.clone(),
        token,
    ))
}

/// Loads the session and builds an API client for it.
///
/// # Errors
///
/// Returns an error if the session cannot be loaded or no token is
/// available
pub(crate) async fn session_client(
    config: &Config,
    token: Option<String>,
) -> Result<(ApiClient, Notifier)> {
    let identity = identity(config, token);
    identity.load().await?;
    if identity.session_changes().borrow().user().is_none() {
        return Err(PortalError::Identity(
            "No session token. Pass --token or set PORTAL_SESSION_TOKEN".to_string(),
        )
        .into());
    }

    let notifier = Notifier::new(config.notifications.clone());
    let client = ApiClient::new(&config.api, identity, notifier.clone())?;
    Ok((client, notifier))
}

/// Prints the notifications currently shown.
pub(crate) fn print_notifications(notifier: &Notifier) {
    for notification in notifier.snapshot() {
        let line = match notification.kind {
            NotificationKind::Error => notification.message.red(),
            NotificationKind::Success => notification.message.green(),
            NotificationKind::Info => notification.message.cyan(),
        };
        eprintln!("{}", line);
    }
}
