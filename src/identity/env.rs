//! Token-backed identity session for the command line
//!
//! A terminal cannot host the identity provider's sign-in widget, so the
//! CLI accepts a bearer token minted by the provider (for example copied
//! from a browser session) and treats its presence as a signed-in session.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::watch;

use super::{IdentityProvider, SessionSnapshot, User};
use crate::error::{PortalError, Result};

/// Identity session backed by a static bearer token
#[derive(Debug, Clone)]
pub struct EnvIdentity {
    publishable_key: String,
    token: Arc<Mutex<Option<String>>>,
    tx: Arc<watch::Sender<SessionSnapshot>>,
}

impl EnvIdentity {
    /// Creates a session for the given publishable key and optional token.
    ///
    /// An empty token counts as no token.
    pub fn new(publishable_key: impl Into<String>, token: Option<String>) -> Self {
        let (tx, _rx) = watch::channel(SessionSnapshot::Loading);
        Self {
            publishable_key: publishable_key.into(),
            token: Arc::new(Mutex::new(token.filter(|t| !t.trim().is_empty()))),
            tx: Arc::new(tx),
        }
    }

    fn current_token(&self) -> Option<String> {
        self.token
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }
}

#[async_trait]
impl IdentityProvider for EnvIdentity {
    async fn load(&self) -> Result<()> {
        if self.publishable_key.trim().is_empty() {
            return Err(PortalError::Identity("publishable key is empty".to_string()).into());
        }

        let snapshot = match self.current_token() {
            Some(_) => SessionSnapshot::SignedIn(User::new("cli-session").with_name("CLI session")),
            None => SessionSnapshot::SignedOut,
        };
        tracing::debug!(signed_in = snapshot.user().is_some(), "CLI identity loaded");
        self.tx.send_replace(snapshot);
        Ok(())
    }

    fn session_changes(&self) -> watch::Receiver<SessionSnapshot> {
        self.tx.subscribe()
    }

    async fn get_token(&self) -> Result<Option<String>> {
        Ok(self.current_token())
    }

    async fn open_sign_in(&self) -> Result<()> {
        tracing::warn!(
            "Sign in through the web portal and pass the session token with --token or PORTAL_SESSION_TOKEN"
        );
        Ok(())
    }

    async fn open_user_profile(&self) -> Result<()> {
        tracing::info!("Account management is only available in the web portal");
        Ok(())
    }

    async fn sign_out(&self) -> Result<()> {
        *self.token.lock().unwrap_or_else(|p| p.into_inner()) = None;
        self.tx.send_replace(SessionSnapshot::SignedOut);
        Ok(())
    }

    async fn link_external_account(&self, strategy: &str, redirect_url: &str) -> Result<()> {
        tracing::info!(
            strategy = %strategy,
            redirect_url = %redirect_url,
            "Account linking must be completed in the web portal"
        );
        Ok(())
    }
}
