//! Identity provider abstraction
//!
//! The portal never implements authentication itself. Everything it needs
//! from the hosted identity provider is expressed through the
//! [`IdentityProvider`] trait so the router, the auth bridge and the API
//! client can be driven by [`fake::FakeIdentity`] in tests and by
//! [`env::EnvIdentity`] from the command line.
//!
//! # Session changes
//!
//! [`IdentityProvider::session_changes`] returns a `tokio::sync::watch`
//! receiver. The current snapshot is observable immediately, which matches
//! the provider contract of notifying listeners on every transition
//! including the initial one.

pub mod env;
pub mod fake;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::error::Result;

pub use env::EnvIdentity;
pub use fake::FakeIdentity;

/// Signed-in user as reported by the identity provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Provider-issued user id
    pub id: String,
    /// Display name, when the user has set one
    #[serde(default)]
    pub full_name: Option<String>,
    /// Avatar image URL
    #[serde(default)]
    pub image_url: Option<String>,
}

impl User {
    /// Creates a user with only an id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            full_name: None,
            image_url: None,
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.full_name = Some(name.into());
        self
    }

    /// Sets the avatar URL.
    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    /// Label used for the avatar button
    pub fn display_label(&self) -> &str {
        self.full_name.as_deref().unwrap_or("User menu")
    }
}

/// Snapshot of the identity provider session
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionSnapshot {
    /// The provider has not finished its initial load
    #[default]
    Loading,
    /// No user is signed in
    SignedOut,
    /// A user is signed in
    SignedIn(User),
}

impl SessionSnapshot {
    /// The signed-in user, if any.
    pub fn user(&self) -> Option<&User> {
        match self {
            Self::SignedIn(user) => Some(user),
            _ => None,
        }
    }
}

/// Capability exposed by the external identity provider
///
/// # Examples
///
/// ```
/// use parel_portal::identity::{FakeIdentity, IdentityProvider, User};
///
/// # #[tokio::main]
/// # async fn main() -> anyhow::Result<()> {
/// let identity = FakeIdentity::signed_in(User::new("user_1"), "tok_abc");
/// identity.load().await?;
/// assert_eq!(identity.get_token().await?, Some("tok_abc".to_string()));
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Completes the provider's asynchronous initialization.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider cannot be initialized.
    async fn load(&self) -> Result<()>;

    /// Subscribes to session transitions.
    fn session_changes(&self) -> watch::Receiver<SessionSnapshot>;

    /// Returns a bearer token for the current session, if there is one.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider fails to mint a token.
    async fn get_token(&self) -> Result<Option<String>>;

    /// Opens the provider's sign-in flow.
    async fn open_sign_in(&self) -> Result<()>;

    /// Opens the provider's profile management view.
    async fn open_user_profile(&self) -> Result<()>;

    /// Ends the current session.
    async fn sign_out(&self) -> Result<()>;

    /// Links an external account to the signed-in user.
    ///
    /// # Arguments
    ///
    /// * `strategy` - Provider strategy identifier (e.g. `oauth_discord`)
    /// * `redirect_url` - Where the provider returns after linking
    async fn link_external_account(&self, strategy: &str, redirect_url: &str) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_snapshot_is_loading() {
        assert_eq!(SessionSnapshot::default(), SessionSnapshot::Loading);
        assert!(SessionSnapshot::default().user().is_none());
    }

    #[test]
    fn test_display_label_falls_back() {
        let user = User::new("u1");
        assert_eq!(user.display_label(), "User menu");
        let named = User::new("u1").with_name("Ada Lovelace");
        assert_eq!(named.display_label(), "Ada Lovelace");
    }
}
