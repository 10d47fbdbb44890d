//! In-process fake identity provider
//!
//! [`FakeIdentity`] keeps its session in memory, records every operation
//! the portal invokes, and lets tests drive session transitions at
//! arbitrary times (initial load, external sign-in or sign-out, token
//! expiry).

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::watch;

use super::{IdentityProvider, SessionSnapshot, User};
use crate::error::Result;

/// Operation recorded by [`FakeIdentity`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityCall {
    /// `load()`
    Load,
    /// `open_sign_in()`
    OpenSignIn,
    /// `open_user_profile()`
    OpenUserProfile,
    /// `sign_out()`
    SignOut,
    /// `link_external_account(strategy, redirect_url)`
    LinkExternalAccount {
        /// Strategy identifier
        strategy: String,
        /// Redirect URL
        redirect_url: String,
    },
}

#[derive(Debug, Default)]
struct FakeState {
    user_after_load: Option<User>,
    token: Option<String>,
    calls: Vec<IdentityCall>,
}

/// In-memory identity provider for tests
#[derive(Debug, Clone)]
pub struct FakeIdentity {
    state: Arc<Mutex<FakeState>>,
    tx: Arc<watch::Sender<SessionSnapshot>>,
}

impl FakeIdentity {
    /// Creates a provider that reports a signed-out session after `load()`.
    pub fn signed_out() -> Self {
        let (tx, _rx) = watch::channel(SessionSnapshot::Loading);
        Self {
            state: Arc::new(Mutex::new(FakeState::default())),
            tx: Arc::new(tx),
        }
    }

    /// Creates a provider that reports `user` signed in after `load()`.
    pub fn signed_in(user: User, token: impl Into<String>) -> Self {
        let fake = Self::signed_out();
        {
            let mut state = fake.lock();
            state.user_after_load = Some(user);
            state.token = Some(token.into());
        }
        fake
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// Signs `user` in with `token` and notifies listeners.
    pub fn sign_in_as(&self, user: User, token: impl Into<String>) {
        self.lock().token = Some(token.into());
        self.tx.send_replace(SessionSnapshot::SignedIn(user));
    }

    /// Ends the session externally and notifies listeners.
    pub fn expire_session(&self) {
        self.lock().token = None;
        self.tx.send_replace(SessionSnapshot::SignedOut);
    }

    /// Replaces the token without a session transition.
    pub fn set_token(&self, token: Option<String>) {
        self.lock().token = token;
    }

    /// Every operation invoked so far, in order.
    pub fn calls(&self) -> Vec<IdentityCall> {
        self.lock().calls.clone()
    }

    fn record(&self, call: IdentityCall) {
        self.lock().calls.push(call);
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentity {
    async fn load(&self) -> Result<()> {
        self.record(IdentityCall::Load);
        let snapshot = match self.lock().user_after_load.clone() {
            Some(user) => SessionSnapshot::SignedIn(user),
            None => SessionSnapshot::SignedOut,
        };
        self.tx.send_replace(snapshot);
        Ok(())
    }

    fn session_changes(&self) -> watch::Receiver<SessionSnapshot> {
        self.tx.subscribe()
    }

    async fn get_token(&self) -> Result<Option<String>> {
        Ok(self.lock().token.clone())
    }

    async fn open_sign_in(&self) -> Result<()> {
        self.record(IdentityCall::OpenSignIn);
        Ok(())
    }

    async fn open_user_profile(&self) -> Result<()> {
        self.record(IdentityCall::OpenUserProfile);
        Ok(())
    }

    async fn sign_out(&self) -> Result<()> {
        self.record(IdentityCall::SignOut);
        self.expire_session();
        Ok(())
    }

    async fn link_external_account(&self, strategy: &str, redirect_url: &str) -> Result<()> {
        self.record(IdentityCall::LinkExternalAccount {
            strategy: strategy.to_string(),
            redirect_url: redirect_url.to_string(),
        });
        Ok(())
    }
}
