//! Auth bridge
//!
//! Sits above the navigator and gates all rendering on the identity
//! session. Session snapshots drive a three-state machine:
//!
//! - `Unknown`: before the provider's initial load completes; nothing is
//!   rendered
//! - `SignedOut`: sign-in affordance in the auth region, the static
//!   placeholder in the content slot, navigation suspended
//! - `SignedIn`: avatar menu in the auth region, navigation resumed and
//!   the current location rendered again
//!
//! Snapshots may arrive at arbitrary times. Every `SignedIn` snapshot
//! reruns the router, like the provider listener it replaces. Applying a
//! snapshot never waits on the network: the Discord link status is fetched
//! by a background task so a sign-out is applied as soon as it arrives.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use url::Url;

use crate::api::ApiClient;
use crate::config::DiscordConfig;
use crate::error::Result;
use crate::identity::{IdentityProvider, SessionSnapshot, User};
use crate::router::{NavigationHandle, NavigationIntent, Navigator};
use crate::view::{AuthWidget, ClickTarget, MenuItem, PageView, UserMenu};

/// Session state as seen by the portal
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthState {
    /// Initial load has not completed
    #[default]
    Unknown,
    /// Nobody is signed in
    SignedOut,
    /// `User` is signed in
    SignedIn(User),
}

#[derive(Debug, Default)]
struct BridgeView {
    state: AuthState,
    widget: AuthWidget,
}

struct BridgeInner {
    identity: Arc<dyn IdentityProvider>,
    api: ApiClient,
    navigator: Navigator,
    discord: DiscordConfig,
    view: Mutex<BridgeView>,
    link_status: Mutex<Option<JoinHandle<()>>>,
}

/// Connects identity session changes to the auth region and the navigator
#[derive(Clone)]
pub struct AuthBridge {
    inner: Arc<BridgeInner>,
}

impl std::fmt::Debug for AuthBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthBridge")
            .field("state", &self.state())
            .finish()
    }
}

impl AuthBridge {
    /// Creates a bridge in the `Unknown` state.
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        api: ApiClient,
        navigator: Navigator,
        discord: DiscordConfig,
    ) -> Self {
        Self {
            inner: Arc::new(BridgeInner {
                identity,
                api,
                navigator,
                discord,
                view: Mutex::new(BridgeView::default()),
                link_status: Mutex::new(None),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, BridgeView> {
        self.inner.view.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// Current session state.
    pub fn state(&self) -> AuthState {
        self.lock().state.clone()
    }

    /// Copy of the auth region.
    pub fn widget(&self) -> AuthWidget {
        self.lock().widget.clone()
    }

    /// Markup of the auth region.
    pub fn markup(&self) -> String {
        self.lock().widget.markup()
    }

    /// Applies one session snapshot.
    ///
    /// # Returns
    ///
    /// The handle of the render started by a `SignedIn` snapshot
    pub fn apply(&self, snapshot: SessionSnapshot) -> Option<NavigationHandle> {
        match snapshot {
            SessionSnapshot::Loading => None,
            SessionSnapshot::SignedOut => {
                tracing::info!("session signed out");
                self.replace_link_status(None);
                {
                    let mut view = self.lock();
                    view.state = AuthState::SignedOut;
                    view.widget = AuthWidget::SignIn;
                }
                self.inner.navigator.suspend(PageView::SignedOut);
                None
            }
            SessionSnapshot::SignedIn(user) => {
                tracing::info!(user = %user.id, "session signed in");
                {
                    let mut view = self.lock();
                    view.state = AuthState::SignedIn(user.clone());
                    view.widget = AuthWidget::Menu(UserMenu::new(user.clone()));
                }
                self.inner.navigator.resume();
                let handle = self.inner.navigator.navigate(NavigationIntent::Reload);
                let bridge = self.clone();
                let task = tokio::spawn(async move { bridge.refresh_discord_link(&user).await });
                self.replace_link_status(Some(task));
                Some(handle)
            }
        }
    }

    fn replace_link_status(&self, task: Option<JoinHandle<()>>) {
        let previous = {
            let mut pending = self
                .inner
                .link_status
                .lock()
                .unwrap_or_else(|p| p.into_inner());
            std::mem::replace(&mut *pending, task)
        };
        if let Some(previous) = previous {
            previous.abort();
        }
    }

    /// Waits for the Discord link status request started by the last
    /// `SignedIn` snapshot, if one is still pending.
    pub async fn link_status_settled(&self) {
        let pending = self
            .inner
            .link_status
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .take();
        if let Some(task) = pending {
            if let Err(e) = task.await {
                if !e.is_cancelled() {
                    tracing::warn!(error = %e, "discord link status task failed");
                }
            }
        }
    }

    async fn refresh_discord_link(&self, user: &User) {
        let status = match self.inner.api.discord_link_status().await {
            Ok(status) => status,
            Err(e) => {
                tracing::debug!(error = %e, "discord link status unavailable");
                return;
            }
        };
        let mut view = self.lock();
        if let Some(menu) = view.widget.menu_mut() {
            if menu.user.id == user.id {
                menu.offer_discord_link = !status.is_linked;
            }
        }
    }

    /// Applies the snapshot currently held by `changes` and marks it seen.
    pub fn apply_current(
        &self,
        changes: &mut watch::Receiver<SessionSnapshot>,
    ) -> Option<NavigationHandle> {
        let snapshot = changes.borrow_and_update().clone();
        self.apply(snapshot)
    }

    /// Applies every change after the last seen snapshot until the provider
    /// goes away.
    pub async fn run(self, mut changes: watch::Receiver<SessionSnapshot>) {
        while changes.changed().await.is_ok() {
            self.apply_current(&mut changes);
        }
        tracing::debug!("identity provider dropped its session channel");
    }

    /// Spawns [`AuthBridge::run`] on `changes`.
    pub fn spawn(&self, changes: watch::Receiver<SessionSnapshot>) -> JoinHandle<()> {
        tokio::spawn(self.clone().run(changes))
    }

    /// Avatar button click.
    ///
    /// # Returns
    ///
    /// Whether the dropdown is now open
    pub fn toggle_menu(&self) -> bool {
        let mut view = self.lock();
        match view.widget.menu_mut() {
            Some(menu) => {
                menu.toggle();
                menu.open
            }
            None => false,
        }
    }

    /// Document-level click; closes the dropdown when outside its container.
    pub fn document_click(&self, target: &ClickTarget) -> bool {
        self.lock()
            .widget
            .menu_mut()
            .map(|menu| menu.document_click(target))
            .unwrap_or(false)
    }

    /// Sign-in affordance click.
    ///
    /// # Errors
    ///
    /// Returns the identity provider's error
    pub async fn sign_in_clicked(&self) -> Result<()> {
        let result = self.inner.identity.open_sign_in().await;
        self.report(result)
    }

    /// Runs a menu action and closes the dropdown.
    ///
    /// # Errors
    ///
    /// Returns the identity provider's error; it is also shown as a
    /// notification
    pub async fn activate(&self, item: MenuItem) -> Result<()> {
        let offered = {
            let mut view = self.lock();
            match view.widget.menu_mut() {
                Some(menu) => {
                    menu.open = false;
                    menu.items().contains(&item)
                }
                None => false,
            }
        };
        if !offered {
            tracing::debug!(?item, "menu action not offered");
            return Ok(());
        }

        let identity = &self.inner.identity;
        let result = match item {
            MenuItem::ManageAccount => identity.open_user_profile().await,
            MenuItem::LinkDiscord => {
                let redirect = self.discord_redirect_url();
                tracing::info!(strategy = %self.inner.discord.strategy, %redirect, "linking discord account");
                identity
                    .link_external_account(&self.inner.discord.strategy, &redirect)
                    .await
            }
            MenuItem::SignOut => identity.sign_out().await,
        };
        self.report(result)
    }

    /// Where the identity provider returns after linking Discord.
    ///
    /// The configured redirect URI, or the current location on the app
    /// origin.
    pub fn discord_redirect_url(&self) -> String {
        if let Some(uri) = self
            .inner
            .discord
            .redirect_uri
            .as_deref()
            .filter(|uri| !uri.trim().is_empty())
        {
            return uri.to_string();
        }
        let origin: &Url = self.inner.navigator.origin();
        let href = self.inner.navigator.current_href();
        origin
            .join(&href)
            .map(|url| url.to_string())
            .unwrap_or_else(|_| origin.to_string())
    }

    fn report(&self, result: Result<()>) -> Result<()> {
        if let Err(e) = &result {
            tracing::warn!(error = %e, "identity provider operation failed");
            self.inner.api.notifier().error(e.to_string());
        }
        result
    }
}
