//! Portal composition root
//!
//! [`Portal`] wires the identity provider, API client, notifier, navigator
//! and auth bridge together and exposes the user intents the browser
//! front-end (or the CLI) feeds in: link clicks, back/forward, menu and
//! accordion clicks, and form submission.

use std::sync::{Arc, Mutex};

use tokio::task::JoinHandle;

use crate::api::ApiClient;
use crate::bridge::{AuthBridge, AuthState};
use crate::config::Config;
use crate::error::{ApiError, PortalError, Result};
use crate::identity::IdentityProvider;
use crate::notifier::{Notification, Notifier};
use crate::pages::new_project::CREATED_MESSAGE;
use crate::pages::{PageRenderer, Pages, ProjectFields};
use crate::router::{
    classify_link, NavigationHandle, NavigationIntent, NavigationOutcome, Navigator, Route,
};
use crate::view::{ClickTarget, ContentSlot, MenuItem, PageView};

/// Result of a form submission that reached the backend
#[derive(Debug)]
pub enum SubmitOutcome {
    /// The project was created and a redirect to it is scheduled
    Created {
        /// Id of the new project
        project_id: String,
        /// Scheduled redirect to the detail page
        redirect: JoinHandle<NavigationOutcome>,
    },
    /// The backend rejected the request; the form is usable again
    Failed(ApiError),
}

/// The headless portal application
pub struct Portal {
    identity: Arc<dyn IdentityProvider>,
    api: ApiClient,
    notifier: Notifier,
    navigator: Navigator,
    bridge: AuthBridge,
    redirect_delay: std::time::Duration,
    session_task: Mutex<Option<JoinHandle<()>>>,
}

impl std::fmt::Debug for Portal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Portal")
            .field("navigator", &self.navigator)
            .field("auth", &self.bridge.state())
            .finish()
    }
}

impl Portal {
    /// Builds a portal positioned at `initial_href`, rendering pages from
    /// the configured backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the origin or the API base URL is invalid
    pub fn new(
        config: &Config,
        identity: Arc<dyn IdentityProvider>,
        initial_href: &str,
    ) -> Result<Self> {
        let notifier = Notifier::new(config.notifications.clone());
        let api = ApiClient::new(&config.api, Arc::clone(&identity), notifier.clone())?;
        let renderer = Arc::new(Pages::new(api.clone()));
        Self::assemble(config, identity, api, notifier, renderer, initial_href)
    }

    /// Builds a portal with a custom page renderer.
    ///
    /// # Errors
    ///
    /// Returns an error if the origin or the API base URL is invalid
    pub fn with_renderer(
        config: &Config,
        identity: Arc<dyn IdentityProvider>,
        renderer: Arc<dyn PageRenderer>,
        initial_href: &str,
    ) -> Result<Self> {
        let notifier = Notifier::new(config.notifications.clone());
        let api = ApiClient::new(&config.api, Arc::clone(&identity), notifier.clone())?;
        Self::assemble(config, identity, api, notifier, renderer, initial_href)
    }

    fn assemble(
        config: &Config,
        identity: Arc<dyn IdentityProvider>,
        api: ApiClient,
        notifier: Notifier,
        renderer: Arc<dyn PageRenderer>,
        initial_href: &str,
    ) -> Result<Self> {
        let navigator = Navigator::new(config.origin()?, initial_href, ContentSlot::new(), renderer);
        let bridge = AuthBridge::new(
            Arc::clone(&identity),
            api.clone(),
            navigator.clone(),
            config.discord.clone(),
        );

        Ok(Self {
            identity,
            api,
            notifier,
            navigator,
            bridge,
            redirect_delay: config.navigation.redirect_delay(),
            session_task: Mutex::new(None),
        })
    }

    /// Loads the identity provider and starts following session changes.
    ///
    /// # Returns
    ///
    /// The handle of the initial render when a user is already signed in
    ///
    /// # Errors
    ///
    /// Returns an error if the identity provider fails to load; this is
    /// fatal at startup
    pub async fn start(&self) -> Result<Option<NavigationHandle>> {
        let mut changes = self.identity.session_changes();
        self.identity
            .load()
            .await
            .map_err(|e| PortalError::Identity(format!("failed to load: {}", e)))?;

        let initial = self.bridge.apply_current(&mut changes);
        let task = self.bridge.spawn(changes);
        if let Some(previous) = self
            .session_task
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .replace(task)
        {
            previous.abort();
        }
        tracing::info!(href = %self.navigator.current_href(), "portal started");
        Ok(initial)
    }

    /// API client shared by every page.
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Notification queue.
    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Navigator owning the current location.
    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    /// Auth bridge owning the auth region.
    pub fn bridge(&self) -> &AuthBridge {
        &self.bridge
    }

    /// Current session state.
    pub fn auth_state(&self) -> AuthState {
        self.bridge.state()
    }

    /// Current route.
    pub fn route(&self) -> Route {
        self.navigator.current_route()
    }

    /// Current content view.
    pub fn content(&self) -> PageView {
        self.navigator.slot().view()
    }

    /// Markup of the content slot.
    pub fn content_markup(&self) -> String {
        self.navigator.slot().markup()
    }

    /// Markup of the auth region.
    pub fn auth_markup(&self) -> String {
        self.bridge.markup()
    }

    /// Notifications currently shown.
    pub fn notifications(&self) -> Vec<Notification> {
        self.notifier.snapshot()
    }

    /// A click on a link with `href`.
    ///
    /// # Returns
    ///
    /// The navigation handle when the click was an in-app navigation, or
    /// `None` when it must be left to the browser
    pub fn click_link(&self, href: &str) -> Option<NavigationHandle> {
        let location = classify_link(href, self.navigator.origin())?;
        Some(
            self.navigator
                .navigate(NavigationIntent::Push(location.href())),
        )
    }

    /// Browser back button.
    pub fn back(&self) -> NavigationHandle {
        self.navigator.navigate(NavigationIntent::Back)
    }

    /// Browser forward button.
    pub fn forward(&self) -> NavigationHandle {
        self.navigator.navigate(NavigationIntent::Forward)
    }

    /// Document-level click; closes the user menu when outside it.
    pub fn document_click(&self, target: &ClickTarget) -> bool {
        self.bridge.document_click(target)
    }

    /// Avatar button click.
    pub fn toggle_menu(&self) -> bool {
        self.bridge.toggle_menu()
    }

    /// Sign-in button click.
    ///
    /// # Errors
    ///
    /// Returns the identity provider's error
    pub async fn sign_in(&self) -> Result<()> {
        self.bridge.sign_in_clicked().await
    }

    /// Menu item click.
    ///
    /// # Errors
    ///
    /// Returns the identity provider's error
    pub async fn activate_menu_item(&self, item: MenuItem) -> Result<()> {
        self.bridge.activate(item).await
    }

    /// Click on the header of asset `index` on the detail page.
    ///
    /// # Returns
    ///
    /// Whether the asset body visibility changed
    pub fn toggle_asset(&self, index: usize) -> bool {
        self.navigator.slot().update(|view| match view {
            PageView::Detail(detail) => detail.accordion.toggle(index),
            _ => false,
        })
    }

    /// Submits the new project form.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::Form`] when the form is not shown, is already
    /// submitting, or a field is empty; no request is sent and the message
    /// is shown as a notification
    pub async fn submit_new_project(&self, fields: ProjectFields) -> Result<SubmitOutcome> {
        let slot = self.navigator.slot();
        let generation = slot.generation();
        let begun = slot
            .update_at(generation, |view| match view {
                PageView::NewProject(form) => form.begin(fields),
                _ => Err(PortalError::Form("the new project form is not shown".to_string())),
            })
            .unwrap_or_else(|| Err(PortalError::Form("navigation in progress".to_string())));

        let request = match begun {
            Ok(request) => request,
            Err(e) => {
                tracing::debug!(error = %e, "submission refused");
                self.notifier.error(e.to_string());
                return Err(e.into());
            }
        };

        tracing::info!(name = %request.project_name, "creating project");
        match self.api.create_project(&request).await {
            Ok(created) => {
                let project_id = created.project_id;
                slot.update_at(generation, |view| {
                    if let PageView::NewProject(form) = view {
                        form.succeed(project_id.clone());
                    }
                });
                self.notifier.success(CREATED_MESSAGE);
                let redirect = self.navigator.navigate_after(
                    self.redirect_delay,
                    Route::Detail {
                        id: project_id.clone(),
                    }
                    .path(),
                );
                Ok(SubmitOutcome::Created {
                    project_id,
                    redirect,
                })
            }
            Err(e) => {
                slot.update_at(generation, |view| {
                    if let PageView::NewProject(form) = view {
                        form.fail();
                    }
                });
                Ok(SubmitOutcome::Failed(e))
            }
        }
    }
}

impl Drop for Portal {
    fn drop(&mut self) {
        if let Some(task) = self
            .session_task
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .take()
        {
            task.abort();
        }
    }
}
