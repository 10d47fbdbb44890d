//! Navigation state and cancellable page renders
//!
//! The [`Navigator`] owns the current location and the browser-style
//! history. [`Navigator::navigate`] is the single entry point through which
//! the location changes. Every navigation:
//!
//! 1. resolves the intent against the history,
//! 2. bumps the generation and cancels the previous in-flight render,
//! 3. resets the content slot to the loading placeholder,
//! 4. spawns a render task that commits only if its generation is still
//!    current.
//!
//! A slow response for an earlier navigation therefore never overwrites
//! the content of a later one. A delayed redirect scheduled with
//! [`Navigator::navigate_after`] is dropped when the location changes or
//! rendering is suspended before it fires.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use url::Url;

use super::{Location, Route};
use crate::pages::PageRenderer;
use crate::view::{ContentSlot, PageView};

/// A request to change (or re-render) the current location
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationIntent {
    /// Follow an in-app link; adds a history entry
    Push(String),
    /// Go to a location without adding a history entry
    Replace(String),
    /// Browser back button
    Back,
    /// Browser forward button
    Forward,
    /// Render the current location again
    Reload,
}

/// How a navigation ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// The page was rendered into the content slot
    Rendered(Route),
    /// A newer navigation (or a sign-out) took over first
    Superseded,
    /// Rendering is suspended because nobody is signed in
    Suspended,
    /// Nothing to do (no history entry, unresolvable href)
    Ignored,
}

/// Completion handle of one navigation
#[derive(Debug)]
pub struct NavigationHandle {
    inner: HandleInner,
}

#[derive(Debug)]
enum HandleInner {
    Ready(NavigationOutcome),
    Task(JoinHandle<NavigationOutcome>),
}

impl NavigationHandle {
    fn ready(outcome: NavigationOutcome) -> Self {
        Self {
            inner: HandleInner::Ready(outcome),
        }
    }

    /// Waits for the navigation to finish.
    pub async fn finished(self) -> NavigationOutcome {
        match self.inner {
            HandleInner::Ready(outcome) => outcome,
            HandleInner::Task(task) => match task.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::warn!(error = %e, "render task did not complete");
                    NavigationOutcome::Superseded
                }
            },
        }
    }
}

#[derive(Debug)]
struct History {
    entries: Vec<String>,
    index: usize,
}

impl History {
    fn new(initial: String) -> Self {
        Self {
            entries: vec![initial],
            index: 0,
        }
    }

    fn current(&self) -> &str {
        &self.entries[self.index]
    }

    fn push(&mut self, href: String) {
        self.entries.truncate(self.index + 1);
        self.entries.push(href);
        self.index += 1;
    }

    fn replace(&mut self, href: String) {
        self.entries[self.index] = href;
    }

    fn back(&mut self) -> bool {
        if self.index == 0 {
            return false;
        }
        self.index -= 1;
        true
    }

    fn forward(&mut self) -> bool {
        if self.index + 1 >= self.entries.len() {
            return false;
        }
        self.index += 1;
        true
    }
}

#[derive(Debug)]
struct NavState {
    history: History,
    generation: u64,
    in_flight: Option<CancellationToken>,
    scheduled: Option<CancellationToken>,
    active: bool,
}

struct NavigatorInner {
    origin: Url,
    slot: ContentSlot,
    renderer: Arc<dyn PageRenderer>,
    state: Mutex<NavState>,
}

/// Owner of the current location and of the content slot's writers
///
/// Starts suspended; the auth bridge resumes it once a user is signed in.
#[derive(Clone)]
pub struct Navigator {
    inner: Arc<NavigatorInner>,
}

impl std::fmt::Debug for Navigator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Navigator")
            .field("origin", &self.inner.origin.as_str())
            .field("location", &self.current_href())
            .finish()
    }
}

impl Navigator {
    /// Creates a navigator positioned at `initial_href`.
    ///
    /// An href that does not resolve on `origin` starts at `/`.
    pub fn new(
        origin: Url,
        initial_href: &str,
        slot: ContentSlot,
        renderer: Arc<dyn PageRenderer>,
    ) -> Self {
        let initial = match Location::parse(initial_href, &origin) {
            Ok(location) => location.href(),
            Err(e) => {
                tracing::warn!(error = %e, "starting at / instead");
                "/".to_string()
            }
        };
        Self {
            inner: Arc::new(NavigatorInner {
                origin,
                slot,
                renderer,
                state: Mutex::new(NavState {
                    history: History::new(initial),
                    generation: 0,
                    in_flight: None,
                    scheduled: None,
                    active: false,
                }),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, NavState> {
        self.inner.state.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// Application origin.
    pub fn origin(&self) -> &Url {
        &self.inner.origin
    }

    /// Content slot this navigator renders into.
    pub fn slot(&self) -> &ContentSlot {
        &self.inner.slot
    }

    /// Current location as a root-relative href.
    pub fn current_href(&self) -> String {
        self.lock().history.current().to_string()
    }

    /// Current location.
    pub fn current_location(&self) -> Location {
        let href = self.current_href();
        Location::parse(&href, &self.inner.origin).unwrap_or(Location {
            path: "/".to_string(),
            query: None,
        })
    }

    /// Route of the current location.
    pub fn current_route(&self) -> Route {
        Route::from_location(&self.current_location())
    }

    /// Whether renders are currently allowed.
    pub fn is_active(&self) -> bool {
        self.lock().active
    }

    /// Applies a navigation intent.
    ///
    /// This is the only way the current location changes.
    pub fn navigate(&self, intent: NavigationIntent) -> NavigationHandle {
        let mut state = self.lock();

        let moved = match &intent {
            NavigationIntent::Push(href) | NavigationIntent::Replace(href) => {
                match Location::parse(href, &self.inner.origin) {
                    Ok(location) => {
                        if matches!(intent, NavigationIntent::Push(_)) {
                            state.history.push(location.href());
                        } else {
                            state.history.replace(location.href());
                        }
                        true
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "ignoring navigation");
                        false
                    }
                }
            }
            NavigationIntent::Back => state.history.back(),
            NavigationIntent::Forward => state.history.forward(),
            NavigationIntent::Reload => true,
        };
        if !moved {
            return NavigationHandle::ready(NavigationOutcome::Ignored);
        }
        if intent != NavigationIntent::Reload {
            if let Some(scheduled) = state.scheduled.take() {
                tracing::debug!("location changed, dropping scheduled redirect");
                scheduled.cancel();
            }
        }

        let location = Location::parse(state.history.current(), &self.inner.origin).unwrap_or(
            Location {
                path: "/".to_string(),
                query: None,
            },
        );
        if let Some(canonical) = location.canonical_href() {
            tracing::debug!(from = %location.href(), to = %canonical, "normalizing legacy location");
            state.history.replace(canonical);
        }

        if !state.active {
            tracing::debug!(href = %state.history.current(), "navigation while suspended");
            return NavigationHandle::ready(NavigationOutcome::Suspended);
        }

        state.generation += 1;
        let generation = state.generation;
        if let Some(previous) = state.in_flight.take() {
            previous.cancel();
        }
        let token = CancellationToken::new();
        state.in_flight = Some(token.clone());
        self.inner.slot.begin(generation);
        drop(state);

        let route = Route::from_location(&location);
        tracing::info!(?intent, ?route, generation, "navigating");

        let slot = self.inner.slot.clone();
        let renderer = Arc::clone(&self.inner.renderer);
        let task = tokio::spawn(async move {
            tokio::select! {
                biased;

                _ = token.cancelled() => {
                    tracing::debug!(generation, "render cancelled");
                    NavigationOutcome::Superseded
                }

                view = renderer.render(&route) => {
                    if slot.commit(generation, view) {
                        NavigationOutcome::Rendered(route.clone())
                    } else {
                        NavigationOutcome::Superseded
                    }
                }
            }
        });

        NavigationHandle {
            inner: HandleInner::Task(task),
        }
    }

    /// Pushes `href` after `delay`.
    ///
    /// Used for the redirect after a project is created, so the user can
    /// read the success notification first. Only the latest scheduled
    /// redirect is kept. It resolves to [`NavigationOutcome::Superseded`]
    /// without navigating if the location changes, rendering is suspended
    /// or another redirect is scheduled during the delay.
    pub fn navigate_after(&self, delay: Duration, href: String) -> JoinHandle<NavigationOutcome> {
        let token = CancellationToken::new();
        if let Some(previous) = self.lock().scheduled.replace(token.clone()) {
            previous.cancel();
        }

        let navigator = self.clone();
        tokio::spawn(async move {
            tokio::select! {
                biased;

                _ = token.cancelled() => {
                    tracing::debug!(%href, "scheduled redirect cancelled");
                    NavigationOutcome::Superseded
                }

                _ = tokio::time::sleep(delay) => {
                    navigator
                        .navigate(NavigationIntent::Push(href))
                        .finished()
                        .await
                }
            }
        })
    }

    /// Stops rendering and shows `view` (the signed-out placeholder).
    ///
    /// Any in-flight render is cancelled and can no longer commit.
    pub fn suspend(&self, view: PageView) {
        let mut state = self.lock();
        state.active = false;
        state.generation += 1;
        if let Some(previous) = state.in_flight.take() {
            previous.cancel();
        }
        if let Some(scheduled) = state.scheduled.take() {
            scheduled.cancel();
        }
        self.inner.slot.show(state.generation, view);
    }

    /// Allows renders again; call [`Navigator::navigate`] with
    /// [`NavigationIntent::Reload`] to render the current location.
    pub fn resume(&self) {
        self.lock().active = true;
    }
}
