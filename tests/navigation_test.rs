//! Navigation races and cancellation
//!
//! Uses a renderer with per-route delays under paused time so the order in
//! which renders would complete is fully controlled.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use parel_portal::pages::PageRenderer;
use parel_portal::router::{NavigationIntent, NavigationOutcome, Navigator, Route};
use parel_portal::view::{ContentSlot, PageView};

/// Renders an error view naming the route after a delay chosen by route.
struct DelayedRenderer {
    started: AtomicUsize,
    completed: AtomicUsize,
}

impl DelayedRenderer {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            started: AtomicUsize::new(0),
            completed: AtomicUsize::new(0),
        })
    }

    fn delay_for(route: &Route) -> Duration {
        match route {
            Route::Detail { id } if id == "SLOW" => Duration::from_secs(5),
            Route::Detail { .. } => Duration::from_millis(200),
            Route::List => Duration::from_millis(100),
            Route::NewProject => Duration::ZERO,
        }
    }
}

#[async_trait]
impl PageRenderer for DelayedRenderer {
    async fn render(&self, route: &Route) -> PageView {
        self.started.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Self::delay_for(route)).await;
        self.completed.fetch_add(1, Ordering::SeqCst);
        PageView::Error {
            title: "rendered".to_string(),
            message: route.path(),
        }
    }
}

fn rendered_path(slot: &ContentSlot) -> Option<String> {
    match slot.view() {
        PageView::Error { message, .. } => Some(message),
        _ => None,
    }
}

fn navigator(renderer: Arc<DelayedRenderer>) -> Navigator {
    let nav = Navigator::new(
        Url::parse("http://localhost:5173").expect("valid origin"),
        "/",
        ContentSlot::new(),
        renderer,
    );
    nav.resume();
    nav
}

#[tokio::test(start_paused = true)]
async fn test_slow_render_cannot_overwrite_newer_page() {
    let renderer = DelayedRenderer::new();
    let nav = navigator(renderer.clone());

    let slow = nav.navigate(NavigationIntent::Push("/project/SLOW".to_string()));
    tokio::time::sleep(Duration::from_millis(10)).await;
    let fast = nav.navigate(NavigationIntent::Push("/project/B".to_string()));

    assert_eq!(
        fast.finished().await,
        NavigationOutcome::Rendered(Route::Detail { id: "B".into() })
    );
    assert_eq!(slow.finished().await, NavigationOutcome::Superseded);

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(rendered_path(nav.slot()).as_deref(), Some("/project/B"));
    assert_eq!(renderer.completed.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_new_navigation_shows_loading_immediately() {
    let nav = navigator(DelayedRenderer::new());
    nav.navigate(NavigationIntent::Push("/project/A".to_string()))
        .finished()
        .await;
    assert!(rendered_path(nav.slot()).is_some());

    let pending = nav.navigate(NavigationIntent::Push("/project/SLOW".to_string()));
    assert_eq!(nav.slot().view(), PageView::Loading);
    assert_eq!(
        pending.finished().await,
        NavigationOutcome::Rendered(Route::Detail { id: "SLOW".into() })
    );
}

#[tokio::test(start_paused = true)]
async fn test_last_of_many_navigations_wins() {
    let renderer = DelayedRenderer::new();
    let nav = navigator(renderer.clone());

    let handles: Vec<_> = ["/project/SLOW", "/", "/project/C", "/new-project", "/project/D"]
        .iter()
        .map(|href| nav.navigate(NavigationIntent::Push(href.to_string())))
        .collect();

    let mut outcomes = Vec::new();
    for handle in handles {
        outcomes.push(handle.finished().await);
    }

    let rendered: Vec<_> = outcomes
        .iter()
        .filter(|o| matches!(o, NavigationOutcome::Rendered(_)))
        .collect();
    assert_eq!(rendered.len(), 1);
    assert_eq!(
        outcomes.last(),
        Some(&NavigationOutcome::Rendered(Route::Detail { id: "D".into() }))
    );
    assert_eq!(rendered_path(nav.slot()).as_deref(), Some("/project/D"));
    assert_eq!(nav.current_href(), "/project/D");
}

#[tokio::test(start_paused = true)]
async fn test_back_cancels_pending_render() {
    let nav = navigator(DelayedRenderer::new());
    nav.navigate(NavigationIntent::Push("/new-project".to_string()))
        .finished()
        .await;

    let slow = nav.navigate(NavigationIntent::Push("/project/SLOW".to_string()));
    let back = nav.navigate(NavigationIntent::Back);

    assert_eq!(back.finished().await, NavigationOutcome::Rendered(Route::NewProject));
    assert_eq!(slow.finished().await, NavigationOutcome::Superseded);
    assert_eq!(nav.current_href(), "/new-project");

    let forward = nav.navigate(NavigationIntent::Forward).finished().await;
    assert_eq!(forward, NavigationOutcome::Rendered(Route::Detail { id: "SLOW".into() }));
}

#[tokio::test(start_paused = true)]
async fn test_suspend_discards_in_flight_render() {
    let nav = navigator(DelayedRenderer::new());
    let pending = nav.navigate(NavigationIntent::Push("/project/SLOW".to_string()));

    nav.suspend(PageView::SignedOut);

    assert_eq!(pending.finished().await, NavigationOutcome::Superseded);
    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(nav.slot().view(), PageView::SignedOut);

    nav.resume();
    let reload = nav.navigate(NavigationIntent::Reload).finished().await;
    assert_eq!(reload, NavigationOutcome::Rendered(Route::Detail { id: "SLOW".into() }));
}

#[tokio::test(start_paused = true)]
async fn test_navigate_after_waits_for_delay() {
    let nav = navigator(DelayedRenderer::new());
    nav.navigate(NavigationIntent::Reload).finished().await;

    let redirect = nav.navigate_after(Duration::from_millis(1500), "/project/P42".to_string());

    tokio::time::sleep(Duration::from_millis(1000)).await;
    assert_eq!(nav.current_href(), "/");

    let outcome = redirect.await.expect("redirect task completes");
    assert_eq!(outcome, NavigationOutcome::Rendered(Route::Detail { id: "P42".into() }));
    assert_eq!(nav.current_href(), "/project/P42");
}

#[tokio::test(start_paused = true)]
async fn test_navigation_during_delay_drops_redirect() {
    let nav = navigator(DelayedRenderer::new());
    nav.navigate(NavigationIntent::Reload).finished().await;

    let redirect = nav.navigate_after(Duration::from_millis(1500), "/project/P42".to_string());
    tokio::time::sleep(Duration::from_millis(500)).await;
    nav.navigate(NavigationIntent::Push("/new-project".to_string()))
        .finished()
        .await;

    assert_eq!(redirect.await.expect("redirect task completes"), NavigationOutcome::Superseded);
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(nav.current_href(), "/new-project");
}

#[tokio::test(start_paused = true)]
async fn test_reload_keeps_redirect_but_suspend_drops_it() {
    let nav = navigator(DelayedRenderer::new());

    let redirect = nav.navigate_after(Duration::from_millis(1500), "/project/P42".to_string());
    nav.navigate(NavigationIntent::Reload).finished().await;
    assert_eq!(
        redirect.await.expect("redirect task completes"),
        NavigationOutcome::Rendered(Route::Detail { id: "P42".into() })
    );

    let redirect = nav.navigate_after(Duration::from_millis(1500), "/".to_string());
    nav.suspend(PageView::SignedOut);
    assert_eq!(redirect.await.expect("redirect task completes"), NavigationOutcome::Superseded);
    assert_eq!(nav.current_href(), "/project/P42");
}

#[tokio::test(start_paused = true)]
async fn test_suspended_navigator_does_not_render() {
    let renderer = DelayedRenderer::new();
    let nav = Navigator::new(
        Url::parse("http://localhost:5173").expect("valid origin"),
        "/",
        ContentSlot::new(),
        renderer.clone(),
    );

    let outcome = nav
        .navigate(NavigationIntent::Push("/project/P1".to_string()))
        .finished()
        .await;

    assert_eq!(outcome, NavigationOutcome::Suspended);
    assert_eq!(renderer.started.load(Ordering::SeqCst), 0);
    assert_eq!(nav.current_route(), Route::Detail { id: "P1".into() });
}
