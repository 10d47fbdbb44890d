//! Page renderers
//!
//! The router hands a [`Route`] to a [`PageRenderer`], which fetches
//! whatever the page needs and returns a [`PageView`] for the content
//! slot. [`Pages`] is the production renderer backed by the API client;
//! tests substitute their own implementations to control timing.

pub mod detail;
pub mod list;
pub mod new_project;

use async_trait::async_trait;

use crate::api::ApiClient;
use crate::router::Route;
use crate::view::PageView;

pub use detail::{AccordionEntry, AssetAccordion, DetailView};
pub use list::ListView;
pub use new_project::{NewProjectForm, ProjectFields, SubmitState};

/// Turns a route into page content
#[async_trait]
pub trait PageRenderer: Send + Sync {
    /// Produces the view for `route`.
    ///
    /// Renderers never fail: fetch errors become an error view.
    async fn render(&self, route: &Route) -> PageView;
}

/// Renderer backed by the portal API
#[derive(Debug, Clone)]
pub struct Pages {
    api: ApiClient,
}

impl Pages {
    /// Creates the renderer.
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl PageRenderer for Pages {
    async fn render(&self, route: &Route) -> PageView {
        match route {
            Route::List => list::render(&self.api).await,
            Route::Detail { id } => detail::render(&self.api, id).await,
            Route::NewProject => PageView::NewProject(NewProjectForm::default()),
        }
    }
}
