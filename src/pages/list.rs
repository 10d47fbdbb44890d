//! Project list page

use crate::api::{ApiClient, Project};
use crate::router::Route;
use crate::view::{escape_html, PageView};

/// Message rendered when the user has no projects
pub const EMPTY_STATE: &str = "You have not been associated with any projects yet.";

/// Title rendered when the list cannot be fetched
pub const LOAD_FAILED: &str = "Failed to load projects";

/// The user's projects, one summary card each
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListView {
    /// Projects in server order
    pub projects: Vec<Project>,
}

impl ListView {
    /// Detail links, one per card.
    pub fn links(&self) -> Vec<String> {
        self.projects.iter().map(|p| detail_href(&p.id)).collect()
    }

    /// Renders the page markup.
    pub fn markup(&self) -> String {
        let mut html = String::from("<h2>My Projects</h2>");
        if self.projects.is_empty() {
            html.push_str(&format!("<p>{}</p>", EMPTY_STATE));
            return html;
        }
        for project in &self.projects {
            html.push_str(&format!(
                concat!(
                    r#"<div class="asset">"#,
                    r#"<div class="asset-title"><a href="{href}">{name}</a></div>"#,
                    r#"<div><strong>ID:</strong> <code>{id}</code></div>"#,
                    r#"<div><strong>Status:</strong> {status}</div>"#,
                    "</div>"
                ),
                href = escape_html(&detail_href(&project.id)),
                name = escape_html(project.display_name()),
                id = escape_html(&project.id),
                status = escape_html(project.display_status()),
            ));
        }
        html
    }
}

/// Canonical detail path for a project id.
pub fn detail_href(id: &str) -> String {
    Route::Detail { id: id.to_string() }.path()
}

/// Fetches the user's projects and builds the list view.
///
/// Fetch failures render an inline error; the API client has already
/// notified the user.
pub async fn render(api: &ApiClient) -> PageView {
    match api.list_projects().await {
        Ok(projects) => {
            tracing::debug!(count = projects.len(), "rendering project list");
            PageView::List(ListView { projects })
        }
        Err(e) => PageView::Error {
            title: LOAD_FAILED.to_string(),
            message: e.user_message(),
        },
    }
}
