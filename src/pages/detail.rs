//! Project detail page
//!
//! Shows the project summary and one accordion entry per masterplan
//! asset. Entries start closed. Only completed assets can be opened; each
//! entry toggles independently of the others.

use crate::api::{ApiClient, Asset, AssetKind, Project};
use crate::view::{escape_html, PageView};

/// Title rendered when the project cannot be fetched
pub const LOAD_FAILED: &str = "Failed to Load Project";

/// Rendered when the masterplan has no assets
pub const NO_ASSETS: &str = "No assets defined in masterplan.";

/// Open/closed state of one asset entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccordionEntry {
    /// Whether the header reacts to clicks
    pub enabled: bool,
    /// Whether the body is shown
    pub open: bool,
}

/// Accordion over the masterplan assets
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AssetAccordion {
    entries: Vec<AccordionEntry>,
}

impl AssetAccordion {
    /// Builds a closed accordion; completed assets are enabled.
    pub fn for_assets(assets: &[Asset]) -> Self {
        Self {
            entries: assets
                .iter()
                .map(|asset| AccordionEntry {
                    enabled: asset.is_completed(),
                    open: false,
                })
                .collect(),
        }
    }

    /// Handles a click on the header of entry `index`.
    ///
    /// # Returns
    ///
    /// `true` if the body visibility changed; disabled or unknown entries
    /// return `false`
    pub fn toggle(&mut self, index: usize) -> bool {
        match self.entries.get_mut(index) {
            Some(entry) if entry.enabled => {
                entry.open = !entry.open;
                true
            }
            _ => false,
        }
    }

    /// State of entry `index`.
    pub fn entry(&self, index: usize) -> Option<AccordionEntry> {
        self.entries.get(index).copied()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A fetched project with its accordion state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailView {
    /// The project
    pub project: Project,
    /// Asset accordion
    pub accordion: AssetAccordion,
}

impl DetailView {
    /// Wraps a project with a closed accordion.
    pub fn new(project: Project) -> Self {
        let accordion = AssetAccordion::for_assets(project.assets());
        Self { project, accordion }
    }

    /// Renders the page markup.
    pub fn markup(&self) -> String {
        let project = &self.project;
        let assets = project.assets();

        let assets_html = if assets.is_empty() {
            NO_ASSETS.to_string()
        } else {
            assets
                .iter()
                .enumerate()
                .map(|(index, asset)| {
                    let open = self.accordion.entry(index).map(|e| e.open).unwrap_or(false);
                    asset_card(asset, open)
                })
                .collect::<String>()
        };

        format!(
            concat!(
                r#"<p><a href="/">&larr; Back to Project Dashboard</a></p>"#,
                "<h1>{name}</h1>",
                r#"<div id="details">"#,
                "<p><strong>ID:</strong> <code>{id}</code></p>",
                "<p><strong>Status:</strong> {status}</p>",
                "<p><strong>Project Lead:</strong> {lead}</p>",
                "</div>",
                "<h3>Generated Assets</h3>",
                r#"<div id="assets-container">{assets}</div>"#
            ),
            name = escape_html(project.display_name()),
            id = escape_html(&project.id),
            status = escape_html(project.display_status()),
            lead = escape_html(project.manager_tag()),
            assets = assets_html,
        )
    }
}

fn asset_card(asset: &Asset, open: bool) -> String {
    let completed = asset.is_completed();
    let (status_class, status_text) = if completed {
        ("status-completed", "Completed")
    } else {
        ("status-pending", "Pending")
    };
    let disabled = if completed { "" } else { " disabled" };
    let display = if open { "block" } else { "none" };

    format!(
        concat!(
            r#"<div class="asset-card">"#,
            r#"<button class="asset-header"{disabled}>"#,
            r#"<span class="asset-title">{title}</span>"#,
            r#"<span class="asset-status {status_class}">{status_text}</span>"#,
            "</button>",
            r#"<div class="asset-body" style="display: {display};">{content}</div>"#,
            "</div>"
        ),
        disabled = disabled,
        title = escape_html(asset.description.as_deref().unwrap_or("")),
        status_class = status_class,
        status_text = status_text,
        display = display,
        content = asset_content(asset),
    )
}

/// Body of a completed asset: escaped copy, or an image for http(s) URLs.
fn asset_content(asset: &Asset) -> String {
    let content = match (&asset.generated_content, asset.is_completed()) {
        (Some(content), true) => content,
        _ => return String::new(),
    };

    match asset.kind {
        AssetKind::Copy => format!(r#"<pre class="asset-content">{}</pre>"#, escape_html(content)),
        AssetKind::Image if is_http_url(content) => format!(
            r#"<img src="{}" alt="{}" class="asset-image">"#,
            escape_html(content),
            escape_html(asset.description.as_deref().unwrap_or(""))
        ),
        _ => String::new(),
    }
}

fn is_http_url(content: &str) -> bool {
    url::Url::parse(content)
        .map(|u| u.scheme() == "http" || u.scheme() == "https")
        .unwrap_or(false)
}

/// Fetches one project and builds the detail view.
pub async fn render(api: &ApiClient, id: &str) -> PageView {
    match api.get_project(id).await {
        Ok(project) => {
            tracing::debug!(project_id = %id, assets = project.assets().len(), "rendering project detail");
            PageView::Detail(DetailView::new(project))
        }
        Err(e) => PageView::Error {
            title: LOAD_FAILED.to_string(),
            message: e.user_message(),
        },
    }
}
