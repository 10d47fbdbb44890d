//! Wire types for the portal backend
//!
//! Shapes follow the backend's camelCase JSON. Response drift is absorbed
//! here rather than at each call site: `assignedManager` arrives either as
//! an object or as a JSON-encoded string, and project ids occasionally
//! arrive as numbers.

use serde::{Deserialize, Deserializer, Serialize};

/// A project as returned by `GET /projects` and `GET /project/{id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Project identifier
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,

    /// Display name
    #[serde(default)]
    pub name: Option<String>,

    /// Lifecycle status (free text, e.g. `Active`)
    #[serde(default)]
    pub status: Option<String>,

    /// Account manager leading the project
    #[serde(default, deserialize_with = "manager_shape")]
    pub assigned_manager: Option<Manager>,

    /// Generated masterplan (detail responses only)
    #[serde(default)]
    pub masterplan: Option<Masterplan>,
}

impl Project {
    /// Name shown in headings, falling back to `Project`.
    pub fn display_name(&self) -> &str {
        non_blank(self.name.as_deref()).unwrap_or("Project")
    }

    /// Status shown in details, falling back to `N/A`.
    pub fn display_status(&self) -> &str {
        non_blank(self.status.as_deref()).unwrap_or("N/A")
    }

    /// Project lead shown in details, falling back to `Not Assigned`.
    pub fn manager_tag(&self) -> &str {
        self.assigned_manager
            .as_ref()
            .map(|m| m.tag.as_str())
            .unwrap_or("Not Assigned")
    }

    /// Assets of the masterplan, empty when there is none.
    pub fn assets(&self) -> &[Asset] {
        self.masterplan
            .as_ref()
            .map(|m| m.required_assets.as_slice())
            .unwrap_or(&[])
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Account manager assigned to a project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manager {
    /// Handle shown as the project lead
    pub tag: String,

    /// Manager id, when provided
    #[serde(
        default,
        deserialize_with = "optional_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
}

/// Generated plan of required marketing assets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Masterplan {
    /// Deliverables in display order
    #[serde(default)]
    pub required_assets: Vec<Asset>,
}

/// One deliverable of a masterplan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    /// What the asset is
    #[serde(default)]
    pub description: Option<String>,

    /// Copy or image
    #[serde(rename = "type", default)]
    pub kind: AssetKind,

    /// Completion state
    #[serde(default)]
    pub status: AssetStatus,

    /// Inline text for copy, absolute URL for images
    #[serde(default)]
    pub generated_content: Option<String>,
}

impl Asset {
    /// Whether generation has finished.
    pub fn is_completed(&self) -> bool {
        self.status == AssetStatus::Completed
    }
}

/// Kind of asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    /// Marketing copy
    Copy,
    /// Generated image
    Image,
    /// Kind this client does not know how to display
    #[default]
    #[serde(other)]
    Other,
}

/// Asset completion state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AssetStatus {
    /// Still being generated
    Pending,
    /// Generated content is available
    Completed,
    /// Status missing or not recognised; displayed as pending
    #[default]
    #[serde(other)]
    Unknown,
}

/// Body of `POST /projects`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProjectRequest {
    /// Project name
    pub project_name: String,
    /// Target audience
    pub target_audience: String,
    /// Brand core values
    pub core_values: String,
}

/// Response of `POST /projects`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedProject {
    /// Id of the newly created project
    #[serde(deserialize_with = "string_or_number")]
    pub project_id: String,
}

/// Response of `GET /auth/discord-link-status`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscordLinkStatus {
    /// Whether a Discord account is linked to the user
    pub is_linked: bool,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(serde_json::Number),
    }

    let id = match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
    };
    if id.trim().is_empty() {
        return Err(serde::de::Error::custom("identifier must not be empty"));
    }
    Ok(id)
}

fn optional_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Option::<Id>::deserialize(deserializer)? {
        Some(Id::Text(s)) if !s.trim().is_empty() => Some(s),
        Some(Id::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn manager_shape<'de, D>(deserializer: D) -> Result<Option<Manager>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawManager {
        Object(Manager),
        Encoded(String),
        Other(serde_json::Value),
    }

    Ok(match Option::<RawManager>::deserialize(deserializer)? {
        None => None,
        Some(RawManager::Object(manager)) => Some(manager),
        Some(RawManager::Encoded(text)) => decode_manager(&text),
        Some(RawManager::Other(value)) => {
            tracing::debug!(%value, "ignoring assignedManager of unexpected shape");
            None
        }
    })
}

/// Normalizes a string-typed `assignedManager`.
///
/// A JSON-encoded object is decoded; any other non-blank text is taken as
/// the manager's tag.
fn decode_manager(text: &str) -> Option<Manager> {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return None;
    }
    if trimmed.starts_with('{') {
        return match serde_json::from_str::<Manager>(trimmed) {
            Ok(manager) => Some(manager),
            Err(e) => {
                tracing::debug!(error = %e, "assignedManager string is not a manager object");
                None
            }
        };
    }
    Some(Manager {
        tag: trimmed.to_string(),
        id: None,
    })
}
