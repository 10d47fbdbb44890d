//! Client-side routing
//!
//! Maps a location to one of three pages:
//!
//! - `/project/{id}` (any path starting with `/project/`): project detail
//!   for the percent-decoded second path segment; further segments are
//!   ignored
//! - `/new-project`: the creation form
//! - anything else: the project list
//!
//! The legacy `/?project={id}` form is still understood and is normalized
//! to the canonical path by the [`navigator::Navigator`].
//!
//! [`classify_link`] decides whether a link click is an in-app navigation
//! intent, replacing DOM-level anchor interception.

pub mod navigator;

use url::Url;

use crate::error::PortalError;

pub use navigator::{NavigationHandle, NavigationIntent, NavigationOutcome, Navigator};

/// Path of the creation form
pub const NEW_PROJECT_PATH: &str = "/new-project";

const PROJECT_PREFIX: &str = "/project/";
const LEGACY_PROJECT_PARAM: &str = "project";

/// Page selected for a location
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Project list
    List,
    /// One project's detail page
    Detail {
        /// Project id from the path
        id: String,
    },
    /// New project form
    NewProject,
}

impl Route {
    /// Selects the page for a URL path.
    ///
    /// # Examples
    ///
    /// ```
    /// use parel_portal::router::Route;
    ///
    /// assert_eq!(Route::from_path("/project/P1/assets"), Route::Detail { id: "P1".into() });
    /// assert_eq!(Route::from_path("/new-project"), Route::NewProject);
    /// assert_eq!(Route::from_path("/settings"), Route::List);
    /// ```
    pub fn from_path(path: &str) -> Self {
        if path.starts_with(PROJECT_PREFIX) {
            return match path.split('/').nth(2) {
                Some(id) if !id.is_empty() => Self::Detail {
                    id: urlencoding::decode(id)
                        .map(|decoded| decoded.into_owned())
                        .unwrap_or_else(|_| id.to_string()),
                },
                _ => Self::List,
            };
        }
        if path == NEW_PROJECT_PATH {
            return Self::NewProject;
        }
        Self::List
    }

    /// Selects the page for a full location, honoring the legacy query form.
    pub fn from_location(location: &Location) -> Self {
        if let Some(id) = location.legacy_project_id() {
            return Self::Detail { id };
        }
        Self::from_path(&location.path)
    }

    /// Canonical path of this route; the project id is percent-encoded.
    pub fn path(&self) -> String {
        match self {
            Self::List => "/".to_string(),
            Self::Detail { id } => format!("{}{}", PROJECT_PREFIX, urlencoding::encode(id)),
            Self::NewProject => NEW_PROJECT_PATH.to_string(),
        }
    }
}

/// An in-app location (path plus optional query)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// URL path, always starting with `/`
    pub path: String,
    /// Query string without the leading `?`
    pub query: Option<String>,
}

impl Location {
    /// Resolves `href` against the application origin.
    ///
    /// Relative, root-relative and absolute hrefs are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::Navigation`] if `href` cannot be resolved or
    /// points at another origin
    pub fn parse(href: &str, origin: &Url) -> Result<Self, PortalError> {
        let url = origin
            .join(href)
            .map_err(|e| PortalError::Navigation(format!("cannot resolve {}: {}", href, e)))?;
        if url.origin() != origin.origin() {
            return Err(PortalError::Navigation(format!(
                "{} is not on the application origin",
                href
            )));
        }
        Ok(Self::from_url(&url))
    }

    /// Location of an absolute URL (origin is not checked).
    pub fn from_url(url: &Url) -> Self {
        Self {
            path: url.path().to_string(),
            query: url.query().filter(|q| !q.is_empty()).map(str::to_string),
        }
    }

    /// Project id of the legacy `/?project={id}` form.
    pub fn legacy_project_id(&self) -> Option<String> {
        if self.path != "/" {
            return None;
        }
        let query = self.query.as_deref()?;
        url::form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == LEGACY_PROJECT_PARAM)
            .map(|(_, value)| value.into_owned())
            .filter(|id| !id.is_empty())
    }

    /// Canonical href when this location uses a legacy form.
    pub fn canonical_href(&self) -> Option<String> {
        self.legacy_project_id()
            .map(|id| Route::Detail { id }.path())
    }

    /// Path and query as a root-relative href.
    pub fn href(&self) -> String {
        match &self.query {
            Some(query) => format!("{}?{}", self.path, query),
            None => self.path.clone(),
        }
    }
}

/// Decides whether a click on a link with `href` is an in-app navigation.
///
/// Same-origin and root-relative links are navigation intents; external
/// links, other schemes and fragment-only links are left to the browser.
///
/// # Returns
///
/// The location to navigate to, or `None` if the click must not be
/// intercepted
///
/// # Examples
///
/// ```
/// use parel_portal::router::classify_link;
/// use url::Url;
///
/// let origin = Url::parse("https://portal.parel.agency").unwrap();
/// assert!(classify_link("/project/P1", &origin).is_some());
/// assert!(classify_link("https://portal.parel.agency/new-project", &origin).is_some());
/// assert!(classify_link("https://discord.com/app", &origin).is_none());
/// ```
pub fn classify_link(href: &str, origin: &Url) -> Option<Location> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }
    Location::parse(href, origin).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin() -> Url {
        Url::parse("http://localhost:5173").unwrap()
    }

    #[test]
    fn test_list_for_unmatched_paths() {
        for path in ["/", "", "/projects", "/project", "/new-project/", "/newproject", "/projectX/1", "/x/project/P1"] {
            assert_eq!(Route::from_path(path), Route::List, "path {:?}", path);
        }
    }

    #[test]
    fn test_detail_takes_second_segment() {
        assert_eq!(Route::from_path("/project/P1"), Route::Detail { id: "P1".into() });
        assert_eq!(Route::from_path("/project/P1/"), Route::Detail { id: "P1".into() });
        assert_eq!(Route::from_path("/project/P1/a/b"), Route::Detail { id: "P1".into() });
    }

    #[test]
    fn test_detail_with_empty_id_is_list() {
        assert_eq!(Route::from_path("/project/"), Route::List);
        assert_eq!(Route::from_path("/project//P1"), Route::List);
    }

    #[test]
    fn test_route_paths_round_trip() {
        for route in [
            Route::List,
            Route::NewProject,
            Route::Detail { id: "abc".into() },
            Route::Detail { id: "a b/c".into() },
        ] {
            assert_eq!(Route::from_path(&route.path()), route);
        }
    }

    #[test]
    fn test_legacy_query() {
        let location = Location::parse("/?project=P7", &origin()).unwrap();
        assert_eq!(Route::from_location(&location), Route::Detail { id: "P7".into() });
        assert_eq!(location.canonical_href().as_deref(), Some("/project/P7"));
    }

    #[test]
    fn test_legacy_query_only_on_root() {
        let location = Location::parse("/new-project?project=P7", &origin()).unwrap();
        assert_eq!(Route::from_location(&location), Route::NewProject);
        assert!(location.canonical_href().is_none());
    }

    #[test]
    fn test_legacy_query_empty_value() {
        let location = Location::parse("/?project=", &origin()).unwrap();
        assert_eq!(Route::from_location(&location), Route::List);
    }

    #[test]
    fn test_location_href() {
        let location = Location::parse("http://localhost:5173/project/P1?tab=assets#top", &origin()).unwrap();
        assert_eq!(location.path, "/project/P1");
        assert_eq!(location.href(), "/project/P1?tab=assets");
    }

    #[test]
    fn test_classify_same_origin_and_root_relative() {
        assert_eq!(classify_link("/project/P1", &origin()).unwrap().path, "/project/P1");
        assert_eq!(
            classify_link("http://localhost:5173/new-project", &origin()).unwrap().path,
            "/new-project"
        );
        assert_eq!(classify_link("project/P2", &origin()).unwrap().path, "/project/P2");
    }

    #[test]
    fn test_classify_external_not_intercepted() {
        for href in [
            "https://example.com/project/P1",
            "http://localhost:8080/",
            "https://localhost:5173/",
            "//evil.example.com/",
            "mailto:team@parel.agency",
            "#assets",
            "",
        ] {
            assert!(classify_link(href, &origin()).is_none(), "href {:?}", href);
        }
    }
}
