//! Headless view state
//!
//! The portal renders into three regions: the main content slot, the auth
//! widget region and the notification container. Each region is modelled
//! as plain state that can be inspected directly or rendered to HTML
//! markup. DOM event delegation is replaced by explicit predicates over
//! [`ClickTarget`], so the decision logic is testable without a browser.

pub mod slot;
pub mod widget;

pub use slot::{ContentSlot, PageView};
pub use widget::{AuthWidget, MenuItem, UserMenu, USER_MENU_CONTAINER_ID};

/// Escapes text for interpolation into HTML content or attribute values.
///
/// # Examples
///
/// ```
/// use parel_portal::view::escape_html;
///
/// assert_eq!(escape_html("<b>\"Tom\" & 'Jerry'</b>"),
///            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;");
/// ```
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// The element a click landed on, described by its ancestry
///
/// `ancestors` lists element ids from the target itself up to the document
/// root. Elements without an id are simply omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClickTarget {
    /// Element ids, innermost first
    pub ancestors: Vec<String>,
}

impl ClickTarget {
    /// A click on the bare document.
    pub fn document() -> Self {
        Self::default()
    }

    /// A click whose target and ancestors carry the given ids, innermost first.
    pub fn within<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ancestors: ids.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether this click landed outside the region with id `region_id`.
    pub fn is_outside(&self, region_id: &str) -> bool {
        !self.ancestors.iter().any(|id| id == region_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_plain_text_unchanged() {
        assert_eq!(escape_html("Acme Launch 2024"), "Acme Launch 2024");
    }

    #[test]
    fn test_escape_lt_in_copy() {
        assert_eq!(escape_html("a < b"), "a &lt; b");
    }

    #[test]
    fn test_click_on_document_is_outside() {
        assert!(ClickTarget::document().is_outside("user-menu-container"));
    }

    #[test]
    fn test_click_inside_region() {
        let target = ClickTarget::within(["profile-btn", "user-menu-dropdown", "user-menu-container", "auth-section"]);
        assert!(!target.is_outside("user-menu-container"));
        assert!(target.is_outside("app"));
    }
}
