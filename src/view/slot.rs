//! The main content region
//!
//! The content slot is the single mutable region every page renders into.
//! Writes are tagged with the generation of the navigation that produced
//! them; a commit from an older generation is rejected, so a slow response
//! for a previous page can never overwrite newer content.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::pages::{DetailView, ListView, NewProjectForm};

/// Markup of the loading placeholder
pub const LOADING_MARKUP: &str = "<p><i>Loading...</i></p>";

/// Markup shown while signed out
pub const SIGNED_OUT_MARKUP: &str =
    "<h2>Welcome to the Parel Agency Portal.</h2><p>Please sign in to continue.</p>";

/// What the content slot currently shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageView {
    /// A navigation is in flight
    Loading,
    /// Nobody is signed in
    SignedOut,
    /// Project list
    List(ListView),
    /// Project detail
    Detail(DetailView),
    /// New project form
    NewProject(NewProjectForm),
    /// A page failed to load
    Error {
        /// Heading
        title: String,
        /// Detail message
        message: String,
    },
}

impl PageView {
    /// Renders the view to HTML.
    pub fn markup(&self) -> String {
        match self {
            Self::Loading => LOADING_MARKUP.to_string(),
            Self::SignedOut => SIGNED_OUT_MARKUP.to_string(),
            Self::List(view) => view.markup(),
            Self::Detail(view) => view.markup(),
            Self::NewProject(form) => form.markup(),
            Self::Error { title, message } => format!(
                r#"<h2 class="error">{}</h2><p>{}</p>"#,
                super::escape_html(title),
                super::escape_html(message)
            ),
        }
    }

    /// Short name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::SignedOut => "signed_out",
            Self::List(_) => "list",
            Self::Detail(_) => "detail",
            Self::NewProject(_) => "new_project",
            Self::Error { .. } => "error",
        }
    }
}

#[derive(Debug)]
struct SlotState {
    generation: u64,
    view: PageView,
}

/// Generation-guarded content region
///
/// # Examples
///
/// ```
/// use parel_portal::view::{ContentSlot, PageView};
///
/// let slot = ContentSlot::new();
/// slot.begin(1);
/// slot.begin(2);
/// assert!(!slot.commit(1, PageView::SignedOut));
/// assert_eq!(slot.view(), PageView::Loading);
/// ```
#[derive(Debug, Clone)]
pub struct ContentSlot {
    state: Arc<Mutex<SlotState>>,
}

impl Default for ContentSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentSlot {
    /// Creates a slot showing the loading placeholder at generation 0.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(SlotState {
                generation: 0,
                view: PageView::Loading,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SlotState> {
        self.state.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// Claims the slot for `generation` and shows the loading placeholder.
    ///
    /// Older generations are ignored.
    pub fn begin(&self, generation: u64) {
        self.show(generation, PageView::Loading);
    }

    /// Claims the slot for `generation` and shows `view` immediately.
    pub fn show(&self, generation: u64, view: PageView) {
        let mut state = self.lock();
        if generation >= state.generation {
            state.generation = generation;
            state.view = view;
        }
    }

    /// Writes the result of a render if it belongs to the current generation.
    ///
    /// # Returns
    ///
    /// `true` if the view was written
    pub fn commit(&self, generation: u64, view: PageView) -> bool {
        let mut state = self.lock();
        if generation != state.generation {
            tracing::debug!(
                generation,
                current = state.generation,
                view = view.kind(),
                "discarding stale render"
            );
            return false;
        }
        state.view = view;
        true
    }

    /// Generation that currently owns the slot.
    pub fn generation(&self) -> u64 {
        self.lock().generation
    }

    /// Copy of the current view.
    pub fn view(&self) -> PageView {
        self.lock().view.clone()
    }

    /// Markup of the current view.
    pub fn markup(&self) -> String {
        self.lock().view.markup()
    }

    /// Mutates the current view in place (widget interactions).
    pub fn update<R>(&self, f: impl FnOnce(&mut PageView) -> R) -> R {
        f(&mut self.lock().view)
    }

    /// Mutates the view only if `generation` still owns the slot.
    pub fn update_at<R>(&self, generation: u64, f: impl FnOnce(&mut PageView) -> R) -> Option<R> {
        let mut state = self.lock();
        if state.generation != generation {
            return None;
        }
        Some(f(&mut state.view))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_slot_is_loading() {
        let slot = ContentSlot::new();
        assert_eq!(slot.generation(), 0);
        assert_eq!(slot.markup(), LOADING_MARKUP);
    }

    #[test]
    fn test_commit_current_generation() {
        let slot = ContentSlot::new();
        slot.begin(1);
        assert!(slot.commit(1, PageView::SignedOut));
        assert_eq!(slot.markup(), SIGNED_OUT_MARKUP);
    }

    #[test]
    fn test_stale_commit_rejected() {
        let slot = ContentSlot::new();
        slot.begin(1);
        slot.begin(2);
        assert!(slot.commit(2, PageView::List(ListView { projects: vec![] })));
        assert!(!slot.commit(1, PageView::SignedOut));
        assert_eq!(slot.view().kind(), "list");
    }

    #[test]
    fn test_older_begin_ignored() {
        let slot = ContentSlot::new();
        slot.begin(5);
        slot.show(3, PageView::SignedOut);
        assert_eq!(slot.generation(), 5);
        assert_eq!(slot.view(), PageView::Loading);
    }

    #[test]
    fn test_update_at_stale_generation() {
        let slot = ContentSlot::new();
        slot.begin(1);
        slot.begin(2);
        assert_eq!(slot.update_at(1, |view| view.kind()), None);
        assert_eq!(slot.update_at(2, |view| view.kind()), Some("loading"));
    }

    #[test]
    fn test_error_markup_escaped() {
        let view = PageView::Error {
            title: "Failed to load projects".to_string(),
            message: "<oops>".to_string(),
        };
        assert_eq!(
            view.markup(),
            r#"<h2 class="error">Failed to load projects</h2><p>&lt;oops&gt;</p>"#
        );
    }
}
