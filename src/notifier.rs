//! Transient toast notifications
//!
//! Notifications are appended to a container that is created lazily on the
//! first call. Each one fades in shortly after insertion, stays visible for
//! a fixed duration, then fades out and removes itself. Removal waits for
//! the transition-completion signal ([`Notifier::transition_ended`]) so a
//! node is never dropped mid-animation; when no front-end reports the end
//! of the transition the fade duration acts as the fallback.
//!
//! There is no cap on the number of concurrent notifications and no
//! deduplication.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Notify;
use uuid::Uuid;

use crate::config::NotificationConfig;
use crate::view::escape_html;

/// Visual category of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    /// Neutral information
    Info,
    /// A user action succeeded
    Success,
    /// A user action failed
    Error,
}

impl NotificationKind {
    fn css_class(self) -> &'static str {
        match self {
            Self::Info => "notification-info",
            Self::Success => "notification-success",
            Self::Error => "notification-error",
        }
    }
}

/// Lifecycle phase of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationPhase {
    /// Inserted, not yet faded in
    Entering,
    /// Fully shown
    Visible,
    /// Fading out; removed once the transition completes
    Leaving,
}

/// A single toast
#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    /// Unique id
    pub id: Uuid,
    /// Category
    pub kind: NotificationKind,
    /// Message text (unescaped)
    pub message: String,
    /// Current phase
    pub phase: NotificationPhase,
    /// Insertion time
    pub created_at: DateTime<Utc>,
}

struct Entry {
    notification: Notification,
    transition: Arc<Notify>,
}

#[derive(Default)]
struct Container {
    created: bool,
    entries: Vec<Entry>,
}

struct NotifierInner {
    config: NotificationConfig,
    container: Mutex<Container>,
}

/// Toast queue shared by every part of the portal
///
/// Cloning is cheap; all clones feed the same container.
///
/// # Examples
///
/// ```
/// use parel_portal::config::NotificationConfig;
/// use parel_portal::notifier::{NotificationKind, Notifier};
///
/// # #[tokio::main]
/// # async fn main() {
/// let notifier = Notifier::new(NotificationConfig::default());
/// notifier.success("Project created");
/// let shown = notifier.snapshot();
/// assert_eq!(shown.len(), 1);
/// assert_eq!(shown[0].kind, NotificationKind::Success);
/// # }
/// ```
#[derive(Clone)]
pub struct Notifier {
    inner: Arc<NotifierInner>,
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier")
            .field("visible", &self.len())
            .finish()
    }
}

impl Notifier {
    /// Creates an empty notifier with the given timings.
    pub fn new(config: NotificationConfig) -> Self {
        Self {
            inner: Arc::new(NotifierInner {
                config,
                container: Mutex::new(Container::default()),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Container> {
        self.inner
            .container
            .lock()
            .unwrap_or_else(|p| p.into_inner())
    }

    /// Shows an informational notification.
    pub fn info(&self, message: impl Into<String>) -> Uuid {
        self.notify(NotificationKind::Info, message)
    }

    /// Shows a success notification.
    pub fn success(&self, message: impl Into<String>) -> Uuid {
        self.notify(NotificationKind::Success, message)
    }

    /// Shows an error notification.
    pub fn error(&self, message: impl Into<String>) -> Uuid {
        self.notify(NotificationKind::Error, message)
    }

    /// Appends a notification and starts its lifecycle.
    ///
    /// Outside a Tokio runtime the notification is inserted but never
    /// dismissed.
    ///
    /// # Returns
    ///
    /// The id of the new notification
    pub fn notify(&self, kind: NotificationKind, message: impl Into<String>) -> Uuid {
        let notification = Notification {
            id: Uuid::new_v4(),
            kind,
            message: message.into(),
            phase: NotificationPhase::Entering,
            created_at: Utc::now(),
        };
        let id = notification.id;
        let transition = Arc::new(Notify::new());

        match kind {
            NotificationKind::Error => tracing::warn!(%id, message = %notification.message, "notification"),
            _ => tracing::info!(%id, message = %notification.message, "notification"),
        }

        {
            let mut container = self.lock();
            container.created = true;
            container.entries.push(Entry {
                notification,
                transition: Arc::clone(&transition),
            });
        }

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let notifier = self.clone();
                handle.spawn(async move { notifier.run_lifecycle(id, transition).await });
            }
            Err(_) => tracing::debug!(%id, "no runtime; notification will not auto-dismiss"),
        }

        id
    }

    async fn run_lifecycle(self, id: Uuid, transition: Arc<Notify>) {
        tokio::time::sleep(self.inner.config.enter_delay()).await;
        self.set_phase(id, NotificationPhase::Visible);

        tokio::time::sleep(self.inner.config.display()).await;
        self.set_phase(id, NotificationPhase::Leaving);

        if tokio::time::timeout(self.inner.config.fade(), transition.notified())
            .await
            .is_err()
        {
            tracing::trace!(%id, "no transition-end signal; removing after fade");
        }
        self.remove(id);
    }

    fn set_phase(&self, id: Uuid, phase: NotificationPhase) {
        if let Some(entry) = self
            .lock()
            .entries
            .iter_mut()
            .find(|e| e.notification.id == id)
        {
            entry.notification.phase = phase;
        }
    }

    fn remove(&self, id: Uuid) {
        self.lock().entries.retain(|e| e.notification.id != id);
    }

    /// Reports that the fade-out transition of `id` has completed.
    ///
    /// Signals for notifications that are not leaving (for example the end
    /// of the fade-in) are ignored.
    pub fn transition_ended(&self, id: Uuid) {
        let container = self.lock();
        if let Some(entry) = container
            .entries
            .iter()
            .find(|e| e.notification.id == id && e.notification.phase == NotificationPhase::Leaving)
        {
            entry.transition.notify_one();
        }
    }

    /// Notifications currently in the container, oldest first.
    pub fn snapshot(&self) -> Vec<Notification> {
        self.lock()
            .entries
            .iter()
            .map(|e| e.notification.clone())
            .collect()
    }

    /// Number of notifications in the container.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    /// Whether the container is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Container markup, or `None` before the first notification.
    pub fn markup(&self) -> Option<String> {
        let container = self.lock();
        if !container.created {
            return None;
        }
        let mut html = String::from(r#"<div id="notification-container">"#);
        for entry in &container.entries {
            let n = &entry.notification;
            let shown = if n.phase == NotificationPhase::Visible {
                " show"
            } else {
                ""
            };
            html.push_str(&format!(
                r#"<div class="notification {}{}">{}</div>"#,
                n.kind.css_class(),
                shown,
                escape_html(&n.message)
            ));
        }
        html.push_str("</div>");
        Some(html)
    }
}
