//! # Toast Notifications
//!
//! Short-lived notifications that remove themselves after their duration.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Toast Lifecycle                                 │
//! │                                                                         │
//! │  show("Saved", Success, 3s)                                             │
//! │       │                                                                 │
//! │       ├──► toasts.push(toast)          returns id                       │
//! │       │                                                                 │
//! │       └──► tokio::spawn(sleep 3s) ───► remove(id)                       │
//! │                                          │                              │
//! │  remove(id) (user dismisses early) ──────┤  both paths are no-ops       │
//! │                                          │  for an id already gone      │
//! │                                          ▼                              │
//! │                                       gone                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Outside a tokio runtime no timer can be scheduled; the toast stays until
//! [`ToastStore::remove`] or [`ToastStore::clear`].

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::runtime::Handle;
use tracing::debug;
use ts_rs::TS;
use uuid::Uuid;

/// Default lifetime of a toast.
pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_millis(3000);

/// Severity of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum ToastKind {
    Success,
    Error,
    Warning,
    #[default]
    Info,
}

/// A notification currently on screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Toast {
    pub id: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: ToastKind,
    pub duration_ms: u64,
}

/// Shared toast list. Clones see the same toasts.
#[derive(Debug, Clone)]
pub struct ToastStore {
    toasts: Arc<Mutex<Vec<Toast>>>,
    default_duration: Duration,
}

impl Default for ToastStore {
    fn default() -> Self {
        ToastStore::new(DEFAULT_TOAST_DURATION)
    }
}

impl ToastStore {
    pub fn new(default_duration: Duration) -> Self {
        ToastStore {
            toasts: Arc::new(Mutex::new(Vec::new())),
            default_duration,
        }
    }

    /// Appends a toast and schedules its removal. Returns the new id.
    pub fn show(&self, message: impl Into<String>, kind: ToastKind, duration: Duration) -> String {
        let id = Uuid::new_v4().to_string();
        let toast = Toast {
            id: id.clone(),
            message: message.into(),
            kind,
            duration_ms: u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
        };

        self.toasts.lock().expect("Toast mutex poisoned").push(toast);
        self.schedule_removal(id.clone(), duration);
        id
    }

    fn schedule_removal(&self, id: String, duration: Duration) {
        let Ok(handle) = Handle::try_current() else {
            debug!(%id, "No async runtime, toast stays until removed");
            return;
        };

        // Weak so a dropped store does not outlive its timers
        let toasts = Arc::downgrade(&self.toasts);
        handle.spawn(async move {
            tokio::time::sleep(duration).await;
            if let Some(toasts) = toasts.upgrade() {
                remove_by_id(&toasts, &id);
            }
        });
    }

    pub fn success(&self, message: impl Into<String>) -> String {
        self.success_for(message, self.default_duration)
    }

    pub fn error(&self, message: impl Into<String>) -> String {
        self.error_for(message, self.default_duration)
    }

    pub fn warning(&self, message: impl Into<String>) -> String {
        self.warning_for(message, self.default_duration)
    }

    pub fn info(&self, message: impl Into<String>) -> String {
        self.info_for(message, self.default_duration)
    }

    // Same as above with an explicit lifetime.

    pub fn success_for(&self, message: impl Into<String>, duration: Duration) -> String {
        self.show(message, ToastKind::Success, duration)
    }

    pub fn error_for(&self, message: impl Into<String>, duration: Duration) -> String {
        self.show(message, ToastKind::Error, duration)
    }

    pub fn warning_for(&self, message: impl Into<String>, duration: Duration) -> String {
        self.show(message, ToastKind::Warning, duration)
    }

    pub fn info_for(&self, message: impl Into<String>, duration: Duration) -> String {
        self.show(message, ToastKind::Info, duration)
    }

    /// Removes a toast. Returns false if it was already gone.
    pub fn remove(&self, id: &str) -> bool {
        remove_by_id(&self.toasts, id)
    }

    pub fn clear(&self) {
        self.toasts.lock().expect("Toast mutex poisoned").clear();
    }

    /// Snapshot in insertion order.
    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts.lock().expect("Toast mutex poisoned").clone()
    }

    pub fn len(&self) -> usize {
        self.toasts.lock().expect("Toast mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn default_duration(&self) -> Duration {
        self.default_duration
    }
}

fn remove_by_id(toasts: &Mutex<Vec<Toast>>, id: &str) -> bool {
    let mut toasts = toasts.lock().expect("Toast mutex poisoned");
    match toasts.iter().position(|t| t.id == id) {
        Some(index) => {
            toasts.remove(index);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_without_runtime_keeps_toast() {
        let store = ToastStore::default();
        let id = store.info("Hello");

        let toasts = store.toasts();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].id, id);
        assert_eq!(toasts[0].kind, ToastKind::Info);
        assert_eq!(toasts[0].duration_ms, 3000);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let store = ToastStore::default();
        let id = store.error("Failed");
        assert!(store.remove(&id));
        assert!(!store.remove(&id));
        assert!(store.is_empty());
    }

    #[test]
    fn test_wrappers_and_order() {
        let store = ToastStore::default();
        store.success("a");
        store.warning("b");
        store.error("c");

        let kinds: Vec<ToastKind> = store.toasts().iter().map(|t| t.kind).collect();
        assert_eq!(kinds, vec![ToastKind::Success, ToastKind::Warning, ToastKind::Error]);

        store.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn test_ids_are_unique() {
        let store = ToastStore::default();
        let a = store.info("x");
        let b = store.info("x");
        assert_ne!(a, b);
    }

    #[test]
    fn test_toast_json_shape() {
        let toast = Toast {
            id: "1".into(),
            message: "Saved".into(),
            kind: ToastKind::Success,
            duration_ms: 3000,
        };
        let json = serde_json::to_value(&toast).unwrap();
        assert_eq!(json["type"], "success");
        assert_eq!(json["durationMs"], 3000);
    }

    #[tokio::test(start_paused = true)]
    async fn test_toast_expires_after_duration() {
        let store = ToastStore::default();
        store.success("Saved");
        let long = store.show("Still here", ToastKind::Info, Duration::from_secs(10));

        tokio::time::sleep(Duration::from_millis(2999)).await;
        assert_eq!(store.len(), 2);

        tokio::time::sleep(Duration::from_millis(2)).await;
        tokio::task::yield_now().await;
        let remaining = store.toasts();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, long);
    }

    #[test]
    fn test_wrappers_with_explicit_duration() {
        let store = ToastStore::default();
        store.success_for("Order placed", Duration::from_secs(5));
        store.error_for("Payment declined", Duration::from_millis(8000));
        store.warning_for("Low stock", Duration::from_millis(1500));
        store.info_for("Syncing", Duration::from_secs(1));

        let toasts = store.toasts();
        let durations: Vec<u64> = toasts.iter().map(|t| t.duration_ms).collect();
        assert_eq!(durations, vec![5000, 8000, 1500, 1000]);
        assert_eq!(toasts[1].kind, ToastKind::Error);
    }

    #[tokio::test(start_paused = true)]
    async fn test_explicit_duration_controls_expiry() {
        let store = ToastStore::default();
        let short = store.warning_for("Low stock", Duration::from_millis(500));
        let default = store.warning("Check your address");

        tokio::time::sleep(Duration::from_millis(501)).await;
        tokio::task::yield_now().await;
        let remaining = store.toasts();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, default);
        assert!(!store.remove(&short));
    }

    #[tokio::test(start_paused = true)]
    async fn test_early_removal_races_timer() {
        let store = ToastStore::default();
        let id = store.warning("Low stock");
        assert!(store.remove(&id));

        tokio::time::sleep(Duration::from_secs(4)).await;
        tokio::task::yield_now().await;
        assert!(store.is_empty());
        assert!(!store.remove(&id));
    }
}
