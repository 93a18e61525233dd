//! # Navigation and Route Guards
//!
//! ## Guard Decisions
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Route Guards                                   │
//! │                                                                         │
//! │  visitor → /account/orders?page=2                                       │
//! │       │                                                                 │
//! │       ├── authenticated?  ──► Allow                                     │
//! │       │                                                                 │
//! │       └── anonymous                                                     │
//! │            │                                                            │
//! │            ├── Authenticated guard                                      │
//! │            │   → /login?redirect=%2Faccount%2Forders%3Fpage%3D2         │
//! │            │                                                            │
//! │            └── Checkout guard                                           │
//! │                → /login?redirect=%2Fcheckout&message=checkout-login     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Reason tag the login view shows for checkout redirects.
pub const CHECKOUT_LOGIN_MESSAGE: &str = "checkout-login";

/// Moves the visitor to another view.
pub trait Navigator: Send + Sync {
    fn navigate_to(&self, path: &str);
}

/// Navigator that records every destination in order.
#[derive(Debug, Default)]
pub struct HistoryNavigator {
    history: Mutex<Vec<String>>,
}

impl HistoryNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> Vec<String> {
        self.history.lock().expect("History mutex poisoned").clone()
    }

    /// The most recent destination.
    pub fn current(&self) -> Option<String> {
        self.history
            .lock()
            .expect("History mutex poisoned")
            .last()
            .cloned()
    }
}

impl Navigator for HistoryNavigator {
    fn navigate_to(&self, path: &str) {
        debug!(path, "Navigating");
        self.history
            .lock()
            .expect("History mutex poisoned")
            .push(path.to_string());
    }
}

/// Builds `<login_path>?redirect=<encoded full_path>`, optionally tagged with
/// a reason.
pub fn login_redirect(login_path: &str, full_path: &str, reason: Option<&str>) -> String {
    let mut url = format!("{}?redirect={}", login_path, urlencoding::encode(full_path));
    if let Some(reason) = reason {
        url.push_str("&message=");
        url.push_str(&urlencoding::encode(reason));
    }
    url
}

/// Guards placed in front of protected views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteGuard {
    /// Any signed-in view (account, orders).
    Authenticated,
    /// Checkout; the login view gets a checkout-specific prompt.
    Checkout,
}

/// What a guard decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    Allow,
    Redirect(String),
}

impl RouteGuard {
    pub fn evaluate(
        &self,
        is_authenticated: bool,
        full_path: &str,
        login_path: &str,
    ) -> GuardOutcome {
        if is_authenticated {
            return GuardOutcome::Allow;
        }

        let reason = match self {
            RouteGuard::Authenticated => None,
            RouteGuard::Checkout => Some(CHECKOUT_LOGIN_MESSAGE),
        };
        GuardOutcome::Redirect(login_redirect(login_path, full_path, reason))
    }
}
