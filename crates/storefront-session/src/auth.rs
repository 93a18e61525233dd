//! # Auth Store
//!
//! Session state for the signed-in shopper.
//!
//! ## State Transitions
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Auth State Machine                               │
//! │                                                                         │
//! │  ┌─────────────┐        login() ok         ┌─────────────────────┐     │
//! │  │  Anonymous  │ ────────────────────────► │   Authenticated     │     │
//! │  │  user=None  │                           │   user + token set  │     │
//! │  └─────────────┘ ◄──────────────────────── └─────────────────────┘     │
//! │        │            logout()             → navigate to /login          │
//! │        │            fetch_current_user() err → NO navigation           │
//! │        │                                                                │
//! │        └── init_auth(): persisted token → fetch_current_user()         │
//! │                                                                         │
//! │  login() err: state unchanged, error returned for the UI               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A failed current-user fetch never redirects: the redirect would hit the
//! route guard again and loop.
//!
//! State sits behind a `tokio::sync::RwLock`; no lock is held across a
//! network call.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use crate::api::{AuthApi, AuthResponse, LoginCredentials, User};
use crate::error::{SessionError, SessionResult};
use crate::navigation::Navigator;
use crate::token_store::TokenStore;

/// Snapshot of the auth state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthState {
    pub user: Option<User>,
    pub token: Option<String>,
    pub is_authenticated: bool,
    pub is_loading: bool,
}

impl AuthState {
    fn clear_session(&mut self) {
        self.user = None;
        self.token = None;
        self.is_authenticated = false;
    }
}

/// Auth store wired to its collaborators.
pub struct AuthStore {
    api: Arc<dyn AuthApi>,
    tokens: Arc<dyn TokenStore>,
    navigator: Arc<dyn Navigator>,
    login_path: String,
    state: RwLock<AuthState>,
}

impl AuthStore {
    pub fn new(
        api: Arc<dyn AuthApi>,
        tokens: Arc<dyn TokenStore>,
        navigator: Arc<dyn Navigator>,
        login_path: impl Into<String>,
    ) -> Self {
        AuthStore {
            api,
            tokens,
            navigator,
            login_path: login_path.into(),
            state: RwLock::new(AuthState::default()),
        }
    }

    // =========================================================================
    // Getters
    // =========================================================================

    pub async fn snapshot(&self) -> AuthState {
        self.state.read().await.clone()
    }

    pub async fn current_user(&self) -> Option<User> {
        self.state.read().await.user.clone()
    }

    pub async fn auth_token(&self) -> Option<String> {
        self.state.read().await.token.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.is_authenticated
    }

    pub async fn is_loading(&self) -> bool {
        self.state.read().await.is_loading
    }

    /// Empty when signed out.
    pub async fn user_full_name(&self) -> String {
        self.state
            .read()
            .await
            .user
            .as_ref()
            .map(User::full_name)
            .unwrap_or_default()
    }

    /// Empty when signed out.
    pub async fn user_initials(&self) -> String {
        self.state
            .read()
            .await
            .user
            .as_ref()
            .map(User::initials)
            .unwrap_or_default()
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    // =========================================================================
    // Actions
    // =========================================================================

    /// Signs in and persists the token.
    ///
    /// A failed token save is logged; the in-memory session still stands.
    pub async fn login(&self, credentials: &LoginCredentials) -> SessionResult<AuthResponse> {
        self.state.write().await.is_loading = true;

        let result = self.api.login(credentials).await;

        let mut state = self.state.write().await;
        state.is_loading = false;
        let response = result?;

        state.user = Some(response.user.clone());
        state.token = Some(response.token.clone());
        state.is_authenticated = true;
        drop(state);

        if let Err(e) = self.tokens.save(&response.token) {
            warn!(error = %e, "Failed to persist auth token");
        }

        info!(username = %response.user.username, "Logged in");
        Ok(response)
    }

    /// Always fails: the backend has no registration endpoint.
    pub async fn register(&self, _credentials: &LoginCredentials) -> SessionResult<AuthResponse> {
        Err(SessionError::RegistrationUnsupported)
    }

    /// Clears the session and the persisted token, then goes to the login view.
    pub async fn logout(&self) {
        {
            let mut state = self.state.write().await;
            state.is_loading = true;
            state.clear_session();
        }

        if let Err(e) = self.tokens.clear() {
            warn!(error = %e, "Failed to clear persisted auth token");
        }

        self.navigator.navigate_to(&self.login_path);
        self.state.write().await.is_loading = false;
        info!("Logged out");
    }

    /// Refreshes the user behind the current token.
    ///
    /// Returns `None` without a token. On failure the in-memory session is
    /// cleared but no navigation happens.
    pub async fn fetch_current_user(&self) -> Option<User> {
        let token = self.state.read().await.token.clone()?;

        match self.api.current_user(&token).await {
            Ok(user) => {
                let mut state = self.state.write().await;
                state.user = Some(user.clone());
                state.is_authenticated = true;
                Some(user)
            }
            Err(e) => {
                error!(error = %e, "Failed to fetch current user");
                self.state.write().await.clear_session();
                None
            }
        }
    }

    /// Restores a persisted session, if any.
    pub async fn init_auth(&self) -> Option<User> {
        let token = match self.tokens.load() {
            Ok(Some(token)) => token,
            Ok(None) => return None,
            Err(e) => {
                warn!(error = %e, "Failed to load persisted auth token");
                return None;
            }
        };

        self.state.write().await.token = Some(token);
        self.fetch_current_user().await
    }
}
