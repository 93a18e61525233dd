//! # Session Error Types
//!
//! Error types for auth, configuration, transport and token persistence.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Session Error Categories                           │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │      Auth       │  │      Transport          │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  LoginFailed    │  │  Network                │ │
//! │  │  ConfigLoad...  │  │  Unauthorized   │  │  UnexpectedResponse     │ │
//! │  │  ConfigSave...  │  │  Registration.. │  │  Serialization          │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐                              │
//! │  │   Persistence   │  │      Core       │                              │
//! │  │                 │  │                 │                              │
//! │  │  TokenStore     │  │  CoreError      │                              │
//! │  │  Io             │  │  (page size...) │                              │
//! │  └─────────────────┘  └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use storefront_core::CoreError;
use thiserror::Error;

/// Result type alias for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Every failure the session layer can surface.
///
/// Most of these never reach the UI: [`crate::AuthStore`] degrades
/// current-user failures to a logged-out state and only login failures are
/// returned to the caller.
#[derive(Debug, Error)]
pub enum SessionError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    #[error("Invalid storefront configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Auth Errors
    // =========================================================================
    /// The auth endpoint rejected the credentials.
    #[error("Login failed: {0}")]
    LoginFailed(String),

    /// The session token was missing, expired or rejected.
    #[error("Not authorized")]
    Unauthorized,

    #[error("Registration not implemented - use existing users")]
    RegistrationUnsupported,

    // =========================================================================
    // Transport Errors
    // =========================================================================
    #[error("Network error: {0}")]
    Network(String),

    #[error("Unexpected response ({status}): {message}")]
    UnexpectedResponse { status: u16, message: String },

    #[error("Serialization failed: {0}")]
    Serialization(String),

    // =========================================================================
    // Persistence Errors
    // =========================================================================
    #[error("Token store error: {0}")]
    TokenStore(String),

    #[error("I/O error: {0}")]
    Io(String),

    // =========================================================================
    // Core Errors
    // =========================================================================
    #[error(transparent)]
    Core(#[from] CoreError),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<reqwest::Error> for SessionError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            SessionError::Serialization(err.to_string())
        } else {
            SessionError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for SessionError {
    fn from(err: serde_json::Error) -> Self {
        SessionError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for SessionError {
    fn from(err: std::io::Error) -> Self {
        SessionError::Io(err.to_string())
    }
}

impl From<toml::de::Error> for SessionError {
    fn from(err: toml::de::Error) -> Self {
        SessionError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for SessionError {
    fn from(err: toml::ser::Error) -> Self {
        SessionError::ConfigSaveFailed(err.to_string())
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl SessionError {
    /// Returns true if the error means the user has to sign in (again).
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            SessionError::LoginFailed(_)
                | SessionError::Unauthorized
                | SessionError::RegistrationUnsupported
        )
    }

    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            SessionError::InvalidConfig(_)
                | SessionError::ConfigLoadFailed(_)
                | SessionError::ConfigSaveFailed(_)
        )
    }
}
