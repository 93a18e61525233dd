//! # Error Types
//!
//! Domain-specific error types for storefront-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  storefront-core errors (this file)                                    │
//! │  └── CoreError     - Misuse of the form engine or the catalog          │
//! │                                                                         │
//! │  storefront-session errors (separate crate)                            │
//! │  └── SessionError  - Auth, config, network, token persistence          │
//! │                                                                         │
//! │  NOT errors:                                                            │
//! │  • A failing validation rule  → message stored on the form             │
//! │  • A malformed price filter   → clamped and swapped, warning logged    │
//! │  • Garbage formatter input    → best-effort stripped output            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Core logic errors.
///
/// Only raised for programming mistakes (unknown form keys, broken regexes,
/// zero page size). User input never produces one of these.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A form was asked to store a value for a key it was not built with.
    #[error("Unknown form field: {field}")]
    UnknownField { field: String },

    /// A pattern rule was given a regular expression that does not compile.
    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// Pagination needs at least one item per page.
    #[error("Items per page must be greater than 0, got {0}")]
    InvalidPageSize(usize),

    /// Form data could not be read back as the requested type.
    #[error("Form data does not match the requested shape: {0}")]
    FormData(String),
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::FormData(err.to_string())
    }
}

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;
