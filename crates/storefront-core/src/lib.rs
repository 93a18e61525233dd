//! # storefront-core: Pure Derivation Logic for the Storefront
//!
//! This crate holds the storefront's client-side logic as pure functions and
//! plain state structs. Nothing in here performs I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Storefront Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    UI Layer (any front end)                     │   │
//! │  │    Product grid ──► Filters ──► Cart ──► Checkout forms        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 storefront-session                              │   │
//! │  │    AuthStore, ToastStore, route guards, HTTP data source        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │            ★ storefront-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌────────────┐  ┌──────────┐  │   │
//! │  │   │   types   │  │  format   │  │ validation │  │ catalog  │  │   │
//! │  │   │  Product  │  │ card, zip │  │ FormValid- │  │ filter   │  │   │
//! │  │   │ Category  │  │ phone,cvv │  │ ator+rules │  │ sort,page│  │   │
//! │  │   └───────────┘  └───────────┘  └────────────┘  └──────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO TIMERS • PURE DERIVATIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Category, PriceRange, ViewMode)
//! - [`format`] - Cosmetic input formatters and card network detection
//! - [`validation`] - Rule-chain form engine
//! - [`rules`] - Reusable rule factories and the address/card rule sets
//! - [`catalog`] - Filter, sort and paginate pipeline over a product snapshot
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Derived, never cached**: every computed list is recomputed from state
//! 2. **Self-correcting input**: malformed price filters are clamped, not rejected
//! 3. **Messages, not errors**: a failing rule stores a message on the form
//!
//! ## Example Usage
//!
//! ```rust
//! use storefront_core::catalog::{paginate, total_pages};
//!
//! let items: Vec<u32> = (1..=25).collect();
//! assert_eq!(total_pages(items.len(), 12), 3);
//! assert_eq!(paginate(&items, 3, 12), &[25]);
//! assert!(paginate(&items, 4, 12).is_empty());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod error;
pub mod format;
pub mod rules;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use catalog::{FilterState, PageInfo, ProductCatalog, SortKey};
pub use error::{CoreError, CoreResult};
pub use format::CardType;
pub use types::*;
pub use validation::{FieldValue, FormValidator, Rule, RuleSet};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Lower bound of the price range used before any products are loaded.
pub const DEFAULT_MIN_PRICE: f64 = 0.0;

/// Upper bound of the price range used before any products are loaded.
///
/// Also the initial value of the raw `max_price` filter.
pub const DEFAULT_MAX_PRICE: f64 = 2000.0;

/// Products shown per listing page unless configured otherwise.
pub const DEFAULT_ITEMS_PER_PAGE: usize = 12;
