//! # Domain Types
//!
//! Catalog types shared by the pipeline, the session crate and the UI.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────────┐   ┌─────────────────┐   ┌─────────────────┐   │
//! │  │      Product        │   │    Category     │   │   PriceRange    │   │
//! │  │  ─────────────────  │   │  ─────────────  │   │  ─────────────  │   │
//! │  │  id                 │   │  slug           │   │  min (floor)    │   │
//! │  │  title, brand       │   │  name           │   │  max (ceil)     │   │
//! │  │  price              │   │  url            │   │  default 0-2000 │   │
//! │  │  discount_percentage│   └─────────────────┘   └─────────────────┘   │
//! │  │  rating             │                                                │
//! │  └─────────────────────┘                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Products arrive as JSON from the remote data source (camelCase keys,
//! `brand` sometimes missing) and are never mutated after loading.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{DEFAULT_MAX_PRICE, DEFAULT_MIN_PRICE};

// =============================================================================
// Product
// =============================================================================

/// A product in the loaded catalog snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    /// Remote identifier.
    pub id: u64,

    /// Display title; the `name` sort key compares this.
    pub title: String,

    #[serde(default)]
    pub description: String,

    /// Category slug this product belongs to.
    #[serde(default)]
    pub category: String,

    /// List price. Sorting always uses this value.
    pub price: f64,

    /// Discount in percent (0-100).
    #[serde(default)]
    pub discount_percentage: f64,

    /// Average rating (0-5 in practice).
    #[serde(default)]
    pub rating: f64,

    #[serde(default)]
    pub stock: i64,

    /// Brand name; empty when the source omits it.
    #[serde(default)]
    pub brand: String,

    #[serde(default)]
    pub thumbnail: Option<String>,
}

impl Product {
    /// Price after applying the discount percentage.
    ///
    /// Used for the absolute price range and price filtering only.
    pub fn effective_price(&self) -> f64 {
        self.price - (self.price * self.discount_percentage / 100.0)
    }

    /// Returns true if the product carries a non-blank brand.
    pub fn has_brand(&self) -> bool {
        !self.brand.trim().is_empty()
    }
}

// =============================================================================
// Category
// =============================================================================

/// A product category as listed by the data source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Category {
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub url: String,
}

// =============================================================================
// Price Range
// =============================================================================

/// Absolute price bounds derived from the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

impl PriceRange {
    pub const fn new(min: f64, max: f64) -> Self {
        PriceRange { min, max }
    }

    /// Clamps a value into `[min, max]`.
    ///
    /// Unlike `f64::clamp` this never panics when `min > max`.
    pub fn clamp(&self, value: f64) -> f64 {
        value.min(self.max).max(self.min)
    }

    /// Returns true if `value` lies within the bounds (inclusive).
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

impl Default for PriceRange {
    fn default() -> Self {
        PriceRange::new(DEFAULT_MIN_PRICE, DEFAULT_MAX_PRICE)
    }
}

// =============================================================================
// View Mode
// =============================================================================

/// How the product listing is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_price() {
        let product: Product = serde_json::from_value(serde_json::json!({
            "id": 1,
            "title": "Mascara",
            "price": 200.0,
            "discountPercentage": 25.0,
            "rating": 4.5
        }))
        .unwrap();

        assert!((product.effective_price() - 150.0).abs() < f64::EPSILON);
        assert!(!product.has_brand());
    }

    #[test]
    fn test_product_without_discount() {
        let product: Product = serde_json::from_value(serde_json::json!({
            "id": 2,
            "title": "Lamp",
            "price": 40.0,
            "brand": "Lumen"
        }))
        .unwrap();

        assert_eq!(product.effective_price(), 40.0);
        assert!(product.has_brand());
    }

    #[test]
    fn test_price_range_clamp() {
        let range = PriceRange::new(10.0, 100.0);
        assert_eq!(range.clamp(-5.0), 10.0);
        assert_eq!(range.clamp(50.0), 50.0);
        assert_eq!(range.clamp(500.0), 100.0);
        assert!(range.contains(10.0));
        assert!(!range.contains(100.5));
    }

    #[test]
    fn test_price_range_default() {
        assert_eq!(PriceRange::default(), PriceRange::new(0.0, 2000.0));
    }
}
