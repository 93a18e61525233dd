//! # Catalog Pipeline
//!
//! Derives the visible product page from a loaded product snapshot.
//!
//! ## Derivation Chain
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Product Listing Pipeline                          │
//! │                                                                         │
//! │  products (snapshot)          filters (raw user input)                  │
//! │       │                            │                                    │
//! │       ├──► price_range() ──────────┤                                    │
//! │       │    floor/ceil of           ▼                                    │
//! │       │    effective prices   correct_price_range()                     │
//! │       │                       clamp each bound, swap if crossed         │
//! │       ▼                            │                                    │
//! │  filter_products() ◄───────────────┘                                    │
//! │  1. price   (skipped when the range is the full range)                  │
//! │  2. brand   (skipped when no brand selected)                            │
//! │  3. rating  (skipped when min_rating == 0)                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  sort_products()   stable; list price, never effective price            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  paginate()        [(page-1)*n, page*n) clipped; out of range → empty   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The raw `min_price`/`max_price` in [`FilterState`] are never overwritten by
//! the derivation, so the UI keeps showing what the user typed. Only
//! [`ProductCatalog::update_price_range`] writes corrected bounds back.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::types::{Category, PriceRange, Product, ViewMode};
use crate::{DEFAULT_ITEMS_PER_PAGE, DEFAULT_MAX_PRICE, DEFAULT_MIN_PRICE};

// =============================================================================
// Filter & Sort State
// =============================================================================

/// Raw, user-controlled filter input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct FilterState {
    /// Category the data source should fetch. The pipeline ignores it.
    pub selected_category: String,
    pub min_price: f64,
    pub max_price: f64,
    pub selected_brands: BTreeSet<String>,
    pub min_rating: f64,
}

impl Default for FilterState {
    fn default() -> Self {
        FilterState {
            selected_category: String::new(),
            min_price: DEFAULT_MIN_PRICE,
            max_price: DEFAULT_MAX_PRICE,
            selected_brands: BTreeSet::new(),
            min_rating: 0.0,
        }
    }
}

/// Listing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum SortKey {
    /// Keep the filtered order.
    #[default]
    #[serde(rename = "")]
    Unsorted,
    PriceLow,
    PriceHigh,
    Rating,
    Name,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Unsorted => "",
            SortKey::PriceLow => "price-low",
            SortKey::PriceHigh => "price-high",
            SortKey::Rating => "rating",
            SortKey::Name => "name",
        }
    }
}

/// Unrecognised keys fall back to [`SortKey::Unsorted`].
impl From<&str> for SortKey {
    fn from(key: &str) -> Self {
        match key.trim() {
            "price-low" => SortKey::PriceLow,
            "price-high" => SortKey::PriceHigh,
            "rating" => SortKey::Rating,
            "name" => SortKey::Name,
            _ => SortKey::Unsorted,
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A clamped, ordered price interval.
///
/// `swapped` is set when clamping left the bounds crossed and they were
/// exchanged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceCorrection {
    pub min_price: f64,
    pub max_price: f64,
    pub swapped: bool,
}

/// Summary of one listing page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PageInfo {
    pub page: usize,
    pub per_page: usize,
    pub total_items: usize,
    pub total_pages: usize,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PageInfo {
    pub fn new(page: usize, per_page: usize, total_items: usize) -> Self {
        let total_pages = total_pages(total_items, per_page);
        PageInfo {
            page,
            per_page,
            total_items,
            total_pages,
            has_next: page < total_pages,
            has_prev: page > 1,
        }
    }
}

// =============================================================================
// Pure Derivations
// =============================================================================

/// Distinct non-blank brands, alphabetically.
pub fn available_brands(products: &[Product]) -> Vec<String> {
    products
        .iter()
        .filter(|p| p.has_brand())
        .map(|p| p.brand.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Absolute bounds of the effective prices, widened to whole numbers.
///
/// Falls back to the default range for an empty snapshot.
pub fn price_range(products: &[Product]) -> PriceRange {
    if products.is_empty() {
        return PriceRange::default();
    }

    let (min, max) = products
        .iter()
        .map(Product::effective_price)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), price| {
            (lo.min(price), hi.max(price))
        });

    PriceRange::new(min.floor(), max.ceil())
}

/// Clamps both bounds into `range`, then swaps them if they crossed.
///
/// ## Example
/// ```rust
/// use storefront_core::catalog::correct_price_range;
/// use storefront_core::PriceRange;
///
/// let fixed = correct_price_range(900.0, 50.0, PriceRange::new(10.0, 500.0));
/// assert_eq!((fixed.min_price, fixed.max_price), (50.0, 500.0));
/// assert!(fixed.swapped);
/// ```
pub fn correct_price_range(min: f64, max: f64, range: PriceRange) -> PriceCorrection {
    let clamped_min = range.clamp(min);
    let clamped_max = range.clamp(max);

    if clamped_min > clamped_max {
        PriceCorrection {
            min_price: clamped_max,
            max_price: clamped_min,
            swapped: true,
        }
    } else {
        PriceCorrection {
            min_price: clamped_min,
            max_price: clamped_max,
            swapped: false,
        }
    }
}

/// Applies the price, brand and rating predicates in that order.
pub fn filter_products<'a>(products: &'a [Product], filters: &FilterState) -> Vec<&'a Product> {
    let range = price_range(products);
    let bounds = correct_price_range(filters.min_price, filters.max_price, range);
    let narrows_price = bounds.min_price > range.min || bounds.max_price < range.max;
    let window = PriceRange::new(bounds.min_price, bounds.max_price);

    products
        .iter()
        .filter(|p| !narrows_price || window.contains(p.effective_price()))
        .filter(|p| {
            filters.selected_brands.is_empty() || filters.selected_brands.contains(&p.brand)
        })
        .filter(|p| filters.min_rating <= 0.0 || p.rating >= filters.min_rating)
        .collect()
}

/// Stable in-place sort by `key`.
pub fn sort_products(products: &mut [&Product], key: SortKey) {
    match key {
        SortKey::Unsorted => {}
        SortKey::PriceLow => products.sort_by(|a, b| a.price.total_cmp(&b.price)),
        SortKey::PriceHigh => products.sort_by(|a, b| b.price.total_cmp(&a.price)),
        SortKey::Rating => products.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
        // Case-insensitive first so "apple" and "Banana" order like a person would
        SortKey::Name => products.sort_by(|a, b| {
            a.title
                .to_lowercase()
                .cmp(&b.title.to_lowercase())
                .then_with(|| a.title.cmp(&b.title))
        }),
    }
}

/// `ceil(total_items / per_page)`; zero when either is zero.
pub fn total_pages(total_items: usize, per_page: usize) -> usize {
    if per_page == 0 {
        return 0;
    }
    total_items.div_ceil(per_page)
}

/// The `page`-th window (1-based) of `items`.
///
/// Page 0 and pages past the end give an empty slice.
pub fn paginate<T>(items: &[T], page: usize, per_page: usize) -> &[T] {
    let Some(start) = page
        .checked_sub(1)
        .and_then(|p| p.checked_mul(per_page))
    else {
        return &[];
    };
    if start >= items.len() {
        return &[];
    }

    let end = start.saturating_add(per_page).min(items.len());
    &items[start..end]
}

// =============================================================================
// Catalog State
// =============================================================================

/// Listing state for one browsing session.
#[derive(Debug, Clone)]
pub struct ProductCatalog {
    products: Vec<Product>,
    categories: Vec<Category>,
    filters: FilterState,
    sort_by: SortKey,
    current_page: usize,
    items_per_page: usize,
    view_mode: ViewMode,
    loading: bool,
    error: Option<String>,
}

impl Default for ProductCatalog {
    fn default() -> Self {
        ProductCatalog {
            products: Vec::new(),
            categories: Vec::new(),
            filters: FilterState::default(),
            sort_by: SortKey::default(),
            current_page: 1,
            items_per_page: DEFAULT_ITEMS_PER_PAGE,
            view_mode: ViewMode::default(),
            loading: false,
            error: None,
        }
    }
}

/// Every derived value of a [`ProductCatalog`], computed in one pass.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogView<'a> {
    pub brands: Vec<String>,
    pub price_range: PriceRange,
    pub price_filter: PriceCorrection,
    pub filtered_count: usize,
    pub page: PageInfo,
    pub items: Vec<&'a Product>,
}

impl ProductCatalog {
    pub fn new(items_per_page: usize) -> CoreResult<Self> {
        let mut catalog = Self::default();
        catalog.set_items_per_page(items_per_page)?;
        Ok(catalog)
    }

    // -------------------------------------------------------------------------
    // Loading
    // -------------------------------------------------------------------------

    pub fn begin_loading(&mut self) {
        self.loading = true;
        self.error = None;
    }

    pub fn set_products(&mut self, products: Vec<Product>) {
        debug!(count = products.len(), "Catalog products loaded");
        self.products = products;
        self.loading = false;
        self.error = None;
    }

    pub fn set_categories(&mut self, categories: Vec<Category>) {
        self.categories = categories;
        self.loading = false;
        self.error = None;
    }

    pub fn fail_loading(&mut self, message: impl Into<String>) {
        self.loading = false;
        self.error = Some(message.into());
    }

    // -------------------------------------------------------------------------
    // Filter & Paging Mutations
    // -------------------------------------------------------------------------

    pub fn set_sort(&mut self, key: SortKey) {
        self.sort_by = key;
    }

    /// Sets the 1-based page as given.
    ///
    /// The page is not re-clamped when filters later shrink the result set;
    /// an out-of-range page simply renders empty.
    pub fn set_page(&mut self, page: usize) {
        self.current_page = page;
    }

    pub fn set_items_per_page(&mut self, per_page: usize) -> CoreResult<()> {
        if per_page == 0 {
            return Err(CoreError::InvalidPageSize(per_page));
        }
        self.items_per_page = per_page;
        Ok(())
    }

    pub fn set_min_price(&mut self, price: f64) {
        self.filters.min_price = price;
    }

    pub fn set_max_price(&mut self, price: f64) {
        self.filters.max_price = price;
    }

    /// Adds the brand if absent, removes it otherwise.
    pub fn toggle_brand(&mut self, brand: &str) {
        if !self.filters.selected_brands.remove(brand) {
            self.filters.selected_brands.insert(brand.to_string());
        }
    }

    pub fn set_brands<I, S>(&mut self, brands: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filters.selected_brands = brands.into_iter().map(Into::into).collect();
    }

    pub fn clear_brands(&mut self) {
        self.filters.selected_brands.clear();
    }

    pub fn set_min_rating(&mut self, rating: f64) {
        self.filters.min_rating = rating;
    }

    pub fn set_category(&mut self, slug: impl Into<String>) {
        self.filters.selected_category = slug.into();
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.view_mode = mode;
    }

    pub fn reset_filters(&mut self) {
        self.filters = FilterState::default();
    }

    // -------------------------------------------------------------------------
    // Price Range Helpers
    // -------------------------------------------------------------------------

    /// Corrects a candidate range against the current catalog, without side
    /// effects.
    pub fn validate_price_range(&self, min: f64, max: f64) -> PriceCorrection {
        correct_price_range(min, max, self.price_range())
    }

    /// Corrects a candidate range and stores it as the price filter.
    pub fn update_price_range(&mut self, min: f64, max: f64) -> PriceCorrection {
        let corrected = self.validate_price_range(min, max);
        self.filters.min_price = corrected.min_price;
        self.filters.max_price = corrected.max_price;

        if corrected.swapped {
            warn!(
                min = corrected.min_price,
                max = corrected.max_price,
                "Price range corrected: min and max values were swapped"
            );
        }
        corrected
    }

    // -------------------------------------------------------------------------
    // Derived Values
    // -------------------------------------------------------------------------

    pub fn available_brands(&self) -> Vec<String> {
        available_brands(&self.products)
    }

    pub fn price_range(&self) -> PriceRange {
        price_range(&self.products)
    }

    /// The raw price filter as actually applied.
    pub fn validated_price_filters(&self) -> PriceCorrection {
        self.validate_price_range(self.filters.min_price, self.filters.max_price)
    }

    pub fn filtered_products(&self) -> Vec<&Product> {
        filter_products(&self.products, &self.filters)
    }

    pub fn sorted_products(&self) -> Vec<&Product> {
        let mut sorted = self.filtered_products();
        sort_products(&mut sorted, self.sort_by);
        sorted
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.filtered_products().len(), self.items_per_page)
    }

    pub fn paginated_products(&self) -> Vec<&Product> {
        paginate(&self.sorted_products(), self.current_page, self.items_per_page).to_vec()
    }

    pub fn page_info(&self) -> PageInfo {
        PageInfo::new(
            self.current_page,
            self.items_per_page,
            self.filtered_products().len(),
        )
    }

    pub fn view(&self) -> CatalogView<'_> {
        let sorted = self.sorted_products();
        let page = PageInfo::new(self.current_page, self.items_per_page, sorted.len());
        let items = paginate(&sorted, self.current_page, self.items_per_page).to_vec();

        CatalogView {
            brands: self.available_brands(),
            price_range: self.price_range(),
            price_filter: self.validated_price_filters(),
            filtered_count: sorted.len(),
            page,
            items,
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn sort_by(&self) -> SortKey {
        self.sort_by
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn items_per_page(&self) -> usize {
        self.items_per_page
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product(
        id: u64,
        title: &str,
        price: f64,
        discount: f64,
        brand: &str,
        rating: f64,
    ) -> Product {
        Product {
            id,
            title: title.to_string(),
            description: String::new(),
            category: "misc".to_string(),
            price,
            discount_percentage: discount,
            rating,
            stock: 10,
            brand: brand.to_string(),
            thumbnail: None,
        }
    }

    fn sample() -> Vec<Product> {
        vec![
            product(1, "Lamp", 30.0, 0.0, "Lumen", 4.0),
            product(2, "apple juice", 10.0, 0.0, "Orchard", 3.5),
            product(3, "Banana", 20.0, 50.0, "Orchard", 4.8),
            product(4, "Chair", 120.0, 10.0, "", 2.0),
        ]
    }

    fn ids(products: &[&Product]) -> Vec<u64> {
        products.iter().map(|p| p.id).collect()
    }

    #[test]
    fn test_available_brands_sorted_and_distinct() {
        assert_eq!(available_brands(&sample()), vec!["Lumen", "Orchard"]);
        assert!(available_brands(&[]).is_empty());
    }

    #[test]
    fn test_price_range_uses_effective_price() {
        // Banana: 20 at 50% off = 10; Chair: 120 at 10% off = 108
        let range = price_range(&sample());
        assert_eq!(range, PriceRange::new(10.0, 108.0));

        let odd = vec![product(1, "A", 9.99, 0.0, "", 1.0), product(2, "B", 10.01, 0.0, "", 1.0)];
        assert_eq!(price_range(&odd), PriceRange::new(9.0, 11.0));
    }

    #[test]
    fn test_price_range_default_when_empty() {
        assert_eq!(price_range(&[]), PriceRange::new(0.0, 2000.0));
    }

    #[test]
    fn test_correct_price_range_swaps() {
        let range = PriceRange::new(0.0, 100.0);
        let fixed = correct_price_range(80.0, 20.0, range);
        assert_eq!((fixed.min_price, fixed.max_price, fixed.swapped), (20.0, 80.0, true));

        let fixed = correct_price_range(-50.0, 500.0, range);
        assert_eq!((fixed.min_price, fixed.max_price, fixed.swapped), (0.0, 100.0, false));

        // Both clamp to the same bound, nothing left to swap
        let fixed = correct_price_range(300.0, 200.0, range);
        assert_eq!((fixed.min_price, fixed.max_price, fixed.swapped), (100.0, 100.0, false));
    }

    #[test]
    fn test_validated_filters_stay_inside_range() {
        let products = sample();
        let range = price_range(&products);
        let inputs = [
            (-10.0, 5000.0),
            (5000.0, -10.0),
            (60.0, 40.0),
            (f64::MAX, f64::MIN),
            (50.0, 50.0),
        ];

        for (min, max) in inputs {
            let fixed = correct_price_range(min, max, range);
            assert!(range.min <= fixed.min_price, "{min} {max}");
            assert!(fixed.min_price <= fixed.max_price, "{min} {max}");
            assert!(fixed.max_price <= range.max, "{min} {max}");
        }
    }

    #[test]
    fn test_full_range_skips_price_filter() {
        let products = sample();
        let filters = FilterState::default();
        assert_eq!(filter_products(&products, &filters).len(), 4);
    }

    #[test]
    fn test_price_filter_uses_effective_price() {
        let products = sample();
        let filters = FilterState {
            min_price: 10.0,
            max_price: 25.0,
            ..FilterState::default()
        };
        // Banana (effective 10) and apple juice (10) pass, Lamp (30) does not
        assert_eq!(ids(&filter_products(&products, &filters)), vec![2, 3]);
    }

    #[test]
    fn test_brand_and_rating_filters_compose() {
        let products = sample();
        let mut filters = FilterState::default();
        filters.selected_brands.insert("Orchard".to_string());
        assert_eq!(ids(&filter_products(&products, &filters)), vec![2, 3]);

        filters.min_rating = 4.0;
        assert_eq!(ids(&filter_products(&products, &filters)), vec![3]);
    }

    #[test]
    fn test_sort_uses_list_price() {
        let products = vec![
            product(1, "A", 30.0, 0.0, "", 1.0),
            product(2, "B", 10.0, 0.0, "", 1.0),
            product(3, "C", 20.0, 90.0, "", 1.0),
        ];
        let mut refs: Vec<&Product> = products.iter().collect();

        sort_products(&mut refs, SortKey::PriceLow);
        // C is cheapest after discount (2.0) but sorts by its list price 20
        assert_eq!(ids(&refs), vec![2, 3, 1]);

        sort_products(&mut refs, SortKey::PriceHigh);
        assert_eq!(ids(&refs), vec![1, 3, 2]);
    }

    #[test]
    fn test_sort_by_rating_and_name() {
        let products = sample();
        let mut refs: Vec<&Product> = products.iter().collect();

        sort_products(&mut refs, SortKey::Rating);
        assert_eq!(ids(&refs), vec![3, 1, 2, 4]);

        sort_products(&mut refs, SortKey::Name);
        assert_eq!(ids(&refs), vec![2, 3, 4, 1]);
    }

    #[test]
    fn test_sort_is_stable() {
        let products = vec![
            product(1, "A", 10.0, 0.0, "", 4.0),
            product(2, "B", 10.0, 0.0, "", 4.0),
            product(3, "C", 5.0, 0.0, "", 4.0),
        ];
        let mut refs: Vec<&Product> = products.iter().collect();
        sort_products(&mut refs, SortKey::PriceLow);
        assert_eq!(ids(&refs), vec![3, 1, 2]);

        let mut refs: Vec<&Product> = products.iter().collect();
        sort_products(&mut refs, SortKey::Unsorted);
        assert_eq!(ids(&refs), vec![1, 2, 3]);
    }

    #[test]
    fn test_sort_key_parsing() {
        assert_eq!(SortKey::from("price-low"), SortKey::PriceLow);
        assert_eq!(SortKey::from("name"), SortKey::Name);
        assert_eq!(SortKey::from("popularity"), SortKey::Unsorted);
        assert_eq!(SortKey::from(""), SortKey::Unsorted);
        assert_eq!(serde_json::to_string(&SortKey::PriceHigh).unwrap(), "\"price-high\"");
    }

    #[test]
    fn test_pagination_windows() {
        let items: Vec<u32> = (1..=25).collect();
        assert_eq!(total_pages(items.len(), 12), 3);
        assert_eq!(paginate(&items, 1, 12).len(), 12);
        assert_eq!(paginate(&items, 3, 12), &[25]);
        assert!(paginate(&items, 4, 12).is_empty());
        assert!(paginate(&items, 0, 12).is_empty());
        assert_eq!(total_pages(0, 12), 0);
    }

    #[test]
    fn test_page_info() {
        let info = PageInfo::new(2, 12, 25);
        assert_eq!(info.total_pages, 3);
        assert!(info.has_next);
        assert!(info.has_prev);

        let last = PageInfo::new(3, 12, 25);
        assert!(!last.has_next);
    }

    #[test]
    fn test_catalog_rejects_zero_page_size() {
        assert!(matches!(ProductCatalog::new(0), Err(CoreError::InvalidPageSize(0))));

        let mut catalog = ProductCatalog::default();
        assert!(catalog.set_items_per_page(0).is_err());
        assert_eq!(catalog.items_per_page(), 12);
    }

    #[test]
    fn test_page_not_reclamped_after_filtering() {
        let mut catalog = ProductCatalog::new(2).unwrap();
        catalog.set_products(sample());
        catalog.set_page(2);
        assert_eq!(catalog.paginated_products().len(), 2);

        catalog.set_brands(["Lumen"]);
        assert_eq!(catalog.current_page(), 2);
        assert!(catalog.paginated_products().is_empty());
    }

    #[test]
    fn test_update_price_range_writes_back() {
        let mut catalog = ProductCatalog::default();
        catalog.set_products(sample());

        let preview = catalog.validate_price_range(100.0, 20.0);
        assert!(preview.swapped);
        assert_eq!(catalog.filters().min_price, 0.0);

        let applied = catalog.update_price_range(100.0, 20.0);
        assert_eq!(applied, preview);
        assert_eq!(catalog.filters().min_price, 20.0);
        assert_eq!(catalog.filters().max_price, 100.0);
    }

    #[test]
    fn test_raw_filters_preserved() {
        let mut catalog = ProductCatalog::default();
        catalog.set_products(sample());
        catalog.set_min_price(-5.0);
        catalog.set_max_price(9999.0);

        let validated = catalog.validated_price_filters();
        assert_eq!((validated.min_price, validated.max_price), (10.0, 108.0));
        assert_eq!(catalog.filters().min_price, -5.0);
        assert_eq!(catalog.filters().max_price, 9999.0);
    }

    #[test]
    fn test_toggle_and_reset() {
        let mut catalog = ProductCatalog::default();
        catalog.toggle_brand("Lumen");
        assert!(catalog.filters().selected_brands.contains("Lumen"));
        catalog.toggle_brand("Lumen");
        assert!(catalog.filters().selected_brands.is_empty());

        catalog.set_min_rating(4.0);
        catalog.set_category("groceries");
        catalog.reset_filters();
        assert_eq!(catalog.filters(), &FilterState::default());
    }

    #[test]
    fn test_loading_lifecycle() {
        let mut catalog = ProductCatalog::default();
        catalog.begin_loading();
        assert!(catalog.is_loading());

        catalog.fail_loading("offline");
        assert!(!catalog.is_loading());
        assert_eq!(catalog.error(), Some("offline"));

        catalog.set_products(sample());
        assert_eq!(catalog.error(), None);
    }

    #[test]
    fn test_view_snapshot() {
        let mut catalog = ProductCatalog::new(3).unwrap();
        catalog.set_products(sample());
        catalog.set_sort(SortKey::PriceLow);
        catalog.set_view_mode(ViewMode::List);

        let view = catalog.view();
        assert_eq!(view.filtered_count, 4);
        assert_eq!(view.page.total_pages, 2);
        assert_eq!(ids(&view.items), vec![2, 3, 1]);
        assert_eq!(view.brands, vec!["Lumen", "Orchard"]);
        assert_eq!(catalog.view_mode(), ViewMode::List);
    }
}
