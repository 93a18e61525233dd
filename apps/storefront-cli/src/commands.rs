//! Command handlers.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use storefront_core::catalog::CatalogView;
use storefront_core::format::{
    detect_card_type, format_card_number, format_cvv, format_expiry_date, format_phone_number,
    format_zip_code,
};
use storefront_core::rules::{credit_card_form, CARD_FIELDS};
use storefront_core::{Product, ProductCatalog};
use storefront_session::{LoginCredentials, Services, StorefrontConfig, StorefrontContext};
use tracing::{info, warn};

use crate::cli::{BrowseArgs, CardArgs, FormatKind};

// =============================================================================
// Browse
// =============================================================================

pub async fn run_browse(config: StorefrontConfig, args: &BrowseArgs) -> Result<()> {
    let per_page = args.per_page.unwrap_or(config.catalog.items_per_page);

    match &args.file {
        Some(path) => {
            let mut catalog = ProductCatalog::new(per_page)?;
            catalog.set_products(read_products(path)?);
            apply_filters(&mut catalog, args);
            print_view(&catalog.view(), args.json)
        }
        None => {
            let ctx = context(config)?;
            ctx.with_catalog(|catalog| {
                catalog.set_items_per_page(per_page)?;
                if let Some(category) = &args.category {
                    catalog.set_category(category.as_str());
                }
                Ok::<_, storefront_core::CoreError>(())
            })?;

            ctx.load_catalog()
                .await
                .context("Failed to load products")?;

            let result = ctx.with_catalog(|catalog| {
                apply_filters(catalog, args);
                print_view(&catalog.view(), args.json)
            });
            ctx.shutdown();
            result
        }
    }
}

fn read_products(path: &Path) -> Result<Vec<Product>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let products =
        parse_products(&raw).with_context(|| format!("Bad product file {}", path.display()))?;

    info!(count = products.len(), path = %path.display(), "Products read from file");
    Ok(products)
}

/// Accepts either a bare product array or a `{ "products": [...] }` page.
fn parse_products(raw: &str) -> Result<Vec<Product>> {
    let value: serde_json::Value = serde_json::from_str(raw).context("Not valid JSON")?;

    let list = match value {
        serde_json::Value::Object(mut page) if page.contains_key("products") => page
            .remove("products")
            .unwrap_or(serde_json::Value::Array(Vec::new())),
        other => other,
    };
    serde_json::from_value(list).context("Unexpected product list shape")
}

fn apply_filters(catalog: &mut ProductCatalog, args: &BrowseArgs) {
    if !args.brands.is_empty() {
        catalog.set_brands(args.brands.iter().map(String::as_str));
    }
    if let Some(rating) = args.min_rating {
        catalog.set_min_rating(rating);
    }
    if args.min_price.is_some() || args.max_price.is_some() {
        let range = catalog.price_range();
        let corrected = catalog.update_price_range(
            args.min_price.unwrap_or(range.min),
            args.max_price.unwrap_or(range.max),
        );
        if corrected.swapped {
            eprintln!(
                "warning: min and max price were swapped to {}..{}",
                corrected.min_price, corrected.max_price
            );
        }
    }
    if let Some(sort) = args.sort {
        catalog.set_sort(sort.into());
    }
    catalog.set_page(args.page);
}

fn print_view(view: &CatalogView<'_>, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(view)?);
        return Ok(());
    }

    for product in &view.items {
        let brand = if product.has_brand() {
            product.brand.as_str()
        } else {
            "-"
        };
        println!(
            "{:>5}  {:<40}  {:<16}  {:>9.2}  {:>4.1}",
            product.id, product.title, brand, product.price, product.rating
        );
    }

    if view.items.is_empty() {
        println!("No products on this page.");
    }
    println!(
        "\nPage {} of {} ({} matching, prices {}..{})",
        view.page.page,
        view.page.total_pages,
        view.filtered_count,
        view.price_range.min,
        view.price_range.max
    );
    if !view.brands.is_empty() {
        println!("Brands: {}", view.brands.join(", "));
    }
    Ok(())
}

// =============================================================================
// Checkout Forms
// =============================================================================

/// Returns whether the card passed validation.
pub fn run_card(args: &CardArgs) -> Result<bool> {
    let number = format_card_number(&args.number);
    let expiry = format_expiry_date(&args.expiry);
    let cvv = format_cvv(&args.cvv);

    let mut form = credit_card_form();
    form.set_form_data([
        ("card_number", number.clone()),
        ("expiry_date", expiry.clone()),
        ("cvv", cvv),
        ("card_name", args.name.clone()),
    ])?;

    let valid = form.validate_all_fields();

    match detect_card_type(&number) {
        Some(card_type) => println!("Card:   {number} ({card_type})"),
        None => println!("Card:   {number}"),
    }
    println!("Expiry: {expiry}");

    for field in CARD_FIELDS {
        if form.has_field_error(field) {
            println!("  {field}: {}", form.field_error(field));
        }
    }

    if valid {
        println!("Card details are valid.");
    } else {
        warn!("Card form rejected");
    }
    Ok(valid)
}

pub fn run_format(kind: FormatKind, value: &str) {
    let formatted = match kind {
        FormatKind::Card => format_card_number(value),
        FormatKind::Expiry => format_expiry_date(value),
        FormatKind::Cvv => format_cvv(value),
        FormatKind::Zip => format_zip_code(value),
        FormatKind::Phone => format_phone_number(value),
    };
    println!("{formatted}");
}

// =============================================================================
// Session
// =============================================================================

fn context(config: StorefrontConfig) -> Result<StorefrontContext> {
    let services = Services::http(&config).context("Failed to set up HTTP client")?;
    Ok(StorefrontContext::new(config, services)?)
}

pub async fn run_login(config: StorefrontConfig, username: &str, password: &str) -> Result<()> {
    let ctx = context(config)?;
    let response = ctx
        .auth()
        .login(&LoginCredentials::new(username, password))
        .await?;

    println!(
        "Signed in as {} ({})",
        response.user.full_name(),
        response.user.username
    );
    Ok(())
}

pub async fn run_whoami(config: StorefrontConfig) -> Result<()> {
    let ctx = context(config)?;
    match ctx.auth().init_auth().await {
        Some(user) => println!("{} <{}> [{}]", user.full_name(), user.email, user.initials()),
        None => println!("Not signed in."),
    }
    Ok(())
}

pub async fn run_logout(config: StorefrontConfig) -> Result<()> {
    let ctx = context(config)?;
    ctx.auth().logout().await;
    println!("Signed out.");
    Ok(())
}
