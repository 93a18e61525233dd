//! # Rule Library
//!
//! Reusable [`Rule`] factories and the two checkout rule sets.
//!
//! ## Empty-Value Policy
//! ```text
//! ┌──────────────┬───────────────────────┬─────────────────────────────────┐
//! │ Rule         │ Empty value           │ Non-empty value                 │
//! ├──────────────┼───────────────────────┼─────────────────────────────────┤
//! │ required     │ FAIL                  │ text must be non-blank          │
//! │ email        │ pass                  │ local@domain.tld                │
//! │ min_length   │ pass                  │ trimmed length >= n             │
//! │ max_length   │ pass                  │ trimmed length <= n             │
//! │ pattern      │ pass                  │ trimmed text matches            │
//! │ zip_code     │ FAIL                  │ 12345 or 12345-6789             │
//! │ credit_card  │ FAIL                  │ 13-19 digits + Luhn             │
//! │ expiry_date  │ FAIL                  │ MM/YY, not before this month    │
//! │ cvv          │ FAIL                  │ 3 or 4 digits                   │
//! └──────────────┴───────────────────────┴─────────────────────────────────┘
//! ```
//!
//! Optional-format rules pass on empty input so they can be stacked after
//! [`required`] without producing two messages for one blank field.

use std::sync::LazyLock;

use chrono::{Datelike, Local, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::validation::{FieldValue, FormValidator, Rule, RuleSet};

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("invalid email regex"));

static ZIP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{5}(-[0-9]{4})?$").expect("invalid zip regex"));

static CVV_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{3,4}$").expect("invalid cvv regex"));

const MIN_CARD_LEN: usize = 13;
const MAX_CARD_LEN: usize = 19;

// =============================================================================
// Rule Factories
// =============================================================================

/// Value must be present. Text must be non-blank after trimming; numbers must
/// not be NaN.
pub fn required() -> Rule {
    Rule::new("This field is required", |value| match value {
        FieldValue::Null => false,
        FieldValue::Text(text) => !text.trim().is_empty(),
        FieldValue::Integer(_) => true,
        FieldValue::Number(n) => !n.is_nan(),
        FieldValue::Bool(_) => true,
    })
}

pub fn email() -> Rule {
    Rule::new("Please enter a valid email address", |value| {
        value.is_empty() || EMAIL_RE.is_match(value.to_text().trim())
    })
}

pub fn min_length(len: usize) -> Rule {
    Rule::new(format!("Must be at least {len} characters"), move |value| {
        value.is_empty() || value.to_text().trim().chars().count() >= len
    })
}

pub fn max_length(len: usize) -> Rule {
    Rule::new(format!("Must be no more than {len} characters"), move |value| {
        value.is_empty() || value.to_text().trim().chars().count() <= len
    })
}

/// Trimmed value must match `pattern`.
///
/// ## Example
/// ```rust
/// use storefront_core::rules::pattern;
///
/// let rule = pattern(r"^[A-Z]{2}$", "Use a two-letter state code").unwrap();
/// assert!(rule.check(&"CA".into()));
/// assert!(!rule.check(&"Cal".into()));
/// assert!(pattern(r"([", "broken").is_err());
/// ```
pub fn pattern(pattern: &str, message: impl Into<String>) -> CoreResult<Rule> {
    let regex = Regex::new(pattern).map_err(|e| CoreError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })?;
    Ok(pattern_regex(regex, message))
}

/// Like [`pattern`] for an already compiled expression.
pub fn pattern_regex(regex: Regex, message: impl Into<String>) -> Rule {
    Rule::new(message, move |value| {
        value.is_empty() || regex.is_match(value.to_text().trim())
    })
}

pub fn zip_code() -> Rule {
    Rule::new(
        "Please enter a valid ZIP code (12345 or 12345-6789)",
        |value| !value.is_empty() && ZIP_RE.is_match(value.to_text().trim()),
    )
}

pub fn credit_card() -> Rule {
    Rule::new("Please enter a valid card number", |value| {
        !value.is_empty() && is_valid_card_number(&value.to_text())
    })
}

/// Expiry check against the local calendar date at evaluation time.
pub fn expiry_date() -> Rule {
    Rule::new("Please enter a valid expiry date (MM/YY)", |value| {
        !value.is_empty() && is_valid_expiry(&value.to_text(), Local::now().date_naive())
    })
}

/// Expiry check pinned to `today`.
pub fn expiry_date_as_of(today: NaiveDate) -> Rule {
    Rule::new("Please enter a valid expiry date (MM/YY)", move |value| {
        !value.is_empty() && is_valid_expiry(&value.to_text(), today)
    })
}

pub fn cvv() -> Rule {
    Rule::new("Please enter a valid CVV", |value| {
        !value.is_empty() && CVV_RE.is_match(value.to_text().trim())
    })
}

// =============================================================================
// Checks
// =============================================================================

/// Mod-10 checksum over a digit string.
///
/// Every second digit from the right is doubled, with 9 subtracted when the
/// product exceeds 9. Returns false for empty or non-digit input.
///
/// ## Example
/// ```rust
/// use storefront_core::rules::luhn_check;
///
/// assert!(luhn_check("4532015112830366"));
/// assert!(!luhn_check("4532015112830367"));
/// ```
pub fn luhn_check(digits: &str) -> bool {
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }

    let sum: u32 = digits
        .chars()
        .rev()
        .filter_map(|c| c.to_digit(10))
        .enumerate()
        .map(|(i, digit)| {
            if i % 2 == 1 {
                let doubled = digit * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            } else {
                digit
            }
        })
        .sum();

    sum % 10 == 0
}

/// Whitespace-insensitive card number check: 13-19 digits passing Luhn.
pub fn is_valid_card_number(value: &str) -> bool {
    let number: String = value.chars().filter(|c| !c.is_whitespace()).collect();
    (MIN_CARD_LEN..=MAX_CARD_LEN).contains(&number.len()) && luhn_check(&number)
}

/// Checks an `MM/YY` expiry against `today`.
///
/// The current month still counts as valid.
pub fn is_valid_expiry(value: &str, today: NaiveDate) -> bool {
    let Some((month, year)) = value.split_once('/') else {
        return false;
    };
    let two_digits = |part: &str| part.len() == 2 && part.chars().all(|c| c.is_ascii_digit());
    if !two_digits(month) || !two_digits(year) {
        return false;
    }

    let (Ok(month), Ok(year)) = (month.parse::<u32>(), year.parse::<i32>()) else {
        return false;
    };
    if !(1..=12).contains(&month) {
        return false;
    }

    let year = 2000 + year;
    year > today.year() || (year == today.year() && month >= today.month())
}

// =============================================================================
// Form Presets
// =============================================================================

/// Field keys of the shipping/billing address form.
pub const ADDRESS_FIELDS: [&str; 6] = [
    "first_name",
    "last_name",
    "address",
    "city",
    "state",
    "zip_code",
];

/// Field keys of the card payment form.
pub const CARD_FIELDS: [&str; 4] = ["card_number", "expiry_date", "cvv", "card_name"];

pub fn address_rules() -> RuleSet {
    RuleSet::new()
        .field("first_name", vec![required().with_message("First name is required")])
        .field("last_name", vec![required().with_message("Last name is required")])
        .field("address", vec![required().with_message("Street address is required")])
        .field("city", vec![required().with_message("City is required")])
        .field("state", vec![required().with_message("State is required")])
        .field(
            "zip_code",
            vec![required().with_message("ZIP code is required"), zip_code()],
        )
}

pub fn credit_card_rules() -> RuleSet {
    RuleSet::new()
        .field(
            "card_number",
            vec![required().with_message("Card number is required"), credit_card()],
        )
        .field(
            "expiry_date",
            vec![required().with_message("Expiry date is required"), expiry_date()],
        )
        .field("cvv", vec![required().with_message("CVV is required"), cvv()])
        .field("card_name", vec![required().with_message("Name on card is required")])
}

/// Empty address form wired to [`address_rules`].
pub fn address_form() -> FormValidator {
    FormValidator::with_empty_fields(&ADDRESS_FIELDS, address_rules())
}

/// Empty card form wired to [`credit_card_rules`].
pub fn credit_card_form() -> FormValidator {
    FormValidator::with_empty_fields(&CARD_FIELDS, credit_card_rules())
}

/// Typed view of [`address_form`] data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressForm {
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
}

/// Typed view of [`credit_card_form`] data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardForm {
    pub card_number: String,
    pub expiry_date: String,
    pub cvv: String,
    pub card_name: String,
}

// =============================================================================
// Unit Tests
// =============================================================================
