//! # Input Formatting
//!
//! Cosmetic normalisation for payment and contact fields.
//!
//! ## Where Formatting Sits
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Checkout Input Pipeline                              │
//! │                                                                         │
//! │  Keystroke "4111-1111 11"                                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  format_card_number() ← THIS MODULE (cosmetic, never fails)            │
//! │       │  "4111 1111 11"                                                 │
//! │       ▼                                                                 │
//! │  FormValidator::set_field_value()                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  rules::credit_card() (correctness, see `rules`)                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every function accepts arbitrary text. Garbage in gives stripped text out;
//! length limits belong to the validation rules, not here.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Longest digit run the card formatter will group.
const MAX_CARD_DIGITS: usize = 16;

/// Shortest digit run the card formatter will group.
const MIN_CARD_DIGITS: usize = 4;

fn digits_only(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

// =============================================================================
// Field Formatters
// =============================================================================

/// Groups a card number into blocks of four.
///
/// Only the first 16 digits are grouped. Fewer than four digits come back
/// stripped but ungrouped.
///
/// ## Example
/// ```rust
/// use storefront_core::format::format_card_number;
///
/// assert_eq!(format_card_number("4111 1111-1111!!1111"), "4111 1111 1111 1111");
/// assert_eq!(format_card_number("41a"), "41");
/// ```
pub fn format_card_number(value: &str) -> String {
    let digits = digits_only(value);
    if digits.len() < MIN_CARD_DIGITS {
        return digits;
    }

    let run: Vec<char> = digits.chars().take(MAX_CARD_DIGITS).collect();
    run.chunks(4)
        .map(|block| block.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Shapes expiry input as `MM/YY`.
///
/// ## Example
/// ```rust
/// use storefront_core::format::format_expiry_date;
///
/// assert_eq!(format_expiry_date("1225"), "12/25");
/// assert_eq!(format_expiry_date("12"), "12/");
/// assert_eq!(format_expiry_date("1"), "1");
/// ```
pub fn format_expiry_date(value: &str) -> String {
    let digits = digits_only(value);
    if digits.len() < 2 {
        return digits;
    }

    let year_end = digits.len().min(4);
    format!("{}/{}", &digits[..2], &digits[2..year_end])
}

/// Keeps at most four digits.
pub fn format_cvv(value: &str) -> String {
    digits_only(value).chars().take(4).collect()
}

/// Keeps digits and hyphens.
pub fn format_zip_code(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '-')
        .collect()
}

/// Shapes a US phone number as `(AAA) BBB-CCCC`.
///
/// ## Progressive Formatting
/// ```text
/// digits typed   output
/// ────────────   ──────────────
/// "55"           "55"
/// "5551"         "(555) 1"
/// "555123"       "(555) 123-"
/// "5551234567"   "(555) 123-4567"
/// ```
pub fn format_phone_number(value: &str) -> String {
    let digits = digits_only(value);
    let len = digits.len();

    if len >= 6 {
        format!(
            "({}) {}-{}",
            &digits[..3],
            &digits[3..6],
            &digits[6..len.min(10)]
        )
    } else if len >= 3 {
        format!("({}) {}", &digits[..3], &digits[3..])
    } else {
        digits
    }
}

// =============================================================================
// Card Type Detection
// =============================================================================

/// Card network detected from a number's leading digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum CardType {
    Visa,
    Mastercard,
    Amex,
    Discover,
    Jcb,
    Diners,
}

impl CardType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CardType::Visa => "visa",
            CardType::Mastercard => "mastercard",
            CardType::Amex => "amex",
            CardType::Discover => "discover",
            CardType::Jcb => "jcb",
            CardType::Diners => "diners",
        }
    }
}

impl fmt::Display for CardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Prefix table, checked top to bottom.
///
/// The mastercard `2[2-7]` and diners `3(0[0-5]|[68])` entries are the
/// storefront's historical approximations of the BIN ranges. Keep the order:
/// `35` numbers must reach the JCB row only after amex has been ruled out.
static CARD_PREFIXES: LazyLock<Vec<(Regex, CardType)>> = LazyLock::new(|| {
    [
        (r"^4", CardType::Visa),
        (r"^5[1-5]", CardType::Mastercard),
        (r"^2[2-7]", CardType::Mastercard),
        (r"^3[47]", CardType::Amex),
        (r"^6(?:011|5)", CardType::Discover),
        (r"^35(?:2[89]|[3-8][0-9])", CardType::Jcb),
        (r"^3(?:0[0-5]|[68][0-9])", CardType::Diners),
    ]
    .into_iter()
    .map(|(pattern, card)| (Regex::new(pattern).expect("invalid card prefix regex"), card))
    .collect()
});

/// Detects the card network for a (possibly spaced) card number.
///
/// ## Example
/// ```rust
/// use storefront_core::format::{detect_card_type, CardType};
///
/// assert_eq!(detect_card_type("4111 1111 1111 1111"), Some(CardType::Visa));
/// assert_eq!(detect_card_type("9999"), None);
/// ```
pub fn detect_card_type(card_number: &str) -> Option<CardType> {
    let number: String = card_number.chars().filter(|c| !c.is_whitespace()).collect();

    CARD_PREFIXES
        .iter()
        .find(|(prefix, _)| prefix.is_match(&number))
        .map(|(_, card)| *card)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_card_number() {
        assert_eq!(format_card_number("4111 1111-1111!!1111"), "4111 1111 1111 1111");
        assert_eq!(format_card_number("411111"), "4111 11");
        assert_eq!(format_card_number("123"), "123");
        assert_eq!(format_card_number(""), "");
        // Digits past the sixteenth are dropped
        assert_eq!(
            format_card_number("12345678901234567890"),
            "1234 5678 9012 3456"
        );
    }

    #[test]
    fn test_format_expiry_date() {
        assert_eq!(format_expiry_date("1225"), "12/25");
        assert_eq!(format_expiry_date("1"), "1");
        assert_eq!(format_expiry_date("12"), "12/");
        assert_eq!(format_expiry_date("12/2"), "12/2");
        assert_eq!(format_expiry_date("122599"), "12/25");
    }

    #[test]
    fn test_format_cvv() {
        assert_eq!(format_cvv("12a3"), "123");
        assert_eq!(format_cvv("123456"), "1234");
    }

    #[test]
    fn test_format_zip_code() {
        assert_eq!(format_zip_code("12345-6789"), "12345-6789");
        assert_eq!(format_zip_code("ab 123-45x"), "123-45");
    }

    #[test]
    fn test_format_phone_number() {
        assert_eq!(format_phone_number("5551234567"), "(555) 123-4567");
        assert_eq!(format_phone_number("555-123-4567 ext 89"), "(555) 123-4567");
        assert_eq!(format_phone_number("5551"), "(555) 1");
        assert_eq!(format_phone_number("555"), "(555) ");
        assert_eq!(format_phone_number("555123"), "(555) 123-");
        assert_eq!(format_phone_number("55"), "55");
    }

    #[test]
    fn test_detect_card_type() {
        assert_eq!(detect_card_type("4532015112830366"), Some(CardType::Visa));
        assert_eq!(detect_card_type("5500 0000 0000 0004"), Some(CardType::Mastercard));
        assert_eq!(detect_card_type("2221000000000009"), Some(CardType::Mastercard));
        assert_eq!(detect_card_type("378282246310005"), Some(CardType::Amex));
        assert_eq!(detect_card_type("6011111111111117"), Some(CardType::Discover));
        assert_eq!(detect_card_type("6500000000000002"), Some(CardType::Discover));
        assert_eq!(detect_card_type("3530111333300000"), Some(CardType::Jcb));
        assert_eq!(detect_card_type("30569309025904"), Some(CardType::Diners));
        assert_eq!(detect_card_type("38520000023237"), Some(CardType::Diners));
        assert_eq!(detect_card_type("1234"), None);
        assert_eq!(detect_card_type(""), None);
    }

    #[test]
    fn test_approximated_ranges_are_preserved() {
        // 28xx is outside the approximated mastercard range
        assert_eq!(detect_card_type("2800000000000000"), None);
        // 3527 is not JCB under the prefix table
        assert_eq!(detect_card_type("3527000000000000"), None);
        // 3095 is not diners under the prefix table
        assert_eq!(detect_card_type("3095000000000000"), None);
    }
}
