//! # Validation Module
//!
//! Rule-chain form engine for checkout and account forms.
//!
//! ## Validation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Form Validation Flow                               │
//! │                                                                         │
//! │  set_field_value("zip_code", "1234")                                   │
//! │           │   (value stored, nothing evaluated)                         │
//! │           ▼                                                             │
//! │  validate_field("zip_code")                                            │
//! │  ├── touched["zip_code"] = true                                        │
//! │  ├── rule 1: required  ✓                                               │
//! │  └── rule 2: zip_code  ✗ ──► errors["zip_code"] = "Please enter..."    │
//! │           │                  (first failing rule wins, rest skipped)    │
//! │           ▼                                                             │
//! │  has_field_error("zip_code") == touched && error != ""                  │
//! │                                                                         │
//! │  is_form_valid()  (derived, never stored)                              │
//! │  ├── no stored error is non-empty                                      │
//! │  └── every field with rules holds a non-null, non-"" value             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `is_form_valid` is NOT the same as "every field passed validation". A form
//! whose ruled fields all hold values counts as valid before any field has
//! been validated. Callers that need the strict answer run
//! [`FormValidator::validate_all_fields`] first.
//!
//! ## Usage
//! ```rust
//! use storefront_core::rules;
//! use storefront_core::validation::{FormValidator, RuleSet};
//!
//! let rules = RuleSet::new().field("email", vec![rules::required(), rules::email()]);
//! let mut form = FormValidator::with_empty_fields(&["email"], rules);
//!
//! assert!(!form.validate_field("email"));
//! assert_eq!(form.field_error("email"), "This field is required");
//!
//! form.set_field_value("email", "ada@example.com").unwrap();
//! assert!(form.validate_field("email"));
//! assert!(form.is_form_valid());
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};

// =============================================================================
// Field Values
// =============================================================================

/// A single form value.
///
/// Serializes untagged, so `{"zip_code": "12345", "qty": 2, "gift": false}`
/// maps straight onto form data. Whole numbers stay [`FieldValue::Integer`]
/// so typed records with integer fields read back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(untagged)]
#[ts(export)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Integer(i64),
    Number(f64),
    Text(String),
}

impl FieldValue {
    /// Returns true for the values a rule treats as "nothing entered":
    /// null, empty text, `false`, zero and NaN.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Null => true,
            FieldValue::Bool(b) => !b,
            FieldValue::Integer(n) => *n == 0,
            FieldValue::Number(n) => *n == 0.0 || n.is_nan(),
            FieldValue::Text(s) => s.is_empty(),
        }
    }

    /// Returns true unless the value is null or the empty string.
    ///
    /// This is the looser check the form-level validity uses; `0` and `false`
    /// count as present here.
    pub fn is_present(&self) -> bool {
        !matches!(self, FieldValue::Null) && self.as_text() != Some("")
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Text rendering used by string-shaped rules.
    pub fn to_text(&self) -> String {
        match self {
            FieldValue::Null => String::new(),
            FieldValue::Bool(b) => b.to_string(),
            FieldValue::Integer(n) => n.to_string(),
            FieldValue::Number(n) => n.to_string(),
            FieldValue::Text(s) => s.clone(),
        }
    }
}

impl Default for FieldValue {
    fn default() -> Self {
        FieldValue::Text(String::new())
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        FieldValue::Integer(i64::from(value))
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FieldValue::Null, Into::into)
    }
}

// =============================================================================
// Rules
// =============================================================================

type Predicate = dyn Fn(&FieldValue) -> bool + Send + Sync;

/// A predicate over one field value paired with its failure message.
#[derive(Clone)]
pub struct Rule {
    predicate: Arc<Predicate>,
    message: String,
}

impl Rule {
    pub fn new<F>(message: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&FieldValue) -> bool + Send + Sync + 'static,
    {
        Rule {
            predicate: Arc::new(predicate),
            message: message.into(),
        }
    }

    /// Same predicate, different message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn check(&self, value: &FieldValue) -> bool {
        (self.predicate)(value)
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule").field("message", &self.message).finish()
    }
}

/// Ordered rule chains keyed by field name.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    fields: BTreeMap<String, Vec<Rule>>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`RuleSet::insert`].
    pub fn field(mut self, name: impl Into<String>, rules: Vec<Rule>) -> Self {
        self.insert(name, rules);
        self
    }

    /// Replaces the chain for `name`.
    pub fn insert(&mut self, name: impl Into<String>, rules: Vec<Rule>) {
        self.fields.insert(name.into(), rules);
    }

    /// The chain for `name`, empty when none is registered.
    pub fn rules_for(&self, name: &str) -> &[Rule] {
        self.fields.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_rules(&self, name: &str) -> bool {
        !self.rules_for(name).is_empty()
    }
}

// =============================================================================
// Form State
// =============================================================================

/// Snapshot of a form's values, stored errors and touched flags.
///
/// An empty error string means "validated and passing"; a missing entry means
/// "never validated".
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FormState {
    pub data: BTreeMap<String, FieldValue>,
    pub errors: BTreeMap<String, String>,
    pub touched: BTreeMap<String, bool>,
}

// =============================================================================
// Form Validator
// =============================================================================

/// A form with a fixed key set, its rules and its initial snapshot.
#[derive(Debug, Clone)]
pub struct FormValidator {
    initial: BTreeMap<String, FieldValue>,
    state: FormState,
    rules: RuleSet,
}

impl FormValidator {
    /// Creates a form whose key set is exactly the keys of `initial`.
    pub fn new(initial: BTreeMap<String, FieldValue>, rules: RuleSet) -> Self {
        FormValidator {
            state: FormState {
                data: initial.clone(),
                ..FormState::default()
            },
            initial,
            rules,
        }
    }

    /// Creates a form with every listed field set to the empty string.
    pub fn with_empty_fields(names: &[&str], rules: RuleSet) -> Self {
        let initial = names
            .iter()
            .map(|name| (name.to_string(), FieldValue::default()))
            .collect();
        Self::new(initial, rules)
    }

    /// Creates a form from a flat serializable record.
    ///
    /// Fails with [`CoreError::FormData`] if the record is not a JSON object of
    /// scalar values.
    pub fn from_record<T: Serialize>(record: &T, rules: RuleSet) -> CoreResult<Self> {
        let value = serde_json::to_value(record)?;
        let initial: BTreeMap<String, FieldValue> = serde_json::from_value(value)?;
        Ok(Self::new(initial, rules))
    }

    // -------------------------------------------------------------------------
    // Evaluation
    // -------------------------------------------------------------------------

    /// Runs the chain for one field and records the outcome.
    ///
    /// Marks the field touched either way. Unknown names are evaluated as
    /// [`FieldValue::Null`].
    pub fn validate_field(&mut self, name: &str) -> bool {
        let value = self.state.data.get(name).cloned().unwrap_or(FieldValue::Null);
        self.state.touched.insert(name.to_string(), true);

        let failed = self
            .rules
            .rules_for(name)
            .iter()
            .find(|rule| !rule.check(&value));

        match failed {
            Some(rule) => {
                debug!(field = name, message = rule.message(), "Field failed validation");
                self.state
                    .errors
                    .insert(name.to_string(), rule.message().to_string());
                false
            }
            None => {
                self.state.errors.insert(name.to_string(), String::new());
                true
            }
        }
    }

    /// Validates every field in the form, including fields without rules.
    ///
    /// Does not stop at the first failure, so every field ends up touched.
    pub fn validate_all_fields(&mut self) -> bool {
        let names: Vec<String> = self.state.data.keys().cloned().collect();
        names
            .iter()
            .fold(true, |valid, name| self.validate_field(name) && valid)
    }

    /// Derived validity used as the submit gate.
    pub fn is_form_valid(&self) -> bool {
        let no_errors = self.state.errors.values().all(String::is_empty);
        let ruled_fields_filled = self
            .state
            .data
            .iter()
            .filter(|(name, _)| self.rules.has_rules(name))
            .all(|(_, value)| value.is_present());

        no_errors && ruled_fields_filled
    }

    // -------------------------------------------------------------------------
    // Reset
    // -------------------------------------------------------------------------

    /// Clears one field's error and touched flag, keeping its value.
    pub fn reset_field(&mut self, name: &str) {
        self.state.errors.insert(name.to_string(), String::new());
        self.state.touched.insert(name.to_string(), false);
    }

    /// Restores the initial snapshot and clears every error and touched flag.
    pub fn reset_form(&mut self) {
        self.state.data = self.initial.clone();
        self.state.errors.clear();
        self.state.touched.clear();
        for name in self.initial.keys() {
            self.state.errors.insert(name.clone(), String::new());
            self.state.touched.insert(name.clone(), false);
        }
    }

    // -------------------------------------------------------------------------
    // Mutation
    // -------------------------------------------------------------------------

    /// Stores a value without validating it.
    pub fn set_field_value(
        &mut self,
        name: &str,
        value: impl Into<FieldValue>,
    ) -> CoreResult<()> {
        let slot = self
            .state
            .data
            .get_mut(name)
            .ok_or_else(|| CoreError::UnknownField {
                field: name.to_string(),
            })?;
        *slot = value.into();
        Ok(())
    }

    /// Stores several values at once.
    ///
    /// All-or-nothing: if any key is unknown, nothing is applied.
    pub fn set_form_data<I, K, V>(&mut self, partial: I) -> CoreResult<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<FieldValue>,
    {
        let updates: Vec<(String, FieldValue)> = partial
            .into_iter()
            .map(|(name, value)| (name.into(), value.into()))
            .collect();

        if let Some((unknown, _)) = updates
            .iter()
            .find(|(name, _)| !self.state.data.contains_key(name))
        {
            return Err(CoreError::UnknownField {
                field: unknown.clone(),
            });
        }

        self.state.data.extend(updates);
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// True only when the field is touched AND holds a non-empty error.
    pub fn has_field_error(&self, name: &str) -> bool {
        self.is_touched(name)
            && self
                .state
                .errors
                .get(name)
                .is_some_and(|error| !error.is_empty())
    }

    /// The visible error message, or `""` when none should be shown.
    pub fn field_error(&self, name: &str) -> &str {
        if self.has_field_error(name) {
            self.state.errors.get(name).map(String::as_str).unwrap_or("")
        } else {
            ""
        }
    }

    pub fn is_touched(&self, name: &str) -> bool {
        self.state.touched.get(name).copied().unwrap_or(false)
    }

    pub fn value(&self, name: &str) -> Option<&FieldValue> {
        self.state.data.get(name)
    }

    pub fn data(&self) -> &BTreeMap<String, FieldValue> {
        &self.state.data
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Reads the current values back as a typed record.
    pub fn form_data<T: DeserializeOwned>(&self) -> CoreResult<T> {
        let value = serde_json::to_value(&self.state.data)?;
        Ok(serde_json::from_value(value)?)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn non_empty(message: &str) -> Rule {
        Rule::new(message, |value| !value.is_empty())
    }

    fn min_len(len: usize, message: &str) -> Rule {
        Rule::new(message, move |value| value.to_text().trim().chars().count() >= len)
    }

    fn sample_form() -> FormValidator {
        let rules = RuleSet::new()
            .field("name", vec![non_empty("Name is required"), min_len(3, "Too short")])
            .field("city", vec![non_empty("City is required")]);
        FormValidator::with_empty_fields(&["name", "city", "notes"], rules)
    }

    #[test]
    fn test_first_failing_rule_wins() {
        let mut form = sample_form();
        assert!(!form.validate_field("name"));
        assert_eq!(form.field_error("name"), "Name is required");

        form.set_field_value("name", "Al").unwrap();
        assert!(!form.validate_field("name"));
        assert_eq!(form.field_error("name"), "Too short");

        form.set_field_value("name", "Alan").unwrap();
        assert!(form.validate_field("name"));
        assert_eq!(form.state().errors.get("name").map(String::as_str), Some(""));
    }

    #[test]
    fn test_untouched_fields_hide_errors() {
        let mut form = sample_form();
        assert!(!form.has_field_error("city"));
        assert_eq!(form.field_error("city"), "");

        form.validate_field("city");
        assert!(form.has_field_error("city"));
        assert!(form.is_touched("city"));

        form.reset_field("city");
        assert!(!form.has_field_error("city"));
        assert!(!form.is_touched("city"));
    }

    #[test]
    fn test_validate_all_fields_touches_everything() {
        let mut form = sample_form();
        assert!(!form.validate_all_fields());
        assert!(form.is_touched("name"));
        assert!(form.is_touched("city"));
        // Fields without rules trivially pass but are still touched
        assert!(form.is_touched("notes"));
        assert!(!form.has_field_error("notes"));
    }

    #[test]
    fn test_form_valid_without_explicit_validation() {
        let mut form = sample_form();
        assert!(!form.is_form_valid());

        form.set_form_data([("name", "Al"), ("city", "Oslo")]).unwrap();
        // "Al" would fail min_len, but validity only looks at stored errors
        assert!(form.is_form_valid());

        form.validate_field("name");
        assert!(!form.is_form_valid());
    }

    #[test]
    fn test_unknown_field_validates_as_null() {
        let rules = RuleSet::new().field("ghost", vec![non_empty("Ghost is required")]);
        let mut form = FormValidator::with_empty_fields(&["name"], rules);

        assert!(!form.validate_field("ghost"));
        assert!(form.has_field_error("ghost"));
        assert!(form.value("ghost").is_none());
    }

    #[test]
    fn test_set_field_value_rejects_unknown_key() {
        let mut form = sample_form();
        let err = form.set_field_value("nickname", "x").unwrap_err();
        assert!(matches!(err, CoreError::UnknownField { field } if field == "nickname"));
    }

    #[test]
    fn test_set_form_data_is_atomic() {
        let mut form = sample_form();
        let result = form.set_form_data([("name", "Alan"), ("nickname", "Al")]);

        assert!(result.is_err());
        assert_eq!(form.value("name"), Some(&FieldValue::default()));
    }

    #[test]
    fn test_reset_form_restores_initial_snapshot() {
        let mut initial = BTreeMap::new();
        initial.insert("name".to_string(), FieldValue::from("Ada"));
        initial.insert("city".to_string(), FieldValue::from(""));
        let rules = RuleSet::new().field("city", vec![non_empty("City is required")]);
        let mut form = FormValidator::new(initial.clone(), rules);

        form.set_field_value("name", "Grace").unwrap();
        form.validate_all_fields();
        form.set_field_value("city", "Paris").unwrap();

        form.reset_form();
        assert_eq!(form.data(), &initial);
        assert!(form.state().errors.values().all(String::is_empty));
        assert!(form.state().touched.values().all(|touched| !touched));
    }

    #[test]
    fn test_form_data_typed_getter() {
        #[derive(Debug, Deserialize, Serialize, PartialEq)]
        struct Contact {
            name: String,
            city: String,
            notes: String,
        }

        let mut form = sample_form();
        form.set_form_data([("name", "Ada"), ("city", "London")]).unwrap();

        let contact: Contact = form.form_data().unwrap();
        assert_eq!(contact.name, "Ada");
        assert_eq!(contact.city, "London");
        assert_eq!(contact.notes, "");

        let rebuilt = FormValidator::from_record(&contact, RuleSet::new()).unwrap();
        assert_eq!(rebuilt.value("city"), Some(&FieldValue::from("London")));
    }

    #[test]
    fn test_form_data_keeps_integer_fields() {
        #[derive(Debug, Deserialize, Serialize, PartialEq)]
        struct Order {
            name: String,
            quantity: u32,
            weight: f64,
        }

        let order = Order {
            name: "Ada".into(),
            quantity: 2,
            weight: 1.5,
        };
        let mut form = FormValidator::from_record(&order, RuleSet::new()).unwrap();
        assert_eq!(form.value("quantity"), Some(&FieldValue::Integer(2)));
        assert_eq!(form.form_data::<Order>().unwrap(), order);

        form.set_field_value("quantity", 5u32).unwrap();
        assert_eq!(form.form_data::<Order>().unwrap().quantity, 5);
    }

    #[test]
    fn test_form_data_shape_mismatch() {
        #[derive(Debug, Deserialize)]
        #[allow(dead_code)]
        struct Quantity {
            name: u32,
        }

        let form = sample_form();
        let err = form.form_data::<Quantity>().unwrap_err();
        assert!(matches!(err, CoreError::FormData(_)));
    }

    #[test]
    fn test_field_value_emptiness() {
        assert!(FieldValue::Null.is_empty());
        assert!(FieldValue::from("").is_empty());
        assert!(FieldValue::from(0.0).is_empty());
        assert!(FieldValue::from(0i64).is_empty());
        assert!(!FieldValue::from(7i64).is_empty());
        assert!(!FieldValue::from(" ").is_empty());

        assert!(!FieldValue::Null.is_present());
        assert!(!FieldValue::from("").is_present());
        assert!(FieldValue::from(false).is_present());
        assert!(FieldValue::from(0.0).is_present());
    }

    #[test]
    fn test_field_value_untagged_json() {
        let parsed: BTreeMap<String, FieldValue> =
            serde_json::from_str(r#"{"a": "x", "b": 2.5, "c": true, "d": null, "e": 3}"#).unwrap();
        assert_eq!(parsed["a"], FieldValue::from("x"));
        assert_eq!(parsed["b"], FieldValue::Number(2.5));
        assert_eq!(parsed["e"], FieldValue::Integer(3));
        assert_eq!(parsed["c"], FieldValue::Bool(true));
        assert_eq!(parsed["d"], FieldValue::Null);
    }
}
