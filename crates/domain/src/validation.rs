// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Field validation rules.
//!
//! Every check in this module is pure and total: it inspects a value (and,
//! for cross-field rules, the rest of the form) and returns a
//! [`ValidationResult`]. Nothing here panics or returns an error.
//!
//! Emptiness is decided by a field's [`Requirement`], not by its rules, so
//! every rule treats an empty value as valid.

use crate::types::{FieldKind, FieldValue, FormState};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

#[allow(clippy::expect_used)]
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@.]{2,}$").expect("email pattern is a valid regex")
});

/// Minimum number of digits in a phone number.
const PHONE_MIN_DIGITS: usize = 10;
/// Maximum number of digits in a phone number (E.164 limit).
const PHONE_MAX_DIGITS: usize = 15;

/// The outcome of checking a single field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Whether the value passed.
    pub valid: bool,
    /// A user-facing message when the value failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ValidationResult {
    /// A passing result.
    #[must_use]
    pub const fn ok() -> Self {
        Self {
            valid: true,
            message: None,
        }
    }

    /// A failing result with a message.
    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: Some(message.into()),
        }
    }
}

/// When a field must carry a value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Requirement {
    /// The field must always be filled.
    Always,
    /// The field may be left empty.
    Optional,
    /// The field must be filled only while another text field holds `equals`
    /// (compared case-insensitively).
    When {
        /// The controlling field.
        field: String,
        /// The value of the controlling field that activates the requirement.
        equals: String,
    },
}

impl Requirement {
    /// Returns true when the requirement applies to the given form.
    #[must_use]
    pub fn is_active(&self, form: &FormState) -> bool {
        match self {
            Self::Always => true,
            Self::Optional => false,
            Self::When { field, equals } => form
                .text(field)
                .is_some_and(|v| v.trim().eq_ignore_ascii_case(equals)),
        }
    }

    /// Returns true for a conditional requirement whose condition does not
    /// hold. A dormant field is neither required nor checked.
    #[must_use]
    pub fn is_dormant(&self, form: &FormState) -> bool {
        matches!(self, Self::When { .. }) && !self.is_active(form)
    }

    /// Returns the controlling field, if any.
    #[must_use]
    pub fn referenced_field(&self) -> Option<&str> {
        match self {
            Self::When { field, .. } => Some(field.as_str()),
            _ => None,
        }
    }
}

/// A shape or content rule applied to a non-empty value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Rule {
    /// `local@domain.tld` shape.
    Email,
    /// An optional leading `+` followed by 10 to 15 digits. Spaces, dashes,
    /// dots and parentheses are ignored.
    Phone,
    /// At least this many characters, after trimming.
    MinLength(usize),
    /// At most this many characters, after trimming.
    MaxLength(usize),
    /// Must equal the text of another field.
    MatchesField(String),
    /// The checkbox must be ticked.
    Accepted,
    /// Must be one of the listed values (compared case-insensitively).
    OneOf(Vec<String>),
    /// A whole number within an inclusive range.
    Integer {
        /// Smallest accepted value.
        min: i64,
        /// Largest accepted value.
        max: i64,
    },
    /// Password length and character class requirements.
    StrongPassword {
        /// Minimum number of characters.
        min_length: usize,
        /// Minimum number of character classes (upper, lower, digit, symbol).
        min_classes: usize,
    },
}

impl Rule {
    /// Returns the other field this rule reads, if any.
    #[must_use]
    pub fn referenced_field(&self) -> Option<&str> {
        match self {
            Self::MatchesField(other) => Some(other.as_str()),
            _ => None,
        }
    }
}

/// Declaration of one form field: its name, kind, requirement and rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// The field name used as the key in `FormState`.
    pub name: String,
    /// A human-readable label used in messages.
    pub label: String,
    /// The kind of value the field accepts.
    pub kind: FieldKind,
    /// When the field must be filled.
    pub requirement: Requirement,
    /// Rules applied to a non-empty value, in order.
    pub rules: Vec<Rule>,
}

impl FieldSpec {
    fn new(name: impl Into<String>, label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind,
            requirement: Requirement::Optional,
            rules: Vec::new(),
        }
    }

    /// Declares an optional text field.
    #[must_use]
    pub fn text(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldKind::Text)
    }

    /// Declares an optional checkbox field.
    #[must_use]
    pub fn flag(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldKind::Flag)
    }

    /// Declares an optional file list field.
    #[must_use]
    pub fn files(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldKind::Files)
    }

    /// Marks the field as always required.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.requirement = Requirement::Always;
        self
    }

    /// Marks the field as required while `field` holds `equals`.
    #[must_use]
    pub fn required_when(mut self, field: impl Into<String>, equals: impl Into<String>) -> Self {
        self.requirement = Requirement::When {
            field: field.into(),
            equals: equals.into(),
        };
        self
    }

    /// Appends a rule.
    #[must_use]
    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Returns every other field name this declaration reads.
    pub fn referenced_fields(&self) -> impl Iterator<Item = &str> {
        self.requirement
            .referenced_field()
            .into_iter()
            .chain(self.rules.iter().filter_map(Rule::referenced_field))
    }
}

/// Checks one rule against a field value.
///
/// `form` supplies the other fields for cross-field rules. An absent or
/// empty value always passes.
#[must_use]
pub fn validate(
    rule: &Rule,
    field_name: &str,
    value: Option<&FieldValue>,
    form: &FormState,
) -> ValidationResult {
    check_rule(rule, field_name, value, form)
}

/// Checks a declared field against the form.
///
/// The requirement is checked first; the rules then run in declaration
/// order and the first failure is reported. A dormant conditional field
/// always passes, whatever it holds.
#[must_use]
pub fn validate_field(spec: &FieldSpec, form: &FormState) -> ValidationResult {
    if spec.requirement.is_dormant(form) {
        return ValidationResult::ok();
    }

    let value: Option<&FieldValue> = form.get(&spec.name);

    let Some(present) = value.filter(|v| !v.is_empty()) else {
        if spec.requirement.is_active(form) {
            return ValidationResult::invalid(format!("{} is required", spec.label));
        }
        return ValidationResult::ok();
    };

    if present.kind() != spec.kind {
        return ValidationResult::invalid(format!(
            "{} expects a {} value",
            spec.label,
            spec.kind.as_str()
        ));
    }

    spec.rules
        .iter()
        .map(|rule| check_rule(rule, &spec.label, value, form))
        .find(|result| !result.valid)
        .unwrap_or_else(ValidationResult::ok)
}

fn check_rule(
    rule: &Rule,
    label: &str,
    value: Option<&FieldValue>,
    form: &FormState,
) -> ValidationResult {
    let Some(value) = value.filter(|v| !v.is_empty()) else {
        return ValidationResult::ok();
    };

    match rule {
        Rule::Accepted => {
            if value.as_flag() == Some(true) {
                ValidationResult::ok()
            } else {
                ValidationResult::invalid(format!("{label} must be accepted"))
            }
        }
        text_rule => {
            let Some(text) = value.as_text() else {
                return ValidationResult::invalid(format!("{label} must be text"));
            };
            check_text_rule(text_rule, label, text.trim(), form)
        }
    }
}

fn check_text_rule(rule: &Rule, label: &str, text: &str, form: &FormState) -> ValidationResult {
    match rule {
        Rule::Email => {
            if EMAIL_PATTERN.is_match(text) {
                ValidationResult::ok()
            } else {
                ValidationResult::invalid(format!("{label} must be a valid email address"))
            }
        }
        Rule::Phone => {
            if is_phone_number(text) {
                ValidationResult::ok()
            } else {
                ValidationResult::invalid(format!(
                    "{label} must contain {PHONE_MIN_DIGITS} to {PHONE_MAX_DIGITS} digits"
                ))
            }
        }
        Rule::MinLength(min) => {
            if text.chars().count() >= *min {
                ValidationResult::ok()
            } else {
                ValidationResult::invalid(format!("{label} must be at least {min} characters"))
            }
        }
        Rule::MaxLength(max) => {
            if text.chars().count() <= *max {
                ValidationResult::ok()
            } else {
                ValidationResult::invalid(format!("{label} must be at most {max} characters"))
            }
        }
        Rule::MatchesField(other) => {
            if form.text(other).map(str::trim) == Some(text) {
                ValidationResult::ok()
            } else {
                ValidationResult::invalid(format!("{label} does not match {other}"))
            }
        }
        Rule::StrongPassword {
            min_length,
            min_classes,
        } => {
            if text.chars().count() < *min_length {
                return ValidationResult::invalid(format!(
                    "{label} must be at least {min_length} characters long"
                ));
            }
            let classes: usize = character_classes(text);
            if classes < *min_classes {
                return ValidationResult::invalid(format!(
                    "{label} must contain at least {min_classes} of the following: uppercase letter, lowercase letter, digit, symbol (found {classes})"
                ));
            }
            ValidationResult::ok()
        }
        Rule::OneOf(choices) => {
            if choices
                .iter()
                .any(|choice| choice.eq_ignore_ascii_case(text))
            {
                ValidationResult::ok()
            } else {
                ValidationResult::invalid(format!("{label} must be one of: {}", choices.join(", ")))
            }
        }
        Rule::Integer { min, max } => match text.parse::<i64>() {
            Ok(number) if (*min..=*max).contains(&number) => ValidationResult::ok(),
            _ => ValidationResult::invalid(format!(
                "{label} must be a whole number between {min} and {max}"
            )),
        },
        Rule::Accepted => ValidationResult::invalid(format!("{label} must be accepted")),
    }
}

fn is_phone_number(text: &str) -> bool {
    let body: &str = text.strip_prefix('+').unwrap_or(text);
    let mut digits: usize = 0;

    for c in body.chars() {
        if c.is_ascii_digit() {
            digits += 1;
        } else if !matches!(c, ' ' | '-' | '(' | ')' | '.') {
            return false;
        }
    }

    (PHONE_MIN_DIGITS..=PHONE_MAX_DIGITS).contains(&digits)
}

/// Counts the character classes present in a password:
/// uppercase letters, lowercase letters, digits and symbols.
fn character_classes(password: &str) -> usize {
    let mut has_uppercase: bool = false;
    let mut has_lowercase: bool = false;
    let mut has_digit: bool = false;
    let mut has_symbol: bool = false;

    for c in password.chars() {
        if c.is_uppercase() {
            has_uppercase = true;
        } else if c.is_lowercase() {
            has_lowercase = true;
        } else if c.is_ascii_digit() {
            has_digit = true;
        } else if !c.is_whitespace() {
            has_symbol = true;
        }
    }

    [has_uppercase, has_lowercase, has_digit, has_symbol]
        .into_iter()
        .filter(|present| *present)
        .count()
}
