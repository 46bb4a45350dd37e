//! Field-level validation rules shared by all admission records.
//!
//! # Responsibility
//! - Describe per-field rules declaratively (required-ness, length, pattern,
//!   numeric range, fixed-point shape).
//! - Evaluate every rule of a candidate and collect all violations.
//!
//! # Invariants
//! - Validation never touches storage.
//! - Violations are reported in field declaration order, never short-circuited.
//! - Numeric ranges are inclusive on both ends.

use crate::model::RecordId;
use regex::Regex;
use rust_decimal::Decimal;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Mutation kind a candidate is validated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Update,
}

/// One broken rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// Required field is empty or whitespace only.
    Missing,
    /// Text exceeds the maximum character count.
    TooLong { max_chars: usize, actual_chars: usize },
    /// Text does not match the allowed pattern.
    PatternMismatch { pattern: String },
    /// Integer lies outside the inclusive range.
    OutOfRange { min: i64, max: i64, actual: i64 },
    /// Decimal does not fit `numeric(precision, scale)`.
    PrecisionExceeded {
        precision: u32,
        scale: u32,
        actual: Decimal,
    },
    /// Parent reference is not a usable identity.
    InvalidReference { value: RecordId },
}

impl Display for Violation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing => write!(f, "is required"),
            Self::TooLong {
                max_chars,
                actual_chars,
            } => write!(
                f,
                "must be at most {max_chars} characters, got {actual_chars}"
            ),
            Self::PatternMismatch { pattern } => write!(f, "must match `{pattern}`"),
            Self::OutOfRange { min, max, actual } => {
                write!(f, "must be between {min} and {max}, got {actual}")
            }
            Self::PrecisionExceeded {
                precision,
                scale,
                actual,
            } => write!(f, "must fit numeric({precision},{scale}), got {actual}"),
            Self::InvalidReference { value } => {
                write!(f, "must be a positive identity, got {value}")
            }
        }
    }
}

/// Violation attached to the field it was found on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: &'static str,
    pub violation: Violation,
}

impl Display for FieldViolation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.field, self.violation)
    }
}

/// Non-empty, ordered list of field violations for one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    violations: Vec<FieldViolation>,
}

impl ValidationError {
    /// All violations in field declaration order.
    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    /// Violations reported for one field.
    pub fn for_field<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a Violation> + 'a {
        self.violations
            .iter()
            .filter(move |item| item.field == field)
            .map(|item| &item.violation)
    }

    /// Whether any violation was reported for `field`.
    pub fn has_field(&self, field: &str) -> bool {
        self.violations.iter().any(|item| item.field == field)
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "validation failed: ")?;
        for (index, item) in self.violations.iter().enumerate() {
            if index > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{item}")?;
        }
        Ok(())
    }
}

impl Error for ValidationError {}

/// Text field rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextRule {
    pub required: bool,
    pub max_chars: Option<usize>,
}

impl TextRule {
    pub const fn required(max_chars: usize) -> Self {
        Self {
            required: true,
            max_chars: Some(max_chars),
        }
    }

    pub const fn optional(max_chars: usize) -> Self {
        Self {
            required: false,
            max_chars: Some(max_chars),
        }
    }

    /// Required free text without length limit.
    pub const fn required_unbounded() -> Self {
        Self {
            required: true,
            max_chars: None,
        }
    }

    pub const fn optional_unbounded() -> Self {
        Self {
            required: false,
            max_chars: None,
        }
    }
}

/// Inclusive integer range rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntRule {
    pub min: i64,
    pub max: i64,
}

impl IntRule {
    pub const fn between(min: i64, max: i64) -> Self {
        Self { min, max }
    }
}

/// Fixed-point rule equivalent to SQL `numeric(precision, scale)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecimalRule {
    pub precision: u32,
    pub scale: u32,
}

impl DecimalRule {
    pub const fn numeric(precision: u32, scale: u32) -> Self {
        Self { precision, scale }
    }

    /// Returns the value rescaled to `scale` when it fits.
    fn fit(&self, value: Decimal) -> Option<Decimal> {
        let normalized = value.normalize();
        if normalized.scale() > self.scale {
            return None;
        }
        let integer_digits = self.precision - self.scale;
        let bound = Decimal::from(10_i64.pow(integer_digits));
        if normalized.abs() >= bound {
            return None;
        }
        let mut fitted = normalized;
        fitted.rescale(self.scale);
        Some(fitted)
    }
}

/// Collect-all evaluator used by the draft `validate` implementations.
#[derive(Debug, Default)]
pub(crate) struct FieldChecker {
    violations: Vec<FieldViolation>,
}

impl FieldChecker {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, field: &'static str, violation: Violation) {
        self.violations.push(FieldViolation { field, violation });
    }

    /// Checks a text field; returns whether a non-blank value is present.
    pub(crate) fn text(&mut self, field: &'static str, value: &str, rule: TextRule) -> bool {
        if value.trim().is_empty() {
            if rule.required {
                self.push(field, Violation::Missing);
            }
            return false;
        }
        if let Some(max_chars) = rule.max_chars {
            let actual_chars = value.chars().count();
            if actual_chars > max_chars {
                self.push(
                    field,
                    Violation::TooLong {
                        max_chars,
                        actual_chars,
                    },
                );
            }
        }
        true
    }

    pub(crate) fn optional_text(
        &mut self,
        field: &'static str,
        value: Option<&str>,
        rule: TextRule,
    ) {
        match value {
            Some(value) => {
                // Only length applies: an empty optional value is stored as given.
                if let Some(max_chars) = rule.max_chars {
                    let actual_chars = value.chars().count();
                    if actual_chars > max_chars {
                        self.push(
                            field,
                            Violation::TooLong {
                                max_chars,
                                actual_chars,
                            },
                        );
                    }
                }
            }
            None if rule.required => self.push(field, Violation::Missing),
            None => {}
        }
    }

    /// Checks a required text field against a pattern.
    pub(crate) fn pattern(&mut self, field: &'static str, value: &str, pattern: &Regex) {
        if !self.text(field, value, TextRule::required_unbounded()) {
            return;
        }
        if !pattern.is_match(value) {
            self.push(
                field,
                Violation::PatternMismatch {
                    pattern: pattern.as_str().to_string(),
                },
            );
        }
    }

    pub(crate) fn int(&mut self, field: &'static str, value: i64, rule: IntRule) {
        if value < rule.min || value > rule.max {
            self.push(
                field,
                Violation::OutOfRange {
                    min: rule.min,
                    max: rule.max,
                    actual: value,
                },
            );
        }
    }

    /// Checks an optional decimal and returns its normalized form.
    pub(crate) fn decimal(
        &mut self,
        field: &'static str,
        value: Option<Decimal>,
        rule: DecimalRule,
    ) -> Option<Decimal> {
        let value = value?;
        match rule.fit(value) {
            Some(fitted) => Some(fitted),
            None => {
                self.push(
                    field,
                    Violation::PrecisionExceeded {
                        precision: rule.precision,
                        scale: rule.scale,
                        actual: value,
                    },
                );
                Some(value)
            }
        }
    }

    pub(crate) fn reference(&mut self, field: &'static str, value: RecordId) {
        if value <= 0 {
            self.push(field, Violation::InvalidReference { value });
        }
    }

    pub(crate) fn finish(self) -> Result<(), ValidationError> {
        if self.violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError {
                violations: self.violations,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DecimalRule, FieldChecker, IntRule, TextRule, Violation};
    use regex::Regex;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(value: &str) -> Decimal {
        Decimal::from_str(value).unwrap()
    }

    #[test]
    fn text_rule_rejects_blank_required_value() {
        let mut checker = FieldChecker::new();
        assert!(!checker.text("last_name", "   ", TextRule::required(100)));
        let err = checker.finish().unwrap_err();
        assert_eq!(err.violations()[0].violation, Violation::Missing);
    }

    #[test]
    fn text_rule_counts_characters_not_bytes() {
        let mut checker = FieldChecker::new();
        checker.text("first_name", &"я".repeat(100), TextRule::required(100));
        assert!(checker.finish().is_ok());

        let mut checker = FieldChecker::new();
        checker.text("first_name", &"я".repeat(101), TextRule::required(100));
        let err = checker.finish().unwrap_err();
        assert_eq!(
            err.violations()[0].violation,
            Violation::TooLong {
                max_chars: 100,
                actual_chars: 101
            }
        );
    }

    #[test]
    fn optional_text_accepts_absent_and_empty_values() {
        let mut checker = FieldChecker::new();
        checker.optional_text("patronymic", None, TextRule::optional(100));
        checker.optional_text("patronymic", Some(""), TextRule::optional(100));
        assert!(checker.finish().is_ok());
    }

    #[test]
    fn pattern_skips_match_when_value_is_missing() {
        let pattern = Regex::new("^[mf]$").unwrap();
        let mut checker = FieldChecker::new();
        checker.pattern("gender", "", &pattern);
        let err = checker.finish().unwrap_err();
        assert_eq!(err.violations().len(), 1);
        assert_eq!(err.violations()[0].violation, Violation::Missing);

        let mut checker = FieldChecker::new();
        checker.pattern("gender", "M", &pattern);
        let err = checker.finish().unwrap_err();
        assert_eq!(
            err.violations()[0].violation,
            Violation::PatternMismatch {
                pattern: "^[mf]$".to_string()
            }
        );
    }

    #[test]
    fn int_rule_is_inclusive_on_both_ends() {
        let rule = IntRule::between(0, 100);
        let mut checker = FieldChecker::new();
        checker.int("score", 0, rule);
        checker.int("score", 100, rule);
        assert!(checker.finish().is_ok());

        let mut checker = FieldChecker::new();
        checker.int("score", -1, rule);
        checker.int("score", 101, rule);
        assert_eq!(checker.finish().unwrap_err().violations().len(), 2);
    }

    #[test]
    fn decimal_rule_normalizes_scale_and_rejects_overflow() {
        let rule = DecimalRule::numeric(5, 2);
        let mut checker = FieldChecker::new();
        let fitted = checker.decimal("average_score", Some(dec("4.5")), rule).unwrap();
        assert_eq!(fitted.to_string(), "4.50");
        let trimmed = checker.decimal("average_score", Some(dec("4.500")), rule).unwrap();
        assert_eq!(trimmed.to_string(), "4.50");
        assert_eq!(checker.decimal("average_score", None, rule), None);
        assert!(checker.finish().is_ok());

        let mut checker = FieldChecker::new();
        checker.decimal("average_score", Some(dec("999.99")), rule);
        assert!(checker.finish().is_ok());

        let mut checker = FieldChecker::new();
        checker.decimal("average_score", Some(dec("1000")), rule);
        checker.decimal("ege_score", Some(dec("1.234")), rule);
        let err = checker.finish().unwrap_err();
        assert!(err.has_field("average_score"));
        assert!(err.has_field("ege_score"));
    }

    #[test]
    fn violations_are_collected_in_call_order() {
        let mut checker = FieldChecker::new();
        checker.text("last_name", "", TextRule::required(100));
        checker.reference("applicant_id", 0);
        checker.int("grade", 6, IntRule::between(1, 5));
        let err = checker.finish().unwrap_err();
        let fields: Vec<_> = err.violations().iter().map(|item| item.field).collect();
        assert_eq!(fields, vec!["last_name", "applicant_id", "grade"]);
        assert!(err.to_string().starts_with("validation failed: last_name is required"));
    }
}
