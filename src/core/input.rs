use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Field values exactly as typed into a form, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawInput(BTreeMap<String, String>);

impl RawInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawInput {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Parses user text into a number. Anything that is not a finite decimal
/// (empty text, garbage, `inf`, overflow) becomes NaN, never a clamped value.
pub fn parse_number(text: &str) -> f64 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return f64::NAN;
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => f64::NAN,
    }
}

pub fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

pub fn is_non_negative(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldConstraint {
    Positive,
    NonNegative,
}

impl FieldConstraint {
    pub fn holds(self, value: f64) -> bool {
        match self {
            FieldConstraint::Positive => is_positive(value),
            FieldConstraint::NonNegative => is_non_negative(value),
        }
    }
}

/// Violations that involve more than one field.
#[derive(Debug, Clone, Copy, Error, Eq, PartialEq)]
pub enum CrossFieldError {
    #[error("Down payment cannot exceed the home price.")]
    DownPaymentExceedsPrice,
    #[error("Payment is too low to reduce the balance.")]
    PaymentTooLow,
    #[error("Fee is too high to model growth.")]
    FeeExceedsReturn,
    #[error("Enter smaller values to get a finite result.")]
    OutOfRange,
}

#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum ValidationError {
    #[error("{message}")]
    Constraint {
        constraint: FieldConstraint,
        message: &'static str,
    },
    #[error(transparent)]
    Relationship(#[from] CrossFieldError),
}

/// Per-field validation outcome, in declaration order. A field with an
/// error must not feed a computation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationResult {
    fields: Vec<(&'static str, Option<ValidationError>)>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check(
        &mut self,
        field: &'static str,
        value: f64,
        constraint: FieldConstraint,
        message: &'static str,
    ) -> &mut Self {
        let error = (!constraint.holds(value)).then_some(ValidationError::Constraint {
            constraint,
            message,
        });
        self.record(field, error);
        self
    }

    /// Attaches an error to `field`, replacing whatever it held before.
    pub fn reject(&mut self, field: &'static str, error: impl Into<ValidationError>) {
        self.record(field, Some(error.into()));
    }

    fn record(&mut self, field: &'static str, error: Option<ValidationError>) {
        match self.fields.iter_mut().find(|(name, _)| *name == field) {
            Some(slot) => slot.1 = error,
            None => self.fields.push((field, error)),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.fields.iter().all(|(_, error)| error.is_none())
    }

    pub fn error(&self, field: &str) -> Option<&ValidationError> {
        self.fields
            .iter()
            .find(|(name, _)| *name == field)
            .and_then(|(_, error)| error.as_ref())
    }

    pub fn message(&self, field: &str) -> Option<String> {
        self.error(field).map(ToString::to_string)
    }

    pub fn errors(&self) -> impl Iterator<Item = (&'static str, &ValidationError)> {
        self.fields
            .iter()
            .filter_map(|(name, error)| error.as_ref().map(|e| (*name, e)))
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|(name, _)| *name)
    }

    pub fn messages(&self) -> BTreeMap<&'static str, String> {
        self.errors()
            .map(|(name, error)| (name, error.to_string()))
            .collect()
    }
}
