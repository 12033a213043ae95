//! Raw form values and the per-field validation policies applied to them.

use crate::error::{CalcError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// A raw value as typed into a form field.
///
/// `null` is accepted and treated like an empty field, since browser forms send it
/// for inputs that did not parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "server", derive(utoipa::ToSchema))]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
    List(Vec<ListItem>),
    Null,
}

/// One entry of a list field; numbers may arrive as text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "server", derive(utoipa::ToSchema))]
#[serde(untagged)]
pub enum ListItem {
    Number(f64),
    Text(String),
    Null,
}

impl ListItem {
    /// `None` for blank text, so trailing separators in a pasted list are harmless.
    fn parse(&self, field: &'static str) -> Option<Result<f64>> {
        match self {
            Self::Number(n) => Some(require(field, *n, Policy::Finite)),
            Self::Text(text) if text.trim().is_empty() => None,
            Self::Text(text) => Some(parse_number(field, text)),
            Self::Null => Some(Err(CalcError::invalid(field, "list items must be numbers"))),
        }
    }
}

impl From<f64> for ListItem {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for ListItem {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

/// Field name to raw value, as submitted by a form.
pub type FormFields = BTreeMap<String, FieldValue>;

/// Domain restriction for a numeric field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// `> 0`
    Positive,
    /// `>= 0`
    NonNegative,
    /// Any finite number.
    Finite,
}

impl Policy {
    const fn message(self) -> &'static str {
        match self {
            Self::Positive => "must be greater than zero",
            Self::NonNegative => "must not be negative",
            Self::Finite => "must be a finite number",
        }
    }

    fn admits(self, value: f64) -> bool {
        value.is_finite()
            && match self {
                Self::Positive => value > 0.0,
                Self::NonNegative => value >= 0.0,
                Self::Finite => true,
            }
    }
}

/// Checks `value` against `policy`, naming `field` on failure.
///
/// # Errors
/// Returns [`CalcError::InvalidInput`] when the value is NaN, infinite, or outside the policy.
pub fn require(field: &'static str, value: f64, policy: Policy) -> Result<f64> {
    if !value.is_finite() {
        return Err(CalcError::invalid(field, Policy::Finite.message()));
    }
    if policy.admits(value) {
        Ok(value)
    } else {
        Err(CalcError::invalid(field, policy.message()))
    }
}

/// Typed read access to submitted [`FormFields`].
///
/// Empty text counts as a missing field. Only numeric parsing happens here;
/// domain checks belong to the engine functions.
#[derive(Debug, Clone, Copy)]
pub struct Form<'a> {
    fields: &'a FormFields,
}

impl<'a> Form<'a> {
    #[must_use]
    pub const fn new(fields: &'a FormFields) -> Self {
        Self { fields }
    }

    fn raw(&self, field: &str) -> Option<&'a FieldValue> {
        match self.fields.get(field)? {
            FieldValue::Null => None,
            FieldValue::Text(text) if text.trim().is_empty() => None,
            FieldValue::List(items) if items.is_empty() => None,
            value => Some(value),
        }
    }

    /// Reads a required number.
    ///
    /// # Errors
    /// Missing field, text that does not parse, or a list.
    pub fn number(&self, field: &'static str) -> Result<f64> {
        self.optional_number(field)?.ok_or_else(|| CalcError::invalid(field, "is required"))
    }

    /// Reads a number, falling back to `default` when the field is left empty.
    ///
    /// # Errors
    /// Text that does not parse, or a list.
    pub fn number_or(&self, field: &'static str, default: f64) -> Result<f64> {
        Ok(self.optional_number(field)?.unwrap_or(default))
    }

    fn optional_number(&self, field: &'static str) -> Result<Option<f64>> {
        match self.raw(field) {
            None => Ok(None),
            Some(FieldValue::Number(n)) => Ok(Some(*n)),
            Some(FieldValue::Text(text)) => parse_number(field, text).map(Some),
            Some(FieldValue::List(_)) => Err(CalcError::invalid(field, "expects a single number")),
            Some(FieldValue::Null) => Ok(None),
        }
    }

    /// Reads a whole, positive count.
    ///
    /// # Errors
    /// Missing field, non-integer, or a value below one.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn count(&self, field: &'static str) -> Result<u64> {
        let value = self.number(field)?;
        if !value.is_finite() || value.fract() != 0.0 || value < 1.0 || value > 2f64.powi(53) {
            return Err(CalcError::invalid(field, "must be a whole number greater than zero"));
        }
        Ok(value as u64)
    }

    /// Reads a list of numbers, given either as a JSON array (of numbers or
    /// numeric text) or as text separated by commas, semicolons or whitespace.
    ///
    /// # Errors
    /// Missing field or an item that does not parse.
    pub fn numbers(&self, field: &'static str) -> Result<Vec<f64>> {
        let values: Vec<f64> = match self.raw(field) {
            None | Some(FieldValue::Null) => Vec::new(),
            Some(FieldValue::Number(n)) => vec![*n],
            Some(FieldValue::List(items)) => {
                items.iter().filter_map(|item| item.parse(field)).collect::<Result<_>>()?
            },
            Some(FieldValue::Text(text)) => text
                .split(|c: char| c == ',' || c == ';' || c.is_whitespace())
                .filter(|item| !item.is_empty())
                .map(|item| parse_number(field, item))
                .collect::<Result<_>>()?,
        };
        if values.is_empty() {
            return Err(CalcError::invalid(field, "needs at least one value"));
        }
        Ok(values)
    }

    /// Parses an enumerated choice, falling back to `default` when empty.
    ///
    /// # Errors
    /// Text that names no known option.
    pub fn choice_or<T: FromStr>(&self, field: &'static str, default: T) -> Result<T> {
        self.raw(field).map_or(Ok(default), |value| parse_choice(field, value))
    }

    /// Parses a required enumerated choice.
    ///
    /// # Errors
    /// Missing field or text that names no known option.
    pub fn choice<T: FromStr>(&self, field: &'static str) -> Result<T> {
        let value = self.raw(field).ok_or_else(|| CalcError::invalid(field, "is required"))?;
        parse_choice(field, value)
    }
}

fn parse_choice<T: FromStr>(field: &'static str, value: &FieldValue) -> Result<T> {
    let FieldValue::Text(text) = value else {
        return Err(CalcError::invalid(field, "expects one of the listed options"));
    };
    let text = text.trim();
    text.parse().map_err(|_| CalcError::invalid(field, format!("unknown option `{text}`")))
}

fn parse_number(field: &'static str, text: &str) -> Result<f64> {
    let text = text.trim();
    let value: f64 =
        text.parse().map_err(|_| CalcError::invalid(field, format!("`{text}` is not a number")))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CalcError::invalid(field, Policy::Finite.message()))
    }
}
