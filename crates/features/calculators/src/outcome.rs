//! Displayable results: metrics with a canonical precision, classification labels
//! and the feasibility wrapper for requests that cannot be satisfied.

use serde::Serialize;
use std::borrow::Cow;
use std::fmt;

/// Canonical number of decimals per metric family.
pub mod precision {
    pub const WEIGHT: u8 = 2;
    pub const PERCENT: u8 = 2;
    pub const RATIO: u8 = 1;
    pub const DENSITY: u8 = 3;
    pub const ACIDITY: u8 = 3;
    pub const PRODUCTION_VOLUME: u8 = 1;
    pub const VOLUME: u8 = 2;
    pub const BRIX: u8 = 2;
    pub const CONTROL_LIMIT: u8 = 3;
    pub const DEFAULT: u8 = 2;
}

/// Whether a request can be carried out with the given inputs.
///
/// `NotPossible` is an ordinary answer (e.g. diluting a tank that is already below
/// the target Brix), not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum Feasibility<T> {
    Possible(T),
    NotPossible { message: Cow<'static, str> },
}

impl<T> Feasibility<T> {
    pub(crate) fn not_possible(message: impl Into<Cow<'static, str>>) -> Self {
        Self::NotPossible { message: message.into() }
    }

    #[must_use]
    pub const fn is_possible(&self) -> bool {
        matches!(self, Self::Possible(_))
    }

    /// The computed value, if the request was feasible.
    pub fn possible(self) -> Option<T> {
        match self {
            Self::Possible(value) => Some(value),
            Self::NotPossible { .. } => None,
        }
    }
}

/// Net weight against the specified band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum WeightStatus {
    Below,
    Within,
    Above,
}

/// Brix/acidity balance of a generic juice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RatioBalance {
    Acidic,
    Balanced,
    Sweet,
}

/// Ratio grade against fruit-specific bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FruitGrade {
    Low,
    Ideal,
    High,
    VeryHigh,
}

/// One computed number with its display metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "server", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Metric {
    /// Stable camelCase key, e.g. `waterToAdd`.
    pub key: &'static str,
    pub label: &'static str,
    pub value: f64,
    pub unit: &'static str,
    pub precision: u8,
}

impl Metric {
    #[must_use]
    pub const fn new(
        key: &'static str,
        label: &'static str,
        value: f64,
        unit: &'static str,
        precision: u8,
    ) -> Self {
        Self { key, label, value, unit, precision }
    }

    /// The value rounded to the metric's precision.
    #[must_use]
    pub fn rounded(&self) -> f64 {
        let scale = 10f64.powi(i32::from(self.precision));
        (self.value * scale).round() / scale
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:.*}", self.label, usize::from(self.precision), self.value)?;
        if !self.unit.is_empty() {
            write!(f, " {}", self.unit)?;
        }
        Ok(())
    }
}

/// Uniform, serializable view of any calculation result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "server", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Outcome {
    pub possible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classification: Option<String>,
    pub metrics: Vec<Metric>,
}

impl Outcome {
    #[must_use]
    pub const fn metrics(metrics: Vec<Metric>) -> Self {
        Self { possible: true, message: None, classification: None, metrics }
    }

    #[must_use]
    pub fn classified(mut self, label: impl fmt::Display) -> Self {
        self.classification = Some(label.to_string());
        self
    }

    #[must_use]
    pub fn not_possible(message: impl Into<String>) -> Self {
        Self {
            possible: false,
            message: Some(message.into()),
            classification: None,
            metrics: Vec::new(),
        }
    }

    /// Looks up a metric by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Metric> {
        self.metrics.iter().find(|m| m.key == key)
    }

    /// Human-readable lines, one per metric plus the classification or message.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = self.metrics.iter().map(ToString::to_string).collect();
        if let Some(classification) = &self.classification {
            lines.push(format!("Classification: {classification}"));
        }
        if let Some(message) = &self.message {
            lines.push(format!("Not possible: {message}"));
        }
        lines
    }
}

/// Conversion of a typed engine result into an [`Outcome`].
pub trait IntoOutcome {
    fn into_outcome(self) -> Outcome;
}

impl IntoOutcome for Outcome {
    fn into_outcome(self) -> Outcome {
        self
    }
}

impl<T: IntoOutcome> IntoOutcome for Feasibility<T> {
    fn into_outcome(self) -> Outcome {
        match self {
            Self::Possible(value) => value.into_outcome(),
            Self::NotPossible { message } => Outcome::not_possible(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_uses_metric_precision() {
        let m = Metric::new("density", "Density", 1.017_811, "g/mL", precision::DENSITY);
        assert_eq!(m.to_string(), "Density: 1.018 g/mL");
        assert_eq!(m.rounded(), 1.018);
    }

    #[test]
    fn unitless_metric_has_no_trailing_space() {
        let m = Metric::new("ratio", "Ratio", 12.0, "", precision::RATIO);
        assert_eq!(m.to_string(), "Ratio: 12.0");
    }

    #[test]
    fn infeasible_outcome_serializes_flag_and_message() {
        let outcome = Feasibility::<Outcome>::not_possible("already below target").into_outcome();
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["possible"], false);
        assert_eq!(json["message"], "already below target");
        assert_eq!(outcome.lines(), vec!["Not possible: already below target".to_owned()]);
    }

    #[test]
    fn labels_are_snake_case() {
        assert_eq!(FruitGrade::VeryHigh.to_string(), "very_high");
        assert_eq!(WeightStatus::Within.to_string(), "within");
    }
}
