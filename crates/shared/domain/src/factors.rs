//! Conversion factors used by the calculators.
//!
//! On the wire the factors are a flat `key -> number` JSON object:
//!
//! ```json
//! {
//!   "cristal_to_liquido": 0.85,
//!   "liquido_to_cristal": 1.18,
//!   "acido_citrico_fator": 1.0,
//!   "brix_correcao_temp.20": 1.0,
//!   "brix_correcao_temp.25": 0.99
//! }
//! ```
//!
//! Overrides are merged key by key on top of [`ConversionFactors::default`].

use crate::constants::{
    BRIX_TEMPERATURE_PREFIX, CITRIC_ACID_FACTOR, CRYSTAL_TO_LIQUID, LIQUID_TO_CRYSTAL,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Flat wire representation of the factors.
pub type FactorMap = BTreeMap<String, f64>;

/// Validation failures for a factor override.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FactorsError {
    #[error("factor `{key}` must be a finite number greater than zero, got {value}")]
    OutOfRange { key: String, value: f64 },
    #[error("invalid Brix temperature key `{key}`")]
    BadTemperatureKey { key: String },
}

/// Named coefficients with their built-in defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "FactorMap", into = "FactorMap")]
pub struct ConversionFactors {
    /// L of liquid sugar per kg of crystal sugar.
    pub crystal_to_liquid: f64,
    /// kg of crystal sugar per L of liquid sugar.
    pub liquid_to_crystal: f64,
    /// Citric acid correction factor.
    pub citric_acid: f64,
    /// Brix correction factor by whole degree Celsius.
    pub brix_temperature: BTreeMap<i32, f64>,
}

impl Default for ConversionFactors {
    fn default() -> Self {
        Self {
            crystal_to_liquid: 0.85,
            liquid_to_crystal: 1.18,
            citric_acid: 1.0,
            brix_temperature: BTreeMap::from([(20, 1.000), (25, 0.990), (30, 0.980)]),
        }
    }
}

/// Result of merging an override map.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    pub factors: ConversionFactors,
    /// Keys present in the override that are not known factors.
    pub ignored: Vec<String>,
}

impl ConversionFactors {
    /// Brix correction factor for a temperature; the temperature is truncated to
    /// whole degrees and a missing entry means no correction (`1.0`).
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn brix_correction(&self, temperature_c: f64) -> f64 {
        let key = temperature_c.trunc() as i32;
        self.brix_temperature.get(&key).copied().unwrap_or(1.0)
    }

    /// Applies `overrides` on top of `self`, validating every known key.
    ///
    /// # Errors
    /// Returns [`FactorsError`] if a value is non-finite or not positive, or if a
    /// temperature key cannot be parsed. Nothing is applied in that case.
    pub fn merged(&self, overrides: &FactorMap) -> Result<MergeOutcome, FactorsError> {
        let mut factors = self.clone();
        let mut ignored = Vec::new();

        for (key, &value) in overrides {
            let slot = match key.as_str() {
                CRYSTAL_TO_LIQUID => &mut factors.crystal_to_liquid,
                LIQUID_TO_CRYSTAL => &mut factors.liquid_to_crystal,
                CITRIC_ACID_FACTOR => &mut factors.citric_acid,
                other => match other.strip_prefix(BRIX_TEMPERATURE_PREFIX) {
                    Some(temp) => {
                        let temp = temp
                            .trim()
                            .parse::<i32>()
                            .map_err(|_| FactorsError::BadTemperatureKey { key: key.clone() })?;
                        factors.brix_temperature.entry(temp).or_insert(1.0)
                    },
                    None => {
                        ignored.push(key.clone());
                        continue;
                    },
                },
            };
            if !value.is_finite() || value <= 0.0 {
                return Err(FactorsError::OutOfRange { key: key.clone(), value });
            }
            *slot = value;
        }

        Ok(MergeOutcome { factors, ignored })
    }

    /// Flattens the factors into their wire representation.
    #[must_use]
    pub fn to_map(&self) -> FactorMap {
        let mut map = FactorMap::new();
        map.insert(CRYSTAL_TO_LIQUID.to_owned(), self.crystal_to_liquid);
        map.insert(LIQUID_TO_CRYSTAL.to_owned(), self.liquid_to_crystal);
        map.insert(CITRIC_ACID_FACTOR.to_owned(), self.citric_acid);
        for (temp, factor) in &self.brix_temperature {
            map.insert(format!("{BRIX_TEMPERATURE_PREFIX}{temp}"), *factor);
        }
        map
    }
}

impl TryFrom<FactorMap> for ConversionFactors {
    type Error = FactorsError;

    fn try_from(map: FactorMap) -> Result<Self, Self::Error> {
        Self::default().merged(&map).map(|outcome| outcome.factors)
    }
}

impl From<ConversionFactors> for FactorMap {
    fn from(factors: ConversionFactors) -> Self {
        factors.to_map()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_plant_values() {
        let f = ConversionFactors::default();
        assert_eq!(f.crystal_to_liquid, 0.85);
        assert_eq!(f.liquid_to_crystal, 1.18);
        assert_eq!(f.citric_acid, 1.0);
        assert_eq!(f.brix_correction(25.7), 0.990);
        assert_eq!(f.brix_correction(22.0), 1.0);
    }

    #[test]
    fn merge_overrides_only_named_keys() {
        let overrides = FactorMap::from([
            ("acido_citrico_fator".to_owned(), 1.1),
            ("brix_correcao_temp.35".to_owned(), 0.97),
            ("unrelated".to_owned(), 3.0),
        ]);
        let out = ConversionFactors::default().merged(&overrides).unwrap();
        assert_eq!(out.factors.citric_acid, 1.1);
        assert_eq!(out.factors.crystal_to_liquid, 0.85);
        assert_eq!(out.factors.brix_correction(35.0), 0.97);
        assert_eq!(out.ignored, vec!["unrelated".to_owned()]);
    }

    #[test]
    fn merge_rejects_non_positive_values() {
        let overrides = FactorMap::from([("cristal_to_liquido".to_owned(), 0.0)]);
        let err = ConversionFactors::default().merged(&overrides).unwrap_err();
        assert!(matches!(err, FactorsError::OutOfRange { .. }));
    }

    #[test]
    fn merge_rejects_bad_temperature_key() {
        let overrides = FactorMap::from([("brix_correcao_temp.hot".to_owned(), 1.0)]);
        let err = ConversionFactors::default().merged(&overrides).unwrap_err();
        assert!(matches!(err, FactorsError::BadTemperatureKey { .. }));
    }
}
