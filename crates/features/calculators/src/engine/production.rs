//! Production planning: filled volume, yield, consumption and recipes.

use crate::error::{CalcError, Result};
use crate::input::{Policy, require};
use crate::outcome::{Metric, Outcome, precision};

/// Juice density assumed when the form leaves it empty, in kg/L.
pub const DEFAULT_DENSITY: f64 = 1.045;

/// Volume produced from a weighed batch: `totalWeight / density` litres.
///
/// # Errors
/// `totalWeight` or `density` not positive.
pub fn production_volume(total_weight: f64, density: f64) -> Result<Outcome> {
    let weight = require("totalWeight", total_weight, Policy::Positive)?;
    let density = require("density", density, Policy::Positive)?;
    let litres = weight / density;
    Ok(Outcome::metrics(vec![
        Metric::new("volume", "Volume", litres, "L", precision::PRODUCTION_VOLUME),
        Metric::new("volumeMl", "Volume", litres * 1000.0, "mL", precision::PRODUCTION_VOLUME),
        Metric::new("volumeM3", "Volume", litres / 1000.0, "m³", 3),
    ]))
}

/// `output / input × 100`.
///
/// # Errors
/// `input` not positive or a negative `output`.
pub fn yield_percent(input: f64, output: f64) -> Result<Outcome> {
    let input = require("input", input, Policy::Positive)?;
    let output = require("output", output, Policy::NonNegative)?;
    let percent = output / input * 100.0;
    Ok(Outcome::metrics(vec![Metric::new("yield", "Yield", percent, "%", precision::PERCENT)]))
}

/// Raw material consumed per unit produced.
///
/// # Errors
/// A negative `inputQuantity` or zero `units`.
#[allow(clippy::cast_precision_loss)]
pub fn consumption_per_unit(input_quantity: f64, units: u64) -> Result<Outcome> {
    let quantity = require("inputQuantity", input_quantity, Policy::NonNegative)?;
    if units == 0 {
        return Err(CalcError::invalid("units", "must be a whole number greater than zero"));
    }
    Ok(Outcome::metrics(vec![Metric::new(
        "consumptionPerUnit",
        "Consumption per unit",
        quantity / units as f64,
        "",
        precision::DEFAULT,
    )]))
}

/// Dye for a batch: `totalVolume × dosage`.
///
/// # Errors
/// Negative inputs.
pub fn dye_dosage(total_volume: f64, dosage: f64) -> Result<Outcome> {
    let volume = require("totalVolume", total_volume, Policy::NonNegative)?;
    let dosage = require("dosage", dosage, Policy::NonNegative)?;
    Ok(Outcome::metrics(vec![Metric::new("dye", "Dye", volume * dosage, "", precision::DEFAULT)]))
}

/// Standard beverage recipes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString, strum::EnumIter)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Beverage {
    Nectar,
    Refresco,
    #[strum(to_string = "juice", serialize = "suco")]
    Juice,
}

/// `(key, label, share per litre, unit)`
type Ingredient = (&'static str, &'static str, f64, &'static str);

impl Beverage {
    #[must_use]
    pub const fn recipe(self) -> &'static [Ingredient] {
        match self {
            Self::Nectar => &[
                ("fruitPulp", "Fruit pulp", 0.3, "L"),
                ("water", "Water", 0.58, "L"),
                ("sugar", "Sugar", 0.12, "kg"),
                ("citricAcid", "Citric acid", 0.002, "kg"),
            ],
            Self::Refresco => &[
                ("fruitPulp", "Fruit pulp", 0.15, "L"),
                ("water", "Water", 0.75, "L"),
                ("sugar", "Sugar", 0.10, "kg"),
                ("citricAcid", "Citric acid", 0.001, "kg"),
            ],
            Self::Juice => &[
                ("fruitPulp", "Fruit pulp", 0.98, "L"),
                ("water", "Water", 0.02, "L"),
                ("preservatives", "Preservatives", 0.0005, "kg"),
            ],
        }
    }
}

/// Ingredient quantities for `volume` litres of `beverage`.
///
/// # Errors
/// `volume` not positive.
pub fn formulation(beverage: Beverage, volume: f64) -> Result<Outcome> {
    let volume = require("volume", volume, Policy::Positive)?;
    let metrics = beverage
        .recipe()
        .iter()
        .map(|&(key, label, share, unit)| Metric::new(key, label, volume * share, unit, 3))
        .collect();
    Ok(Outcome::metrics(metrics).classified(beverage))
}
