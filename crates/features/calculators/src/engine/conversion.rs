//! Unit conversions and crystal/liquid sugar equivalence.

use crate::error::{CalcError, Result};
use crate::input::{Policy, require};
use crate::outcome::{Metric, Outcome, precision};
use zelo_domain::factors::ConversionFactors;

/// US liquid gallon, in litres.
pub const LITRES_PER_GALLON: f64 = 3.785_41;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Dimension {
    Volume,
    Mass,
    Temperature,
    Concentration,
}

/// Units understood by [`convert`]. Parsing is case-insensitive and accepts the
/// short aliases used on the plant forms (`ton`, `mgL`, `perc`, ...).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::IntoStaticStr,
)]
#[strum(ascii_case_insensitive)]
pub enum Unit {
    #[strum(to_string = "L", serialize = "l")]
    Litre,
    #[strum(to_string = "mL")]
    Millilitre,
    #[strum(to_string = "m³", serialize = "m3")]
    CubicMetre,
    #[strum(to_string = "gal")]
    Gallon,
    #[strum(to_string = "mg")]
    Milligram,
    #[strum(to_string = "g")]
    Gram,
    #[strum(to_string = "kg")]
    Kilogram,
    #[strum(to_string = "t", serialize = "ton")]
    Tonne,
    #[strum(to_string = "°C", serialize = "C")]
    Celsius,
    #[strum(to_string = "°F", serialize = "F")]
    Fahrenheit,
    #[strum(to_string = "K")]
    Kelvin,
    #[strum(to_string = "ppm")]
    Ppm,
    #[strum(to_string = "ppb")]
    Ppb,
    #[strum(to_string = "mg/L", serialize = "mgL")]
    MilligramPerLitre,
    #[strum(to_string = "g/L", serialize = "gL")]
    GramPerLitre,
    #[strum(to_string = "%", serialize = "perc")]
    Percent,
}

impl Unit {
    #[must_use]
    pub const fn dimension(self) -> Dimension {
        match self {
            Self::Litre | Self::Millilitre | Self::CubicMetre | Self::Gallon => Dimension::Volume,
            Self::Milligram | Self::Gram | Self::Kilogram | Self::Tonne => Dimension::Mass,
            Self::Celsius | Self::Fahrenheit | Self::Kelvin => Dimension::Temperature,
            Self::Ppm
            | Self::Ppb
            | Self::MilligramPerLitre
            | Self::GramPerLitre
            | Self::Percent => Dimension::Concentration,
        }
    }

    /// Multiplier to the dimension's base unit (L, g, ppm). Temperatures are
    /// affine and handled separately.
    const fn scale(self) -> f64 {
        match self {
            Self::Litre | Self::Gram | Self::Ppm | Self::MilligramPerLitre => 1.0,
            Self::Millilitre | Self::Milligram | Self::Ppb => 0.001,
            Self::CubicMetre | Self::Kilogram | Self::GramPerLitre => 1000.0,
            Self::Gallon => LITRES_PER_GALLON,
            Self::Tonne => 1_000_000.0,
            Self::Percent => 10_000.0,
            Self::Celsius | Self::Fahrenheit | Self::Kelvin => 1.0,
        }
    }
}

fn to_celsius(value: f64, unit: Unit) -> f64 {
    match unit {
        Unit::Fahrenheit => (value - 32.0) * 5.0 / 9.0,
        Unit::Kelvin => value - 273.15,
        _ => value,
    }
}

fn from_celsius(value: f64, unit: Unit) -> f64 {
    match unit {
        Unit::Fahrenheit => value * 9.0 / 5.0 + 32.0,
        Unit::Kelvin => value + 273.15,
        _ => value,
    }
}

/// Converts `value` between two units of the same dimension.
///
/// # Errors
/// Units of different dimensions, a negative quantity, or a temperature below
/// absolute zero.
pub fn convert(value: f64, from: Unit, to: Unit) -> Result<f64> {
    if from.dimension() != to.dimension() {
        return Err(CalcError::invalid(
            "to",
            format!("cannot convert {} ({from}) to {} ({to})", from.dimension(), to.dimension()),
        ));
    }
    if from.dimension() == Dimension::Temperature {
        let celsius = to_celsius(require("value", value, Policy::Finite)?, from);
        if celsius < -273.15 {
            return Err(CalcError::invalid("value", "is below absolute zero"));
        }
        return Ok(from_celsius(celsius, to));
    }
    let value = require("value", value, Policy::NonNegative)?;
    Ok(value * from.scale() / to.scale())
}

/// [`convert`] as a displayable outcome.
///
/// # Errors
/// See [`convert`].
pub fn unit_conversion(value: f64, from: Unit, to: Unit) -> Result<Outcome> {
    let converted = convert(value, from, to)?;
    let digits = if from.dimension() == Dimension::Temperature { precision::DEFAULT } else { 4 };
    Ok(Outcome::metrics(vec![Metric::new("converted", "Converted", converted, to.into(), digits)]))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString, strum::EnumIter)]
#[strum(serialize_all = "camelCase", ascii_case_insensitive)]
pub enum SugarDirection {
    #[strum(to_string = "crystalToLiquid", serialize = "cristal_to_liquido")]
    CrystalToLiquid,
    #[strum(to_string = "liquidToCrystal", serialize = "liquido_to_cristal")]
    LiquidToCrystal,
}

/// Crystal sugar (kg) to liquid sugar (L) or back, using the active factors.
///
/// # Errors
/// A negative `quantity`.
pub fn sugar_conversion(
    direction: SugarDirection,
    quantity: f64,
    factors: &ConversionFactors,
) -> Result<Outcome> {
    let quantity = require("quantity", quantity, Policy::NonNegative)?;
    let (factor, unit) = match direction {
        SugarDirection::CrystalToLiquid => (factors.crystal_to_liquid, "L"),
        SugarDirection::LiquidToCrystal => (factors.liquid_to_crystal, "kg"),
    };
    Ok(Outcome::metrics(vec![
        Metric::new("converted", "Converted", quantity * factor, unit, precision::DEFAULT),
        Metric::new("factor", "Factor", factor, "", 3),
    ])
    .classified(direction))
}
