//! Laboratory analyses: ratio, density, acidity, vitamin C, Brix correction.

use crate::error::Result;
use crate::input::{Policy, require};
use crate::outcome::{FruitGrade, IntoOutcome, Metric, Outcome, RatioBalance, precision};
use zelo_domain::factors::ConversionFactors;

/// Ratio below this is acidic.
pub const ACIDIC_BELOW: f64 = 12.0;
/// Ratio above this is sweet.
pub const SWEET_ABOVE: f64 = 18.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ratio {
    pub value: f64,
    pub balance: RatioBalance,
}

/// Brix/acidity ratio. `12 ≤ ratio ≤ 18` is balanced.
///
/// # Errors
/// `brix` or `acidity` not positive.
pub fn ratio(brix: f64, acidity: f64) -> Result<Ratio> {
    let brix = require("brix", brix, Policy::Positive)?;
    let acidity = require("acidity", acidity, Policy::Positive)?;
    let value = brix / acidity;
    let balance = if value < ACIDIC_BELOW {
        RatioBalance::Acidic
    } else if value > SWEET_ABOVE {
        RatioBalance::Sweet
    } else {
        RatioBalance::Balanced
    };
    Ok(Ratio { value, balance })
}

impl IntoOutcome for Ratio {
    fn into_outcome(self) -> Outcome {
        Outcome::metrics(vec![Metric::new("ratio", "Ratio", self.value, "", precision::RATIO)])
            .classified(self.balance)
    }
}

/// Fruit with its own ratio bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString, strum::EnumIter)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Fruit {
    #[strum(to_string = "orange", serialize = "laranja")]
    Orange,
    #[strum(to_string = "grape", serialize = "uva")]
    Grape,
    #[strum(to_string = "apple", serialize = "maca")]
    Apple,
    #[strum(to_string = "pineapple", serialize = "abacaxi")]
    Pineapple,
    /// Mango and anything without dedicated bands.
    #[strum(to_string = "other", serialize = "mango", serialize = "manga")]
    Other,
}

impl Fruit {
    /// Lower bounds (inclusive) of the ideal, high and very high grades.
    #[must_use]
    pub const fn bands(self) -> [f64; 3] {
        match self {
            Self::Orange => [8.0, 12.0, 18.0],
            Self::Grape => [15.0, 25.0, 35.0],
            Self::Apple => [20.0, 30.0, 40.0],
            Self::Pineapple => [10.0, 20.0, 30.0],
            Self::Other => [30.0, 60.0, 90.0],
        }
    }

    #[must_use]
    pub fn grade(self, ratio: f64) -> FruitGrade {
        let [ideal, high, very_high] = self.bands();
        if ratio < ideal {
            FruitGrade::Low
        } else if ratio < high {
            FruitGrade::Ideal
        } else if ratio < very_high {
            FruitGrade::High
        } else {
            FruitGrade::VeryHigh
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FruitRatio {
    pub fruit: Fruit,
    pub value: f64,
    pub grade: FruitGrade,
}

/// Ratio graded against the bands of `fruit`.
///
/// # Errors
/// `brix` or `acidity` not positive.
pub fn fruit_ratio(fruit: Fruit, brix: f64, acidity: f64) -> Result<FruitRatio> {
    let Ratio { value, .. } = ratio(brix, acidity)?;
    Ok(FruitRatio { fruit, value, grade: fruit.grade(value) })
}

impl IntoOutcome for FruitRatio {
    fn into_outcome(self) -> Outcome {
        Outcome::metrics(vec![Metric::new("ratio", "Ratio", self.value, "", precision::RATIO)])
            .classified(self.grade)
    }
}

/// `mass / volume` in g/mL, also reported in kg/m³.
///
/// # Errors
/// `mass` or `volume` not positive.
pub fn density(mass: f64, volume: f64) -> Result<Outcome> {
    let mass = require("mass", mass, Policy::Positive)?;
    let volume = require("volume", volume, Policy::Positive)?;
    let density = mass / volume;
    Ok(Outcome::metrics(vec![
        Metric::new("density", "Density", density, "g/mL", precision::DENSITY),
        Metric::new("densityKgM3", "Density", density * 1000.0, "kg/m³", precision::DENSITY),
    ]))
}

/// Titratable acidity `(naohVolume × titrationFactor × 100) / sampleVolume`, in percent.
///
/// # Errors
/// Any input not positive.
pub fn titratable_acidity(
    sample_volume: f64,
    titration_factor: f64,
    naoh_volume: f64,
) -> Result<Outcome> {
    let sample = require("sampleVolume", sample_volume, Policy::Positive)?;
    let factor = require("titrationFactor", titration_factor, Policy::Positive)?;
    let naoh = require("naohVolume", naoh_volume, Policy::Positive)?;
    let acidity = naoh * factor * 100.0 / sample;
    Ok(Outcome::metrics(vec![Metric::new(
        "acidity",
        "Titratable acidity",
        acidity,
        "%",
        precision::ACIDITY,
    )]))
}

/// Ascorbic acid by iodometric titration: `reagentVolume × reagentFactor / sampleVolume`.
///
/// # Errors
/// `sampleVolume` not positive, or a negative reagent input.
pub fn vitamin_c(reagent_volume: f64, reagent_factor: f64, sample_volume: f64) -> Result<Outcome> {
    let reagent = require("reagentVolume", reagent_volume, Policy::NonNegative)?;
    let factor = require("reagentFactor", reagent_factor, Policy::NonNegative)?;
    let sample = require("sampleVolume", sample_volume, Policy::Positive)?;
    Ok(Outcome::metrics(vec![Metric::new(
        "vitaminC",
        "Vitamin C",
        reagent * factor / sample,
        "mg/mL",
        precision::DEFAULT,
    )]))
}

/// Temperature-corrected Brix. The temperature is truncated to whole degrees to
/// look up the factor; temperatures without a factor are not corrected.
///
/// # Errors
/// Negative `measuredBrix` or a non-finite temperature.
pub fn brix_correction(
    measured_brix: f64,
    temperature: f64,
    factors: &ConversionFactors,
) -> Result<Outcome> {
    let brix = require("measuredBrix", measured_brix, Policy::NonNegative)?;
    let temperature = require("temperature", temperature, Policy::Finite)?;
    let factor = factors.brix_correction(temperature);
    Ok(Outcome::metrics(vec![
        Metric::new("correctedBrix", "Corrected Brix", brix * factor, "°Bx", precision::BRIX),
        Metric::new("factor", "Correction factor", factor, "", 3),
    ]))
}

/// Solute needed for a `concentration` % (m/v or v/v) solution of `volume`.
///
/// # Errors
/// Negative inputs.
pub fn solution(concentration: f64, volume: f64) -> Result<Outcome> {
    let concentration = require("concentration", concentration, Policy::NonNegative)?;
    let volume = require("volume", volume, Policy::NonNegative)?;
    Ok(Outcome::metrics(vec![Metric::new(
        "solute",
        "Solute",
        concentration * volume / 100.0,
        "g or mL",
        precision::DEFAULT,
    )]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn ratio_boundaries_are_balanced() {
        let balanced = Ratio { value: 12.0, balance: RatioBalance::Balanced };
        assert_eq!(ratio(12.0, 1.0).unwrap(), balanced);
        assert_eq!(ratio(18.0, 1.0).unwrap().balance, RatioBalance::Balanced);
        assert_eq!(ratio(11.9, 1.0).unwrap().balance, RatioBalance::Acidic);
        assert_eq!(ratio(18.1, 1.0).unwrap().balance, RatioBalance::Sweet);
    }

    #[test]
    fn ratio_rejects_non_positive() {
        assert_eq!(ratio(12.0, 0.0).unwrap_err().field(), Some("acidity"));
        assert_eq!(ratio(0.0, 1.0).unwrap_err().field(), Some("brix"));
    }

    #[test]
    fn fruit_bands_lower_bound_inclusive() {
        assert_eq!(Fruit::Orange.grade(7.99), FruitGrade::Low);
        assert_eq!(Fruit::Orange.grade(8.0), FruitGrade::Ideal);
        assert_eq!(Fruit::Orange.grade(12.0), FruitGrade::High);
        assert_eq!(Fruit::Orange.grade(18.0), FruitGrade::VeryHigh);
        assert_eq!(Fruit::Other.grade(45.0), FruitGrade::Ideal);
        assert_eq!(fruit_ratio(Fruit::Grape, 20.0, 1.0).unwrap().grade, FruitGrade::Ideal);
    }

    #[test]
    fn fruit_names_parse_in_both_languages() {
        assert_eq!(Fruit::from_str("Laranja").unwrap(), Fruit::Orange);
        assert_eq!(Fruit::from_str("mango").unwrap(), Fruit::Other);
        assert!(Fruit::from_str("kiwi").is_err());
    }

    #[test]
    fn density_three_decimals() {
        let outcome = density(200.0, 196.5).unwrap();
        let d = outcome.get("density").unwrap();
        assert_eq!(d.rounded(), 1.018);
        assert_eq!(d.to_string(), "Density: 1.018 g/mL");
        assert!(density(200.0, 0.0).is_err());
    }

    #[test]
    fn titratable_acidity_percent() {
        let outcome = titratable_acidity(10.0, 0.1, 5.0).unwrap();
        assert!((outcome.get("acidity").unwrap().value - 5.0).abs() < 1e-12);
        assert!(titratable_acidity(10.0, 0.0, 5.0).is_err());
    }

    #[test]
    fn brix_correction_uses_truncated_temperature() {
        let factors = ConversionFactors::default();
        let outcome = brix_correction(12.0, 25.9, &factors).unwrap();
        assert!((outcome.get("correctedBrix").unwrap().value - 11.88).abs() < 1e-9);
        let uncorrected = brix_correction(12.0, 22.0, &factors).unwrap();
        assert_eq!(uncorrected.get("correctedBrix").unwrap().value, 12.0);
    }
}
