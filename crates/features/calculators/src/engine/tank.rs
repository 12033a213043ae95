//! Tank adjustments: dilution, blending and Brix/acidity corrections.

use crate::error::Result;
use crate::input::{Policy, require};
use crate::outcome::{Feasibility, IntoOutcome, Metric, Outcome, precision};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dilution {
    pub water_to_add: f64,
    pub final_volume: f64,
}

/// Water needed to bring a tank from `currentBrix` down to `targetBrix`:
/// `currentVolume × (currentBrix / targetBrix − 1)`.
///
/// Not possible when the tank is already at or below the target.
///
/// # Errors
/// `targetBrix` or `currentVolume` not positive, or a negative `currentBrix`.
pub fn tank_dilution(
    current_brix: f64,
    target_brix: f64,
    current_volume: f64,
) -> Result<Feasibility<Dilution>> {
    let current = require("currentBrix", current_brix, Policy::NonNegative)?;
    let target = require("targetBrix", target_brix, Policy::Positive)?;
    let volume = require("currentVolume", current_volume, Policy::Positive)?;
    if current <= target {
        return Ok(Feasibility::not_possible("current Brix is already at or below the target"));
    }
    let water_to_add = volume * (current / target - 1.0);
    Ok(Feasibility::Possible(Dilution { water_to_add, final_volume: volume + water_to_add }))
}

impl IntoOutcome for Dilution {
    fn into_outcome(self) -> Outcome {
        Outcome::metrics(vec![
            Metric::new("waterToAdd", "Water to add", self.water_to_add, "L", precision::VOLUME),
            Metric::new("finalVolume", "Final volume", self.final_volume, "L", precision::VOLUME),
        ])
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Blend {
    /// Volume-weighted average of the blended property.
    pub value: f64,
    pub total_volume: f64,
}

fn weighted(v1: f64, x1: f64, v2: f64, x2: f64) -> Feasibility<Blend> {
    let total_volume = v1 + v2;
    if total_volume <= 0.0 {
        return Feasibility::not_possible("total volume is zero");
    }
    Feasibility::Possible(Blend { value: (v1 * x1 + v2 * x2) / total_volume, total_volume })
}

/// Brix of two tanks blended together.
///
/// # Errors
/// Negative volumes or Brix values.
pub fn tank_blend(
    volume1: f64,
    brix1: f64,
    volume2: f64,
    brix2: f64,
) -> Result<Feasibility<BrixBlend>> {
    let v1 = require("volume1", volume1, Policy::NonNegative)?;
    let b1 = require("brix1", brix1, Policy::NonNegative)?;
    let v2 = require("volume2", volume2, Policy::NonNegative)?;
    let b2 = require("brix2", brix2, Policy::NonNegative)?;
    Ok(match weighted(v1, b1, v2, b2) {
        Feasibility::Possible(blend) => Feasibility::Possible(BrixBlend(blend)),
        Feasibility::NotPossible { message } => Feasibility::NotPossible { message },
    })
}

/// Acidity of two tanks blended together.
///
/// # Errors
/// Negative volumes or acidity values.
pub fn acidity_blend(
    volume1: f64,
    acidity1: f64,
    volume2: f64,
    acidity2: f64,
) -> Result<Feasibility<AcidityBlend>> {
    let v1 = require("volume1", volume1, Policy::NonNegative)?;
    let a1 = require("acidity1", acidity1, Policy::NonNegative)?;
    let v2 = require("volume2", volume2, Policy::NonNegative)?;
    let a2 = require("acidity2", acidity2, Policy::NonNegative)?;
    Ok(match weighted(v1, a1, v2, a2) {
        Feasibility::Possible(blend) => Feasibility::Possible(AcidityBlend(blend)),
        Feasibility::NotPossible { message } => Feasibility::NotPossible { message },
    })
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrixBlend(pub Blend);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AcidityBlend(pub Blend);

impl IntoOutcome for BrixBlend {
    fn into_outcome(self) -> Outcome {
        Outcome::metrics(vec![
            Metric::new("brixFinal", "Final Brix", self.0.value, "°Bx", precision::BRIX),
            Metric::new("totalVolume", "Total volume", self.0.total_volume, "L", precision::VOLUME),
        ])
    }
}

impl IntoOutcome for AcidityBlend {
    fn into_outcome(self) -> Outcome {
        Outcome::metrics(vec![
            Metric::new("acidityFinal", "Final acidity", self.0.value, "%", precision::ACIDITY),
            Metric::new("totalVolume", "Total volume", self.0.total_volume, "L", precision::VOLUME),
        ])
    }
}

/// Sugar to dissolve to raise the Brix: `(target − current) × volume / 10` kg,
/// i.e. 1 kg per 10 L per degree.
///
/// # Errors
/// Negative `currentBrix`, or `targetBrix`/`volume` not positive.
pub fn brix_increase(
    current_brix: f64,
    target_brix: f64,
    volume: f64,
) -> Result<Feasibility<Outcome>> {
    let current = require("currentBrix", current_brix, Policy::NonNegative)?;
    let target = require("targetBrix", target_brix, Policy::Positive)?;
    let volume = require("volume", volume, Policy::Positive)?;
    if current >= target {
        return Ok(Feasibility::not_possible("target Brix must be above the current Brix"));
    }
    Ok(Feasibility::Possible(Outcome::metrics(vec![Metric::new(
        "sugar",
        "Sugar to add",
        (target - current) * volume / 10.0,
        "kg",
        precision::WEIGHT,
    )])))
}

/// Citric acid to add: `(target − current) × volume × citricFactor`.
///
/// # Errors
/// Negative acidities, or `volume`/`citric_factor` not positive.
pub fn acidity_increase(
    current_acidity: f64,
    target_acidity: f64,
    volume: f64,
    citric_factor: f64,
) -> Result<Feasibility<Outcome>> {
    let current = require("currentAcidity", current_acidity, Policy::NonNegative)?;
    let target = require("targetAcidity", target_acidity, Policy::NonNegative)?;
    let volume = require("volume", volume, Policy::Positive)?;
    let factor = require("acido_citrico_fator", citric_factor, Policy::Positive)?;
    if current >= target {
        return Ok(Feasibility::not_possible("target acidity must be above the current acidity"));
    }
    Ok(Feasibility::Possible(citric_acid((target - current) * volume * factor)))
}

/// Correction for an over-acidic juice: `|target − current| × juiceVolume × citricFactor`.
///
/// # Errors
/// Negative acidities, or `juiceVolume`/`citric_factor` not positive.
pub fn acidity_reduction(
    current_acidity: f64,
    target_acidity: f64,
    juice_volume: f64,
    citric_factor: f64,
) -> Result<Feasibility<Outcome>> {
    let current = require("currentAcidity", current_acidity, Policy::NonNegative)?;
    let target = require("targetAcidity", target_acidity, Policy::NonNegative)?;
    let volume = require("juiceVolume", juice_volume, Policy::Positive)?;
    let factor = require("acido_citrico_fator", citric_factor, Policy::Positive)?;
    if current <= target {
        return Ok(Feasibility::not_possible("current acidity must be above the target acidity"));
    }
    Ok(Feasibility::Possible(citric_acid((target - current).abs() * volume * factor)))
}

fn citric_acid(grams: f64) -> Outcome {
    Outcome::metrics(vec![Metric::new("citricAcid", "Citric acid", grams, "g", precision::WEIGHT)])
}

/// `C1 × V1 = C2 × V2`: concentration after topping up to `finalVolume`.
///
/// # Errors
/// Negative `initialConcentration`, or volumes not positive.
pub fn concentration_dilution(
    initial_concentration: f64,
    initial_volume: f64,
    final_volume: f64,
) -> Result<Feasibility<Outcome>> {
    let c1 = require("initialConcentration", initial_concentration, Policy::NonNegative)?;
    let v1 = require("initialVolume", initial_volume, Policy::Positive)?;
    let v2 = require("finalVolume", final_volume, Policy::Positive)?;
    if v2 <= v1 {
        return Ok(Feasibility::not_possible("final volume must be larger than the initial volume"));
    }
    let concentration = c1 * v1 / v2;
    Ok(Feasibility::Possible(Outcome::metrics(vec![
        Metric::new(
            "finalConcentration",
            "Final concentration",
            concentration,
            "",
            precision::DEFAULT,
        ),
        Metric::new("diluent", "Diluent to add", v2 - v1, "", precision::VOLUME),
    ])))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dilution_of_concentrate() {
        let d = tank_dilution(65.0, 11.0, 100.0).unwrap().possible().unwrap();
        assert!((d.water_to_add - 490.909_090).abs() < 1e-5);
        assert!((d.final_volume - 590.909_090).abs() < 1e-5);

        let outcome = d.into_outcome();
        assert_eq!(outcome.lines()[0], "Water to add: 490.91 L");
        assert_eq!(outcome.lines()[1], "Final volume: 590.91 L");
    }

    #[test]
    fn dilution_below_target_is_not_possible() {
        assert!(!tank_dilution(10.0, 11.0, 100.0).unwrap().is_possible());
        assert!(!tank_dilution(11.0, 11.0, 100.0).unwrap().is_possible());
        assert_eq!(tank_dilution(65.0, 0.0, 100.0).unwrap_err().field(), Some("targetBrix"));
    }

    #[test]
    fn blend_is_volume_weighted() {
        let b = tank_blend(100.0, 10.0, 200.0, 16.0).unwrap().possible().unwrap();
        assert_eq!(b.0.value, 14.0);
        assert_eq!(b.0.total_volume, 300.0);
    }

    #[test]
    fn blend_of_empty_tanks_is_not_possible() {
        let outcome = tank_blend(0.0, 10.0, 0.0, 16.0).unwrap().into_outcome();
        assert!(!outcome.possible);
        assert!(tank_blend(-1.0, 10.0, 0.0, 16.0).is_err());
        assert!(!acidity_blend(0.0, 0.5, 0.0, 0.7).unwrap().is_possible());
    }

    #[test]
    fn corrections_respect_direction() {
        let sugar = brix_increase(10.0, 12.0, 1000.0).unwrap().possible().unwrap();
        assert_eq!(sugar.get("sugar").unwrap().value, 200.0);
        assert!(!brix_increase(12.0, 12.0, 1000.0).unwrap().is_possible());

        let acid = acidity_increase(0.5, 0.75, 100.0, 1.0).unwrap().possible().unwrap();
        assert_eq!(acid.get("citricAcid").unwrap().value, 25.0);
        assert!(!acidity_increase(0.8, 0.75, 100.0, 1.0).unwrap().is_possible());

        let reduction = acidity_reduction(1.0, 0.75, 100.0, 1.0).unwrap().possible().unwrap();
        assert_eq!(reduction.get("citricAcid").unwrap().value, 25.0);
        assert!(!acidity_reduction(0.5, 0.75, 100.0, 1.0).unwrap().is_possible());
    }

    #[test]
    fn c1v1_requires_larger_final_volume() {
        let out = concentration_dilution(10.0, 100.0, 400.0).unwrap().possible().unwrap();
        assert_eq!(out.get("finalConcentration").unwrap().value, 2.5);
        assert!(!concentration_dilution(10.0, 100.0, 100.0).unwrap().is_possible());
    }
}
