//! Form binding: raw fields in, typed [`Calculation`] out, evaluated into a
//! [`CalculationReport`].

use crate::catalog::CalculatorKind;
use crate::engine::conversion::{SugarDirection, Unit};
use crate::engine::lab::Fruit;
use crate::engine::production::{Beverage, DEFAULT_DENSITY};
use crate::engine::weight::{DEFAULT_SPECIFIED_WEIGHT, DEFAULT_TOLERANCE_PERCENT};
use crate::engine::{conversion, lab, process, production, tank, weight};
use crate::error::{CalcError, Result};
use crate::input::{Form, FormFields};
use crate::outcome::{IntoOutcome, Outcome};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::debug;
use zelo_domain::factors::ConversionFactors;

/// Brix reading temperature assumed when the form leaves it empty, in °C.
pub const DEFAULT_TEMPERATURE: f64 = 20.0;

/// A fully parsed calculator invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum Calculation {
    NetWeight { gross: f64, tare: f64, specified: f64, tolerance_percent: f64 },
    GrossWeight { net: f64, tare: f64 },
    TareAverage { weights: Vec<f64> },
    ProductionVolume { total_weight: f64, density: f64 },
    Yield { input: f64, output: f64 },
    ConsumptionPerUnit { input_quantity: f64, units: u64 },
    DyeDosage { total_volume: f64, dosage: f64 },
    Formulation { beverage: Beverage, volume: f64 },
    Ratio { brix: f64, acidity: f64 },
    FruitRatio { fruit: Fruit, brix: f64, acidity: f64 },
    Density { mass: f64, volume: f64 },
    TitratableAcidity { sample_volume: f64, titration_factor: f64, naoh_volume: f64 },
    VitaminC { reagent_volume: f64, reagent_factor: f64, sample_volume: f64 },
    BrixCorrection { measured_brix: f64, temperature: f64 },
    Solution { concentration: f64, volume: f64 },
    TankDilution { current_brix: f64, target_brix: f64, current_volume: f64 },
    TankBlend { volume1: f64, brix1: f64, volume2: f64, brix2: f64 },
    AcidityBlend { volume1: f64, acidity1: f64, volume2: f64, acidity2: f64 },
    BrixIncrease { current_brix: f64, target_brix: f64, volume: f64 },
    AcidityIncrease { current_acidity: f64, target_acidity: f64, volume: f64 },
    AcidityReduction { current_acidity: f64, target_acidity: f64, juice_volume: f64 },
    ConcentrationDilution { initial_concentration: f64, initial_volume: f64, final_volume: f64 },
    UnitConversion { value: f64, from: Unit, to: Unit },
    SugarConversion { direction: SugarDirection, quantity: f64 },
    Efficiency { standard_time: f64, actual_time: f64 },
    ControlLimits { mean: f64, std_dev: f64 },
    ProcessLoss { initial_weight: f64, final_weight: f64 },
    FinishingTime { total_volume: f64, flow_rate: f64 },
    Pasteurization { temperature: f64, time: f64 },
}

impl Calculation {
    /// Reads the fields `kind` needs from `fields`. Extra fields are ignored.
    ///
    /// # Errors
    /// [`CalcError::InvalidInput`] naming the first field that is missing or unparsable.
    pub fn bind(kind: CalculatorKind, fields: &FormFields) -> Result<Self> {
        let f = Form::new(fields);
        Ok(match kind {
            CalculatorKind::NetWeight => Self::NetWeight {
                gross: f.number("grossWeight")?,
                tare: f.number("tare")?,
                specified: f.number_or("specifiedWeight", DEFAULT_SPECIFIED_WEIGHT)?,
                tolerance_percent: f.number_or("tolerancePercent", DEFAULT_TOLERANCE_PERCENT)?,
            },
            CalculatorKind::GrossWeight => Self::GrossWeight {
                net: f.number("netWeight")?,
                tare: f.number("tare")?,
            },
            CalculatorKind::TareAverage => Self::TareAverage { weights: f.numbers("weights")? },
            CalculatorKind::ProductionVolume => Self::ProductionVolume {
                total_weight: f.number("totalWeight")?,
                density: f.number_or("density", DEFAULT_DENSITY)?,
            },
            CalculatorKind::Yield => Self::Yield {
                input: f.number("input")?,
                output: f.number("output")?,
            },
            CalculatorKind::ConsumptionPerUnit => Self::ConsumptionPerUnit {
                input_quantity: f.number("inputQuantity")?,
                units: f.count("units")?,
            },
            CalculatorKind::DyeDosage => Self::DyeDosage {
                total_volume: f.number("totalVolume")?,
                dosage: f.number("dosage")?,
            },
            CalculatorKind::Formulation => Self::Formulation {
                beverage: f.choice_or("beverage", Beverage::Nectar)?,
                volume: f.number("volume")?,
            },
            CalculatorKind::Ratio => Self::Ratio {
                brix: f.number("brix")?,
                acidity: f.number("acidity")?,
            },
            CalculatorKind::FruitRatio => Self::FruitRatio {
                fruit: f.choice_or("fruit", Fruit::Orange)?,
                brix: f.number("brix")?,
                acidity: f.number("acidity")?,
            },
            CalculatorKind::Density => Self::Density {
                mass: f.number("mass")?,
                volume: f.number("volume")?,
            },
            CalculatorKind::TitratableAcidity => Self::TitratableAcidity {
                sample_volume: f.number("sampleVolume")?,
                titration_factor: f.number("titrationFactor")?,
                naoh_volume: f.number("naohVolume")?,
            },
            CalculatorKind::VitaminC => Self::VitaminC {
                reagent_volume: f.number("reagentVolume")?,
                reagent_factor: f.number("reagentFactor")?,
                sample_volume: f.number("sampleVolume")?,
            },
            CalculatorKind::BrixCorrection => Self::BrixCorrection {
                measured_brix: f.number("measuredBrix")?,
                temperature: f.number_or("temperature", DEFAULT_TEMPERATURE)?,
            },
            CalculatorKind::Solution => Self::Solution {
                concentration: f.number("concentration")?,
                volume: f.number("volume")?,
            },
            CalculatorKind::TankDilution => Self::TankDilution {
                current_brix: f.number("currentBrix")?,
                target_brix: f.number("targetBrix")?,
                current_volume: f.number("currentVolume")?,
            },
            CalculatorKind::TankBlend => Self::TankBlend {
                volume1: f.number("volume1")?,
                brix1: f.number("brix1")?,
                volume2: f.number("volume2")?,
                brix2: f.number("brix2")?,
            },
            CalculatorKind::AcidityBlend => Self::AcidityBlend {
                volume1: f.number("volume1")?,
                acidity1: f.number("acidity1")?,
                volume2: f.number("volume2")?,
                acidity2: f.number("acidity2")?,
            },
            CalculatorKind::BrixIncrease => Self::BrixIncrease {
                current_brix: f.number("currentBrix")?,
                target_brix: f.number("targetBrix")?,
                volume: f.number("volume")?,
            },
            CalculatorKind::AcidityIncrease => Self::AcidityIncrease {
                current_acidity: f.number("currentAcidity")?,
                target_acidity: f.number("targetAcidity")?,
                volume: f.number("volume")?,
            },
            CalculatorKind::AcidityReduction => Self::AcidityReduction {
                current_acidity: f.number("currentAcidity")?,
                target_acidity: f.number("targetAcidity")?,
                juice_volume: f.number("juiceVolume")?,
            },
            CalculatorKind::ConcentrationDilution => Self::ConcentrationDilution {
                initial_concentration: f.number("initialConcentration")?,
                initial_volume: f.number("initialVolume")?,
                final_volume: f.number("finalVolume")?,
            },
            CalculatorKind::UnitConversion => Self::UnitConversion {
                value: f.number("value")?,
                from: f.choice("from")?,
                to: f.choice("to")?,
            },
            CalculatorKind::SugarConversion => Self::SugarConversion {
                direction: f.choice_or("direction", SugarDirection::CrystalToLiquid)?,
                quantity: f.number("quantity")?,
            },
            CalculatorKind::Efficiency => Self::Efficiency {
                standard_time: f.number("standardTime")?,
                actual_time: f.number("actualTime")?,
            },
            CalculatorKind::ControlLimits => Self::ControlLimits {
                mean: f.number("mean")?,
                std_dev: f.number("stdDev")?,
            },
            CalculatorKind::ProcessLoss => Self::ProcessLoss {
                initial_weight: f.number("initialWeight")?,
                final_weight: f.number("finalWeight")?,
            },
            CalculatorKind::FinishingTime => Self::FinishingTime {
                total_volume: f.number("totalVolume")?,
                flow_rate: f.number("flowRate")?,
            },
            CalculatorKind::Pasteurization => Self::Pasteurization {
                temperature: f.number("temperature")?,
                time: f.number("time")?,
            },
        })
    }

    /// Runs the formula.
    ///
    /// # Errors
    /// [`CalcError::InvalidInput`] for out-of-domain values and
    /// [`CalcError::NonFinite`] when a result overflows.
    pub fn evaluate(&self, factors: &ConversionFactors) -> Result<Outcome> {
        let outcome = match *self {
            Self::NetWeight { gross, tare, specified, tolerance_percent } => {
                weight::net_weight(gross, tare, specified, tolerance_percent)?.into_outcome()
            },
            Self::GrossWeight { net, tare } => weight::gross_weight(net, tare)?,
            Self::TareAverage { ref weights } => weight::tare_average(weights)?,
            Self::ProductionVolume { total_weight, density } => {
                production::production_volume(total_weight, density)?
            },
            Self::Yield { input, output } => production::yield_percent(input, output)?,
            Self::ConsumptionPerUnit { input_quantity, units } => {
                production::consumption_per_unit(input_quantity, units)?
            },
            Self::DyeDosage { total_volume, dosage } => {
                production::dye_dosage(total_volume, dosage)?
            },
            Self::Formulation { beverage, volume } => production::formulation(beverage, volume)?,
            Self::Ratio { brix, acidity } => lab::ratio(brix, acidity)?.into_outcome(),
            Self::FruitRatio { fruit, brix, acidity } => {
                lab::fruit_ratio(fruit, brix, acidity)?.into_outcome()
            },
            Self::Density { mass, volume } => lab::density(mass, volume)?,
            Self::TitratableAcidity { sample_volume, titration_factor, naoh_volume } => {
                lab::titratable_acidity(sample_volume, titration_factor, naoh_volume)?
            },
            Self::VitaminC { reagent_volume, reagent_factor, sample_volume } => {
                lab::vitamin_c(reagent_volume, reagent_factor, sample_volume)?
            },
            Self::BrixCorrection { measured_brix, temperature } => {
                lab::brix_correction(measured_brix, temperature, factors)?
            },
            Self::Solution { concentration, volume } => lab::solution(concentration, volume)?,
            Self::TankDilution { current_brix, target_brix, current_volume } => {
                tank::tank_dilution(current_brix, target_brix, current_volume)?.into_outcome()
            },
            Self::TankBlend { volume1, brix1, volume2, brix2 } => {
                tank::tank_blend(volume1, brix1, volume2, brix2)?.into_outcome()
            },
            Self::AcidityBlend { volume1, acidity1, volume2, acidity2 } => {
                tank::acidity_blend(volume1, acidity1, volume2, acidity2)?.into_outcome()
            },
            Self::BrixIncrease { current_brix, target_brix, volume } => {
                tank::brix_increase(current_brix, target_brix, volume)?.into_outcome()
            },
            Self::AcidityIncrease { current_acidity, target_acidity, volume } => {
                let citric = factors.citric_acid;
                tank::acidity_increase(current_acidity, target_acidity, volume, citric)?
                    .into_outcome()
            },
            Self::AcidityReduction { current_acidity, target_acidity, juice_volume } => {
                let citric = factors.citric_acid;
                tank::acidity_reduction(current_acidity, target_acidity, juice_volume, citric)?
                    .into_outcome()
            },
            Self::ConcentrationDilution { initial_concentration, initial_volume, final_volume } => {
                tank::concentration_dilution(initial_concentration, initial_volume, final_volume)?
                    .into_outcome()
            },
            Self::UnitConversion { value, from, to } => {
                conversion::unit_conversion(value, from, to)?
            },
            Self::SugarConversion { direction, quantity } => {
                conversion::sugar_conversion(direction, quantity, factors)?
            },
            Self::Efficiency { standard_time, actual_time } => {
                process::efficiency(standard_time, actual_time)?
            },
            Self::ControlLimits { mean, std_dev } => process::control_limits(mean, std_dev)?,
            Self::ProcessLoss { initial_weight, final_weight } => {
                process::process_loss(initial_weight, final_weight)?
            },
            Self::FinishingTime { total_volume, flow_rate } => {
                process::finishing_time(total_volume, flow_rate)?
            },
            Self::Pasteurization { temperature, time } => {
                process::pasteurization_units(temperature, time)?.into_outcome()
            },
        };

        if let Some(metric) = outcome.metrics.iter().find(|m| !m.value.is_finite()) {
            return Err(CalcError::NonFinite { metric: metric.key, context: None });
        }
        Ok(outcome)
    }
}

/// A calculator invocation as submitted by a form or an API client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "server", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct CalculationRequest {
    /// Calculator id, e.g. `tank_dilution`.
    pub kind: String,
    #[serde(default)]
    pub fields: FormFields,
}

/// The displayable answer to a [`CalculationRequest`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "server", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct CalculationReport {
    pub kind: CalculatorKind,
    pub outcome: Outcome,
    /// `outcome` rendered with the canonical precision of each metric.
    pub lines: Vec<String>,
}

/// Binds and evaluates a request in one step.
///
/// # Errors
/// [`CalcError::UnknownKind`] for an id outside the catalogue, otherwise see
/// [`Calculation::bind`] and [`Calculation::evaluate`].
pub fn calculate(
    request: &CalculationRequest,
    factors: &ConversionFactors,
) -> Result<CalculationReport> {
    let kind = CalculatorKind::from_str(request.kind.trim())
        .map_err(|_| CalcError::UnknownKind { kind: request.kind.clone(), context: None })?;
    let calculation = Calculation::bind(kind, &request.fields)?;
    let outcome = calculation.evaluate(factors)?;
    debug!(%kind, possible = outcome.possible, "Calculation evaluated");
    let lines = outcome.lines();
    Ok(CalculationReport { kind, outcome, lines })
}
