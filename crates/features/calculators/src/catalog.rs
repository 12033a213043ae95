//! The list of calculators offered to users, with search.

use crate::binder::DEFAULT_TEMPERATURE;
use crate::engine::production::DEFAULT_DENSITY;
use crate::engine::weight::{DEFAULT_SPECIFIED_WEIGHT, DEFAULT_TOLERANCE_PERCENT};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

/// Identifier of a calculator, `snake_case` on the wire (`tank_dilution`).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::IntoStaticStr,
)]
#[cfg_attr(feature = "server", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CalculatorKind {
    NetWeight,
    GrossWeight,
    TareAverage,
    ProductionVolume,
    Yield,
    ConsumptionPerUnit,
    DyeDosage,
    Formulation,
    Ratio,
    FruitRatio,
    Density,
    TitratableAcidity,
    VitaminC,
    BrixCorrection,
    Solution,
    TankDilution,
    TankBlend,
    AcidityBlend,
    BrixIncrease,
    AcidityIncrease,
    AcidityReduction,
    ConcentrationDilution,
    UnitConversion,
    SugarConversion,
    Efficiency,
    ControlLimits,
    ProcessLoss,
    FinishingTime,
    Pasteurization,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[cfg_attr(feature = "server", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Production,
    Laboratory,
    Tanks,
    Conversions,
    Process,
}

/// One input of a calculator form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[cfg_attr(feature = "server", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub unit: &'static str,
    /// Value used when the field is left empty; `None` means required.
    pub default: Option<f64>,
}

const fn field(name: &'static str, label: &'static str, unit: &'static str) -> FieldSpec {
    FieldSpec { name, label, unit, default: None }
}

const fn defaulted(
    name: &'static str,
    label: &'static str,
    unit: &'static str,
    default: f64,
) -> FieldSpec {
    FieldSpec { name, label, unit, default: Some(default) }
}

type Entry = (&'static str, Category, &'static str, &'static [FieldSpec]);

const fn entry(
    name: &'static str,
    category: Category,
    description: &'static str,
    fields: &'static [FieldSpec],
) -> Entry {
    (name, category, description, fields)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[cfg_attr(feature = "server", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Descriptor {
    pub kind: CalculatorKind,
    pub name: &'static str,
    pub category: Category,
    pub description: &'static str,
    pub fields: &'static [FieldSpec],
}

impl CalculatorKind {
    /// Catalogue entry of this calculator.
    #[must_use]
    #[allow(clippy::too_many_lines)]
    pub const fn descriptor(self) -> Descriptor {
        use Category::{Conversions, Laboratory, Process, Production, Tanks};
        let (name, category, description, fields) = match self {
            Self::NetWeight => entry(
                "Net weight",
                Production,
                "Net weight of a package and whether it falls within the specified tolerance",
                const { &[
                    field("grossWeight", "Gross weight", "g"),
                    field("tare", "Tare", "g"),
                    defaulted("specifiedWeight", "Specified weight", "g", DEFAULT_SPECIFIED_WEIGHT),
                    defaulted("tolerancePercent", "Tolerance", "%", DEFAULT_TOLERANCE_PERCENT),
                ] },
            ),
            Self::GrossWeight => entry(
                "Gross weight",
                Production,
                "Gross weight from net weight and tare",
                const { &[field("netWeight", "Net weight", "g"), field("tare", "Tare", "g")] },
            ),
            Self::TareAverage => entry(
                "Tare average",
                Production,
                "Average weight of a sample of empty packages",
                const { &[field("weights", "Weights", "g")] },
            ),
            Self::ProductionVolume => entry(
                "Production volume",
                Production,
                "Volume produced from the weighed batch and its density",
                const { &[
                    field("totalWeight", "Total weight", "kg"),
                    defaulted("density", "Density", "kg/L", DEFAULT_DENSITY),
                ] },
            ),
            Self::Yield => entry(
                "Yield",
                Production,
                "Output as a percentage of input",
                const { &[field("input", "Input", ""), field("output", "Output", "")] },
            ),
            Self::ConsumptionPerUnit => entry(
                "Consumption per unit",
                Production,
                "Raw material consumed per unit produced",
                const { &[
                    field("inputQuantity", "Input quantity", ""),
                    field("units", "Units produced", ""),
                ] },
            ),
            Self::DyeDosage => entry(
                "Dye dosage",
                Production,
                "Dye needed for a batch volume",
                const { &[
                    field("totalVolume", "Total volume", "L"),
                    field("dosage", "Dosage", "per L"),
                ] },
            ),
            Self::Formulation => entry(
                "Beverage formulation",
                Production,
                "Ingredient quantities for nectar, refresco or juice",
                const { &[field("beverage", "Beverage", ""), field("volume", "Volume", "L")] },
            ),
            Self::Ratio => entry(
                "Ratio",
                Laboratory,
                "Brix/acidity ratio with balance classification",
                const { &[field("brix", "Brix", "°Bx"), field("acidity", "Acidity", "%")] },
            ),
            Self::FruitRatio => entry(
                "Fruit ratio",
                Laboratory,
                "Brix/acidity ratio graded against fruit-specific bands",
                const { &[
                    field("fruit", "Fruit", ""),
                    field("brix", "Brix", "°Bx"),
                    field("acidity", "Acidity", "%"),
                ] },
            ),
            Self::Density => entry(
                "Density",
                Laboratory,
                "Density from mass and volume",
                const { &[field("mass", "Mass", "g"), field("volume", "Volume", "mL")] },
            ),
            Self::TitratableAcidity => entry(
                "Titratable acidity",
                Laboratory,
                "Acidity by NaOH titration",
                const { &[
                    field("sampleVolume", "Sample volume", "mL"),
                    field("titrationFactor", "Titration factor", ""),
                    field("naohVolume", "NaOH volume", "mL"),
                ] },
            ),
            Self::VitaminC => entry(
                "Vitamin C",
                Laboratory,
                "Ascorbic acid by iodometric titration",
                const { &[
                    field("reagentVolume", "Reagent volume", "mL"),
                    field("reagentFactor", "Reagent factor", ""),
                    field("sampleVolume", "Sample volume", "mL"),
                ] },
            ),
            Self::BrixCorrection => entry(
                "Brix temperature correction",
                Laboratory,
                "Brix corrected for the sample temperature",
                const { &[
                    field("measuredBrix", "Measured Brix", "°Bx"),
                    defaulted("temperature", "Temperature", "°C", DEFAULT_TEMPERATURE),
                ] },
            ),
            Self::Solution => entry(
                "Solution preparation",
                Laboratory,
                "Solute needed for a percentage solution",
                const { &[
                    field("concentration", "Concentration", "%"),
                    field("volume", "Volume", "mL"),
                ] },
            ),
            Self::TankDilution => entry(
                "Tank dilution",
                Tanks,
                "Water needed to lower the Brix of a tank",
                const { &[
                    field("currentBrix", "Current Brix", "°Bx"),
                    field("targetBrix", "Target Brix", "°Bx"),
                    field("currentVolume", "Current volume", "L"),
                ] },
            ),
            Self::TankBlend => entry(
                "Tank blend",
                Tanks,
                "Brix of two tanks blended together",
                const { &[
                    field("volume1", "Volume 1", "L"),
                    field("brix1", "Brix 1", "°Bx"),
                    field("volume2", "Volume 2", "L"),
                    field("brix2", "Brix 2", "°Bx"),
                ] },
            ),
            Self::AcidityBlend => entry(
                "Acidity blend",
                Tanks,
                "Acidity of two tanks blended together",
                const { &[
                    field("volume1", "Volume 1", "L"),
                    field("acidity1", "Acidity 1", "%"),
                    field("volume2", "Volume 2", "L"),
                    field("acidity2", "Acidity 2", "%"),
                ] },
            ),
            Self::BrixIncrease => entry(
                "Brix increase",
                Tanks,
                "Sugar needed to raise the Brix of a tank",
                const { &[
                    field("currentBrix", "Current Brix", "°Bx"),
                    field("targetBrix", "Target Brix", "°Bx"),
                    field("volume", "Volume", "L"),
                ] },
            ),
            Self::AcidityIncrease => entry(
                "Acidity increase",
                Tanks,
                "Citric acid needed to raise the acidity of a tank",
                const { &[
                    field("currentAcidity", "Current acidity", "%"),
                    field("targetAcidity", "Target acidity", "%"),
                    field("volume", "Volume", "L"),
                ] },
            ),
            Self::AcidityReduction => entry(
                "Acidity correction",
                Tanks,
                "Correction for a juice above the target acidity",
                const { &[
                    field("currentAcidity", "Current acidity", "%"),
                    field("targetAcidity", "Target acidity", "%"),
                    field("juiceVolume", "Juice volume", "L"),
                ] },
            ),
            Self::ConcentrationDilution => entry(
                "Concentration dilution",
                Tanks,
                "Final concentration after dilution (C1V1 = C2V2)",
                const { &[
                    field("initialConcentration", "Initial concentration", ""),
                    field("initialVolume", "Initial volume", ""),
                    field("finalVolume", "Final volume", ""),
                ] },
            ),
            Self::UnitConversion => entry(
                "Unit conversion",
                Conversions,
                "Volume, mass, temperature and concentration units",
                const { &[
                    field("value", "Value", ""),
                    field("from", "From", ""),
                    field("to", "To", ""),
                ] },
            ),
            Self::SugarConversion => entry(
                "Sugar conversion",
                Conversions,
                "Crystal sugar to liquid sugar and back",
                const { &[field("direction", "Direction", ""), field("quantity", "Quantity", "")] },
            ),
            Self::Efficiency => entry(
                "Efficiency",
                Process,
                "Standard time as a percentage of actual time",
                const { &[
                    field("standardTime", "Standard time", "min"),
                    field("actualTime", "Actual time", "min"),
                ] },
            ),
            Self::ControlLimits => entry(
                "Control limits",
                Process,
                "Upper and lower control limits at three standard deviations",
                const { &[field("mean", "Mean", ""), field("stdDev", "Standard deviation", "")] },
            ),
            Self::ProcessLoss => entry(
                "Process loss",
                Process,
                "Weight lost between the start and end of a process",
                const { &[
                    field("initialWeight", "Initial weight", "kg"),
                    field("finalWeight", "Final weight", "kg"),
                ] },
            ),
            Self::FinishingTime => entry(
                "Finishing time",
                Process,
                "Time to empty a tank at a given flow rate",
                const { &[
                    field("totalVolume", "Total volume", "L"),
                    field("flowRate", "Flow rate", "L/h"),
                ] },
            ),
            Self::Pasteurization => entry(
                "Pasteurization units",
                Process,
                "Lethality of a heat treatment in pasteurization units",
                const { &[
                    field("temperature", "Temperature", "°C"),
                    field("time", "Time", "min"),
                ] },
            ),
        };
        Descriptor { kind: self, name, category, description, fields }
    }
}

/// Every calculator, in display order.
pub fn all() -> impl Iterator<Item = Descriptor> {
    CalculatorKind::iter().map(CalculatorKind::descriptor)
}

/// Shortest query [`search`] answers.
pub const MIN_QUERY_LEN: usize = 2;

/// Case-insensitive search over name, description and category.
///
/// Queries shorter than [`MIN_QUERY_LEN`] characters (after trimming) match nothing.
pub fn search(query: &str) -> Vec<Descriptor> {
    let needle = query.trim().to_lowercase();
    if needle.chars().count() < MIN_QUERY_LEN {
        return Vec::new();
    }
    all()
        .filter(|d| {
            d.name.to_lowercase().contains(&needle)
                || d.description.to_lowercase().contains(&needle)
                || d.category.to_string().to_lowercase().contains(&needle)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn ids_are_snake_case() {
        assert_eq!(CalculatorKind::TankDilution.to_string(), "tank_dilution");
        assert_eq!(CalculatorKind::from_str("vitamin_c").unwrap(), CalculatorKind::VitaminC);
        assert_eq!(serde_json::to_string(&CalculatorKind::NetWeight).unwrap(), "\"net_weight\"");
    }

    #[test]
    fn short_queries_match_nothing() {
        assert!(search("").is_empty());
        assert!(search(" t ").is_empty());
    }

    #[test]
    fn search_is_case_insensitive_over_all_text() {
        let by_name: Vec<_> = search("BRIX").into_iter().map(|d| d.kind).collect();
        assert!(by_name.contains(&CalculatorKind::BrixIncrease));
        assert!(by_name.contains(&CalculatorKind::TankDilution));

        let by_category = search("tanks");
        assert!(by_category.iter().all(|d| d.category == Category::Tanks));
        assert_eq!(by_category.len(), 7);
    }

    #[test]
    fn every_kind_has_fields() {
        assert!(all().all(|d| !d.fields.is_empty() && !d.name.is_empty()));
        assert_eq!(all().count(), 29);
    }
}
