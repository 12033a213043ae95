//! Line and process control.

use crate::error::Result;
use crate::input::{Policy, require};
use crate::outcome::{Feasibility, Metric, Outcome, precision};

/// Reference temperature of the pasteurization unit, in °C.
pub const PU_REFERENCE_TEMPERATURE: f64 = 60.0;
/// Lethality base per degree above the reference.
pub const PU_BASE: f64 = 1.393;

/// `standardTime / actualTime × 100`.
///
/// # Errors
/// `actualTime` not positive or a negative `standardTime`.
pub fn efficiency(standard_time: f64, actual_time: f64) -> Result<Outcome> {
    let standard = require("standardTime", standard_time, Policy::NonNegative)?;
    let actual = require("actualTime", actual_time, Policy::Positive)?;
    Ok(Outcome::metrics(vec![Metric::new(
        "efficiency",
        "Efficiency",
        standard / actual * 100.0,
        "%",
        precision::PERCENT,
    )]))
}

/// Shewhart limits `mean ± 3σ`.
///
/// # Errors
/// A negative `stdDev`.
pub fn control_limits(mean: f64, std_dev: f64) -> Result<Outcome> {
    let mean = require("mean", mean, Policy::Finite)?;
    let sigma = require("stdDev", std_dev, Policy::NonNegative)?;
    Ok(Outcome::metrics(vec![
        Metric::new("ucl", "Upper control limit", mean + 3.0 * sigma, "", precision::CONTROL_LIMIT),
        Metric::new("centerLine", "Center line", mean, "", precision::CONTROL_LIMIT),
        Metric::new("lcl", "Lower control limit", mean - 3.0 * sigma, "", precision::CONTROL_LIMIT),
    ]))
}

/// Weight lost in processing, `(initial − final) / initial × 100`. Negative when
/// the batch gained weight.
///
/// # Errors
/// `initialWeight` not positive or a negative `finalWeight`.
pub fn process_loss(initial_weight: f64, final_weight: f64) -> Result<Outcome> {
    let initial = require("initialWeight", initial_weight, Policy::Positive)?;
    let last = require("finalWeight", final_weight, Policy::NonNegative)?;
    Ok(Outcome::metrics(vec![
        Metric::new("loss", "Loss", (initial - last) / initial * 100.0, "%", precision::PERCENT),
        Metric::new("lostWeight", "Lost weight", initial - last, "kg", precision::WEIGHT),
    ]))
}

/// Time to run a tank empty at `flowRate` (L/h).
///
/// # Errors
/// `flowRate` not positive or a negative `totalVolume`.
pub fn finishing_time(total_volume: f64, flow_rate: f64) -> Result<Outcome> {
    let volume = require("totalVolume", total_volume, Policy::NonNegative)?;
    let flow = require("flowRate", flow_rate, Policy::Positive)?;
    let hours = volume / flow;
    Ok(Outcome::metrics(vec![
        Metric::new("hours", "Time", hours, "h", precision::DEFAULT),
        Metric::new("minutes", "Time", hours * 60.0, "min", 0),
    ]))
}

/// Pasteurization units `PU = time × 1.393^(temperature − 60)`.
///
/// Not possible below the 60 °C reference.
///
/// # Errors
/// A negative `time` or a non-finite `temperature`.
pub fn pasteurization_units(temperature: f64, time: f64) -> Result<Feasibility<Outcome>> {
    let temperature = require("temperature", temperature, Policy::Finite)?;
    let minutes = require("time", time, Policy::NonNegative)?;
    if temperature < PU_REFERENCE_TEMPERATURE {
        return Ok(Feasibility::not_possible("temperature must be at least 60 °C"));
    }
    let pu = minutes * PU_BASE.powf(temperature - PU_REFERENCE_TEMPERATURE);
    let metric = Metric::new("pu", "Pasteurization units", pu, "PU", precision::DEFAULT);
    Ok(Feasibility::Possible(Outcome::metrics(vec![metric])))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_limits_three_sigma() {
        let outcome = control_limits(10.0, 0.5).unwrap();
        assert_eq!(outcome.get("ucl").unwrap().value, 11.5);
        assert_eq!(outcome.get("lcl").unwrap().value, 8.5);
        assert_eq!(outcome.lines()[0], "Upper control limit: 11.500");
        assert!(control_limits(10.0, -0.1).is_err());
    }

    #[test]
    fn pasteurization_reference_point() {
        let at_reference = pasteurization_units(60.0, 10.0).unwrap().possible().unwrap();
        assert_eq!(at_reference.get("pu").unwrap().value, 10.0);

        let hotter = pasteurization_units(62.0, 1.0).unwrap().possible().unwrap();
        assert!((hotter.get("pu").unwrap().value - 1.393 * 1.393).abs() < 1e-12);

        assert!(!pasteurization_units(59.9, 10.0).unwrap().is_possible());
        assert!(pasteurization_units(70.0, -1.0).is_err());
    }

    #[test]
    fn loss_efficiency_and_time() {
        assert_eq!(process_loss(200.0, 190.0).unwrap().get("loss").unwrap().value, 5.0);
        assert_eq!(efficiency(45.0, 60.0).unwrap().metrics[0].value, 75.0);
        assert!(efficiency(45.0, 0.0).is_err());
        let time = finishing_time(3000.0, 1500.0).unwrap();
        assert_eq!(time.get("hours").unwrap().value, 2.0);
        assert_eq!(time.get("minutes").unwrap().value, 120.0);
    }
}
