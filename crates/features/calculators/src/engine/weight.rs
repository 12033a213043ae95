use crate::error::{CalcError, Result};
use crate::input::{Policy, require};
use crate::outcome::{IntoOutcome, Metric, Outcome, WeightStatus, precision};

/// Label weight used when the form leaves it empty, in grams.
pub const DEFAULT_SPECIFIED_WEIGHT: f64 = 200.0;
/// Tolerance used when the form leaves it empty, in percent.
pub const DEFAULT_TOLERANCE_PERCENT: f64 = 2.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NetWeight {
    pub net: f64,
    /// Signed deviation from the specified weight, in percent.
    pub deviation_percent: f64,
    pub lower_limit: f64,
    pub upper_limit: f64,
    /// `|net - specified|`
    pub difference: f64,
    pub status: WeightStatus,
}

/// Net weight of a package and its position in the `specified ± tolerance%` band.
///
/// The band is inclusive on both ends.
///
/// # Errors
/// `grossWeight` or `tare` not positive, `grossWeight < tare`, `specifiedWeight`
/// not positive, or a negative `tolerancePercent`.
pub fn net_weight(
    gross: f64,
    tare: f64,
    specified: f64,
    tolerance_percent: f64,
) -> Result<NetWeight> {
    let gross = require("grossWeight", gross, Policy::Positive)?;
    let tare = require("tare", tare, Policy::Positive)?;
    let specified = require("specifiedWeight", specified, Policy::Positive)?;
    let tolerance = require("tolerancePercent", tolerance_percent, Policy::NonNegative)?;
    if gross < tare {
        return Err(CalcError::invalid("grossWeight", "must not be lower than the tare"));
    }

    let net = gross - tare;
    let band = specified * tolerance / 100.0;
    let lower_limit = specified - band;
    let upper_limit = specified + band;
    let status = if net < lower_limit {
        WeightStatus::Below
    } else if net > upper_limit {
        WeightStatus::Above
    } else {
        WeightStatus::Within
    };

    Ok(NetWeight {
        net,
        deviation_percent: (net - specified) * 100.0 / specified,
        lower_limit,
        upper_limit,
        difference: (net - specified).abs(),
        status,
    })
}

impl IntoOutcome for NetWeight {
    fn into_outcome(self) -> Outcome {
        Outcome::metrics(vec![
            Metric::new("netWeight", "Net weight", self.net, "g", precision::WEIGHT),
            Metric::new(
                "deviationPercent",
                "Deviation",
                self.deviation_percent,
                "%",
                precision::PERCENT,
            ),
            Metric::new("lowerLimit", "Lower limit", self.lower_limit, "g", precision::WEIGHT),
            Metric::new("upperLimit", "Upper limit", self.upper_limit, "g", precision::WEIGHT),
            Metric::new("difference", "Difference", self.difference, "g", precision::WEIGHT),
        ])
        .classified(self.status)
    }
}

/// `net + tare`.
///
/// # Errors
/// Negative `netWeight` or `tare`.
pub fn gross_weight(net: f64, tare: f64) -> Result<Outcome> {
    let net = require("netWeight", net, Policy::NonNegative)?;
    let tare = require("tare", tare, Policy::NonNegative)?;
    let metric = Metric::new("grossWeight", "Gross weight", net + tare, "g", precision::WEIGHT);
    Ok(Outcome::metrics(vec![metric]))
}

/// Mean of a sample of empty-package weights.
///
/// # Errors
/// An empty sample or a weight that is not positive.
#[allow(clippy::cast_precision_loss)]
pub fn tare_average(weights: &[f64]) -> Result<Outcome> {
    if weights.is_empty() {
        return Err(CalcError::invalid("weights", "needs at least one value"));
    }
    let mut total = 0.0;
    for &weight in weights {
        total += require("weights", weight, Policy::Positive)?;
    }
    let mean = total / weights.len() as f64;
    let metric = Metric::new("tareAverage", "Average tare", mean, "g", precision::WEIGHT);
    Ok(Outcome::metrics(vec![metric]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_is_inclusive() {
        // 205 g is exactly the upper limit of 200 g ± 2.5 %.
        let at_upper = net_weight(215.0, 10.0, 200.0, 2.5).unwrap();
        assert_eq!(at_upper.upper_limit, 205.0);
        assert_eq!(at_upper.status, WeightStatus::Within);

        let above = net_weight(215.5, 10.0, 200.0, 2.5).unwrap();
        assert_eq!(above.status, WeightStatus::Above);

        let below = net_weight(200.0, 10.0, 200.0, 2.5).unwrap();
        assert_eq!(below.status, WeightStatus::Below);
        assert_eq!(below.deviation_percent, -5.0);
        assert_eq!(below.difference, 10.0);
    }

    #[test]
    fn rejects_bad_weights() {
        assert_eq!(net_weight(0.0, 10.0, 200.0, 2.5).unwrap_err().field(), Some("grossWeight"));
        assert_eq!(net_weight(210.0, 0.0, 200.0, 2.5).unwrap_err().field(), Some("tare"));
        assert_eq!(net_weight(5.0, 10.0, 200.0, 2.5).unwrap_err().field(), Some("grossWeight"));
        let err = net_weight(210.0, 10.0, 200.0, -1.0).unwrap_err();
        assert_eq!(err.field(), Some("tolerancePercent"));
    }

    #[test]
    fn gross_equal_to_tare_is_an_empty_package() {
        let empty = net_weight(10.0, 10.0, 200.0, 2.5).unwrap();
        assert_eq!(empty.net, 0.0);
        assert_eq!(empty.status, WeightStatus::Below);
    }

    #[test]
    fn tare_average_of_sample() {
        let outcome = tare_average(&[12.0, 12.5, 13.0]).unwrap();
        assert_eq!(outcome.get("tareAverage").unwrap().value, 12.5);
        assert!(tare_average(&[]).is_err());
        assert!(tare_average(&[12.0, 0.0]).is_err());
    }

    #[test]
    fn gross_weight_adds_tare() {
        let outcome = gross_weight(200.0, 12.5).unwrap();
        assert_eq!(outcome.get("grossWeight").unwrap().value, 212.5);
        assert!(gross_weight(-1.0, 12.5).is_err());
    }
}
