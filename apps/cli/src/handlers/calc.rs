use crate::handlers::factors;
use crate::models::args::FactorSourceArgs;
use anyhow::Result;
use zelo::domain::config::FactorsConfig;
use zelo::features::calculators::{CalculationRequest, FieldValue, calculate};

/// Evaluates one calculator and prints the result lines (or the JSON report).
///
/// # Errors
/// Returns an error for an unknown calculator or an invalid input; the message
/// names the offending field.
pub async fn run(
    kind: String,
    fields: Vec<(String, String)>,
    json: bool,
    config: &FactorsConfig,
    source: &FactorSourceArgs,
) -> Result<()> {
    let request = CalculationRequest {
        kind,
        fields: fields.into_iter().map(|(name, value)| (name, FieldValue::Text(value))).collect(),
    };

    let loaded = factors::load(config, source).await;
    let report = calculate(&request, &loaded.factors)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for line in &report.lines {
            println!("{line}");
        }
    }
    Ok(())
}
