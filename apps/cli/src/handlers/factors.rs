use crate::models::args::FactorSourceArgs;
use zelo::domain::config::FactorsConfig;
use zelo::factors::{FactorLoader, LoadedFactors};

/// Loads factors from the configured source, with command-line overrides applied.
///
/// A failing source falls back to the defaults; the reason is reported on stderr.
pub async fn load(config: &FactorsConfig, args: &FactorSourceArgs) -> LoadedFactors {
    let mut config = config.clone();
    if let Some(url) = &args.factors_url {
        config.url = Some(url.clone());
    }
    if let Some(file) = &args.factors_file {
        config.url = None;
        config.path = Some(file.clone());
    }

    let loaded = FactorLoader::from_config(&config).load().await;
    if let Some(warning) = &loaded.warning {
        eprintln!("warning: {warning}; using default conversion factors");
    }
    loaded
}

/// Prints the active factors and their origin.
///
/// # Errors
/// Returns an error if JSON output cannot be serialized.
pub async fn show(
    config: &FactorsConfig,
    args: &FactorSourceArgs,
    json: bool,
) -> anyhow::Result<()> {
    let loaded = load(config, args).await;
    let map = loaded.factors.to_map();

    if json {
        println!("{}", serde_json::to_string_pretty(&map)?);
        return Ok(());
    }

    println!("Origin: {}\n", loaded.origin);
    println!("{:<28} {:>10}", "Factor", "Value");
    println!("{:-<39}", "");
    for (key, value) in map {
        println!("{key:<28} {value:>10}");
    }
    Ok(())
}
