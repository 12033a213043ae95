//! # CLI Argument Definitions

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// The main CLI structure parsing command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "zelocalc")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(arg_required_else_help = true)]
#[command(about = "Zelopack production and laboratory calculators")]
pub struct Cli {
    /// Configuration file (TOML/JSON/YAML); `ZELO__*` variables override it.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log debug output to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: AppCommands,
}

#[derive(Debug, Subcommand)]
pub enum AppCommands {
    /// List calculators, optionally filtered by a search text
    #[command(alias = "ls")]
    List {
        /// At least two characters, matched against name, description and category
        query: Option<String>,
    },
    /// Show the inputs of a calculator
    Describe {
        /// Calculator id, e.g. `tank_dilution`
        kind: String,
    },
    /// Run a calculator, e.g.
    /// `zelocalc calc tank_dilution currentBrix=65 targetBrix=11 currentVolume=100`
    Calc {
        /// Calculator id, e.g. `tank_dilution`
        kind: String,
        /// Inputs as `name=value`; list fields take `weights=12.1,12.3`
        #[arg(value_parser = parse_field)]
        fields: Vec<(String, String)>,
        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        source: FactorSourceArgs,
    },
    /// Show the conversion factors the calculators would use
    Factors {
        /// Print the factor map as JSON
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        source: FactorSourceArgs,
    },
}

/// Overrides for where conversion factors are read from.
#[derive(Debug, Args)]
pub struct FactorSourceArgs {
    /// Fetch factors from this URL
    #[arg(long, visible_alias = "url", conflicts_with = "factors_file")]
    pub factors_url: Option<String>,
    /// Read factors from this JSON file
    #[arg(long, visible_alias = "file")]
    pub factors_file: Option<PathBuf>,
}

fn parse_field(raw: &str) -> Result<(String, String), String> {
    let (name, value) =
        raw.split_once('=').ok_or_else(|| format!("expected `name=value`, got `{raw}`"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing field name in `{raw}`"));
    }
    Ok((name.to_owned(), value.trim().to_owned()))
}
