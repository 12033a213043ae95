#![allow(clippy::print_stderr, clippy::print_stdout)]

//! `zelocalc`: the plant calculators from a terminal.

pub mod handlers;
pub mod models;

use crate::handlers::{calc, catalog, factors};
use crate::models::args::{AppCommands, Cli};
use anyhow::{Context, Result};
use clap::Parser;
use std::path::Path;
use zelo::domain::config::ApiConfig;
use zelo::kernel::config::{ConfigFile, load_config};
use zelo_logger::{LevelFilter, Logger};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let _log = Logger::builder()
        .name(env!("CARGO_BIN_NAME"))
        .level(if cli.verbose { LevelFilter::DEBUG } else { LevelFilter::ERROR })
        .stderr(true)
        .init()?;

    // An explicit --config must exist; the conventional ./zelocalc.* is optional.
    let file = cli
        .config
        .as_deref()
        .map_or(ConfigFile::Optional(Path::new("zelocalc")), ConfigFile::Required);
    let cfg: ApiConfig = load_config(file).context("Failed to load configuration")?;

    match cli.command {
        AppCommands::List { query } => catalog::list(query.as_deref()),
        AppCommands::Describe { kind } => catalog::describe(&kind)?,
        AppCommands::Calc { kind, fields, json, source } => {
            calc::run(kind, fields, json, &cfg.factors, &source).await?;
        },
        AppCommands::Factors { json, source } => {
            factors::show(&cfg.factors, &source, json).await?;
        },
    }

    Ok(())
}
