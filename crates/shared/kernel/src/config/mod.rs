use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};
use zelo_domain::constants::ENV_PREFIX;

/// Custom error type for config loading.
#[zelo_derive::zelo_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// The base configuration file and whether it has to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFile<'a> {
    /// Conventional location; serde defaults fill in when it is absent.
    Optional(&'a Path),
    /// Named explicitly by the operator; a missing file is an error.
    Required(&'a Path),
}

impl ConfigFile<'_> {
    #[must_use]
    pub const fn path(&self) -> &Path {
        match self {
            Self::Optional(path) | Self::Required(path) => *path,
        }
    }

    #[must_use]
    pub const fn is_required(&self) -> bool {
        matches!(self, Self::Required(_))
    }
}

/// Layered configuration loader: a base file overlaid with environment overrides.
///
/// 1. **Base file**: in any format the `config` crate recognises by extension
///    (`server.toml`, `server.json`, ...); an extensionless path tries each of
///    them. See [`ConfigFile`] for when a missing file is an error.
/// 2. **Environment**: variables prefixed with `ZELO__`, nested with double
///    underscores (`ZELO__FACTORS__URL` sets `factors.url`).
///
/// # Errors
/// Returns [`ConfigError`] when a required file is missing, when the file cannot
/// be parsed, or when the merged values do not deserialize into `T`.
///
/// # Example
/// ```rust
/// use std::path::Path;
/// use zelo_kernel::config::{ConfigFile, load_config};
///
/// #[derive(Default, serde::Deserialize)]
/// struct AppConfig {
///     port: u16,
/// }
///
/// let cfg: AppConfig =
///     load_config(ConfigFile::Optional(Path::new("config/local"))).unwrap_or_default();
/// ```
pub fn load_config<T>(file: ConfigFile<'_>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    load_config_with(file, None)
}

/// Same as [`load_config`], reading overrides from `env` instead of the process
/// environment when it is provided.
///
/// # Errors
/// See [`load_config`].
pub fn load_config_with<T>(
    file: ConfigFile<'_>,
    env: Option<HashMap<String, String>>,
) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let builder = Config::builder()
        .add_source(File::from(file.path()).required(file.is_required()))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .source(env),
        );

    info!(path = %file.path().display(), required = file.is_required(), "Loading config");

    let config = builder
        .build()
        .context(format!("Failed to build config from {}", file.path().display()))?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")?;

    debug!("Configuration loaded");
    Ok(config)
}
