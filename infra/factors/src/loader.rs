use crate::error::{FactorError, FactorErrorExt, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};
use zelo_domain::config::FactorsConfig;
use zelo_domain::factors::{ConversionFactors, FactorMap};

/// Where overrides are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FactorSource {
    Defaults,
    File(PathBuf),
    Remote { url: String, timeout: Duration },
}

impl FactorSource {
    /// Picks the source from configuration; a URL wins over a file path.
    #[must_use]
    pub fn from_config(config: &FactorsConfig) -> Self {
        match (&config.url, &config.path) {
            (Some(url), _) if !url.trim().is_empty() => Self::Remote {
                url: url.trim().to_owned(),
                timeout: Duration::from_secs(config.timeout_seconds),
            },
            (_, Some(path)) => Self::File(path.clone()),
            _ => Self::Defaults,
        }
    }
}

/// Where the active factors came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FactorOrigin {
    Defaults,
    File,
    Remote,
    /// Replaced at runtime through the API.
    Manual,
}

/// Factors ready for use, plus how they were obtained.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedFactors {
    pub factors: ConversionFactors,
    pub origin: FactorOrigin,
    /// Set when the configured source failed and defaults were used instead.
    pub warning: Option<String>,
}

impl LoadedFactors {
    #[must_use]
    pub fn defaults() -> Self {
        Self {
            factors: ConversionFactors::default(),
            origin: FactorOrigin::Defaults,
            warning: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FactorLoader {
    source: FactorSource,
}

impl FactorLoader {
    #[must_use]
    pub const fn new(source: FactorSource) -> Self {
        Self { source }
    }

    #[must_use]
    pub fn from_config(config: &FactorsConfig) -> Self {
        Self::new(FactorSource::from_config(config))
    }

    #[must_use]
    pub const fn source(&self) -> &FactorSource {
        &self.source
    }

    /// Loads the factors, falling back to the defaults on any failure.
    pub async fn load(&self) -> LoadedFactors {
        match self.try_load().await {
            Ok(loaded) => loaded,
            Err(err) => {
                warn!(
                    source = ?self.source,
                    error = %err,
                    "Conversion factors unavailable, using defaults"
                );
                LoadedFactors { warning: Some(err.to_string()), ..LoadedFactors::defaults() }
            },
        }
    }

    /// Loads the factors without the fallback.
    ///
    /// # Errors
    /// Returns [`FactorError`] when the source cannot be read, is not a flat JSON
    /// object of numbers, or holds an out-of-range factor.
    pub async fn try_load(&self) -> Result<LoadedFactors> {
        let (overrides, origin) = match &self.source {
            FactorSource::Defaults => return Ok(LoadedFactors::defaults()),
            FactorSource::File(path) => (read_file(path).await?, FactorOrigin::File),
            FactorSource::Remote { url, timeout } => {
                (fetch(url, *timeout).await?, FactorOrigin::Remote)
            },
        };

        let outcome = ConversionFactors::default().merged(&overrides)?;
        if !outcome.ignored.is_empty() {
            debug!(keys = ?outcome.ignored, "Ignoring unknown factor keys");
        }
        info!(%origin, count = overrides.len(), "Conversion factors loaded");

        Ok(LoadedFactors { factors: outcome.factors, origin, warning: None })
    }
}

async fn read_file(path: &Path) -> Result<FactorMap> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .context(format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).context(format!("Failed to parse {}", path.display()))
}

async fn fetch(url: &str, timeout: Duration) -> Result<FactorMap> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .context("Failed to build HTTP client")?;

    let response = client
        .get(url)
        .send()
        .await
        .context(format!("GET {url}"))?
        .error_for_status()
        .context(format!("GET {url}"))?;

    let body = response.text().await.context("Failed to read response body")?;
    serde_json::from_str(&body).map_err(|source| FactorError::Json {
        source,
        context: Some(format!("Response of {url}").into()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_wins_over_path() {
        let config = FactorsConfig {
            url: Some("http://plant.local/factors".to_owned()),
            path: Some(PathBuf::from("factors.json")),
            timeout_seconds: 3,
        };
        let expected = FactorSource::Remote {
            url: "http://plant.local/factors".to_owned(),
            timeout: Duration::from_secs(3),
        };
        assert_eq!(FactorSource::from_config(&config), expected);
    }

    #[test]
    fn blank_url_falls_through_to_path() {
        let config = FactorsConfig {
            url: Some("  ".to_owned()),
            path: Some(PathBuf::from("f.json")),
            timeout_seconds: 10,
        };
        assert_eq!(FactorSource::from_config(&config), FactorSource::File(PathBuf::from("f.json")));
    }

    #[test]
    fn nothing_configured_means_defaults() {
        assert_eq!(FactorSource::from_config(&FactorsConfig::default()), FactorSource::Defaults);
    }

    #[test]
    fn origin_display_is_snake_case() {
        assert_eq!(FactorOrigin::Remote.to_string(), "remote");
        assert_eq!(FactorOrigin::Manual.to_string(), "manual");
    }
}
