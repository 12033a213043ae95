use crate::error::{FactorError, FactorErrorExt, Result};
use crate::loader::{FactorOrigin, LoadedFactors};
use parking_lot::RwLock;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};
use zelo_domain::factors::{ConversionFactors, FactorMap};

/// Shared handle to the active conversion factors.
///
/// Replacements are serialized; the last one wins.
#[derive(Debug, Clone)]
pub struct FactorStore {
    inner: Arc<FactorStoreInner>,
}

#[derive(Debug)]
struct FactorStoreInner {
    current: RwLock<LoadedFactors>,
    persist_path: Option<PathBuf>,
    write_gate: tokio::sync::Mutex<()>,
    tmp_counter: AtomicU64,
}

impl FactorStore {
    #[must_use]
    pub fn new(loaded: LoadedFactors, persist_path: Option<PathBuf>) -> Self {
        Self {
            inner: Arc::new(FactorStoreInner {
                current: RwLock::new(loaded),
                persist_path,
                write_gate: tokio::sync::Mutex::new(()),
                tmp_counter: AtomicU64::new(0),
            }),
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> LoadedFactors {
        self.inner.current.read().clone()
    }

    #[must_use]
    pub fn factors(&self) -> ConversionFactors {
        self.inner.current.read().factors.clone()
    }

    #[must_use]
    pub fn persist_path(&self) -> Option<&Path> {
        self.inner.persist_path.as_deref()
    }

    /// Replaces the active factors with `overrides` merged onto the defaults.
    ///
    /// Keys missing from `overrides` revert to their default value. When a persist
    /// path is configured the full set is written there before it becomes active.
    ///
    /// # Errors
    /// Returns [`FactorError::Invalid`] for out-of-range values and
    /// [`FactorError::Io`] when persisting fails; the active factors are unchanged
    /// in both cases.
    pub async fn replace(&self, overrides: &FactorMap) -> Result<ConversionFactors> {
        let outcome = ConversionFactors::default().merged(overrides)?;
        let _gate = self.inner.write_gate.lock().await;

        if let Some(path) = &self.inner.persist_path {
            let json = serde_json::to_vec_pretty(&outcome.factors)?;
            write_atomic(path, &json, &self.inner.tmp_counter).await?;
        }

        *self.inner.current.write() = LoadedFactors {
            factors: outcome.factors.clone(),
            origin: FactorOrigin::Manual,
            warning: None,
        };

        info!(ignored = outcome.ignored.len(), "Conversion factors replaced");
        Ok(outcome.factors)
    }
}

async fn write_atomic(target: &Path, data: &[u8], counter: &AtomicU64) -> Result<()> {
    if let Some(parent) = target.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent)
            .await
            .context(format!("Failed to create {}", parent.display()))?;
    }

    let temp = tmp_path(target, counter);
    {
        let mut file = tokio::fs::OpenOptions::new()
            .create_new(true)
            .write(true)
            .open(&temp)
            .await
            .context(format!("Temp creation failed: {}", temp.display()))?;
        file.write_all(data).await.context("Write failed")?;
        file.sync_all().await.context("Sync failed")?;
    }

    if let Err(err) = tokio::fs::rename(&temp, target).await {
        if err.kind() != std::io::ErrorKind::AlreadyExists {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(FactorError::Io {
                source: err,
                context: Some(
                    format!("Rename failed: {} -> {}", temp.display(), target.display()).into(),
                ),
            });
        }
        tokio::fs::remove_file(target)
            .await
            .context(format!("Failed to replace {}", target.display()))?;
        tokio::fs::rename(&temp, target)
            .await
            .context(format!("Rename failed: {} -> {}", temp.display(), target.display()))?;
    }

    debug!(path = %target.display(), "Factors persisted");
    Ok(())
}

fn tmp_path(target: &Path, counter: &AtomicU64) -> PathBuf {
    let n = counter.fetch_add(1, Ordering::Relaxed);
    let file_name = target.file_name().and_then(|s| s.to_str()).unwrap_or("factors");
    target.with_file_name(format!("{file_name}.zelotmp.{n}"))
}
