// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use credbridge_kernel::types::{IdentityCache, ScoreSnapshot};
use std::ffi::OsString;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::NodeConfig;
use crate::errors::NodeError;

/// The two files that carry state between passes: the identity cache and
/// the score history (last pass's snapshot).
///
/// Both are plain JSON objects. A missing file reads as empty. Writes go
/// to a temp file that is synced and then renamed over the target, so a
/// reader never sees a partially written file. The replaced version is
/// kept alongside as `<name>.prev`.
#[derive(Debug, Clone)]
pub struct StateStore {
    cache_path: PathBuf,
    history_path: PathBuf,
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name: OsString = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(suffix);
    path.with_file_name(name)
}

fn write_temp(path: &Path, bytes: &[u8]) -> Result<PathBuf, NodeError> {
    let tmp_path = sibling(path, ".tmp");
    let io_err = |source| NodeError::CacheWrite {
        path: path.to_path_buf(),
        source,
    };
    let mut file = File::create(&tmp_path).map_err(io_err)?;
    file.write_all(bytes).map_err(io_err)?;
    file.sync_all().map_err(io_err)?;
    Ok(tmp_path)
}

fn install(tmp_path: &Path, path: &Path) -> Result<(), NodeError> {
    // ROTATION: keep one previous version
    if path.exists() {
        if let Err(e) = std::fs::copy(path, sibling(path, ".prev")) {
            tracing::warn!("Could not keep previous copy of {:?}: {}", path, e);
        }
    }
    std::fs::rename(tmp_path, path).map_err(|source| NodeError::CacheWrite {
        path: path.to_path_buf(),
        source,
    })
}

async fn read_optional(path: &Path) -> Result<Option<Vec<u8>>, NodeError> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(NodeError::StoreRead {
            path: path.to_path_buf(),
            reason: e.to_string(),
        }),
    }
}

impl StateStore {
    pub fn new(cache_path: impl Into<PathBuf>, history_path: impl Into<PathBuf>) -> Self {
        Self {
            cache_path: cache_path.into(),
            history_path: history_path.into(),
        }
    }

    pub fn from_config(cfg: &NodeConfig) -> Self {
        Self::new(cfg.cache_path.clone(), cfg.history_path.clone())
    }

    pub fn cache_path(&self) -> &Path {
        &self.cache_path
    }

    pub fn history_path(&self) -> &Path {
        &self.history_path
    }

    pub async fn load_cache(&self) -> Result<IdentityCache, NodeError> {
        match read_optional(&self.cache_path).await? {
            Some(bytes) => IdentityCache::from_json(&bytes).map_err(|e| NodeError::StoreRead {
                path: self.cache_path.clone(),
                reason: e.to_string(),
            }),
            None => Ok(IdentityCache::new()),
        }
    }

    pub async fn load_history(&self) -> Result<ScoreSnapshot, NodeError> {
        match read_optional(&self.history_path).await? {
            Some(bytes) => ScoreSnapshot::from_json(&bytes).map_err(|e| NodeError::StoreRead {
                path: self.history_path.clone(),
                reason: e.to_string(),
            }),
            None => Ok(ScoreSnapshot::new()),
        }
    }

    /// Persists the cache and the next history.
    ///
    /// Both temp files are fully written before either target is replaced;
    /// a failure while writing them leaves both targets untouched.
    pub fn commit(&self, cache: &IdentityCache, history: &ScoreSnapshot) -> Result<(), NodeError> {
        let cache_tmp = write_temp(&self.cache_path, &cache.to_json())?;
        let history_tmp = match write_temp(&self.history_path, &history.to_json()) {
            Ok(p) => p,
            Err(e) => {
                let _ = std::fs::remove_file(&cache_tmp);
                return Err(e);
            }
        };

        install(&cache_tmp, &self.cache_path)?;
        install(&history_tmp, &self.history_path)?;
        tracing::info!(
            "Committed {} cached identities to {:?} and {} scores to {:?}",
            cache.len(),
            self.cache_path,
            history.len(),
            self.history_path
        );
        Ok(())
    }
}
