// src/core/fs_ops.rs
//! Filesystem access for uploaded resume documents

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

/// Read access to stored documents, probed by the source resolver
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// True when `path` names an existing regular file
    async fn exists(&self, path: &Path) -> bool;

    async fn read_bytes(&self, path: &Path) -> Result<Vec<u8>>;
}

/// Documents on the local disk
#[derive(Debug, Clone, Default)]
pub struct LocalDocumentStore;

#[async_trait]
impl DocumentStore for LocalDocumentStore {
    async fn exists(&self, path: &Path) -> bool {
        fs::metadata(path)
            .await
            .map(|meta| meta.is_file())
            .unwrap_or(false)
    }

    async fn read_bytes(&self, path: &Path) -> Result<Vec<u8>> {
        fs::read(path)
            .await
            .with_context(|| format!("Failed to read file: {}", path.display()))
    }
}

pub struct FsOps;

impl FsOps {
    pub async fn ensure_dir_exists(path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path)
                .await
                .with_context(|| format!("Failed to create directory: {}", path.display()))?;
            info!("Created directory: {}", path.display());
        }
        Ok(())
    }

    /// Join `relative` onto `base` unless it is already absolute
    pub fn normalize_path(base: &Path, relative: &Path) -> PathBuf {
        if relative.is_absolute() {
            relative.to_path_buf()
        } else {
            base.join(relative)
        }
    }
}
