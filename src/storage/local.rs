// ABOUTME: Local-filesystem object storage implementation
// ABOUTME: Writes uploads under a configured root and serves them from a base URL
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Kondate Contributors

use super::{ObjectStorage, StorageRef};
use crate::errors::{AppError, AppResult};
use async_trait::async_trait;
use bytes::Bytes;
use std::path::PathBuf;
use tokio::fs;
use uuid::Uuid;

/// Object storage backed by the local filesystem
///
/// Suitable for development and single-node deployments; the configured
/// base URL is whatever serves the root directory to clients.
pub struct LocalStorage {
    root: PathBuf,
    base_url: String,
}

impl LocalStorage {
    /// Create a local storage backend
    #[must_use]
    pub fn new(root: PathBuf, base_url: String) -> Self {
        Self {
            root,
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }
}

#[async_trait]
impl ObjectStorage for LocalStorage {
    async fn put_file(&self, path_prefix: &str, data: Bytes) -> AppResult<StorageRef> {
        let key = format!("{path_prefix}/{}", Uuid::new_v4());
        let path = self.root.join(&key);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::storage(format!("Failed to create upload dir: {e}")))?;
        }

        fs::write(&path, data.as_ref())
            .await
            .map_err(|e| AppError::storage(format!("Failed to write upload: {e}")))?;

        Ok(StorageRef::new(key))
    }

    fn url_for(&self, storage_ref: &StorageRef) -> String {
        format!("{}/{}", self.base_url, storage_ref.as_str())
    }

    fn storage_name(&self) -> &'static str {
        "local"
    }
}
