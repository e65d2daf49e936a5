// ABOUTME: Object storage abstraction for recipe images
// ABOUTME: Unifies access to blob stores behind a small upload/URL contract
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Kondate Contributors

//! Object storage for recipe images
//!
//! The service needs exactly two things from a blob store: put a file under
//! a path prefix and resolve a stored file to a public URL. Any object
//! store fulfilling that contract can sit behind [`ObjectStorage`]; a
//! local-filesystem implementation ships for development and tests.

use crate::config::StorageConfig;
use crate::errors::AppResult;
use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub mod local;

/// Opaque reference to a stored file, resolvable to a public URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageRef(String);

impl StorageRef {
    /// Create a reference from a storage key
    #[must_use]
    pub const fn new(key: String) -> Self {
        Self(key)
    }

    /// The raw storage key
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store a file under the given path prefix and return its reference
    ///
    /// The upload must complete (with an obtained reference) before any
    /// dependent database write begins.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the upload fails
    async fn put_file(&self, path_prefix: &str, data: Bytes) -> AppResult<StorageRef>;

    /// Resolve a stored file to a publicly reachable absolute URL
    fn url_for(&self, storage_ref: &StorageRef) -> String;

    /// Provider name for logging
    fn storage_name(&self) -> &'static str;
}

/// Create the object storage backend for the given configuration
#[must_use]
pub fn create_storage(config: &StorageConfig) -> Arc<dyn ObjectStorage> {
    Arc::new(local::LocalStorage::new(
        config.root.clone(),
        config.base_url.clone(),
    ))
}
