// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides database, storage, and seed-data helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Kondate Contributors

#![allow(dead_code, clippy::unwrap_used, clippy::missing_panics_doc)]

//! Shared test utilities for `kondate`
//!
//! Common setup functions to reduce duplication across integration tests.

use kondate::database::categories::CategoriesManager;
use kondate::database::recipes::RecipeInput;
use kondate::database::users::UsersManager;
use kondate::database::Database;
use kondate::models::Ingredient;
use kondate::storage::{local::LocalStorage, ObjectStorage};
use std::sync::{Arc, Once};
use tempfile::TempDir;
use uuid::Uuid;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Standard test database setup
pub async fn create_test_database() -> Database {
    init_test_logging();
    Database::new("sqlite::memory:").await.unwrap()
}

/// Local storage rooted in a temp directory; keep the `TempDir` alive for
/// the duration of the test
pub fn create_test_storage() -> (TempDir, Arc<dyn ObjectStorage>) {
    let dir = TempDir::new().unwrap();
    let storage = Arc::new(LocalStorage::new(
        dir.path().to_path_buf(),
        "http://localhost:8080/uploads".to_owned(),
    ));
    (dir, storage)
}

/// Create a user and return its id
pub async fn create_user(database: &Database, name: &str) -> Uuid {
    UsersManager::new(database.pool().clone())
        .create(name)
        .await
        .unwrap()
        .id
}

/// Create a category and return its id
pub async fn create_category(database: &Database, name: &str) -> i64 {
    CategoriesManager::new(database.pool().clone())
        .create(name)
        .await
        .unwrap()
}

/// A valid recipe input with the given title and sequence sizes
pub fn recipe_input(title: &str, category_id: i64, ingredients: usize, steps: usize) -> RecipeInput {
    RecipeInput {
        title: title.to_owned(),
        description: format!("How to make {title}"),
        category_id,
        ingredients: (1..=ingredients)
            .map(|n| Ingredient {
                name: format!("ingredient {n}"),
                quantity: format!("{n}00g"),
            })
            .collect(),
        steps: (1..=steps).map(|n| format!("step {n}")).collect(),
    }
}
