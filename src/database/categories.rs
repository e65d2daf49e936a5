// ABOUTME: Database operations for recipe categories
// ABOUTME: Read-only side list for the filter and form UI, plus seeding support
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Kondate Contributors

use crate::errors::{AppError, AppResult};
use crate::models::Category;
use sqlx::{Row, SqlitePool};

/// Category database operations manager
pub struct CategoriesManager {
    pool: SqlitePool,
}

impl CategoriesManager {
    /// Create a new categories manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List all categories, ordered by id
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn list(&self) -> AppResult<Vec<Category>> {
        let rows = sqlx::query("SELECT id, name FROM categories ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list categories: {e}")))?;

        Ok(rows
            .iter()
            .map(|row| Category {
                id: row.get("id"),
                name: row.get("name"),
            })
            .collect())
    }

    /// Create a category, returning its id
    ///
    /// Existing categories with the same name are left untouched and their
    /// id is returned, so seeding stays idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn create(&self, name: &str) -> AppResult<i64> {
        sqlx::query("INSERT OR IGNORE INTO categories (name) VALUES ($1)")
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to create category: {e}")))?;

        let row = sqlx::query("SELECT id FROM categories WHERE name = $1")
            .bind(name)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get category: {e}")))?;

        Ok(row.get("id"))
    }
}
