// ABOUTME: Database operations for user accounts
// ABOUTME: Minimal identity storage; authentication itself lives at the edge
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Kondate Contributors

use crate::errors::{AppError, AppResult};
use crate::models::User;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// User database operations manager
pub struct UsersManager {
    pool: SqlitePool,
}

impl UsersManager {
    /// Create a new users manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a user with a fresh id
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn create(&self, name: &str) -> AppResult<User> {
        let id = Uuid::new_v4();

        sqlx::query("INSERT INTO users (id, name) VALUES ($1, $2)")
            .bind(id.to_string())
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to create user: {e}")))?;

        Ok(User {
            id,
            name: name.to_owned(),
        })
    }

    /// Get a user by id
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn get(&self, id: Uuid) -> AppResult<Option<User>> {
        let row = sqlx::query("SELECT id, name FROM users WHERE id = $1")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get user: {e}")))?;

        row.map(|r| {
            let id_str: String = r.get("id");
            Ok(User {
                id: Uuid::parse_str(&id_str)
                    .map_err(|e| AppError::internal(format!("Invalid UUID: {e}")))?,
                name: r.get("name"),
            })
        })
        .transpose()
    }
}
