// ABOUTME: Database operations for recipe reviews
// ABOUTME: Persists ratings that feed the average-rating listing filter
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Kondate Contributors

use crate::errors::{AppError, AppResult};
use crate::models::Review;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// Review database operations manager
pub struct ReviewsManager {
    pool: SqlitePool,
}

impl ReviewsManager {
    /// Create a new reviews manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a review for a recipe
    ///
    /// # Errors
    ///
    /// Returns `ValueOutOfRange` for ratings outside 1..=5, or a database
    /// error if the insert fails (e.g. unknown recipe or user)
    pub async fn create(&self, recipe_id: Uuid, user_id: Uuid, rating: u32) -> AppResult<Review> {
        if !(1..=5).contains(&rating) {
            return Err(AppError::new(
                crate::errors::ErrorCode::ValueOutOfRange,
                format!("Rating must be between 1 and 5, got {rating}"),
            ));
        }

        let result = sqlx::query(
            r"
            INSERT INTO reviews (recipe_id, user_id, rating)
            VALUES ($1, $2, $3)
            ",
        )
        .bind(recipe_id.to_string())
        .bind(user_id.to_string())
        .bind(i64::from(rating))
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create review: {e}")))?;

        Ok(Review {
            id: result.last_insert_rowid(),
            recipe_id,
            user_id,
            rating,
        })
    }

    /// Average rating for a recipe; `None` when it has no reviews
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn average_for(&self, recipe_id: Uuid) -> AppResult<Option<f64>> {
        let row = sqlx::query("SELECT AVG(rating) AS rating FROM reviews WHERE recipe_id = $1")
            .bind(recipe_id.to_string())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to average reviews: {e}")))?;

        Ok(row.get("rating"))
    }
}
