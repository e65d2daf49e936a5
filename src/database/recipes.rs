// ABOUTME: Database operations for the recipe aggregate (recipe + ingredients + steps)
// ABOUTME: Transactional create/update, detail loads, view counting, filtered listing, highlights
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Kondate Contributors

use crate::constants::defaults;
use crate::database::transactions::{SqliteTransactionGuard, TransactionGuard};
use crate::errors::{AppError, AppResult, ErrorCode};
use crate::models::{Ingredient, Recipe, RecipeDetail, RecipeSummary, ReviewDetail, Step};
use crate::pagination::{normalize_page, offset_for_page, Page};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use tracing::error;
use uuid::Uuid;

/// Validated input for creating or fully re-submitting a recipe aggregate
///
/// Ingredients and steps are ordered sequences; the stored step numbers are
/// derived from the submission order, never taken from the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeInput {
    /// Display title
    pub title: String,
    /// Free-text description
    pub description: String,
    /// Category reference
    pub category_id: i64,
    /// Ordered ingredient entries, at least one
    pub ingredients: Vec<Ingredient>,
    /// Ordered step descriptions, at least one
    pub steps: Vec<String>,
}

impl RecipeInput {
    /// Validate the input before any persistence attempt
    ///
    /// # Errors
    ///
    /// Returns a validation error for missing or empty required fields
    pub fn validate(&self) -> AppResult<()> {
        if self.title.trim().is_empty() {
            return Err(AppError::missing_field("title"));
        }
        if self.description.trim().is_empty() {
            return Err(AppError::missing_field("description"));
        }
        if self.category_id <= 0 {
            return Err(AppError::invalid_input(
                "category_id must be a positive identifier",
            ));
        }
        if self.ingredients.is_empty() {
            return Err(AppError::invalid_input(
                "At least one ingredient is required",
            ));
        }
        if self.ingredients.iter().any(|i| i.name.trim().is_empty()) {
            return Err(AppError::missing_field("ingredients[].name"));
        }
        if self.steps.is_empty() {
            return Err(AppError::invalid_input("At least one step is required"));
        }
        if self.steps.iter().any(|s| s.trim().is_empty()) {
            return Err(AppError::missing_field("steps[].description"));
        }
        Ok(())
    }
}

/// Filter options for listing recipes
///
/// All filters are optional and combine conjunctively.
#[derive(Debug, Clone, Default)]
pub struct RecipeFilters {
    /// Restrict to recipes whose category id is in this set
    pub categories: Option<Vec<i64>>,
    /// Restrict to recipes whose average review rating is >= this threshold
    pub rating: Option<f64>,
    /// Restrict to recipes whose title contains this substring
    pub title: Option<String>,
    /// 1-based page number
    pub page: Option<u32>,
}

/// Recipe aggregate database operations manager
pub struct RecipesManager {
    pool: SqlitePool,
}

impl RecipesManager {
    /// Create a new recipes manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a recipe aggregate in one transaction
    ///
    /// Inserts the recipe row, then one ingredient row per entry preserving
    /// order, then one step row per entry with `step_number` equal to the
    /// 1-based submission position. Any failure rolls the whole transaction
    /// back; no partial state is visible outside it.
    ///
    /// # Errors
    ///
    /// Returns an error if any insert fails
    pub async fn create(
        &self,
        id: Uuid,
        user_id: Uuid,
        image_url: &str,
        input: &RecipeInput,
    ) -> AppResult<()> {
        let result = self.create_inner(id, user_id, image_url, input).await;
        if let Err(e) = &result {
            error!(recipe_id = %id, error = %e, "Recipe aggregate create failed - rolled back");
        }
        result
    }

    async fn create_inner(
        &self,
        id: Uuid,
        user_id: Uuid,
        image_url: &str,
        input: &RecipeInput,
    ) -> AppResult<()> {
        let now = Utc::now();
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;
        let mut guard = TransactionGuard::new(tx);

        sqlx::query(
            r"
            INSERT INTO recipes (id, title, description, category_id, user_id, image, views, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, 0, $7)
            ",
        )
        .bind(id.to_string())
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.category_id)
        .bind(user_id.to_string())
        .bind(image_url)
        .bind(now.to_rfc3339())
        .execute(guard.executor()?)
        .await
        .map_err(|e| AppError::database(format!("Failed to insert recipe: {e}")))?;

        Self::insert_dependents(&mut guard, id, input).await?;

        guard.commit().await
    }

    /// Update a recipe aggregate in one transaction
    ///
    /// Updates the recipe's mutable fields (image only when a new URL is
    /// supplied), deletes all existing ingredients and steps, and inserts
    /// the submitted ones exactly as in `create`. A failure after the
    /// deletes is not observable: the whole operation is one transaction.
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the recipe does not exist, or a
    /// database error if any statement fails
    pub async fn update(
        &self,
        id: Uuid,
        image_url: Option<&str>,
        input: &RecipeInput,
    ) -> AppResult<()> {
        let result = self.update_inner(id, image_url, input).await;
        if let Err(e) = &result {
            if e.code == ErrorCode::DatabaseError {
                error!(recipe_id = %id, error = %e, "Recipe aggregate update failed - rolled back");
            }
        }
        result
    }

    async fn update_inner(
        &self,
        id: Uuid,
        image_url: Option<&str>,
        input: &RecipeInput,
    ) -> AppResult<()> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;
        let mut guard = TransactionGuard::new(tx);

        let update = if let Some(url) = image_url {
            sqlx::query(
                r"
                UPDATE recipes SET title = $1, description = $2, category_id = $3, image = $4
                WHERE id = $5
                ",
            )
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.category_id)
            .bind(url)
            .bind(id.to_string())
        } else {
            sqlx::query(
                r"
                UPDATE recipes SET title = $1, description = $2, category_id = $3
                WHERE id = $4
                ",
            )
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.category_id)
            .bind(id.to_string())
        };

        let result = update
            .execute(guard.executor()?)
            .await
            .map_err(|e| AppError::database(format!("Failed to update recipe: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Recipe {id}")));
        }

        // Full replace of dependents: delete-then-insert inside the same
        // transactional scope
        sqlx::query("DELETE FROM ingredients WHERE recipe_id = $1")
            .bind(id.to_string())
            .execute(guard.executor()?)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete ingredients: {e}")))?;

        sqlx::query("DELETE FROM steps WHERE recipe_id = $1")
            .bind(id.to_string())
            .execute(guard.executor()?)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete steps: {e}")))?;

        Self::insert_dependents(&mut guard, id, input).await?;

        guard.commit().await
    }

    /// Insert ingredient and step rows for a recipe within a transaction
    async fn insert_dependents(
        guard: &mut SqliteTransactionGuard<'_>,
        id: Uuid,
        input: &RecipeInput,
    ) -> AppResult<()> {
        for ingredient in &input.ingredients {
            sqlx::query(
                r"
                INSERT INTO ingredients (recipe_id, name, quantity)
                VALUES ($1, $2, $3)
                ",
            )
            .bind(id.to_string())
            .bind(&ingredient.name)
            .bind(&ingredient.quantity)
            .execute(guard.executor()?)
            .await
            .map_err(|e| AppError::database(format!("Failed to insert ingredient: {e}")))?;
        }

        for (position, description) in input.steps.iter().enumerate() {
            sqlx::query(
                r"
                INSERT INTO steps (recipe_id, step_number, description)
                VALUES ($1, $2, $3)
                ",
            )
            .bind(id.to_string())
            .bind(position as i64 + 1)
            .bind(description)
            .execute(guard.executor()?)
            .await
            .map_err(|e| AppError::database(format!("Failed to insert step: {e}")))?;
        }

        Ok(())
    }

    /// Get a recipe row by id
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn get(&self, id: Uuid) -> AppResult<Option<Recipe>> {
        let row = sqlx::query(
            r"
            SELECT id, title, description, category_id, user_id, image, views, created_at
            FROM recipes
            WHERE id = $1
            ",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get recipe: {e}")))?;

        row.map(|r| row_to_recipe(&r)).transpose()
    }

    /// Load a recipe with its ingredients (insertion order), steps (by
    /// `step_number`), reviews (with authoring user names), and owner name
    ///
    /// The returned detail has `is_owner` unset; the service layer computes
    /// it against the requester identity.
    ///
    /// # Errors
    ///
    /// Returns an error if a database operation fails
    pub async fn load_detail(&self, id: Uuid) -> AppResult<Option<RecipeDetail>> {
        let row = sqlx::query(
            r"
            SELECT recipes.id, recipes.title, recipes.description, recipes.category_id,
                   recipes.user_id, recipes.image, recipes.views, recipes.created_at,
                   users.name AS author_name
            FROM recipes
            JOIN users ON users.id = recipes.user_id
            WHERE recipes.id = $1
            ",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get recipe: {e}")))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let recipe = row_to_recipe(&row)?;
        let author_name: String = row.get("author_name");

        let ingredient_rows = sqlx::query(
            r"
            SELECT name, quantity FROM ingredients
            WHERE recipe_id = $1
            ORDER BY rowid
            ",
        )
        .bind(id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get ingredients: {e}")))?;

        let ingredients = ingredient_rows
            .iter()
            .map(|r| Ingredient {
                name: r.get("name"),
                quantity: r.get("quantity"),
            })
            .collect();

        let step_rows = sqlx::query(
            r"
            SELECT step_number, description FROM steps
            WHERE recipe_id = $1
            ORDER BY step_number
            ",
        )
        .bind(id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get steps: {e}")))?;

        let steps = step_rows
            .iter()
            .map(|r| {
                let step_number: i64 = r.get("step_number");
                Step {
                    step_number: step_number as u32,
                    description: r.get("description"),
                }
            })
            .collect();

        let review_rows = sqlx::query(
            r"
            SELECT reviews.rating, users.name AS user_name
            FROM reviews
            JOIN users ON users.id = reviews.user_id
            WHERE reviews.recipe_id = $1
            ORDER BY reviews.id
            ",
        )
        .bind(id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get reviews: {e}")))?;

        let reviews = review_rows
            .iter()
            .map(|r| {
                let rating: i64 = r.get("rating");
                ReviewDetail {
                    rating: rating as u32,
                    user_name: r.get("user_name"),
                }
            })
            .collect();

        Ok(Some(RecipeDetail {
            recipe,
            author_name,
            ingredients,
            steps,
            reviews,
            is_owner: false,
        }))
    }

    /// Increment a recipe's view counter by one
    ///
    /// A single minimal update, deliberately not tied to the detail read.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn increment_views(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("UPDATE recipes SET views = views + 1 WHERE id = $1")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to increment views: {e}")))?;

        Ok(result.rows_affected() > 0)
    }

    /// List recipes with optional filters and fixed-size pagination
    ///
    /// The base query joins owners, left-joins reviews, and groups by
    /// recipe so every row carries the null-safe average rating. Filters
    /// compose conjunctively; the rating threshold applies after grouping
    /// (`HAVING`) and switches the ordering to descending average rating.
    ///
    /// # Errors
    ///
    /// Returns an error if a database operation fails
    pub async fn list(&self, filters: &RecipeFilters) -> AppResult<Page<RecipeSummary>> {
        let page = normalize_page(filters.page);
        let per_page = defaults::RECIPES_PER_PAGE;

        // Build dynamic query parts based on filters; all user values are
        // bound, fragments only ever contain generated placeholders
        let mut conditions = Vec::new();

        let category_ids = filters
            .categories
            .as_deref()
            .filter(|ids| !ids.is_empty());
        if let Some(ids) = category_ids {
            let placeholders = vec!["?"; ids.len()].join(", ");
            conditions.push(format!("recipes.category_id IN ({placeholders})"));
        }

        let title_pattern = filters
            .title
            .as_deref()
            .filter(|t| !t.is_empty())
            .map(|t| format!("%{t}%"));
        if title_pattern.is_some() {
            conditions.push("recipes.title LIKE ?".to_string());
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let having_clause = if filters.rating.is_some() {
            "HAVING AVG(reviews.rating) >= ?"
        } else {
            ""
        };

        let order_clause = if filters.rating.is_some() {
            "ORDER BY rating DESC, recipes.created_at DESC"
        } else {
            "ORDER BY recipes.created_at DESC"
        };

        let base = format!(
            r"
            SELECT recipes.id, recipes.title, recipes.description, recipes.image,
                   recipes.views, recipes.created_at, users.name AS author_name,
                   AVG(reviews.rating) AS rating
            FROM recipes
            JOIN users ON users.id = recipes.user_id
            LEFT JOIN reviews ON reviews.recipe_id = recipes.id
            {where_clause}
            GROUP BY recipes.id
            {having_clause}
            "
        );

        let count_sql = format!("SELECT COUNT(*) AS count FROM ({base})");
        let page_sql = format!("{base} {order_clause} LIMIT ? OFFSET ?");

        let mut count_query = sqlx::query(&count_sql);
        let mut page_query = sqlx::query(&page_sql);
        if let Some(ids) = category_ids {
            for &category_id in ids {
                count_query = count_query.bind(category_id);
                page_query = page_query.bind(category_id);
            }
        }
        if let Some(pattern) = &title_pattern {
            count_query = count_query.bind(pattern);
            page_query = page_query.bind(pattern);
        }
        if let Some(rating) = filters.rating {
            count_query = count_query.bind(rating);
            page_query = page_query.bind(rating);
        }
        page_query = page_query
            .bind(i64::from(per_page))
            .bind(i64::from(offset_for_page(page, per_page)));

        let count_row = count_query
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count recipes: {e}")))?;
        let total: i64 = count_row.get("count");

        let rows = page_query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list recipes: {e}")))?;

        let items = rows
            .iter()
            .map(row_to_summary)
            .collect::<AppResult<Vec<_>>>()?;

        Ok(Page::new(items, total as u32, page, per_page))
    }

    /// The most recently created recipes, joined with owner names
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn recent(&self, limit: u32) -> AppResult<Vec<RecipeSummary>> {
        let rows = sqlx::query(
            r"
            SELECT recipes.id, recipes.title, recipes.description, recipes.image,
                   recipes.views, recipes.created_at, users.name AS author_name
            FROM recipes
            JOIN users ON users.id = recipes.user_id
            ORDER BY recipes.created_at DESC
            LIMIT $1
            ",
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list recent recipes: {e}")))?;

        rows.iter().map(row_to_summary).collect()
    }

    /// The most viewed recipes, joined with owner names
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn popular(&self, limit: u32) -> AppResult<Vec<RecipeSummary>> {
        let rows = sqlx::query(
            r"
            SELECT recipes.id, recipes.title, recipes.description, recipes.image,
                   recipes.views, recipes.created_at, users.name AS author_name
            FROM recipes
            JOIN users ON users.id = recipes.user_id
            ORDER BY recipes.views DESC
            LIMIT $1
            ",
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list popular recipes: {e}")))?;

        rows.iter().map(row_to_summary).collect()
    }
}

/// Convert a database row to a `Recipe`
fn row_to_recipe(row: &SqliteRow) -> AppResult<Recipe> {
    let id_str: String = row.get("id");
    let user_id_str: String = row.get("user_id");
    let created_at_str: String = row.get("created_at");
    let views: i64 = row.get("views");

    Ok(Recipe {
        id: Uuid::parse_str(&id_str).map_err(|e| AppError::internal(format!("Invalid UUID: {e}")))?,
        title: row.get("title"),
        description: row.get("description"),
        category_id: row.get("category_id"),
        user_id: Uuid::parse_str(&user_id_str)
            .map_err(|e| AppError::internal(format!("Invalid UUID: {e}")))?,
        image: row.get("image"),
        views: views as u32,
        created_at: DateTime::parse_from_rfc3339(&created_at_str)
            .map_err(|e| AppError::internal(format!("Invalid datetime: {e}")))?
            .with_timezone(&Utc),
    })
}

/// Convert a database row to a `RecipeSummary`
///
/// The `rating` column is only present in the listing query; highlight
/// queries leave the average unset.
fn row_to_summary(row: &SqliteRow) -> AppResult<RecipeSummary> {
    let id_str: String = row.get("id");
    let created_at_str: String = row.get("created_at");
    let views: i64 = row.get("views");
    let average_rating: Option<f64> = row.try_get("rating").unwrap_or(None);

    Ok(RecipeSummary {
        id: Uuid::parse_str(&id_str).map_err(|e| AppError::internal(format!("Invalid UUID: {e}")))?,
        title: row.get("title"),
        description: row.get("description"),
        image: row.get("image"),
        created_at: DateTime::parse_from_rfc3339(&created_at_str)
            .map_err(|e| AppError::internal(format!("Invalid datetime: {e}")))?
            .with_timezone(&Utc),
        author_name: row.get("author_name"),
        views: views as u32,
        average_rating,
    })
}
