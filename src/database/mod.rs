// ABOUTME: Database management for the Kondate recipe platform
// ABOUTME: Owns the connection pool, schema migrations, and per-domain managers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Kondate Contributors

//! # Database Management
//!
//! This module provides database functionality for the Kondate server: the
//! `SQLite` connection pool, in-code schema migrations, and the per-domain
//! persistence managers.

/// Category persistence operations
pub mod categories;

/// Recipe aggregate persistence operations
pub mod recipes;

/// Review persistence operations
pub mod reviews;

/// RAII transaction guard for multi-row writes
pub mod transactions;

/// User persistence operations
pub mod users;

use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite, SqlitePool};
use std::str::FromStr;

/// Database manager for recipe storage
#[derive(Clone)]
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    /// Create a new database connection
    ///
    /// # Errors
    ///
    /// Returns an error if the connection or migration fails
    pub async fn new(database_url: &str) -> Result<Self> {
        // Create the database file if it doesn't exist; foreign keys are
        // enforced per-connection in SQLite and carry the aggregate's
        // referential integrity
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);

        // An in-memory database lives and dies with its connection, so the
        // pool is pinned to one connection that is never reaped
        let pool = if database_url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?
        } else {
            SqlitePool::connect_with(options).await?
        };

        let db = Self { pool };

        // Run migrations
        db.migrate().await?;

        Ok(db)
    }

    /// Get a reference to the database pool for advanced operations
    #[must_use]
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Run database migrations
    ///
    /// # Errors
    ///
    /// Returns an error if any DDL statement fails
    pub async fn migrate(&self) -> Result<()> {
        self.migrate_users().await?;
        self.migrate_categories().await?;
        self.migrate_recipes().await?;
        self.migrate_reviews().await?;
        Ok(())
    }

    /// Create user tables
    async fn migrate_users(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL CHECK (length(name) > 0)
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Create category tables
    async fn migrate_categories(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS categories (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE CHECK (length(name) > 0)
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Create the recipe aggregate tables: recipes plus dependent
    /// ingredients and steps
    async fn migrate_recipes(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS recipes (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL CHECK (length(title) > 0),
                description TEXT NOT NULL,
                category_id INTEGER NOT NULL REFERENCES categories(id),
                user_id TEXT NOT NULL REFERENCES users(id),
                image TEXT NOT NULL,
                views INTEGER NOT NULL DEFAULT 0 CHECK (views >= 0),
                created_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        // Dependent rows only make sense attached to a recipe; insertion
        // order (rowid) is the ingredient order
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS ingredients (
                recipe_id TEXT NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
                name TEXT NOT NULL CHECK (length(name) > 0),
                quantity TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS steps (
                recipe_id TEXT NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
                step_number INTEGER NOT NULL CHECK (step_number > 0),
                description TEXT NOT NULL CHECK (length(description) > 0),
                UNIQUE (recipe_id, step_number)
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        // Indexes for the listing and highlight queries
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_recipes_category ON recipes(category_id)")
            .execute(&self.pool)
            .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_recipes_user ON recipes(user_id)")
            .execute(&self.pool)
            .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_recipes_created_at ON recipes(created_at)")
            .execute(&self.pool)
            .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_ingredients_recipe ON ingredients(recipe_id)")
            .execute(&self.pool)
            .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_steps_recipe ON steps(recipe_id)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Create review tables
    async fn migrate_reviews(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS reviews (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                recipe_id TEXT NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
                user_id TEXT NOT NULL REFERENCES users(id),
                rating INTEGER NOT NULL CHECK (rating BETWEEN 1 AND 5)
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_reviews_recipe ON reviews(recipe_id)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
