// ABOUTME: Route module organization for Kondate HTTP endpoints
// ABOUTME: Shared server resources, router assembly, and domain route modules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Kondate Contributors

//! Route module for the Kondate server
//!
//! Routes are organized by domain; each module contains route definitions
//! and thin handler functions that delegate to the service layer.

/// Health check and system status routes
pub mod health;
/// Recipe browsing and editing routes
pub mod recipes;

/// Health check route handlers
pub use health::HealthRoutes;
/// Recipe route handlers
pub use recipes::RecipeRoutes;

use crate::config::ServerConfig;
use crate::constants::defaults;
use crate::database::Database;
use crate::services::recipes::RecipeService;
use crate::storage::{create_storage, ObjectStorage};
use axum::extract::DefaultBodyLimit;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared state handed to every route handler
pub struct ServerResources {
    /// Database pool and managers
    pub database: Database,
    /// Recipe aggregate service
    pub recipes: RecipeService,
}

impl ServerResources {
    /// Assemble server resources from their building blocks
    #[must_use]
    pub fn new(database: Database, storage: Arc<dyn ObjectStorage>) -> Self {
        let recipes = RecipeService::new(&database, storage);
        Self { database, recipes }
    }

    /// Assemble resources from configuration with the default storage backend
    #[must_use]
    pub fn from_config(database: Database, config: &ServerConfig) -> Self {
        Self::new(database, create_storage(&config.storage))
    }
}

/// Build the full application router
#[must_use]
pub fn router(resources: Arc<ServerResources>) -> Router {
    Router::new()
        .merge(HealthRoutes::routes())
        .merge(RecipeRoutes::routes(resources))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(DefaultBodyLimit::max(defaults::MAX_UPLOAD_BYTES))
}
