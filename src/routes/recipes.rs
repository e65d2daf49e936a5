// ABOUTME: Route handlers for the recipe REST API
// ABOUTME: Listing with filters, detail views, and multipart create/update endpoints
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Kondate Contributors

//! Recipe routes
//!
//! Browsing endpoints are public; create and edit endpoints require the
//! authenticated-user context forwarded by the edge proxy.

use crate::{
    auth,
    constants::defaults,
    database::categories::CategoriesManager,
    database::recipes::{RecipeFilters, RecipeInput, RecipesManager},
    errors::{AppError, AppResult},
    models::{Category, HomeHighlights, RecipeDetail, RecipeSummary},
    pagination::Page,
    routes::ServerResources,
};
use axum::{
    extract::{Multipart, Path, Query, State},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Response for the recipe listing, with the category side list for the
/// filter UI
#[derive(Debug, Serialize, Deserialize)]
pub struct ListRecipesResponse {
    /// The requested page of recipes
    pub recipes: Page<RecipeSummary>,
    /// All categories, unfiltered
    pub categories: Vec<Category>,
}

/// Response for a successful create
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateRecipeResponse {
    /// The freshly generated recipe id, for redirection to the detail view
    pub id: Uuid,
    /// Success notification
    pub message: String,
}

/// Response for a successful update
#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateRecipeResponse {
    /// The updated recipe id
    pub id: Uuid,
    /// Success notification
    pub message: String,
}

/// Response for the edit form: the full aggregate plus categories
#[derive(Debug, Serialize, Deserialize)]
pub struct EditRecipeResponse {
    /// The recipe aggregate being edited
    pub recipe: RecipeDetail,
    /// All categories, for the category selector
    pub categories: Vec<Category>,
}

/// Query parameters for listing recipes
#[derive(Debug, Deserialize, Default)]
pub struct ListRecipesQuery {
    /// Comma-separated category ids to filter by
    pub categories: Option<String>,
    /// Minimum average rating
    pub rating: Option<f64>,
    /// Title substring to filter by
    pub title: Option<String>,
    /// 1-based page number
    pub page: Option<u32>,
}

impl ListRecipesQuery {
    /// Convert query parameters into typed filters
    fn into_filters(self) -> AppResult<RecipeFilters> {
        let categories = self
            .categories
            .as_deref()
            .filter(|raw| !raw.is_empty())
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(|s| {
                        s.parse::<i64>().map_err(|_| {
                            AppError::invalid_input(format!("Invalid category id '{s}'"))
                        })
                    })
                    .collect::<AppResult<Vec<i64>>>()
            })
            .transpose()?;

        Ok(RecipeFilters {
            categories,
            rating: self.rating,
            title: self.title.filter(|t| !t.is_empty()),
            page: self.page,
        })
    }
}

/// Recipe routes handler
pub struct RecipeRoutes;

impl RecipeRoutes {
    /// Create all recipe routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/home", get(Self::handle_home))
            .route("/api/recipes", get(Self::handle_list))
            .route("/api/recipes", post(Self::handle_create))
            .route("/api/recipes/:id", get(Self::handle_show))
            .route("/api/recipes/:id", put(Self::handle_update))
            .route("/api/recipes/:id/edit", get(Self::handle_edit))
            .route("/api/categories", get(Self::handle_categories))
            .with_state(resources)
    }

    /// Get a recipes manager from the shared pool
    fn recipes_manager(resources: &Arc<ServerResources>) -> RecipesManager {
        RecipesManager::new(resources.database.pool().clone())
    }

    /// Get a categories manager from the shared pool
    fn categories_manager(resources: &Arc<ServerResources>) -> CategoriesManager {
        CategoriesManager::new(resources.database.pool().clone())
    }

    /// Handle GET /api/home - recent and popular highlights
    async fn handle_home(
        State(resources): State<Arc<ServerResources>>,
    ) -> Result<Response, AppError> {
        let manager = Self::recipes_manager(&resources);

        let recent = manager.recent(defaults::HOME_RECENT_COUNT).await?;
        let popular = manager.popular(defaults::HOME_POPULAR_COUNT).await?;

        let response = HomeHighlights { recent, popular };
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle GET /api/recipes - filtered, paginated listing
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        Query(query): Query<ListRecipesQuery>,
    ) -> Result<Response, AppError> {
        let filters = query.into_filters()?;

        let recipes = Self::recipes_manager(&resources).list(&filters).await?;
        let categories = Self::categories_manager(&resources).list().await?;

        let response = ListRecipesResponse {
            recipes,
            categories,
        };
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle GET /api/recipes/:id - recipe detail, counting the view
    async fn handle_show(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<Uuid>,
    ) -> Result<Response, AppError> {
        let requester = auth::maybe_authenticate(&headers)?;

        let detail = resources.recipes.view(id, requester).await?;
        Ok((StatusCode::OK, Json(detail)).into_response())
    }

    /// Handle POST /api/recipes - create a recipe aggregate
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        mut multipart: Multipart,
    ) -> Result<Response, AppError> {
        let auth = auth::authenticate(&headers)?;

        let (input, image) = parse_recipe_multipart(&mut multipart).await?;
        let image = image.ok_or_else(|| AppError::missing_field("image"))?;

        let id = resources.recipes.create(auth.user_id, &input, image).await?;

        let response = CreateRecipeResponse {
            id,
            message: "Recipe created".to_owned(),
        };
        Ok((StatusCode::CREATED, Json(response)).into_response())
    }

    /// Handle GET /api/recipes/:id/edit - load the aggregate for the edit
    /// form, owner only
    async fn handle_edit(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<Uuid>,
    ) -> Result<Response, AppError> {
        let requester = auth::maybe_authenticate(&headers)?;

        let recipe = resources.recipes.edit_load(id, requester).await?;
        let categories = Self::categories_manager(&resources).list().await?;

        let response = EditRecipeResponse { recipe, categories };
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle PUT /api/recipes/:id - update a recipe aggregate, owner only
    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<Uuid>,
        mut multipart: Multipart,
    ) -> Result<Response, AppError> {
        let requester = auth::maybe_authenticate(&headers)?;

        let (input, image) = parse_recipe_multipart(&mut multipart).await?;

        resources.recipes.update(id, requester, &input, image).await?;

        let response = UpdateRecipeResponse {
            id,
            message: "Recipe updated".to_owned(),
        };
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle GET /api/categories - category list for the create form
    async fn handle_categories(
        State(resources): State<Arc<ServerResources>>,
    ) -> Result<Response, AppError> {
        let categories = Self::categories_manager(&resources).list().await?;
        Ok((StatusCode::OK, Json(categories)).into_response())
    }
}

/// Parse a create/update multipart body into the typed recipe input and the
/// optional image bytes
///
/// Expected parts: `payload` (JSON-encoded [`RecipeInput`]) and `image`
/// (binary file, required on create, optional on update). Unknown parts are
/// ignored.
async fn parse_recipe_multipart(
    multipart: &mut Multipart,
) -> AppResult<(RecipeInput, Option<Bytes>)> {
    let mut payload: Option<RecipeInput> = None;
    let mut image: Option<Bytes> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::invalid_input(format!("Malformed multipart request: {e}")))?
    {
        let name = field.name().map(ToOwned::to_owned);
        match name.as_deref() {
            Some("payload") => {
                let text = field.text().await.map_err(|e| {
                    AppError::invalid_input(format!("Unreadable payload part: {e}"))
                })?;
                payload = Some(serde_json::from_str(&text).map_err(|e| {
                    AppError::invalid_input(format!("Invalid recipe payload: {e}"))
                })?);
            }
            Some("image") => {
                image = Some(field.bytes().await.map_err(|e| {
                    AppError::invalid_input(format!("Unreadable image part: {e}"))
                })?);
            }
            _ => {}
        }
    }

    let payload = payload.ok_or_else(|| AppError::missing_field("payload"))?;
    Ok((payload, image))
}
