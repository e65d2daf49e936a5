// ABOUTME: Recipe aggregate service orchestrating validation, uploads, and persistence
// ABOUTME: Owns the create/update/view/edit-load workflows and their authorization rules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Kondate Contributors

use crate::auth::AuthResult;
use crate::constants::defaults;
use crate::database::recipes::{RecipeInput, RecipesManager};
use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::models::RecipeDetail;
use crate::storage::ObjectStorage;
use bytes::Bytes;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Recipe aggregate service
///
/// Orchestrates the multi-table workflows: input validation happens before
/// any side effect, image upload must complete before the database
/// transaction begins, and ownership is enforced before any mutation.
pub struct RecipeService {
    recipes: RecipesManager,
    storage: Arc<dyn ObjectStorage>,
}

impl RecipeService {
    /// Create a new recipe service
    #[must_use]
    pub fn new(database: &Database, storage: Arc<dyn ObjectStorage>) -> Self {
        Self {
            recipes: RecipesManager::new(database.pool().clone()),
            storage,
        }
    }

    /// Create a recipe aggregate and return its freshly generated id
    ///
    /// # Errors
    ///
    /// Returns a validation error before any side effect, a storage error
    /// if the image upload fails (nothing persisted yet), or a database
    /// error if the transaction fails (rolled back in full)
    pub async fn create(
        &self,
        owner_id: Uuid,
        input: &RecipeInput,
        image: Bytes,
    ) -> AppResult<Uuid> {
        input.validate()?;
        if image.is_empty() {
            return Err(AppError::missing_field("image"));
        }

        let id = Uuid::new_v4();

        // The upload must complete before the transaction begins; a failed
        // upload aborts with nothing persisted
        let stored = self
            .storage
            .put_file(defaults::RECIPE_IMAGE_PREFIX, image)
            .await?;
        let image_url = self.storage.url_for(&stored);

        self.recipes.create(id, owner_id, &image_url, input).await?;

        info!(recipe_id = %id, user_id = %owner_id, "Recipe created");
        Ok(id)
    }

    /// Update a recipe aggregate, fully replacing its dependents
    ///
    /// When `image` is supplied the stored URL is replaced; otherwise the
    /// existing image is untouched.
    ///
    /// # Errors
    ///
    /// Returns a validation error, `PermissionDenied` unless the requester
    /// owns the recipe, `ResourceNotFound` for an unknown id, a storage
    /// error on upload failure, or a database error (rolled back in full)
    pub async fn update(
        &self,
        id: Uuid,
        requester: Option<AuthResult>,
        input: &RecipeInput,
        image: Option<Bytes>,
    ) -> AppResult<()> {
        input.validate()?;
        let owner_id = self.authorize_owner(id, requester).await?;

        let image_url = match image {
            Some(data) => {
                if data.is_empty() {
                    return Err(AppError::invalid_input("Submitted image file is empty"));
                }
                let stored = self
                    .storage
                    .put_file(defaults::RECIPE_IMAGE_PREFIX, data)
                    .await?;
                Some(self.storage.url_for(&stored))
            }
            None => None,
        };

        self.recipes
            .update(id, image_url.as_deref(), input)
            .await?;

        info!(recipe_id = %id, user_id = %owner_id, "Recipe updated");
        Ok(())
    }

    /// Load a recipe detail and count the view
    ///
    /// The counter is a single minimal update issued in the same request,
    /// deliberately not tied to the read transactionally: a lost or double
    /// count under racing requests is accepted.
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` for an unknown id or a database error
    pub async fn view(
        &self,
        id: Uuid,
        requester: Option<AuthResult>,
    ) -> AppResult<RecipeDetail> {
        let counted = self.recipes.increment_views(id).await?;
        if !counted {
            return Err(AppError::not_found(format!("Recipe {id}")));
        }

        let mut detail = self
            .recipes
            .load_detail(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Recipe {id}")))?;

        detail.is_owner = requester.is_some_and(|auth| auth.user_id == detail.recipe.user_id);
        Ok(detail)
    }

    /// Load a recipe detail for the edit form, without counting a view
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` for an unknown id, or `PermissionDenied`
    /// unless the requester is authenticated and owns the recipe
    pub async fn edit_load(
        &self,
        id: Uuid,
        requester: Option<AuthResult>,
    ) -> AppResult<RecipeDetail> {
        let mut detail = self
            .recipes
            .load_detail(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Recipe {id}")))?;

        let auth = requester
            .ok_or_else(|| AppError::forbidden("Authentication required to edit a recipe"))?;
        if auth.user_id != detail.recipe.user_id {
            return Err(AppError::forbidden("Only the recipe owner may edit it")
                .with_user_id(auth.user_id)
                .with_resource_id(id.to_string()));
        }

        detail.is_owner = true;
        Ok(detail)
    }

    /// Resolve the owner of a recipe and require the requester to be them
    ///
    /// Checked before any mutation is attempted.
    async fn authorize_owner(
        &self,
        id: Uuid,
        requester: Option<AuthResult>,
    ) -> AppResult<Uuid> {
        let recipe = self
            .recipes
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Recipe {id}")))?;

        let auth = requester
            .ok_or_else(|| AppError::forbidden("Authentication required to edit a recipe"))?;
        if auth.user_id != recipe.user_id {
            return Err(AppError::forbidden("Only the recipe owner may edit it")
                .with_user_id(auth.user_id)
                .with_resource_id(id.to_string()));
        }

        Ok(recipe.user_id)
    }
}
