// ABOUTME: Common data models for recipes, their dependent rows, and read projections
// ABOUTME: Defines Recipe, Ingredient, Step, Category, Review, User, and detail/summary views
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Kondate Contributors

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A recipe row
///
/// Owned by exactly one user. Ingredients, steps, and reviews hang off it;
/// ingredients and steps are always created and replaced together with the
/// recipe as one aggregate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    /// Unique identifier, generated server-side at creation
    pub id: Uuid,
    /// Display title
    pub title: String,
    /// Free-text description
    pub description: String,
    /// Category reference
    pub category_id: i64,
    /// Owning user
    pub user_id: Uuid,
    /// Public URL of the uploaded recipe image
    pub image: String,
    /// Detail-view counter; incremented once per detail request
    pub views: u32,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// An ingredient of a recipe
///
/// No identity beyond recipe association and insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    /// Ingredient name
    pub name: String,
    /// Quantity as free text ("200g", "大さじ2")
    pub quantity: String,
}

/// A preparation step of a recipe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    /// 1-based position, contiguous, equal to the submission order
    pub step_number: u32,
    /// Instruction text
    pub description: String,
}

/// A recipe category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Unique identifier
    pub id: i64,
    /// Display name
    pub name: String,
}

/// A review left on a recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    /// Unique identifier
    pub id: i64,
    /// Reviewed recipe
    pub recipe_id: Uuid,
    /// Reviewing user
    pub user_id: Uuid,
    /// Rating, 1..=5
    pub rating: u32,
}

/// A review joined with the authoring user's name, for detail views
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewDetail {
    /// Rating, 1..=5
    pub rating: u32,
    /// Name of the reviewing user
    pub user_name: String,
}

/// A user account
///
/// Authentication lives at the edge; the service only needs identity and
/// display name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: Uuid,
    /// Display name
    pub name: String,
}

/// A recipe row joined with its owner's name for listings and highlights
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeSummary {
    /// Recipe identifier
    pub id: Uuid,
    /// Display title
    pub title: String,
    /// Free-text description
    pub description: String,
    /// Public image URL
    pub image: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Owner's display name
    pub author_name: String,
    /// Detail-view counter
    pub views: u32,
    /// Null-safe average review rating; `None` when the recipe has no reviews
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_rating: Option<f64>,
}

/// A fully loaded recipe aggregate for detail and edit views
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeDetail {
    /// The recipe row
    pub recipe: Recipe,
    /// Owner's display name
    pub author_name: String,
    /// Ingredients in insertion order
    pub ingredients: Vec<Ingredient>,
    /// Steps ordered by `step_number`
    pub steps: Vec<Step>,
    /// Reviews with their authoring users
    pub reviews: Vec<ReviewDetail>,
    /// Whether the requester is the owning user
    pub is_owner: bool,
}

/// Home page highlights: bounded top-N reads with no filtering
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HomeHighlights {
    /// The 3 most recently created recipes
    pub recent: Vec<RecipeSummary>,
    /// The 2 most viewed recipes
    pub popular: Vec<RecipeSummary>,
}
