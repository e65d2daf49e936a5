// ABOUTME: Integration tests for the recipe aggregate database manager
// ABOUTME: Covers transactional create/update, full-replace semantics, rollback, and view counting
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Kondate Contributors

#![allow(missing_docs, clippy::unwrap_used)]

mod common;

use common::{create_category, create_test_database, create_user, recipe_input};
use kondate::database::recipes::{RecipeInput, RecipesManager};
use kondate::errors::ErrorCode;
use kondate::models::Ingredient;
use sqlx::Row;
use uuid::Uuid;

// ============================================================================
// Create Tests
// ============================================================================

#[tokio::test]
async fn test_create_aggregate_round_trips_in_order() {
    let db = create_test_database().await;
    let user_id = create_user(&db, "alice").await;
    let category_id = create_category(&db, "和食").await;
    let manager = RecipesManager::new(db.pool().clone());

    let input = RecipeInput {
        title: "カレー".to_owned(),
        description: "スパイスから作る".to_owned(),
        category_id,
        ingredients: vec![
            Ingredient {
                name: "玉ねぎ".to_owned(),
                quantity: "2個".to_owned(),
            },
            Ingredient {
                name: "じゃがいも".to_owned(),
                quantity: "3個".to_owned(),
            },
            Ingredient {
                name: "カレー粉".to_owned(),
                quantity: "大さじ2".to_owned(),
            },
        ],
        steps: vec![
            "野菜を切る".to_owned(),
            "炒める".to_owned(),
            "煮込む".to_owned(),
            "カレー粉を加える".to_owned(),
        ],
    };

    let id = Uuid::new_v4();
    manager
        .create(id, user_id, "http://example.com/curry.jpg", &input)
        .await
        .unwrap();

    let detail = manager.load_detail(id).await.unwrap().unwrap();
    assert_eq!(detail.recipe.title, "カレー");
    assert_eq!(detail.recipe.user_id, user_id);
    assert_eq!(detail.recipe.views, 0);
    assert_eq!(detail.author_name, "alice");

    assert_eq!(detail.ingredients.len(), 3);
    assert_eq!(detail.ingredients[0].name, "玉ねぎ");
    assert_eq!(detail.ingredients[2].quantity, "大さじ2");

    assert_eq!(detail.steps.len(), 4);
    let numbers: Vec<u32> = detail.steps.iter().map(|s| s.step_number).collect();
    assert_eq!(numbers, vec![1, 2, 3, 4]);
    assert_eq!(detail.steps[3].description, "カレー粉を加える");
}

#[tokio::test]
async fn test_create_with_duplicate_id_fails() {
    let db = create_test_database().await;
    let user_id = create_user(&db, "alice").await;
    let category_id = create_category(&db, "洋食").await;
    let manager = RecipesManager::new(db.pool().clone());

    let input = recipe_input("stew", category_id, 2, 2);
    let id = Uuid::new_v4();
    manager.create(id, user_id, "http://img/1", &input).await.unwrap();

    let err = manager
        .create(id, user_id, "http://img/2", &input)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::DatabaseError);
}

#[tokio::test]
async fn test_create_rolls_back_fully_when_dependent_insert_fails() {
    let db = create_test_database().await;
    let user_id = create_user(&db, "alice").await;
    let category_id = create_category(&db, "中華").await;
    let manager = RecipesManager::new(db.pool().clone());

    // The empty final step violates the schema CHECK after the recipe and
    // ingredient rows were already written inside the transaction
    let mut input = recipe_input("half-written", category_id, 2, 2);
    input.steps.push(String::new());

    let id = Uuid::new_v4();
    let err = manager
        .create(id, user_id, "http://img/x", &input)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::DatabaseError);

    // No partial state is visible: recipe row and dependents are all gone
    assert!(manager.get(id).await.unwrap().is_none());
    let ingredients: i64 = sqlx::query("SELECT COUNT(*) AS count FROM ingredients WHERE recipe_id = $1")
        .bind(id.to_string())
        .fetch_one(db.pool())
        .await
        .unwrap()
        .get("count");
    assert_eq!(ingredients, 0);
}

// ============================================================================
// Update Tests
// ============================================================================

#[tokio::test]
async fn test_update_fully_replaces_dependents() {
    let db = create_test_database().await;
    let user_id = create_user(&db, "alice").await;
    let category_id = create_category(&db, "和食").await;
    let other_category = create_category(&db, "デザート").await;
    let manager = RecipesManager::new(db.pool().clone());

    let id = Uuid::new_v4();
    manager
        .create(id, user_id, "http://img/a", &recipe_input("before", category_id, 3, 4))
        .await
        .unwrap();

    let replacement = RecipeInput {
        title: "after".to_owned(),
        description: "rewritten".to_owned(),
        category_id: other_category,
        ingredients: vec![Ingredient {
            name: "butter".to_owned(),
            quantity: "50g".to_owned(),
        }],
        steps: vec!["melt".to_owned(), "pour".to_owned()],
    };
    manager.update(id, None, &replacement).await.unwrap();

    let detail = manager.load_detail(id).await.unwrap().unwrap();
    assert_eq!(detail.recipe.title, "after");
    assert_eq!(detail.recipe.category_id, other_category);
    // Image untouched when no new upload was supplied
    assert_eq!(detail.recipe.image, "http://img/a");

    // Old dependents are fully absent, only the re-submitted ones remain
    assert_eq!(detail.ingredients.len(), 1);
    assert_eq!(detail.ingredients[0].name, "butter");
    assert_eq!(detail.steps.len(), 2);
    let numbers: Vec<u32> = detail.steps.iter().map(|s| s.step_number).collect();
    assert_eq!(numbers, vec![1, 2]);
}

#[tokio::test]
async fn test_update_replaces_image_when_supplied() {
    let db = create_test_database().await;
    let user_id = create_user(&db, "alice").await;
    let category_id = create_category(&db, "和食").await;
    let manager = RecipesManager::new(db.pool().clone());

    let id = Uuid::new_v4();
    manager
        .create(id, user_id, "http://img/old", &recipe_input("soup", category_id, 1, 1))
        .await
        .unwrap();

    manager
        .update(id, Some("http://img/new"), &recipe_input("soup", category_id, 1, 1))
        .await
        .unwrap();

    let detail = manager.load_detail(id).await.unwrap().unwrap();
    assert_eq!(detail.recipe.image, "http://img/new");
}

#[tokio::test]
async fn test_update_unknown_recipe_is_not_found() {
    let db = create_test_database().await;
    create_user(&db, "alice").await;
    let category_id = create_category(&db, "和食").await;
    let manager = RecipesManager::new(db.pool().clone());

    let err = manager
        .update(Uuid::new_v4(), None, &recipe_input("ghost", category_id, 1, 1))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
}

#[tokio::test]
async fn test_update_rolls_back_deletes_when_insert_fails() {
    let db = create_test_database().await;
    let user_id = create_user(&db, "alice").await;
    let category_id = create_category(&db, "和食").await;
    let manager = RecipesManager::new(db.pool().clone());

    let id = Uuid::new_v4();
    let original = recipe_input("stable", category_id, 3, 4);
    manager.create(id, user_id, "http://img/s", &original).await.unwrap();

    // Fails on the step insert, after the old dependents were deleted
    // inside the same transaction
    let mut broken = recipe_input("broken", category_id, 2, 1);
    broken.steps.push(String::new());

    let err = manager.update(id, None, &broken).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::DatabaseError);

    // The delete-then-insert window is not observable: the original
    // aggregate is intact
    let detail = manager.load_detail(id).await.unwrap().unwrap();
    assert_eq!(detail.recipe.title, "stable");
    assert_eq!(detail.ingredients.len(), 3);
    assert_eq!(detail.steps.len(), 4);
}

#[tokio::test]
async fn test_update_with_unknown_category_fails_and_keeps_state() {
    let db = create_test_database().await;
    let user_id = create_user(&db, "alice").await;
    let category_id = create_category(&db, "和食").await;
    let manager = RecipesManager::new(db.pool().clone());

    let id = Uuid::new_v4();
    manager
        .create(id, user_id, "http://img/s", &recipe_input("stable", category_id, 2, 2))
        .await
        .unwrap();

    let mut bad_category = recipe_input("moved", category_id, 2, 2);
    bad_category.category_id = 9999;

    let err = manager.update(id, None, &bad_category).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::DatabaseError);

    let detail = manager.load_detail(id).await.unwrap().unwrap();
    assert_eq!(detail.recipe.title, "stable");
    assert_eq!(detail.recipe.category_id, category_id);
}

// ============================================================================
// View Counter Tests
// ============================================================================

#[tokio::test]
async fn test_increment_views_adds_exactly_one_per_call() {
    let db = create_test_database().await;
    let user_id = create_user(&db, "alice").await;
    let category_id = create_category(&db, "和食").await;
    let manager = RecipesManager::new(db.pool().clone());

    let id = Uuid::new_v4();
    manager
        .create(id, user_id, "http://img/v", &recipe_input("viewed", category_id, 1, 1))
        .await
        .unwrap();

    assert!(manager.increment_views(id).await.unwrap());
    assert!(manager.increment_views(id).await.unwrap());
    assert_eq!(manager.get(id).await.unwrap().unwrap().views, 2);
}

#[tokio::test]
async fn test_increment_views_on_unknown_recipe_counts_nothing() {
    let db = create_test_database().await;
    let manager = RecipesManager::new(db.pool().clone());

    assert!(!manager.increment_views(Uuid::new_v4()).await.unwrap());
}

// ============================================================================
// Input Validation Tests
// ============================================================================

#[tokio::test]
async fn test_validate_rejects_missing_fields() {
    let db = create_test_database().await;
    let category_id = create_category(&db, "和食").await;

    let mut no_title = recipe_input("x", category_id, 1, 1);
    no_title.title = "  ".to_owned();
    assert_eq!(
        no_title.validate().unwrap_err().code,
        ErrorCode::MissingRequiredField
    );

    let mut no_ingredients = recipe_input("x", category_id, 1, 1);
    no_ingredients.ingredients.clear();
    assert_eq!(
        no_ingredients.validate().unwrap_err().code,
        ErrorCode::InvalidInput
    );

    let mut no_steps = recipe_input("x", category_id, 1, 1);
    no_steps.steps.clear();
    assert_eq!(
        no_steps.validate().unwrap_err().code,
        ErrorCode::InvalidInput
    );

    let mut blank_step = recipe_input("x", category_id, 1, 2);
    blank_step.steps[1] = " ".to_owned();
    assert_eq!(
        blank_step.validate().unwrap_err().code,
        ErrorCode::MissingRequiredField
    );

    assert!(recipe_input("x", category_id, 1, 1).validate().is_ok());
}
