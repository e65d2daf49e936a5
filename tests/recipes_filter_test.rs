// ABOUTME: Integration tests for the recipe listing query builder and home highlights
// ABOUTME: Covers filter composition, HAVING-based rating threshold, pagination, and top-N reads
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Kondate Contributors

#![allow(missing_docs, clippy::unwrap_used)]

mod common;

use common::{create_category, create_test_database, create_user, recipe_input};
use kondate::database::recipes::{RecipeFilters, RecipesManager};
use kondate::database::reviews::ReviewsManager;
use kondate::database::Database;
use uuid::Uuid;

/// Create a recipe and return its id
async fn create_recipe(
    database: &Database,
    user_id: Uuid,
    category_id: i64,
    title: &str,
) -> Uuid {
    let manager = RecipesManager::new(database.pool().clone());
    let id = Uuid::new_v4();
    manager
        .create(id, user_id, "http://img/x", &recipe_input(title, category_id, 1, 1))
        .await
        .unwrap();
    id
}

// ============================================================================
// Filter Tests
// ============================================================================

#[tokio::test]
async fn test_unfiltered_list_is_newest_first_with_null_safe_averages() {
    let db = create_test_database().await;
    let user_id = create_user(&db, "alice").await;
    let category_id = create_category(&db, "和食").await;
    let manager = RecipesManager::new(db.pool().clone());
    let reviews = ReviewsManager::new(db.pool().clone());

    let first = create_recipe(&db, user_id, category_id, "first").await;
    let second = create_recipe(&db, user_id, category_id, "second").await;
    reviews.create(second, user_id, 4).await.unwrap();

    let page = manager.list(&RecipeFilters::default()).await.unwrap();
    assert_eq!(page.total, 2);

    // Newest first
    assert_eq!(page.items[0].id, second);
    assert_eq!(page.items[1].id, first);

    // Recipes with no reviews carry no average, never zero
    assert_eq!(page.items[0].average_rating, Some(4.0));
    assert_eq!(page.items[1].average_rating, None);
}

#[tokio::test]
async fn test_category_filter_matches_membership_in_set() {
    let db = create_test_database().await;
    let user_id = create_user(&db, "alice").await;
    let washoku = create_category(&db, "和食").await;
    let yoshoku = create_category(&db, "洋食").await;
    let chuka = create_category(&db, "中華").await;
    let manager = RecipesManager::new(db.pool().clone());

    create_recipe(&db, user_id, washoku, "sushi").await;
    create_recipe(&db, user_id, yoshoku, "gratin").await;
    create_recipe(&db, user_id, chuka, "mapo").await;

    let filters = RecipeFilters {
        categories: Some(vec![washoku, chuka]),
        ..Default::default()
    };
    let page = manager.list(&filters).await.unwrap();

    assert_eq!(page.total, 2);
    let titles: Vec<&str> = page.items.iter().map(|r| r.title.as_str()).collect();
    assert!(titles.contains(&"sushi"));
    assert!(titles.contains(&"mapo"));
}

#[tokio::test]
async fn test_title_filter_is_unanchored_substring() {
    let db = create_test_database().await;
    let user_id = create_user(&db, "alice").await;
    let category_id = create_category(&db, "和食").await;
    let manager = RecipesManager::new(db.pool().clone());

    create_recipe(&db, user_id, category_id, "チキンカレー").await;
    create_recipe(&db, user_id, category_id, "カレーうどん").await;
    create_recipe(&db, user_id, category_id, "肉じゃが").await;

    let filters = RecipeFilters {
        title: Some("カレー".to_owned()),
        ..Default::default()
    };
    let page = manager.list(&filters).await.unwrap();

    assert_eq!(page.total, 2);
    assert!(page.items.iter().all(|r| r.title.contains("カレー")));
}

#[tokio::test]
async fn test_rating_filter_applies_after_aggregation_and_reorders() {
    let db = create_test_database().await;
    let alice = create_user(&db, "alice").await;
    let bob = create_user(&db, "bob").await;
    let category_id = create_category(&db, "和食").await;
    let manager = RecipesManager::new(db.pool().clone());
    let reviews = ReviewsManager::new(db.pool().clone());

    // good: avg 4.5, great: avg 5.0, poor: avg 2.0, unrated: no reviews
    let good = create_recipe(&db, alice, category_id, "good").await;
    reviews.create(good, alice, 4).await.unwrap();
    reviews.create(good, bob, 5).await.unwrap();

    let great = create_recipe(&db, alice, category_id, "great").await;
    reviews.create(great, bob, 5).await.unwrap();

    let poor = create_recipe(&db, alice, category_id, "poor").await;
    reviews.create(poor, bob, 2).await.unwrap();

    create_recipe(&db, alice, category_id, "unrated").await;

    let filters = RecipeFilters {
        rating: Some(4.0),
        ..Default::default()
    };
    let page = manager.list(&filters).await.unwrap();

    // Recipes without reviews never pass the threshold (NULL average)
    assert_eq!(page.total, 2);

    // Ordering switched to descending average rating
    assert_eq!(page.items[0].id, great);
    assert_eq!(page.items[1].id, good);
    assert_eq!(page.items[1].average_rating, Some(4.5));
}

#[tokio::test]
async fn test_filters_compose_conjunctively() {
    let db = create_test_database().await;
    let alice = create_user(&db, "alice").await;
    let washoku = create_category(&db, "和食").await;
    let yoshoku = create_category(&db, "洋食").await;
    let manager = RecipesManager::new(db.pool().clone());
    let reviews = ReviewsManager::new(db.pool().clone());

    // In category A with high rating - the only expected match
    let match_id = create_recipe(&db, alice, washoku, "match").await;
    reviews.create(match_id, alice, 5).await.unwrap();

    // In category A but rated too low
    let low = create_recipe(&db, alice, washoku, "low").await;
    reviews.create(low, alice, 3).await.unwrap();

    // Rated high but in the wrong category
    let wrong_cat = create_recipe(&db, alice, yoshoku, "wrong-category").await;
    reviews.create(wrong_cat, alice, 5).await.unwrap();

    let filters = RecipeFilters {
        categories: Some(vec![washoku]),
        rating: Some(4.0),
        ..Default::default()
    };
    let page = manager.list(&filters).await.unwrap();

    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].id, match_id);
}

// ============================================================================
// Pagination Tests
// ============================================================================

#[tokio::test]
async fn test_page_two_of_twelve_recipes() {
    let db = create_test_database().await;
    let user_id = create_user(&db, "alice").await;
    let category_id = create_category(&db, "和食").await;
    let manager = RecipesManager::new(db.pool().clone());

    for n in 1..=12 {
        create_recipe(&db, user_id, category_id, &format!("recipe {n:02}")).await;
    }

    let filters = RecipeFilters {
        page: Some(2),
        ..Default::default()
    };
    let page = manager.list(&filters).await.unwrap();

    assert_eq!(page.total, 12);
    assert_eq!(page.current_page, 2);
    assert_eq!(page.last_page, 3);
    assert_eq!(page.per_page, 5);

    // Newest-first: page 2 carries records 6-10, i.e. recipes 07 down to 03
    assert_eq!(page.items.len(), 5);
    let titles: Vec<&str> = page.items.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(
        titles,
        vec!["recipe 07", "recipe 06", "recipe 05", "recipe 04", "recipe 03"]
    );
}

#[tokio::test]
async fn test_empty_listing_still_reports_one_page() {
    let db = create_test_database().await;
    let manager = RecipesManager::new(db.pool().clone());

    let page = manager.list(&RecipeFilters::default()).await.unwrap();
    assert_eq!(page.total, 0);
    assert!(page.items.is_empty());
    assert_eq!(page.current_page, 1);
    assert_eq!(page.last_page, 1);
}

// ============================================================================
// Home Highlight Tests
// ============================================================================

#[tokio::test]
async fn test_recent_returns_three_newest_with_author_names() {
    let db = create_test_database().await;
    let user_id = create_user(&db, "alice").await;
    let category_id = create_category(&db, "和食").await;
    let manager = RecipesManager::new(db.pool().clone());

    for n in 1..=5 {
        create_recipe(&db, user_id, category_id, &format!("recipe {n}")).await;
    }

    let recent = manager.recent(3).await.unwrap();
    assert_eq!(recent.len(), 3);
    let titles: Vec<&str> = recent.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["recipe 5", "recipe 4", "recipe 3"]);
    assert!(recent.iter().all(|r| r.author_name == "alice"));
}

#[tokio::test]
async fn test_popular_returns_two_most_viewed() {
    let db = create_test_database().await;
    let user_id = create_user(&db, "alice").await;
    let category_id = create_category(&db, "和食").await;
    let manager = RecipesManager::new(db.pool().clone());

    create_recipe(&db, user_id, category_id, "quiet").await;
    let hit = create_recipe(&db, user_id, category_id, "hit").await;
    let mid = create_recipe(&db, user_id, category_id, "mid").await;

    for _ in 0..5 {
        manager.increment_views(hit).await.unwrap();
    }
    for _ in 0..2 {
        manager.increment_views(mid).await.unwrap();
    }

    let popular = manager.popular(2).await.unwrap();
    assert_eq!(popular.len(), 2);
    assert_eq!(popular[0].title, "hit");
    assert_eq!(popular[0].views, 5);
    assert_eq!(popular[1].title, "mid");
}
