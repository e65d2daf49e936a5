// ABOUTME: Demo data seeder for the Kondate recipe platform
// ABOUTME: Creates default categories and a demo user for local development
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Kondate Contributors

//! Demo data seeder for Kondate.
//!
//! Usage:
//! ```bash
//! # Seed with default settings
//! cargo run --bin kondate-seed
//!
//! # Seed against a specific database
//! cargo run --bin kondate-seed -- --database-url sqlite:./data/kondate.db
//! ```

use anyhow::Result;
use clap::Parser;
use kondate::config::ServerConfig;
use kondate::database::categories::CategoriesManager;
use kondate::database::users::UsersManager;
use kondate::database::Database;
use kondate::logging;
use tracing::info;

/// Categories every fresh install starts with
const DEFAULT_CATEGORIES: &[&str] = &[
    "和食",
    "洋食",
    "中華",
    "デザート",
    "その他",
];

/// Display name for the demo account
const DEMO_USER_NAME: &str = "demo";

#[derive(Parser)]
#[command(name = "kondate-seed")]
#[command(about = "Kondate demo data seeder")]
struct SeedArgs {
    /// Database URL override
    #[arg(long)]
    database_url: Option<String>,

    /// Name for the demo user
    #[arg(long)]
    user_name: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = SeedArgs::parse();

    logging::init_from_env()?;

    let config = ServerConfig::from_env()?;
    let database_url = args
        .database_url
        .unwrap_or_else(|| config.database.url.to_connection_string());

    let database = Database::new(&database_url).await?;
    info!("Database initialized: {database_url}");

    let categories = CategoriesManager::new(database.pool().clone());
    for name in DEFAULT_CATEGORIES {
        let id = categories.create(name).await?;
        info!(category_id = id, name = %name, "Category ready");
    }

    let users = UsersManager::new(database.pool().clone());
    let user = users
        .create(args.user_name.as_deref().unwrap_or(DEMO_USER_NAME))
        .await?;
    info!(user_id = %user.id, name = %user.name, "Demo user created");

    info!("Seeding complete");
    Ok(())
}
