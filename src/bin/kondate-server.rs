// ABOUTME: Server binary for the Kondate recipe sharing platform
// ABOUTME: Loads configuration, initializes logging and the database, and serves the API
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Kondate Contributors

//! # Kondate Server Binary
//!
//! Starts the recipe sharing API: configuration from the environment,
//! structured logging, database migrations, and the axum router.

use anyhow::Result;
use clap::Parser;
use kondate::{config::ServerConfig, database::Database, logging, routes, routes::ServerResources};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "kondate-server")]
#[command(about = "Kondate recipe sharing API server")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Override database URL
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration from environment
    let mut config = ServerConfig::from_env()?;

    // Apply command-line overrides
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }
    if let Some(database_url) = args.database_url {
        config.database.url = kondate::config::DatabaseUrl::parse_url(&database_url);
    }

    // Initialize production logging
    logging::init_from_env()?;

    info!("Starting Kondate recipe sharing API");
    info!("{}", config.summary());

    // Initialize database and run migrations
    let database = Database::new(&config.database.url.to_connection_string()).await?;
    info!("Database initialized successfully");

    // Assemble shared resources and the router
    let resources = Arc::new(ServerResources::from_config(database, &config));
    let router = routes::router(resources);

    display_available_endpoints(&config);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.http_port));
    info!("Server listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

/// Display all available API endpoints
fn display_available_endpoints(config: &ServerConfig) {
    let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = config.http_port;

    info!("=== Available API Endpoints ===");
    info!("Recipes:");
    info!("   Home Highlights:   GET  http://{host}:{port}/api/home");
    info!("   List Recipes:      GET  http://{host}:{port}/api/recipes");
    info!("   Recipe Detail:     GET  http://{host}:{port}/api/recipes/{{id}}");
    info!("   Create Recipe:     POST http://{host}:{port}/api/recipes");
    info!("   Edit Form Data:    GET  http://{host}:{port}/api/recipes/{{id}}/edit");
    info!("   Update Recipe:     PUT  http://{host}:{port}/api/recipes/{{id}}");
    info!("Categories:");
    info!("   List Categories:   GET  http://{host}:{port}/api/categories");
    info!("Monitoring:");
    info!("   Health Check:      GET  http://{host}:{port}/health");
    info!("=== End of Endpoint List ===");
}
