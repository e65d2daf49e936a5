// ABOUTME: Main library entry point for the Kondate recipe sharing platform
// ABOUTME: Exposes the HTTP API, persistence managers, and storage abstraction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Kondate Contributors

#![deny(unsafe_code)]

//! # Kondate
//!
//! A recipe-sharing platform API: users browse, filter, create, edit, and
//! review recipes with ingredients, steps, categories, and reviews.
//!
//! ## Architecture
//!
//! The server follows a modular architecture:
//! - **Routes**: Thin axum handlers that extract typed input and requester context
//! - **Services**: Protocol-agnostic business logic (validation, authorization,
//!   image upload, transactional persistence)
//! - **Database**: `sqlx`/SQLite domain managers; multi-row writes run inside
//!   a single guarded transaction
//! - **Storage**: Pluggable object storage for recipe images behind a trait
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use kondate::config::ServerConfig;
//! use kondate::errors::AppResult;
//!
//! fn main() -> AppResult<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("Kondate configured with port: HTTP={}", config.http_port);
//!     Ok(())
//! }
//! ```

/// Requester identity extraction for authenticated endpoints
pub mod auth;

/// Environment-based configuration management
pub mod config;

/// Application constants and environment variable names
pub mod constants;

/// Database management and per-domain persistence managers
pub mod database;

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Production logging and structured output
pub mod logging;

/// Common data models for recipes and their dependents
pub mod models;

/// Offset-based pagination for recipe listings
pub mod pagination;

/// `HTTP` routes for browsing and editing recipes
pub mod routes;

/// Domain service layer for recipe aggregate workflows
pub mod services;

/// Object storage abstraction for recipe images
pub mod storage;
