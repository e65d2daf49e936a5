// ABOUTME: Application constants organized by domain
// ABOUTME: Environment lookups, default values, and service naming in one place
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Kondate Contributors

//! Constants module
//!
//! Application constants grouped by domain rather than scattered across
//! modules: environment-derived settings, default values, and service names.

use std::env;

/// Environment-based configuration
pub mod env_config {
    use super::env;

    /// Get HTTP server port from environment or default
    #[must_use]
    pub fn http_port() -> u16 {
        env::var("HTTP_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(8080)
    }

    /// Get database URL from environment or default
    #[must_use]
    pub fn database_url() -> String {
        env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:./data/kondate.db".to_string())
    }

    /// Get the local storage root from environment or default
    #[must_use]
    pub fn storage_root() -> String {
        env::var("STORAGE_ROOT").unwrap_or_else(|_| "./data/uploads".to_string())
    }

    /// Get the public base URL uploaded images are served under
    #[must_use]
    pub fn storage_base_url() -> String {
        env::var("STORAGE_BASE_URL").unwrap_or_else(|_| "http://localhost:8080/uploads".to_string())
    }
}

/// Default values
pub mod defaults {
    /// Recipes per listing page
    pub const RECIPES_PER_PAGE: u32 = 5;
    /// Recipes shown in the "recent" home highlight
    pub const HOME_RECENT_COUNT: u32 = 3;
    /// Recipes shown in the "popular" home highlight
    pub const HOME_POPULAR_COUNT: u32 = 2;
    /// Storage path prefix for recipe images
    pub const RECIPE_IMAGE_PREFIX: &str = "recipe";
    /// Maximum accepted multipart body size in bytes (image + payload)
    pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
}

/// Service names for structured logging
pub mod service_names {
    /// Kondate server service name
    pub const KONDATE_SERVER: &str = "kondate_server";
}

/// Request header carrying the gateway-authenticated user id
pub mod headers {
    /// Set by the authenticating edge proxy; absent for anonymous requests
    pub const USER_ID: &str = "x-user-id";
}
