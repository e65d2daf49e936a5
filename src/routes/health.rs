// ABOUTME: Health check route for liveness probes
// ABOUTME: Reports service name and version with no dependencies touched
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Kondate Contributors

use crate::constants::service_names;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use http::StatusCode;
use serde_json::json;

/// Health check routes handler
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create the health routes
    #[must_use]
    pub fn routes() -> Router {
        Router::new().route("/health", get(Self::handle_health))
    }

    /// Handle GET /health - liveness probe
    async fn handle_health() -> Response {
        (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "service": service_names::KONDATE_SERVER,
                "version": env!("CARGO_PKG_VERSION"),
            })),
        )
            .into_response()
    }
}
