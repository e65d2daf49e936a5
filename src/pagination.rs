// ABOUTME: Offset-based pagination module for recipe listings
// ABOUTME: Provides page metadata sufficient for page-link rendering
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Kondate Contributors

use serde::{Deserialize, Serialize};

/// Paginated response containing items and pagination metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    /// The items in this page
    pub items: Vec<T>,

    /// Total number of items matching the query across all pages
    pub total: u32,

    /// Current 1-based page number
    pub current_page: u32,

    /// Last 1-based page number (0 items still reports page 1)
    pub last_page: u32,

    /// Page size the listing was cut into
    pub per_page: u32,
}

impl<T> Page<T> {
    /// Assemble a page from a slice of items and the overall totals
    #[must_use]
    pub fn new(items: Vec<T>, total: u32, current_page: u32, per_page: u32) -> Self {
        Self {
            items,
            total,
            current_page,
            last_page: last_page(total, per_page),
            per_page,
        }
    }

    /// Whether a page follows this one
    #[must_use]
    pub fn has_more(&self) -> bool {
        self.current_page < self.last_page
    }
}

/// Compute the last 1-based page number for a total item count
///
/// An empty result still has one (empty) page so page links render.
#[must_use]
pub fn last_page(total: u32, per_page: u32) -> u32 {
    if total == 0 {
        1
    } else {
        total.div_ceil(per_page)
    }
}

/// Clamp a requested page number to the valid 1-based range
#[must_use]
pub fn normalize_page(requested: Option<u32>) -> u32 {
    requested.filter(|p| *p >= 1).unwrap_or(1)
}

/// Row offset for a 1-based page number
#[must_use]
pub fn offset_for_page(page: u32, per_page: u32) -> u32 {
    (page - 1) * per_page
}
