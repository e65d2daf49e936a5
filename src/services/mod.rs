// ABOUTME: Domain service layer for business logic extracted from route handlers
// ABOUTME: Keeps handlers thin and business rules protocol-agnostic
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Kondate Contributors

//! Domain service layer
//!
//! This module contains protocol-agnostic business logic extracted from
//! route handlers, ensuring consistent business rules regardless of the
//! entry point.

/// Recipe aggregate workflows: validation, authorization, image upload,
/// transactional persistence
pub mod recipes;
