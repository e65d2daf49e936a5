// ABOUTME: Requester identity extraction for authenticated endpoints
// ABOUTME: Reads the gateway-verified user id header into an explicit context value
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Kondate Contributors

//! Requester identity
//!
//! Authentication itself happens at the edge: the authenticating proxy
//! verifies the session and forwards the user id in the `x-user-id` header.
//! This module turns that ambient header into an explicit value handed to
//! every service call, so the service layer never reaches for global
//! authentication state.

use crate::constants::headers;
use crate::errors::{AppError, AppResult};
use http::HeaderMap;
use uuid::Uuid;

/// Result of successful authentication
#[derive(Debug, Clone, Copy)]
pub struct AuthResult {
    /// The authenticated user's id
    pub user_id: Uuid,
}

/// Extract the requester id if the request carries one
///
/// Absent header means an anonymous request; a present but malformed header
/// is rejected rather than silently treated as anonymous.
///
/// # Errors
///
/// Returns `AuthInvalid` if the header is present but not a valid UUID
pub fn maybe_authenticate(header_map: &HeaderMap) -> AppResult<Option<AuthResult>> {
    let Some(value) = header_map.get(headers::USER_ID) else {
        return Ok(None);
    };

    let raw = value
        .to_str()
        .map_err(|_| AppError::auth_invalid("Malformed user id header"))?;
    let user_id = Uuid::parse_str(raw)
        .map_err(|e| AppError::auth_invalid(format!("Invalid user id header: {e}")))?;

    Ok(Some(AuthResult { user_id }))
}

/// Extract and require an authenticated requester
///
/// # Errors
///
/// Returns `AuthRequired` when no identity header is present, or
/// `AuthInvalid` when it is malformed
pub fn authenticate(header_map: &HeaderMap) -> AppResult<AuthResult> {
    maybe_authenticate(header_map)?.ok_or_else(AppError::auth_required)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::errors::ErrorCode;

    #[test]
    fn test_missing_header_is_anonymous() {
        let header_map = HeaderMap::new();
        assert!(maybe_authenticate(&header_map).unwrap().is_none());
        assert_eq!(
            authenticate(&header_map).unwrap_err().code,
            ErrorCode::AuthRequired
        );
    }

    #[test]
    fn test_valid_header_authenticates() {
        let user_id = Uuid::new_v4();
        let mut header_map = HeaderMap::new();
        header_map.insert(headers::USER_ID, user_id.to_string().parse().unwrap());

        let auth = authenticate(&header_map).unwrap();
        assert_eq!(auth.user_id, user_id);
    }

    #[test]
    fn test_malformed_header_is_rejected() {
        let mut header_map = HeaderMap::new();
        header_map.insert(headers::USER_ID, "not-a-uuid".parse().unwrap());

        assert_eq!(
            maybe_authenticate(&header_map).unwrap_err().code,
            ErrorCode::AuthInvalid
        );
    }
}
