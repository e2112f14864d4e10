// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Mutating routes (enrollment, refetch, campaign and contract
//! administration) require a shared admin bearer token. The identity
//! provider that would map tokens to individual operators sits in front of
//! this service and is out of scope here.
//!
//! ## Modes
//!
//! - **Production mode** (`ADMIN_TOKEN` set): requests must carry
//!   `Authorization: Bearer <token>`.
//! - **Development mode** (`ADMIN_TOKEN` unset): mutating routes are open.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::error::ApiError;
use crate::state::AppState;

/// Extractor gating mutating handlers on the admin bearer token.
///
/// ```rust,ignore
/// async fn create_campaign(
///     _admin: AdminAuth,
///     State(state): State<AppState>,
///     ...
/// ) -> Result<...> { ... }
/// ```
pub struct AdminAuth;

impl FromRequestParts<AppState> for AdminAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(expected) = &state.admin_token else {
            // Development mode
            return Ok(Self);
        };

        let presented = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or_else(|| ApiError::unauthorized("Missing bearer token"))?;

        if presented != expected.as_ref() {
            return Err(ApiError::unauthorized("Invalid admin token"));
        }
        Ok(Self)
    }
}
