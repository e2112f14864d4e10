// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::engine::DropError;
use crate::storage::DropDbError;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<DropError> for ApiError {
    fn from(err: DropError) -> Self {
        match &err {
            DropError::DuplicateClaimant | DropError::InvalidAddress(_) => {
                Self::bad_request(err.to_string())
            }
            DropError::MissingDeadline(_) => Self::bad_request(err.to_string()),
            DropError::CampaignNotFound(_)
            | DropError::ContractNotFound(_)
            | DropError::ClaimantNotFound { .. } => Self::not_found(err.to_string()),
            // Upstream dependencies failed; the store is untouched and the
            // caller may retry.
            DropError::TokenMetadataUnavailable(_) | DropError::SignerUnavailable(_) => {
                Self::bad_gateway(err.to_string())
            }
            DropError::Storage(inner) => match inner {
                DropDbError::NotFound(_) => Self::not_found(err.to_string()),
                DropDbError::Conflict(_) => Self::conflict(err.to_string()),
                _ => Self::internal(err.to_string()),
            },
        }
    }
}

impl From<DropDbError> for ApiError {
    fn from(err: DropDbError) -> Self {
        match &err {
            DropDbError::NotFound(_) => Self::not_found(err.to_string()),
            DropDbError::Conflict(_) => Self::conflict(err.to_string()),
            _ => Self::internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use uuid::Uuid;

    #[test]
    fn constructors_set_status_and_message() {
        let nf = ApiError::not_found("missing");
        assert_eq!(nf.status, StatusCode::NOT_FOUND);
        assert_eq!(nf.message, "missing");

        let bad = ApiError::bad_request("bad");
        assert_eq!(bad.status, StatusCode::BAD_REQUEST);
        assert_eq!(bad.message, "bad");
    }

    #[test]
    fn engine_errors_map_to_http_statuses() {
        let id = Uuid::new_v4();
        assert_eq!(
            ApiError::from(DropError::DuplicateClaimant).status,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(DropError::MissingDeadline(id)).status,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(DropError::CampaignNotFound(id)).status,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(DropError::SignerUnavailable(
                crate::signer::SignerError::Unavailable("down".into())
            ))
            .status,
            StatusCode::BAD_GATEWAY
        );
    }

    #[tokio::test]
    async fn into_response_returns_json_body() {
        let response = ApiError::bad_request("bad data").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(body_bytes.to_vec()).unwrap();
        assert_eq!(body, r#"{"error":"bad data"}"#);
    }
}
