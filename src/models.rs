// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response data structures used by the REST API. All types
//! derive `Serialize`/`Deserialize` and `ToSchema` for automatic JSON
//! handling and OpenAPI documentation.
//!
//! Stored entities ([`crate::storage::records`]) and the joined claim view
//! ([`crate::engine::ClaimantClaim`]) are serialized directly; this module
//! holds the request envelopes and the thin response wrappers.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::engine::ClaimantEntry;

/// Provenance recorded when a request does not carry an explicit actor.
pub const DEFAULT_ACTOR: &str = "admin";

// =============================================================================
// Contract Models
// =============================================================================

/// Request to register a drop contract.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateContractRequest {
    /// Blockchain the contract is deployed on.
    pub blockchain: String,
    /// On-chain contract address.
    pub address: String,
    /// Human-readable title.
    pub title: String,
    /// Optional display image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_uri: Option<String>,
}

// =============================================================================
// Campaign Models
// =============================================================================

/// Request to create a drop campaign.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateCampaignRequest {
    /// Contract the campaign claims against.
    pub contract_id: Uuid,
    /// On-chain numeric claim identifier.
    pub claim_id: u64,
    /// Human-readable title.
    pub title: String,
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
}

/// Request to update a campaign.
///
/// Only the provided fields change; every update bumps the campaign's
/// `updated_at` and thereby marks all cached signatures for review on the
/// next refetch.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateCampaignRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Block height after which the contract rejects claims.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claim_block_deadline: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_pool_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_pool_id: Option<u64>,
}

// =============================================================================
// Claimant Models
// =============================================================================

/// Request to enroll a batch of recipients into a campaign.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EnrollClaimantsRequest {
    /// Recipients and their entitlement amounts.
    pub claimants: Vec<ClaimantEntry>,
    /// Who is enrolling this batch; recorded as provenance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_by: Option<String>,
}

/// Request to remove a batch of recipients from a campaign.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeleteClaimantsRequest {
    /// Addresses to remove, in any capitalization.
    pub addresses: Vec<String>,
}

/// Addresses actually removed by a bulk removal.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeleteClaimantsResponse {
    pub removed: Vec<String>,
}

/// Outcome of a signature refetch call.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RefetchResponse {
    /// How many claimant rows were re-signed and persisted.
    pub refreshed: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_request_fields_default_to_none() {
        let request: UpdateCampaignRequest = serde_json::from_str("{}").unwrap();
        assert!(request.title.is_none());
        assert!(request.claim_block_deadline.is_none());
    }

    #[test]
    fn enroll_request_parses_claimants() {
        let request: EnrollClaimantsRequest = serde_json::from_str(
            r#"{"claimants":[{"address":"0xAb","amount":5}]}"#,
        )
        .unwrap();
        assert_eq!(request.claimants.len(), 1);
        assert_eq!(request.claimants[0].amount, 5);
        assert!(request.added_by.is_none());
    }
}
