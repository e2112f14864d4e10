// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Stored record types for the drop database.
//!
//! ## Entity Relationships
//!
//! ```text
//! StoredContract 1 ──── n StoredCampaign 1 ──── n StoredClaimant
//! ```
//!
//! A contract is an on-chain drop contract registered with this service.
//! A campaign binds a numeric on-chain claim id to that contract and carries
//! the block deadline the contract enforces. A claimant is one recipient's
//! entitlement within a campaign, together with its cached authorization
//! signature.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A registered on-chain drop contract.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StoredContract {
    /// Unique contract identifier.
    pub id: Uuid,
    /// Blockchain the contract is deployed on (e.g., "ethereum", "polygon").
    pub blockchain: String,
    /// On-chain contract address (EIP-55 checksum form).
    pub address: String,
    /// Human-readable title.
    pub title: String,
    /// Optional display image.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_uri: Option<String>,
    /// When the contract was registered.
    pub created_at: DateTime<Utc>,
    /// When the registration was last modified.
    pub updated_at: DateTime<Utc>,
}

impl StoredContract {
    /// Create a new contract registration.
    pub fn new(blockchain: String, address: String, title: String, image_uri: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            blockchain,
            address,
            title,
            image_uri,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A drop campaign: one claim id on one contract.
///
/// `updated_at` is the staleness signal for cached claimant signatures: a
/// signature produced before the campaign was last modified must be
/// regenerated before it is served.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StoredCampaign {
    /// Unique campaign identifier.
    pub id: Uuid,
    /// The contract this campaign claims against.
    pub contract_id: Uuid,
    /// On-chain numeric claim identifier.
    pub claim_id: u64,
    /// Human-readable title.
    pub title: String,
    /// Human-readable description.
    pub description: String,
    /// Whether claims are currently being served for this campaign.
    pub active: bool,
    /// Block height after which the contract rejects claims.
    /// Signature generation is refused while this is unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub claim_block_deadline: Option<u64>,
    /// Authorization pool contract used by off-chain permission checks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_pool_address: Option<String>,
    /// Pool id within the authorization pool contract.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_pool_id: Option<u64>,
    /// When the campaign was created.
    pub created_at: DateTime<Utc>,
    /// When the campaign was last modified.
    pub updated_at: DateTime<Utc>,
}

impl StoredCampaign {
    /// Create a new inactive campaign on a contract.
    pub fn new(contract_id: Uuid, claim_id: u64, title: String, description: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            contract_id,
            claim_id,
            title,
            description,
            active: false,
            claim_block_deadline: None,
            auth_pool_address: None,
            auth_pool_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Bump the modification timestamp, invalidating cached signatures.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// One recipient's entitlement within a campaign.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StoredClaimant {
    /// The campaign this entitlement belongs to.
    pub campaign_id: Uuid,
    /// Recipient address (EIP-55 checksum form).
    pub address: String,
    /// Entitlement amount as stored by the campaign owner, before any
    /// on-chain decimal scaling.
    pub amount: u64,
    /// Textual record of the amount exactly as enrolled, kept for audit.
    pub raw_amount: String,
    /// Who enrolled or last re-signed this recipient.
    pub added_by: String,
    /// Cached claim authorization signature, if one has been produced.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    /// Commitment hash the cached signature was produced over. Cleared
    /// together with the signature whenever the entitlement changes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commitment_hash: Option<String>,
    /// When the recipient was first enrolled.
    pub created_at: DateTime<Utc>,
    /// When the entitlement or signature was last written.
    pub updated_at: DateTime<Utc>,
}

impl StoredClaimant {
    /// Create a freshly enrolled claimant with no signature.
    pub fn new_enrolled(campaign_id: Uuid, address: String, amount: u64, added_by: String) -> Self {
        let now = Utc::now();
        Self {
            campaign_id,
            raw_amount: amount.to_string(),
            address,
            amount,
            added_by,
            signature: None,
            commitment_hash: None,
            created_at: now,
            updated_at: now,
        }
    }
}
