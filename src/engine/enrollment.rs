// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bulk claimant enrollment.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::storage::{DropDatabase, StoredClaimant};

use super::{address::normalize_address, DropError};

/// One recipient to enroll: an address and its entitlement amount.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ClaimantEntry {
    /// Recipient address in any capitalization.
    pub address: String,
    /// Entitlement amount, before on-chain decimal scaling.
    pub amount: u64,
}

/// Enroll a batch of recipients into a campaign.
///
/// The whole batch is validated first: every address is normalized, and a
/// batch whose normalized addresses collide is rejected outright before any
/// row is written. Persistence is one atomic upsert batch; existing rows
/// take the new amount and provenance while keeping their creation time.
///
/// Enrollment never signs anything — freshly enrolled rows sit in the stale
/// set until the next refetch call.
pub fn add_claimants(
    db: &DropDatabase,
    campaign_id: Uuid,
    entries: &[ClaimantEntry],
    added_by: &str,
) -> Result<Vec<StoredClaimant>, DropError> {
    if db.get_campaign(campaign_id)?.is_none() {
        return Err(DropError::CampaignNotFound(campaign_id));
    }

    let mut normalized = Vec::with_capacity(entries.len());
    for entry in entries {
        normalized.push(normalize_address(&entry.address)?);
    }

    let distinct: HashSet<&str> = normalized.iter().map(String::as_str).collect();
    if distinct.len() < entries.len() {
        return Err(DropError::DuplicateClaimant);
    }

    let rows = entries
        .iter()
        .zip(normalized)
        .map(|(entry, address)| {
            StoredClaimant::new_enrolled(campaign_id, address, entry.amount, added_by.to_string())
        })
        .collect();

    let committed = db.upsert_claimants(rows)?;
    tracing::info!(
        %campaign_id,
        claimants = committed.len(),
        added_by,
        "Enrolled claimants"
    );
    Ok(committed)
}
