// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Batched regeneration of claim authorization signatures.
//!
//! ## Algorithm
//!
//! 1. Take the campaign's advisory lock, so concurrent refetch calls for the
//!    same campaign serialize instead of double-signing the same rows.
//! 2. Refuse outright while the campaign has no block deadline — a signature
//!    without a deadline would authorize a claim forever.
//! 3. Capture the stale set (unsigned rows, plus rows last written before the
//!    campaign was modified) as one stable snapshot.
//! 4. Page through the snapshot: transform each page's amounts in one batched
//!    call, compute each row's commitment hash, and submit the page's unique
//!    unsigned hashes to the signer as one batch. A row whose cached
//!    signature already commits to the current parameters is carried over
//!    without a signing round-trip.
//! 5. After all pages are signed, persist `{signature, updated_at}` for the
//!    entire set in one write transaction.
//!
//! Any failure before step 5 leaves the store byte-for-byte unchanged; there
//! is no retry and no partial visibility.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use alloy::primitives::{Address, B256};
use chrono::Utc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::blockchain::{claim_message_hash, ClaimMetadataSource};
use crate::signer::BatchSign;
use crate::storage::{DropDatabase, SignatureUpdate, StoredClaimant};

use super::{amounts::batch_transform_claim_amounts, DropError};

/// Upper bound on one signing request's payload.
pub const BATCH_SIGNATURE_PAGE_SIZE: usize = 500;

/// Per-campaign advisory locks serializing signature refetches.
#[derive(Default)]
pub struct CampaignLocks {
    inner: Mutex<HashMap<Uuid, Arc<Mutex<()>>>>,
}

impl CampaignLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lock for one campaign, waiting behind any running refetch.
    pub async fn acquire(&self, campaign_id: Uuid) -> OwnedMutexGuard<()> {
        let lock = {
            let mut registry = self.inner.lock().await;
            registry.entry(campaign_id).or_default().clone()
        };
        lock.lock_owned().await
    }
}

/// Regenerate the signatures of every stale claimant in a campaign.
///
/// Returns the rows as committed. A campaign whose stale set is empty is a
/// no-op that performs no external calls.
pub async fn refetch_drop_signatures<C, S>(
    db: &DropDatabase,
    chain: &C,
    signer: &S,
    locks: &CampaignLocks,
    campaign_id: Uuid,
    added_by: &str,
) -> Result<Vec<StoredClaimant>, DropError>
where
    C: ClaimMetadataSource,
    S: BatchSign,
{
    let _guard = locks.acquire(campaign_id).await;

    let campaign = db
        .get_campaign(campaign_id)?
        .ok_or(DropError::CampaignNotFound(campaign_id))?;
    let contract = db
        .get_contract(campaign.contract_id)?
        .ok_or(DropError::ContractNotFound(campaign.contract_id))?;
    let deadline = campaign
        .claim_block_deadline
        .ok_or(DropError::MissingDeadline(campaign_id))?;
    let contract_address = Address::from_str(&contract.address)
        .map_err(|_| DropError::InvalidAddress(contract.address.clone()))?;

    let stale = db.stale_claimants(campaign_id, campaign.updated_at)?;
    if stale.is_empty() {
        tracing::debug!(%campaign_id, "No stale signatures to refetch");
        return Ok(Vec::new());
    }

    tracing::info!(
        %campaign_id,
        claim_id = campaign.claim_id,
        stale = stale.len(),
        "Refetching drop signatures"
    );

    // (claimant, commitment hash) for every stale row, accumulated across pages
    let mut pending: Vec<(StoredClaimant, B256)> = Vec::with_capacity(stale.len());
    // hash → signature accumulator spanning all pages of this call
    let mut signatures: HashMap<B256, String> = HashMap::new();
    let mut reused = 0usize;

    for page in stale.chunks(BATCH_SIGNATURE_PAGE_SIZE) {
        let amounts: Vec<u64> = page.iter().map(|claimant| claimant.amount).collect();
        let transformed =
            batch_transform_claim_amounts(db, chain, campaign_id, &amounts).await?;

        let mut request: Vec<B256> = Vec::with_capacity(page.len());
        for (claimant, amount) in page.iter().zip(transformed) {
            let recipient = Address::from_str(&claimant.address)
                .map_err(|_| DropError::InvalidAddress(claimant.address.clone()))?;
            let hash = claim_message_hash(
                chain.chain_id(),
                contract_address,
                campaign.claim_id,
                recipient,
                deadline,
                amount,
            );

            // A cached signature over these exact parameters is still valid;
            // only the row's timestamp went stale.
            if claimant.commitment_hash.as_deref() == Some(hash.to_string().as_str()) {
                if let Some(signature) = &claimant.signature {
                    signatures.insert(hash, signature.clone());
                    reused += 1;
                    pending.push((claimant.clone(), hash));
                    continue;
                }
            }

            if !signatures.contains_key(&hash) && !request.contains(&hash) {
                request.push(hash);
            }
            pending.push((claimant.clone(), hash));
        }

        if !request.is_empty() {
            let signed = signer
                .batch_sign(&request)
                .await
                .map_err(DropError::SignerUnavailable)?;
            signatures.extend(signed);
        }
    }

    let now = Utc::now();
    let mut updates = Vec::with_capacity(pending.len());
    for (claimant, hash) in &pending {
        let signature = signatures
            .get(hash)
            .cloned()
            .ok_or_else(|| {
                DropError::SignerUnavailable(crate::signer::SignerError::InvalidResponse(
                    format!("no signature returned for hash {hash}"),
                ))
            })?;
        updates.push(SignatureUpdate {
            address: claimant.address.clone(),
            amount: claimant.amount,
            added_by: added_by.to_string(),
            signature,
            commitment_hash: hash.to_string(),
        });
    }

    let committed = db.apply_signature_updates(campaign_id, &updates, now)?;
    tracing::info!(
        %campaign_id,
        refreshed = committed.len(),
        reused,
        "Drop signatures persisted"
    );
    Ok(committed)
}
