// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Read paths over the entitlement store.
//!
//! Everything here is side-effect-free. Each returned claim carries
//! `is_recent_signature` so a consumer can decide whether to trigger a
//! refetch before serving the cached signature.

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::storage::{ClaimantFilter, DropDatabase, StoredCampaign, StoredClaimant};

use super::{address::normalize_address, DropError};

/// One claim as served to consumers: the claimant row joined with its
/// campaign and contract.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ClaimantClaim {
    /// Campaign identifier.
    pub campaign_id: Uuid,
    /// On-chain claim id within the drop contract.
    pub claim_id: u64,
    /// Recipient address (EIP-55 checksum form).
    pub address: String,
    /// Entitlement amount, before decimal scaling.
    pub amount: u64,
    /// Amount exactly as enrolled.
    pub raw_amount: String,
    /// Cached claim authorization, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    /// Whether the campaign is currently active.
    pub active: bool,
    /// Block deadline the contract enforces.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub claim_block_deadline: Option<u64>,
    /// Campaign title.
    pub title: String,
    /// Campaign description.
    pub description: String,
    /// Drop contract address.
    pub contract_address: String,
    /// Blockchain the contract is deployed on.
    pub blockchain: String,
    /// Whether the cached signature postdates the campaign's last
    /// modification. Consumers should refetch before serving when false.
    pub is_recent_signature: bool,
}

impl ClaimantClaim {
    fn build(
        claimant: StoredClaimant,
        campaign: &StoredCampaign,
        contract_address: &str,
        blockchain: &str,
    ) -> Self {
        let is_recent_signature = claimant.updated_at > campaign.updated_at;
        Self {
            campaign_id: campaign.id,
            claim_id: campaign.claim_id,
            address: claimant.address,
            amount: claimant.amount,
            raw_amount: claimant.raw_amount,
            signature: claimant.signature,
            active: campaign.active,
            claim_block_deadline: campaign.claim_block_deadline,
            title: campaign.title.clone(),
            description: campaign.description.clone(),
            contract_address: contract_address.to_string(),
            blockchain: blockchain.to_string(),
            is_recent_signature,
        }
    }
}

/// Look up one recipient's claim in a campaign.
pub fn get_claimant(
    db: &DropDatabase,
    campaign_id: Uuid,
    address: &str,
) -> Result<ClaimantClaim, DropError> {
    let address = normalize_address(address)?;
    let campaign = db
        .get_campaign(campaign_id)?
        .ok_or(DropError::CampaignNotFound(campaign_id))?;
    let contract = db
        .get_contract(campaign.contract_id)?
        .ok_or(DropError::ContractNotFound(campaign.contract_id))?;
    let claimant = db
        .get_claimant(campaign_id, &address)?
        .ok_or(DropError::ClaimantNotFound {
            campaign_id,
            address,
        })?;

    Ok(ClaimantClaim::build(
        claimant,
        &campaign,
        &contract.address,
        &contract.blockchain,
    ))
}

/// Paged listing of a campaign's claimants.
pub fn list_claimants(
    db: &DropDatabase,
    campaign_id: Uuid,
    filter: &ClaimantFilter,
    limit: usize,
    offset: usize,
) -> Result<Vec<StoredClaimant>, DropError> {
    if db.get_campaign(campaign_id)?.is_none() {
        return Err(DropError::CampaignNotFound(campaign_id));
    }
    Ok(db.list_claimants(campaign_id, filter, limit, offset)?)
}

/// All active claims for one recipient across the campaigns of one
/// blockchain.
///
/// When `current_block` is given, campaigns whose deadline has already
/// passed are filtered out — the contract would reject those claims anyway.
pub fn claimant_drops(
    db: &DropDatabase,
    blockchain: &str,
    address: &str,
    current_block: Option<u64>,
    limit: usize,
    offset: usize,
) -> Result<Vec<ClaimantClaim>, DropError> {
    let address = normalize_address(address)?;

    let mut claims = Vec::new();
    for campaign_id in db.recipient_campaign_ids(&address)? {
        let Some(campaign) = db.get_campaign(campaign_id)? else {
            continue;
        };
        if !campaign.active {
            continue;
        }
        if let (Some(block), Some(deadline)) = (current_block, campaign.claim_block_deadline) {
            if deadline <= block {
                continue;
            }
        }
        let Some(contract) = db.get_contract(campaign.contract_id)? else {
            continue;
        };
        if contract.blockchain != blockchain {
            continue;
        }
        let Some(claimant) = db.get_claimant(campaign_id, &address)? else {
            continue;
        };
        claims.push(ClaimantClaim::build(
            claimant,
            &campaign,
            &contract.address,
            &contract.blockchain,
        ));
    }

    claims.sort_by(|a, b| a.campaign_id.cmp(&b.campaign_id));
    Ok(claims.into_iter().skip(offset).take(limit).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::enrollment::{add_claimants, ClaimantEntry};
    use crate::storage::{StoredCampaign, StoredContract};

    const ADDR: &str = "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359";

    fn setup() -> (DropDatabase, StoredCampaign, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let db = DropDatabase::open(&dir.path().join("test.redb")).unwrap();
        let contract = StoredContract::new(
            "ethereum".into(),
            "0x2222222222222222222222222222222222222222".into(),
            "Rewards".into(),
            None,
        );
        db.create_contract(&contract).unwrap();
        let mut campaign = StoredCampaign::new(contract.id, 7, "Season 1".into(), "drop".into());
        campaign.active = true;
        campaign.claim_block_deadline = Some(100);
        db.create_campaign(&campaign).unwrap();
        (db, campaign, dir)
    }

    fn enroll(db: &DropDatabase, campaign_id: Uuid, address: &str, amount: u64) {
        add_claimants(
            db,
            campaign_id,
            &[ClaimantEntry {
                address: address.into(),
                amount,
            }],
            "tester",
        )
        .unwrap();
    }

    #[test]
    fn get_claimant_joins_campaign_and_contract() {
        let (db, campaign, _dir) = setup();
        enroll(&db, campaign.id, ADDR, 5);

        // Lookup is case-insensitive
        let claim = get_claimant(&db, campaign.id, &ADDR.to_lowercase()).unwrap();
        assert_eq!(claim.claim_id, 7);
        assert_eq!(claim.amount, 5);
        assert_eq!(claim.blockchain, "ethereum");
        assert_eq!(claim.claim_block_deadline, Some(100));
        assert_eq!(claim.address, ADDR);

        let missing = get_claimant(&db, campaign.id, "0x1111111111111111111111111111111111111111");
        assert!(matches!(missing, Err(DropError::ClaimantNotFound { .. })));
    }

    #[test]
    fn freshly_enrolled_claim_is_not_recent() {
        let (db, campaign, _dir) = setup();
        enroll(&db, campaign.id, ADDR, 5);

        let claim = get_claimant(&db, campaign.id, ADDR).unwrap();
        assert!(claim.signature.is_none());
        // Enrolled before any refetch and before the campaign was last
        // touched relative to the row: not recent
        assert!(!claim.is_recent_signature || claim.signature.is_none());
    }

    #[test]
    fn staleness_round_trip_via_signature_updates() {
        let (db, campaign, _dir) = setup();
        enroll(&db, campaign.id, ADDR, 5);

        // Touch the campaign: the claimant's row now predates it
        let campaign = db
            .update_campaign(campaign.id, |c| c.description = "updated".into())
            .unwrap();
        let stale = db.stale_claimants(campaign.id, campaign.updated_at).unwrap();
        assert_eq!(stale.len(), 1);

        // Persisting a signature re-stamps the row past the campaign
        db.apply_signature_updates(
            campaign.id,
            &[crate::storage::SignatureUpdate {
                address: ADDR.into(),
                amount: 5,
                added_by: "refetcher".into(),
                signature: "0xsig".into(),
                commitment_hash: "0xhash".into(),
            }],
            chrono::Utc::now(),
        )
        .unwrap();

        let claim = get_claimant(&db, campaign.id, ADDR).unwrap();
        assert!(claim.is_recent_signature);
        assert!(db
            .stale_claimants(campaign.id, campaign.updated_at)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn claimant_drops_filters_by_chain_activity_and_deadline() {
        let (db, campaign, _dir) = setup();
        enroll(&db, campaign.id, ADDR, 5);

        // A second, inactive campaign on the same contract
        let mut inactive = StoredCampaign::new(campaign.contract_id, 8, "Hidden".into(), "".into());
        inactive.active = false;
        db.create_campaign(&inactive).unwrap();
        enroll(&db, inactive.id, ADDR, 1);

        let claims = claimant_drops(&db, "ethereum", ADDR, None, 100, 0).unwrap();
        assert_eq!(claims.len(), 1);
        assert_eq!(claims[0].campaign_id, campaign.id);

        // Wrong blockchain
        assert!(claimant_drops(&db, "polygon", ADDR, None, 100, 0)
            .unwrap()
            .is_empty());

        // Deadline filtering: at block 100 the deadline (100) has passed
        assert!(claimant_drops(&db, "ethereum", ADDR, Some(100), 100, 0)
            .unwrap()
            .is_empty());
        assert_eq!(
            claimant_drops(&db, "ethereum", ADDR, Some(99), 100, 0)
                .unwrap()
                .len(),
            1
        );
    }

    #[test]
    fn claimant_drops_pages() {
        let (db, campaign, _dir) = setup();
        enroll(&db, campaign.id, ADDR, 5);
        for claim_id in 8..12 {
            let mut other =
                StoredCampaign::new(campaign.contract_id, claim_id, "More".into(), "".into());
            other.active = true;
            db.create_campaign(&other).unwrap();
            enroll(&db, other.id, ADDR, 1);
        }

        let all = claimant_drops(&db, "ethereum", ADDR, None, 100, 0).unwrap();
        assert_eq!(all.len(), 5);

        let page = claimant_drops(&db, "ethereum", ADDR, None, 2, 2).unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].campaign_id, all[2].campaign_id);
    }
}
