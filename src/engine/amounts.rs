// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Entitlement → on-chain amount transformation.

use std::str::FromStr;

use alloy::primitives::{Address, U256};
use uuid::Uuid;

use crate::blockchain::ClaimMetadataSource;
use crate::storage::DropDatabase;

use super::DropError;

/// Transform stored entitlement amounts into the on-chain transferable
/// amounts a signature must commit to.
///
/// The campaign's claim configuration is resolved once per call. Fungible
/// (ERC-20) claims are scaled by 10^decimals, with decimals read once and
/// reused for the whole batch; every other token type counts discrete items
/// and passes through unchanged.
///
/// An on-chain read failure aborts the whole call: falling back to an
/// unscaled amount would under- or over-authorize every claim in the batch.
pub async fn batch_transform_claim_amounts<C: ClaimMetadataSource>(
    db: &DropDatabase,
    chain: &C,
    campaign_id: Uuid,
    amounts: &[u64],
) -> Result<Vec<U256>, DropError> {
    let campaign = db
        .get_campaign(campaign_id)?
        .ok_or(DropError::CampaignNotFound(campaign_id))?;
    let contract = db
        .get_contract(campaign.contract_id)?
        .ok_or(DropError::ContractNotFound(campaign.contract_id))?;
    let contract_address = Address::from_str(&contract.address)
        .map_err(|_| DropError::InvalidAddress(contract.address.clone()))?;

    let config = chain
        .claim_config(contract_address, campaign.claim_id)
        .await
        .map_err(DropError::TokenMetadataUnavailable)?;

    if !config.token_type.is_fungible() {
        return Ok(amounts.iter().copied().map(U256::from).collect());
    }

    let decimals = chain
        .token_decimals(config.token_address)
        .await
        .map_err(DropError::TokenMetadataUnavailable)?;

    let scale = U256::from(10u64).pow(U256::from(decimals));
    Ok(amounts
        .iter()
        .map(|amount| U256::from(*amount) * scale)
        .collect())
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::engine::mocks::MockChain;
    use crate::storage::{StoredCampaign, StoredContract};

    fn setup() -> (DropDatabase, Uuid, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let db = DropDatabase::open(&dir.path().join("test.redb")).unwrap();
        let contract = StoredContract::new(
            "ethereum".into(),
            "0x2222222222222222222222222222222222222222".into(),
            "Rewards".into(),
            None,
        );
        db.create_contract(&contract).unwrap();
        let campaign = StoredCampaign::new(contract.id, 7, "Season 1".into(), "drop".into());
        db.create_campaign(&campaign).unwrap();
        (db, campaign.id, dir)
    }

    #[tokio::test]
    async fn fungible_amounts_are_scaled_by_decimals() {
        let (db, campaign_id, _dir) = setup();
        let chain = MockChain::erc20(18);

        let transformed = batch_transform_claim_amounts(&db, &chain, campaign_id, &[5, 0, 1])
            .await
            .unwrap();

        let expected = U256::from(10u64).pow(U256::from(18u8));
        assert_eq!(transformed[0], U256::from(5u64) * expected);
        assert_eq!(transformed[1], U256::ZERO);
        assert_eq!(transformed[2], expected);
    }

    #[tokio::test]
    async fn decimals_are_read_once_per_batch() {
        let (db, campaign_id, _dir) = setup();
        let chain = MockChain::erc20(6);

        let amounts: Vec<u64> = (0..100).collect();
        batch_transform_claim_amounts(&db, &chain, campaign_id, &amounts)
            .await
            .unwrap();

        assert_eq!(chain.config_calls.load(Ordering::SeqCst), 1);
        assert_eq!(chain.decimals_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn non_fungible_amounts_pass_through() {
        let (db, campaign_id, _dir) = setup();
        let chain = MockChain::erc721();

        let transformed = batch_transform_claim_amounts(&db, &chain, campaign_id, &[3])
            .await
            .unwrap();
        assert_eq!(transformed, vec![U256::from(3u64)]);
        // Non-fungible claims never need a decimals read
        assert_eq!(chain.decimals_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn chain_failure_aborts_without_fallback() {
        let (db, campaign_id, _dir) = setup();
        let chain = MockChain::failing();

        let result = batch_transform_claim_amounts(&db, &chain, campaign_id, &[5]).await;
        assert!(matches!(
            result,
            Err(DropError::TokenMetadataUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn unknown_campaign_is_reported() {
        let (db, _campaign_id, _dir) = setup();
        let chain = MockChain::erc20(18);

        let result = batch_transform_claim_amounts(&db, &chain, Uuid::new_v4(), &[5]).await;
        assert!(matches!(result, Err(DropError::CampaignNotFound(_))));
    }
}
