// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Drop contract interactions and the claim commitment hash.

use std::borrow::Cow;

use alloy::{
    primitives::{Address, B256, U256},
    providers::Provider,
    sol,
    sol_types::{Eip712Domain, SolStruct},
};

use super::types::{ChainError, ClaimConfig, TokenType};

// Define the drop contract interface using alloy's sol! macro
sol! {
    #[sol(rpc)]
    interface IDropper {
        function getClaim(uint256 claimId) external view returns (uint256 tokenType, address tokenAddress, uint256 tokenId, uint256 amount);
    }

    /// The payload an authority signs to approve one claim. Must match the
    /// struct the drop contract hashes during claim verification.
    struct ClaimAuthorization {
        uint256 claimId;
        address claimant;
        uint256 blockDeadline;
        uint256 amount;
    }
}

/// Drop contract wrapper.
pub struct DropperContract<P> {
    contract: IDropper::IDropperInstance<P>,
}

impl<P: Provider + Clone> DropperContract<P> {
    /// Create a new drop contract instance.
    pub fn new(provider: &P, contract_address: Address) -> Self {
        Self {
            contract: IDropper::new(contract_address, provider.clone()),
        }
    }

    /// Read the claim configuration (token type + token address) for a claim id.
    pub async fn get_claim(&self, claim_id: u64) -> Result<ClaimConfig, ChainError> {
        let result = self
            .contract
            .getClaim(U256::from(claim_id))
            .call()
            .await
            .map_err(|e| ChainError::ContractError(e.to_string()))?;

        Ok(ClaimConfig {
            token_type: TokenType::from_code(result.tokenType.saturating_to()),
            token_address: result.tokenAddress,
        })
    }
}

/// Compute the commitment hash an authority signs to approve one claim.
///
/// This is the EIP-712 signing hash of [`ClaimAuthorization`], domain-bound
/// to the campaign's contract and chain, so a signature can never be replayed
/// against another drop contract or network.
pub fn claim_message_hash(
    chain_id: u64,
    verifying_contract: Address,
    claim_id: u64,
    claimant: Address,
    block_deadline: u64,
    amount: U256,
) -> B256 {
    let domain = Eip712Domain {
        name: Some(Cow::Borrowed("Dropper")),
        version: Some(Cow::Borrowed("0.2.0")),
        chain_id: Some(U256::from(chain_id)),
        verifying_contract: Some(verifying_contract),
        salt: None,
    };

    let payload = ClaimAuthorization {
        claimId: U256::from(claim_id),
        claimant,
        blockDeadline: U256::from(block_deadline),
        amount,
    };

    payload.eip712_signing_hash(&domain)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn addr(s: &str) -> Address {
        Address::from_str(s).unwrap()
    }

    #[test]
    fn commitment_hash_is_deterministic() {
        let contract = addr("0x2222222222222222222222222222222222222222");
        let claimant = addr("0xAaAaAaAaAaAaAaAaAaAaAaAaAaAaAaAaAaAaAaAa");

        let a = claim_message_hash(1, contract, 7, claimant, 100, U256::from(3u64));
        let b = claim_message_hash(1, contract, 7, claimant, 100, U256::from(3u64));
        assert_eq!(a, b);
    }

    #[test]
    fn commitment_hash_binds_every_parameter() {
        let contract = addr("0x2222222222222222222222222222222222222222");
        let claimant = addr("0xAaAaAaAaAaAaAaAaAaAaAaAaAaAaAaAaAaAaAaAa");
        let base = claim_message_hash(1, contract, 7, claimant, 100, U256::from(3u64));

        assert_ne!(
            base,
            claim_message_hash(1, contract, 7, claimant, 100, U256::from(4u64)),
            "amount must be committed"
        );
        assert_ne!(
            base,
            claim_message_hash(1, contract, 7, claimant, 101, U256::from(3u64)),
            "deadline must be committed"
        );
        assert_ne!(
            base,
            claim_message_hash(1, contract, 8, claimant, 100, U256::from(3u64)),
            "claim id must be committed"
        );
        assert_ne!(
            base,
            claim_message_hash(2, contract, 7, claimant, 100, U256::from(3u64)),
            "chain id must be committed"
        );
        assert_ne!(
            base,
            claim_message_hash(
                1,
                addr("0x3333333333333333333333333333333333333333"),
                7,
                claimant,
                100,
                U256::from(3u64)
            ),
            "verifying contract must be committed"
        );
    }
}
