// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Claim Distribution Engine
//!
//! The core of this service: enrollment of recipients into campaigns,
//! entitlement-amount scaling against on-chain token metadata, staleness
//! detection, and batched regeneration of claim authorization signatures.
//!
//! ## Modules
//!
//! - `address` - EIP-55 normalization of recipient addresses
//! - `amounts` - entitlement → on-chain amount transformation
//! - `enrollment` - bulk claimant upsert with in-batch dedup
//! - `refetch` - the batched signature regeneration loop
//! - `query` - read paths shared with the HTTP layer
//!
//! Every failure in this module is scoped to one call and leaves the store
//! unchanged; there are no partial writes to recover from.

pub mod address;
pub mod amounts;
pub mod enrollment;
pub mod query;
pub mod refetch;

use uuid::Uuid;

use crate::blockchain::ChainError;
use crate::signer::SignerError;
use crate::storage::DropDbError;

pub use address::normalize_address;
pub use amounts::batch_transform_claim_amounts;
pub use enrollment::{add_claimants, ClaimantEntry};
pub use query::{claimant_drops, get_claimant, list_claimants, ClaimantClaim};
pub use refetch::{refetch_drop_signatures, CampaignLocks};

/// Failures of the claim distribution engine.
#[derive(Debug, thiserror::Error)]
pub enum DropError {
    #[error("Enrollment batch contains duplicate addresses")]
    DuplicateClaimant,

    #[error("Claim block deadline is not set for campaign {0}")]
    MissingDeadline(Uuid),

    #[error("Token metadata unavailable: {0}")]
    TokenMetadataUnavailable(#[source] ChainError),

    #[error("Signer unavailable: {0}")]
    SignerUnavailable(#[source] SignerError),

    #[error("Invalid recipient address: {0}")]
    InvalidAddress(String),

    #[error("Campaign {0} not found")]
    CampaignNotFound(Uuid),

    #[error("Contract {0} not found")]
    ContractNotFound(Uuid),

    #[error("Claimant {address} not found in campaign {campaign_id}")]
    ClaimantNotFound { campaign_id: Uuid, address: String },

    #[error("storage error: {0}")]
    Storage(#[from] DropDbError),
}

#[cfg(test)]
pub(crate) mod mocks {
    //! Counting fakes for the engine's external collaborators.

    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use alloy::primitives::{Address, B256};

    use crate::blockchain::{ChainError, ClaimConfig, ClaimMetadataSource, TokenType};
    use crate::signer::{BatchSign, SignerError};

    pub const MOCK_CHAIN_ID: u64 = 31337;

    pub struct MockChain {
        pub token_type: TokenType,
        pub decimals: u8,
        pub fail: bool,
        pub config_calls: AtomicUsize,
        pub decimals_calls: AtomicUsize,
    }

    impl MockChain {
        pub fn erc20(decimals: u8) -> Self {
            Self {
                token_type: TokenType::Erc20,
                decimals,
                fail: false,
                config_calls: AtomicUsize::new(0),
                decimals_calls: AtomicUsize::new(0),
            }
        }

        pub fn erc721() -> Self {
            Self {
                token_type: TokenType::Erc721,
                ..Self::erc20(0)
            }
        }

        pub fn failing() -> Self {
            Self {
                fail: true,
                ..Self::erc20(18)
            }
        }
    }

    impl ClaimMetadataSource for MockChain {
        fn chain_id(&self) -> u64 {
            MOCK_CHAIN_ID
        }

        async fn claim_config(
            &self,
            _contract_address: Address,
            _claim_id: u64,
        ) -> Result<ClaimConfig, ChainError> {
            self.config_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(ChainError::RpcError("mock chain down".into()));
            }
            Ok(ClaimConfig {
                token_type: self.token_type,
                token_address: Address::repeat_byte(0x42),
            })
        }

        async fn token_decimals(&self, _token_address: Address) -> Result<u8, ChainError> {
            self.decimals_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(ChainError::RpcError("mock chain down".into()));
            }
            Ok(self.decimals)
        }
    }

    #[derive(Default)]
    pub struct MockSigner {
        pub fail: bool,
        pub calls: AtomicUsize,
        pub hashes_signed: AtomicUsize,
    }

    impl MockSigner {
        pub fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }
    }

    impl BatchSign for MockSigner {
        async fn batch_sign(
            &self,
            hashes: &[B256],
        ) -> Result<HashMap<B256, String>, SignerError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.hashes_signed.fetch_add(hashes.len(), Ordering::SeqCst);
            if self.fail {
                return Err(SignerError::Unavailable("mock signer down".into()));
            }
            Ok(hashes
                .iter()
                .map(|hash| (*hash, format!("0xsigned:{hash}")))
                .collect())
        }
    }
}
