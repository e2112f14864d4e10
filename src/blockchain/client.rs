// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! EVM chain client for on-chain metadata reads.

use std::future::Future;

use alloy::{
    network::Ethereum,
    primitives::Address,
    providers::{
        fillers::{BlobGasFiller, ChainIdFiller, FillProvider, GasFiller, JoinFill, NonceFiller},
        Identity, ProviderBuilder, RootProvider,
    },
};

use super::dropper::DropperContract;
use super::erc20::Erc20Contract;
use super::types::{ChainError, ClaimConfig, NetworkConfig};

/// HTTP provider type (with all fillers).
type HttpProvider = FillProvider<
    JoinFill<
        Identity,
        JoinFill<GasFiller, JoinFill<BlobGasFiller, JoinFill<NonceFiller, ChainIdFiller>>>,
    >,
    RootProvider<Ethereum>,
>;

/// On-chain metadata the engine needs to authorize claims.
///
/// Implementations must issue at most one network call per method invocation;
/// the engine batches its work so that one `Transform` call touches each
/// method at most once.
pub trait ClaimMetadataSource {
    /// Chain id of the network the metadata is read from. Bound into every
    /// commitment hash.
    fn chain_id(&self) -> u64;

    /// Read the claim configuration (token type + token address) for a claim
    /// on a drop contract.
    fn claim_config(
        &self,
        contract_address: Address,
        claim_id: u64,
    ) -> impl Future<Output = Result<ClaimConfig, ChainError>> + Send;

    /// Read the decimals of an ERC-20 token.
    fn token_decimals(
        &self,
        token_address: Address,
    ) -> impl Future<Output = Result<u8, ChainError>> + Send;
}

/// EVM chain client.
pub struct ChainClient {
    /// Network configuration
    network: NetworkConfig,
    /// Alloy HTTP provider
    provider: HttpProvider,
}

impl ChainClient {
    /// Create a new client for the specified network.
    pub fn new(network: NetworkConfig) -> Result<Self, ChainError> {
        let url: url::Url = network
            .rpc_url
            .parse()
            .map_err(|e: url::ParseError| ChainError::InvalidRpcUrl(e.to_string()))?;

        let provider = ProviderBuilder::new().connect_http(url);

        Ok(Self { network, provider })
    }

    /// Get the network configuration.
    pub fn network(&self) -> &NetworkConfig {
        &self.network
    }
}

impl ClaimMetadataSource for ChainClient {
    fn chain_id(&self) -> u64 {
        self.network.chain_id
    }

    async fn claim_config(
        &self,
        contract_address: Address,
        claim_id: u64,
    ) -> Result<ClaimConfig, ChainError> {
        DropperContract::new(&self.provider, contract_address)
            .get_claim(claim_id)
            .await
    }

    async fn token_decimals(&self, token_address: Address) -> Result<u8, ChainError> {
        Erc20Contract::new(&self.provider, token_address)
            .decimals()
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_malformed_rpc_url() {
        let result = ChainClient::new(NetworkConfig {
            name: "ethereum".into(),
            chain_id: 1,
            rpc_url: "not a url".into(),
        });
        assert!(matches!(result, Err(ChainError::InvalidRpcUrl(_))));
    }

    #[test]
    fn keeps_network_config() {
        let client = ChainClient::new(NetworkConfig {
            name: "ethereum".into(),
            chain_id: 1,
            rpc_url: "http://localhost:8545".into(),
        })
        .unwrap();
        assert_eq!(client.network().chain_id, 1);
    }
}
