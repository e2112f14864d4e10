// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Blockchain types and constants.

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

/// EVM network configuration, loaded from the environment at startup.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// Network name as used in contract registrations (e.g., "ethereum").
    pub name: String,
    /// Chain ID, bound into every commitment hash.
    pub chain_id: u64,
    /// RPC endpoint URL.
    pub rpc_url: String,
}

/// Token type codes used by the drop contract's claim configuration.
///
/// Only fungible (ERC-20) claims carry on-chain decimals; every other type
/// counts discrete items and is never scaled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    /// Fungible ERC-20 reward (type code 20).
    Erc20,
    /// ERC-721 reward (type code 721).
    Erc721,
    /// Semi-fungible ERC-1155 reward (type code 1155).
    Erc1155,
    /// Pool-mintable reward (type code 1).
    Mintable,
    /// Unrecognized type code, treated as non-fungible.
    Other(u64),
}

impl TokenType {
    /// Decode the on-chain type code.
    pub fn from_code(code: u64) -> Self {
        match code {
            20 => Self::Erc20,
            721 => Self::Erc721,
            1155 => Self::Erc1155,
            1 => Self::Mintable,
            other => Self::Other(other),
        }
    }

    /// Whether amounts of this type are denominated in token decimals.
    pub fn is_fungible(self) -> bool {
        matches!(self, Self::Erc20)
    }
}

/// The on-chain claim configuration a campaign is bound to.
#[derive(Debug, Clone, Copy)]
pub struct ClaimConfig {
    /// Reward token type.
    pub token_type: TokenType,
    /// Reward token contract address.
    pub token_address: Address,
}

/// Errors that can occur during blockchain reads.
#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    #[error("Invalid RPC URL: {0}")]
    InvalidRpcUrl(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("RPC error: {0}")]
    RpcError(String),

    #[error("Contract error: {0}")]
    ContractError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_type_codes_round_trip() {
        assert_eq!(TokenType::from_code(20), TokenType::Erc20);
        assert_eq!(TokenType::from_code(721), TokenType::Erc721);
        assert_eq!(TokenType::from_code(1155), TokenType::Erc1155);
        assert_eq!(TokenType::from_code(1), TokenType::Mintable);
        assert_eq!(TokenType::from_code(99), TokenType::Other(99));
    }

    #[test]
    fn only_erc20_is_fungible() {
        assert!(TokenType::Erc20.is_fungible());
        assert!(!TokenType::Erc721.is_fungible());
        assert!(!TokenType::Erc1155.is_fungible());
        assert!(!TokenType::Mintable.is_fungible());
        assert!(!TokenType::Other(99).is_fungible());
    }
}
