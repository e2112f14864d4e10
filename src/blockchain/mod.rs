// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Blockchain integration module.
//!
//! This module provides functionality for:
//! - Reading a drop contract's claim configuration (token type + address)
//! - Reading ERC-20 token decimals for amount scaling
//! - Computing the EIP-712 commitment hash an authority signs per claim

pub mod client;
pub mod dropper;
pub mod erc20;
pub mod types;

pub use client::{ChainClient, ClaimMetadataSource};
pub use dropper::claim_message_hash;
pub use types::*;
