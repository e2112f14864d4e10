// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Drop Storage Module
//!
//! Persistent state for the claim distribution engine, backed by an embedded
//! redb database. This is the only durable state the engine owns.
//!
//! ## Storage Layout
//!
//! ```text
//! {DATA_DIR}/dropper.redb
//!   contracts         # contract_id → StoredContract
//!   campaigns         # campaign_id → StoredCampaign
//!   claimants         # campaign_id|address → StoredClaimant
//!   recipient_index   # address|campaign_id → campaign_id
//! ```
//!
//! ## Important Notes
//!
//! - The claimant composite key is the (campaign, address) uniqueness
//!   constraint: every write is an upsert by construction.
//! - Batch writes (enrollment, signature persistence, bulk removal) each run
//!   inside a single write transaction and are therefore all-or-nothing.

pub mod drop_database;
pub mod records;

pub use drop_database::{ClaimantFilter, DropDatabase, DropDbError, DropDbResult, SignatureUpdate};
pub use records::{StoredCampaign, StoredClaimant, StoredContract};
