// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Embedded drop database backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `contracts`: contract_id → serialized StoredContract
//! - `campaigns`: campaign_id → serialized StoredCampaign
//! - `claimants`: composite key (campaign_id|address) → serialized StoredClaimant
//! - `recipient_index`: composite key (address|campaign_id) → campaign_id
//!
//! The claimant key embeds the lowercased recipient address, so the
//! (campaign, address) uniqueness constraint is structural: writing the same
//! key twice is an update, never a second row. All multi-row writes happen
//! inside a single write transaction, which is what gives enrollment and
//! signature persistence their all-or-nothing semantics.

use std::path::Path;

use chrono::{DateTime, Utc};
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use uuid::Uuid;

use super::records::{StoredCampaign, StoredClaimant, StoredContract};

// =============================================================================
// Table Definitions
// =============================================================================

/// Registered drop contracts: contract_id → JSON bytes.
const CONTRACTS: TableDefinition<&str, &[u8]> = TableDefinition::new("contracts");

/// Campaigns: campaign_id → JSON bytes.
const CAMPAIGNS: TableDefinition<&str, &[u8]> = TableDefinition::new("campaigns");

/// Claimants: composite key `campaign_id|address_lower` → JSON bytes.
const CLAIMANTS: TableDefinition<&[u8], &[u8]> = TableDefinition::new("claimants");

/// Index: composite key `address_lower|campaign_id` → campaign_id.
const RECIPIENT_INDEX: TableDefinition<&[u8], &str> = TableDefinition::new("recipient_index");

// =============================================================================
// Error Type
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum DropDbError {
    #[error("redb error: {0}")]
    Redb(#[from] redb::Error),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),
}

pub type DropDbResult<T> = Result<T, DropDbError>;

// =============================================================================
// Key Helpers
// =============================================================================

/// Build the claimant table key: `campaign_id|address_lower`.
fn claimant_key(campaign_id: Uuid, address: &str) -> Vec<u8> {
    let campaign = campaign_id.to_string();
    let addr = address.to_lowercase();
    let mut key = Vec::with_capacity(campaign.len() + 1 + addr.len());
    key.extend_from_slice(campaign.as_bytes());
    key.push(b'|');
    key.extend_from_slice(addr.as_bytes());
    key
}

/// Build the recipient index key: `address_lower|campaign_id`.
fn recipient_key(address: &str, campaign_id: Uuid) -> Vec<u8> {
    let addr = address.to_lowercase();
    let campaign = campaign_id.to_string();
    let mut key = Vec::with_capacity(addr.len() + 1 + campaign.len());
    key.extend_from_slice(addr.as_bytes());
    key.push(b'|');
    key.extend_from_slice(campaign.as_bytes());
    key
}

/// Build a prefix for range scanning (`{head}|`).
fn make_prefix(head: &str) -> Vec<u8> {
    let head = head.to_lowercase();
    let mut prefix = Vec::with_capacity(head.len() + 1);
    prefix.extend_from_slice(head.as_bytes());
    prefix.push(b'|');
    prefix
}

/// Build the upper bound for a prefix scan (prefix with 0xFF bytes appended).
fn make_prefix_end(head: &str) -> Vec<u8> {
    let mut end = make_prefix(head);
    end.extend_from_slice(&[0xFF; 48]);
    end
}

// =============================================================================
// Write Inputs
// =============================================================================

/// One signed row to persist at the end of a refetch call.
#[derive(Debug, Clone)]
pub struct SignatureUpdate {
    /// Recipient address (EIP-55 checksum form).
    pub address: String,
    /// Entitlement amount the signature commits to (pre-scaling).
    pub amount: u64,
    /// Provenance of this signing round.
    pub added_by: String,
    /// The authorization signature.
    pub signature: String,
    /// Hex commitment hash the signature was produced over.
    pub commitment_hash: String,
}

// =============================================================================
// DropDatabase
// =============================================================================

/// Embedded ACID store for contracts, campaigns, and claimants.
pub struct DropDatabase {
    db: Database,
}

impl DropDatabase {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> DropDbResult<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        let db = Database::create(path)?;

        // Pre-create all tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(CONTRACTS)?;
            let _ = write_txn.open_table(CAMPAIGNS)?;
            let _ = write_txn.open_table(CLAIMANTS)?;
            let _ = write_txn.open_table(RECIPIENT_INDEX)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }

    // =========================================================================
    // Contracts
    // =========================================================================

    /// Register a drop contract. Fails if the (blockchain, address) pair is
    /// already registered.
    pub fn create_contract(&self, contract: &StoredContract) -> DropDbResult<()> {
        let json = serde_json::to_vec(contract)?;
        let id = contract.id.to_string();

        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(CONTRACTS)?;
            for entry in table.iter()? {
                let entry = entry?;
                let existing: StoredContract = serde_json::from_slice(entry.1.value())?;
                if existing.blockchain == contract.blockchain
                    && existing.address.eq_ignore_ascii_case(&contract.address)
                {
                    return Err(DropDbError::Conflict(format!(
                        "Contract {} on {} is already registered",
                        contract.address, contract.blockchain
                    )));
                }
            }
            table.insert(id.as_str(), json.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Look up a contract by id.
    pub fn get_contract(&self, contract_id: Uuid) -> DropDbResult<Option<StoredContract>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(CONTRACTS)?;
        match table.get(contract_id.to_string().as_str())? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// List registered contracts, optionally restricted to one blockchain.
    pub fn list_contracts(&self, blockchain: Option<&str>) -> DropDbResult<Vec<StoredContract>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(CONTRACTS)?;

        let mut contracts = Vec::new();
        for entry in table.iter()? {
            let entry = entry?;
            let contract: StoredContract = serde_json::from_slice(entry.1.value())?;
            if blockchain.is_none_or(|chain| contract.blockchain == chain) {
                contracts.push(contract);
            }
        }
        Ok(contracts)
    }

    /// Delete a contract registration. Returns false if it did not exist.
    pub fn delete_contract(&self, contract_id: Uuid) -> DropDbResult<bool> {
        let id = contract_id.to_string();
        let write_txn = self.db.begin_write()?;
        let removed = {
            let mut table = write_txn.open_table(CONTRACTS)?;
            let existed = table.remove(id.as_str())?.is_some();
            existed
        };
        write_txn.commit()?;
        Ok(removed)
    }

    // =========================================================================
    // Campaigns
    // =========================================================================

    /// Create a campaign.
    pub fn create_campaign(&self, campaign: &StoredCampaign) -> DropDbResult<()> {
        let json = serde_json::to_vec(campaign)?;
        let id = campaign.id.to_string();

        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(CAMPAIGNS)?;
            table.insert(id.as_str(), json.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Look up a campaign by id.
    pub fn get_campaign(&self, campaign_id: Uuid) -> DropDbResult<Option<StoredCampaign>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(CAMPAIGNS)?;
        match table.get(campaign_id.to_string().as_str())? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// List campaigns, optionally filtered by contract and active flag.
    pub fn list_campaigns(
        &self,
        contract_id: Option<Uuid>,
        active: Option<bool>,
    ) -> DropDbResult<Vec<StoredCampaign>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(CAMPAIGNS)?;

        let mut campaigns = Vec::new();
        for entry in table.iter()? {
            let entry = entry?;
            let campaign: StoredCampaign = serde_json::from_slice(entry.1.value())?;
            if contract_id.is_none_or(|id| campaign.contract_id == id)
                && active.is_none_or(|flag| campaign.active == flag)
            {
                campaigns.push(campaign);
            }
        }
        Ok(campaigns)
    }

    /// Apply a mutation to a campaign and bump its `updated_at`.
    ///
    /// Every administrative change goes through here, so the modification
    /// timestamp (the signature staleness signal) can never be forgotten.
    pub fn update_campaign(
        &self,
        campaign_id: Uuid,
        mutate: impl FnOnce(&mut StoredCampaign),
    ) -> DropDbResult<StoredCampaign> {
        let id = campaign_id.to_string();
        let write_txn = self.db.begin_write()?;
        let campaign = {
            let mut table = write_txn.open_table(CAMPAIGNS)?;

            // Read existing value and deserialize before mutating
            let existing_bytes = {
                let existing = table
                    .get(id.as_str())?
                    .ok_or_else(|| DropDbError::NotFound(format!("Campaign {campaign_id}")))?;
                existing.value().to_vec()
            };

            let mut campaign: StoredCampaign = serde_json::from_slice(&existing_bytes)?;
            mutate(&mut campaign);
            campaign.touch();

            let json = serde_json::to_vec(&campaign)?;
            table.insert(id.as_str(), json.as_slice())?;
            campaign
        };
        write_txn.commit()?;
        Ok(campaign)
    }

    /// Delete a campaign together with its claimants and index entries.
    pub fn delete_campaign(&self, campaign_id: Uuid) -> DropDbResult<bool> {
        let id = campaign_id.to_string();
        let prefix = make_prefix(&id);
        let prefix_end = make_prefix_end(&id);

        let write_txn = self.db.begin_write()?;
        let removed = {
            let mut campaigns = write_txn.open_table(CAMPAIGNS)?;
            let removed = campaigns.remove(id.as_str())?.is_some();

            let mut claimants = write_txn.open_table(CLAIMANTS)?;
            let mut index = write_txn.open_table(RECIPIENT_INDEX)?;

            let mut keys = Vec::new();
            let mut addresses = Vec::new();
            for entry in claimants.range(prefix.as_slice()..prefix_end.as_slice())? {
                let entry = entry?;
                let claimant: StoredClaimant = serde_json::from_slice(entry.1.value())?;
                keys.push(entry.0.value().to_vec());
                addresses.push(claimant.address);
            }
            for (key, address) in keys.iter().zip(&addresses) {
                claimants.remove(key.as_slice())?;
                index.remove(recipient_key(address, campaign_id).as_slice())?;
            }
            removed
        };
        write_txn.commit()?;
        Ok(removed)
    }

    // =========================================================================
    // Claimants
    // =========================================================================

    /// Enroll claimants in one atomic batch.
    ///
    /// On conflict with an existing (campaign, address) row the entitlement
    /// fields are overwritten and `updated_at` is bumped; `created_at` stays.
    /// A cached signature survives only if the amount is unchanged — an
    /// amount change clears it, so a stale authorization can never be served
    /// for the new entitlement.
    pub fn upsert_claimants(
        &self,
        rows: Vec<StoredClaimant>,
    ) -> DropDbResult<Vec<StoredClaimant>> {
        let write_txn = self.db.begin_write()?;
        let committed = {
            let mut claimants = write_txn.open_table(CLAIMANTS)?;
            let mut index = write_txn.open_table(RECIPIENT_INDEX)?;

            let mut committed = Vec::with_capacity(rows.len());
            for mut row in rows {
                let key = claimant_key(row.campaign_id, &row.address);

                let existing_bytes = claimants.get(key.as_slice())?.map(|v| v.value().to_vec());
                if let Some(bytes) = existing_bytes {
                    let existing: StoredClaimant = serde_json::from_slice(&bytes)?;
                    row.created_at = existing.created_at;
                    if existing.amount == row.amount {
                        row.signature = existing.signature;
                        row.commitment_hash = existing.commitment_hash;
                    }
                }

                let json = serde_json::to_vec(&row)?;
                claimants.insert(key.as_slice(), json.as_slice())?;

                let campaign = row.campaign_id.to_string();
                index.insert(
                    recipient_key(&row.address, row.campaign_id).as_slice(),
                    campaign.as_str(),
                )?;
                committed.push(row);
            }
            committed
        };
        write_txn.commit()?;
        Ok(committed)
    }

    /// Persist the results of one signing round in one atomic batch.
    ///
    /// Existing rows take only the new signature, commitment hash, and
    /// `updated_at`; rows that disappeared since the stale set was captured
    /// are reinserted whole.
    pub fn apply_signature_updates(
        &self,
        campaign_id: Uuid,
        updates: &[SignatureUpdate],
        now: DateTime<Utc>,
    ) -> DropDbResult<Vec<StoredClaimant>> {
        let write_txn = self.db.begin_write()?;
        let committed = {
            let mut claimants = write_txn.open_table(CLAIMANTS)?;
            let mut index = write_txn.open_table(RECIPIENT_INDEX)?;

            let mut committed = Vec::with_capacity(updates.len());
            for update in updates {
                let key = claimant_key(campaign_id, &update.address);

                let existing_bytes = claimants.get(key.as_slice())?.map(|v| v.value().to_vec());
                let row = match existing_bytes {
                    Some(bytes) => {
                        let mut existing: StoredClaimant = serde_json::from_slice(&bytes)?;
                        existing.signature = Some(update.signature.clone());
                        existing.commitment_hash = Some(update.commitment_hash.clone());
                        existing.updated_at = now;
                        existing
                    }
                    None => StoredClaimant {
                        campaign_id,
                        address: update.address.clone(),
                        amount: update.amount,
                        raw_amount: update.amount.to_string(),
                        added_by: update.added_by.clone(),
                        signature: Some(update.signature.clone()),
                        commitment_hash: Some(update.commitment_hash.clone()),
                        created_at: now,
                        updated_at: now,
                    },
                };

                let json = serde_json::to_vec(&row)?;
                claimants.insert(key.as_slice(), json.as_slice())?;

                let campaign = campaign_id.to_string();
                index.insert(
                    recipient_key(&update.address, campaign_id).as_slice(),
                    campaign.as_str(),
                )?;
                committed.push(row);
            }
            committed
        };
        write_txn.commit()?;
        Ok(committed)
    }

    /// Look up one claimant by campaign and address (case-insensitive).
    pub fn get_claimant(
        &self,
        campaign_id: Uuid,
        address: &str,
    ) -> DropDbResult<Option<StoredClaimant>> {
        let key = claimant_key(campaign_id, address);
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(CLAIMANTS)?;
        match table.get(key.as_slice())? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Paged listing of a campaign's claimants in address order.
    pub fn list_claimants(
        &self,
        campaign_id: Uuid,
        filter: &ClaimantFilter,
        limit: usize,
        offset: usize,
    ) -> DropDbResult<Vec<StoredClaimant>> {
        let id = campaign_id.to_string();
        let prefix = make_prefix(&id);
        let prefix_end = make_prefix_end(&id);

        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(CLAIMANTS)?;

        let mut results = Vec::new();
        let mut skipped = 0usize;
        for entry in table.range(prefix.as_slice()..prefix_end.as_slice())? {
            let entry = entry?;
            let claimant: StoredClaimant = serde_json::from_slice(entry.1.value())?;
            if !filter.matches(&claimant) {
                continue;
            }
            if skipped < offset {
                skipped += 1;
                continue;
            }
            results.push(claimant);
            if results.len() >= limit {
                break;
            }
        }
        Ok(results)
    }

    /// Capture the campaign's stale set as a stable snapshot.
    ///
    /// A claimant is stale when it has no signature or when it was last
    /// written before the campaign's `updated_at`. The whole set is read in
    /// one transaction so concurrent enrollment cannot shift rows between
    /// pages of the caller's processing loop.
    pub fn stale_claimants(
        &self,
        campaign_id: Uuid,
        campaign_updated_at: DateTime<Utc>,
    ) -> DropDbResult<Vec<StoredClaimant>> {
        let id = campaign_id.to_string();
        let prefix = make_prefix(&id);
        let prefix_end = make_prefix_end(&id);

        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(CLAIMANTS)?;

        let mut stale = Vec::new();
        for entry in table.range(prefix.as_slice()..prefix_end.as_slice())? {
            let entry = entry?;
            let claimant: StoredClaimant = serde_json::from_slice(entry.1.value())?;
            if claimant.signature.is_none() || claimant.updated_at < campaign_updated_at {
                stale.push(claimant);
            }
        }
        Ok(stale)
    }

    /// Campaign ids a recipient is enrolled in, via the recipient index.
    pub fn recipient_campaign_ids(&self, address: &str) -> DropDbResult<Vec<Uuid>> {
        let prefix = make_prefix(address);
        let prefix_end = make_prefix_end(address);

        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(RECIPIENT_INDEX)?;

        let mut ids = Vec::new();
        for entry in table.range(prefix.as_slice()..prefix_end.as_slice())? {
            let entry = entry?;
            if let Ok(id) = entry.1.value().parse() {
                ids.push(id);
            }
        }
        Ok(ids)
    }

    /// Remove a set of claimants from a campaign in one atomic batch.
    ///
    /// Returns the addresses that were actually removed.
    pub fn delete_claimants(
        &self,
        campaign_id: Uuid,
        addresses: &[String],
    ) -> DropDbResult<Vec<String>> {
        let write_txn = self.db.begin_write()?;
        let removed = {
            let mut claimants = write_txn.open_table(CLAIMANTS)?;
            let mut index = write_txn.open_table(RECIPIENT_INDEX)?;

            let mut removed = Vec::new();
            for address in addresses {
                let key = claimant_key(campaign_id, address);
                if let Some(old) = claimants.remove(key.as_slice())? {
                    let claimant: StoredClaimant = serde_json::from_slice(old.value())?;
                    index.remove(recipient_key(address, campaign_id).as_slice())?;
                    removed.push(claimant.address);
                }
            }
            removed
        };
        write_txn.commit()?;
        Ok(removed)
    }
}

/// Optional filters for [`DropDatabase::list_claimants`].
#[derive(Debug, Clone, Default)]
pub struct ClaimantFilter {
    /// Restrict to one recipient address (case-insensitive).
    pub address: Option<String>,
    /// Restrict to rows enrolled by one actor.
    pub added_by: Option<String>,
    /// Restrict to one entitlement amount.
    pub amount: Option<u64>,
}

impl ClaimantFilter {
    fn matches(&self, claimant: &StoredClaimant) -> bool {
        self.address
            .as_ref()
            .is_none_or(|addr| claimant.address.eq_ignore_ascii_case(addr))
            && self
                .added_by
                .as_ref()
                .is_none_or(|by| &claimant.added_by == by)
            && self.amount.is_none_or(|amount| claimant.amount == amount)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_db() -> (DropDatabase, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let db = DropDatabase::open(&dir.path().join("test.redb")).unwrap();
        (db, dir)
    }

    fn sample_campaign(db: &DropDatabase) -> StoredCampaign {
        let contract = StoredContract::new(
            "ethereum".into(),
            "0x2222222222222222222222222222222222222222".into(),
            "Rewards".into(),
            None,
        );
        db.create_contract(&contract).unwrap();
        let campaign = StoredCampaign::new(contract.id, 7, "Season 1".into(), "drop".into());
        db.create_campaign(&campaign).unwrap();
        campaign
    }

    fn enrolled(campaign_id: Uuid, address: &str, amount: u64) -> StoredClaimant {
        StoredClaimant::new_enrolled(campaign_id, address.into(), amount, "tester".into())
    }

    #[test]
    fn duplicate_contract_registration_conflicts() {
        let (db, _dir) = temp_db();
        let contract = StoredContract::new(
            "ethereum".into(),
            "0x2222222222222222222222222222222222222222".into(),
            "Rewards".into(),
            None,
        );
        db.create_contract(&contract).unwrap();

        let again = StoredContract::new(
            "ethereum".into(),
            "0x2222222222222222222222222222222222222222".into(),
            "Rewards again".into(),
            None,
        );
        assert!(matches!(
            db.create_contract(&again),
            Err(DropDbError::Conflict(_))
        ));

        // Same address on a different chain is a different contract
        let other_chain = StoredContract::new(
            "polygon".into(),
            "0x2222222222222222222222222222222222222222".into(),
            "Rewards".into(),
            None,
        );
        db.create_contract(&other_chain).unwrap();
    }

    #[test]
    fn upsert_preserves_created_at_and_signature_when_amount_unchanged() {
        let (db, _dir) = temp_db();
        let campaign = sample_campaign(&db);
        let addr = "0xAaAa111111111111111111111111111111111111";

        let first = db
            .upsert_claimants(vec![enrolled(campaign.id, addr, 5)])
            .unwrap();
        let created_at = first[0].created_at;

        // Simulate a signing round
        db.apply_signature_updates(
            campaign.id,
            &[SignatureUpdate {
                address: addr.into(),
                amount: 5,
                added_by: "signer".into(),
                signature: "0xsig".into(),
                commitment_hash: "0xhash".into(),
            }],
            Utc::now(),
        )
        .unwrap();

        // Re-enroll with the same amount: signature survives
        db.upsert_claimants(vec![enrolled(campaign.id, addr, 5)])
            .unwrap();
        let row = db.get_claimant(campaign.id, addr).unwrap().unwrap();
        assert_eq!(row.created_at, created_at);
        assert_eq!(row.signature.as_deref(), Some("0xsig"));

        // Re-enroll with a new amount: signature is cleared
        db.upsert_claimants(vec![enrolled(campaign.id, addr, 9)])
            .unwrap();
        let row = db.get_claimant(campaign.id, addr).unwrap().unwrap();
        assert_eq!(row.amount, 9);
        assert!(row.signature.is_none());
        assert!(row.commitment_hash.is_none());
        assert_eq!(row.created_at, created_at);
    }

    #[test]
    fn apply_signature_updates_touches_only_signature_fields() {
        let (db, _dir) = temp_db();
        let campaign = sample_campaign(&db);
        let addr = "0xBbBb111111111111111111111111111111111111";

        db.upsert_claimants(vec![enrolled(campaign.id, addr, 3)])
            .unwrap();
        let before = db.get_claimant(campaign.id, addr).unwrap().unwrap();

        let now = Utc::now();
        db.apply_signature_updates(
            campaign.id,
            &[SignatureUpdate {
                address: addr.into(),
                amount: 3,
                added_by: "refetcher".into(),
                signature: "0xsig".into(),
                commitment_hash: "0xhash".into(),
            }],
            now,
        )
        .unwrap();

        let after = db.get_claimant(campaign.id, addr).unwrap().unwrap();
        assert_eq!(after.signature.as_deref(), Some("0xsig"));
        assert_eq!(after.updated_at, now);
        // Entitlement fields stay as enrolled
        assert_eq!(after.amount, before.amount);
        assert_eq!(after.added_by, before.added_by);
        assert_eq!(after.created_at, before.created_at);
    }

    #[test]
    fn stale_set_contains_unsigned_and_outdated_rows() {
        let (db, _dir) = temp_db();
        let campaign = sample_campaign(&db);

        db.upsert_claimants(vec![
            enrolled(campaign.id, "0x1111111111111111111111111111111111111111", 1),
            enrolled(campaign.id, "0x2222222222222222222222222222222222222222", 2),
        ])
        .unwrap();

        // Both unsigned: both stale
        let stale = db.stale_claimants(campaign.id, campaign.updated_at).unwrap();
        assert_eq!(stale.len(), 2);

        // Sign one of them after the campaign's updated_at
        db.apply_signature_updates(
            campaign.id,
            &[SignatureUpdate {
                address: "0x1111111111111111111111111111111111111111".into(),
                amount: 1,
                added_by: "refetcher".into(),
                signature: "0xsig".into(),
                commitment_hash: "0xhash".into(),
            }],
            Utc::now(),
        )
        .unwrap();

        let stale = db.stale_claimants(campaign.id, campaign.updated_at).unwrap();
        assert_eq!(stale.len(), 1);
        assert_eq!(
            stale[0].address,
            "0x2222222222222222222222222222222222222222"
        );

        // Touching the campaign makes everything stale again
        let campaign = db.update_campaign(campaign.id, |c| c.claim_block_deadline = Some(100)).unwrap();
        let stale = db.stale_claimants(campaign.id, campaign.updated_at).unwrap();
        assert_eq!(stale.len(), 2);
    }

    #[test]
    fn list_claimants_filters_and_pages() {
        let (db, _dir) = temp_db();
        let campaign = sample_campaign(&db);

        let rows: Vec<StoredClaimant> = (0..5)
            .map(|i| {
                enrolled(
                    campaign.id,
                    &format!("0x{i}{}", "1".repeat(39)),
                    if i % 2 == 0 { 10 } else { 20 },
                )
            })
            .collect();
        db.upsert_claimants(rows).unwrap();

        let all = db
            .list_claimants(campaign.id, &ClaimantFilter::default(), 100, 0)
            .unwrap();
        assert_eq!(all.len(), 5);

        let page = db
            .list_claimants(campaign.id, &ClaimantFilter::default(), 2, 2)
            .unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].address, all[2].address);

        let tens = db
            .list_claimants(
                campaign.id,
                &ClaimantFilter {
                    amount: Some(10),
                    ..Default::default()
                },
                100,
                0,
            )
            .unwrap();
        assert_eq!(tens.len(), 3);
    }

    #[test]
    fn recipient_index_tracks_enrollment_and_removal() {
        let (db, _dir) = temp_db();
        let campaign_a = sample_campaign(&db);
        let campaign_b =
            StoredCampaign::new(campaign_a.contract_id, 8, "Season 2".into(), "drop".into());
        db.create_campaign(&campaign_b).unwrap();
        let addr = "0xCcCc111111111111111111111111111111111111";

        db.upsert_claimants(vec![enrolled(campaign_a.id, addr, 1)])
            .unwrap();
        db.upsert_claimants(vec![enrolled(campaign_b.id, addr, 2)])
            .unwrap();

        let mut ids = db.recipient_campaign_ids(addr).unwrap();
        ids.sort();
        let mut expected = vec![campaign_a.id, campaign_b.id];
        expected.sort();
        assert_eq!(ids, expected);

        // Case-insensitive lookup
        assert_eq!(
            db.recipient_campaign_ids(&addr.to_uppercase().replace("0X", "0x"))
                .unwrap()
                .len(),
            2
        );

        let removed = db
            .delete_claimants(campaign_a.id, &[addr.to_string()])
            .unwrap();
        assert_eq!(removed, vec![addr.to_string()]);
        assert_eq!(db.recipient_campaign_ids(addr).unwrap(), vec![campaign_b.id]);

        // Deleting again removes nothing
        let removed = db
            .delete_claimants(campaign_a.id, &[addr.to_string()])
            .unwrap();
        assert!(removed.is_empty());
    }

    #[test]
    fn delete_campaign_cascades_to_claimants() {
        let (db, _dir) = temp_db();
        let campaign = sample_campaign(&db);
        let addr = "0xDdDd111111111111111111111111111111111111";

        db.upsert_claimants(vec![enrolled(campaign.id, addr, 1)])
            .unwrap();
        assert!(db.delete_campaign(campaign.id).unwrap());

        assert!(db.get_claimant(campaign.id, addr).unwrap().is_none());
        assert!(db.recipient_campaign_ids(addr).unwrap().is_empty());
        assert!(!db.delete_campaign(campaign.id).unwrap());
    }

    #[test]
    fn update_campaign_bumps_updated_at() {
        let (db, _dir) = temp_db();
        let campaign = sample_campaign(&db);
        let before = campaign.updated_at;

        let updated = db
            .update_campaign(campaign.id, |c| c.title = "Season 2".into())
            .unwrap();
        assert_eq!(updated.title, "Season 2");
        assert!(updated.updated_at >= before);

        let missing = db.update_campaign(Uuid::new_v4(), |_| {});
        assert!(matches!(missing, Err(DropDbError::NotFound(_))));
    }
}
