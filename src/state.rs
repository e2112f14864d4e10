// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::blockchain::ChainClient;
use crate::engine::CampaignLocks;
use crate::signer::SignerClient;
use crate::storage::DropDatabase;

#[derive(Clone)]
pub struct AppState {
    /// Embedded entitlement store.
    pub db: Arc<DropDatabase>,
    /// On-chain metadata reader.
    pub chain: Arc<ChainClient>,
    /// Claim authorization signer.
    pub signer: Arc<SignerClient>,
    /// Per-campaign refetch serialization.
    pub locks: Arc<CampaignLocks>,
    /// Bearer token for mutating routes. `None` means development mode.
    pub admin_token: Option<Arc<str>>,
}

impl AppState {
    pub fn new(
        db: DropDatabase,
        chain: ChainClient,
        signer: SignerClient,
        admin_token: Option<String>,
    ) -> Self {
        Self {
            db: Arc::new(db),
            chain: Arc::new(chain),
            signer: Arc::new(signer),
            locks: Arc::new(CampaignLocks::new()),
            admin_token: admin_token.map(Arc::from),
        }
    }
}

#[cfg(test)]
pub(crate) fn test_state(admin_token: Option<String>) -> (AppState, tempfile::TempDir) {
    use crate::blockchain::NetworkConfig;
    use crate::signer::LocalSigner;

    let dir = tempfile::tempdir().unwrap();
    let db = DropDatabase::open(&dir.path().join("test.redb")).unwrap();
    let chain = ChainClient::new(NetworkConfig {
        name: "ethereum".into(),
        chain_id: 31337,
        rpc_url: "http://localhost:8545".into(),
    })
    .unwrap();
    let signer = SignerClient::Local(
        LocalSigner::new("0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d")
            .unwrap(),
    );
    (AppState::new(db, chain, signer, admin_token), dir)
}
