// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Claim authorization signing.
//!
//! The engine only depends on the [`BatchSign`] capability: hand over a batch
//! of commitment hashes, get back a signature per hash. Where the key lives
//! (a remote signing service or a local development key) is selected at
//! startup and hidden behind [`SignerClient`].

pub mod http;
pub mod local;

use std::collections::HashMap;
use std::future::Future;

use alloy::primitives::B256;

pub use http::HttpSigner;
pub use local::LocalSigner;

use crate::config::{SIGNER_AUTH_TOKEN_ENV, SIGNER_PRIVATE_KEY_ENV, SIGNER_URL_ENV};

/// Errors that can occur while obtaining claim signatures.
#[derive(Debug, thiserror::Error)]
pub enum SignerError {
    #[error("Signer configuration missing: {0}")]
    MissingConfig(String),

    #[error("Invalid signing key: {0}")]
    InvalidKey(String),

    #[error("Signing service unavailable: {0}")]
    Unavailable(String),

    #[error("Signing service response was invalid: {0}")]
    InvalidResponse(String),
}

/// Batch signing capability.
///
/// Implementations sign every submitted hash or fail the whole batch; a
/// partial result would let the caller persist a mix of old and new
/// authorizations.
pub trait BatchSign {
    fn batch_sign(
        &self,
        hashes: &[B256],
    ) -> impl Future<Output = Result<HashMap<B256, String>, SignerError>> + Send;
}

/// Runtime signer selection.
pub enum SignerClient {
    /// Remote signing service over HTTPS.
    Remote(HttpSigner),
    /// In-process key, for development and tests.
    Local(LocalSigner),
}

impl SignerClient {
    /// Build a signer from the environment.
    ///
    /// `SIGNER_URL` selects the remote signing service; otherwise
    /// `SIGNER_PRIVATE_KEY` selects a local in-process key.
    pub fn from_env() -> Result<Self, SignerError> {
        if let Ok(url) = std::env::var(SIGNER_URL_ENV) {
            let auth_token = std::env::var(SIGNER_AUTH_TOKEN_ENV).ok();
            return Ok(Self::Remote(HttpSigner::new(url, auth_token)?));
        }
        if let Ok(key) = std::env::var(SIGNER_PRIVATE_KEY_ENV) {
            return Ok(Self::Local(LocalSigner::new(&key)?));
        }
        Err(SignerError::MissingConfig(format!(
            "set {SIGNER_URL_ENV} or {SIGNER_PRIVATE_KEY_ENV}"
        )))
    }
}

impl BatchSign for SignerClient {
    async fn batch_sign(&self, hashes: &[B256]) -> Result<HashMap<B256, String>, SignerError> {
        match self {
            Self::Remote(signer) => signer.batch_sign(hashes).await,
            Self::Local(signer) => signer.batch_sign(hashes).await,
        }
    }
}
