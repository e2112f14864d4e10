// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Remote signing service client.
//!
//! The signing service holds the drop authority key and exposes a single
//! batch endpoint. Waking the backing instance, key rotation, and access
//! control are its concern, not ours.

use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

use alloy::primitives::B256;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{BatchSign, SignerError};

/// Request timeout. Batch signing is the slowest external call the engine
/// makes, so this is deliberately generous.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Serialize)]
struct BatchSignRequest<'a> {
    hashes: &'a [String],
}

#[derive(Debug, Deserialize)]
struct BatchSignResponse {
    signatures: Vec<SignedHash>,
}

#[derive(Debug, Deserialize)]
struct SignedHash {
    hash: String,
    signature: String,
}

/// HTTP client for the remote signing service.
#[derive(Debug, Clone)]
pub struct HttpSigner {
    base_url: String,
    auth_token: Option<String>,
    http: Client,
}

impl HttpSigner {
    /// Create a client for the signing service at `base_url`.
    pub fn new(base_url: String, auth_token: Option<String>) -> Result<Self, SignerError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| SignerError::Unavailable(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_token,
            http,
        })
    }
}

impl BatchSign for HttpSigner {
    async fn batch_sign(&self, hashes: &[B256]) -> Result<HashMap<B256, String>, SignerError> {
        let hex_hashes: Vec<String> = hashes.iter().map(|h| h.to_string()).collect();

        let mut request = self
            .http
            .post(format!("{}/sign/batch", self.base_url))
            .json(&BatchSignRequest {
                hashes: &hex_hashes,
            });
        if let Some(token) = &self.auth_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| SignerError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SignerError::Unavailable(format!(
                "signing service returned {status}"
            )));
        }

        let body: BatchSignResponse = response
            .json()
            .await
            .map_err(|e| SignerError::InvalidResponse(e.to_string()))?;

        let mut signatures = HashMap::with_capacity(body.signatures.len());
        for signed in body.signatures {
            let hash = B256::from_str(&signed.hash)
                .map_err(|e| SignerError::InvalidResponse(format!("bad hash in response: {e}")))?;
            signatures.insert(hash, signed.signature);
        }

        // Every submitted hash must come back signed
        for hash in hashes {
            if !signatures.contains_key(hash) {
                return Err(SignerError::InvalidResponse(format!(
                    "signing service omitted hash {hash}"
                )));
            }
        }

        Ok(signatures)
    }
}
