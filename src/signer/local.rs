// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-process signer backed by a local private key.
//!
//! Development and test convenience only; production deployments point
//! `SIGNER_URL` at the remote signing service so the authority key never
//! touches this process.

use std::collections::HashMap;

use alloy::{
    primitives::B256,
    signers::{local::PrivateKeySigner, Signer},
};

use super::{BatchSign, SignerError};

/// Signer holding a secp256k1 key in process memory.
pub struct LocalSigner {
    signer: PrivateKeySigner,
}

impl LocalSigner {
    /// Create a signer from a hex-encoded private key (with or without 0x
    /// prefix).
    pub fn new(private_key_hex: &str) -> Result<Self, SignerError> {
        let key_bytes = alloy::hex::decode(private_key_hex.trim_start_matches("0x"))
            .map_err(|e| SignerError::InvalidKey(e.to_string()))?;

        let signer = PrivateKeySigner::from_slice(&key_bytes)
            .map_err(|e| SignerError::InvalidKey(e.to_string()))?;

        Ok(Self { signer })
    }

    /// The authority address corresponding to the signing key.
    pub fn address(&self) -> alloy::primitives::Address {
        self.signer.address()
    }
}

impl BatchSign for LocalSigner {
    async fn batch_sign(&self, hashes: &[B256]) -> Result<HashMap<B256, String>, SignerError> {
        let mut signatures = HashMap::with_capacity(hashes.len());
        for hash in hashes {
            if signatures.contains_key(hash) {
                continue;
            }
            let signature = self
                .signer
                .sign_hash(hash)
                .await
                .map_err(|e| SignerError::Unavailable(e.to_string()))?;
            signatures.insert(*hash, alloy::hex::encode_prefixed(signature.as_bytes()));
        }
        Ok(signatures)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::b256;

    const TEST_KEY: &str = "0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d";

    #[test]
    fn rejects_malformed_keys() {
        assert!(matches!(
            LocalSigner::new("zz"),
            Err(SignerError::InvalidKey(_))
        ));
        assert!(matches!(
            LocalSigner::new("0xdeadbeef"),
            Err(SignerError::InvalidKey(_))
        ));
    }

    #[tokio::test]
    async fn signs_every_hash_deterministically() {
        let signer = LocalSigner::new(TEST_KEY).unwrap();
        let hashes = [
            b256!("0x1111111111111111111111111111111111111111111111111111111111111111"),
            b256!("0x2222222222222222222222222222222222222222222222222222222222222222"),
        ];

        let first = signer.batch_sign(&hashes).await.unwrap();
        assert_eq!(first.len(), 2);
        for signature in first.values() {
            // 0x + 65 bytes hex
            assert_eq!(signature.len(), 132);
        }
        assert_ne!(first[&hashes[0]], first[&hashes[1]]);

        // RFC 6979 nonces: same hash, same signature
        let second = signer.batch_sign(&hashes).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn duplicate_hashes_collapse() {
        let signer = LocalSigner::new(TEST_KEY).unwrap();
        let hash =
            b256!("0x3333333333333333333333333333333333333333333333333333333333333333");
        let signatures = signer.batch_sign(&[hash, hash]).await.unwrap();
        assert_eq!(signatures.len(), 1);
    }
}
