// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Recipient address normalization.

use std::str::FromStr;

use alloy::primitives::Address;

use super::DropError;

/// Canonicalize a recipient address string to its EIP-55 checksum form.
///
/// All storage keys and commitment hashes are derived from the canonical
/// form, so two spellings of the same address can never produce two rows.
pub fn normalize_address(raw: &str) -> Result<String, DropError> {
    let address =
        Address::from_str(raw.trim()).map_err(|_| DropError::InvalidAddress(raw.to_string()))?;
    Ok(address.to_checksum(None))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercase_input_is_checksummed() {
        let normalized =
            normalize_address("0xfb6916095ca1df60bb79ce92ce3ea74c37c5d359").unwrap();
        assert_eq!(normalized, "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359");
    }

    #[test]
    fn spellings_converge() {
        let lower = normalize_address("0xfb6916095ca1df60bb79ce92ce3ea74c37c5d359").unwrap();
        let upper = normalize_address("0xFB6916095CA1DF60BB79CE92CE3EA74C37C5D359").unwrap();
        let padded = normalize_address("  0xfb6916095ca1df60bb79ce92ce3ea74c37c5d359 ").unwrap();
        assert_eq!(lower, upper);
        assert_eq!(lower, padded);
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(matches!(
            normalize_address("not-an-address"),
            Err(DropError::InvalidAddress(_))
        ));
        assert!(matches!(
            normalize_address("0x1234"),
            Err(DropError::InvalidAddress(_))
        ));
    }
}
