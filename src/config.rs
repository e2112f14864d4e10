// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration Constants
//!
//! This module defines environment variable names and default values used
//! throughout the application. Configuration is loaded from the environment
//! at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `DATA_DIR` | Root directory for the embedded database | `/data` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `CHAIN_NAME` | Blockchain name used in contract registrations | `ethereum` |
//! | `CHAIN_ID` | EVM chain id, bound into every commitment hash | Required |
//! | `RPC_URL` | EVM RPC endpoint | Required |
//! | `SIGNER_URL` | Remote signing service base URL | — |
//! | `SIGNER_AUTH_TOKEN` | Bearer token for the signing service | Optional |
//! | `SIGNER_PRIVATE_KEY` | Local hex signing key (development only) | — |
//! | `ADMIN_TOKEN` | Bearer token required on mutating routes | Dev mode if unset |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |
//!
//! Exactly one of `SIGNER_URL` and `SIGNER_PRIVATE_KEY` must be set; when
//! both are, the remote signing service wins.

/// Environment variable name for the data directory path.
///
/// The embedded redb database lives at `{DATA_DIR}/dropper.redb`.
pub const DATA_DIR_ENV: &str = "DATA_DIR";

/// Environment variable name for the server bind address.
pub const HOST_ENV: &str = "HOST";

/// Environment variable name for the server bind port.
pub const PORT_ENV: &str = "PORT";

/// Environment variable name for the blockchain name.
pub const CHAIN_NAME_ENV: &str = "CHAIN_NAME";

/// Environment variable name for the EVM chain id.
pub const CHAIN_ID_ENV: &str = "CHAIN_ID";

/// Environment variable name for the EVM RPC endpoint.
pub const RPC_URL_ENV: &str = "RPC_URL";

/// Environment variable name for the remote signing service base URL.
pub const SIGNER_URL_ENV: &str = "SIGNER_URL";

/// Environment variable name for the signing service bearer token.
pub const SIGNER_AUTH_TOKEN_ENV: &str = "SIGNER_AUTH_TOKEN";

/// Environment variable name for the local development signing key.
pub const SIGNER_PRIVATE_KEY_ENV: &str = "SIGNER_PRIVATE_KEY";

/// Environment variable name for the admin bearer token.
///
/// When unset the service runs in development mode and mutating routes are
/// open; never deploy to production without it.
pub const ADMIN_TOKEN_ENV: &str = "ADMIN_TOKEN";

/// Environment variable name for the log output format.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";
