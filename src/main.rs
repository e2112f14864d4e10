// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{env, net::SocketAddr, path::Path};

use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use dropper_engine::{
    api::router,
    blockchain::{ChainClient, NetworkConfig},
    config::{
        ADMIN_TOKEN_ENV, CHAIN_ID_ENV, CHAIN_NAME_ENV, DATA_DIR_ENV, HOST_ENV, LOG_FORMAT_ENV,
        PORT_ENV, RPC_URL_ENV,
    },
    signer::SignerClient,
    state::AppState,
    storage::DropDatabase,
};

#[tokio::main]
async fn main() {
    init_tracing();

    // Open the embedded entitlement store
    let data_dir = env::var(DATA_DIR_ENV).unwrap_or_else(|_| "/data".to_string());
    let db = DropDatabase::open(&Path::new(&data_dir).join("dropper.redb"))
        .expect("Failed to open drop database");

    // On-chain metadata reader
    let network = NetworkConfig {
        name: env::var(CHAIN_NAME_ENV).unwrap_or_else(|_| "ethereum".to_string()),
        chain_id: env::var(CHAIN_ID_ENV)
            .ok()
            .and_then(|value| value.parse().ok())
            .expect("CHAIN_ID must be set to a number"),
        rpc_url: env::var(RPC_URL_ENV).expect("RPC_URL must be set"),
    };
    tracing::info!(chain = %network.name, chain_id = network.chain_id, "Connecting chain client");
    let chain = ChainClient::new(network).expect("Failed to build chain client");

    // Claim authorization signer (remote service or local development key)
    let signer = SignerClient::from_env().expect("Failed to configure signer");

    let admin_token = env::var(ADMIN_TOKEN_ENV).ok();
    if admin_token.is_none() {
        tracing::warn!("ADMIN_TOKEN is not set; mutating routes are open (development mode)");
    }

    let state = AppState::new(db, chain, signer, admin_token);
    let app = router(state);

    // Parse bind address
    let host = env::var(HOST_ENV).unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var(PORT_ENV)
        .unwrap_or_else(|_| "8080".to_string())
        .parse()
        .unwrap_or(8080);

    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .expect("Failed to parse bind address");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind server address");
    tracing::info!(%addr, "Dropper engine listening (docs at /docs)");

    // Graceful shutdown on SIGINT
    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Shutdown signal received");
            signal_token.cancel();
        }
    });

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .expect("HTTP server failed");
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));
    let json = env::var(LOG_FORMAT_ENV)
        .map(|value| value.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
