// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::{
    auth::AdminAuth, engine::normalize_address, error::ApiError, models::CreateContractRequest,
    state::AppState, storage::StoredContract,
};

#[derive(Deserialize, IntoParams)]
pub struct ContractsQuery {
    /// Restrict to contracts on one blockchain.
    pub blockchain: Option<String>,
}

#[utoipa::path(
    post,
    path = "/v1/contracts",
    request_body = CreateContractRequest,
    tag = "Contracts",
    responses(
        (status = 201, body = StoredContract),
        (status = 400, description = "Malformed contract address"),
        (status = 409, description = "Contract already registered")
    )
)]
pub async fn create_contract(
    _admin: AdminAuth,
    State(state): State<AppState>,
    Json(request): Json<CreateContractRequest>,
) -> Result<(StatusCode, Json<StoredContract>), ApiError> {
    let address = normalize_address(&request.address)?;
    let contract = StoredContract::new(
        request.blockchain,
        address,
        request.title,
        request.image_uri,
    );
    state.db.create_contract(&contract)?;
    Ok((StatusCode::CREATED, Json(contract)))
}

#[utoipa::path(
    get,
    path = "/v1/contracts",
    params(ContractsQuery),
    tag = "Contracts",
    responses((status = 200, body = [StoredContract]))
)]
pub async fn list_contracts(
    State(state): State<AppState>,
    Query(params): Query<ContractsQuery>,
) -> Result<Json<Vec<StoredContract>>, ApiError> {
    Ok(Json(state.db.list_contracts(params.blockchain.as_deref())?))
}

#[utoipa::path(
    get,
    path = "/v1/contracts/{contract_id}",
    params(("contract_id" = Uuid, Path, description = "Contract identifier")),
    tag = "Contracts",
    responses((status = 200, body = StoredContract), (status = 404))
)]
pub async fn get_contract(
    State(state): State<AppState>,
    Path(contract_id): Path<Uuid>,
) -> Result<Json<StoredContract>, ApiError> {
    state
        .db
        .get_contract(contract_id)?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("Contract {contract_id}")))
}

#[utoipa::path(
    delete,
    path = "/v1/contracts/{contract_id}",
    params(("contract_id" = Uuid, Path, description = "Contract identifier")),
    tag = "Contracts",
    responses((status = 204), (status = 404))
)]
pub async fn delete_contract(
    _admin: AdminAuth,
    State(state): State<AppState>,
    Path(contract_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if state.db.delete_contract(contract_id)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found(format!("Contract {contract_id}")))
    }
}
