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
    auth::AdminAuth,
    engine::{
        add_claimants, claimant_drops, get_claimant as query_claimant, list_claimants,
        normalize_address, refetch_drop_signatures, ClaimantClaim,
    },
    error::ApiError,
    models::{
        DeleteClaimantsRequest, DeleteClaimantsResponse, EnrollClaimantsRequest, RefetchResponse,
        DEFAULT_ACTOR,
    },
    state::AppState,
    storage::{ClaimantFilter, StoredClaimant},
};

const DEFAULT_PAGE_LIMIT: usize = 100;

#[derive(Deserialize, IntoParams)]
pub struct ClaimantsQuery {
    /// Restrict to one recipient address.
    pub address: Option<String>,
    /// Restrict to rows enrolled by one actor.
    pub added_by: Option<String>,
    /// Restrict to one entitlement amount.
    pub amount: Option<u64>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

#[derive(Deserialize, IntoParams)]
pub struct RefetchQuery {
    /// Provenance recorded on the re-signed rows.
    pub added_by: Option<String>,
}

#[derive(Deserialize, IntoParams)]
pub struct ClaimsQuery {
    /// Blockchain the claims are served on.
    pub blockchain: String,
    /// Recipient address.
    pub address: String,
    /// When given, claims whose deadline has passed are omitted.
    pub current_block: Option<u64>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

#[utoipa::path(
    post,
    path = "/v1/campaigns/{campaign_id}/claimants",
    params(("campaign_id" = Uuid, Path, description = "Campaign identifier")),
    request_body = EnrollClaimantsRequest,
    tag = "Claimants",
    responses(
        (status = 201, body = [StoredClaimant]),
        (status = 400, description = "Duplicate or malformed addresses"),
        (status = 404, description = "Unknown campaign")
    )
)]
pub async fn enroll_claimants(
    _admin: AdminAuth,
    State(state): State<AppState>,
    Path(campaign_id): Path<Uuid>,
    Json(request): Json<EnrollClaimantsRequest>,
) -> Result<(StatusCode, Json<Vec<StoredClaimant>>), ApiError> {
    let added_by = request.added_by.as_deref().unwrap_or(DEFAULT_ACTOR);
    let committed = add_claimants(&state.db, campaign_id, &request.claimants, added_by)?;
    Ok((StatusCode::CREATED, Json(committed)))
}

#[utoipa::path(
    get,
    path = "/v1/campaigns/{campaign_id}/claimants",
    params(("campaign_id" = Uuid, Path, description = "Campaign identifier"), ClaimantsQuery),
    tag = "Claimants",
    responses((status = 200, body = [StoredClaimant]), (status = 404))
)]
pub async fn list_campaign_claimants(
    State(state): State<AppState>,
    Path(campaign_id): Path<Uuid>,
    Query(params): Query<ClaimantsQuery>,
) -> Result<Json<Vec<StoredClaimant>>, ApiError> {
    let filter = ClaimantFilter {
        address: params.address,
        added_by: params.added_by,
        amount: params.amount,
    };
    let claimants = list_claimants(
        &state.db,
        campaign_id,
        &filter,
        params.limit.unwrap_or(DEFAULT_PAGE_LIMIT),
        params.offset.unwrap_or(0),
    )?;
    Ok(Json(claimants))
}

#[utoipa::path(
    get,
    path = "/v1/campaigns/{campaign_id}/claimants/{address}",
    params(
        ("campaign_id" = Uuid, Path, description = "Campaign identifier"),
        ("address" = String, Path, description = "Recipient address")
    ),
    tag = "Claimants",
    responses((status = 200, body = ClaimantClaim), (status = 404))
)]
pub async fn get_campaign_claimant(
    State(state): State<AppState>,
    Path((campaign_id, address)): Path<(Uuid, String)>,
) -> Result<Json<ClaimantClaim>, ApiError> {
    Ok(Json(query_claimant(&state.db, campaign_id, &address)?))
}

#[utoipa::path(
    delete,
    path = "/v1/campaigns/{campaign_id}/claimants",
    params(("campaign_id" = Uuid, Path, description = "Campaign identifier")),
    request_body = DeleteClaimantsRequest,
    tag = "Claimants",
    responses((status = 200, body = DeleteClaimantsResponse), (status = 404))
)]
pub async fn delete_campaign_claimants(
    _admin: AdminAuth,
    State(state): State<AppState>,
    Path(campaign_id): Path<Uuid>,
    Json(request): Json<DeleteClaimantsRequest>,
) -> Result<Json<DeleteClaimantsResponse>, ApiError> {
    if state.db.get_campaign(campaign_id)?.is_none() {
        return Err(ApiError::not_found(format!("Campaign {campaign_id}")));
    }

    let mut addresses = Vec::with_capacity(request.addresses.len());
    for raw in &request.addresses {
        addresses.push(normalize_address(raw)?);
    }

    let removed = state.db.delete_claimants(campaign_id, &addresses)?;
    Ok(Json(DeleteClaimantsResponse { removed }))
}

#[utoipa::path(
    post,
    path = "/v1/campaigns/{campaign_id}/refetch",
    params(("campaign_id" = Uuid, Path, description = "Campaign identifier"), RefetchQuery),
    tag = "Claimants",
    responses(
        (status = 200, body = RefetchResponse),
        (status = 400, description = "Campaign has no block deadline"),
        (status = 502, description = "Chain or signer unavailable")
    )
)]
pub async fn refetch_signatures(
    _admin: AdminAuth,
    State(state): State<AppState>,
    Path(campaign_id): Path<Uuid>,
    Query(params): Query<RefetchQuery>,
) -> Result<Json<RefetchResponse>, ApiError> {
    let added_by = params.added_by.as_deref().unwrap_or(DEFAULT_ACTOR);
    let committed = refetch_drop_signatures(
        &state.db,
        state.chain.as_ref(),
        state.signer.as_ref(),
        &state.locks,
        campaign_id,
        added_by,
    )
    .await?;
    Ok(Json(RefetchResponse {
        refreshed: committed.len(),
    }))
}

#[utoipa::path(
    get,
    path = "/v1/claims",
    params(ClaimsQuery),
    tag = "Claimants",
    responses((status = 200, body = [ClaimantClaim]))
)]
pub async fn list_recipient_claims(
    State(state): State<AppState>,
    Query(params): Query<ClaimsQuery>,
) -> Result<Json<Vec<ClaimantClaim>>, ApiError> {
    let claims = claimant_drops(
        &state.db,
        &params.blockchain,
        &params.address,
        params.current_block,
        params.limit.unwrap_or(DEFAULT_PAGE_LIMIT),
        params.offset.unwrap_or(0),
    )?;
    Ok(Json(claims))
}
