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
    engine::normalize_address,
    error::ApiError,
    models::{CreateCampaignRequest, UpdateCampaignRequest},
    state::AppState,
    storage::StoredCampaign,
};

#[derive(Deserialize, IntoParams)]
pub struct CampaignsQuery {
    /// Restrict to campaigns of one contract.
    pub contract_id: Option<Uuid>,
    /// Restrict by active flag.
    pub active: Option<bool>,
}

#[utoipa::path(
    post,
    path = "/v1/campaigns",
    request_body = CreateCampaignRequest,
    tag = "Campaigns",
    responses(
        (status = 201, body = StoredCampaign),
        (status = 404, description = "Unknown contract")
    )
)]
pub async fn create_campaign(
    _admin: AdminAuth,
    State(state): State<AppState>,
    Json(request): Json<CreateCampaignRequest>,
) -> Result<(StatusCode, Json<StoredCampaign>), ApiError> {
    if state.db.get_contract(request.contract_id)?.is_none() {
        return Err(ApiError::not_found(format!(
            "Contract {}",
            request.contract_id
        )));
    }
    let campaign = StoredCampaign::new(
        request.contract_id,
        request.claim_id,
        request.title,
        request.description,
    );
    state.db.create_campaign(&campaign)?;
    Ok((StatusCode::CREATED, Json(campaign)))
}

#[utoipa::path(
    get,
    path = "/v1/campaigns",
    params(CampaignsQuery),
    tag = "Campaigns",
    responses((status = 200, body = [StoredCampaign]))
)]
pub async fn list_campaigns(
    State(state): State<AppState>,
    Query(params): Query<CampaignsQuery>,
) -> Result<Json<Vec<StoredCampaign>>, ApiError> {
    Ok(Json(
        state.db.list_campaigns(params.contract_id, params.active)?,
    ))
}

#[utoipa::path(
    get,
    path = "/v1/campaigns/{campaign_id}",
    params(("campaign_id" = Uuid, Path, description = "Campaign identifier")),
    tag = "Campaigns",
    responses((status = 200, body = StoredCampaign), (status = 404))
)]
pub async fn get_campaign(
    State(state): State<AppState>,
    Path(campaign_id): Path<Uuid>,
) -> Result<Json<StoredCampaign>, ApiError> {
    state
        .db
        .get_campaign(campaign_id)?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("Campaign {campaign_id}")))
}

#[utoipa::path(
    put,
    path = "/v1/campaigns/{campaign_id}",
    params(("campaign_id" = Uuid, Path, description = "Campaign identifier")),
    request_body = UpdateCampaignRequest,
    tag = "Campaigns",
    responses((status = 200, body = StoredCampaign), (status = 404))
)]
pub async fn update_campaign(
    _admin: AdminAuth,
    State(state): State<AppState>,
    Path(campaign_id): Path<Uuid>,
    Json(request): Json<UpdateCampaignRequest>,
) -> Result<Json<StoredCampaign>, ApiError> {
    let auth_pool_address = match &request.auth_pool_address {
        Some(raw) => Some(normalize_address(raw)?),
        None => None,
    };

    let campaign = state.db.update_campaign(campaign_id, move |campaign| {
        if let Some(title) = request.title {
            campaign.title = title;
        }
        if let Some(description) = request.description {
            campaign.description = description;
        }
        if let Some(deadline) = request.claim_block_deadline {
            campaign.claim_block_deadline = Some(deadline);
        }
        if let Some(address) = auth_pool_address {
            campaign.auth_pool_address = Some(address);
        }
        if let Some(pool_id) = request.auth_pool_id {
            campaign.auth_pool_id = Some(pool_id);
        }
    })?;
    Ok(Json(campaign))
}

#[utoipa::path(
    post,
    path = "/v1/campaigns/{campaign_id}/activate",
    params(("campaign_id" = Uuid, Path, description = "Campaign identifier")),
    tag = "Campaigns",
    responses((status = 200, body = StoredCampaign), (status = 404))
)]
pub async fn activate_campaign(
    _admin: AdminAuth,
    State(state): State<AppState>,
    Path(campaign_id): Path<Uuid>,
) -> Result<Json<StoredCampaign>, ApiError> {
    let campaign = state
        .db
        .update_campaign(campaign_id, |campaign| campaign.active = true)?;
    Ok(Json(campaign))
}

#[utoipa::path(
    post,
    path = "/v1/campaigns/{campaign_id}/deactivate",
    params(("campaign_id" = Uuid, Path, description = "Campaign identifier")),
    tag = "Campaigns",
    responses((status = 200, body = StoredCampaign), (status = 404))
)]
pub async fn deactivate_campaign(
    _admin: AdminAuth,
    State(state): State<AppState>,
    Path(campaign_id): Path<Uuid>,
) -> Result<Json<StoredCampaign>, ApiError> {
    let campaign = state
        .db
        .update_campaign(campaign_id, |campaign| campaign.active = false)?;
    Ok(Json(campaign))
}

#[utoipa::path(
    delete,
    path = "/v1/campaigns/{campaign_id}",
    params(("campaign_id" = Uuid, Path, description = "Campaign identifier")),
    tag = "Campaigns",
    responses((status = 204), (status = 404))
)]
pub async fn delete_campaign(
    _admin: AdminAuth,
    State(state): State<AppState>,
    Path(campaign_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if state.db.delete_campaign(campaign_id)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found(format!("Campaign {campaign_id}")))
    }
}
