// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    engine::{ClaimantClaim, ClaimantEntry},
    models::{
        CreateCampaignRequest, CreateContractRequest, DeleteClaimantsRequest,
        DeleteClaimantsResponse, EnrollClaimantsRequest, RefetchResponse, UpdateCampaignRequest,
    },
    state::AppState,
    storage::{StoredCampaign, StoredClaimant, StoredContract},
};

pub mod campaigns;
pub mod claimants;
pub mod contracts;
pub mod health;

pub fn router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route(
            "/contracts",
            get(contracts::list_contracts).post(contracts::create_contract),
        )
        .route(
            "/contracts/{contract_id}",
            get(contracts::get_contract).delete(contracts::delete_contract),
        )
        .route(
            "/campaigns",
            get(campaigns::list_campaigns).post(campaigns::create_campaign),
        )
        .route(
            "/campaigns/{campaign_id}",
            get(campaigns::get_campaign)
                .put(campaigns::update_campaign)
                .delete(campaigns::delete_campaign),
        )
        .route(
            "/campaigns/{campaign_id}/activate",
            post(campaigns::activate_campaign),
        )
        .route(
            "/campaigns/{campaign_id}/deactivate",
            post(campaigns::deactivate_campaign),
        )
        .route(
            "/campaigns/{campaign_id}/claimants",
            get(claimants::list_campaign_claimants)
                .post(claimants::enroll_claimants)
                .delete(claimants::delete_campaign_claimants),
        )
        .route(
            "/campaigns/{campaign_id}/claimants/{address}",
            get(claimants::get_campaign_claimant),
        )
        .route(
            "/campaigns/{campaign_id}/refetch",
            post(claimants::refetch_signatures),
        )
        .route("/claims", get(claimants::list_recipient_claims))
        .with_state(state);

    Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .nest("/v1", v1_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        health::liveness,
        contracts::create_contract,
        contracts::list_contracts,
        contracts::get_contract,
        contracts::delete_contract,
        campaigns::create_campaign,
        campaigns::list_campaigns,
        campaigns::get_campaign,
        campaigns::update_campaign,
        campaigns::activate_campaign,
        campaigns::deactivate_campaign,
        campaigns::delete_campaign,
        claimants::enroll_claimants,
        claimants::list_campaign_claimants,
        claimants::get_campaign_claimant,
        claimants::delete_campaign_claimants,
        claimants::refetch_signatures,
        claimants::list_recipient_claims
    ),
    components(
        schemas(
            StoredContract,
            StoredCampaign,
            StoredClaimant,
            ClaimantClaim,
            ClaimantEntry,
            CreateContractRequest,
            CreateCampaignRequest,
            UpdateCampaignRequest,
            EnrollClaimantsRequest,
            DeleteClaimantsRequest,
            DeleteClaimantsResponse,
            RefetchResponse
        )
    ),
    tags(
        (name = "Health", description = "Service health probes"),
        (name = "Contracts", description = "Drop contract registry"),
        (name = "Campaigns", description = "Campaign administration"),
        (name = "Claimants", description = "Enrollment, claim lookup, and signature refetch")
    )
)]
struct ApiDoc;
