//! Lend Handlers
//!
//! The listing flow: check the operator approval a listing requires, grant
//! it, and submit the listing itself.

use std::str::FromStr;

use alloy::primitives::Address;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use crate::handlers::{bad_request, contract_error, now_secs};
use crate::models::lend::{
    ApprovalQuery, ApprovalStatusResponse, ApproveResponse, ListDomainRequest, ListDomainResponse,
};
use crate::models::ErrorResponse;
use crate::services::{ens, pricing, resolver};
use crate::AppState;

/// Whether the rental contract may already operate the name.
///
/// GET /api/lend/{name}/approval?owner=0x..
///
/// Resolves which contract holds the name (name wrapper for wrapped names,
/// base registrar otherwise) and checks `isApprovedForAll` there.
pub async fn get_approval(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(query): Query<ApprovalQuery>,
) -> Result<Json<ApprovalStatusResponse>, (StatusCode, Json<ErrorResponse>)> {
    let owner = Address::from_str(&query.owner)
        .map_err(|_| bad_request(format!("invalid owner address: {}", query.owner)))?;

    let token_id = ens::token_id_u256(&name);
    let target = state
        .contract
        .approval_target(token_id)
        .await
        .map_err(contract_error)?;
    let approved = state
        .contract
        .is_approved_on(target, owner)
        .await
        .map_err(contract_error)?;

    info!(name = %name, approved = approved, target = target.as_str(), "Approval status checked");

    Ok(Json(ApprovalStatusResponse {
        approved,
        operator_contract: target.as_str().to_string(),
    }))
}

/// Grant the rental contract operating approval for the name's holder.
///
/// POST /api/lend/{name}/approve
pub async fn post_approve(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ApproveResponse>, (StatusCode, Json<ErrorResponse>)> {
    info!(name = %name, "Approval requested");

    let tx_hash = state
        .contract
        .approve(ens::token_id_u256(&name))
        .await
        .map_err(contract_error)?;

    Ok(Json(ApproveResponse { tx_hash }))
}

/// List a domain for rent.
///
/// POST /api/lend/{name}
///
/// The asking price arrives as decimal ETH per year and is converted to the
/// exact wei-per-second rate written on chain.
pub async fn post_list(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(request): Json<ListDomainRequest>,
) -> Result<Json<ListDomainResponse>, (StatusCode, Json<ErrorResponse>)> {
    if request.duration_secs == 0 {
        return Err(bad_request("duration must be positive".to_string()));
    }

    let price_per_second = pricing::price_per_second_from_yearly(&request.price_eth_per_year)
        .map_err(|e| bad_request(e.to_string()))?;

    let display_name = resolver::normalize_name(&name);
    let label = ens::label_of(&display_name).to_string();
    let node = ens::namehash(&display_name);
    let max_end_timestamp = now_secs() as u64 + request.duration_secs;

    info!(
        name = %display_name,
        node = %ens::to_hex(node),
        price_per_second = %price_per_second,
        max_end_timestamp = max_end_timestamp,
        "Listing domain"
    );

    let tx_hash = state
        .contract
        .list_domain(
            ens::token_id_u256(&display_name),
            price_per_second,
            max_end_timestamp,
            node,
            label,
        )
        .await
        .map_err(contract_error)?;

    Ok(Json(ListDomainResponse {
        tx_hash,
        price_per_second: price_per_second.to_string(),
        max_end_timestamp: max_end_timestamp as i64,
    }))
}
