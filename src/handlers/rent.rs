//! Rent/Unlist Handlers
//!
//! POST /api/domains/{name}/rent and POST /api/domains/{name}/unlist.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use crate::handlers::{bad_request, contract_error, indexer_error, now_secs};
use crate::models::lend::{RentDomainRequest, RentDomainResponse, UnlistDomainResponse};
use crate::models::ErrorResponse;
use crate::services::{ens, pricing};
use crate::AppState;

/// Rent a listed domain for a duration from now.
///
/// POST /api/domains/{name}/rent
///
/// The payable value is the listing's locked per-second rate times the
/// requested duration, computed exactly in wei. Slot exclusivity and the
/// max-end bound are enforced by the contract; a violation surfaces as a
/// simulation failure.
pub async fn post_rent(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(request): Json<RentDomainRequest>,
) -> Result<Json<RentDomainResponse>, (StatusCode, Json<ErrorResponse>)> {
    if request.duration_secs == 0 {
        return Err(bad_request("duration must be positive".to_string()));
    }

    let token_id = ens::token_id(&name);
    let listing = state
        .indexer
        .listing_by_token_id(&token_id)
        .await
        .map_err(indexer_error)?;

    let end_timestamp = now_secs() as u64 + request.duration_secs;
    let value = pricing::rental_cost_wei(&listing.price_per_second, request.duration_secs);

    info!(
        name = %name,
        end_timestamp = end_timestamp,
        value = %value,
        "Renting domain"
    );

    let tx_hash = state
        .contract
        .rent_domain(ens::token_id_u256(&name), end_timestamp, value)
        .await
        .map_err(contract_error)?;

    Ok(Json(RentDomainResponse {
        tx_hash,
        end_timestamp: end_timestamp as i64,
        total_price_wei: value.to_string(),
    }))
}

/// Reclaim an expired or unrented listing.
///
/// POST /api/domains/{name}/unlist
pub async fn post_unlist(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<UnlistDomainResponse>, (StatusCode, Json<ErrorResponse>)> {
    info!(name = %name, "Unlisting domain");

    let tx_hash = state
        .contract
        .reclaim_domain(ens::token_id_u256(&name))
        .await
        .map_err(contract_error)?;

    Ok(Json(UnlistDomainResponse { tx_hash }))
}
