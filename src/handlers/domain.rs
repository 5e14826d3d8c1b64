//! Domain Detail Handler
//!
//! GET /api/domains/{name} endpoint for the rental detail view.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use crate::handlers::{indexer_error, now_secs};
use crate::models::domain::{DomainDetailResponse, ViewerQuery};
use crate::models::ErrorResponse;
use crate::services::{ens, resolver};
use crate::AppState;

/// Look up one listing by domain name.
///
/// GET /api/domains/{name}
///
/// The token id is derived from the name's label hash; a listing the
/// indexer does not know returns 404. An optional `viewer` query parameter
/// scopes the derived status (`rentedOut`/`rentedIn`).
pub async fn get_domain(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(query): Query<ViewerQuery>,
) -> Result<Json<DomainDetailResponse>, (StatusCode, Json<ErrorResponse>)> {
    let token_id = ens::token_id(&name);
    info!(name = %name, token_id = %token_id, "Domain detail request");

    let listing = state
        .indexer
        .listing_by_token_id(&token_id)
        .await
        .map_err(indexer_error)?;

    let viewer = query.viewer.as_deref();
    let domain = resolver::to_domain(&listing, viewer, now_secs());
    let viewer_is_lender = viewer
        .map(|v| resolver::addresses_match(v, &listing.lender))
        .unwrap_or(false);

    info!(name = %domain.name, status = %domain.status, "Domain detail returned");

    Ok(Json(DomainDetailResponse {
        domain,
        viewer_is_lender,
    }))
}
