//! Manage Handler
//!
//! GET /api/manage/{address} endpoint: the viewer's aggregate portfolio
//! view, merging owned names, own listings, and borrowed rentals into one
//! deduplicated, status-tagged collection.

use std::str::FromStr;

use alloy::primitives::Address;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use crate::handlers::{bad_request, ens_error, indexer_error, now_secs};
use crate::models::domain::Domain;
use crate::models::listing::RentalStatus;
use crate::models::manage::{ManageQuery, ManageResponse, StatusCounts};
use crate::models::ErrorResponse;
use crate::services::resolver;
use crate::AppState;

/// Aggregate view for one address.
///
/// GET /api/manage/{address}
///
/// # Query Parameters
///
/// - `search` - Substring filter on the domain name
/// - `status` - Restrict to one status; `rented` matches both directions
///
/// The four source collections (owned names, own listings, borrowed
/// rentals, lent-out listings) are fetched independently and merged by
/// name; a name hit by several sources keeps its most specific status.
pub async fn get_manage(
    State(state): State<AppState>,
    Path(address): Path<String>,
    Query(query): Query<ManageQuery>,
) -> Result<Json<ManageResponse>, (StatusCode, Json<ErrorResponse>)> {
    if Address::from_str(&address).is_err() {
        return Err(bad_request(format!("invalid address: {}", address)));
    }

    info!(address = %address, "Manage aggregate request");

    let now = now_secs();

    let (names, listings, borrowed) = tokio::join!(
        state.ens.names_for_address(&address),
        state.indexer.listings_by_lender(&address),
        state.indexer.rentals_by_borrower(&address),
    );

    let owned: Vec<Domain> = names
        .map_err(ens_error)?
        .into_iter()
        .map(Domain::available)
        .collect();

    let own_listings: Vec<Domain> = listings
        .map_err(indexer_error)?
        .iter()
        .map(|listing| resolver::to_domain(listing, Some(&address), now))
        .collect();

    let borrowed: Vec<Domain> = borrowed
        .map_err(indexer_error)?
        .iter()
        .map(|rental| resolver::rental_to_domain(rental, Some(&address), now))
        .collect();

    let lent_out: Vec<Domain> = own_listings
        .iter()
        .filter(|domain| domain.status == RentalStatus::RentedOut)
        .cloned()
        .collect();

    let domains = resolver::merge_domains([owned, own_listings, borrowed, lent_out]);
    let counts = StatusCounts::tally(&domains);

    let domains: Vec<Domain> = domains
        .into_iter()
        .filter(|domain| {
            query
                .search
                .as_deref()
                .map(|s| domain.name.to_lowercase().contains(&s.to_lowercase()))
                .unwrap_or(true)
        })
        .filter(|domain| {
            query
                .status
                .map(|wanted| domain.status.matches(wanted))
                .unwrap_or(true)
        })
        .collect();

    info!(
        address = %address,
        total = domains.len(),
        available = counts.available,
        listed = counts.listed,
        rented_out = counts.rented_out,
        rented_in = counts.rented_in,
        "Manage aggregate returned"
    );

    let total = domains.len();

    Ok(Json(ManageResponse {
        domains,
        total,
        counts,
    }))
}
