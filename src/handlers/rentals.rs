//! Rentals Handler
//!
//! GET /api/rentals endpoint listing every active rental.

use axum::{extract::State, http::StatusCode, Json};
use tracing::info;

use crate::handlers::{indexer_error, now_secs};
use crate::models::manage::{RentalsResponse, RentedDomain};
use crate::models::ErrorResponse;
use crate::services::resolver;
use crate::AppState;

/// All unexpired rentals, most recent first.
///
/// GET /api/rentals
pub async fn get_rentals(
    State(state): State<AppState>,
) -> Result<Json<RentalsResponse>, (StatusCode, Json<ErrorResponse>)> {
    let now = now_secs();

    let rentals: Vec<RentedDomain> = state
        .indexer
        .all_rentals()
        .await
        .map_err(indexer_error)?
        .iter()
        .filter(|rental| rental.end_time_secs() > now)
        .map(|rental| RentedDomain {
            borrower: rental.borrower.clone(),
            start_time: rental.start_time_secs(),
            end_time: rental.end_time_secs(),
            domain: resolver::rental_to_domain(rental, None, now),
        })
        .collect();

    info!(count = rentals.len(), "Active rentals returned");

    let total = rentals.len();

    Ok(Json(RentalsResponse { rentals, total }))
}
