//! Browse Handler
//!
//! GET /api/browse endpoint serving the paginated marketplace view.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use tracing::{info, warn};

use crate::handlers::{bad_request, indexer_error, now_secs};
use crate::models::browse::{BrowseQuery, BrowseResponse};
use crate::models::ErrorResponse;
use crate::AppState;

/// Serve one page of rentable listings.
///
/// GET /api/browse
///
/// # Query Parameters
///
/// - `session` - Browse session id from a previous response; omit to start
///   a fresh session
/// - `search` - Substring filter on the domain name
/// - `sort` - `price` | `maxTime` | `name` (default: price)
/// - `nav` - `reset` | `next` | `previous` (default: reset)
/// - `limit` - Page size (default: 20, max: 100)
/// - `viewer` - Connected wallet address; its own listings are excluded
///
/// Navigation is only honored when the previous response's page flags allow
/// it; a disallowed move returns `navApplied: false` without querying the
/// indexer. Changing `search` or `sort` resets the session to its first
/// page.
pub async fn get_browse(
    State(state): State<AppState>,
    Query(query): Query<BrowseQuery>,
) -> Result<Json<BrowseResponse>, (StatusCode, Json<ErrorResponse>)> {
    if let Err(e) = query.validate() {
        warn!(error = %e, "Invalid browse query");
        return Err(bad_request(e));
    }

    let response = state
        .browse
        .page(&query, now_secs())
        .await
        .map_err(indexer_error)?;

    info!(
        session = %response.session,
        count = response.items.len(),
        nav_applied = response.nav_applied,
        has_next = response.page.has_next_page,
        "Browse page returned"
    );

    Ok(Json(response))
}
