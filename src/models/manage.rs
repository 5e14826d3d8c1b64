//! Manage-view request/response models

use serde::{Deserialize, Serialize};

use crate::models::domain::Domain;
use crate::models::listing::RentalStatus;

/// Query parameters for `GET /api/manage/{address}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ManageQuery {
    /// Substring filter on the domain name.
    pub search: Option<String>,
    /// Restrict to one status; the generic `rented` value matches both
    /// rental directions.
    pub status: Option<RentalStatus>,
}

/// Response for `GET /api/manage/{address}`: one deduplicated collection
/// plus per-status counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManageResponse {
    pub domains: Vec<Domain>,
    pub total: usize,
    pub counts: StatusCounts,
}

/// How many of the viewer's domains fall in each bucket, before the
/// optional status filter is applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
    pub available: usize,
    pub listed: usize,
    pub rented_out: usize,
    pub rented_in: usize,
}

impl StatusCounts {
    pub fn tally(domains: &[Domain]) -> Self {
        let mut counts = StatusCounts::default();
        for domain in domains {
            match domain.status {
                RentalStatus::Available => counts.available += 1,
                RentalStatus::Listed => counts.listed += 1,
                RentalStatus::RentedOut => counts.rented_out += 1,
                RentalStatus::RentedIn => counts.rented_in += 1,
                RentalStatus::Rented => {}
            }
        }
        counts
    }
}

/// One entry of `GET /api/rentals`: an active rental joined with its domain.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RentedDomain {
    pub borrower: String,
    pub start_time: i64,
    pub end_time: i64,
    pub domain: Domain,
}

/// Response for `GET /api/rentals`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RentalsResponse {
    pub rentals: Vec<RentedDomain>,
    pub total: usize,
}
