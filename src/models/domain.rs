//! Domain view model
//!
//! The merged, display-ready shape every view consumes. Built by the status
//! resolver from indexer records; never persisted.

use serde::{Deserialize, Serialize};

use crate::models::listing::RentalStatus;

/// A domain with its derived rental status and display pricing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Domain {
    /// Indexer listing id; absent for owned-but-unlisted names.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Display name, always carrying the `.eth` suffix.
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lender: Option<String>,
    /// Wei per second, as stored on the listing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_per_second: Option<String>,
    /// Exact yearly price in decimal ETH (365 days at the per-second rate).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_per_year_eth: Option<String>,
    /// Latest permissible rental end, unix seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_rental_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_wrapped: Option<bool>,
    pub status: RentalStatus,
    /// Borrower of the active rental, when one exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub borrower: Option<String>,
    /// End of the active rental, unix seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rental_end: Option<i64>,
}

impl Domain {
    /// An owned name with no listing record.
    pub fn available(name: String) -> Self {
        Self {
            id: None,
            name,
            token_id: None,
            node: None,
            lender: None,
            price_per_second: None,
            price_per_year_eth: None,
            max_rental_time: None,
            created_at: None,
            is_wrapped: None,
            status: RentalStatus::Available,
            borrower: None,
            rental_end: None,
        }
    }
}

/// Response for `GET /api/domains/{name}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainDetailResponse {
    pub domain: Domain,
    /// Whether the query's viewer is the listing's lender.
    pub viewer_is_lender: bool,
}

/// Optional viewer scoping for read endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ViewerQuery {
    /// Connected wallet address, when known. Malformed values are treated
    /// as absent, never rejected.
    pub viewer: Option<String>,
}
