//! Lend/rent/unlist request-response models
//!
//! Models for the write endpoints that go through the chain gateway.

use serde::{Deserialize, Serialize};

/// Request to list a domain for rent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListDomainRequest {
    /// Asking rate as decimal ETH per year (e.g. "0.25"). Converted to an
    /// exact wei-per-second rate.
    pub price_eth_per_year: String,
    /// Listing window in seconds from now; rentals may not end later.
    pub duration_secs: u64,
}

/// Response for a submitted listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListDomainResponse {
    pub tx_hash: String,
    /// Wei-per-second rate actually written on chain.
    pub price_per_second: String,
    /// Latest permissible rental end, unix seconds.
    pub max_end_timestamp: i64,
}

/// Request to rent a listed domain.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RentDomainRequest {
    /// Rental length in seconds from now.
    pub duration_secs: u64,
}

/// Response for a submitted rental.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RentDomainResponse {
    pub tx_hash: String,
    /// Rental end, unix seconds.
    pub end_timestamp: i64,
    /// Total paid, in wei (rate x duration, exact).
    pub total_price_wei: String,
}

/// Response for a submitted unlist/reclaim.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnlistDomainResponse {
    pub tx_hash: String,
}

/// Query for `GET /api/lend/{name}/approval`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApprovalQuery {
    /// Address whose approval grant is checked.
    pub owner: String,
}

/// Response for the approval status check.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalStatusResponse {
    pub approved: bool,
    /// Contract that must grant the approval: the name wrapper when the
    /// name is wrapped, otherwise the base registrar.
    pub operator_contract: String,
}

/// Response for a submitted `setApprovalForAll`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApproveResponse {
    pub tx_hash: String,
}
