pub mod browse;
pub mod domain;
pub mod lend;
pub mod manage;
pub mod rentals;
pub mod rent;

use axum::http::StatusCode;
use axum::Json;

use crate::models::ErrorResponse;
use crate::services::ens::EnsError;
use crate::services::indexer::IndexerError;
use crate::services::rental_contract::ContractError;

/// Current wall-clock time in unix seconds; the reference point for every
/// status derivation in a request.
pub(crate) fn now_secs() -> i64 {
    chrono::Utc::now().timestamp()
}

pub(crate) fn bad_request(message: String) -> (StatusCode, Json<ErrorResponse>) {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse { error: message }))
}

pub(crate) fn indexer_error(e: IndexerError) -> (StatusCode, Json<ErrorResponse>) {
    let status = match e {
        IndexerError::NotFound => StatusCode::NOT_FOUND,
        _ => StatusCode::BAD_GATEWAY,
    };
    (
        status,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
}

pub(crate) fn ens_error(e: EnsError) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::BAD_GATEWAY,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
}

pub(crate) fn contract_error(e: ContractError) -> (StatusCode, Json<ErrorResponse>) {
    let status = match e {
        ContractError::InvalidConfig(_) => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::BAD_GATEWAY,
    };
    (
        status,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
}
