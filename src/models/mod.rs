pub mod browse;
pub mod domain;
pub mod lend;
pub mod listing;
pub mod manage;

use serde::{Deserialize, Serialize};

/// Generic error body returned by every endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}
