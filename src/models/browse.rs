//! Browse request/response models
//!
//! Models for the `GET /api/browse` endpoint that serves the paginated
//! marketplace view.

use serde::{Deserialize, Serialize};

use crate::models::domain::Domain;

/// Sort keys accepted by the browse view, mapped to the indexer's
/// `orderBy` field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    Price,
    MaxTime,
    Name,
}

impl SortKey {
    /// Field name used in the indexer query.
    pub fn order_by_field(&self) -> &'static str {
        match self {
            SortKey::Price => "price",
            SortKey::MaxTime => "maxRentalTime",
            SortKey::Name => "name",
        }
    }
}

impl Default for SortKey {
    fn default() -> Self {
        SortKey::Price
    }
}

/// Page navigation relative to the session's last response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PageNav {
    Reset,
    Next,
    Previous,
}

impl Default for PageNav {
    fn default() -> Self {
        PageNav::Reset
    }
}

/// Query parameters for the browse endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BrowseQuery {
    /// Browse session id from a previous response; omit to start fresh.
    pub session: Option<String>,
    /// Substring filter on the domain name.
    pub search: Option<String>,
    /// Sort key (default: price).
    pub sort: Option<SortKey>,
    /// Navigation relative to the previous page (default: reset).
    pub nav: Option<PageNav>,
    /// Page size (default: 20, max: 100).
    pub limit: Option<u32>,
    /// Connected wallet address; its own listings are excluded.
    pub viewer: Option<String>,
}

impl BrowseQuery {
    /// Validate query parameters
    pub fn validate(&self) -> Result<(), String> {
        if let Some(limit) = self.limit {
            if limit < 1 {
                return Err("limit must be at least 1".to_string());
            }
            if limit > 100 {
                return Err("limit cannot exceed 100".to_string());
            }
        }
        Ok(())
    }
}

/// Pagination flags echoed back to the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowsePageFlags {
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

/// Response for `GET /api/browse`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowseResponse {
    /// Session id to echo on follow-up navigation calls.
    pub session: String,
    /// Unrented listings for the current page.
    pub items: Vec<Domain>,
    pub page: BrowsePageFlags,
    /// False when the requested navigation was not available; in that case
    /// no query was issued and `items` is empty.
    pub nav_applied: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_accepts_defaults() {
        assert!(BrowseQuery::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_out_of_range_limit() {
        let mut query = BrowseQuery::default();
        query.limit = Some(0);
        assert!(query.validate().is_err());
        query.limit = Some(101);
        assert!(query.validate().is_err());
        query.limit = Some(100);
        assert!(query.validate().is_ok());
    }

    #[test]
    fn sort_key_deserializes_from_camel_case() {
        let key: SortKey = serde_json::from_str("\"maxTime\"").unwrap();
        assert_eq!(key, SortKey::MaxTime);
        assert_eq!(key.order_by_field(), "maxRentalTime");
    }
}
