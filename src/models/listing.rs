//! Indexer wire types
//!
//! Shapes mirror the rental indexer's GraphQL responses. BigInt scalars
//! (timestamps, prices, token ids) arrive as JSON strings and are parsed on
//! access, never re-encoded.

use serde::{Deserialize, Serialize};

/// Canonical per-domain rental status, derived per request and never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RentalStatus {
    /// Owned name with no listing record.
    Available,
    /// Listing exists and no unexpired rental.
    Listed,
    /// An unexpired rental exists; viewer identity not distinguished.
    Rented,
    /// Viewer is the lender of an actively rented listing.
    RentedOut,
    /// Viewer is the borrower of an active rental.
    RentedIn,
}

impl RentalStatus {
    /// Whether this status matches a filter value. The generic `rented`
    /// filter matches both directional variants.
    pub fn matches(&self, filter: RentalStatus) -> bool {
        match filter {
            RentalStatus::Rented => matches!(
                self,
                RentalStatus::Rented | RentalStatus::RentedOut | RentalStatus::RentedIn
            ),
            other => *self == other,
        }
    }
}

impl std::fmt::Display for RentalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RentalStatus::Available => "available",
            RentalStatus::Listed => "listed",
            RentalStatus::Rented => "rented",
            RentalStatus::RentedOut => "rentedOut",
            RentalStatus::RentedIn => "rentedIn",
        };
        write!(f, "{}", s)
    }
}

/// One occupancy record of a listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rental {
    pub borrower: String,
    /// Unix seconds, string-encoded by the indexer.
    #[serde(default)]
    pub start_time: Option<String>,
    /// Unix seconds, string-encoded by the indexer.
    #[serde(default)]
    pub end_time: Option<String>,
    /// Per-second rate locked at rental time. May differ from the listing's
    /// current rate; never re-derived.
    #[serde(default)]
    pub price: Option<String>,
}

impl Rental {
    pub fn start_time_secs(&self) -> i64 {
        parse_secs(self.start_time.as_deref())
    }

    pub fn end_time_secs(&self) -> i64 {
        parse_secs(self.end_time.as_deref())
    }
}

/// A domain offered for rent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    /// Opaque indexer identifier.
    pub id: String,
    /// Decimal-encoded integer derived from the label hash.
    pub token_id: String,
    /// ENS namehash of the full domain, 0x-prefixed hex.
    pub node: String,
    /// Label as stored by the indexer; the `.eth` suffix may be absent.
    pub name: String,
    /// Address of the current owner/lister.
    pub lender: String,
    /// Wei per second, string-encoded.
    #[serde(rename = "price")]
    pub price_per_second: String,
    /// Latest permissible rental end, unix seconds.
    pub max_rental_time: String,
    /// Unix seconds of listing creation.
    pub created_at: String,
    /// Held by the name wrapper rather than the base registrar.
    pub is_wrapped: bool,
    /// Rentals for this listing, most recent first per the indexer's
    /// default ordering.
    #[serde(default)]
    pub rentals: RentalItems,
}

impl Listing {
    pub fn max_rental_time_secs(&self) -> i64 {
        parse_secs(Some(&self.max_rental_time))
    }

    pub fn created_at_secs(&self) -> i64 {
        parse_secs(Some(&self.created_at))
    }
}

/// `{ items: [...] }` wrapper for embedded rentals.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RentalItems {
    #[serde(default)]
    pub items: Vec<Rental>,
}

/// A rental joined with its listing, as returned by borrower-scoped queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RentalWithListing {
    pub borrower: String,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    pub listing: Listing,
}

impl RentalWithListing {
    pub fn end_time_secs(&self) -> i64 {
        parse_secs(self.end_time.as_deref())
    }

    pub fn start_time_secs(&self) -> i64 {
        parse_secs(self.start_time.as_deref())
    }
}

/// Relay-style page info returned by paginated listing queries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    #[serde(default)]
    pub start_cursor: Option<String>,
    #[serde(default)]
    pub end_cursor: Option<String>,
    #[serde(default)]
    pub has_next_page: bool,
    #[serde(default)]
    pub has_previous_page: bool,
}

fn parse_secs(value: Option<&str>) -> i64 {
    value.and_then(|v| v.parse::<i64>().ok()).unwrap_or(0)
}
