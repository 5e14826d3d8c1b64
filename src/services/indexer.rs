//! Rental indexer client
//!
//! Thin GraphQL client over the rental indexer. Each method posts one
//! `{query, variables}` document and reshapes the response into wire models.
//! A populated `errors` array is always surfaced to the caller; a null
//! single-entity result maps to `NotFound`. Queries are independent and
//! idempotent; nothing here retries or caches.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::models::listing::{Listing, PageInfo, RentalWithListing};

#[derive(Debug)]
pub enum IndexerError {
    /// Transport-level failure reaching the indexer.
    Transport(String),
    /// Well-formed response with a populated `errors` array.
    GraphQl(String),
    /// Query succeeded but the requested entity does not exist.
    NotFound,
    /// Response body did not match the expected shape.
    InvalidResponse(String),
}

impl std::fmt::Display for IndexerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IndexerError::Transport(msg) => write!(f, "Indexer transport error: {}", msg),
            IndexerError::GraphQl(msg) => write!(f, "GraphQL error: {}", msg),
            IndexerError::NotFound => write!(f, "Not found"),
            IndexerError::InvalidResponse(msg) => write!(f, "Invalid indexer response: {}", msg),
        }
    }
}

impl std::error::Error for IndexerError {}

const LISTING_FIELDS: &str = "\
id tokenId node name lender price maxRentalTime createdAt isWrapped";

fn listings_page_query() -> String {
    format!(
        "query ListingsPage($where: ListingFilter, $orderBy: String, $orderDirection: String, \
         $limit: Int, $after: String, $before: String) {{\n\
           listings(where: $where, orderBy: $orderBy, orderDirection: $orderDirection, \
                    limit: $limit, after: $after, before: $before) {{\n\
             items {{ {fields} rentals {{ items {{ borrower startTime endTime price }} }} }}\n\
             pageInfo {{ startCursor endCursor hasNextPage hasPreviousPage }}\n\
           }}\n\
         }}",
        fields = LISTING_FIELDS
    )
}

fn listing_by_token_query() -> String {
    format!(
        "query GetListing($tokenId: BigInt!) {{\n\
           listing(tokenId: $tokenId) {{\n\
             {fields} rentals {{ items {{ borrower startTime endTime price }} }}\n\
           }}\n\
         }}",
        fields = LISTING_FIELDS
    )
}

fn listings_by_lender_query() -> String {
    format!(
        "query ListingsByLender($lender: String!) {{\n\
           listings(where: {{ lender: $lender }}) {{\n\
             items {{ {fields} rentals {{ items {{ borrower startTime endTime price }} }} }}\n\
           }}\n\
         }}",
        fields = LISTING_FIELDS
    )
}

fn rentals_by_borrower_query() -> String {
    format!(
        "query RentalsByBorrower($borrower: String!) {{\n\
           rentals(where: {{ borrower: $borrower }}, orderBy: \"startTime\", orderDirection: \"desc\") {{\n\
             items {{ borrower startTime endTime listing {{ {fields} }} }}\n\
           }}\n\
         }}",
        fields = LISTING_FIELDS
    )
}

fn active_rentals_query() -> String {
    format!(
        "query ActiveRentals {{\n\
           rentals(orderBy: \"startTime\", orderDirection: \"desc\") {{\n\
             items {{ borrower startTime endTime listing {{ {fields} }} }}\n\
           }}\n\
         }}",
        fields = LISTING_FIELDS
    )
}

/// Filter/cursor arguments for one paginated listings query.
#[derive(Debug, Clone, Default)]
pub struct ListingsPageArgs {
    /// Substring filter on the name.
    pub search: Option<String>,
    /// Indexer field to order by.
    pub order_by: &'static str,
    pub order_direction: &'static str,
    /// Exclude listings from this lender (the viewer's own).
    pub exclude_lender: Option<String>,
    pub after: Option<String>,
    pub before: Option<String>,
    pub limit: u32,
}

/// One page of listings plus its cursors.
#[derive(Debug, Clone)]
pub struct ListingsPage {
    pub items: Vec<Listing>,
    pub page_info: PageInfo,
}

/// Seam for the browse session; lets tests count and script page fetches.
#[async_trait]
pub trait ListingSource: Send + Sync {
    async fn listings_page(&self, args: &ListingsPageArgs) -> Result<ListingsPage, IndexerError>;
}

#[derive(Clone)]
pub struct IndexerService {
    client: Client,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    #[serde(default = "Option::default")]
    data: Option<T>,
    #[serde(default)]
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct ListingsData {
    listings: ListingConnection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListingConnection {
    #[serde(default)]
    items: Vec<Listing>,
    #[serde(default)]
    page_info: PageInfo,
}

#[derive(Debug, Deserialize)]
struct SingleListingData {
    listing: Option<Listing>,
}

#[derive(Debug, Deserialize)]
struct RentalsData {
    rentals: RentalConnection,
}

#[derive(Debug, Deserialize)]
struct RentalConnection {
    #[serde(default)]
    items: Vec<RentalWithListing>,
}

impl IndexerService {
    pub fn new(endpoint: String) -> Self {
        Self {
            client: Client::new(),
            endpoint,
        }
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        query: String,
        variables: Value,
    ) -> Result<T, IndexerError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await
            .map_err(|e| IndexerError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(IndexerError::Transport(format!(
                "indexer returned {}: {}",
                status, body
            )));
        }

        let body: GraphQlResponse<T> = response
            .json()
            .await
            .map_err(|e| IndexerError::InvalidResponse(e.to_string()))?;

        if let Some(errors) = body.errors {
            if !errors.is_empty() {
                let messages: Vec<String> = errors.into_iter().map(|e| e.message).collect();
                return Err(IndexerError::GraphQl(messages.join("; ")));
            }
        }

        body.data
            .ok_or_else(|| IndexerError::InvalidResponse("response carried no data".to_string()))
    }

    /// Single listing looked up by its token id. `NotFound` when the
    /// indexer returns null.
    pub async fn listing_by_token_id(&self, token_id: &str) -> Result<Listing, IndexerError> {
        tracing::debug!(token_id = %token_id, "Fetching listing by token id");

        let data: SingleListingData = self
            .execute(listing_by_token_query(), json!({ "tokenId": token_id }))
            .await?;

        data.listing.ok_or(IndexerError::NotFound)
    }

    /// All listings of one lender, rentals embedded.
    pub async fn listings_by_lender(&self, lender: &str) -> Result<Vec<Listing>, IndexerError> {
        let data: ListingsData = self
            .execute(listings_by_lender_query(), json!({ "lender": lender }))
            .await?;
        Ok(data.listings.items)
    }

    /// All rentals where the address is the borrower, most recent first.
    pub async fn rentals_by_borrower(
        &self,
        borrower: &str,
    ) -> Result<Vec<RentalWithListing>, IndexerError> {
        let data: RentalsData = self
            .execute(rentals_by_borrower_query(), json!({ "borrower": borrower }))
            .await?;
        Ok(data.rentals.items)
    }

    /// Every rental the indexer knows about, most recent first. Expiry
    /// filtering is the caller's concern.
    pub async fn all_rentals(&self) -> Result<Vec<RentalWithListing>, IndexerError> {
        let data: RentalsData = self.execute(active_rentals_query(), json!({})).await?;
        Ok(data.rentals.items)
    }
}

#[async_trait]
impl ListingSource for IndexerService {
    async fn listings_page(&self, args: &ListingsPageArgs) -> Result<ListingsPage, IndexerError> {
        let mut where_clause = serde_json::Map::new();
        if let Some(search) = args.search.as_deref().filter(|s| !s.is_empty()) {
            where_clause.insert("name_contains".to_string(), json!(search));
        }
        if let Some(lender) = args.exclude_lender.as_deref() {
            where_clause.insert("lender_not".to_string(), json!(lender));
        }

        let variables = json!({
            "where": Value::Object(where_clause),
            "orderBy": args.order_by,
            "orderDirection": args.order_direction,
            "limit": args.limit,
            "after": args.after,
            "before": args.before,
        });

        tracing::debug!(
            order_by = args.order_by,
            limit = args.limit,
            has_after = args.after.is_some(),
            has_before = args.before.is_some(),
            "Fetching listings page"
        );

        let data: ListingsData = self.execute(listings_page_query(), variables).await?;

        Ok(ListingsPage {
            items: data.listings.items,
            page_info: data.listings.page_info,
        })
    }
}
