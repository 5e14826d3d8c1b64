//! Browse sessions
//!
//! One pager per browse session id, kept in memory behind a lock. A request
//! resolves its navigation against the session's pager, fetches at most one
//! page from the listing source, derives statuses, and drops listings with
//! an active rental so the marketplace only shows rentable names.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use alloy::primitives::Address;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::models::browse::{BrowsePageFlags, BrowseQuery, BrowseResponse};
use crate::models::listing::RentalStatus;
use crate::services::indexer::{IndexerError, ListingSource, ListingsPageArgs};
use crate::services::pagination::{FilterKey, Pager};
use crate::services::resolver;

const DEFAULT_PAGE_SIZE: u32 = 20;

pub struct BrowseService {
    source: Arc<dyn ListingSource>,
    sessions: RwLock<HashMap<String, Pager>>,
}

impl BrowseService {
    pub fn new(source: Arc<dyn ListingSource>) -> Self {
        Self {
            source,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Serve one browse page. A navigation the pager does not allow returns
    /// `nav_applied: false` without touching the network.
    pub async fn page(&self, query: &BrowseQuery, now: i64) -> Result<BrowseResponse, IndexerError> {
        let session = query
            .session
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let sort = query.sort.unwrap_or_default();
        let nav = query.nav.unwrap_or_default();
        let key = FilterKey {
            search: query.search.clone().filter(|s| !s.is_empty()),
            sort,
        };

        let request = {
            let mut sessions = self.sessions.write();
            let pager = sessions.entry(session.clone()).or_insert_with(Pager::new);
            match pager.request(key.clone(), nav) {
                Some(request) => request,
                None => {
                    tracing::debug!(session = %session, ?nav, "Navigation not available, skipping fetch");
                    return Ok(BrowseResponse {
                        session,
                        items: Vec::new(),
                        page: BrowsePageFlags {
                            has_next_page: pager.has_next_page(),
                            has_previous_page: pager.has_previous_page(),
                        },
                        nav_applied: false,
                    });
                }
            }
        };

        let args = ListingsPageArgs {
            search: key.search.clone(),
            order_by: sort.order_by_field(),
            // Cheapest/soonest/alphabetical first.
            order_direction: "asc",
            exclude_lender: query
                .viewer
                .as_deref()
                .filter(|v| Address::from_str(v).is_ok())
                .map(str::to_string),
            after: request.after.clone(),
            before: request.before.clone(),
            limit: query.limit.unwrap_or(DEFAULT_PAGE_SIZE),
        };

        let fetched = self.source.listings_page(&args).await?;

        {
            let mut sessions = self.sessions.write();
            if let Some(pager) = sessions.get_mut(&session) {
                if !pager.apply(request.generation, &fetched.page_info) {
                    tracing::debug!(session = %session, "Discarding stale browse response");
                }
            }
        }

        let items = fetched
            .items
            .iter()
            .map(|listing| resolver::to_domain(listing, None, now))
            .filter(|domain| domain.status == RentalStatus::Listed)
            .collect();

        Ok(BrowseResponse {
            session,
            items,
            page: BrowsePageFlags {
                has_next_page: fetched.page_info.has_next_page,
                has_previous_page: fetched.page_info.has_previous_page,
            },
            nav_applied: true,
        })
    }
}
