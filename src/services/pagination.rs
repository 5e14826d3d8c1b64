//! Browse cursor pager
//!
//! Tracks the forward/backward cursor pair and page flags from the most
//! recent indexer response. Navigation is only honored when the matching
//! flag allows it; a disallowed move returns `None` and must not reach the
//! network. Changing the search term or sort key resyncs to the first page
//! so a cursor from a previous filter is never reused.
//!
//! Every issued request carries a generation number. Responses are applied
//! with that number and are rejected once a newer request has been issued,
//! so a slow superseded fetch cannot overwrite fresher pager state.

use crate::models::browse::{PageNav, SortKey};
use crate::models::listing::PageInfo;

/// The filter identity of a browse page; any change forces a resync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterKey {
    pub search: Option<String>,
    pub sort: SortKey,
}

/// Cursor arguments for one indexer query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub generation: u64,
    pub after: Option<String>,
    pub before: Option<String>,
}

#[derive(Debug, Default)]
pub struct Pager {
    key: Option<FilterKey>,
    start_cursor: Option<String>,
    end_cursor: Option<String>,
    has_next: bool,
    has_previous: bool,
    generation: u64,
}

impl Pager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_next_page(&self) -> bool {
        self.has_next
    }

    pub fn has_previous_page(&self) -> bool {
        self.has_previous
    }

    /// Decide the cursor arguments for a navigation request, or `None` when
    /// the move is not available and no query may be issued.
    pub fn request(&mut self, key: FilterKey, nav: PageNav) -> Option<PageRequest> {
        if self.key.as_ref() != Some(&key) {
            self.key = Some(key);
            self.reset_window();
            return Some(self.issue(None, None));
        }

        match nav {
            PageNav::Reset => {
                self.reset_window();
                Some(self.issue(None, None))
            }
            PageNav::Next => {
                if !self.has_next {
                    return None;
                }
                let after = self.end_cursor.clone();
                Some(self.issue(after, None))
            }
            PageNav::Previous => {
                if !self.has_previous {
                    return None;
                }
                let before = self.start_cursor.clone();
                Some(self.issue(None, before))
            }
        }
    }

    /// Apply a response's page info. Returns false (and changes nothing)
    /// when the response belongs to a superseded request.
    pub fn apply(&mut self, generation: u64, page_info: &PageInfo) -> bool {
        if generation != self.generation {
            return false;
        }
        self.start_cursor = page_info.start_cursor.clone();
        self.end_cursor = page_info.end_cursor.clone();
        self.has_next = page_info.has_next_page;
        self.has_previous = page_info.has_previous_page;
        true
    }

    fn reset_window(&mut self) {
        self.start_cursor = None;
        self.end_cursor = None;
        self.has_next = false;
        self.has_previous = false;
    }

    fn issue(&mut self, after: Option<String>, before: Option<String>) -> PageRequest {
        self.generation += 1;
        PageRequest {
            generation: self.generation,
            after,
            before,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(search: Option<&str>, sort: SortKey) -> FilterKey {
        FilterKey {
            search: search.map(|s| s.to_string()),
            sort,
        }
    }

    fn page_info(start: &str, end: &str, next: bool, prev: bool) -> PageInfo {
        PageInfo {
            start_cursor: Some(start.to_string()),
            end_cursor: Some(end.to_string()),
            has_next_page: next,
            has_previous_page: prev,
        }
    }

    #[test]
    fn first_request_starts_at_page_one() {
        let mut pager = Pager::new();
        let req = pager.request(key(None, SortKey::Price), PageNav::Next).unwrap();
        assert_eq!(req.after, None);
        assert_eq!(req.before, None);
    }

    #[test]
    fn next_uses_end_cursor_and_is_gated_on_the_flag() {
        let mut pager = Pager::new();
        let req = pager.request(key(None, SortKey::Price), PageNav::Reset).unwrap();
        assert!(pager.apply(req.generation, &page_info("a", "b", true, false)));

        let req = pager.request(key(None, SortKey::Price), PageNav::Next).unwrap();
        assert_eq!(req.after.as_deref(), Some("b"));

        assert!(pager.apply(req.generation, &page_info("c", "d", false, true)));
        // hasNextPage=false: next must be a no-op.
        assert!(pager.request(key(None, SortKey::Price), PageNav::Next).is_none());

        let req = pager.request(key(None, SortKey::Price), PageNav::Previous).unwrap();
        assert_eq!(req.before.as_deref(), Some("c"));
    }

    #[test]
    fn previous_is_a_noop_on_the_first_page() {
        let mut pager = Pager::new();
        let req = pager.request(key(None, SortKey::Price), PageNav::Reset).unwrap();
        pager.apply(req.generation, &page_info("a", "b", true, false));
        assert!(pager.request(key(None, SortKey::Price), PageNav::Previous).is_none());
    }

    #[test]
    fn filter_change_resyncs_and_drops_stale_cursors() {
        let mut pager = Pager::new();
        let req = pager.request(key(Some("vau"), SortKey::Price), PageNav::Reset).unwrap();
        pager.apply(req.generation, &page_info("a", "b", true, true));

        // Same filter, next: cursor flows.
        let req = pager.request(key(Some("vau"), SortKey::Price), PageNav::Next).unwrap();
        assert_eq!(req.after.as_deref(), Some("b"));
        pager.apply(req.generation, &page_info("c", "d", true, true));

        // New search term: back to page one, old cursors unused.
        let req = pager.request(key(Some("vault"), SortKey::Price), PageNav::Next).unwrap();
        assert_eq!(req.after, None);
        assert_eq!(req.before, None);

        // Sort change alone also resyncs.
        let req = pager.request(key(Some("vault"), SortKey::Name), PageNav::Next).unwrap();
        assert_eq!(req.after, None);
    }

    #[test]
    fn stale_generation_is_discarded() {
        let mut pager = Pager::new();
        let slow = pager.request(key(None, SortKey::Price), PageNav::Reset).unwrap();
        // A newer request supersedes the in-flight one.
        let fresh = pager.request(key(None, SortKey::Price), PageNav::Reset).unwrap();

        assert!(!pager.apply(slow.generation, &page_info("old", "old", true, true)));
        assert!(!pager.has_next_page());

        assert!(pager.apply(fresh.generation, &page_info("a", "b", true, false)));
        assert!(pager.has_next_page());
    }
}
