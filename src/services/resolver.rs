//! Rental status resolver
//!
//! Derives the canonical per-domain status from indexer snapshots and merges
//! the manage view's overlapping record sets into one deduplicated
//! collection. Pure functions over fetched data; nothing here talks to the
//! network.
//!
//! Status decision order, given the listing's most recent rental:
//! 1. rental unexpired and viewer is the lender      -> rentedOut
//! 2. rental unexpired and viewer is the borrower    -> rentedIn
//! 3. a listing record exists                        -> listed
//! 4. owned name without a listing record            -> available
//!
//! A listing whose rentals have all expired stays `listed`; expiry frees the
//! slot but the listing row persists until reclaimed on chain.

use std::collections::BTreeMap;
use std::str::FromStr;

use alloy::primitives::Address;

use crate::models::domain::Domain;
use crate::models::listing::{Listing, Rental, RentalStatus, RentalWithListing};
use crate::services::pricing;

/// Display form of a name: the `.eth` suffix is appended when absent.
pub fn normalize_name(name: &str) -> String {
    if name.ends_with(".eth") {
        name.to_string()
    } else {
        format!("{}.eth", name)
    }
}

/// Address equality for status checks. Either side failing to parse as a
/// 20-byte hex address compares as non-matching; a malformed viewer must
/// fall through to `listed`/`available`, never panic.
pub fn addresses_match(a: &str, b: &str) -> bool {
    match (Address::from_str(a.trim()), Address::from_str(b.trim())) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// The listing's active rental: its most recent rental entry, if that
/// rental's end time is strictly in the future.
pub fn active_rental(listing: &Listing, now: i64) -> Option<&Rental> {
    listing
        .rentals
        .items
        .first()
        .filter(|rental| rental.end_time_secs() > now)
}

/// Derive the status of one domain snapshot for an optional viewer.
pub fn derive_status(listing: Option<&Listing>, viewer: Option<&str>, now: i64) -> RentalStatus {
    let Some(listing) = listing else {
        return RentalStatus::Available;
    };

    if let (Some(rental), Some(viewer)) = (active_rental(listing, now), viewer) {
        if addresses_match(viewer, &listing.lender) {
            return RentalStatus::RentedOut;
        }
        if addresses_match(viewer, &rental.borrower) {
            return RentalStatus::RentedIn;
        }
    }

    RentalStatus::Listed
}

/// Build the display view of a listing for an optional viewer.
pub fn to_domain(listing: &Listing, viewer: Option<&str>, now: i64) -> Domain {
    let status = derive_status(Some(listing), viewer, now);
    let rental = active_rental(listing, now);

    Domain {
        id: Some(listing.id.clone()),
        name: normalize_name(&listing.name),
        token_id: Some(listing.token_id.clone()),
        node: Some(listing.node.clone()),
        lender: Some(listing.lender.clone()),
        price_per_second: Some(listing.price_per_second.clone()),
        price_per_year_eth: Some(pricing::yearly_price_eth(&listing.price_per_second)),
        max_rental_time: Some(listing.max_rental_time_secs()),
        created_at: Some(listing.created_at_secs()),
        is_wrapped: Some(listing.is_wrapped),
        status,
        borrower: rental.map(|r| r.borrower.clone()),
        rental_end: rental.map(|r| r.end_time_secs()),
    }
}

/// Build the view of a borrower-scoped rental row. The joined listing does
/// not embed rentals, so the rental itself decides the active window.
pub fn rental_to_domain(rented: &RentalWithListing, viewer: Option<&str>, now: i64) -> Domain {
    let mut domain = to_domain(&rented.listing, viewer, now);
    let unexpired = rented.end_time_secs() > now;

    if unexpired {
        domain.status = match viewer {
            Some(viewer) if addresses_match(viewer, &rented.listing.lender) => {
                RentalStatus::RentedOut
            }
            Some(viewer) if addresses_match(viewer, &rented.borrower) => RentalStatus::RentedIn,
            _ => domain.status,
        };
        domain.borrower = Some(rented.borrower.clone());
        domain.rental_end = Some(rented.end_time_secs());
    }

    domain
}

fn specificity(status: RentalStatus) -> u8 {
    match status {
        RentalStatus::RentedOut | RentalStatus::RentedIn | RentalStatus::Rented => 2,
        RentalStatus::Listed => 1,
        RentalStatus::Available => 0,
    }
}

/// Merge overlapping domain collections into one, keyed by display name.
/// A name appearing in several sources keeps the entry with the
/// highest-specificity status (rentedOut/rentedIn > listed > available).
/// Idempotent: merging a collection with itself changes nothing.
pub fn merge_domains<I>(collections: I) -> Vec<Domain>
where
    I: IntoIterator<Item = Vec<Domain>>,
{
    let mut merged: BTreeMap<String, Domain> = BTreeMap::new();

    for collection in collections {
        for domain in collection {
            let key = normalize_name(&domain.name);
            match merged.get(&key) {
                Some(existing) if specificity(existing.status) >= specificity(domain.status) => {}
                _ => {
                    merged.insert(key, domain);
                }
            }
        }
    }

    merged.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::listing::RentalItems;

    const LENDER: &str = "0x1111111111111111111111111111111111111111";
    const BORROWER: &str = "0x2222222222222222222222222222222222222222";
    const STRANGER: &str = "0x3333333333333333333333333333333333333333";

    const NOW: i64 = 1_700_000_000;

    fn listing(rentals: Vec<Rental>) -> Listing {
        Listing {
            id: "0xlisting".into(),
            token_id: "42".into(),
            node: "0xnode".into(),
            name: "vault".into(),
            lender: LENDER.into(),
            price_per_second: "1000000000".into(),
            max_rental_time: (NOW + 86_400).to_string(),
            created_at: (NOW - 86_400).to_string(),
            is_wrapped: false,
            rentals: RentalItems { items: rentals },
        }
    }

    fn rental(borrower: &str, end: i64) -> Rental {
        Rental {
            borrower: borrower.into(),
            start_time: Some((end - 3_600).to_string()),
            end_time: Some(end.to_string()),
            price: None,
        }
    }

    #[test]
    fn no_rentals_means_listed() {
        assert_eq!(
            derive_status(Some(&listing(vec![])), Some(LENDER), NOW),
            RentalStatus::Listed
        );
    }

    #[test]
    fn absent_listing_means_available() {
        assert_eq!(derive_status(None, Some(LENDER), NOW), RentalStatus::Available);
        assert_eq!(derive_status(None, None, NOW), RentalStatus::Available);
    }

    #[test]
    fn expired_rentals_never_produce_rented_statuses() {
        let l = listing(vec![
            rental(BORROWER, NOW),
            rental(STRANGER, NOW - 10_000),
            rental(BORROWER, NOW - 90_000),
        ]);
        // Most recent ended exactly now: end_time > now is strict.
        assert_eq!(derive_status(Some(&l), Some(LENDER), NOW), RentalStatus::Listed);
        assert_eq!(derive_status(Some(&l), Some(BORROWER), NOW), RentalStatus::Listed);
    }

    #[test]
    fn viewer_scenario_grid() {
        let l = listing(vec![rental(BORROWER, NOW + 3_600)]);
        assert_eq!(derive_status(Some(&l), Some(LENDER), NOW), RentalStatus::RentedOut);
        assert_eq!(derive_status(Some(&l), Some(BORROWER), NOW), RentalStatus::RentedIn);
        assert_eq!(derive_status(Some(&l), Some(STRANGER), NOW), RentalStatus::Listed);
        assert_eq!(derive_status(Some(&l), None, NOW), RentalStatus::Listed);
    }

    #[test]
    fn address_comparison_is_case_insensitive() {
        let l = listing(vec![rental(BORROWER, NOW + 3_600)]);
        let upper = LENDER.to_uppercase().replace("0X", "0x");
        assert_eq!(derive_status(Some(&l), Some(&upper), NOW), RentalStatus::RentedOut);
    }

    #[test]
    fn malformed_viewer_never_matches_and_never_panics() {
        let l = listing(vec![rental(BORROWER, NOW + 3_600)]);
        for bad in ["", "0x123", "not-an-address", "0xzzzz111111111111111111111111111111111111"] {
            assert_eq!(derive_status(Some(&l), Some(bad), NOW), RentalStatus::Listed);
        }
    }

    #[test]
    fn only_the_most_recent_rental_decides() {
        // An older rental still in its window does not matter; the indexer
        // orders most recent first and the head has expired.
        let l = listing(vec![rental(STRANGER, NOW - 1), rental(BORROWER, NOW + 9_999)]);
        assert_eq!(derive_status(Some(&l), Some(BORROWER), NOW), RentalStatus::Listed);
    }

    #[test]
    fn to_domain_normalizes_name_and_prices() {
        let d = to_domain(&listing(vec![]), None, NOW);
        assert_eq!(d.name, "vault.eth");
        assert_eq!(d.price_per_year_eth.as_deref(), Some("0.031536"));
        assert_eq!(d.status, RentalStatus::Listed);
        assert!(d.borrower.is_none());
    }

    #[test]
    fn to_domain_carries_active_rental_fields() {
        let d = to_domain(&listing(vec![rental(BORROWER, NOW + 3_600)]), Some(LENDER), NOW);
        assert_eq!(d.status, RentalStatus::RentedOut);
        assert_eq!(d.borrower.as_deref(), Some(BORROWER));
        assert_eq!(d.rental_end, Some(NOW + 3_600));
    }

    #[test]
    fn merge_prefers_higher_specificity() {
        let listed = to_domain(&listing(vec![]), Some(LENDER), NOW);
        let rented = to_domain(&listing(vec![rental(BORROWER, NOW + 3_600)]), Some(LENDER), NOW);
        let available = Domain::available("vault.eth".into());

        let merged = merge_domains(vec![
            vec![available.clone()],
            vec![listed.clone()],
            vec![rented.clone()],
        ]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].status, RentalStatus::RentedOut);

        // Order of the sources must not matter.
        let merged = merge_domains(vec![vec![rented], vec![listed], vec![available]]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].status, RentalStatus::RentedOut);
    }

    #[test]
    fn merge_is_idempotent() {
        let domains = vec![
            to_domain(&listing(vec![]), None, NOW),
            Domain::available("other.eth".into()),
        ];
        let once = merge_domains(vec![domains.clone()]);
        let twice = merge_domains(vec![once.clone(), domains]);
        assert_eq!(
            serde_json::to_value(&once).unwrap(),
            serde_json::to_value(&twice).unwrap()
        );
    }

    #[test]
    fn merge_keys_on_normalized_name() {
        let bare = Domain::available("vault".into());
        let suffixed = to_domain(&listing(vec![]), None, NOW);
        let merged = merge_domains(vec![vec![bare], vec![suffixed]]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].name, "vault.eth");
        assert_eq!(merged[0].status, RentalStatus::Listed);
    }

    #[test]
    fn borrower_scoped_rental_resolves_rented_in() {
        let rented = RentalWithListing {
            borrower: BORROWER.into(),
            start_time: Some((NOW - 100).to_string()),
            end_time: Some((NOW + 500).to_string()),
            listing: listing(vec![]),
        };
        let d = rental_to_domain(&rented, Some(BORROWER), NOW);
        assert_eq!(d.status, RentalStatus::RentedIn);
        assert_eq!(d.rental_end, Some(NOW + 500));

        let expired = RentalWithListing {
            end_time: Some((NOW - 1).to_string()),
            ..rented
        };
        assert_eq!(rental_to_domain(&expired, Some(BORROWER), NOW).status, RentalStatus::Listed);
    }
}
