//! Client-side narrowing of an already-fetched listing collection. Pure and
//! stable: matches are returned in their original relative order.

use super::listings::domain::{Listing, ListingType, TransportMode};

/// Free-text query plus exact-match facets. `None` means "all".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingQuery {
    pub text: Option<String>,
    pub listing_type: Option<ListingType>,
    pub transport_mode: Option<TransportMode>,
}

/// Filter listings by facet equality and case-insensitive substring match
/// against title, route, and load type.
pub fn filter_listings<'a>(items: &'a [Listing], query: &ListingQuery) -> Vec<&'a Listing> {
    let needle = query
        .text
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_lowercase);

    items
        .iter()
        .filter(|listing| {
            if let Some(listing_type) = query.listing_type {
                if listing.listing_type != listing_type {
                    return false;
                }
            }
            if let Some(mode) = query.transport_mode {
                if listing.transport_mode != mode {
                    return false;
                }
            }
            match &needle {
                None => true,
                Some(needle) => matches_text(listing, needle),
            }
        })
        .collect()
}

fn matches_text(listing: &Listing, needle: &str) -> bool {
    if listing.title.to_lowercase().contains(needle) {
        return true;
    }

    let route = format!("{} {}", listing.origin, listing.destination).to_lowercase();
    if route.contains(needle) {
        return true;
    }

    listing
        .cargo
        .load_type
        .as_deref()
        .map(|load_type| load_type.to_lowercase().contains(needle))
        .unwrap_or(false)
}
