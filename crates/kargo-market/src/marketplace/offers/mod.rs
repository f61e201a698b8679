//! Offers: bids placed by one user against another user's listing. Placement
//! runs the self-interaction guard before anything touches a store.

pub mod router;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use router::offer_router;

use super::guard;
use super::listings::domain::{ContactInfo, CurrentUser, ListingId, UserId};
use super::listings::repository::{ListingStore, StoreError};
use super::listings::validation::MAX_PRICE_AMOUNT;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OfferId(pub String);

/// A bid against exactly one listing. Acceptance and rejection happen on the
/// backing store's side, not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    pub id: OfferId,
    pub listing_id: ListingId,
    pub bidder: UserId,
    pub price_amount: f64,
    pub description: String,
    pub document_urls: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// What a bidder fills in before placing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferDraft {
    pub price_amount: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub document_urls: Vec<String>,
}

/// Boundary to the store's offer collection.
pub trait OfferBook: Send + Sync {
    fn place(&self, offer: Offer) -> Result<Offer, StoreError>;
    fn for_listing(&self, listing_id: &ListingId) -> Result<Vec<Offer>, StoreError>;
}

static OFFER_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_offer_id() -> OfferId {
    let id = OFFER_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    OfferId(format!("off-{id:06}"))
}

/// Error raised by the offer service.
#[derive(Debug, thiserror::Error)]
pub enum OfferError {
    #[error("offers cannot target your own listing")]
    OwnListing,
    #[error("listing not found")]
    ListingNotFound,
    #[error("offer price must be between 0 and {MAX_PRICE_AMOUNT}")]
    PriceOutOfRange,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Service coupling the listing store (for the ownership check) with the
/// offer book.
pub struct OfferService<L, B> {
    listings: Arc<L>,
    book: Arc<B>,
}

impl<L, B> OfferService<L, B>
where
    L: ListingStore + 'static,
    B: OfferBook + 'static,
{
    pub fn new(listings: Arc<L>, book: Arc<B>) -> Self {
        Self { listings, book }
    }

    /// Place an offer. Own-listing placement is refused before the book is
    /// touched.
    pub fn place(
        &self,
        bidder: &CurrentUser,
        listing_id: &ListingId,
        draft: OfferDraft,
    ) -> Result<Offer, OfferError> {
        let listing = self
            .listings
            .get(listing_id)?
            .ok_or(OfferError::ListingNotFound)?;

        if guard::is_own_listing(&listing, bidder) {
            return Err(OfferError::OwnListing);
        }

        if !(draft.price_amount.is_finite()
            && (0.0..=MAX_PRICE_AMOUNT).contains(&draft.price_amount))
        {
            return Err(OfferError::PriceOutOfRange);
        }

        let offer = Offer {
            id: next_offer_id(),
            listing_id: listing_id.clone(),
            bidder: bidder.id.clone(),
            price_amount: draft.price_amount,
            description: draft.description.trim().to_string(),
            document_urls: draft.document_urls,
            created_at: Utc::now(),
        };

        Ok(self.book.place(offer)?)
    }

    pub fn for_listing(&self, listing_id: &ListingId) -> Result<Vec<Offer>, OfferError> {
        Ok(self.book.for_listing(listing_id)?)
    }

    /// Hand out the listing's contact block for a messaging flow, with the
    /// same own-listing refusal as offer placement.
    pub fn contact_owner(
        &self,
        sender: &CurrentUser,
        listing_id: &ListingId,
    ) -> Result<ContactInfo, OfferError> {
        let listing = self
            .listings
            .get(listing_id)?
            .ok_or(OfferError::ListingNotFound)?;

        if guard::is_own_listing(&listing, sender) {
            return Err(OfferError::OwnListing);
        }

        Ok(listing.contact)
    }
}
