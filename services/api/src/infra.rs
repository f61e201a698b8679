use chrono::Utc;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use kargo_market::marketplace::listings::{
    Listing, ListingId, ListingPatch, ListingStore, NewListing, PendingAttachment, SearchFilter,
    StoreError, UserId,
};
use kargo_market::marketplace::offers::{Offer, OfferBook};
use kargo_market::marketplace::storage::{FileStore, FileStoreError, StoredDocument};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Stand-in for the remote data store: a process-local listing collection
/// with store-assigned ids and timestamps.
#[derive(Default)]
pub(crate) struct InMemoryListingStore {
    listings: Mutex<Vec<Listing>>,
    sequence: AtomicU64,
}

impl ListingStore for InMemoryListingStore {
    fn create(&self, listing: NewListing) -> Result<Listing, StoreError> {
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed);
        let stored = listing.into_listing(ListingId(format!("lst-{seq:06}")), Utc::now());
        self.listings
            .lock()
            .expect("listing mutex poisoned")
            .push(stored.clone());
        Ok(stored)
    }

    fn update(&self, id: &ListingId, patch: ListingPatch) -> Result<Listing, StoreError> {
        let mut guard = self.listings.lock().expect("listing mutex poisoned");
        let listing = guard
            .iter_mut()
            .find(|listing| &listing.id == id)
            .ok_or(StoreError::NotFound)?;
        listing.apply_patch(&patch, Utc::now());
        Ok(listing.clone())
    }

    fn delete(&self, id: &ListingId) -> Result<(), StoreError> {
        let mut guard = self.listings.lock().expect("listing mutex poisoned");
        let position = guard
            .iter()
            .position(|listing| &listing.id == id)
            .ok_or(StoreError::NotFound)?;
        guard.remove(position);
        Ok(())
    }

    fn get(&self, id: &ListingId) -> Result<Option<Listing>, StoreError> {
        let guard = self.listings.lock().expect("listing mutex poisoned");
        Ok(guard.iter().find(|listing| &listing.id == id).cloned())
    }

    fn search(&self, filter: &SearchFilter) -> Result<Vec<Listing>, StoreError> {
        let guard = self.listings.lock().expect("listing mutex poisoned");
        let mut matches: Vec<Listing> = guard
            .iter()
            .filter(|listing| {
                filter
                    .listing_type
                    .map(|wanted| listing.listing_type == wanted)
                    .unwrap_or(true)
                    && filter
                        .transport_mode
                        .map(|wanted| listing.transport_mode == wanted)
                        .unwrap_or(true)
                    && filter
                        .status
                        .map(|wanted| listing.status == wanted)
                        .unwrap_or(true)
            })
            .cloned()
            .collect();
        if let Some(limit) = filter.limit {
            matches.truncate(limit);
        }
        Ok(matches)
    }

    fn user_listings(&self, owner: &UserId) -> Result<Vec<Listing>, StoreError> {
        let guard = self.listings.lock().expect("listing mutex poisoned");
        Ok(guard
            .iter()
            .filter(|listing| listing.owner.as_ref() == Some(owner))
            .cloned()
            .collect())
    }
}

/// Stand-in for the remote file store: accepts every upload and mints a
/// deterministic public URL.
#[derive(Default)]
pub(crate) struct InMemoryFileStore {
    sequence: AtomicU64,
}

impl FileStore for InMemoryFileStore {
    fn upload_document(
        &self,
        owner: &UserId,
        attachment: &PendingAttachment,
    ) -> Result<StoredDocument, FileStoreError> {
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed);
        Ok(StoredDocument {
            public_url: format!(
                "https://files.kargo-market.dev/{}/{seq}-{}",
                owner.0, attachment.name
            ),
        })
    }
}

#[derive(Default)]
pub(crate) struct InMemoryOfferBook {
    offers: Mutex<Vec<Offer>>,
}

impl OfferBook for InMemoryOfferBook {
    fn place(&self, offer: Offer) -> Result<Offer, StoreError> {
        self.offers
            .lock()
            .expect("offer mutex poisoned")
            .push(offer.clone());
        Ok(offer)
    }

    fn for_listing(&self, listing_id: &ListingId) -> Result<Vec<Offer>, StoreError> {
        let guard = self.offers.lock().expect("offer mutex poisoned");
        Ok(guard
            .iter()
            .filter(|offer| &offer.listing_id == listing_id)
            .cloned()
            .collect())
    }
}
