use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{NaiveDate, Utc};

use crate::marketplace::listings::domain::{
    AttachmentKind, CargoDetails, ContactInfo, CurrentUser, Listing, ListingDraft, ListingId,
    ListingNumber, ListingStatus, ListingType, OfferType, PendingAttachment, ServiceDetails,
    TransportMode, UserId, VolumeUnit, WeightUnit,
};
use crate::marketplace::listings::repository::{
    ListingPatch, ListingStore, NewListing, SearchFilter, StoreError,
};
use crate::marketplace::listings::service::ListingService;
use crate::marketplace::offers::{Offer, OfferBook, OfferService};
use crate::marketplace::storage::{FileStore, FileStoreError, StoredDocument};

pub(super) fn current_user(id: &str) -> CurrentUser {
    CurrentUser {
        id: UserId(id.to_string()),
        display_name: None,
    }
}

pub(super) fn contact(name: &str) -> ContactInfo {
    ContactInfo {
        name: name.to_string(),
        phone: Some("+90 555 000 0000".to_string()),
        email: None,
    }
}

/// A complete, valid road load-listing draft.
pub(super) fn load_draft() -> ListingDraft {
    ListingDraft {
        listing_type: ListingType::LoadListing,
        title: "Steel coils, Gebze to Hamburg".to_string(),
        description: "20 tons of cold-rolled coils, tarps required".to_string(),
        transport_mode: Some(TransportMode::Road),
        vehicle_type: Some("truck_tarpaulin".to_string()),
        origin: "Gebze".to_string(),
        destination: "Hamburg".to_string(),
        origin_details: None,
        destination_details: None,
        cargo: CargoDetails {
            load_type: Some("Steel".to_string()),
            weight_value: Some(20.0),
            weight_unit: WeightUnit::Ton,
            volume_value: None,
            volume_unit: VolumeUnit::CubicMeter,
        },
        offer_type: OfferType::Negotiable,
        price_amount: None,
        selected_documents: vec!["CMR Consignment Note".to_string()],
        related_load_listing_id: None,
        available_on: None,
        service_details: None,
        contact: contact("Demir Lojistik"),
    }
}

/// A valid sea transport-service draft with vessel identity fields.
pub(super) fn sea_service_draft() -> ListingDraft {
    ListingDraft {
        listing_type: ListingType::TransportService,
        title: "Weekly feeder service Izmir-Trieste".to_string(),
        description: String::new(),
        transport_mode: Some(TransportMode::Sea),
        vehicle_type: Some("ship_container_feeder".to_string()),
        origin: String::new(),
        destination: String::new(),
        origin_details: None,
        destination_details: None,
        cargo: CargoDetails::default(),
        offer_type: OfferType::FreeQuote,
        price_amount: None,
        selected_documents: Vec::new(),
        related_load_listing_id: None,
        available_on: NaiveDate::from_ymd_opt(2026, 9, 1),
        service_details: Some(ServiceDetails::Sea {
            ship_name: "MV Meltem".to_string(),
            imo_number: "9321483".to_string(),
            mmsi_number: "271044123".to_string(),
            tonnage: Some(12_000),
        }),
        contact: contact("Meltem Denizcilik"),
    }
}

pub(super) fn attachment(
    name: &str,
    mime_type: &str,
    size_bytes: u64,
    kind: AttachmentKind,
) -> PendingAttachment {
    PendingAttachment {
        name: name.to_string(),
        mime_type: mime_type.to_string(),
        size_bytes,
        document_type: "supporting".to_string(),
        kind,
        bytes: vec![0u8; 16],
    }
}

/// A stored road load listing for tests that do not go through submit.
pub(super) fn listing_fixture(id: &str, title: &str) -> Listing {
    let now = Utc::now();
    Listing {
        id: ListingId(id.to_string()),
        listing_number: ListingNumber(format!("KM-fixture-{id}")),
        owner: Some(UserId("usr-owner".to_string())),
        contact: contact("Demir Lojistik"),
        listing_type: ListingType::LoadListing,
        transport_mode: TransportMode::Road,
        vehicle_type: Some("truck_tarpaulin".to_string()),
        title: title.to_string(),
        description: "fixture".to_string(),
        origin: "Gebze".to_string(),
        destination: "Hamburg".to_string(),
        origin_details: None,
        destination_details: None,
        cargo: CargoDetails {
            load_type: Some("Steel".to_string()),
            ..CargoDetails::default()
        },
        offer_type: OfferType::Negotiable,
        price_amount: None,
        required_documents: Vec::new(),
        related_load_listing_id: None,
        status: ListingStatus::Active,
        document_urls: Vec::new(),
        image_urls: Vec::new(),
        available_on: None,
        service_details: None,
        created_at: now,
        updated_at: now,
    }
}

#[derive(Default)]
pub(super) struct MemoryListingStore {
    listings: Mutex<Vec<Listing>>,
    sequence: AtomicU64,
}

impl MemoryListingStore {
    pub(super) fn stored(&self) -> Vec<Listing> {
        self.listings.lock().expect("store mutex poisoned").clone()
    }
}

impl ListingStore for MemoryListingStore {
    fn create(&self, listing: NewListing) -> Result<Listing, StoreError> {
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed);
        let stored = listing.into_listing(ListingId(format!("lst-{seq:06}")), Utc::now());
        let mut guard = self.listings.lock().expect("store mutex poisoned");
        guard.push(stored.clone());
        Ok(stored)
    }

    fn update(&self, id: &ListingId, patch: ListingPatch) -> Result<Listing, StoreError> {
        let mut guard = self.listings.lock().expect("store mutex poisoned");
        let listing = guard
            .iter_mut()
            .find(|listing| &listing.id == id)
            .ok_or(StoreError::NotFound)?;
        listing.apply_patch(&patch, Utc::now());
        Ok(listing.clone())
    }

    fn delete(&self, id: &ListingId) -> Result<(), StoreError> {
        let mut guard = self.listings.lock().expect("store mutex poisoned");
        let position = guard
            .iter()
            .position(|listing| &listing.id == id)
            .ok_or(StoreError::NotFound)?;
        guard.remove(position);
        Ok(())
    }

    fn get(&self, id: &ListingId) -> Result<Option<Listing>, StoreError> {
        let guard = self.listings.lock().expect("store mutex poisoned");
        Ok(guard.iter().find(|listing| &listing.id == id).cloned())
    }

    fn search(&self, filter: &SearchFilter) -> Result<Vec<Listing>, StoreError> {
        let guard = self.listings.lock().expect("store mutex poisoned");
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
        let guard = self.listings.lock().expect("store mutex poisoned");
        Ok(guard
            .iter()
            .filter(|listing| listing.owner.as_ref() == Some(owner))
            .cloned()
            .collect())
    }
}

/// File store fixture: succeeds unless a name is marked as failing.
#[derive(Default)]
pub(super) struct MemoryFileStore {
    failing: Mutex<HashSet<String>>,
    uploads: Mutex<Vec<String>>,
    sequence: AtomicU64,
}

impl MemoryFileStore {
    pub(super) fn fail_on(&self, name: &str) {
        self.failing
            .lock()
            .expect("file store mutex poisoned")
            .insert(name.to_string());
    }

    pub(super) fn uploaded(&self) -> Vec<String> {
        self.uploads
            .lock()
            .expect("file store mutex poisoned")
            .clone()
    }
}

impl FileStore for MemoryFileStore {
    fn upload_document(
        &self,
        owner: &UserId,
        attachment: &PendingAttachment,
    ) -> Result<StoredDocument, FileStoreError> {
        if self
            .failing
            .lock()
            .expect("file store mutex poisoned")
            .contains(&attachment.name)
        {
            return Err(FileStoreError::Unavailable("simulated outage".to_string()));
        }

        let seq = self.sequence.fetch_add(1, Ordering::Relaxed);
        self.uploads
            .lock()
            .expect("file store mutex poisoned")
            .push(attachment.name.clone());
        Ok(StoredDocument {
            public_url: format!(
                "https://files.kargo.example/{}/{seq}-{}",
                owner.0, attachment.name
            ),
        })
    }
}

#[derive(Default)]
pub(super) struct MemoryOfferBook {
    offers: Mutex<Vec<Offer>>,
}

impl MemoryOfferBook {
    pub(super) fn placed(&self) -> Vec<Offer> {
        self.offers.lock().expect("offer mutex poisoned").clone()
    }
}

impl OfferBook for MemoryOfferBook {
    fn place(&self, offer: Offer) -> Result<Offer, StoreError> {
        let mut guard = self.offers.lock().expect("offer mutex poisoned");
        guard.push(offer.clone());
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

pub(super) async fn read_json_body(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn build_service() -> (
    ListingService<MemoryListingStore, MemoryFileStore>,
    Arc<MemoryListingStore>,
    Arc<MemoryFileStore>,
) {
    let store = Arc::new(MemoryListingStore::default());
    let files = Arc::new(MemoryFileStore::default());
    let service = ListingService::new(store.clone(), files.clone());
    (service, store, files)
}

pub(super) fn build_offer_service() -> (
    OfferService<MemoryListingStore, MemoryOfferBook>,
    Arc<MemoryListingStore>,
    Arc<MemoryOfferBook>,
) {
    let store = Arc::new(MemoryListingStore::default());
    let book = Arc::new(MemoryOfferBook::default());
    let service = OfferService::new(store.clone(), book.clone());
    (service, store, book)
}
