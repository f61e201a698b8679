use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{
    Listing, ListingId, ListingNumber, ListingPayload, ListingStatus, ListingType, TransportMode,
    UserId,
};

/// What the caller hands to the store when creating a listing. The store
/// assigns the id, timestamps, and initial status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewListing {
    pub owner: UserId,
    pub listing_number: ListingNumber,
    pub payload: ListingPayload,
}

impl NewListing {
    /// Materialize the stored listing once the store has picked an id.
    pub fn into_listing(self, id: ListingId, now: DateTime<Utc>) -> Listing {
        let payload = self.payload;
        Listing {
            id,
            listing_number: self.listing_number,
            owner: Some(self.owner),
            contact: payload.contact,
            listing_type: payload.listing_type,
            transport_mode: payload.transport_mode,
            vehicle_type: payload.vehicle_type,
            title: payload.title,
            description: payload.description,
            origin: payload.origin,
            destination: payload.destination,
            origin_details: payload.origin_details,
            destination_details: payload.destination_details,
            cargo: payload.cargo,
            offer_type: payload.offer_type,
            price_amount: payload.price_amount,
            required_documents: payload.required_documents,
            related_load_listing_id: payload.related_load_listing_id,
            status: ListingStatus::Active,
            document_urls: Vec::new(),
            image_urls: Vec::new(),
            available_on: payload.available_on,
            service_details: payload.service_details,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update: only provided fields change. Upload URLs are append-only
/// by construction, so a patch can never silently drop an existing URL.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListingPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price_amount: Option<f64>,
    #[serde(default)]
    pub status: Option<ListingStatus>,
    #[serde(default)]
    pub append_document_urls: Vec<String>,
    #[serde(default)]
    pub append_image_urls: Vec<String>,
}

impl ListingPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.price_amount.is_none()
            && self.status.is_none()
            && self.append_document_urls.is_empty()
            && self.append_image_urls.is_empty()
    }
}

impl Listing {
    /// Apply a partial update the way the remote store does: set provided
    /// fields, union the URL sets, bump `updated_at`.
    pub fn apply_patch(&mut self, patch: &ListingPatch, now: DateTime<Utc>) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(price) = patch.price_amount {
            self.price_amount = Some(price);
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        for url in &patch.append_document_urls {
            if !self.document_urls.contains(url) {
                self.document_urls.push(url.clone());
            }
        }
        for url in &patch.append_image_urls {
            if !self.image_urls.contains(url) {
                self.image_urls.push(url.clone());
            }
        }
        self.updated_at = now;
    }
}

/// Server-side narrowing supported by the store's search call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchFilter {
    #[serde(default)]
    pub listing_type: Option<ListingType>,
    #[serde(default)]
    pub transport_mode: Option<TransportMode>,
    #[serde(default)]
    pub status: Option<ListingStatus>,
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Boundary to the remote data store. Implementations are request/response;
/// in-memory adapters stand in for tests and demos.
pub trait ListingStore: Send + Sync {
    fn create(&self, listing: NewListing) -> Result<Listing, StoreError>;
    fn update(&self, id: &ListingId, patch: ListingPatch) -> Result<Listing, StoreError>;
    fn delete(&self, id: &ListingId) -> Result<(), StoreError>;
    fn get(&self, id: &ListingId) -> Result<Option<Listing>, StoreError>;
    fn search(&self, filter: &SearchFilter) -> Result<Vec<Listing>, StoreError>;
    fn user_listings(&self, owner: &UserId) -> Result<Vec<Listing>, StoreError>;
}

/// Error enumeration for store failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("caller is not authenticated")]
    Unauthorized,
    #[error("store rejected the payload: {0}")]
    Rejected(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
