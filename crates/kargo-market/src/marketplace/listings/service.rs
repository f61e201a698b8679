use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;

use super::domain::{
    AttachmentKind, CurrentUser, Listing, ListingDraft, ListingId, ListingNumber,
    PendingAttachment, UserId,
};
use super::repository::{ListingPatch, ListingStore, NewListing, SearchFilter, StoreError};
use super::validation::{self, DraftRejection, FieldIssue};
use crate::marketplace::storage::FileStore;

static LISTING_SEQUENCE: AtomicU64 = AtomicU64::new(1);

// Display label only. The store-assigned id is the key; no uniqueness is
// promised here.
fn next_listing_number(now: DateTime<Utc>) -> ListingNumber {
    let seq = LISTING_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ListingNumber(format!("KM-{}-{:04}", now.format("%Y%m%d"), seq % 10_000))
}

/// One file that did not make it into the stored listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadFailure {
    pub name: String,
    pub reason: String,
}

/// Result of a submission: the stored listing plus any files that were
/// refused or failed to upload.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionOutcome {
    pub listing: Listing,
    pub rejected_files: Vec<UploadFailure>,
}

/// How a weak back-reference resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum RelatedListing {
    None,
    Found(Listing),
    /// The referenced listing was deleted independently; render a fallback.
    Unavailable,
}

/// Service composing the draft validator, the remote store, and the file
/// store into the marketplace's write and read flows.
pub struct ListingService<S, F> {
    store: Arc<S>,
    files: Arc<F>,
}

impl<S, F> ListingService<S, F>
where
    S: ListingStore + 'static,
    F: FileStore + 'static,
{
    pub fn new(store: Arc<S>, files: Arc<F>) -> Self {
        Self { store, files }
    }

    /// Submit a draft with its pending files.
    ///
    /// Validation failures block the whole submission before any remote
    /// call. After the listing is created, files are uploaded one at a time
    /// in array order; a failed file is logged and skipped, the rest still
    /// attempt, and nothing already uploaded is rolled back. The stored
    /// listing is then patched with the union of the new URLs.
    pub fn submit(
        &self,
        owner: &CurrentUser,
        draft: ListingDraft,
        attachments: Vec<PendingAttachment>,
    ) -> Result<SubmissionOutcome, ListingServiceError> {
        let payload = validation::validate_draft(&draft)?;

        let now = Utc::now();
        let stored = self.store.create(NewListing {
            owner: owner.id.clone(),
            listing_number: next_listing_number(now),
            payload,
        })?;

        let mut document_urls = Vec::new();
        let mut image_urls = Vec::new();
        let mut rejected_files = Vec::new();

        for attachment in &attachments {
            if let Err(rejection) = validation::check_attachment(attachment) {
                warn!(file = %attachment.name, %rejection, "attachment refused");
                rejected_files.push(UploadFailure {
                    name: attachment.name.clone(),
                    reason: rejection.to_string(),
                });
                continue;
            }

            match self.files.upload_document(&owner.id, attachment) {
                Ok(stored_document) => match attachment.kind {
                    AttachmentKind::Document => document_urls.push(stored_document.public_url),
                    AttachmentKind::AdMedia => image_urls.push(stored_document.public_url),
                },
                Err(error) => {
                    warn!(file = %attachment.name, %error, "upload failed, continuing with remaining files");
                    rejected_files.push(UploadFailure {
                        name: attachment.name.clone(),
                        reason: error.to_string(),
                    });
                }
            }
        }

        let listing = if document_urls.is_empty() && image_urls.is_empty() {
            stored
        } else {
            self.store.update(
                &stored.id,
                ListingPatch {
                    append_document_urls: document_urls,
                    append_image_urls: image_urls,
                    ..ListingPatch::default()
                },
            )?
        };

        Ok(SubmissionOutcome {
            listing,
            rejected_files,
        })
    }

    /// Partial edit of an existing listing. Numeric bounds still apply.
    pub fn update(
        &self,
        id: &ListingId,
        patch: ListingPatch,
    ) -> Result<Listing, ListingServiceError> {
        if let Some(price) = patch.price_amount {
            if !(price.is_finite() && (0.0..=validation::MAX_PRICE_AMOUNT).contains(&price)) {
                return Err(DraftRejection {
                    issues: vec![FieldIssue {
                        field: "price_amount",
                        message: format!(
                            "price must be between 0 and {}",
                            validation::MAX_PRICE_AMOUNT as u64
                        ),
                    }],
                }
                .into());
            }
        }

        Ok(self.store.update(id, patch)?)
    }

    /// Delete a listing. A second delete of the same id is not an error.
    pub fn delete(&self, id: &ListingId) -> Result<(), ListingServiceError> {
        match self.store.delete(id) {
            Ok(()) | Err(StoreError::NotFound) => Ok(()),
            Err(error) => Err(error.into()),
        }
    }

    pub fn get(&self, id: &ListingId) -> Result<Option<Listing>, ListingServiceError> {
        Ok(self.store.get(id)?)
    }

    pub fn search(&self, filter: &SearchFilter) -> Result<Vec<Listing>, ListingServiceError> {
        Ok(self.store.search(filter)?)
    }

    pub fn user_listings(&self, owner: &UserId) -> Result<Vec<Listing>, ListingServiceError> {
        Ok(self.store.user_listings(owner)?)
    }

    /// Resolve the weak back-reference from a shipment request to the load
    /// listing it was raised against. A deleted target is a fallback, not a
    /// failure of the enclosing view.
    pub fn related_load_listing(
        &self,
        listing: &Listing,
    ) -> Result<RelatedListing, ListingServiceError> {
        let related_id = match &listing.related_load_listing_id {
            Some(id) => id,
            None => return Ok(RelatedListing::None),
        };

        match self.store.get(related_id) {
            Ok(Some(found)) => Ok(RelatedListing::Found(found)),
            Ok(None) | Err(StoreError::NotFound) => Ok(RelatedListing::Unavailable),
            Err(error) => Err(error.into()),
        }
    }
}

/// Error raised by the listing service.
#[derive(Debug, thiserror::Error)]
pub enum ListingServiceError {
    #[error(transparent)]
    Validation(#[from] DraftRejection),
    #[error(transparent)]
    Store(#[from] StoreError),
}
