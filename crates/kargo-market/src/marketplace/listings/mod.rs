//! Listing intake: the data model, the draft validator, the store boundary,
//! and the service orchestrating submission, uploads, and reads.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;
pub mod validation;

#[cfg(test)]
mod tests;

pub use domain::{
    AttachmentKind, CargoDetails, ContactInfo, CurrentUser, Listing, ListingDraft, ListingId,
    ListingNumber, ListingPayload, ListingStatus, ListingSummaryView, ListingType,
    LocationDetails, OfferType, PendingAttachment, ServiceDetails, TransportMode, UserId,
    VolumeUnit, WeightUnit,
};
pub use repository::{ListingPatch, ListingStore, NewListing, SearchFilter, StoreError};
pub use router::listing_router;
pub use service::{
    ListingService, ListingServiceError, RelatedListing, SubmissionOutcome, UploadFailure,
};
pub use validation::{
    check_attachment, imo_number_valid, mmsi_number_valid, validate_draft, AttachmentRejection,
    DraftRejection, FieldIssue,
};
