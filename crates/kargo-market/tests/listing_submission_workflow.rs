//! Integration specifications for the listing submission and offer workflow,
//! exercised end-to-end through the public service facade.

mod common {
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::{Arc, Mutex};

    use chrono::Utc;

    use kargo_market::marketplace::listings::{
        AttachmentKind, CargoDetails, ContactInfo, CurrentUser, Listing, ListingDraft, ListingId,
        ListingPatch, ListingStore, ListingType, NewListing, OfferType, PendingAttachment,
        SearchFilter, StoreError, TransportMode, UserId, VolumeUnit, WeightUnit,
    };
    use kargo_market::marketplace::storage::{FileStore, FileStoreError, StoredDocument};

    pub(super) fn current_user(id: &str) -> CurrentUser {
        CurrentUser {
            id: UserId(id.to_string()),
            display_name: None,
        }
    }

    pub(super) fn road_load_draft(title: &str) -> ListingDraft {
        ListingDraft {
            listing_type: ListingType::LoadListing,
            title: title.to_string(),
            description: "palletized, forklift on both ends".to_string(),
            transport_mode: Some(TransportMode::Road),
            vehicle_type: Some("truck_curtainsider".to_string()),
            origin: "Ankara".to_string(),
            destination: "Rotterdam".to_string(),
            origin_details: None,
            destination_details: None,
            cargo: CargoDetails {
                load_type: Some("White goods".to_string()),
                weight_value: Some(18.0),
                weight_unit: WeightUnit::Ton,
                volume_value: Some(80.0),
                volume_unit: VolumeUnit::CubicMeter,
            },
            offer_type: OfferType::Negotiable,
            price_amount: None,
            selected_documents: vec!["CMR Consignment Note".to_string()],
            related_load_listing_id: None,
            available_on: None,
            service_details: None,
            contact: ContactInfo {
                name: "Anadolu Nakliyat".to_string(),
                phone: None,
                email: Some("ops@anadolu.example".to_string()),
            },
        }
    }

    pub(super) fn pdf_attachment(name: &str) -> PendingAttachment {
        PendingAttachment {
            name: name.to_string(),
            mime_type: "application/pdf".to_string(),
            size_bytes: 4 * 1024,
            document_type: "supporting".to_string(),
            kind: AttachmentKind::Document,
            bytes: vec![0u8; 64],
        }
    }

    #[derive(Default)]
    pub(super) struct MemoryListingStore {
        listings: Mutex<Vec<Listing>>,
        sequence: AtomicU64,
    }

    impl ListingStore for MemoryListingStore {
        fn create(&self, listing: NewListing) -> Result<Listing, StoreError> {
            let seq = self.sequence.fetch_add(1, Ordering::Relaxed);
            let stored = listing.into_listing(ListingId(format!("lst-{seq:06}")), Utc::now());
            self.listings
                .lock()
                .expect("store mutex poisoned")
                .push(stored.clone());
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

    /// Fails every upload whose name appears in the deny set.
    #[derive(Default)]
    pub(super) struct FlakyFileStore {
        pub(super) deny: Vec<String>,
        pub(super) attempted: Mutex<Vec<String>>,
    }

    impl FileStore for FlakyFileStore {
        fn upload_document(
            &self,
            owner: &UserId,
            attachment: &PendingAttachment,
        ) -> Result<StoredDocument, FileStoreError> {
            self.attempted
                .lock()
                .expect("upload mutex poisoned")
                .push(attachment.name.clone());

            if self.deny.contains(&attachment.name) {
                return Err(FileStoreError::Rejected {
                    name: attachment.name.clone(),
                    reason: "simulated rejection".to_string(),
                });
            }

            Ok(StoredDocument {
                public_url: format!("https://files.kargo.example/{}/{}", owner.0, attachment.name),
            })
        }
    }

    pub(super) fn attempted(files: &Arc<FlakyFileStore>) -> Vec<String> {
        files.attempted.lock().expect("upload mutex poisoned").clone()
    }
}

use std::sync::Arc;

use common::{attempted, current_user, pdf_attachment, road_load_draft, FlakyFileStore, MemoryListingStore};
use kargo_market::marketplace::listings::{
    ListingService, ListingServiceError, ListingType, SearchFilter,
};
use kargo_market::marketplace::offers::{OfferBook, OfferDraft, OfferError, OfferService};
use kargo_market::marketplace::search::{filter_listings, ListingQuery};

#[derive(Default)]
struct MemoryOfferBook {
    offers: std::sync::Mutex<Vec<kargo_market::marketplace::offers::Offer>>,
}

impl OfferBook for MemoryOfferBook {
    fn place(
        &self,
        offer: kargo_market::marketplace::offers::Offer,
    ) -> Result<kargo_market::marketplace::offers::Offer, kargo_market::marketplace::listings::StoreError>
    {
        self.offers
            .lock()
            .expect("offer mutex poisoned")
            .push(offer.clone());
        Ok(offer)
    }

    fn for_listing(
        &self,
        listing_id: &kargo_market::marketplace::listings::ListingId,
    ) -> Result<
        Vec<kargo_market::marketplace::offers::Offer>,
        kargo_market::marketplace::listings::StoreError,
    > {
        let guard = self.offers.lock().expect("offer mutex poisoned");
        Ok(guard
            .iter()
            .filter(|offer| &offer.listing_id == listing_id)
            .cloned()
            .collect())
    }
}

#[test]
fn submission_uploads_survive_a_mid_batch_failure() {
    let store = Arc::new(MemoryListingStore::default());
    let files = Arc::new(FlakyFileStore {
        deny: vec!["two.pdf".to_string()],
        ..FlakyFileStore::default()
    });
    let service = ListingService::new(store, files.clone());

    let outcome = service
        .submit(
            &current_user("usr-shipper"),
            road_load_draft("White goods to Rotterdam"),
            vec![
                pdf_attachment("one.pdf"),
                pdf_attachment("two.pdf"),
                pdf_attachment("three.pdf"),
            ],
        )
        .expect("submission succeeds");

    assert_eq!(attempted(&files), vec!["one.pdf", "two.pdf", "three.pdf"]);
    assert_eq!(outcome.listing.document_urls.len(), 2);
    assert!(!outcome
        .listing
        .document_urls
        .iter()
        .any(|url| url.ends_with("two.pdf")));
    assert_eq!(outcome.rejected_files.len(), 1);
}

#[test]
fn rejected_draft_reports_all_issues_and_makes_no_remote_calls() {
    let store = Arc::new(MemoryListingStore::default());
    let files = Arc::new(FlakyFileStore::default());
    let service = ListingService::new(store.clone(), files.clone());

    let mut draft = road_load_draft("incomplete");
    draft.origin.clear();
    draft.cargo.weight_value = Some(1_000_000.0);

    let error = service
        .submit(
            &current_user("usr-shipper"),
            draft,
            vec![pdf_attachment("one.pdf")],
        )
        .expect_err("validation fails");

    match error {
        ListingServiceError::Validation(rejection) => {
            let fields: Vec<_> = rejection.issues.iter().map(|issue| issue.field).collect();
            assert!(fields.contains(&"origin"));
            assert!(fields.contains(&"weight_value"));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
    assert!(attempted(&files).is_empty());
    assert!(service
        .search(&SearchFilter::default())
        .expect("search works")
        .is_empty());
}

#[test]
fn owners_cannot_bid_on_their_own_listings_but_others_can() {
    let store = Arc::new(MemoryListingStore::default());
    let files = Arc::new(FlakyFileStore::default());
    let listings = ListingService::new(store.clone(), files);
    let offers = OfferService::new(store, Arc::new(MemoryOfferBook::default()));

    let outcome = listings
        .submit(
            &current_user("usr-shipper"),
            road_load_draft("White goods to Rotterdam"),
            Vec::new(),
        )
        .expect("submission succeeds");

    let own = offers.place(
        &current_user("usr-shipper"),
        &outcome.listing.id,
        OfferDraft {
            price_amount: 900.0,
            description: String::new(),
            document_urls: Vec::new(),
        },
    );
    assert!(matches!(own, Err(OfferError::OwnListing)));

    let other = offers
        .place(
            &current_user("usr-carrier"),
            &outcome.listing.id,
            OfferDraft {
                price_amount: 1_200.0,
                description: "covered trailer available".to_string(),
                document_urls: Vec::new(),
            },
        )
        .expect("offer placed");
    assert_eq!(other.listing_id, outcome.listing.id);

    let for_listing = offers
        .for_listing(&outcome.listing.id)
        .expect("offers listed");
    assert_eq!(for_listing.len(), 1);
}

#[test]
fn fetched_collections_filter_client_side_in_stable_order() {
    let store = Arc::new(MemoryListingStore::default());
    let files = Arc::new(FlakyFileStore::default());
    let service = ListingService::new(store, files);

    for title in ["Steel to Hamburg", "Textiles to Lyon", "Steel to Gdansk"] {
        service
            .submit(&current_user("usr-shipper"), road_load_draft(title), Vec::new())
            .expect("submission succeeds");
    }

    let fetched = service
        .search(&SearchFilter {
            listing_type: Some(ListingType::LoadListing),
            ..SearchFilter::default()
        })
        .expect("search works");

    let query = ListingQuery {
        text: Some("steel".to_string()),
        ..ListingQuery::default()
    };
    let titles: Vec<_> = filter_listings(&fetched, &query)
        .into_iter()
        .map(|listing| listing.title.as_str())
        .collect();
    assert_eq!(titles, vec!["Steel to Hamburg", "Steel to Gdansk"]);
}
