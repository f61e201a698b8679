use crate::infra::{InMemoryFileStore, InMemoryListingStore, InMemoryOfferBook};
use clap::Args;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use kargo_market::error::AppError;
use kargo_market::marketplace::import::CsvListingImporter;
use kargo_market::marketplace::listings::{
    AttachmentKind, CargoDetails, ContactInfo, CurrentUser, ListingDraft, ListingService,
    ListingType, OfferType, PendingAttachment, SearchFilter, TransportMode, UserId, VolumeUnit,
    WeightUnit,
};
use kargo_market::marketplace::offers::{OfferDraft, OfferError, OfferService};
use kargo_market::marketplace::search::{filter_listings, ListingQuery};

#[derive(Args, Debug)]
pub(crate) struct ImportArgs {
    /// CSV file exported from the bulk listing template
    #[arg(long)]
    pub(crate) file: PathBuf,
    /// Print every field issue for rejected rows
    #[arg(long)]
    pub(crate) verbose: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Skip the offer placement portion of the demo
    #[arg(long)]
    pub(crate) skip_offers: bool,
}

pub(crate) fn run_import(args: ImportArgs) -> Result<(), AppError> {
    let report = CsvListingImporter::from_path(&args.file)?;

    println!(
        "Processed {} row(s): {} accepted, {} rejected",
        report.total_rows(),
        report.accepted.len(),
        report.rejected.len()
    );

    for accepted in &report.accepted {
        println!(
            "  row {}: {} ({} / {})",
            accepted.row,
            accepted.payload.title,
            accepted.payload.listing_type.label(),
            accepted.payload.transport_mode.label()
        );
    }

    for rejected in &report.rejected {
        if args.verbose {
            println!("  row {} rejected:", rejected.row);
            for issue in &rejected.issues {
                println!("    - {}: {}", issue.field, issue.message);
            }
        } else {
            println!(
                "  row {} rejected ({} issue(s))",
                rejected.row,
                rejected.issues.len()
            );
        }
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    println!("Kargo Market demo");

    let store = Arc::new(InMemoryListingStore::default());
    let files = Arc::new(InMemoryFileStore::default());
    let book = Arc::new(InMemoryOfferBook::default());
    let listings = ListingService::new(store.clone(), files);
    let offers = OfferService::new(store, book);

    let shipper = CurrentUser {
        id: UserId("usr-shipper".to_string()),
        display_name: Some("Demir Lojistik".to_string()),
    };
    let carrier = CurrentUser {
        id: UserId("usr-carrier".to_string()),
        display_name: Some("Anadolu Nakliyat".to_string()),
    };

    let attachments = vec![
        demo_attachment("cmr-template.pdf", AttachmentKind::Document),
        demo_attachment("load-photo.jpg", AttachmentKind::AdMedia),
        // Over the document size cap; refused per-file, submission continues.
        oversized_attachment("full-archive.pdf"),
    ];

    let outcome = listings
        .submit(&shipper, demo_draft(), attachments)
        .map_err(AppError::from)?;

    println!(
        "\nSubmitted listing {} ({})",
        outcome.listing.listing_number.0, outcome.listing.id.0
    );
    println!(
        "- documents: {} | images: {}",
        outcome.listing.document_urls.len(),
        outcome.listing.image_urls.len()
    );
    for rejected in &outcome.rejected_files {
        println!("- refused {}: {}", rejected.name, rejected.reason);
    }

    if !args.skip_offers {
        println!("\nOffer flow");
        match offers.place(
            &shipper,
            &outcome.listing.id,
            OfferDraft {
                price_amount: 1_000.0,
                description: "self bid".to_string(),
                document_urls: Vec::new(),
            },
        ) {
            Err(OfferError::OwnListing) => {
                println!("- owner bid blocked: offers cannot target your own listing")
            }
            other => println!("- unexpected owner bid result: {other:?}"),
        }

        let placed = offers
            .place(
                &carrier,
                &outcome.listing.id,
                OfferDraft {
                    price_amount: 1_850.0,
                    description: "curtainsider free from Thursday".to_string(),
                    document_urls: Vec::new(),
                },
            )
            .map_err(AppError::from)?;
        println!(
            "- {} offered {:.0} EUR on {}",
            placed.bidder.0, placed.price_amount, placed.listing_id.0
        );
    }

    println!("\nSearch");
    let fetched = listings
        .search(&SearchFilter::default())
        .map_err(AppError::from)?;
    let query = ListingQuery {
        text: Some("hamburg".to_string()),
        ..ListingQuery::default()
    };
    for listing in filter_listings(&fetched, &query) {
        println!(
            "- {} | {} -> {} | {}",
            listing.title, listing.origin, listing.destination, listing.status.label()
        );
    }

    Ok(())
}

fn demo_draft() -> ListingDraft {
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
        contact: ContactInfo {
            name: "Demir Lojistik".to_string(),
            phone: Some("+90 262 000 0000".to_string()),
            email: Some("ops@demir.example".to_string()),
        },
    }
}

fn demo_attachment(name: &str, kind: AttachmentKind) -> PendingAttachment {
    PendingAttachment {
        name: name.to_string(),
        mime_type: guessed_mime(name),
        size_bytes: 24 * 1024,
        document_type: "supporting".to_string(),
        kind,
        bytes: vec![0u8; 256],
    }
}

fn oversized_attachment(name: &str) -> PendingAttachment {
    PendingAttachment {
        size_bytes: 11 * 1024 * 1024,
        ..demo_attachment(name, AttachmentKind::Document)
    }
}

fn guessed_mime(name: &str) -> String {
    mime_guess::from_path(Path::new(name))
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}
