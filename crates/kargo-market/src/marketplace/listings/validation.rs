use serde::Serialize;

use super::domain::{
    AttachmentKind, ListingDraft, ListingPayload, ListingType, OfferType, PendingAttachment,
    ServiceDetails, TransportMode,
};
use crate::marketplace::catalog;

pub const MAX_QUANTITY: f64 = 999_999.0;
pub const MAX_PRICE_AMOUNT: f64 = 999_999_999.0;
pub const MAX_DOCUMENT_BYTES: u64 = 10 * 1024 * 1024;
pub const MAX_AD_MEDIA_BYTES: u64 = 50 * 1024 * 1024;

const DOCUMENT_MIME_TYPES: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "image/png",
    "image/jpeg",
];

const AD_MEDIA_EXTRA_MIME_TYPES: &[&str] =
    &["image/gif", "video/mp4", "video/webm", "video/ogg"];

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    pub field: &'static str,
    pub message: String,
}

impl FieldIssue {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// All field issues found in a draft, in the order the form shows its fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("listing draft rejected with {} field issue(s)", .issues.len())]
pub struct DraftRejection {
    pub issues: Vec<FieldIssue>,
}

/// Validate a draft listing or service before any remote call.
///
/// Every rule is evaluated so the form can highlight all offending fields at
/// once; the result is either a normalized payload or the full issue list.
pub fn validate_draft(draft: &ListingDraft) -> Result<ListingPayload, DraftRejection> {
    let mut issues = Vec::new();

    check_required_fields(draft, &mut issues);
    check_mode_and_vehicle(draft, &mut issues);
    check_service_details(draft, &mut issues);
    check_price(draft, &mut issues);
    check_quantities(draft, &mut issues);

    match (issues.is_empty(), draft.transport_mode) {
        (true, Some(mode)) => Ok(normalized_payload(draft, mode)),
        _ => Err(DraftRejection { issues }),
    }
}

fn check_required_fields(draft: &ListingDraft, issues: &mut Vec<FieldIssue>) {
    let require = |issues: &mut Vec<FieldIssue>, field: &'static str, value: &str| {
        if value.trim().is_empty() {
            issues.push(FieldIssue::new(field, format!("{field} is required")));
        }
    };

    match draft.listing_type {
        ListingType::LoadListing | ListingType::ShipmentRequest => {
            require(issues, "title", &draft.title);
            require(issues, "description", &draft.description);
            require(issues, "origin", &draft.origin);
            require(issues, "destination", &draft.destination);
        }
        ListingType::TransportService => {
            require(issues, "title", &draft.title);
            if draft.available_on.is_none() {
                issues.push(FieldIssue::new(
                    "available_on",
                    "an availability date is required",
                ));
            }
        }
    }
}

fn check_mode_and_vehicle(draft: &ListingDraft, issues: &mut Vec<FieldIssue>) {
    let mode = match draft.transport_mode {
        Some(mode) => mode,
        None => {
            issues.push(FieldIssue::new(
                "transport_mode",
                "a transport mode must be selected",
            ));
            return;
        }
    };

    // Multimodal has no catalog: no vehicle requirement, no checklist to
    // check selections against.
    if mode == TransportMode::Multimodal {
        return;
    }

    match draft
        .vehicle_type
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
    {
        None => issues.push(FieldIssue::new(
            "vehicle_type",
            format!("a vehicle type is required for {} listings", mode.label()),
        )),
        Some(value) if !catalog::is_valid_vehicle(mode, value) => {
            issues.push(FieldIssue::new(
                "vehicle_type",
                format!("'{}' is not a {} vehicle type", value, mode.label()),
            ))
        }
        Some(_) => {}
    }

    for document in &draft.selected_documents {
        if !catalog::is_listed_document(mode, document) {
            issues.push(FieldIssue::new(
                "required_documents",
                format!("'{}' is not on the {} checklist", document, mode.label()),
            ));
        }
    }
}

fn check_service_details(draft: &ListingDraft, issues: &mut Vec<FieldIssue>) {
    let details = match &draft.service_details {
        Some(details) => details,
        None => return,
    };

    if let Some(mode) = draft.transport_mode {
        if mode != TransportMode::Multimodal && details.transport_mode() != mode {
            issues.push(FieldIssue::new(
                "service_details",
                format!(
                    "service details describe a {} vehicle but the listing mode is {}",
                    details.transport_mode().label(),
                    mode.label()
                ),
            ));
        }
    }

    if let ServiceDetails::Sea {
        imo_number,
        mmsi_number,
        ..
    } = details
    {
        if !imo_number_valid(imo_number) {
            issues.push(FieldIssue::new(
                "imo_number",
                "IMO numbers are exactly 7 digits",
            ));
        }
        if !mmsi_number_valid(mmsi_number) {
            issues.push(FieldIssue::new(
                "mmsi_number",
                "MMSI numbers are exactly 9 digits",
            ));
        }
    }
}

fn check_price(draft: &ListingDraft, issues: &mut Vec<FieldIssue>) {
    if draft.offer_type == OfferType::FixedPrice && draft.price_amount.is_none() {
        issues.push(FieldIssue::new(
            "price_amount",
            "fixed price listings need a price",
        ));
    }

    if let Some(price) = draft.price_amount {
        if !within_bounds(price, MAX_PRICE_AMOUNT) {
            issues.push(FieldIssue::new(
                "price_amount",
                format!("price must be between 0 and {}", MAX_PRICE_AMOUNT as u64),
            ));
        }
    }
}

fn check_quantities(draft: &ListingDraft, issues: &mut Vec<FieldIssue>) {
    if let Some(weight) = draft.cargo.weight_value {
        if !within_bounds(weight, MAX_QUANTITY) {
            issues.push(FieldIssue::new(
                "weight_value",
                format!("weight must be between 0 and {}", MAX_QUANTITY as u64),
            ));
        }
    }

    if let Some(volume) = draft.cargo.volume_value {
        if !within_bounds(volume, MAX_QUANTITY) {
            issues.push(FieldIssue::new(
                "volume_value",
                format!("volume must be between 0 and {}", MAX_QUANTITY as u64),
            ));
        }
    }
}

// Bounds are inclusive on both ends; NaN and infinities never pass.
fn within_bounds(value: f64, max: f64) -> bool {
    value.is_finite() && (0.0..=max).contains(&value)
}

/// IMO ship identification numbers are exactly 7 digits. Empty means "not
/// provided", which is valid for an optional field.
pub fn imo_number_valid(value: &str) -> bool {
    digits_exactly(value, 7)
}

/// MMSI numbers are exactly 9 digits; empty is valid.
pub fn mmsi_number_valid(value: &str) -> bool {
    digits_exactly(value, 9)
}

fn digits_exactly(value: &str, count: usize) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty()
        || (trimmed.len() == count && trimmed.bytes().all(|byte| byte.is_ascii_digit()))
}

/// Why one file was refused. Attachment failures are per-file and never fail
/// the rest of a submission.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AttachmentRejection {
    #[error("'{name}' has unsupported type {mime_type}")]
    UnsupportedType { name: String, mime_type: String },
    #[error("'{name}' is {size_bytes} bytes, over the {limit_bytes} byte limit")]
    TooLarge {
        name: String,
        size_bytes: u64,
        limit_bytes: u64,
    },
}

/// Check one pending file against the allow-list and size cap for its kind.
pub fn check_attachment(attachment: &PendingAttachment) -> Result<(), AttachmentRejection> {
    let parsed: mime::Mime =
        attachment
            .mime_type
            .parse()
            .map_err(|_| AttachmentRejection::UnsupportedType {
                name: attachment.name.clone(),
                mime_type: attachment.mime_type.clone(),
            })?;
    let essence = parsed.essence_str();

    let allowed = match attachment.kind {
        AttachmentKind::Document => DOCUMENT_MIME_TYPES.contains(&essence),
        AttachmentKind::AdMedia => {
            DOCUMENT_MIME_TYPES.contains(&essence) || AD_MEDIA_EXTRA_MIME_TYPES.contains(&essence)
        }
    };
    if !allowed {
        return Err(AttachmentRejection::UnsupportedType {
            name: attachment.name.clone(),
            mime_type: attachment.mime_type.clone(),
        });
    }

    let limit = match attachment.kind {
        AttachmentKind::Document => MAX_DOCUMENT_BYTES,
        AttachmentKind::AdMedia => MAX_AD_MEDIA_BYTES,
    };
    if attachment.size_bytes > limit {
        return Err(AttachmentRejection::TooLarge {
            name: attachment.name.clone(),
            size_bytes: attachment.size_bytes,
            limit_bytes: limit,
        });
    }

    Ok(())
}

fn normalized_payload(draft: &ListingDraft, transport_mode: TransportMode) -> ListingPayload {
    let mut required_documents: Vec<String> = Vec::new();
    for document in &draft.selected_documents {
        let trimmed = document.trim();
        if !trimmed.is_empty() && !required_documents.iter().any(|seen| seen == trimmed) {
            required_documents.push(trimmed.to_string());
        }
    }

    ListingPayload {
        listing_type: draft.listing_type,
        title: draft.title.trim().to_string(),
        description: draft.description.trim().to_string(),
        transport_mode,
        vehicle_type: draft
            .vehicle_type
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string),
        origin: draft.origin.trim().to_string(),
        destination: draft.destination.trim().to_string(),
        origin_details: draft.origin_details.clone(),
        destination_details: draft.destination_details.clone(),
        cargo: draft.cargo.clone(),
        offer_type: draft.offer_type,
        price_amount: draft.price_amount,
        required_documents,
        related_load_listing_id: draft.related_load_listing_id.clone(),
        available_on: draft.available_on,
        service_details: draft.service_details.clone(),
        contact: draft.contact.clone(),
    }
}
