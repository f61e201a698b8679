//! Bulk listing import from the CSV template. Each data row becomes a draft,
//! runs through the full draft validator, and lands in the report as either
//! an accepted payload or a per-row rejection. One bad row never sinks the
//! rest of the file.

mod parser;

use std::io::Read;
use std::path::Path;

use parser::ListingRow;

use super::listings::domain::{
    CargoDetails, ContactInfo, ListingDraft, ListingPayload, ListingType, OfferType,
    TransportMode, VolumeUnit, WeightUnit,
};
use super::listings::validation::{validate_draft, FieldIssue};

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("failed to read listing export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid listing CSV data: {0}")]
    Csv(#[from] csv::Error),
}

/// A row that passed validation. `row` is the 1-based data row number,
/// header excluded.
#[derive(Debug, Clone, PartialEq)]
pub struct AcceptedRow {
    pub row: usize,
    pub payload: ListingPayload,
}

/// A row the validator refused, with every field issue found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedRow {
    pub row: usize,
    pub issues: Vec<FieldIssue>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportReport {
    pub accepted: Vec<AcceptedRow>,
    pub rejected: Vec<RejectedRow>,
}

impl ImportReport {
    pub fn total_rows(&self) -> usize {
        self.accepted.len() + self.rejected.len()
    }
}

pub struct CsvListingImporter;

impl CsvListingImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<ImportReport, ImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<ImportReport, ImportError> {
        let mut report = ImportReport::default();

        for (index, row) in parser::parse_rows(reader)?.into_iter().enumerate() {
            let row_number = index + 1;
            match draft_from_row(&row) {
                Ok(draft) => match validate_draft(&draft) {
                    Ok(payload) => report.accepted.push(AcceptedRow {
                        row: row_number,
                        payload,
                    }),
                    Err(rejection) => report.rejected.push(RejectedRow {
                        row: row_number,
                        issues: rejection.issues,
                    }),
                },
                Err(issues) => report.rejected.push(RejectedRow {
                    row: row_number,
                    issues,
                }),
            }
        }

        Ok(report)
    }
}

// Field-level parse failures are reported the same way validator issues are,
// so a row's problems read uniformly in the report.
fn draft_from_row(row: &ListingRow) -> Result<ListingDraft, Vec<FieldIssue>> {
    let mut issues = Vec::new();

    let listing_type = ListingType::parse_label(&row.listing_type);
    if listing_type.is_none() {
        issues.push(issue(
            "listing_type",
            format!("unknown listing type '{}'", row.listing_type),
        ));
    }

    let offer_type = OfferType::parse_label(&row.offer_type);
    if offer_type.is_none() {
        issues.push(issue(
            "offer_type",
            format!("unknown offer type '{}'", row.offer_type),
        ));
    }

    let transport_mode = match row.transport_mode.as_deref() {
        None => None,
        Some(raw) => match TransportMode::parse_label(raw) {
            Some(mode) => Some(mode),
            None => {
                issues.push(issue(
                    "transport_mode",
                    format!("unknown transport mode '{raw}'"),
                ));
                None
            }
        },
    };

    let weight_value = parse_quantity(row.weight.as_deref(), "weight_value", &mut issues);
    let volume_value = parse_quantity(row.volume.as_deref(), "volume_value", &mut issues);
    let price_amount = parse_quantity(row.price.as_deref(), "price_amount", &mut issues);

    let weight_unit = match row.weight_unit.as_deref() {
        None => WeightUnit::Ton,
        Some(raw) => match WeightUnit::parse_label(raw) {
            Some(unit) => unit,
            None => {
                issues.push(issue("weight_unit", format!("unknown weight unit '{raw}'")));
                WeightUnit::Ton
            }
        },
    };
    let volume_unit = match row.volume_unit.as_deref() {
        None => VolumeUnit::CubicMeter,
        Some(raw) => match VolumeUnit::parse_label(raw) {
            Some(unit) => unit,
            None => {
                issues.push(issue("volume_unit", format!("unknown volume unit '{raw}'")));
                VolumeUnit::CubicMeter
            }
        },
    };

    if !issues.is_empty() {
        return Err(issues);
    }

    // Both labels parsed when we reach this point.
    let (listing_type, offer_type) = match (listing_type, offer_type) {
        (Some(listing_type), Some(offer_type)) => (listing_type, offer_type),
        _ => return Err(issues),
    };

    Ok(ListingDraft {
        listing_type,
        title: row.title.clone(),
        description: row.description.clone().unwrap_or_default(),
        transport_mode,
        vehicle_type: row.vehicle_type.clone(),
        origin: row.origin.clone().unwrap_or_default(),
        destination: row.destination.clone().unwrap_or_default(),
        origin_details: None,
        destination_details: None,
        cargo: CargoDetails {
            load_type: row.load_type.clone(),
            weight_value,
            weight_unit,
            volume_value,
            volume_unit,
        },
        offer_type,
        price_amount,
        selected_documents: Vec::new(),
        related_load_listing_id: None,
        available_on: None,
        service_details: None,
        contact: ContactInfo {
            name: row.contact_name.clone(),
            phone: None,
            email: row.contact_email.clone(),
        },
    })
}

fn parse_quantity(
    raw: Option<&str>,
    field: &'static str,
    issues: &mut Vec<FieldIssue>,
) -> Option<f64> {
    let raw = raw?;
    match raw.trim().parse::<f64>() {
        Ok(value) => Some(value),
        Err(_) => {
            issues.push(issue(field, format!("'{raw}' is not a number")));
            None
        }
    }
}

fn issue(field: &'static str, message: String) -> FieldIssue {
    FieldIssue { field, message }
}
