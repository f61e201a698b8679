use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Opaque identifier assigned by the backing store at creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListingId(pub String);

/// Identifier of a marketplace account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

/// Human-readable listing code. Display label only, never a key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingNumber(pub String);

/// The identity acting on the marketplace right now. Some legacy public
/// listing shapes carry no owner id, so the display name rides along for the
/// ownership guard's fallback comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: UserId,
    pub display_name: Option<String>,
}

/// What kind of posting a listing is. Fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingType {
    LoadListing,
    ShipmentRequest,
    TransportService,
}

impl ListingType {
    pub const fn label(self) -> &'static str {
        match self {
            ListingType::LoadListing => "load_listing",
            ListingType::ShipmentRequest => "shipment_request",
            ListingType::TransportService => "transport_service",
        }
    }

    pub fn parse_label(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "load_listing" => Some(Self::LoadListing),
            "shipment_request" => Some(Self::ShipmentRequest),
            "transport_service" => Some(Self::TransportService),
            _ => None,
        }
    }
}

/// Carriage medium. Determines which vehicle groups and document checklist
/// apply; multimodal carries no catalog of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportMode {
    Road,
    Sea,
    Air,
    Rail,
    Multimodal,
}

impl TransportMode {
    /// The modes with a dedicated vehicle/document catalog.
    pub const CATALOGED: [TransportMode; 4] = [
        TransportMode::Road,
        TransportMode::Sea,
        TransportMode::Air,
        TransportMode::Rail,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            TransportMode::Road => "road",
            TransportMode::Sea => "sea",
            TransportMode::Air => "air",
            TransportMode::Rail => "rail",
            TransportMode::Multimodal => "multimodal",
        }
    }

    pub fn parse_label(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "road" => Some(Self::Road),
            "sea" => Some(Self::Sea),
            "air" => Some(Self::Air),
            "rail" => Some(Self::Rail),
            "multimodal" => Some(Self::Multimodal),
            _ => None,
        }
    }
}

/// How the poster wants to be paid or quoted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfferType {
    Direct,
    FixedPrice,
    Negotiable,
    Auction,
    FreeQuote,
}

impl OfferType {
    pub const fn label(self) -> &'static str {
        match self {
            OfferType::Direct => "direct",
            OfferType::FixedPrice => "fixed_price",
            OfferType::Negotiable => "negotiable",
            OfferType::Auction => "auction",
            OfferType::FreeQuote => "free_quote",
        }
    }

    pub fn parse_label(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "direct" => Some(Self::Direct),
            "fixed_price" => Some(Self::FixedPrice),
            "negotiable" => Some(Self::Negotiable),
            "auction" => Some(Self::Auction),
            "free_quote" => Some(Self::FreeQuote),
            _ => None,
        }
    }
}

/// Listing lifecycle status. Transitions are performed by the external store
/// and its operators, never in-process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingStatus {
    Draft,
    Active,
    Paused,
    Completed,
    Cancelled,
    Expired,
}

impl ListingStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ListingStatus::Draft => "draft",
            ListingStatus::Active => "active",
            ListingStatus::Paused => "paused",
            ListingStatus::Completed => "completed",
            ListingStatus::Cancelled => "cancelled",
            ListingStatus::Expired => "expired",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightUnit {
    Kilogram,
    Ton,
}

impl WeightUnit {
    pub fn parse_label(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "kg" | "kilogram" => Some(Self::Kilogram),
            "t" | "ton" => Some(Self::Ton),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolumeUnit {
    CubicMeter,
    Liter,
}

impl VolumeUnit {
    pub fn parse_label(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "m3" | "cubic_meter" => Some(Self::CubicMeter),
            "l" | "liter" => Some(Self::Liter),
            _ => None,
        }
    }
}

/// Optional structured breakdown of a free-text location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationDetails {
    pub city: String,
    pub country: String,
    #[serde(default)]
    pub postal_code: Option<String>,
}

/// Public contact block shown on a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Physical cargo description. Quantities are optional; when present they are
/// bounded by the validator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CargoDetails {
    #[serde(default)]
    pub load_type: Option<String>,
    #[serde(default)]
    pub weight_value: Option<f64>,
    pub weight_unit: WeightUnit,
    #[serde(default)]
    pub volume_value: Option<f64>,
    pub volume_unit: VolumeUnit,
}

impl Default for CargoDetails {
    fn default() -> Self {
        Self {
            load_type: None,
            weight_value: None,
            weight_unit: WeightUnit::Ton,
            volume_value: None,
            volume_unit: VolumeUnit::CubicMeter,
        }
    }
}

/// Mode-specific identity of a carrier's offered capacity. IMO and MMSI stay
/// strings so an empty value can mean "not provided".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ServiceDetails {
    Road {
        plate_number: String,
    },
    Sea {
        ship_name: String,
        #[serde(default)]
        imo_number: String,
        #[serde(default)]
        mmsi_number: String,
        #[serde(default)]
        tonnage: Option<u32>,
    },
    Air {
        flight_number: String,
        aircraft_type: String,
    },
    Rail {
        train_number: String,
        #[serde(default)]
        wagon_count: Option<u16>,
    },
}

impl ServiceDetails {
    pub const fn transport_mode(&self) -> TransportMode {
        match self {
            ServiceDetails::Road { .. } => TransportMode::Road,
            ServiceDetails::Sea { .. } => TransportMode::Sea,
            ServiceDetails::Air { .. } => TransportMode::Air,
            ServiceDetails::Rail { .. } => TransportMode::Rail,
        }
    }
}

/// What a user has typed into the create/edit form, before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingDraft {
    pub listing_type: ListingType,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub transport_mode: Option<TransportMode>,
    #[serde(default)]
    pub vehicle_type: Option<String>,
    #[serde(default)]
    pub origin: String,
    #[serde(default)]
    pub destination: String,
    #[serde(default)]
    pub origin_details: Option<LocationDetails>,
    #[serde(default)]
    pub destination_details: Option<LocationDetails>,
    #[serde(default)]
    pub cargo: CargoDetails,
    pub offer_type: OfferType,
    #[serde(default)]
    pub price_amount: Option<f64>,
    #[serde(default)]
    pub selected_documents: Vec<String>,
    #[serde(default)]
    pub related_load_listing_id: Option<ListingId>,
    #[serde(default)]
    pub available_on: Option<NaiveDate>,
    #[serde(default)]
    pub service_details: Option<ServiceDetails>,
    pub contact: ContactInfo,
}

impl ListingDraft {
    /// Switch the draft to another transport mode. A vehicle type or document
    /// selection valid for the previous mode must never survive the switch,
    /// so both selections are cleared whenever the mode actually changes.
    pub fn set_transport_mode(&mut self, mode: TransportMode) {
        if self.transport_mode == Some(mode) {
            return;
        }
        self.transport_mode = Some(mode);
        self.vehicle_type = None;
        self.selected_documents.clear();
    }
}

/// A validated, normalized draft ready to hand to the backing store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingPayload {
    pub listing_type: ListingType,
    pub title: String,
    pub description: String,
    pub transport_mode: TransportMode,
    pub vehicle_type: Option<String>,
    pub origin: String,
    pub destination: String,
    pub origin_details: Option<LocationDetails>,
    pub destination_details: Option<LocationDetails>,
    pub cargo: CargoDetails,
    pub offer_type: OfferType,
    pub price_amount: Option<f64>,
    pub required_documents: Vec<String>,
    pub related_load_listing_id: Option<ListingId>,
    pub available_on: Option<NaiveDate>,
    pub service_details: Option<ServiceDetails>,
    pub contact: ContactInfo,
}

/// A listing as persisted by the backing store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: ListingId,
    pub listing_number: ListingNumber,
    /// Authoritative owner. Legacy public shapes may lack it and only carry
    /// the contact name.
    pub owner: Option<UserId>,
    pub contact: ContactInfo,
    pub listing_type: ListingType,
    pub transport_mode: TransportMode,
    pub vehicle_type: Option<String>,
    pub title: String,
    pub description: String,
    pub origin: String,
    pub destination: String,
    pub origin_details: Option<LocationDetails>,
    pub destination_details: Option<LocationDetails>,
    pub cargo: CargoDetails,
    pub offer_type: OfferType,
    pub price_amount: Option<f64>,
    pub required_documents: Vec<String>,
    pub related_load_listing_id: Option<ListingId>,
    pub status: ListingStatus,
    pub document_urls: Vec<String>,
    pub image_urls: Vec<String>,
    pub available_on: Option<NaiveDate>,
    pub service_details: Option<ServiceDetails>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Listing {
    /// Compact projection for search results and dashboards.
    pub fn summary_view(&self) -> ListingSummaryView {
        ListingSummaryView {
            id: self.id.clone(),
            listing_number: self.listing_number.clone(),
            listing_type: self.listing_type.label(),
            transport_mode: self.transport_mode.label(),
            title: self.title.clone(),
            route: format!("{} → {}", self.origin, self.destination),
            offer_type: self.offer_type.label(),
            price_amount: self.price_amount,
            status: self.status.label(),
        }
    }
}

/// Sanitized representation of a listing for list endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct ListingSummaryView {
    pub id: ListingId,
    pub listing_number: ListingNumber,
    pub listing_type: &'static str,
    pub transport_mode: &'static str,
    pub title: String,
    pub route: String,
    pub offer_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_amount: Option<f64>,
    pub status: &'static str,
}

/// Whether a pending file is listing paperwork or promotional media. The two
/// kinds carry different MIME allow-lists and size caps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentKind {
    Document,
    AdMedia,
}

/// Client-side wrapper around a picked file. Lives only until submission: on
/// a successful upload it collapses into a stored URL and the wrapper (bytes
/// included) is dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAttachment {
    pub name: String,
    pub mime_type: String,
    pub size_bytes: u64,
    pub document_type: String,
    pub kind: AttachmentKind,
    pub bytes: Vec<u8>,
}
