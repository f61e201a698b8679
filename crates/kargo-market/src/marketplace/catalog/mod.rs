//! Mode-dependent option catalog: grouped vehicle types and required-document
//! checklists per transport mode.
//!
//! The create and edit flows both read from these tables, so there is exactly
//! one source of truth for which vehicles and documents belong to a mode.
//! Vehicle values are prefixed per mode and must stay disjoint across modes;
//! clearing selections on a mode switch then guarantees no stale cross-mode
//! value can linger.

use serde::Serialize;

use super::listings::domain::TransportMode;

/// A selectable vehicle type. `value` is the stored token, `label` the
/// display text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VehicleOption {
    pub value: &'static str,
    pub label: &'static str,
}

/// A named group of vehicle options, as rendered in the create forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VehicleGroup {
    pub name: &'static str,
    pub vehicles: &'static [VehicleOption],
}

/// A slice of a mode's document checklist. The section name is presentation
/// grouping only; validation treats the checklist as flat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DocumentSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'static str>,
    pub documents: &'static [&'static str],
}

const ROAD_VEHICLE_GROUPS: &[VehicleGroup] = &[
    VehicleGroup {
        name: "Tarpaulin & Box",
        vehicles: &[
            VehicleOption { value: "truck_tarpaulin", label: "Tarpaulin Truck" },
            VehicleOption { value: "truck_box", label: "Box Truck" },
            VehicleOption { value: "truck_curtainsider", label: "Curtainsider" },
        ],
    },
    VehicleGroup {
        name: "Temperature Controlled",
        vehicles: &[
            VehicleOption { value: "truck_reefer", label: "Refrigerated Truck" },
            VehicleOption { value: "truck_isothermal", label: "Isothermal Truck" },
        ],
    },
    VehicleGroup {
        name: "Open & Heavy",
        vehicles: &[
            VehicleOption { value: "truck_flatbed", label: "Flatbed" },
            VehicleOption { value: "truck_lowbed", label: "Lowbed" },
            VehicleOption { value: "truck_car_carrier", label: "Car Carrier" },
        ],
    },
    VehicleGroup {
        name: "Tanker & Bulk",
        vehicles: &[
            VehicleOption { value: "truck_tanker", label: "Road Tanker" },
            VehicleOption { value: "truck_silo", label: "Silo Truck" },
        ],
    },
    VehicleGroup {
        name: "Light Vehicles",
        vehicles: &[
            VehicleOption { value: "van_panel", label: "Panel Van" },
            VehicleOption { value: "van_pickup", label: "Pickup" },
        ],
    },
];

const SEA_VEHICLE_GROUPS: &[VehicleGroup] = &[
    VehicleGroup {
        name: "Container",
        vehicles: &[
            VehicleOption { value: "ship_container_feeder", label: "Feeder Container Ship" },
            VehicleOption { value: "ship_container_panamax", label: "Panamax Container Ship" },
        ],
    },
    VehicleGroup {
        name: "Dry Bulk",
        vehicles: &[
            VehicleOption { value: "ship_bulk_handysize", label: "Handysize Bulk Carrier" },
            VehicleOption { value: "ship_bulk_capesize", label: "Capesize Bulk Carrier" },
        ],
    },
    VehicleGroup {
        name: "Tanker",
        vehicles: &[
            VehicleOption { value: "ship_tanker_product", label: "Product Tanker" },
            VehicleOption { value: "ship_tanker_crude", label: "Crude Oil Tanker" },
            VehicleOption { value: "ship_tanker_chemical", label: "Chemical Tanker" },
        ],
    },
    VehicleGroup {
        name: "RoRo & General Cargo",
        vehicles: &[
            VehicleOption { value: "ship_roro", label: "Ro-Ro Vessel" },
            VehicleOption { value: "ship_general_cargo", label: "General Cargo Ship" },
            VehicleOption { value: "ship_heavy_lift", label: "Heavy Lift Vessel" },
        ],
    },
];

const AIR_VEHICLE_GROUPS: &[VehicleGroup] = &[
    VehicleGroup {
        name: "Freighter",
        vehicles: &[
            VehicleOption { value: "air_freighter_narrow", label: "Narrow-Body Freighter" },
            VehicleOption { value: "air_freighter_wide", label: "Wide-Body Freighter" },
        ],
    },
    VehicleGroup {
        name: "Belly Cargo",
        vehicles: &[
            VehicleOption { value: "air_belly_narrow", label: "Narrow-Body Belly Cargo" },
            VehicleOption { value: "air_belly_wide", label: "Wide-Body Belly Cargo" },
        ],
    },
    VehicleGroup {
        name: "Charter",
        vehicles: &[
            VehicleOption { value: "air_charter_cargo", label: "Cargo Charter" },
        ],
    },
];

const RAIL_VEHICLE_GROUPS: &[VehicleGroup] = &[
    VehicleGroup {
        name: "Wagons",
        vehicles: &[
            VehicleOption { value: "wagon_covered", label: "Covered Wagon" },
            VehicleOption { value: "wagon_open", label: "Open Wagon" },
            VehicleOption { value: "wagon_flat", label: "Flat Wagon" },
        ],
    },
    VehicleGroup {
        name: "Intermodal",
        vehicles: &[
            VehicleOption { value: "wagon_container", label: "Container Wagon" },
            VehicleOption { value: "wagon_swap_body", label: "Swap Body Wagon" },
        ],
    },
    VehicleGroup {
        name: "Specialized",
        vehicles: &[
            VehicleOption { value: "wagon_tanker", label: "Tank Wagon" },
            VehicleOption { value: "wagon_hopper", label: "Hopper Wagon" },
            VehicleOption { value: "wagon_refrigerated", label: "Refrigerated Wagon" },
        ],
    },
];

const ROAD_DOCUMENTS: &[DocumentSection] = &[DocumentSection {
    name: None,
    documents: &[
        "CMR Consignment Note",
        "Carrier Liability Insurance",
        "Vehicle Licence",
        "ADR Certificate",
        "TIR Carnet",
    ],
}];

// Sea keeps two sub-groups for display; the split carries no meaning for
// validation.
const SEA_DOCUMENTS: &[DocumentSection] = &[
    DocumentSection {
        name: Some("Vetting & Operational"),
        documents: &[
            "Q88 Questionnaire",
            "SIRE Inspection Report",
            "Class Certificate",
            "P&I Insurance Certificate",
        ],
    },
    DocumentSection {
        name: Some("Shipping Documents"),
        documents: &[
            "Bill of Lading",
            "Mate's Receipt",
            "Certificate of Origin",
            "IMO Dangerous Goods Declaration",
        ],
    },
];

const AIR_DOCUMENTS: &[DocumentSection] = &[DocumentSection {
    name: None,
    documents: &[
        "Air Waybill",
        "Shipper's Declaration for Dangerous Goods",
        "Known Consignor Certificate",
        "Security Screening Record",
    ],
}];

const RAIL_DOCUMENTS: &[DocumentSection] = &[DocumentSection {
    name: None,
    documents: &[
        "CIM Consignment Note",
        "Wagon List",
        "Loading Gauge Certificate",
        "RID Certificate",
    ],
}];

/// Grouped vehicle catalog for a mode. Multimodal has none.
pub fn vehicle_groups(mode: TransportMode) -> &'static [VehicleGroup] {
    match mode {
        TransportMode::Road => ROAD_VEHICLE_GROUPS,
        TransportMode::Sea => SEA_VEHICLE_GROUPS,
        TransportMode::Air => AIR_VEHICLE_GROUPS,
        TransportMode::Rail => RAIL_VEHICLE_GROUPS,
        TransportMode::Multimodal => &[],
    }
}

/// Required-document checklist for a mode, in display sections.
pub fn document_sections(mode: TransportMode) -> &'static [DocumentSection] {
    match mode {
        TransportMode::Road => ROAD_DOCUMENTS,
        TransportMode::Sea => SEA_DOCUMENTS,
        TransportMode::Air => AIR_DOCUMENTS,
        TransportMode::Rail => RAIL_DOCUMENTS,
        TransportMode::Multimodal => &[],
    }
}

/// The flat checklist for a mode.
pub fn document_checklist(mode: TransportMode) -> Vec<&'static str> {
    document_sections(mode)
        .iter()
        .flat_map(|section| section.documents.iter().copied())
        .collect()
}

pub fn is_valid_vehicle(mode: TransportMode, value: &str) -> bool {
    vehicle_groups(mode)
        .iter()
        .flat_map(|group| group.vehicles.iter())
        .any(|option| option.value == value)
}

pub fn is_listed_document(mode: TransportMode, name: &str) -> bool {
    document_sections(mode)
        .iter()
        .flat_map(|section| section.documents.iter())
        .any(|document| *document == name)
}

/// Reverse lookup: which cataloged mode owns a vehicle value.
pub fn mode_for_vehicle(value: &str) -> Option<TransportMode> {
    TransportMode::CATALOGED
        .into_iter()
        .find(|mode| is_valid_vehicle(*mode, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn all_vehicle_values(mode: TransportMode) -> Vec<&'static str> {
        vehicle_groups(mode)
            .iter()
            .flat_map(|group| group.vehicles.iter().map(|option| option.value))
            .collect()
    }

    #[test]
    fn vehicle_values_are_disjoint_across_modes() {
        let mut seen: HashSet<&'static str> = HashSet::new();
        for mode in TransportMode::CATALOGED {
            for value in all_vehicle_values(mode) {
                assert!(
                    seen.insert(value),
                    "vehicle value '{value}' appears in more than one mode"
                );
            }
        }
        assert!(!seen.is_empty());
    }

    #[test]
    fn document_names_are_disjoint_across_modes() {
        let mut seen: HashSet<&'static str> = HashSet::new();
        for mode in TransportMode::CATALOGED {
            for name in document_checklist(mode) {
                assert!(
                    seen.insert(name),
                    "document '{name}' appears in more than one mode"
                );
            }
        }
    }

    #[test]
    fn every_vehicle_value_belongs_to_exactly_one_mode() {
        for mode in TransportMode::CATALOGED {
            for value in all_vehicle_values(mode) {
                assert_eq!(mode_for_vehicle(value), Some(mode));
                for other in TransportMode::CATALOGED {
                    if other != mode {
                        assert!(!is_valid_vehicle(other, value));
                    }
                }
            }
        }
    }

    #[test]
    fn multimodal_has_no_catalog() {
        assert!(vehicle_groups(TransportMode::Multimodal).is_empty());
        assert!(document_sections(TransportMode::Multimodal).is_empty());
        assert!(!is_valid_vehicle(TransportMode::Multimodal, "truck_tarpaulin"));
    }

    #[test]
    fn sea_checklist_flattens_both_sections() {
        let sections = document_sections(TransportMode::Sea);
        assert_eq!(sections.len(), 2);
        let flat = document_checklist(TransportMode::Sea);
        let total: usize = sections.iter().map(|section| section.documents.len()).sum();
        assert_eq!(flat.len(), total);
        assert!(flat.contains(&"Bill of Lading"));
        assert!(flat.contains(&"Q88 Questionnaire"));
    }

    #[test]
    fn membership_checks_are_mode_scoped() {
        assert!(is_valid_vehicle(TransportMode::Road, "truck_reefer"));
        assert!(!is_valid_vehicle(TransportMode::Sea, "truck_reefer"));
        assert!(is_listed_document(TransportMode::Rail, "CIM Consignment Note"));
        assert!(!is_listed_document(TransportMode::Road, "CIM Consignment Note"));
    }
}
