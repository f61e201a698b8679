use serde::{Deserialize, Deserializer};
use std::io::Read;

/// Raw CSV row as exported from the bulk listing template. Header names
/// match the template exactly; empty cells collapse to `None`.
#[derive(Debug, Deserialize)]
pub(crate) struct ListingRow {
    #[serde(rename = "Listing Type")]
    pub(crate) listing_type: String,
    #[serde(rename = "Title")]
    pub(crate) title: String,
    #[serde(rename = "Description", default, deserialize_with = "empty_string_as_none")]
    pub(crate) description: Option<String>,
    #[serde(rename = "Transport Mode", default, deserialize_with = "empty_string_as_none")]
    pub(crate) transport_mode: Option<String>,
    #[serde(rename = "Vehicle Type", default, deserialize_with = "empty_string_as_none")]
    pub(crate) vehicle_type: Option<String>,
    #[serde(rename = "Origin", default, deserialize_with = "empty_string_as_none")]
    pub(crate) origin: Option<String>,
    #[serde(rename = "Destination", default, deserialize_with = "empty_string_as_none")]
    pub(crate) destination: Option<String>,
    #[serde(rename = "Load Type", default, deserialize_with = "empty_string_as_none")]
    pub(crate) load_type: Option<String>,
    #[serde(rename = "Weight", default, deserialize_with = "empty_string_as_none")]
    pub(crate) weight: Option<String>,
    #[serde(rename = "Weight Unit", default, deserialize_with = "empty_string_as_none")]
    pub(crate) weight_unit: Option<String>,
    #[serde(rename = "Volume", default, deserialize_with = "empty_string_as_none")]
    pub(crate) volume: Option<String>,
    #[serde(rename = "Volume Unit", default, deserialize_with = "empty_string_as_none")]
    pub(crate) volume_unit: Option<String>,
    #[serde(rename = "Offer Type")]
    pub(crate) offer_type: String,
    #[serde(rename = "Price", default, deserialize_with = "empty_string_as_none")]
    pub(crate) price: Option<String>,
    #[serde(rename = "Contact Name")]
    pub(crate) contact_name: String,
    #[serde(rename = "Contact Email", default, deserialize_with = "empty_string_as_none")]
    pub(crate) contact_email: Option<String>,
}

pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<Vec<ListingRow>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for row in csv_reader.deserialize::<ListingRow>() {
        rows.push(row?);
    }

    Ok(rows)
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
