//! Flattening a provider's place-details payload into the fields trip
//! items store.

use serde::{Deserialize, Serialize};

use crate::airports::AirportTable;

/// One entry of a place's structured address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressComponent {
    pub long_name: String,
    pub short_name: String,
    #[serde(default)]
    pub types: Vec<String>,
}

impl AddressComponent {
    fn is(&self, wanted: &str) -> bool {
        self.types.iter().any(|t| t == wanted)
    }
}

/// Place details as returned by the provider. Everything but the id may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaceDetails {
    pub place_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub address_components: Vec<AddressComponent>,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedPlace {
    pub place_id: String,
    pub name: String,
    pub formatted_address: String,
    pub city: String,
    pub country: String,
    pub country_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub airport_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
    pub types: Vec<String>,
}

/// Flatten `details`.
///
/// The city is the locality, falling back to the first-level
/// administrative area when no locality is present. Airports get an IATA
/// code looked up by name in `airports`.
#[must_use]
pub fn normalize_place(details: PlaceDetails, airports: &AirportTable) -> NormalizedPlace {
    let mut city = String::new();
    let mut country = String::new();
    let mut country_code = String::new();

    for component in &details.address_components {
        if component.is("locality") {
            city.clone_from(&component.long_name);
        } else if component.is("administrative_area_level_1") && city.is_empty() {
            city.clone_from(&component.long_name);
        } else if component.is("country") {
            country.clone_from(&component.long_name);
            country_code.clone_from(&component.short_name);
        }
    }

    let name = details.name.unwrap_or_default();
    let airport_code = details
        .types
        .iter()
        .any(|t| t == "airport")
        .then(|| airports.match_code(&name).map(str::to_string))
        .flatten();

    NormalizedPlace {
        place_id: details.place_id,
        name,
        formatted_address: details.formatted_address.unwrap_or_default(),
        city,
        country,
        country_code,
        airport_code,
        lat: details.lat,
        lng: details.lng,
        types: details.types,
    }
}
