//! Autocomplete predictions: query normalization, classification and merging.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Queries shorter than this (after trimming) are not searched.
pub const MIN_QUERY_CHARS: usize = 2;

/// Cap on merged airport + city suggestions.
pub const MAX_MERGED_RESULTS: usize = 8;

/// What kind of place a search is looking for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceType {
    #[default]
    City,
    Address,
    Airport,
    Hotel,
    Establishment,
}

impl PlaceType {
    /// Autocomplete type filters sent to the places provider.
    #[must_use]
    pub fn autocomplete_types(self) -> &'static [&'static str] {
        match self {
            Self::City => &["(cities)"],
            Self::Address => &["address"],
            Self::Airport => &["airport"],
            Self::Hotel => &["lodging"],
            Self::Establishment => &["establishment"],
        }
    }
}

impl std::fmt::Display for PlaceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::City => write!(f, "city"),
            Self::Address => write!(f, "address"),
            Self::Airport => write!(f, "airport"),
            Self::Hotel => write!(f, "hotel"),
            Self::Establishment => write!(f, "establishment"),
        }
    }
}

/// One autocomplete suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacePrediction {
    pub place_id: String,
    pub main_text: String,
    #[serde(default)]
    pub secondary_text: String,
    pub description: String,
    #[serde(default)]
    pub types: Vec<String>,
}

impl PlacePrediction {
    fn has_type(&self, wanted: &str) -> bool {
        self.types.iter().any(|t| t == wanted)
    }

    #[must_use]
    pub fn is_airport(&self) -> bool {
        self.has_type("airport")
    }

    #[must_use]
    pub fn is_city(&self) -> bool {
        self.has_type("locality")
            || self.has_type("administrative_area_level_1")
            || self.has_type("administrative_area_level_2")
    }

    #[must_use]
    pub fn is_hotel(&self) -> bool {
        self.has_type("lodging")
    }
}

/// Trimmed query text, or `None` if it is too short to search.
///
/// Length is measured in UTF-16 code units, the unit browser inputs report,
/// so a single emoji already counts as two.
#[must_use]
pub fn normalize_query(input: &str) -> Option<&str> {
    let trimmed = input.trim();
    (trimmed.encode_utf16().count() >= MIN_QUERY_CHARS).then_some(trimmed)
}

/// Key under which results for `input` may be cached.
#[must_use]
pub fn cache_key(place_type: PlaceType, input: &str) -> String {
    format!("{place_type}:{}", input.trim().to_lowercase())
}

/// Combine airport and city suggestions for transport origin/destination
/// fields: airports first, duplicates (by place id) dropped, at most
/// [`MAX_MERGED_RESULTS`] kept.
#[must_use]
pub fn merge_predictions(
    airports: Vec<PlacePrediction>,
    cities: Vec<PlacePrediction>,
) -> Vec<PlacePrediction> {
    let mut seen = HashSet::new();
    airports
        .into_iter()
        .chain(cities)
        .filter(|p| seen.insert(p.place_id.clone()))
        .take(MAX_MERGED_RESULTS)
        .collect()
}
