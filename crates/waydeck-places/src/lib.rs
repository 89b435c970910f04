//! # waydeck-places
//!
//! Provider-independent pieces of place search: IATA code lookup, query
//! normalization, suggestion merging, a short-lived result cache and
//! place-detail flattening. No network access happens here.

pub mod airports;
pub mod cache;
pub mod details;
pub mod predictions;

pub use airports::AirportTable;
pub use cache::{PredictionCache, CACHE_TTL_MS, MAX_CACHED_QUERIES};
pub use details::{normalize_place, AddressComponent, NormalizedPlace, PlaceDetails};
pub use predictions::{
    cache_key, merge_predictions, normalize_query, PlacePrediction, PlaceType,
    MAX_MERGED_RESULTS, MIN_QUERY_CHARS,
};
