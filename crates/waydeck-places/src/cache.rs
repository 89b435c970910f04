//! Short-lived memo of autocomplete results, keyed by [`cache_key`].
//!
//! The cache never reads the system time itself; every call takes the
//! [`Clock`] to judge freshness against.

use std::collections::HashMap;

use chrono::{DateTime, FixedOffset};
use tracing::trace;
use waydeck_core::Clock;

use crate::predictions::{cache_key, PlacePrediction, PlaceType};

/// Results older than this are discarded on lookup.
pub const CACHE_TTL_MS: i64 = 5 * 60 * 1000;

/// Above this many queries the oldest one is evicted.
pub const MAX_CACHED_QUERIES: usize = 100;

#[derive(Debug, Clone)]
struct CachedResults {
    results: Vec<PlacePrediction>,
    stored_at: DateTime<FixedOffset>,
    inserted: u64,
}

/// Recent prediction results per place type and query.
#[derive(Debug, Clone, Default)]
pub struct PredictionCache {
    entries: HashMap<String, CachedResults>,
    next_insert: u64,
}

impl PredictionCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cached results for `input`, if stored less than [`CACHE_TTL_MS`] ago.
    /// A stale entry is dropped.
    pub fn get(
        &mut self,
        place_type: PlaceType,
        input: &str,
        clock: &dyn Clock,
    ) -> Option<&[PlacePrediction]> {
        let key = cache_key(place_type, input);
        let now = clock.now();
        let fresh = self.entries.get(&key).is_some_and(|entry| {
            now.signed_duration_since(entry.stored_at).num_milliseconds() < CACHE_TTL_MS
        });

        if !fresh {
            if self.entries.remove(&key).is_some() {
                trace!(key = %key, "dropping stale predictions");
            }
            return None;
        }
        self.entries.get(&key).map(|entry| entry.results.as_slice())
    }

    /// Store `results` for `input`. Re-storing a query refreshes its
    /// timestamp but keeps its place in the eviction order.
    pub fn insert(
        &mut self,
        place_type: PlaceType,
        input: &str,
        results: Vec<PlacePrediction>,
        clock: &dyn Clock,
    ) {
        let key = cache_key(place_type, input);
        let stored_at = clock.now();

        if let Some(entry) = self.entries.get_mut(&key) {
            entry.results = results;
            entry.stored_at = stored_at;
        } else {
            let inserted = self.next_insert;
            self.next_insert += 1;
            self.entries.insert(
                key,
                CachedResults {
                    results,
                    stored_at,
                    inserted,
                },
            );
        }

        if self.entries.len() > MAX_CACHED_QUERIES {
            let oldest = self
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.inserted)
                .map(|(key, _)| key.clone());
            if let Some(oldest) = oldest {
                trace!(key = %oldest, "evicting oldest predictions");
                self.entries.remove(&oldest);
            }
        }
    }
}
