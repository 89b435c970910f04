//! Airport name to IATA code lookup.
//!
//! The table is immutable once built and is passed to callers explicitly.

use std::collections::HashMap;

use tracing::trace;

/// Common airports keyed by their lowercase display name.
const BUILTIN_AIRPORTS: &[(&str, &str)] = &[
    // India
    ("chhatrapati shivaji maharaj international airport", "BOM"),
    ("indira gandhi international airport", "DEL"),
    ("kempegowda international airport", "BLR"),
    ("rajiv gandhi international airport", "HYD"),
    ("chennai international airport", "MAA"),
    ("netaji subhas chandra bose international airport", "CCU"),
    ("pune airport", "PNQ"),
    ("sardar vallabhbhai patel international airport", "AMD"),
    ("cochin international airport", "COK"),
    ("goa international airport", "GOI"),
    ("dabolim airport", "GOI"),
    ("manohar international airport", "GOX"),
    // Southeast Asia
    ("suvarnabhumi airport", "BKK"),
    ("don mueang international airport", "DMK"),
    ("changi airport", "SIN"),
    ("kuala lumpur international airport", "KUL"),
    ("tan son nhat international airport", "SGN"),
    ("noi bai international airport", "HAN"),
    ("da nang international airport", "DAD"),
    ("nguyen thue cong", "DAD"),
    ("phu quoc international airport", "PQC"),
    ("ninoy aquino international airport", "MNL"),
    ("soekarno-hatta international airport", "CGK"),
    ("ngurah rai international airport", "DPS"),
    // Middle East
    ("dubai international airport", "DXB"),
    ("abu dhabi international airport", "AUH"),
    ("hamad international airport", "DOH"),
    // Europe
    ("heathrow airport", "LHR"),
    ("gatwick airport", "LGW"),
    ("paris charles de gaulle airport", "CDG"),
    ("amsterdam airport schiphol", "AMS"),
    ("frankfurt airport", "FRA"),
    // Americas
    ("john f. kennedy international airport", "JFK"),
    ("los angeles international airport", "LAX"),
    ("san francisco international airport", "SFO"),
    ("o'hare international airport", "ORD"),
    ("toronto pearson international airport", "YYZ"),
    // Australia
    ("sydney airport", "SYD"),
    ("melbourne airport", "MEL"),
];

/// Lookup table from airport name to IATA code.
///
/// Entries keep insertion order so the substring fallback is deterministic.
#[derive(Debug, Clone, Default)]
pub struct AirportTable {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl AirportTable {
    /// The built-in table of common airports.
    #[must_use]
    pub fn builtin() -> Self {
        Self::from_entries(BUILTIN_AIRPORTS.iter().copied())
    }

    /// Build a table from `(name, code)` pairs. Names are lowercased and
    /// trimmed; a repeated name replaces the earlier code in place.
    #[must_use]
    pub fn from_entries<I, N, C>(entries: I) -> Self
    where
        I: IntoIterator<Item = (N, C)>,
        N: AsRef<str>,
        C: Into<String>,
    {
        let mut table = Self::default();
        for (name, code) in entries {
            let name = normalize(name.as_ref());
            let code = code.into();
            match table.index.get(&name).copied() {
                Some(pos) => table.entries[pos].1 = code,
                None => {
                    table.index.insert(name.clone(), table.entries.len());
                    table.entries.push((name, code));
                }
            }
        }
        table
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Find the IATA code for an airport name.
    ///
    /// Case and surrounding whitespace are ignored. An exact name wins;
    /// otherwise the first entry where either name contains the other is
    /// used. Blank input matches nothing.
    #[must_use]
    pub fn match_code(&self, airport_name: &str) -> Option<&str> {
        let normalized = normalize(airport_name);
        if normalized.is_empty() {
            return None;
        }

        if let Some(&pos) = self.index.get(&normalized) {
            return Some(self.entries[pos].1.as_str());
        }

        let found = self
            .entries
            .iter()
            .find(|(name, _)| normalized.contains(name.as_str()) || name.contains(&normalized))
            .map(|(_, code)| code.as_str());
        trace!(query = %normalized, code = ?found, "airport substring lookup");
        found
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}
