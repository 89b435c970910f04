//! Trip lifecycle state derived from a trip's dates.

use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::dates::DateRange;
use crate::error::DateError;

/// Where a trip sits in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TripStatus {
    Planned,
    Active,
    Completed,
    Archived,
}

impl std::fmt::Display for TripStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Planned => write!(f, "planned"),
            Self::Active => write!(f, "active"),
            Self::Completed => write!(f, "completed"),
            Self::Archived => write!(f, "archived"),
        }
    }
}

/// The date columns of a trip row, as the backend returns them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripDates {
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub archived: bool,
}

impl TripDates {
    #[must_use]
    pub fn range(&self) -> DateRange<'_> {
        DateRange::from_iso(self.start_date.as_deref(), self.end_date.as_deref())
    }
}

/// Derive a trip's status.
///
/// Archiving overrides dates. A trip is active per [`DateRange::is_active`],
/// completed once its end day has passed, and planned otherwise (including
/// when it has no dates yet).
///
/// # Errors
///
/// Propagates [`DateError`] for malformed date columns.
pub fn trip_status(trip: &TripDates, clock: &dyn Clock) -> Result<TripStatus, DateError> {
    if trip.archived {
        return Ok(TripStatus::Archived);
    }
    let range = trip.range();
    if range.is_active(clock)? {
        Ok(TripStatus::Active)
    } else if range.has_ended(clock)? {
        Ok(TripStatus::Completed)
    } else {
        Ok(TripStatus::Planned)
    }
}

/// Display-ready facts about a trip, as shown on a trip card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TripSummary {
    pub date_range: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_days: Option<i64>,
    pub status: TripStatus,
}

/// # Errors
///
/// Propagates [`DateError`] for malformed date columns.
pub fn summarize_trip(trip: &TripDates, clock: &dyn Clock) -> Result<TripSummary, DateError> {
    let range = trip.range();
    Ok(TripSummary {
        date_range: range.display()?,
        duration_days: range.duration_days()?,
        status: trip_status(trip, clock)?,
    })
}
