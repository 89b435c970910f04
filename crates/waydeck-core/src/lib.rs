//! # waydeck-core
//!
//! Date handling and trip state for Waydeck.
//!
//! Everything here is pure and synchronous. The only outside input is the
//! current instant, supplied through a [`Clock`]:
//! - [`DateInput`] / [`DateRange`] — date parsing, display and trip arithmetic
//! - [`Clock`] ([`SystemClock`], [`FixedClock`]) — injectable "now"
//! - [`TripStatus`] — lifecycle state derived from trip dates
//! - Error hierarchy ([`WaydeckError`], [`DateError`])

pub mod clock;
pub mod dates;
pub mod error;
pub mod trip;

pub use clock::{Clock, FixedClock, SystemClock};
pub use dates::{
    duration_days, format_date, format_date_range, format_date_time, format_relative_time,
    format_short_date, format_time, is_trip_active, DateInput, DateRange, Moment, RangeShape,
};
pub use error::{DateError, Result, WaydeckError};
pub use trip::{summarize_trip, trip_status, TripDates, TripStatus, TripSummary};
