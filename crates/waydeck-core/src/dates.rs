//! Date parsing, display formatting and trip-range arithmetic.
//!
//! Display always renders the wall-clock time exactly as it was written:
//! a timestamp carrying an offset is shown in that offset, and offset-less
//! values are shown unchanged. Only comparisons against "now" need an
//! offset for offset-less values, and they borrow the clock's.

use chrono::{
    DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc,
};
use tracing::trace;

use crate::clock::Clock;
use crate::error::DateError;

/// Shown when a trip has neither a start nor an end date.
pub const DATES_NOT_SET: &str = "Dates not set";

/// Separator between the two halves of a bounded range (en dash).
pub const RANGE_SEPARATOR: &str = " – ";

const DATE_PATTERN: &str = "%-d %b %Y";
const SHORT_DATE_PATTERN: &str = "%-d %b";
const TIME_PATTERN: &str = "%H:%M";
const DATE_TIME_PATTERN: &str = "%-d %b %Y at %H:%M";

const OFFSETLESS_PATTERNS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

const MS_PER_DAY: i64 = 86_400_000;
const MINUTES_IN_DAY: i64 = 1_440;
const MINUTES_IN_MONTH: i64 = 43_200;

/// A present date/time value as supplied by a caller.
///
/// Absence is expressed with `Option<DateInput>` at every call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateInput<'a> {
    /// ISO-8601 text, date-only or a full timestamp.
    Iso(&'a str),
    /// A calendar date; treated as midnight.
    Date(NaiveDate),
    /// A wall-clock date and time without an offset.
    Local(NaiveDateTime),
    /// An absolute instant.
    Instant(DateTime<FixedOffset>),
}

impl<'a> From<&'a str> for DateInput<'a> {
    fn from(text: &'a str) -> Self {
        Self::Iso(text)
    }
}

impl From<NaiveDate> for DateInput<'_> {
    fn from(date: NaiveDate) -> Self {
        Self::Date(date)
    }
}

impl From<NaiveDateTime> for DateInput<'_> {
    fn from(wall: NaiveDateTime) -> Self {
        Self::Local(wall)
    }
}

impl From<DateTime<FixedOffset>> for DateInput<'_> {
    fn from(instant: DateTime<FixedOffset>) -> Self {
        Self::Instant(instant)
    }
}

impl From<DateTime<Utc>> for DateInput<'_> {
    fn from(instant: DateTime<Utc>) -> Self {
        Self::Instant(instant.fixed_offset())
    }
}

impl DateInput<'_> {
    /// Resolve into a [`Moment`], parsing ISO text if needed.
    ///
    /// # Errors
    ///
    /// Returns [`DateError::Malformed`] when ISO text cannot be parsed.
    pub fn resolve(&self) -> Result<Moment, DateError> {
        match *self {
            Self::Iso(text) => parse_iso(text),
            Self::Date(date) => Ok(Moment {
                wall: date.and_time(NaiveTime::MIN),
                offset: None,
            }),
            Self::Local(wall) => Ok(Moment { wall, offset: None }),
            Self::Instant(instant) => Ok(Moment {
                wall: instant.naive_local(),
                offset: Some(*instant.offset()),
            }),
        }
    }
}

/// A parsed date/time: the wall-clock reading plus the offset it was
/// written with, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Moment {
    pub wall: NaiveDateTime,
    pub offset: Option<FixedOffset>,
}

impl Moment {
    /// Pin this moment to an absolute instant, using `fallback` when the
    /// input carried no offset of its own.
    ///
    /// # Errors
    ///
    /// Returns [`DateError::Unrepresentable`] if the wall time overflows
    /// the supported range at that offset.
    pub fn instant_in(&self, fallback: FixedOffset) -> Result<DateTime<FixedOffset>, DateError> {
        let offset = self.offset.unwrap_or(fallback);
        offset
            .from_local_datetime(&self.wall)
            .single()
            .ok_or_else(|| DateError::Unrepresentable {
                wall: self.wall.to_string(),
                offset: offset.to_string(),
            })
    }
}

/// Parse ISO-8601 text: `YYYY-MM-DD`, RFC 3339, or an offset-less timestamp.
///
/// # Errors
///
/// Returns [`DateError::Malformed`] for anything else.
pub fn parse_iso(input: &str) -> Result<Moment, DateError> {
    let text = input.trim();

    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Ok(Moment {
            wall: date.and_time(NaiveTime::MIN),
            offset: None,
        });
    }

    if let Ok(instant) = DateTime::parse_from_rfc3339(text) {
        return Ok(Moment {
            wall: instant.naive_local(),
            offset: Some(*instant.offset()),
        });
    }

    for pattern in OFFSETLESS_PATTERNS {
        if let Ok(wall) = NaiveDateTime::parse_from_str(text, pattern) {
            return Ok(Moment { wall, offset: None });
        }
    }

    trace!(input = %input, "rejecting malformed date input");
    Err(DateError::Malformed {
        input: input.to_string(),
    })
}

fn render(input: Option<DateInput<'_>>, pattern: &str) -> Result<String, DateError> {
    match input {
        None => Ok(String::new()),
        Some(input) => Ok(input.resolve()?.wall.format(pattern).to_string()),
    }
}

/// `1 Dec 2025`; empty when absent.
///
/// # Errors
///
/// Propagates [`DateError`] for malformed ISO text.
pub fn format_date(input: Option<DateInput<'_>>) -> Result<String, DateError> {
    render(input, DATE_PATTERN)
}

/// `1 Dec`; empty when absent.
///
/// # Errors
///
/// Propagates [`DateError`] for malformed ISO text.
pub fn format_short_date(input: Option<DateInput<'_>>) -> Result<String, DateError> {
    render(input, SHORT_DATE_PATTERN)
}

/// `14:30` (24-hour, zero padded); empty when absent.
///
/// # Errors
///
/// Propagates [`DateError`] for malformed ISO text.
pub fn format_time(input: Option<DateInput<'_>>) -> Result<String, DateError> {
    render(input, TIME_PATTERN)
}

/// `1 Dec 2025 at 14:30`; empty when absent.
///
/// # Errors
///
/// Propagates [`DateError`] for malformed ISO text.
pub fn format_date_time(input: Option<DateInput<'_>>) -> Result<String, DateError> {
    render(input, DATE_TIME_PATTERN)
}

/// Which bounds of a [`DateRange`] are present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeShape<'a> {
    Unset,
    From(DateInput<'a>),
    Until(DateInput<'a>),
    Both(DateInput<'a>, DateInput<'a>),
}

/// A trip's start and end, each independently optional.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange<'a> {
    pub start: Option<DateInput<'a>>,
    pub end: Option<DateInput<'a>>,
}

impl<'a> DateRange<'a> {
    #[must_use]
    pub fn new(start: Option<DateInput<'a>>, end: Option<DateInput<'a>>) -> Self {
        Self { start, end }
    }

    /// Build a range from nullable ISO columns.
    #[must_use]
    pub fn from_iso(start: Option<&'a str>, end: Option<&'a str>) -> Self {
        Self::new(start.map(DateInput::Iso), end.map(DateInput::Iso))
    }

    #[must_use]
    pub fn shape(&self) -> RangeShape<'a> {
        match (self.start, self.end) {
            (None, None) => RangeShape::Unset,
            (Some(start), None) => RangeShape::From(start),
            (None, Some(end)) => RangeShape::Until(end),
            (Some(start), Some(end)) => RangeShape::Both(start, end),
        }
    }

    /// Render for display.
    ///
    /// A bounded range shows the start without its year, even when the two
    /// ends fall in different years.
    ///
    /// # Errors
    ///
    /// Propagates [`DateError`] for malformed ISO text.
    pub fn display(&self) -> Result<String, DateError> {
        match self.shape() {
            RangeShape::Unset => Ok(DATES_NOT_SET.to_string()),
            RangeShape::From(start) => Ok(format!("From {}", format_date(Some(start))?)),
            RangeShape::Until(end) => Ok(format!("Until {}", format_date(Some(end))?)),
            RangeShape::Both(start, end) => Ok(format!(
                "{}{RANGE_SEPARATOR}{}",
                format_short_date(Some(start))?,
                format_date(Some(end))?
            )),
        }
    }

    /// Inclusive day count, or `None` unless both bounds are present.
    ///
    /// The millisecond gap is rounded up to whole days before adding one,
    /// so a same-day range lasts one day. Offset-less values are read as UTC.
    ///
    /// # Errors
    ///
    /// Propagates [`DateError`] for malformed ISO text.
    pub fn duration_days(&self) -> Result<Option<i64>, DateError> {
        let RangeShape::Both(start, end) = self.shape() else {
            return Ok(None);
        };
        let utc = Utc.fix();
        let start = start.resolve()?.instant_in(utc)?;
        let end = end.resolve()?.instant_in(utc)?;
        let millis = (end - start).num_milliseconds().abs();
        Ok(Some(ceil_div(millis, MS_PER_DAY) + 1))
    }

    /// Whether `clock`'s current instant lies within the range.
    ///
    /// Both boundary days count in full: a trip starting later today, or one
    /// that ended earlier today, is active. Days are judged in the clock's
    /// offset. Open-ended and unset ranges are never active.
    ///
    /// # Errors
    ///
    /// Propagates [`DateError`] for malformed ISO text.
    pub fn is_active(&self, clock: &dyn Clock) -> Result<bool, DateError> {
        let RangeShape::Both(start, end) = self.shape() else {
            return Ok(false);
        };
        let now = clock.now();
        let offset = *now.offset();
        let today = now.date_naive();

        let start = start.resolve()?.instant_in(offset)?;
        let end = end.resolve()?.instant_in(offset)?;

        let started = now >= start || start.with_timezone(&offset).date_naive() == today;
        let not_ended = now <= end || end.with_timezone(&offset).date_naive() == today;
        Ok(started && not_ended)
    }

    /// Whether the range's end day is strictly before today.
    ///
    /// # Errors
    ///
    /// Propagates [`DateError`] for malformed ISO text.
    pub fn has_ended(&self, clock: &dyn Clock) -> Result<bool, DateError> {
        let Some(end) = self.end else {
            return Ok(false);
        };
        let now = clock.now();
        let offset = *now.offset();
        let end = end.resolve()?.instant_in(offset)?;
        Ok(end.with_timezone(&offset).date_naive() < now.date_naive())
    }
}

/// See [`DateRange::display`].
///
/// # Errors
///
/// Propagates [`DateError`] for malformed ISO text.
pub fn format_date_range(
    start: Option<DateInput<'_>>,
    end: Option<DateInput<'_>>,
) -> Result<String, DateError> {
    DateRange::new(start, end).display()
}

/// See [`DateRange::is_active`].
///
/// # Errors
///
/// Propagates [`DateError`] for malformed ISO text.
pub fn is_trip_active(
    start: Option<DateInput<'_>>,
    end: Option<DateInput<'_>>,
    clock: &dyn Clock,
) -> Result<bool, DateError> {
    DateRange::new(start, end).is_active(clock)
}

/// See [`DateRange::duration_days`].
///
/// # Errors
///
/// Propagates [`DateError`] for malformed ISO text.
pub fn duration_days(
    start: Option<DateInput<'_>>,
    end: Option<DateInput<'_>>,
) -> Result<Option<i64>, DateError> {
    DateRange::new(start, end).duration_days()
}

/// Human phrase for the distance between `input` and the clock's now,
/// e.g. `about 3 hours ago` or `in 2 days`.
///
/// Inputs equal to now read as past (`less than a minute ago`).
///
/// # Errors
///
/// Propagates [`DateError`] for malformed ISO text.
pub fn format_relative_time(input: DateInput<'_>, clock: &dyn Clock) -> Result<String, DateError> {
    let now = clock.now();
    let offset = *now.offset();
    let then = input.resolve()?.instant_in(offset)?.with_timezone(&offset);

    if then > now {
        Ok(format!("in {}", distance_phrase(now, then)))
    } else {
        Ok(format!("{} ago", distance_phrase(then, now)))
    }
}

fn distance_phrase(earlier: DateTime<FixedOffset>, later: DateTime<FixedOffset>) -> String {
    let seconds = (later - earlier).num_seconds();
    let minutes = round_div(seconds, 60);

    match minutes {
        0 => "less than a minute".to_string(),
        m if m < 45 => counted(m, "minute"),
        m if m < 90 => "about 1 hour".to_string(),
        m if m < MINUTES_IN_DAY => format!("about {}", counted(round_div(m, 60), "hour")),
        m if m < 2_520 => "1 day".to_string(),
        m if m < MINUTES_IN_MONTH => counted(round_div(m, MINUTES_IN_DAY), "day"),
        m if m < MINUTES_IN_MONTH * 2 => {
            format!("about {}", counted(round_div(m, MINUTES_IN_MONTH), "month"))
        }
        m => {
            let months = months_between(earlier.naive_local(), later.naive_local());
            if months < 12 {
                return counted(round_div(m, MINUTES_IN_MONTH), "month");
            }
            let years = months / 12;
            match months % 12 {
                r if r < 3 => format!("about {}", counted(years, "year")),
                r if r < 9 => format!("over {}", counted(years, "year")),
                _ => format!("almost {}", counted(years + 1, "year")),
            }
        }
    }
}

fn counted(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {unit}")
    } else {
        format!("{n} {unit}s")
    }
}

/// Whole months from `earlier` to `later` (`earlier <= later`), not counting
/// a final partial month.
///
/// Late February counts as the 30th, so `29 Feb 2024` to `28 Feb 2025` is
/// twelve months. A one-month span ending on the last day of a month is
/// always full. Day overflow rolls into the following month.
fn months_between(earlier: NaiveDateTime, later: NaiveDateTime) -> i64 {
    let difference = month_index(later) - month_index(earlier);
    if difference < 1 {
        return 0;
    }

    let mut probe_day = i64::from(later.day());
    let mut probe_month = month_index(later);
    if later.month() == 2 && later.day() > 27 {
        // Feb 1 + 29 days, i.e. the 1st or 2nd of March.
        let rolled = later.date().with_day(1).map(|first| first + chrono::Days::new(29));
        if let Some(rolled) = rolled {
            probe_day = i64::from(rolled.day());
            probe_month = month_index(rolled.and_time(later.time()));
        }
    }

    let shifted =
        rolled_date(probe_month - difference, probe_day).map(|d| d.and_time(later.time()));
    let mut partial = shifted.is_some_and(|shifted| shifted < earlier);
    if difference == 1 && is_last_day_of_month(later.date()) && later > earlier {
        partial = false;
    }
    difference - i64::from(partial)
}

fn month_index(value: NaiveDateTime) -> i64 {
    i64::from(value.year()) * 12 + i64::from(value.month0())
}

/// Day `day` of the month at `month_index`, overflowing into later months.
fn rolled_date(month_index: i64, day: i64) -> Option<NaiveDate> {
    let year = i32::try_from(month_index.div_euclid(12)).ok()?;
    let month = u32::try_from(month_index.rem_euclid(12)).ok()? + 1;
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    first.checked_add_days(chrono::Days::new(u64::try_from(day - 1).ok()?))
}

fn is_last_day_of_month(date: NaiveDate) -> bool {
    date.succ_opt().is_some_and(|next| next.month() != date.month())
}

// Both helpers assume a non-negative numerator.
fn round_div(n: i64, d: i64) -> i64 {
    (n + d / 2) / d
}

fn ceil_div(n: i64, d: i64) -> i64 {
    (n + d - 1) / d
}
