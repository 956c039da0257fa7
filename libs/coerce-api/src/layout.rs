use std::fmt;

use chrono::{
    DateTime, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeDelta, TimeZone, Utc,
};
use chrono_tz::Tz;

/// Seconds between the Unix epoch and 0001-01-01T00:00:00Z.
const ZERO_TIME_UNIX: i64 = -62_135_596_800;

/// The zero timestamp, 0001-01-01T00:00:00 UTC, viewed in `loc`.
pub fn zero_time(loc: Tz) -> DateTime<Tz> {
    DateTime::<Utc>::from_timestamp(ZERO_TIME_UNIX, 0)
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
        .with_timezone(&loc)
}

/// Whether `t` is the zero timestamp, whatever zone it is viewed in.
pub fn is_zero_time<T: TimeZone>(t: &DateTime<T>) -> bool {
    t.timestamp() == ZERO_TIME_UNIX && t.timestamp_subsec_nanos() == 0
}

/// Time-format pattern used to parse text into a timestamp.
///
/// - `Rfc3339`, `Rfc2822`: the named internet formats, the offset comes from the text.
/// - `Pattern`: chrono strftime pattern. With an offset specifier the parsed
///   offset is used; without one the wall time is read in the requested
///   location; a date-only pattern yields midnight.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Layout {
    Rfc3339,
    Rfc2822,
    Pattern(String),
}

impl Layout {
    /// Parse `value` in `loc`. `None` when the layout does not match.
    pub fn parse_in(&self, value: &str, loc: &Tz) -> Option<DateTime<Tz>> {
        match self {
            Layout::Rfc3339 => DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|t| t.with_timezone(loc)),
            Layout::Rfc2822 => DateTime::parse_from_rfc2822(value)
                .ok()
                .map(|t| t.with_timezone(loc)),
            Layout::Pattern(pattern) => {
                if let Ok(t) = DateTime::parse_from_str(value, pattern) {
                    return Some(t.with_timezone(loc));
                }
                let naive = NaiveDateTime::parse_from_str(value, pattern)
                    .ok()
                    .or_else(|| {
                        NaiveDate::parse_from_str(value, pattern)
                            .ok()
                            .map(|d| d.and_time(NaiveTime::MIN))
                    })?;
                resolve_local(&naive, loc)
            }
        }
    }
}

/// Wall time `naive` in `loc`.
///
/// An ambiguous time takes the earlier instant. A time skipped by a forward
/// transition is read with the offset in effect before the gap, which moves
/// it forward by the size of the gap (02:30 becomes 03:30).
fn resolve_local(naive: &NaiveDateTime, loc: &Tz) -> Option<DateTime<Tz>> {
    match loc.from_local_datetime(naive) {
        LocalResult::Single(t) | LocalResult::Ambiguous(t, _) => Some(t),
        LocalResult::None => {
            // a gap lasts less than a day
            let earlier = naive.checked_sub_signed(TimeDelta::days(1))?;
            let before = loc.offset_from_utc_datetime(&earlier).fix();
            let shift = TimeDelta::seconds(i64::from(before.local_minus_utc()));
            let utc = naive.checked_sub_signed(shift)?;
            Some(loc.from_utc_datetime(&utc))
        }
    }
}

impl From<&str> for Layout {
    fn from(s: &str) -> Self {
        if s.eq_ignore_ascii_case("rfc3339") {
            Layout::Rfc3339
        } else if s.eq_ignore_ascii_case("rfc2822") {
            Layout::Rfc2822
        } else {
            Layout::Pattern(s.to_string())
        }
    }
}

impl From<String> for Layout {
    fn from(s: String) -> Self {
        match Layout::from(s.as_str()) {
            Layout::Pattern(_) => Layout::Pattern(s),
            named => named,
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Layout::Rfc3339 => f.write_str("rfc3339"),
            Layout::Rfc2822 => f.write_str("rfc2822"),
            Layout::Pattern(p) => f.write_str(p),
        }
    }
}

/// Process defaults consulted when a call supplies no location or no layouts.
///
/// Read-only from the converters' point of view.
pub trait TimeDefaults: Send + Sync {
    /// Ordered layouts, first match wins. An empty list is a configuration error.
    fn layouts(&self) -> Vec<Layout>;

    fn location(&self) -> Tz;
}
