use chrono::DateTime;
use chrono_tz::Tz;
use coerce_api::layout::zero_time;
use coerce_api::{CastError, Layout, Target, TimeDefaults};

/// Spellings of the zero timestamp that never reach the layouts.
const ZERO_SENTINELS: [&str; 4] = [
    "",
    "0000-00-00 00:00:00",
    "0000-00-00 00:00:00.000",
    "0000-00-00 00:00:00.000000",
];

/// Unix seconds viewed in `loc`.
pub(crate) fn from_epoch(secs: i64, loc: Tz) -> Result<DateTime<Tz>, CastError> {
    DateTime::from_timestamp(secs, 0)
        .map(|t| t.with_timezone(&loc))
        .ok_or_else(|| CastError::range(format!("unix timestamp {secs} is out of range")))
}

/// Decimal digits with an optional leading sign.
fn is_integer_text(s: &str) -> bool {
    let digits = s.strip_prefix(['+', '-']).unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|c| c.is_ascii_digit())
}

/// Parse text into a timestamp in `loc` (the provider's location when `None`).
///
/// 1. Zero sentinels yield the zero timestamp.
/// 2. An integer is Unix seconds. A malformed one is an error; no layout is tried.
/// 3. Otherwise `layouts` are tried in order, the provider's list when empty.
///    An empty provider list is [`ErrorKind::Fatal`](coerce_api::ErrorKind::Fatal).
pub fn try_parse_time(
    value: &str,
    loc: Option<Tz>,
    layouts: &[Layout],
    defaults: &dyn TimeDefaults,
) -> Result<DateTime<Tz>, CastError> {
    let loc = loc.unwrap_or_else(|| defaults.location());

    if ZERO_SENTINELS.contains(&value) {
        return Ok(zero_time(loc));
    }

    if is_integer_text(value) {
        let secs: i64 = value
            .parse()
            .map_err(|e| CastError::parse(Target::Timestamp, value, e))?;
        return from_epoch(secs, loc);
    }

    let fallback;
    let layouts = if layouts.is_empty() {
        fallback = defaults.layouts();
        if fallback.is_empty() {
            tracing::error!(value, "no time layouts configured");
            return Err(CastError::fatal("try_parse_time: no time format layouts"));
        }
        &fallback[..]
    } else {
        layouts
    };

    for layout in layouts {
        if let Some(t) = layout.parse_in(value, &loc) {
            return Ok(t);
        }
        tracing::trace!(%layout, value, "layout did not match");
    }

    Err(CastError::time(value))
}
