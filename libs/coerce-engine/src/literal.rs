//! Literal grammars: text to scalar and scalar to text.
//!
//! Every parser reports failures as `ErrorKind::Parse` naming the target and
//! the offending input. The empty string is the zero value of every target.

use chrono::{DateTime, Offset, TimeDelta, TimeZone, Timelike, Utc};
use coerce_api::{CastError, Target};

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// `1 t T TRUE true True` / `0 f F FALSE false False`; empty is false.
pub fn parse_bool(s: &str) -> Result<bool, CastError> {
    match s {
        "" | "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        _ => Err(CastError::parse(Target::Bool, s, "invalid syntax")),
    }
}

/// Signed integer with base autodetection.
pub fn parse_int(s: &str) -> Result<i64, CastError> {
    if s.is_empty() {
        return Ok(0);
    }
    let (neg, body) = match s.as_bytes()[0] {
        b'-' => (true, &s[1..]),
        b'+' => (false, &s[1..]),
        _ => (false, s),
    };
    if !underscores_ok(body) {
        return Err(CastError::parse(Target::Int64, s, "invalid syntax"));
    }
    let magnitude = parse_magnitude(Target::Int64, s, body)?;
    const LIMIT: u64 = 1 << 63;
    if neg {
        match magnitude {
            m if m < LIMIT => Ok(-(m as i64)),
            LIMIT => Ok(i64::MIN),
            _ => Err(CastError::parse(Target::Int64, s, "value out of range")),
        }
    } else if magnitude < LIMIT {
        Ok(magnitude as i64)
    } else {
        Err(CastError::parse(Target::Int64, s, "value out of range"))
    }
}

/// Unsigned integer with base autodetection. No sign allowed.
pub fn parse_uint(s: &str) -> Result<u64, CastError> {
    if s.is_empty() {
        return Ok(0);
    }
    if !underscores_ok(s) {
        return Err(CastError::parse(Target::Uint64, s, "invalid syntax"));
    }
    parse_magnitude(Target::Uint64, s, s)
}

/// Digits after the sign: `0x`/`0o`/`0b` prefixes, a bare leading zero means octal.
fn parse_magnitude(target: Target, input: &str, body: &str) -> Result<u64, CastError> {
    let bytes = body.as_bytes();
    let (radix, digits) = match bytes {
        [b'0', p, _, ..] if p.eq_ignore_ascii_case(&b'x') => (16, &bytes[2..]),
        [b'0', p, _, ..] if p.eq_ignore_ascii_case(&b'o') => (8, &bytes[2..]),
        [b'0', p, _, ..] if p.eq_ignore_ascii_case(&b'b') => (2, &bytes[2..]),
        [b'0', ..] => (8, &bytes[1..]),
        [] => return Err(CastError::parse(target, input, "invalid syntax")),
        _ => (10, bytes),
    };

    let mut n: u64 = 0;
    for &c in digits {
        if c == b'_' {
            continue;
        }
        let d = match (c as char).to_digit(36) {
            Some(d) if d < radix => u64::from(d),
            _ => return Err(CastError::parse(target, input, "invalid syntax")),
        };
        n = n
            .checked_mul(u64::from(radix))
            .and_then(|n| n.checked_add(d))
            .ok_or_else(|| CastError::parse(target, input, "value out of range"))?;
    }
    Ok(n)
}

/// Underscores may only separate digits, or a base prefix from a digit.
fn underscores_ok(body: &str) -> bool {
    let bytes = body.as_bytes();
    // '^' start, '0' digit or prefix, '_' underscore, '!' anything else
    let mut saw = '^';
    let mut i = 0;
    let mut hex = false;
    if bytes.len() >= 2
        && bytes[0] == b'0'
        && matches!(bytes[1].to_ascii_lowercase(), b'b' | b'o' | b'x')
    {
        i = 2;
        saw = '0';
        hex = bytes[1].eq_ignore_ascii_case(&b'x');
    }
    for &c in &bytes[i..] {
        if c.is_ascii_digit() || (hex && c.is_ascii_hexdigit()) {
            saw = '0';
        } else if c == b'_' {
            if saw != '0' {
                return false;
            }
            saw = '_';
        } else {
            if saw == '_' {
                return false;
            }
            saw = '!';
        }
    }
    saw != '_'
}

/// Decimal float, exponent, `inf`, `nan`.
pub fn parse_float(s: &str) -> Result<f64, CastError> {
    if s.is_empty() {
        return Ok(0.0);
    }
    s.parse::<f64>().map_err(|e| CastError::parse(Target::Float64, s, e))
}

/// Duration text: a trailing digit means an integer count of milliseconds,
/// anything else is a duration literal such as `1h30m` or `1.5s`.
pub fn parse_duration(s: &str) -> Result<TimeDelta, CastError> {
    match s.as_bytes().last() {
        None => Ok(TimeDelta::zero()),
        Some(c) if c.is_ascii_digit() => {
            let ms: i64 = s
                .parse()
                .map_err(|e| CastError::parse(Target::Duration, s, e))?;
            TimeDelta::try_milliseconds(ms)
                .ok_or_else(|| CastError::parse(Target::Duration, s, "value out of range"))
        }
        Some(_) => parse_duration_literal(s),
    }
}

fn unit_nanos(unit: &str) -> Option<u64> {
    Some(match unit {
        "ns" => 1,
        "us" | "\u{b5}s" | "\u{3bc}s" => 1_000,
        "ms" => 1_000_000,
        "s" => 1_000_000_000,
        "m" => 60_000_000_000,
        "h" => 3_600_000_000_000,
        _ => return None,
    })
}

/// `[-+]?(<int>[.<frac>]<unit>)+`, or the bare literal `0`.
pub fn parse_duration_literal(input: &str) -> Result<TimeDelta, CastError> {
    let invalid = |reason: &str| CastError::parse(Target::Duration, input, reason.to_string());
    const LIMIT: u64 = 1 << 63;

    let mut s = input;
    let mut neg = false;
    if let Some(rest) = s.strip_prefix('-') {
        neg = true;
        s = rest;
    } else if let Some(rest) = s.strip_prefix('+') {
        s = rest;
    }
    if s == "0" {
        return Ok(TimeDelta::zero());
    }
    if s.is_empty() {
        return Err(invalid("invalid duration"));
    }

    let mut total: u64 = 0;
    while !s.is_empty() {
        if !s.starts_with(|c: char| c == '.' || c.is_ascii_digit()) {
            return Err(invalid("invalid duration"));
        }

        let int_len = s.bytes().take_while(u8::is_ascii_digit).count();
        let mut whole: u64 = 0;
        for c in s[..int_len].bytes() {
            whole = whole
                .checked_mul(10)
                .and_then(|v| v.checked_add(u64::from(c - b'0')))
                .filter(|v| *v <= LIMIT)
                .ok_or_else(|| invalid("invalid duration"))?;
        }
        s = &s[int_len..];

        let mut frac: u64 = 0;
        let mut scale = 1.0f64;
        let mut frac_len = 0;
        if let Some(rest) = s.strip_prefix('.') {
            frac_len = rest.bytes().take_while(u8::is_ascii_digit).count();
            let mut overflow = false;
            for c in rest[..frac_len].bytes() {
                if overflow {
                    continue;
                }
                match frac.checked_mul(10).and_then(|v| v.checked_add(u64::from(c - b'0'))) {
                    Some(v) if v < LIMIT => {
                        frac = v;
                        scale *= 10.0;
                    }
                    _ => overflow = true,
                }
            }
            s = &rest[frac_len..];
        }
        if int_len == 0 && frac_len == 0 {
            return Err(invalid("invalid duration"));
        }

        let unit_len = s.find(|c: char| c == '.' || c.is_ascii_digit()).unwrap_or(s.len());
        if unit_len == 0 {
            return Err(invalid("missing unit in duration"));
        }
        let unit = &s[..unit_len];
        s = &s[unit_len..];
        let per = unit_nanos(unit)
            .ok_or_else(|| invalid(&format!("unknown unit {unit:?} in duration")))?;

        if whole > LIMIT / per {
            return Err(invalid("invalid duration"));
        }
        let mut v = whole * per;
        if frac > 0 {
            v += (frac as f64 * (per as f64 / scale)) as u64;
            if v > LIMIT {
                return Err(invalid("invalid duration"));
            }
        }
        total = total
            .checked_add(v)
            .filter(|t| *t <= LIMIT)
            .ok_or_else(|| invalid("invalid duration"))?;
    }

    let nanos = if neg {
        0i64.wrapping_sub_unsigned(total)
    } else if total < LIMIT {
        total as i64
    } else {
        return Err(invalid("invalid duration"));
    };
    Ok(TimeDelta::nanoseconds(nanos))
}

/// Compact duration text: `72h3m0.5s`, `1.5s`, `100ms`, `2µs`, `0s`.
pub fn format_duration(d: TimeDelta) -> String {
    let nanos = i128::from(d.num_seconds()) * NANOS_PER_SEC as i128 + i128::from(d.subsec_nanos());
    let u = nanos.unsigned_abs();

    if u == 0 {
        return "0s".to_string();
    }

    let mut out = if u < NANOS_PER_SEC {
        let (prec, unit) = match u {
            u if u < 1_000 => (0, "ns"),
            u if u < 1_000_000 => (3, "\u{b5}s"),
            _ => (6, "ms"),
        };
        let (frac, rest) = format_fraction(u, prec);
        format!("{rest}{frac}{unit}")
    } else {
        let (frac, secs) = format_fraction(u, 9);
        let mut text = format!("{}{frac}s", secs % 60);
        let mins = secs / 60;
        if mins > 0 {
            text = format!("{}m{text}", mins % 60);
            let hours = mins / 60;
            if hours > 0 {
                text = format!("{hours}h{text}");
            }
        }
        text
    };
    if nanos < 0 {
        out.insert(0, '-');
    }
    out
}

/// Split `v` into `.digits` (trailing zeros dropped, empty when zero) and `v / 10^prec`.
fn format_fraction(mut v: u128, prec: u32) -> (String, u128) {
    let mut digits = Vec::with_capacity(prec as usize);
    let mut print = false;
    for _ in 0..prec {
        let digit = (v % 10) as u32;
        print = print || digit != 0;
        if print {
            digits.push(char::from_digit(digit, 10).unwrap_or('0'));
        }
        v /= 10;
    }
    if digits.is_empty() {
        return (String::new(), v);
    }
    (std::iter::once('.').chain(digits.into_iter().rev()).collect(), v)
}

/// Shortest round-trip decimal, infinities as `+Inf` / `-Inf`.
pub fn format_float(f: f64) -> String {
    match f {
        f if f == f64::INFINITY => "+Inf".to_string(),
        f if f == f64::NEG_INFINITY => "-Inf".to_string(),
        f => f.to_string(),
    }
}

/// Like [`format_float`], with the shortest digits that round-trip through `f32`.
pub fn format_float32(f: f32) -> String {
    match f {
        f if f == f32::INFINITY => "+Inf".to_string(),
        f if f == f32::NEG_INFINITY => "-Inf".to_string(),
        f => f.to_string(),
    }
}

/// RFC 3339 with up to nine fractional digits, trailing zeros trimmed and `Z` for UTC.
///
/// RFC 3339 offsets have minute precision. An offset with a seconds part
/// (local mean time, as in the zero timestamp of most zones) is rendered in
/// UTC instead, so the text still names the same instant.
pub fn format_rfc3339_nano<T: TimeZone>(t: &DateTime<T>) -> String
where
    T::Offset: std::fmt::Display,
{
    if t.offset().fix().local_minus_utc() % 60 != 0 {
        return format_rfc3339_nano(&t.with_timezone(&Utc));
    }
    let mut out = t.format("%Y-%m-%dT%H:%M:%S").to_string();
    let nanos = t.nanosecond() % 1_000_000_000;
    if nanos != 0 {
        let frac = format!("{nanos:09}");
        out.push('.');
        out.push_str(frac.trim_end_matches('0'));
    }
    if t.offset().fix().local_minus_utc() == 0 {
        out.push('Z');
    } else {
        out.push_str(&t.format("%:z").to_string());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::Tz;
    use coerce_api::ErrorKind;

    #[test]
    fn bool_grammar() {
        for s in ["1", "t", "T", "TRUE", "true", "True"] {
            assert!(parse_bool(s).unwrap(), "{s}");
        }
        for s in ["", "0", "f", "F", "FALSE", "false", "False"] {
            assert!(!parse_bool(s).unwrap(), "{s}");
        }
        let err = parse_bool("yes").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
        assert_eq!(err.to_string(), r#"cast.to_bool: parsing "yes": invalid syntax"#);
    }

    #[test]
    fn int_base_autodetect() {
        assert_eq!(parse_int("").unwrap(), 0);
        assert_eq!(parse_int("123").unwrap(), 123);
        assert_eq!(parse_int("-123").unwrap(), -123);
        assert_eq!(parse_int("+7").unwrap(), 7);
        assert_eq!(parse_int("0x1F").unwrap(), 31);
        assert_eq!(parse_int("0o17").unwrap(), 15);
        assert_eq!(parse_int("017").unwrap(), 15);
        assert_eq!(parse_int("0b101").unwrap(), 5);
        assert_eq!(parse_int("0").unwrap(), 0);
        assert_eq!(parse_int("1_000").unwrap(), 1000);
        assert_eq!(parse_int("0x_ff").unwrap(), 255);
        assert_eq!(parse_int("-9223372036854775808").unwrap(), i64::MIN);
    }

    #[test]
    fn int_rejections() {
        for s in ["1.5", "abc", "-", "08", "1__0", "_1", "1_", "0x", "--1"] {
            assert!(parse_int(s).is_err(), "{s}");
        }
        let err = parse_int("9223372036854775808").unwrap_err();
        assert!(err.to_string().ends_with("value out of range"));
    }

    #[test]
    fn uint_has_no_sign() {
        assert_eq!(parse_uint("18446744073709551615").unwrap(), u64::MAX);
        assert!(parse_uint("-1").is_err());
        assert!(parse_uint("+1").is_err());
        assert!(parse_uint("18446744073709551616").is_err());
    }

    #[test]
    fn float_grammar() {
        assert_eq!(parse_float("").unwrap(), 0.0);
        assert_eq!(parse_float("1.5e3").unwrap(), 1500.0);
        assert!(parse_float("inf").unwrap().is_infinite());
        assert!(parse_float("1,5").is_err());
    }

    #[test]
    fn duration_trailing_digit_is_milliseconds() {
        assert_eq!(parse_duration("1000").unwrap(), TimeDelta::seconds(1));
        assert_eq!(parse_duration("-250").unwrap(), TimeDelta::milliseconds(-250));
        assert_eq!(parse_duration("").unwrap(), TimeDelta::zero());
        // trailing digit wins even when it looks like a literal
        assert!(parse_duration("1s5").is_err());
    }

    #[test]
    fn duration_literals() {
        assert_eq!(parse_duration("2s").unwrap(), TimeDelta::seconds(2));
        assert_eq!(parse_duration("1h30m").unwrap(), TimeDelta::minutes(90));
        assert_eq!(parse_duration("1.5s").unwrap(), TimeDelta::milliseconds(1500));
        assert_eq!(parse_duration(".5m").unwrap(), TimeDelta::seconds(30));
        assert_eq!(parse_duration("-3ms").unwrap(), TimeDelta::milliseconds(-3));
        assert_eq!(parse_duration("2\u{b5}s").unwrap(), TimeDelta::microseconds(2));
        assert_eq!(parse_duration("2\u{3bc}s").unwrap(), TimeDelta::microseconds(2));
        assert_eq!(parse_duration_literal("0").unwrap(), TimeDelta::zero());
        assert_eq!(parse_duration_literal("-0").unwrap(), TimeDelta::zero());
    }

    #[test]
    fn duration_literal_errors() {
        for s in ["s", "1", "1x", ".s", "-", "3000000h"] {
            assert!(parse_duration_literal(s).is_err(), "{s}");
        }
        let err = parse_duration("5d").unwrap_err();
        assert!(err.to_string().contains(r#"unknown unit "d""#));
    }

    #[test]
    fn duration_rendering() {
        assert_eq!(format_duration(TimeDelta::zero()), "0s");
        assert_eq!(format_duration(TimeDelta::milliseconds(1500)), "1.5s");
        assert_eq!(format_duration(TimeDelta::milliseconds(100)), "100ms");
        assert_eq!(format_duration(TimeDelta::microseconds(2)), "2\u{b5}s");
        assert_eq!(format_duration(TimeDelta::nanoseconds(7)), "7ns");
        let d = TimeDelta::hours(72) + TimeDelta::minutes(3) + TimeDelta::milliseconds(500);
        assert_eq!(format_duration(d), "72h3m0.5s");
        assert_eq!(format_duration(TimeDelta::seconds(-61)), "-1m1s");
    }

    #[test]
    fn float_rendering() {
        assert_eq!(format_float(1.0), "1");
        assert_eq!(format_float(0.1), "0.1");
        assert_eq!(format_float(1e21), "1000000000000000000000");
        assert_eq!(format_float(f64::NEG_INFINITY), "-Inf");
        assert_eq!(format_float(f64::NAN), "NaN");
        assert_eq!(format_float32(0.1), "0.1");
    }

    #[test]
    fn rfc3339_nano_trims_fraction() {
        let t = Tz::UTC.timestamp_opt(1_234_567_890, 120_000_000).unwrap();
        assert_eq!(format_rfc3339_nano(&t), "2009-02-13T23:31:30.12Z");
        let t = Tz::Asia__Shanghai.timestamp_opt(1_234_567_890, 0).unwrap();
        assert_eq!(format_rfc3339_nano(&t), "2009-02-14T07:31:30+08:00");
    }

    #[test]
    fn rfc3339_sub_minute_offset_falls_back_to_utc() {
        // Shanghai local mean time is +08:05:43
        let t = coerce_api::layout::zero_time(Tz::Asia__Shanghai);
        assert_eq!(format_rfc3339_nano(&t), "0001-01-01T00:00:00Z");
    }

    #[test]
    fn hex_floats_are_outside_the_grammar() {
        let err = parse_float("0x1p-2").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
    }
}
