//! Hook-free converters.
//!
//! Each converter matches the shapes it knows natively, then consults the
//! capabilities of a `Dynamic` object, and finally falls back to the runtime
//! kind of the value ([`by_kind`]). A pointer or interface at the top level is
//! followed once and converted with the same rules as its target.

use chrono::{DateTime, TimeDelta};
use chrono_tz::Tz;
use coerce_api::layout::{is_zero_time, zero_time};
use coerce_api::{CastError, Layout, Target, TimeDefaults, Value};

use crate::literal::{
    format_duration, format_float, format_float32, format_rfc3339_nano, parse_bool, parse_duration,
    parse_float, parse_int, parse_uint,
};
use crate::time::{from_epoch, try_parse_time};

/// A value reduced to its runtime kind.
enum Scalar<'v> {
    Nil,
    Bool(bool),
    Text(&'v str),
    Int(i64),
    Uint(u64),
    /// `single` is set for 32-bit floats, which render with fewer digits.
    Float { value: f64, single: bool },
}

/// Structural fallback: reduce `v` by kind and hand it to `f`.
///
/// Nil sentinels become `Scalar::Nil`. Pointers and interfaces are followed,
/// `Dynamic` objects contribute their `structure()`. Any other kind is
/// unsupported for `target`.
fn by_kind<T>(
    target: Target,
    v: &Value<'_>,
    f: &dyn Fn(Scalar<'_>) -> Result<T, CastError>,
) -> Result<T, CastError> {
    match v {
        Value::Null | Value::Pointer(None) | Value::Interface(None) => f(Scalar::Nil),
        Value::Pointer(Some(inner)) | Value::Interface(Some(inner)) => by_kind(target, inner, f),
        Value::Bool(b) => f(Scalar::Bool(*b)),
        Value::String(s) => f(Scalar::Text(s.as_ref())),
        Value::Int(i) => f(Scalar::Int(*i as i64)),
        Value::Int8(i) => f(Scalar::Int(i64::from(*i))),
        Value::Int16(i) => f(Scalar::Int(i64::from(*i))),
        Value::Int32(i) => f(Scalar::Int(i64::from(*i))),
        Value::Int64(i) => f(Scalar::Int(*i)),
        Value::UInt(u) => f(Scalar::Uint(*u as u64)),
        Value::UInt8(u) => f(Scalar::Uint(u64::from(*u))),
        Value::UInt16(u) => f(Scalar::Uint(u64::from(*u))),
        Value::UInt32(u) => f(Scalar::Uint(u64::from(*u))),
        Value::UInt64(u) => f(Scalar::Uint(*u)),
        Value::Float32(x) => f(Scalar::Float {
            value: f64::from(*x),
            single: true,
        }),
        Value::Float64(x) => f(Scalar::Float {
            value: *x,
            single: false,
        }),
        Value::Dynamic(obj) => match obj.structure() {
            Some(inner) => by_kind(target, &inner, f),
            None => Err(CastError::unsupported(target, obj.type_name())),
        },
        other => Err(CastError::unsupported(target, other.type_name())),
    }
}

fn lossy(bytes: &[u8]) -> std::borrow::Cow<'_, str> {
    String::from_utf8_lossy(bytes)
}

/// Convert to `bool`.
///
/// Numbers are true when non-zero. A one-byte buffer `[0]`/`[1]` is a raw
/// flag; any other buffer is read as text. Timestamps are true unless zero.
pub fn to_bool(v: &Value<'_>) -> Result<bool, CastError> {
    match v {
        Value::Pointer(Some(inner)) | Value::Interface(Some(inner)) => to_bool(inner),
        Value::Bytes(b) => match &**b {
            [0] => Ok(false),
            [1] => Ok(true),
            bytes => parse_bool(&lossy(bytes)),
        },
        Value::Timestamp(t) => Ok(!is_zero_time(t)),
        Value::Dynamic(obj) => {
            if let Some(b) = obj.as_bool() {
                return Ok(b);
            }
            if let Some(zero) = obj.is_zero() {
                return Ok(!zero);
            }
            if let Some(text) = obj.render() {
                return parse_bool(&text);
            }
            by_kind(Target::Bool, v, &bool_by_kind)
        }
        _ => by_kind(Target::Bool, v, &bool_by_kind),
    }
}

fn bool_by_kind(s: Scalar<'_>) -> Result<bool, CastError> {
    match s {
        Scalar::Nil => Ok(false),
        Scalar::Bool(b) => Ok(b),
        Scalar::Text(t) => parse_bool(t),
        Scalar::Int(i) => Ok(i != 0),
        Scalar::Uint(u) => Ok(u != 0),
        Scalar::Float { value, .. } => Ok(value != 0.0),
    }
}

/// Convert to `i64`.
///
/// Floats truncate toward zero, `u64` wraps. Durations become whole
/// milliseconds, timestamps Unix seconds.
pub fn to_i64(v: &Value<'_>) -> Result<i64, CastError> {
    match v {
        Value::Pointer(Some(inner)) | Value::Interface(Some(inner)) => to_i64(inner),
        Value::Bytes(b) => parse_int(&lossy(b)),
        Value::Duration(d) => Ok(d.num_milliseconds()),
        Value::Timestamp(t) => Ok(t.timestamp()),
        Value::Dynamic(obj) => {
            if let Some(i) = obj.as_i64() {
                return Ok(i);
            }
            if let Some(text) = obj.render() {
                return parse_int(&text);
            }
            by_kind(Target::Int64, v, &i64_by_kind)
        }
        _ => by_kind(Target::Int64, v, &i64_by_kind),
    }
}

fn i64_by_kind(s: Scalar<'_>) -> Result<i64, CastError> {
    match s {
        Scalar::Nil => Ok(0),
        Scalar::Bool(b) => Ok(i64::from(b)),
        Scalar::Text(t) => parse_int(t),
        Scalar::Int(i) => Ok(i),
        Scalar::Uint(u) => Ok(u as i64),
        Scalar::Float { value, .. } => Ok(value as i64),
    }
}

/// Convert to `u64`.
///
/// Negative numbers are rejected rather than wrapped. Durations and
/// timestamps are not accepted here, unlike [`to_i64`].
pub fn to_u64(v: &Value<'_>) -> Result<u64, CastError> {
    match v {
        Value::Pointer(Some(inner)) | Value::Interface(Some(inner)) => to_u64(inner),
        Value::Bytes(b) => parse_uint(&lossy(b)),
        Value::Duration(_) | Value::Timestamp(_) => {
            Err(CastError::unsupported(Target::Uint64, v.type_name()))
        }
        Value::Dynamic(obj) => {
            if let Some(u) = obj.as_u64() {
                return Ok(u);
            }
            if let Some(text) = obj.render() {
                return parse_uint(&text);
            }
            by_kind(Target::Uint64, v, &u64_by_kind)
        }
        _ => by_kind(Target::Uint64, v, &u64_by_kind),
    }
}

fn u64_by_kind(s: Scalar<'_>) -> Result<u64, CastError> {
    match s {
        Scalar::Nil => Ok(0),
        Scalar::Bool(b) => Ok(u64::from(b)),
        Scalar::Text(t) => parse_uint(t),
        Scalar::Int(i) if i < 0 => Err(CastError::negative("integer")),
        Scalar::Int(i) => Ok(i as u64),
        Scalar::Uint(u) => Ok(u),
        Scalar::Float { value, .. } if value < 0.0 => Err(CastError::negative("float")),
        Scalar::Float { value, .. } => Ok(value as u64),
    }
}

/// Convert to `f64`. Durations become fractional seconds.
pub fn to_f64(v: &Value<'_>) -> Result<f64, CastError> {
    match v {
        Value::Pointer(Some(inner)) | Value::Interface(Some(inner)) => to_f64(inner),
        Value::Bytes(b) => parse_float(&lossy(b)),
        Value::Duration(d) => Ok(d.num_seconds() as f64 + f64::from(d.subsec_nanos()) / 1e9),
        Value::Timestamp(_) => Err(CastError::unsupported(Target::Float64, v.type_name())),
        Value::Dynamic(obj) => {
            if let Some(x) = obj.as_f64() {
                return Ok(x);
            }
            if let Some(text) = obj.render() {
                return parse_float(&text);
            }
            by_kind(Target::Float64, v, &f64_by_kind)
        }
        _ => by_kind(Target::Float64, v, &f64_by_kind),
    }
}

fn f64_by_kind(s: Scalar<'_>) -> Result<f64, CastError> {
    match s {
        Scalar::Nil => Ok(0.0),
        Scalar::Bool(b) => Ok(if b { 1.0 } else { 0.0 }),
        Scalar::Text(t) => parse_float(t),
        Scalar::Int(i) => Ok(i as f64),
        Scalar::Uint(u) => Ok(u as f64),
        Scalar::Float { value, .. } => Ok(value),
    }
}

/// Convert to text.
///
/// Floats use the shortest digits that round-trip at their own width,
/// timestamps RFC 3339 with nanoseconds, durations the compact `1h2m3s` form.
pub fn to_text(v: &Value<'_>) -> Result<String, CastError> {
    match v {
        Value::Pointer(Some(inner)) | Value::Interface(Some(inner)) => to_text(inner),
        Value::Bytes(b) => Ok(lossy(b).into_owned()),
        Value::Timestamp(t) => Ok(format_rfc3339_nano(t)),
        Value::Duration(d) => Ok(format_duration(*d)),
        Value::Error(e) => Ok(e.to_string()),
        Value::Dynamic(obj) => match obj.render() {
            Some(text) => Ok(text),
            None => by_kind(Target::Text, v, &text_by_kind),
        },
        _ => by_kind(Target::Text, v, &text_by_kind),
    }
}

fn text_by_kind(s: Scalar<'_>) -> Result<String, CastError> {
    Ok(match s {
        Scalar::Nil => String::new(),
        Scalar::Bool(b) => b.to_string(),
        Scalar::Text(t) => t.to_string(),
        Scalar::Int(i) => i.to_string(),
        Scalar::Uint(u) => u.to_string(),
        Scalar::Float { value, single: true } => format_float32(value as f32),
        Scalar::Float { value, single: false } => format_float(value),
    })
}

/// Convert to a duration.
///
/// Integers count milliseconds, floats count seconds. Text ending in a
/// digit counts milliseconds too; anything else must be a duration literal.
pub fn to_duration(v: &Value<'_>) -> Result<TimeDelta, CastError> {
    match v {
        Value::Pointer(Some(inner)) | Value::Interface(Some(inner)) => to_duration(inner),
        Value::Bytes(b) => parse_duration(&lossy(b)),
        Value::Duration(d) => Ok(*d),
        Value::Bool(_) | Value::Timestamp(_) => {
            Err(CastError::unsupported(Target::Duration, v.type_name()))
        }
        Value::Dynamic(obj) => {
            if let Some(d) = obj.as_duration() {
                return Ok(d);
            }
            if let Some(text) = obj.render() {
                return parse_duration(&text);
            }
            by_kind(Target::Duration, v, &duration_by_kind)
        }
        _ => by_kind(Target::Duration, v, &duration_by_kind),
    }
}

fn duration_by_kind(s: Scalar<'_>) -> Result<TimeDelta, CastError> {
    let millis = |ms: i64| {
        TimeDelta::try_milliseconds(ms)
            .ok_or_else(|| CastError::range(format!("{ms}ms is out of the duration range")))
    };
    match s {
        Scalar::Nil => Ok(TimeDelta::zero()),
        Scalar::Bool(_) => Err(CastError::unsupported(Target::Duration, "bool")),
        Scalar::Text(t) => parse_duration(t),
        Scalar::Int(i) => millis(i),
        Scalar::Uint(u) => {
            let ms = i64::try_from(u)
                .map_err(|_| CastError::range(format!("{u}ms is out of the duration range")))?;
            millis(ms)
        }
        Scalar::Float { value, .. } => Ok(TimeDelta::nanoseconds((value * 1e9) as i64)),
    }
}

/// Convert to a timestamp in `loc` (the provider's location when `None`).
///
/// Numbers are Unix seconds, text goes through [`try_parse_time`] with
/// `layouts` (the provider's list when empty). Every result is viewed in the
/// location, except timestamps handed out by a `Dynamic` time accessor,
/// which are returned as they are.
pub fn to_time_in(
    v: &Value<'_>,
    loc: Option<Tz>,
    layouts: &[Layout],
    defaults: &dyn TimeDefaults,
) -> Result<DateTime<Tz>, CastError> {
    let loc = loc.unwrap_or_else(|| defaults.location());
    time_in(v, loc, layouts, defaults)
}

fn time_in(
    v: &Value<'_>,
    loc: Tz,
    layouts: &[Layout],
    defaults: &dyn TimeDefaults,
) -> Result<DateTime<Tz>, CastError> {
    let by_kind_in = |s: Scalar<'_>| match s {
        Scalar::Nil => Ok(zero_time(loc)),
        Scalar::Bool(_) => Err(CastError::unsupported(Target::Timestamp, "bool")),
        Scalar::Text(t) => try_parse_time(t, Some(loc), layouts, defaults),
        Scalar::Int(i) => from_epoch(i, loc),
        Scalar::Uint(u) => from_epoch(u as i64, loc),
        Scalar::Float { value, .. } => from_epoch(value as i64, loc),
    };

    match v {
        Value::Pointer(Some(inner)) | Value::Interface(Some(inner)) => {
            time_in(inner, loc, layouts, defaults)
        }
        Value::Bytes(b) => try_parse_time(&lossy(b), Some(loc), layouts, defaults),
        Value::Timestamp(t) => Ok(t.with_timezone(&loc)),
        Value::Duration(_) => Err(CastError::unsupported(Target::Timestamp, v.type_name())),
        Value::Dynamic(obj) => {
            if let Some(t) = obj.as_time() {
                return Ok(t);
            }
            if let Some(text) = obj.render() {
                return try_parse_time(&text, Some(loc), layouts, defaults);
            }
            by_kind(Target::Timestamp, v, &by_kind_in)
        }
        _ => by_kind(Target::Timestamp, v, &by_kind_in),
    }
}

/// [`to_time_in`] with the provider's location and layouts.
pub fn to_time(v: &Value<'_>, defaults: &dyn TimeDefaults) -> Result<DateTime<Tz>, CastError> {
    to_time_in(v, None, &[], defaults)
}
