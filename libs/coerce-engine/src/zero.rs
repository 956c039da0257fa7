use coerce_api::layout::is_zero_time;
use coerce_api::{CastError, Value};

/// Zero-ness of a 32-bit float pattern, ignoring the sign bit.
fn zero_bits32(x: f32) -> bool {
    x.to_bits() << 1 == 0
}

/// Zero-ness of a 64-bit float pattern, ignoring the sign bit.
fn zero_bits64(x: f64) -> bool {
    x.to_bits() << 1 == 0
}

/// Whether `v` is the zero value of its type.
///
/// Scalars compare against zero (floats by bit pattern, so `-0.0` is zero and
/// NaN is not). Arrays and records are zero when every element is. Slices,
/// maps, pointers, interfaces and handles are zero only when nil; their
/// contents are not inspected.
///
/// A `Dynamic` object that answers neither `is_zero()` nor `structure()` is
/// an invariant violation reported as `ErrorKind::Fatal`.
pub fn is_zero(v: &Value<'_>) -> Result<bool, CastError> {
    Ok(match v {
        Value::Null => true,
        Value::Bool(b) => !*b,
        Value::String(s) => s.is_empty(),
        Value::Int(i) => *i == 0,
        Value::Int8(i) => *i == 0,
        Value::Int16(i) => *i == 0,
        Value::Int32(i) => *i == 0,
        Value::Int64(i) => *i == 0,
        Value::UInt(u) => *u == 0,
        Value::UInt8(u) => *u == 0,
        Value::UInt16(u) => *u == 0,
        Value::UInt32(u) => *u == 0,
        Value::UInt64(u) => *u == 0,
        Value::Float32(x) => zero_bits32(*x),
        Value::Float64(x) => zero_bits64(*x),
        Value::Complex64(re, im) => zero_bits32(*re) && zero_bits32(*im),
        Value::Complex128(re, im) => zero_bits64(*re) && zero_bits64(*im),
        // a byte buffer is never nil
        Value::Bytes(_) => false,
        Value::Duration(d) => d.is_zero(),
        Value::Timestamp(t) => is_zero_time(t),
        Value::Error(_) => false,
        Value::Array(items) => all_zero(items.iter())?,
        Value::Record { fields, .. } => all_zero(fields.iter().map(|(_, v)| v))?,
        Value::Slice(items) => items.is_none(),
        Value::Map(entries) => entries.is_none(),
        Value::Pointer(inner) | Value::Interface(inner) => inner.is_none(),
        Value::Handle { is_nil, .. } => *is_nil,
        Value::Dynamic(obj) => {
            if let Some(zero) = obj.is_zero() {
                return Ok(zero);
            }
            match obj.structure() {
                Some(inner) => return is_zero(&inner),
                None => {
                    tracing::error!(type_name = obj.type_name(), "zero check on an opaque value");
                    return Err(CastError::fatal(format!(
                        "is_zero: {} exposes neither is_zero nor structure",
                        obj.type_name()
                    )));
                }
            }
        }
    })
}

fn all_zero<'v, 'a: 'v>(items: impl Iterator<Item = &'v Value<'a>>) -> Result<bool, CastError> {
    for item in items {
        if !is_zero(item)? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Like [`is_zero`], except that arrays, slices, maps, strings and byte
/// buffers are empty when they hold nothing, nil or not.
pub fn is_empty(v: &Value<'_>) -> Result<bool, CastError> {
    match v {
        Value::Array(items) => Ok(items.is_empty()),
        Value::Slice(items) => Ok(items.as_ref().is_none_or(Vec::is_empty)),
        Value::Map(entries) => Ok(entries.as_ref().is_none_or(Vec::is_empty)),
        Value::Bytes(b) => Ok(b.is_empty()),
        Value::Dynamic(obj) => match obj.structure() {
            Some(inner) => is_empty(&inner),
            None => is_zero(v),
        },
        _ => is_zero(v),
    }
}
