use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, TimeDelta};
use chrono_tz::Tz;

use crate::dynamic::Dynamic;

/// Canonical dynamic value representation.
///
/// Every source shape a converter understands is one variant. Shapes the
/// converters do not know natively enter as `Dynamic` and are resolved
/// through capabilities, then through their structural form.
///
/// Strategy by type:
/// - Scalars: stored by width, narrowing/widening happens in the converter
/// - String, Bytes: `Cow` (zero-copy when possible)
/// - Containers: `None` is the nil sentinel, `Some(vec![])` is empty but set
/// - Record, Array: recursive, elements held by value
#[derive(Debug, Clone)]
pub enum Value<'a> {
    /// Absent value.
    Null,
    Bool(bool),
    Int(isize),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    UInt(usize),
    UInt8(u8),
    UInt16(u16),
    UInt32(u32),
    UInt64(u64),
    Float32(f32),
    Float64(f64),
    /// `(re, im)`.
    Complex64(f32, f32),
    /// `(re, im)`.
    Complex128(f64, f64),

    String(Cow<'a, str>),
    /// Raw byte buffer, not necessarily UTF-8.
    Bytes(Cow<'a, [u8]>),

    Duration(TimeDelta),
    Timestamp(DateTime<Tz>),
    Error(&'a (dyn std::error::Error + 'a)),

    /// Fixed-size sequence.
    Array(Vec<Value<'a>>),
    /// Dynamic sequence. `None` = nil.
    Slice(Option<Vec<Value<'a>>>),
    /// Mapping. `None` = nil.
    Map(Option<Vec<(Value<'a>, Value<'a>)>>),
    /// Composite with named fields, in declaration order.
    Record {
        name: &'a str,
        fields: Vec<(&'a str, Value<'a>)>,
    },

    /// One level of indirection. `None` = nil.
    Pointer(Option<Box<Value<'a>>>),
    /// Dynamically-typed wrapper. `None` = nil.
    Interface(Option<Box<Value<'a>>>),
    /// Function, channel or raw pointer. Contents are never inspected.
    Handle { kind: HandleKind, is_nil: bool },

    /// Object exposing capabilities.
    Dynamic(&'a dyn Dynamic),
}

/// Opaque handle flavours carried by `Value::Handle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleKind {
    Function,
    Channel,
    RawPointer,
}

impl<'a> Value<'a> {
    /// Wrap a capability object.
    pub fn dynamic(obj: &'a dyn Dynamic) -> Self {
        Value::Dynamic(obj)
    }

    /// Wrap a borrowed error.
    pub fn error(err: &'a (dyn std::error::Error + 'a)) -> Self {
        Value::Error(err)
    }

    /// Non-nil pointer to `inner`.
    pub fn pointer(inner: Value<'a>) -> Self {
        Value::Pointer(Some(Box::new(inner)))
    }

    /// Type name used in error messages.
    pub fn type_name(&self) -> Cow<'a, str> {
        let name = match self {
            Value::Null => "nil",
            Value::Bool(_) => "bool",
            Value::Int(_) => "isize",
            Value::Int8(_) => "i8",
            Value::Int16(_) => "i16",
            Value::Int32(_) => "i32",
            Value::Int64(_) => "i64",
            Value::UInt(_) => "usize",
            Value::UInt8(_) => "u8",
            Value::UInt16(_) => "u16",
            Value::UInt32(_) => "u32",
            Value::UInt64(_) => "u64",
            Value::Float32(_) => "f32",
            Value::Float64(_) => "f64",
            Value::Complex64(..) => "complex64",
            Value::Complex128(..) => "complex128",
            Value::String(_) => "str",
            Value::Bytes(_) => "[u8]",
            Value::Duration(_) => "TimeDelta",
            Value::Timestamp(_) => "DateTime<Tz>",
            Value::Error(_) => "error",
            Value::Array(items) => return Cow::Owned(format!("[_; {}]", items.len())),
            Value::Slice(_) => "slice",
            Value::Map(_) => "map",
            Value::Record { name, .. } => return Cow::Borrowed(*name),
            Value::Pointer(Some(inner)) => return Cow::Owned(format!("*{}", inner.type_name())),
            Value::Pointer(None) => "*nil",
            Value::Interface(_) => "interface",
            Value::Handle { kind, .. } => match kind {
                HandleKind::Function => "fn",
                HandleKind::Channel => "channel",
                HandleKind::RawPointer => "raw pointer",
            },
            Value::Dynamic(obj) => {
                let obj: &'a dyn Dynamic = *obj;
                return Cow::Borrowed(obj.type_name());
            }
        };
        Cow::Borrowed(name)
    }
}

// ---------------------------------------------------------------------------
// From impls: Rust scalars → Value
// ---------------------------------------------------------------------------

macro_rules! scalar_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value<'_> {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }

            impl AsValue for $ty {
                fn as_value(&self) -> Value<'_> {
                    Value::$variant(*self)
                }
            }
        )*
    };
}

scalar_from! {
    bool => Bool,
    isize => Int,
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    usize => UInt,
    u8 => UInt8,
    u16 => UInt16,
    u32 => UInt32,
    u64 => UInt64,
    f32 => Float32,
    f64 => Float64,
    TimeDelta => Duration,
    DateTime<Tz> => Timestamp,
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(s: &'a str) -> Self {
        Value::String(Cow::Borrowed(s))
    }
}

impl<'a> From<&'a String> for Value<'a> {
    fn from(s: &'a String) -> Self {
        Value::String(Cow::Borrowed(s.as_str()))
    }
}

impl From<String> for Value<'_> {
    fn from(s: String) -> Self {
        Value::String(Cow::Owned(s))
    }
}

impl<'a> From<&'a [u8]> for Value<'a> {
    fn from(b: &'a [u8]) -> Self {
        Value::Bytes(Cow::Borrowed(b))
    }
}

impl From<Vec<u8>> for Value<'_> {
    fn from(b: Vec<u8>) -> Self {
        Value::Bytes(Cow::Owned(b))
    }
}

impl<'a, T: Into<Value<'a>>> From<Option<T>> for Value<'a> {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// JSON documents map onto the value model: numbers keep their integer-ness,
/// arrays become slices and objects become maps keyed by strings.
impl<'a> From<&'a serde_json::Value> for Value<'a> {
    fn from(v: &'a serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int64(i)
                } else if let Some(u) = n.as_u64() {
                    Value::UInt64(u)
                } else {
                    Value::Float64(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Value::String(Cow::Borrowed(s.as_str())),
            serde_json::Value::Array(items) => {
                Value::Slice(Some(items.iter().map(Value::from).collect()))
            }
            serde_json::Value::Object(map) => Value::Map(Some(
                map.iter()
                    .map(|(k, v)| (Value::String(Cow::Borrowed(k.as_str())), Value::from(v)))
                    .collect(),
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// AsValue: borrowed view of Rust data as a Value
// ---------------------------------------------------------------------------

/// Borrowed view of a Rust value as a [`Value`].
///
/// Implemented for scalars, text, chrono types, containers, `Option`
/// (as a nullable pointer) and `Box`. Records get it from
/// `#[derive(AsValue)]`.
pub trait AsValue {
    fn as_value(&self) -> Value<'_>;
}

impl AsValue for str {
    fn as_value(&self) -> Value<'_> {
        Value::String(Cow::Borrowed(self))
    }
}

impl AsValue for String {
    fn as_value(&self) -> Value<'_> {
        Value::String(Cow::Borrowed(self.as_str()))
    }
}

impl AsValue for Value<'_> {
    fn as_value(&self) -> Value<'_> {
        self.clone()
    }
}

impl<T: AsValue + ?Sized> AsValue for &T {
    fn as_value(&self) -> Value<'_> {
        (**self).as_value()
    }
}

impl<T: AsValue + ?Sized> AsValue for Box<T> {
    fn as_value(&self) -> Value<'_> {
        (**self).as_value()
    }
}

impl<T: AsValue> AsValue for Option<T> {
    fn as_value(&self) -> Value<'_> {
        Value::Pointer(self.as_ref().map(|v| Box::new(v.as_value())))
    }
}

impl<T: AsValue> AsValue for Vec<T> {
    fn as_value(&self) -> Value<'_> {
        Value::Slice(Some(self.iter().map(AsValue::as_value).collect()))
    }
}

impl<T: AsValue, const N: usize> AsValue for [T; N] {
    fn as_value(&self) -> Value<'_> {
        Value::Array(self.iter().map(AsValue::as_value).collect())
    }
}

impl<K: AsValue, V: AsValue, S> AsValue for HashMap<K, V, S> {
    fn as_value(&self) -> Value<'_> {
        let entries = self.iter().map(|(k, v)| (k.as_value(), v.as_value()));
        Value::Map(Some(entries.collect()))
    }
}

impl<K: AsValue, V: AsValue> AsValue for BTreeMap<K, V> {
    fn as_value(&self) -> Value<'_> {
        let entries = self.iter().map(|(k, v)| (k.as_value(), v.as_value()));
        Value::Map(Some(entries.collect()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_is_nullable_pointer() {
        let none: Option<i32> = None;
        assert!(matches!(none.as_value(), Value::Pointer(None)));
        assert!(matches!(Some(3i32).as_value(), Value::Pointer(Some(_))));
        assert!(matches!(Value::from(none), Value::Null));
    }

    #[test]
    fn json_numbers_keep_integer_shape() {
        let doc = serde_json::json!({"a": 1, "b": 1.5, "c": u64::MAX, "d": [true]});
        let Value::Map(Some(entries)) = Value::from(&doc) else {
            panic!("expected map");
        };
        assert!(matches!(entries[0].1, Value::Int64(1)));
        assert!(matches!(entries[1].1, Value::Float64(x) if x == 1.5));
        assert!(matches!(entries[2].1, Value::UInt64(u64::MAX)));
        assert!(matches!(entries[3].1, Value::Slice(Some(ref items)) if items.len() == 1));
    }

    #[test]
    fn type_names() {
        assert_eq!(Value::pointer(Value::Int8(1)).type_name(), "*i8");
        assert_eq!([1u8, 2, 3].as_value().type_name(), "[_; 3]");
        let rec = Value::Record {
            name: "Point",
            fields: vec![],
        };
        assert_eq!(rec.type_name(), "Point");
    }
}
