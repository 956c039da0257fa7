use chrono::{DateTime, TimeDelta};
use chrono_tz::Tz;

use crate::duration::DurationNs;
use crate::error::CastError;
use crate::value::Value;

/// Custom assignment contract: the object accepts a dynamic value itself.
///
/// Takes precedence over any structural handling of the object.
pub trait Assign {
    fn assign(&mut self, src: &Value<'_>) -> Result<(), CastError>;
}

/// Database-style scan contract.
pub trait Scan {
    fn scan(&mut self, src: &Value<'_>) -> Result<(), CastError>;
}

/// Typed writable destination for the setter.
///
/// Scalar variants are written with the hook-aware converter of their
/// target followed by a narrowing/widening cast (`as` semantics).
pub enum Slot<'a> {
    Bool(&'a mut bool),
    String(&'a mut String),
    F32(&'a mut f32),
    F64(&'a mut f64),
    Isize(&'a mut isize),
    I8(&'a mut i8),
    I16(&'a mut i16),
    I32(&'a mut i32),
    I64(&'a mut i64),
    Usize(&'a mut usize),
    U8(&'a mut u8),
    U16(&'a mut u16),
    U32(&'a mut u32),
    U64(&'a mut u64),
    Duration(&'a mut TimeDelta),
    /// Duration kept as an integer count of nanoseconds.
    Nanos(&'a mut i64),
    Timestamp(&'a mut DateTime<Tz>),
    /// Generic settable handle, resolved at call time.
    Handle(&'a mut dyn Settable),
    Assign(&'a mut dyn Assign),
    Scan(&'a mut dyn Scan),
}

impl Slot<'_> {
    /// Destination name used in error messages.
    pub fn type_name(&self) -> &str {
        match self {
            Slot::Bool(_) => "bool",
            Slot::String(_) => "String",
            Slot::F32(_) => "f32",
            Slot::F64(_) => "f64",
            Slot::Isize(_) => "isize",
            Slot::I8(_) => "i8",
            Slot::I16(_) => "i16",
            Slot::I32(_) => "i32",
            Slot::I64(_) => "i64",
            Slot::Usize(_) => "usize",
            Slot::U8(_) => "u8",
            Slot::U16(_) => "u16",
            Slot::U32(_) => "u32",
            Slot::U64(_) => "u64",
            Slot::Duration(_) => "TimeDelta",
            Slot::Nanos(_) => "DurationNs",
            Slot::Timestamp(_) => "DateTime<Tz>",
            Slot::Handle(h) => h.type_name(),
            Slot::Assign(_) => "dyn Assign",
            Slot::Scan(_) => "dyn Scan",
        }
    }
}

/// Outcome of resolving a generic handle.
pub enum Resolve<'a> {
    /// Directly writable.
    Slot(Slot<'a>),
    /// One level of indirection. `None` when nothing writable sits behind it.
    Indirect(Option<&'a mut dyn Settable>),
    /// The handle's type cannot be written by the setter.
    Unsupported,
}

/// Generic settable handle.
///
/// Implemented for every scalar destination, `String`, the chrono types,
/// [`DurationNs`], and for `Box<T>` / `Option<T>` as one level of
/// indirection. Types with their own assignment logic implement it by
/// returning `Resolve::Slot(Slot::Assign(self))` or `Slot::Scan(self)`.
pub trait Settable {
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    fn resolve(&mut self) -> Resolve<'_>;
}

macro_rules! slot_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl<'a> From<&'a mut $ty> for Slot<'a> {
                fn from(v: &'a mut $ty) -> Self {
                    Slot::$variant(v)
                }
            }

            impl Settable for $ty {
                fn resolve(&mut self) -> Resolve<'_> {
                    Resolve::Slot(Slot::$variant(self))
                }
            }
        )*
    };
}

slot_from! {
    bool => Bool,
    String => String,
    f32 => F32,
    f64 => F64,
    isize => Isize,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    usize => Usize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    TimeDelta => Duration,
    DateTime<Tz> => Timestamp,
}

impl<'a> From<&'a mut DurationNs> for Slot<'a> {
    fn from(v: &'a mut DurationNs) -> Self {
        Slot::Nanos(&mut v.0)
    }
}

impl Settable for DurationNs {
    fn resolve(&mut self) -> Resolve<'_> {
        Resolve::Slot(Slot::Nanos(&mut self.0))
    }
}

impl<T: Settable> Settable for Box<T> {
    fn resolve(&mut self) -> Resolve<'_> {
        Resolve::Indirect(Some(&mut **self))
    }
}

impl<T: Settable> Settable for Option<T> {
    fn resolve(&mut self) -> Resolve<'_> {
        Resolve::Indirect(self.as_mut().map(|v| v as &mut dyn Settable))
    }
}
