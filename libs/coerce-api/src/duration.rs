//! Integer-backed duration.
//!
//! [`DurationNs`] stores a duration as a plain `i64` count of nanoseconds,
//! the way many wire formats and database columns keep it at rest. As a
//! setter destination it is still coerced with duration semantics:
//! `"1s"` becomes one second, not `1`.

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use crate::value::{AsValue, Value};

/// Duration in nanoseconds with a plain integer representation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct DurationNs(pub i64);

impl DurationNs {
    pub const ZERO: Self = Self(0);

    pub fn from_nanos(ns: i64) -> Self {
        Self(ns)
    }

    pub fn as_nanos(&self) -> i64 {
        self.0
    }

    pub fn to_delta(&self) -> TimeDelta {
        TimeDelta::nanoseconds(self.0)
    }

    /// `None` when `d` does not fit in 64 bits of nanoseconds (about 292 years).
    pub fn from_delta(d: TimeDelta) -> Option<Self> {
        d.num_nanoseconds().map(Self)
    }
}

impl From<DurationNs> for TimeDelta {
    fn from(d: DurationNs) -> Self {
        d.to_delta()
    }
}

impl std::fmt::Display for DurationNs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}ns", self.0)
    }
}

impl AsValue for DurationNs {
    fn as_value(&self) -> Value<'_> {
        Value::Duration(self.to_delta())
    }
}
