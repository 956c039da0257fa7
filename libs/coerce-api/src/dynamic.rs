use std::fmt;

use chrono::{DateTime, TimeDelta};
use chrono_tz::Tz;

use crate::value::Value;

/// Capabilities of an object the converters do not know natively.
///
/// Every capability is optional. Converters consult the ones relevant to
/// their target in a fixed order and, when none applies, fall back to
/// [`Dynamic::structure`]. An object returning `None` everywhere is
/// unsupported by every converter.
///
/// ```ignore
/// struct Celsius(f64);
///
/// impl Dynamic for Celsius {
///     fn type_name(&self) -> &str { "Celsius" }
///     fn as_f64(&self) -> Option<f64> { Some(self.0) }
///     fn render(&self) -> Option<String> { Some(format!("{}°C", self.0)) }
/// }
/// ```
pub trait Dynamic {
    /// Name shown in error messages.
    fn type_name(&self) -> &str;

    /// Boolean accessor.
    fn as_bool(&self) -> Option<bool> {
        None
    }

    /// Zero-ness as the object defines it. Converting to bool yields its negation.
    fn is_zero(&self) -> Option<bool> {
        None
    }

    fn as_i64(&self) -> Option<i64> {
        None
    }

    fn as_u64(&self) -> Option<u64> {
        None
    }

    fn as_f64(&self) -> Option<f64> {
        None
    }

    fn as_duration(&self) -> Option<TimeDelta> {
        None
    }

    /// Timestamp accessor. Converters return it unchanged, without
    /// re-normalizing its zone.
    fn as_time(&self) -> Option<DateTime<Tz>> {
        None
    }

    /// Text rendering. Converters parse it with the target's literal grammar.
    fn render(&self) -> Option<String> {
        None
    }

    /// Underlying structural value, used when no capability applies.
    fn structure(&self) -> Option<Value<'_>> {
        None
    }
}

impl fmt::Debug for dyn Dynamic + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Dynamic({})", self.type_name())
    }
}
