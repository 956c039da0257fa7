use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, TimeDelta};
use chrono_tz::Tz;
use coerce_api::{CastError, Layout, Target, Value};

/// Override for one target. Its result is returned as is.
pub type Hook<T> = Arc<dyn Fn(&Value<'_>) -> Result<T, CastError> + Send + Sync>;

/// Override for timestamps. Receives the resolved location and the layout
/// list, already replaced by the defaults when the caller gave none.
pub type TimeHook =
    Arc<dyn Fn(&Value<'_>, Tz, &[Layout]) -> Result<DateTime<Tz>, CastError> + Send + Sync>;

/// Immutable set of conversion overrides, one optional hook per target.
///
/// A hook fully replaces the pure converter of its target: no chaining and
/// no fallback when it fails.
///
/// ```ignore
/// let hooks = Hooks::new().with_bool(|v| match v {
///     Value::String(s) if s.eq_ignore_ascii_case("yes") => Ok(true),
///     other => coerce_engine::pure::to_bool(other),
/// });
/// ```
#[derive(Clone, Default)]
pub struct Hooks {
    pub(crate) bool: Option<Hook<bool>>,
    pub(crate) int64: Option<Hook<i64>>,
    pub(crate) uint64: Option<Hook<u64>>,
    pub(crate) float64: Option<Hook<f64>>,
    pub(crate) text: Option<Hook<String>>,
    pub(crate) duration: Option<Hook<TimeDelta>>,
    pub(crate) time: Option<TimeHook>,
}

impl Hooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bool<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value<'_>) -> Result<bool, CastError> + Send + Sync + 'static,
    {
        self.bool = Some(Arc::new(f));
        self
    }

    pub fn with_int64<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value<'_>) -> Result<i64, CastError> + Send + Sync + 'static,
    {
        self.int64 = Some(Arc::new(f));
        self
    }

    pub fn with_uint64<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value<'_>) -> Result<u64, CastError> + Send + Sync + 'static,
    {
        self.uint64 = Some(Arc::new(f));
        self
    }

    pub fn with_float64<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value<'_>) -> Result<f64, CastError> + Send + Sync + 'static,
    {
        self.float64 = Some(Arc::new(f));
        self
    }

    pub fn with_text<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value<'_>) -> Result<String, CastError> + Send + Sync + 'static,
    {
        self.text = Some(Arc::new(f));
        self
    }

    pub fn with_duration<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value<'_>) -> Result<TimeDelta, CastError> + Send + Sync + 'static,
    {
        self.duration = Some(Arc::new(f));
        self
    }

    pub fn with_time<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value<'_>, Tz, &[Layout]) -> Result<DateTime<Tz>, CastError> + Send + Sync + 'static,
    {
        self.time = Some(Arc::new(f));
        self
    }

    /// Whether a hook overrides `target`.
    pub fn is_set(&self, target: Target) -> bool {
        match target {
            Target::Bool => self.bool.is_some(),
            Target::Int64 => self.int64.is_some(),
            Target::Uint64 => self.uint64.is_some(),
            Target::Float64 => self.float64.is_some(),
            Target::Text => self.text.is_some(),
            Target::Duration => self.duration.is_some(),
            Target::Timestamp => self.time.is_some(),
        }
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(Target::ALL.iter().filter(|t| self.is_set(**t)))
            .finish()
    }
}
