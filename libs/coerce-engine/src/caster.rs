use std::sync::{Arc, OnceLock};

use chrono::{DateTime, TimeDelta};
use chrono_tz::Tz;
use coerce_api::{CastError, Layout, Target, TimeDefaults, Value};

use crate::config::{CastConfig, StaticDefaults};
use crate::error::EngineError;
use crate::hooks::Hooks;
use crate::pure;
use crate::time::try_parse_time;

/// Composition root: a hook bundle plus the time defaults.
///
/// Every `to_*` method calls the hook of its target when one is set and the
/// pure converter otherwise. Cheap to clone.
#[derive(Clone)]
pub struct Caster {
    hooks: Hooks,
    defaults: Arc<dyn TimeDefaults>,
}

impl Default for Caster {
    fn default() -> Self {
        Self::new(Hooks::default(), StaticDefaults::default())
    }
}

impl std::fmt::Debug for Caster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Caster")
            .field("hooks", &self.hooks)
            .field("location", &self.defaults.location())
            .finish_non_exhaustive()
    }
}

impl Caster {
    pub fn new(hooks: Hooks, defaults: impl TimeDefaults + 'static) -> Self {
        Self { hooks, defaults: Arc::new(defaults) }
    }

    /// Share a defaults provider with other owners.
    pub fn with_shared_defaults(hooks: Hooks, defaults: Arc<dyn TimeDefaults>) -> Self {
        Self { hooks, defaults }
    }

    /// Build from configuration. Fails on an unknown zone name.
    pub fn from_config(config: CastConfig, hooks: Hooks) -> Result<Self, EngineError> {
        Ok(Self::new(hooks, config.into_defaults()?))
    }

    pub fn hooks(&self) -> &Hooks {
        &self.hooks
    }

    pub fn defaults(&self) -> &dyn TimeDefaults {
        &*self.defaults
    }

    pub fn to_bool(&self, v: &Value<'_>) -> Result<bool, CastError> {
        match &self.hooks.bool {
            Some(hook) => {
                tracing::trace!(target_type = %Target::Bool, "dispatching to hook");
                hook(v)
            }
            None => pure::to_bool(v),
        }
    }

    pub fn to_i64(&self, v: &Value<'_>) -> Result<i64, CastError> {
        match &self.hooks.int64 {
            Some(hook) => {
                tracing::trace!(target_type = %Target::Int64, "dispatching to hook");
                hook(v)
            }
            None => pure::to_i64(v),
        }
    }

    pub fn to_u64(&self, v: &Value<'_>) -> Result<u64, CastError> {
        match &self.hooks.uint64 {
            Some(hook) => {
                tracing::trace!(target_type = %Target::Uint64, "dispatching to hook");
                hook(v)
            }
            None => pure::to_u64(v),
        }
    }

    pub fn to_f64(&self, v: &Value<'_>) -> Result<f64, CastError> {
        match &self.hooks.float64 {
            Some(hook) => {
                tracing::trace!(target_type = %Target::Float64, "dispatching to hook");
                hook(v)
            }
            None => pure::to_f64(v),
        }
    }

    pub fn to_text(&self, v: &Value<'_>) -> Result<String, CastError> {
        match &self.hooks.text {
            Some(hook) => {
                tracing::trace!(target_type = %Target::Text, "dispatching to hook");
                hook(v)
            }
            None => pure::to_text(v),
        }
    }

    pub fn to_duration(&self, v: &Value<'_>) -> Result<TimeDelta, CastError> {
        match &self.hooks.duration {
            Some(hook) => {
                tracing::trace!(target_type = %Target::Duration, "dispatching to hook");
                hook(v)
            }
            None => pure::to_duration(v),
        }
    }

    /// Timestamp in `loc`, parsing text with `layouts`.
    ///
    /// `None` and an empty slice stand for the defaults.
    pub fn to_time_in(
        &self,
        v: &Value<'_>,
        loc: Option<Tz>,
        layouts: &[Layout],
    ) -> Result<DateTime<Tz>, CastError> {
        match &self.hooks.time {
            Some(hook) => {
                tracing::trace!(target_type = %Target::Timestamp, "dispatching to hook");
                let loc = loc.unwrap_or_else(|| self.defaults.location());
                if layouts.is_empty() {
                    hook(v, loc, &self.defaults.layouts())
                } else {
                    hook(v, loc, layouts)
                }
            }
            None => pure::to_time_in(v, loc, layouts, &*self.defaults),
        }
    }

    pub fn to_time(&self, v: &Value<'_>) -> Result<DateTime<Tz>, CastError> {
        self.to_time_in(v, None, &[])
    }

    /// Parse text directly, bypassing the time hook.
    pub fn parse_time(
        &self,
        value: &str,
        loc: Option<Tz>,
        layouts: &[Layout],
    ) -> Result<DateTime<Tz>, CastError> {
        try_parse_time(value, loc, layouts, &*self.defaults)
    }

    /// Like [`Caster::to_time_in`], panicking on error.
    pub fn must_to_time_in(
        &self,
        v: &Value<'_>,
        loc: Option<Tz>,
        layouts: &[Layout],
    ) -> DateTime<Tz> {
        must(self.to_time_in(v, loc, layouts))
    }

    /// Like [`Caster::parse_time`], panicking on error.
    pub fn must_parse_time(
        &self,
        value: &str,
        loc: Option<Tz>,
        layouts: &[Layout],
    ) -> DateTime<Tz> {
        must(self.parse_time(value, loc, layouts))
    }
}

/// Unwrap a result whose failure is a bug at the call site.
///
/// # Panics
///
/// Panics with the error message when `result` is an error.
#[track_caller]
pub fn must<T, E: std::fmt::Display>(result: Result<T, E>) -> T {
    match result {
        Ok(v) => v,
        Err(e) => panic!("{e}"),
    }
}

static GLOBAL: OnceLock<Caster> = OnceLock::new();

/// Install the process-wide caster used by the free functions.
///
/// Meant for single-threaded start-up. Fails when a caster was already
/// installed, or when a free function already ran with the default one.
pub fn install(caster: Caster) -> Result<(), EngineError> {
    let summary = format!("{caster:?}");
    GLOBAL.set(caster).map_err(|_| {
        EngineError::Config("a process-wide caster is already installed".to_string())
    })?;
    tracing::info!(caster = %summary, "installed process-wide caster");
    Ok(())
}

/// The installed caster, or the default one when none was installed.
pub fn global() -> &'static Caster {
    GLOBAL.get_or_init(Caster::default)
}

pub fn to_bool(v: &Value<'_>) -> Result<bool, CastError> {
    global().to_bool(v)
}

pub fn to_i64(v: &Value<'_>) -> Result<i64, CastError> {
    global().to_i64(v)
}

pub fn to_u64(v: &Value<'_>) -> Result<u64, CastError> {
    global().to_u64(v)
}

pub fn to_f64(v: &Value<'_>) -> Result<f64, CastError> {
    global().to_f64(v)
}

pub fn to_text(v: &Value<'_>) -> Result<String, CastError> {
    global().to_text(v)
}

pub fn to_duration(v: &Value<'_>) -> Result<TimeDelta, CastError> {
    global().to_duration(v)
}

pub fn to_time_in(
    v: &Value<'_>,
    loc: Option<Tz>,
    layouts: &[Layout],
) -> Result<DateTime<Tz>, CastError> {
    global().to_time_in(v, loc, layouts)
}

pub fn to_time(v: &Value<'_>) -> Result<DateTime<Tz>, CastError> {
    global().to_time(v)
}

pub fn parse_time(
    value: &str,
    loc: Option<Tz>,
    layouts: &[Layout],
) -> Result<DateTime<Tz>, CastError> {
    global().parse_time(value, loc, layouts)
}

pub fn must_to_time_in(v: &Value<'_>, loc: Option<Tz>, layouts: &[Layout]) -> DateTime<Tz> {
    global().must_to_time_in(v, loc, layouts)
}

pub fn must_parse_time(value: &str, loc: Option<Tz>, layouts: &[Layout]) -> DateTime<Tz> {
    global().must_parse_time(value, loc, layouts)
}
