pub mod caster;
pub mod config;
pub mod error;
pub mod hooks;
pub mod literal;
pub mod pure;
pub mod setter;
pub mod time;
pub mod zero;

pub use caster::{
    Caster, global, install, must, must_parse_time, must_to_time_in, parse_time, to_bool,
    to_duration, to_f64, to_i64, to_text, to_time, to_time_in, to_u64,
};
pub use config::{CastConfig, ConfigParser, StaticDefaults, TomlParser};
pub use error::EngineError;
pub use hooks::{Hook, Hooks, TimeHook};
pub use setter::{set, set_into};
pub use time::try_parse_time;
pub use zero::{is_empty, is_zero};
