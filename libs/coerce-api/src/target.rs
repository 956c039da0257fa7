use std::fmt;

/// Canonical conversion target. Fixed, closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Bool,
    Int64,
    Uint64,
    Float64,
    Text,
    Duration,
    Timestamp,
}

impl Target {
    pub const ALL: [Target; 7] = [
        Target::Bool,
        Target::Int64,
        Target::Uint64,
        Target::Float64,
        Target::Text,
        Target::Duration,
        Target::Timestamp,
    ];

    /// Rust type the target converts into, as shown in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Target::Bool => "bool",
            Target::Int64 => "i64",
            Target::Uint64 => "u64",
            Target::Float64 => "f64",
            Target::Text => "String",
            Target::Duration => "TimeDelta",
            Target::Timestamp => "DateTime<Tz>",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Bool => f.write_str("to_bool"),
            Target::Int64 => f.write_str("to_i64"),
            Target::Uint64 => f.write_str("to_u64"),
            Target::Float64 => f.write_str("to_f64"),
            Target::Text => f.write_str("to_text"),
            Target::Duration => f.write_str("to_duration"),
            Target::Timestamp => f.write_str("to_time"),
        }
    }
}
