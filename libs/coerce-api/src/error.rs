use std::fmt;

use crate::target::Target;

/// Category of a cast error. Lets callers tell recoverable input problems
/// apart from configuration invariant violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Text did not match the literal grammar of the target.
    Parse,
    /// Value outside the range of the target (negative into unsigned, epoch overflow).
    Range,
    /// Every known shape and the structural fallback were exhausted.
    Unsupported,
    /// None of the candidate layouts matched.
    Time,
    /// Destination cannot be written or is of an unsupported type.
    Destination,
    /// Raised by a hook, an `Assign` or a `Scan` implementation.
    Custom,
    /// Invariant violation: the process is misconfigured or a value is
    /// structurally impossible. Not meant to be handled like input errors.
    Fatal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Parse => f.write_str("parse"),
            ErrorKind::Range => f.write_str("range"),
            ErrorKind::Unsupported => f.write_str("unsupported"),
            ErrorKind::Time => f.write_str("time"),
            ErrorKind::Destination => f.write_str("destination"),
            ErrorKind::Custom => f.write_str("custom"),
            ErrorKind::Fatal => f.write_str("fatal"),
        }
    }
}

/// Error returned by every conversion, the time parser and the setter.
///
/// Carries an `ErrorKind` for categorization and a human-readable message.
#[derive(Clone, PartialEq, Eq)]
pub struct CastError {
    kind: ErrorKind,
    message: String,
}

impl CastError {
    /// Text rejected by the literal grammar of `target`.
    pub fn parse(target: Target, input: &str, reason: impl fmt::Display) -> Self {
        Self {
            kind: ErrorKind::Parse,
            message: format!("cast.{target}: parsing {input:?}: {reason}"),
        }
    }

    pub fn range(msg: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Range,
            message: msg.into(),
        }
    }

    /// Negative number converted to an unsigned target.
    pub fn negative(what: &str) -> Self {
        Self::range(format!("cannot convert a negative {what} to uint64"))
    }

    /// Source shape not convertible to `target`.
    pub fn unsupported(target: Target, type_name: impl fmt::Display) -> Self {
        Self {
            kind: ErrorKind::Unsupported,
            message: format!(
                "cast.{target}: unsupport to convert {type_name} to {}",
                target.type_name()
            ),
        }
    }

    /// No layout matched `value`.
    pub fn time(value: &str) -> Self {
        Self {
            kind: ErrorKind::Time,
            message: format!("unable to parse time '{value}'"),
        }
    }

    /// Destination handle has nothing writable behind it.
    pub fn not_settable(type_name: impl fmt::Display) -> Self {
        Self {
            kind: ErrorKind::Destination,
            message: format!("the dst value {type_name} cannot be set"),
        }
    }

    /// Destination type is outside the set the setter can write.
    pub fn unsupported_destination(type_name: impl fmt::Display) -> Self {
        Self {
            kind: ErrorKind::Destination,
            message: format!("unsupport to set a value to {type_name}"),
        }
    }

    pub fn custom(msg: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Custom,
            message: msg.into(),
        }
    }

    pub fn fatal(msg: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Fatal,
            message: msg.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_fatal(&self) -> bool {
        self.kind == ErrorKind::Fatal
    }

    /// Add context to the error, preserving the original ErrorKind.
    ///
    /// Produces: `"context: original message"`.
    pub fn with_context(self, ctx: impl fmt::Display) -> Self {
        Self {
            kind: self.kind,
            message: format!("{ctx}: {}", self.message),
        }
    }
}

impl fmt::Debug for CastError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

impl fmt::Display for CastError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for CastError {}
