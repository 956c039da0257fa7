pub mod duration;
pub mod dynamic;
pub mod error;
pub mod layout;
pub mod slot;
pub mod target;
pub mod value;

pub use coerce_api_derive::AsValue;
pub use duration::DurationNs;
pub use dynamic::Dynamic;
pub use error::{CastError, ErrorKind};
pub use layout::{Layout, TimeDefaults};
pub use slot::{Assign, Resolve, Scan, Settable, Slot};
pub use target::Target;
pub use value::{AsValue, HandleKind, Value};

// Re-exported so that derived code and callers share one chrono / tz version.
pub use chrono;
pub use chrono_tz;
