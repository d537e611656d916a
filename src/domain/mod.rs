//! Domain layer for multilog.
//!
//! Contains the canonical types shared across all modules:
//! - `LogLevel`: ordered severity (Trace/Debug/Info/Warn/Error/Fatal)
//! - `LogEvent`: the value every backend receives
//! - the error taxonomy used by filters, backends and the registry

pub mod error;
pub mod log_event;
pub mod log_level;

pub use error::{FilterError, RegistryError, SetupError};
pub use log_event::{LogEvent, Payload, to_payload};
pub use log_level::{LogLevel, ParseLevelError};
