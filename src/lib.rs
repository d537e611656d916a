#![warn(rust_2018_idioms)]
// Specific pedantic lints enforced (not blanket allow):
#![deny(
    clippy::explicit_iter_loop,
    clippy::manual_let_else,
    clippy::semicolon_if_nothing_returned,
    clippy::inconsistent_struct_constructor
)]
#![allow(
    clippy::missing_errors_doc,      // Errors are documented on the enums
    clippy::module_name_repetitions, // e.g. ConsoleConfig in console module
    clippy::must_use_candidate       // Annotated selectively on critical APIs
)]

pub mod app;
pub mod backend;
pub mod config;
pub mod dispatch;
pub mod domain;
mod error;
pub mod filter;
pub mod registry;

// Re-export main types for easy access
pub use backend::{Backend, BackendSlot, ConsoleBackend, CustomBackend, SearchIndexBackend};
pub use dispatch::{TerminationRequested, debug, emit, error, fatal, info, trace, warn};
pub use domain::{
    FilterError, LogEvent, LogLevel, Payload, RegistryError, SetupError, to_payload,
};
pub use error::MultilogError;
pub use filter::DropFilter;
pub use registry::Registry;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
