pub mod console;
pub mod custom;
pub mod search_index;

use crate::domain::{LogEvent, LogLevel, Payload, SetupError};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use std::future::Future;
use std::pin::Pin;
use tracing::error;

pub use self::console::{ConsoleBackend, ConsoleConfig, OutputFormat};
pub use self::custom::{BackendSlot, CustomBackend};
pub use self::search_index::{ConnectionConfig, SearchIndexBackend, SearchIndexConfig};

/// Capability every sink implements.
///
/// This trait is dyn-compatible by using boxed futures instead of `impl Future`.
///
/// `initialize` runs once, before the backend is handed to the dispatcher.
/// `log` applies the backend's own minimum level and drop filters and then
/// renders or transmits the event. It has no error channel: failures are the
/// backend's to report (through `tracing`) and swallow.
pub trait Backend: Send + Sync {
    fn initialize(&mut self) -> Pin<Box<dyn Future<Output = Result<(), SetupError>> + Send + '_>> {
        Box::pin(async { Ok(()) })
    }

    fn log<'a>(&'a self, event: &'a LogEvent) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>>;
}

/// Run a synchronous sink call on the blocking pool.
///
/// Writers and user closures may block; off the runtime workers they cannot
/// serialize the fan-out or stall other tasks. A panic in `f` is resumed so
/// the dispatcher observes it as a failed backend task.
pub(crate) async fn run_blocking<F>(f: F)
where
    F: FnOnce() + Send + 'static,
{
    if let Err(e) = tokio::task::spawn_blocking(f).await {
        if e.is_panic() {
            std::panic::resume_unwind(e.into_panic());
        }
        error!("Blocking sink task was cancelled: {e}");
    }
}

/// Serialized shape of an event, shared by the JSON console output and the
/// search-index documents.
#[derive(Debug, Serialize)]
pub struct EventDocument<'a> {
    pub time: String,
    pub level: LogLevel,
    pub group: &'a str,
    pub message: &'a str,
    pub data: &'a Payload,
}

impl<'a> EventDocument<'a> {
    /// Stamp the event with the current UTC time.
    pub fn now(event: &'a LogEvent) -> Self {
        Self {
            time: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            level: event.level,
            group: &event.group,
            message: &event.message,
            data: &event.payload,
        }
    }
}
