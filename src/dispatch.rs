//! Fan-out entry points.
//!
//! Every call snapshots the registry, spawns one task per backend and waits
//! for all of them before returning, so an event has landed everywhere (or
//! been dropped by a backend) by the time the caller continues. There is no
//! timeout: a backend that never returns stalls the call.

use crate::domain::{LogEvent, LogLevel, Payload};
use crate::registry::Registry;
use futures::future::join_all;
use std::process;
use std::sync::Arc;
use tracing::error;

/// Exit status used when a fatal event terminates the process.
pub const FATAL_EXIT_CODE: i32 = 1;

/// Returned by a fatal dispatch once every backend has received the event.
///
/// The top-level caller decides when to act on it, usually by calling
/// [`TerminationRequested::exit`].
#[must_use = "a fatal log requests process termination"]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminationRequested {
    exit_code: i32,
}

impl TerminationRequested {
    pub fn exit_code(self) -> i32 {
        self.exit_code
    }

    pub fn exit(self) -> ! {
        process::exit(self.exit_code)
    }
}

/// Deliver one event to every registered backend.
///
/// Returns `Some` only for `LogLevel::Fatal`.
pub async fn emit(
    registry: &Registry,
    level: LogLevel,
    group: &str,
    message: &str,
    payload: impl Into<Payload>,
) -> Option<TerminationRequested> {
    let event = Arc::new(LogEvent::new(level, group, message, payload));

    let handles: Vec<_> = registry
        .backends()
        .into_iter()
        .map(|backend| {
            let event = event.clone();
            tokio::spawn(async move { backend.log(&event).await })
        })
        .collect();

    for result in join_all(handles).await {
        if let Err(e) = result {
            error!("Backend panicked while logging '{group}' event: {e}");
        }
    }

    (level == LogLevel::Fatal).then_some(TerminationRequested {
        exit_code: FATAL_EXIT_CODE,
    })
}

pub async fn trace(registry: &Registry, group: &str, message: &str, payload: impl Into<Payload>) {
    let _ = emit(registry, LogLevel::Trace, group, message, payload).await;
}

pub async fn debug(registry: &Registry, group: &str, message: &str, payload: impl Into<Payload>) {
    let _ = emit(registry, LogLevel::Debug, group, message, payload).await;
}

pub async fn info(registry: &Registry, group: &str, message: &str, payload: impl Into<Payload>) {
    let _ = emit(registry, LogLevel::Info, group, message, payload).await;
}

pub async fn warn(registry: &Registry, group: &str, message: &str, payload: impl Into<Payload>) {
    let _ = emit(registry, LogLevel::Warn, group, message, payload).await;
}

pub async fn error(registry: &Registry, group: &str, message: &str, payload: impl Into<Payload>) {
    let _ = emit(registry, LogLevel::Error, group, message, payload).await;
}

/// Deliver a fatal event, then hand back the termination request.
pub async fn fatal(
    registry: &Registry,
    group: &str,
    message: &str,
    payload: impl Into<Payload>,
) -> TerminationRequested {
    let _ = emit(registry, LogLevel::Fatal, group, message, payload).await;
    TerminationRequested {
        exit_code: FATAL_EXIT_CODE,
    }
}
