// User-supplied sinks built from closures.
use super::{Backend, run_blocking};
use crate::domain::{LogEvent, SetupError};
use parking_lot::RwLock;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

pub type LogFn = Arc<dyn Fn(&LogEvent) + Send + Sync>;
pub type SetupFn = Arc<dyn Fn() -> Result<(), SetupError> + Send + Sync>;

/// A backend made of a log closure and an optional setup closure.
///
/// The closure receives every event; level gating and filtering are up to it.
pub struct CustomBackend {
    setup: Option<SetupFn>,
    log: LogFn,
}

impl CustomBackend {
    pub fn new(log: impl Fn(&LogEvent) + Send + Sync + 'static) -> Self {
        Self {
            setup: None,
            log: Arc::new(log),
        }
    }

    #[must_use]
    pub fn with_setup(
        mut self,
        setup: impl Fn() -> Result<(), SetupError> + Send + Sync + 'static,
    ) -> Self {
        self.setup = Some(Arc::new(setup));
        self
    }
}

impl Backend for CustomBackend {
    fn initialize(&mut self) -> Pin<Box<dyn Future<Output = Result<(), SetupError>> + Send + '_>> {
        Box::pin(async move {
            match &self.setup {
                Some(setup) => setup(),
                None => Ok(()),
            }
        })
    }

    fn log<'a>(&'a self, event: &'a LogEvent) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
        let log = Arc::clone(&self.log);
        let event = event.clone();
        Box::pin(run_blocking(move || log(&event)))
    }
}

/// Empty backend inserted by [`Registry::new_backend_slot`] and filled in
/// afterwards.
///
/// Events reaching a slot with no log closure are discarded. The registry
/// never runs a slot's setup closure; the owner calls [`BackendSlot::run_setup`].
///
/// [`Registry::new_backend_slot`]: crate::Registry::new_backend_slot
#[derive(Default)]
pub struct BackendSlot {
    setup: RwLock<Option<SetupFn>>,
    log: RwLock<Option<LogFn>>,
}

impl BackendSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_setup(&self, setup: impl Fn() -> Result<(), SetupError> + Send + Sync + 'static) {
        *self.setup.write() = Some(Arc::new(setup));
    }

    pub fn set_log(&self, log: impl Fn(&LogEvent) + Send + Sync + 'static) {
        *self.log.write() = Some(Arc::new(log));
    }

    pub fn has_log(&self) -> bool {
        self.log.read().is_some()
    }

    /// Run the assigned setup closure, if any.
    pub fn run_setup(&self) -> Result<(), SetupError> {
        let setup = self.setup.read().clone();
        match setup {
            Some(setup) => setup(),
            None => Ok(()),
        }
    }

    fn current_log(&self) -> Option<LogFn> {
        // Clone out of the lock so a slow closure does not block reassignment.
        self.log.read().clone()
    }
}

impl Backend for BackendSlot {
    fn initialize(&mut self) -> Pin<Box<dyn Future<Output = Result<(), SetupError>> + Send + '_>> {
        Box::pin(async move { self.run_setup() })
    }

    fn log<'a>(&'a self, event: &'a LogEvent) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
        let log = self.current_log();
        let event = event.clone();
        Box::pin(async move {
            if let Some(log) = log {
                run_blocking(move || log(&event)).await;
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LogLevel;
    use serde_json::Value;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_custom_backend_receives_every_event() {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = count.clone();
        let backend = CustomBackend::new(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        });

        for level in LogLevel::ALL {
            backend.log(&LogEvent::new(level, "g", "m", Value::Null)).await;
        }
        assert_eq!(count.load(Ordering::SeqCst), 6);
    }

    #[tokio::test]
    async fn test_custom_backend_setup_runs_on_initialize() {
        let ran = Arc::new(AtomicUsize::new(0));
        let flag = ran.clone();
        let mut backend = CustomBackend::new(|_| {}).with_setup(move || {
            flag.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        backend.initialize().await.unwrap();
        assert_eq!(ran.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_custom_backend_setup_error_propagates() {
        let mut backend = CustomBackend::new(|_| {})
            .with_setup(|| Err(SetupError::Custom("no connection".to_string())));

        let result = backend.initialize().await;
        assert!(matches!(result, Err(SetupError::Custom(msg)) if msg == "no connection"));
    }

    #[tokio::test]
    async fn test_empty_slot_discards_events() {
        let slot = BackendSlot::new();
        assert!(!slot.has_log());
        slot.log(&LogEvent::new(LogLevel::Info, "g", "m", Value::Null)).await;
        assert!(slot.run_setup().is_ok());
    }

    #[tokio::test]
    async fn test_slot_uses_assigned_closures() {
        let slot = BackendSlot::new();
        let count = Arc::new(AtomicUsize::new(0));

        let seen = count.clone();
        slot.set_log(move |event| {
            assert_eq!(event.group, "g");
            seen.fetch_add(1, Ordering::SeqCst);
        });
        slot.set_setup(|| Err(SetupError::Custom("boom".to_string())));

        slot.log(&LogEvent::new(LogLevel::Info, "g", "m", Value::Null)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(slot.run_setup().is_err());
    }
}
