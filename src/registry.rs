// Mapping of method name -> backend instance, populated during start-up and
// read by every dispatch.
use crate::backend::{Backend, BackendSlot};
use crate::domain::RegistryError;
use parking_lot::{Mutex, RwLock};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{error, info, warn};

struct BackendEntry {
    method: String,
    backend: Arc<dyn Backend>,
}

/// Claim on a method name while its backend initializes; released on drop,
/// including when the registering future is cancelled.
struct Reservation<'r> {
    pending: &'r Mutex<HashSet<String>>,
    method: String,
}

impl Drop for Reservation<'_> {
    fn drop(&mut self) {
        self.pending.lock().remove(&self.method);
    }
}

/// Registered backends, in insertion order.
///
/// Two ways in:
/// - [`Registry::register`] initializes the backend and refuses a method name
///   that is already taken (first registration wins).
/// - [`Registry::new_backend_slot`] inserts an empty slot immediately, without
///   initialization, and replaces whatever was registered under that name
///   (last writer wins).
#[derive(Default)]
pub struct Registry {
    entries: RwLock<Vec<BackendEntry>>,
    pending: Mutex<HashSet<String>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Initialize `backend` and add it under `method`.
    ///
    /// Blocks until the backend's setup completes. A backend whose setup
    /// fails is not added. The name is reserved before setup starts, so a
    /// concurrent registration under the same name is refused without
    /// initializing its backend.
    pub async fn register<B>(&self, method: &str, mut backend: B) -> Result<(), RegistryError>
    where
        B: Backend + 'static,
    {
        let Some(_reservation) = self.reserve(method) else {
            warn!("Backend for method '{method}' already registered, keeping the existing one");
            return Err(RegistryError::AlreadyRegistered {
                method: method.to_string(),
            });
        };

        if let Err(e) = backend.initialize().await {
            error!("Backend '{method}' failed to initialize: {e}");
            return Err(RegistryError::Setup {
                method: method.to_string(),
                source: e,
            });
        }

        // A slot may have taken the name while this backend was initializing.
        let mut entries = self.entries.write();
        if entries.iter().any(|entry| entry.method == method) {
            return Err(RegistryError::AlreadyRegistered {
                method: method.to_string(),
            });
        }
        entries.push(BackendEntry {
            method: method.to_string(),
            backend: Arc::new(backend),
        });
        info!("Registered backend '{method}'");
        Ok(())
    }

    fn reserve(&self, method: &str) -> Option<Reservation<'_>> {
        let entries = self.entries.read();
        let mut pending = self.pending.lock();
        if entries.iter().any(|entry| entry.method == method) || !pending.insert(method.to_string())
        {
            return None;
        }
        Some(Reservation {
            pending: &self.pending,
            method: method.to_string(),
        })
    }

    /// Insert an empty, uninitialized slot under `method` and return it.
    ///
    /// Unlike [`Registry::register`] this replaces an existing entry.
    pub fn new_backend_slot(&self, method: &str) -> Arc<BackendSlot> {
        let slot = Arc::new(BackendSlot::new());
        let backend: Arc<dyn Backend> = slot.clone();

        let mut entries = self.entries.write();
        match entries.iter_mut().find(|entry| entry.method == method) {
            Some(entry) => {
                warn!("Replacing backend '{method}' with a new slot");
                entry.backend = backend;
            }
            None => entries.push(BackendEntry {
                method: method.to_string(),
                backend,
            }),
        }
        slot
    }

    /// Snapshot of every registered backend.
    pub fn backends(&self) -> Vec<Arc<dyn Backend>> {
        self.entries
            .read()
            .iter()
            .map(|entry| entry.backend.clone())
            .collect()
    }

    pub fn methods(&self) -> Vec<String> {
        self.entries
            .read()
            .iter()
            .map(|entry| entry.method.clone())
            .collect()
    }

    pub fn contains(&self, method: &str) -> bool {
        self.entries.read().iter().any(|entry| entry.method == method)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
