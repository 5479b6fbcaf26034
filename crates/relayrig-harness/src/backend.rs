//! Container backend abstraction.
//!
//! A backend is one concrete container engine capable of interpreting a
//! provisioning descriptor and booting a module host from it. Backends
//! are interchangeable; the lifecycle controller picks among them by
//! [`BackendId`].

use std::sync::Arc;

use relayrig_common::error::{Result, RigError};
use relayrig_common::types::BackendId;
use relayrig_provision::descriptor::ProvisioningDescriptor;

use crate::registry::{ModuleRegistry, RegistryHandle};

/// A concrete container engine implementation.
///
/// Implementors interpret the descriptor in entry order: logging first,
/// then profiles and properties, then feature installation, then boot.
pub trait ContainerBackend {
    /// Returns the identifier this backend boots under.
    fn id(&self) -> BackendId;

    /// Returns whether this backend is operational in the current
    /// environment. Unavailable candidates are skipped, not booted.
    fn is_available(&self) -> bool;

    /// Boots a fresh container from the descriptor.
    ///
    /// # Errors
    ///
    /// Returns `BootFailure` if the container cannot be brought up.
    fn boot(&self, descriptor: &ProvisioningDescriptor) -> Result<BootedContainer>;
}

/// A running container instance produced by a backend.
///
/// Owns the module registry; dropping or shutting down the container
/// invalidates every outstanding [`RegistryHandle`].
#[derive(Debug)]
pub struct BootedContainer {
    backend: BackendId,
    registry: Arc<ModuleRegistry>,
    booted_at: String,
}

impl BootedContainer {
    /// Wraps a freshly built registry into a running container.
    #[must_use]
    pub fn new(backend: BackendId, registry: ModuleRegistry) -> Self {
        Self {
            backend,
            registry: Arc::new(registry),
            booted_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Returns the backend this container was booted by.
    #[must_use]
    pub const fn backend(&self) -> BackendId {
        self.backend
    }

    /// Returns the ISO-8601 boot timestamp.
    #[must_use]
    pub fn booted_at(&self) -> &str {
        &self.booted_at
    }

    /// Returns a non-owning handle to the module registry.
    #[must_use]
    pub fn registry_handle(&self) -> RegistryHandle {
        RegistryHandle::bind(&self.registry)
    }

    /// Shuts the container down, releasing the registry and staling all
    /// outstanding handles.
    pub fn shutdown(self) {
        tracing::info!(backend = %self.backend, "container shut down");
        drop(self.registry);
    }
}

/// Ordered set of backend implementations, at most one per identifier.
#[derive(Default)]
pub struct BackendSet {
    backends: Vec<Box<dyn ContainerBackend>>,
}

impl BackendSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a backend implementation.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDescriptor` if a backend with the same identifier
    /// is already registered.
    pub fn register(&mut self, backend: Box<dyn ContainerBackend>) -> Result<()> {
        if self.get(backend.id()).is_some() {
            return Err(RigError::InvalidDescriptor {
                message: format!("backend {} registered twice", backend.id()),
            });
        }
        self.backends.push(backend);
        Ok(())
    }

    /// Returns the backend registered under the given identifier.
    #[must_use]
    pub fn get(&self, id: BackendId) -> Option<&dyn ContainerBackend> {
        self.backends
            .iter()
            .find(|b| b.id() == id)
            .map(AsRef::as_ref)
    }

    /// Returns whether the set holds no backends.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }

    /// Creates a set with an in-process module host registered for every
    /// engine identifier.
    #[must_use]
    pub fn module_hosts() -> Self {
        let mut set = Self::new();
        for id in relayrig_common::constants::DEFAULT_BACKENDS {
            // ids are distinct, so registration cannot collide
            let _ = set.register(Box::new(crate::host::ModuleHostBackend::new(id)));
        }
        set
    }
}

impl std::fmt::Debug for BackendSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ids: Vec<BackendId> = self.backends.iter().map(|b| b.id()).collect();
        f.debug_struct("BackendSet").field("backends", &ids).finish()
    }
}
