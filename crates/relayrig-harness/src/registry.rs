//! Module registry and the non-owning handle tests receive.
//!
//! The registry is the live index of modules installed into a booted
//! container and the routing components they contribute. It is owned by
//! the container; the fixture only ever holds a [`RegistryHandle`], which
//! goes stale the moment the container shuts down.

use std::sync::{Arc, Weak};

use relayrig_common::error::{Result, RigError};
use relayrig_common::types::BackendId;

/// Kind of routing component a module contributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
    /// A message processor.
    Processor,
    /// A message endpoint.
    Endpoint,
}

/// A routing component registered by an installed module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    /// Component name, unique within the registry.
    pub name: String,
    /// Whether the component is a processor or an endpoint.
    pub kind: ComponentKind,
    /// Name of the module that contributed the component.
    pub module: String,
}

/// A module installed into the container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledModule {
    /// Module name.
    pub name: String,
    /// Repository coordinate the module was resolved from, if any.
    pub repository: Option<String>,
}

/// Resolves routing components through a live registry.
///
/// The context factory wires contexts exclusively through this
/// capability; there is no static or global component lookup.
pub trait ComponentLookup {
    /// Returns the names of all registered processors.
    fn processors(&self) -> Vec<String>;

    /// Returns the names of all registered endpoints.
    fn endpoints(&self) -> Vec<String>;

    /// Looks up a single component by name.
    fn lookup(&self, name: &str) -> Option<&Component>;
}

/// Live index of installed modules within a running container.
///
/// Built by the backend during boot and immutable afterwards; a fresh
/// registry is created for every booted container.
#[derive(Debug)]
pub struct ModuleRegistry {
    backend: BackendId,
    modules: Vec<InstalledModule>,
    components: Vec<Component>,
}

impl ModuleRegistry {
    /// Creates a registry for the given backend with its installed
    /// modules and their components.
    #[must_use]
    pub fn new(
        backend: BackendId,
        modules: Vec<InstalledModule>,
        components: Vec<Component>,
    ) -> Self {
        Self {
            backend,
            modules,
            components,
        }
    }

    /// Returns the backend that owns this registry.
    #[must_use]
    pub const fn backend(&self) -> BackendId {
        self.backend
    }

    /// Returns the installed modules.
    #[must_use]
    pub fn modules(&self) -> &[InstalledModule] {
        &self.modules
    }
}

impl ComponentLookup for ModuleRegistry {
    fn processors(&self) -> Vec<String> {
        self.components
            .iter()
            .filter(|c| c.kind == ComponentKind::Processor)
            .map(|c| c.name.clone())
            .collect()
    }

    fn endpoints(&self) -> Vec<String> {
        self.components
            .iter()
            .filter(|c| c.kind == ComponentKind::Endpoint)
            .map(|c| c.name.clone())
            .collect()
    }

    fn lookup(&self, name: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.name == name)
    }
}

/// Non-owning reference to a booted container's module registry.
///
/// Valid only between boot and shutdown; upgrading after the container
/// has released its registry fails with `RegistryUnavailable`.
#[derive(Debug, Clone)]
pub struct RegistryHandle {
    inner: Weak<ModuleRegistry>,
}

impl RegistryHandle {
    /// Creates a handle bound to a live registry.
    #[must_use]
    pub fn bind(registry: &Arc<ModuleRegistry>) -> Self {
        Self {
            inner: Arc::downgrade(registry),
        }
    }

    /// Creates a handle bound to nothing, as held by a fixture before
    /// injection.
    #[must_use]
    pub const fn unbound() -> Self {
        Self { inner: Weak::new() }
    }

    /// Upgrades to the live registry.
    ///
    /// # Errors
    ///
    /// Returns `RegistryUnavailable` if no container was booted or the
    /// container has already shut down.
    pub fn get(&self) -> Result<Arc<ModuleRegistry>> {
        self.inner
            .upgrade()
            .ok_or_else(|| RigError::RegistryUnavailable {
                message: "no booted container owns this handle".to_string(),
            })
    }

    /// Returns whether the handle still refers to a live registry.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.inner.strong_count() > 0
    }
}
