//! Routing context construction and lifecycle.
//!
//! The context factory is the bridge between a booted container and the
//! engine object under test: it discovers processors and endpoints
//! exclusively through the injected registry handle and returns an
//! unstarted context. Starting and stopping belong to the lifecycle
//! controller.

use std::fmt;

use relayrig_common::error::{Result, RigError};
use relayrig_common::types::{BackendId, ContextId};

use crate::registry::{ComponentLookup, RegistryHandle};

/// Lifecycle state of a routing context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextState {
    /// Created but not started.
    Created,
    /// Actively routing.
    Started,
    /// Stopped; never restarted.
    Stopped,
}

impl fmt::Display for ContextState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => write!(f, "created"),
            Self::Started => write!(f, "started"),
            Self::Stopped => write!(f, "stopped"),
        }
    }
}

/// The routing engine instance under test.
///
/// Built fresh per test from a live registry; never reused across tests.
#[derive(Debug)]
pub struct RoutingContext {
    id: ContextId,
    backend: BackendId,
    processors: Vec<String>,
    endpoints: Vec<String>,
    state: ContextState,
    created_at: String,
}

impl RoutingContext {
    /// Returns the context identifier.
    #[must_use]
    pub const fn id(&self) -> &ContextId {
        &self.id
    }

    /// Returns the backend whose registry this context was wired from.
    #[must_use]
    pub const fn backend(&self) -> BackendId {
        self.backend
    }

    /// Returns the processor names discovered through the registry.
    #[must_use]
    pub fn processors(&self) -> &[String] {
        &self.processors
    }

    /// Returns the endpoint names discovered through the registry.
    #[must_use]
    pub fn endpoints(&self) -> &[String] {
        &self.endpoints
    }

    /// Returns the current state.
    #[must_use]
    pub const fn state(&self) -> ContextState {
        self.state
    }

    /// Returns whether the context is started.
    #[must_use]
    pub fn is_started(&self) -> bool {
        self.state == ContextState::Started
    }

    /// Returns the ISO-8601 creation timestamp.
    #[must_use]
    pub fn created_at(&self) -> &str {
        &self.created_at
    }

    /// Starts the context.
    ///
    /// # Errors
    ///
    /// Returns a lifecycle violation if the context is not in the
    /// `Created` state; a stopped context is never restarted.
    pub fn start(&mut self) -> Result<()> {
        if self.state != ContextState::Created {
            return Err(RigError::Lifecycle {
                message: format!("cannot start context {} in state {}", self.id, self.state),
            });
        }
        self.state = ContextState::Started;
        tracing::info!(id = %self.id, backend = %self.backend, "routing context started");
        Ok(())
    }

    /// Stops the context.
    ///
    /// # Errors
    ///
    /// Returns `Teardown` if the context was already stopped, so a
    /// double-stop is never silent.
    pub fn stop(&mut self) -> Result<()> {
        if self.state == ContextState::Stopped {
            return Err(RigError::Teardown {
                message: format!("context {} already stopped", self.id),
            });
        }
        self.state = ContextState::Stopped;
        tracing::info!(id = %self.id, "routing context stopped");
        Ok(())
    }
}

/// Builds routing contexts from a live registry handle.
#[derive(Debug, Default)]
pub struct ContextFactory;

impl ContextFactory {
    /// Creates a factory.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Builds an unstarted routing context wired through the registry
    /// behind the handle.
    ///
    /// # Errors
    ///
    /// Returns `RegistryUnavailable` if the handle is unbound or the
    /// container behind it has shut down.
    pub fn create_context(&self, handle: &RegistryHandle) -> Result<RoutingContext> {
        let registry = handle.get()?;
        let context = RoutingContext {
            id: ContextId::generate(),
            backend: registry.backend(),
            processors: registry.processors(),
            endpoints: registry.endpoints(),
            state: ContextState::Created,
            created_at: chrono::Utc::now().to_rfc3339(),
        };
        tracing::debug!(
            id = %context.id,
            backend = %context.backend,
            processors = context.processors.len(),
            endpoints = context.endpoints.len(),
            "routing context created"
        );
        Ok(context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{Component, ComponentKind, ModuleRegistry, RegistryHandle};
    use std::sync::Arc;

    fn live_registry() -> Arc<ModuleRegistry> {
        Arc::new(ModuleRegistry::new(
            BackendId::Felix,
            vec![],
            vec![Component {
                name: "direct-endpoint".into(),
                kind: ComponentKind::Endpoint,
                module: "camel-core".into(),
            }],
        ))
    }

    #[test]
    fn create_context_wires_through_registry() {
        let registry = live_registry();
        let handle = RegistryHandle::bind(&registry);

        let context = ContextFactory::new()
            .create_context(&handle)
            .expect("live handle");
        assert_eq!(context.backend(), BackendId::Felix);
        assert_eq!(context.endpoints(), ["direct-endpoint"]);
        assert_eq!(context.state(), ContextState::Created);
    }

    #[test]
    fn create_context_with_unbound_handle_fails() {
        let result = ContextFactory::new().create_context(&RegistryHandle::unbound());
        assert!(
            matches!(result, Err(RigError::RegistryUnavailable { .. })),
            "unbound handle should fail context creation"
        );
    }

    #[test]
    fn start_then_stop_transitions_once() {
        let registry = live_registry();
        let handle = RegistryHandle::bind(&registry);
        let mut context = ContextFactory::new()
            .create_context(&handle)
            .expect("live handle");

        context.start().expect("start from created");
        assert!(context.is_started());
        context.stop().expect("stop from started");
        assert_eq!(context.state(), ContextState::Stopped);
    }

    #[test]
    fn double_start_rejected() {
        let registry = live_registry();
        let handle = RegistryHandle::bind(&registry);
        let mut context = ContextFactory::new()
            .create_context(&handle)
            .expect("live handle");

        context.start().expect("first start");
        assert!(context.start().is_err(), "second start should be rejected");
    }

    #[test]
    fn double_stop_rejected() {
        let registry = live_registry();
        let handle = RegistryHandle::bind(&registry);
        let mut context = ContextFactory::new()
            .create_context(&handle)
            .expect("live handle");

        context.start().expect("start");
        context.stop().expect("first stop");
        let result = context.stop();
        assert!(
            matches!(result, Err(RigError::Teardown { .. })),
            "double stop should surface as teardown error"
        );
    }

    #[test]
    fn stopped_context_cannot_restart() {
        let registry = live_registry();
        let handle = RegistryHandle::bind(&registry);
        let mut context = ContextFactory::new()
            .create_context(&handle)
            .expect("live handle");

        context.start().expect("start");
        context.stop().expect("stop");
        assert!(context.start().is_err(), "contexts are never reused");
    }
}
