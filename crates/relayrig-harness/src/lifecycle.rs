//! Per-test lifecycle orchestration.
//!
//! The controller is a standalone object the test invokes directly:
//! `set_up()` boots a container, injects the registry handle, builds and
//! starts the routing context; `tear_down()` releases everything in
//! reverse order. Teardown is idempotent and also runs on drop, so the
//! container is released on every exit path, including panics.

use relayrig_common::config::{BackendRunPolicy, HarnessConfig};
use relayrig_common::error::{Result, RigError};
use relayrig_common::types::{BackendId, LifecycleState};
use relayrig_provision::descriptor::{ProvisioningDescriptor, build_descriptor};
use relayrig_provision::selector::select_backends;

use crate::backend::{BackendSet, BootedContainer, ContainerBackend};
use crate::context::{ContextFactory, RoutingContext};
use crate::registry::RegistryHandle;

/// Orchestrates setup and teardown around a single test body.
#[derive(Debug)]
pub struct LifecycleController {
    descriptor: ProvisioningDescriptor,
    backends: BackendSet,
    policy: BackendRunPolicy,
    factory: ContextFactory,
    state: LifecycleState,
    cursor: usize,
    container: Option<BootedContainer>,
    handle: RegistryHandle,
    context: Option<RoutingContext>,
}

impl LifecycleController {
    /// Creates a controller for a pre-built descriptor.
    #[must_use]
    pub fn new(descriptor: ProvisioningDescriptor, backends: BackendSet) -> Self {
        Self {
            descriptor,
            backends,
            policy: BackendRunPolicy::default(),
            factory: ContextFactory::new(),
            state: LifecycleState::Uninitialized,
            cursor: 0,
            container: None,
            handle: RegistryHandle::unbound(),
            context: None,
        }
    }

    /// Creates a controller by building the descriptor from harness
    /// configuration.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDescriptor` if the configuration does not assemble
    /// into a valid descriptor.
    pub fn from_config(config: &HarnessConfig, backends: BackendSet) -> Result<Self> {
        let descriptor = build_descriptor(config)?;
        let mut controller = Self::new(descriptor, backends);
        controller.policy = config.run_policy;
        Ok(controller)
    }

    /// Overrides the backend run policy.
    #[must_use]
    pub const fn with_policy(mut self, policy: BackendRunPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Returns the current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> LifecycleState {
        self.state
    }

    /// Returns the registry handle injected by the last boot. Unbound
    /// until setup succeeds and after teardown.
    #[must_use]
    pub fn registry_handle(&self) -> RegistryHandle {
        self.handle.clone()
    }

    /// Returns the routing context, if one is live.
    #[must_use]
    pub const fn context(&self) -> Option<&RoutingContext> {
        self.context.as_ref()
    }

    /// Boots a container, injects its registry handle, and builds and
    /// starts a routing context against it.
    ///
    /// # Errors
    ///
    /// Returns `NoBackendAvailable` if no registered candidate is
    /// available, `BootFailure` if the chosen backend fails to boot (no
    /// context is ever created in that case), or the context factory's
    /// error if wiring fails after boot. Any partially acquired container
    /// is released before the error propagates.
    pub fn set_up(&mut self) -> Result<()> {
        if !matches!(
            self.state,
            LifecycleState::Uninitialized | LifecycleState::Done
        ) {
            return Err(RigError::Lifecycle {
                message: format!("setup invoked in state {}", self.state),
            });
        }

        let selected = select_backends(&self.descriptor);
        let backend_id = match selected.and_then(|candidates| self.pick_candidate(&candidates)) {
            Ok(id) => id,
            Err(e) => {
                self.state = LifecycleState::Done;
                return Err(e);
            }
        };

        self.state = LifecycleState::Booting;
        tracing::info!(backend = %backend_id, "booting container");

        let boot_result = self
            .backends
            .get(backend_id)
            .ok_or_else(|| RigError::BootFailure {
                backend: backend_id,
                message: "no implementation registered".to_string(),
            })
            .and_then(|backend| backend.boot(&self.descriptor));
        let container = match boot_result {
            Ok(container) => container,
            Err(e) => {
                self.state = LifecycleState::Done;
                return Err(e);
            }
        };

        // The handle is injected exactly once per boot.
        self.handle = container.registry_handle();
        self.container = Some(container);

        let mut context = match self.factory.create_context(&self.handle) {
            Ok(context) => context,
            Err(e) => {
                self.release_container();
                self.state = LifecycleState::Done;
                return Err(e);
            }
        };
        if let Err(e) = context.start() {
            self.release_container();
            self.state = LifecycleState::Done;
            return Err(e);
        }

        self.context = Some(context);
        self.state = LifecycleState::Ready;
        Ok(())
    }

    /// Hands the started context to the test body, moving to `Running`.
    ///
    /// # Errors
    ///
    /// Returns a lifecycle violation unless the controller is `Ready`.
    pub fn begin_test(&mut self) -> Result<&mut RoutingContext> {
        if self.state != LifecycleState::Ready {
            return Err(RigError::Lifecycle {
                message: format!("test body started in state {}", self.state),
            });
        }
        self.state = LifecycleState::Running;
        self.context.as_mut().ok_or_else(|| RigError::Lifecycle {
            message: "ready controller holds no context".to_string(),
        })
    }

    /// Stops the context and releases the container, in that order.
    ///
    /// Invoked unconditionally by test teardown regardless of the body's
    /// outcome. Calling it again once `Done` is a no-op, which guards
    /// against double teardown from nested fixtures.
    ///
    /// # Errors
    ///
    /// Returns `Teardown` if stopping the context fails; the container is
    /// still released and the controller still reaches `Done`.
    pub fn tear_down(&mut self) -> Result<()> {
        if self.state == LifecycleState::Done {
            tracing::debug!("teardown already complete");
            return Ok(());
        }
        self.state = LifecycleState::TearingDown;

        let mut stop_error = None;
        if let Some(mut context) = self.context.take() {
            if context.is_started() {
                if let Err(e) = context.stop() {
                    tracing::warn!(error = %e, "context stop failed during teardown");
                    stop_error = Some(e);
                }
            }
        }
        self.release_container();
        self.state = LifecycleState::Done;
        tracing::info!("teardown complete");

        stop_error.map_or(Ok(()), Err)
    }

    /// Picks the backend candidate for this run according to the run
    /// policy.
    fn pick_candidate(&mut self, candidates: &[BackendId]) -> Result<BackendId> {
        match self.policy {
            BackendRunPolicy::FirstAvailable => candidates
                .iter()
                .copied()
                .find(|id| self.backends.get(*id).is_some_and(ContainerBackend::is_available))
                .ok_or(RigError::NoBackendAvailable),
            BackendRunPolicy::RotateCandidates => {
                let id = candidates[self.cursor % candidates.len()];
                self.cursor += 1;
                match self.backends.get(id) {
                    Some(backend) if backend.is_available() => Ok(id),
                    Some(_) => Err(RigError::BootFailure {
                        backend: id,
                        message: "backend not available".to_string(),
                    }),
                    None => Err(RigError::BootFailure {
                        backend: id,
                        message: "no implementation registered".to_string(),
                    }),
                }
            }
        }
    }

    /// Releases the container and unbinds the injected handle.
    fn release_container(&mut self) {
        self.handle = RegistryHandle::unbound();
        if let Some(container) = self.container.take() {
            container.shutdown();
        }
    }
}

impl Drop for LifecycleController {
    fn drop(&mut self) {
        if !matches!(
            self.state,
            LifecycleState::Uninitialized | LifecycleState::Done
        ) {
            tracing::warn!(state = %self.state, "controller dropped before teardown");
            let _ = self.tear_down();
        }
    }
}
