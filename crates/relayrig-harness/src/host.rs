//! In-process module host backend.
//!
//! Interprets a provisioning descriptor entry by entry the way a real
//! container engine would: logging is activated before anything else,
//! profiles and properties are applied next, then feature sets are
//! resolved into installed modules whose routing components land in the
//! registry. Real engines remain external; this host backs the harness's
//! own tests and any embedder that wants a hermetic container.

use relayrig_common::constants;
use relayrig_common::error::{Result, RigError};
use relayrig_common::types::BackendId;
use relayrig_provision::descriptor::{ProvisioningDescriptor, Requirement};

use crate::backend::{BootedContainer, ContainerBackend};
use crate::registry::{Component, ComponentKind, InstalledModule, ModuleRegistry};

/// An in-process container engine.
#[derive(Debug)]
pub struct ModuleHostBackend {
    id: BackendId,
    available: bool,
    fail_boot: bool,
}

impl ModuleHostBackend {
    /// Creates an available host for the given engine identifier.
    #[must_use]
    pub const fn new(id: BackendId) -> Self {
        Self {
            id,
            available: true,
            fail_boot: false,
        }
    }

    /// Creates a host that reports itself unavailable, so the lifecycle
    /// controller skips it.
    #[must_use]
    pub const fn unavailable(id: BackendId) -> Self {
        Self {
            id,
            available: false,
            fail_boot: false,
        }
    }

    /// Creates a host whose boot always fails, for exercising boot
    /// failure paths.
    #[must_use]
    pub const fn failing(id: BackendId) -> Self {
        Self {
            id,
            available: true,
            fail_boot: true,
        }
    }
}

impl ContainerBackend for ModuleHostBackend {
    fn id(&self) -> BackendId {
        self.id
    }

    fn is_available(&self) -> bool {
        self.available
    }

    fn boot(&self, descriptor: &ProvisioningDescriptor) -> Result<BootedContainer> {
        if self.fail_boot {
            return Err(RigError::BootFailure {
                backend: self.id,
                message: "engine refused to start".to_string(),
            });
        }

        let mut log_level = constants::DEFAULT_LOG_LEVEL.to_string();
        let mut modules = Vec::new();
        let mut components = Vec::new();

        for entry in descriptor.entries() {
            match entry {
                Requirement::LogProfile(profile) => {
                    tracing::debug!(backend = %self.id, profile = %profile, "log profile active");
                }
                Requirement::ContainerProfile(profile) => {
                    modules.push(InstalledModule {
                        name: profile.name.clone(),
                        repository: None,
                    });
                    tracing::debug!(backend = %self.id, profile = %profile, "profile installed");
                }
                Requirement::SystemProperty { key, value } => {
                    if key == constants::LOG_LEVEL_PROPERTY {
                        log_level = value.clone();
                    }
                    tracing::debug!(backend = %self.id, key = %key, value = %value, "system property set");
                }
                Requirement::FeatureSet(features) => {
                    for feature in &features.features {
                        modules.push(InstalledModule {
                            name: feature.clone(),
                            repository: Some(features.repository.clone()),
                        });
                        components.push(Component {
                            name: format!("{feature}-processor"),
                            kind: ComponentKind::Processor,
                            module: feature.clone(),
                        });
                        components.push(Component {
                            name: format!("{feature}-endpoint"),
                            kind: ComponentKind::Endpoint,
                            module: feature.clone(),
                        });
                    }
                }
                Requirement::Backend(_) => {}
            }
        }

        tracing::info!(
            backend = %self.id,
            log_level = %log_level,
            modules = modules.len(),
            "module host booted"
        );
        Ok(BootedContainer::new(
            self.id,
            ModuleRegistry::new(self.id, modules, components),
        ))
    }
}
