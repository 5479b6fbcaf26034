//! Provisioning descriptor assembly and validation.
//!
//! A descriptor is an ordered list of requirements a backend applies
//! front to back: entry order expresses apply-before relationships, so
//! the log profile always precedes feature scanning.

use serde::{Deserialize, Serialize};

use relayrig_common::config::HarnessConfig;
use relayrig_common::constants;
use relayrig_common::error::{Result, RigError};
use relayrig_common::types::{BackendId, FeatureSetRef, VersionedRef};

/// One entry in a provisioning descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "kind", content = "value")]
pub enum Requirement {
    /// Install a logging profile before anything else runs.
    LogProfile(VersionedRef),
    /// Install a container profile.
    ContainerProfile(VersionedRef),
    /// Set a system property inside the container.
    SystemProperty {
        /// Property key.
        key: String,
        /// Property value.
        value: String,
    },
    /// Resolve and install a feature set from its repository coordinate.
    FeatureSet(FeatureSetRef),
    /// Declare a backend candidate for booting the container.
    Backend(BackendId),
}

/// A fully resolved, ordered provisioning descriptor.
///
/// Immutable once built; the one piece of state that is safely
/// re-buildable from configuration for every test in a class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisioningDescriptor {
    entries: Vec<Requirement>,
}

impl ProvisioningDescriptor {
    /// Returns the requirement entries in apply order.
    #[must_use]
    pub fn entries(&self) -> &[Requirement] {
        &self.entries
    }

    /// Returns the backend candidates in declaration order.
    #[must_use]
    pub fn backends(&self) -> Vec<BackendId> {
        self.entries
            .iter()
            .filter_map(|entry| match entry {
                Requirement::Backend(id) => Some(*id),
                _ => None,
            })
            .collect()
    }

    /// Returns the feature sets in declaration order.
    #[must_use]
    pub fn feature_sets(&self) -> Vec<&FeatureSetRef> {
        self.entries
            .iter()
            .filter_map(|entry| match entry {
                Requirement::FeatureSet(fs) => Some(fs),
                _ => None,
            })
            .collect()
    }

    /// Returns the system properties in declaration order.
    #[must_use]
    pub fn system_properties(&self) -> Vec<(&str, &str)> {
        self.entries
            .iter()
            .filter_map(|entry| match entry {
                Requirement::SystemProperty { key, value } => {
                    Some((key.as_str(), value.as_str()))
                }
                _ => None,
            })
            .collect()
    }
}

/// Fluent builder for a provisioning descriptor.
#[derive(Debug, Default)]
pub struct DescriptorBuilder {
    entries: Vec<Requirement>,
}

impl DescriptorBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs a logging profile.
    #[must_use]
    pub fn log_profile(mut self, profile: VersionedRef) -> Self {
        self.entries.push(Requirement::LogProfile(profile));
        self
    }

    /// Installs a container profile.
    #[must_use]
    pub fn container_profile(mut self, profile: VersionedRef) -> Self {
        self.entries.push(Requirement::ContainerProfile(profile));
        self
    }

    /// Sets a system property.
    #[must_use]
    pub fn system_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.push(Requirement::SystemProperty {
            key: key.into(),
            value: value.into(),
        });
        self
    }

    /// Sets the default log level through the host's log-level property.
    #[must_use]
    pub fn log_level(self, level: impl Into<String>) -> Self {
        self.system_property(constants::LOG_LEVEL_PROPERTY, level)
    }

    /// Installs a feature set from its repository coordinate.
    #[must_use]
    pub fn feature_set(mut self, features: FeatureSetRef) -> Self {
        self.entries.push(Requirement::FeatureSet(features));
        self
    }

    /// Declares a backend candidate.
    #[must_use]
    pub fn backend(mut self, id: BackendId) -> Self {
        self.entries.push(Requirement::Backend(id));
        self
    }

    /// Validates and returns the finished descriptor.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDescriptor` if a feature set lacks a repository
    /// coordinate, no backend candidate is declared, or a backend is
    /// declared twice.
    pub fn build(self) -> Result<ProvisioningDescriptor> {
        let mut seen = Vec::new();
        for entry in &self.entries {
            match entry {
                Requirement::FeatureSet(fs) if fs.repository.is_empty() => {
                    return Err(RigError::InvalidDescriptor {
                        message: format!(
                            "feature set {:?} has no repository coordinate",
                            fs.features
                        ),
                    });
                }
                Requirement::Backend(id) => {
                    if seen.contains(id) {
                        return Err(RigError::InvalidDescriptor {
                            message: format!("duplicate backend candidate: {id}"),
                        });
                    }
                    seen.push(*id);
                }
                _ => {}
            }
        }
        if seen.is_empty() {
            return Err(RigError::InvalidDescriptor {
                message: "descriptor declares no backend candidates".to_string(),
            });
        }
        tracing::debug!(entries = self.entries.len(), backends = seen.len(), "descriptor built");
        Ok(ProvisioningDescriptor {
            entries: self.entries,
        })
    }
}

/// Builds a descriptor from harness configuration.
///
/// Entries are emitted in apply order: log profile, container profile,
/// log-level property, feature sets, backend candidates.
///
/// # Errors
///
/// Returns `InvalidDescriptor` for the same conditions as
/// [`DescriptorBuilder::build`].
pub fn build_descriptor(config: &HarnessConfig) -> Result<ProvisioningDescriptor> {
    let mut builder = DescriptorBuilder::new().log_profile(VersionedRef::new(
        constants::DEFAULT_LOG_PROFILE,
        constants::DEFAULT_LOG_PROFILE_VERSION,
    ));
    if let Some(profile) = &config.container_profile {
        builder = builder.container_profile(profile.clone());
    }
    builder = builder.log_level(&config.log_level);
    for features in &config.features {
        builder = builder.feature_set(features.clone());
    }
    for id in &config.backends {
        builder = builder.backend(*id);
    }
    builder.build()
}
