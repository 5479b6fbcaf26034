//! Domain primitive types used across the relayrig workspace.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the interchangeable container engine implementations.
///
/// The harness treats all three identically; they differ only in which
/// engine interprets the provisioning descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendId {
    /// The Knopflerfish container engine.
    Knopflerfish,
    /// The Felix container engine.
    Felix,
    /// The Equinox container engine.
    Equinox,
}

impl BackendId {
    /// Returns the lowercase identifier used in configuration.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Knopflerfish => "knopflerfish",
            Self::Felix => "felix",
            Self::Equinox => "equinox",
        }
    }
}

impl fmt::Display for BackendId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BackendId {
    type Err = crate::error::RigError;

    fn from_str(s: &str) -> crate::error::Result<Self> {
        match s {
            "knopflerfish" => Ok(Self::Knopflerfish),
            "felix" => Ok(Self::Felix),
            "equinox" => Ok(Self::Equinox),
            other => Err(crate::error::RigError::InvalidDescriptor {
                message: format!("unknown backend id: {other}"),
            }),
        }
    }
}

/// A named, versioned reference to a runtime profile (log profile,
/// container profile).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionedRef {
    /// Profile name, e.g. `"spring.dm"`.
    pub name: String,
    /// Profile version, e.g. `"1.2.0"`.
    pub version: String,
}

impl VersionedRef {
    /// Creates a new versioned reference.
    #[must_use]
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

impl fmt::Display for VersionedRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.version)
    }
}

/// A feature set resolvable from a repository coordinate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSetRef {
    /// Repository coordinate the feature descriptor is resolved from.
    pub repository: String,
    /// Named features to install from the descriptor.
    pub features: Vec<String>,
}

impl FeatureSetRef {
    /// Creates a feature-set reference from a repository coordinate and
    /// feature names.
    #[must_use]
    pub fn new(
        repository: impl Into<String>,
        features: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            repository: repository.into(),
            features: features.into_iter().map(Into::into).collect(),
        }
    }
}

/// Unique identifier for a routing context instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContextId(String);

impl ContextId {
    /// Creates a context ID from a string value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a random context ID.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Returns the inner string representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle state of the test harness controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LifecycleState {
    /// No setup has been invoked yet.
    Uninitialized,
    /// A backend candidate is being booted.
    Booting,
    /// Container booted, context created and started.
    Ready,
    /// The test body is executing against the context.
    Running,
    /// Teardown is releasing the context and container.
    TearingDown,
    /// Lifecycle complete; further teardown calls are no-ops.
    Done,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uninitialized => write!(f, "uninitialized"),
            Self::Booting => write!(f, "booting"),
            Self::Ready => write!(f, "ready"),
            Self::Running => write!(f, "running"),
            Self::TearingDown => write!(f, "tearing-down"),
            Self::Done => write!(f, "done"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_id_roundtrips_through_str() {
        for id in [BackendId::Knopflerfish, BackendId::Felix, BackendId::Equinox] {
            let parsed: BackendId = id.as_str().parse().expect("valid id");
            assert_eq!(parsed, id);
        }
    }

    #[test]
    fn backend_id_unknown_rejected() {
        let result = "kubernetes".parse::<BackendId>();
        assert!(result.is_err(), "unknown backend id should be rejected");
    }

    #[test]
    fn context_id_generate_unique() {
        let id1 = ContextId::generate();
        let id2 = ContextId::generate();
        assert_ne!(id1, id2, "generated IDs should be unique");
        assert!(!id1.as_str().is_empty());
    }

    #[test]
    fn versioned_ref_display() {
        let profile = VersionedRef::new("spring.dm", "1.2.0");
        assert_eq!(format!("{profile}"), "spring.dm@1.2.0");
    }

    #[test]
    fn lifecycle_state_display() {
        assert_eq!(format!("{}", LifecycleState::Uninitialized), "uninitialized");
        assert_eq!(format!("{}", LifecycleState::TearingDown), "tearing-down");
        assert_eq!(format!("{}", LifecycleState::Done), "done");
    }
}
