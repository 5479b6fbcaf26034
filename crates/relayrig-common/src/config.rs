//! Harness configuration model.
//!
//! The configuration is the declarative input to descriptor building: it
//! names the log level, container profile, feature sets, and backend
//! candidates for a test class. It is plain data with no behaviour beyond
//! JSON loading.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, RigError};
use crate::types::{BackendId, FeatureSetRef, VersionedRef};

/// Policy for how the lifecycle controller walks the backend candidate
/// list across repeated setups.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackendRunPolicy {
    /// Each setup boots the first candidate that reports available.
    #[default]
    FirstAvailable,
    /// Successive setups advance through the candidate list so repeated
    /// runs exercise each backend once.
    RotateCandidates,
}

/// Root configuration for the test harness.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// Log level the container activates before feature scanning.
    pub log_level: String,
    /// Container profile to install, if any.
    pub container_profile: Option<VersionedRef>,
    /// Feature sets to resolve and install before boot completes.
    pub features: Vec<FeatureSetRef>,
    /// Backend candidates in priority order.
    pub backends: Vec<BackendId>,
    /// How candidates are chosen across repeated setups.
    #[serde(default)]
    pub run_policy: BackendRunPolicy,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            log_level: crate::constants::DEFAULT_LOG_LEVEL.to_string(),
            container_profile: None,
            features: Vec::new(),
            backends: crate::constants::DEFAULT_BACKENDS.to_vec(),
            run_policy: BackendRunPolicy::default(),
        }
    }
}

impl HarnessConfig {
    /// Loads a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| RigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(serde_json::from_str(&content)?)
    }
}
