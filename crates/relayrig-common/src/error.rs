//! Unified error types for the relayrig workspace.
//!
//! One enum covers the whole provisioning and lifecycle taxonomy so that
//! every crate in the workspace propagates the same `Result` alias.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::BackendId;

/// Top-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum RigError {
    /// The provisioning descriptor is malformed. Raised before any
    /// resource is acquired and never retried.
    #[error("invalid descriptor: {message}")]
    InvalidDescriptor {
        /// Description of the malformed input.
        message: String,
    },

    /// No backend candidates were configured. Fatal, fails fast.
    #[error("no container backend available")]
    NoBackendAvailable,

    /// A specific backend failed to boot. Surfaced as a test failure;
    /// whether another candidate is tried on a later run is the test
    /// runner's decision, not this crate's.
    #[error("backend {backend} failed to boot: {message}")]
    BootFailure {
        /// The backend that failed.
        backend: BackendId,
        /// Description of the boot failure.
        message: String,
    },

    /// Context creation was attempted without a live registry handle.
    /// Programming error, never retried.
    #[error("module registry unavailable: {message}")]
    RegistryUnavailable {
        /// Description of why the registry could not be reached.
        message: String,
    },

    /// An operation was invoked in a lifecycle state that does not
    /// permit it. Programming error, never retried.
    #[error("lifecycle violation: {message}")]
    Lifecycle {
        /// Description of the violated transition.
        message: String,
    },

    /// Resource release failed during teardown. Reported additively,
    /// never allowed to overwrite a test body's own failure.
    #[error("teardown failed: {message}")]
    Teardown {
        /// Description of the failed release step.
        message: String,
    },

    /// An I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path where the I/O error occurred.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Serialization or deserialization failed.
    #[error("serialization error: {source}")]
    Serialization {
        /// Underlying serialization error.
        #[from]
        source: serde_json::Error,
    },
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, RigError>;
