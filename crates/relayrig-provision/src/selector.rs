//! Backend candidate selection.
//!
//! A pure pass-through/validation stage: the selector performs no I/O
//! and never merges candidates. It hands the harness an ordered list to
//! attempt one at a time.

use relayrig_common::error::{Result, RigError};
use relayrig_common::types::BackendId;

use crate::descriptor::ProvisioningDescriptor;

/// Extracts the backend candidates from a descriptor, preserving order.
///
/// # Errors
///
/// Returns `NoBackendAvailable` if the descriptor resolves to an empty
/// candidate list, or `InvalidDescriptor` if a candidate appears twice.
pub fn select_backends(descriptor: &ProvisioningDescriptor) -> Result<Vec<BackendId>> {
    let backends = descriptor.backends();
    if backends.is_empty() {
        return Err(RigError::NoBackendAvailable);
    }
    for (i, id) in backends.iter().enumerate() {
        if backends[..i].contains(id) {
            return Err(RigError::InvalidDescriptor {
                message: format!("duplicate backend candidate: {id}"),
            });
        }
    }
    tracing::debug!(?backends, "backend candidates selected");
    Ok(backends)
}
