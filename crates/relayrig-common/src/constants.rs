//! Workspace-wide constants and provisioning defaults.

use crate::types::BackendId;

/// Default log level activated before anything else in the container.
pub const DEFAULT_LOG_LEVEL: &str = "INFO";

/// System property key the module host reads its log level from.
pub const LOG_LEVEL_PROPERTY: &str = "relayrig.log.level";

/// Default log profile installed into the container.
pub const DEFAULT_LOG_PROFILE: &str = "log";
/// Default log profile version.
pub const DEFAULT_LOG_PROFILE_VERSION: &str = "1.3.0";

/// Backend candidates attempted when configuration names none explicitly,
/// in priority order.
pub const DEFAULT_BACKENDS: [BackendId; 3] =
    [BackendId::Knopflerfish, BackendId::Felix, BackendId::Equinox];

/// Application name used in log output.
pub const APP_NAME: &str = "relayrig";
