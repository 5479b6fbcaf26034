//! # relayrig-harness
//!
//! Per-test orchestration between test code and a live module-host
//! container: boot a container from a provisioning descriptor, inject its
//! registry handle, build a routing context wired through that registry,
//! and guarantee symmetric teardown on every exit path.
//!
//! # Example
//!
//! ```rust
//! use relayrig_common::config::HarnessConfig;
//! use relayrig_harness::backend::BackendSet;
//! use relayrig_harness::lifecycle::LifecycleController;
//!
//! # fn main() -> relayrig_common::error::Result<()> {
//! let mut controller =
//!     LifecycleController::from_config(&HarnessConfig::default(), BackendSet::module_hosts())?;
//! controller.set_up()?;
//! let context = controller.begin_test()?;
//! assert!(context.is_started());
//! controller.tear_down()?;
//! # Ok(())
//! # }
//! ```

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod backend;
pub mod context;
pub mod host;
pub mod lifecycle;
pub mod registry;
