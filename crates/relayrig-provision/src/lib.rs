//! Declarative provisioning for the relayrig test harness.
//!
//! Assembles the ordered requirement list a container backend interprets
//! at boot, and validates the backend candidate set a test run iterates.
//! Everything here is pure assembly; no I/O happens until a backend
//! receives the finished descriptor.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod descriptor;
pub mod selector;
