//! End-to-end tests for the relayrig harness.
//!
//! These tests walk the full pipeline:
//! 1. Build a provisioning descriptor from configuration
//! 2. Select backend candidates in declared order
//! 3. Boot a module host, skipping unavailable candidates
//! 4. Wire a routing context through the injected registry handle
//! 5. Tear down symmetrically and idempotently

#![allow(clippy::expect_used, clippy::unwrap_used)]

use relayrig_common::config::{BackendRunPolicy, HarnessConfig};
use relayrig_common::error::RigError;
use relayrig_common::types::{BackendId, FeatureSetRef, LifecycleState, VersionedRef};
use relayrig_harness::backend::BackendSet;
use relayrig_harness::context::ContextFactory;
use relayrig_harness::host::ModuleHostBackend;
use relayrig_harness::lifecycle::LifecycleController;
use relayrig_harness::registry::RegistryHandle;
use relayrig_provision::descriptor::build_descriptor;
use relayrig_provision::selector::select_backends;

fn camel_config() -> HarnessConfig {
    HarnessConfig {
        log_level: "INFO".into(),
        container_profile: Some(VersionedRef::new("spring.dm", "1.2.0")),
        features: vec![
            FeatureSetRef::new("camel-core-features", ["camel-core"]),
            FeatureSetRef::new("camel-core-features", ["camel-osgi"]),
        ],
        backends: vec![BackendId::Knopflerfish, BackendId::Felix, BackendId::Equinox],
        run_policy: BackendRunPolicy::FirstAvailable,
    }
}

// ── Descriptor + selection ───────────────────────────────────────────

#[test]
fn pipeline_selection_preserves_configured_order() {
    let descriptor = build_descriptor(&camel_config()).expect("valid config");
    let backends = select_backends(&descriptor).expect("candidates");
    assert_eq!(
        backends,
        vec![BackendId::Knopflerfish, BackendId::Felix, BackendId::Equinox]
    );
}

#[test]
fn pipeline_empty_backend_config_fails_before_boot() {
    let mut config = camel_config();
    config.backends.clear();
    let result = build_descriptor(&config);
    assert!(
        matches!(result, Err(RigError::InvalidDescriptor { .. })),
        "empty backend list should fail fast"
    );
}

// ── Full lifecycle against the second candidate ──────────────────────

#[test]
fn pipeline_setup_falls_through_to_felix_when_knopflerfish_unavailable() {
    let mut set = BackendSet::new();
    set.register(Box::new(ModuleHostBackend::unavailable(
        BackendId::Knopflerfish,
    )))
    .expect("register knopflerfish");
    set.register(Box::new(ModuleHostBackend::new(BackendId::Felix)))
        .expect("register felix");
    set.register(Box::new(ModuleHostBackend::new(BackendId::Equinox)))
        .expect("register equinox");

    let mut controller =
        LifecycleController::from_config(&camel_config(), set).expect("controller");
    controller.set_up().expect("setup against felix");

    assert_eq!(controller.state(), LifecycleState::Ready);
    let handle = controller.registry_handle();
    assert!(handle.is_live(), "handle injected by boot");
    assert_eq!(
        handle.get().expect("live registry").backend(),
        BackendId::Felix
    );

    let context = controller.context().expect("context created");
    assert_eq!(context.backend(), BackendId::Felix);
    assert!(context.is_started());
    assert_eq!(
        context.processors(),
        ["camel-core-processor", "camel-osgi-processor"]
    );
    assert_eq!(
        context.endpoints(),
        ["camel-core-endpoint", "camel-osgi-endpoint"]
    );

    controller.tear_down().expect("teardown");
    assert_eq!(controller.state(), LifecycleState::Done);
    assert!(!handle.is_live(), "no leaked handles after teardown");

    controller.tear_down().expect("second teardown is a no-op");
    assert_eq!(controller.state(), LifecycleState::Done);
}

#[test]
fn pipeline_test_body_runs_against_started_context() {
    let mut controller =
        LifecycleController::from_config(&camel_config(), BackendSet::module_hosts())
            .expect("controller");
    controller.set_up().expect("setup");

    let context = controller.begin_test().expect("begin test");
    assert!(context.is_started());
    assert!(context.processors().contains(&"camel-core-processor".to_string()));
    assert_eq!(controller.state(), LifecycleState::Running);

    controller.tear_down().expect("teardown");
    assert_eq!(controller.state(), LifecycleState::Done);
}

// ── Failure attribution ──────────────────────────────────────────────

#[test]
fn pipeline_boot_failure_never_creates_context() {
    let mut set = BackendSet::new();
    set.register(Box::new(ModuleHostBackend::failing(BackendId::Knopflerfish)))
        .expect("register");
    let mut config = camel_config();
    config.backends = vec![BackendId::Knopflerfish];

    let mut controller = LifecycleController::from_config(&config, set).expect("controller");
    let result = controller.set_up();

    assert!(
        matches!(
            result,
            Err(RigError::BootFailure {
                backend: BackendId::Knopflerfish,
                ..
            })
        ),
        "boot failure should be attributed to the backend"
    );
    assert!(controller.context().is_none());
    assert_eq!(controller.state(), LifecycleState::Done);
    controller.tear_down().expect("teardown after failed setup");
}

#[test]
fn pipeline_context_creation_without_boot_fails() {
    let factory = ContextFactory::new();
    let result = factory.create_context(&RegistryHandle::unbound());
    assert!(
        matches!(result, Err(RigError::RegistryUnavailable { .. })),
        "context creation without a booted container should fail"
    );
}

// ── Cross-test isolation ─────────────────────────────────────────────

#[test]
fn pipeline_each_run_boots_a_fresh_container() {
    let mut controller =
        LifecycleController::from_config(&camel_config(), BackendSet::module_hosts())
            .expect("controller");

    controller.set_up().expect("first setup");
    let first_handle = controller.registry_handle();
    let first_context = controller.context().expect("context").id().clone();
    controller.tear_down().expect("first teardown");
    assert!(!first_handle.is_live(), "first container released");

    controller.set_up().expect("second setup");
    let second_handle = controller.registry_handle();
    let second_context = controller.context().expect("context").id().clone();
    assert!(second_handle.is_live());
    assert_ne!(
        first_context, second_context,
        "contexts are never reused across tests"
    );
    controller.tear_down().expect("second teardown");
}

#[test]
fn pipeline_rotation_exercises_each_backend_once() {
    let mut config = camel_config();
    config.run_policy = BackendRunPolicy::RotateCandidates;
    let mut controller =
        LifecycleController::from_config(&config, BackendSet::module_hosts()).expect("controller");

    let mut seen = Vec::new();
    for _ in 0..3 {
        controller.set_up().expect("setup");
        seen.push(controller.context().expect("context").backend());
        controller.tear_down().expect("teardown");
    }
    assert_eq!(
        seen,
        vec![BackendId::Knopflerfish, BackendId::Felix, BackendId::Equinox]
    );
}
