//! The process-wide instance. Kept in its own test binary so no other test
//! touches the shared state.

use ledger_kernel::{
    ParamStatus, RegistryConfig, RegistryError, init_instance, instance, reset_instance,
};

#[test]
fn shared_instance_lifecycle() {
    reset_instance();

    let configured = init_instance(RegistryConfig::default().with_mismatch_tolerance(0.05))
        .expect("first init installs the instance");
    assert!(std::ptr::eq(configured, instance()));
    assert_eq!(instance().config().mismatch_tolerance, 0.05);

    assert_eq!(
        init_instance(RegistryConfig::default()).expect_err("second init"),
        RegistryError::AlreadyInitialized
    );

    instance()
        .set("topology.b3", 24, "AUTHORITATIVE:TCS187", ParamStatus::Geometric)
        .expect("write");
    assert!(instance().has("topology.b3"));

    reset_instance();
    assert!(!instance().has("topology.b3"));
    assert!(instance().export_provenance().is_empty());
}
