//! Prometheus metrics for the install server and orchestrator.

use once_cell::sync::Lazy;
use prometheus::{IntCounter, IntCounterVec, Opts, Registry};

/// Global metrics registry, exposed by the management API's `/metrics`.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

/// Install manifests served to devices.
pub static MANIFESTS_SERVED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new("airlift_manifests_served_total", "Install manifests served").unwrap()
});

/// Payload transfers finished, by result.
pub static PAYLOADS_SERVED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "airlift_payloads_served_total",
            "Payload transfers finished",
        ),
        &["result"], // "success", "failure"
    )
    .unwrap()
});

/// Packages registered with an install server.
pub static PACKAGES_REGISTERED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "airlift_packages_registered_total",
        "Packages registered with an install server",
    )
    .unwrap()
});

/// OS-level install triggers fired.
pub static INSTALL_TRIGGERS: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "airlift_install_triggers_total",
        "Install triggers fired",
    )
    .unwrap()
});

/// Port collisions hit while binding the install server.
pub static BIND_RETRIES: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "airlift_bind_retries_total",
        "Port collisions during install server bind",
    )
    .unwrap()
});

fn register_metrics(registry: &Registry) {
    registry
        .register(Box::new(MANIFESTS_SERVED.clone()))
        .unwrap();
    registry
        .register(Box::new(PAYLOADS_SERVED.clone()))
        .unwrap();
    registry
        .register(Box::new(PACKAGES_REGISTERED.clone()))
        .unwrap();
    registry
        .register(Box::new(INSTALL_TRIGGERS.clone()))
        .unwrap();
    registry.register(Box::new(BIND_RETRIES.clone())).unwrap();
}
