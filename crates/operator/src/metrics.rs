use lazy_static::lazy_static;
use prometheus::{register_int_counter, Encoder, IntCounter, Registry, TextEncoder};

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();
    pub static ref ALERTS_RECEIVED_TOTAL: IntCounter = register_int_counter!(
        "selfheal_alerts_received_total",
        "Total number of alerts received on the webhook."
    )
    .unwrap();
    pub static ref REMEDIATIONS_TRIGGERED_TOTAL: IntCounter = register_int_counter!(
        "selfheal_remediations_triggered_total",
        "Total number of playbook runs started."
    )
    .unwrap();
    pub static ref REMEDIATION_FAILURES_TOTAL: IntCounter = register_int_counter!(
        "selfheal_remediation_failures_total",
        "Total number of playbook runs that failed."
    )
    .unwrap();
}

pub fn register_metrics() {
    REGISTRY
        .register(Box::new(ALERTS_RECEIVED_TOTAL.clone()))
        .expect("Failed to register ALERTS_RECEIVED_TOTAL");
    REGISTRY
        .register(Box::new(REMEDIATIONS_TRIGGERED_TOTAL.clone()))
        .expect("Failed to register REMEDIATIONS_TRIGGERED_TOTAL");
    REGISTRY
        .register(Box::new(REMEDIATION_FAILURES_TOTAL.clone()))
        .expect("Failed to register REMEDIATION_FAILURES_TOTAL");
}

pub fn gather_metrics() -> String {
    let mut buffer = vec![];
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    encoder
        .encode(&metric_families, &mut buffer)
        .expect("Failed to encode metrics");
    String::from_utf8(buffer).expect("Failed to convert metrics to string")
}
