use chrono::Utc;
use overseer::overseer::controller::request::ReconcileRequest;
use overseer::overseer::k8s::managed::ManagedResource;
use overseer::overseer::observability::metrics::encode;
use overseer::overseer::observability::status::{
    metrics_reconciler_from_config, new_prometheus_metrics_reconciler, LabelScheme,
    MetricsReconciler,
};
use prometheus::Registry;
use serde_json::json;
use serial_test::serial;
use std::collections::HashMap;
use std::env;

/// Returns the value of the sample in `family` whose labels include every
/// pair in `labels`.
fn sample(text: &str, family: &str, labels: &[(&str, &str)]) -> Option<f64> {
    text.lines()
        .filter(|line| !line.starts_with('#'))
        .filter_map(|line| {
            let rest = line.strip_prefix(family)?.strip_prefix('{')?;
            let (pairs, value) = rest.split_once("} ")?;
            let parsed: HashMap<&str, &str> = pairs
                .split(',')
                .filter_map(|pair| pair.split_once('='))
                .map(|(key, value)| (key, value.trim_matches('"')))
                .collect();
            Some((parsed, value))
        })
        .find(|(parsed, _)| {
            labels
                .iter()
                .all(|(key, value)| parsed.get(key) == Some(value))
        })
        .and_then(|(_, value)| value.trim().parse().ok())
}

fn bucket(ready: &str, synced: &str) -> ManagedResource {
    serde_json::from_value(json!({
        "apiVersion": "s3.aws.upbound.io/v1beta1",
        "kind": "Bucket",
        "metadata": {
            "name": "b1",
            "labels": {
                "crossplane.io/claim-name": "data",
                "crossplane.io/claim-namespace": "team-a"
            },
            "finalizers": ["finalizer.managedresource.crossplane.io"]
        },
        "status": {
            "conditions": [
                { "type": "Ready", "status": ready },
                { "type": "Synced", "status": synced }
            ]
        }
    }))
    .expect("bucket parses")
}

fn exposition(registry: &Registry) -> String {
    String::from_utf8(encode(registry).expect("metrics encoded")).expect("utf8")
}

const B1: &[(&str, &str)] = &[
    ("group", "s3.aws.upbound.io"),
    ("kind", "Bucket"),
    ("name", "b1"),
    ("claim_name", "data"),
    ("claim_namespace", "team-a"),
];

#[test]
fn bucket_lifecycle_through_deletion() {
    let registry = Registry::new();
    let reconciler =
        new_prometheus_metrics_reconciler(&registry, LabelScheme::Full).expect("bootstrap");

    let live = bucket("True", "False");
    let request = ReconcileRequest::for_object(&live);
    reconciler.reconcile_metrics(&request, &live);

    let text = exposition(&registry);
    assert_eq!(sample(&text, "managed_resource_status_ready", B1), Some(1.0));
    assert_eq!(sample(&text, "managed_resource_status_synced", B1), Some(0.0));
    assert_eq!(sample(&text, "managed_resource_status_deleting", B1), Some(0.0));

    // Deletion requested while the provider finalizer is still present.
    let mut deleting = bucket("False", "True");
    deleting.metadata.deletion_timestamp = Some(Utc::now());
    reconciler.reconcile_metrics(&request, &deleting);

    let text = exposition(&registry);
    assert_eq!(sample(&text, "managed_resource_status_deleting", B1), Some(1.0));
    assert_eq!(sample(&text, "managed_resource_status_ready", B1), Some(0.0));
    assert_eq!(sample(&text, "managed_resource_status_synced", B1), Some(1.0));

    // Finalizer released: last pass before garbage collection.
    deleting.metadata.finalizers.clear();
    reconciler.reconcile_metrics(&request, &deleting);
    reconciler.reconcile_metrics(&request, &deleting);

    let text = exposition(&registry);
    for family in [
        "managed_resource_status_ready",
        "managed_resource_status_synced",
        "managed_resource_status_deleting",
    ] {
        assert_eq!(sample(&text, family, B1), None, "{family} left behind");
    }
}

#[test]
fn minimal_scheme_keys_on_kind_and_name() {
    let registry = Registry::new();
    let reconciler =
        new_prometheus_metrics_reconciler(&registry, LabelScheme::Minimal).expect("bootstrap");

    let live = bucket("True", "True");
    reconciler.reconcile_metrics(&ReconcileRequest::for_object(&live), &live);

    let text = exposition(&registry);
    assert!(text.contains("managed_resource_status_ready{kind=\"Bucket\",name=\"b1\"} 1"));
    assert!(!text.contains("claim_name"));
}

#[test]
fn other_resources_survive_a_deletion() {
    let registry = Registry::new();
    let reconciler =
        new_prometheus_metrics_reconciler(&registry, LabelScheme::Full).expect("bootstrap");

    let b1 = bucket("True", "True");
    let mut b2 = bucket("True", "True");
    b2.metadata.name = Some("b2".to_string());
    reconciler.reconcile_metrics(&ReconcileRequest::for_object(&b1), &b1);
    reconciler.reconcile_metrics(&ReconcileRequest::for_object(&b2), &b2);

    b2.metadata.deletion_timestamp = Some(Utc::now());
    b2.metadata.finalizers.clear();
    reconciler.reconcile_metrics(&ReconcileRequest::for_object(&b2), &b2);

    let text = exposition(&registry);
    assert_eq!(sample(&text, "managed_resource_status_ready", B1), Some(1.0));
    assert_eq!(
        sample(
            &text,
            "managed_resource_status_ready",
            &[("kind", "Bucket"), ("name", "b2")]
        ),
        None
    );
}

#[test]
#[serial]
fn disabled_configuration_yields_noop() {
    let previous = env::var("OVERSEER_METRICS_ENABLED").ok();
    env::set_var("OVERSEER_METRICS_ENABLED", "false");

    let registry = Registry::new();
    let result = metrics_reconciler_from_config(&registry);
    match previous {
        Some(value) => env::set_var("OVERSEER_METRICS_ENABLED", value),
        None => env::remove_var("OVERSEER_METRICS_ENABLED"),
    }

    let reconciler = result.expect("reconciler built");
    let live = bucket("True", "True");
    reconciler.reconcile_metrics(&ReconcileRequest::for_object(&live), &live);
    assert!(exposition(&registry).is_empty());

    // Nothing was registered, so the families are still free.
    new_prometheus_metrics_reconciler(&registry, LabelScheme::Full).expect("families unused");
}
