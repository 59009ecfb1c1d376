use chrono::Utc;
use overseer::overseer::controller::request::ReconcileRequest;
use overseer::overseer::k8s::condition::ConditionStatus;
use overseer::overseer::observability::gauges::GaugeFamily;
use overseer::overseer::observability::status::{
    LabelScheme, MetricsReconciler, StatusMetricsReconciler,
};
use overseer::overseer::test_support::{managed_fixture, InMemoryStatusGauges};
use std::sync::Arc;

const WORKERS: usize = 16;
const PASSES: usize = 25;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn parallel_workers_keep_series_per_resource() {
    let gauges = Arc::new(InMemoryStatusGauges::new());
    let reconciler: Arc<dyn MetricsReconciler> = Arc::new(StatusMetricsReconciler::new(
        Arc::clone(&gauges),
        LabelScheme::Minimal,
    ));

    let mut handles = Vec::with_capacity(WORKERS);
    for worker in 0..WORKERS {
        let reconciler = Arc::clone(&reconciler);
        handles.push(tokio::spawn(async move {
            let name = format!("bucket-{worker}");
            let mut resource = managed_fixture(
                "s3.aws.upbound.io/v1beta1",
                "Bucket",
                &name,
                ConditionStatus::True,
                ConditionStatus::False,
            );
            resource.metadata.finalizers = vec!["in-use".to_string()];
            let request = ReconcileRequest::for_object(&resource);
            for _ in 0..PASSES {
                reconciler.reconcile_metrics(&request, &resource);
                tokio::task::yield_now().await;
            }

            if worker % 2 == 0 {
                resource.metadata.deletion_timestamp = Some(Utc::now());
                reconciler.reconcile_metrics(&request, &resource);
                resource.metadata.finalizers.clear();
                reconciler.reconcile_metrics(&request, &resource);
            }
        }));
    }
    for handle in handles {
        handle.await.expect("worker completed");
    }

    assert_eq!(gauges.len(), (WORKERS / 2) * GaugeFamily::ALL.len());
    for worker in 0..WORKERS {
        let name = format!("bucket-{worker}");
        let key = ["Bucket", name.as_str()];
        if worker % 2 == 0 {
            assert!(!gauges.contains(GaugeFamily::Deleting, &key), "{name} not removed");
        } else {
            assert_eq!(gauges.value(GaugeFamily::Ready, &key), Some(1.0));
            assert_eq!(gauges.value(GaugeFamily::Synced, &key), Some(0.0));
            assert_eq!(gauges.value(GaugeFamily::Deleting, &key), Some(0.0));
        }
    }
}
