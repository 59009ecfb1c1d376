/*
 * Copyright (C) 2024 The Overseer Authors
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 * http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

//! Projects managed resource state onto the `managed_resource_status_*`
//! gauge families.
//!
//! Every reconcile pass sets the ready, synced, and deleting series for the
//! resource. The pass that observes a deleted resource without finalizers is
//! the last one before the API server garbage collects it, so that pass
//! removes all three series instead; otherwise they would linger forever.

use crate::overseer::config;
use crate::overseer::controller::request::ReconcileRequest;
use crate::overseer::k8s::condition::{ConditionStatus, ConditionType};
use crate::overseer::k8s::managed::{was_deleted, Managed};
use crate::overseer::k8s::meta::{LABEL_CLAIM_NAME, LABEL_CLAIM_NAMESPACE};
use crate::overseer::logger::{self, log_debug, log_info, LogLevel};
use crate::overseer::observability::gauges::{GaugeFamily, PrometheusStatusGauges, StatusGauges};
use crate::overseer::util::error::BoxError;
use prometheus::Registry;

const COMPONENT: &str = "metrics";

/// Label sets the status gauges can be exported with.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum LabelScheme {
    /// `{kind, name}`
    Minimal,
    /// `{group, kind, name, claim_name, claim_namespace}`
    #[default]
    Full,
}

impl LabelScheme {
    pub const NAMES: &'static [&'static str] = &["full", "minimal"];

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "full" => Some(LabelScheme::Full),
            "minimal" => Some(LabelScheme::Minimal),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            LabelScheme::Minimal => "minimal",
            LabelScheme::Full => "full",
        }
    }

    pub const fn label_names(self) -> &'static [&'static str] {
        match self {
            LabelScheme::Minimal => &["kind", "name"],
            LabelScheme::Full => &["group", "kind", "name", "claim_name", "claim_namespace"],
        }
    }
}

/// Identity of the gauge series belonging to one managed resource.
///
/// Keys are name based; two resources of the same group and kind that share
/// a name will share series.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct StatusLabels {
    pub group: String,
    pub kind: String,
    pub name: String,
    pub claim_name: String,
    pub claim_namespace: String,
}

impl StatusLabels {
    pub fn from_managed(managed: &dyn Managed) -> Self {
        let gvk = managed.group_version_kind();
        Self {
            group: gvk.group,
            kind: gvk.kind,
            name: managed.name().to_string(),
            claim_name: managed.label(LABEL_CLAIM_NAME).unwrap_or_default().to_string(),
            claim_namespace: managed
                .label(LABEL_CLAIM_NAMESPACE)
                .unwrap_or_default()
                .to_string(),
        }
    }

    /// Label values in the order declared by `scheme.label_names()`.
    pub fn values(&self, scheme: LabelScheme) -> Vec<&str> {
        match scheme {
            LabelScheme::Minimal => vec![self.kind.as_str(), self.name.as_str()],
            LabelScheme::Full => vec![
                self.group.as_str(),
                self.kind.as_str(),
                self.name.as_str(),
                self.claim_name.as_str(),
                self.claim_namespace.as_str(),
            ],
        }
    }
}

/// The facts a reconcile pass reads from a managed resource.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct StatusObservation {
    pub ready: ConditionStatus,
    pub synced: ConditionStatus,
    pub deleting: bool,
    pub has_finalizers: bool,
}

impl StatusObservation {
    pub fn from_managed(managed: &dyn Managed) -> Self {
        Self {
            ready: managed.condition(ConditionType::Ready).status,
            synced: managed.condition(ConditionType::Synced).status,
            deleting: was_deleted(managed),
            has_finalizers: !managed.finalizers().is_empty(),
        }
    }

    /// The resource is deleted and nothing holds it back from removal.
    pub fn is_final(&self) -> bool {
        self.deleting && !self.has_finalizers
    }
}

/// `Unknown` is reported as not ready, the same as `False`.
pub fn condition_value(status: ConditionStatus) -> f64 {
    if status.is_true() {
        1.0
    } else {
        0.0
    }
}

fn flag_value(flag: bool) -> f64 {
    if flag {
        1.0
    } else {
        0.0
    }
}

/// Publishes status gauges for managed resources after each reconcile.
pub trait MetricsReconciler: Send + Sync {
    /// Reads the resource and synchronizes its gauges.
    fn reconcile_metrics(&self, request: &ReconcileRequest, managed: &dyn Managed);

    /// Sets or removes the ready, synced, and deleting series for `labels`.
    fn synchronize(&self, labels: &StatusLabels, observation: StatusObservation);
}

/// Used when metrics are disabled.
#[derive(Clone, Copy, Debug, Default)]
pub struct NopMetricsReconciler;

impl MetricsReconciler for NopMetricsReconciler {
    fn reconcile_metrics(&self, _request: &ReconcileRequest, _managed: &dyn Managed) {}

    fn synchronize(&self, _labels: &StatusLabels, _observation: StatusObservation) {}
}

pub struct StatusMetricsReconciler<G = PrometheusStatusGauges> {
    gauges: G,
    scheme: LabelScheme,
}

impl<G> StatusMetricsReconciler<G>
where
    G: StatusGauges,
{
    pub fn new(gauges: G, scheme: LabelScheme) -> Self {
        Self { gauges, scheme }
    }

    pub fn scheme(&self) -> LabelScheme {
        self.scheme
    }

    pub fn gauges(&self) -> &G {
        &self.gauges
    }
}

impl<G> MetricsReconciler for StatusMetricsReconciler<G>
where
    G: StatusGauges,
{
    fn reconcile_metrics(&self, request: &ReconcileRequest, managed: &dyn Managed) {
        let labels = StatusLabels::from_managed(managed);
        let observation = StatusObservation::from_managed(managed);
        if observation.is_final() && logger::enabled(LogLevel::Debug) {
            let request = request.to_string();
            log_debug(
                COMPONENT,
                "Managed resource finalized; removing status gauges",
                &[
                    ("request", request.as_str()),
                    ("kind", labels.kind.as_str()),
                    ("name", labels.name.as_str()),
                ],
            );
        }
        self.synchronize(&labels, observation);
    }

    fn synchronize(&self, labels: &StatusLabels, observation: StatusObservation) {
        let values = labels.values(self.scheme);

        if observation.is_final() {
            for family in GaugeFamily::ALL {
                self.gauges.remove(family, &values);
            }
            return;
        }

        self.gauges
            .set(GaugeFamily::Ready, &values, condition_value(observation.ready));
        self.gauges
            .set(GaugeFamily::Synced, &values, condition_value(observation.synced));
        self.gauges
            .set(GaugeFamily::Deleting, &values, flag_value(observation.deleting));
    }
}

/// Registers the status gauge families with `registry` and returns a
/// reconciler bound to them. Call once per registry; a second call fails
/// because the families are already registered.
pub fn new_prometheus_metrics_reconciler(
    registry: &Registry,
    scheme: LabelScheme,
) -> Result<StatusMetricsReconciler<PrometheusStatusGauges>, BoxError> {
    let gauges = PrometheusStatusGauges::register(registry, scheme.label_names())?;
    let labels = scheme.label_names().join(",");
    log_info(
        COMPONENT,
        "Registered managed resource status gauges",
        &[("scheme", scheme.as_str()), ("labels", labels.as_str())],
    );
    Ok(StatusMetricsReconciler::new(gauges, scheme))
}

/// Builds the reconciler selected by `OVERSEER_METRICS_ENABLED` and
/// `OVERSEER_METRICS_LABELS`.
pub fn metrics_reconciler_from_config(
    registry: &Registry,
) -> Result<Box<dyn MetricsReconciler>, BoxError> {
    if !config::metrics_enabled()? {
        log_info(COMPONENT, "Managed resource status gauges disabled", &[]);
        return Ok(Box::new(NopMetricsReconciler));
    }
    let scheme = config::label_scheme()?;
    Ok(Box::new(new_prometheus_metrics_reconciler(registry, scheme)?))
}
