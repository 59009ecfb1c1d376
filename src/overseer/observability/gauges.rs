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

use crate::overseer::logger::log_warn;
use crate::overseer::util::error::{with_context, BoxError};
use prometheus::{GaugeVec, Opts, Registry};
use std::sync::Arc;

/// The three per-resource status gauge families.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum GaugeFamily {
    Ready,
    Synced,
    Deleting,
}

impl GaugeFamily {
    pub const ALL: [GaugeFamily; 3] = [GaugeFamily::Ready, GaugeFamily::Synced, GaugeFamily::Deleting];

    pub const fn metric_name(self) -> &'static str {
        match self {
            GaugeFamily::Ready => "managed_resource_status_ready",
            GaugeFamily::Synced => "managed_resource_status_synced",
            GaugeFamily::Deleting => "managed_resource_status_deleting",
        }
    }

    pub const fn help(self) -> &'static str {
        match self {
            GaugeFamily::Ready => "Managed resources is ready",
            GaugeFamily::Synced => "Managed resources is synced",
            GaugeFamily::Deleting => "Managed resources is being deleted",
        }
    }
}

/// Handle onto the gauge registry used by the status synchronizer.
///
/// Implementations must tolerate concurrent calls for arbitrary label
/// combinations. Removing a series that does not exist is a no-op.
pub trait StatusGauges: Send + Sync {
    fn set(&self, family: GaugeFamily, label_values: &[&str], value: f64);

    fn remove(&self, family: GaugeFamily, label_values: &[&str]);
}

impl<T> StatusGauges for Arc<T>
where
    T: StatusGauges + ?Sized,
{
    fn set(&self, family: GaugeFamily, label_values: &[&str], value: f64) {
        self.as_ref().set(family, label_values, value);
    }

    fn remove(&self, family: GaugeFamily, label_values: &[&str]) {
        self.as_ref().remove(family, label_values);
    }
}

/// Status gauges backed by Prometheus `GaugeVec` collectors.
#[derive(Clone)]
pub struct PrometheusStatusGauges {
    ready: GaugeVec,
    synced: GaugeVec,
    deleting: GaugeVec,
}

impl PrometheusStatusGauges {
    /// Builds the three families and registers them with `registry`.
    ///
    /// Fails when a family with the same name is already registered; callers
    /// treat that as a startup error.
    pub fn register(registry: &Registry, label_names: &[&str]) -> Result<Self, BoxError> {
        let gauges = Self {
            ready: build_family(GaugeFamily::Ready, label_names)?,
            synced: build_family(GaugeFamily::Synced, label_names)?,
            deleting: build_family(GaugeFamily::Deleting, label_names)?,
        };

        for family in GaugeFamily::ALL {
            registry
                .register(Box::new(gauges.family(family).clone()))
                .map_err(|err| {
                    with_context(err, format!("failed to register {}", family.metric_name()))
                })?;
        }

        Ok(gauges)
    }

    fn family(&self, family: GaugeFamily) -> &GaugeVec {
        match family {
            GaugeFamily::Ready => &self.ready,
            GaugeFamily::Synced => &self.synced,
            GaugeFamily::Deleting => &self.deleting,
        }
    }
}

fn build_family(family: GaugeFamily, label_names: &[&str]) -> Result<GaugeVec, BoxError> {
    let opts = Opts::new(family.metric_name(), family.help());
    GaugeVec::new(opts, label_names)
        .map_err(|err| with_context(err, format!("failed to build {}", family.metric_name())))
}

impl StatusGauges for PrometheusStatusGauges {
    fn set(&self, family: GaugeFamily, label_values: &[&str], value: f64) {
        match self.family(family).get_metric_with_label_values(label_values) {
            Ok(gauge) => gauge.set(value),
            Err(err) => {
                let error = err.to_string();
                log_warn(
                    "metrics",
                    "Failed to resolve status gauge series",
                    &[("metric", family.metric_name()), ("error", error.as_str())],
                );
            }
        }
    }

    fn remove(&self, family: GaugeFamily, label_values: &[&str]) {
        // Missing series is the expected outcome for repeat deletions.
        let _ = self.family(family).remove_label_values(label_values);
    }
}
