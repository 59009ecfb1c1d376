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

use crate::overseer::k8s::condition::{Condition, ConditionStatus, ConditionType};
use crate::overseer::k8s::managed::{ManagedResource, ManagedStatus};
use crate::overseer::k8s::meta::ObjectMeta;
use crate::overseer::observability::gauges::{GaugeFamily, StatusGauges};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

type SeriesKey = (GaugeFamily, Vec<String>);

/// In-memory stand-in for the gauge registry. Records exactly which series
/// exist and their latest values.
#[derive(Debug, Default)]
pub struct InMemoryStatusGauges {
    series: Mutex<BTreeMap<SeriesKey, f64>>,
}

impl InMemoryStatusGauges {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<SeriesKey, f64>> {
        self.series
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn value(&self, family: GaugeFamily, label_values: &[&str]) -> Option<f64> {
        self.lock().get(&series_key(family, label_values)).copied()
    }

    pub fn contains(&self, family: GaugeFamily, label_values: &[&str]) -> bool {
        self.value(family, label_values).is_some()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn snapshot(&self) -> BTreeMap<SeriesKey, f64> {
        self.lock().clone()
    }
}

fn series_key(family: GaugeFamily, label_values: &[&str]) -> SeriesKey {
    (
        family,
        label_values.iter().map(|value| value.to_string()).collect(),
    )
}

impl StatusGauges for InMemoryStatusGauges {
    fn set(&self, family: GaugeFamily, label_values: &[&str], value: f64) {
        self.lock().insert(series_key(family, label_values), value);
    }

    fn remove(&self, family: GaugeFamily, label_values: &[&str]) {
        self.lock().remove(&series_key(family, label_values));
    }
}

/// Builds a live managed resource reporting the given Ready and Synced
/// statuses.
pub fn managed_fixture(
    api_version: &str,
    kind: &str,
    name: &str,
    ready: ConditionStatus,
    synced: ConditionStatus,
) -> ManagedResource {
    let condition = |condition_type: ConditionType, status: ConditionStatus| Condition {
        status,
        ..Condition::unknown(condition_type)
    };

    ManagedResource {
        api_version: api_version.to_string(),
        kind: kind.to_string(),
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            ..Default::default()
        },
        status: ManagedStatus {
            conditions: vec![
                condition(ConditionType::Ready, ready),
                condition(ConditionType::Synced, synced),
            ],
        },
        ..Default::default()
    }
}
