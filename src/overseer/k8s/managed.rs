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

use super::condition::{find_condition, Condition, ConditionType};
use super::meta::{GroupVersionKind, ObjectMeta};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Read-only view of a resource under controller supervision.
pub trait Managed: Send + Sync {
    fn group_version_kind(&self) -> GroupVersionKind;

    /// Object name, or an empty string when the metadata omits it.
    fn name(&self) -> &str;

    fn label(&self, key: &str) -> Option<&str>;

    /// Returns the condition of the given type. Absent conditions are
    /// reported as `Unknown` rather than as an error.
    fn condition(&self, condition_type: ConditionType) -> Condition;

    fn deletion_timestamp(&self) -> Option<&DateTime<Utc>>;

    fn finalizers(&self) -> &[String];
}

/// True once the API server has stamped a deletion timestamp on the object.
pub fn was_deleted(managed: &dyn Managed) -> bool {
    managed.deletion_timestamp().is_some()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ManagedStatus {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,
}

/// Untyped managed resource as returned by the API server. The spec is kept
/// as raw JSON since only metadata and conditions are inspected.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ManagedResource {
    #[serde(rename = "apiVersion")]
    pub api_version: String,
    pub kind: String,
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub spec: Value,
    #[serde(default)]
    pub status: ManagedStatus,
}

impl Managed for ManagedResource {
    fn group_version_kind(&self) -> GroupVersionKind {
        GroupVersionKind::from_api_version(&self.api_version, &self.kind)
    }

    fn name(&self) -> &str {
        self.metadata.name.as_deref().unwrap_or_default()
    }

    fn label(&self, key: &str) -> Option<&str> {
        self.metadata.label(key)
    }

    fn condition(&self, condition_type: ConditionType) -> Condition {
        find_condition(&self.status.conditions, condition_type)
    }

    fn deletion_timestamp(&self) -> Option<&DateTime<Utc>> {
        self.metadata.deletion_timestamp.as_ref()
    }

    fn finalizers(&self) -> &[String] {
        &self.metadata.finalizers
    }
}
