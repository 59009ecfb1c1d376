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

use crate::overseer::k8s::managed::ManagedResource;
use std::fmt;

/// Identifies the object a reconciliation pass was scheduled for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ReconcileRequest {
    pub namespace: Option<String>,
    pub name: String,
}

impl ReconcileRequest {
    pub fn new(namespace: Option<&str>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace
                .filter(|value| !value.is_empty())
                .map(str::to_string),
            name: name.into(),
        }
    }

    pub fn for_object(resource: &ManagedResource) -> Self {
        Self::new(
            resource.metadata.namespace.as_deref(),
            resource.metadata.name.clone().unwrap_or_default(),
        )
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }
}

impl fmt::Display for ReconcileRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.namespace.as_deref() {
            Some(namespace) => write!(f, "{}/{}", namespace, self.name),
            None => f.write_str(&self.name),
        }
    }
}
