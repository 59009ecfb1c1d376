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

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Well-known condition types reported by managed resources.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ConditionType {
    /// The external resource is available for use.
    Ready,
    /// The most recent reconcile of the desired state succeeded.
    Synced,
}

impl ConditionType {
    pub const fn as_str(self) -> &'static str {
        match self {
            ConditionType::Ready => "Ready",
            ConditionType::Synced => "Synced",
        }
    }
}

impl Display for ConditionType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum ConditionStatus {
    True,
    False,
    #[default]
    #[serde(other)]
    Unknown,
}

impl ConditionStatus {
    pub fn is_true(self) -> bool {
        matches!(self, ConditionStatus::True)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Condition {
    #[serde(rename = "type")]
    pub condition_type: String,
    #[serde(default)]
    pub status: ConditionStatus,
    #[serde(
        rename = "lastTransitionTime",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub last_transition_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Condition {
    /// Placeholder returned for a condition the resource has not reported yet.
    pub fn unknown(condition_type: ConditionType) -> Self {
        Self {
            condition_type: condition_type.as_str().to_string(),
            status: ConditionStatus::Unknown,
            last_transition_time: None,
            reason: None,
            message: None,
        }
    }
}

/// Finds the condition of the given type, falling back to an `Unknown`
/// placeholder when it is absent.
pub fn find_condition(conditions: &[Condition], condition_type: ConditionType) -> Condition {
    conditions
        .iter()
        .find(|condition| condition.condition_type == condition_type.as_str())
        .cloned()
        .unwrap_or_else(|| Condition::unknown(condition_type))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_condition_is_unknown() {
        let condition = find_condition(&[], ConditionType::Ready);
        assert_eq!(condition.condition_type, "Ready");
        assert_eq!(condition.status, ConditionStatus::Unknown);
    }

    #[test]
    fn unrecognised_status_deserializes_as_unknown() {
        let condition: Condition = serde_json::from_value(serde_json::json!({
            "type": "Synced",
            "status": "Maybe"
        }))
        .expect("condition parses");
        assert_eq!(condition.status, ConditionStatus::Unknown);
    }

    #[test]
    fn finds_condition_by_type() {
        let conditions: Vec<Condition> = serde_json::from_value(serde_json::json!([
            { "type": "Ready", "status": "False", "reason": "Creating" },
            { "type": "Synced", "status": "True", "lastTransitionTime": "2024-05-01T10:00:00Z" }
        ]))
        .expect("conditions parse");

        assert_eq!(
            find_condition(&conditions, ConditionType::Ready).status,
            ConditionStatus::False
        );
        assert!(find_condition(&conditions, ConditionType::Synced).status.is_true());
    }
}
