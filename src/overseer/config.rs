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

use crate::overseer::logger::{LogFormat, LogLevel};
use crate::overseer::observability::status::LabelScheme;
use crate::overseer::util::error::{invalid_value, BoxError};
use std::env;

const BOOLEAN_NAMES: &[&str] = &["true", "false", "1", "0", "yes", "no", "on", "off"];

/// Enum for supported configuration parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Config {
    MetricsEnabled,
    MetricsLabels,
    LogFormat,
    LogLevel,
}

impl Config {
    /// Returns the associated environment variable for the config parameter.
    pub fn env_var(&self) -> &'static str {
        match self {
            Config::MetricsEnabled => "OVERSEER_METRICS_ENABLED",
            Config::MetricsLabels => "OVERSEER_METRICS_LABELS",
            Config::LogFormat => "OVERSEER_LOG_FORMAT",
            Config::LogLevel => "OVERSEER_LOG_LEVEL",
        }
    }

    pub fn default_value(&self) -> &'static str {
        match self {
            Config::MetricsEnabled => "true",
            Config::MetricsLabels => "full",
            Config::LogFormat => "text",
            Config::LogLevel => "info",
        }
    }

    /// Returns the effective value, either from environment or default.
    /// Blank values count as unset.
    pub fn get_value(&self) -> String {
        env::var(self.env_var())
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| self.default_value().to_string())
    }
}

/// Whether managed resource status gauges should be emitted at all.
pub fn metrics_enabled() -> Result<bool, BoxError> {
    let value = Config::MetricsEnabled.get_value();
    parse_bool(&value)
        .ok_or_else(|| invalid_value(Config::MetricsEnabled.env_var(), value, BOOLEAN_NAMES))
}

pub fn label_scheme() -> Result<LabelScheme, BoxError> {
    let value = Config::MetricsLabels.get_value();
    LabelScheme::parse(&value)
        .ok_or_else(|| invalid_value(Config::MetricsLabels.env_var(), value, LabelScheme::NAMES))
}

pub fn log_format() -> Result<LogFormat, BoxError> {
    let value = Config::LogFormat.get_value();
    LogFormat::parse(&value)
        .ok_or_else(|| invalid_value(Config::LogFormat.env_var(), value, LogFormat::NAMES))
}

pub fn log_level() -> Result<LogLevel, BoxError> {
    let value = Config::LogLevel.get_value();
    LogLevel::parse(&value)
        .ok_or_else(|| invalid_value(Config::LogLevel.env_var(), value, LogLevel::NAMES))
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
