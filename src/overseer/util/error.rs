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

use std::error::Error;
use std::fmt;

pub type BoxError = Box<dyn Error + Send + Sync>;

#[derive(Debug)]
struct ContextError {
    context: String,
    source: BoxError,
}

impl fmt::Display for ContextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.context, self.source)
    }
}

impl Error for ContextError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(self.source.as_ref())
    }
}

/// A setting carried a value outside the accepted set.
#[derive(Debug)]
pub struct InvalidValueError {
    parameter: String,
    value: String,
    expected: &'static [&'static str],
}

impl InvalidValueError {
    pub fn parameter(&self) -> &str {
        &self.parameter
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for InvalidValueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid value '{}' for {} (expected one of: {})",
            self.value,
            self.parameter,
            self.expected.join(", ")
        )
    }
}

impl Error for InvalidValueError {}

#[derive(Debug)]
struct SimpleError(String);

impl fmt::Display for SimpleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Error for SimpleError {}

pub fn with_context<E>(error: E, context: impl Into<String>) -> BoxError
where
    E: Into<BoxError>,
{
    Box::new(ContextError {
        context: context.into(),
        source: error.into(),
    })
}

pub fn new_error(message: impl Into<String>) -> BoxError {
    Box::new(SimpleError(message.into()))
}

pub fn invalid_value(
    parameter: impl Into<String>,
    value: impl Into<String>,
    expected: &'static [&'static str],
) -> BoxError {
    Box::new(InvalidValueError {
        parameter: parameter.into(),
        value: value.into(),
        expected,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_chain_exposes_source() {
        let err = with_context(new_error("already registered"), "gauge ready");
        assert_eq!(err.to_string(), "gauge ready: already registered");
        let source = err.source().expect("source present");
        assert_eq!(source.to_string(), "already registered");
    }

    #[test]
    fn invalid_value_lists_expected_choices() {
        let err = invalid_value("OVERSEER_METRICS_LABELS", "wide", &["full", "minimal"]);
        assert_eq!(
            err.to_string(),
            "invalid value 'wide' for OVERSEER_METRICS_LABELS (expected one of: full, minimal)"
        );
        let typed = err
            .downcast_ref::<InvalidValueError>()
            .expect("typed error");
        assert_eq!(typed.parameter(), "OVERSEER_METRICS_LABELS");
        assert_eq!(typed.value(), "wide");
    }
}
