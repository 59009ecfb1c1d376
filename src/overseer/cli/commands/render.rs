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

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use prometheus::Registry;

use crate::overseer::cli::args::RenderArgs;
use crate::overseer::cli::init_logging;
use crate::overseer::config;
use crate::overseer::controller::request::ReconcileRequest;
use crate::overseer::k8s::managed::ManagedResource;
use crate::overseer::logger::log_info;
use crate::overseer::observability::metrics;
use crate::overseer::observability::status::{
    new_prometheus_metrics_reconciler, LabelScheme, MetricsReconciler, NopMetricsReconciler,
};
use crate::overseer::util::error::{with_context, BoxError};

/// Resolved settings for a render run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderOptions {
    pub enabled: bool,
    pub scheme: LabelScheme,
}

impl RenderOptions {
    /// CLI flags win over the environment.
    pub fn resolve(args: &RenderArgs) -> Result<Self, BoxError> {
        let enabled = !args.disabled && config::metrics_enabled()?;
        let scheme = match args.labels {
            Some(scheme) => scheme,
            None => config::label_scheme()?,
        };
        Ok(Self { enabled, scheme })
    }
}

pub fn run(args: &RenderArgs) -> Result<(), BoxError> {
    init_logging(args.log_format)?;
    let options = RenderOptions::resolve(args)?;
    let passes = load_resources(&args.file)?;
    let body = render_passes(metrics::registry(), options, &passes)?;

    let mut stdout = io::stdout().lock();
    stdout.write_all(&body)?;
    stdout.flush()?;
    Ok(())
}

/// Reads a JSON array of managed resources. Each element is one observation
/// of a resource as seen by a reconcile pass.
pub fn load_resources(path: &Path) -> Result<Vec<ManagedResource>, BoxError> {
    let raw = fs::read_to_string(path)
        .map_err(|err| with_context(err, format!("failed to read {}", path.display())))?;
    serde_json::from_str(&raw)
        .map_err(|err| with_context(err, format!("failed to parse {}", path.display())))
}

/// Replays `passes` in order against status gauges registered with
/// `registry` and returns the resulting text exposition.
pub fn render_passes(
    registry: &Registry,
    options: RenderOptions,
    passes: &[ManagedResource],
) -> Result<Vec<u8>, BoxError> {
    let reconciler: Box<dyn MetricsReconciler> = if options.enabled {
        Box::new(new_prometheus_metrics_reconciler(registry, options.scheme)?)
    } else {
        Box::new(NopMetricsReconciler)
    };

    for resource in passes {
        let request = ReconcileRequest::for_object(resource);
        reconciler.reconcile_metrics(&request, resource);
    }

    let count = passes.len().to_string();
    log_info(
        "render",
        "Replayed managed resource observations",
        &[("passes", count.as_str()), ("scheme", options.scheme.as_str())],
    );
    metrics::encode(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overseer::k8s::condition::ConditionStatus;
    use crate::overseer::test_support::managed_fixture;
    use chrono::Utc;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn exposition(options: RenderOptions, passes: &[ManagedResource]) -> String {
        let registry = Registry::new();
        let body = render_passes(&registry, options, passes).expect("rendered");
        String::from_utf8(body).expect("utf8")
    }

    #[test]
    fn final_pass_drops_series() {
        let live = managed_fixture(
            "s3.aws.upbound.io/v1beta1",
            "Bucket",
            "b1",
            ConditionStatus::True,
            ConditionStatus::False,
        );
        let mut deleted = live.clone();
        deleted.metadata.deletion_timestamp = Some(Utc::now());
        let options = RenderOptions {
            enabled: true,
            scheme: LabelScheme::Minimal,
        };

        let text = exposition(options, &[live.clone()]);
        assert!(text.contains("managed_resource_status_ready{kind=\"Bucket\",name=\"b1\"} 1"));
        assert!(text.contains("managed_resource_status_synced{kind=\"Bucket\",name=\"b1\"} 0"));

        let text = exposition(options, &[live, deleted]);
        assert!(!text.contains("name=\"b1\""), "stale series left: {text}");
    }

    #[test]
    fn disabled_render_emits_nothing() {
        let live = managed_fixture(
            "example.org/v1",
            "Database",
            "db",
            ConditionStatus::True,
            ConditionStatus::True,
        );
        let options = RenderOptions {
            enabled: false,
            scheme: LabelScheme::Full,
        };
        assert!(exposition(options, &[live]).is_empty());
    }

    #[test]
    fn loads_resources_from_file() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("passes.json");
        fs::write(
            &path,
            r#"[
                {
                    "apiVersion": "example.org/v1",
                    "kind": "Database",
                    "metadata": { "name": "db" },
                    "status": { "conditions": [{ "type": "Ready", "status": "True" }] }
                }
            ]"#,
        )
        .expect("fixture written");

        let resources = load_resources(&path).expect("resources load");
        assert_eq!(resources.len(), 1);
        assert_eq!(resources[0].kind, "Database");
    }

    #[test]
    fn load_errors_name_the_file() {
        let missing = PathBuf::from("/nonexistent/overseer/passes.json");
        let err = load_resources(&missing).expect_err("missing file");
        assert!(err.to_string().contains("/nonexistent/overseer/passes.json"));

        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").expect("fixture written");
        let err = load_resources(&path).expect_err("malformed file");
        assert!(err.to_string().starts_with("failed to parse"));
    }
}
