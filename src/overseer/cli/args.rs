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

use crate::overseer::logger::LogFormat;
use crate::overseer::observability::status::LabelScheme;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

fn parse_label_scheme(s: &str) -> Result<LabelScheme, String> {
    LabelScheme::parse(s).ok_or_else(|| {
        format!(
            "Invalid label scheme '{}'. Must be one of: {}.",
            s,
            LabelScheme::NAMES.join(", ")
        )
    })
}

fn parse_log_format(s: &str) -> Result<LogFormat, String> {
    LogFormat::parse(s).ok_or_else(|| {
        format!(
            "Invalid log format '{}'. Must be one of: {}.",
            s,
            LogFormat::NAMES.join(", ")
        )
    })
}

/// Status gauge tooling for managed resources.
#[derive(Parser)]
#[command(name = env!("CARGO_PKG_NAME"))]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = env!("CARGO_PKG_DESCRIPTION"))]
pub struct OverseerCtl {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Replay managed resource observations and print the resulting status gauges
    Render(RenderArgs),
}

#[derive(Args)]
pub struct RenderArgs {
    /// JSON file holding an array of managed resources, one per reconcile pass
    #[arg(short, long)]
    pub file: PathBuf,

    /// Label set for the status gauges (full or minimal)
    #[arg(long, value_parser = parse_label_scheme)]
    pub labels: Option<LabelScheme>,

    /// Skip gauge emission, as when metrics are disabled
    #[arg(long)]
    pub disabled: bool,

    /// Log output format (text or json)
    #[arg(long, value_parser = parse_log_format)]
    pub log_format: Option<LogFormat>,
}
