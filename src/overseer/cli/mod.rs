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

pub mod args;
pub mod commands;

use crate::overseer::cli::args::{Commands, OverseerCtl};
use crate::overseer::config;
use crate::overseer::logger::{self, LogFormat};
use crate::overseer::util::error::BoxError;

/// Applies logging settings from the environment, letting an explicit CLI
/// format take precedence.
pub fn init_logging(format: Option<LogFormat>) -> Result<(), BoxError> {
    let format = match format {
        Some(format) => format,
        None => config::log_format()?,
    };
    logger::set_log_format(format);
    logger::set_log_level(config::log_level()?);
    Ok(())
}

pub fn run(cli: OverseerCtl) -> Result<(), BoxError> {
    match cli.command {
        Commands::Render(args) => commands::render::run(&args),
    }
}
