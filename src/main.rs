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

use clap::Parser;
use overseer::overseer::cli::{self, args::OverseerCtl};
use overseer::overseer::logger::log_error;
use std::process;

fn main() {
    let ctl = OverseerCtl::parse();
    if let Err(err) = cli::run(ctl) {
        let error = err.to_string();
        log_error("cli", "Command failed", &[("error", error.as_str())]);
        process::exit(1);
    }
}
