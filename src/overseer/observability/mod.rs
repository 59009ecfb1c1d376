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

//! Observability primitives for managed resources.
//!
//! Status gauges follow the Prometheus conventions used by Kubernetes
//! controllers: snake_case family names and boolean values exported as `0`
//! or `1`. Label keys mirror resource identity (`group`, `kind`, `name`) plus
//! the owning claim so series line up with existing dashboards.

pub mod gauges;
pub mod metrics;
pub mod status;
