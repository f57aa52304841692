// Copyright 2024 The FleetMeter Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Check options

use serde::{Deserialize, Serialize};
use snafu::{ResultExt, Snafu};

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Failed to parse check config, err:{}", source))]
    ParseConfig { source: toml::de::Error },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Options of one scheduled check instance.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CheckConfig {
    /// Region whose fleet is inspected.
    ///
    /// Required; without it the check logs an error and emits nothing.
    pub region: Option<String>,

    /// Prefix of every emitted metric name.
    pub metric_prefix: String,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            region: None,
            metric_prefix: "fleetmeter.".to_string(),
        }
    }
}

impl CheckConfig {
    /// Parses the TOML fragment the host agent hands to the check.
    pub fn from_toml(raw: &str) -> Result<Self> {
        toml::from_str(raw).context(ParseConfig)
    }
}
