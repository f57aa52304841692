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

//! Zone key of a fleet slot

use std::{cmp::Ordering, fmt};

/// Name the region sentinel renders as.
pub const REGION_ZONE_NAME: &str = "region";

/// Scope of a fleet slot: a concrete availability zone, or the region-wide
/// sentinel used by region-scoped reservations.
///
/// Ordering compares display names, so the sentinel sorts into the same
/// namespace as real zone names and map enumeration stays lexicographic.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Zone {
    Region,
    Az(String),
}

impl Zone {
    pub fn az(name: impl Into<String>) -> Self {
        Zone::Az(name.into())
    }

    pub fn name(&self) -> &str {
        match self {
            Zone::Region => REGION_ZONE_NAME,
            Zone::Az(name) => name,
        }
    }

    fn scope_rank(&self) -> u8 {
        match self {
            Zone::Region => 0,
            Zone::Az(_) => 1,
        }
    }
}

impl Ord for Zone {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name()
            .cmp(other.name())
            .then_with(|| self.scope_rank().cmp(&other.scope_rank()))
    }
}

impl PartialOrd for Zone {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
