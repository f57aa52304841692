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

//! Wire model of the provider responses

use serde::{Deserialize, Serialize};

/// One running instance record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunningInstance {
    pub availability_zone: String,
    /// Raw `family.size` string as the provider reports it.
    pub instance_type: String,
    /// Present when the instance fulfils a spot request.
    pub spot_request_id: Option<String>,
    /// Present for any platform other than Linux/UNIX.
    pub platform: Option<String>,
}

/// One page of the running-instance listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunningPage {
    pub instances: Vec<RunningInstance>,
    /// Continuation token; absent on the last page.
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReservationScope {
    AvailabilityZone,
    Region,
}

/// One active reservation contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservedContract {
    pub id: String,
    pub scope: ReservationScope,
    /// Set when `scope` is `AvailabilityZone`.
    pub availability_zone: Option<String>,
    pub instance_type: String,
    pub instance_count: f64,
}

/// One in-flight modification of a reservation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modification {
    pub results: Vec<ModificationResult>,
}

/// One target of an in-flight modification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModificationResult {
    /// Unset until the provider materializes the target reservation.
    pub new_reservation_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_running_page_from_json() {
        let raw = r#"{
            "instances": [
                {
                    "availability_zone": "region-1a",
                    "instance_type": "c3.large",
                    "spot_request_id": "sir-1"
                },
                {
                    "availability_zone": "region-1b",
                    "instance_type": "c3.xlarge"
                }
            ],
            "next_token": "1"
        }"#;

        let page: RunningPage = serde_json::from_str(raw).unwrap();
        assert_eq!(2, page.instances.len());
        assert_eq!(Some("sir-1".to_string()), page.instances[0].spot_request_id);
        assert_eq!(None, page.instances[1].platform);
        assert_eq!(Some("1".to_string()), page.next_token);
    }

    #[test]
    fn test_modification_result_defaults_to_undetermined() {
        let modification: Modification = serde_json::from_str(r#"{"results": [{}]}"#).unwrap();
        assert_eq!(None, modification.results[0].new_reservation_id);
    }
}
