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

//! Scheduled check reporting the on-demand / reserved split of a region's
//! compute fleet
//!
//! One [`InstanceCountCheck::run`] call is one invocation of the host
//! agent's schedule: load the running and reserved snapshots, reconcile
//! them, and emit gauges for the reserved, running, ondemand and
//! reserved_unused families, in that order.

pub mod config;
pub mod sink;

use cloud_api::CloudApiRef;
use collector::{FleetCollector, ReservedSnapshot};
use fleet::{FleetMap, SlotRef};
use log::{error, info, warn};
use reconciler::reconcile;
use snafu::{ResultExt, Snafu};

use crate::{config::CheckConfig, sink::MetricSinkRef};

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Failed to collect running fleet, err:{}", source))]
    CollectRunning { source: collector::Error },

    #[snafu(display("Failed to collect reserved fleet, err:{}", source))]
    CollectReserved { source: collector::Error },
}

pub type Result<T> = std::result::Result<T, Error>;

/// One configured check instance.
///
/// Collaborator handles are scoped to the instance; every snapshot built
/// during a run is discarded when the run returns.
pub struct InstanceCountCheck {
    api: CloudApiRef,
    sink: MetricSinkRef,
    config: CheckConfig,
}

impl InstanceCountCheck {
    pub fn new(api: CloudApiRef, sink: MetricSinkRef, config: CheckConfig) -> Self {
        Self { api, sink, config }
    }

    /// Runs one check invocation.
    ///
    /// Without a configured region this is a logged no-op. When the
    /// reservation snapshot is unavailable (modifications in flight), only
    /// the running family is emitted; reservation-dependent gauges would
    /// be misleading and are skipped wholesale.
    pub async fn run(&self) -> Result<()> {
        let region = match self.config.region.as_deref() {
            Some(region) => region,
            None => {
                error!("no region");
                return Ok(());
            }
        };

        let collector = FleetCollector::new(self.api.clone());
        let running = collector
            .running_fleet(region)
            .await
            .context(CollectRunning)?;
        let reserved = match collector
            .reserved_fleet(region)
            .await
            .context(CollectReserved)?
        {
            ReservedSnapshot::Ready(reserved) => reserved,
            ReservedSnapshot::Unavailable => {
                warn!("Reservation modifications in flight, reporting running metrics only");
                self.emit_family("running", &running);
                return Ok(());
            }
        };

        self.emit_family("reserved", &reserved);
        self.emit_family("running", &running);

        let outcome = reconcile(&running, &reserved);
        self.emit_family("ondemand", &outcome.ondemand);
        self.emit_family("reserved_unused", &outcome.unused);

        Ok(())
    }

    fn emit_family(&self, kind: &str, fleet: &FleetMap) {
        info!("{kind}");
        for entry in fleet.entries() {
            let count = entry.counter.count();
            let footprint = entry.counter.footprint();
            info!("{}", entry_line(entry));

            let tags = vec![
                format!("ac-az:{}", entry.zone),
                format!("ac-type:{}.{}", entry.family, entry.size),
                format!("ac-family:{}", entry.family),
            ];
            let prefix = &self.config.metric_prefix;
            self.sink
                .gauge(&format!("{prefix}{kind}.count"), count, &tags);
            self.sink
                .gauge(&format!("{prefix}{kind}.footprint"), footprint, &tags);
        }
    }
}

/// Dump line of one slot. Counts and footprints are floats and always
/// render with a decimal point, e.g. `region-1a : c4.large = 1.0 (4.0)`.
fn entry_line(entry: SlotRef<'_>) -> String {
    format!(
        "{} : {}.{} = {:?} ({:?})",
        entry.zone,
        entry.family,
        entry.size,
        entry.counter.count(),
        entry.counter.footprint()
    )
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use cloud_api::{
        mock::MockCloudApi,
        model::{
            Modification, ModificationResult, ReservationScope, ReservedContract, RunningInstance,
        },
    };
    use common_types::{Size, Zone};

    use super::*;
    use crate::sink::RecordingSink;

    fn running(az: &str, itype: &str) -> RunningInstance {
        RunningInstance {
            availability_zone: az.to_string(),
            instance_type: itype.to_string(),
            ..Default::default()
        }
    }

    fn config(region: Option<&str>) -> CheckConfig {
        CheckConfig {
            region: region.map(str::to_string),
            ..Default::default()
        }
    }

    fn check_with(api: MockCloudApi, config: CheckConfig) -> (InstanceCountCheck, Arc<RecordingSink>) {
        let _ = env_logger::try_init();
        let sink = Arc::new(RecordingSink::new());
        let check = InstanceCountCheck::new(Arc::new(api), sink.clone(), config);
        (check, sink)
    }

    fn tags(az: &str, itype: &str, family: &str) -> Vec<String> {
        vec![
            format!("ac-az:{az}"),
            format!("ac-type:{itype}"),
            format!("ac-family:{family}"),
        ]
    }

    #[test]
    fn test_entry_line_keeps_decimal_point() {
        let mut map = FleetMap::new();
        map.slot(&Zone::az("region-1a"), "c4", Size::Large).set_count(1.0);
        map.slot(&Zone::az("region-1a"), "c4", Size::XLarge).set_footprint(2.0);

        let lines = map.entries().map(entry_line).collect::<Vec<_>>();
        assert_eq!(
            vec![
                "region-1a : c4.large = 1.0 (4.0)".to_string(),
                "region-1a : c4.xlarge = 0.25 (2.0)".to_string(),
            ],
            lines
        );
    }

    #[tokio::test]
    async fn test_missing_region() {
        let (check, sink) = check_with(MockCloudApi::new(), config(None));

        check.run().await.unwrap();
        assert!(sink.calls().is_empty());
    }

    #[tokio::test]
    async fn test_full_run() {
        let api = MockCloudApi::new()
            .with_running_pages(vec![
                vec![
                    running("region-1a", "c4.large"),
                    running("region-1a", "c4.xlarge"),
                ],
                vec![running("region-1a", "c4.xlarge")],
            ])
            .with_reserved(vec![
                ReservedContract {
                    id: "ri-1".to_string(),
                    scope: ReservationScope::AvailabilityZone,
                    availability_zone: Some("region-1a".to_string()),
                    instance_type: "c4.large".to_string(),
                    instance_count: 3.0,
                },
                // Source of a committed migration, skipped by the loader.
                ReservedContract {
                    id: "ri-2".to_string(),
                    scope: ReservationScope::Region,
                    availability_zone: None,
                    instance_type: "c4.large".to_string(),
                    instance_count: 7.0,
                },
            ])
            .with_modifications(
                "ri-2",
                vec![Modification {
                    results: vec![ModificationResult {
                        new_reservation_id: Some("ri-3".to_string()),
                    }],
                }],
            );
        let (check, sink) = check_with(api, config(Some("region-1")));

        check.run().await.unwrap();

        let calls = sink.calls();
        let expected = vec![
            ("fleetmeter.reserved.count", 3.0, "c4.large"),
            ("fleetmeter.reserved.footprint", 12.0, "c4.large"),
            ("fleetmeter.running.count", 1.0, "c4.large"),
            ("fleetmeter.running.footprint", 4.0, "c4.large"),
            ("fleetmeter.running.count", 2.0, "c4.xlarge"),
            ("fleetmeter.running.footprint", 16.0, "c4.xlarge"),
            ("fleetmeter.ondemand.count", 0.0, "c4.large"),
            ("fleetmeter.ondemand.footprint", 0.0, "c4.large"),
            ("fleetmeter.ondemand.count", 2.0, "c4.xlarge"),
            ("fleetmeter.ondemand.footprint", 16.0, "c4.xlarge"),
            ("fleetmeter.reserved_unused.count", 2.0, "c4.large"),
            ("fleetmeter.reserved_unused.footprint", 8.0, "c4.large"),
        ];
        assert_eq!(expected.len(), calls.len());
        for (call, (name, value, itype)) in calls.iter().zip(expected) {
            assert_eq!(name, call.name);
            assert_eq!(value, call.value);
            assert_eq!(tags("region-1a", itype, "c4"), call.tags);
        }
    }

    #[tokio::test]
    async fn test_reservations_unavailable() {
        let api = MockCloudApi::new()
            .with_running_pages(vec![vec![running("region-1a", "c4.large")]])
            .with_reserved(vec![ReservedContract {
                id: "ri-1".to_string(),
                scope: ReservationScope::AvailabilityZone,
                availability_zone: Some("region-1a".to_string()),
                instance_type: "c4.large".to_string(),
                instance_count: 1.0,
            }])
            // The migration target is not materialized yet.
            .with_modifications(
                "ri-1",
                vec![Modification {
                    results: vec![ModificationResult {
                        new_reservation_id: None,
                    }],
                }],
            );
        let (check, sink) = check_with(api, config(Some("region-1")));

        check.run().await.unwrap();

        let names = sink
            .calls()
            .iter()
            .map(|call| call.name.clone())
            .collect::<Vec<_>>();
        assert_eq!(
            vec![
                "fleetmeter.running.count".to_string(),
                "fleetmeter.running.footprint".to_string(),
            ],
            names
        );
    }

    #[tokio::test]
    async fn test_custom_prefix() {
        let api = MockCloudApi::new()
            .with_running_pages(vec![vec![running("region-1a", "t2.micro")]]);
        let mut config = config(Some("region-1"));
        config.metric_prefix = "acme.fleet.".to_string();
        let (check, sink) = check_with(api, config);

        check.run().await.unwrap();

        assert!(sink
            .calls()
            .iter()
            .all(|call| call.name.starts_with("acme.fleet.")));
    }

    #[tokio::test]
    async fn test_provider_failure_surfaces() {
        let api = MockCloudApi::new().failing_running();
        let (check, sink) = check_with(api, config(Some("region-1")));

        let err = check.run().await.unwrap_err();
        assert!(matches!(err, Error::CollectRunning { .. }));
        assert!(sink.calls().is_empty());
    }
}
