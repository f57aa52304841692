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

//! Materializes fleet snapshots from the cloud provider
//!
//! Two independent loads: the running on-demand-eligible instances and the
//! active reservation contracts. Loading is sequential within one check
//! invocation; the only suspension points are the provider calls.

use cloud_api::{model::ReservationScope, CloudApiRef};
use common_types::{InstanceType, Zone};
use fleet::FleetMap;
use log::debug;
use snafu::{Backtrace, OptionExt, ResultExt, Snafu};

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Failed to describe running instances, err:{}", source))]
    DescribeRunning { source: cloud_api::Error },

    #[snafu(display("Failed to describe reservations, err:{}", source))]
    DescribeReserved { source: cloud_api::Error },

    #[snafu(display(
        "Failed to describe modifications, reservation:{}, err:{}",
        id,
        source
    ))]
    DescribeModifications {
        id: String,
        source: cloud_api::Error,
    },

    #[snafu(display("Invalid instance type in record, err:{}", source))]
    InvalidRecordType {
        source: common_types::instance_type::Error,
    },

    #[snafu(display(
        "Reservation is zone scoped but names no zone, reservation:{}.\nBacktrace:\n{}",
        id,
        backtrace
    ))]
    NoReservationZone { id: String, backtrace: Backtrace },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Page size of the running-instance listing.
const RUNNING_PAGE_SIZE: usize = 100;

/// Reservation snapshot, or the marker that in-flight modifications made
/// it unusable for this invocation.
#[derive(Debug)]
pub enum ReservedSnapshot {
    Ready(FleetMap),
    /// Some in-flight modification has no materialized target reservation
    /// yet; counting now would undercount total reserved capacity.
    Unavailable,
}

pub struct FleetCollector {
    api: CloudApiRef,
}

impl FleetCollector {
    pub fn new(api: CloudApiRef) -> Self {
        Self { api }
    }

    /// Loads the running instances of the region, keyed by AZ.
    ///
    /// Spot instances and non-Linux/UNIX platforms are skipped even though
    /// the provider-side filters should already exclude most of them.
    pub async fn running_fleet(&self, region: &str) -> Result<FleetMap> {
        let mut fleet = FleetMap::new();
        let mut token: Option<String> = None;
        let mut pages = 0;
        loop {
            let page = self
                .api
                .describe_running(region, RUNNING_PAGE_SIZE, token.as_deref())
                .await
                .context(DescribeRunning)?;
            pages += 1;

            for instance in page.instances {
                if instance.spot_request_id.is_some() {
                    continue;
                }
                if instance.platform.is_some() {
                    continue;
                }

                let itype: InstanceType = instance
                    .instance_type
                    .parse()
                    .context(InvalidRecordType)?;
                fleet
                    .slot(
                        &Zone::Az(instance.availability_zone),
                        itype.family(),
                        itype.size(),
                    )
                    .incr();
            }

            match page.next_token {
                Some(next) => token = Some(next),
                None => break,
            }
        }
        debug!("Loaded running fleet, region:{region}, pages:{pages}");

        Ok(fleet)
    }

    /// Loads the active reservation contracts of the region.
    ///
    /// A contract with an in-flight modification is the source side of a
    /// migration. When every modification result already names its new
    /// reservation, the contract is skipped (the target is in the same
    /// listing and counting both would double count). When any result has
    /// no target yet the whole snapshot is declared unavailable.
    pub async fn reserved_fleet(&self, region: &str) -> Result<ReservedSnapshot> {
        let contracts = self
            .api
            .describe_reserved(region)
            .await
            .context(DescribeReserved)?;

        let mut fleet = FleetMap::new();
        for contract in contracts {
            let modifications = self
                .api
                .describe_modifications(region, &contract.id)
                .await
                .context(DescribeModifications { id: &contract.id })?;
            if !modifications.is_empty() {
                let undetermined = modifications
                    .iter()
                    .flat_map(|modification| modification.results.iter())
                    .any(|result| result.new_reservation_id.is_none());
                if undetermined {
                    debug!(
                        "Reservation modification has no target yet, reservation:{}",
                        contract.id
                    );
                    return Ok(ReservedSnapshot::Unavailable);
                }
                continue;
            }

            let zone = match contract.scope {
                ReservationScope::Region => Zone::Region,
                ReservationScope::AvailabilityZone => Zone::Az(
                    contract
                        .availability_zone
                        .clone()
                        .context(NoReservationZone { id: &contract.id })?,
                ),
            };
            let itype: InstanceType = contract
                .instance_type
                .parse()
                .context(InvalidRecordType)?;
            fleet
                .slot(&zone, itype.family(), itype.size())
                .add(contract.instance_count);
        }

        Ok(ReservedSnapshot::Ready(fleet))
    }
}
