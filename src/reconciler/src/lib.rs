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

//! Nets running usage against reserved capacity
//!
//! Reconciliation runs in three phases:
//! 1. Region-scoped reservations seed the unused pool at their native
//!    size.
//! 2. Per-AZ netting: each running slot consumes the same-size reservation
//!    of its own zone first, then the same-size region pool. The residual
//!    becomes the on-demand count; over-reservation becomes the unused
//!    count.
//! 3. What is still left in the region pool redistributes across sizes of
//!    its family in footprint units, consuming the smallest on-demand
//!    sizes first, zones in sorted order within a size.
//!
//! Counts may turn fractional in phase 3; that is observable and intended.

use common_types::Zone;
use fleet::FleetMap;

/// Output of one reconciliation pass.
#[derive(Debug, Default)]
pub struct Reconciliation {
    /// Running usage not covered by any reservation.
    pub ondemand: FleetMap,
    /// Reservation capacity not absorbed by running usage.
    pub unused: FleetMap,
}

/// Splits running usage into on-demand and unused-reservation residuals.
///
/// Pure: no retries, no logging, no partial success. Both outputs carry an
/// explicit zero slot for every running slot they fully consume.
pub fn reconcile(running: &FleetMap, reserved: &FleetMap) -> Reconciliation {
    let mut ondemand = FleetMap::new();
    let mut unused = FleetMap::new();

    for entry in reserved.entries_in(&Zone::Region) {
        unused
            .slot(&Zone::Region, entry.family, entry.size)
            .set_count(entry.counter.count());
    }

    for entry in running.entries() {
        let mut residual = entry.counter.count();

        if let Some(reserved_here) = reserved.counter(entry.zone, entry.family, entry.size) {
            residual -= reserved_here.count();
            let slot = unused.slot(entry.zone, entry.family, entry.size);
            if residual <= 0.0 {
                slot.set_count(-residual);
                residual = 0.0;
            } else {
                slot.set_count(0.0);
            }
        }

        if unused.has(&Zone::Region, entry.family, entry.size) {
            let pool = unused.slot(&Zone::Region, entry.family, entry.size);
            residual -= pool.count();
            if residual <= 0.0 {
                pool.set_count(-residual);
                residual = 0.0;
            } else {
                pool.set_count(0.0);
            }
        }

        ondemand
            .slot(entry.zone, entry.family, entry.size)
            .set_count(residual);
    }

    redistribute_region_pool(&mut ondemand, &mut unused);

    Reconciliation { ondemand, unused }
}

/// Spreads the remaining region pool over the family's on-demand slots in
/// footprint units, size-major and zone-minor.
fn redistribute_region_pool(ondemand: &mut FleetMap, unused: &mut FleetMap) {
    let pool_keys = unused
        .entries_in(&Zone::Region)
        .map(|entry| (entry.family.to_string(), entry.size))
        .collect::<Vec<_>>();

    for (family, size) in pool_keys {
        let mut remaining = unused.slot(&Zone::Region, &family, size).footprint();
        if remaining <= 0.0 {
            continue;
        }

        let sizes = ondemand.sizes_in(None, &family);
        let zones = ondemand.zones().cloned().collect::<Vec<_>>();
        'absorb: for candidate in sizes {
            for zone in &zones {
                if !ondemand.has(zone, &family, candidate) {
                    continue;
                }

                let slot = ondemand.slot(zone, &family, candidate);
                let footprint = slot.footprint();
                if footprint >= remaining {
                    slot.set_footprint(footprint - remaining);
                    remaining = 0.0;
                    break 'absorb;
                }
                remaining -= footprint;
                slot.set_footprint(0.0);
            }
        }

        unused
            .slot(&Zone::Region, &family, size)
            .set_footprint(remaining);
    }
}
