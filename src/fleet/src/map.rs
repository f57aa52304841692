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

//! Per-(zone, family, size) counter map

use std::collections::{BTreeMap, BTreeSet};

use common_types::{Size, Zone};

use crate::counter::Counter;

type SizeSlots = BTreeMap<Size, Counter>;
type FamilySlots = BTreeMap<String, SizeSlots>;

/// One enumerated slot with its key.
#[derive(Debug, Clone, Copy)]
pub struct SlotRef<'a> {
    pub zone: &'a Zone,
    pub family: &'a str,
    pub size: Size,
    pub counter: &'a Counter,
}

/// Counters keyed by `(zone, family, size)`.
///
/// Slots are created lazily on first mutable access and start at a zero
/// count with the catalog factor of their size. Enumeration is stable:
/// zones sorted, families sorted within a zone, sizes in catalog order.
///
/// [`FleetMap::slot`] hands out a mutable handle into the map, so repeated
/// lookups of one triple mutate the same counter. Downstream consumers
/// want an explicit zero slot rather than a gap, which is why reads that
/// drive output go through `slot` as well.
#[derive(Debug, Clone, Default)]
pub struct FleetMap {
    zones: BTreeMap<Zone, FamilySlots>,
}

impl FleetMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    pub fn has(&self, zone: &Zone, family: &str, size: Size) -> bool {
        self.counter(zone, family, size).is_some()
    }

    /// Non-creating read of one slot.
    pub fn counter(&self, zone: &Zone, family: &str, size: Size) -> Option<&Counter> {
        self.zones.get(zone)?.get(family)?.get(&size)
    }

    /// Mutable handle of one slot, created zero-initialized if absent.
    pub fn slot(&mut self, zone: &Zone, family: &str, size: Size) -> &mut Counter {
        self.zones
            .entry(zone.clone())
            .or_default()
            .entry(family.to_string())
            .or_default()
            .entry(size)
            .or_insert_with(|| Counter::new(size.factor()))
    }

    /// Known zones, sorted.
    pub fn zones(&self) -> impl Iterator<Item = &Zone> {
        self.zones.keys()
    }

    /// Families within a zone, sorted; empty if the zone is unknown.
    pub fn families(&self, zone: &Zone) -> Vec<&str> {
        self.zones
            .get(zone)
            .map(|families| families.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Sizes present under the family, in catalog order.
    ///
    /// With no zone given, the union over all zones is returned.
    pub fn sizes_in(&self, zone: Option<&Zone>, family: &str) -> Vec<Size> {
        match zone {
            Some(zone) => self
                .zones
                .get(zone)
                .and_then(|families| families.get(family))
                .map(|sizes| sizes.keys().copied().collect())
                .unwrap_or_default(),
            None => self
                .zones
                .values()
                .filter_map(|families| families.get(family))
                .flat_map(|sizes| sizes.keys().copied())
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect(),
        }
    }

    /// Stable-order enumeration of every slot.
    pub fn entries(&self) -> impl Iterator<Item = SlotRef<'_>> {
        self.zones
            .iter()
            .flat_map(|(zone, families)| Self::zone_entries(zone, families))
    }

    /// Stable-order enumeration of one zone; empty if the zone is unknown.
    pub fn entries_in<'a>(&'a self, zone: &Zone) -> impl Iterator<Item = SlotRef<'a>> {
        self.zones
            .get_key_value(zone)
            .into_iter()
            .flat_map(|(zone, families)| Self::zone_entries(zone, families))
    }

    fn zone_entries<'a>(
        zone: &'a Zone,
        families: &'a FamilySlots,
    ) -> impl Iterator<Item = SlotRef<'a>> {
        families.iter().flat_map(move |(family, sizes)| {
            sizes.iter().map(move |(size, counter)| SlotRef {
                zone,
                family,
                size: *size,
                counter,
            })
        })
    }
}
