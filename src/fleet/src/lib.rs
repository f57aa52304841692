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

//! In-memory fleet snapshot containers
//!
//! A [`FleetMap`] holds one [`Counter`] per `(zone, family, size)` slot and
//! enumerates slots in a stable order. Snapshots live for one check
//! invocation and are discarded afterwards.

mod counter;
mod map;

pub use crate::{
    counter::Counter,
    map::{FleetMap, SlotRef},
};
