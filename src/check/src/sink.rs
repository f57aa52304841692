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

//! Metric emitter collaborator interface

use std::sync::Arc;

/// Gauge emitter the host agent provides.
///
/// Gauges are idempotent, so partial emission on teardown is tolerable.
pub trait MetricSink: Send + Sync {
    fn gauge(&self, name: &str, value: f64, tags: &[String]);
}

pub type MetricSinkRef = Arc<dyn MetricSink>;

/// One recorded gauge call.
#[cfg(any(test, feature = "test"))]
#[derive(Debug, Clone, PartialEq)]
pub struct GaugeCall {
    pub name: String,
    pub value: f64,
    pub tags: Vec<String>,
}

/// Captures gauges in call order, for tests.
#[cfg(any(test, feature = "test"))]
#[derive(Debug, Default)]
pub struct RecordingSink {
    gauges: std::sync::Mutex<Vec<GaugeCall>>,
}

#[cfg(any(test, feature = "test"))]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<GaugeCall> {
        self.gauges.lock().unwrap().clone()
    }
}

#[cfg(any(test, feature = "test"))]
impl MetricSink for RecordingSink {
    fn gauge(&self, name: &str, value: f64, tags: &[String]) {
        self.gauges.lock().unwrap().push(GaugeCall {
            name: name.to_string(),
            value,
            tags: tags.to_vec(),
        });
    }
}
