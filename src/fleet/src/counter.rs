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

/// Occupancy counter of one fleet slot.
///
/// The footprint is `count * factor`, the unit in which cross-size
/// reservation flexibility is accounted. Setting a footprint rescales the
/// count, which may leave it fractional.
#[derive(Debug, Clone, PartialEq)]
pub struct Counter {
    factor: f64,
    count: f64,
}

impl Counter {
    // Note: factor must be larger than 0
    pub fn new(factor: f64) -> Self {
        assert!(factor > 0.0);

        Self { factor, count: 0.0 }
    }

    #[inline]
    pub fn factor(&self) -> f64 {
        self.factor
    }

    #[inline]
    pub fn count(&self) -> f64 {
        self.count
    }

    pub fn set_count(&mut self, count: f64) {
        self.count = count;
    }

    pub fn add(&mut self, count: f64) {
        self.count += count;
    }

    pub fn incr(&mut self) {
        self.add(1.0);
    }

    #[inline]
    pub fn footprint(&self) -> f64 {
        self.count * self.factor
    }

    pub fn set_footprint(&mut self, footprint: f64) {
        self.count = footprint / self.factor;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic() {
        let mut counter = Counter::new(0.5);
        assert_eq!(0.0, counter.count());

        counter.set_count(2.0);
        assert_eq!(2.0, counter.count());

        counter.add(3.0);
        assert_eq!(5.0, counter.count());

        counter.incr();
        assert_eq!(6.0, counter.count());
        assert_eq!(3.0, counter.footprint());
    }

    #[test]
    fn test_footprint_round_trip() {
        let mut counter = Counter::new(0.5);
        counter.set_footprint(10.0);
        assert_eq!(10.0, counter.footprint());
        assert_eq!(20.0, counter.count());
    }
}
