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

//! Instance size catalog
//!
//! The catalog is closed: sizes outside of it are rejected when raw
//! provider strings are parsed, so a [`Size`] value is valid by
//! construction. Declaration order is the canonical catalog order and the
//! derived `Ord` follows it.

use std::{fmt, str::FromStr};

use snafu::{Backtrace, Snafu};

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Unknown instance size, size:{}.\nBacktrace:\n{}", size, backtrace))]
    UnknownSize { size: String, backtrace: Backtrace },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Instance size within a family.
///
/// Each size carries a fixed normalization factor encoding its capacity
/// relative to `small`; factors are strictly increasing along the catalog
/// order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Size {
    Nano,
    Micro,
    Small,
    Medium,
    Large,
    XLarge,
    X2Large,
    X4Large,
    X8Large,
    X10Large,
    X16Large,
    X32Large,
}

impl Size {
    /// All sizes in catalog order.
    pub const ALL: [Size; 12] = [
        Size::Nano,
        Size::Micro,
        Size::Small,
        Size::Medium,
        Size::Large,
        Size::XLarge,
        Size::X2Large,
        Size::X4Large,
        Size::X8Large,
        Size::X10Large,
        Size::X16Large,
        Size::X32Large,
    ];

    /// Normalization factor of the size.
    pub fn factor(&self) -> f64 {
        match self {
            Size::Nano => 0.25,
            Size::Micro => 0.5,
            Size::Small => 1.0,
            Size::Medium => 2.0,
            Size::Large => 4.0,
            Size::XLarge => 8.0,
            Size::X2Large => 16.0,
            Size::X4Large => 32.0,
            Size::X8Large => 64.0,
            Size::X10Large => 80.0,
            Size::X16Large => 128.0,
            Size::X32Large => 256.0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Size::Nano => "nano",
            Size::Micro => "micro",
            Size::Small => "small",
            Size::Medium => "medium",
            Size::Large => "large",
            Size::XLarge => "xlarge",
            Size::X2Large => "2xlarge",
            Size::X4Large => "4xlarge",
            Size::X8Large => "8xlarge",
            Size::X10Large => "10xlarge",
            Size::X16Large => "16xlarge",
            Size::X32Large => "32xlarge",
        }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Size {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let size = match s {
            "nano" => Size::Nano,
            "micro" => Size::Micro,
            "small" => Size::Small,
            "medium" => Size::Medium,
            "large" => Size::Large,
            "xlarge" => Size::XLarge,
            "2xlarge" => Size::X2Large,
            "4xlarge" => Size::X4Large,
            "8xlarge" => Size::X8Large,
            "10xlarge" => Size::X10Large,
            "16xlarge" => Size::X16Large,
            "32xlarge" => Size::X32Large,
            _ => return UnknownSize { size: s }.fail(),
        };

        Ok(size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_order() {
        let names = Size::ALL.iter().map(Size::name).collect::<Vec<_>>();
        assert_eq!(
            vec![
                "nano", "micro", "small", "medium", "large", "xlarge", "2xlarge", "4xlarge",
                "8xlarge", "10xlarge", "16xlarge", "32xlarge",
            ],
            names
        );

        let mut sorted = Size::ALL.to_vec();
        sorted.sort();
        assert_eq!(Size::ALL.to_vec(), sorted);
    }

    #[test]
    fn test_factors_strictly_increase() {
        for pair in Size::ALL.windows(2) {
            assert!(pair[0].factor() < pair[1].factor());
        }
    }

    #[test]
    fn test_factor() {
        assert_eq!(2.0, Size::Medium.factor());
        assert_eq!(80.0, Size::X10Large.factor());
    }

    #[test]
    fn test_parse() {
        assert_eq!(Size::Medium, "medium".parse::<Size>().unwrap());
        assert_eq!(Size::X2Large, "2xlarge".parse::<Size>().unwrap());

        let err = "invalid".parse::<Size>().unwrap_err();
        assert!(matches!(err, Error::UnknownSize { .. }));
    }

    #[test]
    fn test_display_round_trip() {
        for size in Size::ALL {
            assert_eq!(size, size.to_string().parse::<Size>().unwrap());
        }
    }
}
