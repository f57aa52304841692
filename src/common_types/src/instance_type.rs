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

//! Instance type, the `family.size` pair

use std::{fmt, str::FromStr};

use snafu::{ensure, Backtrace, OptionExt, ResultExt, Snafu};

use crate::size::Size;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Invalid instance type, type:{}.\nBacktrace:\n{}", itype, backtrace))]
    InvalidInstanceType { itype: String, backtrace: Backtrace },

    #[snafu(display("Failed to parse size of instance type, type:{}, err:{}", itype, source))]
    ParseSize {
        itype: String,
        source: crate::size::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Instance type as the provider reports it, e.g. `c4.large`.
///
/// The family is free-form and not enumerated in advance; the size must be
/// in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InstanceType {
    family: String,
    size: Size,
}

impl InstanceType {
    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn size(&self) -> Size {
        self.size
    }
}

impl fmt::Display for InstanceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.family, self.size)
    }
}

impl FromStr for InstanceType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (family, size) = s.split_once('.').context(InvalidInstanceType { itype: s })?;
        ensure!(!family.is_empty(), InvalidInstanceType { itype: s });

        let size = size.parse().context(ParseSize { itype: s })?;

        Ok(Self {
            family: family.to_string(),
            size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let itype = "c4.large".parse::<InstanceType>().unwrap();
        assert_eq!("c4", itype.family());
        assert_eq!(Size::Large, itype.size());
        assert_eq!("c4.large", itype.to_string());
    }

    #[test]
    fn test_parse_invalid() {
        assert!(matches!(
            "c4large".parse::<InstanceType>(),
            Err(Error::InvalidInstanceType { .. })
        ));
        assert!(matches!(
            ".large".parse::<InstanceType>(),
            Err(Error::InvalidInstanceType { .. })
        ));
        assert!(matches!(
            "c4.giant".parse::<InstanceType>(),
            Err(Error::ParseSize { .. })
        ));
    }

    #[test]
    fn test_size_keeps_first_separator() {
        // Only the first `.` splits family from size.
        let err = "c4.large.extra".parse::<InstanceType>().unwrap_err();
        assert!(matches!(err, Error::ParseSize { .. }));
    }
}
