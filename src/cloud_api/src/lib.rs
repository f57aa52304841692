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

//! Cloud provider collaborator interface
//!
//! The check only reads three views of the provider's fleet; everything
//! else (credentials, signing, transport) belongs to the concrete client
//! behind the trait.

#[cfg(any(test, feature = "test"))]
pub mod mock;
pub mod model;

use std::sync::Arc;

use async_trait::async_trait;
use snafu::{Backtrace, Snafu};

use crate::model::{Modification, ReservedContract, RunningPage};

/// Boxed error of a concrete provider client.
pub type GenericError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Provider call failed, op:{}, err:{}", op, source))]
    Provider { op: String, source: GenericError },

    #[snafu(display("Unexpected provider response, msg:{}.\nBacktrace:\n{}", msg, backtrace))]
    UnexpectedResponse { msg: String, backtrace: Backtrace },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Read-only view of one region of the provider's compute fleet.
///
/// Implementations must apply the server-side filters each operation
/// documents; the loaders re-check what they can, but the filters bound
/// result size on the wire.
#[async_trait]
pub trait CloudApi: Send + Sync {
    /// One page of running instances.
    ///
    /// Server-side filters: `state=running`, `tenancy=default`.
    async fn describe_running(
        &self,
        region: &str,
        page_size: usize,
        page_token: Option<&str>,
    ) -> Result<RunningPage>;

    /// All active reservation contracts, AZ- or region-scoped.
    ///
    /// Server-side filters: `state=active`, `product=Linux/UNIX`,
    /// `tenancy=default`.
    async fn describe_reserved(&self, region: &str) -> Result<Vec<ReservedContract>>;

    /// In-flight modifications of one reservation.
    ///
    /// Server-side filter: `status=processing`.
    async fn describe_modifications(
        &self,
        region: &str,
        reservation_id: &str,
    ) -> Result<Vec<Modification>>;
}

pub type CloudApiRef = Arc<dyn CloudApi>;
