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

//! In-memory [`CloudApi`] over fixtures, for tests

use std::{collections::HashMap, sync::Mutex};

use async_trait::async_trait;
use snafu::OptionExt;

use crate::{
    model::{Modification, ReservedContract, RunningInstance, RunningPage},
    CloudApi, Error, Result, UnexpectedResponse,
};

/// Fixture-backed cloud client.
///
/// Running pages are served in order with index-encoded continuation
/// tokens; modifications are keyed by reservation id. Injected failures
/// surface as [`Error::Provider`].
#[derive(Default)]
pub struct MockCloudApi {
    running_pages: Vec<Vec<RunningInstance>>,
    reserved: Vec<ReservedContract>,
    modifications: HashMap<String, Vec<Modification>>,
    fail_running: bool,
    fail_reserved: bool,
    seen_page_sizes: Mutex<Vec<usize>>,
}

impl MockCloudApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_running_pages(mut self, pages: Vec<Vec<RunningInstance>>) -> Self {
        self.running_pages = pages;
        self
    }

    pub fn with_reserved(mut self, contracts: Vec<ReservedContract>) -> Self {
        self.reserved = contracts;
        self
    }

    pub fn with_modifications(
        mut self,
        reservation_id: impl Into<String>,
        modifications: Vec<Modification>,
    ) -> Self {
        self.modifications
            .insert(reservation_id.into(), modifications);
        self
    }

    pub fn failing_running(mut self) -> Self {
        self.fail_running = true;
        self
    }

    pub fn failing_reserved(mut self) -> Self {
        self.fail_reserved = true;
        self
    }

    /// Page sizes requested so far, in call order.
    pub fn seen_page_sizes(&self) -> Vec<usize> {
        self.seen_page_sizes.lock().unwrap().clone()
    }

    fn injected_failure(op: &str) -> Error {
        Error::Provider {
            op: op.to_string(),
            source: "injected failure".into(),
        }
    }
}

#[async_trait]
impl CloudApi for MockCloudApi {
    async fn describe_running(
        &self,
        _region: &str,
        page_size: usize,
        page_token: Option<&str>,
    ) -> Result<RunningPage> {
        if self.fail_running {
            return Err(Self::injected_failure("describe_running"));
        }
        self.seen_page_sizes.lock().unwrap().push(page_size);

        let index = match page_token {
            None => 0,
            Some(token) => token.parse::<usize>().ok().context(UnexpectedResponse {
                msg: format!("bad page token:{token}"),
            })?,
        };
        let instances = self.running_pages.get(index).cloned().unwrap_or_default();
        let next_token = if index + 1 < self.running_pages.len() {
            Some((index + 1).to_string())
        } else {
            None
        };

        Ok(RunningPage {
            instances,
            next_token,
        })
    }

    async fn describe_reserved(&self, _region: &str) -> Result<Vec<ReservedContract>> {
        if self.fail_reserved {
            return Err(Self::injected_failure("describe_reserved"));
        }

        Ok(self.reserved.clone())
    }

    async fn describe_modifications(
        &self,
        _region: &str,
        reservation_id: &str,
    ) -> Result<Vec<Modification>> {
        Ok(self
            .modifications
            .get(reservation_id)
            .cloned()
            .unwrap_or_default())
    }
}
