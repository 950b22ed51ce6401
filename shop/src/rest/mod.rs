// III-IV
// Copyright 2023 Julio Merino
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! REST interface for the egg catalog.

use crate::driver::Driver;
use crate::model::Egg;
use axum::Router;
#[cfg(test)]
use serde::Deserialize;
use serde::Serialize;

mod egg_delete;
mod egg_get;
mod egg_patch;
mod eggs_get;
mod eggs_post;
#[cfg(test)]
mod testutils;

/// Payload for responses that carry a single egg.
#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(Deserialize, PartialEq))]
pub(crate) struct EggData {
    /// The egg.
    pub(crate) egg: Egg,
}

/// Payload for responses that carry the whole catalog.
#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(Deserialize, PartialEq))]
pub(crate) struct EggsData {
    /// The eggs.
    pub(crate) eggs: Vec<Egg>,
}

/// Creates the router for the eggs endpoints.
pub(crate) fn app(driver: Driver) -> Router {
    use axum::routing::get;
    Router::new()
        .route("/api/v1/eggs", get(eggs_get::handler).post(eggs_post::handler))
        .route(
            "/api/v1/eggs/:id",
            get(egg_get::handler).patch(egg_patch::handler).delete(egg_delete::handler),
        )
        .with_state(driver)
}
