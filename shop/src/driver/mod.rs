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

//! Business logic for the egg catalog.

use eggshop_core::db::{Db, DbError};
use eggshop_core::driver::DriverError;
use std::sync::Arc;

mod egg;
mod eggs;
#[cfg(test)]
pub(crate) mod testutils;

/// Message returned when an egg cannot be found.
pub(crate) const EGG_NOT_FOUND_MESSAGE: &str = "Položka pro specifikované ID nebyla nalezena";

/// Translates database errors for operations that address a single egg.
fn map_egg_error(e: DbError) -> DriverError {
    match e {
        DbError::NotFound => DriverError::NotFound(EGG_NOT_FOUND_MESSAGE.to_owned()),
        e => e.into(),
    }
}

/// Business logic.
///
/// The public operations exposed by the driver are all "one shot": they start and commit a
/// transaction, so it's incorrect for the caller to use two separate calls.  For this reason,
/// these operations consume the driver in an attempt to minimize the possibility of executing
/// two operations.
#[derive(Clone)]
pub(crate) struct Driver {
    /// The database that the driver uses for persistence.
    db: Arc<dyn Db + Send + Sync>,
}

impl Driver {
    /// Creates a new driver backed by the given injected database.
    pub(crate) fn new(db: Arc<dyn Db + Send + Sync>) -> Self {
        Self { db }
    }
}
