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

//! Operations on one egg.

use crate::db;
use crate::driver::{Driver, map_egg_error};
use crate::model::{Egg, EggFields, EggId};
use eggshop_core::driver::DriverResult;

impl Driver {
    /// Gets the egg identified by `id`.
    pub(crate) async fn get_egg(self, id: EggId) -> DriverResult<Egg> {
        let mut ex = self.db.ex().await?;
        db::get_egg(&mut ex, id).await.map_err(map_egg_error)
    }

    /// Applies the present `fields` to the egg identified by `id` and returns the updated egg.
    pub(crate) async fn update_egg(self, id: EggId, fields: EggFields) -> DriverResult<Egg> {
        let mut tx = self.db.begin().await?;

        let egg = db::get_egg(tx.ex(), id).await.map_err(map_egg_error)?;
        let egg = fields.apply_to(egg)?;
        db::update_egg(tx.ex(), &egg).await.map_err(map_egg_error)?;

        tx.commit().await?;
        Ok(egg)
    }

    /// Deletes the egg identified by `id`.
    pub(crate) async fn delete_egg(self, id: EggId) -> DriverResult<()> {
        let mut ex = self.db.ex().await?;
        db::delete_egg(&mut ex, id).await.map_err(map_egg_error)
    }
}
