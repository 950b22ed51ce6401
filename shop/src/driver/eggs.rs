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

//! Operations on the whole egg catalog.

use crate::db;
use crate::driver::Driver;
use crate::model::{Egg, EggFields, EggId};
use eggshop_core::driver::DriverResult;

impl Driver {
    /// Gets all eggs in the catalog.
    pub(crate) async fn get_eggs(self) -> DriverResult<Vec<Egg>> {
        let mut ex = self.db.ex().await?;
        Ok(db::get_eggs(&mut ex).await?)
    }

    /// Adds a new egg built out of `fields` to the catalog.
    pub(crate) async fn create_egg(self, fields: EggFields) -> DriverResult<Egg> {
        let egg = fields.into_new_egg(EggId::generate())?;

        let mut ex = self.db.ex().await?;
        db::create_egg(&mut ex, &egg).await?;
        Ok(egg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::testutils::*;
    use eggshop_core::driver::DriverError;

    #[tokio::test]
    async fn test_get_eggs_empty() {
        let context = TestContext::setup().await;

        assert!(context.driver().get_eggs().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_eggs_some() {
        let context = TestContext::setup().await;

        let egg2 = context.create_egg("Quail", 5).await;
        let egg1 = context.create_egg("Duck", 8).await;

        assert_eq!(vec![egg1, egg2], context.driver().get_eggs().await.unwrap());
    }

    #[tokio::test]
    async fn test_create_egg_ok() {
        let context = TestContext::setup().await;

        let fields = EggFields {
            name: Some("  Quail ".to_owned()),
            description: Some("Small and speckled".to_owned()),
            price: Some(5),
            stock: None,
        };
        let egg = context.driver().create_egg(fields).await.unwrap();
        assert_eq!("Quail", egg.name());
        assert_eq!(Some("Small and speckled"), egg.description().as_deref());
        assert_eq!(5, *egg.price());
        assert_eq!(0, *egg.stock());

        assert_eq!(egg, db::get_egg(&mut context.ex().await, *egg.id()).await.unwrap());
    }

    #[tokio::test]
    async fn test_create_egg_invalid() {
        let context = TestContext::setup().await;

        let fields = EggFields { name: Some("Quail".to_owned()), price: Some(-1), ..Default::default() };
        assert_eq!(
            DriverError::InvalidInput("Egg price cannot be negative".to_owned()),
            context.driver().create_egg(fields).await.unwrap_err()
        );

        assert!(db::get_eggs(&mut context.ex().await).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_egg_missing_fields() {
        let context = TestContext::setup().await;

        let fields = EggFields { price: Some(3), ..Default::default() };
        assert_eq!(
            DriverError::InvalidInput("Egg name is required".to_owned()),
            context.driver().create_egg(fields).await.unwrap_err()
        );
    }
}
