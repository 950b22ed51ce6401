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

//! API to remove an egg from the catalog.

use crate::driver::Driver;
use crate::model::EggId;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use eggshop_core::rest::{EmptyBody, RestError};

/// API handler.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    Path(id): Path<String>,
    _: EmptyBody,
) -> Result<StatusCode, RestError> {
    let id = EggId::parse(&id)?;
    driver.delete_egg(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::rest::testutils::*;
    use axum::http;
    use eggshop_core::db::DbError;
    use eggshop_core::rest::testutils::*;

    fn route(id: &str) -> (http::Method, String) {
        (http::Method::DELETE, format!("/api/v1/eggs/{}", id))
    }

    #[tokio::test]
    async fn test_ok() {
        let context = TestContext::setup().await;
        let egg = context.inner().create_egg("Quail", 5).await;
        let other = context.inner().create_egg("Duck", 8).await;

        OneShotBuilder::new(context.app(), route(&egg.id().to_string()))
            .send_empty()
            .await
            .expect_status(http::StatusCode::NO_CONTENT)
            .expect_empty()
            .await;

        let mut ex = context.inner().ex().await;
        assert_eq!(DbError::NotFound, db::get_egg(&mut ex, *egg.id()).await.unwrap_err());
        assert_eq!(vec![other], db::get_eggs(&mut ex).await.unwrap());
    }

    #[tokio::test]
    async fn test_not_found() {
        let context = TestContext::setup().await;

        OneShotBuilder::new(context.app(), route(&EggId::generate().to_string()))
            .send_empty()
            .await
            .expect_status(http::StatusCode::NOT_FOUND)
            .expect_error("Položka pro specifikované ID nebyla nalezena")
            .await;
    }

    #[tokio::test]
    async fn test_payload_must_be_empty() {
        let context = TestContext::setup().await;
        let egg = context.inner().create_egg("Quail", 5).await;

        OneShotBuilder::new(context.app(), route(&egg.id().to_string()))
            .send_text("should not be here")
            .await
            .expect_status(http::StatusCode::PAYLOAD_TOO_LARGE)
            .expect_error("should be empty")
            .await;
    }
}
