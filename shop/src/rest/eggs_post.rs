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

//! API to add an egg to the catalog.

use crate::driver::Driver;
use crate::model::EggFields;
use crate::rest::EggData;
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use eggshop_core::rest::{JsonBody, RestError, SuccessResponse};

/// API handler.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    JsonBody(fields): JsonBody<EggFields>,
) -> Result<impl IntoResponse, RestError> {
    let egg = driver.create_egg(fields).await?;
    Ok((StatusCode::CREATED, Json(SuccessResponse::new(EggData { egg }))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::rest::testutils::*;
    use axum::http;
    use eggshop_core::rest::testutils::*;
    use eggshop_core::test_payload_must_be_json;
    use serde_json::json;

    fn route() -> (http::Method, String) {
        (http::Method::POST, "/api/v1/eggs".to_owned())
    }

    #[tokio::test]
    async fn test_ok() {
        let context = TestContext::setup().await;

        let response = OneShotBuilder::new(context.app(), route())
            .send_json(json!({"name": "Quail", "price": 5, "stock": 12, "color": "ignored"}))
            .await
            .expect_status(http::StatusCode::CREATED)
            .expect_json::<SuccessResponse<EggData>>()
            .await;
        let egg = response.data.egg;
        assert_eq!("Quail", egg.name());
        assert_eq!(&None, egg.description());
        assert_eq!(5, *egg.price());
        assert_eq!(12, *egg.stock());

        let stored = db::get_egg(&mut context.inner().ex().await, *egg.id()).await.unwrap();
        assert_eq!(egg, stored);
    }

    #[tokio::test]
    async fn test_missing_fields() {
        let context = TestContext::setup().await;

        OneShotBuilder::new(context.app(), route())
            .send_json(json!({"name": "Quail"}))
            .await
            .expect_status(http::StatusCode::BAD_REQUEST)
            .expect_error("Egg price is required")
            .await;

        assert!(db::get_eggs(&mut context.inner().ex().await).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_ill_typed_fields() {
        let context = TestContext::setup().await;

        OneShotBuilder::new(context.app(), route())
            .send_json(json!({"name": "Quail", "price": "cheap"}))
            .await
            .expect_status(http::StatusCode::BAD_REQUEST)
            .expect_error("invalid type")
            .await;
    }

    test_payload_must_be_json!(TestContext::setup().await.into_app(), route());
}
