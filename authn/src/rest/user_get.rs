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

//! API to get the details of a user.

use crate::driver::AuthnDriver;
use crate::model::UserId;
use crate::rest::{UserData, UserView};
use axum::Json;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use eggshop_core::rest::{EmptyBody, RestError, SuccessResponse};

/// Looks up the user identified by the raw `id` and wraps it in the response envelope.
async fn get_user(driver: AuthnDriver, id: String) -> Result<impl IntoResponse, RestError> {
    let id = UserId::parse(&id)?;
    let user = driver.get_user(id).await?;
    Ok(Json(SuccessResponse::new(UserData { user: UserView::from(&user) })))
}

/// API handler for the GET form, which takes no payload.
pub(crate) async fn handler(
    State(driver): State<AuthnDriver>,
    Path(id): Path<String>,
    _: EmptyBody,
) -> Result<impl IntoResponse, RestError> {
    get_user(driver, id).await
}

/// API handler for the POST form.  Any payload is ignored.
pub(crate) async fn post_handler(
    State(driver): State<AuthnDriver>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, RestError> {
    get_user(driver, id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::testutils::*;
    use axum::http;
    use eggshop_core::rest::testutils::*;

    fn route(id: &str) -> (http::Method, String) {
        (http::Method::GET, format!("/api/v1/users/info/{}", id))
    }

    #[tokio::test]
    async fn test_ok() {
        let context = TestContext::setup().await;
        let user = context.inner().create_user("a@x.com", "p", false).await;
        let other = context.inner().create_user("b@x.com", "p", false).await;
        let token = context.inner().do_test_login("a@x.com", "p").await;

        let response = OneShotBuilder::new(context.app(), route(&other.id().to_string()))
            .with_bearer_auth(token.as_str())
            .send_empty()
            .await
            .expect_json::<SuccessResponse<UserData>>()
            .await;
        assert_eq!(SuccessResponse::new(UserData { user: UserView::from(&other) }), response);

        let response = OneShotBuilder::new(
            context.app(),
            (http::Method::POST, route(&user.id().to_string()).1),
        )
        .with_bearer_auth(token.as_str())
        .send_empty()
        .await
        .expect_json::<SuccessResponse<UserData>>()
        .await;
        assert_eq!(SuccessResponse::new(UserData { user: UserView::from(&user) }), response);
    }

    #[tokio::test]
    async fn test_post_ignores_payload() {
        let context = TestContext::setup().await;
        let user = context.inner().create_user("a@x.com", "p", false).await;
        let token = context.inner().do_test_login("a@x.com", "p").await;

        let response = OneShotBuilder::new(
            context.app(),
            (http::Method::POST, route(&user.id().to_string()).1),
        )
        .with_bearer_auth(token.as_str())
        .send_json(serde_json::json!({}))
        .await
        .expect_json::<SuccessResponse<UserData>>()
        .await;
        assert_eq!(SuccessResponse::new(UserData { user: UserView::from(&user) }), response);
    }

    #[tokio::test]
    async fn test_payload_must_be_empty() {
        let context = TestContext::setup().await;
        let user = context.inner().create_user("a@x.com", "p", false).await;
        let token = context.inner().do_test_login("a@x.com", "p").await;

        OneShotBuilder::new(context.app(), route(&user.id().to_string()))
            .with_bearer_auth(token.as_str())
            .send_text("should not be here")
            .await
            .expect_status(http::StatusCode::PAYLOAD_TOO_LARGE)
            .expect_error("should be empty")
            .await;
    }

    #[tokio::test]
    async fn test_not_found() {
        let context = TestContext::setup().await;
        context.inner().create_user("a@x.com", "p", false).await;
        let token = context.inner().do_test_login("a@x.com", "p").await;

        OneShotBuilder::new(context.app(), route(&UserId::generate().to_string()))
            .with_bearer_auth(token.as_str())
            .send_empty()
            .await
            .expect_status(http::StatusCode::NOT_FOUND)
            .expect_error("Uživatel pro specifikované ID nebyl nalezen")
            .await;
    }

    #[tokio::test]
    async fn test_invalid_id() {
        let context = TestContext::setup().await;
        context.inner().create_user("a@x.com", "p", false).await;
        let token = context.inner().do_test_login("a@x.com", "p").await;

        OneShotBuilder::new(context.app(), route("1234"))
            .with_bearer_auth(token.as_str())
            .send_empty()
            .await
            .expect_status(http::StatusCode::BAD_REQUEST)
            .expect_error("Invalid ID: 1234")
            .await;
    }

    #[tokio::test]
    async fn test_requires_session() {
        let context = TestContext::setup().await;
        let user = context.inner().create_user("a@x.com", "p", false).await;

        OneShotBuilder::new(context.app(), route(&user.id().to_string()))
            .send_empty()
            .await
            .expect_status(http::StatusCode::UNAUTHORIZED)
            .expect_error("not signed in")
            .await;
    }
}
