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

//! API to list all users.

use crate::driver::AuthnDriver;
use crate::rest::{UserView, UsersData};
use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use eggshop_core::rest::{EmptyBody, RestError, SuccessResponse};

/// Lists all users and wraps them in the response envelope.
async fn get_users(driver: AuthnDriver) -> Result<impl IntoResponse, RestError> {
    let users = driver.get_users().await?;
    let users = users.iter().map(UserView::from).collect::<Vec<_>>();
    let results = users.len();
    Ok(Json(SuccessResponse::with_results(UsersData { users }, results)))
}

/// API handler for the GET form, which takes no payload.
pub(crate) async fn handler(
    State(driver): State<AuthnDriver>,
    _: EmptyBody,
) -> Result<impl IntoResponse, RestError> {
    get_users(driver).await
}

/// API handler for the POST form.  Any payload is ignored.
pub(crate) async fn post_handler(
    State(driver): State<AuthnDriver>,
) -> Result<impl IntoResponse, RestError> {
    get_users(driver).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::testutils::*;
    use axum::http;
    use eggshop_core::rest::testutils::*;

    fn route() -> (http::Method, String) {
        (http::Method::GET, "/api/v1/users/info".to_owned())
    }

    #[tokio::test]
    async fn test_ok() {
        let context = TestContext::setup().await;
        let user2 = context.inner().create_user("b@x.com", "p", false).await;
        let user1 = context.inner().create_user("a@x.com", "p", true).await;
        let token = context.inner().do_test_login("b@x.com", "p").await;

        for method in [http::Method::GET, http::Method::POST] {
            let response = OneShotBuilder::new(context.app(), (method, route().1))
                .with_bearer_auth(token.as_str())
                .send_empty()
                .await
                .expect_json::<SuccessResponse<UsersData>>()
                .await;
            let exp_response = SuccessResponse::with_results(
                UsersData { users: vec![UserView::from(&user1), UserView::from(&user2)] },
                2,
            );
            assert_eq!(exp_response, response);
        }
    }

    #[tokio::test]
    async fn test_post_ignores_payload() {
        let context = TestContext::setup().await;
        let user = context.inner().create_user("a@x.com", "p", false).await;
        let token = context.inner().do_test_login("a@x.com", "p").await;

        let response = OneShotBuilder::new(context.app(), (http::Method::POST, route().1))
            .with_bearer_auth(token.as_str())
            .send_json(serde_json::json!({}))
            .await
            .expect_json::<SuccessResponse<UsersData>>()
            .await;
        let exp_response =
            SuccessResponse::with_results(UsersData { users: vec![UserView::from(&user)] }, 1);
        assert_eq!(exp_response, response);
    }

    #[tokio::test]
    async fn test_payload_must_be_empty() {
        let context = TestContext::setup().await;
        context.inner().create_user("a@x.com", "p", false).await;
        let token = context.inner().do_test_login("a@x.com", "p").await;

        OneShotBuilder::new(context.app(), route())
            .with_bearer_auth(token.as_str())
            .send_text("should not be here")
            .await
            .expect_status(http::StatusCode::PAYLOAD_TOO_LARGE)
            .expect_error("should be empty")
            .await;
    }
}
