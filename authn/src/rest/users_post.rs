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

//! API to create a new user.

use crate::driver::AuthnDriver;
use crate::model::UserFields;
use crate::rest::{CurrentUser, UserData, UserView, get_bearer_auth, has_bearer_auth};
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::{Extension, Json};
use eggshop_core::rest::{JsonBody, RestError, SuccessResponse};
use std::sync::Arc;

/// API handler.
///
/// When this route is public, a request may still carry a session token to act as an
/// administrator, in which case the token must be valid.
pub(crate) async fn handler(
    State(driver): State<AuthnDriver>,
    current: Option<Extension<CurrentUser>>,
    headers: HeaderMap,
    JsonBody(fields): JsonBody<UserFields>,
) -> Result<impl IntoResponse, RestError> {
    let caller = match current {
        Some(Extension(CurrentUser(user))) => Some(user),
        None if has_bearer_auth(&headers)? => {
            let token = get_bearer_auth(&headers)?;
            Some(Arc::from(driver.get_session(&token).await?))
        }
        None => None,
    };

    let user = driver.create_user(fields, caller.as_deref()).await?;
    let response = SuccessResponse::new(UserData { user: UserView::from(&user) });
    Ok((StatusCode::CREATED, Json(response)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Password, UserId};
    use crate::rest::testutils::*;
    use axum::http;
    use eggshop_core::rest::testutils::*;
    use eggshop_core::test_payload_must_be_json;
    use serde_json::json;

    fn route() -> (http::Method, String) {
        (http::Method::POST, "/api/v1/users".to_owned())
    }

    #[tokio::test]
    async fn test_ok() {
        let context = TestContext::setup().await;

        let fields = UserFields {
            user_name: Some("Alice".to_owned()),
            email: Some("A@X.com".to_owned()),
            password: Some(Password::from("p")),
            admin: None,
        };
        let response = OneShotBuilder::new(context.app(), route())
            .send_json(fields)
            .await
            .expect_status(http::StatusCode::CREATED)
            .expect_json::<SuccessResponse<UserData>>()
            .await;
        assert_eq!(Some("Alice"), response.data.user.user_name.as_deref());
        assert_eq!("a@x.com", response.data.user.email);
        assert!(!response.data.user.admin);

        let user = context.inner().driver().get_user(response.data.user.id).await.unwrap();
        assert_eq!(UserView::from(&user), response.data.user);
        assert!(Password::from("p").verify(user.password()).unwrap());
    }

    #[tokio::test]
    async fn test_response_omits_password() {
        let context = TestContext::setup().await;

        let response = OneShotBuilder::new(context.app(), route())
            .send_json(json!({"email": "a@x.com", "password": "p"}))
            .await
            .expect_status(http::StatusCode::CREATED)
            .expect_json::<serde_json::Value>()
            .await;
        let user = &response["data"]["user"];
        assert_eq!("success", response["status"]);
        assert!(user.get("password").is_none());
        assert!(UserId::parse(user["id"].as_str().unwrap()).is_ok());
    }

    #[tokio::test]
    async fn test_duplicate_email() {
        let context = TestContext::setup().await;
        context.inner().create_user("a@x.com", "p", false).await;

        OneShotBuilder::new(context.app(), route())
            .send_json(json!({"email": "a@x.com", "password": "q"}))
            .await
            .expect_status(http::StatusCode::BAD_REQUEST)
            .expect_error("Email address is already registered")
            .await;
    }

    #[tokio::test]
    async fn test_missing_and_invalid_fields() {
        let context = TestContext::setup().await;

        for (request, exp_error) in [
            (json!({"password": "p"}), "Email address is required"),
            (json!({"email": "a@x.com"}), "Password is required"),
            (json!({"email": "a", "password": "p"}), "valid address"),
            (json!({"email": "a@x.com", "password": ""}), "Password cannot be empty"),
            (json!({"email": "a@x.com", "password": "p", "admin": "yes"}), "admin"),
        ] {
            OneShotBuilder::new(context.app(), route())
                .send_json(request)
                .await
                .expect_status(http::StatusCode::BAD_REQUEST)
                .expect_error(exp_error)
                .await;
        }
    }

    #[tokio::test]
    async fn test_self_granted_admin() {
        let context = TestContext::setup().await;

        OneShotBuilder::new(context.app(), route())
            .send_json(json!({"email": "a@x.com", "password": "p", "admin": true}))
            .await
            .expect_status(http::StatusCode::UNAUTHORIZED)
            .expect_error("You are not an admin")
            .await;
        assert!(context.inner().driver().get_users().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_admin_creates_admin_on_open_signup() {
        let context = TestContext::setup().await;
        context.inner().create_user("root@x.com", "p", true).await;
        let token = context.inner().do_test_login("root@x.com", "p").await;

        let response = OneShotBuilder::new(context.app(), route())
            .with_bearer_auth(token.as_str())
            .send_json(json!({"email": "a@x.com", "password": "p", "admin": true}))
            .await
            .expect_status(http::StatusCode::CREATED)
            .expect_json::<SuccessResponse<UserData>>()
            .await;
        assert!(response.data.user.admin);
    }

    #[tokio::test]
    async fn test_bad_token_on_open_signup() {
        let context = TestContext::setup().await;

        OneShotBuilder::new(context.app(), route())
            .with_bearer_auth("a.b.c")
            .send_json(json!({"email": "a@x.com", "password": "p"}))
            .await
            .expect_status(http::StatusCode::UNAUTHORIZED)
            .expect_error("Invalid token")
            .await;
    }

    test_payload_must_be_json!(TestContext::setup().await.into_app(), route());
}
