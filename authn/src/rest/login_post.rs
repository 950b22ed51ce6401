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

//! API to log a user in and obtain a session token.

use crate::driver::AuthnDriver;
use crate::model::SessionToken;
use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use eggshop_core::rest::{JsonBody, ResponseStatus, RestError};
use serde::{Deserialize, Serialize};

/// Message returned when the login request lacks credentials.
const MISSING_CREDENTIALS_MESSAGE: &str = "Please provide email and password";

/// Message sent to the server to log a user in.
#[derive(Deserialize)]
#[cfg_attr(test, derive(Serialize))]
pub(crate) struct LoginRequest {
    /// Email address of the account.
    #[serde(default)]
    email: Option<String>,

    /// Password of the account.
    #[serde(default)]
    password: Option<String>,
}

/// Message returned by the server after a successful login attempt.
#[derive(Debug, Serialize)]
#[cfg_attr(any(test, feature = "testutils"), derive(Deserialize))]
pub(crate) struct LoginResponse {
    /// Always `ResponseStatus::Success`.
    pub(crate) status: ResponseStatus,

    /// Session token to present in the `Authorization` header of later requests.
    pub(crate) token: SessionToken,
}

/// POST handler for this API.
pub(crate) async fn handler(
    State(driver): State<AuthnDriver>,
    JsonBody(request): JsonBody<LoginRequest>,
) -> Result<impl IntoResponse, RestError> {
    let (email, password) = match (request.email, request.password) {
        (Some(email), Some(password)) if !email.is_empty() && !password.is_empty() => {
            (email, password)
        }
        _ => return Err(RestError::InvalidRequest(MISSING_CREDENTIALS_MESSAGE.to_owned())),
    };

    let token = driver.login(email, password).await?;
    Ok(Json(LoginResponse { status: ResponseStatus::Success, token }))
}
