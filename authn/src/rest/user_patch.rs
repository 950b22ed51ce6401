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

//! API to update the details of a user.

use crate::driver::AuthnDriver;
use crate::model::{UserFields, UserId};
use crate::rest::{UserData, UserView};
use axum::Json;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use eggshop_core::rest::{JsonBody, RestError, SuccessResponse};

/// API handler.
pub(crate) async fn handler(
    State(driver): State<AuthnDriver>,
    Path(id): Path<String>,
    JsonBody(fields): JsonBody<UserFields>,
) -> Result<impl IntoResponse, RestError> {
    let id = UserId::parse(&id)?;
    let user = driver.update_user(id, fields).await?;
    Ok(Json(SuccessResponse::new(UserData { user: UserView::from(&user) })))
}
