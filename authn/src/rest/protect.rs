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

//! Middleware that restricts routes to signed-in users holding the required role.

use crate::driver::AuthnDriver;
use crate::model::User;
use crate::rest::get_bearer_auth;
use axum::extract::{MatchedPath, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use eggshop_core::rest::RestResult;
use std::sync::Arc;

/// The user that owns the session of a request that went through `protect`.
///
/// Handlers behind `protect` can obtain it with `Extension<CurrentUser>`.
#[derive(Clone, Debug)]
pub struct CurrentUser(pub Arc<User>);

/// Validates the session token of the request and checks the caller's role against the access
/// policy for the matched route before letting the request through.
pub(crate) async fn protect(
    State(driver): State<AuthnDriver>,
    matched: MatchedPath,
    mut request: Request,
    next: Next,
) -> RestResult<Response> {
    let token = get_bearer_auth(request.headers())?;
    let user = driver.get_session(&token).await?;
    driver.authorize(&user, request.method(), matched.as_str())?;

    request.extensions_mut().insert(CurrentUser(Arc::from(user)));
    Ok(next.run(request).await)
}
