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

//! Utilities to help testing services that integrate with the `authn` REST interface.

use crate::model::SessionToken;
use crate::rest::login_post::LoginResponse;
use axum::Router;
use eggshop_core::rest::testutils::OneShotBuilder;
use serde_json::json;

#[cfg(test)]
use {
    crate::driver::AuthnOptions,
    crate::driver::testutils::{TestContext as DriverTestContext, test_options},
    crate::rest::app,
};

/// Logs the user identified by `email` in with `password` through the `app` and returns the
/// session token.
pub async fn do_test_login(app: Router, email: &str, password: &str) -> SessionToken {
    let response = OneShotBuilder::new(app, (http::Method::POST, "/api/v1/users/login"))
        .send_json(json!({"email": email, "password": password}))
        .await
        .expect_json::<LoginResponse>()
        .await;
    response.token
}

/// State of a running test.
#[cfg(test)]
pub(crate) struct TestContext {
    /// Context for the driver backing the app.
    inner: DriverTestContext,

    /// The app under test.
    app: Router,
}

#[cfg(test)]
impl TestContext {
    /// Initializes the app with open signup.
    pub(crate) async fn setup() -> Self {
        Self::setup_with_signup(true).await
    }

    /// Initializes the app with signup open or closed as requested by `open_signup`.
    pub(crate) async fn setup_with_signup(open_signup: bool) -> Self {
        let inner = DriverTestContext::setup(AuthnOptions { open_signup, ..test_options() }).await;
        let app = app(inner.driver());
        Self { inner, app }
    }

    /// Gets the driver-level context.
    pub(crate) fn inner(&self) -> &DriverTestContext {
        &self.inner
    }

    /// Gets a clone of the app router.
    pub(crate) fn app(&self) -> Router {
        self.app.clone()
    }

    /// Consumes the context and transforms it into the app router.
    pub(crate) fn into_app(self) -> Router {
        self.app
    }
}
