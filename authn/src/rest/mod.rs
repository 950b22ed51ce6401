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

//! REST interface for user accounts and authentication.

use crate::driver::AuthnDriver;
use crate::model::{User, UserId};
use axum::Router;
#[cfg(any(test, feature = "testutils"))]
use serde::Deserialize;
use serde::Serialize;

mod httputils;
mod login_post;
mod protect;
#[cfg(any(test, feature = "testutils"))]
pub mod testutils;
mod user_delete;
mod user_get;
mod user_patch;
mod users_get;
mod users_post;

pub use httputils::{get_bearer_auth, has_bearer_auth};
pub use protect::CurrentUser;

/// Public representation of a user.  Never includes the password hash.
#[derive(Debug, Serialize)]
#[cfg_attr(any(test, feature = "testutils"), derive(Deserialize, PartialEq))]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    /// Identifier of the user.
    pub id: UserId,

    /// Display name of the user, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,

    /// Email address of the user.
    pub email: String,

    /// Whether the user is an administrator.
    pub admin: bool,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: *user.id(),
            user_name: user.user_name().map(|n| n.as_str().to_owned()),
            email: user.email().as_str().to_owned(),
            admin: user.admin(),
        }
    }
}

/// Payload for responses that carry a single user.
#[derive(Debug, Serialize)]
#[cfg_attr(any(test, feature = "testutils"), derive(Deserialize, PartialEq))]
pub struct UserData {
    /// The user.
    pub user: UserView,
}

/// Payload for responses that carry all users.
#[derive(Debug, Serialize)]
#[cfg_attr(any(test, feature = "testutils"), derive(Deserialize, PartialEq))]
pub struct UsersData {
    /// The users.
    pub users: Vec<UserView>,
}

/// Creates the router for the users endpoints.
///
/// The `driver` is a configured instance of the `AuthnDriver` to handle accounts.  Account
/// creation is public when the driver's options enable open signup and restricted to signed-in
/// callers otherwise.
pub fn app(driver: AuthnDriver) -> Router {
    use axum::middleware::from_fn_with_state;
    use axum::routing::{get, patch, post};

    let mut public = Router::new().route("/api/v1/users/login", post(login_post::handler));
    let mut protected = Router::new()
        .route("/api/v1/users/info", get(users_get::handler).post(users_get::post_handler))
        .route("/api/v1/users/info/:id", get(user_get::handler).post(user_get::post_handler))
        .route("/api/v1/users/:id", patch(user_patch::handler).delete(user_delete::handler));

    if driver.opts().open_signup {
        public = public.route("/api/v1/users", post(users_post::handler));
    } else {
        protected = protected.route("/api/v1/users", post(users_post::handler));
    }

    let protected =
        protected.route_layer(from_fn_with_state(driver.clone(), protect::protect));
    public.merge(protected).with_state(driver)
}
