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

//! Business logic for user accounts and authentication.

use crate::db;
use crate::driver::policy::AccessPolicy;
use crate::driver::tokens::TokenSigner;
use crate::model::{SessionToken, User, UserId};
use derivative::Derivative;
use eggshop_core::clocks::Clock;
use eggshop_core::db::{Db, DbError};
use eggshop_core::driver::{DriverError, DriverResult};
use eggshop_core::env::{get_optional_var, get_required_var};
use http::Method;
use std::sync::Arc;
use std::time::Duration;

mod login;
pub mod policy;
#[cfg(any(test, feature = "testutils"))]
pub mod testutils;
mod tokens;
mod users;

/// Message returned when the requested user does not exist.
pub(crate) const USER_NOT_FOUND_MESSAGE: &str = "Uživatel pro specifikované ID nebyl nalezen";

/// Message returned when a login attempt fails for any reason.
pub(crate) const LOGIN_FAILED_MESSAGE: &str = "Incorrect email or password";

/// Message returned when a session token cannot be decoded or has a bad signature.
pub(crate) const INVALID_TOKEN_MESSAGE: &str = "Invalid token; please log in again";

/// Message returned when a session token is past its expiration time.
pub(crate) const EXPIRED_TOKEN_MESSAGE: &str = "Your token has expired; please log in again";

/// Message returned when a valid session token refers to a deleted user.
pub(crate) const USER_GONE_MESSAGE: &str = "The user for this token no longer exists";

/// Message returned when the caller lacks the role needed for an operation.
pub(crate) const NOT_ADMIN_MESSAGE: &str = "You are not an admin";

/// Message returned when an email address is already in use by another account.
pub(crate) const EMAIL_TAKEN_MESSAGE: &str = "Email address is already registered";

/// Default value for the `JWT_EXPIRES_IN` setting when not specified.
const DEFAULT_TOKEN_MAX_AGE: Duration = Duration::from_secs(90 * 24 * 60 * 60);

/// Configuration options for the authentication driver.
#[derive(Clone, Derivative)]
#[derivative(Debug)]
#[cfg_attr(test, derive(PartialEq))]
pub struct AuthnOptions {
    /// Secret used to sign and verify session tokens.
    #[derivative(Debug = "ignore")]
    pub jwt_secret: String,

    /// The amount of time issued session tokens remain valid for.
    pub token_max_age: Duration,

    /// Whether anyone can create an account or only administrators can.
    pub open_signup: bool,

    /// Email address of the administrator to create at startup, if any.
    pub admin_email: Option<String>,

    /// Password of the administrator to create at startup, if any.
    #[derivative(Debug = "ignore")]
    pub admin_password: Option<String>,
}

impl AuthnOptions {
    /// Creates a new set of options from environment variables whose name is prefixed by `prefix`.
    pub fn from_env(prefix: &str) -> Result<Self, String> {
        let jwt_secret = get_required_var::<String>(prefix, "JWT_SECRET")?;
        if jwt_secret.is_empty() {
            return Err(format!("{}_JWT_SECRET cannot be empty", prefix));
        }

        let admin_email = get_optional_var::<String>(prefix, "ADMIN_EMAIL")?;
        let admin_password = get_optional_var::<String>(prefix, "ADMIN_PASSWORD")?;
        if admin_email.is_some() != admin_password.is_some() {
            return Err(format!(
                "{}_ADMIN_EMAIL and {}_ADMIN_PASSWORD must be set together",
                prefix, prefix
            ));
        }

        Ok(Self {
            jwt_secret,
            token_max_age: get_optional_var::<Duration>(prefix, "JWT_EXPIRES_IN")?
                .unwrap_or(DEFAULT_TOKEN_MAX_AGE),
            open_signup: get_optional_var::<bool>(prefix, "OPEN_SIGNUP")?.unwrap_or(true),
            admin_email,
            admin_password,
        })
    }
}

/// Business logic.
///
/// The public operations exposed by the driver are all "one shot": they start and commit a
/// transaction, so it's incorrect for the caller to use two separate calls.  For this reason,
/// these operations consume the driver in an attempt to minimize the possibility of executing
/// two operations.
#[derive(Clone)]
pub struct AuthnDriver {
    /// The database that the driver uses for persistence.
    db: Arc<dyn Db + Send + Sync>,

    /// Clock instance to obtain the current time.
    clock: Arc<dyn Clock + Send + Sync>,

    /// Signer for session tokens.
    tokens: Arc<TokenSigner>,

    /// Roles required to access the protected routes.
    policy: &'static AccessPolicy,

    /// Options for the authentication driver.
    opts: AuthnOptions,
}

impl AuthnDriver {
    /// Creates a new driver backed by the given dependencies.
    pub fn new(
        db: Arc<dyn Db + Send + Sync>,
        clock: Arc<dyn Clock + Send + Sync>,
        policy: &'static AccessPolicy,
        opts: AuthnOptions,
    ) -> Self {
        let tokens = Arc::from(TokenSigner::new(&opts.jwt_secret, opts.token_max_age));
        Self { db, clock, tokens, policy, opts }
    }

    /// Returns a reference to the authentication options provided at creation time.
    pub(crate) fn opts(&self) -> &AuthnOptions {
        &self.opts
    }

    /// Validates the session `token` and returns the user that owns it.
    pub async fn get_session(&self, token: &SessionToken) -> DriverResult<User> {
        let claims = self.tokens.verify(token, self.clock.now_utc())?;
        let id = UserId::parse(&claims.sub)
            .map_err(|_| DriverError::Unauthorized(INVALID_TOKEN_MESSAGE.to_owned()))?;

        match db::get_user_by_id(&mut self.db.ex().await?, &id).await {
            Ok(user) => Ok(user),
            Err(DbError::NotFound) => Err(DriverError::Unauthorized(USER_GONE_MESSAGE.to_owned())),
            Err(e) => Err(e.into()),
        }
    }

    /// Checks if `user` holds the role required to invoke `method` on the route pattern `path`.
    pub fn authorize(&self, user: &User, method: &Method, path: &str) -> DriverResult<()> {
        if user.role() < self.policy.required_role(method, path) {
            return Err(DriverError::Unauthorized(NOT_ADMIN_MESSAGE.to_owned()));
        }
        Ok(())
    }
}
