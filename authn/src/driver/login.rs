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

//! Extends the driver with the `login` method.

use crate::db;
use crate::driver::{AuthnDriver, LOGIN_FAILED_MESSAGE};
use crate::model::{Password, SessionToken};
use eggshop_core::db::DbError;
use eggshop_core::driver::{DriverError, DriverResult};
use eggshop_core::model::EmailAddress;
use log::warn;

/// Builds the error returned for any failed login attempt, hiding which credential was wrong.
fn login_failed() -> DriverError {
    DriverError::Unauthorized(LOGIN_FAILED_MESSAGE.to_owned())
}

impl AuthnDriver {
    /// Logs a user in with `email` and `password` and returns a new session token.
    pub(crate) async fn login(self, email: String, password: String) -> DriverResult<SessionToken> {
        let (email, password) = match (EmailAddress::new(email), Password::new(password)) {
            (Ok(email), Ok(password)) => (email, password),
            _ => return Err(login_failed()),
        };

        let mut ex = self.db.ex().await?;
        let user = match db::get_user_by_email(&mut ex, &email).await {
            Ok(user) => user,
            Err(DbError::NotFound) => {
                warn!("Login attempt for unknown user {}", email.as_str());
                return Err(login_failed());
            }
            Err(e) => return Err(e.into()),
        };

        let matches = password
            .verify(user.password())
            .map_err(|e| DriverError::BackendError(format!("Stored hash for user is bad: {}", e)))?;
        if !matches {
            warn!("Login attempt with bad password for user {}", email.as_str());
            return Err(login_failed());
        }

        self.tokens.issue(&user, self.clock.now_utc())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::testutils::*;

    #[tokio::test]
    async fn test_login_ok() {
        let context = TestContext::setup(test_options()).await;
        let user = context.create_user("a@x.com", "p", false).await;

        let token =
            context.driver().login("A@x.com".to_owned(), "p".to_owned()).await.unwrap();
        assert_eq!(user, context.driver().get_session(&token).await.unwrap());
    }

    #[tokio::test]
    async fn test_login_unknown_user() {
        let context = TestContext::setup(test_options()).await;

        assert_eq!(
            login_failed(),
            context.driver().login("a@x.com".to_owned(), "p".to_owned()).await.unwrap_err()
        );
    }

    #[tokio::test]
    async fn test_login_invalid_password() {
        let context = TestContext::setup(test_options()).await;
        context.create_user("a@x.com", "p", false).await;

        assert_eq!(
            login_failed(),
            context.driver().login("a@x.com".to_owned(), "P".to_owned()).await.unwrap_err()
        );
    }

    #[tokio::test]
    async fn test_login_malformed_credentials() {
        let context = TestContext::setup(test_options()).await;

        for (email, password) in [("not-an-email", "p"), ("a@x.com", "")] {
            assert_eq!(
                login_failed(),
                context
                    .driver()
                    .login(email.to_owned(), password.to_owned())
                    .await
                    .unwrap_err()
            );
        }
    }

    #[tokio::test]
    async fn test_login_bad_stored_hash() {
        let context = TestContext::setup(test_options()).await;
        context.create_user_with_hash("a@x.com", "not a hash").await;

        match context.driver().login("a@x.com".to_owned(), "p".to_owned()).await {
            Err(DriverError::BackendError(msg)) => assert!(msg.contains("hash")),
            e => panic!("{:?}", e),
        }
    }
}
