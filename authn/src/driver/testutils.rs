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

//! Utilities to help testing services that integrate with the `authn` features.

use crate::db;
use crate::driver::policy::USERS_ACCESS_POLICY;
use crate::driver::{AuthnDriver, AuthnOptions};
use crate::model::{HashedPassword, Password, SessionToken, User, UserId};
use eggshop_core::clocks::testutils::SettableClock;
use eggshop_core::db::{Db, Executor};
use eggshop_core::model::EmailAddress;
use std::sync::Arc;
use std::time::Duration;
use time::OffsetDateTime;

/// Returns a set of options suitable for tests.
pub fn test_options() -> AuthnOptions {
    AuthnOptions {
        jwt_secret: "test secret".to_owned(),
        token_max_age: Duration::from_secs(24 * 60 * 60),
        open_signup: true,
        admin_email: None,
        admin_password: None,
    }
}

/// State of a running test.
pub struct TestContext {
    /// The clock that the driver reads, which tests can move forward.
    clock: Arc<SettableClock>,

    /// The driver to handle authentication flows.
    driver: AuthnDriver,
}

impl TestContext {
    /// Initializes the driver using an in-memory database and a settable clock.
    pub async fn setup(opts: AuthnOptions) -> Self {
        let db = Arc::from(eggshop_core::db::sqlite::testutils::setup().await);
        Self::setup_with(opts, db).await
    }

    /// Initializes the test context using the given already-initialized database.
    pub async fn setup_with(opts: AuthnOptions, db: Arc<dyn Db + Send + Sync>) -> Self {
        db::init_schema(&mut db.ex().await.unwrap()).await.unwrap();
        let now = OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap();
        let clock = Arc::from(SettableClock::new(now));
        let driver = AuthnDriver::new(db, clock.clone(), &USERS_ACCESS_POLICY, opts);
        TestContext { clock, driver }
    }

    /// Syntactic sugar to create a user with an already-hashed password.
    pub async fn create_user_with_hash(&self, email: &str, hash: &str) -> User {
        let user = User::new(UserId::generate(), EmailAddress::from(email), HashedPassword::new(hash));
        db::create_user(&mut self.ex().await, &user).await.unwrap();
        user
    }

    /// Syntactic sugar to create a user for testing purposes.
    pub async fn create_user(&self, email: &str, password: &'static str, admin: bool) -> User {
        let hash = Password::from(password).hash().unwrap();
        let user = User::new(UserId::generate(), EmailAddress::from(email), hash).with_admin(admin);
        db::create_user(&mut self.ex().await, &user).await.unwrap();
        user
    }

    /// Syntactic sugar to log an existing user in for testing purposes.
    pub async fn do_test_login(&self, email: &str, password: &str) -> SessionToken {
        self.driver.clone().login(email.to_owned(), password.to_owned()).await.unwrap()
    }

    /// Gets a direct executor against the database.
    pub async fn ex(&self) -> Executor {
        self.driver.db.ex().await.unwrap()
    }

    /// Gets the clock used by the driver.
    pub fn clock(&self) -> &SettableClock {
        &self.clock
    }

    /// Gets a copy of the driver in this test context.
    pub fn driver(&self) -> AuthnDriver {
        self.driver.clone()
    }
}
