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

//! Extends the driver with the user account management operations.

use crate::db;
use crate::driver::{AuthnDriver, EMAIL_TAKEN_MESSAGE, NOT_ADMIN_MESSAGE, USER_NOT_FOUND_MESSAGE};
use crate::model::{Password, Role, User, UserFields, UserId};
use eggshop_core::db::DbError;
use eggshop_core::driver::{DriverError, DriverResult};
use eggshop_core::model::EmailAddress;
use log::{info, warn};

/// Translates database errors for operations that address a single user.
fn map_user_error(e: DbError) -> DriverError {
    match e {
        DbError::AlreadyExists => DriverError::AlreadyExists(EMAIL_TAKEN_MESSAGE.to_owned()),
        DbError::NotFound => DriverError::NotFound(USER_NOT_FOUND_MESSAGE.to_owned()),
        e => e.into(),
    }
}

impl AuthnDriver {
    /// Gets all users.
    pub(crate) async fn get_users(self) -> DriverResult<Vec<User>> {
        let mut ex = self.db.ex().await?;
        Ok(db::get_users(&mut ex).await?)
    }

    /// Gets the user identified by `id`.
    pub(crate) async fn get_user(self, id: UserId) -> DriverResult<User> {
        let mut ex = self.db.ex().await?;
        db::get_user_by_id(&mut ex, &id).await.map_err(map_user_error)
    }

    /// Creates a new user out of `fields` on behalf of `caller`, which is `None` when the
    /// request is anonymous.  Only administrators can create other administrators.
    pub(crate) async fn create_user(
        self,
        fields: UserFields,
        caller: Option<&User>,
    ) -> DriverResult<User> {
        if fields.admin == Some(true) && caller.map(User::role) != Some(Role::Admin) {
            return Err(DriverError::Unauthorized(NOT_ADMIN_MESSAGE.to_owned()));
        }

        let user = fields.into_new_user(UserId::generate())?;

        let mut ex = self.db.ex().await?;
        db::create_user(&mut ex, &user).await.map_err(map_user_error)?;
        Ok(user)
    }

    /// Applies the present `fields` to the user identified by `id` and returns the updated user.
    pub(crate) async fn update_user(self, id: UserId, fields: UserFields) -> DriverResult<User> {
        let mut tx = self.db.begin().await?;

        let user = db::get_user_by_id(tx.ex(), &id).await.map_err(map_user_error)?;
        let user = fields.apply_to(user)?;
        db::update_user(tx.ex(), &user).await.map_err(map_user_error)?;

        tx.commit().await?;
        Ok(user)
    }

    /// Deletes the user identified by `id`.
    pub(crate) async fn delete_user(self, id: UserId) -> DriverResult<()> {
        let mut ex = self.db.ex().await?;
        db::delete_user(&mut ex, &id).await.map_err(map_user_error)
    }

    /// Creates the administrator configured in the options, if any and if it does not exist yet.
    pub async fn bootstrap_admin(self) -> DriverResult<()> {
        let (email, password) = match (&self.opts.admin_email, &self.opts.admin_password) {
            (Some(email), Some(password)) => {
                (EmailAddress::new(email.as_str())?, Password::new(password.as_str())?)
            }
            _ => return Ok(()),
        };

        let mut tx = self.db.begin().await?;
        match db::get_user_by_email(tx.ex(), &email).await {
            Ok(user) => {
                if !user.admin() {
                    warn!("Bootstrap admin {} exists but is not an admin", email.as_str());
                }
                return Ok(());
            }
            Err(DbError::NotFound) => (),
            Err(e) => return Err(e.into()),
        }

        let user = User::new(UserId::generate(), email, password.hash()?).with_admin(true);
        db::create_user(tx.ex(), &user).await?;
        tx.commit().await?;

        info!("Created bootstrap admin {}", user.email().as_str());
        Ok(())
    }
}
