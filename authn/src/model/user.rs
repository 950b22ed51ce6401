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

//! The `User` data type and its identifiers.

use crate::model::{HashedPassword, Password};
use eggshop_core::model::{EmailAddress, ModelError, ModelResult, UserName};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier of a user account.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Generates a new random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parses an identifier from untrusted input such as a URL path segment.
    pub fn parse(s: &str) -> ModelResult<Self> {
        Uuid::parse_str(s).map(Self).map_err(|_| ModelError(format!("Invalid ID: {}", s)))
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Roles that a user can hold.  Higher roles grant everything that lower roles grant.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub enum Role {
    /// Any signed-in user.
    User,

    /// An administrator.
    Admin,
}

/// Representation of a user account as stored in the database.
#[derive(Clone, Debug, PartialEq)]
pub struct User {
    /// Immutable identifier of the user.
    id: UserId,

    /// Optional display name.
    user_name: Option<UserName>,

    /// Email address, unique across all users.
    email: EmailAddress,

    /// The bcrypt hash of the password.  Never exposed through the REST interface.
    password: HashedPassword,

    /// Whether the user is an administrator.
    admin: bool,
}

impl User {
    /// Creates a new non-admin user.
    pub fn new(id: UserId, email: EmailAddress, password: HashedPassword) -> Self {
        Self { id, user_name: None, email, password, admin: false }
    }

    /// Modifies a user to set its display name.
    pub fn with_user_name(mut self, user_name: Option<UserName>) -> Self {
        self.user_name = user_name;
        self
    }

    /// Modifies a user to set whether it is an administrator.
    pub fn with_admin(mut self, admin: bool) -> Self {
        self.admin = admin;
        self
    }

    /// Gets the user's identifier.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Gets the user's display name, if any.
    pub fn user_name(&self) -> Option<&UserName> {
        self.user_name.as_ref()
    }

    /// Gets the user's email address.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Gets the user's hashed password.
    pub fn password(&self) -> &HashedPassword {
        &self.password
    }

    /// Returns true if the user is an administrator.
    pub fn admin(&self) -> bool {
        self.admin
    }

    /// Returns the role that this user holds.
    pub fn role(&self) -> Role {
        if self.admin { Role::Admin } else { Role::User }
    }
}

/// Untrusted user fields as received in create and update requests.
///
/// Every field is optional so that the same document serves full creations and partial updates.
/// An empty `userName` clears the display name.
#[derive(Debug, Default, Deserialize)]
#[cfg_attr(any(test, feature = "testutils"), derive(Clone, Serialize))]
#[serde(rename_all = "camelCase")]
pub struct UserFields {
    /// Display name.
    #[cfg_attr(any(test, feature = "testutils"), serde(skip_serializing_if = "Option::is_none"))]
    pub user_name: Option<String>,

    /// Email address.
    #[cfg_attr(any(test, feature = "testutils"), serde(skip_serializing_if = "Option::is_none"))]
    pub email: Option<String>,

    /// Password in the clear.
    #[cfg_attr(any(test, feature = "testutils"), serde(skip_serializing_if = "Option::is_none"))]
    pub password: Option<Password>,

    /// Administrator flag.
    #[cfg_attr(any(test, feature = "testutils"), serde(skip_serializing_if = "Option::is_none"))]
    pub admin: Option<bool>,
}

/// Validates a raw display name, treating the empty string as "no name".
fn parse_user_name(raw: String) -> ModelResult<Option<UserName>> {
    if raw.trim().is_empty() { Ok(None) } else { UserName::new(raw).map(Some) }
}

impl UserFields {
    /// Builds a new user with identifier `id` out of these fields.  The email and password are
    /// required and the password is hashed.
    pub fn into_new_user(self, id: UserId) -> ModelResult<User> {
        let email = match self.email {
            Some(email) => EmailAddress::new(email)?,
            None => return Err(ModelError("Email address is required".to_owned())),
        };
        let password = match self.password {
            Some(password) => password,
            None => return Err(ModelError("Password is required".to_owned())),
        };
        let user_name = match self.user_name {
            Some(raw) => parse_user_name(raw)?,
            None => None,
        };

        Ok(User::new(id, email, password.hash()?)
            .with_user_name(user_name)
            .with_admin(self.admin.unwrap_or(false)))
    }

    /// Merges these fields onto an existing `user`, validating every provided value.  A new
    /// password, if any, is hashed.
    pub fn apply_to(self, mut user: User) -> ModelResult<User> {
        if let Some(raw) = self.user_name {
            user.user_name = parse_user_name(raw)?;
        }
        if let Some(email) = self.email {
            user.email = EmailAddress::new(email)?;
        }
        if let Some(password) = self.password {
            user.password = password.hash()?;
        }
        if let Some(admin) = self.admin {
            user.admin = admin;
        }
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_parse_ok() {
        let id = UserId::generate();
        assert_eq!(id, UserId::parse(&id.to_string()).unwrap());
    }

    #[test]
    fn test_user_id_parse_error() {
        assert_eq!(ModelError("Invalid ID: abc".to_owned()), UserId::parse("abc").unwrap_err());
        assert_eq!(ModelError("Invalid ID: ".to_owned()), UserId::parse("").unwrap_err());
    }

    #[test]
    fn test_role_order() {
        assert!(Role::User < Role::Admin);
        let user = User::new(UserId::generate(), "a@x.com".into(), HashedPassword::new("h"));
        assert_eq!(Role::User, user.role());
        assert_eq!(Role::Admin, user.with_admin(true).role());
    }

    #[test]
    fn test_user_fields_deserialize_ignores_unknown() {
        let fields: UserFields = serde_json::from_str(
            r#"{"userName": "Alice", "email": "a@x.com", "password": "p", "extra": 3}"#,
        )
        .unwrap();
        assert_eq!(Some("Alice"), fields.user_name.as_deref());
        assert_eq!(Some("a@x.com"), fields.email.as_deref());
        assert_eq!(Some("p"), fields.password.as_ref().map(Password::as_str));
        assert_eq!(None, fields.admin);
    }

    #[test]
    fn test_user_fields_deserialize_bad_password() {
        assert!(serde_json::from_str::<UserFields>(r#"{"password": ""}"#).is_err());
    }

    #[test]
    fn test_into_new_user_ok() {
        let id = UserId::generate();
        let fields = UserFields {
            user_name: Some("  Alice ".to_owned()),
            email: Some("A@X.com".to_owned()),
            password: Some(Password::from("p")),
            admin: None,
        };
        let user = fields.into_new_user(id).unwrap();
        assert_eq!(&id, user.id());
        assert_eq!(Some("Alice"), user.user_name().map(UserName::as_str));
        assert_eq!("a@x.com", user.email().as_str());
        assert!(!user.admin());
        assert!(Password::from("p").verify(user.password()).unwrap());
    }

    #[test]
    fn test_into_new_user_missing_fields() {
        let fields = UserFields { password: Some(Password::from("p")), ..Default::default() };
        assert_eq!(
            ModelError("Email address is required".to_owned()),
            fields.into_new_user(UserId::generate()).unwrap_err()
        );

        let fields = UserFields { email: Some("a@x.com".to_owned()), ..Default::default() };
        assert_eq!(
            ModelError("Password is required".to_owned()),
            fields.into_new_user(UserId::generate()).unwrap_err()
        );
    }

    #[test]
    fn test_into_new_user_invalid_email() {
        let fields = UserFields {
            email: Some("not-an-email".to_owned()),
            password: Some(Password::from("p")),
            ..Default::default()
        };
        assert!(fields.into_new_user(UserId::generate()).is_err());
    }

    #[test]
    fn test_apply_to_partial() {
        let original = User::new(UserId::generate(), "a@x.com".into(), HashedPassword::new("h"))
            .with_user_name(Some("Alice".into()));

        let fields = UserFields { admin: Some(true), ..Default::default() };
        let updated = fields.apply_to(original.clone()).unwrap();
        assert_eq!(original.clone().with_admin(true), updated);

        let fields = UserFields { user_name: Some("".to_owned()), ..Default::default() };
        let updated = fields.apply_to(original.clone()).unwrap();
        assert_eq!(None, updated.user_name());

        let fields = UserFields { password: Some(Password::from("new")), ..Default::default() };
        let updated = fields.apply_to(original.clone()).unwrap();
        assert!(Password::from("new").verify(updated.password()).unwrap());
    }

    #[test]
    fn test_apply_to_revalidates() {
        let original = User::new(UserId::generate(), "a@x.com".into(), HashedPassword::new("h"));
        let fields = UserFields { email: Some("bad".to_owned()), ..Default::default() };
        assert!(fields.apply_to(original).is_err());
    }
}
