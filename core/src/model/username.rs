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

//! The `UserName` data type.

use crate::model::{ModelError, ModelResult};
use serde::{Deserialize, Serialize, de::Visitor};

/// Maximum length of a user name as specified in the schema.
pub(crate) const MAX_USER_NAME_LENGTH: usize = 64;

/// Represents the human-friendly name of a user, as shown in greetings and session tokens.
///
/// Names are free-form so that they can hold real names like "Jana Nováková", but they are
/// trimmed and cannot contain control characters.
#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct UserName(String);

impl UserName {
    /// Creates a new user name from an untrusted string `s`, making sure it is valid.
    pub fn new<S: Into<String>>(s: S) -> ModelResult<Self> {
        let s = s.into();
        let s = s.trim();

        if s.is_empty() {
            return Err(ModelError("User name cannot be empty".to_owned()));
        }
        if s.chars().count() > MAX_USER_NAME_LENGTH {
            return Err(ModelError("User name is too long".to_owned()));
        }
        if let Some(ch) = s.chars().find(|ch| ch.is_control()) {
            return Err(ModelError(format!(
                "Unsupported character {:?} in user name '{}'",
                ch,
                s.escape_debug()
            )));
        }

        Ok(Self(s.to_owned()))
    }

    /// Creates a new user name from an untrusted string `s`, without validation.  Useful for
    /// testing purposes only.
    #[cfg(any(test, feature = "testutils"))]
    pub fn new_invalid<S: Into<String>>(s: S) -> Self {
        Self(s.into())
    }

    /// Returns a string view of the user name.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

#[cfg(any(test, feature = "testutils"))]
impl From<&'static str> for UserName {
    /// Creates a new user name from a hardcoded string, which must be valid.
    fn from(name: &'static str) -> Self {
        UserName::new(name).expect("Hardcoded user names must be valid")
    }
}

/// A deserialization visitor for a `UserName`.
struct UserNameVisitor;

impl Visitor<'_> for UserNameVisitor {
    type Value = UserName;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a string")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        UserName::new(v).map_err(|e| E::custom(e.to_string()))
    }
}

impl<'de> Deserialize<'de> for UserName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_str(UserNameVisitor)
    }
}
