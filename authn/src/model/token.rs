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

//! Session tokens issued on login.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque session token handed out to clients, protecting it from leaking into logs.
#[derive(Clone, Deserialize, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    /// Wraps an already-encoded token.
    pub fn new<S: Into<String>>(s: S) -> Self {
        Self(s.into())
    }

    /// Returns a string view of the token.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("scrubbed token")
    }
}

/// Claims carried by a session token.
#[derive(Debug, Deserialize, PartialEq, Serialize)]
pub struct Claims {
    /// Identifier of the user the token belongs to.
    pub sub: String,

    /// Display name of the user at the time the token was issued.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Issue time, in seconds since the epoch.
    pub iat: i64,

    /// Expiration time, in seconds since the epoch.
    pub exp: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_test::{Token, assert_tokens};

    #[test]
    fn test_session_token_ser_de() {
        assert_tokens(&SessionToken::new("abc.def.ghi"), &[Token::Str("abc.def.ghi")]);
    }

    #[test]
    fn test_session_token_debug_is_scrubbed() {
        assert_eq!("scrubbed token", format!("{:?}", SessionToken::new("abc")));
    }

    #[test]
    fn test_claims_without_name() {
        let claims = Claims { sub: "id".to_owned(), name: None, iat: 10, exp: 20 };
        assert_tokens(
            &claims,
            &[
                Token::Struct { name: "Claims", len: 3 },
                Token::Str("sub"),
                Token::Str("id"),
                Token::Str("iat"),
                Token::I64(10),
                Token::Str("exp"),
                Token::I64(20),
                Token::StructEnd,
            ],
        );
    }
}
