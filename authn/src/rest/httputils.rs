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

//! Utilities to deal with HTTP authorization.

use crate::model::SessionToken;
use eggshop_core::rest::{RestError, RestResult, get_unique_header};
use http::header::{AUTHORIZATION, HeaderMap};

/// Message returned when a request lacks usable credentials.
pub(crate) const NOT_SIGNED_IN_MESSAGE: &str =
    "You are not signed in; please log in to get access";

/// Builds the error returned for any problem with the `Authorization` header.
fn not_signed_in() -> RestError {
    RestError::Unauthorized(NOT_SIGNED_IN_MESSAGE.to_owned())
}

/// Checks if the request has an authorization header.
pub fn has_bearer_auth(headers: &HeaderMap) -> RestResult<bool> {
    match get_unique_header(headers, &AUTHORIZATION) {
        Ok(value) => Ok(value.is_some()),
        Err(_) => Err(not_signed_in()),
    }
}

/// Assumes that the `headers` contain a bearer session token and extracts it.
///
/// This does not validate the token in any way beyond ensuring it is present.
pub fn get_bearer_auth(headers: &HeaderMap) -> RestResult<SessionToken> {
    let authz = match get_unique_header(headers, &AUTHORIZATION) {
        Ok(Some(value)) => value,
        Ok(None) | Err(_) => return Err(not_signed_in()),
    };

    let authz = authz.to_str().map_err(|_| not_signed_in())?;

    match authz.split_once(' ') {
        Some(("Bearer", token)) if !token.trim().is_empty() => {
            Ok(SessionToken::new(token.trim()))
        }
        _ => Err(not_signed_in()),
    }
}
