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

//! Issuance and verification of session tokens.

use crate::driver::{EXPIRED_TOKEN_MESSAGE, INVALID_TOKEN_MESSAGE};
use crate::model::{Claims, SessionToken, User};
use eggshop_core::driver::{DriverError, DriverResult};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::time::Duration;
use time::OffsetDateTime;

/// Signs and verifies session tokens with a shared secret.
pub(crate) struct TokenSigner {
    /// Key to sign new tokens with.
    encoding_key: EncodingKey,

    /// Key to verify incoming tokens with.
    decoding_key: DecodingKey,

    /// Rules to validate incoming tokens.  Expiration is not part of these rules because it is
    /// checked against the injected clock.
    validation: Validation,

    /// How long tokens remain valid after issuance.
    max_age: Duration,
}

impl TokenSigner {
    /// Creates a new signer for `secret` that issues tokens valid for `max_age`.
    pub(crate) fn new(secret: &str, max_age: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            max_age,
        }
    }

    /// Issues a new token for `user` at time `now`.
    pub(crate) fn issue(&self, user: &User, now: OffsetDateTime) -> DriverResult<SessionToken> {
        let iat = now.unix_timestamp();
        let max_age = i64::try_from(self.max_age.as_secs()).unwrap_or(i64::MAX);
        let claims = Claims {
            sub: user.id().to_string(),
            name: user.user_name().map(|n| n.as_str().to_owned()),
            iat,
            exp: iat.saturating_add(max_age),
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map(SessionToken::new)
            .map_err(|e| DriverError::BackendError(format!("Cannot sign token: {}", e)))
    }

    /// Verifies the signature and expiration of `token` at time `now` and returns its claims.
    pub(crate) fn verify(&self, token: &SessionToken, now: OffsetDateTime) -> DriverResult<Claims> {
        let data = jsonwebtoken::decode::<Claims>(
            token.as_str(),
            &self.decoding_key,
            &self.validation,
        )
        .map_err(|_| DriverError::Unauthorized(INVALID_TOKEN_MESSAGE.to_owned()))?;

        if data.claims.exp <= now.unix_timestamp() {
            return Err(DriverError::Unauthorized(EXPIRED_TOKEN_MESSAGE.to_owned()));
        }
        Ok(data.claims)
    }
}
