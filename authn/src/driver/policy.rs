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

//! Declarative table of the roles required to access protected routes.

use crate::model::Role;
use http::Method;

/// Role required to invoke `method` on the route `path`.
#[derive(Debug)]
pub struct AccessRule {
    /// Name of the HTTP method, in uppercase.
    pub method: &'static str,

    /// Route pattern as registered in the router, such as `/api/v1/users/:id`.
    pub path: &'static str,

    /// Minimum role that the caller must hold.
    pub role: Role,
}

/// Collection of access rules.  Routes not listed require `Role::User`.
#[derive(Debug)]
pub struct AccessPolicy(pub &'static [AccessRule]);

impl AccessPolicy {
    /// Returns the role needed to invoke `method` on the route pattern `path`.
    pub fn required_role(&self, method: &Method, path: &str) -> Role {
        self.0
            .iter()
            .find(|rule| rule.method == method.as_str() && rule.path == path)
            .map(|rule| rule.role)
            .unwrap_or(Role::User)
    }
}

/// Access policy for the users API.
pub static USERS_ACCESS_POLICY: AccessPolicy = AccessPolicy(&[
    AccessRule { method: "POST", path: "/api/v1/users", role: Role::Admin },
    AccessRule { method: "PATCH", path: "/api/v1/users/:id", role: Role::Admin },
    AccessRule { method: "DELETE", path: "/api/v1/users/:id", role: Role::Admin },
]);
