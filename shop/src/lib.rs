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

//! REST service for an egg shop: a catalog of eggs plus the user accounts that manage it.

// Keep these in sync with other top-level files.
#![warn(anonymous_parameters, bad_style, clippy::missing_docs_in_private_items, missing_docs)]
#![warn(unused, unused_extern_crates, unused_import_braces, unused_qualifications)]
#![warn(unsafe_code)]

use axum::Router;
use eggshop_authn::driver::policy::USERS_ACCESS_POLICY;
use eggshop_authn::driver::{AuthnDriver, AuthnOptions};
use eggshop_core::clocks::SystemClock;
use eggshop_core::db::Db;
use eggshop_core::env::get_optional_var;
use eggshop_core::rest::{method_not_allowed, panic_response, route_not_found};
use log::info;
use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;

pub mod db;
mod driver;
use driver::Driver;
pub(crate) mod model;
mod rest;

/// Default address to listen on when none is configured.
const DEFAULT_BIND_ADDR: ([u8; 4], u16) = ([0, 0, 0, 0], 3000);

/// Configuration options for the HTTP server.
#[derive(Debug)]
#[cfg_attr(test, derive(PartialEq))]
pub struct ServerOptions {
    /// Address and port to listen on.
    pub bind_addr: SocketAddr,
}

impl ServerOptions {
    /// Creates a new set of options from environment variables whose name is prefixed with the
    /// given `prefix`.
    ///
    /// This will use variables such as `<prefix>_BIND_ADDR`.
    pub fn from_env(prefix: &str) -> Result<ServerOptions, String> {
        let bind_addr = match get_optional_var::<SocketAddr>(prefix, "BIND_ADDR")? {
            Some(bind_addr) => bind_addr,
            None => SocketAddr::from(DEFAULT_BIND_ADDR),
        };
        Ok(ServerOptions { bind_addr })
    }
}

/// Composes the routers of all resources into the full application.
pub(crate) fn app(driver: Driver, authn_driver: AuthnDriver) -> Router {
    rest::app(driver)
        .merge(eggshop_authn::rest::app(authn_driver))
        .fallback(route_not_found)
        .layer(axum::middleware::map_response(method_not_allowed))
        .layer(CatchPanicLayer::custom(panic_response))
}

/// Instantiates all resources to serve the application with the given options.
///
/// The `db` must have been initialized with the schemas of all resources.  While it'd be nice to
/// push this responsibility to `main`, doing so would force us to expose many crate-internal types
/// to the public, which in turn would make dead code detection harder.
pub async fn serve(
    server_opts: ServerOptions,
    db: Arc<dyn Db + Send + Sync>,
    authn_opts: AuthnOptions,
) -> Result<(), Box<dyn Error>> {
    let clock = Arc::from(SystemClock::default());
    let authn_driver = AuthnDriver::new(db.clone(), clock, &USERS_ACCESS_POLICY, authn_opts);
    authn_driver.clone().bootstrap_admin().await?;

    let driver = Driver::new(db);
    let app = app(driver, authn_driver);

    let listener = tokio::net::TcpListener::bind(server_opts.bind_addr).await?;
    info!("Listening on {}", server_opts.bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::{EggData, EggsData};
    use eggshop_authn::driver::testutils::{
        TestContext as AuthnTestContext, test_options as authn_test_options,
    };
    use eggshop_authn::rest::UserData;
    use eggshop_authn::rest::testutils::do_test_login;
    use eggshop_core::rest::SuccessResponse;
    use eggshop_core::rest::testutils::*;
    use http::{Method, StatusCode};
    use serde_json::json;

    /// State of a running test of the full application.
    struct TestContext {
        /// Context of the users side of the application, sharing the database with the eggs.
        authn: AuthnTestContext,

        /// The app under test.
        app: Router,
    }

    impl TestContext {
        async fn setup() -> Self {
            let db: Arc<dyn Db + Send + Sync> =
                Arc::from(eggshop_core::db::sqlite::testutils::setup().await);
            db::init_schema(&mut db.ex().await.unwrap()).await.unwrap();
            let authn = AuthnTestContext::setup_with(authn_test_options(), db.clone()).await;
            let app = app(Driver::new(db), authn.driver());
            Self { authn, app }
        }

        fn app(&self) -> Router {
            self.app.clone()
        }
    }

    #[test]
    fn test_server_options_from_env_all_present() {
        let overrides = [("EGGSHOP_BIND_ADDR", Some("127.0.0.1:8080"))];
        temp_env::with_vars(overrides, || {
            let opts = ServerOptions::from_env("EGGSHOP").unwrap();
            assert_eq!(ServerOptions { bind_addr: "127.0.0.1:8080".parse().unwrap() }, opts);
        });
    }

    #[test]
    fn test_server_options_from_env_default() {
        temp_env::with_vars([("EGGSHOP_BIND_ADDR", None::<&str>)], || {
            let opts = ServerOptions::from_env("EGGSHOP").unwrap();
            assert_eq!(3000, opts.bind_addr.port());
            assert!(opts.bind_addr.ip().is_unspecified());
        });
    }

    #[test]
    fn test_server_options_from_env_bad_addr() {
        temp_env::with_vars([("EGGSHOP_BIND_ADDR", Some("localhost"))], || {
            let err = ServerOptions::from_env("EGGSHOP").unwrap_err();
            assert!(err.contains("Invalid type in environment variable EGGSHOP_BIND_ADDR"));
        });
    }

    #[tokio::test]
    async fn test_e2e_users_and_eggs() {
        let context = TestContext::setup().await;

        let response = OneShotBuilder::new(context.app(), (Method::POST, "/api/v1/users"))
            .send_json(json!({"email": "a@x.com", "password": "p"}))
            .await
            .expect_status(StatusCode::CREATED)
            .expect_json::<SuccessResponse<UserData>>()
            .await;
        let user_id = response.data.user.id;

        let token = do_test_login(context.app(), "a@x.com", "p").await;

        let response = OneShotBuilder::new(
            context.app(),
            (Method::GET, format!("/api/v1/users/info/{}", user_id)),
        )
        .with_bearer_auth(token.as_str())
        .send_empty()
        .await
        .expect_json::<SuccessResponse<UserData>>()
        .await;
        assert_eq!("a@x.com", response.data.user.email);

        OneShotBuilder::new(context.app(), (Method::DELETE, format!("/api/v1/users/{}", user_id)))
            .with_bearer_auth(token.as_str())
            .send_empty()
            .await
            .expect_status(StatusCode::UNAUTHORIZED)
            .expect_error("You are not an admin")
            .await;

        let response = OneShotBuilder::new(context.app(), (Method::POST, "/api/v1/eggs"))
            .send_json(json!({"name": "Quail", "price": 5}))
            .await
            .expect_status(StatusCode::CREATED)
            .expect_json::<SuccessResponse<EggData>>()
            .await;
        let egg = response.data.egg;

        let response = OneShotBuilder::new(context.app(), (Method::GET, "/api/v1/eggs"))
            .send_empty()
            .await
            .expect_json::<SuccessResponse<EggsData>>()
            .await;
        assert_eq!(SuccessResponse::with_results(EggsData { eggs: vec![egg.clone()] }, 1), response);

        OneShotBuilder::new(context.app(), (Method::DELETE, format!("/api/v1/eggs/{}", egg.id())))
            .send_empty()
            .await
            .expect_status(StatusCode::NO_CONTENT)
            .expect_empty()
            .await;

        OneShotBuilder::new(context.app(), (Method::GET, format!("/api/v1/eggs/{}", egg.id())))
            .send_empty()
            .await
            .expect_status(StatusCode::NOT_FOUND)
            .expect_error("Položka pro specifikované ID nebyla nalezena")
            .await;
    }

    #[tokio::test]
    async fn test_admin_manages_users() {
        let context = TestContext::setup().await;
        context.authn.create_user("root@x.com", "secret", true).await;
        let user = context.authn.create_user("a@x.com", "p", false).await;

        let token = do_test_login(context.app(), "root@x.com", "secret").await;

        OneShotBuilder::new(context.app(), (Method::DELETE, format!("/api/v1/users/{}", user.id())))
            .with_bearer_auth(token.as_str())
            .send_empty()
            .await
            .expect_status(StatusCode::NO_CONTENT)
            .expect_empty()
            .await;
    }

    #[tokio::test]
    async fn test_method_not_allowed() {
        let context = TestContext::setup().await;

        for (method, path) in [
            (Method::PUT, "/api/v1/eggs"),
            (Method::GET, "/api/v1/users"),
            (Method::PATCH, "/api/v1/users/login"),
        ] {
            OneShotBuilder::new(context.app(), (method.clone(), path))
                .send_empty()
                .await
                .expect_status(StatusCode::METHOD_NOT_ALLOWED)
                .expect_error(&format!("Cannot {} {} on this server", method, path))
                .await;
        }
    }

    #[tokio::test]
    async fn test_route_not_found() {
        let context = TestContext::setup().await;

        OneShotBuilder::new(context.app(), (Method::GET, "/api/v1/chickens"))
            .send_empty()
            .await
            .expect_status(StatusCode::NOT_FOUND)
            .expect_error("Cannot find /api/v1/chickens on this server")
            .await;
    }
}
