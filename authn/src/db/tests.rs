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

//! Common tests for any database implementation.

use crate::db::*;
use crate::model::{HashedPassword, User, UserId};
use eggshop_core::db::{Db, DbError};
use eggshop_core::model::{EmailAddress, UserName};

/// Syntactic sugar to create a non-admin user given only its email address.
async fn create_simple_user(ex: &mut Executor, email: &'static str) -> User {
    let user = User::new(UserId::generate(), EmailAddress::from(email), HashedPassword::new("h"));
    create_user(ex, &user).await.unwrap();
    user
}

async fn test_users_create_and_get(db: Box<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    let user = User::new(UserId::generate(), EmailAddress::from("a@x.com"), HashedPassword::new("h"))
        .with_user_name(Some(UserName::from("Alice")))
        .with_admin(true);
    create_user(&mut ex, &user).await.unwrap();

    assert_eq!(user, get_user_by_id(&mut ex, user.id()).await.unwrap());
    assert_eq!(user, get_user_by_email(&mut ex, user.email()).await.unwrap());
}

async fn test_users_create_duplicate_email(db: Box<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    create_simple_user(&mut ex, "a@x.com").await;
    let other = User::new(UserId::generate(), EmailAddress::from("a@x.com"), HashedPassword::new("h"));
    assert_eq!(DbError::AlreadyExists, create_user(&mut ex, &other).await.unwrap_err());
}

async fn test_users_abort_creation_and_not_found(db: Box<dyn Db + Send + Sync>) {
    let id = {
        let mut tx = db.begin().await.unwrap();
        let user = create_simple_user(tx.ex(), "a@x.com").await;
        *user.id()
    };

    let mut ex = db.ex().await.unwrap();
    assert_eq!(DbError::NotFound, get_user_by_id(&mut ex, &id).await.unwrap_err());
    assert_eq!(
        DbError::NotFound,
        get_user_by_email(&mut ex, &EmailAddress::from("a@x.com")).await.unwrap_err()
    );
}

async fn test_users_get_all_sorted(db: Box<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    assert!(get_users(&mut ex).await.unwrap().is_empty());

    let user2 = create_simple_user(&mut ex, "b@x.com").await;
    let user3 = create_simple_user(&mut ex, "c@x.com").await;
    let user1 = create_simple_user(&mut ex, "a@x.com").await;

    assert_eq!(vec![user1, user2, user3], get_users(&mut ex).await.unwrap());
}

async fn test_users_corrupted_email(db: Box<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    let user = User::new(
        UserId::generate(),
        EmailAddress::new_invalid("not-an-email"),
        HashedPassword::new("h"),
    );
    create_user(&mut ex, &user).await.unwrap();

    match get_user_by_id(&mut ex, user.id()).await {
        Err(DbError::DataIntegrityError(e)) => assert!(e.contains("valid address")),
        e => panic!("{:?}", e),
    }
}

async fn test_users_update_ok(db: Box<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    let user = create_simple_user(&mut ex, "a@x.com").await;
    let other = create_simple_user(&mut ex, "b@x.com").await;

    let updated = user.clone().with_user_name(Some(UserName::from("New name"))).with_admin(true);
    update_user(&mut ex, &updated).await.unwrap();

    assert_eq!(updated, get_user_by_id(&mut ex, user.id()).await.unwrap());
    assert_eq!(other, get_user_by_id(&mut ex, other.id()).await.unwrap());
}

async fn test_users_update_not_found(db: Box<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    let user = User::new(UserId::generate(), EmailAddress::from("a@x.com"), HashedPassword::new("h"));
    assert_eq!(DbError::NotFound, update_user(&mut ex, &user).await.unwrap_err());
}

async fn test_users_delete_ok(db: Box<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    let user1 = create_simple_user(&mut ex, "a@x.com").await;
    let user2 = create_simple_user(&mut ex, "b@x.com").await;

    delete_user(&mut ex, user1.id()).await.unwrap();
    assert_eq!(DbError::NotFound, get_user_by_id(&mut ex, user1.id()).await.unwrap_err());
    assert_eq!(vec![user2], get_users(&mut ex).await.unwrap());
}

async fn test_users_delete_not_found(db: Box<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    assert_eq!(DbError::NotFound, delete_user(&mut ex, &UserId::generate()).await.unwrap_err());
}

macro_rules! generate_db_tests [
    ( $setup:expr $(, #[$extra:meta] )? ) => {
        eggshop_core::db::testutils::generate_tests!(
            $(#[$extra],)?
            $setup,
            $crate::db::tests,
            test_users_create_and_get,
            test_users_create_duplicate_email,
            test_users_abort_creation_and_not_found,
            test_users_get_all_sorted,
            test_users_corrupted_email,
            test_users_update_ok,
            test_users_update_not_found,
            test_users_delete_ok,
            test_users_delete_not_found
        );
    }
];

mod sqlite {
    use super::*;
    use eggshop_core::db::sqlite::testutils::setup;

    async fn setup_with_schema() -> Box<dyn Db + Send + Sync> {
        let db = setup().await;
        init_schema(&mut db.ex().await.unwrap()).await.unwrap();
        Box::new(db)
    }

    generate_db_tests!(setup_with_schema().await);
}

#[cfg(feature = "postgres")]
mod postgres {
    use super::*;
    use eggshop_core::db::postgres::testutils::setup;

    async fn setup_with_schema() -> Box<dyn Db + Send + Sync> {
        let db = setup().await;
        init_schema(&mut db.ex().await.unwrap()).await.unwrap();
        Box::new(db)
    }

    generate_db_tests!(
        setup_with_schema().await,
        #[ignore = "Requires environment configuration and is expensive"]
    );
}
