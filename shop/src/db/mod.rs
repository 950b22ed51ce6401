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

//! Database abstraction to manipulate the egg catalog.

use crate::model::{Egg, EggId};
#[cfg(feature = "postgres")]
use eggshop_core::db::postgres;
#[cfg(any(feature = "sqlite", test))]
use eggshop_core::db::sqlite;
use eggshop_core::db::{DbError, DbResult, Executor};
use sqlx::Row;
#[cfg(feature = "postgres")]
use sqlx::postgres::PgRow;
#[cfg(any(feature = "sqlite", test))]
use sqlx::sqlite::SqliteRow;


/// Initializes the database schema.
pub async fn init_schema(ex: &mut Executor) -> DbResult<()> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => postgres::run_schema(ex, include_str!("postgres.sql")).await,

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => sqlite::run_schema(ex, include_str!("sqlite.sql")).await,

        #[allow(unused)]
        _ => unreachable!(),
    }
}

#[cfg(feature = "postgres")]
impl TryFrom<PgRow> for Egg {
    type Error = DbError;

    fn try_from(row: PgRow) -> DbResult<Self> {
        let id: String = row.try_get("id").map_err(postgres::map_sqlx_error)?;
        let name: String = row.try_get("name").map_err(postgres::map_sqlx_error)?;
        let description: Option<String> =
            row.try_get("description").map_err(postgres::map_sqlx_error)?;
        let price: i64 = row.try_get("price").map_err(postgres::map_sqlx_error)?;
        let stock: i64 = row.try_get("stock").map_err(postgres::map_sqlx_error)?;

        Ok(Egg::new(EggId::parse(&id)?, name, description, price, stock))
    }
}

#[cfg(any(feature = "sqlite", test))]
impl TryFrom<SqliteRow> for Egg {
    type Error = DbError;

    fn try_from(row: SqliteRow) -> DbResult<Self> {
        let id: String = row.try_get("id").map_err(sqlite::map_sqlx_error)?;
        let name: String = row.try_get("name").map_err(sqlite::map_sqlx_error)?;
        let description: Option<String> =
            row.try_get("description").map_err(sqlite::map_sqlx_error)?;
        let price: i64 = row.try_get("price").map_err(sqlite::map_sqlx_error)?;
        let stock: i64 = row.try_get("stock").map_err(sqlite::map_sqlx_error)?;

        Ok(Egg::new(EggId::parse(&id)?, name, description, price, stock))
    }
}

/// Persists a new `egg`.
pub(crate) async fn create_egg(ex: &mut Executor, egg: &Egg) -> DbResult<()> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                INSERT INTO eggs (id, name, description, price, stock)
                VALUES ($1, $2, $3, $4, $5)";
            let done = sqlx::query(query_str)
                .bind(egg.id().to_string())
                .bind(egg.name())
                .bind(egg.description())
                .bind(egg.price())
                .bind(egg.stock())
                .execute(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            done.rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "
                INSERT INTO eggs (id, name, description, price, stock)
                VALUES (?, ?, ?, ?, ?)";
            let done = sqlx::query(query_str)
                .bind(egg.id().to_string())
                .bind(egg.name())
                .bind(egg.description())
                .bind(egg.price())
                .bind(egg.stock())
                .execute(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            done.rows_affected()
        }

        #[allow(unused)]
        _ => unreachable!(),
    };

    if rows_affected != 1 {
        return Err(DbError::BackendError("Insertion affected more than one row".to_owned()));
    }
    Ok(())
}

/// Gets all eggs sorted by name.
pub(crate) async fn get_eggs(ex: &mut Executor) -> DbResult<Vec<Egg>> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "SELECT * FROM eggs ORDER BY name, id";
            let rows = sqlx::query(query_str)
                .fetch_all(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            rows.into_iter().map(Egg::try_from).collect()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "SELECT * FROM eggs ORDER BY name, id";
            let rows = sqlx::query(query_str)
                .fetch_all(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            rows.into_iter().map(Egg::try_from).collect()
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Gets the egg identified by `id`.
pub(crate) async fn get_egg(ex: &mut Executor, id: EggId) -> DbResult<Egg> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "SELECT * FROM eggs WHERE id = $1";
            let raw_egg = sqlx::query(query_str)
                .bind(id.to_string())
                .fetch_one(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            Egg::try_from(raw_egg)
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "SELECT * FROM eggs WHERE id = ?";
            let raw_egg = sqlx::query(query_str)
                .bind(id.to_string())
                .fetch_one(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            Egg::try_from(raw_egg)
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Replaces the stored details of the egg with the same identifier as `egg`.
pub(crate) async fn update_egg(ex: &mut Executor, egg: &Egg) -> DbResult<()> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                UPDATE eggs SET name = $1, description = $2, price = $3, stock = $4
                WHERE id = $5";
            let done = sqlx::query(query_str)
                .bind(egg.name())
                .bind(egg.description())
                .bind(egg.price())
                .bind(egg.stock())
                .bind(egg.id().to_string())
                .execute(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            done.rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "
                UPDATE eggs SET name = ?, description = ?, price = ?, stock = ?
                WHERE id = ?";
            let done = sqlx::query(query_str)
                .bind(egg.name())
                .bind(egg.description())
                .bind(egg.price())
                .bind(egg.stock())
                .bind(egg.id().to_string())
                .execute(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            done.rows_affected()
        }

        #[allow(unused)]
        _ => unreachable!(),
    };

    match rows_affected {
        0 => Err(DbError::NotFound),
        1 => Ok(()),
        _ => Err(DbError::BackendError("Update affected more than one row".to_owned())),
    }
}

/// Deletes the egg identified by `id`.
pub(crate) async fn delete_egg(ex: &mut Executor, id: EggId) -> DbResult<()> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "DELETE FROM eggs WHERE id = $1";
            let done = sqlx::query(query_str)
                .bind(id.to_string())
                .execute(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            done.rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "DELETE FROM eggs WHERE id = ?";
            let done = sqlx::query(query_str)
                .bind(id.to_string())
                .execute(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            done.rows_affected()
        }

        #[allow(unused)]
        _ => unreachable!(),
    };

    match rows_affected {
        0 => Err(DbError::NotFound),
        1 => Ok(()),
        _ => Err(DbError::BackendError("Delete affected more than one row".to_owned())),
    }
}
