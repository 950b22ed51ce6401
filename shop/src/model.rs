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

//! High-level data types.

use derive_getters::Getters;
use derive_more::Constructor;
use eggshop_core::model::{ModelError, ModelResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Maximum number of characters in an egg name.
const MAX_NAME_LENGTH: usize = 100;

/// Maximum number of characters in an egg description.
const MAX_DESCRIPTION_LENGTH: usize = 2000;

/// Identifier of an egg in the catalog.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub(crate) struct EggId(Uuid);

impl EggId {
    /// Generates a new random identifier.
    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parses an identifier from untrusted input such as a URL path segment.
    pub(crate) fn parse(s: &str) -> ModelResult<Self> {
        Uuid::parse_str(s).map(Self).map_err(|_| ModelError(format!("Invalid ID: {}", s)))
    }
}

impl fmt::Display for EggId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// An egg offered by the shop.
#[derive(Clone, Constructor, Debug, Getters, PartialEq, Serialize)]
#[cfg_attr(test, derive(Deserialize))]
pub(crate) struct Egg {
    /// Identifier of the egg.
    id: EggId,

    /// Display name of the egg.
    name: String,

    /// Free-form description of the egg.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,

    /// Price in the shop's minor currency unit.
    price: i64,

    /// Number of units available.
    stock: i64,
}

/// Validates an egg name.
fn validate_name(name: String) -> ModelResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ModelError("Egg name cannot be empty".to_owned()));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(ModelError(format!(
            "Egg name cannot be longer than {} characters",
            MAX_NAME_LENGTH
        )));
    }
    Ok(name.to_owned())
}

/// Validates an egg description.  An empty description means no description.
fn validate_description(description: String) -> ModelResult<Option<String>> {
    if description.trim().is_empty() {
        return Ok(None);
    }
    if description.chars().count() > MAX_DESCRIPTION_LENGTH {
        return Err(ModelError(format!(
            "Egg description cannot be longer than {} characters",
            MAX_DESCRIPTION_LENGTH
        )));
    }
    Ok(Some(description))
}

/// Validates a quantity that cannot be negative, such as a price or a stock count.
fn validate_non_negative(what: &str, value: i64) -> ModelResult<i64> {
    if value < 0 {
        return Err(ModelError(format!("Egg {} cannot be negative", what)));
    }
    Ok(value)
}

/// Untrusted egg fields as received in create and update requests.
///
/// Every field is optional so that the same document serves full creations and partial updates.
#[derive(Debug, Default, Deserialize)]
#[cfg_attr(test, derive(Serialize))]
pub(crate) struct EggFields {
    /// Display name.
    #[cfg_attr(test, serde(skip_serializing_if = "Option::is_none"))]
    pub(crate) name: Option<String>,

    /// Free-form description.
    #[cfg_attr(test, serde(skip_serializing_if = "Option::is_none"))]
    pub(crate) description: Option<String>,

    /// Price in the shop's minor currency unit.
    #[cfg_attr(test, serde(skip_serializing_if = "Option::is_none"))]
    pub(crate) price: Option<i64>,

    /// Number of units available.
    #[cfg_attr(test, serde(skip_serializing_if = "Option::is_none"))]
    pub(crate) stock: Option<i64>,
}

impl EggFields {
    /// Builds a new egg with identifier `id` out of these fields.  The name and the price are
    /// required and the stock defaults to zero.
    pub(crate) fn into_new_egg(self, id: EggId) -> ModelResult<Egg> {
        let name = match self.name {
            Some(name) => validate_name(name)?,
            None => return Err(ModelError("Egg name is required".to_owned())),
        };
        let price = match self.price {
            Some(price) => validate_non_negative("price", price)?,
            None => return Err(ModelError("Egg price is required".to_owned())),
        };
        let description = match self.description {
            Some(description) => validate_description(description)?,
            None => None,
        };
        let stock = validate_non_negative("stock", self.stock.unwrap_or(0))?;
        Ok(Egg::new(id, name, description, price, stock))
    }

    /// Merges these fields onto an existing `egg`, validating every provided value.
    pub(crate) fn apply_to(self, mut egg: Egg) -> ModelResult<Egg> {
        if let Some(name) = self.name {
            egg.name = validate_name(name)?;
        }
        if let Some(description) = self.description {
            egg.description = validate_description(description)?;
        }
        if let Some(price) = self.price {
            egg.price = validate_non_negative("price", price)?;
        }
        if let Some(stock) = self.stock {
            egg.stock = validate_non_negative("stock", stock)?;
        }
        Ok(egg)
    }
}
