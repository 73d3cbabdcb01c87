// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Domain layer: pure data types and validation helpers shared between pages and backend calls.

pub mod catalog;
pub mod resource;
pub mod review;
pub mod tags;
pub mod user;

use serde::{Deserialize, Deserializer};

/// Deserialize a nullable column into its default value.
///
/// Rows coming back from the hosted tables may carry `null` for optional text
/// columns; the client treats those the same as missing ones.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
