// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Business logic sitting between the page models and the backend.

pub mod detail;
pub mod listing;
pub mod query;
pub mod submission;
pub mod visibility;
