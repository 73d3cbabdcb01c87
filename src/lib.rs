// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Student resource sharing client.
//!
//! Layers, bottom-up:
//! - [`models`]: serde-typed rows and pure helpers (tags, ratings, campus catalog).
//! - [`logic`]: query building, visibility filtering, upload/edit submission, reviews.
//! - [`backend`]: the hosted backend seam (REST and in-memory implementations).
//! - [`pages`] + [`mvu`]: page state machines and the root update function.
//! - [`runtime`]: background workers executing commands.

pub mod backend;
pub mod config;
pub mod logic;
pub mod models;
pub mod mvu;
pub mod pages;
pub mod runtime;
pub mod session;
pub mod utils;
