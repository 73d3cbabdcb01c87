// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Shared helper utilities reused by the logic layer and page models.

pub mod mime;
pub mod sanitize_component;

/// Guess a content type from a file name.
pub use mime::guess_mime;
/// Sanitize user-provided strings into safe path components.
pub use sanitize_component::sanitize_component;
