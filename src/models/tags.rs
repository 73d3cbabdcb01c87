// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Tag list parsing for the upload form.

/// Tags as stored on a resource, in entry order.
///
/// Parsing only splits and trims; duplicates and casing are kept as typed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Tags {
    items: Vec<String>,
}

impl Tags {
    /// Split comma-separated input, trimming each piece and dropping empty ones.
    pub fn parse(raw: &str) -> Self {
        let items = raw
            .split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(str::to_string)
            .collect();
        Self { items }
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<String> {
        self.items
    }
}
