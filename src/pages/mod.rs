// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Page-level MVU components. Each page owns its local state (form fields,
//! loading flag, error banner) and exposes `update` plus its own message and
//! command types; the root kernel in [`crate::mvu`] routes between them.

pub mod auth;
pub mod resource_detail;
pub mod resource_list;
pub mod upload;

use std::time::Duration;

use uuid::Uuid;

use crate::backend::BackendError;

/// Delay before navigating away after a success or permission error.
pub const REDIRECT_DELAY: Duration = Duration::from_secs(2);

/// Client-side routes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    Home,
    Login,
    Register,
    Resources,
    Resource(Uuid),
    Upload,
    Edit(Uuid),
    Profile,
}

impl Route {
    /// Routes that need a signed-in user.
    pub fn requires_session(&self) -> bool {
        matches!(self, Route::Upload | Route::Edit(_) | Route::Profile)
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".into(),
            Route::Login => "/login".into(),
            Route::Register => "/register".into(),
            Route::Resources => "/resources".into(),
            Route::Resource(id) => format!("/resource/{id}"),
            Route::Upload => "/upload".into(),
            Route::Edit(id) => format!("/edit/{id}"),
            Route::Profile => "/profile".into(),
        }
    }
}

/// User-facing feedback surfaced to the status line or error banner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageEvent {
    /// Text shown to the user.
    pub message: String,
    /// Whether the message represents an error.
    pub is_error: bool,
}

impl PageEvent {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_error: false,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_error: true,
        }
    }
}

/// A failed command, reduced to what a page needs to show.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Failure {
    pub message: String,
    pub permission_denied: bool,
}

impl Failure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            permission_denied: false,
        }
    }
}

impl From<BackendError> for Failure {
    fn from(err: BackendError) -> Self {
        Self {
            permission_denied: err.is_permission_denied(),
            message: err.to_string(),
        }
    }
}

impl From<anyhow::Error> for Failure {
    fn from(err: anyhow::Error) -> Self {
        Self::new(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protected_routes() {
        assert!(Route::Upload.requires_session());
        assert!(Route::Edit(Uuid::nil()).requires_session());
        assert!(Route::Profile.requires_session());
        assert!(!Route::Resources.requires_session());
        assert!(!Route::Resource(Uuid::nil()).requires_session());
    }

    #[test]
    fn failures_remember_permission_errors() {
        let denied = Failure::from(BackendError::PermissionDenied("nope".into()));
        assert!(denied.permission_denied);
        assert_eq!(denied.message, "nope");

        let remote = Failure::from(BackendError::Remote {
            status: 500,
            message: "boom".into(),
        });
        assert!(!remote.permission_denied);
        assert_eq!(remote.message, "boom");
    }
}
