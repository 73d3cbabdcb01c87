// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Seam to the hosted backend: tables, object storage, remote procedures and auth.
//!
//! [`rest::RestBackend`] talks to the real service; [`memory::MemoryBackend`]
//! keeps everything in process for tests and offline runs.

pub mod memory;
pub mod rest;

use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

use crate::logic::query::ResourceQuery;
use crate::models::resource::{NewResource, Resource, ResourcePatch};
use crate::models::review::{NewReview, Review};
use crate::models::user::{ProfileMetadata, UserProfile};

/// Failures surfaced by backend calls.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider returned an error response; `message` is the provider's text.
    #[error("{message}")]
    Remote { status: u16, message: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    PermissionDenied(String),

    /// Request rejected before reaching the backend.
    #[error("{0}")]
    Invalid(String),

    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid backend address: {0}")]
    Url(#[from] url::ParseError),
}

impl BackendError {
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, BackendError::PermissionDenied(_))
    }
}

pub type BackendResult<T> = Result<T, BackendError>;

/// Identity returned by the auth provider.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
}

/// Tokens plus identity handed out by a successful sign-in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthGrant {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub user: AuthUser,
}

/// Operations the client consumes from the hosted backend.
///
/// Read calls take an optional access token and fall back to anonymous access.
pub trait Backend: Send + Sync {
    fn sign_in(&self, email: &str, password: &str) -> BackendResult<AuthGrant>;

    /// Register an account. Returns `None` when the provider requires email confirmation first.
    fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: &ProfileMetadata,
    ) -> BackendResult<Option<AuthGrant>>;

    fn sign_out(&self, token: &str) -> BackendResult<()>;

    /// Resolve an access token to the account it belongs to.
    fn current_user(&self, token: &str) -> BackendResult<AuthUser>;

    fn fetch_profile(&self, token: &str, user_id: Uuid) -> BackendResult<Option<UserProfile>>;

    /// Rows matching every predicate of the query, in the query's order.
    fn select_resources(
        &self,
        token: Option<&str>,
        query: &ResourceQuery,
    ) -> BackendResult<Vec<Resource>>;

    fn insert_resource(&self, token: &str, row: &NewResource) -> BackendResult<Resource>;

    /// Update the row with `id` uploaded by `owner`. Returns the number of rows changed.
    fn update_resource(
        &self,
        token: &str,
        id: Uuid,
        owner: Uuid,
        patch: &ResourcePatch,
    ) -> BackendResult<usize>;

    /// Reviews of a resource, newest first.
    fn select_reviews(&self, token: Option<&str>, resource_id: Uuid) -> BackendResult<Vec<Review>>;

    fn insert_review(&self, token: &str, review: &NewReview) -> BackendResult<Review>;

    fn upload_object(
        &self,
        token: &str,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> BackendResult<()>;

    fn public_url(&self, bucket: &str, path: &str) -> BackendResult<String>;

    /// Download the bytes behind a public file URL.
    fn fetch_object(&self, url: &str) -> BackendResult<Vec<u8>>;

    fn increment_download_count(&self, token: Option<&str>, resource_id: Uuid)
    -> BackendResult<()>;

    fn increment_points(&self, token: &str, user_id: Uuid, amount: i64) -> BackendResult<()>;
}
