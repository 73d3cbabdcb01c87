// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Resource detail: the row, its reviews, new reviews, and downloads.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, warn};
use url::Url;
use uuid::Uuid;

use crate::backend::{Backend, BackendError, BackendResult};
use crate::logic::query::ResourceQuery;
use crate::models::resource::Resource;
use crate::models::review::{NewReview, Review, validate_rating};
use crate::session::Session;
use crate::utils::sanitize_component;

/// A resource together with its reviews, newest first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceDetail {
    pub resource: Resource,
    pub reviews: Vec<Review>,
}

/// Fetch a resource with its uploader join, then its reviews.
///
/// Review failures (including a missing reviews table) degrade to an empty list.
pub fn load_detail(
    backend: &dyn Backend,
    token: Option<&str>,
    id: Uuid,
) -> BackendResult<ResourceDetail> {
    let resource = backend
        .select_resources(token, &ResourceQuery::by_id(id))?
        .into_iter()
        .next()
        .ok_or_else(|| BackendError::NotFound(format!("resource {id}")))?;
    let reviews = load_reviews(backend, token, id);
    Ok(ResourceDetail { resource, reviews })
}

/// Reviews of a resource, or an empty list when they cannot be loaded.
pub fn load_reviews(backend: &dyn Backend, token: Option<&str>, resource_id: Uuid) -> Vec<Review> {
    backend
        .select_reviews(token, resource_id)
        .unwrap_or_else(|err| {
            warn!(resource = %resource_id, %err, "reviews unavailable, showing none");
            Vec::new()
        })
}

/// Fetch a single row with its uploader join, as the edit form does.
pub fn load_resource(backend: &dyn Backend, session: &Session, id: Uuid) -> BackendResult<Resource> {
    backend
        .select_resources(Some(session.access_token()), &ResourceQuery::by_id(id))?
        .into_iter()
        .next()
        .ok_or_else(|| BackendError::NotFound(format!("resource {id}")))
}

/// Post a review from the signed-in user.
pub fn submit_review(
    backend: &dyn Backend,
    session: &Session,
    resource_id: Uuid,
    rating: u8,
    comment: &str,
) -> BackendResult<Review> {
    let rating = validate_rating(rating).map_err(|e| BackendError::Invalid(e.to_string()))?;
    let review = NewReview {
        resource_id,
        user_id: session.user_id(),
        rating,
        comment: comment.trim().to_string(),
    };
    let created = backend.insert_review(session.access_token(), &review)?;
    info!(resource = %resource_id, rating, "review posted");
    Ok(created)
}

/// Where a download ended up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DownloadOutcome {
    Saved(PathBuf),
    /// Fetching failed, so the URL was handed to the system opener instead.
    OpenedExternally { url: String, reason: String },
}

/// Local file name for a download: the sanitized title plus the URL's extension.
pub fn download_file_name(title: &str, url: &str) -> String {
    let base = sanitize_component(title, "download");
    let extension = Url::parse(url)
        .ok()
        .and_then(|u| {
            u.path_segments()
                .and_then(|mut segments| segments.next_back().map(str::to_string))
        })
        .and_then(|last| last.rsplit_once('.').map(|(_, ext)| ext.to_string()))
        .filter(|ext| !ext.is_empty());

    match extension {
        Some(ext) if !base.to_ascii_lowercase().ends_with(&format!(".{}", ext.to_ascii_lowercase())) => {
            format!("{base}.{}", sanitize_component(&ext, "bin"))
        }
        _ => base,
    }
}

/// Download a file into `dir`, falling back to the system opener on failure.
pub fn download(backend: &dyn Backend, url: &str, title: &str, dir: &Path) -> Result<DownloadOutcome> {
    download_with(backend, url, title, dir, |u| open::that(u))
}

/// [`download`] with an explicit opener for the fallback path.
pub fn download_with(
    backend: &dyn Backend,
    url: &str,
    title: &str,
    dir: &Path,
    opener: impl FnOnce(&str) -> io::Result<()>,
) -> Result<DownloadOutcome> {
    let saved = backend
        .fetch_object(url)
        .map_err(anyhow::Error::from)
        .and_then(|bytes| {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create download directory {:?}", dir))?;
            let target = dir.join(download_file_name(title, url));
            fs::write(&target, bytes)
                .with_context(|| format!("Failed to write download to {:?}", target))?;
            Ok(target)
        });

    match saved {
        Ok(path) => {
            info!(path = %path.display(), "download saved");
            Ok(DownloadOutcome::Saved(path))
        }
        Err(err) => {
            warn!(%url, error = %err, "download failed, opening externally");
            opener(url).with_context(|| format!("Failed to open {url}"))?;
            Ok(DownloadOutcome::OpenedExternally {
                url: url.to_string(),
                reason: err.to_string(),
            })
        }
    }
}

/// Bump the download counter of a resource.
pub fn count_download(backend: &dyn Backend, token: Option<&str>, resource_id: Uuid) -> BackendResult<()> {
    backend.increment_download_count(token, resource_id)
}
