// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Upload and edit submission.
//!
//! Responsibilities:
//! - Map the form's resource type onto a stored category.
//! - Store a selected file under a per-user path and resolve its public URL.
//! - Insert new rows or apply owner-scoped updates to existing ones.

use std::fs;
use std::path::PathBuf;

use tracing::{info, warn};
use uuid::Uuid;

use crate::backend::{Backend, BackendError, BackendResult};
use crate::models::resource::{Category, FileRef, NewResource, Resource, ResourceFields, ResourcePatch};
use crate::session::Session;
use crate::utils::{guess_mime, sanitize_component};

/// Points credited to the uploader for every new resource.
pub const UPLOAD_POINTS: i64 = 10;

/// College recorded on uploads from profiles that have none.
pub const DEFAULT_COLLEGE: &str = "Christ University";

pub const MISSING_FILE: &str = "Please select a file to upload";
pub const EDIT_DENIED: &str = "You do not have permission to edit this resource";

/// Resource types offered by the upload form, with labels.
pub const RESOURCE_TYPES: [(&str, &str); 5] = [
    ("notes", "Notes"),
    ("qp", "Question Paper"),
    ("solution", "Solution"),
    ("report", "Project Report"),
    ("material", "Study Material"),
];

/// Stored category for a form resource type; unmapped types become notes.
pub fn category_for_type(resource_type: &str) -> Category {
    match resource_type {
        "qp" => Category::QuestionPaper,
        "solution" => Category::Assignment,
        "report" => Category::Project,
        "material" => Category::Reference,
        _ => Category::Notes,
    }
}

/// Parse a semester/year field. Anything that is not an integer is dropped.
pub fn parse_number(raw: &str) -> Option<i32> {
    raw.trim().parse().ok()
}

/// Extension used for storage and `file_type`: the text after the last dot.
pub fn file_extension(name: &str) -> String {
    let ext = name.rsplit('.').next().unwrap_or(name);
    sanitize_component(ext, "bin")
}

/// Per-user storage location with a random file name.
pub fn storage_path(user_id: Uuid, extension: &str) -> String {
    format!("{user_id}/{}.{extension}", Uuid::new_v4())
}

/// File picked in the upload form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectedFile {
    pub path: PathBuf,
    pub name: String,
}

impl SelectedFile {
    pub fn from_path(path: PathBuf) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { path, name }
    }
}

/// Create a new resource or edit an existing one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SubmitMode {
    #[default]
    Create,
    Edit(Uuid),
}

/// Validated form contents ready to be written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Submission {
    pub mode: SubmitMode,
    pub fields: ResourceFields,
    pub file: Option<SelectedFile>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    Created(Resource),
    Updated(Uuid),
}

/// Reject editing a resource the session does not own.
pub fn ensure_owner(resource: &Resource, session: &Session) -> BackendResult<()> {
    if resource.uploaded_by != session.user_id() {
        warn!(resource = %resource.id, user = %session.user_id(), "edit refused, not the uploader");
        return Err(BackendError::PermissionDenied(EDIT_DENIED.into()));
    }
    Ok(())
}

/// Upload a file to `bucket` and return where it can be fetched from.
pub fn store_file(
    backend: &dyn Backend,
    session: &Session,
    bucket: &str,
    file: &SelectedFile,
) -> BackendResult<FileRef> {
    let bytes = fs::read(&file.path)?;
    let extension = file_extension(&file.name);
    let path = storage_path(session.user_id(), &extension);
    let content_type = guess_mime(&file.name);
    backend.upload_object(session.access_token(), bucket, &path, bytes, &content_type)?;
    let file_url = backend.public_url(bucket, &path)?;
    info!(%path, "stored file");
    Ok(FileRef {
        file_url,
        file_type: extension,
    })
}

/// Write a submission: store the file (when one was picked), then insert or update the row.
///
/// Creating requires a file. Editing only touches file columns when a new file
/// was picked, and only updates rows uploaded by the session's user; a zero-row
/// update is reported as [`BackendError::PermissionDenied`].
///
/// Point awards are not issued here; callers schedule them after a create.
pub fn submit(
    backend: &dyn Backend,
    session: &Session,
    bucket: &str,
    submission: &Submission,
) -> BackendResult<SubmitOutcome> {
    match submission.mode {
        SubmitMode::Create => {
            let file = submission
                .file
                .as_ref()
                .ok_or_else(|| BackendError::Invalid(MISSING_FILE.into()))?;
            let file = store_file(backend, session, bucket, file)?;
            let profile = session.profile();
            let college = if profile.college.is_empty() {
                DEFAULT_COLLEGE.to_string()
            } else {
                profile.college.clone()
            };
            let row = NewResource {
                fields: submission.fields.clone(),
                file,
                uploaded_by: session.user_id(),
                college,
                department: profile.department.clone(),
            };
            let created = backend.insert_resource(session.access_token(), &row)?;
            info!(resource = %created.id, "resource created");
            Ok(SubmitOutcome::Created(created))
        }
        SubmitMode::Edit(id) => {
            let file = submission
                .file
                .as_ref()
                .map(|f| store_file(backend, session, bucket, f))
                .transpose()?;
            let patch = ResourcePatch {
                fields: submission.fields.clone(),
                file,
            };
            let changed =
                backend.update_resource(session.access_token(), id, session.user_id(), &patch)?;
            if changed == 0 {
                warn!(resource = %id, "update matched no rows owned by the user");
                return Err(BackendError::PermissionDenied(EDIT_DENIED.into()));
            }
            info!(resource = %id, "resource updated");
            Ok(SubmitOutcome::Updated(id))
        }
    }
}

/// Credit the upload reward to a user.
pub fn award_upload_points(
    backend: &dyn Backend,
    session: &Session,
    user_id: Uuid,
    amount: i64,
) -> BackendResult<()> {
    backend.increment_points(session.access_token(), user_id, amount)
}
