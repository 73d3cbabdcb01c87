// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Upload/edit form for a resource.

use std::path::PathBuf;
use std::time::Duration;

use uuid::Uuid;

use super::{Failure, PageEvent, REDIRECT_DELAY, Route};
use crate::logic::submission::{
    EDIT_DENIED, MISSING_FILE, SelectedFile, SubmitMode, SubmitOutcome, Submission, UPLOAD_POINTS,
    category_for_type, ensure_owner, parse_number,
};
use crate::models::resource::{Privacy, Resource, ResourceFields};
use crate::models::tags::Tags;
use crate::session::Session;

pub const LOAD_FAILED: &str = "Failed to load resource data";
pub const NOT_LOADED: &str = "The resource has not been loaded for editing";

/// Form state. Numeric fields stay as typed until submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadModel {
    mode: SubmitMode,
    pub title: String,
    pub description: String,
    pub subject: String,
    pub branch: String,
    pub semester: String,
    pub year: String,
    pub resource_type: String,
    pub privacy: Privacy,
    /// Comma-separated tags as typed.
    pub tags: String,
    file: Option<SelectedFile>,
    original_file_url: Option<String>,
    loading: bool,
    error: Option<String>,
    success: bool,
}

impl Default for UploadModel {
    fn default() -> Self {
        Self {
            mode: SubmitMode::Create,
            title: String::new(),
            description: String::new(),
            subject: String::new(),
            branch: String::new(),
            semester: String::new(),
            year: String::new(),
            resource_type: "notes".into(),
            privacy: Privacy::Public,
            tags: String::new(),
            file: None,
            original_file_url: None,
            loading: false,
            error: None,
            success: false,
        }
    }
}

/// Messages emitted by the form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UploadMsg {
    StartCreate,
    StartEdit(Uuid),
    Loaded(Result<Resource, Failure>),
    TitleChanged(String),
    DescriptionChanged(String),
    SubjectChanged(String),
    BranchChanged(String),
    SemesterChanged(String),
    YearChanged(String),
    ResourceTypeChanged(String),
    PrivacyChanged(Privacy),
    TagsChanged(String),
    FilePicked(PathBuf),
    Submit,
    Submitted(Result<SubmitOutcome, Failure>),
}

/// Side effects requested by the form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UploadCommand {
    LoadResource(Uuid),
    Submit(Submission),
    /// Fire-and-forget reward for a new upload.
    AwardPoints { user_id: Uuid, amount: i64 },
    Redirect { to: Route, after: Duration },
}

impl UploadModel {
    pub fn mode(&self) -> SubmitMode {
        self.mode
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.mode, SubmitMode::Edit(_))
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file.as_ref().map(|f| f.name.as_str())
    }

    /// File URL of the row being edited, kept unless a new file is picked.
    pub fn original_file_url(&self) -> Option<&str> {
        self.original_file_url.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn succeeded(&self) -> bool {
        self.success
    }

    pub fn heading(&self) -> &'static str {
        if self.is_editing() {
            "Edit Resource"
        } else {
            "Upload Resource"
        }
    }

    /// Fill the form from an existing row.
    fn populate(&mut self, resource: &Resource) {
        self.title = resource.title.clone();
        self.description = resource.description.clone();
        self.subject = resource.subject.clone();
        self.branch = resource.branch.clone();
        self.semester = resource.semester.map(|v| v.to_string()).unwrap_or_default();
        self.year = resource.year.map(|v| v.to_string()).unwrap_or_default();
        self.resource_type = if resource.resource_type.is_empty() {
            "notes".into()
        } else {
            resource.resource_type.clone()
        };
        self.privacy = resource.privacy;
        self.tags = resource.tags_text();
        self.original_file_url = Some(resource.file_url.clone());
    }
}

/// Apply a message to the form. Returns a user-facing event when relevant.
pub fn update(
    model: &mut UploadModel,
    msg: UploadMsg,
    session: Option<&Session>,
    cmds: &mut Vec<UploadCommand>,
) -> Option<PageEvent> {
    match msg {
        UploadMsg::StartCreate => {
            *model = UploadModel::default();
            None
        }
        UploadMsg::StartEdit(id) => {
            *model = UploadModel {
                mode: SubmitMode::Edit(id),
                loading: true,
                ..UploadModel::default()
            };
            cmds.push(UploadCommand::LoadResource(id));
            None
        }
        UploadMsg::Loaded(result) => {
            model.loading = false;
            let resource = match result {
                Ok(resource) => resource,
                Err(failure) => {
                    tracing::warn!(error = %failure.message, "could not load resource for editing");
                    model.error = Some(LOAD_FAILED.into());
                    return Some(PageEvent::error(LOAD_FAILED));
                }
            };
            let owned = session.is_some_and(|s| ensure_owner(&resource, s).is_ok());
            if !owned {
                model.error = Some(EDIT_DENIED.into());
                cmds.push(UploadCommand::Redirect {
                    to: Route::Profile,
                    after: REDIRECT_DELAY,
                });
                return Some(PageEvent::error(EDIT_DENIED));
            }
            model.populate(&resource);
            None
        }
        UploadMsg::TitleChanged(text) => {
            model.title = text;
            None
        }
        UploadMsg::DescriptionChanged(text) => {
            model.description = text;
            None
        }
        UploadMsg::SubjectChanged(text) => {
            model.subject = text;
            None
        }
        UploadMsg::BranchChanged(text) => {
            model.branch = text;
            None
        }
        UploadMsg::SemesterChanged(text) => {
            model.semester = text;
            None
        }
        UploadMsg::YearChanged(text) => {
            model.year = text;
            None
        }
        UploadMsg::ResourceTypeChanged(text) => {
            model.resource_type = text;
            None
        }
        UploadMsg::PrivacyChanged(privacy) => {
            model.privacy = privacy;
            None
        }
        UploadMsg::TagsChanged(text) => {
            model.tags = text;
            None
        }
        UploadMsg::FilePicked(path) => {
            model.file = Some(SelectedFile::from_path(path));
            None
        }
        UploadMsg::Submit if model.loading => None,
        UploadMsg::Submit => match validate_for_submit(model) {
            Ok(submission) => {
                model.loading = true;
                model.error = None;
                cmds.push(UploadCommand::Submit(submission));
                None
            }
            Err(err) => {
                model.error = Some(err.clone());
                Some(PageEvent::error(err))
            }
        },
        UploadMsg::Submitted(result) => {
            model.loading = false;
            match result {
                Ok(SubmitOutcome::Created(resource)) => {
                    model.success = true;
                    cmds.push(UploadCommand::AwardPoints {
                        user_id: resource.uploaded_by,
                        amount: UPLOAD_POINTS,
                    });
                    cmds.push(UploadCommand::Redirect {
                        to: Route::Home,
                        after: REDIRECT_DELAY,
                    });
                    Some(PageEvent::info(format!("Uploaded \"{}\"", resource.title)))
                }
                Ok(SubmitOutcome::Updated(_)) => {
                    model.success = true;
                    cmds.push(UploadCommand::Redirect {
                        to: Route::Profile,
                        after: REDIRECT_DELAY,
                    });
                    Some(PageEvent::info("Resource updated"))
                }
                Err(failure) => {
                    if failure.permission_denied {
                        cmds.push(UploadCommand::Redirect {
                            to: Route::Profile,
                            after: REDIRECT_DELAY,
                        });
                    }
                    model.error = Some(failure.message.clone());
                    Some(PageEvent::error(failure.message))
                }
            }
        }
    }
}

/// Validate the form and build the submission to write.
fn validate_for_submit(model: &UploadModel) -> Result<Submission, String> {
    if !model.is_editing() && model.file.is_none() {
        return Err(MISSING_FILE.into());
    }
    // An edit form is only populated by a successful load.
    if model.is_editing() && model.original_file_url.is_none() {
        return Err(NOT_LOADED.into());
    }

    let fields = ResourceFields {
        title: model.title.clone(),
        description: model.description.clone(),
        subject: model.subject.clone(),
        branch: model.branch.clone(),
        semester: parse_number(&model.semester),
        year: parse_number(&model.year),
        resource_type: model.resource_type.clone(),
        category: category_for_type(&model.resource_type),
        privacy: model.privacy,
        tags: Tags::parse(&model.tags).into_vec(),
    };

    Ok(Submission {
        mode: model.mode,
        fields,
        file: model.file.clone(),
    })
}
