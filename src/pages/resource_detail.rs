// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Detail page for one resource: metadata, reviews, review form and download.

use tracing::warn;
use uuid::Uuid;

use super::{Failure, PageEvent};
use crate::logic::detail::ResourceDetail;
use crate::models::resource::Resource;
use crate::models::review::{Review, average_rating};
use crate::session::Session;

pub const NOT_FOUND: &str = "Resource not found";
pub const SIGN_IN_TO_REVIEW: &str = "Please sign in to leave a review";

/// Review composer state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReviewForm {
    open: bool,
    pub rating: u8,
    pub comment: String,
    submitting: bool,
    error: Option<String>,
}

impl Default for ReviewForm {
    fn default() -> Self {
        Self {
            open: false,
            rating: 5,
            comment: String::new(),
            submitting: false,
            error: None,
        }
    }
}

impl ReviewForm {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResourceDetailModel {
    id: Option<Uuid>,
    detail: Option<ResourceDetail>,
    loading: bool,
    error: Option<String>,
    pub review: ReviewForm,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResourceDetailMsg {
    Open(Uuid),
    Loaded(Result<ResourceDetail, Failure>),
    ToggleReviewForm,
    RatingChanged(u8),
    CommentChanged(String),
    SubmitReview,
    ReviewSubmitted(Result<(), Failure>),
    Download,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResourceDetailCommand {
    Load(Uuid),
    SubmitReview {
        resource_id: Uuid,
        rating: u8,
        comment: String,
    },
    Download {
        resource_id: Uuid,
        url: String,
        title: String,
    },
}

impl ResourceDetailModel {
    pub fn resource(&self) -> Option<&Resource> {
        self.detail.as_ref().map(|d| &d.resource)
    }

    pub fn reviews(&self) -> &[Review] {
        self.detail.as_ref().map(|d| d.reviews.as_slice()).unwrap_or(&[])
    }

    /// Mean rating with one decimal, or "New" without reviews.
    pub fn average_rating(&self) -> String {
        average_rating(self.reviews())
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether the viewer uploaded the shown resource.
    pub fn is_mine(&self, session: Option<&Session>) -> bool {
        match (self.resource(), session) {
            (Some(resource), Some(session)) => resource.uploaded_by == session.user_id(),
            _ => false,
        }
    }
}

pub fn update(
    model: &mut ResourceDetailModel,
    msg: ResourceDetailMsg,
    session: Option<&Session>,
    cmds: &mut Vec<ResourceDetailCommand>,
) -> Option<PageEvent> {
    match msg {
        ResourceDetailMsg::Open(id) => {
            *model = ResourceDetailModel {
                id: Some(id),
                loading: true,
                ..ResourceDetailModel::default()
            };
            cmds.push(ResourceDetailCommand::Load(id));
            None
        }
        ResourceDetailMsg::Loaded(result) => {
            model.loading = false;
            match result {
                Ok(detail) => {
                    model.error = None;
                    model.detail = Some(detail);
                }
                Err(failure) => {
                    warn!(resource = ?model.id, error = %failure.message, "resource detail unavailable");
                    model.detail = None;
                    model.error = Some(NOT_FOUND.into());
                }
            }
            None
        }
        ResourceDetailMsg::ToggleReviewForm => {
            model.review.open = !model.review.open;
            model.review.error = None;
            None
        }
        ResourceDetailMsg::RatingChanged(rating) => {
            model.review.rating = rating;
            None
        }
        ResourceDetailMsg::CommentChanged(text) => {
            model.review.comment = text;
            None
        }
        ResourceDetailMsg::SubmitReview => {
            if session.is_none() {
                model.review.error = Some(SIGN_IN_TO_REVIEW.into());
                return Some(PageEvent::error(SIGN_IN_TO_REVIEW));
            }
            let resource_id = model.id?;
            model.review.submitting = true;
            model.review.error = None;
            cmds.push(ResourceDetailCommand::SubmitReview {
                resource_id,
                rating: model.review.rating,
                comment: model.review.comment.clone(),
            });
            None
        }
        ResourceDetailMsg::ReviewSubmitted(result) => {
            model.review.submitting = false;
            match result {
                Ok(()) => {
                    model.review = ReviewForm::default();
                    if let Some(id) = model.id {
                        cmds.push(ResourceDetailCommand::Load(id));
                    }
                    Some(PageEvent::info("Review submitted"))
                }
                Err(failure) => {
                    model.review.error = Some(failure.message.clone());
                    Some(PageEvent::error(failure.message))
                }
            }
        }
        ResourceDetailMsg::Download => {
            if let Some(resource) = model.resource() {
                cmds.push(ResourceDetailCommand::Download {
                    resource_id: resource.id,
                    url: resource.file_url.clone(),
                    title: resource.title.clone(),
                });
            }
            None
        }
    }
}
