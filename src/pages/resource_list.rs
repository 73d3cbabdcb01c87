// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Resource listing page: filter inputs, results and the loading flag.

use tracing::warn;
use uuid::Uuid;

use super::{Failure, PageEvent};
use crate::logic::query::{ResourceFilters, SortOrder};
use crate::logic::submission::parse_number;
use crate::models::resource::{Category, Resource, results_label};
use crate::session::Session;

/// Banner text for any listing failure.
pub const FETCH_FAILED: &str = "Failed to fetch resources";

/// Listing state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResourceListModel {
    filters: ResourceFilters,
    resources: Vec<Resource>,
    loading: bool,
    error: Option<String>,
}

/// Messages emitted by the listing view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResourceListMsg {
    SearchChanged(String),
    /// Raw picker value; empty clears the filter.
    SemesterChanged(String),
    YearChanged(String),
    CategoryChanged(String),
    BranchChanged(String),
    SortChanged(String),
    Refresh,
    Loaded(Result<Vec<Resource>, Failure>),
    Download(Uuid),
}

/// Side effects requested by the listing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResourceListCommand {
    Fetch(ResourceFilters),
    Download {
        resource_id: Uuid,
        url: String,
        title: String,
    },
}

impl ResourceListModel {
    pub fn filters(&self) -> &ResourceFilters {
        &self.filters
    }

    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// "N resources found", shown once loading settles with results.
    pub fn summary(&self) -> Option<String> {
        (!self.loading && !self.resources.is_empty()).then(|| results_label(self.resources.len()))
    }
}

fn non_empty(raw: String) -> Option<String> {
    (!raw.is_empty()).then_some(raw)
}

/// Apply a message. Every filter change re-fetches; nothing is debounced.
pub fn update(
    model: &mut ResourceListModel,
    msg: ResourceListMsg,
    session: Option<&Session>,
    cmds: &mut Vec<ResourceListCommand>,
) -> Option<PageEvent> {
    match msg {
        ResourceListMsg::SearchChanged(text) => model.filters.search = text,
        ResourceListMsg::SemesterChanged(raw) => model.filters.semester = parse_number(&raw),
        ResourceListMsg::YearChanged(raw) => model.filters.year = parse_number(&raw),
        ResourceListMsg::CategoryChanged(raw) => model.filters.category = Category::parse(&raw),
        ResourceListMsg::BranchChanged(raw) => model.filters.branch = non_empty(raw),
        ResourceListMsg::SortChanged(raw) => model.filters.sort = SortOrder::parse(&raw),
        ResourceListMsg::Refresh => {}
        ResourceListMsg::Loaded(result) => {
            model.loading = false;
            return match result {
                Ok(resources) => {
                    model.error = None;
                    model.resources = resources;
                    Some(PageEvent::info(results_label(model.resources.len())))
                }
                Err(failure) => {
                    warn!(error = %failure.message, "resource listing failed");
                    model.resources.clear();
                    model.error = Some(FETCH_FAILED.to_string());
                    None
                }
            };
        }
        ResourceListMsg::Download(id) => {
            if let Some(resource) = model.resources.iter().find(|r| r.id == id) {
                cmds.push(ResourceListCommand::Download {
                    resource_id: resource.id,
                    url: resource.file_url.clone(),
                    title: resource.title.clone(),
                });
            }
            return None;
        }
    }

    request_fetch(model, session, cmds);
    None
}

/// Queue a fetch when the viewer's department is known.
fn request_fetch(
    model: &mut ResourceListModel,
    session: Option<&Session>,
    cmds: &mut Vec<ResourceListCommand>,
) {
    let has_scope = session.is_some_and(|s| !s.profile().department.is_empty());
    if !has_scope {
        model.loading = false;
        return;
    }
    model.loading = true;
    model.error = None;
    cmds.push(ResourceListCommand::Fetch(model.filters.clone()));
}
