// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Resource rows, their enums, and the payloads written back to the `resources` table.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::null_as_default;

/// Shown when the uploader join is missing.
pub const UNKNOWN_UPLOADER: &str = "Unknown";

/// Kind of material a resource holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    QuestionPaper,
    Assignment,
    Project,
    Reference,
    Prompt,
    /// Also absorbs unknown category strings from the backend.
    #[default]
    #[serde(other)]
    Notes,
}

impl Category {
    /// Every category in listing order.
    pub const ALL: [Category; 6] = [
        Category::Notes,
        Category::QuestionPaper,
        Category::Assignment,
        Category::Project,
        Category::Reference,
        Category::Prompt,
    ];

    /// Column value stored in the `category` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Notes => "notes",
            Category::QuestionPaper => "question_paper",
            Category::Assignment => "assignment",
            Category::Project => "project",
            Category::Reference => "reference",
            Category::Prompt => "prompt",
        }
    }

    /// Human-readable label for filter pickers.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Notes => "Notes",
            Category::QuestionPaper => "Question Paper",
            Category::Assignment => "Assignment",
            Category::Project => "Project",
            Category::Reference => "Reference Book",
            Category::Prompt => "Prompt",
        }
    }

    /// Parse a stored column value. Returns `None` for unknown or empty input.
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == raw)
    }
}

/// Who may see a resource.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Privacy {
    #[default]
    Public,
    /// Unrecognized privacy values are treated as private.
    #[serde(other)]
    Private,
}

impl Privacy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Privacy::Public => "public",
            Privacy::Private => "private",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "public" => Some(Privacy::Public),
            "private" => Some(Privacy::Private),
            _ => None,
        }
    }
}

/// Uploader columns joined onto a resource row (`users(name, college)`).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploaderSummary {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub college: Option<String>,
}

/// A shared file plus its academic metadata.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub id: Uuid,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub subject: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub branch: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub department: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub college: String,
    #[serde(default)]
    pub semester: Option<i32>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: Category,
    #[serde(default, deserialize_with = "null_as_default")]
    pub privacy: Privacy,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub file_url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub file_type: String,
    /// Form-level type (`notes`, `qp`, ...) kept so edit mode can restore the picker.
    #[serde(default, deserialize_with = "null_as_default")]
    pub resource_type: String,
    pub uploaded_by: Uuid,
    #[serde(default, deserialize_with = "null_as_default")]
    pub download_count: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(default, rename = "users", skip_serializing_if = "Option::is_none")]
    pub uploader: Option<UploaderSummary>,
}

impl Resource {
    /// College of the uploader, preferring the joined profile over the row's own column.
    pub fn owner_college(&self) -> &str {
        self.uploader
            .as_ref()
            .and_then(|u| u.college.as_deref())
            .unwrap_or(&self.college)
    }

    pub fn uploader_name(&self) -> &str {
        self.uploader
            .as_ref()
            .and_then(|u| u.name.as_deref())
            .filter(|n| !n.is_empty())
            .unwrap_or(UNKNOWN_UPLOADER)
    }

    pub fn description_or_default(&self) -> &str {
        if self.description.trim().is_empty() {
            "No description provided."
        } else {
            &self.description
        }
    }

    /// "Sem 4 • Year 2" style label; absent numbers render as `-`.
    pub fn term_label(&self) -> String {
        let fmt = |v: Option<i32>| v.map(|n| n.to_string()).unwrap_or_else(|| "-".into());
        format!("Sem {} • Year {}", fmt(self.semester), fmt(self.year))
    }

    /// Stored tags joined back into the comma-separated form used by the editor.
    pub fn tags_text(&self) -> String {
        self.tags.join(", ")
    }
}

/// Label for the number of listed resources.
pub fn results_label(count: usize) -> String {
    if count == 1 {
        "1 resource found".to_string()
    } else {
        format!("{count} resources found")
    }
}

/// Metadata columns written on both create and edit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ResourceFields {
    pub title: String,
    pub description: String,
    pub subject: String,
    pub branch: String,
    pub semester: Option<i32>,
    pub year: Option<i32>,
    pub resource_type: String,
    pub category: Category,
    pub privacy: Privacy,
    pub tags: Vec<String>,
}

/// Location and type of a stored file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FileRef {
    pub file_url: String,
    pub file_type: String,
}

/// Row inserted for a newly uploaded resource.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NewResource {
    #[serde(flatten)]
    pub fields: ResourceFields,
    #[serde(flatten)]
    pub file: FileRef,
    pub uploaded_by: Uuid,
    pub college: String,
    pub department: String,
}

/// Update applied to an existing resource. File columns are only sent when replaced.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ResourcePatch {
    #[serde(flatten)]
    pub fields: ResourceFields,
    #[serde(flatten)]
    pub file: Option<FileRef>,
}

impl ResourcePatch {
    /// Apply the patch to a row in place.
    pub fn apply_to(&self, resource: &mut Resource) {
        let f = &self.fields;
        resource.title = f.title.clone();
        resource.description = f.description.clone();
        resource.subject = f.subject.clone();
        resource.branch = f.branch.clone();
        resource.semester = f.semester;
        resource.year = f.year;
        resource.resource_type = f.resource_type.clone();
        resource.category = f.category;
        resource.privacy = f.privacy;
        resource.tags = f.tags.clone();
        if let Some(file) = &self.file {
            resource.file_url = file.file_url.clone();
            resource.file_type = file.file_type.clone();
        }
    }
}
