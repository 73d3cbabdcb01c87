// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Resource query builder.
//!
//! A [`ResourceQuery`] is a plain value: an ordered list of column predicates
//! plus an ordering. The REST backend renders it into PostgREST query pairs;
//! the in-memory backend evaluates it directly with [`ResourceQuery::matches`].

use uuid::Uuid;

use crate::models::resource::{Category, Resource};
use crate::models::user::Viewer;

/// Columns selected for listings: every resource column plus the uploader's name and college.
pub const LISTING_SELECT: &str = "*,users(name,college)";

/// Ordering of a listing by creation time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Latest,
    Oldest,
}

impl SortOrder {
    /// Anything other than `oldest` means latest-first.
    pub fn parse(raw: &str) -> Self {
        if raw == "oldest" {
            SortOrder::Oldest
        } else {
            SortOrder::Latest
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Latest => "latest",
            SortOrder::Oldest => "oldest",
        }
    }
}

/// Criteria entered on the listing page. Empty values do not narrow the result.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResourceFilters {
    pub search: String,
    pub semester: Option<i32>,
    pub year: Option<i32>,
    pub category: Option<Category>,
    pub branch: Option<String>,
    pub sort: SortOrder,
}

/// Filterable column of the `resources` table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Column {
    Id,
    Department,
    Title,
    Semester,
    Year,
    Category,
    Branch,
}

impl Column {
    pub fn as_str(&self) -> &'static str {
        match self {
            Column::Id => "id",
            Column::Department => "department",
            Column::Title => "title",
            Column::Semester => "semester",
            Column::Year => "year",
            Column::Category => "category",
            Column::Branch => "branch",
        }
    }

    /// Column value of a row in the same textual form the filter compares against.
    fn value_of(&self, resource: &Resource) -> Option<String> {
        match self {
            Column::Id => Some(resource.id.to_string()),
            Column::Department => Some(resource.department.clone()),
            Column::Title => Some(resource.title.clone()),
            Column::Semester => resource.semester.map(|v| v.to_string()),
            Column::Year => resource.year.map(|v| v.to_string()),
            Column::Category => Some(resource.category.as_str().to_string()),
            Column::Branch => Some(resource.branch.clone()),
        }
    }
}

/// A single column predicate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Predicate {
    /// Exact equality.
    Eq { column: Column, value: String },
    /// Case-insensitive substring match.
    ILike { column: Column, needle: String },
}

impl Predicate {
    fn matches(&self, resource: &Resource) -> bool {
        match self {
            Predicate::Eq { column, value } => column.value_of(resource).as_deref() == Some(value.as_str()),
            Predicate::ILike { column, needle } => column
                .value_of(resource)
                .is_some_and(|v| v.to_lowercase().contains(&needle.to_lowercase())),
        }
    }

    /// PostgREST `(column, operator.value)` pair.
    fn to_pair(&self) -> (String, String) {
        match self {
            Predicate::Eq { column, value } => (column.as_str().to_string(), format!("eq.{value}")),
            Predicate::ILike { column, needle } => {
                (column.as_str().to_string(), format!("ilike.*{needle}*"))
            }
        }
    }
}

/// Filtered, ordered select against the `resources` table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceQuery {
    predicates: Vec<Predicate>,
    order: Option<SortOrder>,
}

impl ResourceQuery {
    /// Listing query for a viewer: always scoped to their department, narrowed by each non-empty filter.
    pub fn for_viewer(viewer: &Viewer, filters: &ResourceFilters) -> Self {
        let mut predicates = vec![Predicate::Eq {
            column: Column::Department,
            value: viewer.department.clone(),
        }];

        if !filters.search.is_empty() {
            predicates.push(Predicate::ILike {
                column: Column::Title,
                needle: filters.search.clone(),
            });
        }
        if let Some(semester) = filters.semester {
            predicates.push(Predicate::Eq {
                column: Column::Semester,
                value: semester.to_string(),
            });
        }
        if let Some(year) = filters.year {
            predicates.push(Predicate::Eq {
                column: Column::Year,
                value: year.to_string(),
            });
        }
        if let Some(category) = filters.category {
            predicates.push(Predicate::Eq {
                column: Column::Category,
                value: category.as_str().to_string(),
            });
        }
        if let Some(branch) = filters.branch.as_deref().filter(|b| !b.is_empty()) {
            predicates.push(Predicate::Eq {
                column: Column::Branch,
                value: branch.to_string(),
            });
        }

        Self {
            predicates,
            order: Some(filters.sort),
        }
    }

    /// Single-row lookup by id.
    pub fn by_id(id: Uuid) -> Self {
        Self {
            predicates: vec![Predicate::Eq {
                column: Column::Id,
                value: id.to_string(),
            }],
            order: None,
        }
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    /// `None` leaves rows in backend order.
    pub fn order(&self) -> Option<SortOrder> {
        self.order
    }

    /// Whether a row satisfies every predicate.
    pub fn matches(&self, resource: &Resource) -> bool {
        self.predicates.iter().all(|p| p.matches(resource))
    }

    /// Render as PostgREST query-string pairs, including the joined select list.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![("select".to_string(), LISTING_SELECT.to_string())];
        pairs.extend(self.predicates.iter().map(Predicate::to_pair));
        if let Some(order) = self.order {
            let direction = match order {
                SortOrder::Latest => "desc",
                SortOrder::Oldest => "asc",
            };
            pairs.push(("order".to_string(), format!("created_at.{direction}")));
        }
        pairs
    }

    /// Stable in-place sort by `created_at`; ties keep their incoming order.
    pub fn sort(&self, rows: &mut [Resource]) {
        match self.order {
            Some(SortOrder::Latest) => rows.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            Some(SortOrder::Oldest) => rows.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
            None => {}
        }
    }
}
