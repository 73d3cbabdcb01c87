// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Client-side visibility filtering for fetched resources.
//!
//! This runs after the rows have been downloaded, so private rows still reach
//! the client before being dropped here. It is a display filter, not access
//! control; real protection needs row-level policies on the backend.
//!
//! Colleges are compared as-is, so a viewer with no college sees private rows
//! whose owner has no college either.

use crate::models::resource::{Privacy, Resource};
use crate::models::user::Viewer;

/// Whether `viewer` may see `resource`.
///
/// Public rows are visible to everyone, a viewer always sees their own
/// uploads, and private rows are visible to viewers from the owner's college.
pub fn is_visible(resource: &Resource, viewer: &Viewer) -> bool {
    match resource.privacy {
        Privacy::Public => true,
        Privacy::Private => {
            resource.uploaded_by == viewer.id || resource.owner_college() == viewer.college
        }
    }
}

/// Keep only the rows visible to `viewer`, preserving order.
pub fn filter_visible(resources: Vec<Resource>, viewer: &Viewer) -> Vec<Resource> {
    resources
        .into_iter()
        .filter(|r| is_visible(r, viewer))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::query::tests::resource;
    use crate::models::resource::UploaderSummary;
    use uuid::Uuid;

    fn viewer(college: &str) -> Viewer {
        Viewer {
            id: Uuid::new_v4(),
            college: college.into(),
            department: "CS".into(),
        }
    }

    fn private_from(college: &str) -> Resource {
        let mut r = resource("private", "CS");
        r.privacy = Privacy::Private;
        r.college = String::new();
        r.uploader = Some(UploaderSummary {
            name: Some("Owner".into()),
            college: Some(college.into()),
        });
        r
    }

    #[test]
    fn public_rows_are_always_visible() {
        let r = resource("public", "CS");
        assert!(is_visible(&r, &viewer("Anywhere")));
    }

    #[test]
    fn private_rows_need_same_college_or_ownership() {
        let r = private_from("Kengeri Campus");
        assert!(is_visible(&r, &viewer("Kengeri Campus")));
        assert!(!is_visible(&r, &viewer("Central Campus")));

        let mut owner = viewer("Central Campus");
        owner.id = r.uploaded_by;
        assert!(is_visible(&r, &owner));
    }

    #[test]
    fn never_leaks_foreign_private_rows() {
        let colleges = ["Central Campus", "Kengeri Campus", "Delhi NCR Campus"];
        let mut rows = Vec::new();
        for college in colleges {
            rows.push(private_from(college));
            let mut public = resource("public", "CS");
            public.college = college.into();
            rows.push(public);
        }

        for college in colleges {
            let v = viewer(college);
            let shown = filter_visible(rows.clone(), &v);
            for r in &shown {
                assert!(
                    r.privacy == Privacy::Public
                        || r.uploaded_by == v.id
                        || r.owner_college() == v.college
                );
            }
            assert_eq!(shown.len(), colleges.len() + 1);
        }
    }

    #[test]
    fn blank_colleges_compare_equal() {
        let r = private_from("");
        assert!(is_visible(&r, &viewer("")));
        assert!(!is_visible(&r, &viewer("Central Campus")));

        let mut no_join = private_from("");
        no_join.uploader = None;
        assert!(is_visible(&no_join, &viewer("")));
    }

    #[test]
    fn order_is_preserved() {
        let v = viewer("Central Campus");
        let rows = vec![
            resource("first", "CS"),
            private_from("Kengeri Campus"),
            resource("second", "CS"),
        ];
        let titles: Vec<_> = filter_visible(rows, &v)
            .into_iter()
            .map(|r| r.title)
            .collect();
        assert_eq!(titles, vec!["first", "second"]);
    }
}
