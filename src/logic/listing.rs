// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Listing pipeline: department-scoped query, then client-side visibility.

use tracing::debug;

use crate::backend::{Backend, BackendResult};
use crate::logic::query::{ResourceFilters, ResourceQuery};
use crate::logic::visibility::filter_visible;
use crate::models::resource::Resource;
use crate::session::Session;

/// Fetch the resources a signed-in viewer may see for the given filters.
///
/// Every matching row of the viewer's department is downloaded first and the
/// privacy predicate is applied afterwards; see [`crate::logic::visibility`].
pub fn list_resources(
    backend: &dyn Backend,
    session: &Session,
    filters: &ResourceFilters,
) -> BackendResult<Vec<Resource>> {
    let viewer = session.viewer();
    let query = ResourceQuery::for_viewer(&viewer, filters);
    let fetched = backend.select_resources(Some(session.access_token()), &query)?;
    let total = fetched.len();
    let visible = filter_visible(fetched, &viewer);
    debug!(total, visible = visible.len(), "listed resources");
    Ok(visible)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::memory::{MemoryBackend, Operation};
    use crate::logic::query::{SortOrder, tests::resource};
    use crate::models::resource::{Category, Privacy};
    use crate::models::user::UserProfile;
    use time::{Duration, OffsetDateTime};
    use uuid::Uuid;

    fn session(department: &str, college: &str) -> (MemoryBackend, Session) {
        let backend = MemoryBackend::new();
        let mut profile = UserProfile::placeholder(Uuid::new_v4(), "v@uni.edu");
        profile.department = department.into();
        profile.college = college.into();
        (backend, Session::new("token".into(), None, profile))
    }

    fn seed_catalog(backend: &MemoryBackend) {
        let base = OffsetDateTime::UNIX_EPOCH;
        let rows = [
            ("Trees", "CS", Some(3), Category::Notes, "CSE", 5),
            ("Graphs", "CS", Some(4), Category::QuestionPaper, "CSE", 2),
            ("Tree traversal", "CS", Some(4), Category::Notes, "ECE", 9),
            ("Thermodynamics", "ME", Some(3), Category::Notes, "ME", 7),
            ("Sorting", "CS", None, Category::Project, "CSE", 1),
        ];
        for (title, dept, semester, category, branch, day) in rows {
            let mut r = resource(title, dept);
            r.semester = semester;
            r.category = category;
            r.branch = branch.into();
            r.created_at = base + Duration::days(day);
            backend.seed_resource(r);
        }
    }

    #[test]
    fn results_satisfy_every_applied_predicate() {
        let (backend, session) = session("CS", "Central Campus");
        seed_catalog(&backend);

        let combos = [
            ResourceFilters::default(),
            ResourceFilters {
                search: "tree".into(),
                ..Default::default()
            },
            ResourceFilters {
                semester: Some(4),
                ..Default::default()
            },
            ResourceFilters {
                category: Some(Category::Notes),
                branch: Some("CSE".into()),
                ..Default::default()
            },
            ResourceFilters {
                search: "TREE".into(),
                semester: Some(4),
                sort: SortOrder::Oldest,
                ..Default::default()
            },
        ];

        for filters in combos {
            let rows = list_resources(&backend, &session, &filters).unwrap();
            for r in &rows {
                assert_eq!(r.department, "CS");
                if !filters.search.is_empty() {
                    assert!(r.title.to_lowercase().contains(&filters.search.to_lowercase()));
                }
                if let Some(sem) = filters.semester {
                    assert_eq!(r.semester, Some(sem));
                }
                if let Some(cat) = filters.category {
                    assert_eq!(r.category, cat);
                }
                if let Some(branch) = &filters.branch {
                    assert_eq!(&r.branch, branch);
                }
            }
            for pair in rows.windows(2) {
                match filters.sort {
                    SortOrder::Latest => assert!(pair[0].created_at >= pair[1].created_at),
                    SortOrder::Oldest => assert!(pair[0].created_at <= pair[1].created_at),
                }
            }
        }
    }

    #[test]
    fn other_departments_are_never_returned() {
        let (backend, session) = session("CS", "Central Campus");
        seed_catalog(&backend);
        let rows = list_resources(&backend, &session, &ResourceFilters::default()).unwrap();
        assert_eq!(rows.len(), 4);
        assert!(rows.iter().all(|r| r.title != "Thermodynamics"));
        assert_eq!(rows[0].title, "Tree traversal");
    }

    #[test]
    fn private_rows_from_other_colleges_are_dropped_after_fetch() {
        let (backend, session) = session("CS", "Central Campus");
        let mut foreign = resource("Foreign private", "CS");
        foreign.privacy = Privacy::Private;
        foreign.college = "Kengeri Campus".into();
        let mut local = resource("Local private", "CS");
        local.privacy = Privacy::Private;
        let mut mine = resource("My private", "CS");
        mine.privacy = Privacy::Private;
        mine.college = "Kengeri Campus".into();
        mine.uploaded_by = session.user_id();
        backend.seed_resource(foreign);
        backend.seed_resource(local);
        backend.seed_resource(mine);

        let titles: Vec<_> = list_resources(&backend, &session, &ResourceFilters::default())
            .unwrap()
            .into_iter()
            .map(|r| r.title)
            .collect();
        assert_eq!(titles, vec!["Local private", "My private"]);
    }

    #[test]
    fn fetch_errors_propagate_without_partial_results() {
        let (backend, session) = session("CS", "Central Campus");
        seed_catalog(&backend);
        backend.fail(Operation::SelectResources);
        assert!(list_resources(&backend, &session, &ResourceFilters::default()).is_err());
    }
}
