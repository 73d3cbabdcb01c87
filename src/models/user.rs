// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! User profiles and the registration metadata sent to the auth provider.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::null_as_default;

/// Row of the `users` table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub branch: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub department: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub college: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub program: String,
    #[serde(default)]
    pub semester: Option<i32>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub points: i64,
}

impl UserProfile {
    /// Bare profile used when the `users` row is missing for an authenticated account.
    pub fn placeholder(id: Uuid, email: &str) -> Self {
        Self {
            id,
            name: String::new(),
            email: email.to_string(),
            branch: String::new(),
            department: String::new(),
            college: String::new(),
            program: String::new(),
            semester: None,
            year: None,
            points: 0,
        }
    }

    /// The identity used for scoping and visibility decisions.
    pub fn viewer(&self) -> Viewer {
        Viewer {
            id: self.id,
            college: self.college.clone(),
            department: self.department.clone(),
        }
    }

    /// "120 PTS" badge text.
    pub fn points_label(&self) -> String {
        format!("{} PTS", self.points)
    }
}

/// Who is looking at a listing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Viewer {
    pub id: Uuid,
    pub college: String,
    pub department: String,
}

/// Profile payload attached to a sign-up request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProfileMetadata {
    pub name: String,
    pub branch: String,
    pub college: String,
    pub department: String,
    pub program: String,
    pub semester: Option<i32>,
    pub year: Option<i32>,
}

impl ProfileMetadata {
    /// Build the `users` row created for a freshly registered account.
    pub fn into_profile(self, id: Uuid, email: &str) -> UserProfile {
        UserProfile {
            id,
            name: self.name,
            email: email.to_string(),
            branch: self.branch,
            department: self.department,
            college: self.college,
            program: self.program,
            semester: self.semester,
            year: self.year,
            points: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_row_tolerates_nulls() {
        let json = r#"{"id":"0b7e4c1d-2f6a-4f38-8a51-3c9d2e1f4b77","name":"Ravi","college":null,"points":null}"#;
        let profile: UserProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.name, "Ravi");
        assert!(profile.college.is_empty());
        assert_eq!(profile.points, 0);
        assert_eq!(profile.points_label(), "0 PTS");
    }

    #[test]
    fn viewer_copies_scope_fields() {
        let id = Uuid::new_v4();
        let mut profile = UserProfile::placeholder(id, "a@b.edu");
        profile.college = "Central Campus".into();
        profile.department = "Computer Science".into();

        let viewer = profile.viewer();
        assert_eq!(viewer.id, id);
        assert_eq!(viewer.college, "Central Campus");
        assert_eq!(viewer.department, "Computer Science");
    }
}
