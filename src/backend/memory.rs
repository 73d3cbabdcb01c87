// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! In-process backend holding tables, objects and accounts behind a mutex.
//!
//! Used by tests and offline runs. Individual operations can be made to fail
//! with [`MemoryBackend::fail`] to exercise degraded paths.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use time::OffsetDateTime;
use uuid::Uuid;

use super::{AuthGrant, AuthUser, Backend, BackendError, BackendResult};
use crate::logic::query::ResourceQuery;
use crate::models::resource::{NewResource, Resource, ResourcePatch, UploaderSummary};
use crate::models::review::{NewReview, Review, ReviewAuthor};
use crate::models::user::{ProfileMetadata, UserProfile};

const URL_SCHEME: &str = "memory://";

/// Backend operations that can be forced to fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    SignIn,
    SignUp,
    FetchProfile,
    SelectResources,
    InsertResource,
    UpdateResource,
    SelectReviews,
    InsertReview,
    UploadObject,
    FetchObject,
    IncrementDownloads,
    IncrementPoints,
}

struct Account {
    id: Uuid,
    password: String,
}

#[derive(Default)]
struct State {
    accounts: HashMap<String, Account>,
    profiles: HashMap<Uuid, UserProfile>,
    tokens: HashMap<String, Uuid>,
    resources: Vec<Resource>,
    reviews: Vec<Review>,
    objects: HashMap<String, Vec<u8>>,
    failures: HashSet<Operation>,
    point_awards: Vec<(Uuid, i64)>,
    require_confirmation: bool,
}

impl State {
    fn check(&self, op: Operation) -> BackendResult<()> {
        if self.failures.contains(&op) {
            return Err(BackendError::Remote {
                status: 503,
                message: format!("{op:?} is unavailable"),
            });
        }
        Ok(())
    }

    fn user_for(&self, token: &str) -> BackendResult<Uuid> {
        self.tokens
            .get(token)
            .copied()
            .ok_or_else(|| BackendError::Remote {
                status: 401,
                message: "Invalid JWT".into(),
            })
    }

    fn grant(&mut self, id: Uuid, email: &str) -> AuthGrant {
        let access_token = Uuid::new_v4().to_string();
        self.tokens.insert(access_token.clone(), id);
        AuthGrant {
            access_token,
            refresh_token: Some(Uuid::new_v4().to_string()),
            user: AuthUser {
                id,
                email: Some(email.to_string()),
            },
        }
    }

    /// Emulates the `users(name, college)` join.
    fn with_uploader(&self, mut resource: Resource) -> Resource {
        resource.uploader = self.profiles.get(&resource.uploaded_by).map(|p| UploaderSummary {
            name: Some(p.name.clone()),
            college: Some(p.college.clone()),
        });
        resource
    }
}

/// Mutex-guarded in-memory implementation of [`Backend`].
#[derive(Default)]
pub struct MemoryBackend {
    state: Mutex<State>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Make `op` fail until [`MemoryBackend::recover`] is called.
    pub fn fail(&self, op: Operation) {
        self.lock().failures.insert(op);
    }

    pub fn recover(&self, op: Operation) {
        self.lock().failures.remove(&op);
    }

    /// Make sign-up withhold a session, as providers with email confirmation do.
    pub fn require_confirmation(&self, required: bool) {
        self.lock().require_confirmation = required;
    }

    /// Insert a row as-is (no join, no timestamp rewrite).
    pub fn seed_resource(&self, resource: Resource) {
        self.lock().resources.push(resource);
    }

    /// Insert or replace a `users` row without creating an account.
    pub fn seed_profile(&self, profile: UserProfile) {
        self.lock().profiles.insert(profile.id, profile);
    }

    pub fn remove_profile(&self, id: Uuid) {
        self.lock().profiles.remove(&id);
    }

    /// Snapshot of every stored resource in insertion order.
    pub fn resources(&self) -> Vec<Resource> {
        self.lock().resources.clone()
    }

    pub fn resource(&self, id: Uuid) -> Option<Resource> {
        self.lock().resources.iter().find(|r| r.id == id).cloned()
    }

    pub fn profile(&self, id: Uuid) -> Option<UserProfile> {
        self.lock().profiles.get(&id).cloned()
    }

    pub fn reviews(&self) -> Vec<Review> {
        self.lock().reviews.clone()
    }

    /// Every `(user, amount)` passed to the points procedure, in call order.
    pub fn point_awards(&self) -> Vec<(Uuid, i64)> {
        self.lock().point_awards.clone()
    }

    pub fn object(&self, bucket: &str, path: &str) -> Option<Vec<u8>> {
        self.lock().objects.get(&format!("{bucket}/{path}")).cloned()
    }

    pub fn object_count(&self) -> usize {
        self.lock().objects.len()
    }
}

impl Backend for MemoryBackend {
    fn sign_in(&self, email: &str, password: &str) -> BackendResult<AuthGrant> {
        let mut state = self.lock();
        state.check(Operation::SignIn)?;
        let id = match state.accounts.get(email) {
            Some(account) if account.password == password => account.id,
            _ => {
                return Err(BackendError::Remote {
                    status: 400,
                    message: "Invalid login credentials".into(),
                });
            }
        };
        Ok(state.grant(id, email))
    }

    fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: &ProfileMetadata,
    ) -> BackendResult<Option<AuthGrant>> {
        let mut state = self.lock();
        state.check(Operation::SignUp)?;
        if state.accounts.contains_key(email) {
            return Err(BackendError::Remote {
                status: 422,
                message: "User already registered".into(),
            });
        }
        let id = Uuid::new_v4();
        state.accounts.insert(
            email.to_string(),
            Account {
                id,
                password: password.to_string(),
            },
        );
        state
            .profiles
            .insert(id, metadata.clone().into_profile(id, email));

        if state.require_confirmation {
            return Ok(None);
        }
        Ok(Some(state.grant(id, email)))
    }

    fn sign_out(&self, token: &str) -> BackendResult<()> {
        self.lock().tokens.remove(token);
        Ok(())
    }

    fn current_user(&self, token: &str) -> BackendResult<AuthUser> {
        let state = self.lock();
        let id = state.user_for(token)?;
        let email = state
            .accounts
            .iter()
            .find(|(_, a)| a.id == id)
            .map(|(email, _)| email.clone());
        Ok(AuthUser { id, email })
    }

    fn fetch_profile(&self, token: &str, user_id: Uuid) -> BackendResult<Option<UserProfile>> {
        let state = self.lock();
        state.check(Operation::FetchProfile)?;
        state.user_for(token)?;
        Ok(state.profiles.get(&user_id).cloned())
    }

    fn select_resources(
        &self,
        _token: Option<&str>,
        query: &ResourceQuery,
    ) -> BackendResult<Vec<Resource>> {
        let state = self.lock();
        state.check(Operation::SelectResources)?;
        let mut rows: Vec<Resource> = state
            .resources
            .iter()
            .filter(|r| query.matches(r))
            .cloned()
            .map(|r| state.with_uploader(r))
            .collect();
        query.sort(&mut rows);
        Ok(rows)
    }

    fn insert_resource(&self, token: &str, row: &NewResource) -> BackendResult<Resource> {
        let mut state = self.lock();
        state.check(Operation::InsertResource)?;
        state.user_for(token)?;
        let f = &row.fields;
        let resource = Resource {
            id: Uuid::new_v4(),
            title: f.title.clone(),
            description: f.description.clone(),
            subject: f.subject.clone(),
            branch: f.branch.clone(),
            department: row.department.clone(),
            college: row.college.clone(),
            semester: f.semester,
            year: f.year,
            category: f.category,
            privacy: f.privacy,
            tags: f.tags.clone(),
            file_url: row.file.file_url.clone(),
            file_type: row.file.file_type.clone(),
            resource_type: f.resource_type.clone(),
            uploaded_by: row.uploaded_by,
            download_count: 0,
            created_at: OffsetDateTime::now_utc(),
            uploader: None,
        };
        state.resources.push(resource.clone());
        Ok(state.with_uploader(resource))
    }

    fn update_resource(
        &self,
        token: &str,
        id: Uuid,
        owner: Uuid,
        patch: &ResourcePatch,
    ) -> BackendResult<usize> {
        let mut state = self.lock();
        state.check(Operation::UpdateResource)?;
        state.user_for(token)?;
        let mut changed = 0;
        for resource in state
            .resources
            .iter_mut()
            .filter(|r| r.id == id && r.uploaded_by == owner)
        {
            patch.apply_to(resource);
            changed += 1;
        }
        Ok(changed)
    }

    fn select_reviews(&self, _token: Option<&str>, resource_id: Uuid) -> BackendResult<Vec<Review>> {
        let state = self.lock();
        state.check(Operation::SelectReviews)?;
        let mut rows: Vec<Review> = state
            .reviews
            .iter()
            .filter(|r| r.resource_id == resource_id)
            .cloned()
            .map(|mut r| {
                r.author = state.profiles.get(&r.user_id).map(|p| ReviewAuthor {
                    name: Some(p.name.clone()),
                });
                r
            })
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    fn insert_review(&self, token: &str, review: &NewReview) -> BackendResult<Review> {
        let mut state = self.lock();
        state.check(Operation::InsertReview)?;
        state.user_for(token)?;
        let row = Review {
            id: Uuid::new_v4(),
            resource_id: review.resource_id,
            rating: review.rating,
            comment: review.comment.clone(),
            user_id: review.user_id,
            created_at: OffsetDateTime::now_utc(),
            author: None,
        };
        state.reviews.push(row.clone());
        Ok(row)
    }

    fn upload_object(
        &self,
        token: &str,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        _content_type: &str,
    ) -> BackendResult<()> {
        let mut state = self.lock();
        state.check(Operation::UploadObject)?;
        state.user_for(token)?;
        let key = format!("{bucket}/{path}");
        if state.objects.contains_key(&key) {
            return Err(BackendError::Remote {
                status: 409,
                message: "The resource already exists".into(),
            });
        }
        state.objects.insert(key, bytes);
        Ok(())
    }

    fn public_url(&self, bucket: &str, path: &str) -> BackendResult<String> {
        Ok(format!("{URL_SCHEME}{bucket}/{path}"))
    }

    fn fetch_object(&self, url: &str) -> BackendResult<Vec<u8>> {
        let state = self.lock();
        state.check(Operation::FetchObject)?;
        url.strip_prefix(URL_SCHEME)
            .and_then(|key| state.objects.get(key))
            .cloned()
            .ok_or_else(|| BackendError::NotFound(url.to_string()))
    }

    fn increment_download_count(
        &self,
        _token: Option<&str>,
        resource_id: Uuid,
    ) -> BackendResult<()> {
        let mut state = self.lock();
        state.check(Operation::IncrementDownloads)?;
        if let Some(resource) = state.resources.iter_mut().find(|r| r.id == resource_id) {
            resource.download_count += 1;
        }
        Ok(())
    }

    fn increment_points(&self, token: &str, user_id: Uuid, amount: i64) -> BackendResult<()> {
        let mut state = self.lock();
        state.check(Operation::IncrementPoints)?;
        state.user_for(token)?;
        state.point_awards.push((user_id, amount));
        if let Some(profile) = state.profiles.get_mut(&user_id) {
            profile.points += amount;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::query::tests::resource;

    #[test]
    fn injected_failures_can_be_recovered() {
        let backend = MemoryBackend::new();
        let query = ResourceQuery::by_id(Uuid::new_v4());
        backend.fail(Operation::SelectResources);
        assert!(backend.select_resources(None, &query).is_err());
        backend.recover(Operation::SelectResources);
        assert!(backend.select_resources(None, &query).unwrap().is_empty());
    }

    #[test]
    fn select_joins_uploader_profile() {
        let backend = MemoryBackend::new();
        let row = resource("Notes", "CS");
        let mut profile = UserProfile::placeholder(row.uploaded_by, "u@uni.edu");
        profile.name = "Kiran".into();
        profile.college = "Kengeri Campus".into();
        backend.seed_profile(profile);
        backend.seed_resource(row.clone());

        let rows = backend
            .select_resources(None, &ResourceQuery::by_id(row.id))
            .unwrap();
        assert_eq!(rows[0].uploader_name(), "Kiran");
        assert_eq!(rows[0].owner_college(), "Kengeri Campus");
    }

    #[test]
    fn writes_require_a_known_token() {
        let backend = MemoryBackend::new();
        let err = backend
            .increment_points("bogus", Uuid::new_v4(), 10)
            .unwrap_err();
        assert!(matches!(err, BackendError::Remote { status: 401, .. }));
    }

    #[test]
    fn objects_round_trip_through_public_urls() {
        let backend = MemoryBackend::new();
        let metadata = ProfileMetadata {
            name: "A".into(),
            branch: String::new(),
            college: String::new(),
            department: String::new(),
            program: String::new(),
            semester: None,
            year: None,
        };
        let grant = backend.sign_up("a@uni.edu", "pw", &metadata).unwrap().unwrap();
        backend
            .upload_object(&grant.access_token, "resources", "u/x.pdf", b"pdf".to_vec(), "application/pdf")
            .unwrap();
        let url = backend.public_url("resources", "u/x.pdf").unwrap();
        assert_eq!(backend.fetch_object(&url).unwrap(), b"pdf");
        assert!(matches!(
            backend.fetch_object("memory://resources/missing"),
            Err(BackendError::NotFound(_))
        ));
    }
}
