// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Signed-in session: access token plus the viewer's profile.
//!
//! A [`Session`] is an explicit value owned by the application model and
//! cloned into each command that needs it; nothing here is global.

use tracing::{info, warn};
use uuid::Uuid;

use crate::backend::{AuthGrant, Backend, BackendResult};
use crate::models::user::{ProfileMetadata, UserProfile, Viewer};

/// Authenticated user context.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    access_token: String,
    refresh_token: Option<String>,
    profile: UserProfile,
}

impl Session {
    pub fn new(access_token: String, refresh_token: Option<String>, profile: UserProfile) -> Self {
        Self {
            access_token,
            refresh_token,
            profile,
        }
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn user_id(&self) -> Uuid {
        self.profile.id
    }

    pub fn viewer(&self) -> Viewer {
        self.profile.viewer()
    }

    /// Replace the cached profile, e.g. after points were awarded.
    pub fn set_profile(&mut self, profile: UserProfile) {
        self.profile = profile;
    }
}

/// Turn an auth grant into a session by loading the matching `users` row.
///
/// A missing row degrades to a placeholder profile rather than failing sign-in.
fn establish(backend: &dyn Backend, grant: AuthGrant) -> BackendResult<Session> {
    let email = grant.user.email.clone().unwrap_or_default();
    let profile = match backend.fetch_profile(&grant.access_token, grant.user.id)? {
        Some(profile) => profile,
        None => {
            warn!(user = %grant.user.id, "no profile row for user, using placeholder");
            UserProfile::placeholder(grant.user.id, &email)
        }
    };
    Ok(Session::new(grant.access_token, grant.refresh_token, profile))
}

/// Sign in with email and password.
pub fn sign_in(backend: &dyn Backend, email: &str, password: &str) -> BackendResult<Session> {
    let grant = backend.sign_in(email, password)?;
    info!(user = %grant.user.id, "signed in");
    establish(backend, grant)
}

/// Register an account. Returns `None` when the provider asks for email confirmation first.
pub fn sign_up(
    backend: &dyn Backend,
    email: &str,
    password: &str,
    metadata: &ProfileMetadata,
) -> BackendResult<Option<Session>> {
    match backend.sign_up(email, password, metadata)? {
        Some(grant) => {
            info!(user = %grant.user.id, "registered and signed in");
            establish(backend, grant).map(Some)
        }
        None => {
            info!("registered, awaiting email confirmation");
            Ok(None)
        }
    }
}

pub fn sign_out(backend: &dyn Backend, session: &Session) -> BackendResult<()> {
    backend.sign_out(session.access_token())?;
    info!(user = %session.user_id(), "signed out");
    Ok(())
}

/// Resolve a stored access token back into a session.
pub fn restore(backend: &dyn Backend, access_token: &str) -> BackendResult<Session> {
    let user = backend.current_user(access_token)?;
    establish(
        backend,
        AuthGrant {
            access_token: access_token.to_string(),
            refresh_token: None,
            user,
        },
    )
}

/// Reload the profile row behind a session.
pub fn refresh_profile(backend: &dyn Backend, session: &Session) -> BackendResult<Option<UserProfile>> {
    backend.fetch_profile(session.access_token(), session.user_id())
}
