// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Blocking HTTP client for a Supabase-style hosted backend.
//!
//! Endpoints used:
//! - `/rest/v1/<table>` and `/rest/v1/rpc/<function>` (PostgREST)
//! - `/storage/v1/object/<bucket>/<path>` and its `public/` counterpart
//! - `/auth/v1/{token,signup,logout,user}` (GoTrue)

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;
use url::Url;
use uuid::Uuid;

use super::{AuthGrant, AuthUser, Backend, BackendError, BackendResult};
use crate::logic::query::ResourceQuery;
use crate::models::resource::{NewResource, Resource, ResourcePatch};
use crate::models::review::{NewReview, Review};
use crate::models::user::{ProfileMetadata, UserProfile};

const RETURN_REPRESENTATION: &str = "return=representation";

/// GoTrue token / sign-up response. Sign-up may return a bare user when confirmation is pending.
#[derive(Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    user: Option<AuthUser>,
}

/// REST implementation of [`Backend`].
pub struct RestBackend {
    client: Client,
    base: Url,
    anon_key: String,
}

impl RestBackend {
    /// Build a client for the project at `base` using the public anon key.
    pub fn new(base: Url, anon_key: impl Into<String>) -> BackendResult<Self> {
        Ok(Self {
            client: Client::builder().build()?,
            base,
            anon_key: anon_key.into(),
        })
    }

    fn endpoint(&self, path: &str) -> BackendResult<Url> {
        Ok(self.base.join(path)?)
    }

    /// Attach the project key and a bearer token (the anon key when signed out).
    fn authorize(&self, builder: RequestBuilder, token: Option<&str>) -> RequestBuilder {
        builder
            .header("apikey", &self.anon_key)
            .bearer_auth(token.unwrap_or(self.anon_key.as_str()))
    }

    fn get(&self, path: &str, token: Option<&str>) -> BackendResult<RequestBuilder> {
        Ok(self.authorize(self.client.get(self.endpoint(path)?), token))
    }

    fn post(&self, path: &str, token: Option<&str>) -> BackendResult<RequestBuilder> {
        Ok(self.authorize(self.client.post(self.endpoint(path)?), token))
    }

    fn patch(&self, path: &str, token: Option<&str>) -> BackendResult<RequestBuilder> {
        Ok(self.authorize(self.client.patch(self.endpoint(path)?), token))
    }

    fn rpc(&self, function: &str, token: Option<&str>, args: Value) -> BackendResult<()> {
        let path = format!("rest/v1/rpc/{function}");
        send(self.post(&path, token)?.json(&args))?;
        Ok(())
    }

    fn grant_from(response: TokenResponse) -> Option<AuthGrant> {
        match (response.access_token, response.user) {
            (Some(access_token), Some(user)) => Some(AuthGrant {
                access_token,
                refresh_token: response.refresh_token,
                user,
            }),
            _ => None,
        }
    }
}

/// Send a request and turn non-success statuses into [`BackendError::Remote`].
fn send(builder: RequestBuilder) -> BackendResult<Response> {
    let response = builder.send()?;
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    Err(BackendError::Remote {
        status: status.as_u16(),
        message: provider_message(&body).unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string()
        }),
    })
}

/// Pull the human-readable message out of a provider error body.
///
/// Bodies that are not JSON (proxy pages, plain text) are returned trimmed.
fn provider_message(body: &str) -> Option<String> {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| {
            ["message", "msg", "error_description", "error"]
                .iter()
                .find_map(|key| value.get(key).and_then(Value::as_str))
                .map(str::to_string)
        })
        .or_else(|| (!body.trim().is_empty()).then(|| body.trim().to_string()))
}

impl Backend for RestBackend {
    fn sign_in(&self, email: &str, password: &str) -> BackendResult<AuthGrant> {
        let builder = self
            .post("auth/v1/token", None)?
            .query(&[("grant_type", "password")])
            .json(&json!({ "email": email, "password": password }));
        let response: TokenResponse = send(builder)?.json()?;
        Self::grant_from(response).ok_or_else(|| BackendError::Remote {
            status: 200,
            message: "Sign-in response carried no session".into(),
        })
    }

    fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: &ProfileMetadata,
    ) -> BackendResult<Option<AuthGrant>> {
        let builder = self.post("auth/v1/signup", None)?.json(&json!({
            "email": email,
            "password": password,
            "data": metadata,
        }));
        let response: TokenResponse = send(builder)?.json()?;
        Ok(Self::grant_from(response))
    }

    fn sign_out(&self, token: &str) -> BackendResult<()> {
        send(self.post("auth/v1/logout", Some(token))?)?;
        Ok(())
    }

    fn current_user(&self, token: &str) -> BackendResult<AuthUser> {
        Ok(send(self.get("auth/v1/user", Some(token))?)?.json()?)
    }

    fn fetch_profile(&self, token: &str, user_id: Uuid) -> BackendResult<Option<UserProfile>> {
        let builder = self
            .get("rest/v1/users", Some(token))?
            .query(&[("select", "*".to_string()), ("id", format!("eq.{user_id}"))]);
        let rows: Vec<UserProfile> = send(builder)?.json()?;
        Ok(rows.into_iter().next())
    }

    fn select_resources(
        &self,
        token: Option<&str>,
        query: &ResourceQuery,
    ) -> BackendResult<Vec<Resource>> {
        let pairs = query.to_query_pairs();
        debug!(?pairs, "selecting resources");
        let builder = self.get("rest/v1/resources", token)?.query(&pairs);
        Ok(send(builder)?.json()?)
    }

    fn insert_resource(&self, token: &str, row: &NewResource) -> BackendResult<Resource> {
        let builder = self
            .post("rest/v1/resources", Some(token))?
            .query(&[("select", crate::logic::query::LISTING_SELECT)])
            .header("Prefer", RETURN_REPRESENTATION)
            .json(&[row]);
        let rows: Vec<Resource> = send(builder)?.json()?;
        rows.into_iter()
            .next()
            .ok_or_else(|| BackendError::NotFound("inserted resource".into()))
    }

    fn update_resource(
        &self,
        token: &str,
        id: Uuid,
        owner: Uuid,
        patch: &ResourcePatch,
    ) -> BackendResult<usize> {
        let builder = self
            .patch("rest/v1/resources", Some(token))?
            .query(&[
                ("id", format!("eq.{id}")),
                ("uploaded_by", format!("eq.{owner}")),
            ])
            .header("Prefer", RETURN_REPRESENTATION)
            .json(patch);
        let rows: Vec<Value> = send(builder)?.json()?;
        Ok(rows.len())
    }

    fn select_reviews(&self, token: Option<&str>, resource_id: Uuid) -> BackendResult<Vec<Review>> {
        let builder = self.get("rest/v1/reviews", token)?.query(&[
            ("select", "*,users(name)".to_string()),
            ("resource_id", format!("eq.{resource_id}")),
            ("order", "created_at.desc".to_string()),
        ]);
        Ok(send(builder)?.json()?)
    }

    fn insert_review(&self, token: &str, review: &NewReview) -> BackendResult<Review> {
        let builder = self
            .post("rest/v1/reviews", Some(token))?
            .header("Prefer", RETURN_REPRESENTATION)
            .json(&[review]);
        let rows: Vec<Review> = send(builder)?.json()?;
        rows.into_iter()
            .next()
            .ok_or_else(|| BackendError::NotFound("inserted review".into()))
    }

    fn upload_object(
        &self,
        token: &str,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> BackendResult<()> {
        let content_type = HeaderValue::from_str(content_type)
            .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"));
        let builder = self
            .post(&format!("storage/v1/object/{bucket}/{path}"), Some(token))?
            .header(CONTENT_TYPE, content_type)
            .body(bytes);
        send(builder)?;
        Ok(())
    }

    fn public_url(&self, bucket: &str, path: &str) -> BackendResult<String> {
        Ok(self
            .endpoint(&format!("storage/v1/object/public/{bucket}/{path}"))?
            .to_string())
    }

    fn fetch_object(&self, url: &str) -> BackendResult<Vec<u8>> {
        let response = send(self.client.get(url))?;
        Ok(response.bytes()?.to_vec())
    }

    fn increment_download_count(
        &self,
        token: Option<&str>,
        resource_id: Uuid,
    ) -> BackendResult<()> {
        self.rpc(
            "increment_download_count",
            token,
            json!({ "resource_id": resource_id }),
        )
    }

    fn increment_points(&self, token: &str, user_id: Uuid, amount: i64) -> BackendResult<()> {
        self.rpc(
            "increment_points",
            Some(token),
            json!({ "user_id": user_id, "points_to_add": amount }),
        )
    }
}
