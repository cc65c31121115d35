//! services/console/src/adapters/http.rs
//!
//! This module contains the REST adapter for the profiles backend. It implements
//! the `ProfileRepository` and `PhotoRepository` ports from the `core` crate
//! using `reqwest`, sending multipart forms for writes and JSON for reads.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, StatusCode, Url};
use roster_core::domain::{PhotoRef, Profile, ProfileDraft, ProfileId};
use roster_core::ports::{PhotoRepository, PortError, PortResult, ProfileRepository};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements the profile and photo ports over HTTP.
#[derive(Clone)]
pub struct HttpProfileAdapter {
    client: Client,
    base_url: Url,
}

impl HttpProfileAdapter {
    /// Creates a new `HttpProfileAdapter` rooted at `base_url`.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    /// Uses an existing client, e.g. one shared with other adapters.
    pub fn with_client(client: Client, mut base_url: Url) -> Self {
        // `Url::join` treats the last segment as a file unless it ends in '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self { client, base_url }
    }

    /// `{base}/{segments...}` with each segment percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> PortResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| PortError::Unexpected(format!("{} cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn profile_url(&self, id: &ProfileId) -> PortResult<Url> {
        self.endpoint(&["api", "profiles", id.as_str()])
    }
}

//=========================================================================================
// Wire Helpers
//=========================================================================================

/// The JSON body the backend returns alongside a non-success status.
#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

fn transport_error(err: reqwest::Error) -> PortError {
    PortError::Network(err.to_string())
}

/// Passes successful responses through and turns the rest into port errors.
/// A 404 only means "no such profile" when a specific profile was targeted.
async fn check_status(response: Response, target: Option<&ProfileId>) -> PortResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let fallback = status.canonical_reason().unwrap_or("request failed").to_string();
    let message = response
        .json::<ErrorBody>()
        .await
        .map(|body| body.error)
        .unwrap_or(fallback);

    match (status, target) {
        (StatusCode::NOT_FOUND, Some(id)) => {
            Err(PortError::NotFound(format!("Profile {}: {}", id, message)))
        }
        _ => Err(PortError::Server {
            status: status.as_u16(),
            message,
        }),
    }
}

async fn read_profile(response: Response) -> PortResult<Profile> {
    response
        .json::<Profile>()
        .await
        .map_err(|e| PortError::Unexpected(format!("Invalid profile payload: {}", e)))
}

/// Builds the multipart body shared by create and update. Days are sent as
/// repeated `availableDays` fields in canonical order.
fn draft_form(draft: &ProfileDraft) -> PortResult<Form> {
    let mut form = Form::new()
        .text("firstName", draft.first_name.clone())
        .text("lastName", draft.last_name.clone())
        .text("email", draft.email.clone())
        .text("phone", draft.phone.clone())
        .text("kin1", draft.kin1.clone().unwrap_or_default())
        .text("kin2", draft.kin2.clone().unwrap_or_default())
        .text("gender", draft.gender.map(|g| g.as_str()).unwrap_or(""));
    for day in draft.available_days.iter() {
        form = form.text("availableDays", day.as_str());
    }
    if let Some(photo) = &draft.photo {
        let part = Part::stream_with_length(photo.bytes.clone(), photo.bytes.len() as u64)
            .file_name(photo.file_name.clone())
            .mime_str(&photo.content_type)
            .map_err(|e| PortError::Unexpected(format!("Invalid photo content type: {}", e)))?;
        form = form.part("photo", part);
    }
    Ok(form)
}

//=========================================================================================
// `ProfileRepository` Trait Implementation
//=========================================================================================

#[async_trait]
impl ProfileRepository for HttpProfileAdapter {
    async fn list_profiles(&self) -> PortResult<Vec<Profile>> {
        let url = self.endpoint(&["api", "profiles"])?;
        debug!(%url, "GET profiles");
        let response = self.client.get(url).send().await.map_err(transport_error)?;
        let response = check_status(response, None).await?;
        response
            .json::<Vec<Profile>>()
            .await
            .map_err(|e| PortError::Unexpected(format!("Invalid profile list payload: {}", e)))
    }

    async fn create_profile(&self, draft: &ProfileDraft) -> PortResult<Profile> {
        let url = self.endpoint(&["api", "profiles"])?;
        debug!(%url, "POST profile");
        let response = self
            .client
            .post(url)
            .multipart(draft_form(draft)?)
            .send()
            .await
            .map_err(transport_error)?;
        read_profile(check_status(response, None).await?).await
    }

    async fn update_profile(&self, id: &ProfileId, draft: &ProfileDraft) -> PortResult<Profile> {
        let url = self.profile_url(id)?;
        debug!(%url, "PUT profile");
        let response = self
            .client
            .put(url)
            .multipart(draft_form(draft)?)
            .send()
            .await
            .map_err(transport_error)?;
        read_profile(check_status(response, Some(id)).await?).await
    }

    async fn delete_profile(&self, id: &ProfileId) -> PortResult<()> {
        let url = self.profile_url(id)?;
        debug!(%url, "DELETE profile");
        let response = self.client.delete(url).send().await.map_err(transport_error)?;
        check_status(response, Some(id)).await?;
        Ok(())
    }
}

//=========================================================================================
// `PhotoRepository` Trait Implementation
//=========================================================================================

#[async_trait]
impl PhotoRepository for HttpProfileAdapter {
    fn photo_url(&self, photo: &PhotoRef) -> PortResult<String> {
        Ok(self.endpoint(&["uploads", photo.filename()])?.to_string())
    }

    async fn fetch_photo(&self, photo: &PhotoRef) -> PortResult<Bytes> {
        let url = self.endpoint(&["uploads", photo.filename()])?;
        debug!(%url, "GET photo");
        let response = self.client.get(url).send().await.map_err(transport_error)?;
        let response = check_status(response, None).await?;
        response.bytes().await.map_err(transport_error)
    }
}
