//! Google Drive v3 client.
//!
//! Thin HTTP wrapper for the multipart object-create and permission-grant
//! endpoints. Response handling lives in pure functions for testability.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};

use super::{AccessToken, CreatedObject, ObjectMetadata, ObjectStore, UploadError};

pub const DEFAULT_UPLOAD_BASE_URL: &str = "https://www.googleapis.com/upload/drive/v3";
pub const DEFAULT_API_BASE_URL: &str = "https://www.googleapis.com/drive/v3";
const CREATE_FIELDS: &str = "id,webViewLink,webContentLink";
const API_KEY_HEADER: &str = "x-goog-api-key";

// =============================================================================
// CLIENT
// =============================================================================

pub struct DriveClient {
    http: reqwest::Client,
    upload_base_url: String,
    api_base_url: String,
    api_key: Option<String>,
}

impl DriveClient {
    /// Build a client. Only a connect timeout is applied; requests run to
    /// the connection's natural completion.
    ///
    /// # Errors
    ///
    /// Returns [`UploadError::HttpClientBuild`] if the HTTP client fails.
    pub fn new(
        upload_base_url: &str,
        api_base_url: &str,
        api_key: Option<String>,
        connect_timeout: Duration,
    ) -> Result<Self, UploadError> {
        let http = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| UploadError::HttpClientBuild(e.to_string()))?;
        Ok(Self {
            http,
            upload_base_url: upload_base_url.trim_end_matches('/').to_string(),
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn create_url(&self) -> String {
        format!("{}/files?uploadType=multipart&fields={CREATE_FIELDS}", self.upload_base_url)
    }

    fn permissions_url(&self, object_id: &str) -> String {
        format!("{}/files/{object_id}/permissions", self.api_base_url)
    }

    /// Bearer token plus the API key header; the key stays out of the URL.
    fn authorize(&self, request: reqwest::RequestBuilder, token: &AccessToken) -> reqwest::RequestBuilder {
        let request = request.bearer_auth(&token.value);
        match &self.api_key {
            Some(key) => request.header(API_KEY_HEADER, key),
            None => request,
        }
    }
}

fn transport_error(err: reqwest::Error) -> UploadError {
    UploadError::Request(err.without_url().to_string())
}

#[async_trait]
impl ObjectStore for DriveClient {
    async fn create_object(
        &self,
        token: &AccessToken,
        metadata: &ObjectMetadata,
        content: Bytes,
    ) -> Result<CreatedObject, UploadError> {
        let meta_json = serde_json::to_vec(metadata).map_err(|e| UploadError::Parse(e.to_string()))?;
        let meta_part = Part::bytes(meta_json)
            .mime_str("application/json")
            .map_err(|e| UploadError::Request(e.to_string()))?;
        let file_part = Part::stream(content)
            .file_name(metadata.name.clone())
            .mime_str(&metadata.mime_type)
            .map_err(|e| UploadError::Request(e.to_string()))?;
        let form = Form::new().part("metadata", meta_part).part("file", file_part);

        let response = self
            .authorize(self.http.post(self.create_url()), token)
            .multipart(form)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status().as_u16();
        let text = response.text().await.map_err(transport_error)?;
        parse_create_response(status, &text)
    }

    async fn grant_public_read(&self, token: &AccessToken, object_id: &str) -> Result<(), UploadError> {
        let response = self
            .authorize(self.http.post(self.permissions_url(object_id)), token)
            .json(&PermissionRequest::public_reader())
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status().as_u16();
        if (200..300).contains(&status) {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(UploadError::Response { status, body })
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Debug, Serialize, PartialEq, Eq)]
pub(crate) struct PermissionRequest {
    role: &'static str,
    #[serde(rename = "type")]
    grantee: &'static str,
}

impl PermissionRequest {
    pub(crate) fn public_reader() -> Self {
        Self { role: "reader", grantee: "anyone" }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateResponse {
    id: Option<String>,
    web_view_link: Option<String>,
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
}

/// Decode an object-create response.
///
/// Success is decided by the presence of an `id`, not by the status code:
/// any JSON body becomes a `CreatedObject` and the caller checks the id.
/// A non-JSON body is a `Response` error for non-2xx statuses and a
/// `Parse` error otherwise.
pub(crate) fn parse_create_response(status: u16, text: &str) -> Result<CreatedObject, UploadError> {
    match serde_json::from_str::<CreateResponse>(text) {
        Ok(body) => Ok(CreatedObject {
            id: body.id.filter(|id| !id.is_empty()),
            web_view_link: body.web_view_link,
            error: body.error.and_then(|e| e.message),
        }),
        Err(_) if !(200..300).contains(&status) => Err(UploadError::Response { status, body: text.to_owned() }),
        Err(e) => Err(UploadError::Parse(e.to_string())),
    }
}

#[cfg(test)]
#[path = "drive_test.rs"]
mod tests;
