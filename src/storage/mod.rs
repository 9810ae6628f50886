//! Upload coordination against the file-storage service.
//!
//! DESIGN
//! ======
//! `ObjectStore` is the raw two-call storage API (create object, grant
//! public read). `UploadCoordinator` layers the session and the per-file
//! protocol on top and exposes the `FileUploader` seam the submission
//! orchestrator depends on. Each upload is strictly create-then-grant; the
//! grant is only attempted once the create call hands back an object id.
//!
//! TRADE-OFFS
//! ==========
//! A failed submission leaves any objects it already created in the
//! destination folder. Nothing deletes them.

pub mod auth;
pub mod drive;

use async_trait::async_trait;
use bytes::Bytes;
use serde::Serialize;
use time::OffsetDateTime;

use crate::intake::{FileHandle, FileSlot};
pub use auth::{AccessToken, AuthError, DriveSession, SignIn, StaticTokenSignIn};

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

// =============================================================================
// ERROR
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// Sign-in with the storage service did not produce a usable session.
    #[error("storage authentication failed: {0}")]
    AuthFailed(#[from] AuthError),

    /// The service answered without an object id (or without a link).
    #[error("upload of {name} rejected: {reason}")]
    Rejected { name: String, reason: String },

    /// The HTTP request itself failed.
    #[error("storage request failed: {0}")]
    Request(String),

    /// Non-success status with an unusable body.
    #[error("storage response error: status {status}")]
    Response { status: u16, body: String },

    /// The response body could not be decoded.
    #[error("storage response parse failed: {0}")]
    Parse(String),

    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

// =============================================================================
// WIRE-LEVEL TYPES
// =============================================================================

/// Metadata part of the object-create request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMetadata {
    pub name: String,
    pub mime_type: String,
    pub parents: Vec<String>,
}

/// What the object-create call returned. Either field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreatedObject {
    pub id: Option<String>,
    pub web_view_link: Option<String>,
    /// Service error message, when the body carried one.
    pub error: Option<String>,
}

/// Public link for one uploaded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadResult {
    pub public_view_link: String,
}

/// Raw storage API.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn create_object(
        &self,
        token: &AccessToken,
        metadata: &ObjectMetadata,
        content: Bytes,
    ) -> Result<CreatedObject, UploadError>;

    async fn grant_public_read(&self, token: &AccessToken, object_id: &str) -> Result<(), UploadError>;
}

/// Seam used by the submission orchestrator.
#[async_trait]
pub trait FileUploader: Send + Sync {
    /// Make sure a storage session exists, signing in if needed.
    async fn ensure_authenticated(&self) -> Result<(), UploadError>;

    /// Upload one file under `destination_name` and make it world-readable.
    async fn upload(&self, file: &FileHandle, destination_name: &str) -> Result<UploadResult, UploadError>;
}

// =============================================================================
// COORDINATOR
// =============================================================================

pub struct UploadCoordinator<S> {
    store: S,
    session: DriveSession,
    folder_id: String,
}

impl<S: ObjectStore> UploadCoordinator<S> {
    #[must_use]
    pub fn new(store: S, session: DriveSession, folder_id: impl Into<String>) -> Self {
        Self { store, session, folder_id: folder_id.into() }
    }
}

#[async_trait]
impl<S: ObjectStore> FileUploader for UploadCoordinator<S> {
    async fn ensure_authenticated(&self) -> Result<(), UploadError> {
        self.session.ensure().await?;
        Ok(())
    }

    async fn upload(&self, file: &FileHandle, destination_name: &str) -> Result<UploadResult, UploadError> {
        let token = self.session.ensure().await?;
        let metadata = ObjectMetadata {
            name: destination_name.to_owned(),
            mime_type: file.mime_type.clone(),
            parents: vec![self.folder_id.clone()],
        };

        let created = self
            .store
            .create_object(&token, &metadata, file.content.clone())
            .await?;
        let Some(id) = created.id else {
            return Err(UploadError::Rejected {
                name: destination_name.to_owned(),
                reason: created.error.unwrap_or_else(|| "no object id returned".into()),
            });
        };

        self.store.grant_public_read(&token, &id).await?;

        let public_view_link = created.web_view_link.ok_or_else(|| UploadError::Rejected {
            name: destination_name.to_owned(),
            reason: "no view link returned".into(),
        })?;
        tracing::info!(object_id = %id, name = destination_name, size_bytes = file.size_bytes, "file uploaded");
        Ok(UploadResult { public_view_link })
    }
}

// =============================================================================
// DESTINATION NAMING
// =============================================================================

/// UTC ISO-8601 with millisecond precision, `:` and `.` replaced by `-`.
///
/// `2025-03-04T05:06:07.089Z` becomes `2025-03-04T05-06-07-089Z`.
#[must_use]
pub fn compact_timestamp(at: OffsetDateTime) -> String {
    let utc = at.to_offset(time::UtcOffset::UTC);
    format!(
        "{:04}-{:02}-{:02}T{:02}-{:02}-{:02}-{:03}Z",
        utc.year(),
        u8::from(utc.month()),
        utc.day(),
        utc.hour(),
        utc.minute(),
        utc.second(),
        utc.millisecond(),
    )
}

/// Collapse whitespace runs to `_`.
#[must_use]
pub fn sanitize_user_name(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join("_")
}

/// `{user}_{timestamp}_{role}_{original}`: unique per submission and
/// traceable to the submitter.
#[must_use]
pub fn destination_name(user_name: &str, at: OffsetDateTime, slot: FileSlot, original_name: &str) -> String {
    format!("{}_{}_{}_{}", sanitize_user_name(user_name), compact_timestamp(at), slot.role(), original_name)
}
