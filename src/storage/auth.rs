//! Storage session and sign-in.
//!
//! `DriveSession::ensure` is idempotent: while a non-expired token is held it
//! returns it without touching the `SignIn` port.

use std::sync::Arc;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::Mutex;

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("no access token configured")]
    MissingToken,
    #[error("sign-in declined: {0}")]
    Declined(String),
    #[error("sign-in prompt failed: {0}")]
    Prompt(#[from] std::io::Error),
}

/// Bearer token for the storage API.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub value: String,
    pub expires_at: Option<OffsetDateTime>,
}

impl AccessToken {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self { value: value.into(), expires_at: None }
    }

    #[must_use]
    pub fn is_valid_at(&self, now: OffsetDateTime) -> bool {
        !self.value.is_empty() && self.expires_at.is_none_or(|exp| exp > now)
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("value", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Interactive (or pre-provisioned) sign-in with the storage provider.
#[async_trait]
pub trait SignIn: Send + Sync {
    async fn sign_in(&self) -> Result<AccessToken, AuthError>;
}

/// Sign-in backed by a token supplied through configuration.
pub struct StaticTokenSignIn {
    token: Option<String>,
}

impl StaticTokenSignIn {
    #[must_use]
    pub fn new(token: Option<String>) -> Self {
        Self { token }
    }
}

#[async_trait]
impl SignIn for StaticTokenSignIn {
    async fn sign_in(&self) -> Result<AccessToken, AuthError> {
        match self.token.as_deref().map(str::trim) {
            Some(t) if !t.is_empty() => Ok(AccessToken::new(t)),
            _ => Err(AuthError::MissingToken),
        }
    }
}

// =============================================================================
// SESSION
// =============================================================================

pub struct DriveSession {
    sign_in: Arc<dyn SignIn>,
    token: Mutex<Option<AccessToken>>,
}

impl DriveSession {
    #[must_use]
    pub fn new(sign_in: Arc<dyn SignIn>) -> Self {
        Self { sign_in, token: Mutex::new(None) }
    }

    /// Return the current token, signing in first when there is none or it
    /// has expired.
    ///
    /// # Errors
    ///
    /// Propagates the sign-in failure; the session stays signed out.
    pub async fn ensure(&self) -> Result<AccessToken, AuthError> {
        let mut guard = self.token.lock().await;
        if let Some(token) = guard.as_ref().filter(|t| t.is_valid_at(OffsetDateTime::now_utc())) {
            return Ok(token.clone());
        }
        tracing::info!("signing in to storage service");
        let token = self.sign_in.sign_in().await?;
        if !token.is_valid_at(OffsetDateTime::now_utc()) {
            return Err(AuthError::Declined("sign-in returned an unusable token".into()));
        }
        Ok(guard.insert(token).clone())
    }

    /// Drop the cached token so the next `ensure` signs in again.
    pub async fn sign_out(&self) {
        *self.token.lock().await = None;
    }

    pub async fn is_signed_in(&self) -> bool {
        self.token
            .lock()
            .await
            .as_ref()
            .is_some_and(|t| t.is_valid_at(OffsetDateTime::now_utc()))
    }
}
