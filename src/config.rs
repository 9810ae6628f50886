//! Runtime configuration parsed from environment variables.

use std::time::Duration;

use crate::notify::{DispatchTarget, emailjs};
use crate::storage::drive;

pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {var}")]
    Missing { var: &'static str },
    #[error("invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailJsConfig {
    pub base_url: String,
    pub public_key: String,
    pub private_key: Option<String>,
    pub target: DispatchTarget,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriveConfig {
    pub upload_base_url: String,
    pub api_base_url: String,
    pub folder_id: Option<String>,
    pub api_key: Option<String>,
    pub client_id: Option<String>,
    pub access_token: Option<String>,
}

impl DriveConfig {
    /// Destination folder, required once there is something to upload.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] when `DRIVE_FOLDER_ID` is unset.
    pub fn require_folder(&self) -> Result<&str, ConfigError> {
        self.folder_id.as_deref().ok_or(ConfigError::Missing { var: "DRIVE_FOLDER_ID" })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapiaConfig {
    pub emailjs: EmailJsConfig,
    pub drive: DriveConfig,
    pub connect_timeout: Duration,
}

impl MapiaConfig {
    /// Build typed config from the process environment.
    ///
    /// Required:
    /// - `EMAILJS_PUBLIC_KEY`, `EMAILJS_SERVICE_ID`, `EMAILJS_TEMPLATE_ID`
    ///
    /// Optional:
    /// - `EMAILJS_PRIVATE_KEY`: sent as `accessToken` when set
    /// - `EMAILJS_BASE_URL`: default `https://api.emailjs.com`
    /// - `DRIVE_FOLDER_ID`: required only when files are uploaded
    /// - `DRIVE_API_KEY`, `DRIVE_CLIENT_ID`, `DRIVE_ACCESS_TOKEN`
    /// - `DRIVE_UPLOAD_BASE_URL`, `DRIVE_API_BASE_URL`: Google defaults
    /// - `HTTP_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for missing or unparsable values.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Self::from_env`] over an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for missing or unparsable values.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let optional = |key: &str| lookup(key).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());
        let required = |var: &'static str| optional(var).ok_or(ConfigError::Missing { var });
        let base_url = |var: &str, default: &str| {
            optional(var).unwrap_or_else(|| default.to_owned()).trim_end_matches('/').to_owned()
        };

        let emailjs = EmailJsConfig {
            base_url: base_url("EMAILJS_BASE_URL", emailjs::DEFAULT_BASE_URL),
            public_key: required("EMAILJS_PUBLIC_KEY")?,
            private_key: optional("EMAILJS_PRIVATE_KEY"),
            target: DispatchTarget {
                service_id: required("EMAILJS_SERVICE_ID")?,
                template_id: required("EMAILJS_TEMPLATE_ID")?,
            },
        };

        let drive = DriveConfig {
            upload_base_url: base_url("DRIVE_UPLOAD_BASE_URL", drive::DEFAULT_UPLOAD_BASE_URL),
            api_base_url: base_url("DRIVE_API_BASE_URL", drive::DEFAULT_API_BASE_URL),
            folder_id: optional("DRIVE_FOLDER_ID"),
            api_key: optional("DRIVE_API_KEY"),
            client_id: optional("DRIVE_CLIENT_ID"),
            access_token: optional("DRIVE_ACCESS_TOKEN"),
        };

        let connect_secs =
            env_parse_u64(optional("HTTP_CONNECT_TIMEOUT_SECS"), "HTTP_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS)?;

        Ok(Self { emailjs, drive, connect_timeout: Duration::from_secs(connect_secs) })
    }
}

fn env_parse_u64(raw: Option<String>, var: &'static str, default: u64) -> Result<u64, ConfigError> {
    match raw {
        None => Ok(default),
        Some(v) => v.parse::<u64>().map_err(|e| ConfigError::Invalid { var, reason: format!("{v:?}: {e}") }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
