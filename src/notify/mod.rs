//! Notification dispatch boundary.
//!
//! DESIGN
//! ======
//! The mail service is opaque: a service id, a template id and a flat
//! string map go in, success or failure comes out. Template rendering is
//! the provider's business.

pub mod emailjs;

use std::collections::BTreeMap;

use async_trait::async_trait;

/// Flat template parameters handed to the mail provider.
pub type TemplateParams = BTreeMap<String, String>;

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("notification request failed: {0}")]
    Request(String),
    #[error("notification rejected: status {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

/// Which provider service and template a message goes through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchTarget {
    pub service_id: String,
    pub template_id: String,
}

#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    async fn send(&self, service_id: &str, template_id: &str, params: &TemplateParams) -> Result<(), DispatchError>;
}

// =============================================================================
// TEST HELPERS
// =============================================================================
