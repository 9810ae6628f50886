//! `EmailJS` REST client.
//!
//! Posts to `/api/v1.0/email/send` with the account's public key. The
//! endpoint answers `200 OK` with a plain-text body; anything else is a
//! rejection.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use super::{DispatchError, NotificationDispatcher, TemplateParams};

pub const DEFAULT_BASE_URL: &str = "https://api.emailjs.com";
const SEND_PATH: &str = "/api/v1.0/email/send";

pub struct EmailJsClient {
    http: reqwest::Client,
    base_url: String,
    public_key: String,
    private_key: Option<String>,
}

impl EmailJsClient {
    /// # Errors
    ///
    /// Returns [`DispatchError::HttpClientBuild`] if the HTTP client fails.
    pub fn new(
        base_url: &str,
        public_key: String,
        private_key: Option<String>,
        connect_timeout: Duration,
    ) -> Result<Self, DispatchError> {
        let http = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| DispatchError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: base_url.trim_end_matches('/').to_string(), public_key, private_key })
    }

    fn send_url(&self) -> String {
        format!("{}{SEND_PATH}", self.base_url)
    }

    fn build_request<'a>(&'a self, service_id: &'a str, template_id: &'a str, params: &'a TemplateParams) -> SendRequest<'a> {
        SendRequest {
            service_id,
            template_id,
            user_id: &self.public_key,
            access_token: self.private_key.as_deref(),
            template_params: params,
        }
    }
}

#[async_trait]
impl NotificationDispatcher for EmailJsClient {
    async fn send(&self, service_id: &str, template_id: &str, params: &TemplateParams) -> Result<(), DispatchError> {
        let body = self.build_request(service_id, template_id, params);
        let response = self
            .http
            .post(self.send_url())
            .json(&body)
            .send()
            .await
            .map_err(|e| DispatchError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| DispatchError::Request(e.to_string()))?;
        check_send_response(status, text)
    }
}

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    #[serde(rename = "accessToken", skip_serializing_if = "Option::is_none")]
    access_token: Option<&'a str>,
    template_params: &'a TemplateParams,
}

fn check_send_response(status: u16, body: String) -> Result<(), DispatchError> {
    if (200..300).contains(&status) { Ok(()) } else { Err(DispatchError::Rejected { status, body }) }
}

#[cfg(test)]
#[path = "emailjs_test.rs"]
mod tests;
