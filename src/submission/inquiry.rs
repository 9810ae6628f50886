//! Quick inquiry from the contact section.
//!
//! A plain message with no files or area. It goes through the same mail
//! template as an analysis request, with fixed markers in the fields that
//! do not apply.

use std::sync::Arc;

use crate::contact::{is_valid_email, trim_field};
use crate::notify::{DispatchError, DispatchTarget, NotificationDispatcher};
use crate::view::{BusyControl, ControlId, FormView, Notice};

use super::payload::{NOT_SPECIFIED, SubmissionPayload, or_sentinel};

#[cfg(test)]
#[path = "inquiry_test.rs"]
mod tests;

pub const BUSY_LABEL: &str = "Enviando...";
pub const INQUIRY_FILE_LINKS: &str = "Consulta desde formulario de contacto";
pub const INQUIRY_MAP_COORDINATES: &str = "No aplica";
pub const SUCCESS_MESSAGE: &str = "¡Mensaje enviado exitosamente! Te responderemos en menos de 24 horas.";
pub const FAILURE_MESSAGE: &str = "Hubo un error al enviar el mensaje. Por favor intenta de nuevo o contáctanos directamente a info@hypersatelliteapp.com";

#[derive(Debug, thiserror::Error)]
pub enum InquiryError {
    #[error("required fields missing")]
    MissingField,
    #[error("invalid email format")]
    InvalidEmailFormat,
    #[error("notification dispatch failed: {0}")]
    DispatchFailed(#[from] DispatchError),
}

impl InquiryError {
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::MissingField => "Por favor completa todos los campos obligatorios (*)",
            Self::InvalidEmailFormat => "Por favor ingresa un email válido",
            Self::DispatchFailed(_) => FAILURE_MESSAGE,
        }
    }
}

/// Contact-section form fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InquiryForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
}

impl InquiryForm {
    fn validate(&self) -> Result<(), InquiryError> {
        if [&self.name, &self.email, &self.message].iter().any(|v| trim_field(v).is_empty()) {
            return Err(InquiryError::MissingField);
        }
        if !is_valid_email(trim_field(&self.email)) {
            return Err(InquiryError::InvalidEmailFormat);
        }
        Ok(())
    }

    fn to_payload(&self) -> SubmissionPayload {
        SubmissionPayload {
            user_name: trim_field(&self.name).to_owned(),
            user_email: trim_field(&self.email).to_owned(),
            user_phone: or_sentinel(&self.phone, NOT_SPECIFIED),
            hectares: NOT_SPECIFIED.to_owned(),
            file_links: INQUIRY_FILE_LINKS.to_owned(),
            map_coordinates: INQUIRY_MAP_COORDINATES.to_owned(),
            comments: trim_field(&self.message).to_owned(),
        }
    }
}

pub struct InquiryService {
    dispatcher: Arc<dyn NotificationDispatcher>,
    view: Arc<dyn FormView>,
    target: DispatchTarget,
}

impl InquiryService {
    #[must_use]
    pub fn new(dispatcher: Arc<dyn NotificationDispatcher>, view: Arc<dyn FormView>, target: DispatchTarget) -> Self {
        Self { dispatcher, view, target }
    }

    /// Validate and send an inquiry; the form is cleared only on success.
    ///
    /// # Errors
    ///
    /// Validation failures leave the control untouched; dispatch failures
    /// restore it. Both show a notice.
    pub async fn submit(&self, form: &mut InquiryForm) -> Result<(), InquiryError> {
        let result = self.send(form).await;
        match &result {
            Ok(()) => {
                tracing::info!("inquiry sent");
                self.view.notify(Notice::success(SUCCESS_MESSAGE));
                *form = InquiryForm::default();
            }
            Err(err @ InquiryError::DispatchFailed(_)) => {
                tracing::error!(error = %err, "inquiry dispatch failed");
                self.view.notify(Notice::error(err.user_message()));
            }
            Err(err) => self.view.notify(Notice::warning(err.user_message())),
        }
        result
    }

    async fn send(&self, form: &InquiryForm) -> Result<(), InquiryError> {
        form.validate()?;
        let _busy = BusyControl::engage(Arc::clone(&self.view), ControlId::InquirySubmit, BUSY_LABEL);
        let params = form.to_payload().to_params();
        self.dispatcher
            .send(&self.target.service_id, &self.target.template_id, &params)
            .await?;
        Ok(())
    }
}
