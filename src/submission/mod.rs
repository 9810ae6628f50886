//! Submission orchestrator: the analysis-request state machine.
//!
//! ARCHITECTURE
//! ============
//! The orchestrator owns the whole form session (contact, files, area,
//! free-text details) and is the only writer of it. UI events call its
//! methods; `submit` runs the pipeline:
//!
//! ```text
//! Idle → Validating → [Authenticating → Uploading] → Dispatching → Idle
//! ```
//!
//! Any failure after `Validating` returns to `Idle` with the session intact
//! so the user can retry without re-entering anything.
//!
//! TRADE-OFFS
//! ==========
//! `submit` takes `&mut self`, which makes a second concurrent submission
//! unrepresentable. Uploads are sequential (image, then vector) and
//! fail-fast; objects created before a failure are not cleaned up.

pub mod inquiry;
pub mod payload;

use std::sync::Arc;

use time::OffsetDateTime;
use uuid::Uuid;

use crate::area::{AreaError, AreaSelector, DrawingSurface, DrawnShape};
use crate::contact::{ContactError, ContactForm, ContactInfo};
use crate::intake::{FileHandle, FileIntake, FileSlot, IntakeError};
use crate::notify::{DispatchError, DispatchTarget, NotificationDispatcher};
use crate::storage::{self, AuthError, FileUploader, UploadError};
use crate::view::{BusyControl, ControlId, FormView, Notice, StatusSlot};
pub use payload::{FileLinks, RequestDetails, SubmissionPayload};

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

pub const BUSY_LABEL: &str = "Procesando...";
pub const SUCCESS_MESSAGE: &str = "¡Solicitud enviada exitosamente! Recibirás una respuesta en menos de 24 horas.";
pub const FAILURE_MESSAGE: &str =
    "Hubo un error al enviar la solicitud. Por favor intenta de nuevo o contáctanos directamente.";
pub const NO_PAYLOAD_MESSAGE: &str = "⚠️ Por favor selecciona al menos un método de envío: carga un archivo de imagen, un archivo vectorial, o selecciona un área en el mapa.";

/// Source of "now" for destination names.
pub type Clock = Arc<dyn Fn() -> OffsetDateTime + Send + Sync>;

// =============================================================================
// ERRORS & OUTCOME
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("contact information incomplete: {0}")]
    ContactIncomplete(#[from] ContactError),
    #[error("nothing to submit: select an image, a vector file or an area")]
    NoPayload,
    #[error("storage sign-in failed: {0}")]
    AuthFailed(AuthError),
    #[error("upload failed: {0}")]
    UploadFailed(UploadError),
    #[error("area could not be encoded: {0}")]
    PayloadEncoding(#[from] serde_json::Error),
    #[error("notification dispatch failed: {0}")]
    DispatchFailed(#[from] DispatchError),
}

impl From<UploadError> for SubmitError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::AuthFailed(e) => Self::AuthFailed(e),
            other => Self::UploadFailed(other),
        }
    }
}

impl SubmitError {
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::ContactIncomplete(e) => e.user_message(),
            Self::NoPayload => NO_PAYLOAD_MESSAGE,
            Self::AuthFailed(_) | Self::UploadFailed(_) | Self::PayloadEncoding(_) | Self::DispatchFailed(_) => {
                FAILURE_MESSAGE
            }
        }
    }

    fn notice(&self) -> Notice {
        match self {
            Self::ContactIncomplete(_) | Self::NoPayload => Notice::warning(self.user_message()),
            _ => Notice::error(self.user_message()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionPhase {
    Idle,
    Validating,
    Authenticating,
    Uploading,
    Dispatching,
}

/// What a successful submission did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReceipt {
    pub submission_id: Uuid,
    pub links: FileLinks,
    pub area_included: bool,
}

// =============================================================================
// SESSION
// =============================================================================

/// Everything the user has entered on the request form.
pub struct SubmissionSession {
    pub contact: ContactForm,
    pub intake: FileIntake,
    pub area: AreaSelector,
    pub details: RequestDetails,
}

impl SubmissionSession {
    #[must_use]
    pub fn new(surface: Arc<dyn DrawingSurface>) -> Self {
        Self {
            contact: ContactForm::new(),
            intake: FileIntake::new(),
            area: AreaSelector::new(surface),
            details: RequestDetails::default(),
        }
    }

    fn has_payload(&self) -> bool {
        !self.intake.files().is_empty() || self.area.selection().is_some()
    }
}

// =============================================================================
// ORCHESTRATOR
// =============================================================================

pub struct SubmissionOrchestrator {
    session: SubmissionSession,
    uploader: Arc<dyn FileUploader>,
    dispatcher: Arc<dyn NotificationDispatcher>,
    view: Arc<dyn FormView>,
    target: DispatchTarget,
    clock: Clock,
    phase: SubmissionPhase,
}

impl SubmissionOrchestrator {
    #[must_use]
    pub fn new(
        session: SubmissionSession,
        uploader: Arc<dyn FileUploader>,
        dispatcher: Arc<dyn NotificationDispatcher>,
        view: Arc<dyn FormView>,
        target: DispatchTarget,
    ) -> Self {
        Self {
            session,
            uploader,
            dispatcher,
            view,
            target,
            clock: Arc::new(OffsetDateTime::now_utc),
            phase: SubmissionPhase::Idle,
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn session(&self) -> &SubmissionSession {
        &self.session
    }

    #[must_use]
    pub fn phase(&self) -> SubmissionPhase {
        self.phase
    }

    // -------------------------------------------------------------------------
    // form events
    // -------------------------------------------------------------------------

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.session.contact.set_name(name);
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.session.contact.set_email(email);
    }

    pub fn set_phone(&mut self, phone: impl Into<String>) {
        self.session.contact.set_phone(phone);
    }

    pub fn set_hectares(&mut self, hectares: impl Into<String>) {
        self.session.details.hectares = hectares.into();
    }

    pub fn set_comments(&mut self, comments: impl Into<String>) {
        self.session.details.comments = comments.into();
    }

    /// File picker change. A rejected selection resets the picker and
    /// points the user at the contact field to fix.
    ///
    /// # Errors
    ///
    /// Returns the intake error after notifying the view.
    pub fn select_file(&mut self, slot: FileSlot, file: FileHandle) -> Result<(), IntakeError> {
        let selected = self
            .session
            .intake
            .select(&self.session.contact, slot, file)
            .map(|handle| handle.status_text());
        match selected {
            Ok(status) => {
                self.view.set_status(slot.into(), &status, true);
                Ok(())
            }
            Err(err) => {
                self.view.reset_picker(slot);
                if let IntakeError::ContactIncomplete(contact_err) = &err {
                    self.reject_for_contact(*contact_err);
                }
                Err(err)
            }
        }
    }

    /// Open the map modal (gated on contact completion).
    ///
    /// # Errors
    ///
    /// Returns [`AreaError::ContactIncomplete`] after notifying the view.
    pub fn open_map(&mut self) -> Result<(), AreaError> {
        self.session.area.open(&self.session.contact).inspect_err(|err| {
            if let AreaError::ContactIncomplete(contact_err) = err {
                self.reject_for_contact(*contact_err);
            }
        })
    }

    pub fn close_map(&mut self) {
        self.session.area.close();
    }

    pub fn shape_completed(&mut self, shape: DrawnShape) {
        self.session.area.shape_completed(shape);
    }

    pub fn clear_map(&mut self) {
        self.session.area.clear();
    }

    /// Save the drawn shape as the request's area.
    ///
    /// # Errors
    ///
    /// Returns the extraction error after showing it to the user.
    pub fn save_map(&mut self) -> Result<(), AreaError> {
        match self.session.area.finalize() {
            Ok(selection) => {
                self.view.set_status(StatusSlot::Map, &selection.status_text(), true);
                Ok(())
            }
            Err(err) => {
                self.view.notify(Notice::warning(err.user_message()));
                Err(err)
            }
        }
    }

    // -------------------------------------------------------------------------
    // submit
    // -------------------------------------------------------------------------

    /// Run one submission end to end.
    ///
    /// # Errors
    ///
    /// Every [`SubmitError`] leaves the session as it was and the submit
    /// control enabled with its original label.
    pub async fn submit(&mut self) -> Result<SubmissionReceipt, SubmitError> {
        let submission_id = Uuid::new_v4();
        let result = self.run(submission_id).await;
        self.enter(SubmissionPhase::Idle);

        match &result {
            Ok(receipt) => {
                tracing::info!(%submission_id, files = receipt.links.entries().len(), area = receipt.area_included, "submission sent");
                self.view.notify(Notice::success(SUCCESS_MESSAGE));
            }
            Err(err) => {
                tracing::warn!(%submission_id, error = %err, "submission failed");
                self.view.notify(err.notice());
            }
        }
        result
    }

    async fn run(&mut self, submission_id: Uuid) -> Result<SubmissionReceipt, SubmitError> {
        self.enter(SubmissionPhase::Validating);
        // An empty request is NoPayload whatever the contact state.
        if !self.session.has_payload() {
            return Err(SubmitError::NoPayload);
        }
        let contact = self.session.contact.check().inspect_err(|e| self.view.focus_field(e.field()))?;

        let _busy = BusyControl::engage(Arc::clone(&self.view), ControlId::RequestSubmit, BUSY_LABEL);

        let links = self.upload_files(submission_id, &contact).await?;

        self.enter(SubmissionPhase::Dispatching);
        let area = self.session.area.selection();
        let payload = SubmissionPayload::assemble(&contact, &links, area, &self.session.details)?;
        self.dispatcher
            .send(&self.target.service_id, &self.target.template_id, &payload.to_params())
            .await?;

        let receipt = SubmissionReceipt { submission_id, links, area_included: area.is_some() };
        self.reset_after_success();
        Ok(receipt)
    }

    async fn upload_files(&mut self, submission_id: Uuid, contact: &ContactInfo) -> Result<FileLinks, SubmitError> {
        let mut links = FileLinks::default();
        if self.session.intake.files().is_empty() {
            return Ok(links);
        }

        self.enter(SubmissionPhase::Authenticating);
        self.uploader.ensure_authenticated().await?;

        self.enter(SubmissionPhase::Uploading);
        for (slot, file) in self.session.intake.files().iter() {
            let name = storage::destination_name(&contact.name, (self.clock)(), slot, &file.name);
            tracing::info!(%submission_id, slot = slot.role(), name = %name, "uploading file");
            let result = self.uploader.upload(file, &name).await?;
            links.push(slot, result.public_view_link);
        }
        Ok(links)
    }

    /// Clear files, area and free text. Contact fields stay so the same
    /// visitor can send another request.
    fn reset_after_success(&mut self) {
        self.session.intake.clear();
        self.session.area.reset_selection();
        self.session.details.clear();
        for slot in StatusSlot::ALL {
            self.view.set_status(slot, &slot.placeholder(), false);
        }
    }

    fn reject_for_contact(&self, err: ContactError) {
        self.view.notify(Notice::warning(err.user_message()));
        self.view.focus_field(err.field());
    }

    fn enter(&mut self, phase: SubmissionPhase) {
        if self.phase != phase {
            tracing::debug!(from = ?self.phase, to = ?phase, "submission phase");
            self.phase = phase;
            self.view.phase_changed(phase);
        }
    }
}
