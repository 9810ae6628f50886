//! UI port: everything the pipeline asks of the page.
//!
//! DESIGN
//! ======
//! The pipeline never renders. It tells a `FormView` which control is busy,
//! what a status slot should read, which field to focus and what notice to
//! show. `BusyControl` owns the busy/enabled lifecycle of a submit control
//! and restores the original label when dropped, so every exit path of a
//! submission re-enables the control.

use std::sync::Arc;

use crate::contact::ContactField;
use crate::intake::FileSlot;
use crate::submission::SubmissionPhase;

#[cfg(test)]
#[path = "view_test.rs"]
mod tests;

/// Submit controls on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlId {
    /// The analysis-request button.
    RequestSubmit,
    /// The contact-section inquiry button.
    InquirySubmit,
}

/// Status placeholders next to each input method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusSlot {
    Image,
    Vector,
    Map,
}

impl StatusSlot {
    pub const ALL: [Self; 3] = [Self::Image, Self::Vector, Self::Map];

    /// Resting text shown before anything is selected.
    #[must_use]
    pub fn placeholder(self) -> String {
        match self {
            Self::Image => FileSlot::Image.placeholder(),
            Self::Vector => FileSlot::Vector.placeholder(),
            Self::Map => "↑ Click para abrir mapa\nDibuja o marca tu área".to_owned(),
        }
    }
}

impl From<FileSlot> for StatusSlot {
    fn from(slot: FileSlot) -> Self {
        match slot {
            FileSlot::Image => Self::Image,
            FileSlot::Vector => Self::Vector,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Warning,
    Error,
}

/// A user-facing message (an alert on the page).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self { kind: NoticeKind::Success, message: message.into() }
    }

    #[must_use]
    pub fn warning(message: impl Into<String>) -> Self {
        Self { kind: NoticeKind::Warning, message: message.into() }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self { kind: NoticeKind::Error, message: message.into() }
    }
}

pub trait FormView: Send + Sync {
    /// Current label of a control.
    fn control_label(&self, control: ControlId) -> String;

    fn set_control(&self, control: ControlId, label: &str, enabled: bool);

    /// `filled` marks the slot as holding a selection (highlighted).
    fn set_status(&self, slot: StatusSlot, text: &str, filled: bool);

    /// Clear a file picker after a rejected selection.
    fn reset_picker(&self, slot: FileSlot);

    fn focus_field(&self, field: ContactField);

    fn notify(&self, notice: Notice);

    fn phase_changed(&self, _phase: SubmissionPhase) {}
}

/// Drop guard for a busy submit control.
pub struct BusyControl {
    view: Arc<dyn FormView>,
    control: ControlId,
    original_label: String,
}

impl BusyControl {
    /// Disable `control` and show `busy_label` until the guard drops.
    #[must_use]
    pub fn engage(view: Arc<dyn FormView>, control: ControlId, busy_label: &str) -> Self {
        let original_label = view.control_label(control);
        view.set_control(control, busy_label, false);
        Self { view, control, original_label }
    }
}

impl Drop for BusyControl {
    fn drop(&mut self) {
        self.view.set_control(self.control, &self.original_label, true);
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
