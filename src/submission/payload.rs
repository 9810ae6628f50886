//! Notification payload assembly.
//!
//! Every template field is always present; empty inputs become fixed
//! sentinel strings so the rendered email never shows a blank.

use serde::Serialize;

use crate::area::AreaSelection;
use crate::contact::ContactInfo;
use crate::intake::FileSlot;
use crate::notify::TemplateParams;

pub const NOT_SPECIFIED: &str = "No especificado";
pub const NO_FILES: &str = "No se cargaron archivos";
pub const NO_AREA: &str = "No se seleccionó área en el mapa";
pub const NO_COMMENTS: &str = "Sin comentarios";

/// Free-text fields of the request form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestDetails {
    pub hectares: String,
    pub comments: String,
}

impl RequestDetails {
    pub fn clear(&mut self) {
        self.hectares.clear();
        self.comments.clear();
    }
}

/// Public links gathered during one submission, in upload order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileLinks {
    entries: Vec<(FileSlot, String)>,
}

impl FileLinks {
    pub fn push(&mut self, slot: FileSlot, link: impl Into<String>) {
        self.entries.push((slot, link.into()));
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn entries(&self) -> &[(FileSlot, String)] {
        &self.entries
    }

    /// One `Label: link` line per file, each newline-terminated.
    #[must_use]
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(|(slot, link)| format!("{}: {link}\n", slot.link_label()))
            .collect()
    }
}

/// The seven template parameters of the notification email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionPayload {
    pub user_name: String,
    pub user_email: String,
    pub user_phone: String,
    pub hectares: String,
    pub file_links: String,
    pub map_coordinates: String,
    pub comments: String,
}

impl SubmissionPayload {
    /// Build the analysis-request payload.
    ///
    /// # Errors
    ///
    /// Fails only if the area cannot be serialized.
    pub fn assemble(
        contact: &ContactInfo,
        links: &FileLinks,
        area: Option<&AreaSelection>,
        details: &RequestDetails,
    ) -> Result<Self, serde_json::Error> {
        let map_coordinates = match area {
            Some(selection) => selection.to_pretty_json()?,
            None => NO_AREA.to_owned(),
        };
        let file_links = if links.is_empty() { NO_FILES.to_owned() } else { links.render() };
        Ok(Self {
            user_name: contact.name.clone(),
            user_email: contact.email.clone(),
            user_phone: or_sentinel(contact.phone.as_deref().unwrap_or_default(), NOT_SPECIFIED),
            hectares: or_sentinel(&details.hectares, NOT_SPECIFIED),
            file_links,
            map_coordinates,
            comments: or_sentinel(&details.comments, NO_COMMENTS),
        })
    }

    #[must_use]
    pub fn to_params(&self) -> TemplateParams {
        TemplateParams::from([
            ("user_name".to_owned(), self.user_name.clone()),
            ("user_email".to_owned(), self.user_email.clone()),
            ("user_phone".to_owned(), self.user_phone.clone()),
            ("hectares".to_owned(), self.hectares.clone()),
            ("file_links".to_owned(), self.file_links.clone()),
            ("map_coordinates".to_owned(), self.map_coordinates.clone()),
            ("comments".to_owned(), self.comments.clone()),
        ])
    }
}

pub(crate) fn or_sentinel(value: &str, sentinel: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() { sentinel.to_owned() } else { trimmed.to_owned() }
}

#[cfg(test)]
#[path = "payload_test.rs"]
mod tests;
