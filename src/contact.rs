//! Contact validation and the live contact form.
//!
//! DESIGN
//! ======
//! `validate` is pure. `ContactForm` owns the raw field text and recomputes
//! the `completed` flag on every change, publishing it through a `watch`
//! channel so any UI layer can follow it without polling. File intake, area
//! selection and submission are all gated on that flag.

use tokio::sync::watch;

#[cfg(test)]
#[path = "contact_test.rs"]
mod tests;

/// Contact field identifiers, used to point the user at the failing input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactField {
    Name,
    Email,
}

impl std::fmt::Display for ContactField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Name => f.write_str("name"),
            Self::Email => f.write_str("email"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ContactError {
    #[error("missing required field: {0}")]
    MissingField(ContactField),
    #[error("invalid email format")]
    InvalidEmailFormat,
}

impl ContactError {
    /// The input the user has to correct.
    #[must_use]
    pub fn field(&self) -> ContactField {
        match self {
            Self::MissingField(field) => *field,
            Self::InvalidEmailFormat => ContactField::Email,
        }
    }

    /// Notice shown to the user for this failure.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::MissingField(_) => {
                "⚠️ Por favor completa primero el formulario de Información de Contacto (Nombre y Email) antes de cargar archivos o enviar la solicitud."
            }
            Self::InvalidEmailFormat => {
                "⚠️ Por favor ingresa un email válido en el formulario de Información de Contacto."
            }
        }
    }
}

/// Validate a name/email pair.
///
/// # Errors
///
/// `MissingField` when either value is blank after trimming (name is checked
/// first), `InvalidEmailFormat` when the email is not `local@domain.tld`.
pub fn validate(name: &str, email: &str) -> Result<(), ContactError> {
    if trim_field(name).is_empty() {
        return Err(ContactError::MissingField(ContactField::Name));
    }
    let email = trim_field(email);
    if email.is_empty() {
        return Err(ContactError::MissingField(ContactField::Email));
    }
    if !is_valid_email(email) {
        return Err(ContactError::InvalidEmailFormat);
    }
    Ok(())
}

/// Match `^[^\s@]+@[^\s@]+\.[^\s@]+$`.
///
/// Exactly one `@`; the domain side needs a `.` with at least one character
/// before and after it. Any later `.` also qualifies, so `a@b.c.d` passes.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(is_field_space) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .filter(|(_, c)| *c == '.')
        .any(|(idx, _)| idx > 0 && idx + 1 < domain.len())
}

/// Unicode whitespace plus U+FEFF (byte-order mark), which browsers treat
/// as whitespace in form input but `char::is_whitespace` does not.
fn is_field_space(c: char) -> bool {
    c.is_whitespace() || c == '\u{FEFF}'
}

pub(crate) fn trim_field(value: &str) -> &str {
    value.trim_matches(is_field_space)
}

// =============================================================================
// CONTACT INFO
// =============================================================================

/// Validated contact snapshot handed to the payload builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactInfo {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

// =============================================================================
// CONTACT FORM
// =============================================================================

/// Live contact form state.
pub struct ContactForm {
    name: String,
    email: String,
    phone: String,
    completed: watch::Sender<bool>,
}

impl ContactForm {
    #[must_use]
    pub fn new() -> Self {
        let (completed, _) = watch::channel(false);
        Self { name: String::new(), email: String::new(), phone: String::new(), completed }
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.revalidate();
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = email.into();
        self.revalidate();
    }

    /// Phone is optional and does not affect completion.
    pub fn set_phone(&mut self, phone: impl Into<String>) {
        self.phone = phone.into();
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        *self.completed.borrow()
    }

    /// Receive every change of the `completed` flag.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.completed.subscribe()
    }

    /// Validate the current fields and return a trimmed snapshot.
    ///
    /// # Errors
    ///
    /// Returns the first failing rule from [`validate`].
    pub fn check(&self) -> Result<ContactInfo, ContactError> {
        validate(&self.name, &self.email)?;
        let phone = trim_field(&self.phone);
        Ok(ContactInfo {
            name: trim_field(&self.name).to_owned(),
            email: trim_field(&self.email).to_owned(),
            phone: (!phone.is_empty()).then(|| phone.to_owned()),
        })
    }

    fn revalidate(&self) {
        let ok = validate(&self.name, &self.email).is_ok();
        self.completed.send_if_modified(|current| {
            if *current == ok {
                return false;
            }
            *current = ok;
            true
        });
    }
}

impl Default for ContactForm {
    fn default() -> Self {
        Self::new()
    }
}
