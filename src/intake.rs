//! File intake: one image slot and one vector slot.
//!
//! DESIGN
//! ======
//! Selection replaces whatever the slot held before; there is no queue.
//! Format and size hints are advisory text only. The storage service is the
//! gatekeeper for content, so nothing here rejects a file for its type or
//! size. The only gate is contact completion.

use std::path::Path;

use bytes::Bytes;

use crate::contact::{ContactError, ContactForm};

#[cfg(test)]
#[path = "intake_test.rs"]
mod tests;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error("contact information incomplete: {0}")]
    ContactIncomplete(#[from] ContactError),
    #[error("failed to read {path}: {source}")]
    Read { path: String, source: std::io::Error },
}

// =============================================================================
// SLOTS
// =============================================================================

/// Which picker a file came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileSlot {
    /// Drone ortomosaic or satellite image.
    Image,
    /// KML/KMZ/SHP boundary file.
    Vector,
}

impl FileSlot {
    /// Role tag used in the remote object name.
    #[must_use]
    pub fn role(self) -> &'static str {
        match self {
            Self::Image => "ortomosaico",
            Self::Vector => "vector",
        }
    }

    /// Label prefixed to the public link in the notification body.
    #[must_use]
    pub fn link_label(self) -> &'static str {
        match self {
            Self::Image => "Ortomosaico",
            Self::Vector => "Archivo vectorial",
        }
    }

    /// Advisory format list shown next to the picker.
    #[must_use]
    pub fn accepted_formats(self) -> &'static str {
        match self {
            Self::Image => "TIFF, GeoTIFF, HDF",
            Self::Vector => ".KML, .KMZ, .SHP, .ZIP",
        }
    }

    /// Status text shown while the slot is empty.
    #[must_use]
    pub fn placeholder(self) -> String {
        format!("↑ Click para subir\nFormatos: {}", self.accepted_formats())
    }
}

// =============================================================================
// FILE HANDLE
// =============================================================================

/// A user-selected file with its bytes loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHandle {
    pub name: String,
    pub size_bytes: u64,
    pub mime_type: String,
    pub content: Bytes,
}

impl FileHandle {
    #[must_use]
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, content: impl Into<Bytes>) -> Self {
        let content = content.into();
        Self { name: name.into(), size_bytes: content.len() as u64, mime_type: mime_type.into(), content }
    }

    /// Load a file from disk, inferring the MIME type from its extension.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::Read`] if the file cannot be read.
    pub async fn from_path(path: &Path) -> Result<Self, IntakeError> {
        let content = tokio::fs::read(path)
            .await
            .map_err(|source| IntakeError::Read { path: path.display().to_string(), source })?;
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        let mime = mime_for_name(&name);
        Ok(Self::new(name, mime, content))
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn size_mb(&self) -> f64 {
        self.size_bytes as f64 / BYTES_PER_MB
    }

    /// Status text shown once the slot holds this file.
    #[must_use]
    pub fn status_text(&self) -> String {
        format!("✓ {}\n{:.2} MB", self.name, self.size_mb())
    }
}

/// Best-effort MIME type from a file name's extension.
#[must_use]
pub fn mime_for_name(name: &str) -> &'static str {
    let ext = Path::new(name)
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "tif" | "tiff" | "geotiff" => "image/tiff",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "hdf" => "application/x-hdf",
        "kml" => "application/vnd.google-earth.kml+xml",
        "kmz" => "application/vnd.google-earth.kmz",
        "zip" => "application/zip",
        "shp" => "application/x-esri-shape",
        _ => "application/octet-stream",
    }
}

// =============================================================================
// UPLOADED FILES
// =============================================================================

/// The two file slots of the request form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadedFiles {
    pub image: Option<FileHandle>,
    pub vector: Option<FileHandle>,
}

impl UploadedFiles {
    #[must_use]
    pub fn get(&self, slot: FileSlot) -> Option<&FileHandle> {
        match slot {
            FileSlot::Image => self.image.as_ref(),
            FileSlot::Vector => self.vector.as_ref(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.image.is_none() && self.vector.is_none()
    }

    /// Present files in upload order: image first, then vector.
    pub fn iter(&self) -> impl Iterator<Item = (FileSlot, &FileHandle)> {
        [(FileSlot::Image, self.image.as_ref()), (FileSlot::Vector, self.vector.as_ref())]
            .into_iter()
            .filter_map(|(slot, file)| file.map(|f| (slot, f)))
    }

    pub fn clear(&mut self) {
        self.image = None;
        self.vector = None;
    }

    fn slot_mut(&mut self, slot: FileSlot) -> &mut Option<FileHandle> {
        match slot {
            FileSlot::Image => &mut self.image,
            FileSlot::Vector => &mut self.vector,
        }
    }
}

// =============================================================================
// INTAKE
// =============================================================================

/// Gated file selection.
#[derive(Debug, Default)]
pub struct FileIntake {
    files: UploadedFiles,
}

impl FileIntake {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `file` in `slot`, replacing any previous handle.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::ContactIncomplete`] and discards `file` when the
    /// contact form does not validate.
    pub fn select(&mut self, contact: &ContactForm, slot: FileSlot, file: FileHandle) -> Result<&FileHandle, IntakeError> {
        contact.check()?;
        tracing::debug!(slot = slot.role(), name = %file.name, size_bytes = file.size_bytes, "file selected");
        Ok(self.files.slot_mut(slot).insert(file))
    }

    #[must_use]
    pub fn files(&self) -> &UploadedFiles {
        &self.files
    }

    pub fn clear(&mut self) {
        self.files.clear();
    }
}
