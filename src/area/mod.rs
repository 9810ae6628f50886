//! Area selection on the map drawing surface.
//!
//! DESIGN
//! ======
//! The drawing widget only produces shapes; the selector decides which one
//! is live and turns it into an `AreaSelection` on request. One shape is
//! live at a time: a new shape or an explicit clear removes the previous
//! one from the surface and drops any stored selection. Polygon vertices
//! keep drawing order because that order defines the boundary.

pub mod geometry;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::contact::{ContactError, ContactForm};

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

const MIN_POLYGON_POINTS: usize = 3;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AreaError {
    #[error("no shape drawn")]
    NoShapeDrawn,
    #[error("polygon needs at least 3 points, got {0}")]
    TooFewPoints(usize),
    #[error("coordinate out of range: lat {lat}, lng {lng}")]
    InvalidCoordinate { lat: f64, lng: f64 },
    #[error("contact information incomplete: {0}")]
    ContactIncomplete(#[from] ContactError),
}

impl AreaError {
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::NoShapeDrawn => "Por favor dibuja un área en el mapa primero",
            Self::TooFewPoints(_) => "El polígono necesita al menos tres puntos",
            Self::InvalidCoordinate { .. } => "El área dibujada tiene coordenadas fuera de rango",
            Self::ContactIncomplete(e) => e.user_message(),
        }
    }
}

// =============================================================================
// GEOMETRY TYPES
// =============================================================================

/// A geographic point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Identifier the drawing surface assigns to each overlay it renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShapeId(pub u64);

/// Geometry carried by a completed draw event.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeGeometry {
    Path(Vec<LatLng>),
    Point(LatLng),
}

/// A completed overlay emitted by the drawing surface.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawnShape {
    pub id: ShapeId,
    pub geometry: ShapeGeometry,
}

/// Finalized area, serialized into the notification as
/// `{"type": "polygon"|"marker", "coordinates": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates", rename_all = "lowercase")]
pub enum AreaSelection {
    Polygon(Vec<LatLng>),
    Marker(LatLng),
}

impl AreaSelection {
    /// Pretty JSON with two-space indentation.
    ///
    /// # Errors
    ///
    /// Propagates serializer failures (non-finite floats never reach here
    /// because extraction rejects them).
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Status text shown after the area is saved.
    #[must_use]
    pub fn status_text(&self) -> String {
        match self {
            Self::Polygon(points) => {
                let km2 = geometry::bounds(points).map_or(0.0, |b| geometry::approx_area_km2(&b));
                format!("✓ Área seleccionada\nPolígono guardado (~{km2:.2} km²)")
            }
            Self::Marker(_) => "✓ Área seleccionada\nPunto guardado".to_owned(),
        }
    }
}

/// Extract a selection from a drawn shape.
///
/// # Errors
///
/// `TooFewPoints` for paths under three vertices, `InvalidCoordinate` for
/// any point outside lat/lng range.
pub fn extract(shape: &ShapeGeometry) -> Result<AreaSelection, AreaError> {
    match shape {
        ShapeGeometry::Path(points) => {
            if points.len() < MIN_POLYGON_POINTS {
                return Err(AreaError::TooFewPoints(points.len()));
            }
            for p in points {
                geometry::check_point(*p)?;
            }
            Ok(AreaSelection::Polygon(points.clone()))
        }
        ShapeGeometry::Point(point) => {
            geometry::check_point(*point)?;
            Ok(AreaSelection::Marker(*point))
        }
    }
}

// =============================================================================
// DRAWING SURFACE PORT
// =============================================================================

/// The map widget, as seen by the selector.
pub trait DrawingSurface: Send + Sync {
    /// Take a previously displayed overlay off the map.
    fn remove_shape(&self, id: ShapeId);
}

// =============================================================================
// SELECTOR
// =============================================================================

pub struct AreaSelector {
    surface: Arc<dyn DrawingSurface>,
    current: Option<DrawnShape>,
    selection: Option<AreaSelection>,
    open: bool,
}

impl AreaSelector {
    #[must_use]
    pub fn new(surface: Arc<dyn DrawingSurface>) -> Self {
        Self { surface, current: None, selection: None, open: false }
    }

    /// Open the map modal.
    ///
    /// # Errors
    ///
    /// Returns [`AreaError::ContactIncomplete`] when contact data does not
    /// validate; the modal stays closed.
    pub fn open(&mut self, contact: &ContactForm) -> Result<(), AreaError> {
        contact.check()?;
        self.open = true;
        Ok(())
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Accept a newly completed overlay, retiring the previous one.
    pub fn shape_completed(&mut self, shape: DrawnShape) {
        self.remove_current();
        self.selection = None;
        self.current = Some(shape);
    }

    /// Remove the live overlay and forget any saved selection.
    pub fn clear(&mut self) {
        self.remove_current();
        self.selection = None;
    }

    /// Turn the live overlay into the stored selection and close the modal.
    ///
    /// # Errors
    ///
    /// `NoShapeDrawn` without a live overlay, or any extraction error.
    pub fn finalize(&mut self) -> Result<&AreaSelection, AreaError> {
        let shape = self.current.as_ref().ok_or(AreaError::NoShapeDrawn)?;
        let selection = extract(&shape.geometry)?;
        if let AreaSelection::Polygon(points) = &selection {
            if let Some(b) = geometry::bounds(points) {
                tracing::info!(points = points.len(), area_km2 = geometry::approx_area_km2(&b), "polygon saved");
            }
        } else {
            tracing::info!("marker saved");
        }
        self.open = false;
        Ok(self.selection.insert(selection))
    }

    #[must_use]
    pub fn selection(&self) -> Option<&AreaSelection> {
        self.selection.as_ref()
    }

    /// Forget the saved selection after a successful submission. The overlay
    /// stays on the map.
    pub fn reset_selection(&mut self) {
        self.selection = None;
    }

    fn remove_current(&mut self) {
        if let Some(prev) = self.current.take() {
            self.surface.remove_shape(prev.id);
        }
    }
}

/// Surface that renders nothing; used by front ends without a map widget.
pub struct NullSurface;

impl DrawingSurface for NullSurface {
    fn remove_shape(&self, _id: ShapeId) {}
}
