//! Coordinate checks and bounding-box estimates for drawn areas.

use serde::{Deserialize, Serialize};

use super::{AreaError, LatLng};

/// Kilometres per degree of latitude (and of longitude at the equator).
pub const KM_PER_DEGREE: f64 = 111.32;

/// Reject non-finite or out-of-range coordinates.
///
/// # Errors
///
/// Returns [`AreaError::InvalidCoordinate`] naming the offending point.
pub fn check_point(point: LatLng) -> Result<(), AreaError> {
    let lat_ok = point.lat.is_finite() && (-90.0..=90.0).contains(&point.lat);
    let lng_ok = point.lng.is_finite() && (-180.0..=180.0).contains(&point.lng);
    if lat_ok && lng_ok { Ok(()) } else { Err(AreaError::InvalidCoordinate { lat: point.lat, lng: point.lng }) }
}

/// Axis-aligned extent of a set of points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

/// Bounding box of `points`, or `None` when empty.
#[must_use]
pub fn bounds(points: &[LatLng]) -> Option<Bounds> {
    let first = points.first()?;
    let init = Bounds { north: first.lat, south: first.lat, east: first.lng, west: first.lng };
    Some(points[1..].iter().fold(init, |b, p| Bounds {
        north: b.north.max(p.lat),
        south: b.south.min(p.lat),
        east: b.east.max(p.lng),
        west: b.west.min(p.lng),
    }))
}

/// Equirectangular estimate of the bounding box area in km².
///
/// Good enough for a status hint; it overestimates any non-rectangular
/// polygon and ignores antimeridian crossing.
#[must_use]
pub fn approx_area_km2(b: &Bounds) -> f64 {
    let lat_avg = (b.north + b.south) / 2.0;
    let width_km = (b.east - b.west).abs() * KM_PER_DEGREE * lat_avg.to_radians().cos();
    let height_km = (b.north - b.south).abs() * KM_PER_DEGREE;
    width_km * height_km
}

#[cfg(test)]
#[path = "geometry_test.rs"]
mod tests;
