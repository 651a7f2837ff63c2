//! Boundary validation for raw GPS coordinates.
//!
//! The graph core accepts any numbers; these checks are for callers that
//! want bad samples rejected before they become spots.

use crate::error::{GeonetError, Result};
use geo::Point;
use std::ops::RangeInclusive;

const LATITUDE_RANGE: RangeInclusive<f64> = -90.0..=90.0;
const LONGITUDE_RANGE: RangeInclusive<f64> = -180.0..=180.0;

fn check_axis(name: &str, value: f64, range: RangeInclusive<f64>) -> Result<()> {
    if !value.is_finite() {
        return Err(GeonetError::InvalidInput(format!(
            "{} must be finite, got: {}",
            name, value
        )));
    }

    if !range.contains(&value) {
        return Err(GeonetError::InvalidInput(format!(
            "{} out of range [{:.1}, {:.1}]: {}",
            name,
            range.start(),
            range.end(),
            value
        )));
    }

    Ok(())
}

/// Validates a point has a usable latitude (y) and longitude (x).
///
/// Latitude: [-90.0, 90.0], Longitude: [-180.0, 180.0]
///
/// # Examples
///
/// ```
/// use geonet::compute::validation::validate_geographic_point;
/// use geo::Point;
///
/// let berlin = Point::new(13.4050, 52.5200);
/// assert!(validate_geographic_point(&berlin).is_ok());
///
/// // Latitude and longitude swapped by the caller
/// let swapped = Point::new(52.5200, 113.4050);
/// assert!(validate_geographic_point(&swapped).is_err());
/// ```
pub fn validate_geographic_point(point: &Point) -> Result<()> {
    check_axis("Latitude", point.y(), LATITUDE_RANGE)?;
    check_axis("Longitude", point.x(), LONGITUDE_RANGE)
}

/// Validates every sample of a track, reporting the first bad index.
pub fn validate_track(points: &[Point]) -> Result<()> {
    points.iter().enumerate().try_for_each(|(idx, point)| {
        validate_geographic_point(point).map_err(|e| {
            GeonetError::InvalidInput(format!("Track sample {}: {}", idx, e))
        })
    })
}
