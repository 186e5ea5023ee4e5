//! Degrees/minutes/seconds waypoints to signed decimal positions.

use serde::Serialize;
use vfr_config::{Hemisphere, Waypoint};
use vfr_core::vector::{Vector3, from_lat_lon};

use crate::NavigationError;

/// Signed decimal position, north and east positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    pub lat_deg: f64,
    pub lon_deg: f64,
}

impl GeoPoint {
    /// Returns `None` unless latitude is within ±90° and longitude within ±180°.
    pub fn new(lat_deg: f64, lon_deg: f64) -> Option<Self> {
        let valid = lat_deg.is_finite()
            && lon_deg.is_finite()
            && lat_deg.abs() <= 90.0
            && lon_deg.abs() <= 180.0;
        valid.then_some(Self { lat_deg, lon_deg })
    }

    pub fn unit_vector(&self) -> Vector3 {
        from_lat_lon(self.lat_deg.to_radians(), self.lon_deg.to_radians())
    }
}

/// Unsigned DMS to signed decimal degrees; south and west are negative.
pub fn dms_to_decimal(degrees: f64, minutes: f64, seconds: f64, hemisphere: Hemisphere) -> f64 {
    let magnitude = degrees + minutes / 60.0 + seconds / 3_600.0;
    match hemisphere {
        Hemisphere::North | Hemisphere::East => magnitude,
        Hemisphere::South | Hemisphere::West => -magnitude,
    }
}

pub fn waypoint_position(waypoint: &Waypoint) -> Result<GeoPoint, NavigationError> {
    let invalid = |reason: String| NavigationError::InvalidWaypoint {
        code: waypoint.code.clone(),
        reason,
    };

    if !matches!(waypoint.lat_direction, Hemisphere::North | Hemisphere::South) {
        return Err(invalid("latitude hemisphere must be N or S".into()));
    }
    if !matches!(waypoint.lon_direction, Hemisphere::East | Hemisphere::West) {
        return Err(invalid("longitude hemisphere must be E or W".into()));
    }
    for (label, degrees, minutes, seconds) in [
        ("latitude", waypoint.lat_degrees, waypoint.lat_minutes, waypoint.lat_seconds),
        ("longitude", waypoint.lon_degrees, waypoint.lon_minutes, waypoint.lon_seconds),
    ] {
        let in_range = |v: f64, max: f64| v.is_finite() && (0.0..max).contains(&v);
        if !degrees.is_finite() || degrees < 0.0 {
            return Err(invalid(format!("{label} degrees {degrees} must be a non-negative number")));
        }
        if !in_range(minutes, 60.0) || !in_range(seconds, 60.0) {
            return Err(invalid(format!(
                "{label} minutes {minutes} and seconds {seconds} must be within [0, 60)"
            )));
        }
    }

    let lat = dms_to_decimal(
        waypoint.lat_degrees,
        waypoint.lat_minutes,
        waypoint.lat_seconds,
        waypoint.lat_direction,
    );
    let lon = dms_to_decimal(
        waypoint.lon_degrees,
        waypoint.lon_minutes,
        waypoint.lon_seconds,
        waypoint.lon_direction,
    );
    GeoPoint::new(lat, lon)
        .ok_or_else(|| invalid(format!("position {lat:.6}, {lon:.6} is off the globe")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn waypoint(lat: (f64, f64, f64, Hemisphere), lon: (f64, f64, f64, Hemisphere)) -> Waypoint {
        Waypoint {
            code: "TEST".into(),
            name: String::new(),
            lat_degrees: lat.0,
            lat_minutes: lat.1,
            lat_seconds: lat.2,
            lat_direction: lat.3,
            lon_degrees: lon.0,
            lon_minutes: lon.1,
            lon_seconds: lon.2,
            lon_direction: lon.3,
            magnetic_variation: None,
            aerodrome: None,
        }
    }

    #[test]
    fn converts_dms_with_hemisphere_sign() {
        let wp = waypoint(
            (49.0, 11.0, 42.0, Hemisphere::North),
            (123.0, 10.0, 55.0, Hemisphere::West),
        );
        let point = waypoint_position(&wp).unwrap();
        assert!((point.lat_deg - 49.195).abs() < 1e-9);
        assert!((point.lon_deg + 123.181_944_444).abs() < 1e-6);
    }

    #[test]
    fn rejects_swapped_hemispheres() {
        let wp = waypoint((10.0, 0.0, 0.0, Hemisphere::East), (10.0, 0.0, 0.0, Hemisphere::West));
        assert!(matches!(
            waypoint_position(&wp),
            Err(NavigationError::InvalidWaypoint { .. })
        ));
    }

    #[test]
    fn rejects_out_of_range_components() {
        let minutes = waypoint((10.0, 60.0, 0.0, Hemisphere::North), (10.0, 0.0, 0.0, Hemisphere::East));
        assert!(waypoint_position(&minutes).is_err());
        let latitude = waypoint((90.0, 0.0, 1.0, Hemisphere::South), (10.0, 0.0, 0.0, Hemisphere::East));
        assert!(waypoint_position(&latitude).is_err());
        let longitude = waypoint((0.0, 0.0, 0.0, Hemisphere::North), (180.0, 30.0, 0.0, Hemisphere::East));
        assert!(waypoint_position(&longitude).is_err());
        let pole = waypoint((90.0, 0.0, 0.0, Hemisphere::North), (0.0, 0.0, 0.0, Hemisphere::East));
        assert!(waypoint_position(&pole).is_ok());
    }
}
