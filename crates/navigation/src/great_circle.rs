//! Great-circle course and distance.

use std::f64::consts::PI;
use std::fmt;

use serde::Serialize;
use vfr_core::constants::EARTH_RADIUS_NM;
use vfr_core::units::{normalize_degrees, wrap_pi};
use vfr_core::vector::{cross, dot, norm, normalize};

use crate::coordinates::GeoPoint;

/// Angular separation (radians) below which two points coincide, or within
/// which of π they are antipodal.
const DEGENERATE_ANGLE_RAD: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Degeneracy {
    Coincident,
    Antipodal,
}

impl fmt::Display for Degeneracy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Degeneracy::Coincident => f.write_str("endpoints coincide"),
            Degeneracy::Antipodal => f.write_str("endpoints are antipodal"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CourseDistance {
    pub true_course_deg: f64,
    pub distance_nm: f64,
}

/// Haversine central angle in radians.
pub fn central_angle(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let (lat1, lat2) = (a.lat_deg.to_radians(), b.lat_deg.to_radians());
    let dlat = lat2 - lat1;
    let dlon = (b.lon_deg - a.lon_deg).to_radians();
    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * h.sqrt().min(1.0).asin()
}

pub fn distance_nm(a: &GeoPoint, b: &GeoPoint) -> f64 {
    central_angle(a, b) * EARTH_RADIUS_NM
}

/// Initial great-circle bearing from `a` towards `b`.
pub fn initial_bearing_deg(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let (lat1, lat2) = (a.lat_deg.to_radians(), b.lat_deg.to_radians());
    let dlon = (b.lon_deg - a.lon_deg).to_radians();
    let y = dlon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();
    normalize_degrees(y.atan2(x).to_degrees())
}

/// Course of the great circle where it crosses the meridian halfway in
/// longitude between `a` and `b`.
///
/// Both directions of a leg use the same meridian, so the course from `b`
/// to `a` is the exact reciprocal. Falls back to the initial bearing when the
/// longitude difference is a half turn and the mid meridian is ambiguous.
pub fn true_course_deg(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let dlon = wrap_pi((b.lon_deg - a.lon_deg).to_radians());
    if dlon.abs() > PI - 1e-9 {
        return initial_bearing_deg(a, b);
    }
    let mid = a.lon_deg.to_radians() + dlon / 2.0;

    let route_normal = normalize(&cross(&a.unit_vector(), &b.unit_vector()));
    let meridian_normal = normalize(&cross(&[mid.cos(), mid.sin(), 0.0], &[0.0, 0.0, 1.0]));
    let (Some(route_normal), Some(meridian_normal)) = (route_normal, meridian_normal) else {
        return initial_bearing_deg(a, b);
    };

    let angle = norm(&cross(&route_normal, &meridian_normal))
        .atan2(dot(&route_normal, &meridian_normal))
        .to_degrees();
    let track = if dlon > 0.0 { angle } else { 360.0 - angle };
    normalize_degrees(track)
}

/// True course and distance, rejecting coincident and antipodal endpoints.
pub fn course_and_distance(a: &GeoPoint, b: &GeoPoint) -> Result<CourseDistance, Degeneracy> {
    let angle = central_angle(a, b);
    if angle < DEGENERATE_ANGLE_RAD {
        return Err(Degeneracy::Coincident);
    }
    if angle > PI - DEGENERATE_ANGLE_RAD {
        return Err(Degeneracy::Antipodal);
    }
    Ok(CourseDistance {
        true_course_deg: true_course_deg(a, b),
        distance_nm: angle * EARTH_RADIUS_NM,
    })
}
