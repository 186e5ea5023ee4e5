//! Navigation leg solving on a spherical earth.
//!
//! Angles are in degrees; courses and headings are normalised to `[0, 360)`.
//! Magnetic variation is signed east-positive and every magnetic value is
//! `true - variation`.

pub mod altitude;
pub mod coordinates;
pub mod great_circle;
pub mod leg;
pub mod wind;

pub use altitude::{round_up_to_hundreds, vfr_cruising_altitude};
pub use coordinates::{GeoPoint, dms_to_decimal, waypoint_position};
pub use great_circle::{
    CourseDistance, Degeneracy, central_angle, course_and_distance, distance_nm,
    initial_bearing_deg, true_course_deg,
};
pub use leg::{
    LegGeometry, LegInput, LegSolution, NavigationLegSolver, leg_magnetic_variation,
    magnetic_from_true, true_from_magnetic,
};
pub use wind::{WindComponents, WindSolution, resolve_wind, solve_wind_triangle, wind_components};

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum NavigationError {
    #[error("waypoint '{code}' is invalid: {reason}")]
    InvalidWaypoint { code: String, reason: String },
    #[error("leg {from} -> {to} is degenerate: {degeneracy}")]
    DegenerateLeg {
        from: String,
        to: String,
        degeneracy: Degeneracy,
    },
    #[error("wind is invalid: {0}")]
    InvalidWind(String),
    #[error("true airspeed {0} kt must be positive")]
    InvalidAirspeed(f64),
    #[error("crosswind of {crosswind_kt:.1} kt exceeds the true airspeed of {tas_kt:.1} kt")]
    WindExceedsAirspeed { crosswind_kt: f64, tas_kt: f64 },
    #[error("ground speed {ground_speed_kt:.1} kt is not positive")]
    NonPositiveGroundSpeed { ground_speed_kt: f64 },
}
