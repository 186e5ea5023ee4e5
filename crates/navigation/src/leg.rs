//! Single-leg solver: course, distance, heading, ground speed, time and fuel.

use serde::Serialize;
use tracing::debug;
use vfr_config::{Waypoint, Wind};
use vfr_core::units::{hours_to_minutes, minutes_to_hours, normalize_degrees};

use crate::NavigationError;
use crate::coordinates::{GeoPoint, waypoint_position};
use crate::great_circle::course_and_distance;
use crate::wind::{WindSolution, solve_wind_triangle};

/// Magnetic direction for a true one; `variation_deg` is east-positive.
pub fn magnetic_from_true(true_deg: f64, variation_deg: f64) -> f64 {
    normalize_degrees(true_deg - variation_deg)
}

pub fn true_from_magnetic(magnetic_deg: f64, variation_deg: f64) -> f64 {
    normalize_degrees(magnetic_deg + variation_deg)
}

/// Mean of the endpoint variations when both are known, else whichever is known, else 0.
pub fn leg_magnetic_variation(from: &Waypoint, to: &Waypoint) -> f64 {
    match (from.magnetic_variation, to.magnetic_variation) {
        (Some(a), Some(b)) => (a + b) / 2.0,
        (Some(v), None) | (None, Some(v)) => v,
        (None, None) => 0.0,
    }
}

/// Wind-independent geometry of a leg.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegGeometry {
    pub from_code: String,
    pub to_code: String,
    pub from: GeoPoint,
    pub to: GeoPoint,
    pub true_course_deg: f64,
    pub distance_nm: f64,
    pub magnetic_variation_deg: f64,
}

impl LegGeometry {
    pub fn between(from: &Waypoint, to: &Waypoint) -> Result<Self, NavigationError> {
        let from_point = waypoint_position(from)?;
        let to_point = waypoint_position(to)?;
        let course = course_and_distance(&from_point, &to_point).map_err(|degeneracy| {
            NavigationError::DegenerateLeg {
                from: from.code.clone(),
                to: to.code.clone(),
                degeneracy,
            }
        })?;
        Ok(Self {
            from_code: from.code.clone(),
            to_code: to.code.clone(),
            from: from_point,
            to: to_point,
            true_course_deg: course.true_course_deg,
            distance_nm: course.distance_nm,
            magnetic_variation_deg: leg_magnetic_variation(from, to),
        })
    }

    pub fn magnetic_course_deg(&self) -> f64 {
        magnetic_from_true(self.true_course_deg, self.magnetic_variation_deg)
    }
}

/// Performance figures flown on a leg.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegInput {
    pub tas_kt: f64,
    pub fuel_flow_gph: f64,
    pub wind: Wind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegSolution {
    pub geometry: LegGeometry,
    pub magnetic_course_deg: f64,
    pub wind: WindSolution,
    pub magnetic_heading_deg: f64,
    pub time_min: f64,
    pub fuel_gal: f64,
}

impl LegSolution {
    pub fn true_heading_deg(&self) -> f64 {
        self.wind.true_heading_deg
    }

    pub fn ground_speed_kt(&self) -> f64 {
        self.wind.ground_speed_kt
    }
}

/// Solves legs and partial legs for a fixed set of performance figures.
#[derive(Debug, Clone, Copy, Default)]
pub struct NavigationLegSolver;

impl NavigationLegSolver {
    pub fn solve(
        &self,
        from: &Waypoint,
        to: &Waypoint,
        input: &LegInput,
    ) -> Result<LegSolution, NavigationError> {
        let geometry = LegGeometry::between(from, to)?;
        self.solve_geometry(geometry, input)
    }

    pub fn solve_geometry(
        &self,
        geometry: LegGeometry,
        input: &LegInput,
    ) -> Result<LegSolution, NavigationError> {
        let distance_nm = geometry.distance_nm;
        self.solve_segment(geometry, distance_nm, input)
    }

    /// Solve `distance_nm` of the leg's track at the given figures, as for
    /// the climb or cruise portion of a leg.
    pub fn solve_segment(
        &self,
        geometry: LegGeometry,
        distance_nm: f64,
        input: &LegInput,
    ) -> Result<LegSolution, NavigationError> {
        let wind = solve_wind_triangle(geometry.true_course_deg, input.tas_kt, &input.wind)?;
        let time_min = hours_to_minutes(distance_nm / wind.ground_speed_kt);
        let fuel_gal = minutes_to_hours(time_min) * input.fuel_flow_gph;
        let magnetic_course_deg = geometry.magnetic_course_deg();
        let magnetic_heading_deg =
            magnetic_from_true(wind.true_heading_deg, geometry.magnetic_variation_deg);

        debug!(
            from = %geometry.from_code,
            to = %geometry.to_code,
            true_course = geometry.true_course_deg,
            distance_nm,
            ground_speed = wind.ground_speed_kt,
            time_min,
            "solved leg segment"
        );
        Ok(LegSolution {
            geometry,
            magnetic_course_deg,
            wind,
            magnetic_heading_deg,
            time_min,
            fuel_gal,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vfr_config::Hemisphere;
    use vfr_core::constants::EARTH_RADIUS_NM;

    fn equator(code: &str, lon_deg: f64, variation: Option<f64>) -> Waypoint {
        Waypoint {
            code: code.into(),
            name: String::new(),
            lat_degrees: 0.0,
            lat_minutes: 0.0,
            lat_seconds: 0.0,
            lat_direction: Hemisphere::North,
            lon_degrees: lon_deg,
            lon_minutes: 0.0,
            lon_seconds: 0.0,
            lon_direction: Hemisphere::East,
            magnetic_variation: variation,
            aerodrome: None,
        }
    }

    #[test]
    fn sixty_mile_leg_at_110_knots_takes_32_7_minutes() {
        let from = equator("AAA", 0.0, None);
        let to = equator("BBB", (60.0 / EARTH_RADIUS_NM).to_degrees(), None);
        let input = LegInput {
            tas_kt: 110.0,
            fuel_flow_gph: 8.0,
            wind: Wind::calm(),
        };
        let leg = NavigationLegSolver.solve(&from, &to, &input).unwrap();
        assert!((leg.geometry.distance_nm - 60.0).abs() < 1e-6);
        assert!((leg.geometry.true_course_deg - 90.0).abs() < 1e-9);
        assert_eq!(leg.ground_speed_kt(), 110.0);
        assert!((leg.time_min - 60.0 / 110.0 * 60.0).abs() < 1e-6);
        assert!((leg.time_min - 32.7).abs() < 0.05);
        assert!((leg.fuel_gal - 8.0 * 60.0 / 110.0).abs() < 1e-6);
    }

    #[test]
    fn east_variation_is_subtracted() {
        let from = equator("AAA", 0.0, Some(10.0));
        let to = equator("BBB", 1.0, Some(20.0));
        let input = LegInput {
            tas_kt: 100.0,
            fuel_flow_gph: 7.0,
            wind: Wind::calm(),
        };
        let leg = NavigationLegSolver.solve(&from, &to, &input).unwrap();
        assert_eq!(leg.geometry.magnetic_variation_deg, 15.0);
        assert!((leg.magnetic_course_deg - 75.0).abs() < 1e-9);
        assert!((leg.magnetic_heading_deg - 75.0).abs() < 1e-9);

        // west variation adds
        let from = equator("AAA", 0.0, Some(-16.0));
        let to = equator("BBB", 1.0, None);
        let leg = NavigationLegSolver.solve(&from, &to, &input).unwrap();
        assert!((leg.magnetic_course_deg - 106.0).abs() < 1e-9);
        assert!((true_from_magnetic(leg.magnetic_course_deg, -16.0) - 90.0).abs() < 1e-9);
    }

    #[test]
    fn identical_waypoints_are_invalid() {
        let a = equator("AAA", 5.0, None);
        let err = NavigationLegSolver
            .solve(
                &a,
                &a,
                &LegInput {
                    tas_kt: 100.0,
                    fuel_flow_gph: 7.0,
                    wind: Wind::calm(),
                },
            )
            .unwrap_err();
        assert!(matches!(err, NavigationError::DegenerateLeg { .. }));
    }

    #[test]
    fn partial_segment_scales_time_and_fuel() {
        let geometry = LegGeometry::between(&equator("AAA", 0.0, None), &equator("BBB", 1.0, None))
            .unwrap();
        let input = LegInput {
            tas_kt: 120.0,
            fuel_flow_gph: 9.0,
            wind: Wind::from_direction(90.0, 20.0),
        };
        let segment = NavigationLegSolver
            .solve_segment(geometry, 25.0, &input)
            .unwrap();
        assert!((segment.time_min - 15.0).abs() < 1e-6);
        assert!((segment.fuel_gal - 2.25).abs() < 1e-6);
    }
}
