//! Wind triangle by vector decomposition along and across the track.

use serde::Serialize;
use vfr_config::Wind;
use vfr_core::units::normalize_degrees;

use crate::NavigationError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WindSolution {
    /// Positive to the right of track.
    pub wind_correction_angle_deg: f64,
    pub true_heading_deg: f64,
    pub ground_speed_kt: f64,
    /// Along-track component; negative for a tailwind.
    pub headwind_kt: f64,
    /// Across-track component; positive from the right.
    pub crosswind_kt: f64,
}

/// Head- and crosswind relative to a direction, wind from `wind_from_deg`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WindComponents {
    pub headwind_kt: f64,
    pub crosswind_kt: f64,
}

/// Components of a wind blowing from `wind_from_deg` relative to `direction_deg`.
pub fn wind_components(direction_deg: f64, wind_from_deg: f64, speed_kt: f64) -> WindComponents {
    let relative = (wind_from_deg - direction_deg).to_radians();
    WindComponents {
        headwind_kt: speed_kt * relative.cos(),
        crosswind_kt: speed_kt * relative.sin(),
    }
}

/// Direction and speed of a wind, `None` when calm. Variable winds with a
/// speed cannot be resolved into a vector.
pub fn resolve_wind(wind: &Wind) -> Result<Option<(f64, f64)>, NavigationError> {
    if !wind.speed_kt.is_finite() || wind.speed_kt < 0.0 {
        return Err(NavigationError::InvalidWind(format!(
            "speed {} kt must be a non-negative number",
            wind.speed_kt
        )));
    }
    if wind.speed_kt == 0.0 {
        return Ok(None);
    }
    match wind.direction {
        Some(direction) if direction.is_finite() => Ok(Some((direction, wind.speed_kt))),
        Some(direction) => Err(NavigationError::InvalidWind(format!(
            "direction {direction} is not a number"
        ))),
        None => Err(NavigationError::InvalidWind(format!(
            "{} kt wind has no direction",
            wind.speed_kt
        ))),
    }
}

/// Heading and ground speed that hold `true_course_deg` at `tas_kt`.
///
/// The wind vector is split into along-track and cross-track parts; the air
/// vector cancels the cross-track part and the remainder of the airspeed adds
/// to the along-track wind. Calm wind short-circuits to a zero correction.
pub fn solve_wind_triangle(
    true_course_deg: f64,
    tas_kt: f64,
    wind: &Wind,
) -> Result<WindSolution, NavigationError> {
    if !tas_kt.is_finite() || tas_kt <= 0.0 {
        return Err(NavigationError::InvalidAirspeed(tas_kt));
    }
    let Some((wind_from_deg, speed_kt)) = resolve_wind(wind)? else {
        return Ok(WindSolution {
            wind_correction_angle_deg: 0.0,
            true_heading_deg: normalize_degrees(true_course_deg),
            ground_speed_kt: tas_kt,
            headwind_kt: 0.0,
            crosswind_kt: 0.0,
        });
    };

    let course = true_course_deg.to_radians();
    let from = wind_from_deg.to_radians();
    // east, north
    let track = (course.sin(), course.cos());
    let right = (course.cos(), -course.sin());
    let wind_vector = (-speed_kt * from.sin(), -speed_kt * from.cos());

    let along = wind_vector.0 * track.0 + wind_vector.1 * track.1;
    let across = wind_vector.0 * right.0 + wind_vector.1 * right.1;
    if across.abs() > tas_kt {
        return Err(NavigationError::WindExceedsAirspeed {
            crosswind_kt: across.abs(),
            tas_kt,
        });
    }

    let air_along = (tas_kt * tas_kt - across * across).sqrt();
    let ground_speed_kt = air_along + along;
    if ground_speed_kt <= 0.0 {
        return Err(NavigationError::NonPositiveGroundSpeed { ground_speed_kt });
    }
    let wind_correction_angle_deg = (-across).atan2(air_along).to_degrees();

    Ok(WindSolution {
        wind_correction_angle_deg,
        true_heading_deg: normalize_degrees(true_course_deg + wind_correction_angle_deg),
        ground_speed_kt,
        headwind_kt: -along,
        // wind drifting the aircraft left comes from the right
        crosswind_kt: -across,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calm_wind_is_identity_for_any_course() {
        for course in [0.0, 45.0, 90.0, 179.9, 270.0, 359.0] {
            let solution = solve_wind_triangle(course, 110.0, &Wind::calm()).unwrap();
            assert_eq!(solution.wind_correction_angle_deg, 0.0);
            assert_eq!(solution.ground_speed_kt, 110.0);
            assert_eq!(solution.true_heading_deg, course);
        }
    }

    #[test]
    fn direct_headwind_and_tailwind() {
        let head = solve_wind_triangle(90.0, 110.0, &Wind::from_direction(90.0, 20.0)).unwrap();
        assert!((head.ground_speed_kt - 90.0).abs() < 1e-9);
        assert!(head.wind_correction_angle_deg.abs() < 1e-9);
        assert!((head.headwind_kt - 20.0).abs() < 1e-9);

        let tail = solve_wind_triangle(90.0, 110.0, &Wind::from_direction(270.0, 20.0)).unwrap();
        assert!((tail.ground_speed_kt - 130.0).abs() < 1e-9);
    }

    #[test]
    fn crosswind_turns_heading_into_wind() {
        // eastbound with wind from the south: crab right
        let solution = solve_wind_triangle(90.0, 100.0, &Wind::from_direction(180.0, 20.0)).unwrap();
        let expected = (20.0f64 / 100.0).asin().to_degrees();
        assert!((solution.wind_correction_angle_deg - expected).abs() < 1e-9);
        assert!((solution.true_heading_deg - (90.0 + expected)).abs() < 1e-9);
        assert!((solution.ground_speed_kt - (100.0f64.powi(2) - 400.0).sqrt()).abs() < 1e-9);
        assert!((solution.crosswind_kt - 20.0).abs() < 1e-9);

        // westbound with the same wind: crab left
        let west = solve_wind_triangle(270.0, 100.0, &Wind::from_direction(180.0, 20.0)).unwrap();
        assert!((west.wind_correction_angle_deg + expected).abs() < 1e-9);
    }

    #[test]
    fn wind_stronger_than_airspeed_is_rejected() {
        assert!(matches!(
            solve_wind_triangle(0.0, 50.0, &Wind::from_direction(90.0, 60.0)),
            Err(NavigationError::WindExceedsAirspeed { .. })
        ));
        assert!(matches!(
            solve_wind_triangle(0.0, 50.0, &Wind::from_direction(0.0, 60.0)),
            Err(NavigationError::NonPositiveGroundSpeed { .. })
        ));
    }

    #[test]
    fn directionless_wind_with_speed_is_invalid() {
        let wind = Wind {
            direction: None,
            speed_kt: 5.0,
        };
        assert!(matches!(
            solve_wind_triangle(0.0, 100.0, &wind),
            Err(NavigationError::InvalidWind(_))
        ));
    }

    #[test]
    fn runway_components() {
        let c = wind_components(240.0, 270.0, 10.0);
        assert!((c.headwind_kt - 10.0 * 30f64.to_radians().cos()).abs() < 1e-9);
        assert!((c.crosswind_kt - 5.0).abs() < 1e-9);
        let tail = wind_components(60.0, 240.0, 10.0);
        assert!((tail.headwind_kt + 10.0).abs() < 1e-9);
    }
}
