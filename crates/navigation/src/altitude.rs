//! VFR cruising altitude selection.

/// Altitude at or above which the hemispheric cruising rule applies.
const HEMISPHERIC_RULE_FLOOR_FT: f64 = 3_000.0;

pub fn round_up_to_hundreds(altitude_ft: f64) -> f64 {
    (altitude_ft / 100.0).ceil() * 100.0
}

/// Lowest VFR cruising altitude not below `minimum_ft` for a magnetic course.
///
/// Below 3000 ft the minimum is rounded up to the next hundred feet. From
/// 3000 ft up, courses 000-179 fly odd thousands + 500 and courses 180-359
/// fly even thousands + 500.
pub fn vfr_cruising_altitude(minimum_ft: f64, magnetic_course_deg: f64) -> f64 {
    if minimum_ft < HEMISPHERIC_RULE_FLOOR_FT {
        return round_up_to_hundreds(minimum_ft);
    }
    let eastbound = vfr_core::units::normalize_degrees(magnetic_course_deg) < 180.0;
    let mut thousands = ((minimum_ft - 500.0) / 1_000.0).ceil() as i64;
    let odd = thousands.rem_euclid(2) == 1;
    if odd != eastbound {
        thousands += 1;
    }
    thousands as f64 * 1_000.0 + 500.0
}
