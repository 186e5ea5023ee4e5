//! Core units, constants, and shared primitives for the VFR flight planner workspace.

/// Physical and aviation constants. Distances are nautical miles unless stated otherwise.
pub mod constants {
    /// Mean Earth radius (NM).
    pub const EARTH_RADIUS_NM: f64 = 3_440.065;
    /// Minutes per hour.
    pub const MINUTES_PER_HOUR: f64 = 60.0;
    /// Standard altimeter setting (inHg).
    pub const STANDARD_ALTIMETER_INHG: f64 = 29.92;
    /// ISA sea-level temperature (°C).
    pub const ISA_SEA_LEVEL_TEMPERATURE_C: f64 = 15.0;
    /// ISA temperature lapse rate (°C per ft).
    pub const ISA_LAPSE_RATE_C_PER_FT: f64 = 0.001_981_2;
    /// Celsius to Kelvin offset.
    pub const KELVIN_OFFSET: f64 = 273.15;
}

/// Basic unit conversion and angle helpers.
pub mod units {
    use super::constants::MINUTES_PER_HOUR;

    /// Convert hours to minutes.
    #[inline]
    pub fn hours_to_minutes(v: f64) -> f64 {
        v * MINUTES_PER_HOUR
    }

    /// Convert minutes to hours.
    #[inline]
    pub fn minutes_to_hours(v: f64) -> f64 {
        v / MINUTES_PER_HOUR
    }

    /// Wrap an angle in degrees into `[0, 360)`.
    #[inline]
    pub fn normalize_degrees(angle: f64) -> f64 {
        let wrapped = angle.rem_euclid(360.0);
        // rem_euclid can round up to exactly 360 for tiny negative inputs
        if wrapped >= 360.0 { 0.0 } else { wrapped }
    }

    /// Wrap an angle in radians into `(-π, π]`.
    #[inline]
    pub fn wrap_pi(angle: f64) -> f64 {
        use std::f64::consts::{PI, TAU};
        let mut wrapped = angle.rem_euclid(TAU);
        if wrapped > PI {
            wrapped -= TAU;
        }
        wrapped
    }

    /// Smallest signed difference `a - b` in degrees, in `(-180, 180]`.
    #[inline]
    pub fn angle_difference_degrees(a: f64, b: f64) -> f64 {
        wrap_pi((a - b).to_radians()).to_degrees()
    }
}

/// Minimal vector helpers to avoid ad-hoc `[f64; 3]` math everywhere.
pub mod vector {
    /// Alias for a 3D vector; unit-sphere positions in the navigation code.
    pub type Vector3 = [f64; 3];

    /// Euclidean norm of a vector.
    #[inline]
    pub fn norm(v: &Vector3) -> f64 {
        dot(v, v).sqrt()
    }

    /// Dot product of two vectors.
    #[inline]
    pub fn dot(a: &Vector3, b: &Vector3) -> f64 {
        a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
    }

    /// Cross product `a × b`.
    #[inline]
    pub fn cross(a: &Vector3, b: &Vector3) -> Vector3 {
        [
            a[1] * b[2] - a[2] * b[1],
            a[2] * b[0] - a[0] * b[2],
            a[0] * b[1] - a[1] * b[0],
        ]
    }

    /// Scale a vector by a scalar.
    #[inline]
    pub fn scale(v: &Vector3, s: f64) -> Vector3 {
        [v[0] * s, v[1] * s, v[2] * s]
    }

    /// Unit vector in the direction of `v`, or `None` for a (near) zero vector.
    #[inline]
    pub fn normalize(v: &Vector3) -> Option<Vector3> {
        let n = norm(v);
        if n > 1e-12 { Some(scale(v, 1.0 / n)) } else { None }
    }

    /// Earth-centred unit vector for a latitude/longitude pair in radians.
    #[inline]
    pub fn from_lat_lon(lat: f64, lon: f64) -> Vector3 {
        [lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin()]
    }
}

/// International Standard Atmosphere helpers used for pressure altitude and airspeed conversion.
pub mod atmosphere {
    use super::constants::{
        ISA_LAPSE_RATE_C_PER_FT, ISA_SEA_LEVEL_TEMPERATURE_C, KELVIN_OFFSET,
        STANDARD_ALTIMETER_INHG,
    };

    /// Pressure altitude (ft) from field elevation and the local altimeter setting.
    #[inline]
    pub fn pressure_altitude_ft(elevation_ft: f64, altimeter_inhg: f64) -> f64 {
        elevation_ft + (STANDARD_ALTIMETER_INHG - altimeter_inhg) * 1_000.0
    }

    /// ISA temperature (°C) at a pressure altitude.
    #[inline]
    pub fn isa_temperature_c(pressure_alt_ft: f64) -> f64 {
        ISA_SEA_LEVEL_TEMPERATURE_C - ISA_LAPSE_RATE_C_PER_FT * pressure_alt_ft
    }

    /// Density ratio σ = ρ/ρ₀ from pressure altitude and outside air temperature.
    pub fn density_ratio(pressure_alt_ft: f64, temperature_c: f64) -> f64 {
        let pressure_ratio = (1.0 - 6.875_6e-6 * pressure_alt_ft).powf(5.255_9);
        let temperature_ratio = (temperature_c + KELVIN_OFFSET)
            / (ISA_SEA_LEVEL_TEMPERATURE_C + KELVIN_OFFSET);
        pressure_ratio / temperature_ratio
    }

    /// Calibrated airspeed from true airspeed, ignoring compressibility.
    #[inline]
    pub fn kcas_from_ktas(ktas: f64, pressure_alt_ft: f64, temperature_c: f64) -> f64 {
        ktas * density_ratio(pressure_alt_ft, temperature_c).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_degrees_wraps_both_directions() {
        assert_eq!(units::normalize_degrees(370.0), 10.0);
        assert_eq!(units::normalize_degrees(-90.0), 270.0);
        assert_eq!(units::normalize_degrees(360.0), 0.0);
        assert!(units::normalize_degrees(-1e-18) < 360.0);
    }

    #[test]
    fn angle_difference_takes_short_way_round() {
        assert!((units::angle_difference_degrees(10.0, 350.0) - 20.0).abs() < 1e-9);
        assert!((units::angle_difference_degrees(350.0, 10.0) + 20.0).abs() < 1e-9);
    }

    #[test]
    fn standard_day_at_sea_level_has_unit_density() {
        assert!((atmosphere::density_ratio(0.0, 15.0) - 1.0).abs() < 1e-12);
        assert_eq!(atmosphere::kcas_from_ktas(100.0, 0.0, 15.0), 100.0);
    }

    #[test]
    fn calibrated_airspeed_drops_with_altitude() {
        let kcas = atmosphere::kcas_from_ktas(110.0, 6_000.0, atmosphere::isa_temperature_c(6_000.0));
        // roughly 2% per thousand feet
        assert!(kcas > 95.0 && kcas < 102.0, "kcas = {kcas}");
    }

    #[test]
    fn low_altimeter_raises_pressure_altitude() {
        assert!((atmosphere::pressure_altitude_ft(1_000.0, 29.42) - 1_500.0).abs() < 1e-9);
    }

    #[test]
    fn cross_product_is_orthogonal() {
        let a = [1.0, 0.0, 0.0];
        let b = [0.0, 1.0, 0.0];
        assert_eq!(vector::cross(&a, &b), [0.0, 0.0, 1.0]);
        assert!(vector::normalize(&[0.0, 0.0, 0.0]).is_none());
    }
}
