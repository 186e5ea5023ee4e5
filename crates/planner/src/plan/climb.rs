//! Climb segment from cumulative climb-table figures.

use serde::Serialize;
use tracing::debug;
use vfr_core::atmosphere::isa_temperature_c;
use vfr_config::ClimbRow;
use vfr_tables::{ExtrapolationPolicy, LookupPoint, Table, TableError};

/// Pressure-altitude change (ft) below which no climb is flown.
const LEVEL_TOLERANCE_FT: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClimbSegment {
    pub from_pressure_alt_ft: f64,
    pub to_pressure_alt_ft: f64,
    /// Altitude actually reached, below the target when the leg is too short.
    pub reached_pressure_alt_ft: f64,
    pub kias: f64,
    pub fpm: f64,
    pub time_min: f64,
    pub fuel_gal: f64,
    pub distance_nm: f64,
    /// Multiplier applied for temperatures above ISA.
    pub temperature_factor: f64,
    pub complete: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClimbRequest {
    pub weight_lb: f64,
    pub from_pressure_alt_ft: f64,
    pub to_pressure_alt_ft: f64,
    pub temperature_c: f64,
    /// Percent increase in time, fuel and distance per degree above ISA.
    pub percent_per_degree_above_isa: f64,
    /// Track distance available for the climb.
    pub available_distance_nm: f64,
}

/// Climb figures between two pressure altitudes.
///
/// Table values are cumulative from sea level, so the segment is the
/// difference of the lookups at the two altitudes. Returns `None` when the
/// target is not above the start; descents are flown at cruise figures.
pub fn climb_segment(
    table: &Table<ClimbRow>,
    policy: &ExtrapolationPolicy,
    request: &ClimbRequest,
) -> Result<Option<ClimbSegment>, TableError> {
    let from = request.from_pressure_alt_ft;
    let to = request.to_pressure_alt_ft;
    if to - from < LEVEL_TOLERANCE_FT {
        return Ok(None);
    }

    let bottom = table.interpolate(
        &LookupPoint::new(request.weight_lb, from, request.temperature_c),
        policy,
    )?;
    let top = table.interpolate(
        &LookupPoint::new(request.weight_lb, to, request.temperature_c),
        policy,
    )?;

    let above_isa = (request.temperature_c - isa_temperature_c(to)).max(0.0);
    let temperature_factor = 1.0 + request.percent_per_degree_above_isa * above_isa / 100.0;
    let mut time_min = (top.time_min - bottom.time_min).max(0.0) * temperature_factor;
    let mut fuel_gal = (top.fuel_gal - bottom.fuel_gal).max(0.0) * temperature_factor;
    let mut distance_nm = (top.distance_nm - bottom.distance_nm).max(0.0) * temperature_factor;

    let mut reached = to;
    let complete = distance_nm <= request.available_distance_nm;
    if !complete {
        let fraction = request.available_distance_nm / distance_nm;
        time_min *= fraction;
        fuel_gal *= fraction;
        distance_nm = request.available_distance_nm;
        reached = from + (to - from) * fraction;
    }

    let fpm = if time_min > 0.0 {
        (reached - from) / time_min
    } else {
        top.fpm
    };
    debug!(from, to, reached, time_min, fuel_gal, distance_nm, temperature_factor, "climb segment");
    Ok(Some(ClimbSegment {
        from_pressure_alt_ft: from,
        to_pressure_alt_ft: to,
        reached_pressure_alt_ft: reached,
        kias: top.kias,
        fpm,
        time_min,
        fuel_gal,
        distance_nm,
        temperature_factor,
        complete,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use vfr_tables::TableKind;

    fn row(alt: f64, time: f64, fuel: f64, distance: f64) -> ClimbRow {
        ClimbRow {
            weight_lb: 2_300.0,
            pressure_alt_ft: alt,
            temperature_c: 15.0,
            kias: 74.0,
            fpm: 700.0,
            time_min: time,
            fuel_gal: fuel,
            distance_nm: distance,
        }
    }

    fn table() -> Table<ClimbRow> {
        Table::new(
            TableKind::Climb,
            vec![
                row(0.0, 0.0, 0.0, 0.0),
                row(2_000.0, 3.0, 0.8, 4.0),
                row(4_000.0, 6.0, 1.6, 8.0),
                row(6_000.0, 10.0, 2.5, 14.0),
            ],
        )
        .unwrap()
    }

    fn request(from: f64, to: f64, available: f64) -> ClimbRequest {
        ClimbRequest {
            weight_lb: 2_300.0,
            from_pressure_alt_ft: from,
            to_pressure_alt_ft: to,
            temperature_c: 15.0,
            percent_per_degree_above_isa: 0.0,
            available_distance_nm: available,
        }
    }

    #[test]
    fn segment_is_difference_of_cumulative_values() {
        let policy = ExtrapolationPolicy::default();
        let segment = climb_segment(&table(), &policy, &request(1_000.0, 4_500.0, 50.0))
            .unwrap()
            .unwrap();
        // 1000 ft: 1.5 min / 2 nm; 4500 ft: 7 min / 9.5 nm
        assert!((segment.time_min - 5.5).abs() < 1e-9);
        assert!((segment.distance_nm - 7.5).abs() < 1e-9);
        assert!(segment.complete);
        assert_eq!(segment.reached_pressure_alt_ft, 4_500.0);
    }

    #[test]
    fn level_and_descending_legs_have_no_climb() {
        let policy = ExtrapolationPolicy::default();
        assert!(climb_segment(&table(), &policy, &request(4_500.0, 4_500.0, 10.0))
            .unwrap()
            .is_none());
        assert!(climb_segment(&table(), &policy, &request(4_500.0, 2_500.0, 10.0))
            .unwrap()
            .is_none());
    }

    #[test]
    fn short_leg_prorates_the_climb() {
        let policy = ExtrapolationPolicy::default();
        let segment = climb_segment(&table(), &policy, &request(0.0, 4_000.0, 4.0))
            .unwrap()
            .unwrap();
        assert!(!segment.complete);
        assert!((segment.reached_pressure_alt_ft - 2_000.0).abs() < 1e-9);
        assert!((segment.time_min - 3.0).abs() < 1e-9);
        assert!((segment.fuel_gal - 0.8).abs() < 1e-9);
    }

    #[test]
    fn hot_day_lengthens_the_climb() {
        let policy = ExtrapolationPolicy::default();
        let mut hot = request(0.0, 4_000.0, 50.0);
        hot.temperature_c = 15.0;
        hot.percent_per_degree_above_isa = 1.0;
        let segment = climb_segment(&table(), &policy, &hot).unwrap().unwrap();
        // ISA at 4000 ft is 7.08 C, so 7.92 C above
        let factor = 1.0 + (15.0 - isa_temperature_c(4_000.0)) / 100.0;
        assert!((segment.temperature_factor - factor).abs() < 1e-12);
        assert!((segment.time_min - 6.0 * factor).abs() < 1e-9);
    }
}
