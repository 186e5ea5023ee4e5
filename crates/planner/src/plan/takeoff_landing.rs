//! Takeoff and landing distances per runway at the departure and arrival aerodromes.

use serde::Serialize;
use tracing::{debug, warn};
use vfr_config::{PerformanceProfile, Runway, Terminal};
use vfr_core::atmosphere::pressure_altitude_ft;
use vfr_navigation::{magnetic_from_true, resolve_wind, wind_components};
use vfr_tables::{
    CorrectedDistances, ExtrapolationPolicy, LookupPoint, PerformanceTableStore, RunwayPhase,
    RunwayWindConditions, apply_corrections,
};

use crate::error::PlanError;

/// Conditions for a single takeoff or landing distance computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TakeoffLandingConditions {
    pub phase: RunwayPhase,
    pub weight_lb: f64,
    pub pressure_alt_ft: f64,
    pub temperature_c: f64,
    /// Runway headwind component; negative for a tailwind.
    pub headwind_kt: f64,
    pub surface_id: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunwayPerformance {
    pub runway_id: u32,
    pub designator: String,
    pub available_length_ft: f64,
    pub headwind_kt: f64,
    pub crosswind_kt: f64,
    pub wind_factor: f64,
    pub surface_percent: f64,
    pub ground_roll_ft: f64,
    pub obstacle_clearance_ft: f64,
    pub fits_runway: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AerodromePerformance {
    pub aerodrome: String,
    pub takeoff: bool,
    pub weight_lb: f64,
    pub pressure_alt_ft: f64,
    pub temperature_c: f64,
    /// Uncorrected table distances.
    pub table_ground_roll_ft: f64,
    pub table_obstacle_clearance_ft: f64,
    pub runways: Vec<RunwayPerformance>,
}

impl AerodromePerformance {
    pub fn any_runway_fits(&self) -> bool {
        self.runways.iter().any(|r| r.fits_runway)
    }
}

/// Interpolate and correct one takeoff or landing distance.
pub fn takeoff_landing_distance(
    store: &PerformanceTableStore,
    profile: &PerformanceProfile,
    policy: &ExtrapolationPolicy,
    conditions: &TakeoffLandingConditions,
) -> Result<CorrectedDistances, PlanError> {
    let table = match conditions.phase {
        RunwayPhase::Takeoff => store.takeoff(),
        RunwayPhase::Landing => store.landing(),
    }
    .map_err(PlanError::tables(profile.id))?;
    let point = LookupPoint::new(
        conditions.weight_lb,
        conditions.pressure_alt_ft,
        conditions.temperature_c,
    );
    let raw = table
        .interpolate(&point, policy)
        .map_err(PlanError::tables(profile.id))?;
    Ok(apply_corrections(
        profile,
        conditions.phase,
        raw,
        RunwayWindConditions {
            headwind_kt: conditions.headwind_kt,
            surface_id: conditions.surface_id,
        },
    ))
}

/// Evaluate every runway of a terminal aerodrome at the given weight.
pub fn evaluate_terminal(
    store: &PerformanceTableStore,
    profile: &PerformanceProfile,
    policy: &ExtrapolationPolicy,
    terminal: &Terminal,
    phase: RunwayPhase,
    weight_lb: f64,
) -> Result<AerodromePerformance, PlanError> {
    let aerodrome = &terminal.aerodrome;
    let weather = &terminal.weather;
    let elevation_ft = aerodrome.aerodrome.as_ref().map_or(0.0, |data| data.elevation_ft);
    let pressure_alt_ft = pressure_altitude_ft(elevation_ft, weather.altimeter_inhg);
    let variation = aerodrome.magnetic_variation.unwrap_or(0.0);
    let wind = resolve_wind(&weather.wind).map_err(PlanError::navigation(profile.id))?;

    let still_air = takeoff_landing_distance(
        store,
        profile,
        policy,
        &TakeoffLandingConditions {
            phase,
            weight_lb,
            pressure_alt_ft,
            temperature_c: weather.temperature_c,
            headwind_kt: 0.0,
            surface_id: None,
        },
    )?;

    let runways: &[Runway] = aerodrome
        .aerodrome
        .as_ref()
        .map(|data| data.runways.as_slice())
        .unwrap_or_default();
    let mut results = Vec::with_capacity(runways.len());
    for runway in runways {
        let heading = f64::from(runway.number) * 10.0;
        let components = wind.map(|(from_true, speed)| {
            wind_components(heading, magnetic_from_true(from_true, variation), speed)
        });
        let (headwind_kt, crosswind_kt) =
            components.map_or((0.0, 0.0), |c| (c.headwind_kt, c.crosswind_kt));

        let corrected = apply_corrections(
            profile,
            phase,
            still_air.table,
            RunwayWindConditions {
                headwind_kt,
                surface_id: Some(runway.surface_id),
            },
        );
        let available_length_ft = match phase {
            RunwayPhase::Takeoff => runway.length_ft,
            RunwayPhase::Landing => runway.landing_length_ft.unwrap_or(runway.length_ft),
        };
        let fits_runway = corrected.ground_roll_ft <= available_length_ft;
        debug!(
            aerodrome = %aerodrome.code,
            runway = %runway.designator(),
            headwind_kt,
            ground_roll_ft = corrected.ground_roll_ft,
            available_length_ft,
            "runway performance"
        );
        results.push(RunwayPerformance {
            runway_id: runway.id,
            designator: runway.designator(),
            available_length_ft,
            headwind_kt,
            crosswind_kt,
            wind_factor: corrected.wind_factor,
            surface_percent: corrected.surface_percent,
            ground_roll_ft: corrected.ground_roll_ft,
            obstacle_clearance_ft: corrected.obstacle_clearance_ft,
            fits_runway,
        });
    }

    if runways.is_empty() {
        warn!(aerodrome = %aerodrome.code, "no runway data; reporting still-air table distances only");
    }
    Ok(AerodromePerformance {
        aerodrome: aerodrome.code.clone(),
        takeoff: phase.is_takeoff(),
        weight_lb,
        pressure_alt_ft,
        temperature_c: weather.temperature_c,
        table_ground_roll_ft: still_air.table.groundroll_ft,
        table_obstacle_clearance_ft: still_air.table.obstacle_clearance_ft,
        runways: results,
    })
}
