//! Flight plan assembly: sequences legs with their climb segments, accumulates
//! totals, and combines fuel, weight and balance and runway performance.

pub mod climb;
pub mod takeoff_landing;

use serde::Serialize;
use tracing::{debug, info, warn};
use vfr_config::{
    ClimbRow, CruiseRow, Flight, Leg, PerformanceProfile, PlannerSettings, TableKind, Terminal,
};
use vfr_core::atmosphere::{kcas_from_ktas, pressure_altitude_ft};
use vfr_core::units::minutes_to_hours;
use vfr_fuel::{BurnAllocation, FuelBudget, FuelCalculator, FuelRequirement};
use vfr_navigation::{
    LegGeometry, LegInput, NavigationLegSolver, magnetic_from_true, vfr_cruising_altitude,
};
use vfr_tables::{
    CorrectedDistances, ExtrapolationPolicy, LookupPoint, PerformanceTableStore, RunwayPhase,
    Table,
};
use vfr_weight_balance::{Loadout, WeightBalanceCalculator, WeightBalanceReport};

use self::climb::{ClimbRequest, ClimbSegment, climb_segment};
use self::takeoff_landing::{
    AerodromePerformance, TakeoffLandingConditions, evaluate_terminal, takeoff_landing_distance,
};
use crate::error::PlanError;

/// One row of the navigation log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavLogEntry {
    pub leg_index: usize,
    pub from_waypoint: String,
    pub to_waypoint: String,
    pub altitude_ft: f64,
    pub pressure_alt_ft: f64,
    pub rpm: f64,
    pub temperature_c: f64,
    pub ktas: f64,
    pub kcas: f64,
    pub true_track_deg: f64,
    pub wind_direction_deg: Option<f64>,
    pub wind_speed_kt: f64,
    pub true_heading_deg: f64,
    pub magnetic_variation_deg: f64,
    pub magnetic_heading_deg: f64,
    pub ground_speed_kt: f64,
    pub climb_distance_nm: f64,
    pub enroute_distance_nm: f64,
    pub total_distance_nm: f64,
    pub climb_time_min: f64,
    pub enroute_time_min: f64,
    pub total_time_min: f64,
    pub climb_fuel_gal: f64,
    pub cruise_gph: f64,
    pub enroute_fuel_gal: f64,
    pub total_fuel_gal: f64,
    pub cumulative_distance_nm: f64,
    pub cumulative_time_min: f64,
    pub cumulative_fuel_gal: f64,
}

/// Climb and enroute totals, kept apart and summed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct NavLogTotals {
    pub climb_distance_nm: f64,
    pub enroute_distance_nm: f64,
    pub distance_nm: f64,
    pub climb_time_min: f64,
    pub enroute_time_min: f64,
    pub time_min: f64,
    pub climb_fuel_gal: f64,
    pub enroute_fuel_gal: f64,
    pub fuel_gal: f64,
}

impl NavLogTotals {
    fn add(&mut self, entry: &NavLogEntry) {
        self.climb_distance_nm += entry.climb_distance_nm;
        self.enroute_distance_nm += entry.enroute_distance_nm;
        self.climb_time_min += entry.climb_time_min;
        self.enroute_time_min += entry.enroute_time_min;
        self.climb_fuel_gal += entry.climb_fuel_gal;
        self.enroute_fuel_gal += entry.enroute_fuel_gal;
        self.distance_nm = self.climb_distance_nm + self.enroute_distance_nm;
        self.time_min = self.climb_time_min + self.enroute_time_min;
        self.fuel_gal = self.climb_fuel_gal + self.enroute_fuel_gal;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavLog {
    pub flight_id: u32,
    pub weight_lb: f64,
    pub entries: Vec<NavLogEntry>,
    pub climbs: Vec<Option<ClimbSegment>>,
    pub totals: NavLogTotals,
}

/// Complete plan for one flight.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlightPlan {
    pub flight_id: u32,
    pub profile_id: u32,
    pub profile_name: String,
    pub nav_log: NavLog,
    pub fuel: FuelBudget,
    pub taxi_burn: BurnAllocation,
    pub trip_burn: BurnAllocation,
    pub weight_balance: WeightBalanceReport,
    pub takeoff: AerodromePerformance,
    pub landing: AerodromePerformance,
    pub warnings: Vec<String>,
}

/// Interpolated and corrected takeoff or landing distance.
pub fn compute_takeoff_landing_distance(
    profile: &PerformanceProfile,
    conditions: &TakeoffLandingConditions,
    settings: &PlannerSettings,
) -> Result<CorrectedDistances, PlanError> {
    let store = PerformanceTableStore::from_profile(profile).map_err(PlanError::tables(profile.id))?;
    takeoff_landing_distance(&store, profile, &ExtrapolationPolicy::from(settings), conditions)
}

/// Weight, moment and CG of a loadout, validated against the profile's envelopes.
pub fn compute_weight_balance(
    profile: &PerformanceProfile,
    loadout: &Loadout,
) -> Result<WeightBalanceReport, PlanError> {
    let calculator =
        WeightBalanceCalculator::new(profile).map_err(PlanError::weight_balance(profile.id))?;
    calculator
        .evaluate(loadout)
        .map_err(PlanError::weight_balance(profile.id))
}

/// Navigation log for a flight. Table lookups use the weight at takeoff:
/// everything loaded less the taxi fuel.
pub fn compute_navigation_log(
    flight: &Flight,
    profile: &PerformanceProfile,
    settings: &PlannerSettings,
) -> Result<NavLog, PlanError> {
    check_flight(flight, profile)?;
    let store = PerformanceTableStore::from_profile(profile).map_err(PlanError::tables(profile.id))?;
    navigation_log(flight, profile, settings, &store, loaded_takeoff_weight_lb(flight, profile))
}

/// Full plan: weight and balance, nav log, fuel budget, burn allocation and
/// runway performance. Fails on the first error.
pub fn plan_flight(
    flight: &Flight,
    profile: &PerformanceProfile,
    settings: &PlannerSettings,
) -> Result<FlightPlan, PlanError> {
    check_flight(flight, profile)?;
    let store = PerformanceTableStore::from_profile(profile).map_err(PlanError::tables(profile.id))?;
    store
        .require(&[TableKind::Takeoff, TableKind::Landing, TableKind::Climb, TableKind::Cruise])
        .map_err(PlanError::tables(profile.id))?;
    let policy = ExtrapolationPolicy::from(settings);

    let calculator =
        WeightBalanceCalculator::new(profile).map_err(PlanError::weight_balance(profile.id))?;
    let mut weight_balance = calculator
        .evaluate(&Loadout::from_flight(flight))
        .map_err(PlanError::weight_balance(profile.id))?;

    let fuel = FuelCalculator::new(profile, &flight.fuel).map_err(PlanError::fuel(profile.id))?;
    let taxi_gal = profile.take_off_taxi_fuel_gallons;
    let taxi_burn = fuel.allocate_burn(taxi_gal).map_err(PlanError::fuel(profile.id))?;
    let takeoff_weight_lb = weight_balance.ramp.weight_lb - taxi_gal * profile.fuel_density_lb_gal;

    let nav_log = navigation_log(flight, profile, settings, &store, takeoff_weight_lb)?;
    let totals = nav_log.totals;
    let budget = fuel
        .budget(&FuelRequirement {
            taxi_gal,
            climb_gal: totals.climb_fuel_gal,
            climb_hours: minutes_to_hours(totals.climb_time_min),
            enroute_gal: totals.enroute_fuel_gal,
            enroute_hours: minutes_to_hours(totals.enroute_time_min),
            added_hours: flight.added_enroute_time_hours,
            reserve_hours: flight.reserve_fuel_hours,
            contingency_hours: flight.contingency_fuel_hours,
        })
        .map_err(PlanError::fuel(profile.id))?;
    let trip_burn = fuel
        .allocate_burn(taxi_gal + budget.trip_gal())
        .map_err(PlanError::fuel(profile.id))?;

    calculator
        .apply_fuel_stages(&mut weight_balance, &taxi_burn.remaining(), &trip_burn.remaining())
        .map_err(PlanError::weight_balance(profile.id))?;
    let landing_weight_lb = weight_balance
        .landing
        .as_ref()
        .map_or(takeoff_weight_lb, |stage| stage.weight_lb);

    let takeoff = evaluate_terminal(
        &store,
        profile,
        &policy,
        &flight.departure,
        RunwayPhase::Takeoff,
        takeoff_weight_lb,
    )?;
    let landing = evaluate_terminal(
        &store,
        profile,
        &policy,
        &flight.arrival,
        RunwayPhase::Landing,
        landing_weight_lb,
    )?;

    let mut warnings = Vec::new();
    for performance in [&takeoff, &landing] {
        if !performance.runways.is_empty() && !performance.any_runway_fits() {
            let phase = if performance.takeoff { "takeoff" } else { "landing" };
            warnings.push(format!(
                "no runway at {} is long enough for the {phase} ground roll",
                performance.aerodrome
            ));
        }
    }
    for (leg_index, climb) in nav_log.climbs.iter().enumerate() {
        if let Some(climb) = climb.as_ref().filter(|c| !c.complete) {
            warnings.push(format!(
                "leg {leg_index}: climb to {:.0} ft pressure altitude only reaches {:.0} ft",
                climb.to_pressure_alt_ft, climb.reached_pressure_alt_ft
            ));
        }
    }
    warnings.extend(nav_log.entries.iter().filter_map(cruising_altitude_warning));
    for message in &warnings {
        warn!(flight_id = flight.id, "{message}");
    }
    // weight and balance warnings were logged when the fuel stages were applied
    warnings.extend(weight_balance.warnings.iter().cloned());

    info!(
        flight_id = flight.id,
        profile_id = profile.id,
        distance_nm = totals.distance_nm,
        time_min = totals.time_min,
        required_gal = budget.required_gal,
        on_board_gal = budget.on_board_gal,
        "flight plan assembled"
    );
    Ok(FlightPlan {
        flight_id: flight.id,
        profile_id: profile.id,
        profile_name: profile.name.clone(),
        nav_log,
        fuel: budget,
        taxi_burn,
        trip_burn,
        weight_balance,
        takeoff,
        landing,
        warnings,
    })
}

fn check_flight(flight: &Flight, profile: &PerformanceProfile) -> Result<(), PlanError> {
    if flight.profile_id != profile.id {
        return Err(PlanError::ProfileMismatch {
            flight_id: flight.id,
            expected: flight.profile_id,
            actual: profile.id,
        });
    }
    if flight.legs.is_empty() {
        return Err(PlanError::EmptyRoute(flight.id));
    }
    for (index, pair) in flight.legs.windows(2).enumerate() {
        if pair[0].to.code != pair[1].from.code {
            return Err(PlanError::RouteDiscontinuity {
                leg_index: index + 1,
                previous_to: pair[0].to.code.clone(),
                from: pair[1].from.code.clone(),
            });
        }
    }
    Ok(())
}

/// Warn when a leg is not flown at a VFR cruising altitude for its magnetic course.
fn cruising_altitude_warning(entry: &NavLogEntry) -> Option<String> {
    let magnetic_course_deg = magnetic_from_true(entry.true_track_deg, entry.magnetic_variation_deg);
    let expected_ft = vfr_cruising_altitude(entry.altitude_ft, magnetic_course_deg);
    ((expected_ft - entry.altitude_ft).abs() >= 1.0).then(|| {
        format!(
            "leg {}: {:.0} ft is not a VFR cruising altitude for magnetic course {:03.0}; next is {:.0} ft",
            entry.leg_index, entry.altitude_ft, magnetic_course_deg, expected_ft
        )
    })
}

/// Everything loaded, less the taxi fuel, without limit checks.
fn loaded_takeoff_weight_lb(flight: &Flight, profile: &PerformanceProfile) -> f64 {
    let persons: f64 = flight.persons.iter().map(|p| p.weight_lb).sum();
    let baggage: f64 = flight.baggage.iter().map(|b| b.weight_lb).sum();
    let fuel_gal: f64 = flight.fuel.iter().map(|f| f.gallons).sum();
    let fuel_gal = (fuel_gal - profile.take_off_taxi_fuel_gallons).max(0.0);
    profile.empty_weight_lb + persons + baggage + fuel_gal * profile.fuel_density_lb_gal
}

fn terminal_pressure_altitude_ft(terminal: &Terminal) -> f64 {
    let elevation_ft = terminal
        .aerodrome
        .aerodrome
        .as_ref()
        .map_or(0.0, |data| data.elevation_ft);
    pressure_altitude_ft(elevation_ft, terminal.weather.altimeter_inhg)
}

fn navigation_log(
    flight: &Flight,
    profile: &PerformanceProfile,
    settings: &PlannerSettings,
    store: &PerformanceTableStore,
    weight_lb: f64,
) -> Result<NavLog, PlanError> {
    let policy = ExtrapolationPolicy::from(settings);
    let climb_table = store.climb().map_err(PlanError::tables(profile.id))?;
    let cruise_table = store.cruise().map_err(PlanError::tables(profile.id))?;

    let mut current_pa = terminal_pressure_altitude_ft(&flight.departure);
    let mut totals = NavLogTotals::default();
    let mut entries = Vec::with_capacity(flight.legs.len());
    let mut climbs = Vec::with_capacity(flight.legs.len());

    for (leg_index, leg) in flight.legs.iter().enumerate() {
        let context = PlanError::at_leg(leg_index);
        let solved = solve_leg(
            leg,
            LegContext {
                profile,
                settings,
                policy: &policy,
                climb_table,
                cruise_table,
                weight_lb,
                bhp_percent: flight.bhp_percent,
                start_pressure_alt_ft: current_pa,
            },
        )
        .map_err(context)?;

        current_pa = solved
            .climb
            .as_ref()
            .map_or(solved.pressure_alt_ft, |c| c.reached_pressure_alt_ft);

        let mut entry = solved.entry;
        entry.leg_index = leg_index;
        totals.add(&entry);
        entry.cumulative_distance_nm = totals.distance_nm;
        entry.cumulative_time_min = totals.time_min;
        entry.cumulative_fuel_gal = totals.fuel_gal;
        debug!(
            leg_index,
            from = %entry.from_waypoint,
            to = %entry.to_waypoint,
            distance_nm = entry.total_distance_nm,
            time_min = entry.total_time_min,
            "nav log entry"
        );
        entries.push(entry);
        climbs.push(solved.climb);
    }

    Ok(NavLog {
        flight_id: flight.id,
        weight_lb,
        entries,
        climbs,
        totals,
    })
}

struct LegContext<'a> {
    profile: &'a PerformanceProfile,
    settings: &'a PlannerSettings,
    policy: &'a ExtrapolationPolicy,
    climb_table: &'a Table<ClimbRow>,
    cruise_table: &'a Table<CruiseRow>,
    weight_lb: f64,
    bhp_percent: f64,
    start_pressure_alt_ft: f64,
}

struct SolvedLeg {
    entry: NavLogEntry,
    climb: Option<ClimbSegment>,
    pressure_alt_ft: f64,
}

fn solve_leg(leg: &Leg, ctx: LegContext<'_>) -> Result<SolvedLeg, PlanError> {
    let profile_id = ctx.profile.id;
    let geometry =
        LegGeometry::between(&leg.from, &leg.to).map_err(PlanError::navigation(profile_id))?;
    let altimeter = leg.altimeter_inhg.unwrap_or(ctx.settings.standard_altimeter_inhg);
    let pressure_alt_ft = pressure_altitude_ft(leg.altitude_ft, altimeter);

    let cruise = ctx
        .cruise_table
        .interpolate(
            &LookupPoint::new(ctx.weight_lb, pressure_alt_ft, leg.temperature_c)
                .with_power(ctx.bhp_percent),
            ctx.policy,
        )
        .map_err(PlanError::tables(profile_id))?;
    let climb = climb_segment(
        ctx.climb_table,
        ctx.policy,
        &ClimbRequest {
            weight_lb: ctx.weight_lb,
            from_pressure_alt_ft: ctx.start_pressure_alt_ft,
            to_pressure_alt_ft: pressure_alt_ft,
            temperature_c: leg.temperature_c,
            percent_per_degree_above_isa: ctx.profile.percent_increase_climb_temperature_c,
            available_distance_nm: geometry.distance_nm,
        },
    )
    .map_err(PlanError::tables(profile_id))?;

    let (climb_distance_nm, climb_time_min, climb_fuel_gal) = climb
        .as_ref()
        .map_or((0.0, 0.0, 0.0), |c| (c.distance_nm, c.time_min, c.fuel_gal));
    let total_distance_nm = geometry.distance_nm;
    let enroute_distance_nm = (total_distance_nm - climb_distance_nm).max(0.0);

    let solution = NavigationLegSolver.solve_segment(
        geometry,
        enroute_distance_nm,
        &LegInput {
            tas_kt: cruise.ktas,
            fuel_flow_gph: cruise.gph,
            wind: leg.wind,
        },
    )
    .map_err(PlanError::navigation(profile_id))?;

    let entry = NavLogEntry {
        leg_index: 0,
        from_waypoint: solution.geometry.from_code.clone(),
        to_waypoint: solution.geometry.to_code.clone(),
        altitude_ft: leg.altitude_ft,
        pressure_alt_ft,
        rpm: cruise.rpm,
        temperature_c: leg.temperature_c,
        ktas: cruise.ktas,
        kcas: kcas_from_ktas(cruise.ktas, pressure_alt_ft, leg.temperature_c),
        true_track_deg: solution.geometry.true_course_deg,
        wind_direction_deg: leg.wind.direction,
        wind_speed_kt: leg.wind.speed_kt,
        true_heading_deg: solution.true_heading_deg(),
        magnetic_variation_deg: solution.geometry.magnetic_variation_deg,
        magnetic_heading_deg: solution.magnetic_heading_deg,
        ground_speed_kt: solution.ground_speed_kt(),
        climb_distance_nm,
        enroute_distance_nm,
        total_distance_nm,
        climb_time_min,
        enroute_time_min: solution.time_min,
        total_time_min: climb_time_min + solution.time_min,
        climb_fuel_gal,
        cruise_gph: cruise.gph,
        enroute_fuel_gal: solution.fuel_gal,
        total_fuel_gal: climb_fuel_gal + solution.fuel_gal,
        cumulative_distance_nm: 0.0,
        cumulative_time_min: 0.0,
        cumulative_fuel_gal: 0.0,
    };
    Ok(SolvedLeg {
        entry,
        climb,
        pressure_alt_ft,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank_entry() -> NavLogEntry {
        NavLogEntry {
            leg_index: 0,
            from_waypoint: String::new(),
            to_waypoint: String::new(),
            altitude_ft: 0.0,
            pressure_alt_ft: 0.0,
            rpm: 0.0,
            temperature_c: 0.0,
            ktas: 0.0,
            kcas: 0.0,
            true_track_deg: 0.0,
            wind_direction_deg: None,
            wind_speed_kt: 0.0,
            true_heading_deg: 0.0,
            magnetic_variation_deg: 0.0,
            magnetic_heading_deg: 0.0,
            ground_speed_kt: 0.0,
            climb_distance_nm: 0.0,
            enroute_distance_nm: 0.0,
            total_distance_nm: 0.0,
            climb_time_min: 0.0,
            enroute_time_min: 0.0,
            total_time_min: 0.0,
            climb_fuel_gal: 0.0,
            cruise_gph: 0.0,
            enroute_fuel_gal: 0.0,
            total_fuel_gal: 0.0,
            cumulative_distance_nm: 0.0,
            cumulative_time_min: 0.0,
            cumulative_fuel_gal: 0.0,
        }
    }

    fn totals_from(entries: &[(f64, f64, f64, f64)]) -> NavLogTotals {
        let mut totals = NavLogTotals::default();
        for &(climb_nm, enroute_nm, climb_min, enroute_min) in entries {
            totals.add(&NavLogEntry {
                climb_distance_nm: climb_nm,
                enroute_distance_nm: enroute_nm,
                total_distance_nm: climb_nm + enroute_nm,
                climb_time_min: climb_min,
                enroute_time_min: enroute_min,
                total_time_min: climb_min + enroute_min,
                ..blank_entry()
            });
        }
        totals
    }

    #[test]
    fn totals_keep_climb_and_enroute_apart() {
        let totals = totals_from(&[(5.0, 20.0, 4.0, 11.0), (0.0, 30.0, 0.0, 16.0)]);
        assert_eq!(totals.climb_distance_nm, 5.0);
        assert_eq!(totals.enroute_distance_nm, 50.0);
        assert_eq!(totals.distance_nm, 55.0);
        assert_eq!(totals.time_min, 31.0);
    }

    #[test]
    fn cruising_altitude_follows_the_magnetic_course() {
        // 175 true with 10 W variation is 185 magnetic: even thousands
        let westbound = NavLogEntry {
            leg_index: 2,
            altitude_ft: 5_500.0,
            true_track_deg: 175.0,
            magnetic_variation_deg: -10.0,
            ..blank_entry()
        };
        let message = cruising_altitude_warning(&westbound).expect("wrong hemisphere");
        assert!(message.starts_with("leg 2: 5500 ft"), "{message}");
        assert!(message.ends_with("next is 6500 ft"), "{message}");

        let eastbound = NavLogEntry {
            altitude_ft: 5_500.0,
            true_track_deg: 175.0,
            ..blank_entry()
        };
        assert!(cruising_altitude_warning(&eastbound).is_none());

        let low = NavLogEntry {
            altitude_ft: 2_400.0,
            true_track_deg: 270.0,
            ..blank_entry()
        };
        assert!(cruising_altitude_warning(&low).is_none());
    }
}
