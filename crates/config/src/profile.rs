//! Aircraft performance profile records.

use serde::{Deserialize, Serialize};

use crate::TableKind;

fn default_fuel_density() -> f64 {
    6.0
}

/// Static performance data for one aircraft (or aircraft model).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceProfile {
    pub id: u32,
    pub name: String,
    pub fuel_type_id: u32,
    /// Density of the profile's fuel type, resolved by the caller.
    #[serde(default = "default_fuel_density")]
    pub fuel_density_lb_gal: f64,
    /// Arm of the empty weight.
    pub center_of_gravity_in: f64,
    pub empty_weight_lb: f64,
    pub max_ramp_weight_lb: f64,
    pub max_takeoff_weight_lb: f64,
    pub max_landing_weight_lb: f64,
    pub baggage_allowance_lb: f64,
    #[serde(default)]
    pub percent_decrease_takeoff_headwind_knot: f64,
    #[serde(default)]
    pub percent_increase_takeoff_tailwind_knot: f64,
    #[serde(default)]
    pub percent_decrease_landing_headwind_knot: f64,
    #[serde(default)]
    pub percent_increase_landing_tailwind_knot: f64,
    #[serde(default)]
    pub percent_increase_climb_temperature_c: f64,
    #[serde(default)]
    pub take_off_taxi_fuel_gallons: f64,
    #[serde(default)]
    pub baggage_compartments: Vec<BaggageCompartment>,
    #[serde(default)]
    pub seat_rows: Vec<SeatRow>,
    #[serde(default)]
    pub fuel_tanks: Vec<FuelTank>,
    #[serde(default)]
    pub weight_balance_profiles: Vec<WeightBalanceProfile>,
    #[serde(default)]
    pub surface_performance_decrease_data: Vec<SurfaceCorrection>,
    #[serde(default)]
    pub tables: PerformanceTables,
}

impl PerformanceProfile {
    /// Surface correction for a runway surface, if the profile defines one.
    pub fn surface_correction(&self, surface_id: u32, is_takeoff: bool) -> Option<&SurfaceCorrection> {
        self.surface_performance_decrease_data
            .iter()
            .find(|entry| entry.surface_id == surface_id && entry.is_takeoff == is_takeoff)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaggageCompartment {
    pub id: u32,
    pub name: String,
    pub arm_in: f64,
    #[serde(default)]
    pub weight_limit_lb: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeatRow {
    pub id: u32,
    pub name: String,
    pub arm_in: f64,
    pub number_of_seats: u32,
    #[serde(default)]
    pub weight_limit_lb: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuelTank {
    pub id: u32,
    pub name: String,
    pub arm_in: f64,
    pub fuel_capacity_gallons: f64,
    #[serde(default)]
    pub unusable_fuel_gallons: f64,
    /// Tanks burn in ascending sequence; equal values burn together.
    pub burn_sequence: u32,
}

impl FuelTank {
    pub fn usable_gallons(&self) -> f64 {
        self.fuel_capacity_gallons - self.unusable_fuel_gallons
    }
}

/// A named CG envelope ("Normal Category", "Utility Category", ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightBalanceProfile {
    pub name: String,
    pub limits: Vec<WeightBalanceLimit>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WeightBalanceLimit {
    pub cg_location_in: f64,
    pub weight_lb: f64,
    pub sequence: u32,
}

/// Percent increase in takeoff or landing distance on a given runway surface.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SurfaceCorrection {
    pub surface_id: u32,
    pub percent: f64,
    pub is_takeoff: bool,
}

/// Raw table rows as stored; sorted and indexed by `vfr_tables`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PerformanceTables {
    #[serde(default)]
    pub takeoff: Vec<TakeoffLandingRow>,
    #[serde(default)]
    pub landing: Vec<TakeoffLandingRow>,
    #[serde(default)]
    pub climb: Vec<ClimbRow>,
    #[serde(default)]
    pub cruise: Vec<CruiseRow>,
}

impl PerformanceTables {
    /// Number of rows held for a table kind.
    pub fn len(&self, kind: TableKind) -> usize {
        match kind {
            TableKind::Takeoff => self.takeoff.len(),
            TableKind::Landing => self.landing.len(),
            TableKind::Climb => self.climb.len(),
            TableKind::Cruise => self.cruise.len(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TakeoffLandingRow {
    pub weight_lb: f64,
    pub pressure_alt_ft: f64,
    pub temperature_c: f64,
    pub groundroll_ft: f64,
    pub obstacle_clearance_ft: f64,
}

/// Climb figures are cumulative from sea level to `pressure_alt_ft`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClimbRow {
    pub weight_lb: f64,
    pub pressure_alt_ft: f64,
    pub temperature_c: f64,
    pub kias: f64,
    pub fpm: f64,
    pub time_min: f64,
    pub fuel_gal: f64,
    pub distance_nm: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CruiseRow {
    pub weight_lb: f64,
    pub pressure_alt_ft: f64,
    pub temperature_c: f64,
    pub bhp_percent: f64,
    pub rpm: f64,
    pub ktas: f64,
    pub gph: f64,
}
