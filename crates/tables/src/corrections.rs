//! Takeoff and landing distance corrections.
//!
//! Applied in a fixed order to the interpolated distances:
//! 1. wind: headwind shortens, tailwind lengthens both the ground roll and
//!    the airborne segment (obstacle clearance minus ground roll);
//! 2. surface: the runway surface percentage lengthens the ground roll only;
//! 3. obstacle: the corrected airborne segment is added back on top of the
//!    corrected ground roll.

use tracing::debug;
use vfr_config::{PerformanceProfile, TableKind};

use crate::interpolate::TakeoffLandingDistances;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunwayPhase {
    Takeoff,
    Landing,
}

impl RunwayPhase {
    pub fn table_kind(self) -> TableKind {
        match self {
            RunwayPhase::Takeoff => TableKind::Takeoff,
            RunwayPhase::Landing => TableKind::Landing,
        }
    }

    pub fn is_takeoff(self) -> bool {
        matches!(self, RunwayPhase::Takeoff)
    }
}

/// Runway-relative wind and surface for one distance computation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RunwayWindConditions {
    /// Headwind component in knots; negative for a tailwind.
    pub headwind_kt: f64,
    pub surface_id: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorrectedDistances {
    pub table: TakeoffLandingDistances,
    pub wind_factor: f64,
    pub surface_percent: f64,
    pub ground_roll_ft: f64,
    pub obstacle_clearance_ft: f64,
}

/// Multiplier applied to distances for a runway-aligned wind component.
pub fn wind_factor(profile: &PerformanceProfile, phase: RunwayPhase, headwind_kt: f64) -> f64 {
    let (decrease_per_kt, increase_per_kt) = match phase {
        RunwayPhase::Takeoff => (
            profile.percent_decrease_takeoff_headwind_knot,
            profile.percent_increase_takeoff_tailwind_knot,
        ),
        RunwayPhase::Landing => (
            profile.percent_decrease_landing_headwind_knot,
            profile.percent_increase_landing_tailwind_knot,
        ),
    };
    if headwind_kt >= 0.0 {
        (1.0 - decrease_per_kt * headwind_kt / 100.0).max(0.0)
    } else {
        1.0 + increase_per_kt * (-headwind_kt) / 100.0
    }
}

pub fn apply_corrections(
    profile: &PerformanceProfile,
    phase: RunwayPhase,
    table: TakeoffLandingDistances,
    conditions: RunwayWindConditions,
) -> CorrectedDistances {
    let wind_factor = wind_factor(profile, phase, conditions.headwind_kt);
    let ground_roll_wind = table.groundroll_ft * wind_factor;
    let airborne_wind =
        (table.obstacle_clearance_ft - table.groundroll_ft).max(0.0) * wind_factor;

    let surface_percent = conditions
        .surface_id
        .and_then(|surface| profile.surface_correction(surface, phase.is_takeoff()))
        .map_or(0.0, |entry| entry.percent);
    let ground_roll_ft = ground_roll_wind * (1.0 + surface_percent / 100.0);
    let obstacle_clearance_ft = ground_roll_ft + airborne_wind;

    debug!(
        ?phase,
        wind_factor, surface_percent, ground_roll_ft, obstacle_clearance_ft, "corrected runway distances"
    );
    CorrectedDistances {
        table,
        wind_factor,
        surface_percent,
        ground_roll_ft,
        obstacle_clearance_ft,
    }
}
