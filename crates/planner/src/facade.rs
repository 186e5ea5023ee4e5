//! Re-exported APIs for consumers of the planner crate.

pub use crate::error::{ErrorKind, PlanError};
pub use crate::plan::climb::{ClimbRequest, ClimbSegment, climb_segment};
pub use crate::plan::takeoff_landing::{
    AerodromePerformance, RunwayPerformance, TakeoffLandingConditions,
};
pub use crate::plan::{
    FlightPlan, NavLog, NavLogEntry, NavLogTotals, compute_navigation_log,
    compute_takeoff_landing_distance, compute_weight_balance, plan_flight,
};
pub use vfr_config::{Flight, PerformanceProfile, PlannerSettings};
pub use vfr_tables::{CorrectedDistances, RunwayPhase};
pub use vfr_weight_balance::{Loadout, WeightBalanceReport};

pub mod catalog {
    use thiserror::Error;
    use vfr_config::{Flight, PerformanceProfile};

    /// Errors surfaced when selecting profiles or flights from a catalog.
    #[derive(Debug, Error, PartialEq, Eq)]
    pub enum CatalogError {
        #[error("profile {0} not found in catalog")]
        ProfileNotFound(u32),
        #[error("flight {0} not found in catalog")]
        FlightNotFound(u32),
        #[error("catalog is empty")]
        Empty,
        #[error("catalog holds {0} {1}s; pick one by id")]
        Ambiguous(usize, &'static str),
    }

    fn only<'a, T>(records: &'a [T], what: &'static str) -> Result<&'a T, CatalogError> {
        match records {
            [] => Err(CatalogError::Empty),
            [record] => Ok(record),
            _ => Err(CatalogError::Ambiguous(records.len(), what)),
        }
    }

    /// Select a profile by id, or the only profile when `id` is `None`.
    pub fn select_profile(
        profiles: &[PerformanceProfile],
        id: Option<u32>,
    ) -> Result<&PerformanceProfile, CatalogError> {
        match id {
            Some(id) => profiles
                .iter()
                .find(|p| p.id == id)
                .ok_or(CatalogError::ProfileNotFound(id)),
            None => only(profiles, "profile"),
        }
    }

    /// Select a flight by id, or the only flight when `id` is `None`.
    pub fn select_flight(flights: &[Flight], id: Option<u32>) -> Result<&Flight, CatalogError> {
        match id {
            Some(id) => flights
                .iter()
                .find(|f| f.id == id)
                .ok_or(CatalogError::FlightNotFound(id)),
            None => only(flights, "flight"),
        }
    }

    /// Profile a flight is planned for.
    pub fn profile_for<'a>(
        profiles: &'a [PerformanceProfile],
        flight: &Flight,
    ) -> Result<&'a PerformanceProfile, CatalogError> {
        select_profile(profiles, Some(flight.profile_id))
    }
}
