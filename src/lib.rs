//! VFR flight planning engine.
//!
//! The computation lives in the workspace crates; this crate re-exports them
//! so front-ends (the `flight_plan` CLI, services, tests) share one entry point.

pub use vfr_config as config;
pub use vfr_core as common;
pub use vfr_export as export;
pub use vfr_fuel as fuel;
pub use vfr_navigation as navigation;
pub use vfr_planner as planner;
pub use vfr_tables as tables;
pub use vfr_weight_balance as weight_balance;

pub use vfr_planner::{
    ErrorKind, FlightPlan, NavLog, PlanError, compute_navigation_log,
    compute_takeoff_landing_distance, compute_weight_balance, plan_flight,
};

/// Returns the version of the library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
