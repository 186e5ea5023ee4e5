//! Performance tables: indexed storage, interpolation and takeoff/landing corrections.
//!
//! Tables are non-uniform grids keyed by weight, pressure altitude and
//! temperature (plus power setting for cruise). Lookups bracket the target on
//! each axis in that fixed order and blend linearly; targets outside the grid
//! are extrapolated from the two edge-most breakpoints up to a bounded margin.

pub mod corrections;
pub mod interpolate;
pub mod store;

pub use corrections::{CorrectedDistances, RunwayPhase, RunwayWindConditions, apply_corrections};
pub use interpolate::{
    Axis, Blend, ClimbPerformance, CruisePerformance, ExtrapolationLimit, ExtrapolationPolicy,
    LookupPoint, Table, TableRow, TakeoffLandingDistances,
};
pub use store::{PerformanceTableStore, TableRef};
pub use vfr_config::TableKind;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum TableError {
    #[error("profile {profile_id} has no {table} table")]
    IncompleteProfile { profile_id: u32, table: TableKind },
    #[error("{table} table is empty")]
    EmptyTable { table: TableKind },
    #[error(
        "{axis} = {target} is outside the {table} table range [{min}, {max}] by more than the permitted margin of {margin}"
    )]
    OutOfRange {
        table: TableKind,
        axis: Axis,
        target: f64,
        min: f64,
        max: f64,
        margin: f64,
    },
    #[error("{table} lookup needs a {axis} target")]
    MissingTarget { table: TableKind, axis: Axis },
    #[error("{axis} target {value} is not a finite number")]
    NonFiniteTarget { axis: Axis, value: f64 },
    #[error("{table} table row {row} has a non-finite {axis}")]
    NonFiniteKey {
        table: TableKind,
        row: usize,
        axis: Axis,
    },
    #[error("{table} table has more than one row at {key:?}")]
    DuplicateRow { table: TableKind, key: Vec<f64> },
}
