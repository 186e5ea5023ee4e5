//! Planner error type and the public failure taxonomy.

use serde::Serialize;
use thiserror::Error;
use vfr_fuel::FuelError;
use vfr_navigation::NavigationError;
use vfr_tables::TableError;
use vfr_weight_balance::WeightBalanceError;

/// Failure categories an API layer translates into responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    IncompleteProfile,
    OutOfRange,
    OutOfEnvelope,
    InsufficientFuel,
    InconsistentBurnSequence,
    InvalidWaypoint,
    InvalidInput,
}

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("profile {profile_id}: {source}")]
    Tables {
        profile_id: u32,
        source: TableError,
    },
    #[error("profile {profile_id}: {source}")]
    WeightBalance {
        profile_id: u32,
        source: WeightBalanceError,
    },
    #[error("profile {profile_id}: {source}")]
    Fuel {
        profile_id: u32,
        source: FuelError,
    },
    #[error("profile {profile_id}: {source}")]
    Navigation {
        profile_id: u32,
        source: NavigationError,
    },
    #[error("leg {leg_index}: {source}")]
    Leg {
        leg_index: usize,
        source: Box<PlanError>,
    },
    #[error("flight {flight_id} is planned for profile {expected}, got profile {actual}")]
    ProfileMismatch {
        flight_id: u32,
        expected: u32,
        actual: u32,
    },
    #[error("flight {0} has no legs")]
    EmptyRoute(u32),
    #[error("leg {leg_index} starts at {from} but the previous leg ends at {previous_to}")]
    RouteDiscontinuity {
        leg_index: usize,
        previous_to: String,
        from: String,
    },
}

impl PlanError {
    pub fn tables(profile_id: u32) -> impl FnOnce(TableError) -> PlanError {
        move |source| PlanError::Tables { profile_id, source }
    }

    pub fn weight_balance(profile_id: u32) -> impl FnOnce(WeightBalanceError) -> PlanError {
        move |source| PlanError::WeightBalance { profile_id, source }
    }

    pub fn fuel(profile_id: u32) -> impl FnOnce(FuelError) -> PlanError {
        move |source| PlanError::Fuel { profile_id, source }
    }

    pub fn navigation(profile_id: u32) -> impl FnOnce(NavigationError) -> PlanError {
        move |source| PlanError::Navigation { profile_id, source }
    }

    pub fn at_leg(leg_index: usize) -> impl FnOnce(PlanError) -> PlanError {
        move |source| PlanError::Leg {
            leg_index,
            source: Box::new(source),
        }
    }

    /// Zero-based index of the failing leg, if the failure belongs to one.
    pub fn leg_index(&self) -> Option<usize> {
        match self {
            PlanError::Leg { leg_index, .. } | PlanError::RouteDiscontinuity { leg_index, .. } => {
                Some(*leg_index)
            }
            _ => None,
        }
    }

    /// Profile the failing computation ran against.
    pub fn profile_id(&self) -> Option<u32> {
        match self {
            PlanError::Tables { profile_id, .. }
            | PlanError::WeightBalance { profile_id, .. }
            | PlanError::Fuel { profile_id, .. }
            | PlanError::Navigation { profile_id, .. } => Some(*profile_id),
            PlanError::ProfileMismatch { actual, .. } => Some(*actual),
            PlanError::Leg { source, .. } => source.profile_id(),
            PlanError::EmptyRoute(_) | PlanError::RouteDiscontinuity { .. } => None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            PlanError::Tables { source, .. } => match source {
                TableError::OutOfRange { .. } => ErrorKind::OutOfRange,
                TableError::MissingTarget { .. } | TableError::NonFiniteTarget { .. } => {
                    ErrorKind::InvalidInput
                }
                TableError::IncompleteProfile { .. }
                | TableError::EmptyTable { .. }
                | TableError::NonFiniteKey { .. }
                | TableError::DuplicateRow { .. } => ErrorKind::IncompleteProfile,
            },
            PlanError::WeightBalance { source, .. } => match source {
                WeightBalanceError::IncompleteProfile { .. } => ErrorKind::IncompleteProfile,
                WeightBalanceError::OutOfEnvelope { .. }
                | WeightBalanceError::MaxRampExceeded { .. } => ErrorKind::OutOfEnvelope,
                _ => ErrorKind::InvalidInput,
            },
            PlanError::Fuel { source, .. } => match source {
                FuelError::InsufficientFuel { .. } => ErrorKind::InsufficientFuel,
                FuelError::InconsistentBurnSequence { .. } => ErrorKind::InconsistentBurnSequence,
                FuelError::NoTanks { .. } => ErrorKind::IncompleteProfile,
                FuelError::UnknownTank(_)
                | FuelError::InvalidLoad { .. }
                | FuelError::InvalidQuantity { .. } => ErrorKind::InvalidInput,
            },
            PlanError::Navigation { source, .. } => match source {
                NavigationError::InvalidWaypoint { .. } | NavigationError::DegenerateLeg { .. } => {
                    ErrorKind::InvalidWaypoint
                }
                _ => ErrorKind::InvalidInput,
            },
            PlanError::Leg { source, .. } => source.kind(),
            PlanError::ProfileMismatch { .. }
            | PlanError::EmptyRoute(_)
            | PlanError::RouteDiscontinuity { .. } => ErrorKind::InvalidInput,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vfr_tables::{Axis, TableKind};

    #[test]
    fn leg_context_keeps_the_inner_kind() {
        let inner = PlanError::tables(4)(TableError::OutOfRange {
            table: TableKind::Cruise,
            axis: Axis::PressureAltitude,
            target: 14_000.0,
            min: 0.0,
            max: 12_000.0,
            margin: 2_000.0,
        });
        let err = PlanError::at_leg(2)(inner);
        assert_eq!(err.kind(), ErrorKind::OutOfRange);
        assert_eq!(err.leg_index(), Some(2));
        let message = err.to_string();
        assert!(message.starts_with("leg 2: profile 4:"), "{message}");
        assert_eq!(err.profile_id(), Some(4));
    }

    #[test]
    fn navigation_failures_map_to_invalid_waypoint() {
        let err = PlanError::navigation(3)(NavigationError::InvalidWaypoint {
            code: "XYZ".into(),
            reason: "bad".into(),
        });
        assert_eq!(err.kind(), ErrorKind::InvalidWaypoint);
        assert_eq!(err.leg_index(), None);
        assert_eq!(err.profile_id(), Some(3));
        assert!(err.to_string().starts_with("profile 3: waypoint 'XYZ'"), "{err}");
    }
}
