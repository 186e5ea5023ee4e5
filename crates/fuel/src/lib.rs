//! Fuel budget and tank burn allocation.
//!
//! Tanks drain in ascending `burn_sequence`. Tanks sharing a sequence value
//! drain together: each draws an equal share, and a tank that runs dry passes
//! its unmet share on to the others in the group.

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;
use vfr_config::{FuelTank, PerformanceProfile, TankLoad};

/// Gallons below which a quantity counts as zero.
const FUEL_EPSILON_GAL: f64 = 1e-9;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum FuelError {
    #[error("fuel tank '{tank}' is malformed: {reason}")]
    InconsistentBurnSequence { tank: String, reason: String },
    #[error("profile {profile_id} defines no fuel tanks")]
    NoTanks { profile_id: u32 },
    #[error("unknown fuel tank {0}")]
    UnknownTank(u32),
    #[error("tank '{tank}' cannot hold {gallons} gal ({usable_gallons} gal usable)")]
    InvalidLoad {
        tank: String,
        gallons: f64,
        usable_gallons: f64,
    },
    #[error("{quantity} must be a non-negative number, got {value}")]
    InvalidQuantity { quantity: &'static str, value: f64 },
    #[error("{required_gal:.1} gal required but only {available_gal:.1} gal {limit}")]
    InsufficientFuel {
        required_gal: f64,
        available_gal: f64,
        limit: FuelLimit,
    },
}

/// Which quantity an insufficient-fuel failure was measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FuelLimit {
    UsableCapacity,
    OnBoard,
}

impl std::fmt::Display for FuelLimit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FuelLimit::UsableCapacity => f.write_str("of usable tank capacity"),
            FuelLimit::OnBoard => f.write_str("on board"),
        }
    }
}

/// One tank with its usable capacity and loaded usable fuel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TankState {
    pub tank_id: u32,
    pub name: String,
    pub burn_sequence: u32,
    pub usable_gal: f64,
    pub loaded_gal: f64,
}

/// Inputs to the fuel requirement.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FuelRequirement {
    pub taxi_gal: f64,
    pub climb_gal: f64,
    pub climb_hours: f64,
    pub enroute_gal: f64,
    pub enroute_hours: f64,
    pub added_hours: f64,
    pub reserve_hours: f64,
    pub contingency_hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FuelBudget {
    pub taxi_gal: f64,
    pub climb_gal: f64,
    pub climb_hours: f64,
    pub enroute_gal: f64,
    pub enroute_hours: f64,
    /// Fuel flow used to convert added, reserve and contingency time.
    pub average_gph: f64,
    pub added_hours: f64,
    pub added_gal: f64,
    pub reserve_hours: f64,
    pub reserve_gal: f64,
    pub contingency_hours: f64,
    pub contingency_gal: f64,
    pub required_gal: f64,
    pub usable_capacity_gal: f64,
    pub on_board_gal: f64,
    pub margin_gal: f64,
}

impl FuelBudget {
    /// Fuel burned between takeoff and landing.
    pub fn trip_gal(&self) -> f64 {
        self.climb_gal + self.enroute_gal
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TankDraw {
    pub tank_id: u32,
    pub name: String,
    pub drawn_gal: f64,
    pub remaining_gal: f64,
}

/// Result of burning fuel from the tanks in sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BurnAllocation {
    pub draws: Vec<TankDraw>,
}

impl BurnAllocation {
    pub fn total_drawn_gal(&self) -> f64 {
        self.draws.iter().map(|d| d.drawn_gal).sum()
    }

    /// Fuel left in each tank after the burn.
    pub fn remaining(&self) -> Vec<TankLoad> {
        self.draws
            .iter()
            .map(|d| TankLoad {
                fuel_tank_id: d.tank_id,
                gallons: d.remaining_gal,
            })
            .collect()
    }
}

/// Validated tank set with the fuel loaded for one flight.
#[derive(Debug, Clone)]
pub struct FuelCalculator {
    tanks: Vec<TankState>,
}

impl FuelCalculator {
    /// Validate tank definitions and loads. Tanks without a load entry are empty.
    pub fn new(profile: &PerformanceProfile, loads: &[TankLoad]) -> Result<Self, FuelError> {
        if profile.fuel_tanks.is_empty() {
            return Err(FuelError::NoTanks {
                profile_id: profile.id,
            });
        }
        let mut tanks: Vec<TankState> = profile
            .fuel_tanks
            .iter()
            .map(validate_tank)
            .collect::<Result<_, _>>()?;

        for load in loads {
            let tank = tanks
                .iter_mut()
                .find(|t| t.tank_id == load.fuel_tank_id)
                .ok_or(FuelError::UnknownTank(load.fuel_tank_id))?;
            let gallons = tank.loaded_gal + load.gallons;
            if !load.gallons.is_finite()
                || load.gallons < 0.0
                || gallons > tank.usable_gal + FUEL_EPSILON_GAL
            {
                return Err(FuelError::InvalidLoad {
                    tank: tank.name.clone(),
                    gallons,
                    usable_gallons: tank.usable_gal,
                });
            }
            tank.loaded_gal = gallons;
        }

        Ok(Self { tanks })
    }

    pub fn tanks(&self) -> &[TankState] {
        &self.tanks
    }

    pub fn usable_capacity_gal(&self) -> f64 {
        self.tanks.iter().map(|t| t.usable_gal).sum()
    }

    pub fn on_board_gal(&self) -> f64 {
        self.tanks.iter().map(|t| t.loaded_gal).sum()
    }

    /// Current loads, one entry per tank in profile order.
    pub fn loads(&self) -> Vec<TankLoad> {
        self.tanks
            .iter()
            .map(|t| TankLoad {
                fuel_tank_id: t.tank_id,
                gallons: t.loaded_gal,
            })
            .collect()
    }

    /// Total the requirement and check it against capacity and fuel on board.
    pub fn budget(&self, requirement: &FuelRequirement) -> Result<FuelBudget, FuelError> {
        let FuelRequirement {
            taxi_gal,
            climb_gal,
            climb_hours,
            enroute_gal,
            enroute_hours,
            added_hours,
            reserve_hours,
            contingency_hours,
        } = *requirement;
        for (quantity, value) in [
            ("taxi fuel", taxi_gal),
            ("climb fuel", climb_gal),
            ("climb time", climb_hours),
            ("enroute fuel", enroute_gal),
            ("enroute time", enroute_hours),
            ("added enroute time", added_hours),
            ("reserve time", reserve_hours),
            ("contingency time", contingency_hours),
        ] {
            non_negative(quantity, value)?;
        }

        let average_gph = if enroute_hours > 0.0 {
            enroute_gal / enroute_hours
        } else if climb_hours > 0.0 {
            climb_gal / climb_hours
        } else {
            0.0
        };
        let added_gal = added_hours * average_gph;
        let reserve_gal = reserve_hours * average_gph;
        let contingency_gal = contingency_hours * average_gph;
        let required_gal =
            taxi_gal + climb_gal + enroute_gal + added_gal + reserve_gal + contingency_gal;

        let usable_capacity_gal = self.usable_capacity_gal();
        let on_board_gal = self.on_board_gal();
        debug!(required_gal, usable_capacity_gal, on_board_gal, average_gph, "fuel budget");

        if required_gal > usable_capacity_gal + FUEL_EPSILON_GAL {
            return Err(FuelError::InsufficientFuel {
                required_gal,
                available_gal: usable_capacity_gal,
                limit: FuelLimit::UsableCapacity,
            });
        }
        if required_gal > on_board_gal + FUEL_EPSILON_GAL {
            return Err(FuelError::InsufficientFuel {
                required_gal,
                available_gal: on_board_gal,
                limit: FuelLimit::OnBoard,
            });
        }

        Ok(FuelBudget {
            taxi_gal,
            climb_gal,
            climb_hours,
            enroute_gal,
            enroute_hours,
            average_gph,
            added_hours,
            added_gal,
            reserve_hours,
            reserve_gal,
            contingency_hours,
            contingency_gal,
            required_gal,
            usable_capacity_gal,
            on_board_gal,
            margin_gal: on_board_gal - required_gal,
        })
    }

    /// Draw `gallons` from the tanks in burn sequence order.
    pub fn allocate_burn(&self, gallons: f64) -> Result<BurnAllocation, FuelError> {
        non_negative("fuel burn", gallons)?;
        let on_board = self.on_board_gal();
        if gallons > on_board + FUEL_EPSILON_GAL {
            return Err(FuelError::InsufficientFuel {
                required_gal: gallons,
                available_gal: on_board,
                limit: FuelLimit::OnBoard,
            });
        }

        let mut groups: BTreeMap<u32, Vec<usize>> = BTreeMap::new();
        for (index, tank) in self.tanks.iter().enumerate() {
            groups.entry(tank.burn_sequence).or_default().push(index);
        }

        let mut drawn = vec![0.0; self.tanks.len()];
        let mut outstanding = gallons;
        for members in groups.values() {
            if outstanding <= FUEL_EPSILON_GAL {
                break;
            }
            outstanding -= self.drain_group(members, outstanding, &mut drawn);
        }

        let draws = self
            .tanks
            .iter()
            .zip(drawn)
            .map(|(tank, drawn_gal)| TankDraw {
                tank_id: tank.tank_id,
                name: tank.name.clone(),
                drawn_gal,
                remaining_gal: (tank.loaded_gal - drawn_gal).max(0.0),
            })
            .collect();
        Ok(BurnAllocation { draws })
    }

    /// Equal-share draw across one burn group; returns the gallons taken.
    fn drain_group(&self, members: &[usize], wanted: f64, drawn: &mut [f64]) -> f64 {
        let mut order = members.to_vec();
        order.sort_by(|&a, &b| self.tanks[a].loaded_gal.total_cmp(&self.tanks[b].loaded_gal));

        let mut outstanding = wanted;
        for (position, &index) in order.iter().enumerate() {
            let share = outstanding / (order.len() - position) as f64;
            let take = share.min(self.tanks[index].loaded_gal);
            drawn[index] = take;
            outstanding -= take;
        }
        wanted - outstanding
    }
}

fn validate_tank(tank: &FuelTank) -> Result<TankState, FuelError> {
    let malformed = |reason: String| FuelError::InconsistentBurnSequence {
        tank: tank.name.clone(),
        reason,
    };
    if !tank.fuel_capacity_gallons.is_finite() || tank.fuel_capacity_gallons <= 0.0 {
        return Err(malformed(format!(
            "capacity {} gal must be positive",
            tank.fuel_capacity_gallons
        )));
    }
    if !tank.unusable_fuel_gallons.is_finite() || tank.unusable_fuel_gallons < 0.0 {
        return Err(malformed(format!(
            "unusable fuel {} gal must not be negative",
            tank.unusable_fuel_gallons
        )));
    }
    if tank.unusable_fuel_gallons > tank.fuel_capacity_gallons {
        return Err(malformed(format!(
            "unusable fuel {} gal exceeds capacity {} gal",
            tank.unusable_fuel_gallons, tank.fuel_capacity_gallons
        )));
    }
    Ok(TankState {
        tank_id: tank.id,
        name: tank.name.clone(),
        burn_sequence: tank.burn_sequence,
        usable_gal: tank.usable_gallons(),
        loaded_gal: 0.0,
    })
}

fn non_negative(quantity: &'static str, value: f64) -> Result<(), FuelError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(FuelError::InvalidQuantity { quantity, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vfr_config::PerformanceTables;

    fn tank(id: u32, name: &str, capacity: f64, unusable: f64, sequence: u32) -> FuelTank {
        FuelTank {
            id,
            name: name.into(),
            arm_in: 48.0,
            fuel_capacity_gallons: capacity,
            unusable_fuel_gallons: unusable,
            burn_sequence: sequence,
        }
    }

    fn profile(tanks: Vec<FuelTank>) -> PerformanceProfile {
        PerformanceProfile {
            id: 3,
            name: "Test".into(),
            fuel_type_id: 1,
            fuel_density_lb_gal: 6.0,
            center_of_gravity_in: 39.0,
            empty_weight_lb: 1_400.0,
            max_ramp_weight_lb: 2_307.0,
            max_takeoff_weight_lb: 2_300.0,
            max_landing_weight_lb: 2_300.0,
            baggage_allowance_lb: 120.0,
            percent_decrease_takeoff_headwind_knot: 0.0,
            percent_increase_takeoff_tailwind_knot: 0.0,
            percent_decrease_landing_headwind_knot: 0.0,
            percent_increase_landing_tailwind_knot: 0.0,
            percent_increase_climb_temperature_c: 0.0,
            take_off_taxi_fuel_gallons: 1.4,
            baggage_compartments: Vec::new(),
            seat_rows: Vec::new(),
            fuel_tanks: tanks,
            weight_balance_profiles: Vec::new(),
            surface_performance_decrease_data: Vec::new(),
            tables: PerformanceTables::default(),
        }
    }

    fn load(id: u32, gallons: f64) -> TankLoad {
        TankLoad {
            fuel_tank_id: id,
            gallons,
        }
    }

    #[test]
    fn budget_converts_reserve_time_at_enroute_flow() {
        let profile = profile(vec![tank(1, "Left", 20.0, 1.0, 1), tank(2, "Right", 20.0, 1.0, 1)]);
        let calculator = FuelCalculator::new(&profile, &[load(1, 19.0), load(2, 19.0)]).unwrap();
        let budget = calculator
            .budget(&FuelRequirement {
                taxi_gal: 1.4,
                climb_gal: 1.6,
                climb_hours: 0.2,
                enroute_gal: 8.0,
                enroute_hours: 1.0,
                reserve_hours: 0.75,
                ..FuelRequirement::default()
            })
            .unwrap();
        assert_eq!(budget.average_gph, 8.0);
        assert_eq!(budget.reserve_gal, 6.0);
        assert!((budget.required_gal - 17.0).abs() < 1e-9);
        assert_eq!(budget.usable_capacity_gal, 38.0);
        assert!((budget.margin_gal - 21.0).abs() < 1e-9);
        assert!((budget.trip_gal() - 9.6).abs() < 1e-9);
    }

    #[test]
    fn requirement_above_capacity_or_load_is_insufficient() {
        let profile = profile(vec![tank(1, "Main", 20.0, 1.0, 1)]);
        let calculator = FuelCalculator::new(&profile, &[load(1, 10.0)]).unwrap();
        let over_capacity = FuelRequirement {
            enroute_gal: 25.0,
            enroute_hours: 3.0,
            ..FuelRequirement::default()
        };
        assert!(matches!(
            calculator.budget(&over_capacity),
            Err(FuelError::InsufficientFuel {
                limit: FuelLimit::UsableCapacity,
                ..
            })
        ));
        let over_load = FuelRequirement {
            enroute_gal: 12.0,
            enroute_hours: 1.5,
            ..FuelRequirement::default()
        };
        assert!(matches!(
            calculator.budget(&over_load),
            Err(FuelError::InsufficientFuel {
                limit: FuelLimit::OnBoard,
                ..
            })
        ));
    }

    #[test]
    fn malformed_tanks_are_rejected() {
        for bad in [
            tank(1, "Negative", -5.0, 0.0, 1),
            tank(1, "Zero", 0.0, 0.0, 1),
            tank(1, "Unusable", 10.0, 12.0, 1),
            tank(1, "NegativeUnusable", 10.0, -1.0, 1),
        ] {
            let profile = profile(vec![bad]);
            assert!(matches!(
                FuelCalculator::new(&profile, &[]),
                Err(FuelError::InconsistentBurnSequence { .. })
            ));
        }
        assert!(matches!(
            FuelCalculator::new(&profile(Vec::new()), &[]),
            Err(FuelError::NoTanks { profile_id: 3 })
        ));
    }

    #[test]
    fn loads_must_fit_usable_capacity() {
        let profile = profile(vec![tank(1, "Main", 20.0, 1.0, 1)]);
        assert!(matches!(
            FuelCalculator::new(&profile, &[load(1, 19.5)]),
            Err(FuelError::InvalidLoad { .. })
        ));
        assert_eq!(
            FuelCalculator::new(&profile, &[load(4, 1.0)]).unwrap_err(),
            FuelError::UnknownTank(4)
        );
    }

    #[test]
    fn burn_follows_sequence_order() {
        let profile = profile(vec![
            tank(1, "Aux", 10.0, 0.0, 2),
            tank(2, "Main", 20.0, 0.0, 1),
        ]);
        let calculator = FuelCalculator::new(&profile, &[load(1, 10.0), load(2, 15.0)]).unwrap();
        let allocation = calculator.allocate_burn(18.0).unwrap();
        let remaining = allocation.remaining();
        assert_eq!(remaining[1].gallons, 0.0);
        assert!((remaining[0].gallons - 7.0).abs() < 1e-9);
        assert!((allocation.total_drawn_gal() - 18.0).abs() < 1e-9);
    }

    #[test]
    fn tied_tanks_drain_together_and_pass_on_shortfall() {
        let profile = profile(vec![
            tank(1, "Left", 20.0, 0.0, 1),
            tank(2, "Right", 20.0, 0.0, 1),
            tank(3, "Tip", 5.0, 0.0, 1),
        ]);
        let calculator =
            FuelCalculator::new(&profile, &[load(1, 20.0), load(2, 20.0), load(3, 2.0)]).unwrap();
        let allocation = calculator.allocate_burn(12.0).unwrap();
        let drawn: Vec<f64> = allocation.draws.iter().map(|d| d.drawn_gal).collect();
        // tip gives up its 2 gal, the mains split the rest
        assert!((drawn[2] - 2.0).abs() < 1e-9);
        assert!((drawn[0] - 5.0).abs() < 1e-9);
        assert!((drawn[1] - 5.0).abs() < 1e-9);
    }

    #[test]
    fn burning_more_than_on_board_fails() {
        let profile = profile(vec![tank(1, "Main", 20.0, 0.0, 1)]);
        let calculator = FuelCalculator::new(&profile, &[load(1, 5.0)]).unwrap();
        assert!(matches!(
            calculator.allocate_burn(6.0),
            Err(FuelError::InsufficientFuel { .. })
        ));
    }
}
