//! Weight and balance: line items, moments, centre of gravity and envelope checks.

pub mod envelope;

pub use envelope::{Envelope, EnvelopePoint};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};
use vfr_config::{BaggageLoad, Flight, PerformanceProfile, PersonOnBoard, TankLoad};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum WeightBalanceError {
    #[error("profile {profile_id} is incomplete: {reason}")]
    IncompleteProfile { profile_id: u32, reason: String },
    #[error("unknown seat row {0}")]
    UnknownSeatRow(u32),
    #[error("unknown baggage compartment {0}")]
    UnknownCompartment(u32),
    #[error("unknown fuel tank {0}")]
    UnknownTank(u32),
    #[error("{item} has an invalid load of {value}")]
    InvalidLoad { item: String, value: f64 },
    #[error("seat row '{name}' holds {persons} persons but has {seats} seats")]
    SeatRowCapacity {
        name: String,
        persons: usize,
        seats: u32,
    },
    #[error("seat row '{name}' carries {weight_lb} lb, limit is {limit_lb} lb")]
    SeatRowLimit {
        name: String,
        weight_lb: f64,
        limit_lb: f64,
    },
    #[error("baggage compartment '{name}' carries {weight_lb} lb, limit is {limit_lb} lb")]
    CompartmentLimit {
        name: String,
        weight_lb: f64,
        limit_lb: f64,
    },
    #[error("total baggage {weight_lb} lb exceeds the allowance of {allowance_lb} lb")]
    BaggageAllowance { weight_lb: f64, allowance_lb: f64 },
    #[error("tank '{name}' loaded with {gallons} gal, usable capacity is {usable_gallons} gal")]
    TankOverfilled {
        name: String,
        gallons: f64,
        usable_gallons: f64,
    },
    #[error(
        "weight {weight_lb:.1} lb at CG {cg_in:.2} in is outside every envelope ({})",
        .violated.join(", ")
    )]
    OutOfEnvelope {
        violated: Vec<String>,
        cg_in: f64,
        weight_lb: f64,
    },
    #[error("ramp weight {weight_lb:.1} lb exceeds the maximum of {limit_lb} lb")]
    MaxRampExceeded { weight_lb: f64, limit_lb: f64 },
}

/// Persons, baggage and fuel on board.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Loadout {
    #[serde(default)]
    pub persons: Vec<PersonOnBoard>,
    #[serde(default)]
    pub baggage: Vec<BaggageLoad>,
    #[serde(default)]
    pub fuel: Vec<TankLoad>,
}

impl Loadout {
    pub fn from_flight(flight: &Flight) -> Self {
        Self {
            persons: flight.persons.clone(),
            baggage: flight.baggage.clone(),
            fuel: flight.fuel.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemCategory {
    Empty,
    Seat,
    Baggage,
    Fuel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineItem {
    pub category: ItemCategory,
    pub name: String,
    pub weight_lb: f64,
    pub arm_in: f64,
    pub moment_lb_in: f64,
}

impl LineItem {
    fn new(category: ItemCategory, name: impl Into<String>, weight_lb: f64, arm_in: f64) -> Self {
        Self {
            category,
            name: name.into(),
            weight_lb,
            arm_in,
            moment_lb_in: weight_lb * arm_in,
        }
    }
}

/// Weight, moment and CG at one point of the flight, with the envelopes it satisfies.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadingCondition {
    pub weight_lb: f64,
    pub moment_lb_in: f64,
    pub cg_in: f64,
    pub envelopes: Vec<String>,
}

impl LoadingCondition {
    pub fn is_within_any(&self) -> bool {
        !self.envelopes.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightBalanceReport {
    pub items: Vec<LineItem>,
    pub empty: LoadingCondition,
    pub zero_fuel: LoadingCondition,
    pub ramp: LoadingCondition,
    pub takeoff: Option<LoadingCondition>,
    pub landing: Option<LoadingCondition>,
    pub warnings: Vec<String>,
}

impl WeightBalanceReport {
    /// Envelopes satisfied by the loaded (ramp) configuration.
    pub fn envelopes(&self) -> &[String] {
        &self.ramp.envelopes
    }

    pub fn is_within(&self, envelope: &str) -> bool {
        self.ramp.envelopes.iter().any(|name| name == envelope)
    }
}

/// Validates loadouts against one profile's limits and envelopes.
#[derive(Debug, Clone)]
pub struct WeightBalanceCalculator<'a> {
    profile: &'a PerformanceProfile,
    envelopes: Vec<Envelope>,
}

impl<'a> WeightBalanceCalculator<'a> {
    pub fn new(profile: &'a PerformanceProfile) -> Result<Self, WeightBalanceError> {
        if !(profile.empty_weight_lb > 0.0) || !profile.center_of_gravity_in.is_finite() {
            return Err(WeightBalanceError::IncompleteProfile {
                profile_id: profile.id,
                reason: "empty weight and arm must be positive and finite".into(),
            });
        }
        if profile.weight_balance_profiles.is_empty() {
            return Err(WeightBalanceError::IncompleteProfile {
                profile_id: profile.id,
                reason: "no weight and balance envelope".into(),
            });
        }
        let envelopes = profile
            .weight_balance_profiles
            .iter()
            .map(|source| Envelope::from_profile(profile.id, source))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { profile, envelopes })
    }

    pub fn envelopes(&self) -> &[Envelope] {
        &self.envelopes
    }

    /// Names of the envelopes containing (`cg_in`, `weight_lb`).
    pub fn satisfied(&self, cg_in: f64, weight_lb: f64) -> Vec<String> {
        self.envelopes
            .iter()
            .filter(|envelope| envelope.contains(cg_in, weight_lb))
            .map(|envelope| envelope.name.clone())
            .collect()
    }

    /// Compute the loaded configuration and validate it.
    ///
    /// Checks run in this order: item references and per-item limits, the CG
    /// envelopes, then maximum ramp weight. Exceeding max takeoff or landing
    /// weight is reported as a warning only.
    pub fn evaluate(&self, loadout: &Loadout) -> Result<WeightBalanceReport, WeightBalanceError> {
        let profile = self.profile;
        let mut items = vec![LineItem::new(
            ItemCategory::Empty,
            "Empty weight",
            profile.empty_weight_lb,
            profile.center_of_gravity_in,
        )];
        items.extend(self.seat_items(&loadout.persons)?);
        items.extend(self.baggage_items(&loadout.baggage)?);
        let payload = self.condition(&items);

        let fuel_items = self.fuel_items(&loadout.fuel)?;
        items.extend(fuel_items);
        let ramp = self.condition(&items);

        debug!(
            profile_id = profile.id,
            weight_lb = ramp.weight_lb,
            cg_in = ramp.cg_in,
            envelopes = ?ramp.envelopes,
            "computed loaded configuration"
        );
        if !ramp.is_within_any() {
            return Err(WeightBalanceError::OutOfEnvelope {
                violated: self.envelopes.iter().map(|e| e.name.clone()).collect(),
                cg_in: ramp.cg_in,
                weight_lb: ramp.weight_lb,
            });
        }
        if ramp.weight_lb > profile.max_ramp_weight_lb {
            return Err(WeightBalanceError::MaxRampExceeded {
                weight_lb: ramp.weight_lb,
                limit_lb: profile.max_ramp_weight_lb,
            });
        }

        let mut warnings = Vec::new();
        if ramp.weight_lb > profile.max_takeoff_weight_lb {
            warnings.push(format!(
                "ramp weight {:.1} lb is above the maximum takeoff weight of {} lb; taxi fuel must cover the difference",
                ramp.weight_lb, profile.max_takeoff_weight_lb
            ));
        }

        let empty = self.condition(&items[..1]);
        Ok(WeightBalanceReport {
            items,
            empty,
            zero_fuel: payload,
            ramp,
            takeoff: None,
            landing: None,
            warnings,
        })
    }

    /// Fill in the takeoff and landing conditions from the fuel remaining at
    /// each point. Weight limit and envelope excursions become warnings.
    pub fn apply_fuel_stages(
        &self,
        report: &mut WeightBalanceReport,
        takeoff_fuel: &[TankLoad],
        landing_fuel: &[TankLoad],
    ) -> Result<(), WeightBalanceError> {
        let profile = self.profile;
        let takeoff = self.with_fuel(&report.zero_fuel, takeoff_fuel)?;
        let landing = self.with_fuel(&report.zero_fuel, landing_fuel)?;

        let mut warnings = Vec::new();
        if takeoff.weight_lb > profile.max_takeoff_weight_lb {
            warnings.push(format!(
                "takeoff weight {:.1} lb exceeds the maximum of {} lb",
                takeoff.weight_lb, profile.max_takeoff_weight_lb
            ));
        }
        if landing.weight_lb > profile.max_landing_weight_lb {
            warnings.push(format!(
                "landing weight {:.1} lb exceeds the maximum of {} lb",
                landing.weight_lb, profile.max_landing_weight_lb
            ));
        }
        for (stage, condition) in [("takeoff", &takeoff), ("landing", &landing)] {
            if !condition.is_within_any() {
                warnings.push(format!(
                    "{stage} CG {:.2} in at {:.1} lb is outside every envelope",
                    condition.cg_in, condition.weight_lb
                ));
            }
        }
        for message in &warnings {
            warn!(profile_id = profile.id, "{message}");
        }

        // replaces the ramp-stage takeoff weight warning
        report.warnings = warnings;
        report.takeoff = Some(takeoff);
        report.landing = Some(landing);
        Ok(())
    }

    fn with_fuel(
        &self,
        zero_fuel: &LoadingCondition,
        fuel: &[TankLoad],
    ) -> Result<LoadingCondition, WeightBalanceError> {
        let fuel_items = self.fuel_items(fuel)?;
        let weight_lb = zero_fuel.weight_lb + fuel_items.iter().map(|i| i.weight_lb).sum::<f64>();
        let moment_lb_in =
            zero_fuel.moment_lb_in + fuel_items.iter().map(|i| i.moment_lb_in).sum::<f64>();
        Ok(self.condition_from_totals(weight_lb, moment_lb_in))
    }

    fn condition(&self, items: &[LineItem]) -> LoadingCondition {
        let weight_lb = items.iter().map(|i| i.weight_lb).sum();
        let moment_lb_in = items.iter().map(|i| i.moment_lb_in).sum();
        self.condition_from_totals(weight_lb, moment_lb_in)
    }

    // weight is at least the (validated, positive) empty weight
    fn condition_from_totals(&self, weight_lb: f64, moment_lb_in: f64) -> LoadingCondition {
        let cg_in = moment_lb_in / weight_lb;
        LoadingCondition {
            weight_lb,
            moment_lb_in,
            cg_in,
            envelopes: self.satisfied(cg_in, weight_lb),
        }
    }

    fn seat_items(&self, persons: &[PersonOnBoard]) -> Result<Vec<LineItem>, WeightBalanceError> {
        for person in persons {
            if !self.profile.seat_rows.iter().any(|row| row.id == person.seat_row_id) {
                return Err(WeightBalanceError::UnknownSeatRow(person.seat_row_id));
            }
            check_load("person", person.weight_lb)?;
        }

        let mut items = Vec::new();
        for row in &self.profile.seat_rows {
            let occupants: Vec<f64> = persons
                .iter()
                .filter(|p| p.seat_row_id == row.id)
                .map(|p| p.weight_lb)
                .collect();
            if occupants.is_empty() {
                continue;
            }
            if occupants.len() > row.number_of_seats as usize {
                return Err(WeightBalanceError::SeatRowCapacity {
                    name: row.name.clone(),
                    persons: occupants.len(),
                    seats: row.number_of_seats,
                });
            }
            let weight_lb: f64 = occupants.iter().sum();
            if let Some(limit_lb) = row.weight_limit_lb.filter(|&limit| weight_lb > limit) {
                return Err(WeightBalanceError::SeatRowLimit {
                    name: row.name.clone(),
                    weight_lb,
                    limit_lb,
                });
            }
            items.push(LineItem::new(ItemCategory::Seat, &row.name, weight_lb, row.arm_in));
        }
        Ok(items)
    }

    fn baggage_items(&self, baggage: &[BaggageLoad]) -> Result<Vec<LineItem>, WeightBalanceError> {
        let mut per_compartment: BTreeMap<u32, f64> = BTreeMap::new();
        for load in baggage {
            let compartment = self
                .profile
                .baggage_compartments
                .iter()
                .find(|c| c.id == load.baggage_compartment_id)
                .ok_or(WeightBalanceError::UnknownCompartment(load.baggage_compartment_id))?;
            check_load(&compartment.name, load.weight_lb)?;
            *per_compartment.entry(compartment.id).or_default() += load.weight_lb;
        }

        // limits apply to everything stowed in a compartment
        let mut items = Vec::new();
        for compartment in &self.profile.baggage_compartments {
            let Some(&weight_lb) = per_compartment.get(&compartment.id) else {
                continue;
            };
            if let Some(limit_lb) = compartment.weight_limit_lb.filter(|&limit| weight_lb > limit) {
                return Err(WeightBalanceError::CompartmentLimit {
                    name: compartment.name.clone(),
                    weight_lb,
                    limit_lb,
                });
            }
            items.push(LineItem::new(
                ItemCategory::Baggage,
                &compartment.name,
                weight_lb,
                compartment.arm_in,
            ));
        }

        let total: f64 = per_compartment.values().sum();
        if total > self.profile.baggage_allowance_lb {
            return Err(WeightBalanceError::BaggageAllowance {
                weight_lb: total,
                allowance_lb: self.profile.baggage_allowance_lb,
            });
        }
        Ok(items)
    }

    fn fuel_items(&self, fuel: &[TankLoad]) -> Result<Vec<LineItem>, WeightBalanceError> {
        let density = self.profile.fuel_density_lb_gal;
        fuel.iter()
            .map(|load| {
                let tank = self
                    .profile
                    .fuel_tanks
                    .iter()
                    .find(|t| t.id == load.fuel_tank_id)
                    .ok_or(WeightBalanceError::UnknownTank(load.fuel_tank_id))?;
                check_load(&tank.name, load.gallons)?;
                // small tolerance for fuel remaining computed by subtraction
                if load.gallons > tank.usable_gallons() + 1e-9 {
                    return Err(WeightBalanceError::TankOverfilled {
                        name: tank.name.clone(),
                        gallons: load.gallons,
                        usable_gallons: tank.usable_gallons(),
                    });
                }
                Ok(LineItem::new(
                    ItemCategory::Fuel,
                    &tank.name,
                    load.gallons * density,
                    tank.arm_in,
                ))
            })
            .collect()
    }
}

fn check_load(item: &str, value: f64) -> Result<(), WeightBalanceError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(WeightBalanceError::InvalidLoad {
            item: item.to_string(),
            value,
        })
    }
}
