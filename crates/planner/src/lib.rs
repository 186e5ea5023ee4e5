//! Planner façade crate: assembles flight plans and exposes the supporting crates.

pub mod error;
pub mod plan;

pub use facade::*;
pub use vfr_fuel as fuel;
pub use vfr_navigation as navigation;
pub use vfr_tables as tables;
pub use vfr_weight_balance as weight_balance;

mod facade;
