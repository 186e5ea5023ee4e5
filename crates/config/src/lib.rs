//! Input records, loaders and planner settings for the VFR flight planner.
//!
//! Records mirror the documents handed over by the persistence layer: one
//! aircraft [`PerformanceProfile`] (with its tables) and one [`Flight`]. They
//! are plain data; validation happens in the computation crates.

use std::fs::File;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod flight;
mod profile;
mod settings;

pub use flight::{
    AerodromeData, BaggageLoad, Flight, Hemisphere, Leg, PersonOnBoard, Runway, RunwayPosition,
    TankLoad, Terminal, TerminalWeather, Waypoint, Wind,
};
pub use profile::{
    BaggageCompartment, ClimbRow, CruiseRow, FuelTank, PerformanceProfile, PerformanceTables,
    SeatRow, SurfaceCorrection, TakeoffLandingRow, WeightBalanceLimit, WeightBalanceProfile,
};
pub use settings::{AxisMargins, PlannerSettings};

/// Errors that can occur while loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("expected exactly one record in {path}, found {found}")]
    NotSingle { path: PathBuf, found: usize },
}

/// Load aircraft performance profiles from a YAML file, TOML file, or directory of TOML files.
pub fn load_profiles<P: AsRef<Path>>(path: P) -> Result<Vec<PerformanceProfile>, ConfigError> {
    load_records(path)
}

/// Load a single performance profile document.
pub fn load_profile<P: AsRef<Path>>(path: P) -> Result<PerformanceProfile, ConfigError> {
    load_single(path)
}

/// Load flights from a YAML file, TOML file, or directory of TOML files.
pub fn load_flights<P: AsRef<Path>>(path: P) -> Result<Vec<Flight>, ConfigError> {
    load_records(path)
}

/// Load a single flight document.
pub fn load_flight<P: AsRef<Path>>(path: P) -> Result<Flight, ConfigError> {
    load_single(path)
}

/// Load planner settings from YAML or TOML. Missing fields take their defaults.
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<PlannerSettings, ConfigError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)?;
    if is_toml(path) {
        Ok(toml::from_str(&contents)?)
    } else {
        Ok(serde_yaml::from_str(&contents)?)
    }
}

fn load_single<T, P>(path: P) -> Result<T, ConfigError>
where
    T: for<'de> Deserialize<'de>,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let mut records: Vec<T> = load_records(path)?;
    if records.len() != 1 {
        return Err(ConfigError::NotSingle {
            path: path.to_path_buf(),
            found: records.len(),
        });
    }
    Ok(records.remove(0))
}

fn load_records<T, P>(path: P) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if path.is_dir() {
        read_dir_records(path)
    } else if is_toml(path) {
        let contents = std::fs::read_to_string(path)?;
        let record: T = toml::from_str(&contents)?;
        Ok(vec![record])
    } else {
        let reader = File::open(path)?;
        // a YAML file holds either a list of records or a single record
        match serde_yaml::from_reader(reader)? {
            value @ serde_yaml::Value::Sequence(_) => Ok(serde_yaml::from_value(value)?),
            value => Ok(vec![serde_yaml::from_value(value)?]),
        }
    }
}

fn read_dir_records<T>(dir: &Path) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
{
    let mut records = Vec::new();
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| is_toml(path))
        .collect();
    entries.sort();
    for path in entries {
        let contents = std::fs::read_to_string(&path)?;
        let record: T = toml::from_str(&contents)?;
        records.push(record);
    }
    Ok(records)
}

fn is_toml(path: &Path) -> bool {
    path.extension().map(|ext| ext == "toml").unwrap_or(false)
}

/// Kind of performance table held by a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableKind {
    Takeoff,
    Landing,
    Climb,
    Cruise,
}

impl std::fmt::Display for TableKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TableKind::Takeoff => "takeoff",
            TableKind::Landing => "landing",
            TableKind::Climb => "climb",
            TableKind::Cruise => "cruise",
        };
        f.write_str(name)
    }
}
