//! Export helpers for nav log CSV and flight plan JSON artifacts.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Create a writer for the target path, handling stdout (`-`) by convention.
pub fn writer_for_path(path: &Path) -> io::Result<Box<dyn Write>> {
    if path == Path::new("-") {
        return Ok(Box::new(BufWriter::new(io::stdout())));
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(path)?;
    Ok(Box::new(BufWriter::new(file)))
}

pub mod navlog {
    use std::io::Write;
    use std::path::Path;

    use serde::Serialize;
    use vfr_planner::{NavLog, NavLogEntry};

    use crate::{ExportError, writer_for_path};

    fn round1(v: f64) -> f64 {
        (v * 10.0).round() / 10.0
    }

    /// CSV row of the exported nav log. Angles and speeds are rounded to
    /// whole units, distances, times and fuel to one decimal.
    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub struct Record {
        pub leg: String,
        pub from: String,
        pub to: String,
        pub altitude_ft: Option<f64>,
        pub pressure_alt_ft: Option<f64>,
        pub temperature_c: Option<f64>,
        pub rpm: Option<f64>,
        pub ktas: Option<f64>,
        pub kcas: Option<f64>,
        pub true_track_deg: Option<f64>,
        pub wind_direction_deg: Option<f64>,
        pub wind_speed_kt: Option<f64>,
        pub true_heading_deg: Option<f64>,
        pub magnetic_variation_deg: Option<f64>,
        pub magnetic_heading_deg: Option<f64>,
        pub ground_speed_kt: Option<f64>,
        pub distance_nm: f64,
        pub climb_distance_nm: f64,
        pub enroute_distance_nm: f64,
        pub time_min: f64,
        pub climb_time_min: f64,
        pub enroute_time_min: f64,
        pub fuel_gal: f64,
        pub climb_fuel_gal: f64,
        pub enroute_fuel_gal: f64,
        pub cumulative_distance_nm: f64,
        pub cumulative_time_min: f64,
        pub cumulative_fuel_gal: f64,
    }

    impl Record {
        pub fn from_entry(entry: &NavLogEntry) -> Self {
            Self {
                leg: (entry.leg_index + 1).to_string(),
                from: entry.from_waypoint.clone(),
                to: entry.to_waypoint.clone(),
                altitude_ft: Some(entry.altitude_ft.round()),
                pressure_alt_ft: Some(entry.pressure_alt_ft.round()),
                temperature_c: Some(round1(entry.temperature_c)),
                rpm: Some(entry.rpm.round()),
                ktas: Some(entry.ktas.round()),
                kcas: Some(entry.kcas.round()),
                true_track_deg: Some(entry.true_track_deg.round()),
                wind_direction_deg: entry.wind_direction_deg.map(f64::round),
                wind_speed_kt: Some(entry.wind_speed_kt.round()),
                true_heading_deg: Some(entry.true_heading_deg.round()),
                magnetic_variation_deg: Some(round1(entry.magnetic_variation_deg)),
                magnetic_heading_deg: Some(entry.magnetic_heading_deg.round()),
                ground_speed_kt: Some(entry.ground_speed_kt.round()),
                distance_nm: round1(entry.total_distance_nm),
                climb_distance_nm: round1(entry.climb_distance_nm),
                enroute_distance_nm: round1(entry.enroute_distance_nm),
                time_min: round1(entry.total_time_min),
                climb_time_min: round1(entry.climb_time_min),
                enroute_time_min: round1(entry.enroute_time_min),
                fuel_gal: round1(entry.total_fuel_gal),
                climb_fuel_gal: round1(entry.climb_fuel_gal),
                enroute_fuel_gal: round1(entry.enroute_fuel_gal),
                cumulative_distance_nm: round1(entry.cumulative_distance_nm),
                cumulative_time_min: round1(entry.cumulative_time_min),
                cumulative_fuel_gal: round1(entry.cumulative_fuel_gal),
            }
        }

        /// Summary row closing the log.
        pub fn totals(log: &NavLog) -> Self {
            let totals = &log.totals;
            Self {
                leg: "TOTAL".into(),
                from: log
                    .entries
                    .first()
                    .map(|e| e.from_waypoint.clone())
                    .unwrap_or_default(),
                to: log
                    .entries
                    .last()
                    .map(|e| e.to_waypoint.clone())
                    .unwrap_or_default(),
                altitude_ft: None,
                pressure_alt_ft: None,
                temperature_c: None,
                rpm: None,
                ktas: None,
                kcas: None,
                true_track_deg: None,
                wind_direction_deg: None,
                wind_speed_kt: None,
                true_heading_deg: None,
                magnetic_variation_deg: None,
                magnetic_heading_deg: None,
                ground_speed_kt: None,
                distance_nm: round1(totals.distance_nm),
                climb_distance_nm: round1(totals.climb_distance_nm),
                enroute_distance_nm: round1(totals.enroute_distance_nm),
                time_min: round1(totals.time_min),
                climb_time_min: round1(totals.climb_time_min),
                enroute_time_min: round1(totals.enroute_time_min),
                fuel_gal: round1(totals.fuel_gal),
                climb_fuel_gal: round1(totals.climb_fuel_gal),
                enroute_fuel_gal: round1(totals.enroute_fuel_gal),
                cumulative_distance_nm: round1(totals.distance_nm),
                cumulative_time_min: round1(totals.time_min),
                cumulative_fuel_gal: round1(totals.fuel_gal),
            }
        }
    }

    /// Write the nav log as CSV with a header and a closing totals row.
    pub fn write_nav_log<W: Write>(writer: W, log: &NavLog) -> Result<(), ExportError> {
        let mut csv = csv::Writer::from_writer(writer);
        for entry in &log.entries {
            csv.serialize(Record::from_entry(entry))?;
        }
        csv.serialize(Record::totals(log))?;
        csv.flush()?;
        Ok(())
    }

    pub fn write_nav_log_to_path(path: &Path, log: &NavLog) -> Result<(), ExportError> {
        write_nav_log(writer_for_path(path)?, log)
    }
}

pub mod report {
    use std::io::Write;
    use std::path::Path;

    use serde::Serialize;
    use serde_json::to_writer_pretty;
    use vfr_planner::{ErrorKind, FlightPlan, PlanError};

    use crate::{ExportError, writer_for_path};

    /// JSON document written for a successful plan.
    #[derive(Serialize)]
    struct PlanDocument<'a> {
        status: &'static str,
        generator: &'static str,
        plan: &'a FlightPlan,
    }

    /// JSON document written when planning fails.
    #[derive(Debug, Serialize)]
    pub struct FailureDocument {
        pub status: &'static str,
        pub kind: ErrorKind,
        pub profile_id: Option<u32>,
        pub leg_index: Option<usize>,
        pub message: String,
    }

    impl From<&PlanError> for FailureDocument {
        fn from(err: &PlanError) -> Self {
            Self {
                status: "error",
                kind: err.kind(),
                profile_id: err.profile_id(),
                leg_index: err.leg_index(),
                message: err.to_string(),
            }
        }
    }

    pub fn write_plan<W: Write>(mut writer: W, plan: &FlightPlan) -> Result<(), ExportError> {
        let document = PlanDocument {
            status: "ok",
            generator: concat!("vfr_flight_planner ", env!("CARGO_PKG_VERSION")),
            plan,
        };
        to_writer_pretty(&mut writer, &document)?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }

    pub fn write_failure<W: Write>(mut writer: W, err: &PlanError) -> Result<(), ExportError> {
        to_writer_pretty(&mut writer, &FailureDocument::from(err))?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }

    pub fn write_plan_to_path(path: &Path, plan: &FlightPlan) -> Result<(), ExportError> {
        write_plan(writer_for_path(path)?, plan)
    }

    pub fn write_failure_to_path(path: &Path, err: &PlanError) -> Result<(), ExportError> {
        write_failure(writer_for_path(path)?, err)
    }
}

#[cfg(test)]
mod tests {
    use super::navlog::{Record, write_nav_log};
    use super::report::write_failure;
    use super::*;
    use vfr_planner::{NavLog, NavLogEntry, NavLogTotals, PlanError};

    fn entry(index: usize, from: &str, to: &str, distance: f64, time: f64) -> NavLogEntry {
        NavLogEntry {
            leg_index: index,
            from_waypoint: from.into(),
            to_waypoint: to.into(),
            altitude_ft: 4_500.0,
            pressure_alt_ft: 4_420.0,
            rpm: 2_400.0,
            temperature_c: 6.04,
            ktas: 109.6,
            kcas: 102.3,
            true_track_deg: 89.7,
            wind_direction_deg: None,
            wind_speed_kt: 0.0,
            true_heading_deg: 89.7,
            magnetic_variation_deg: -13.0,
            magnetic_heading_deg: 102.7,
            ground_speed_kt: 109.6,
            climb_distance_nm: 0.0,
            enroute_distance_nm: distance,
            total_distance_nm: distance,
            climb_time_min: 0.0,
            enroute_time_min: time,
            total_time_min: time,
            climb_fuel_gal: 0.0,
            cruise_gph: 8.0,
            enroute_fuel_gal: time / 60.0 * 8.0,
            total_fuel_gal: time / 60.0 * 8.0,
            cumulative_distance_nm: distance,
            cumulative_time_min: time,
            cumulative_fuel_gal: time / 60.0 * 8.0,
        }
    }

    fn log() -> NavLog {
        NavLog {
            flight_id: 1,
            weight_lb: 2_200.0,
            entries: vec![entry(0, "AAA", "BBB", 30.04, 16.44), entry(1, "BBB", "CCC", 20.0, 10.95)],
            climbs: vec![None, None],
            totals: NavLogTotals {
                enroute_distance_nm: 50.04,
                distance_nm: 50.04,
                enroute_time_min: 27.39,
                time_min: 27.39,
                enroute_fuel_gal: 3.65,
                fuel_gal: 3.65,
                ..NavLogTotals::default()
            },
        }
    }

    #[test]
    fn nav_log_csv_has_header_rows_and_totals() {
        let mut buffer = Vec::new();
        write_nav_log(&mut buffer, &log()).unwrap();
        let mut reader = csv::Reader::from_reader(buffer.as_slice());
        let headers = reader.headers().unwrap().clone();
        assert_eq!(&headers[0], "leg");
        assert_eq!(&headers[10], "wind_direction_deg");
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(&rows[0][0], "1");
        assert_eq!(&rows[0][1], "AAA");
        assert_eq!(&rows[0][10], "");
        assert_eq!(&rows[2][0], "TOTAL");
        assert_eq!(&rows[2][2], "CCC");
        assert_eq!(&rows[2][3], "");
        let total: f64 = rows[2][16].parse().unwrap();
        assert_eq!(total, 50.0);
        assert_eq!(&headers[18], "enroute_distance_nm");
        assert_eq!(&headers[21], "enroute_time_min");
        assert_eq!(&headers[24], "enroute_fuel_gal");
        let enroute: f64 = rows[2][18].parse().unwrap();
        assert_eq!(enroute, 50.0);
    }

    #[test]
    fn record_rounds_for_display() {
        let record = Record::from_entry(&entry(0, "AAA", "BBB", 30.04, 16.44));
        assert_eq!(record.leg, "1");
        assert_eq!(record.distance_nm, 30.0);
        assert_eq!(record.time_min, 16.4);
        assert_eq!(record.magnetic_heading_deg, Some(103.0));
    }

    #[test]
    fn failure_json_carries_kind_and_leg() {
        let err = PlanError::at_leg(1)(PlanError::EmptyRoute(3));
        let mut buffer = Vec::new();
        write_failure(&mut buffer, &err).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(value["status"], "error");
        assert_eq!(value["kind"], "invalid_input");
        assert_eq!(value["leg_index"], 1);
        assert!(value["profile_id"].is_null());
    }

    #[test]
    fn writer_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("navlog.csv");
        navlog::write_nav_log_to_path(&path, &log()).unwrap();
        assert!(path.exists());
    }
}
