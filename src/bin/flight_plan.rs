use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use vfr_flight_planner::config::{PlannerSettings, load_flights, load_profiles, load_settings};
use vfr_flight_planner::export::{navlog, report};
use vfr_flight_planner::planner::catalog::{profile_for, select_flight};
use vfr_flight_planner::weight_balance::Loadout;
use vfr_flight_planner::{FlightPlan, compute_weight_balance, plan_flight};

#[derive(Parser)]
#[command(author, version, about = "VFR flight planner: nav log, fuel, weight and balance")]
struct Cli {
    /// Aircraft performance profile(s): YAML file, TOML file or directory of TOML files
    #[arg(long)]
    profile: PathBuf,

    /// Flight(s) to plan: YAML file, TOML file or directory of TOML files
    #[arg(long)]
    flight: PathBuf,

    /// Flight id to plan (defaults to the first flight)
    #[arg(long)]
    flight_id: Option<u32>,

    /// Planner settings (YAML or TOML)
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Write the nav log as CSV (`-` for stdout)
    #[arg(long)]
    navlog_csv: Option<PathBuf>,

    /// Write the full plan, or the failure, as JSON (`-` for stdout)
    #[arg(long)]
    report_json: Option<PathBuf>,

    /// Only compute weight and balance for the flight's loadout
    #[arg(long, default_value_t = false)]
    weight_balance_only: bool,
}

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let profiles = load_profiles(&cli.profile)
        .with_context(|| format!("loading profiles from {}", cli.profile.display()))?;
    let flights = load_flights(&cli.flight)
        .with_context(|| format!("loading flights from {}", cli.flight.display()))?;
    let settings = match &cli.settings {
        Some(path) => load_settings(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => PlannerSettings::default(),
    };

    let flight = select_flight(&flights, cli.flight_id)?;
    let profile = profile_for(&profiles, flight)?;
    info!(flight_id = flight.id, profile = %profile.name, "planning flight");

    if cli.weight_balance_only {
        let report = compute_weight_balance(profile, &Loadout::from_flight(flight))?;
        println!("=== Weight and Balance: {} ===", profile.name);
        for item in &report.items {
            println!(
                "{:<24} {:>8.1} lb  arm {:>6.1} in  moment {:>9.1}",
                item.name, item.weight_lb, item.arm_in, item.moment_lb_in
            );
        }
        println!(
            "Ramp: {:.1} lb, CG {:.2} in, envelopes: {}",
            report.ramp.weight_lb,
            report.ramp.cg_in,
            report.envelopes().join(", ")
        );
        return Ok(ExitCode::SUCCESS);
    }

    let plan = match plan_flight(flight, profile, &settings) {
        Ok(plan) => plan,
        Err(err) => {
            if let Some(path) = &cli.report_json {
                report::write_failure_to_path(path, &err)
                    .with_context(|| format!("writing {}", path.display()))?;
            }
            eprintln!("planning failed ({:?}): {err}", err.kind());
            return Ok(ExitCode::FAILURE);
        }
    };

    if let Some(path) = &cli.navlog_csv {
        navlog::write_nav_log_to_path(path, &plan.nav_log)
            .with_context(|| format!("writing {}", path.display()))?;
    }
    if let Some(path) = &cli.report_json {
        report::write_plan_to_path(path, &plan)
            .with_context(|| format!("writing {}", path.display()))?;
    }
    print_summary(&plan);
    Ok(ExitCode::SUCCESS)
}

fn print_summary(plan: &FlightPlan) {
    println!("=== Flight {} ({}) ===", plan.flight_id, plan.profile_name);
    for entry in &plan.nav_log.entries {
        println!(
            "{:>2} {:<6} -> {:<6} TC {:>3.0}  MH {:>3.0}  GS {:>3.0} kt  {:>5.1} NM  {:>5.1} min  {:>4.1} gal",
            entry.leg_index + 1,
            entry.from_waypoint,
            entry.to_waypoint,
            entry.true_track_deg,
            entry.magnetic_heading_deg,
            entry.ground_speed_kt,
            entry.total_distance_nm,
            entry.total_time_min,
            entry.total_fuel_gal,
        );
    }
    let totals = &plan.nav_log.totals;
    println!(
        "Total: {:.1} NM, {:.1} min, {:.1} gal",
        totals.distance_nm, totals.time_min, totals.fuel_gal
    );
    println!(
        "Fuel: required {:.1} gal, on board {:.1} gal, margin {:.1} gal",
        plan.fuel.required_gal, plan.fuel.on_board_gal, plan.fuel.margin_gal
    );
    let wb = &plan.weight_balance;
    println!(
        "Ramp: {:.1} lb at {:.2} in ({})",
        wb.ramp.weight_lb,
        wb.ramp.cg_in,
        wb.envelopes().join(", ")
    );
    for (label, performance) in [("Takeoff", &plan.takeoff), ("Landing", &plan.landing)] {
        for runway in &performance.runways {
            println!(
                "{label} {} rwy {}: roll {:.0} ft, 50 ft obstacle {:.0} ft, available {:.0} ft",
                performance.aerodrome,
                runway.designator,
                runway.ground_roll_ft,
                runway.obstacle_clearance_ft,
                runway.available_length_ft,
            );
        }
    }
    for warning in &plan.warnings {
        println!("warning: {warning}");
    }
}
