//! Multi-axis linear interpolation over non-uniform, sorted tables.

use std::cmp::Ordering;
use std::fmt;

use tracing::{debug, warn};
use vfr_config::{AxisMargins, ClimbRow, CruiseRow, PlannerSettings, TableKind, TakeoffLandingRow};

use crate::TableError;

/// Interpolated takeoff or landing distances before corrections.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TakeoffLandingDistances {
    pub groundroll_ft: f64,
    pub obstacle_clearance_ft: f64,
}

/// Interpolated climb figures, cumulative from sea level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClimbPerformance {
    pub kias: f64,
    pub fpm: f64,
    pub time_min: f64,
    pub fuel_gal: f64,
    pub distance_nm: f64,
}

/// Interpolated cruise figures.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CruisePerformance {
    pub rpm: f64,
    pub bhp_percent: f64,
    pub ktas: f64,
    pub gph: f64,
}

/// Independent table axis, listed in lookup order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Weight,
    PressureAltitude,
    Temperature,
    Power,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Axis::Weight => "weight_lb",
            Axis::PressureAltitude => "pressure_alt_ft",
            Axis::Temperature => "temperature_c",
            Axis::Power => "bhp_percent",
        };
        f.write_str(name)
    }
}

/// Target conditions for a table lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LookupPoint {
    pub weight_lb: f64,
    pub pressure_alt_ft: f64,
    pub temperature_c: f64,
    pub bhp_percent: Option<f64>,
}

impl LookupPoint {
    pub fn new(weight_lb: f64, pressure_alt_ft: f64, temperature_c: f64) -> Self {
        Self {
            weight_lb,
            pressure_alt_ft,
            temperature_c,
            bhp_percent: None,
        }
    }

    pub fn with_power(mut self, bhp_percent: f64) -> Self {
        self.bhp_percent = Some(bhp_percent);
        self
    }

    fn value(&self, axis: Axis) -> Option<f64> {
        match axis {
            Axis::Weight => Some(self.weight_lb),
            Axis::PressureAltitude => Some(self.pressure_alt_ft),
            Axis::Temperature => Some(self.temperature_c),
            Axis::Power => self.bhp_percent,
        }
    }
}

/// How far a lookup may reach past the table edge on one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExtrapolationLimit {
    /// Multiples of the spacing between the two edge-most breakpoints.
    GridSteps(f64),
    /// Fixed distance in the axis unit.
    Absolute(f64),
}

impl ExtrapolationLimit {
    fn margin(&self, edge_step: f64) -> f64 {
        match *self {
            ExtrapolationLimit::GridSteps(steps) => steps * edge_step,
            ExtrapolationLimit::Absolute(margin) => margin,
        }
    }
}

/// Extrapolation limits per axis. Defaults to one grid step everywhere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtrapolationPolicy {
    pub default: ExtrapolationLimit,
    pub weight: Option<ExtrapolationLimit>,
    pub pressure_altitude: Option<ExtrapolationLimit>,
    pub temperature: Option<ExtrapolationLimit>,
    pub power: Option<ExtrapolationLimit>,
}

impl Default for ExtrapolationPolicy {
    fn default() -> Self {
        Self::uniform(ExtrapolationLimit::GridSteps(1.0))
    }
}

impl ExtrapolationPolicy {
    pub fn uniform(limit: ExtrapolationLimit) -> Self {
        Self {
            default: limit,
            weight: None,
            pressure_altitude: None,
            temperature: None,
            power: None,
        }
    }

    /// Policy that rejects every target outside the table range.
    pub fn within_table() -> Self {
        Self::uniform(ExtrapolationLimit::Absolute(0.0))
    }

    pub fn limit_for(&self, axis: Axis) -> ExtrapolationLimit {
        let specific = match axis {
            Axis::Weight => self.weight,
            Axis::PressureAltitude => self.pressure_altitude,
            Axis::Temperature => self.temperature,
            Axis::Power => self.power,
        };
        specific.unwrap_or(self.default)
    }
}

impl From<&PlannerSettings> for ExtrapolationPolicy {
    fn from(settings: &PlannerSettings) -> Self {
        let AxisMargins {
            weight_lb,
            pressure_alt_ft,
            temperature_c,
            bhp_percent,
        } = settings.axis_margins;
        Self {
            default: ExtrapolationLimit::GridSteps(settings.extrapolation_grid_steps),
            weight: weight_lb.map(ExtrapolationLimit::Absolute),
            pressure_altitude: pressure_alt_ft.map(ExtrapolationLimit::Absolute),
            temperature: temperature_c.map(ExtrapolationLimit::Absolute),
            power: bhp_percent.map(ExtrapolationLimit::Absolute),
        }
    }
}

#[inline]
pub fn lerp(lower: f64, upper: f64, fraction: f64) -> f64 {
    lower + (upper - lower) * fraction
}

/// Linear blend between two outputs; `fraction` 0 yields `lower` exactly.
pub trait Blend: Sized {
    fn blend(lower: &Self, upper: &Self, fraction: f64) -> Self;
}

impl Blend for TakeoffLandingDistances {
    fn blend(lower: &Self, upper: &Self, fraction: f64) -> Self {
        Self {
            groundroll_ft: lerp(lower.groundroll_ft, upper.groundroll_ft, fraction),
            obstacle_clearance_ft: lerp(
                lower.obstacle_clearance_ft,
                upper.obstacle_clearance_ft,
                fraction,
            ),
        }
    }
}

impl Blend for ClimbPerformance {
    fn blend(lower: &Self, upper: &Self, fraction: f64) -> Self {
        Self {
            kias: lerp(lower.kias, upper.kias, fraction),
            fpm: lerp(lower.fpm, upper.fpm, fraction),
            time_min: lerp(lower.time_min, upper.time_min, fraction),
            fuel_gal: lerp(lower.fuel_gal, upper.fuel_gal, fraction),
            distance_nm: lerp(lower.distance_nm, upper.distance_nm, fraction),
        }
    }
}

impl Blend for CruisePerformance {
    fn blend(lower: &Self, upper: &Self, fraction: f64) -> Self {
        Self {
            rpm: lerp(lower.rpm, upper.rpm, fraction),
            bhp_percent: lerp(lower.bhp_percent, upper.bhp_percent, fraction),
            ktas: lerp(lower.ktas, upper.ktas, fraction),
            gph: lerp(lower.gph, upper.gph, fraction),
        }
    }
}

/// A typed table row: ordered key axes plus an interpolable output.
pub trait TableRow {
    const AXES: &'static [Axis];
    type Output: Blend;

    fn key(&self, axis: Axis) -> f64;
    fn output(&self) -> Self::Output;
}

impl TableRow for TakeoffLandingRow {
    const AXES: &'static [Axis] = &[Axis::Weight, Axis::PressureAltitude, Axis::Temperature];
    type Output = TakeoffLandingDistances;

    fn key(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Weight => self.weight_lb,
            Axis::PressureAltitude => self.pressure_alt_ft,
            Axis::Temperature => self.temperature_c,
            Axis::Power => f64::NAN,
        }
    }

    fn output(&self) -> Self::Output {
        TakeoffLandingDistances {
            groundroll_ft: self.groundroll_ft,
            obstacle_clearance_ft: self.obstacle_clearance_ft,
        }
    }
}

impl TableRow for ClimbRow {
    const AXES: &'static [Axis] = &[Axis::Weight, Axis::PressureAltitude, Axis::Temperature];
    type Output = ClimbPerformance;

    fn key(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Weight => self.weight_lb,
            Axis::PressureAltitude => self.pressure_alt_ft,
            Axis::Temperature => self.temperature_c,
            Axis::Power => f64::NAN,
        }
    }

    fn output(&self) -> Self::Output {
        ClimbPerformance {
            kias: self.kias,
            fpm: self.fpm,
            time_min: self.time_min,
            fuel_gal: self.fuel_gal,
            distance_nm: self.distance_nm,
        }
    }
}

impl TableRow for CruiseRow {
    const AXES: &'static [Axis] = &[
        Axis::Weight,
        Axis::PressureAltitude,
        Axis::Temperature,
        Axis::Power,
    ];
    type Output = CruisePerformance;

    fn key(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Weight => self.weight_lb,
            Axis::PressureAltitude => self.pressure_alt_ft,
            Axis::Temperature => self.temperature_c,
            Axis::Power => self.bhp_percent,
        }
    }

    fn output(&self) -> Self::Output {
        CruisePerformance {
            rpm: self.rpm,
            bhp_percent: self.bhp_percent,
            ktas: self.ktas,
            gph: self.gph,
        }
    }
}

/// Rows of one table, sorted lexicographically on `R::AXES`.
#[derive(Debug, Clone)]
pub struct Table<R> {
    kind: TableKind,
    rows: Vec<R>,
}

impl<R: TableRow> Table<R> {
    /// Validate and sort rows. Keys must be finite and unique.
    pub fn new(kind: TableKind, mut rows: Vec<R>) -> Result<Self, TableError> {
        for (index, row) in rows.iter().enumerate() {
            if let Some(&axis) = R::AXES.iter().find(|&&axis| !row.key(axis).is_finite()) {
                return Err(TableError::NonFiniteKey {
                    table: kind,
                    row: index,
                    axis,
                });
            }
        }

        rows.sort_by(compare_keys::<R>);
        if let Some(pair) = rows
            .windows(2)
            .find(|pair| compare_keys(&pair[0], &pair[1]) == Ordering::Equal)
        {
            return Err(TableError::DuplicateRow {
                table: kind,
                key: R::AXES.iter().map(|&axis| pair[0].key(axis)).collect(),
            });
        }

        Ok(Self { kind, rows })
    }

    pub fn kind(&self) -> TableKind {
        self.kind
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Smallest and largest breakpoint on an axis.
    pub fn range(&self, axis: Axis) -> Option<(f64, f64)> {
        self.rows.iter().map(|row| row.key(axis)).fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }

    /// Interpolate the table at `point`.
    ///
    /// Axes are resolved in the fixed order of `R::AXES`. A target that falls
    /// exactly on a breakpoint selects that breakpoint without arithmetic, so
    /// grid points reproduce stored values exactly.
    pub fn interpolate(
        &self,
        point: &LookupPoint,
        policy: &ExtrapolationPolicy,
    ) -> Result<R::Output, TableError> {
        if self.rows.is_empty() {
            return Err(TableError::EmptyTable { table: self.kind });
        }
        for &axis in R::AXES {
            match point.value(axis) {
                None => {
                    return Err(TableError::MissingTarget {
                        table: self.kind,
                        axis,
                    });
                }
                Some(value) if !value.is_finite() => {
                    return Err(TableError::NonFiniteTarget { axis, value });
                }
                Some(_) => {}
            }
        }
        interpolate_slice(self.kind, &self.rows, R::AXES, point, policy)
    }
}

fn compare_keys<R: TableRow>(a: &R, b: &R) -> Ordering {
    R::AXES
        .iter()
        .map(|&axis| a.key(axis).total_cmp(&b.key(axis)))
        .find(|ordering| *ordering != Ordering::Equal)
        .unwrap_or(Ordering::Equal)
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Bracket {
    Exact(f64),
    Span { lower: f64, upper: f64 },
}

fn interpolate_slice<R: TableRow>(
    kind: TableKind,
    rows: &[R],
    axes: &[Axis],
    point: &LookupPoint,
    policy: &ExtrapolationPolicy,
) -> Result<R::Output, TableError> {
    let Some((&axis, rest)) = axes.split_first() else {
        // every axis resolved; keys are unique so exactly one row remains
        return rows
            .first()
            .map(TableRow::output)
            .ok_or(TableError::EmptyTable { table: kind });
    };
    let target = point
        .value(axis)
        .ok_or(TableError::MissingTarget { table: kind, axis })?;

    let breakpoints = distinct_keys(rows, axis);
    match bracket(kind, axis, &breakpoints, target, policy.limit_for(axis))? {
        Bracket::Exact(value) => {
            interpolate_slice(kind, subset(rows, axis, value), rest, point, policy)
        }
        Bracket::Span { lower, upper } => {
            let low = interpolate_slice(kind, subset(rows, axis, lower), rest, point, policy)?;
            let high = interpolate_slice(kind, subset(rows, axis, upper), rest, point, policy)?;
            let fraction = (target - lower) / (upper - lower);
            Ok(R::Output::blend(&low, &high, fraction))
        }
    }
}

/// Breakpoints of `axis` within a slice already sorted on it.
fn distinct_keys<R: TableRow>(rows: &[R], axis: Axis) -> Vec<f64> {
    let mut keys: Vec<f64> = Vec::new();
    for row in rows {
        let key = row.key(axis);
        if keys.last() != Some(&key) {
            keys.push(key);
        }
    }
    keys
}

/// Contiguous run of rows whose `axis` key equals `value`.
fn subset<R: TableRow>(rows: &[R], axis: Axis, value: f64) -> &[R] {
    let start = rows.partition_point(|row| row.key(axis) < value);
    let len = rows[start..].partition_point(|row| row.key(axis) <= value);
    &rows[start..start + len]
}

fn bracket(
    table: TableKind,
    axis: Axis,
    breakpoints: &[f64],
    target: f64,
    limit: ExtrapolationLimit,
) -> Result<Bracket, TableError> {
    let (Some(&first), Some(&last)) = (breakpoints.first(), breakpoints.last()) else {
        return Err(TableError::EmptyTable { table });
    };
    if breakpoints.len() == 1 {
        if target != first {
            debug!(%table, %axis, target, breakpoint = first, "single breakpoint, axis treated as invariant");
        }
        return Ok(Bracket::Exact(first));
    }

    let index = breakpoints.partition_point(|&v| v < target);
    if index < breakpoints.len() && breakpoints[index] == target {
        return Ok(Bracket::Exact(target));
    }

    let n = breakpoints.len();
    let (lower, upper, overshoot) = if index == 0 {
        (breakpoints[0], breakpoints[1], first - target)
    } else if index == n {
        (breakpoints[n - 2], breakpoints[n - 1], target - last)
    } else {
        return Ok(Bracket::Span {
            lower: breakpoints[index - 1],
            upper: breakpoints[index],
        });
    };

    let margin = limit.margin(upper - lower);
    if overshoot > margin {
        return Err(TableError::OutOfRange {
            table,
            axis,
            target,
            min: first,
            max: last,
            margin,
        });
    }
    warn!(%table, %axis, target, min = first, max = last, "extrapolating beyond table edge");
    Ok(Bracket::Span { lower, upper })
}
