//! Tunables that are not part of any aircraft or flight record.

use serde::{Deserialize, Serialize};

fn default_grid_steps() -> f64 {
    1.0
}

fn default_altimeter() -> f64 {
    29.92
}

/// Planner-wide settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerSettings {
    /// Permitted extrapolation beyond a table edge, in multiples of the edge grid step.
    #[serde(default = "default_grid_steps")]
    pub extrapolation_grid_steps: f64,
    /// Absolute extrapolation margins that replace the grid-step rule per axis.
    #[serde(default)]
    pub axis_margins: AxisMargins,
    /// Altimeter setting assumed for legs that do not carry one.
    #[serde(default = "default_altimeter")]
    pub standard_altimeter_inhg: f64,
}

impl Default for PlannerSettings {
    fn default() -> Self {
        Self {
            extrapolation_grid_steps: default_grid_steps(),
            axis_margins: AxisMargins::default(),
            standard_altimeter_inhg: default_altimeter(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct AxisMargins {
    #[serde(default)]
    pub weight_lb: Option<f64>,
    #[serde(default)]
    pub pressure_alt_ft: Option<f64>,
    #[serde(default)]
    pub temperature_c: Option<f64>,
    #[serde(default)]
    pub bhp_percent: Option<f64>,
}
