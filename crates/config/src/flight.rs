//! Flight, route and loadout records.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Hemisphere {
    #[serde(rename = "N")]
    North,
    #[serde(rename = "S")]
    South,
    #[serde(rename = "E")]
    East,
    #[serde(rename = "W")]
    West,
}

/// A waypoint or aerodrome position in degrees/minutes/seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Waypoint {
    pub code: String,
    #[serde(default)]
    pub name: String,
    pub lat_degrees: f64,
    #[serde(default)]
    pub lat_minutes: f64,
    #[serde(default)]
    pub lat_seconds: f64,
    pub lat_direction: Hemisphere,
    pub lon_degrees: f64,
    #[serde(default)]
    pub lon_minutes: f64,
    #[serde(default)]
    pub lon_seconds: f64,
    pub lon_direction: Hemisphere,
    /// Signed magnetic variation in degrees, east positive.
    #[serde(default)]
    pub magnetic_variation: Option<f64>,
    #[serde(default)]
    pub aerodrome: Option<AerodromeData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AerodromeData {
    pub elevation_ft: f64,
    #[serde(default)]
    pub runways: Vec<Runway>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunwayPosition {
    #[serde(rename = "L")]
    Left,
    #[serde(rename = "C")]
    Center,
    #[serde(rename = "R")]
    Right,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Runway {
    pub id: u32,
    /// Runway number, 1..=36 (magnetic heading / 10).
    pub number: u8,
    #[serde(default)]
    pub position: Option<RunwayPosition>,
    pub length_ft: f64,
    #[serde(default)]
    pub landing_length_ft: Option<f64>,
    #[serde(default)]
    pub intersection_departure_length_ft: Option<f64>,
    pub surface_id: u32,
}

impl Runway {
    /// Designator such as `06L` or `24`.
    pub fn designator(&self) -> String {
        let suffix = match self.position {
            Some(RunwayPosition::Left) => "L",
            Some(RunwayPosition::Center) => "C",
            Some(RunwayPosition::Right) => "R",
            None => "",
        };
        format!("{:02}{}", self.number, suffix)
    }
}

/// Forecast wind, direction in degrees true (from), speed in knots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    #[serde(default)]
    pub direction: Option<f64>,
    #[serde(default)]
    pub speed_kt: f64,
}

impl Wind {
    pub fn calm() -> Self {
        Self::default()
    }

    pub fn from_direction(direction: f64, speed_kt: f64) -> Self {
        Self {
            direction: Some(direction),
            speed_kt,
        }
    }
}

/// One leg of the route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Leg {
    pub from: Waypoint,
    pub to: Waypoint,
    pub altitude_ft: f64,
    pub temperature_c: f64,
    #[serde(default)]
    pub altimeter_inhg: Option<f64>,
    #[serde(default)]
    pub wind: Wind,
}

/// Surface weather at the departure or arrival aerodrome.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TerminalWeather {
    pub altimeter_inhg: f64,
    pub temperature_c: f64,
    #[serde(default)]
    pub wind: Wind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Terminal {
    pub aerodrome: Waypoint,
    pub weather: TerminalWeather,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PersonOnBoard {
    pub seat_row_id: u32,
    pub weight_lb: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BaggageLoad {
    pub baggage_compartment_id: u32,
    pub weight_lb: f64,
}

/// Usable gallons loaded in a tank.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TankLoad {
    pub fuel_tank_id: u32,
    pub gallons: f64,
}

/// A flight as handed over by the persistence layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flight {
    pub id: u32,
    pub profile_id: u32,
    /// Selected cruise power setting.
    pub bhp_percent: f64,
    pub departure: Terminal,
    pub arrival: Terminal,
    pub legs: Vec<Leg>,
    #[serde(default)]
    pub persons: Vec<PersonOnBoard>,
    #[serde(default)]
    pub baggage: Vec<BaggageLoad>,
    #[serde(default)]
    pub fuel: Vec<TankLoad>,
    #[serde(default)]
    pub added_enroute_time_hours: f64,
    #[serde(default)]
    pub reserve_fuel_hours: f64,
    #[serde(default)]
    pub contingency_fuel_hours: f64,
}
