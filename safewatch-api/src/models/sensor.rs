use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ParseNameError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SensorKind {
    /// Ambient or equipment temperature sensor
    Temperature,
    /// Smoke detector
    Smoke,
    /// Motion detector
    Motion,
    /// Door contact
    Door,
}

impl SensorKind {
    pub const ALL: [SensorKind; 4] = [
        SensorKind::Temperature,
        SensorKind::Smoke,
        SensorKind::Motion,
        SensorKind::Door,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SensorKind::Temperature => "temperature",
            SensorKind::Smoke => "smoke",
            SensorKind::Motion => "motion",
            SensorKind::Door => "door",
        }
    }

    /// Name used in alert messages, matching the journal the dashboard kept.
    pub fn short_name(&self) -> &'static str {
        match self {
            SensorKind::Temperature => "temp",
            other => other.as_str(),
        }
    }
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for SensorKind {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "temp" | "temperature" => Ok(SensorKind::Temperature),
            "smoke" => Ok(SensorKind::Smoke),
            "motion" => Ok(SensorKind::Motion),
            "door" => Ok(SensorKind::Door),
            other => Err(ParseNameError {
                expected: "sensor kind",
                found: other.to_string(),
            }),
        }
    }
}

/// Point on a plan, in percent of its width and height.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sensor {
    /// Sensor identifier, unique within its plan
    pub id: String,
    /// Display label
    pub label: String,
    /// What the sensor measures
    #[serde(rename = "type")]
    pub kind: SensorKind,
    /// Placement on the plan
    #[serde(flatten)]
    pub position: Position,
    /// Disabled sensors are never evaluated
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}

impl Sensor {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        kind: SensorKind,
        position: Position,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind,
            position,
            enabled: true,
        }
    }
}
