use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ParseNameError;

/// User configurable limits used to classify readings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Ambient temperature limit in Celsius
    pub temperature: f64,
    /// Inverter temperature limit in Celsius
    pub inverter_temperature: f64,
    /// Smoke likelihood limit, expected within 0..=1
    pub smoke: f64,
    /// Motion events per tick
    pub motion_count: f64,
    /// Raise an alert while any door is open
    pub door_open_alerts: bool,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            temperature: 55.0,
            inverter_temperature: 70.0,
            smoke: 0.6,
            motion_count: 5.0,
            door_open_alerts: true,
        }
    }
}

impl Thresholds {
    /// Restore a single field to its default value.
    pub fn reset(&mut self, field: ThresholdField) {
        let defaults = Thresholds::default();
        match field {
            ThresholdField::Temperature => self.temperature = defaults.temperature,
            ThresholdField::InverterTemperature => {
                self.inverter_temperature = defaults.inverter_temperature
            }
            ThresholdField::Smoke => self.smoke = defaults.smoke,
            ThresholdField::MotionCount => self.motion_count = defaults.motion_count,
            ThresholdField::DoorOpenAlerts => self.door_open_alerts = defaults.door_open_alerts,
        }
    }

    /// Name of the first numeric field that is NaN or infinite.
    pub fn first_non_finite(&self) -> Option<ThresholdField> {
        [
            (ThresholdField::Temperature, self.temperature),
            (ThresholdField::InverterTemperature, self.inverter_temperature),
            (ThresholdField::Smoke, self.smoke),
            (ThresholdField::MotionCount, self.motion_count),
        ]
        .into_iter()
        .find(|(_, value)| !value.is_finite())
        .map(|(field, _)| field)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdField {
    Temperature,
    InverterTemperature,
    Smoke,
    MotionCount,
    DoorOpenAlerts,
}

impl ThresholdField {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThresholdField::Temperature => "temperature",
            ThresholdField::InverterTemperature => "inverter_temperature",
            ThresholdField::Smoke => "smoke",
            ThresholdField::MotionCount => "motion_count",
            ThresholdField::DoorOpenAlerts => "door_open_alerts",
        }
    }
}

impl fmt::Display for ThresholdField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThresholdField {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "temp" | "temperature" => Ok(ThresholdField::Temperature),
            "inverter" | "inverter_temp" | "inverter_temperature" => {
                Ok(ThresholdField::InverterTemperature)
            }
            "smoke" => Ok(ThresholdField::Smoke),
            "motion" | "motion_count" => Ok(ThresholdField::MotionCount),
            "door" | "doors" | "door_open_alerts" => Ok(ThresholdField::DoorOpenAlerts),
            other => Err(ParseNameError {
                expected: "threshold field",
                found: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_single_field() {
        let mut thresholds = Thresholds {
            temperature: 80.0,
            smoke: 0.9,
            ..Thresholds::default()
        };

        thresholds.reset(ThresholdField::Temperature);

        assert_eq!(thresholds.temperature, 55.0);
        assert_eq!(thresholds.smoke, 0.9);
    }

    #[test]
    fn test_first_non_finite() {
        let mut thresholds = Thresholds::default();
        assert_eq!(thresholds.first_non_finite(), None);

        thresholds.smoke = f64::NAN;
        assert_eq!(thresholds.first_non_finite(), Some(ThresholdField::Smoke));
    }

    #[test]
    fn test_parse_field_aliases() {
        assert_eq!("inverter".parse::<ThresholdField>(), Ok(ThresholdField::InverterTemperature));
        assert_eq!("door".parse::<ThresholdField>(), Ok(ThresholdField::DoorOpenAlerts));
        assert!("humidity".parse::<ThresholdField>().is_err());
    }
}
