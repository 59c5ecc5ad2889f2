//! Threshold classification.
//!
//! Everything here is a pure function of readings and thresholds.

use safewatch_api::id::IdGenerator;
use safewatch_api::models::{
    Alert, AlertSeverity, DoorReading, Readings, Sensor, SensorKind, SensorStatus, Severity,
    Thresholds,
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Margin below the temperature limit where a warning starts.
pub const TEMPERATURE_WARNING_MARGIN: f64 = 5.0;
/// Margin below the smoke limit where a warning starts.
pub const SMOKE_WARNING_MARGIN: f64 = 0.15;
/// Motion above this multiple of the limit is critical.
pub const MOTION_CRITICAL_FACTOR: f64 = 1.5;

pub fn temperature_severity(reading: f64, limit: f64) -> Severity {
    if reading > limit {
        Severity::Critical
    } else if reading > limit - TEMPERATURE_WARNING_MARGIN {
        Severity::Warning
    } else {
        Severity::Ok
    }
}

pub fn smoke_severity(reading: f64, limit: f64) -> Severity {
    if reading > limit {
        Severity::Critical
    } else if reading > limit - SMOKE_WARNING_MARGIN {
        Severity::Warning
    } else {
        Severity::Ok
    }
}

pub fn motion_severity(count: u32, limit: f64) -> Severity {
    let count = f64::from(count);
    if count > limit * MOTION_CRITICAL_FACTOR {
        Severity::Critical
    } else if count > limit {
        Severity::Warning
    } else {
        Severity::Ok
    }
}

pub fn door_severity(doors: &[DoorReading], alerts_enabled: bool) -> Severity {
    if alerts_enabled && doors.iter().any(|door| door.open) {
        Severity::Warning
    } else {
        Severity::Ok
    }
}

/// Inverter overheating is reported, never escalated.
pub fn inverter_severity(reading: f64, limit: f64) -> Severity {
    if reading > limit {
        Severity::Warning
    } else {
        Severity::Ok
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Assessment {
    pub temperature: Severity,
    pub inverter_temperature: Severity,
    pub smoke: Severity,
    pub motion: Severity,
    pub doors: Severity,
}

impl Assessment {
    /// Worst severity across every monitored quantity.
    pub fn overall(&self) -> Severity {
        [
            self.temperature,
            self.inverter_temperature,
            self.smoke,
            self.motion,
            self.doors,
        ]
        .into_iter()
        .max()
        .unwrap_or_default()
    }
}

pub fn evaluate(readings: &Readings, thresholds: &Thresholds) -> Assessment {
    Assessment {
        temperature: temperature_severity(readings.temperature, thresholds.temperature),
        inverter_temperature: inverter_severity(
            readings.inverter_temperature,
            thresholds.inverter_temperature,
        ),
        smoke: smoke_severity(readings.smoke, thresholds.smoke),
        motion: motion_severity(readings.motion_count, thresholds.motion_count),
        doors: door_severity(&readings.doors, thresholds.door_open_alerts),
    }
}

/// Status shown for a placed sensor.
///
/// A door sensor follows the door with the same label and warns while it is
/// open, whether or not door alerts are enabled.
pub fn sensor_status(sensor: &Sensor, readings: &Readings, thresholds: &Thresholds) -> SensorStatus {
    if !sensor.enabled {
        return SensorStatus::Disabled;
    }

    let severity = match sensor.kind {
        SensorKind::Temperature => temperature_severity(readings.temperature, thresholds.temperature),
        SensorKind::Smoke => smoke_severity(readings.smoke, thresholds.smoke),
        SensorKind::Motion => motion_severity(readings.motion_count, thresholds.motion_count),
        SensorKind::Door => match readings.door(&sensor.label) {
            Some(door) if door.open => Severity::Warning,
            _ => Severity::Ok,
        },
    };

    severity.into()
}

/// Alert records for one tick, in a stable order.
pub fn detect_alerts(
    readings: &Readings,
    thresholds: &Thresholds,
    ids: &dyn IdGenerator,
    now: OffsetDateTime,
) -> Vec<Alert> {
    let mut alerts = Vec::new();
    let mut raise = |message: String, severity: AlertSeverity| {
        alerts.push(Alert::new(ids.generate(), now, message, severity));
    };

    if readings.temperature > thresholds.temperature {
        raise(
            format!(
                "Temperature too high: {}°C (threshold {}°C)",
                readings.temperature, thresholds.temperature
            ),
            AlertSeverity::Critical,
        );
    }
    if readings.inverter_temperature > thresholds.inverter_temperature {
        raise(
            format!(
                "Inverter temp high: {}°C (threshold {}°C)",
                readings.inverter_temperature, thresholds.inverter_temperature
            ),
            AlertSeverity::Warning,
        );
    }
    if readings.smoke > thresholds.smoke {
        raise(
            format!("Smoke likelihood high: {:.0}%", readings.smoke * 100.0),
            AlertSeverity::Critical,
        );
    }
    if f64::from(readings.motion_count) > thresholds.motion_count {
        raise(
            format!("Unusual motion: {} events", readings.motion_count),
            AlertSeverity::Info,
        );
    }
    if thresholds.door_open_alerts {
        if let Some(door) = readings.open_door() {
            raise(format!("Door open: {}", door.label), AlertSeverity::Warning);
        }
    }

    alerts
}

/// Alert raised when a user simulates an alarm on a placed sensor.
pub fn sensor_alarm(sensor: &Sensor, id: String, now: OffsetDateTime) -> Alert {
    let severity = match sensor.kind {
        SensorKind::Temperature | SensorKind::Smoke => AlertSeverity::Critical,
        SensorKind::Motion | SensorKind::Door => AlertSeverity::Info,
    };

    Alert::new(
        id,
        now,
        format!("Sensor {} triggered ({})", sensor.label, sensor.kind.short_name()),
        severity,
    )
}
