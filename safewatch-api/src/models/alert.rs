use std::fmt;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Info,
    Warning,
    Critical,
}

impl AlertSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertSeverity::Info => "info",
            AlertSeverity::Warning => "warning",
            AlertSeverity::Critical => "critical",
        }
    }
}

impl fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Journal entry raised by a threshold breach or a simulated sensor alarm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    /// Alert identifier
    pub id: String,
    /// Time the alert was raised
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    /// Human readable description
    pub message: String,
    /// Alert level
    pub severity: AlertSeverity,
    /// Whether a user has seen and acknowledged the alert
    #[serde(default)]
    pub acknowledged: bool,
}

impl Alert {
    pub fn new(
        id: impl Into<String>,
        timestamp: OffsetDateTime,
        message: impl Into<String>,
        severity: AlertSeverity,
    ) -> Self {
        Self {
            id: id.into(),
            timestamp,
            message: message.into(),
            severity,
            acknowledged: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    #[test]
    fn test_alert_wire_shape() {
        let alert = Alert::new(
            "a1",
            datetime!(2024-05-01 12:00:00 UTC),
            "Door open: Garage",
            AlertSeverity::Warning,
        );

        let value = serde_json::to_value(&alert).unwrap();

        assert_eq!(value["timestamp"], "2024-05-01T12:00:00Z");
        assert_eq!(value["severity"], "warning");
        assert_eq!(value["acknowledged"], false);
    }

    #[test]
    fn test_missing_acknowledged_defaults_to_false() {
        let alert: Alert = serde_json::from_str(
            r#"{"id":"x","timestamp":"2024-05-01T12:00:00.000Z","message":"m","severity":"info"}"#,
        )
        .unwrap();

        assert!(!alert.acknowledged);
        assert_eq!(alert.severity, AlertSeverity::Info);
    }
}
