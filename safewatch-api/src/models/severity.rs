use std::fmt;

use serde::{Deserialize, Serialize};

/// Classification of a reading against its threshold, ordered by gravity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Ok,
    Warning,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Ok => "ok",
            Severity::Warning => "warning",
            Severity::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Status of a placed sensor: its severity, or `Disabled` when switched off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SensorStatus {
    Disabled,
    Ok,
    Warning,
    Critical,
}

impl SensorStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SensorStatus::Disabled => "disabled",
            SensorStatus::Ok => "ok",
            SensorStatus::Warning => "warning",
            SensorStatus::Critical => "critical",
        }
    }
}

impl From<Severity> for SensorStatus {
    fn from(value: Severity) -> Self {
        match value {
            Severity::Ok => SensorStatus::Ok,
            Severity::Warning => SensorStatus::Warning,
            Severity::Critical => SensorStatus::Critical,
        }
    }
}

impl fmt::Display for SensorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Ok < Severity::Warning);
        assert!(Severity::Warning < Severity::Critical);
        assert_eq!(
            [Severity::Warning, Severity::Critical, Severity::Ok].iter().max(),
            Some(&Severity::Critical)
        );
    }

    #[test]
    fn test_status_from_severity() {
        assert_eq!(SensorStatus::from(Severity::Warning), SensorStatus::Warning);
        assert_eq!(SensorStatus::Disabled.to_string(), "disabled");
    }
}
