use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoorReading {
    /// Door identifier
    pub id: String,
    /// Display label, matched against door sensor labels
    pub label: String,
    /// Whether the door is currently open
    pub open: bool,
}

impl DoorReading {
    pub fn closed(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            open: false,
        }
    }
}

/// Values produced by a reading source for one tick.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Readings {
    /// Ambient temperature in Celsius
    pub temperature: f64,
    /// Inverter temperature in Celsius
    pub inverter_temperature: f64,
    /// Smoke likelihood within 0..=1
    pub smoke: f64,
    /// Motion events seen during the tick
    pub motion_count: u32,
    /// Door contacts
    pub doors: Vec<DoorReading>,
}

impl Readings {
    /// First open door, in source order.
    pub fn open_door(&self) -> Option<&DoorReading> {
        self.doors.iter().find(|door| door.open)
    }

    pub fn door(&self, label: &str) -> Option<&DoorReading> {
        self.doors.iter().find(|door| door.label == label)
    }

    pub fn open_doors(&self) -> usize {
        self.doors.iter().filter(|door| door.open).count()
    }
}
