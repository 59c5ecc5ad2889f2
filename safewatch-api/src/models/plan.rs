use serde::{Deserialize, Serialize};

use super::DEFAULT_PLAN_ID;

/// Floor plan used as the coordinate space for sensor placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    /// Plan identifier
    pub id: String,
    /// Display label, usually the uploaded file name
    pub label: String,
    /// Background image as a data URI
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Plan {
    pub fn default_plan() -> Self {
        Self {
            id: DEFAULT_PLAN_ID.to_string(),
            label: "Default plan".to_string(),
            image: None,
        }
    }

    pub fn is_default(&self) -> bool {
        self.id == DEFAULT_PLAN_ID
    }
}
