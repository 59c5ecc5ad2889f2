mod alert;
mod plan;
mod profile;
mod reading;
mod sensor;
mod severity;
mod thresholds;

pub use alert::*;
pub use plan::*;
pub use profile::*;
pub use reading::*;
pub use sensor::*;
pub use severity::*;
pub use thresholds::*;

use std::fmt;

/// Identifier of the plan that always exists and cannot be removed.
pub const DEFAULT_PLAN_ID: &str = "default";

/// Returned when a textual name does not match any known variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseNameError {
    pub expected: &'static str,
    pub found: String,
}

impl fmt::Display for ParseNameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} `{}`", self.expected, self.found)
    }
}

impl std::error::Error for ParseNameError {}
