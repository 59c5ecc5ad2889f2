use super::ErrorCategory;

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Plan not found: {0}")]
    PlanNotFound(String),

    #[error("Sensor not found: {0}")]
    SensorNotFound(String),

    #[error("The default plan cannot be removed")]
    DefaultPlanRemoval,
}

impl RegistryError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            RegistryError::PlanNotFound(_) => ErrorCategory::NotFound,
            RegistryError::SensorNotFound(_) => ErrorCategory::NotFound,
            RegistryError::DefaultPlanRemoval => ErrorCategory::Forbidden,
        }
    }
}
