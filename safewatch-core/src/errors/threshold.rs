use safewatch_api::models::ThresholdField;

#[derive(Debug, thiserror::Error)]
pub enum ThresholdError {
    #[error("Threshold `{0}` must be a finite number")]
    NotFinite(ThresholdField),
}
