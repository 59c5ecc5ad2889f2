use std::sync::Arc;

use safewatch_api::models::{ThresholdField, Thresholds};

use crate::errors::ThresholdError;
use crate::storage::{record, RecordKind, Storage};

pub struct ThresholdStore {
    storage: Arc<dyn Storage>,
    current: Thresholds,
}

impl ThresholdStore {
    /// Load persisted thresholds, falling back to defaults.
    pub fn load(storage: Arc<dyn Storage>) -> Self {
        let current = record::load::<Thresholds>(storage.as_ref(), RecordKind::Thresholds)
            .filter(|thresholds| match thresholds.first_non_finite() {
                None => true,
                Some(field) => {
                    tracing::warn!("persisted threshold `{}` is not finite, using defaults", field);
                    false
                }
            })
            .unwrap_or_default();

        Self::new(storage, current)
    }

    pub fn new(storage: Arc<dyn Storage>, current: Thresholds) -> Self {
        Self { storage, current }
    }

    pub fn get(&self) -> &Thresholds {
        &self.current
    }

    pub fn replace(&mut self, thresholds: Thresholds) -> Result<(), ThresholdError> {
        if let Some(field) = thresholds.first_non_finite() {
            return Err(ThresholdError::NotFinite(field));
        }

        tracing::debug!(?thresholds, "thresholds updated");

        self.current = thresholds;
        self.flush();

        Ok(())
    }

    pub fn reset(&mut self, field: ThresholdField) {
        self.current.reset(field);
        self.flush();
    }

    pub fn reset_all(&mut self) {
        self.current = Thresholds::default();
        self.flush();
    }

    fn flush(&self) {
        record::persist(self.storage.as_ref(), RecordKind::Thresholds, &self.current);
    }
}
