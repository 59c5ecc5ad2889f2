use std::sync::Arc;

use safewatch_api::id::IdGenerator;
use safewatch_api::models::{Alert, Readings, Sensor, SensorStatus, Thresholds};

use crate::clock::TimeProvider;
use crate::errors::RegistryError;
use crate::evaluator::{self, Assessment};
use crate::history::History;
use crate::journal::Journal;
use crate::registry::SensorRegistry;
use crate::thresholds::ThresholdStore;

/// Produces the readings for the next tick.
pub trait ReadingSource {
    fn next(&mut self) -> Readings;
}

/// Replays a fixed sequence, then keeps returning its last element.
pub struct ScriptedSource {
    script: Vec<Readings>,
    position: usize,
}

impl ScriptedSource {
    pub fn new(script: Vec<Readings>) -> Self {
        Self { script, position: 0 }
    }
}

impl ReadingSource for ScriptedSource {
    fn next(&mut self) -> Readings {
        let index = self.position.min(self.script.len().saturating_sub(1));
        self.position += 1;
        self.script.get(index).cloned().unwrap_or_default()
    }
}

#[derive(Debug, Clone)]
pub struct TickReport {
    pub readings: Readings,
    pub assessment: Assessment,
    pub alerts: Vec<Alert>,
}

pub struct Monitor {
    source: Box<dyn ReadingSource>,
    thresholds: ThresholdStore,
    journal: Journal,
    registry: SensorRegistry,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn TimeProvider>,
    current: Readings,
    history: History,
}

impl Monitor {
    pub fn new(
        source: Box<dyn ReadingSource>,
        thresholds: ThresholdStore,
        journal: Journal,
        registry: SensorRegistry,
        ids: Arc<dyn IdGenerator>,
        clock: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            source,
            thresholds,
            journal,
            registry,
            ids,
            clock,
            current: Readings::default(),
            history: History::default(),
        }
    }

    /// Pull the next readings, evaluate them and journal any alerts.
    pub fn tick(&mut self) -> TickReport {
        let now = self.clock.now();

        self.current = self.source.next();
        self.history.push(now, self.current.temperature);

        let thresholds = self.thresholds.get();
        let assessment = evaluator::evaluate(&self.current, thresholds);
        let alerts = evaluator::detect_alerts(&self.current, thresholds, self.ids.as_ref(), now);

        if !alerts.is_empty() {
            tracing::info!(count = alerts.len(), overall = %assessment.overall(), "alerts raised");
        }

        self.journal.append_batch(alerts.clone());

        TickReport {
            readings: self.current.clone(),
            assessment,
            alerts,
        }
    }

    /// Journal a manual alarm for a placed sensor.
    pub fn trigger_sensor_alarm(&mut self, plan_id: &str, sensor_id: &str) -> Result<Alert, RegistryError> {
        if self.registry.plan(plan_id).is_none() {
            return Err(RegistryError::PlanNotFound(plan_id.to_string()));
        }

        let sensor = self
            .registry
            .find_sensor(plan_id, sensor_id)
            .ok_or_else(|| RegistryError::SensorNotFound(sensor_id.to_string()))?;
        let alert = evaluator::sensor_alarm(sensor, self.ids.generate(), self.clock.now());

        tracing::info!(sensor = %sensor_id, "sensor alarm triggered");

        self.journal.append(alert.clone());
        Ok(alert)
    }

    /// Status of every sensor on a plan against the current readings.
    pub fn sensor_statuses(&self, plan_id: &str) -> Vec<(&Sensor, SensorStatus)> {
        let thresholds = self.thresholds.get();

        self.registry
            .sensors(plan_id)
            .iter()
            .map(|sensor| (sensor, evaluator::sensor_status(sensor, &self.current, thresholds)))
            .collect()
    }

    pub fn assessment(&self) -> Assessment {
        evaluator::evaluate(&self.current, self.thresholds.get())
    }

    pub fn current(&self) -> &Readings {
        &self.current
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn thresholds(&self) -> &Thresholds {
        self.thresholds.get()
    }

    pub fn threshold_store_mut(&mut self) -> &mut ThresholdStore {
        &mut self.thresholds
    }

    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    pub fn journal_mut(&mut self) -> &mut Journal {
        &mut self.journal
    }

    pub fn registry(&self) -> &SensorRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut SensorRegistry {
        &mut self.registry
    }
}
