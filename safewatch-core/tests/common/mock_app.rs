#![allow(dead_code)]

use std::sync::Arc;

use safewatch_api::id::{IdGenerator, SequentialIdGenerator};
use safewatch_api::models::{DoorReading, Readings};
use safewatch_core::clock::ManualTimeProvider;
use safewatch_core::journal::Journal;
use safewatch_core::monitor::{Monitor, ScriptedSource};
use safewatch_core::profiles::ProfileStore;
use safewatch_core::registry::SensorRegistry;
use safewatch_core::storage::MemoryStorage;
use safewatch_core::thresholds::ThresholdStore;
use time::macros::datetime;

pub struct MockApp {
    pub storage: Arc<MemoryStorage>,
    pub ids: Arc<SequentialIdGenerator>,
    pub clock: Arc<ManualTimeProvider>,
}

impl MockApp {
    pub fn new() -> Self {
        Self::with_storage(MemoryStorage::new())
    }

    /// App over pre-filled storage, e.g. records left by the old dashboard.
    pub fn with_storage(storage: MemoryStorage) -> Self {
        Self {
            storage: Arc::new(storage),
            ids: Arc::new(SequentialIdGenerator::new("test")),
            clock: Arc::new(ManualTimeProvider::new(datetime!(2024-05-01 12:00 UTC))),
        }
    }

    pub fn monitor(&self, script: Vec<Readings>) -> Monitor {
        let ids: Arc<dyn IdGenerator> = self.ids.clone();

        Monitor::new(
            Box::new(ScriptedSource::new(script)),
            ThresholdStore::load(self.storage.clone()),
            Journal::load(self.storage.clone()),
            SensorRegistry::load(self.storage.clone(), ids.clone()),
            ids,
            self.clock.clone(),
        )
    }

    pub fn profiles(&self) -> ProfileStore {
        ProfileStore::load(self.storage.clone(), self.clock.clone())
    }

    pub fn registry(&self) -> SensorRegistry {
        SensorRegistry::load(self.storage.clone(), self.ids.clone())
    }

    pub fn journal(&self) -> Journal {
        Journal::load(self.storage.clone())
    }

    pub fn thresholds(&self) -> ThresholdStore {
        ThresholdStore::load(self.storage.clone())
    }
}

pub fn create_calm_readings() -> Readings {
    Readings {
        temperature: 36.0,
        inverter_temperature: 42.0,
        smoke: 0.08,
        motion_count: 2,
        doors: vec![
            DoorReading::closed("d1", "Main Gate"),
            DoorReading::closed("d2", "Garage"),
        ],
    }
}
