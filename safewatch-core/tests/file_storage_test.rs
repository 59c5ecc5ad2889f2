use std::sync::Arc;

use safewatch_api::id::SequentialIdGenerator;
use safewatch_api::models::{Position, SensorKind, DEFAULT_PLAN_ID};
use safewatch_core::journal::Journal;
use safewatch_core::registry::SensorRegistry;
use safewatch_core::storage::{FileStorage, RecordKind};

#[test]
fn test_registry_persists_to_directory() {
    let dir = tempfile::tempdir().unwrap();
    let storage = Arc::new(FileStorage::new(dir.path()).unwrap());

    let mut registry = SensorRegistry::load(storage.clone(), Arc::new(SequentialIdGenerator::new("s")));
    let plan_id = registry.add_plan("basement.png", None);
    registry
        .add_sensor(&plan_id, SensorKind::Door, "Cellar", Position::new(50.0, 50.0))
        .unwrap();

    assert!(dir.path().join(format!("{}.json", RecordKind::Sensors.key())).exists());

    let reloaded = SensorRegistry::load(
        Arc::new(FileStorage::new(dir.path()).unwrap()),
        Arc::new(SequentialIdGenerator::new("s")),
    );
    assert_eq!(reloaded.plans().len(), 2);
    assert_eq!(reloaded.sensors(&plan_id)[0].label, "Cellar");
    assert_eq!(reloaded.sensors(DEFAULT_PLAN_ID).len(), 4);
}

#[test]
fn test_cleared_journal_removes_file() {
    let dir = tempfile::tempdir().unwrap();
    let storage = Arc::new(FileStorage::new(dir.path()).unwrap());
    let path = dir.path().join(format!("{}.json", RecordKind::Journal.key()));

    let mut journal = Journal::load(storage);
    journal.append(safewatch_api::models::Alert::new(
        "a",
        time::OffsetDateTime::UNIX_EPOCH,
        "Door open: Main Gate",
        safewatch_api::models::AlertSeverity::Warning,
    ));
    assert!(path.exists());

    journal.clear();
    assert!(!path.exists());
}
