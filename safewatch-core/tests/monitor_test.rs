use safewatch_api::models::{AlertSeverity, Severity, SensorKind, Position, Thresholds, DEFAULT_PLAN_ID};
use time::Duration;

mod common;
use common::mock_app::{create_calm_readings, MockApp};

#[test]
fn test_temperature_threshold_examples() {
    let app = MockApp::new();
    let script = [56.0, 51.0, 40.0]
        .into_iter()
        .map(|temperature| {
            let mut readings = create_calm_readings();
            readings.temperature = temperature;
            readings
        })
        .collect();
    let mut monitor = app.monitor(script);

    let severities: Vec<_> = (0..3).map(|_| monitor.tick().assessment.temperature).collect();

    assert_eq!(severities, vec![Severity::Critical, Severity::Warning, Severity::Ok]);
    assert_eq!(monitor.journal().len(), 1);
}

#[test]
fn test_journal_survives_restart() {
    let app = MockApp::new();
    let mut smoky = create_calm_readings();
    smoky.smoke = 0.75;

    let mut monitor = app.monitor(vec![smoky]);
    let report = monitor.tick();
    let alert_id = report.alerts[0].id.clone();
    assert!(monitor.journal_mut().acknowledge(&alert_id));

    let journal = app.journal();
    assert_eq!(journal.len(), 1);
    assert_eq!(journal.entries()[0].message, "Smoke likelihood high: 75%");
    assert!(journal.entries()[0].acknowledged);
    assert_eq!(journal.active_count(), 0);
}

#[test]
fn test_threshold_change_applies_next_tick() {
    let app = MockApp::new();
    let mut monitor = app.monitor(vec![create_calm_readings()]);

    assert!(monitor.tick().alerts.is_empty());

    monitor
        .threshold_store_mut()
        .replace(Thresholds {
            temperature: 30.0,
            ..Thresholds::default()
        })
        .unwrap();
    let report = monitor.tick();

    assert_eq!(report.alerts.len(), 1);
    assert_eq!(report.alerts[0].severity, AlertSeverity::Critical);
    assert_eq!(app.thresholds().get().temperature, 30.0);
}

#[test]
fn test_two_hundred_and_five_alerts() {
    let app = MockApp::new();
    let mut open = create_calm_readings();
    open.doors[1].open = true;
    let mut monitor = app.monitor(vec![open]);

    for _ in 0..205 {
        monitor.tick();
        app.clock.advance(Duration::milliseconds(2500));
    }

    let journal = app.journal();
    assert_eq!(journal.len(), 200);
    for n in 0..5 {
        assert!(journal.get(&format!("test-{n}")).is_none());
    }
    assert!(journal.get("test-204").is_some());
}

#[test]
fn test_placed_sensor_alarm_and_export() {
    let app = MockApp::new();
    let mut monitor = app.monitor(vec![create_calm_readings()]);
    monitor.tick();

    let sensor_id = monitor
        .registry_mut()
        .add_sensor(DEFAULT_PLAN_ID, SensorKind::Motion, "Hallway", Position::new(12.0, 40.0))
        .unwrap();
    monitor.trigger_sensor_alarm(DEFAULT_PLAN_ID, &sensor_id).unwrap();

    let text = monitor.journal().export_as_text().unwrap();

    assert_eq!(
        text,
        "\"2024-05-01T12:00:00Z\",\"info\",\"Sensor Hallway triggered (motion)\"\n"
    );
    assert_eq!(app.registry().sensors(DEFAULT_PLAN_ID).len(), 5);
}

#[test]
fn test_history_is_capped() {
    let app = MockApp::new();
    let mut monitor = app.monitor(vec![create_calm_readings()]);

    for _ in 0..50 {
        monitor.tick();
    }

    assert_eq!(monitor.history().len(), 48);
}
