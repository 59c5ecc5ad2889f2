use safewatch_api::models::Profile;
use safewatch_core::errors::{ErrorCategory, ProfileError};

mod common;
use common::mock_app::MockApp;

fn profile(email: &str, name: &str) -> Profile {
    Profile {
        display_name: Some(name.to_string()),
        organization: Some("Solar Co".to_string()),
        ..Profile::with_email(email)
    }
}

#[test]
fn test_active_profile_survives_restart() {
    let app = MockApp::new();
    let mut store = app.profiles();
    store.save(profile("ada@example.com", "Ada")).unwrap();
    store.save(profile("bob@example.com", "Bob")).unwrap();
    store.set_active(Some("BOB@example.com")).unwrap();

    let reloaded = app.profiles();

    assert_eq!(reloaded.all().len(), 2);
    assert_eq!(reloaded.active().and_then(|p| p.display_name.as_deref()), Some("Bob"));
}

#[test]
fn test_removing_inactive_keeps_pointer() {
    let app = MockApp::new();
    let mut store = app.profiles();
    store.save(profile("ada@example.com", "Ada")).unwrap();
    store.save(profile("bob@example.com", "Bob")).unwrap();

    store.remove("bob@example.com");

    assert_eq!(store.active_id(), Some("ada@example.com"));
    assert_eq!(app.profiles().active_id(), Some("ada@example.com"));
}

#[test]
fn test_export_import_between_installs() {
    let source = MockApp::new();
    let mut store = source.profiles();
    store.save(profile("ada@example.com", "Ada")).unwrap();
    store.save(profile("bob@example.com", "Bob")).unwrap();
    let exported = store.export_all().unwrap();

    let target = MockApp::new();
    let mut imported = target.profiles();
    imported.import_all(&exported).unwrap();

    assert_eq!(imported.all(), store.all());
    assert_eq!(target.profiles().all(), store.all());
}

#[test]
fn test_errors_are_categorised() {
    let app = MockApp::new();
    let mut store = app.profiles();

    let missing = store.save(Profile::default()).unwrap_err();
    let unknown = store.set_active(Some("ghost@example.com")).unwrap_err();
    let invalid = store.import_all("42").unwrap_err();

    assert!(matches!(missing, ProfileError::MissingEmail));
    assert_eq!(missing.category(), ErrorCategory::InvalidInput);
    assert_eq!(unknown.category(), ErrorCategory::NotFound);
    assert_eq!(invalid.category(), ErrorCategory::InvalidInput);
    assert!(app.storage.is_empty());
}
