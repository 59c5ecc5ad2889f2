use std::collections::BTreeMap;
use std::sync::Arc;

use safewatch_api::models::Profile;
use serde_json::Value;

use crate::clock::TimeProvider;
use crate::errors::ProfileError;
use crate::storage::{record, RecordKind, Storage};

/// Profiles keyed by lower-cased email, plus the active profile pointer.
pub struct ProfileStore {
    storage: Arc<dyn Storage>,
    clock: Arc<dyn TimeProvider>,
    profiles: BTreeMap<String, Profile>,
    active: Option<String>,
}

impl ProfileStore {
    pub fn load(storage: Arc<dyn Storage>, clock: Arc<dyn TimeProvider>) -> Self {
        let profiles = record::load::<BTreeMap<String, Profile>>(storage.as_ref(), RecordKind::Profiles)
            .unwrap_or_default();
        let active = record::load::<String>(storage.as_ref(), RecordKind::ActiveProfile)
            .filter(|id| profiles.contains_key(id));

        Self {
            storage,
            clock,
            profiles,
            active,
        }
    }

    pub fn get(&self, id: &str) -> Option<&Profile> {
        self.profiles.get(&id.to_lowercase())
    }

    pub fn all(&self) -> &BTreeMap<String, Profile> {
        &self.profiles
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn active(&self) -> Option<&Profile> {
        self.active.as_ref().and_then(|id| self.profiles.get(id))
    }

    /// Insert or update a profile and return its id.
    pub fn save(&mut self, mut profile: Profile) -> Result<String, ProfileError> {
        let id = profile.key().ok_or(ProfileError::MissingEmail)?;
        let now = self.clock.now();

        profile.id = id.clone();
        profile.created_at = self
            .profiles
            .get(&id)
            .and_then(|existing| existing.created_at)
            .or(profile.created_at)
            .or(Some(now));
        profile.updated_at = Some(now);

        tracing::debug!(profile = %id, "profile saved");

        self.profiles.insert(id.clone(), profile);
        self.flush_profiles();

        if self.active.is_none() {
            self.active = Some(id.clone());
            self.flush_active();
        }

        Ok(id)
    }

    /// Delete a profile. Returns `false` when the id is unknown.
    pub fn remove(&mut self, id: &str) -> bool {
        let id = id.to_lowercase();
        if self.profiles.remove(&id).is_none() {
            return false;
        }

        self.flush_profiles();

        if self.active.as_deref() == Some(id.as_str()) {
            self.active = self.profiles.keys().next().cloned();
            self.flush_active();
        }

        true
    }

    pub fn set_active(&mut self, id: Option<&str>) -> Result<(), ProfileError> {
        self.active = match id {
            Some(id) => {
                let id = id.to_lowercase();
                if !self.profiles.contains_key(&id) {
                    return Err(ProfileError::ProfileNotFound(id));
                }
                Some(id)
            }
            None => None,
        };

        self.flush_active();
        Ok(())
    }

    /// Whole profile map as pretty-printed JSON.
    pub fn export_all(&self) -> Result<String, ProfileError> {
        Ok(serde_json::to_string_pretty(&self.profiles)?)
    }

    /// Replace every profile with the ones in `json`.
    ///
    /// Nothing changes unless the whole payload is valid.
    pub fn import_all(&mut self, json: &str) -> Result<usize, ProfileError> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| ProfileError::InvalidImport(e.to_string()))?;
        let Value::Object(entries) = value else {
            return Err(ProfileError::InvalidImport("expected an object of profiles".to_string()));
        };

        let mut profiles = BTreeMap::new();
        for (key, entry) in entries {
            let mut profile: Profile = serde_json::from_value(entry)
                .map_err(|e| ProfileError::InvalidImport(format!("{}: {}", key, e)))?;
            let id = profile
                .key()
                .ok_or_else(|| ProfileError::InvalidImport(format!("{}: missing email", key)))?;

            profile.id = id.clone();
            if profiles.insert(id.clone(), profile).is_some() {
                return Err(ProfileError::InvalidImport(format!(
                    "{}: more than one profile for {}",
                    key, id
                )));
            }
        }

        let count = profiles.len();
        tracing::info!(count, "profiles imported");

        self.profiles = profiles;
        self.flush_profiles();

        if let Some(active) = &self.active {
            if !self.profiles.contains_key(active) {
                tracing::warn!(profile = %active, "active profile missing after import, clearing it");
                self.active = None;
                self.flush_active();
            }
        }

        Ok(count)
    }

    fn flush_profiles(&self) {
        record::persist(self.storage.as_ref(), RecordKind::Profiles, &self.profiles);
    }

    fn flush_active(&self) {
        match &self.active {
            Some(id) => record::persist(self.storage.as_ref(), RecordKind::ActiveProfile, id),
            None => record::discard(self.storage.as_ref(), RecordKind::ActiveProfile),
        };
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;
    use time::Duration;

    use super::*;
    use crate::clock::ManualTimeProvider;
    use crate::storage::MemoryStorage;

    fn store() -> (ProfileStore, Arc<ManualTimeProvider>, Arc<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::new());
        let clock = Arc::new(ManualTimeProvider::new(datetime!(2024-05-01 12:00 UTC)));
        let store = ProfileStore::load(storage.clone(), clock.clone());
        (store, clock, storage)
    }

    #[test]
    fn test_save_keys_by_lowercase_email() {
        let (mut store, _, _) = store();

        let id = store.save(Profile::with_email("Ada@Example.com")).unwrap();

        assert_eq!(id, "ada@example.com");
        assert_eq!(store.get("ADA@example.com").map(|p| p.id.as_str()), Some("ada@example.com"));
        assert_eq!(store.active_id(), Some("ada@example.com"));
    }

    #[test]
    fn test_save_preserves_created_at() {
        let (mut store, clock, _) = store();
        store.save(Profile::with_email("ada@example.com")).unwrap();

        clock.advance(Duration::minutes(5));
        let mut update = Profile::with_email("ada@example.com");
        update.display_name = Some("Ada".to_string());
        store.save(update).unwrap();

        let saved = store.get("ada@example.com").unwrap();
        assert_eq!(saved.created_at, Some(datetime!(2024-05-01 12:00 UTC)));
        assert_eq!(saved.updated_at, Some(datetime!(2024-05-01 12:05 UTC)));
        assert_eq!(saved.display_name.as_deref(), Some("Ada"));
    }

    #[test]
    fn test_missing_email_is_rejected() {
        let (mut store, _, storage) = store();

        let result = store.save(Profile::with_email("  "));

        assert!(matches!(result, Err(ProfileError::MissingEmail)));
        assert!(store.all().is_empty());
        assert!(storage.is_empty());
    }

    #[test]
    fn test_remove_moves_active_pointer() {
        let (mut store, _, _) = store();
        store.save(Profile::with_email("carol@example.com")).unwrap();
        store.save(Profile::with_email("bob@example.com")).unwrap();
        store.save(Profile::with_email("alice@example.com")).unwrap();

        assert_eq!(store.active_id(), Some("carol@example.com"));
        assert!(store.remove("carol@example.com"));
        assert_eq!(store.active_id(), Some("alice@example.com"));

        store.remove("alice@example.com");
        store.remove("bob@example.com");
        assert_eq!(store.active_id(), None);
        assert!(!store.remove("bob@example.com"));
    }

    #[test]
    fn test_set_active_unknown() {
        let (mut store, _, _) = store();

        let result = store.set_active(Some("nobody@example.com"));

        assert!(matches!(result, Err(ProfileError::ProfileNotFound(_))));
        store.set_active(None).unwrap();
    }

    #[test]
    fn test_export_import_roundtrip() {
        let (mut store, _, _) = store();
        store.save(Profile::with_email("ada@example.com")).unwrap();
        store.save(Profile::with_email("bob@example.com")).unwrap();
        let exported = store.export_all().unwrap();

        let (mut other, _, _) = self::store();
        assert_eq!(other.import_all(&exported).unwrap(), 2);

        assert_eq!(other.all(), store.all());
    }

    #[test]
    fn test_invalid_import_leaves_state() {
        let (mut store, _, _) = store();
        store.save(Profile::with_email("ada@example.com")).unwrap();
        let before = store.all().clone();

        for payload in ["not json", "[1, 2]", r#"{"x": {"phone": "123"}}"#] {
            let result = store.import_all(payload);
            assert!(matches!(result, Err(ProfileError::InvalidImport(_))), "{payload}");
        }

        assert_eq!(store.all(), &before);
        assert_eq!(store.active_id(), Some("ada@example.com"));
    }

    #[test]
    fn test_import_rejects_case_duplicates() {
        let (mut store, _, _) = store();
        store.save(Profile::with_email("ada@example.com")).unwrap();
        let before = store.all().clone();

        let result = store.import_all(
            r#"{"a": {"email": "Bob@example.com"}, "b": {"email": "bob@EXAMPLE.com"}}"#,
        );

        assert!(matches!(result, Err(ProfileError::InvalidImport(_))));
        assert_eq!(store.all(), &before);
    }

    #[test]
    fn test_import_clears_dangling_active() {
        let (mut store, _, storage) = store();
        store.save(Profile::with_email("ada@example.com")).unwrap();

        store
            .import_all(r#"{"bob@example.com": {"email": "Bob@example.com"}}"#)
            .unwrap();

        assert_eq!(store.active_id(), None);
        assert!(store.get("bob@example.com").is_some());

        let clock = Arc::new(ManualTimeProvider::new(datetime!(2024-05-01 12:00 UTC)));
        let reloaded = ProfileStore::load(storage, clock);
        assert_eq!(reloaded.active_id(), None);
        assert_eq!(reloaded.all().len(), 1);
    }
}
