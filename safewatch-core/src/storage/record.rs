//! Tagged, versioned envelope around every persisted value.
//!
//! A record is stored as `{"kind": ..., "version": N, "data": ...}`. Values
//! written by earlier dashboard releases carry no envelope and are treated as
//! version 0. Loading walks the migration table one version at a time until
//! the data reaches [`CURRENT_VERSION`], then deserializes it.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::Storage;
use crate::errors::{CoreError, RecordError};

pub const CURRENT_VERSION: u32 = 1;

type Migration = fn(RecordKind, Value) -> Result<Value, String>;

/// `MIGRATIONS[n]` upgrades data from version `n` to `n + 1`.
const MIGRATIONS: [Migration; CURRENT_VERSION as usize] = [migrate_v0_to_v1];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Profiles,
    ActiveProfile,
    Thresholds,
    Journal,
    Plans,
    Sensors,
}

impl RecordKind {
    /// Storage key, shared with the records the dashboard already wrote.
    pub fn key(&self) -> &'static str {
        match self {
            RecordKind::Profiles => "kscsirs_profiles_v1",
            RecordKind::ActiveProfile => "kscsirs_active_profile_v1",
            RecordKind::Thresholds => "safety_thresholds_v1",
            RecordKind::Journal => "safety_events_v1",
            RecordKind::Plans => "safety_plans_v1",
            RecordKind::Sensors => "safety_sensors_v1",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Profiles => "profiles",
            RecordKind::ActiveProfile => "active_profile",
            RecordKind::Thresholds => "thresholds",
            RecordKind::Journal => "journal",
            RecordKind::Plans => "plans",
            RecordKind::Sensors => "sensors",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Envelope<T> {
    kind: RecordKind,
    version: u32,
    data: T,
}

pub fn encode<T: Serialize>(kind: RecordKind, data: &T) -> Result<String, RecordError> {
    let envelope = Envelope {
        kind,
        version: CURRENT_VERSION,
        data,
    };

    Ok(serde_json::to_string(&envelope)?)
}

pub fn decode<T: DeserializeOwned>(kind: RecordKind, raw: &str) -> Result<T, RecordError> {
    let (version, data) = unwrap(kind, raw)?;
    let data = migrate(kind, version, data)?;

    Ok(serde_json::from_value(data)?)
}

/// Read and decode a record; anything unreadable is logged and treated as absent.
pub fn load<T: DeserializeOwned>(storage: &dyn Storage, kind: RecordKind) -> Option<T> {
    let raw = match storage.load(kind.key()) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!(record = %kind, "failed to read record: {}", e);
            return None;
        }
    };

    match decode(kind, &raw) {
        Ok(data) => Some(data),
        Err(e) => {
            tracing::warn!(record = %kind, "discarding unreadable record: {}", e);
            None
        }
    }
}

pub fn store<T: Serialize>(
    storage: &dyn Storage,
    kind: RecordKind,
    data: &T,
) -> Result<(), CoreError> {
    let raw = encode(kind, data)?;
    storage.save(kind.key(), &raw)?;

    tracing::debug!(record = %kind, bytes = raw.len(), "record stored");

    Ok(())
}

/// Store a record, logging instead of returning a failure.
///
/// In-memory state is authoritative; a failed write only loses durability.
pub fn persist<T: Serialize>(storage: &dyn Storage, kind: RecordKind, data: &T) -> bool {
    match store(storage, kind, data) {
        Ok(()) => true,
        Err(e) => {
            tracing::error!(record = %kind, "failed to persist record: {}", e);
            false
        }
    }
}

pub fn discard(storage: &dyn Storage, kind: RecordKind) -> bool {
    match storage.remove(kind.key()) {
        Ok(()) => true,
        Err(e) => {
            tracing::error!(record = %kind, "failed to remove record: {}", e);
            false
        }
    }
}

fn unwrap(kind: RecordKind, raw: &str) -> Result<(u32, Value), RecordError> {
    let value = match serde_json::from_str::<Value>(raw) {
        Ok(value) => value,
        // the dashboard wrote the active id as a bare string
        Err(_) if kind == RecordKind::ActiveProfile => {
            return Ok((0, Value::String(raw.to_string())));
        }
        Err(e) => return Err(e.into()),
    };

    if !is_envelope(&value) {
        return Ok((0, value));
    }

    let envelope: Envelope<Value> = serde_json::from_value(value)?;
    if envelope.kind != kind {
        return Err(RecordError::KindMismatch {
            expected: kind.to_string(),
            found: envelope.kind.to_string(),
        });
    }
    if envelope.version > CURRENT_VERSION {
        return Err(RecordError::UnsupportedVersion(envelope.version));
    }

    Ok((envelope.version, envelope.data))
}

fn is_envelope(value: &Value) -> bool {
    value.as_object().is_some_and(|map| {
        map.len() == 3
            && map.contains_key("kind")
            && map.get("version").is_some_and(Value::is_u64)
            && map.contains_key("data")
    })
}

fn migrate(kind: RecordKind, version: u32, mut data: Value) -> Result<Value, RecordError> {
    for from in version..CURRENT_VERSION {
        let migration = MIGRATIONS[from as usize];
        data = migration(kind, data).map_err(|reason| RecordError::Migration { from, reason })?;

        tracing::info!(record = %kind, "migrated record from version {} to {}", from, from + 1);
    }

    Ok(data)
}

fn migrate_v0_to_v1(kind: RecordKind, data: Value) -> Result<Value, String> {
    match kind {
        // profile fields are read through serde aliases, only the keys change
        RecordKind::Profiles => {
            let mut rekeyed = Map::new();
            for (key, entry) in into_object(data)? {
                let mut profile = into_object(entry)?;
                let email = profile
                    .get("email")
                    .and_then(Value::as_str)
                    .unwrap_or(key.as_str())
                    .trim()
                    .to_lowercase();
                if email.is_empty() {
                    return Err(format!("profile `{key}` has no email"));
                }

                profile.insert("id".to_string(), Value::from(email.clone()));
                if rekeyed.insert(email.clone(), Value::Object(profile)).is_some() {
                    tracing::warn!(profile = %email, "legacy profiles differ only by case, keeping the last one");
                }
            }
            Ok(Value::Object(rekeyed))
        }
        RecordKind::ActiveProfile => match data {
            Value::String(id) => Ok(Value::from(id.trim().to_lowercase())),
            other => Err(format!("expected a string, found {}", type_name(&other))),
        },
        RecordKind::Thresholds => {
            let mut map = into_object(data)?;
            rename_key(&mut map, "temp", "temperature");
            rename_key(&mut map, "inverterTemp", "inverter_temperature");
            rename_key(&mut map, "motionCount", "motion_count");
            rename_key(&mut map, "doorOpen", "door_open_alerts");
            Ok(Value::Object(map))
        }
        RecordKind::Journal => map_array(data, |mut entry| {
            rename_key(&mut entry, "time", "timestamp");
            entry
        }),
        RecordKind::Plans => map_array(data, |mut plan| {
            rename_key(&mut plan, "src", "image");
            plan
        }),
        RecordKind::Sensors => {
            // the oldest layout was a single list for the default plan
            let by_plan = match data {
                Value::Array(list) => {
                    let mut map = Map::new();
                    map.insert(safewatch_api::models::DEFAULT_PLAN_ID.to_string(), Value::Array(list));
                    map
                }
                other => into_object(other)?,
            };

            let mut migrated = Map::new();
            for (plan_id, sensors) in by_plan {
                migrated.insert(plan_id, map_array(sensors, upgrade_sensor_v0)?);
            }

            Ok(Value::Object(migrated))
        }
    }
}

fn upgrade_sensor_v0(mut sensor: Map<String, Value>) -> Map<String, Value> {
    if sensor.get("type").and_then(Value::as_str) == Some("temp") {
        sensor.insert("type".to_string(), Value::from("temperature"));
    }

    if let Some(disabled) = sensor.remove("disabled") {
        let enabled = !disabled.as_bool().unwrap_or(false);
        sensor.insert("enabled".to_string(), Value::Bool(enabled));
    }

    sensor
}

fn into_object(value: Value) -> Result<Map<String, Value>, String> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(format!("expected an object, found {}", type_name(&other))),
    }
}

fn map_array<F>(value: Value, f: F) -> Result<Value, String>
where
    F: Fn(Map<String, Value>) -> Map<String, Value>,
{
    let Value::Array(items) = value else {
        return Err(format!("expected an array, found {}", type_name(&value)));
    };

    items
        .into_iter()
        .map(|item| into_object(item).map(|map| Value::Object(f(map))))
        .collect::<Result<Vec<_>, _>>()
        .map(Value::Array)
}

fn rename_key(map: &mut Map<String, Value>, from: &str, to: &str) {
    if let Some(value) = map.remove(from) {
        map.entry(to.to_string()).or_insert(value);
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
