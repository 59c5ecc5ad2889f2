use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use safewatch_api::models::{DEFAULT_PLAN_ID, Profile, ThresholdField, Thresholds};
use safewatch_core::errors::{ExportError, ProfileError, RegistryError, ThresholdError};
use safewatch_core::monitor::{Monitor, TickReport};
use safewatch_core::profiles::ProfileStore;
use time::format_description::well_known::Rfc3339;

use crate::autosave::Debouncer;
use crate::command::{Command, HELP};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("{0}")]
    Registry(#[from] RegistryError),

    #[error("{0}")]
    Profile(#[from] ProfileError),

    #[error("{0}")]
    Threshold(#[from] ThresholdError),

    #[error("{0}")]
    Export(#[from] ExportError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: ThresholdField, value: String },
}

#[derive(Debug, PartialEq)]
pub enum Flow {
    Continue(String),
    Quit,
}

/// Interactive state around one monitor.
pub struct Session {
    monitor: Monitor,
    profiles: ProfileStore,
    draft: Thresholds,
    autosave: Debouncer<Thresholds>,
}

impl Session {
    pub fn new(monitor: Monitor, profiles: ProfileStore, autosave: Debouncer<Thresholds>) -> Self {
        let draft = monitor.thresholds().clone();

        Self {
            monitor,
            profiles,
            draft,
            autosave,
        }
    }

    pub fn monitor(&self) -> &Monitor {
        &self.monitor
    }

    pub fn profiles(&self) -> &ProfileStore {
        &self.profiles
    }

    pub fn draft(&self) -> &Thresholds {
        &self.draft
    }

    pub fn tick(&mut self) -> TickReport {
        let report = self.monitor.tick();

        for alert in &report.alerts {
            tracing::warn!(id = %alert.id, severity = %alert.severity, "{}", alert.message);
        }

        report
    }

    /// Store a threshold draft once the debounce delay has elapsed.
    pub fn commit_thresholds(&mut self, thresholds: Thresholds) {
        match self.monitor.threshold_store_mut().replace(thresholds) {
            Ok(()) => tracing::info!("thresholds saved"),
            Err(e) => tracing::error!("thresholds not saved: {}", e),
        }
    }

    pub fn shutdown(&mut self) {
        self.autosave.cancel();
    }

    pub fn execute(&mut self, command: Command) -> Result<Flow, SessionError> {
        let output = match command {
            Command::Help => HELP.to_string(),
            Command::Status => self.status(),
            Command::Alerts => self.alerts(),
            Command::Acknowledge(id) => {
                if self.monitor.journal_mut().acknowledge(&id) {
                    format!("acknowledged {id}")
                } else {
                    format!("no alert {id}")
                }
            }
            Command::Clear => {
                self.monitor.journal_mut().clear();
                "journal cleared".to_string()
            }
            Command::Export(path) => {
                let text = self.monitor.journal().export_as_text()?;
                match path {
                    Some(path) => {
                        fs::write(&path, text)?;
                        format!("journal written to {}", path.display())
                    }
                    None => text,
                }
            }
            Command::SetThreshold(field, value) => {
                apply(&mut self.draft, field, &value)?;
                self.autosave.schedule(self.draft.clone());
                format!("{field} = {value}")
            }
            Command::ResetThreshold(field) => {
                self.autosave.cancel();
                let store = self.monitor.threshold_store_mut();
                match field {
                    Some(field) => store.reset(field),
                    None => store.reset_all(),
                }
                self.draft = store.get().clone();
                "thresholds reset".to_string()
            }
            Command::Sensors => self.sensors(),
            Command::AddSensor { kind, position, label } => {
                let plan = self.monitor.registry().active_plan_id().to_string();
                let id = self.monitor.registry_mut().add_sensor(&plan, kind, &label, position)?;
                format!("added {id}")
            }
            Command::RenameSensor(id, label) => {
                let plan = self.plan_of(&id)?;
                self.monitor.registry_mut().rename_sensor(&plan, &id, &label)?;
                format!("renamed {id}")
            }
            Command::ToggleSensor(id) => {
                let plan = self.plan_of(&id)?;
                let enabled = self.monitor.registry_mut().toggle_enabled(&plan, &id)?;
                format!("{id} {}", if enabled { "enabled" } else { "disabled" })
            }
            Command::RemoveSensor { id, confirmed } => {
                let plan = self.plan_of(&id)?;
                match self.monitor.registry_mut().remove_sensor(&plan, &id, |_| confirmed)? {
                    Some(sensor) => format!("removed {} ({})", sensor.label, sensor.id),
                    None => format!("type `remove {id} yes` to remove it"),
                }
            }
            Command::Trigger(id) => {
                let plan = self.plan_of(&id)?;
                let alert = self.monitor.trigger_sensor_alarm(&plan, &id)?;
                alert.message
            }
            Command::Plans => self.plans(),
            Command::UsePlan(id) => {
                self.monitor.registry_mut().set_active_plan(&id)?;
                format!("active plan {id}")
            }
            Command::AddPlan(path) => {
                let bytes = fs::read(&path)?;
                let file_name = path
                    .file_name()
                    .map(|name| name.to_string_lossy().to_string())
                    .unwrap_or_else(|| path.display().to_string());
                let id = self
                    .monitor
                    .registry_mut()
                    .add_plan_from_image(&file_name, media_type(&path), &bytes);
                format!("added plan {id}")
            }
            Command::RemovePlan(id) => {
                let plan = self.monitor.registry_mut().remove_plan(&id)?;
                format!("removed plan {}", plan.label)
            }
            Command::Profiles => self.profile_list(),
            Command::SaveProfile { email, display_name } => {
                let mut profile = self.profiles.get(&email).cloned().unwrap_or_default();
                profile.email = email;
                if display_name.is_some() {
                    profile.display_name = display_name;
                }
                let id = self.profiles.save(profile)?;
                format!("saved {id}")
            }
            Command::UseProfile(id) => {
                self.profiles.set_active(id.as_deref())?;
                match id {
                    Some(id) => format!("active profile {id}"),
                    None => "no active profile".to_string(),
                }
            }
            Command::RemoveProfile(id) => {
                if self.profiles.remove(&id) {
                    format!("removed {id}")
                } else {
                    format!("no profile {id}")
                }
            }
            Command::ExportProfiles(path) => {
                fs::write(&path, self.profiles.export_all()?)?;
                format!("profiles written to {}", path.display())
            }
            Command::ImportProfiles(path) => {
                let json = fs::read_to_string(&path)?;
                let count = self.profiles.import_all(&json)?;
                format!("imported {count} profiles")
            }
            Command::Quit => return Ok(Flow::Quit),
        };

        Ok(Flow::Continue(output))
    }

    fn plan_of(&self, sensor_id: &str) -> Result<String, SessionError> {
        let registry = self.monitor.registry();

        if registry.find_sensor(registry.active_plan_id(), sensor_id).is_some() {
            return Ok(registry.active_plan_id().to_string());
        }

        registry
            .locate(sensor_id)
            .map(|(plan, _)| plan.to_string())
            .ok_or_else(|| RegistryError::SensorNotFound(sensor_id.to_string()).into())
    }

    fn status(&self) -> String {
        let readings = self.monitor.current();
        let assessment = self.monitor.assessment();
        let mut out = String::new();

        let _ = writeln!(out, "temperature   {:>7.2}°C  {}", readings.temperature, assessment.temperature);
        let _ = writeln!(
            out,
            "inverter      {:>7.2}°C  {}",
            readings.inverter_temperature, assessment.inverter_temperature
        );
        let _ = writeln!(out, "smoke         {:>7.0}%   {}", readings.smoke * 100.0, assessment.smoke);
        let _ = writeln!(out, "motion        {:>7}    {}", readings.motion_count, assessment.motion);
        let _ = writeln!(out, "doors open    {:>7}    {}", readings.open_doors(), assessment.doors);
        if let Some((min, max)) = self.monitor.history().range() {
            let _ = writeln!(out, "trend         {min:.2}..{max:.2}°C over {} samples", self.monitor.history().len());
        }
        let _ = write!(
            out,
            "overall {}, {} active alerts",
            assessment.overall(),
            self.monitor.journal().active_count()
        );

        out
    }

    fn alerts(&self) -> String {
        let journal = self.monitor.journal();
        if journal.is_empty() {
            return "no alerts".to_string();
        }

        journal
            .entries()
            .iter()
            .map(|alert| {
                let timestamp = alert.timestamp.format(&Rfc3339).unwrap_or_default();
                let mark = if alert.acknowledged { ' ' } else { '*' };
                format!("{mark} {} {timestamp} {:<8} {}", alert.id, alert.severity, alert.message)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn sensors(&self) -> String {
        let plan = self.monitor.registry().active_plan_id();
        let statuses = self.monitor.sensor_statuses(plan);
        if statuses.is_empty() {
            return format!("no sensors on {plan}");
        }

        statuses
            .iter()
            .map(|(sensor, status)| {
                format!(
                    "{:<12} {:<16} {:<11} ({:.0}, {:.0}) {}",
                    sensor.id, sensor.label, sensor.kind, sensor.position.x, sensor.position.y, status
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn plans(&self) -> String {
        let registry = self.monitor.registry();

        registry
            .plans()
            .iter()
            .map(|plan| {
                let mark = if plan.id == registry.active_plan_id() { '*' } else { ' ' };
                let fixed = if plan.id == DEFAULT_PLAN_ID { " (fixed)" } else { "" };
                format!(
                    "{mark} {} {}{fixed}, {} sensors",
                    plan.id,
                    plan.label,
                    registry.sensors(&plan.id).len()
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn profile_list(&self) -> String {
        if self.profiles.all().is_empty() {
            return "no profiles".to_string();
        }

        self.profiles
            .all()
            .values()
            .map(|profile: &Profile| {
                let mark = if self.profiles.active_id() == Some(profile.id.as_str()) { '*' } else { ' ' };
                format!("{mark} {} {}", profile.id, profile.display_name.as_deref().unwrap_or("-"))
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn apply(thresholds: &mut Thresholds, field: ThresholdField, raw: &str) -> Result<(), SessionError> {
    let invalid = || SessionError::InvalidValue {
        field,
        value: raw.to_string(),
    };

    if field == ThresholdField::DoorOpenAlerts {
        thresholds.door_open_alerts = match raw.to_ascii_lowercase().as_str() {
            "on" | "true" | "yes" | "1" => true,
            "off" | "false" | "no" | "0" => false,
            _ => return Err(invalid()),
        };
        return Ok(());
    }

    let value = raw.parse::<f64>().ok().filter(|v| v.is_finite()).ok_or_else(invalid)?;
    match field {
        ThresholdField::Temperature => thresholds.temperature = value,
        ThresholdField::InverterTemperature => thresholds.inverter_temperature = value,
        ThresholdField::Smoke => thresholds.smoke = value,
        ThresholdField::MotionCount => thresholds.motion_count = value,
        ThresholdField::DoorOpenAlerts => {}
    }

    Ok(())
}

fn media_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}
