use std::collections::BTreeMap;
use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use safewatch_api::id::IdGenerator;
use safewatch_api::models::{Plan, Position, Sensor, SensorKind, DEFAULT_PLAN_ID};

use crate::errors::RegistryError;
use crate::storage::{record, RecordKind, Storage};

/// Sensors placed on the default plan before anything was persisted.
pub fn default_sensors() -> Vec<Sensor> {
    vec![
        Sensor::new("s-solar", "Solar Array", SensorKind::Temperature, Position::new(20.0, 20.0)),
        Sensor::new("s-inv", "Inverter", SensorKind::Temperature, Position::new(70.0, 26.0)),
        Sensor::new("s-gate", "Main Gate", SensorKind::Door, Position::new(50.0, 84.0)),
        Sensor::new("s-smoke-1", "Living Room", SensorKind::Smoke, Position::new(34.0, 48.0)),
    ]
}

/// Plans and the sensors placed on each of them.
pub struct SensorRegistry {
    storage: Arc<dyn Storage>,
    ids: Arc<dyn IdGenerator>,
    plans: Vec<Plan>,
    sensors: BTreeMap<String, Vec<Sensor>>,
    active_plan: String,
}

impl SensorRegistry {
    pub fn load(storage: Arc<dyn Storage>, ids: Arc<dyn IdGenerator>) -> Self {
        let plans = record::load::<Vec<Plan>>(storage.as_ref(), RecordKind::Plans)
            .unwrap_or_else(|| vec![Plan::default_plan()]);
        let sensors = record::load::<BTreeMap<String, Vec<Sensor>>>(storage.as_ref(), RecordKind::Sensors)
            .unwrap_or_else(|| BTreeMap::from([(DEFAULT_PLAN_ID.to_string(), default_sensors())]));

        Self::new(storage, ids, plans, sensors)
    }

    /// Build a registry, repairing a missing default plan and orphaned sensors.
    pub fn new(
        storage: Arc<dyn Storage>,
        ids: Arc<dyn IdGenerator>,
        mut plans: Vec<Plan>,
        mut sensors: BTreeMap<String, Vec<Sensor>>,
    ) -> Self {
        let mut repaired = false;

        if !plans.iter().any(Plan::is_default) {
            tracing::warn!("default plan missing, restoring it");
            plans.push(Plan::default_plan());
            repaired = true;
        }

        sensors.retain(|plan_id, list| {
            let known = plans.iter().any(|plan| &plan.id == plan_id);
            if !known {
                tracing::warn!(plan = %plan_id, count = list.len(), "dropping sensors of unknown plan");
                repaired = true;
            }
            known
        });

        let active_plan = plans
            .first()
            .map(|plan| plan.id.clone())
            .unwrap_or_else(|| DEFAULT_PLAN_ID.to_string());

        let registry = Self {
            storage,
            ids,
            plans,
            sensors,
            active_plan,
        };

        if repaired {
            registry.flush_plans();
            registry.flush_sensors();
        }

        registry
    }

    pub fn plans(&self) -> &[Plan] {
        &self.plans
    }

    pub fn plan(&self, id: &str) -> Option<&Plan> {
        self.plans.iter().find(|plan| plan.id == id)
    }

    pub fn active_plan_id(&self) -> &str {
        &self.active_plan
    }

    pub fn active_plan(&self) -> Option<&Plan> {
        self.plan(&self.active_plan)
    }

    pub fn set_active_plan(&mut self, id: &str) -> Result<(), RegistryError> {
        self.ensure_plan(id)?;
        self.active_plan = id.to_string();
        Ok(())
    }

    /// Sensors of a plan, newest first. Unknown plans have none.
    pub fn sensors(&self, plan_id: &str) -> &[Sensor] {
        self.sensors.get(plan_id).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn find_sensor(&self, plan_id: &str, sensor_id: &str) -> Option<&Sensor> {
        self.sensors(plan_id).iter().find(|sensor| sensor.id == sensor_id)
    }

    /// Find a sensor on any plan, returning the owning plan id.
    pub fn locate(&self, sensor_id: &str) -> Option<(&str, &Sensor)> {
        self.sensors.iter().find_map(|(plan_id, list)| {
            list.iter()
                .find(|sensor| sensor.id == sensor_id)
                .map(|sensor| (plan_id.as_str(), sensor))
        })
    }

    /// Place a sensor. A blank label becomes `Sensor N`.
    pub fn add_sensor(
        &mut self,
        plan_id: &str,
        kind: SensorKind,
        label: &str,
        position: Position,
    ) -> Result<String, RegistryError> {
        self.ensure_plan(plan_id)?;

        let list = self.sensors.entry(plan_id.to_string()).or_default();
        let label = match label.trim() {
            "" => format!("Sensor {}", list.len() + 1),
            label => label.to_string(),
        };
        let id = self.ids.generate();

        tracing::debug!(plan = %plan_id, sensor = %id, %kind, "sensor placed");

        list.insert(0, Sensor::new(id.clone(), label, kind, position));
        self.flush_sensors();

        Ok(id)
    }

    pub fn rename_sensor(
        &mut self,
        plan_id: &str,
        sensor_id: &str,
        label: &str,
    ) -> Result<(), RegistryError> {
        let sensor = self.sensor_mut(plan_id, sensor_id)?;
        sensor.label = label.to_string();
        self.flush_sensors();
        Ok(())
    }

    /// Flip the enabled flag and return the new value.
    pub fn toggle_enabled(&mut self, plan_id: &str, sensor_id: &str) -> Result<bool, RegistryError> {
        let sensor = self.sensor_mut(plan_id, sensor_id)?;
        sensor.enabled = !sensor.enabled;
        let enabled = sensor.enabled;
        self.flush_sensors();
        Ok(enabled)
    }

    /// Remove a sensor once `confirm` approves it.
    ///
    /// Returns the removed sensor, or `None` when the removal was declined.
    pub fn remove_sensor<F>(
        &mut self,
        plan_id: &str,
        sensor_id: &str,
        confirm: F,
    ) -> Result<Option<Sensor>, RegistryError>
    where
        F: FnOnce(&Sensor) -> bool,
    {
        self.ensure_plan(plan_id)?;

        let list = self.sensors.entry(plan_id.to_string()).or_default();
        let index = list
            .iter()
            .position(|sensor| sensor.id == sensor_id)
            .ok_or_else(|| RegistryError::SensorNotFound(sensor_id.to_string()))?;

        if !confirm(&list[index]) {
            return Ok(None);
        }

        let removed = list.remove(index);
        self.flush_sensors();

        Ok(Some(removed))
    }

    /// Remove every sensor of a plan and return how many were removed.
    pub fn clear_plan(&mut self, plan_id: &str) -> Result<usize, RegistryError> {
        self.ensure_plan(plan_id)?;

        let removed = self.sensors.insert(plan_id.to_string(), Vec::new()).map_or(0, |list| list.len());
        self.flush_sensors();

        Ok(removed)
    }

    /// Add a plan in front of the others and make it active.
    pub fn add_plan(&mut self, label: &str, image: Option<String>) -> String {
        let plan = Plan {
            id: self.ids.generate(),
            label: label.to_string(),
            image,
        };
        let id = plan.id.clone();

        tracing::debug!(plan = %id, "plan added");

        self.plans.insert(0, plan);
        self.sensors.insert(id.clone(), Vec::new());
        self.active_plan = id.clone();
        self.flush_plans();
        self.flush_sensors();

        id
    }

    /// Add a plan whose background is an uploaded image, stored inline.
    pub fn add_plan_from_image(&mut self, file_name: &str, media_type: &str, bytes: &[u8]) -> String {
        let image = format!("data:{};base64,{}", media_type, STANDARD.encode(bytes));
        self.add_plan(file_name, Some(image))
    }

    pub fn remove_plan(&mut self, plan_id: &str) -> Result<Plan, RegistryError> {
        if plan_id == DEFAULT_PLAN_ID {
            return Err(RegistryError::DefaultPlanRemoval);
        }

        let index = self
            .plans
            .iter()
            .position(|plan| plan.id == plan_id)
            .ok_or_else(|| RegistryError::PlanNotFound(plan_id.to_string()))?;

        let removed = self.plans.remove(index);
        self.sensors.remove(plan_id);

        if self.active_plan == plan_id {
            self.active_plan = self
                .plans
                .first()
                .map(|plan| plan.id.clone())
                .unwrap_or_else(|| DEFAULT_PLAN_ID.to_string());
        }

        self.flush_plans();
        self.flush_sensors();

        Ok(removed)
    }

    fn ensure_plan(&self, plan_id: &str) -> Result<(), RegistryError> {
        match self.plan(plan_id) {
            Some(_) => Ok(()),
            None => Err(RegistryError::PlanNotFound(plan_id.to_string())),
        }
    }

    fn sensor_mut(&mut self, plan_id: &str, sensor_id: &str) -> Result<&mut Sensor, RegistryError> {
        self.ensure_plan(plan_id)?;

        self.sensors
            .get_mut(plan_id)
            .and_then(|list| list.iter_mut().find(|sensor| sensor.id == sensor_id))
            .ok_or_else(|| RegistryError::SensorNotFound(sensor_id.to_string()))
    }

    fn flush_plans(&self) {
        record::persist(self.storage.as_ref(), RecordKind::Plans, &self.plans);
    }

    fn flush_sensors(&self) {
        record::persist(self.storage.as_ref(), RecordKind::Sensors, &self.sensors);
    }
}
