use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, StandardUniform};
use safewatch_api::models::{DoorReading, Readings};
use safewatch_core::monitor::ReadingSource;

/// Lowest simulated temperature for both sensors.
const TEMPERATURE_FLOOR: f64 = 10.0;
/// Chance per tick that the doors are touched at all.
const DOOR_EVENT_PROBABILITY: f64 = 0.08;
/// Chance that a door event actually toggles the first door.
const DOOR_TOGGLE_PROBABILITY: f64 = 0.25;
const MAX_MOTION_EVENTS: f64 = 8.0;

pub fn default_doors() -> Vec<DoorReading> {
    vec![
        DoorReading::closed("d1", "Main Gate"),
        DoorReading::closed("d2", "Garage"),
    ]
}

/// Synthetic readings drifting around plausible values.
pub struct RandomWalkSource<R = StdRng> {
    rng: R,
    readings: Readings,
}

impl RandomWalkSource<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_os_rng() -> Self {
        Self::new(StdRng::from_os_rng())
    }
}

impl<R: Rng> RandomWalkSource<R> {
    pub fn new(mut rng: R) -> Self {
        let mut unit = || -> f64 { StandardUniform.sample(&mut rng) };

        let readings = Readings {
            temperature: 36.0 + unit() * 6.0,
            inverter_temperature: 40.0 + unit() * 6.0,
            smoke: unit() * 0.2,
            motion_count: 0,
            doors: default_doors(),
        };

        Self { rng, readings }
    }

    pub fn current(&self) -> &Readings {
        &self.readings
    }

    fn unit(&mut self) -> f64 {
        StandardUniform.sample(&mut self.rng)
    }

    fn step(&mut self) {
        let temperature = self.readings.temperature + (self.unit() - 0.45) * 0.8;
        self.readings.temperature = round2(temperature).max(TEMPERATURE_FLOOR);

        let inverter = self.readings.inverter_temperature + (self.unit() - 0.4) * 0.9;
        self.readings.inverter_temperature = round2(inverter).max(TEMPERATURE_FLOOR);

        let smoke = self.unit() * 0.2 + self.unit() * 0.05;
        self.readings.smoke = round2(smoke).max(0.0);

        self.readings.motion_count = (self.unit() * MAX_MOTION_EVENTS).round() as u32;

        if self.unit() < DOOR_EVENT_PROBABILITY && self.unit() < DOOR_TOGGLE_PROBABILITY {
            if let Some(door) = self.readings.doors.first_mut() {
                door.open = !door.open;
                tracing::debug!(door = %door.label, open = door.open, "door toggled");
            }
        }
    }
}

impl<R: Rng> ReadingSource for RandomWalkSource<R> {
    fn next(&mut self) -> Readings {
        self.step();
        self.readings.clone()
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
