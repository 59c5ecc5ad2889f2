use std::error::Error;
use std::path::PathBuf;
use std::{env, io};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Logger {
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Storage {
    /// Directory holding one JSON file per record
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Simulation {
    pub tick_interval_ms: u64,
    /// Fixed seed for reproducible runs
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Autosave {
    pub debounce_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub logger: Logger,
    pub storage: Storage,
    pub simulation: Simulation,
    pub autosave: Autosave,
}

impl Settings {
    pub fn new() -> Result<Self, Box<dyn Error>> {
        Self::parse(include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/../",
            "configs/default.toml"
        )))
    }

    pub fn parse(raw: &str) -> Result<Self, Box<dyn Error>> {
        let mut settings: Settings = toml::from_str(raw)?;

        if settings.simulation.tick_interval_ms == 0 {
            return Err("simulation.tick_interval_ms must be positive".into());
        }

        settings.storage.path = Self::normalize_path(&settings.storage.path)?
            .to_string_lossy()
            .to_string();

        Ok(settings)
    }

    fn normalize_path(path: &str) -> io::Result<PathBuf> {
        let path_buf = PathBuf::from(path);

        Ok(if path_buf.is_absolute() {
            path_buf
        } else {
            env::current_dir()?.join(path_buf)
        })
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    #[test]
    fn test_embedded_defaults() {
        let settings = Settings::new().unwrap();

        assert_eq!(settings.simulation.tick_interval_ms, 2500);
        assert_eq!(settings.autosave.debounce_ms, 800);
        assert!(settings.simulation.seed.is_none());
        assert!(Path::new(&settings.storage.path).is_absolute());
    }

    #[test]
    fn test_seed_and_absolute_path() {
        let settings = Settings::parse(
            r#"
            [logger]
            level = "debug"

            [storage]
            path = "/var/lib/safewatch"

            [simulation]
            tick_interval_ms = 100
            seed = 7

            [autosave]
            debounce_ms = 50
            "#,
        )
        .unwrap();

        assert_eq!(settings.storage.path, "/var/lib/safewatch");
        assert_eq!(settings.simulation.seed, Some(7));
    }

    #[test]
    fn test_zero_interval_is_rejected() {
        let result = Settings::parse(
            r#"
            [logger]
            level = "info"
            [storage]
            path = "data"
            [simulation]
            tick_interval_ms = 0
            [autosave]
            debounce_ms = 800
            "#,
        );

        assert!(result.is_err());
    }
}
