use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use safewatch_api::id::{IdGenerator, RandomIdGenerator};
use safewatch_core::clock::{SystemTimeProvider, TimeProvider};
use safewatch_core::journal::Journal;
use safewatch_core::monitor::{Monitor, ReadingSource};
use safewatch_core::profiles::ProfileStore;
use safewatch_core::registry::SensorRegistry;
use safewatch_core::storage::{FileStorage, Storage};
use safewatch_core::thresholds::ThresholdStore;
use tokio::sync::mpsc;
use tokio::{signal, time};

use crate::autosave::Debouncer;
use crate::command::CommandHandler;
use crate::session::{Flow, Session};
use crate::settings::Settings;
use crate::simulate::RandomWalkSource;

pub mod autosave;
pub mod command;
pub mod session;
pub mod settings;
pub mod simulate;

pub async fn run(settings: &Arc<Settings>) -> Result<(), Box<dyn Error>> {
    let storage: Arc<dyn Storage> = Arc::new(FileStorage::new(&settings.storage.path)?);
    let ids: Arc<dyn IdGenerator> = Arc::new(RandomIdGenerator);
    let clock: Arc<dyn TimeProvider> = Arc::new(SystemTimeProvider);

    let source: Box<dyn ReadingSource> = match settings.simulation.seed {
        Some(seed) => Box::new(RandomWalkSource::seeded(seed)),
        None => Box::new(RandomWalkSource::from_os_rng()),
    };

    let monitor = Monitor::new(
        source,
        ThresholdStore::load(storage.clone()),
        Journal::load(storage.clone()),
        SensorRegistry::load(storage.clone(), ids.clone()),
        ids,
        clock.clone(),
    );

    let (save_tx, mut save_rx) = mpsc::channel(8);
    let autosave = Debouncer::new(Duration::from_millis(settings.autosave.debounce_ms), save_tx);
    let mut session = Session::new(monitor, ProfileStore::load(storage, clock), autosave);

    let mut command_handler = CommandHandler::new();
    command_handler.start_stdin_processor();

    tracing::info!("monitoring, data in {}, type `help` for commands", settings.storage.path);

    let mut interval = time::interval(Duration::from_millis(settings.simulation.tick_interval_ms));
    loop {
        tokio::select! {
            _ = interval.tick() => {
                session.tick();
            },
            Some(command) = command_handler.cmd_rx.recv() => {
                match session.execute(command) {
                    Ok(Flow::Continue(output)) => println!("{output}"),
                    Ok(Flow::Quit) => break,
                    Err(e) => println!("error: {e}"),
                }
            },
            Some(thresholds) = save_rx.recv() => {
                session.commit_thresholds(thresholds);
            },
            _ = signal::ctrl_c() => {
                tracing::info!("interrupted");
                break;
            }
        }
    }

    session.shutdown();

    Ok(())
}
