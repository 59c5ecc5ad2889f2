use std::sync::Mutex;

use time::{Duration, OffsetDateTime};

pub trait TimeProvider: Send + Sync {
    fn now(&self) -> OffsetDateTime;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeProvider;

impl TimeProvider for SystemTimeProvider {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualTimeProvider {
    current: Mutex<OffsetDateTime>,
}

impl ManualTimeProvider {
    pub fn new(start: OffsetDateTime) -> Self {
        Self {
            current: Mutex::new(start),
        }
    }

    pub fn advance(&self, by: Duration) {
        if let Ok(mut current) = self.current.lock() {
            *current += by;
        }
    }
}

impl TimeProvider for ManualTimeProvider {
    fn now(&self) -> OffsetDateTime {
        self.current
            .lock()
            .map(|current| *current)
            .unwrap_or_else(|poisoned| *poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    #[test]
    fn test_manual_clock_advances() {
        let clock = ManualTimeProvider::new(datetime!(2024-05-01 12:00 UTC));

        clock.advance(Duration::seconds(90));

        assert_eq!(clock.now(), datetime!(2024-05-01 12:01:30 UTC));
    }
}
