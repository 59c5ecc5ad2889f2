use std::collections::VecDeque;

use time::OffsetDateTime;

/// Number of temperature samples kept for the trend.
pub const TEMPERATURE_HISTORY_LEN: usize = 48;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub timestamp: OffsetDateTime,
    pub value: f64,
}

/// Fixed-capacity series, oldest first.
#[derive(Debug, Clone)]
pub struct History {
    capacity: usize,
    samples: VecDeque<Sample>,
}

impl History {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            samples: VecDeque::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, timestamp: OffsetDateTime, value: f64) {
        if self.capacity == 0 {
            return;
        }
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(Sample { timestamp, value });
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn latest(&self) -> Option<&Sample> {
        self.samples.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter()
    }

    /// Lowest and highest value in the window.
    pub fn range(&self) -> Option<(f64, f64)> {
        self.samples.iter().fold(None, |acc, sample| match acc {
            None => Some((sample.value, sample.value)),
            Some((min, max)) => Some((min.min(sample.value), max.max(sample.value))),
        })
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(TEMPERATURE_HISTORY_LEN)
    }
}
