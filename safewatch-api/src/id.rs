use std::sync::atomic::{AtomicUsize, Ordering};

use uuid::Uuid;

pub trait IdGenerator: Send + Sync {
    /// Generate a new record identifier
    fn generate(&self) -> String;
}

#[derive(Clone, Default)]
pub struct RandomIdGenerator;

impl IdGenerator for RandomIdGenerator {
    fn generate(&self) -> String {
        Uuid::new_v4().simple().to_string()
    }
}

/// Deterministic identifiers of the form `<prefix>-<counter>`.
pub struct SequentialIdGenerator {
    prefix: String,
    counter: AtomicUsize,
}

impl SequentialIdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: AtomicUsize::new(0),
        }
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn generate(&self) -> String {
        let counter = self.counter.fetch_add(1, Ordering::SeqCst);
        format!("{}-{}", self.prefix, counter)
    }
}

impl Clone for SequentialIdGenerator {
    fn clone(&self) -> Self {
        Self {
            prefix: self.prefix.clone(),
            counter: AtomicUsize::new(self.counter.load(Ordering::SeqCst)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_ids_are_unique() {
        let generator = RandomIdGenerator;

        let id1 = generator.generate();
        let id2 = generator.generate();

        assert_ne!(id1, id2, "IDs should be unique");
        assert_eq!(id1.len(), 32);
    }

    #[test]
    fn test_sequential_counter_increases() {
        let generator = SequentialIdGenerator::new("alert");

        assert_eq!(generator.generate(), "alert-0");
        assert_eq!(generator.generate(), "alert-1");
    }

    #[test]
    fn test_clone_keeps_counter() {
        let generator = SequentialIdGenerator::new("s");
        generator.generate();

        let cloned = generator.clone();

        assert_eq!(cloned.generate(), "s-1");
        assert_eq!(generator.generate(), "s-1");
    }
}
