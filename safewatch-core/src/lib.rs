pub mod clock;
pub mod errors;
pub mod evaluator;
pub mod history;
pub mod journal;
pub mod monitor;
pub mod profiles;
pub mod registry;
pub mod storage;
pub mod thresholds;
