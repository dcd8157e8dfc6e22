use std::time::Duration;

use crate::error::{SimError, SimResult};

/// Delay between two ticks of the run loop.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(300);

/// Input for one simulated run; immutable once the run has started.
///
/// # Fields
/// - `dataset_id`   : selects the accuracy ceiling; unknown ids are allowed
/// - `total_epochs` : number of samples the run emits
/// - `learning_rate`: validated and reported, but the curves ignore it
/// - `tick_interval`: wait before each tick; zero ticks back to back
/// - `seed`         : when set, the run draws from a seeded RNG and is
///                     reproducible
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingRunConfig {
    pub dataset_id: String,
    pub total_epochs: usize,
    pub learning_rate: f64,
    pub tick_interval: Duration,
    pub seed: Option<u64>,
}

impl TrainingRunConfig {
    /// Creates a config with the default cadence and no seed.
    pub fn new(dataset_id: impl Into<String>, total_epochs: usize, learning_rate: f64) -> Self {
        TrainingRunConfig {
            dataset_id: dataset_id.into(),
            total_epochs,
            learning_rate,
            tick_interval: DEFAULT_TICK_INTERVAL,
            seed: None,
        }
    }

    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> SimResult<()> {
        if self.total_epochs == 0 {
            return Err(SimError::invalid("total_epochs must be at least 1"));
        }
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(SimError::invalid(format!(
                "learning_rate must be > 0, got {}",
                self.learning_rate
            )));
        }
        Ok(())
    }
}
