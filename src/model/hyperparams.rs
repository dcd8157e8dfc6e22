use serde::{Serialize, Deserialize};

use crate::error::{SimError, SimResult};
use crate::model::activation::ActivationKind;
use crate::model::optimizer::OptimizerKind;
use crate::train::run_config::TrainingRunConfig;

/// Everything the parameter panel lets the user tune.
///
/// Only `epochs` and `learning_rate` reach the simulator (through
/// [`Hyperparams::run_config`]); the rest shape the architecture summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Hyperparams {
    pub learning_rate:     f64,
    pub epochs:            usize,
    pub batch_size:        usize,
    pub optimizer:         OptimizerKind,
    pub hidden_layers:     usize,
    pub neurons_per_layer: usize,
    /// L2 penalty.
    pub regularization:    f64,
    pub activation:        ActivationKind,
}

impl Default for Hyperparams {
    fn default() -> Self {
        Hyperparams {
            learning_rate:     0.01,
            epochs:            20,
            batch_size:        32,
            optimizer:         OptimizerKind::Adam,
            hidden_layers:     3,
            neurons_per_layer: 64,
            regularization:    0.001,
            activation:        ActivationKind::Relu,
        }
    }
}

// Slider bounds from the parameter panel.
pub const LEARNING_RATE_RANGE: (f64, f64)     = (0.0001, 0.1);
pub const EPOCHS_RANGE: (usize, usize)        = (1, 100);
pub const BATCH_SIZE_RANGE: (usize, usize)    = (8, 256);
pub const HIDDEN_LAYERS_RANGE: (usize, usize) = (1, 10);
pub const NEURONS_RANGE: (usize, usize)       = (1, 128);
pub const REGULARIZATION_RANGE: (f64, f64)    = (0.0, 0.1);

impl Hyperparams {
    /// Checks every field against the panel's slider bounds.
    ///
    /// The error names the first offending field.
    pub fn validate(&self) -> SimResult<()> {
        check_f64("learning_rate", self.learning_rate, LEARNING_RATE_RANGE)?;
        check_usize("epochs", self.epochs, EPOCHS_RANGE)?;
        check_usize("batch_size", self.batch_size, BATCH_SIZE_RANGE)?;
        check_usize("hidden_layers", self.hidden_layers, HIDDEN_LAYERS_RANGE)?;
        check_usize("neurons_per_layer", self.neurons_per_layer, NEURONS_RANGE)?;
        check_f64("regularization", self.regularization, REGULARIZATION_RANGE)?;
        Ok(())
    }

    /// Builds the simulator input for a run on `dataset_id`.
    pub fn run_config(&self, dataset_id: impl Into<String>) -> TrainingRunConfig {
        TrainingRunConfig::new(dataset_id, self.epochs, self.learning_rate)
    }
}

fn check_f64(field: &str, value: f64, (lo, hi): (f64, f64)) -> SimResult<()> {
    if value.is_finite() && value >= lo && value <= hi {
        Ok(())
    } else {
        Err(SimError::invalid(format!("{} must be in [{}, {}], got {}", field, lo, hi, value)))
    }
}

fn check_usize(field: &str, value: usize, (lo, hi): (usize, usize)) -> SimResult<()> {
    if (lo..=hi).contains(&value) {
        Ok(())
    } else {
        Err(SimError::invalid(format!("{} must be in [{}, {}], got {}", field, lo, hi, value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        Hyperparams::default().validate().unwrap();
    }

    #[test]
    fn out_of_range_field_is_named() {
        let hp = Hyperparams { batch_size: 4, ..Hyperparams::default() };
        let err = hp.validate().unwrap_err().to_string();
        assert!(err.contains("batch_size"), "{}", err);

        let hp = Hyperparams { learning_rate: 0.5, ..Hyperparams::default() };
        assert!(hp.validate().unwrap_err().to_string().contains("learning_rate"));

        let hp = Hyperparams { epochs: 0, ..Hyperparams::default() };
        assert!(hp.validate().is_err());
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let hp: Hyperparams = toml::from_str("epochs = 50\noptimizer = \"sgd\"").unwrap();
        assert_eq!(hp.epochs, 50);
        assert_eq!(hp.optimizer, OptimizerKind::Sgd);
        assert_eq!(hp.batch_size, 32);
    }

    #[test]
    fn run_config_carries_epochs_and_learning_rate() {
        let cfg = Hyperparams::default().run_config("iris");
        assert_eq!(cfg.dataset_id, "iris");
        assert_eq!(cfg.total_epochs, 20);
        assert_eq!(cfg.learning_rate, 0.01);
    }
}
