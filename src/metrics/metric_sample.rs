use serde::{Serialize, Deserialize};

/// One epoch's worth of simulated training metrics.
///
/// The run loop emits one `MetricSample` per tick through its `on_sample`
/// callback. Receivers (e.g. the studio SSE handler) use it to drive live
/// charts and progress indicators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSample {
    /// 1-based epoch number.
    pub epoch: usize,
    /// Total epochs requested for this run.
    pub total_epochs: usize,
    /// Training accuracy in [0, ceiling].
    pub accuracy: f64,
    /// Training loss; never below 0.01.
    pub loss: f64,
    /// Validation accuracy. Only set every fifth epoch and on the final one;
    /// `None` means "not measured", never zero.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub val_accuracy: Option<f64>,
    /// Validation loss, present exactly when `val_accuracy` is.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub val_loss: Option<f64>,
}

impl MetricSample {
    /// True when this epoch carries validation metrics.
    pub fn has_validation(&self) -> bool {
        self.val_accuracy.is_some() && self.val_loss.is_some()
    }

    /// Fraction of the run completed once this sample is emitted, in (0, 1].
    pub fn progress(&self) -> f64 {
        self.epoch as f64 / self.total_epochs as f64
    }
}
