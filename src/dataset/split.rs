use serde::Serialize;

use crate::dataset::catalog::sample_count;
use crate::error::{SimError, SimResult};

pub const DEFAULT_TRAIN_RATIO: f64 = 0.8;

/// Train / test row counts for a dataset at a given split ratio.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DatasetSplit {
    pub train_ratio: f64,
    pub total:       usize,
    pub training:    usize,
    pub testing:     usize,
}

impl DatasetSplit {
    /// Computes the split for `dataset_id`.
    ///
    /// `train_ratio` must lie strictly between 0 and 1. The training share is
    /// floored; the remainder goes to testing so the two always sum to `total`.
    pub fn new(dataset_id: &str, train_ratio: f64) -> SimResult<DatasetSplit> {
        if !train_ratio.is_finite() || train_ratio <= 0.0 || train_ratio >= 1.0 {
            return Err(SimError::invalid(format!(
                "train_ratio must be in (0, 1), got {}",
                train_ratio
            )));
        }
        let total = sample_count(dataset_id);
        let training = (total as f64 * train_ratio).floor() as usize;
        Ok(DatasetSplit {
            train_ratio,
            total,
            training,
            testing: total - training,
        })
    }

    /// Percentages as displayed next to the split slider, e.g. `(80, 20)`.
    pub fn percentages(&self) -> (u32, u32) {
        let train = (self.train_ratio * 100.0).round() as u32;
        (train, 100 - train)
    }
}
