use serde::Serialize;

use crate::error::{SimError, SimResult};
use crate::metrics::metric_sample::MetricSample;
use crate::metrics::sampler::{expected_curve, BASE_ACCURACY};

/// Loss plotted at epoch 0, before any sample arrives.
pub const BASELINE_LOSS: f64 = 1.0;

/// One point on the training chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub epoch: usize,
    pub accuracy: f64,
    pub loss: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub val_accuracy: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub val_loss: Option<f64>,
}

impl From<&MetricSample> for ChartPoint {
    fn from(s: &MetricSample) -> Self {
        ChartPoint {
            epoch: s.epoch,
            accuracy: s.accuracy,
            loss: s.loss,
            val_accuracy: s.val_accuracy,
            val_loss: s.val_loss,
        }
    }
}

/// Samples of the current run, in epoch order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TrainingHistory {
    total_epochs: usize,
    samples: Vec<MetricSample>,
}

impl TrainingHistory {
    pub fn new(total_epochs: usize) -> Self {
        TrainingHistory { total_epochs, samples: Vec::new() }
    }

    /// Clears all samples for a new run of `total_epochs`.
    pub fn reset(&mut self, total_epochs: usize) {
        self.total_epochs = total_epochs;
        self.samples.clear();
    }

    /// Appends the next sample.
    ///
    /// # Errors
    /// `InvalidArgument` unless `sample.epoch` directly follows the last
    /// recorded epoch and `sample.total_epochs` matches this history.
    pub fn push(&mut self, sample: MetricSample) -> SimResult<()> {
        let expected = self.samples.len() + 1;
        if sample.epoch != expected {
            return Err(SimError::invalid(format!(
                "expected epoch {}, got {}",
                expected, sample.epoch
            )));
        }
        if sample.total_epochs != self.total_epochs {
            return Err(SimError::invalid(format!(
                "sample belongs to a {}-epoch run, history tracks {}",
                sample.total_epochs, self.total_epochs
            )));
        }
        self.samples.push(sample);
        Ok(())
    }

    pub fn samples(&self) -> &[MetricSample] {
        &self.samples
    }

    pub fn latest(&self) -> Option<&MetricSample> {
        self.samples.last()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn total_epochs(&self) -> usize {
        self.total_epochs
    }

    /// Share of epochs emitted so far, 0–100.
    pub fn progress_percent(&self) -> f64 {
        self.latest().map_or(0.0, |s| s.progress() * 100.0)
    }

    /// The series to plot: a fixed baseline at epoch 0 followed by every
    /// recorded sample.
    pub fn chart_points(&self) -> Vec<ChartPoint> {
        let baseline = ChartPoint {
            epoch: 0,
            accuracy: BASE_ACCURACY,
            loss: BASELINE_LOSS,
            val_accuracy: None,
            val_loss: None,
        };
        std::iter::once(baseline)
            .chain(self.samples.iter().map(ChartPoint::from))
            .collect()
    }

    /// Noise-free curve for `dataset_id` over the whole run, epoch 0
    /// included, to draw behind the live series. Empty for a 0-epoch history.
    pub fn reference_points(&self, dataset_id: &str) -> Vec<ChartPoint> {
        (0..=self.total_epochs)
            .filter_map(|epoch| {
                let (accuracy, loss) = expected_curve(epoch, self.total_epochs, dataset_id).ok()?;
                Some(ChartPoint { epoch, accuracy, loss, val_accuracy: None, val_loss: None })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(epoch: usize, total: usize) -> MetricSample {
        MetricSample {
            epoch,
            total_epochs: total,
            accuracy: 0.6,
            loss: 0.5,
            val_accuracy: None,
            val_loss: None,
        }
    }

    #[test]
    fn chart_starts_with_baseline() {
        let mut h = TrainingHistory::new(4);
        h.push(sample(1, 4)).unwrap();
        let pts = h.chart_points();
        assert_eq!(pts.len(), 2);
        assert_eq!(pts[0].epoch, 0);
        assert_eq!(pts[0].accuracy, 0.5);
        assert_eq!(pts[0].loss, 1.0);
        assert_eq!(pts[1].epoch, 1);
    }

    #[test]
    fn rejects_gaps_repeats_and_foreign_runs() {
        let mut h = TrainingHistory::new(4);
        h.push(sample(1, 4)).unwrap();
        assert!(h.push(sample(1, 4)).is_err());
        assert!(h.push(sample(3, 4)).is_err());
        assert!(h.push(sample(2, 9)).is_err());
        h.push(sample(2, 4)).unwrap();
        assert_eq!(h.len(), 2);
    }

    #[test]
    fn progress_and_reset() {
        let mut h = TrainingHistory::new(4);
        assert_eq!(h.progress_percent(), 0.0);
        h.push(sample(1, 4)).unwrap();
        assert_eq!(h.progress_percent(), 25.0);
        h.reset(10);
        assert!(h.is_empty());
        assert_eq!(h.total_epochs(), 10);
        assert!(h.latest().is_none());
    }

    #[test]
    fn reference_curve_spans_the_run() {
        let h = TrainingHistory::new(4);
        let pts = h.reference_points("iris");
        assert_eq!(pts.iter().map(|p| p.epoch).collect::<Vec<_>>(), vec![0, 1, 2, 3, 4]);
        assert!((pts[0].accuracy - 0.5).abs() < 1e-12);
        for w in pts.windows(2) {
            assert!(w[1].accuracy > w[0].accuracy);
            assert!(w[1].loss < w[0].loss);
        }
        assert!(pts[4].accuracy < 0.99);
        assert!(TrainingHistory::new(0).reference_points("iris").is_empty());
    }
}
