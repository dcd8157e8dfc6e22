use rand::Rng;

use crate::dataset::catalog::ceiling_for;
use crate::error::{SimError, SimResult};
use crate::metrics::metric_sample::MetricSample;

/// Accuracy every curve starts from at progress 0.
pub const BASE_ACCURACY: f64 = 0.5;
/// How fast the curves saturate; `e^(-5)` is under 1% of the initial gap.
pub const CURVE_RATE: f64 = 5.0;
/// Asymptotic loss the decay curve settles on.
pub const LOSS_FLOOR_OFFSET: f64 = 0.1;
/// Hard lower bound on reported loss.
pub const MIN_LOSS: f64 = 0.01;

const ACCURACY_NOISE: f64 = 0.01;
const LOSS_NOISE: f64 = 0.02;
/// Validation metrics are reported on every `VALIDATION_EVERY`th epoch.
pub const VALIDATION_EVERY: usize = 5;

/// Produces the simulated metrics for `epoch` of a `total_epochs` run.
///
/// Accuracy follows an exponential saturation from 0.5 towards the dataset's
/// ceiling and loss an exponential decay towards 0.1, each with a small
/// uniform jitter drawn from `rng`. Accuracy is clamped to the ceiling (no
/// lower clamp); loss is floored at [`MIN_LOSS`].
///
/// Validation metrics are attached on every fifth epoch and on the last one.
///
/// # Errors
/// `InvalidArgument` when `total_epochs == 0` or `epoch` is outside
/// `1..=total_epochs`. Unknown dataset ids are fine and use the default
/// ceiling.
pub fn sample_metrics<R: Rng>(
    epoch: usize,
    total_epochs: usize,
    dataset_id: &str,
    rng: &mut R,
) -> SimResult<MetricSample> {
    if total_epochs == 0 {
        return Err(SimError::invalid("total_epochs must be at least 1"));
    }
    if epoch == 0 || epoch > total_epochs {
        return Err(SimError::invalid(format!(
            "epoch {} out of range 1..={}",
            epoch, total_epochs
        )));
    }

    let ceiling = ceiling_for(dataset_id);
    let decay = decay_factor(epoch, total_epochs);

    let base_accuracy = BASE_ACCURACY + (ceiling - BASE_ACCURACY) * (1.0 - decay);
    let accuracy = (base_accuracy + rng.gen_range(-ACCURACY_NOISE..ACCURACY_NOISE)).min(ceiling);

    let base_loss = decay + LOSS_FLOOR_OFFSET;
    let loss = (base_loss + rng.gen_range(-LOSS_NOISE..LOSS_NOISE)).max(MIN_LOSS);

    let (val_accuracy, val_loss) = if is_validation_epoch(epoch, total_epochs) {
        (
            Some(accuracy * rng.gen_range(0.9..1.0)),
            Some(loss * rng.gen_range(1.1..1.2)),
        )
    } else {
        (None, None)
    };

    Ok(MetricSample {
        epoch,
        total_epochs,
        accuracy,
        loss,
        val_accuracy,
        val_loss,
    })
}

/// Noise-free accuracy and loss at `epoch`, i.e. the centre of the band
/// [`sample_metrics`] draws from. Handy for plotting a reference curve.
pub fn expected_curve(epoch: usize, total_epochs: usize, dataset_id: &str) -> SimResult<(f64, f64)> {
    if total_epochs == 0 || epoch > total_epochs {
        return Err(SimError::invalid(format!(
            "epoch {} out of range 0..={}",
            epoch, total_epochs
        )));
    }
    let ceiling = ceiling_for(dataset_id);
    let decay = decay_factor(epoch, total_epochs);
    Ok((
        BASE_ACCURACY + (ceiling - BASE_ACCURACY) * (1.0 - decay),
        decay + LOSS_FLOOR_OFFSET,
    ))
}

pub fn is_validation_epoch(epoch: usize, total_epochs: usize) -> bool {
    epoch % VALIDATION_EVERY == 0 || epoch == total_epochs
}

fn decay_factor(epoch: usize, total_epochs: usize) -> f64 {
    let progress = epoch as f64 / total_epochs as f64;
    (-CURVE_RATE * progress).exp()
}
