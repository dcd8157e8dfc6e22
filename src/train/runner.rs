use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::{self, JoinHandle};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{info, warn};

use crate::error::{SimError, SimResult};
use crate::metrics::metric_sample::MetricSample;
use crate::train::cancel::CancelToken;
use crate::train::run_config::TrainingRunConfig;
use crate::train::run_state::{RunState, TickOutcome};

static NEXT_RUN_ID: AtomicU64 = AtomicU64::new(1);

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunOutcome {
    /// Every epoch was emitted and `on_complete` ran.
    Completed { epochs: usize },
    /// Stopped early; `on_complete` was not called.
    Cancelled { epochs_emitted: usize },
}

/// Handle to a run loop running on its own thread.
///
/// Dropping the handle detaches the loop; it keeps ticking until it finishes
/// or someone holding its [`CancelToken`] cancels it.
#[derive(Debug)]
pub struct RunHandle {
    id: u64,
    token: CancelToken,
    thread: JoinHandle<RunOutcome>,
}

impl RunHandle {
    /// Process-unique run number, used in logs.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Stops future ticks. Samples already delivered stay delivered and
    /// `on_complete` will not run.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// True once the loop thread has exited, for whatever reason.
    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// A clone of the run's stop signal, e.g. for cancelling from inside
    /// `on_sample`.
    pub fn cancel_token(&self) -> CancelToken {
        self.token.clone()
    }

    pub(crate) fn is_current_thread(&self) -> bool {
        self.thread.thread().id() == thread::current().id()
    }

    /// Blocks until the loop exits.
    ///
    /// # Errors
    /// `RunPanicked` if a callback panicked on the loop thread.
    pub fn join(self) -> SimResult<RunOutcome> {
        self.thread.join().map_err(|_| SimError::RunPanicked)
    }
}

/// Starts a simulated run on a background thread.
///
/// The loop waits `config.tick_interval`, then ticks: epochs `1..=N` each
/// produce exactly one `on_sample` call in order, and the tick after epoch
/// `N` calls `on_complete` once and ends the loop. Cancelling through the
/// returned handle stops the loop at its next wait without calling
/// `on_complete`.
///
/// Randomness comes from `StdRng`, seeded from `config.seed` when present.
///
/// # Errors
/// `InvalidArgument` for an invalid config (nothing is spawned), `Io` if
/// the thread cannot be spawned.
pub fn start_run<S, C>(config: TrainingRunConfig, on_sample: S, on_complete: C) -> SimResult<RunHandle>
where
    S: FnMut(MetricSample) + Send + 'static,
    C: FnOnce() + Send + 'static,
{
    let rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    start_run_with_rng(config, rng, on_sample, on_complete)
}

/// [`start_run`] with a caller-supplied random source.
pub fn start_run_with_rng<R, S, C>(
    config: TrainingRunConfig,
    rng: R,
    on_sample: S,
    on_complete: C,
) -> SimResult<RunHandle>
where
    R: Rng + Send + 'static,
    S: FnMut(MetricSample) + Send + 'static,
    C: FnOnce() + Send + 'static,
{
    let mut state = RunState::new(config)?;
    state.start()?;

    let id = NEXT_RUN_ID.fetch_add(1, Ordering::Relaxed);
    let token = CancelToken::new();
    let worker_token = token.clone();

    info!(
        run_id = id,
        dataset = %state.config().dataset_id,
        epochs = state.config().total_epochs,
        learning_rate = state.config().learning_rate,
        interval_ms = state.config().tick_interval.as_millis() as u64,
        "training run started"
    );

    let thread = thread::Builder::new()
        .name(format!("playrithm-run-{}", id))
        .spawn(move || run_loop(id, state, rng, worker_token, on_sample, on_complete))?;

    Ok(RunHandle { id, token, thread })
}

// ---------------------------------------------------------------------------
// Loop body
// ---------------------------------------------------------------------------

fn run_loop<R, S, C>(
    id: u64,
    mut state: RunState,
    mut rng: R,
    token: CancelToken,
    mut on_sample: S,
    on_complete: C,
) -> RunOutcome
where
    R: Rng,
    S: FnMut(MetricSample),
    C: FnOnce(),
{
    let interval = state.config().tick_interval;
    let mut emitted = 0;

    loop {
        if token.wait_timeout(interval) {
            return cancelled(id, &mut state, emitted);
        }

        match state.tick(&mut rng) {
            Ok(TickOutcome::Sample(sample)) => {
                // Cancel may have landed while the sample was computed.
                if token.is_cancelled() {
                    return cancelled(id, &mut state, emitted);
                }
                on_sample(sample);
                emitted += 1;
            }
            Ok(TickOutcome::Completed) => {
                info!(run_id = id, epochs = emitted, "training run completed");
                on_complete();
                return RunOutcome::Completed { epochs: emitted };
            }
            Err(e) => {
                warn!(run_id = id, error = %e, "training run aborted");
                return cancelled(id, &mut state, emitted);
            }
        }
    }
}

fn cancelled(id: u64, state: &mut RunState, emitted: usize) -> RunOutcome {
    state.cancel();
    info!(run_id = id, epochs_emitted = emitted, "training run cancelled");
    RunOutcome::Cancelled { epochs_emitted: emitted }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::time::Duration;

    fn fast(total: usize) -> TrainingRunConfig {
        TrainingRunConfig::new("iris", total, 0.01)
            .with_tick_interval(Duration::from_millis(1))
            .with_seed(5)
    }

    #[test]
    fn invalid_config_spawns_nothing() {
        let err = start_run(TrainingRunConfig::new("iris", 0, 0.01), |_| {}, || {}).unwrap_err();
        assert!(matches!(err, SimError::InvalidArgument(_)));
    }

    #[test]
    fn completed_run_reports_epoch_count() {
        let (tx, rx) = mpsc::channel();
        let handle = start_run(fast(6), move |s| tx.send(s.epoch).unwrap(), || {}).unwrap();
        assert_eq!(handle.join().unwrap(), RunOutcome::Completed { epochs: 6 });
        assert_eq!(rx.iter().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn run_ids_are_unique() {
        let a = start_run(fast(1), |_| {}, || {}).unwrap();
        let b = start_run(fast(1), |_| {}, || {}).unwrap();
        assert_ne!(a.id(), b.id());
        a.join().unwrap();
        b.join().unwrap();
    }

    #[test]
    fn panicking_callback_surfaces_on_join() {
        let handle = start_run(fast(3), |_| panic!("boom"), || {}).unwrap();
        assert!(matches!(handle.join(), Err(SimError::RunPanicked)));
    }
}
