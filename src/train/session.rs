use tracing::warn;

use crate::error::SimResult;
use crate::metrics::metric_sample::MetricSample;
use crate::train::run_config::TrainingRunConfig;
use crate::train::runner::{start_run, RunHandle, RunOutcome};

/// Owns at most one active run.
///
/// Starting a run while another is live cancels the old one and waits for
/// its thread to exit before spawning the new one, so a consumer never sees
/// samples from two runs interleaved. The last start wins.
///
/// Do not call `start` or `cancel` from inside a run's own callbacks while
/// holding a lock those callbacks need; use the run's
/// [`CancelToken`](crate::train::CancelToken) there instead.
#[derive(Debug, Default)]
pub struct TrainingSession {
    active: Option<RunHandle>,
}

impl TrainingSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the active run (if any) with a new one.
    ///
    /// The config is validated before anything is touched: an invalid config
    /// leaves the current run alone. Returns the new run's id.
    pub fn start<S, C>(&mut self, config: TrainingRunConfig, on_sample: S, on_complete: C) -> SimResult<u64>
    where
        S: FnMut(MetricSample) + Send + 'static,
        C: FnOnce() + Send + 'static,
    {
        config.validate()?;
        if let Some(old) = self.active.as_ref() {
            if !old.is_finished() {
                warn!(run_id = old.id(), "replacing active training run");
            }
        }
        self.cancel();

        let handle = start_run(config, on_sample, on_complete)?;
        let id = handle.id();
        self.active = Some(handle);
        Ok(id)
    }

    /// Cancels the active run and waits for its loop to exit.
    ///
    /// Returns the outcome of the run that was stopped, or `None` if there
    /// was none. A run that had already completed reports `Completed`.
    pub fn cancel(&mut self) -> Option<RunOutcome> {
        let handle = self.active.take()?;
        handle.cancel();
        if handle.is_current_thread() {
            // Called from the run's own callback; it exits after returning.
            return None;
        }
        match handle.join() {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                warn!(error = %e, "training run ended abnormally");
                None
            }
        }
    }

    /// Blocks until the active run ends on its own.
    pub fn wait(&mut self) -> SimResult<Option<RunOutcome>> {
        match self.active.take() {
            Some(handle) => handle.join().map(Some),
            None => Ok(None),
        }
    }

    pub fn is_running(&self) -> bool {
        self.active.as_ref().map_or(false, |h| !h.is_finished() && !h.is_cancelled())
    }

    pub fn active_run_id(&self) -> Option<u64> {
        self.active.as_ref().map(RunHandle::id)
    }
}

impl Drop for TrainingSession {
    fn drop(&mut self) {
        if let Some(handle) = self.active.take() {
            handle.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn cancel_without_run_is_noop() {
        let mut session = TrainingSession::new();
        assert_eq!(session.cancel(), None);
        assert!(!session.is_running());
    }

    #[test]
    fn invalid_config_keeps_current_run() {
        let mut session = TrainingSession::new();
        let cfg = TrainingRunConfig::new("iris", 100, 0.01).with_tick_interval(Duration::from_secs(10));
        let id = session.start(cfg, |_| {}, || {}).unwrap();
        assert!(session.start(TrainingRunConfig::new("iris", 0, 0.01), |_| {}, || {}).is_err());
        assert_eq!(session.active_run_id(), Some(id));
        assert!(session.is_running());
        assert_eq!(session.cancel(), Some(RunOutcome::Cancelled { epochs_emitted: 0 }));
    }

    #[test]
    fn wait_returns_completed_outcome() {
        let mut session = TrainingSession::new();
        let cfg = TrainingRunConfig::new("mnist", 3, 0.01).with_tick_interval(Duration::ZERO);
        session.start(cfg, |_| {}, || {}).unwrap();
        assert_eq!(session.wait().unwrap(), Some(RunOutcome::Completed { epochs: 3 }));
        assert_eq!(session.wait().unwrap(), None);
    }
}
