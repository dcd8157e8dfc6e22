use rand::Rng;
use serde::Serialize;
use tracing::debug;

use crate::error::{SimError, SimResult};
use crate::metrics::metric_sample::MetricSample;
use crate::metrics::sampler::sample_metrics;
use crate::train::run_config::TrainingRunConfig;

/// Lifecycle of a single run.
///
/// `Idle → Running → {Completed, Cancelled}`. Both terminal states are final;
/// a new run needs a fresh `RunState`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Idle,
    Running,
    Completed,
    Cancelled,
}

impl RunStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, RunStatus::Completed | RunStatus::Cancelled)
    }
}

/// What a single tick produced.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// One more epoch was simulated.
    Sample(MetricSample),
    /// The tick after the last epoch; the run is now `Completed`.
    Completed,
}

/// Mutable state of one run, advanced one epoch per [`tick`](RunState::tick).
///
/// Whatever drives the loop (a timer thread, a test) only has to call `tick`;
/// the state machine knows nothing about scheduling.
#[derive(Debug, Clone)]
pub struct RunState {
    config: TrainingRunConfig,
    current_epoch: usize,
    status: RunStatus,
}

impl RunState {
    /// Validates `config` and returns an `Idle` state.
    pub fn new(config: TrainingRunConfig) -> SimResult<RunState> {
        config.validate()?;
        Ok(RunState { config, current_epoch: 0, status: RunStatus::Idle })
    }

    pub fn config(&self) -> &TrainingRunConfig {
        &self.config
    }

    pub fn current_epoch(&self) -> usize {
        self.current_epoch
    }

    pub fn status(&self) -> RunStatus {
        self.status
    }

    pub fn is_running(&self) -> bool {
        self.status == RunStatus::Running
    }

    /// `Idle → Running`.
    pub fn start(&mut self) -> SimResult<()> {
        match self.status {
            RunStatus::Idle => {
                self.status = RunStatus::Running;
                Ok(())
            }
            other => Err(SimError::InvalidState(format!("cannot start a run that is {:?}", other))),
        }
    }

    /// Advances by one epoch.
    ///
    /// Returns a sample for epochs `1..=total_epochs`; the tick after that
    /// returns [`TickOutcome::Completed`] and moves the run to `Completed`.
    ///
    /// # Errors
    /// `InvalidState` unless the run is `Running`.
    pub fn tick<R: Rng>(&mut self, rng: &mut R) -> SimResult<TickOutcome> {
        if self.status != RunStatus::Running {
            return Err(SimError::InvalidState(format!("cannot tick a run that is {:?}", self.status)));
        }

        self.current_epoch += 1;
        if self.current_epoch > self.config.total_epochs {
            self.current_epoch = self.config.total_epochs;
            self.status = RunStatus::Completed;
            return Ok(TickOutcome::Completed);
        }

        let sample = sample_metrics(
            self.current_epoch,
            self.config.total_epochs,
            &self.config.dataset_id,
            rng,
        )?;
        debug!(
            epoch = sample.epoch,
            total = sample.total_epochs,
            accuracy = sample.accuracy,
            loss = sample.loss,
            "tick"
        );
        Ok(TickOutcome::Sample(sample))
    }

    /// Moves a live run to `Cancelled`. Returns `false` if it had already
    /// finished, in which case nothing changes.
    pub fn cancel(&mut self) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        self.status = RunStatus::Cancelled;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn running(total: usize) -> RunState {
        let mut st = RunState::new(TrainingRunConfig::new("iris", total, 0.01)).unwrap();
        st.start().unwrap();
        st
    }

    #[test]
    fn emits_every_epoch_then_completes() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut st = running(4);
        let mut epochs = Vec::new();
        loop {
            match st.tick(&mut rng).unwrap() {
                TickOutcome::Sample(s) => epochs.push(s.epoch),
                TickOutcome::Completed => break,
            }
        }
        assert_eq!(epochs, vec![1, 2, 3, 4]);
        assert_eq!(st.status(), RunStatus::Completed);
        assert_eq!(st.current_epoch(), 4);
    }

    #[test]
    fn terminal_states_reject_ticks_and_starts() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut st = running(1);
        st.tick(&mut rng).unwrap();
        assert_eq!(st.tick(&mut rng).unwrap(), TickOutcome::Completed);
        assert!(matches!(st.tick(&mut rng), Err(SimError::InvalidState(_))));
        assert!(st.start().is_err());
        assert!(!st.cancel());
        assert_eq!(st.status(), RunStatus::Completed);
    }

    #[test]
    fn cancel_is_terminal() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut st = running(10);
        st.tick(&mut rng).unwrap();
        assert!(st.cancel());
        assert_eq!(st.status(), RunStatus::Cancelled);
        assert!(st.tick(&mut rng).is_err());
        assert_eq!(st.current_epoch(), 1);
    }

    #[test]
    fn idle_run_cannot_tick() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut st = RunState::new(TrainingRunConfig::new("iris", 3, 0.01)).unwrap();
        assert_eq!(st.status(), RunStatus::Idle);
        assert!(st.tick(&mut rng).is_err());
    }

    #[test]
    fn invalid_config_is_rejected_up_front() {
        assert!(RunState::new(TrainingRunConfig::new("iris", 0, 0.01)).is_err());
    }
}
