use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use playrithm::{Hyperparams, ModelArchitecture, PlayrithmConfig, TrainingHistory, TrainingSession};
use serde::Serialize;

// ---------------------------------------------------------------------------
// Training status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TrainingStatus {
    /// No run has been started yet.
    Idle,
    /// A run is ticking on its own thread.
    Running { run_id: u64, total_epochs: usize },
    /// The run finished on its own or was stopped.
    /// `was_stopped` is true when the user hit Stop before the last epoch.
    Done { was_stopped: bool, epochs_completed: usize },
}

// ---------------------------------------------------------------------------
// Main state struct
// ---------------------------------------------------------------------------

pub struct StudioState {
    /// Hyperparameters of the most recent run (or the configured defaults).
    pub hyperparams:  Hyperparams,
    /// Dataset of the most recent run.
    pub dataset_id:   String,
    /// Architecture derived from the above, shown alongside the charts.
    pub architecture: ModelArchitecture,
    /// Current training lifecycle state.
    pub training:     TrainingStatus,
    /// Every sample of the current run.
    pub history:      TrainingHistory,
    /// Bumped on every start; callbacks of an older run ignore themselves.
    pub generation:   u64,
}

impl StudioState {
    pub fn new(defaults: Hyperparams) -> Self {
        let dataset_id = "mnist".to_owned();
        StudioState {
            architecture: ModelArchitecture::for_dataset_id(&defaults, &dataset_id),
            history:      TrainingHistory::new(defaults.epochs),
            hyperparams:  defaults,
            dataset_id,
            training:     TrainingStatus::Idle,
            generation:   0,
        }
    }
}

/// Everything the handlers share.
///
/// The session and the state sit behind separate locks: run callbacks take
/// only `state`, so a handler may hold `session` while it waits for an old
/// run to wind down.
pub struct Studio {
    pub config:  PlayrithmConfig,
    pub state:   Mutex<StudioState>,
    pub session: Mutex<TrainingSession>,
}

impl Studio {
    pub fn new(config: PlayrithmConfig) -> Self {
        let state = StudioState::new(config.defaults.clone());
        Studio {
            config,
            state:   Mutex::new(state),
            session: Mutex::new(TrainingSession::new()),
        }
    }

    pub fn state(&self) -> MutexGuard<'_, StudioState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn session(&self) -> MutexGuard<'_, TrainingSession> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Shared state type, an `Arc<Studio>` passed to every handler.
pub type SharedState = Arc<Studio>;
