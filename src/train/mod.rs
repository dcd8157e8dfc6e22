pub mod cancel;
pub mod history;
pub mod run_config;
pub mod run_state;
pub mod runner;
pub mod session;

pub use cancel::CancelToken;
pub use history::{ChartPoint, TrainingHistory};
pub use run_config::{TrainingRunConfig, DEFAULT_TICK_INTERVAL};
pub use run_state::{RunState, RunStatus, TickOutcome};
pub use runner::{start_run, start_run_with_rng, RunHandle, RunOutcome};
pub use session::TrainingSession;
