pub mod config;
pub mod dataset;
pub mod error;
pub mod metrics;
pub mod model;
pub mod train;

// Convenience re-exports
pub use config::PlayrithmConfig;
pub use dataset::{ceiling_for, DatasetInfo, DatasetSplit};
pub use error::{SimError, SimResult};
pub use metrics::{
    algorithm_comparison, sample_metrics, shap_values, waterfall, AlgorithmResult, FeatureAttribution,
    MetricSample, WaterfallStep,
};
pub use model::{
    find_algorithm, ActivationKind, AlgorithmInfo, Hyperparams, ModelArchitecture, OptimizerKind, ParamValue,
};
pub use train::{
    start_run, start_run_with_rng, CancelToken, RunHandle, RunOutcome, RunState, RunStatus,
    TickOutcome, TrainingHistory, TrainingRunConfig, TrainingSession,
};
