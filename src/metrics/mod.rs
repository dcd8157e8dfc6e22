pub mod comparison;
pub mod explain;
pub mod metric_sample;
pub mod sampler;

pub use comparison::{algorithm_comparison, AlgorithmResult};
pub use explain::{shap_values, waterfall, FeatureAttribution, StepKind, WaterfallStep};
pub use metric_sample::MetricSample;
pub use sampler::{expected_curve, sample_metrics};
