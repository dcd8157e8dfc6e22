pub mod activation;
pub mod algorithms;
pub mod architecture;
pub mod hyperparams;
pub mod optimizer;

pub use activation::ActivationKind;
pub use algorithms::{algorithms, find_algorithm, AlgorithmDataset, AlgorithmInfo, ParamKind, ParamSpec, ParamValue};
pub use architecture::{LayerSpec, ModelArchitecture};
pub use hyperparams::Hyperparams;
pub use optimizer::OptimizerKind;
