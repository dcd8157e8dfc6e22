pub mod catalog;
pub mod split;

pub use catalog::{ceiling_for, sample_count, DatasetInfo, TaskKind, DEFAULT_CEILING};
pub use split::{DatasetSplit, DEFAULT_TRAIN_RATIO};
