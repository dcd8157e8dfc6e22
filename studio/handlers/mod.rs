pub mod algorithms;
pub mod datasets;
pub mod explain;
pub mod params;
pub mod train;
pub mod train_sse;
