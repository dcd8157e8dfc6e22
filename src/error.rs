use thiserror::Error;

pub type SimResult<T> = std::result::Result<T, SimError>;

/// Everything that can go wrong inside the simulator.
///
/// The curve math itself cannot fail; every variant here is either a caller
/// mistake caught up front or an I/O problem while loading configuration.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid run state: {0}")]
    InvalidState(String),

    #[error("training loop thread panicked")]
    RunPanicked,

    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

impl SimError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        SimError::InvalidArgument(msg.into())
    }
}
