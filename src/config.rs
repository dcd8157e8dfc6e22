use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::error::{SimError, SimResult};
use crate::model::hyperparams::Hyperparams;

/// File looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "playrithm.toml";
/// Environment variable naming an alternative config file.
pub const CONFIG_ENV_VAR: &str = "PLAYRITHM_CONFIG";

/// `[simulator]` section.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulatorSection {
    /// Delay between ticks.
    pub tick_interval_ms: u64,
    /// Fixed RNG seed; unset means fresh entropy per run.
    pub seed: Option<u64>,
}

impl Default for SimulatorSection {
    fn default() -> Self {
        SimulatorSection { tick_interval_ms: 300, seed: None }
    }
}

impl SimulatorSection {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

/// `[studio]` section.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StudioSection {
    pub bind_addr: String,
    /// How long the SSE stream may stay silent before a keep-alive ping.
    pub keepalive_ms: u64,
}

impl Default for StudioSection {
    fn default() -> Self {
        StudioSection { bind_addr: "127.0.0.1:7878".to_owned(), keepalive_ms: 500 }
    }
}

/// Top-level configuration. Every section and field is optional.
///
/// ```toml
/// [simulator]
/// tick_interval_ms = 300
/// seed = 42
///
/// [studio]
/// bind_addr = "127.0.0.1:7878"
///
/// [defaults]
/// epochs = 50
/// learning_rate = 0.001
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlayrithmConfig {
    pub simulator: SimulatorSection,
    pub studio: StudioSection,
    pub defaults: Hyperparams,
}

impl PlayrithmConfig {
    /// Parses a TOML document and validates the default hyperparameters.
    pub fn from_toml_str(text: &str) -> SimResult<PlayrithmConfig> {
        let config: PlayrithmConfig = toml::from_str(text)?;
        config
            .defaults
            .validate()
            .map_err(|e| SimError::Config(format!("[defaults]: {}", e)))?;
        Ok(config)
    }

    pub fn load(path: &Path) -> SimResult<PlayrithmConfig> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Resolves the config to use.
    ///
    /// An explicit path must exist. Without one, `$PLAYRITHM_CONFIG` is tried
    /// (and must exist if set), then `./playrithm.toml` if present, then the
    /// built-in defaults.
    pub fn discover(explicit: Option<&Path>) -> SimResult<PlayrithmConfig> {
        if let Some(path) = explicit {
            debug!(path = %path.display(), "loading config");
            return Self::load(path);
        }
        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from) {
            debug!(path = %path.display(), "loading config from {}", CONFIG_ENV_VAR);
            return Self::load(&path);
        }
        let local = Path::new(DEFAULT_CONFIG_FILE);
        if local.is_file() {
            debug!(path = %local.display(), "loading config");
            return Self::load(local);
        }
        Ok(PlayrithmConfig::default())
    }
}
