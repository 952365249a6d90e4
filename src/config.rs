//! Layout run configuration
//!
//! A [`LayoutConfig`] can be built in code, loaded from a YAML or JSON file,
//! and is validated before any simulation runs.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::forces::ForceParameters;

/// Default number of simulation steps
pub const DEFAULT_ITERATIONS: usize = 200;

/// Default progress cadence, in steps
pub const DEFAULT_PROGRESS_INTERVAL: usize = 50;

/// Errors raised while loading or validating a configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A force coefficient is NaN or infinite
    #[error("{name} must be finite, got {value}")]
    NonFinite { name: &'static str, value: f64 },

    /// A force coefficient is below zero
    #[error("{name} must be non-negative, got {value}")]
    Negative { name: &'static str, value: f64 },

    /// Damping outside [0, 1]
    #[error("damping must be within [0, 1], got {0}")]
    DampingOutOfRange(f64),

    /// The config file extension is not yaml/yml/json
    #[error("unsupported config format: {0}")]
    UnsupportedFormat(String),

    /// An I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A parsing error occurred
    #[error("parse error: {0}")]
    Parse(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Everything a layout run needs besides the graph itself
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Number of force/integrate/clamp steps to run
    pub iterations: usize,

    /// Force coefficients and damping
    #[serde(flatten)]
    pub params: ForceParameters,

    /// Report progress every this many steps (0 disables reporting)
    pub progress_interval: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            params: ForceParameters::default(),
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }
}

impl LayoutConfig {
    /// Preset for the bundled district sample: 300 steps with a softer
    /// spring and stronger anchors than the defaults
    pub fn sample() -> Self {
        Self {
            iterations: 300,
            params: ForceParameters {
                attraction: 0.002,
                repulsion: 0.06,
                gravity: 0.015,
                damping: 0.95,
            },
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_params(mut self, params: ForceParameters) -> Self {
        self.params = params;
        self
    }

    pub fn with_progress_interval(mut self, interval: usize) -> Self {
        self.progress_interval = interval;
        self
    }

    /// Load a configuration file, picking the parser from its extension
    ///
    /// Missing fields fall back to their defaults. The result is validated.
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        Self::from_path_over(path, Self::default())
    }

    /// Load a configuration file whose fields override `base`
    ///
    /// Fields absent from the file keep their value from `base`, so a file
    /// holding only `iterations` leaves a preset's coefficients in place.
    pub fn from_path_over(path: &Path, base: LayoutConfig) -> ConfigResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        let content = fs::read_to_string(path)?;

        let overlay: ConfigOverlay = match ext.as_str() {
            "yaml" | "yml" => {
                serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?
            }
            "json" => {
                serde_json::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?
            }
            _ => return Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        };

        let config = overlay.apply(base);
        config.validate()?;
        Ok(config)
    }

    /// Reject coefficients that have no physical meaning
    pub fn validate(&self) -> ConfigResult<()> {
        let p = &self.params;
        for (name, value) in [
            ("attraction", p.attraction),
            ("repulsion", p.repulsion),
            ("gravity", p.gravity),
            ("damping", p.damping),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { name, value });
            }
            if value < 0.0 {
                return Err(ConfigError::Negative { name, value });
            }
        }

        if p.damping > 1.0 {
            return Err(ConfigError::DampingOutOfRange(p.damping));
        }

        Ok(())
    }
}

/// Fields present in a config file; everything else comes from a base config
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigOverlay {
    iterations: Option<usize>,
    attraction: Option<f64>,
    repulsion: Option<f64>,
    gravity: Option<f64>,
    damping: Option<f64>,
    progress_interval: Option<usize>,
}

impl ConfigOverlay {
    fn apply(self, base: LayoutConfig) -> LayoutConfig {
        let p = base.params;
        LayoutConfig {
            iterations: self.iterations.unwrap_or(base.iterations),
            params: ForceParameters {
                attraction: self.attraction.unwrap_or(p.attraction),
                repulsion: self.repulsion.unwrap_or(p.repulsion),
                gravity: self.gravity.unwrap_or(p.gravity),
                damping: self.damping.unwrap_or(p.damping),
            },
            progress_interval: self.progress_interval.unwrap_or(base.progress_interval),
        }
    }
}
