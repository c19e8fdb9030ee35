use serde::Deserialize;
use std::env;
use std::path::PathBuf;

use crate::constants::dispatch::{DB_PATH_ENV, DEFAULT_DB_PATH, DEFAULT_LENGTH_SECONDS};
use crate::constants::messages::{REG_DN_FALLBACK, REG_UP_FALLBACK, STEP_FALLBACK};
use crate::constants::signal::SUPPORTED_STEP;
use crate::diagnostics::Diagnostics;

/// Construction parameters for a [`Dispatcher`](crate::Dispatcher).
///
/// Unsupported values are accepted here and coerced by [`DispatchConfig::sanitized`],
/// so callers must not assume their requested `step` or regulation flags are honored.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Total sequence duration, in seconds.
    pub length: u64,
    /// Seconds between consecutive samples. Only `4` is supported.
    pub step: u32,
    /// Generate regulation-up dispatch. Only `true` is supported.
    pub reg_up: bool,
    /// Generate regulation-down dispatch. Only `true` is supported.
    pub reg_dn: bool,
    /// Seed for the segment draw sequence; `None` draws a fresh seed per generator.
    pub seed: Option<u64>,
    /// Location of the corpus table.
    pub db: PathBuf,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            length: DEFAULT_LENGTH_SECONDS,
            step: SUPPORTED_STEP,
            reg_up: true,
            reg_dn: true,
            seed: None,
            db: default_db_path(),
        }
    }
}

impl DispatchConfig {
    /// Override total sequence duration in seconds.
    pub fn with_length(mut self, length: u64) -> Self {
        self.length = length;
        self
    }

    /// Override the sampling step in seconds.
    pub fn with_step(mut self, step: u32) -> Self {
        self.step = step;
        self
    }

    /// Set a deterministic seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Override the corpus table location.
    pub fn with_db(mut self, db: impl Into<PathBuf>) -> Self {
        self.db = db.into();
        self
    }

    /// Override regulation direction flags.
    pub fn with_regulation(mut self, reg_up: bool, reg_dn: bool) -> Self {
        self.reg_up = reg_up;
        self.reg_dn = reg_dn;
        self
    }

    /// Parse a JSON document; absent fields keep their defaults.
    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Coerce unsupported values to supported defaults, warning once per coerced field.
    pub fn sanitized(mut self, diagnostics: &dyn Diagnostics) -> Self {
        if self.step != SUPPORTED_STEP {
            diagnostics.warn(STEP_FALLBACK);
            self.step = SUPPORTED_STEP;
        }
        if !self.reg_up {
            diagnostics.warn(REG_UP_FALLBACK);
            self.reg_up = true;
        }
        if !self.reg_dn {
            diagnostics.warn(REG_DN_FALLBACK);
            self.reg_dn = true;
        }
        self
    }

    /// Number of samples in the assembled sequence: `floor(length / step)`.
    pub fn target_samples(&self) -> usize {
        if self.step == 0 {
            return 0;
        }
        (self.length / u64::from(self.step)) as usize
    }
}

/// Resolve the default corpus table path: `REGDISPATCH_DB` when set, else the bundled location.
pub fn default_db_path() -> PathBuf {
    env::var_os(DB_PATH_ENV)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH))
}
