//! Engine configuration, loadable from TOML.
//!
//! ```toml
//! hash_mb = 64
//! move_overhead_ms = 20
//!
//! [search]
//! aspiration_delta = 30
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Transposition table size in megabytes
    pub hash_mb: usize,
    /// Subtracted from the clock before allocating time
    pub move_overhead_ms: u64,
    pub search: SearchParams,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            hash_mb: 16,
            move_overhead_ms: 10,
            search: SearchParams::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn move_overhead(&self) -> Duration {
        Duration::from_millis(self.move_overhead_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.hash_mb == 0 {
            return Err(ConfigError::Invalid {
                field: "hash_mb",
                reason: "must be at least 1".to_string(),
            });
        }
        self.search.validate()
    }
}

/// Pruning and scheduling knobs of the search. Depths are in plies,
/// margins in centipawns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchParams {
    pub aspiration_delta: i32,
    pub aspiration_min_depth: i32,
    pub rfp_max_depth: i32,
    pub rfp_margin: i32,
    pub razor_max_depth: i32,
    pub razor_margin: i32,
    pub nmp_min_depth: i32,
    pub futility_max_depth: i32,
    pub futility_base: i32,
    pub futility_margin: i32,
    pub lmr_min_depth: i32,
    pub lmr_min_index: usize,
    pub delta_margin: i32,
    /// Nodes between clock reads
    pub check_interval: u64,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            aspiration_delta: 25,
            aspiration_min_depth: 4,
            rfp_max_depth: 6,
            rfp_margin: 80,
            razor_max_depth: 3,
            razor_margin: 250,
            nmp_min_depth: 3,
            futility_max_depth: 3,
            futility_base: 100,
            futility_margin: 120,
            lmr_min_depth: 3,
            lmr_min_index: 3,
            delta_margin: 200,
            check_interval: 2048,
        }
    }
}

impl SearchParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.aspiration_delta <= 0 {
            return Err(ConfigError::Invalid {
                field: "search.aspiration_delta",
                reason: "must be positive".to_string(),
            });
        }
        if self.check_interval == 0 {
            return Err(ConfigError::Invalid {
                field: "search.check_interval",
                reason: "must be positive".to_string(),
            });
        }
        if self.nmp_min_depth < 1 || self.lmr_min_depth < 2 {
            return Err(ConfigError::Invalid {
                field: "search",
                reason: "null-move depth must be at least 1 and LMR depth at least 2".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
