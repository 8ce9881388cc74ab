//! Configuration module for the term-vector construction engine.
//!
//! This module provides a layered configuration system that supports:
//! - Default values
//! - TOML configuration file
//! - Environment variable overrides
//!
//! # Environment Variables
//!
//! Environment variables must be prefixed with `RANDEX_` and use double
//! underscores to separate nested levels:
//! - `RANDEX_VECTOR__DIMENSION=2048` sets `vector.dimension`
//! - `RANDEX_WINDOW__RADIUS=2` sets `window.radius`
//! - `RANDEX_TRAINING__CYCLES=3` sets `training.cycles`
//!
//! All parameters are validated together by [`Settings::validate`] before a
//! run starts; invalid combinations (a seed length exceeding the dimension,
//! a truncated left radius wider than the window) are configuration errors
//! and abort the run before any index access.

use crate::error::{BuildError, BuildResult};
use crate::vector::VectorKind;
use crate::window::{DistanceDecay, EncodingMethod};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    /// Version of the configuration schema
    #[serde(default = "default_version")]
    pub version: u32,

    /// Index fields whose positional postings feed the accumulator
    #[serde(default = "default_fields")]
    pub fields: Vec<String>,

    /// Vector model configuration
    #[serde(default)]
    pub vector: VectorConfig,

    /// Sliding-window configuration
    #[serde(default)]
    pub window: WindowConfig,

    /// Training-loop configuration
    #[serde(default)]
    pub training: TrainingConfig,

    /// Term filter configuration
    #[serde(default)]
    pub filter: FilterConfig,

    /// Parallelism configuration
    #[serde(default)]
    pub indexing: IndexingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct VectorConfig {
    /// Number of components per vector
    #[serde(default = "default_dimension")]
    pub dimension: usize,

    /// Number of non-zero entries in an elemental vector
    #[serde(default = "default_seed_length")]
    pub seed_length: usize,

    /// Numeric ground type shared by every vector in the run
    #[serde(default)]
    pub vector_type: VectorKind,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct WindowConfig {
    /// Maximum token distance considered a co-occurrence neighbor
    #[serde(default = "default_radius")]
    pub radius: usize,

    /// Optional reduced radius for the left half of the window.
    /// Neighbors at offsets left of it are excluded even inside `radius`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub truncated_left_radius: Option<usize>,

    /// Positional encoding applied to each neighbor contribution
    #[serde(default)]
    pub encoding: EncodingMethod,

    /// Distance-decay function used by the directional encoding
    #[serde(default)]
    pub decay: DistanceDecay,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TrainingConfig {
    /// Number of full accumulation passes; passes after the first reseed
    /// the elemental vectors with the previous pass's output
    #[serde(default = "default_cycles")]
    pub cycles: usize,

    /// Whether term vectors are rescaled to unit length after the final cycle
    #[serde(default = "default_true")]
    pub normalize: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FilterConfig {
    /// Terms occurring fewer times than this across the collection are skipped
    #[serde(default)]
    pub min_term_frequency: u64,

    /// Terms occurring more often than this are skipped (None = no cap)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_term_frequency: Option<u64>,

    /// Terms with more non-alphabetic characters than this are skipped
    /// (None = no limit)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_non_alphabet_chars: Option<u32>,

    /// Skip terms that parse as numbers
    #[serde(default)]
    pub filter_numeric_terms: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct IndexingConfig {
    /// Number of parallel threads for the accumulation pass
    #[serde(default = "default_parallel_threads")]
    pub parallel_threads: usize,
}

// Default value functions
fn default_version() -> u32 {
    1
}
fn default_fields() -> Vec<String> {
    vec!["contents".to_string()]
}
fn default_dimension() -> usize {
    200
}
fn default_seed_length() -> usize {
    10
}
fn default_radius() -> usize {
    5
}
fn default_cycles() -> usize {
    1
}
fn default_true() -> bool {
    true
}
fn default_parallel_threads() -> usize {
    num_cpus::get()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: default_version(),
            fields: default_fields(),
            vector: VectorConfig::default(),
            window: WindowConfig::default(),
            training: TrainingConfig::default(),
            filter: FilterConfig::default(),
            indexing: IndexingConfig::default(),
        }
    }
}

impl Default for VectorConfig {
    fn default() -> Self {
        Self {
            dimension: default_dimension(),
            seed_length: default_seed_length(),
            vector_type: VectorKind::default(),
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            radius: default_radius(),
            truncated_left_radius: None,
            encoding: EncodingMethod::default(),
            decay: DistanceDecay::default(),
        }
    }
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            cycles: default_cycles(),
            normalize: true,
        }
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            min_term_frequency: 0,
            max_term_frequency: None,
            max_non_alphabet_chars: None,
            filter_numeric_terms: false,
        }
    }
}

impl Default for IndexingConfig {
    fn default() -> Self {
        Self {
            parallel_threads: default_parallel_threads(),
        }
    }
}

impl Settings {
    /// Load settings from defaults, an optional TOML file, and the
    /// environment, in that order of precedence (later layers win).
    pub fn load(config_file: Option<&Path>) -> BuildResult<Self> {
        let mut figment = Figment::from(Serialized::defaults(Settings::default()));
        if let Some(path) = config_file {
            figment = figment.merge(Toml::file(path));
        }
        let settings: Settings = figment
            .merge(Env::prefixed("RANDEX_").split("__"))
            .extract()
            .map_err(|e| BuildError::config(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check parameter combinations that cannot be expressed in the types.
    ///
    /// Called before any accumulation so that a bad run fails without
    /// touching the text index.
    pub fn validate(&self) -> BuildResult<()> {
        if self.vector.dimension == 0 {
            return Err(BuildError::config("vector dimension must be positive"));
        }
        if self.vector.seed_length == 0 {
            return Err(BuildError::config("seed length must be positive"));
        }
        if self.vector.seed_length > self.vector.dimension {
            return Err(BuildError::config(format!(
                "seed length {} exceeds dimension {}",
                self.vector.seed_length, self.vector.dimension
            )));
        }
        if let Some(left) = self.window.truncated_left_radius {
            if left > self.window.radius {
                return Err(BuildError::config(format!(
                    "truncated left radius {} exceeds window radius {}",
                    left, self.window.radius
                )));
            }
        }
        if self.training.cycles == 0 {
            return Err(BuildError::config("training cycles must be at least 1"));
        }
        if self.fields.is_empty() {
            return Err(BuildError::config(
                "at least one content field must be configured",
            ));
        }
        if let Some(max) = self.filter.max_term_frequency {
            if max < self.filter.min_term_frequency {
                return Err(BuildError::config(format!(
                    "max term frequency {} is below min term frequency {}",
                    max, self.filter.min_term_frequency
                )));
            }
        }
        if self.indexing.parallel_threads == 0 {
            return Err(BuildError::config("parallel_threads must be at least 1"));
        }
        Ok(())
    }
}
