// Configuration management for feedlab

use crate::generator::GeneratorParams;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    #[serde(default = "default_count")]
    pub count: usize,               // Add events per feed
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_base_price")]
    pub base_price: i64,
    #[serde(default = "default_burst_probability")]
    pub burst_probability: f64,
    #[serde(default = "default_cancel_probability")]
    pub cancel_probability: f64,
    #[serde(default = "default_execute_probability")]
    pub execute_probability: f64,
}

impl GeneratorConfig {
    pub fn params(&self) -> GeneratorParams {
        GeneratorParams {
            base_price: self.base_price,
            burst_probability: self.burst_probability,
            cancel_probability: self.cancel_probability,
            execute_probability: self.execute_probability,
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            count: default_count(),
            seed: default_seed(),
            base_price: default_base_price(),
            burst_probability: default_burst_probability(),
            cancel_probability: default_cancel_probability(),
            execute_probability: default_execute_probability(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatencyConfig {
    #[serde(default = "default_bins")]
    pub bins: usize,                // Equal-width histogram bins per stage
    #[serde(default = "default_out_prefix")]
    pub out_prefix: String,
}

impl Default for LatencyConfig {
    fn default() -> Self {
        Self {
            bins: default_bins(),
            out_prefix: default_out_prefix(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_true")]
    pub progress: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { progress: true }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub generator: GeneratorConfig,
    #[serde(default)]
    pub latency: LatencyConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

// Default value functions
fn default_count() -> usize { 100_000 }
fn default_seed() -> u64 { 42 }
fn default_base_price() -> i64 { 10_000 }
fn default_burst_probability() -> f64 { 0.05 }
fn default_cancel_probability() -> f64 { 0.15 }
fn default_execute_probability() -> f64 { 0.10 }
fn default_bins() -> usize { 100 }
fn default_out_prefix() -> String { "latency_hist".to_string() }
fn default_true() -> bool { true }

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(e.to_string()))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;

        fs::write(path, content)
            .map_err(|e| ConfigError::FileWrite(e.to_string()))?;

        Ok(())
    }

    /// Load configuration from file, or fall back to defaults if the file doesn't exist
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            debug!("No config at {}, using defaults", path.as_ref().display());
            Ok(Self::default())
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.generator
            .params()
            .validate()
            .map_err(|e| ConfigError::Validation(e.to_string()))?;

        if self.latency.bins == 0 {
            return Err(ConfigError::Validation("bins must be greater than 0".to_string()));
        }

        if self.latency.out_prefix.trim().is_empty() {
            return Err(ConfigError::Validation("out_prefix must not be empty".to_string()));
        }

        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to read config file: {0}")]
    FileRead(String),

    #[error("Failed to write config file: {0}")]
    FileWrite(String),

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Failed to serialize config: {0}")]
    Serialize(String),

    #[error("Configuration validation error: {0}")]
    Validation(String),
}
