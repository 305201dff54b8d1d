//! Configuration loading for the simulation parameters.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::simulation::signal_calculations::SignalParameters;

/// Radio and session parameters for one simulation run.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SimulationConfig {
    /// Maximum Euclidean distance at which a link may be probed at all
    pub transmission_range: f32,
    /// Maximum achievable SNR measurement
    pub max_snr: u32,
    /// Minimum required SNR measurement
    pub required_snr: u32,
    /// Minimum quality score required to record a discovered link
    pub quality_threshold: f32,
    /// Seed for the signal measurement generator; drawn from entropy when absent
    #[serde(default)]
    pub rng_seed: Option<u64>,
}

impl SimulationConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Arguments
    /// * `config_path` - Path to the config.toml file
    ///
    /// # Returns
    /// * `Ok(SimulationConfig)` if the file was successfully loaded, parsed and validated
    /// * `Err(String)` with a descriptive error message otherwise
    pub fn load(config_path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(config_path).map_err(|e| format!("Failed to read config file: {}", e))?;

        let config: Self = toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject parameter combinations the models cannot work with.
    pub fn validate(&self) -> Result<(), String> {
        if self.transmission_range <= 0.0 {
            return Err(format!("transmission-range {} must be positive", self.transmission_range));
        }
        if self.max_snr <= self.required_snr {
            return Err(format!("max-snr {} must exceed required-snr {}", self.max_snr, self.required_snr));
        }
        if self.quality_threshold < 0.0 {
            return Err(format!("quality-threshold {} must be non-negative", self.quality_threshold));
        }
        Ok(())
    }

    /// Derive the config path from a field file path.
    ///
    /// Replaces the field filename with "config.toml" in the same directory.
    pub fn config_path_from_field(field_path: &str) -> PathBuf {
        let field = Path::new(field_path);
        field.parent().unwrap_or(Path::new(".")).join("config.toml")
    }

    /// SNR bounds for the link quality model.
    pub fn signal_parameters(&self) -> SignalParameters {
        SignalParameters {
            max_snr: self.max_snr,
            required_snr: self.required_snr,
        }
    }
}
