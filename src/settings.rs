//! User settings loaded from INI configuration files.
//!
//! Command-line flags always win, but defaults that users change on every
//! run (the broadening, the matrix output file) can be set once in an INI
//! file instead. Files are merged with the following precedence:
//!
//! 1. `./kisc_config.cfg` (local, highest)
//! 2. `~/.config/kisc/kisc_config.cfg` (user)
//! 3. `/etc/kisc/kisc_config.cfg` (system)
//! 4. Built-in defaults
//!
//! # File Format
//!
//! ```text
//! [rates]
//! gamma = 1000.0
//!
//! [output]
//! matrix_file = singlet-triplet-mat.csv
//! soc_precision = 0
//!
//! [logging]
//! level = info
//! ```

use crate::config::{DEFAULT_GAMMA, DEFAULT_MATRIX_FILE};
use configparser::ini::Ini;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during settings loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// I/O error when reading configuration files
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// INI parsing error
    #[error("INI parsing error: {0}")]
    IniParse(String),
    /// Invalid configuration value
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

/// All user-adjustable defaults.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Rate-calculation defaults
    pub rates: RateSettings,
    /// Output file defaults
    pub output: OutputSettings,
    /// Logging defaults
    pub logging: LoggingSettings,
}

/// Rate-calculation defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateSettings {
    /// Default Lorentzian half-width in cm⁻¹ (default: 1000)
    pub gamma: f64,
}

impl Default for RateSettings {
    fn default() -> Self {
        Self {
            gamma: DEFAULT_GAMMA,
        }
    }
}

/// Output file defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    /// Default file name for the extracted Ms SOC matrix
    pub matrix_file: String,
    /// Decimal places for SOC matrix CSV cells (default: 0)
    pub soc_precision: usize,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            matrix_file: DEFAULT_MATRIX_FILE.to_string(),
            soc_precision: 0,
        }
    }
}

/// Logging defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level (default: "info")
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Loads and holds the merged settings, remembering where they came from.
pub struct SettingsManager {
    settings: Settings,
    config_source: String,
}

impl SettingsManager {
    /// Loads settings from the configuration file hierarchy.
    ///
    /// A file that exists but fails to parse is skipped with a warning so a
    /// broken system file cannot block a run.
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Settings::default();
        let mut config_source = "built-in defaults".to_string();

        let mut candidates: Vec<(PathBuf, &str)> = Vec::new();
        if let Some(system_path) = Self::system_config_path() {
            candidates.push((system_path, "system config"));
        }
        if let Some(user_path) = Self::user_config_path() {
            candidates.push((user_path, "user config"));
        }
        candidates.push((PathBuf::from("kisc_config.cfg"), "local config"));

        for (path, label) in candidates {
            if !path.exists() {
                continue;
            }
            match Self::load_file(&path, &mut settings) {
                Ok(()) => {
                    config_source = format!("{} ({})", label, path.display());
                    debug!("loaded {} from {}", label, path.display());
                }
                Err(e) => {
                    warn!("failed to load {} from {}: {}", label, path.display(), e);
                }
            }
        }

        Ok(Self {
            settings,
            config_source,
        })
    }

    /// Returns the source of the loaded configuration.
    pub fn config_source(&self) -> &str {
        &self.config_source
    }

    /// The merged settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    fn system_config_path() -> Option<PathBuf> {
        if cfg!(unix) {
            Some(PathBuf::from("/etc/kisc/kisc_config.cfg"))
        } else {
            None
        }
    }

    fn user_config_path() -> Option<PathBuf> {
        std::env::var_os("HOME")
            .map(|home| PathBuf::from(home).join(".config").join("kisc").join("kisc_config.cfg"))
    }

    /// Reads one INI file and overlays its values onto `settings`.
    fn load_file(path: &Path, settings: &mut Settings) -> Result<(), ConfigError> {
        let content = fs::read_to_string(path)?;
        let mut ini = Ini::new();
        ini.read(content)
            .map_err(|e| ConfigError::IniParse(format!("failed to parse INI: {}", e)))?;

        if let Some(section) = ini.get_map_ref().get("rates") {
            if let Some(gamma) = get_value(section, "gamma") {
                let gamma: f64 = gamma.parse().map_err(|_| {
                    ConfigError::InvalidValue(format!("rates.gamma: {}", gamma))
                })?;
                if !(gamma > 0.0) || !gamma.is_finite() {
                    return Err(ConfigError::InvalidValue(format!(
                        "rates.gamma must be positive, got {}",
                        gamma
                    )));
                }
                settings.rates.gamma = gamma;
            }
        }

        if let Some(section) = ini.get_map_ref().get("output") {
            if let Some(file) = get_value(section, "matrix_file") {
                settings.output.matrix_file = file;
            }
            if let Some(precision) = get_value(section, "soc_precision") {
                settings.output.soc_precision = precision.parse().map_err(|_| {
                    ConfigError::InvalidValue(format!("output.soc_precision: {}", precision))
                })?;
            }
        }

        if let Some(section) = ini.get_map_ref().get("logging") {
            if let Some(level) = get_value(section, "level") {
                settings.logging.level = level;
            }
        }

        Ok(())
    }
}

fn get_value(section: &HashMap<String, Option<String>>, key: &str) -> Option<String> {
    section.get(key).and_then(|v| v.clone())
}

/// Writes a commented settings template to `kisc_config.cfg`.
pub fn create_settings_template() -> Result<(), ConfigError> {
    let template = format!(
        "\
# kisc user settings
#
# Search order: ./kisc_config.cfg, ~/.config/kisc/kisc_config.cfg,
# /etc/kisc/kisc_config.cfg. Command-line flags override everything here.

[rates]
# Lorentzian half-width in cm^-1
gamma = {gamma}

[output]
# File name for the extracted Ms-basis SOC matrix
matrix_file = {matrix_file}
# Decimal places for SOC matrix CSV cells
soc_precision = 0

[logging]
# error, warn, info, debug, trace
level = info
",
        gamma = DEFAULT_GAMMA,
        matrix_file = DEFAULT_MATRIX_FILE,
    );
    fs::write("kisc_config.cfg", template)?;
    Ok(())
}
