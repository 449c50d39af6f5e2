// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/vitalbarn-rs

//! Configuration module

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application name
    pub app_name: String,

    /// Application version
    pub version: String,

    /// Data directory
    pub data_dir: PathBuf,

    /// Log level
    pub log_level: String,

    /// HTTP API configuration
    pub http: HttpConfig,

    /// Simulator configuration
    pub simulator: SimulatorConfig,

    /// Sensor clamp ranges
    pub sensors: SensorsConfig,

    /// Heart-rate zone table
    pub heart_rate_zones: Vec<HeartRateZone>,

    /// Database configuration
    pub database: DatabaseConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: "VitalBarn".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            data_dir: PathBuf::from("./data"),
            log_level: "info".to_string(),
            http: HttpConfig::default(),
            simulator: SimulatorConfig::default(),
            sensors: SensorsConfig::default(),
            heart_rate_zones: default_heart_rate_zones(),
            database: DatabaseConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Load or create default configuration
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            let config = Self::default();

            // Create parent directories
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }

            config.save(path)?;
            Ok(config)
        }
    }

    /// Get configuration directory
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("vitalbarn"))
            .unwrap_or_else(|| PathBuf::from("./config"))
    }

    /// Get default configuration path
    pub fn default_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Resolve a heart rate to its zone via the configured table.
    ///
    /// Falls back to the first (resting) zone when the value lies outside
    /// every configured bucket.
    pub fn zone_for(&self, heart_rate: u16) -> &HeartRateZone {
        self.heart_rate_zones
            .iter()
            .find(|z| z.min <= heart_rate && heart_rate < z.max)
            .unwrap_or(&self.heart_rate_zones[0])
    }
}

/// HTTP API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Bind address
    pub host: String,

    /// Bind port
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

/// Simulator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulatorConfig {
    /// Seconds between generated readings
    pub tick_interval_secs: u64,

    /// Baseline heart rate in bpm
    pub baseline_heart_rate: u16,

    /// Probability that the activity state changes on a given tick
    pub transition_probability: f64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            tick_interval_secs: 5,
            baseline_heart_rate: 75,
            transition_probability: 0.2,
        }
    }
}

/// Sensor clamp ranges applied after noise
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorsConfig {
    /// Heart rate limits in bpm
    pub heart_rate: HeartRateLimits,

    /// Oxygen saturation limits in percent SpO2
    pub oxygen: RangeLimits,

    /// Body temperature limits in degrees Celsius
    pub temperature: RangeLimits,
}

impl Default for SensorsConfig {
    fn default() -> Self {
        Self {
            heart_rate: HeartRateLimits { min: 60, max: 180 },
            oxygen: RangeLimits {
                min: 95.0,
                max: 100.0,
            },
            temperature: RangeLimits {
                min: 36.1,
                max: 37.5,
            },
        }
    }
}

/// Integer sensor limits
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HeartRateLimits {
    /// Minimum bpm the device reports
    pub min: u16,
    /// Maximum bpm the device reports
    pub max: u16,
}

/// Floating-point sensor limits
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RangeLimits {
    /// Lower clamp bound
    pub min: f64,
    /// Upper clamp bound
    pub max: f64,
}

/// One bucket of the heart-rate zone table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeartRateZone {
    /// Zone name
    pub name: String,
    /// Inclusive lower bound in bpm
    pub min: u16,
    /// Exclusive upper bound in bpm
    pub max: u16,
    /// Display color as a hex string
    pub color: String,
}

fn default_heart_rate_zones() -> Vec<HeartRateZone> {
    let zone = |name: &str, min: u16, max: u16, color: &str| HeartRateZone {
        name: name.to_string(),
        min,
        max,
        color: color.to_string(),
    };

    vec![
        zone("resting", 0, 60, "#6b7280"),
        zone("light", 60, 100, "#10b981"),
        zone("moderate", 100, 140, "#f59e0b"),
        zone("intense", 140, 170, "#ef4444"),
        zone("maximum", 170, 220, "#dc2626"),
    ]
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database path
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./data/vitalbarn.db"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_toml_roundtrip() {
        let config = Config::default();
        let toml = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&toml).unwrap();

        assert_eq!(parsed.simulator.tick_interval_secs, 5);
        assert_eq!(parsed.simulator.baseline_heart_rate, 75);
        assert_eq!(parsed.sensors.heart_rate.max, 180);
        assert_eq!(parsed.heart_rate_zones.len(), 5);
    }

    #[test]
    fn test_zone_lookup_boundaries() {
        let config = Config::default();

        assert_eq!(config.zone_for(59).name, "resting");
        assert_eq!(config.zone_for(59).color, "#6b7280");
        assert_eq!(config.zone_for(60).name, "light");
        assert_eq!(config.zone_for(60).color, "#10b981");
        assert_eq!(config.zone_for(139).name, "moderate");
        assert_eq!(config.zone_for(139).color, "#f59e0b");
        assert_eq!(config.zone_for(170).name, "maximum");
        assert_eq!(config.zone_for(170).color, "#dc2626");
    }

    #[test]
    fn test_zone_lookup_falls_back_to_resting() {
        let config = Config::default();
        assert_eq!(config.zone_for(250).name, "resting");
    }
}
