//! # Configuration Management
//!
//! This module loads the planner inputs from `timer-config.toml` and turns
//! them into a validated [`ParameterSnapshot`]. It owns the one piece of
//! input processing the core deliberately knows nothing about: expanding
//! lists and ranges of scale factors into the combined scale set.
//!
//! ## Scale Expansion
//! A timer peripheral typically chains several dividers (e.g. a prescaler
//! with a fixed menu of ratios and a postscaler counting `1..16`). Each
//! divider is described either as an explicit factor list or as a half-open
//! range, optionally exponential (`1 << x`). The combined scale set is every
//! product of one choice per divider.

use crate::snapshot::{max_value_for_bits, SnapshotError};
use crate::ParameterSnapshot;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "timer-config.toml";

/// Errors raised while loading or expanding a configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read or written
    #[error("config IO: {0}")]
    Io(#[from] io::Error),

    /// Config file is not valid TOML for [`Config`]
    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("config serialization failed: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Counter width outside `0..=64`
    #[error("counter width must be at most 64 bits, got {0}")]
    Bits(u32),

    /// A scale factor or product of factors does not fit in 64 bits
    #[error("scale factor overflows 64 bits")]
    ScaleOverflow,

    /// Expanded inputs do not form a valid snapshot
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

/// Planner configuration loaded from timer-config.toml
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Target interval and counter width
    pub timer: TimerConfig,
    /// Available input clocks
    pub clock: ClockConfig,
    /// Available dividers between clock and counter
    pub scale: ScaleConfig,
}

/// Target interval and counter width
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TimerConfig {
    /// Desired interval in seconds
    pub time_s: f64,
    /// Counter width in bits; the largest counter value is `2^bits - 1`
    pub bits: u32,
}

/// Available input clocks
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ClockConfig {
    /// Candidate clock frequencies in Hz
    pub frequencies_hz: Vec<f64>,
}

/// Divider chain description
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct ScaleConfig {
    /// Dividers with an explicit menu of ratios
    #[serde(default)]
    pub factors: Vec<Vec<u64>>,
    /// Dividers described by a range
    #[serde(default)]
    pub ranges: Vec<ScaleRange>,
}

/// Half-open range of divider settings `[min, max)`.
///
/// With `exponential` set the divider ratio is `1 << x` for each setting `x`,
/// which models power-of-two prescalers.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct ScaleRange {
    pub min: u64,
    pub max: u64,
    #[serde(default)]
    pub exponential: bool,
}

impl ScaleRange {
    /// The divider ratios this range stands for.
    pub fn ratios(&self) -> Result<Vec<u64>, ConfigError> {
        (self.min..self.max)
            .map(|x| {
                if !self.exponential {
                    Ok(x)
                } else if x < u64::BITS as u64 {
                    Ok(1u64 << x)
                } else {
                    Err(ConfigError::ScaleOverflow)
                }
            })
            .collect()
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            timer: TimerConfig {
                time_s: 0.001,
                bits: 16,
            },
            clock: ClockConfig {
                frequencies_hz: vec![1e6, 8e6, 16e6, 48e6],
            },
            scale: ScaleConfig {
                factors: vec![vec![1, 3, 5]],
                ranges: vec![ScaleRange {
                    min: 0,
                    max: 9,
                    exponential: true,
                }],
            },
        }
    }
}

impl ScaleConfig {
    /// Every product of one ratio per divider, sorted ascending and unique.
    ///
    /// With no dividers at all the only scale is 1. A divider with no
    /// settings (e.g. an empty range) leaves the set empty, which the
    /// snapshot later rejects.
    pub fn expand(&self) -> Result<Vec<u64>, ConfigError> {
        let mut dividers = self.factors.clone();
        for range in &self.ranges {
            dividers.push(range.ratios()?);
        }

        let mut scales = vec![1u64];
        for ratios in &dividers {
            let mut next = Vec::with_capacity(scales.len() * ratios.len());
            for &scale in &scales {
                for &ratio in ratios {
                    next.push(scale.checked_mul(ratio).ok_or(ConfigError::ScaleOverflow)?);
                }
            }
            next.sort_unstable();
            next.dedup();
            scales = next;
        }

        Ok(scales)
    }
}

impl Config {
    /// Load configuration from timer-config.toml
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load() -> Self {
        Self::load_from_path(CONFIG_FILE)
    }

    /// Load configuration from specified path
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        match Self::try_load_from_path(&path) {
            Ok(config) => {
                log::info!("Loaded configuration from {}", path.as_ref().display());
                config
            }
            Err(ConfigError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("No config file found, using default configuration");
                Self::default()
            }
            Err(e) => {
                log::warn!("{}; using default configuration", e);
                Self::default()
            }
        }
    }

    /// Load configuration from specified path, reporting any failure
    pub fn try_load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Ok(toml::from_str::<Config>(&contents)?)
    }

    /// Save current configuration to the given path
    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(&path, contents)?;
        log::info!("Configuration saved to {}", path.as_ref().display());
        Ok(())
    }

    /// Largest counter value for the configured width
    pub fn max_value(&self) -> Result<u64, ConfigError> {
        if self.timer.bits > u64::BITS {
            return Err(ConfigError::Bits(self.timer.bits));
        }
        Ok(max_value_for_bits(self.timer.bits))
    }

    /// Expand and validate into the snapshot consumed by the core
    pub fn to_snapshot(&self) -> Result<ParameterSnapshot, ConfigError> {
        let snapshot = ParameterSnapshot::new(
            self.timer.time_s,
            self.max_value()?,
            self.clock.frequencies_hz.clone(),
            self.scale.expand()?,
        )?;
        log::debug!(
            "snapshot: t = {} s, max = {}, {} frequencies, {} scales",
            snapshot.target_time(),
            snapshot.max_value(),
            snapshot.frequencies().len(),
            snapshot.scales().len()
        );
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.timer.time_s, 0.001);
        assert_eq!(config.timer.bits, 16);
        assert_eq!(config.clock.frequencies_hz.len(), 4);
        assert_eq!(config.max_value().unwrap(), 65_535);
    }

    #[test]
    fn test_default_config_builds_snapshot() {
        let snapshot = Config::default().to_snapshot().unwrap();
        assert_eq!(snapshot.max_value(), 65_535);
        // {1, 3, 5} x {1, 2, 4, ..., 256}
        assert_eq!(snapshot.scales().len(), 27);
        assert_eq!(snapshot.scale_band(), (1, 1280));
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let config = Config::load_from_path("/nonexistent/path");
        // Should fallback to default
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_invalid_file_falls_back() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "this is not [valid toml").unwrap();
        assert!(matches!(
            Config::try_load_from_path(file.path()),
            Err(ConfigError::Parse(_))
        ));
        assert_eq!(Config::load_from_path(file.path()), Config::default());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[timer]
time_s = 0.5
bits = 8

[clock]
frequencies_hz = [32768.0]

[scale]
factors = [[1, 10]]

[[scale.ranges]]
min = 1
max = 4
"#
        )
        .unwrap();

        let config = Config::try_load_from_path(file.path()).unwrap();
        assert_eq!(config.timer.bits, 8);
        assert_eq!(config.clock.frequencies_hz, vec![32768.0]);
        assert!(!config.scale.ranges[0].exponential);

        let snapshot = config.to_snapshot().unwrap();
        assert_eq!(snapshot.max_value(), 255);
        assert_eq!(snapshot.scales(), &[1, 2, 3, 10, 20, 30]);
    }

    #[test]
    fn test_save_and_reload() {
        let file = NamedTempFile::new().unwrap();
        let mut config = Config::default();
        config.timer.bits = 24;
        config.save_to_path(file.path()).unwrap();

        let loaded = Config::try_load_from_path(file.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_range_ratios() {
        let linear = ScaleRange {
            min: 2,
            max: 5,
            exponential: false,
        };
        assert_eq!(linear.ratios().unwrap(), vec![2, 3, 4]);

        let exponential = ScaleRange {
            min: 0,
            max: 4,
            exponential: true,
        };
        assert_eq!(exponential.ratios().unwrap(), vec![1, 2, 4, 8]);

        let overflowing = ScaleRange {
            min: 63,
            max: 65,
            exponential: true,
        };
        assert!(matches!(
            overflowing.ratios(),
            Err(ConfigError::ScaleOverflow)
        ));
    }

    #[test]
    fn test_expand_is_product_of_dividers() {
        let scale = ScaleConfig {
            factors: vec![vec![1, 2], vec![3, 1]],
            ranges: vec![ScaleRange {
                min: 1,
                max: 3,
                exponential: false,
            }],
        };
        // {1, 2} x {1, 3} x {1, 2} = {1, 2, 3, 4, 6, 12}
        assert_eq!(scale.expand().unwrap(), vec![1, 2, 3, 4, 6, 12]);
    }

    #[test]
    fn test_expand_without_dividers_is_unity() {
        assert_eq!(ScaleConfig::default().expand().unwrap(), vec![1]);
    }

    #[test]
    fn test_empty_range_rejected_by_snapshot() {
        let mut config = Config::default();
        config.scale.ranges = vec![ScaleRange {
            min: 4,
            max: 4,
            exponential: false,
        }];
        assert!(matches!(
            config.to_snapshot(),
            Err(ConfigError::Snapshot(SnapshotError::NoScales))
        ));
    }

    #[test]
    fn test_product_overflow() {
        let scale = ScaleConfig {
            factors: vec![vec![u64::MAX], vec![2]],
            ranges: vec![],
        };
        assert!(matches!(scale.expand(), Err(ConfigError::ScaleOverflow)));
    }

    #[test]
    fn test_bits_out_of_range() {
        let mut config = Config::default();
        config.timer.bits = 65;
        assert!(matches!(config.to_snapshot(), Err(ConfigError::Bits(65))));

        config.timer.bits = 64;
        assert_eq!(config.max_value().unwrap(), u64::MAX);
    }

    #[test]
    fn test_invalid_time_rejected() {
        let mut config = Config::default();
        config.timer.time_s = -1.0;
        assert!(matches!(
            config.to_snapshot(),
            Err(ConfigError::Snapshot(SnapshotError::TargetTime(_)))
        ));
    }
}
