//! Engine configuration
//!
//! Every field has a default, so a JSON file only needs to list the values it
//! overrides:
//!
//! ```json
//! { "wheel_radius": 200, "observer": { "latitude_deg": -36.85, "longitude_deg": 174.76 } }
//! ```

use crate::astrology::{Observer, RetrogradeDeltaPolicy};
use crate::constants::{
    ANIMATION_DURATION_MS, DEFAULT_UTC_OFFSET_MINUTES, MAX_ORBIT_RADIUS, MEAN_OBLIQUITY_DEG,
    MIN_ORBIT_RADIUS, ORBIT_PATH_SAMPLES, WHEEL_RADIUS,
};
use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Error type for configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Tunable parameters of a chart engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Display radius of the innermost orbit
    pub min_orbit_radius: f64,
    /// Display radius of the outermost orbit
    pub max_orbit_radius: f64,
    /// Radius of the chart wheel
    pub wheel_radius: f64,
    /// Points per orbit path
    pub orbit_samples: usize,
    /// Length of an animated transition
    pub animation_duration_ms: u64,
    /// Obliquity used for the ascendant, degrees
    pub obliquity_deg: f64,
    pub retrograde_delta: RetrogradeDeltaPolicy,
    /// Offset of user-entered local times from UTC
    pub utc_offset_minutes: i32,
    pub observer: Observer,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_orbit_radius: MIN_ORBIT_RADIUS,
            max_orbit_radius: MAX_ORBIT_RADIUS,
            wheel_radius: WHEEL_RADIUS,
            orbit_samples: ORBIT_PATH_SAMPLES,
            animation_duration_ms: ANIMATION_DURATION_MS,
            obliquity_deg: MEAN_OBLIQUITY_DEG,
            retrograde_delta: RetrogradeDeltaPolicy::default(),
            utc_offset_minutes: DEFAULT_UTC_OFFSET_MINUTES,
            observer: Observer::default(),
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON configuration
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Check that the values describe a drawable chart
    pub fn validate(&self) -> Result<()> {
        let radii = [
            ("min_orbit_radius", self.min_orbit_radius),
            ("max_orbit_radius", self.max_orbit_radius),
            ("wheel_radius", self.wheel_radius),
        ];
        for (name, value) in radii {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        if self.min_orbit_radius >= self.max_orbit_radius {
            return Err(ConfigError::Invalid(format!(
                "min_orbit_radius {} must be below max_orbit_radius {}",
                self.min_orbit_radius, self.max_orbit_radius
            )));
        }
        if self.orbit_samples == 0 {
            return Err(ConfigError::Invalid("orbit_samples must be positive".into()));
        }
        if self.animation_duration_ms == 0 {
            return Err(ConfigError::Invalid(
                "animation_duration_ms must be positive".into(),
            ));
        }
        if !self.obliquity_deg.is_finite() {
            return Err(ConfigError::Invalid(format!(
                "obliquity_deg must be finite, got {}",
                self.obliquity_deg
            )));
        }
        self.utc_offset()?;
        Ok(())
    }

    pub fn animation_duration(&self) -> Duration {
        Duration::from_millis(self.animation_duration_ms)
    }

    /// Offset applied to user-entered local times
    pub fn utc_offset(&self) -> Result<FixedOffset> {
        self.utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| {
                ConfigError::Invalid(format!(
                    "utc_offset_minutes {} is not a valid offset",
                    self.utc_offset_minutes
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = EngineConfig::default();
        config.validate().unwrap();
        assert_eq!(config.wheel_radius, 150.0);
        assert_eq!(config.orbit_samples, 360);
        assert_eq!(config.animation_duration(), Duration::from_secs(5));
        assert_eq!(config.utc_offset().unwrap().local_minus_utc(), 13 * 3600);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = EngineConfig::from_json_str(
            r#"{ "wheel_radius": 200, "retrograde_delta": "raw",
                 "observer": { "latitude_deg": -36.85, "longitude_deg": 174.76 } }"#,
        )
        .unwrap();
        assert_eq!(config.wheel_radius, 200.0);
        assert_eq!(config.retrograde_delta, RetrogradeDeltaPolicy::Raw);
        assert_eq!(config.observer, Observer::new(-36.85, 174.76));
        assert_eq!(config.min_orbit_radius, MIN_ORBIT_RADIUS);
    }

    #[test]
    fn test_invalid_values_rejected() {
        for json in [
            r#"{ "min_orbit_radius": 400 }"#,
            r#"{ "wheel_radius": -1 }"#,
            r#"{ "orbit_samples": 0 }"#,
            r#"{ "animation_duration_ms": 0 }"#,
            r#"{ "utc_offset_minutes": 100000 }"#,
        ] {
            let err = EngineConfig::from_json_str(json).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid(_)), "{}: {}", json, err);
        }
        assert!(matches!(
            EngineConfig::from_json_str("{ not json"),
            Err(ConfigError::JsonError(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "animation_duration_ms": 1200 }}"#).unwrap();
        let config = EngineConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.animation_duration(), Duration::from_millis(1200));

        let missing = EngineConfig::from_json_file("/nonexistent/skywheel.json");
        assert!(matches!(missing, Err(ConfigError::IoError(_))));
    }
}
