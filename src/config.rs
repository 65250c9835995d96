//! Flock configuration, saved and loaded as JSON.
//!
//! Missing fields fall back to their defaults, so a file only needs the
//! values it changes:
//!
//! ```json
//! { "boid_count": 4096, "separation_weight": 0.8 }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::flock::{SimParams, HALF_EXTENT, MAX_SPEED};

/// Everything needed to start a flock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlockConfig {
    pub boid_count: usize,
    pub seed: u64,
    pub dt: f32,
    /// Time scale applied by the host clock.
    pub speed: f32,
    pub cohesion_distance: f32,
    pub separation_distance: f32,
    pub alignment_distance: f32,
    pub cohesion_weight: f32,
    pub separation_weight: f32,
    pub alignment_weight: f32,
}

impl Default for FlockConfig {
    fn default() -> Self {
        Self {
            boid_count: 1000,
            seed: 0,
            dt: 0.01,
            speed: 1.0,
            cohesion_distance: 0.1,
            separation_distance: 0.025,
            alignment_distance: 0.025,
            cohesion_weight: 0.05,
            separation_weight: 0.5,
            alignment_weight: 0.2,
        }
    }
}

impl FlockConfig {
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        log::info!("Loaded flock config from {}", path.display());
        Ok(config)
    }

    /// Reject empty flocks, non-finite or negative values, and steps long
    /// enough to cross the whole square in one tick.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.boid_count == 0 {
            return Err(ConfigError::Invalid("boid_count must be at least 1".into()));
        }
        let fields = [
            ("dt", self.dt),
            ("speed", self.speed),
            ("cohesion_distance", self.cohesion_distance),
            ("separation_distance", self.separation_distance),
            ("alignment_distance", self.alignment_distance),
            ("cohesion_weight", self.cohesion_weight),
            ("separation_weight", self.separation_weight),
            ("alignment_weight", self.alignment_weight),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{} must be finite and non-negative, got {}",
                    name, value
                )));
            }
        }
        // The wrap corrects a single crossing per tick
        let max_travel = self.dt * self.speed * MAX_SPEED;
        if max_travel > 2.0 * HALF_EXTENT {
            return Err(ConfigError::Invalid(format!(
                "dt * speed = {} lets a boid travel {} per tick, more than the square's side {}",
                self.dt * self.speed,
                max_travel,
                2.0 * HALF_EXTENT
            )));
        }
        if u32::try_from(self.boid_count).is_err() {
            log::warn!(
                "boid_count {} exceeds what a GPU dispatch can index",
                self.boid_count
            );
        }
        Ok(())
    }

    /// Kernel parameters for a tick of length `dt`.
    pub fn sim_params(&self, dt: f32) -> SimParams {
        SimParams::from_distances(
            dt,
            [
                self.cohesion_distance,
                self.separation_distance,
                self.alignment_distance,
            ],
            [
                self.cohesion_weight,
                self.separation_weight,
                self.alignment_weight,
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_sim_params_default() {
        let config = FlockConfig::default();
        assert_eq!(config.sim_params(config.dt), SimParams::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: FlockConfig =
            serde_json::from_str(r#"{ "boid_count": 64, "separation_weight": 0.8 }"#).unwrap();
        assert_eq!(config.boid_count, 64);
        assert_eq!(config.separation_weight, 0.8);
        assert_eq!(config.dt, 0.01);
        assert_eq!(config.cohesion_distance, 0.1);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let empty = FlockConfig {
            boid_count: 0,
            ..Default::default()
        };
        assert!(matches!(empty.validate(), Err(ConfigError::Invalid(_))));

        let negative = FlockConfig {
            cohesion_weight: -1.0,
            ..Default::default()
        };
        assert!(negative.validate().is_err());

        let nan = FlockConfig {
            dt: f32::NAN,
            ..Default::default()
        };
        assert!(nan.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_steps_longer_than_the_square() {
        // 20 * 0.1 = 2.0 per tick, two full crossings
        let long_step = FlockConfig {
            dt: 20.0,
            ..Default::default()
        };
        assert!(matches!(long_step.validate(), Err(ConfigError::Invalid(_))));

        let fast = FlockConfig {
            dt: 1.0,
            speed: 10.5,
            ..Default::default()
        };
        assert!(fast.validate().is_err());

        // exactly one side per tick still wraps back inside
        let edge = FlockConfig {
            dt: 10.0,
            ..Default::default()
        };
        assert!(edge.validate().is_ok());
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir()
            .join(format!("boidlight-config-{}.json", std::process::id()));
        let config = FlockConfig {
            boid_count: 12,
            seed: 99,
            ..Default::default()
        };
        config.save(&path).unwrap();
        let loaded = FlockConfig::load(&path).unwrap();
        let _ = fs::remove_file(&path);
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = FlockConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
